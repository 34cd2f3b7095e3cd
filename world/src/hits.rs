//! Bridges mobile object motion to the spatial index and damage resolution.

use std::sync::Arc;

use skirmish_core::{
    ActorUid, CollisionTeam, Hit, HitFlags, ItemRef, Rect, SpecialDamage, Target,
    TileItemFlags, Vec2i,
};

use crate::{
    damage::Resolver,
    mobile::{MobileClass, MobileObject},
};

/// Ticks during which a mobile object stays silent after a hit sound.
pub(crate) const SOUND_LOCK_MOBILE_OBJECT: i32 = 12;

/// Resolves hits for `object` at `pos` (full coordinates).
///
/// Returns whether any candidate was hit. With `allow_multiple` unset the
/// candidate scan stops after the first overlap, hit or not.
pub(crate) fn hit_item(
    object: &mut MobileObject,
    pos: Vec2i,
    allow_multiple: bool,
    resolver: &mut Resolver<'_, '_>,
) -> bool {
    let MobileClass::Bullet(class) = &object.class else {
        return false;
    };
    if class.power <= 0 && class.special == SpecialDamage::None {
        return false;
    }
    let class = Arc::clone(class);

    let bounds = Rect::centered(pos.full_to_real(), object.placement.size);
    let pvp = resolver.services.config.mode.is_pvp();
    let candidates = resolver.services.map.query(
        bounds,
        TileItemFlags::CAN_BE_SHOT,
        CollisionTeam::None,
        pvp,
    );

    let mut any_hit = false;
    for candidate in candidates {
        if can_hit(object.flags, object.attribution.actor, candidate, resolver) {
            any_hit = true;
            let target = target_of(candidate, resolver);
            let hit = Hit {
                vector: object.vel,
                power: class.power,
                flags: object.flags,
                attribution: object.attribution,
                special: class.special,
                sounds: (object.sound_lock <= 0).then(|| class.hit_sounds.clone()),
                allow_friendly_hit_sound: true,
            };
            resolver.damage(&hit, target);

            if object.sound_lock <= 0 {
                object.sound_lock += SOUND_LOCK_MOBILE_OBJECT;
            }
        }

        if !allow_multiple {
            break;
        }
    }

    if any_hit {
        log::trace!("mobile object {} connected", object.uid.get());
    }
    any_hit
}

/// Reports whether a hit from an entity with `flags` owned by `attacker`
/// connects with the candidate.
fn can_hit(
    flags: HitFlags,
    attacker: Option<ActorUid>,
    candidate: ItemRef,
    resolver: &Resolver<'_, '_>,
) -> bool {
    match candidate {
        ItemRef::Character(index) => {
            let actors = resolver.services.actors;
            actors
                .by_index(index)
                .is_some_and(|actor| actors.can_hit(flags, attacker, &actor))
        }
        ItemRef::Object(_) => true,
        ItemRef::Pickup(_) | ItemRef::MobileObject(_) => {
            panic!("cannot damage tile item kind {:?}", candidate.kind())
        }
    }
}

/// Resolves the kind-specific uid of a spatial candidate.
fn target_of(candidate: ItemRef, resolver: &Resolver<'_, '_>) -> Target {
    let uid = match candidate {
        ItemRef::Character(index) => resolver
            .services
            .actors
            .by_index(index)
            .map(|actor| actor.uid.get()),
        ItemRef::Object(index) => resolver.objects.get(index).map(|object| object.uid.get()),
        ItemRef::Pickup(_) | ItemRef::MobileObject(_) => None,
    };
    let uid = uid.unwrap_or_else(|| panic!("spatial index references a free slot: {candidate:?}"));
    Target {
        kind: candidate.kind(),
        uid,
    }
}
