//! Damage resolution: turns a hit into health changes and side-effect events.
//!
//! Every consequence of a hit is expressed as an [`Event`] appended to the
//! outbound queue. The only state mutated in place is the health and wreck
//! status of static objects, which the object registry owns.

use std::{f64::consts::TAU, sync::Arc};

use rand::Rng;
use skirmish_core::{
    ActorFlags, ActorSnapshot, ActorUid, Attribution, BulletSpawn, Event, GoreLevel, Hit,
    HitFlags, ObjectUid, ObjectiveKind, ParticleSpawn, SlotIndex, Target, TileItemFlags,
    TileItemKind, Vec2i, Z_FACTOR,
};

use crate::{objects::ObjectRegistry, Services};

/// Divisor applied to `hit * power` to obtain knockback velocity.
pub(crate) const SHOT_IMPULSE_DIVISOR: i32 = 25;

/// Score awarded for destroying an objective object.
pub(crate) const OBJECT_SCORE: i32 = 50;

/// Score multiplier for hitting a penalty character.
pub(crate) const PENALTY_MULTIPLIER: i32 = -10;

/// Blood particle classes, cycled in order.
const BLOOD_CLASSES: [&str; 3] = ["blood1", "blood2", "blood3"];

/// Mutable context for resolving hits within one command or tick.
pub(crate) struct Resolver<'a, 's> {
    pub(crate) objects: &'a mut ObjectRegistry,
    pub(crate) services: &'a mut Services<'s>,
    pub(crate) out: &'a mut Vec<Event>,
}

impl<'a, 's> Resolver<'a, 's> {
    pub(crate) fn new(
        objects: &'a mut ObjectRegistry,
        services: &'a mut Services<'s>,
        out: &'a mut Vec<Event>,
    ) -> Self {
        Self {
            objects,
            services,
            out,
        }
    }

    /// Applies `hit` to `target`. Only characters and static objects can be
    /// damaged; any other kind is a caller bug.
    pub(crate) fn damage(&mut self, hit: &Hit, target: Target) {
        match target.kind {
            TileItemKind::Character => self.damage_character(hit, ActorUid::new(target.uid)),
            TileItemKind::Object => self.damage_object(hit, ObjectUid::new(target.uid)),
            kind => panic!("cannot damage tile item kind {kind:?}"),
        }
    }

    fn damage_object(&mut self, hit: &Hit, uid: ObjectUid) {
        assert!(
            self.objects.was_issued(uid),
            "cannot damage object {} that was never created",
            uid.get()
        );
        // Objects removed by an earlier hit are gone from the registry.
        let Some((index, object)) = self.objects.find_mut(uid) else {
            log::debug!("ignoring hit on removed object {}", uid.get());
            return;
        };
        if object.health <= 0 {
            return;
        }

        object.health = object.health.saturating_sub(hit.power);
        let pos = object.placement.pos;
        if object.health <= 0 {
            self.destroy_object(index, hit);
        }

        if hit.power <= 0 {
            return;
        }
        if let Some(sounds) = &hit.sounds {
            self.out.push(Event::SoundAt {
                sound: sounds.object.clone(),
                pos,
                is_hit: true,
            });
        }
    }

    fn destroy_object(&mut self, index: SlotIndex, hit: &Hit) {
        let Some(object) = self.objects.get_mut(index) else {
            return;
        };
        object.health = 0;
        let uid = object.uid;
        let flags = object.placement.flags;
        let real_pos = object.placement.pos;
        let class = Arc::clone(&object.class);

        self.services
            .mission
            .objective_progress(flags, ObjectiveKind::Destroy);
        if flags.contains(TileItemFlags::OBJECTIVE) {
            if let Some(player) = hit.attribution.player {
                self.out.push(Event::Score {
                    player,
                    score: OBJECT_SCORE,
                });
            }
        }

        let full_pos = real_pos.real_to_full();
        for name in &class.destroy_guns {
            match self.services.classes.gun(name) {
                Ok(gun) => gun.fire(full_pos, 0, 0.0, hit.flags, hit.attribution, true, self.out),
                Err(error) => log::warn!("object {} cannot fire: {error}", uid.get()),
            }
        }

        self.out.push(Event::AddBullet(BulletSpawn {
            class: self.services.config.wreck_bullet.clone(),
            muzzle_pos: full_pos,
            muzzle_height: 0,
            angle: 0.0,
            elevation: 0,
            flags: HitFlags::empty(),
            attribution: Attribution::ENVIRONMENT,
            target: None,
        }));
        self.out.push(Event::SoundAt {
            sound: self.services.config.wreck_sound.clone(),
            pos: real_pos,
            is_hit: false,
        });

        let wrecked = class.wreck.is_some();
        if wrecked {
            object.placement.flags = TileItemFlags::IS_WRECK;
            self.services.map.refresh(&object.placement);
        } else {
            self.objects.destroy(index, self.services.map);
        }
        log::debug!("object {} destroyed, wrecked: {wrecked}", uid.get());

        self.out.push(Event::ObjectDestroyed { uid, wrecked });
        self.out.push(Event::PathCacheInvalidated);
    }

    fn damage_character(&mut self, hit: &Hit, uid: ActorUid) {
        let actors = self.services.actors;
        let actor = actors
            .by_uid(uid)
            .filter(|actor| actor.in_use)
            .unwrap_or_else(|| panic!("cannot damage nonexistent actor {}", uid.get()));
        debug_assert!(
            actors.can_hit(hit.flags, hit.attribution.actor, &actor),
            "damaging undamageable actor {}",
            uid.get()
        );
        let mode = self.services.config.mode;

        self.out.push(Event::HitCharacter {
            target: actor.index,
            special: hit.special,
        });

        if let Some(sounds) = &hit.sounds {
            let audible = !actors.is_immune(&actor, hit.special)
                && (hit.allow_friendly_hit_sound
                    || !actors.is_invulnerable(&actor, hit.flags, hit.attribution.player, mode));
            if audible {
                self.out.push(Event::SoundAt {
                    sound: sounds.flesh.clone(),
                    pos: actor.pos.full_to_real(),
                    is_hit: true,
                });
            }
        }

        if self.services.config.shots_pushback {
            self.out.push(Event::ActorImpulse {
                target: actor.index,
                vel: hit
                    .vector
                    .scale(hit.power)
                    .scale_div(SHOT_IMPULSE_DIVISOR),
            });
        }

        if !actors.can_damage(
            hit.flags,
            hit.attribution.player,
            hit.attribution.actor,
            &actor,
            hit.special,
        ) {
            return;
        }

        self.out.push(Event::DamageCharacter {
            power: hit.power,
            player: hit.attribution.player,
            target: actor.uid,
            target_player: actor.player,
        });
        self.emit_blood(hit, &actor);
        self.score_character_hit(hit, &actor);
    }

    fn emit_blood(&mut self, hit: &Hit, actor: &ActorSnapshot) {
        let gore = self.services.config.gore;
        if gore == GoreLevel::None {
            return;
        }

        let pushback = self.services.config.shots_pushback;
        let rng = &mut *self.services.rng;
        let mut blood = hit.power.saturating_mul(2);
        let mut variant = 0;
        while blood > 0 {
            let spread: i32 = rng.gen_range(8..16);
            let base = if pushback {
                hit.vector
                    .scale(spread.saturating_mul(hit.power))
                    .scale_div(15 * SHOT_IMPULSE_DIVISOR)
            } else {
                hit.vector.scale(spread).scale_div(20)
            };
            let jitter = Vec2i::new(rng.gen_range(-64..64), rng.gen_range(-64..64));

            self.out.push(Event::AddParticle(ParticleSpawn {
                class: BLOOD_CLASSES[variant].to_owned(),
                full_pos: actor.pos,
                z: 10 * Z_FACTOR,
                vel: base + jitter,
                angle: rng.gen_range(0.0..TAU),
                dz: rng.gen_range(6..12),
                spin: rng.gen_range(-0.1..0.1),
            }));

            variant = (variant + 1) % BLOOD_CLASSES.len();
            blood = gore.decay(blood);
        }
    }

    fn score_character_hit(&mut self, hit: &Hit, actor: &ActorSnapshot) {
        let Some(player) = hit.attribution.player else {
            return;
        };
        if hit.power == 0 {
            return;
        }

        let friendly = actor.flags.contains(ActorFlags::GOOD_GUY)
            || (!self.services.config.mode.is_pvp() && actor.player.is_some());
        let self_hit = hit.attribution.actor == Some(actor.uid);
        if friendly || self_hit {
            return;
        }

        let score = if actor.flags.contains(ActorFlags::PENALTY) {
            PENALTY_MULTIPLIER.saturating_mul(hit.power)
        } else {
            hit.power
        };
        self.out.push(Event::Score { player, score });
    }
}
