mod common;

use common::{count, mobile_index, Harness, RIGHT};
use skirmish_core::{
    ActorFlags, Attribution, Command, Event, ItemRef, ParticleSpawn, PlayerId, TileItemFlags,
    Vec2i,
};
use skirmish_world::query;

fn removals(events: &[Event]) -> usize {
    count(events, |event| matches!(event, Event::MobileObjectRemove { .. }))
}

fn solid() -> TileItemFlags {
    TileItemFlags::CAN_BE_SHOT | TileItemFlags::IMPASSABLE
}

#[test]
fn bullet_velocity_follows_the_firing_angle() {
    let mut harness = Harness::new();
    let _ = harness.fire("rifle", Vec2i::new(10, 32), RIGHT, Attribution::ENVIRONMENT);
    let _ = harness.fire("rifle", Vec2i::new(10, 32), 0.0, Attribution::ENVIRONMENT);

    let mobiles = query::mobile_objects(&harness.world);
    assert_eq!(mobiles[0].vel, Vec2i::new(512, 0));
    assert_eq!(mobiles[1].vel, Vec2i::new(0, -512));
    assert_eq!(mobiles[0].uid.get() + 1, mobiles[1].uid.get());
}

#[test]
fn expired_bullets_are_removed_only_through_the_queue() {
    let mut harness = Harness::new();
    let index = harness.fire("fragment", Vec2i::new(10, 32), RIGHT, Attribution::ENVIRONMENT);

    let events = harness.tick(8);
    assert_eq!(removals(&events), 0, "range lasts exactly eight ticks");

    let events = harness.tick(1);
    assert_eq!(
        events,
        vec![
            Event::MobileObjectRemove { index },
            Event::TimeAdvanced { ticks: 1 },
        ]
    );
    let snapshot = &query::mobile_objects(&harness.world)[0];
    assert!(snapshot.expired, "tombstoned until the removal is applied");

    let events = harness.tick(5);
    assert_eq!(removals(&events), 0, "tombstones are never announced twice");

    let events = harness.apply(Command::RemoveMobileObject { index });
    assert!(events.is_empty());
    assert!(query::mobile_objects(&harness.world).is_empty());
    assert!(!harness.map.contains(ItemRef::MobileObject(index)));
}

#[test]
fn simultaneous_expiry_defers_every_removal() {
    let mut harness = Harness::new();
    let first = harness.fire("fragment", Vec2i::new(10, 16), RIGHT, Attribution::ENVIRONMENT);
    let second = harness.fire("fragment", Vec2i::new(10, 48), RIGHT, Attribution::ENVIRONMENT);

    let events = harness.tick(20);

    assert_eq!(
        events,
        vec![
            Event::MobileObjectRemove { index: first },
            Event::MobileObjectRemove { index: second },
            Event::TimeAdvanced { ticks: 20 },
        ]
    );
    assert_eq!(query::mobile_objects(&harness.world).len(), 2);
}

#[test]
#[should_panic(expected = "not in use")]
fn removing_a_mobile_object_twice_panics() {
    let mut harness = Harness::new();
    let index = harness.fire("rifle", Vec2i::new(10, 32), RIGHT, Attribution::ENVIRONMENT);
    let _ = harness.apply(Command::RemoveMobileObject { index });
    let _ = harness.apply(Command::RemoveMobileObject { index });
}

#[test]
fn bullets_leaving_the_arena_expire() {
    let mut harness = Harness::new();
    let index = harness.fire("rifle", Vec2i::new(120, 32), RIGHT, Attribution::ENVIRONMENT);

    let events = harness.tick(10);

    assert_eq!(events[0], Event::MobileObjectRemove { index });
    let snapshot = &query::mobile_objects(&harness.world)[0];
    assert_eq!(snapshot.pos.full_to_real(), Vec2i::new(126, 32));
}

#[test]
fn bullet_destroys_the_object_in_its_path_and_expires() {
    let mut harness = Harness::new();
    let (uid, object) = harness.add_object("barrel", 10, solid(), Vec2i::new(20, 32));
    let index = harness.fire(
        "rifle",
        Vec2i::new(10, 32),
        RIGHT,
        Attribution::new(Some(PlayerId::new(1)), None),
    );

    let events = harness.tick(5);

    assert_eq!(
        count(&events, |event| matches!(event, Event::ObjectDestroyed { .. })),
        1
    );
    assert!(events.contains(&Event::ObjectDestroyed {
        uid,
        wrecked: false,
    }));
    assert!(events.contains(&Event::MobileObjectRemove { index }));
    assert!(!harness.map.contains(ItemRef::Object(object)));

    let snapshot = &query::mobile_objects(&harness.world)[0];
    assert_eq!(snapshot.pos.full_to_real(), Vec2i::new(16, 32));
    assert_eq!(snapshot.sound_lock, 12);
}

#[test]
fn zero_power_debris_never_hits() {
    let mut harness = Harness::new();
    let (uid, _) = harness.add_object("barrel", 10, solid(), Vec2i::new(20, 32));
    let _ = harness.fire("debris", Vec2i::new(10, 32), RIGHT, Attribution::ENVIRONMENT);

    let events = harness.tick(10);

    assert_eq!(events, vec![Event::TimeAdvanced { ticks: 10 }]);
    assert_eq!(query::object_by_uid(&harness.world, uid).health, 10);
}

#[test]
fn piercing_bullets_hit_every_overlap_with_one_sound() {
    let mut harness = Harness::new();
    let _ = harness.add_actor(1, None, ActorFlags::empty(), Vec2i::new(20, 32));
    let _ = harness.add_actor(2, None, ActorFlags::empty(), Vec2i::new(20, 32));
    let index = harness.fire("lance", Vec2i::new(10, 32), RIGHT, Attribution::ENVIRONMENT);

    let events = harness.tick(3);

    assert_eq!(
        count(&events, |event| matches!(event, Event::HitCharacter { .. })),
        2
    );
    assert_eq!(
        count(&events, |event| matches!(
            event,
            Event::SoundAt { sound, .. } if sound == "hit_flesh"
        )),
        1
    );
    assert_eq!(removals(&events), 0);
    let snapshot = &query::mobile_objects(&harness.world)[index.get()];
    assert_eq!(snapshot.sound_lock, 12);
}

#[test]
fn sound_lock_decays_with_elapsed_ticks_and_rearms() {
    let mut harness = Harness::new();
    let _ = harness.add_actor(1, None, ActorFlags::empty(), Vec2i::new(20, 32));
    let _ = harness.add_actor(2, None, ActorFlags::empty(), Vec2i::new(60, 32));
    let index = harness.fire("lance", Vec2i::new(10, 32), RIGHT, Attribution::ENVIRONMENT);
    let flesh_sounds = |events: &[Event]| {
        count(events, |event| matches!(
            event,
            Event::SoundAt { sound, .. } if sound == "hit_flesh"
        ))
    };
    let sound_lock =
        |harness: &Harness| query::mobile_objects(&harness.world)[index.get()].sound_lock;

    let mut events = Vec::new();
    for _ in 0..10 {
        events.extend(harness.tick(1));
    }
    assert_eq!(
        count(&events, |event| matches!(event, Event::HitCharacter { .. })),
        5,
        "the lance overlaps the first actor for five ticks"
    );
    assert_eq!(flesh_sounds(&events), 1, "the lock mutes repeated hits");
    assert_eq!(sound_lock(&harness), 5);

    let events = harness.tick(4);
    assert_eq!(
        count(&events, |event| matches!(event, Event::HitCharacter { .. })),
        0
    );
    assert_eq!(sound_lock(&harness), 1, "a multi-tick update decays by every tick");

    let mut events = Vec::new();
    for _ in 0..13 {
        events.extend(harness.tick(1));
    }
    assert_eq!(
        count(&events, |event| matches!(event, Event::HitCharacter { .. })),
        5
    );
    assert_eq!(flesh_sounds(&events), 1, "the released lock lets the next hit sound");
    assert_eq!(removals(&events), 0);
    assert_eq!(sound_lock(&harness), 8);
}

#[test]
fn plain_bullets_stop_at_the_first_overlap() {
    let mut harness = Harness::new();
    let _ = harness.add_actor(1, None, ActorFlags::empty(), Vec2i::new(20, 32));
    let _ = harness.add_actor(2, None, ActorFlags::empty(), Vec2i::new(20, 32));
    let index = harness.fire("rifle", Vec2i::new(10, 32), RIGHT, Attribution::ENVIRONMENT);

    let events = harness.tick(3);

    assert_eq!(
        count(&events, |event| matches!(event, Event::HitCharacter { .. })),
        1
    );
    assert!(events.contains(&Event::MobileObjectRemove { index }));
}

#[test]
fn friendly_bullets_pass_through_allies() {
    let mut harness = Harness::new();
    let _ = harness.add_actor(1, None, ActorFlags::GOOD_GUY, Vec2i::new(20, 32));
    let _ = harness.apply(Command::SpawnBullet(skirmish_core::BulletSpawn {
        class: "rifle".to_owned(),
        muzzle_pos: Vec2i::new(10, 32).real_to_full(),
        muzzle_height: 0,
        angle: RIGHT,
        elevation: 0,
        flags: skirmish_core::HitFlags::GOOD_GUY,
        attribution: Attribution::ENVIRONMENT,
        target: None,
    }));

    let events = harness.tick(6);

    assert_eq!(
        count(&events, |event| matches!(event, Event::HitCharacter { .. })),
        0
    );
    assert_eq!(removals(&events), 0);
}

#[test]
fn homing_bullets_turn_toward_their_target() {
    let mut harness = Harness::new();
    let target = harness.add_actor(7, None, ActorFlags::empty(), Vec2i::new(60, 10));
    let _ = harness.fire_at(
        "seeker",
        Vec2i::new(10, 60),
        0.0,
        Attribution::ENVIRONMENT,
        Some(target.uid),
    );

    let _ = harness.tick(1);

    let snapshot = &query::mobile_objects(&harness.world)[0];
    assert_eq!(snapshot.vel, Vec2i::new(90, -475));
}

#[test]
fn particles_fall_land_and_expire() {
    let mut harness = Harness::new();
    let start = Vec2i::new(20, 20).real_to_full();
    let events = harness.apply(Command::SpawnParticle(ParticleSpawn {
        class: "ember".to_owned(),
        full_pos: start,
        z: 16,
        vel: Vec2i::new(64, 0),
        angle: 0.0,
        dz: 0,
        spin: 0.5,
    }));
    let index = mobile_index(&events);

    let events = harness.tick(3);
    assert_eq!(removals(&events), 0);
    let snapshot = &query::mobile_objects(&harness.world)[0];
    assert_eq!(snapshot.z, 0);
    assert_eq!(snapshot.vel, Vec2i::ZERO);
    assert_eq!(snapshot.pos, start + Vec2i::new(128, 0));
    assert_eq!(snapshot.attribution, Attribution::ENVIRONMENT);

    let events = harness.tick(37);
    assert_eq!(removals(&events), 0);
    assert_eq!(query::mobile_objects(&harness.world)[0].range, 0);

    let events = harness.tick(1);
    assert_eq!(
        events,
        vec![
            Event::MobileObjectRemove { index },
            Event::TimeAdvanced { ticks: 1 },
        ]
    );
}

#[test]
fn animation_frames_advance_while_alive() {
    let mut harness = Harness::new();
    let _ = harness.fire("rifle", Vec2i::new(10, 32), RIGHT, Attribution::ENVIRONMENT);

    for _ in 0..3 {
        let _ = harness.tick(1);
    }

    assert_eq!(query::mobile_objects(&harness.world)[0].frame, 3);
    assert_eq!(query::tick_index(&harness.world), 3);
}

#[test]
fn animation_frames_advance_by_elapsed_ticks() {
    let mut harness = Harness::new();
    let _ = harness.fire("rifle", Vec2i::new(10, 32), RIGHT, Attribution::ENVIRONMENT);

    let _ = harness.tick(3);
    assert_eq!(query::mobile_objects(&harness.world)[0].frame, 3);

    let _ = harness.tick(2);
    let _ = harness.tick(0);
    assert_eq!(query::mobile_objects(&harness.world)[0].frame, 5);
}

#[test]
fn unknown_bullet_classes_are_dropped() {
    let mut harness = Harness::new();
    let events = harness.apply(Command::SpawnBullet(skirmish_core::BulletSpawn {
        class: "plasma".to_owned(),
        muzzle_pos: Vec2i::new(2560, 2560),
        muzzle_height: 0,
        angle: 0.0,
        elevation: 0,
        flags: skirmish_core::HitFlags::empty(),
        attribution: Attribution::ENVIRONMENT,
        target: None,
    }));

    assert!(events.is_empty());
    assert_eq!(query::mobile_slot_count(&harness.world), 0);
}
