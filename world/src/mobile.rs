//! Registry of mobile objects: bullets in flight and physics particles.

use std::{f64::consts::TAU, sync::Arc};

use skirmish_core::{
    ActorUid, Attribution, BulletClass, BulletSpawn, Event, HitFlags, ItemRef, MobileSnapshot,
    MobileUid, ParticleClass, ParticleSpawn, Placement, SlotIndex, TileItemFlags, TileMap, Vec2i,
};

use crate::{
    damage::Resolver,
    hits,
    slots::{SlotRegistry, UidCounter},
};

const MOBILE_CAPACITY: usize = 1024;

/// Fraction of the course error a homing bullet corrects per tick.
const HOMING_TURN_DIVISOR: i32 = 4;

/// Size used for particle placements, which never collide.
const PARTICLE_SIZE: Vec2i = Vec2i::new(1, 1);

/// Shared descriptor of a mobile object.
#[derive(Clone, Debug)]
pub(crate) enum MobileClass {
    Bullet(Arc<BulletClass>),
    Particle(Arc<ParticleClass>),
}

impl MobileClass {
    fn name(&self) -> &str {
        match self {
            Self::Bullet(class) => &class.name,
            Self::Particle(class) => &class.name,
        }
    }
}

/// Per-tick update behaviour of a mobile object.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Behavior {
    /// Travels in a straight line until it hits or runs out of range.
    Straight,
    /// Steers toward the target actor while it exists.
    Homing { target: Option<ActorUid> },
    /// Arcs under gravity and never hits anything.
    Particle { gravity: i32, spin: f64 },
}

/// Bullet or particle stored in the mobile registry.
#[derive(Clone, Debug)]
pub(crate) struct MobileObject {
    pub(crate) uid: MobileUid,
    pub(crate) class: MobileClass,
    pub(crate) behavior: Behavior,
    /// Position in full coordinates.
    pub(crate) pos: Vec2i,
    pub(crate) vel: Vec2i,
    pub(crate) z: i32,
    pub(crate) dz: i32,
    pub(crate) angle: f64,
    pub(crate) range: i32,
    pub(crate) sound_lock: i32,
    pub(crate) attribution: Attribution,
    pub(crate) flags: HitFlags,
    pub(crate) placement: Placement,
    pub(crate) expired: bool,
    pub(crate) frame: u32,
}

impl MobileObject {
    /// Runs the behaviour for the elapsed ticks. Returns `false` once expired.
    fn update(&mut self, ticks: i32, resolver: &mut Resolver<'_, '_>) -> bool {
        self.sound_lock = (self.sound_lock - ticks).max(0);

        match self.behavior {
            Behavior::Straight => self.fly(ticks, resolver),
            Behavior::Homing { target } => {
                if let Some(target) = target {
                    self.steer_toward(target, resolver);
                }
                self.fly(ticks, resolver)
            }
            Behavior::Particle { gravity, spin } => {
                self.drift(ticks, gravity, spin, resolver.services.map)
            }
        }
    }

    fn fly(&mut self, ticks: i32, resolver: &mut Resolver<'_, '_>) -> bool {
        let MobileClass::Bullet(class) = &self.class else {
            return false;
        };
        let pierces = class.pierces;

        for _ in 0..ticks {
            if self.range <= 0 {
                return false;
            }
            self.range -= 1;

            let next = self.pos + self.vel;
            if !resolver.services.map.try_move(&mut self.placement, next.full_to_real()) {
                return false;
            }
            self.pos = next;
            self.z = (self.z + self.dz).max(0);

            if hits::hit_item(self, next, pierces, resolver) && !pierces {
                return false;
            }
        }

        true
    }

    fn steer_toward(&mut self, target: ActorUid, resolver: &Resolver<'_, '_>) {
        let MobileClass::Bullet(class) = &self.class else {
            return;
        };
        let Some(actor) = resolver.services.actors.by_uid(target) else {
            return;
        };
        if !actor.in_use {
            return;
        }

        let offset = actor.pos - self.pos;
        let length = f64::from(offset.x).hypot(f64::from(offset.y));
        if length < 1.0 {
            return;
        }
        let speed = f64::from(class.speed);
        let desired = Vec2i::new(
            (f64::from(offset.x) * speed / length).round() as i32,
            (f64::from(offset.y) * speed / length).round() as i32,
        );
        self.vel = self.vel + (desired - self.vel).scale_div(HOMING_TURN_DIVISOR);
    }

    fn drift(&mut self, ticks: i32, gravity: i32, spin: f64, map: &mut dyn TileMap) -> bool {
        for _ in 0..ticks {
            if self.range <= 0 {
                return false;
            }
            self.range -= 1;
            self.angle = (self.angle + spin).rem_euclid(TAU);

            if self.z > 0 || self.dz != 0 {
                self.dz -= gravity;
                self.z += self.dz;
                if self.z <= 0 {
                    self.z = 0;
                    if gravity > 0 {
                        self.dz = 0;
                        self.vel = Vec2i::ZERO;
                    }
                }
            }

            if self.vel == Vec2i::ZERO {
                continue;
            }
            let next = self.pos + self.vel;
            if map.try_move(&mut self.placement, next.full_to_real()) {
                self.pos = next;
            } else {
                self.vel = Vec2i::ZERO;
            }
        }

        true
    }

    fn snapshot(&self, index: SlotIndex) -> MobileSnapshot {
        MobileSnapshot {
            uid: self.uid,
            index,
            class: self.class.name().to_owned(),
            pos: self.pos,
            vel: self.vel,
            z: self.z,
            range: self.range,
            sound_lock: self.sound_lock,
            frame: self.frame,
            expired: self.expired,
            attribution: self.attribution,
        }
    }
}

/// Registry of bullets and particles.
#[derive(Debug)]
pub(crate) struct MobileRegistry {
    slots: SlotRegistry<MobileUid, MobileObject>,
    uids: UidCounter,
}

impl MobileRegistry {
    pub(crate) fn new() -> Self {
        Self {
            slots: SlotRegistry::with_capacity(MOBILE_CAPACITY),
            uids: UidCounter::default(),
        }
    }

    /// Creates a bullet at its muzzle. Bullets whose muzzle lies outside the
    /// map start unplaced and expire on their first update.
    pub(crate) fn add_bullet(
        &mut self,
        spawn: &BulletSpawn,
        class: Arc<BulletClass>,
        map: &mut dyn TileMap,
    ) -> (MobileUid, SlotIndex) {
        let uid = MobileUid::new(self.uids.allocate());
        let speed = f64::from(class.speed);
        let vel = Vec2i::new(
            (spawn.angle.sin() * speed).round() as i32,
            (-spawn.angle.cos() * speed).round() as i32,
        );
        let behavior = if class.homing {
            Behavior::Homing {
                target: spawn.target,
            }
        } else {
            Behavior::Straight
        };
        let size = class.size;

        let (index, object) = self.slots.insert_with(uid, |index| MobileObject {
            uid,
            behavior,
            pos: spawn.muzzle_pos,
            vel,
            z: spawn.muzzle_height,
            dz: spawn.elevation,
            angle: spawn.angle,
            range: class.range,
            sound_lock: 0,
            attribution: spawn.attribution,
            flags: spawn.flags,
            placement: Placement::new(ItemRef::MobileObject(index), size, TileItemFlags::empty()),
            expired: false,
            frame: 0,
            class: MobileClass::Bullet(class),
        });
        if !map.try_move(&mut object.placement, spawn.muzzle_pos.full_to_real()) {
            object.range = 0;
        }

        (uid, index)
    }

    /// Creates a particle. Particles spawned outside the map never move.
    pub(crate) fn add_particle(
        &mut self,
        spawn: &ParticleSpawn,
        class: Arc<ParticleClass>,
        map: &mut dyn TileMap,
    ) -> (MobileUid, SlotIndex) {
        let uid = MobileUid::new(self.uids.allocate());
        let behavior = Behavior::Particle {
            gravity: class.gravity,
            spin: spawn.spin,
        };

        let (index, object) = self.slots.insert_with(uid, |index| MobileObject {
            uid,
            behavior,
            pos: spawn.full_pos,
            vel: spawn.vel,
            z: spawn.z,
            dz: spawn.dz,
            angle: spawn.angle,
            range: class.range,
            sound_lock: 0,
            attribution: Attribution::ENVIRONMENT,
            flags: HitFlags::empty(),
            placement: Placement::new(
                ItemRef::MobileObject(index),
                PARTICLE_SIZE,
                TileItemFlags::empty(),
            ),
            expired: false,
            frame: 0,
            class: MobileClass::Particle(class),
        });
        if !map.try_move(&mut object.placement, spawn.full_pos.full_to_real()) {
            object.vel = Vec2i::ZERO;
        }

        (uid, index)
    }

    /// Runs every live object's behaviour.
    ///
    /// Expired objects are tombstoned and announced with `MobileObjectRemove`;
    /// the slot is only released once that removal comes back as a command.
    pub(crate) fn update(&mut self, ticks: i32, resolver: &mut Resolver<'_, '_>) {
        for (index, object) in self.slots.iter_mut() {
            if object.expired {
                continue;
            }

            if object.update(ticks, resolver) {
                object.frame = object.frame.wrapping_add(ticks.max(0).unsigned_abs());
                continue;
            }

            object.expired = true;
            log::debug!(
                "mobile object {} of class `{}` expired",
                object.uid.get(),
                object.class.name()
            );
            resolver.out.push(Event::MobileObjectRemove { index });
        }
    }

    /// Frees the slot and drops the map placement. Panics when already free.
    pub(crate) fn destroy(&mut self, index: SlotIndex, map: &mut dyn TileMap) {
        let object = self.slots.release(index);
        map.remove(&object.placement);
    }

    pub(crate) fn terminate(&mut self, map: &mut dyn TileMap) {
        for index in self.slots.indices() {
            self.destroy(index, map);
        }
    }

    pub(crate) fn snapshots(&self) -> Vec<MobileSnapshot> {
        self.slots
            .iter()
            .map(|(index, object)| object.snapshot(index))
            .collect()
    }

    pub(crate) fn slot_count(&self) -> usize {
        self.slots.slot_count()
    }
}
