#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative combat state for Skirmish.
//!
//! The world owns the static and mobile object registries. Every mutation
//! arrives as a [`Command`] through [`apply`], and every side effect leaves as
//! an [`Event`] appended to the caller's outbound queue. Collaborators the
//! world does not own are borrowed per call through [`Services`].

mod damage;
mod hits;
mod mobile;
mod objects;
mod slots;
mod spatial;

use rand::RngCore;
use skirmish_core::{
    ActorRegistry, ClassTable, Command, Event, GameplayConfig, MissionTracker, ObjectUid, TileMap,
};

use damage::Resolver;
use mobile::MobileRegistry;
use objects::ObjectRegistry;

pub use spatial::SpatialIndex;

/// External collaborators borrowed by the world while applying a command.
pub struct Services<'a> {
    /// Map and spatial collision index.
    pub map: &'a mut dyn TileMap,
    /// Actor registry and its capability rules.
    pub actors: &'a dyn ActorRegistry,
    /// Mission objective tracker.
    pub mission: &'a mut dyn MissionTracker,
    /// Preloaded class descriptors.
    pub classes: &'a ClassTable,
    /// Gameplay toggles.
    pub config: &'a GameplayConfig,
    /// Randomness for cosmetic effects such as blood spray.
    pub rng: &'a mut dyn RngCore,
}

/// Represents the authoritative combat state.
#[derive(Debug)]
pub struct World {
    objects: ObjectRegistry,
    mobiles: MobileRegistry,
    tick_index: u64,
}

impl World {
    /// Creates an empty world with reset uid counters.
    #[must_use]
    pub fn new() -> Self {
        Self {
            objects: ObjectRegistry::new(),
            mobiles: MobileRegistry::new(),
            tick_index: 0,
        }
    }

    /// Allocates the uid for a static object about to be added.
    ///
    /// Uids are handed out before the `AddObject` command is issued so that
    /// network peers create the object under the same identity.
    pub fn next_object_uid(&mut self) -> ObjectUid {
        self.objects.next_uid()
    }

    /// Destroys every live static and mobile object.
    pub fn terminate(&mut self, map: &mut dyn TileMap) {
        self.objects.terminate(map);
        self.mobiles.terminate(map);
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(
    world: &mut World,
    command: Command,
    services: &mut Services<'_>,
    out_events: &mut Vec<Event>,
) {
    match command {
        Command::Tick { ticks } => {
            world.tick_index = world.tick_index.saturating_add(1);
            world
                .objects
                .update(ticks, services.config.is_client, out_events);

            let mut resolver = Resolver::new(&mut world.objects, services, out_events);
            world.mobiles.update(ticks, &mut resolver);
            out_events.push(Event::TimeAdvanced { ticks });
        }
        Command::AddObject(spawn) => match services.classes.object(&spawn.class) {
            Ok(class) => {
                let index = world.objects.add(&spawn, class, services.map);
                out_events.push(Event::ObjectAdded {
                    uid: spawn.uid,
                    index,
                });
            }
            Err(error) => log::warn!("dropping object {}: {error}", spawn.uid.get()),
        },
        Command::DestroyObject { index } => {
            world.objects.destroy(index, services.map);
        }
        Command::SpawnBullet(spawn) => match services.classes.bullet(&spawn.class) {
            Ok(class) => {
                let (uid, index) = world.mobiles.add_bullet(&spawn, class, services.map);
                out_events.push(Event::MobileObjectAdded { uid, index });
            }
            Err(error) => log::warn!("dropping bullet: {error}"),
        },
        Command::SpawnParticle(spawn) => match services.classes.particle(&spawn.class) {
            Ok(class) => {
                let (uid, index) = world.mobiles.add_particle(&spawn, class, services.map);
                out_events.push(Event::MobileObjectAdded { uid, index });
            }
            Err(error) => log::warn!("dropping particle: {error}"),
        },
        Command::RemoveMobileObject { index } => {
            world.mobiles.destroy(index, services.map);
        }
        Command::ReactivateSpawner { spawner } => {
            world.objects.reactivate_spawner(spawner);
        }
        Command::Damage { hit, target } => {
            Resolver::new(&mut world.objects, services, out_events).damage(&hit, target);
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use skirmish_core::{MobileSnapshot, ObjectSnapshot, ObjectUid, SlotIndex};

    use super::World;

    /// Captures every live static object ordered by uid.
    #[must_use]
    pub fn objects(world: &World) -> Vec<ObjectSnapshot> {
        world.objects.snapshots()
    }

    /// Captures the static object stored in the slot, if it is in use.
    #[must_use]
    pub fn object(world: &World, index: SlotIndex) -> Option<ObjectSnapshot> {
        world.objects.snapshot(index)
    }

    /// Captures the live static object carrying `uid`.
    ///
    /// # Panics
    ///
    /// Panics when no live object carries the uid. Callers must only ask for
    /// uids they know to be alive.
    #[must_use]
    pub fn object_by_uid(world: &World, uid: ObjectUid) -> ObjectSnapshot {
        let (index, _) = world.objects.get_by_uid(uid);
        world
            .objects
            .snapshot(index)
            .unwrap_or_else(|| panic!("object {} vanished during lookup", uid.get()))
    }

    /// Captures the live static object carrying `uid`, if any.
    #[must_use]
    pub fn find_object(world: &World, uid: ObjectUid) -> Option<ObjectSnapshot> {
        world
            .objects
            .find(uid)
            .and_then(|(index, _)| world.objects.snapshot(index))
    }

    /// Reports whether the object in the slot fires weapons when destroyed.
    #[must_use]
    pub fn is_dangerous(world: &World, index: SlotIndex) -> bool {
        world
            .objects
            .get(index)
            .is_some_and(|object| object.is_dangerous())
    }

    /// Captures every live mobile object in slot order, tombstoned ones included.
    #[must_use]
    pub fn mobile_objects(world: &World) -> Vec<MobileSnapshot> {
        world.mobiles.snapshots()
    }

    /// Number of static object slots ever allocated.
    #[must_use]
    pub fn object_slot_count(world: &World) -> usize {
        world.objects.slot_count()
    }

    /// Number of mobile object slots ever allocated.
    #[must_use]
    pub fn mobile_slot_count(world: &World) -> usize {
        world.mobiles.slot_count()
    }

    /// Number of ticks applied so far.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }
}
