#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Event relay that turns drained world events back into registry commands.
//!
//! Spawn requests and mobile object removals are queued as events during a
//! tick so the registries are never mutated while they are being iterated.
//! The relay runs after the queue is drained and converts them into the
//! commands that perform the deferred work, preserving queue order.

use std::collections::BTreeMap;

use skirmish_core::{Command, Event, ObjectUid, PickupUid};

/// Pure system relaying deferred registry mutations.
#[derive(Debug, Default)]
pub struct Relay {
    spawned_pickups: BTreeMap<PickupUid, ObjectUid>,
}

impl Relay {
    /// Creates a relay with no outstanding pickups.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes a drained event batch and emits the commands it implies.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::AddBullet(spawn) => out.push(Command::SpawnBullet(spawn.clone())),
                Event::AddParticle(spawn) => out.push(Command::SpawnParticle(spawn.clone())),
                Event::MobileObjectRemove { index } => {
                    out.push(Command::RemoveMobileObject { index: *index });
                }
                Event::AddPickup(spawn) => {
                    if let Some(spawner) = spawn.spawner {
                        let _ = self.spawned_pickups.insert(spawn.uid, spawner);
                    }
                }
                _ => {}
            }
        }
    }

    /// Reports that a pickup was collected, re-arming the spawner that made it.
    ///
    /// Pickups that did not come from a spawner are ignored.
    pub fn pickup_taken(&mut self, pickup: PickupUid, out: &mut Vec<Command>) {
        let Some(spawner) = self.spawned_pickups.remove(&pickup) else {
            log::debug!("pickup {} had no spawner", pickup.get());
            return;
        };
        out.push(Command::ReactivateSpawner { spawner });
    }

    /// Pickups produced by spawners that have not been collected yet.
    pub fn outstanding_pickups(&self) -> impl Iterator<Item = (PickupUid, ObjectUid)> + '_ {
        self.spawned_pickups
            .iter()
            .map(|(pickup, spawner)| (*pickup, *spawner))
    }
}
