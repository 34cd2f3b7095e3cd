//! Registry of static map objects such as barrels, crates and pickup spawners.

use std::sync::Arc;

use skirmish_core::{
    Event, ItemRef, MapObjectClass, MapObjectKind, ObjectSnapshot, ObjectSpawn, ObjectUid,
    PickupSpawn, PickupUid, Placement, SlotIndex, TileItemFlags, TileMap,
};

use crate::slots::{SlotRegistry, UidCounter};

const OBJECT_CAPACITY: usize = 1024;

/// Counter value marking a spawner that is waiting for its pickup to be taken.
pub(crate) const SPAWNER_INACTIVE: i32 = -1;

/// Static object stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct MapObject {
    pub(crate) uid: ObjectUid,
    pub(crate) class: Arc<MapObjectClass>,
    pub(crate) health: i32,
    pub(crate) counter: i32,
    pub(crate) placement: Placement,
}

impl MapObject {
    /// Objects that fire weapons when destroyed are worth avoiding.
    pub(crate) fn is_dangerous(&self) -> bool {
        !self.class.destroy_guns.is_empty()
    }

    fn snapshot(&self, index: SlotIndex) -> ObjectSnapshot {
        ObjectSnapshot {
            uid: self.uid,
            index,
            class: self.class.name.clone(),
            health: self.health,
            counter: self.counter,
            pos: self.placement.pos,
            flags: self.placement.flags,
        }
    }
}

/// Registry that stores static objects and hands out their uids.
#[derive(Debug)]
pub(crate) struct ObjectRegistry {
    slots: SlotRegistry<ObjectUid, MapObject>,
    uids: UidCounter,
    pickup_uids: UidCounter,
}

impl ObjectRegistry {
    /// Creates an empty registry with a reset uid counter.
    pub(crate) fn new() -> Self {
        Self {
            slots: SlotRegistry::with_capacity(OBJECT_CAPACITY),
            uids: UidCounter::default(),
            pickup_uids: UidCounter::default(),
        }
    }

    /// Allocates the uid for an object about to be created.
    pub(crate) fn next_uid(&mut self) -> ObjectUid {
        ObjectUid::new(self.uids.allocate())
    }

    /// Creates an object and places it on the map.
    ///
    /// The map decides whether the placement is accepted; a rejected object
    /// stays registered without a spatial footprint.
    pub(crate) fn add(
        &mut self,
        spawn: &ObjectSpawn,
        class: Arc<MapObjectClass>,
        map: &mut dyn TileMap,
    ) -> SlotIndex {
        self.uids.observe(spawn.uid.get());
        let size = class.size;
        let (index, object) = self.slots.insert_with(spawn.uid, |index| MapObject {
            uid: spawn.uid,
            class,
            health: spawn.health,
            counter: 0,
            placement: Placement::new(ItemRef::Object(index), size, spawn.flags),
        });

        if !map.try_move(&mut object.placement, spawn.pos) {
            log::warn!(
                "map rejected object {} of class `{}` at {:?}",
                spawn.uid.get(),
                spawn.class,
                spawn.pos
            );
        }

        index
    }

    /// Removes the object's placement and frees its slot.
    pub(crate) fn destroy(&mut self, index: SlotIndex, map: &mut dyn TileMap) {
        let object = self.slots.release(index);
        map.remove(&object.placement);
        log::debug!("object {} removed from slot {}", object.uid.get(), index.get());
    }

    /// Destroys every live object.
    pub(crate) fn terminate(&mut self, map: &mut dyn TileMap) {
        for index in self.slots.indices() {
            self.destroy(index, map);
        }
    }

    /// Runs pickup spawner countdowns. Network clients never originate spawns.
    pub(crate) fn update(&mut self, ticks: i32, is_client: bool, out: &mut Vec<Event>) {
        if is_client {
            return;
        }

        for (_, object) in self.slots.iter_mut() {
            let MapObjectKind::PickupSpawner { pickup, .. } = &object.class.kind else {
                continue;
            };
            if object.counter == SPAWNER_INACTIVE {
                continue;
            }

            object.counter -= ticks;
            if object.counter > 0 {
                continue;
            }

            object.counter = SPAWNER_INACTIVE;
            log::debug!("spawner {} produced `{pickup}`", object.uid.get());
            out.push(Event::AddPickup(PickupSpawn {
                uid: PickupUid::new(self.pickup_uids.allocate()),
                class: pickup.clone(),
                is_random_spawned: false,
                spawner: Some(object.uid),
                flags: TileItemFlags::empty(),
                pos: object.placement.pos,
            }));
        }
    }

    /// Restarts the countdown of a spawner whose pickup was taken.
    ///
    /// Spawners destroyed in the meantime are ignored.
    pub(crate) fn reactivate_spawner(&mut self, uid: ObjectUid) {
        let Some((_, object)) = self.find_mut(uid) else {
            return;
        };
        if let MapObjectKind::PickupSpawner { interval, .. } = object.class.kind {
            object.counter = interval;
        }
    }

    pub(crate) fn get(&self, index: SlotIndex) -> Option<&MapObject> {
        self.slots.get(index)
    }

    pub(crate) fn get_mut(&mut self, index: SlotIndex) -> Option<&mut MapObject> {
        self.slots.get_mut(index)
    }

    /// Live object carrying `uid`, if any.
    pub(crate) fn find_mut(&mut self, uid: ObjectUid) -> Option<(SlotIndex, &mut MapObject)> {
        let index = self.slots.index_of(uid)?;
        self.slots.get_mut(index).map(|object| (index, object))
    }

    /// Live object carrying `uid`. Panics when none does.
    pub(crate) fn get_by_uid(&self, uid: ObjectUid) -> (SlotIndex, &MapObject) {
        self.slots.get_by_uid(uid)
    }

    /// Reports whether `uid` was ever handed out or added, live or not.
    pub(crate) fn was_issued(&self, uid: ObjectUid) -> bool {
        self.uids.issued(uid.get())
    }

    pub(crate) fn find(&self, uid: ObjectUid) -> Option<(SlotIndex, &MapObject)> {
        let index = self.slots.index_of(uid)?;
        self.slots.get(index).map(|object| (index, object))
    }

    pub(crate) fn snapshots(&self) -> Vec<ObjectSnapshot> {
        let mut snapshots: Vec<ObjectSnapshot> = self
            .slots
            .iter()
            .map(|(index, object)| object.snapshot(index))
            .collect();
        snapshots.sort_by_key(|snapshot| snapshot.uid);
        snapshots
    }

    pub(crate) fn snapshot(&self, index: SlotIndex) -> Option<ObjectSnapshot> {
        self.slots.get(index).map(|object| object.snapshot(index))
    }

    pub(crate) fn slot_count(&self) -> usize {
        self.slots.slot_count()
    }
}
