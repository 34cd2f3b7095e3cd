//! Slot storage shared by the static and mobile object registries.
//!
//! Entries live in a growable vector of slots. Destroyed entries leave a hole
//! that the next insertion reuses, so a [`SlotIndex`] is only meaningful while
//! its slot stays in use. The uid stored alongside each entry is the stable
//! identity and is unique among in-use slots.

use std::fmt::Debug;

use skirmish_core::SlotIndex;

#[derive(Clone, Debug)]
struct Slot<U, T> {
    in_use: bool,
    uid: U,
    value: T,
}

/// Growable slot array with hole reuse and uid lookup.
#[derive(Clone, Debug)]
pub(crate) struct SlotRegistry<U, T> {
    slots: Vec<Slot<U, T>>,
}

impl<U, T> SlotRegistry<U, T>
where
    U: Copy + Eq + Debug,
{
    /// Creates an empty registry with storage reserved for `capacity` slots.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
        }
    }

    /// Stores a new entry in the first free slot, appending when none is free.
    ///
    /// The builder receives the slot index so entries can record their own
    /// spatial back-reference. Panics if `uid` already belongs to an in-use slot.
    pub(crate) fn insert_with(
        &mut self,
        uid: U,
        build: impl FnOnce(SlotIndex) -> T,
    ) -> (SlotIndex, &mut T) {
        assert!(
            self.index_of(uid).is_none(),
            "uid {uid:?} already belongs to an in-use slot"
        );

        let free = self.slots.iter().position(|slot| !slot.in_use);
        let position = free.unwrap_or(self.slots.len());
        let slot = Slot {
            in_use: true,
            uid,
            value: build(SlotIndex::new(position)),
        };
        match free {
            Some(position) => self.slots[position] = slot,
            None => self.slots.push(slot),
        }

        (SlotIndex::new(position), &mut self.slots[position].value)
    }

    /// Marks the slot free and hands back the stale entry for cleanup.
    ///
    /// Panics when the slot is not in use: destroying twice is a caller bug.
    pub(crate) fn release(&mut self, index: SlotIndex) -> &T {
        let slot = self
            .slots
            .get_mut(index.get())
            .filter(|slot| slot.in_use)
            .unwrap_or_else(|| panic!("destroying slot {} which is not in use", index.get()));
        slot.in_use = false;
        &slot.value
    }

    /// Entry stored in an in-use slot.
    pub(crate) fn get(&self, index: SlotIndex) -> Option<&T> {
        self.slots
            .get(index.get())
            .filter(|slot| slot.in_use)
            .map(|slot| &slot.value)
    }

    /// Mutable entry stored in an in-use slot.
    pub(crate) fn get_mut(&mut self, index: SlotIndex) -> Option<&mut T> {
        self.slots
            .get_mut(index.get())
            .filter(|slot| slot.in_use)
            .map(|slot| &mut slot.value)
    }

    /// Slot of the in-use entry carrying `uid`.
    pub(crate) fn index_of(&self, uid: U) -> Option<SlotIndex> {
        self.slots
            .iter()
            .position(|slot| slot.in_use && slot.uid == uid)
            .map(SlotIndex::new)
    }

    /// Entry carrying `uid`. Panics when no in-use slot carries it.
    pub(crate) fn get_by_uid(&self, uid: U) -> (SlotIndex, &T) {
        let index = self
            .index_of(uid)
            .unwrap_or_else(|| panic!("cannot find slot with uid {uid:?}"));
        (index, &self.slots[index.get()].value)
    }

    /// Iterates in-use entries in slot order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (SlotIndex, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.in_use)
            .map(|(index, slot)| (SlotIndex::new(index), &slot.value))
    }

    /// Iterates in-use entries mutably in slot order.
    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = (SlotIndex, &mut T)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter(|(_, slot)| slot.in_use)
            .map(|(index, slot)| (SlotIndex::new(index), &mut slot.value))
    }

    /// Indices of every in-use slot.
    pub(crate) fn indices(&self) -> Vec<SlotIndex> {
        self.iter().map(|(index, _)| index).collect()
    }

    /// Number of slots ever allocated, in use or not. Never shrinks.
    pub(crate) fn slot_count(&self) -> usize {
        self.slots.len()
    }
}

/// Monotonic uid source owned by a registry instance.
#[derive(Clone, Debug, Default)]
pub(crate) struct UidCounter {
    next: u32,
}

impl UidCounter {
    /// Returns the current value and advances the counter.
    pub(crate) fn allocate(&mut self) -> u32 {
        let value = self.next;
        self.next += 1;
        value
    }

    /// Records a uid minted elsewhere, such as by a network host, so later
    /// allocations never hand it out again.
    pub(crate) fn observe(&mut self, uid: u32) {
        self.next = self.next.max(uid.saturating_add(1));
    }

    /// Reports whether `uid` was ever allocated or observed.
    pub(crate) fn issued(&self, uid: u32) -> bool {
        uid < self.next
    }
}
