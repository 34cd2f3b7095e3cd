//! Reference spatial index used by adapters and tests.

use skirmish_core::{CollisionTeam, ItemRef, Placement, Rect, TileItemFlags, TileMap, Vec2i};

#[derive(Clone, Copy, Debug)]
struct Entry {
    item: ItemRef,
    bounds: Rect,
    flags: TileItemFlags,
}

/// Flat list of placements over a rectangular arena.
///
/// Placements must stay inside the arena, and impassable items may not
/// overlap one another. Collision teams are not tracked, so every query
/// collides with every team. Query results follow registration order.
#[derive(Clone, Debug)]
pub struct SpatialIndex {
    arena: Rect,
    entries: Vec<Entry>,
}

impl SpatialIndex {
    /// Creates an empty index covering `size` real units from the origin.
    #[must_use]
    pub fn new(size: Vec2i) -> Self {
        Self {
            arena: Rect::new(Vec2i::ZERO, size),
            entries: Vec::new(),
        }
    }

    /// Number of registered placements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Reports whether nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Reports whether `item` is registered.
    #[must_use]
    pub fn contains(&self, item: ItemRef) -> bool {
        self.position(item).is_some()
    }

    /// Flags currently registered for `item`.
    #[must_use]
    pub fn flags(&self, item: ItemRef) -> Option<TileItemFlags> {
        self.position(item).map(|position| self.entries[position].flags)
    }

    fn position(&self, item: ItemRef) -> Option<usize> {
        self.entries.iter().position(|entry| entry.item == item)
    }

    fn blocked(&self, item: ItemRef, bounds: &Rect) -> bool {
        self.entries.iter().any(|entry| {
            entry.item != item
                && entry.flags.contains(TileItemFlags::IMPASSABLE)
                && entry.bounds.overlaps(bounds)
        })
    }
}

impl TileMap for SpatialIndex {
    fn try_move(&mut self, item: &mut Placement, pos: Vec2i) -> bool {
        let bounds = Rect::centered(pos, item.size);
        if !self.arena.contains(&bounds) {
            return false;
        }
        if item.flags.contains(TileItemFlags::IMPASSABLE) && self.blocked(item.item, &bounds) {
            return false;
        }

        item.pos = pos;
        let entry = Entry {
            item: item.item,
            bounds,
            flags: item.flags,
        };
        match self.position(item.item) {
            Some(position) => self.entries[position] = entry,
            None => self.entries.push(entry),
        }
        true
    }

    fn remove(&mut self, item: &Placement) {
        if let Some(position) = self.position(item.item) {
            let _ = self.entries.remove(position);
        }
    }

    fn refresh(&mut self, item: &Placement) {
        if let Some(position) = self.position(item.item) {
            self.entries[position].flags = item.flags;
        }
    }

    fn query(
        &self,
        bounds: Rect,
        mask: TileItemFlags,
        _team: CollisionTeam,
        _pvp: bool,
    ) -> Vec<ItemRef> {
        self.entries
            .iter()
            .filter(|entry| entry.flags.contains(mask) && entry.bounds.overlaps(&bounds))
            .map(|entry| entry.item)
            .collect()
    }
}
