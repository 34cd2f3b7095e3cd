//! Narrow interfaces to the collaborators the combat core consumes.

use serde::{Deserialize, Serialize};

use crate::{
    ActorFlags, ActorIndex, ActorUid, CollisionTeam, GameMode, HitFlags, ItemRef, Placement,
    PlayerId, Rect, SpecialDamage, TileItemFlags, Vec2i,
};

/// Map and spatial collision index.
pub trait TileMap {
    /// Moves `item` to `pos` (real coordinates), registering it if needed.
    ///
    /// On acceptance the placement's position is updated and `true` is
    /// returned. A rejected move leaves the placement untouched.
    fn try_move(&mut self, item: &mut Placement, pos: Vec2i) -> bool;

    /// Removes the item's registration. Unregistered items are ignored.
    fn remove(&mut self, item: &Placement);

    /// Re-reads the placement's flags after they changed in place.
    fn refresh(&mut self, item: &Placement);

    /// Lists registered items overlapping `bounds` that carry every bit of `mask`.
    fn query(&self, bounds: Rect, mask: TileItemFlags, team: CollisionTeam, pvp: bool)
        -> Vec<ItemRef>;
}

/// Immutable view of an actor handed out by the actor registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorSnapshot {
    /// Slot of the actor in the registry.
    pub index: ActorIndex,
    /// Unique identifier of the actor.
    pub uid: ActorUid,
    /// Controlling player, `None` for AI actors.
    pub player: Option<PlayerId>,
    /// Position in full coordinates.
    pub pos: Vec2i,
    /// Allegiance and scoring flags.
    pub flags: ActorFlags,
    /// Whether the slot holds a live actor.
    pub in_use: bool,
}

/// Actor registry and the capability rules attached to actors.
pub trait ActorRegistry {
    /// Looks up an actor by unique identifier.
    fn by_uid(&self, uid: ActorUid) -> Option<ActorSnapshot>;

    /// Looks up an actor by slot index.
    fn by_index(&self, index: ActorIndex) -> Option<ActorSnapshot>;

    /// Reports whether a hit from `attacker` with `flags` connects with `target`.
    fn can_hit(&self, flags: HitFlags, attacker: Option<ActorUid>, target: &ActorSnapshot) -> bool;

    /// Reports whether a connecting hit actually reduces the target's health.
    fn can_damage(
        &self,
        flags: HitFlags,
        player: Option<PlayerId>,
        attacker: Option<ActorUid>,
        target: &ActorSnapshot,
        special: SpecialDamage,
    ) -> bool;

    /// Reports whether the target ignores the special damage kind.
    fn is_immune(&self, target: &ActorSnapshot, special: SpecialDamage) -> bool;

    /// Reports whether the target is currently invulnerable to the attacker.
    fn is_invulnerable(
        &self,
        target: &ActorSnapshot,
        flags: HitFlags,
        player: Option<PlayerId>,
        mode: GameMode,
    ) -> bool;
}

/// Kinds of mission objectives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectiveKind {
    /// Destroy marked objects.
    Destroy,
    /// Collect marked items.
    Collect,
    /// Kill marked characters.
    Kill,
    /// Rescue marked characters.
    Rescue,
}

/// Mission objective tracker.
pub trait MissionTracker {
    /// Records progress for the objective encoded in `flags`.
    fn objective_progress(&mut self, flags: TileItemFlags, kind: ObjectiveKind);
}
