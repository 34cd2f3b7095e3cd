#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Skirmish combat engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. The event relay and adapters submit
//! [`Command`] values describing desired registry mutations, the world
//! executes those commands via its `apply` entry point, and then appends
//! [`Event`] values to the outbound queue. The queue is drained once per tick
//! by presentation, scoring and network consumers, and by systems that turn
//! events back into command batches.

mod classes;
mod config;
mod services;

use std::ops::{Add, Sub};

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

pub use classes::{
    BulletClass, ClassError, ClassManifest, ClassTable, Gun, MapObjectClass, MapObjectKind,
    ParticleClass, CLASS_MANIFEST_VERSION,
};
pub use config::{GameMode, GameplayConfig, GoreLevel};
pub use services::{ActorRegistry, ActorSnapshot, MissionTracker, ObjectiveKind, TileMap};

/// Number of fractional bits separating "full" sub-pixel coordinates from real ones.
pub const FULL_SHIFT: i32 = 8;

/// Scale applied to heights so vertical motion keeps sub-pixel precision.
pub const Z_FACTOR: i32 = 16;

/// Commands that express all permissible registry mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation by the provided number of ticks.
    Tick {
        /// Number of ticks that elapsed since the previous update.
        ticks: i32,
    },
    /// Requests that a static map object be created.
    AddObject(ObjectSpawn),
    /// Requests that the static object stored in the slot be destroyed.
    DestroyObject {
        /// Slot holding the object.
        index: SlotIndex,
    },
    /// Requests that a bullet be created in the mobile object registry.
    SpawnBullet(BulletSpawn),
    /// Requests that a particle be created in the mobile object registry.
    SpawnParticle(ParticleSpawn),
    /// Requests removal of an expired mobile object.
    RemoveMobileObject {
        /// Slot holding the mobile object.
        index: SlotIndex,
    },
    /// Re-arms a pickup spawner after the pickup it produced was taken.
    ReactivateSpawner {
        /// Identifier of the spawner object.
        spawner: ObjectUid,
    },
    /// Resolves a hit against a character or static object.
    Damage {
        /// Description of the hit being applied.
        hit: Hit,
        /// Entity receiving the hit.
        target: Target,
    },
}

/// Events appended to the outbound queue by the world.
///
/// The tags and payload shapes form the wire contract with the network
/// replication, UI and audio consumers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Number of ticks that elapsed.
        ticks: i32,
    },
    /// Requests a positional sound.
    SoundAt {
        /// Name of the sound to play.
        sound: String,
        /// Position of the sound in real coordinates.
        pos: Vec2i,
        /// Marks sounds produced by hits so consumers can throttle them.
        is_hit: bool,
    },
    /// Awards score to a player.
    Score {
        /// Player receiving the score.
        player: PlayerId,
        /// Score delta, negative for penalties.
        score: i32,
    },
    /// Reports that a character was hit, independent of damage applicability.
    HitCharacter {
        /// Actor that was hit.
        target: ActorIndex,
        /// Special damage carried by the hit.
        special: SpecialDamage,
    },
    /// Reduces a character's health.
    DamageCharacter {
        /// Health to subtract.
        power: i32,
        /// Player responsible for the damage, if any.
        player: Option<PlayerId>,
        /// Actor receiving the damage.
        target: ActorUid,
        /// Player controlling the target, if any.
        target_player: Option<PlayerId>,
    },
    /// Pushes a character with the provided velocity.
    ActorImpulse {
        /// Actor receiving the impulse.
        target: ActorIndex,
        /// Velocity added to the actor, in full coordinates.
        vel: Vec2i,
    },
    /// Requests a particle spawn.
    AddParticle(ParticleSpawn),
    /// Requests a bullet spawn.
    AddBullet(BulletSpawn),
    /// Requests a pickup spawn.
    AddPickup(PickupSpawn),
    /// Requests removal of an expired mobile object.
    MobileObjectRemove {
        /// Slot holding the expired object.
        index: SlotIndex,
    },
    /// Confirms that a static object was created.
    ObjectAdded {
        /// Identifier of the new object.
        uid: ObjectUid,
        /// Slot the object occupies.
        index: SlotIndex,
    },
    /// Reports that a static object was destroyed by damage.
    ObjectDestroyed {
        /// Identifier of the destroyed object.
        uid: ObjectUid,
        /// Whether the object left a wreck behind instead of being removed.
        wrecked: bool,
    },
    /// Confirms that a mobile object was created.
    MobileObjectAdded {
        /// Identifier of the new mobile object.
        uid: MobileUid,
        /// Slot the object occupies.
        index: SlotIndex,
    },
    /// Signals that walkability changed and cached paths must be discarded.
    PathCacheInvalidated,
}

/// Request to create a static map object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObjectSpawn {
    /// Identifier pre-assigned by the caller so peers agree on it.
    pub uid: ObjectUid,
    /// Name of the map object class.
    pub class: String,
    /// Initial health.
    pub health: i32,
    /// Placement flags.
    pub flags: TileItemFlags,
    /// Position in real coordinates.
    pub pos: Vec2i,
}

/// Request to create a bullet.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BulletSpawn {
    /// Name of the bullet class.
    pub class: String,
    /// Muzzle position in full coordinates.
    pub muzzle_pos: Vec2i,
    /// Height of the muzzle above the ground.
    pub muzzle_height: i32,
    /// Firing angle in radians, zero pointing up the screen.
    pub angle: f64,
    /// Initial vertical velocity.
    pub elevation: i32,
    /// Hit flags carried by the bullet.
    pub flags: HitFlags,
    /// Who fired the bullet.
    pub attribution: Attribution,
    /// Actor a homing bullet steers toward.
    pub target: Option<ActorUid>,
}

/// Request to create a particle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParticleSpawn {
    /// Name of the particle class.
    pub class: String,
    /// Spawn position in full coordinates.
    pub full_pos: Vec2i,
    /// Initial height.
    pub z: i32,
    /// Initial velocity in full coordinates per tick.
    pub vel: Vec2i,
    /// Initial rotation in radians.
    pub angle: f64,
    /// Initial vertical velocity.
    pub dz: i32,
    /// Rotation applied per tick.
    pub spin: f64,
}

/// Request to create a pickup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickupSpawn {
    /// Identifier assigned to the pickup.
    pub uid: PickupUid,
    /// Name of the pickup class.
    pub class: String,
    /// Whether the pickup came from random drops rather than a spawner.
    pub is_random_spawned: bool,
    /// Spawner that produced the pickup, used to re-arm it once taken.
    pub spawner: Option<ObjectUid>,
    /// Placement flags of the pickup.
    pub flags: TileItemFlags,
    /// Position in real coordinates.
    pub pos: Vec2i,
}

/// Complete description of a hit handed to damage resolution.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    /// Direction and magnitude of the hit, usually the projectile velocity.
    pub vector: Vec2i,
    /// Damage dealt.
    pub power: i32,
    /// Flags of the hitting entity.
    pub flags: HitFlags,
    /// Who is responsible for the hit.
    pub attribution: Attribution,
    /// Special damage carried by the hit.
    pub special: SpecialDamage,
    /// Sounds to play on impact; absent while the source is sound-locked.
    pub sounds: Option<HitSounds>,
    /// Plays the flesh sound even when the target is invulnerable.
    pub allow_friendly_hit_sound: bool,
}

/// Entity receiving a hit, expressed as its kind and kind-specific uid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Target {
    /// Kind of the targeted tile item.
    pub kind: TileItemKind,
    /// Unique identifier within that kind.
    pub uid: u32,
}

/// Sounds played when a bullet hits something.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct HitSounds {
    /// Sound played when hitting a character.
    pub flesh: String,
    /// Sound played when hitting a static object.
    pub object: String,
}

/// Player and actor responsible for an entity or a hit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Attribution {
    /// Owning player, `None` for the environment.
    pub player: Option<PlayerId>,
    /// Owning actor, `None` when no actor fired.
    pub actor: Option<ActorUid>,
}

impl Attribution {
    /// Attribution used for hazards nobody is responsible for.
    pub const ENVIRONMENT: Self = Self {
        player: None,
        actor: None,
    };

    /// Creates an attribution for the provided player and actor.
    #[must_use]
    pub const fn new(player: Option<PlayerId>, actor: Option<ActorUid>) -> Self {
        Self { player, actor }
    }
}

/// Special damage kinds that actors may be immune to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialDamage {
    /// Plain damage.
    #[default]
    None,
    /// Sets the target on fire.
    Flame,
    /// Poisons the target.
    Poison,
    /// Turns the target to stone.
    Petrify,
    /// Confuses the target's controls.
    Confuse,
}

/// Kinds of items registered with the spatial index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileItemKind {
    /// Actor controlled by a player or the AI.
    Character,
    /// Static map object.
    Object,
    /// Pickup lying on the ground.
    Pickup,
    /// Bullet or particle.
    MobileObject,
}

/// Reference from a spatial index entry back to its owning registry slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemRef {
    /// Actor slot in the actor registry.
    Character(ActorIndex),
    /// Slot in the static object registry.
    Object(SlotIndex),
    /// Slot in the pickup registry.
    Pickup(SlotIndex),
    /// Slot in the mobile object registry.
    MobileObject(SlotIndex),
}

impl ItemRef {
    /// Kind of tile item referenced.
    #[must_use]
    pub const fn kind(self) -> TileItemKind {
        match self {
            Self::Character(_) => TileItemKind::Character,
            Self::Object(_) => TileItemKind::Object,
            Self::Pickup(_) => TileItemKind::Pickup,
            Self::MobileObject(_) => TileItemKind::MobileObject,
        }
    }
}

/// Spatial registration record shared with the map.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    /// Registry slot owning the record.
    pub item: ItemRef,
    /// Center position in real coordinates.
    pub pos: Vec2i,
    /// Size of the bounding box.
    pub size: Vec2i,
    /// Placement flags.
    pub flags: TileItemFlags,
}

impl Placement {
    /// Creates an unplaced record; the map assigns the position on acceptance.
    #[must_use]
    pub const fn new(item: ItemRef, size: Vec2i, flags: TileItemFlags) -> Self {
        Self {
            item,
            pos: Vec2i::new(-1, -1),
            size,
            flags,
        }
    }

    /// Bounding box of the record at its current position.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::centered(self.pos, self.size)
    }
}

/// Collision teams used to filter spatial queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollisionTeam {
    /// Collides with everything.
    None,
    /// Allied with the players.
    Good,
    /// Hostile to the players.
    Bad,
}

bitflags! {
    /// Flags attached to spatial placements.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct TileItemFlags: u32 {
        /// Blocks movement and placement of other static items.
        const IMPASSABLE = 1 << 0;
        /// Can be hit by bullets.
        const CAN_BE_SHOT = 1 << 1;
        /// Cannot be picked up.
        const CANNOT_BE_TAKEN = 1 << 2;
        /// Counts toward a mission objective when destroyed.
        const OBJECTIVE = 1 << 3;
        /// Destroyed remnant of a static object.
        const IS_WRECK = 1 << 4;
    }
}

bitflags! {
    /// Flags carried by bullets and other hitting entities.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct HitFlags: u32 {
        /// Hurts allies as well as enemies.
        const HURT_ALWAYS = 1 << 0;
        /// Fired by the players' side.
        const GOOD_GUY = 1 << 1;
    }
}

bitflags! {
    /// Flags describing an actor's allegiance and scoring role.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct ActorFlags: u32 {
        /// Allied with the players.
        const GOOD_GUY = 1 << 0;
        /// Hitting this character applies the score penalty.
        const PENALTY = 1 << 1;
        /// Civilian that must be rescued.
        const VICTIM = 1 << 2;
    }
}

/// Two-dimensional integer vector used for positions and velocities.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Vec2i {
    /// Horizontal component.
    pub x: i32,
    /// Vertical component, increasing downward.
    pub y: i32,
}

impl Vec2i {
    /// Zero vector.
    pub const ZERO: Self = Self::new(0, 0);

    /// Creates a new vector.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Multiplies both components by `factor`, saturating at the `i32` bounds.
    #[must_use]
    pub const fn scale(self, factor: i32) -> Self {
        Self::new(self.x.saturating_mul(factor), self.y.saturating_mul(factor))
    }

    /// Divides both components by `divisor`, truncating toward zero.
    #[must_use]
    pub const fn scale_div(self, divisor: i32) -> Self {
        Self::new(self.x / divisor, self.y / divisor)
    }

    /// Converts a full sub-pixel coordinate into real coordinates.
    #[must_use]
    pub const fn full_to_real(self) -> Self {
        Self::new(self.x >> FULL_SHIFT, self.y >> FULL_SHIFT)
    }

    /// Converts a real coordinate into full sub-pixel coordinates.
    #[must_use]
    pub const fn real_to_full(self) -> Self {
        Self::new(self.x << FULL_SHIFT, self.y << FULL_SHIFT)
    }
}

impl Add for Vec2i {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x.saturating_add(rhs.x), self.y.saturating_add(rhs.y))
    }
}

impl Sub for Vec2i {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Axis-aligned rectangle in real coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    /// Upper-left corner.
    pub pos: Vec2i,
    /// Width and height.
    pub size: Vec2i,
}

impl Rect {
    /// Creates a rectangle from its upper-left corner and size.
    #[must_use]
    pub const fn new(pos: Vec2i, size: Vec2i) -> Self {
        Self { pos, size }
    }

    /// Creates a rectangle of `size` centered on `center`.
    #[must_use]
    pub const fn centered(center: Vec2i, size: Vec2i) -> Self {
        Self::new(
            Vec2i::new(center.x - size.x / 2, center.y - size.y / 2),
            size,
        )
    }

    /// Reports whether the two rectangles share any area.
    #[must_use]
    pub const fn overlaps(&self, other: &Rect) -> bool {
        self.pos.x < other.pos.x + other.size.x
            && other.pos.x < self.pos.x + self.size.x
            && self.pos.y < other.pos.y + other.size.y
            && other.pos.y < self.pos.y + self.size.y
    }

    /// Reports whether `other` lies entirely within the rectangle.
    #[must_use]
    pub const fn contains(&self, other: &Rect) -> bool {
        other.pos.x >= self.pos.x
            && other.pos.y >= self.pos.y
            && other.pos.x + other.size.x <= self.pos.x + self.size.x
            && other.pos.y + other.size.y <= self.pos.y + self.size.y
    }
}

/// Volatile index of a registry slot. Reused after the slot is freed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlotIndex(usize);

impl SlotIndex {
    /// Creates a new slot index.
    #[must_use]
    pub const fn new(value: usize) -> Self {
        Self(value)
    }

    /// Retrieves the numeric index.
    #[must_use]
    pub const fn get(&self) -> usize {
        self.0
    }
}

/// Unique identifier assigned to a static object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectUid(u32);

impl ObjectUid {
    /// Creates a new object identifier.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a mobile object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MobileUid(u32);

impl MobileUid {
    /// Creates a new mobile object identifier.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to an actor by the actor registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorUid(u32);

impl ActorUid {
    /// Creates a new actor identifier.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Slot of an actor inside the actor registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorIndex(usize);

impl ActorIndex {
    /// Creates a new actor index.
    #[must_use]
    pub const fn new(value: usize) -> Self {
        Self(value)
    }

    /// Retrieves the numeric index.
    #[must_use]
    pub const fn get(&self) -> usize {
        self.0
    }
}

/// Identifier of a participating player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(u32);

impl PlayerId {
    /// Creates a new player identifier.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Identifier assigned to a pickup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PickupUid(u32);

impl PickupUid {
    /// Creates a new pickup identifier.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Immutable representation of a static object used for queries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectSnapshot {
    /// Unique identifier of the object.
    pub uid: ObjectUid,
    /// Slot the object occupies.
    pub index: SlotIndex,
    /// Name of the object's class.
    pub class: String,
    /// Remaining health; zero or less once destroyed.
    pub health: i32,
    /// Spawner countdown, `-1` while inactive.
    pub counter: i32,
    /// Position in real coordinates.
    pub pos: Vec2i,
    /// Placement flags.
    pub flags: TileItemFlags,
}

/// Immutable representation of a mobile object used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct MobileSnapshot {
    /// Unique identifier of the object.
    pub uid: MobileUid,
    /// Slot the object occupies.
    pub index: SlotIndex,
    /// Name of the bullet or particle class.
    pub class: String,
    /// Position in full coordinates.
    pub pos: Vec2i,
    /// Velocity in full coordinates per tick.
    pub vel: Vec2i,
    /// Height above the ground.
    pub z: i32,
    /// Ticks left before the object expires.
    pub range: i32,
    /// Ticks left before hit sounds may play again.
    pub sound_lock: i32,
    /// Animation frame counter.
    pub frame: u32,
    /// Whether the object expired and awaits removal.
    pub expired: bool,
    /// Who owns the object.
    pub attribution: Attribution,
}

#[cfg(test)]
mod tests {
    use super::{
        Attribution, BulletSpawn, Event, HitFlags, PlayerId, Rect, SlotIndex, TileItemFlags, Vec2i,
    };
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn full_and_real_coordinates_convert() {
        let real = Vec2i::new(12, -3);
        assert_eq!(real.real_to_full(), Vec2i::new(3072, -768));
        assert_eq!(real.real_to_full().full_to_real(), real);
        assert_eq!(Vec2i::new(511, 256).full_to_real(), Vec2i::new(1, 1));
    }

    #[test]
    fn scale_div_truncates_toward_zero() {
        let impulse = Vec2i::new(-7, 7).scale(3).scale_div(25);
        assert_eq!(impulse, Vec2i::ZERO);
        assert_eq!(Vec2i::new(-100, 60).scale_div(25), Vec2i::new(-4, 2));
    }

    #[test]
    fn centered_rects_overlap_when_touching_interiors() {
        let first = Rect::centered(Vec2i::new(10, 10), Vec2i::new(4, 4));
        let second = Rect::centered(Vec2i::new(13, 10), Vec2i::new(4, 4));
        let third = Rect::centered(Vec2i::new(14, 10), Vec2i::new(4, 4));
        assert!(first.overlaps(&second));
        assert!(!first.overlaps(&third));
    }

    #[test]
    fn scale_saturates_instead_of_overflowing() {
        let huge = Vec2i::new(3, -3).scale(i32::MAX);
        assert_eq!(huge, Vec2i::new(i32::MAX, i32::MIN));
        assert_eq!(huge + Vec2i::new(64, -64), huge);
    }

    #[test]
    fn flag_sets_use_stable_wire_bits() {
        let flags = HitFlags::HURT_ALWAYS | HitFlags::GOOD_GUY;
        assert_eq!(bincode::serialize(&flags).expect("serialize"), vec![3, 0, 0, 0]);
        assert_round_trip(&(TileItemFlags::IMPASSABLE | TileItemFlags::IS_WRECK));
    }

    #[test]
    fn flag_sets_combine() {
        let flags = TileItemFlags::CAN_BE_SHOT | TileItemFlags::OBJECTIVE;
        assert!(flags.contains(TileItemFlags::OBJECTIVE));
        assert!(!flags.contains(TileItemFlags::IS_WRECK));
        assert!(flags.contains(TileItemFlags::empty()));
    }

    #[test]
    fn bullet_event_round_trips_through_bincode() {
        let event = Event::AddBullet(BulletSpawn {
            class: "rifle".to_owned(),
            muzzle_pos: Vec2i::new(2560, 1280),
            muzzle_height: 4,
            angle: 1.5,
            elevation: 0,
            flags: HitFlags::GOOD_GUY,
            attribution: Attribution::new(Some(PlayerId::new(1)), None),
            target: None,
        });
        assert_round_trip(&event);
    }

    #[test]
    fn removal_event_round_trips_through_bincode() {
        assert_round_trip(&Event::MobileObjectRemove {
            index: SlotIndex::new(9),
        });
    }
}
