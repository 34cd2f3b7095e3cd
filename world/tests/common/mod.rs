#![allow(dead_code)]

use std::f64::consts::FRAC_PI_2;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use skirmish_core::{
    ActorFlags, ActorIndex, ActorRegistry, ActorSnapshot, ActorUid, Attribution, BulletClass,
    BulletSpawn, ClassTable, Command, Event, GameMode, GameplayConfig, Gun, Hit, HitFlags,
    HitSounds, ItemRef, MapObjectClass, MapObjectKind, MissionTracker, ObjectSpawn, ObjectUid,
    ObjectiveKind, ParticleClass, PlayerId, Placement, SlotIndex, SpecialDamage, Target,
    TileItemFlags, TileItemKind, TileMap, Vec2i,
};
use skirmish_world::{self as world, Services, SpatialIndex, World};

pub const ARENA: Vec2i = Vec2i::new(128, 64);
pub const ACTOR_SIZE: Vec2i = Vec2i::new(8, 8);
pub const RIGHT: f64 = FRAC_PI_2;

/// Actor registry double with switchable capability rules.
#[derive(Debug, Default)]
pub struct Roster {
    pub actors: Vec<ActorSnapshot>,
    pub damageable: bool,
    pub immune: bool,
    pub invulnerable: bool,
}

impl ActorRegistry for Roster {
    fn by_uid(&self, uid: ActorUid) -> Option<ActorSnapshot> {
        self.actors.iter().copied().find(|actor| actor.uid == uid)
    }

    fn by_index(&self, index: ActorIndex) -> Option<ActorSnapshot> {
        self.actors.get(index.get()).copied()
    }

    fn can_hit(&self, flags: HitFlags, _attacker: Option<ActorUid>, target: &ActorSnapshot) -> bool {
        flags.contains(HitFlags::HURT_ALWAYS)
            || !(flags.contains(HitFlags::GOOD_GUY) && target.flags.contains(ActorFlags::GOOD_GUY))
    }

    fn can_damage(
        &self,
        _flags: HitFlags,
        _player: Option<PlayerId>,
        _attacker: Option<ActorUid>,
        _target: &ActorSnapshot,
        _special: SpecialDamage,
    ) -> bool {
        self.damageable
    }

    fn is_immune(&self, _target: &ActorSnapshot, _special: SpecialDamage) -> bool {
        self.immune
    }

    fn is_invulnerable(
        &self,
        _target: &ActorSnapshot,
        _flags: HitFlags,
        _player: Option<PlayerId>,
        _mode: GameMode,
    ) -> bool {
        self.invulnerable
    }
}

/// Mission tracker double recording every notification.
#[derive(Debug, Default)]
pub struct Ledger {
    pub progress: Vec<(TileItemFlags, ObjectiveKind)>,
}

impl MissionTracker for Ledger {
    fn objective_progress(&mut self, flags: TileItemFlags, kind: ObjectiveKind) {
        self.progress.push((flags, kind));
    }
}

/// World together with every collaborator it borrows.
pub struct Harness {
    pub world: World,
    pub map: SpatialIndex,
    pub roster: Roster,
    pub ledger: Ledger,
    pub classes: ClassTable,
    pub config: GameplayConfig,
    pub rng: ChaCha8Rng,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            world: World::new(),
            map: SpatialIndex::new(ARENA),
            roster: Roster {
                damageable: true,
                ..Roster::default()
            },
            ledger: Ledger::default(),
            classes: class_table(),
            config: GameplayConfig::default(),
            rng: ChaCha8Rng::seed_from_u64(7),
        }
    }

    pub fn apply(&mut self, command: Command) -> Vec<Event> {
        let mut events = Vec::new();
        let mut services = Services {
            map: &mut self.map,
            actors: &self.roster,
            mission: &mut self.ledger,
            classes: &self.classes,
            config: &self.config,
            rng: &mut self.rng,
        };
        world::apply(&mut self.world, command, &mut services, &mut events);
        events
    }

    /// Adds an object of `class` at a real position and returns its uid and slot.
    pub fn add_object(
        &mut self,
        class: &str,
        health: i32,
        flags: TileItemFlags,
        pos: Vec2i,
    ) -> (ObjectUid, SlotIndex) {
        let uid = self.world.next_object_uid();
        let events = self.apply(Command::AddObject(ObjectSpawn {
            uid,
            class: class.to_owned(),
            health,
            flags,
            pos,
        }));
        let index = events
            .iter()
            .find_map(|event| match event {
                Event::ObjectAdded { uid: added, index } if *added == uid => Some(*index),
                _ => None,
            })
            .expect("object added");
        (uid, index)
    }

    /// Registers an actor at a real position, both in the roster and on the map.
    pub fn add_actor(
        &mut self,
        uid: u32,
        player: Option<PlayerId>,
        flags: ActorFlags,
        pos: Vec2i,
    ) -> ActorSnapshot {
        let index = ActorIndex::new(self.roster.actors.len());
        let actor = ActorSnapshot {
            index,
            uid: ActorUid::new(uid),
            player,
            pos: pos.real_to_full(),
            flags,
            in_use: true,
        };
        self.roster.actors.push(actor);

        let mut placement = Placement::new(
            ItemRef::Character(index),
            ACTOR_SIZE,
            TileItemFlags::CAN_BE_SHOT,
        );
        assert!(self.map.try_move(&mut placement, pos), "actor placed");
        actor
    }

    pub fn fire(&mut self, class: &str, from: Vec2i, angle: f64, attribution: Attribution) -> SlotIndex {
        self.fire_at(class, from, angle, attribution, None)
    }

    pub fn fire_at(
        &mut self,
        class: &str,
        from: Vec2i,
        angle: f64,
        attribution: Attribution,
        target: Option<ActorUid>,
    ) -> SlotIndex {
        let events = self.apply(Command::SpawnBullet(BulletSpawn {
            class: class.to_owned(),
            muzzle_pos: from.real_to_full(),
            muzzle_height: 0,
            angle,
            elevation: 0,
            flags: HitFlags::empty(),
            attribution,
            target,
        }));
        mobile_index(&events)
    }

    pub fn tick(&mut self, ticks: i32) -> Vec<Event> {
        self.apply(Command::Tick { ticks })
    }
}

pub fn mobile_index(events: &[Event]) -> SlotIndex {
    events
        .iter()
        .find_map(|event| match event {
            Event::MobileObjectAdded { index, .. } => Some(*index),
            _ => None,
        })
        .expect("mobile object added")
}

pub fn hit(power: i32, attribution: Attribution) -> Hit {
    Hit {
        vector: Vec2i::new(256, 0),
        power,
        flags: HitFlags::empty(),
        attribution,
        special: SpecialDamage::None,
        sounds: Some(sounds()),
        allow_friendly_hit_sound: false,
    }
}

pub fn sounds() -> HitSounds {
    HitSounds {
        flesh: "hit_flesh".to_owned(),
        object: "hit_hard".to_owned(),
    }
}

pub fn damage(hit: Hit, kind: TileItemKind, uid: u32) -> Command {
    Command::Damage {
        hit,
        target: Target { kind, uid },
    }
}

pub fn count<F>(events: &[Event], predicate: F) -> usize
where
    F: Fn(&Event) -> bool,
{
    events.iter().filter(|event| predicate(event)).count()
}

pub fn particle_classes(events: &[Event]) -> Vec<String> {
    events
        .iter()
        .filter_map(|event| match event {
            Event::AddParticle(spawn) => Some(spawn.class.clone()),
            _ => None,
        })
        .collect()
}

pub fn scores(events: &[Event]) -> Vec<(PlayerId, i32)> {
    events
        .iter()
        .filter_map(|event| match event {
            Event::Score { player, score } => Some((*player, *score)),
            _ => None,
        })
        .collect()
}

fn bullet(name: &str, speed: i32, range: i32, power: i32) -> BulletClass {
    BulletClass {
        name: name.to_owned(),
        size: Vec2i::new(2, 2),
        speed,
        range,
        power,
        special: SpecialDamage::None,
        hit_sounds: sounds(),
        pierces: false,
        homing: false,
    }
}

fn object(name: &str, health: i32) -> MapObjectClass {
    MapObjectClass {
        name: name.to_owned(),
        size: Vec2i::new(8, 8),
        health,
        kind: MapObjectKind::Normal,
        wreck: None,
        destroy_guns: Vec::new(),
    }
}

fn particle(name: &str, range: i32, gravity: i32) -> ParticleClass {
    ParticleClass {
        name: name.to_owned(),
        range,
        gravity,
    }
}

pub fn class_table() -> ClassTable {
    let mut table = ClassTable::new();

    table.insert_object(object("barrel", 10)).expect("barrel");
    table
        .insert_object(MapObjectClass {
            wreck: Some("crate_wreck".to_owned()),
            ..object("crate", 20)
        })
        .expect("crate");
    table
        .insert_object(MapObjectClass {
            destroy_guns: vec!["shrapnel".to_owned()],
            ..object("explosive_barrel", 10)
        })
        .expect("explosive barrel");
    table
        .insert_object(MapObjectClass {
            kind: MapObjectKind::PickupSpawner {
                pickup: "ammo".to_owned(),
                interval: 20,
            },
            ..object("ammo_spawner", 0)
        })
        .expect("spawner");

    table.insert_bullet(bullet("rifle", 512, 30, 10)).expect("rifle");
    table.insert_bullet(bullet("debris", 512, 30, 0)).expect("debris");
    table.insert_bullet(bullet("fragment", 256, 8, 5)).expect("fragment");
    table
        .insert_bullet(bullet("fireball_wreck", 0, 4, 0))
        .expect("wreck");
    table
        .insert_bullet(BulletClass {
            pierces: true,
            ..bullet("lance", 512, 30, 5)
        })
        .expect("lance");
    table
        .insert_bullet(BulletClass {
            homing: true,
            ..bullet("seeker", 512, 50, 5)
        })
        .expect("seeker");

    for name in ["blood1", "blood2", "blood3"] {
        table.insert_particle(particle(name, 20, 1)).expect("blood");
    }
    table.insert_particle(particle("ember", 40, 4)).expect("ember");

    table
        .insert_gun(Gun {
            name: "shrapnel".to_owned(),
            bullet: "fragment".to_owned(),
            spread_count: 3,
            spread_width: 0.5,
            elevation: 0,
            sound: Some("boom".to_owned()),
        })
        .expect("shrapnel");

    table.validate().expect("class table resolves");
    table
}
