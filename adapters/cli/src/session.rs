//! Runs a scripted skirmish against the world and the event relay.

use std::{collections::BTreeMap, fmt};

use anyhow::{Context, Result};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use skirmish_core::{
    ActorFlags, ActorIndex, ActorRegistry, ActorSnapshot, ActorUid, Attribution, BulletSpawn,
    ClassTable, Command, Event, GameMode, GameplayConfig, HitFlags, ItemRef, MissionTracker,
    ObjectSpawn, ObjectiveKind, Placement, PickupUid, PlayerId, SpecialDamage, TileItemFlags,
    TileMap, Vec2i,
};
use skirmish_system_relay::Relay;
use skirmish_world::{self as world, query, Services, SpatialIndex, World};

use crate::scenario::{Scenario, VolleySpec};

const ACTOR_SIZE: Vec2i = Vec2i::new(8, 8);

struct Fighter {
    snapshot: ActorSnapshot,
    health: i32,
    immune: Vec<SpecialDamage>,
    placement: Placement,
}

/// Actor registry backed by the scenario's fighters.
#[derive(Default)]
struct Cast {
    fighters: Vec<Fighter>,
}

impl Cast {
    fn fighter(&self, uid: ActorUid) -> Option<&Fighter> {
        self.fighters
            .iter()
            .find(|fighter| fighter.snapshot.uid == uid)
    }

    /// Subtracts health and reports whether the hit was fatal.
    fn wound(&mut self, uid: ActorUid, power: i32, map: &mut dyn TileMap) -> bool {
        let Some(fighter) = self
            .fighters
            .iter_mut()
            .find(|fighter| fighter.snapshot.uid == uid && fighter.snapshot.in_use)
        else {
            return false;
        };

        fighter.health -= power;
        if fighter.health > 0 {
            return false;
        }
        fighter.snapshot.in_use = false;
        map.remove(&fighter.placement);
        log::info!("actor {} was killed", uid.get());
        true
    }
}

impl ActorRegistry for Cast {
    fn by_uid(&self, uid: ActorUid) -> Option<ActorSnapshot> {
        self.fighter(uid).map(|fighter| fighter.snapshot)
    }

    fn by_index(&self, index: ActorIndex) -> Option<ActorSnapshot> {
        self.fighters.get(index.get()).map(|fighter| fighter.snapshot)
    }

    fn can_hit(&self, flags: HitFlags, attacker: Option<ActorUid>, target: &ActorSnapshot) -> bool {
        if !target.in_use || attacker == Some(target.uid) {
            return false;
        }
        flags.contains(HitFlags::HURT_ALWAYS)
            || !(flags.contains(HitFlags::GOOD_GUY) && target.flags.contains(ActorFlags::GOOD_GUY))
    }

    fn can_damage(
        &self,
        _flags: HitFlags,
        _player: Option<PlayerId>,
        _attacker: Option<ActorUid>,
        target: &ActorSnapshot,
        special: SpecialDamage,
    ) -> bool {
        target.in_use && !self.is_immune(target, special)
    }

    fn is_immune(&self, target: &ActorSnapshot, special: SpecialDamage) -> bool {
        special != SpecialDamage::None
            && self
                .fighter(target.uid)
                .is_some_and(|fighter| fighter.immune.contains(&special))
    }

    fn is_invulnerable(
        &self,
        target: &ActorSnapshot,
        _flags: HitFlags,
        player: Option<PlayerId>,
        mode: GameMode,
    ) -> bool {
        // Players cannot hurt each other outside of player-versus-player modes.
        target.player.is_some() && player.is_some() && !mode.is_pvp()
    }
}

/// Mission tracker counting completed objective updates.
#[derive(Default)]
struct Objectives {
    destroyed: u32,
}

impl MissionTracker for Objectives {
    fn objective_progress(&mut self, flags: TileItemFlags, kind: ObjectiveKind) {
        if flags.contains(TileItemFlags::OBJECTIVE) {
            self.destroyed += 1;
        }
        log::debug!("objective progress: {kind:?}");
    }
}

/// Tallies produced by a finished run.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct Summary {
    pub(crate) ticks: u32,
    pub(crate) objects_destroyed: u32,
    pub(crate) wrecks: u32,
    pub(crate) objectives: u32,
    pub(crate) bullets: u32,
    pub(crate) particles: u32,
    pub(crate) sounds: u32,
    pub(crate) pickups_taken: u32,
    pub(crate) pickups_waiting: u32,
    pub(crate) kills: u32,
    pub(crate) scores: BTreeMap<u32, i32>,
    pub(crate) survivors: Vec<(u32, i32)>,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ticks simulated:   {}", self.ticks)?;
        writeln!(
            f,
            "objects destroyed: {} ({} wrecked, {} objectives)",
            self.objects_destroyed, self.wrecks, self.objectives
        )?;
        writeln!(f, "bullets spawned:   {}", self.bullets)?;
        writeln!(f, "particles spawned: {}", self.particles)?;
        writeln!(f, "sounds played:     {}", self.sounds)?;
        writeln!(f, "pickups taken:     {}", self.pickups_taken)?;
        writeln!(f, "pickups waiting:   {}", self.pickups_waiting)?;
        writeln!(f, "actors killed:     {}", self.kills)?;
        for (player, score) in &self.scores {
            writeln!(f, "player {player} score: {score}")?;
        }
        for (uid, health) in &self.survivors {
            writeln!(f, "actor {uid} health: {health}")?;
        }
        Ok(())
    }
}

/// World, collaborators and relay driven tick by tick.
pub(crate) struct Session {
    world: World,
    map: SpatialIndex,
    cast: Cast,
    objectives: Objectives,
    classes: ClassTable,
    config: GameplayConfig,
    rng: ChaCha8Rng,
    relay: Relay,
    volleys: Vec<VolleySpec>,
    pickup_delay: u32,
    pickups: Vec<(PickupUid, u32)>,
    tick: u32,
    log: Vec<Event>,
    summary: Summary,
}

impl Session {
    /// Builds the arena, places actors and objects, and queues the volleys.
    pub(crate) fn new(scenario: Scenario, classes: ClassTable, seed: u64) -> Result<Self> {
        let Scenario {
            ticks: _,
            arena,
            pickup_delay,
            gameplay,
            actors,
            objects,
            mut volleys,
        } = scenario;
        volleys.sort_by_key(|volley| volley.tick);

        let mut session = Self {
            world: World::new(),
            map: SpatialIndex::new(arena),
            cast: Cast::default(),
            objectives: Objectives::default(),
            classes,
            config: gameplay,
            rng: ChaCha8Rng::seed_from_u64(seed),
            relay: Relay::new(),
            volleys,
            pickup_delay,
            pickups: Vec::new(),
            tick: 0,
            log: Vec::new(),
            summary: Summary::default(),
        };

        for actor in actors {
            let index = ActorIndex::new(session.cast.fighters.len());
            let mut placement =
                Placement::new(ItemRef::Character(index), ACTOR_SIZE, TileItemFlags::CAN_BE_SHOT);
            if !session.map.try_move(&mut placement, actor.pos) {
                log::warn!("actor {} does not fit at {:?}", actor.uid, actor.pos);
            }
            session.cast.fighters.push(Fighter {
                snapshot: ActorSnapshot {
                    index,
                    uid: ActorUid::new(actor.uid),
                    player: actor.player_id(),
                    pos: actor.pos.real_to_full(),
                    flags: actor.flags(),
                    in_use: true,
                },
                health: actor.health,
                immune: actor.immune,
                placement,
            });
        }

        for object in objects {
            let class = session
                .classes
                .object(&object.class)
                .with_context(|| format!("place object at {:?}", object.pos))?;
            let mut flags = TileItemFlags::empty();
            if object.solid {
                flags = flags | TileItemFlags::CAN_BE_SHOT | TileItemFlags::IMPASSABLE;
            }
            if object.objective {
                flags = flags | TileItemFlags::OBJECTIVE;
            }
            let spawn = ObjectSpawn {
                uid: session.world.next_object_uid(),
                class: object.class,
                health: object.health.unwrap_or(class.health),
                flags,
                pos: object.pos,
            };
            session.submit(Command::AddObject(spawn));
        }

        Ok(session)
    }

    /// Simulates `ticks` ticks and returns the run's tallies.
    pub(crate) fn run(&mut self, ticks: u32) -> &Summary {
        for _ in 0..ticks {
            self.step();
        }
        self.summary.ticks = self.tick;
        self.summary.objectives = self.objectives.destroyed;
        self.summary.pickups_waiting = self
            .relay
            .outstanding_pickups()
            .inspect(|(pickup, spawner)| {
                log::debug!(
                    "pickup {} from spawner {} is uncollected",
                    pickup.get(),
                    spawner.get()
                );
            })
            .count()
            .try_into()
            .unwrap_or(u32::MAX);
        self.summary.survivors = self
            .cast
            .fighters
            .iter()
            .filter(|fighter| fighter.snapshot.in_use)
            .map(|fighter| (fighter.snapshot.uid.get(), fighter.health))
            .collect();
        log::info!(
            "{} objects and {} mobile objects remain after {} ticks",
            query::objects(&self.world).len(),
            query::mobile_objects(&self.world).len(),
            query::tick_index(&self.world)
        );
        &self.summary
    }

    /// Tears down every static and mobile object, leaving only the actors on
    /// the map.
    pub(crate) fn shutdown(&mut self) {
        self.world.terminate(&mut self.map);
        log::info!(
            "session shut down with {} placements left on the map",
            self.map.len()
        );
    }

    /// Every event drained so far, in queue order.
    pub(crate) fn events(&self) -> &[Event] {
        &self.log
    }

    fn step(&mut self) {
        let due = self
            .volleys
            .iter()
            .take_while(|volley| volley.tick <= self.tick)
            .count();
        let volleys: Vec<VolleySpec> = self.volleys.drain(..due).collect();
        for volley in volleys {
            let command = self.volley_command(&volley);
            self.summary.bullets += 1;
            self.submit(command);
        }

        self.submit(Command::Tick { ticks: 1 });

        let tick = self.tick;
        let (due, waiting): (Vec<_>, Vec<_>) = self
            .pickups
            .drain(..)
            .partition(|(_, taken_at)| *taken_at <= tick);
        self.pickups = waiting;

        let mut commands = Vec::new();
        for (pickup, _) in due {
            log::debug!("pickup {} taken at tick {tick}", pickup.get());
            self.summary.pickups_taken += 1;
            self.relay.pickup_taken(pickup, &mut commands);
        }
        for command in commands {
            self.submit(command);
        }

        self.tick += 1;
    }

    fn volley_command(&self, volley: &VolleySpec) -> Command {
        let shooter = volley
            .actor
            .and_then(|uid| self.cast.by_uid(ActorUid::new(uid)));
        let attribution = shooter.map_or(Attribution::ENVIRONMENT, |actor| {
            Attribution::new(actor.player, Some(actor.uid))
        });
        let mut flags = HitFlags::empty();
        if shooter.is_some_and(|actor| actor.flags.contains(ActorFlags::GOOD_GUY)) {
            flags = flags | HitFlags::GOOD_GUY;
        }
        if volley.hurt_always {
            flags = flags | HitFlags::HURT_ALWAYS;
        }

        Command::SpawnBullet(BulletSpawn {
            class: volley.class.clone(),
            muzzle_pos: volley.from.real_to_full(),
            muzzle_height: 0,
            angle: volley.angle,
            elevation: 0,
            flags,
            attribution,
            target: volley.target.map(ActorUid::new),
        })
    }

    /// Applies `command` and relays the resulting events until the queue settles.
    fn submit(&mut self, command: Command) {
        let mut pending = vec![command];
        while !pending.is_empty() {
            let mut events = Vec::new();
            for command in pending.drain(..) {
                let mut services = Services {
                    map: &mut self.map,
                    actors: &self.cast,
                    mission: &mut self.objectives,
                    classes: &self.classes,
                    config: &self.config,
                    rng: &mut self.rng,
                };
                world::apply(&mut self.world, command, &mut services, &mut events);
            }

            for event in &events {
                self.observe(event);
            }
            self.relay.handle(&events, &mut pending);
            self.log.extend(events);
        }
    }

    fn observe(&mut self, event: &Event) {
        match event {
            Event::SoundAt { .. } => self.summary.sounds += 1,
            Event::Score { player, score } => {
                *self.summary.scores.entry(player.get()).or_insert(0) += score;
            }
            Event::DamageCharacter { power, target, .. } => {
                if self.cast.wound(*target, *power, &mut self.map) {
                    self.summary.kills += 1;
                }
            }
            Event::ObjectDestroyed { wrecked, .. } => {
                self.summary.objects_destroyed += 1;
                if *wrecked {
                    self.summary.wrecks += 1;
                }
            }
            Event::AddBullet(_) => self.summary.bullets += 1,
            Event::AddParticle(_) => self.summary.particles += 1,
            Event::AddPickup(spawn) => {
                let taken_at = self.tick.saturating_add(self.pickup_delay);
                self.pickups.push((spawn.uid, taken_at));
            }
            _ => {}
        }
    }
}
