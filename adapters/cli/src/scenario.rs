//! Scripted skirmish description loaded from TOML.

use std::{collections::BTreeSet, fs, path::Path};

use anyhow::{Context, Result};
use serde::Deserialize;
use skirmish_core::{
    ActorFlags, ClassManifest, ClassTable, GameplayConfig, PlayerId, SpecialDamage, Vec2i,
};
use thiserror::Error;

/// Problems found while validating a scenario against the loaded classes.
#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum ScenarioError {
    /// Two actors share a uid.
    #[error("actor uid {0} is declared twice")]
    DuplicateActor(u32),
    /// A volley references an actor that is not declared.
    #[error("volley at tick {tick} references unknown actor {actor}")]
    UnknownActor {
        /// Tick of the offending volley.
        tick: u32,
        /// Undeclared actor uid.
        actor: u32,
    },
    /// The arena cannot hold anything.
    #[error("arena size {x}x{y} must be positive")]
    EmptyArena {
        /// Declared width.
        x: i32,
        /// Declared height.
        y: i32,
    },
}

/// Whole scripted skirmish.
#[derive(Clone, Debug, Deserialize)]
pub(crate) struct Scenario {
    /// Number of ticks simulated when the command line does not override it.
    pub(crate) ticks: u32,
    /// Size of the arena in real coordinates.
    pub(crate) arena: Vec2i,
    /// Ticks a spawned pickup lies on the ground before a player takes it.
    #[serde(default = "default_pickup_delay")]
    pub(crate) pickup_delay: u32,
    /// Gameplay toggles handed to the world.
    #[serde(default)]
    pub(crate) gameplay: GameplayConfig,
    /// Characters taking part.
    #[serde(default)]
    pub(crate) actors: Vec<ActorSpec>,
    /// Static objects placed before the first tick.
    #[serde(default)]
    pub(crate) objects: Vec<ObjectSpec>,
    /// Bullets fired at scripted ticks.
    #[serde(default)]
    pub(crate) volleys: Vec<VolleySpec>,
}

/// Character declared by a scenario.
#[derive(Clone, Debug, Deserialize)]
pub(crate) struct ActorSpec {
    pub(crate) uid: u32,
    #[serde(default)]
    pub(crate) player: Option<u32>,
    pub(crate) pos: Vec2i,
    #[serde(default = "default_actor_health")]
    pub(crate) health: i32,
    #[serde(default)]
    pub(crate) good_guy: bool,
    #[serde(default)]
    pub(crate) penalty: bool,
    #[serde(default)]
    pub(crate) immune: Vec<SpecialDamage>,
}

impl ActorSpec {
    pub(crate) fn player_id(&self) -> Option<PlayerId> {
        self.player.map(PlayerId::new)
    }

    pub(crate) fn flags(&self) -> ActorFlags {
        let mut flags = ActorFlags::empty();
        if self.good_guy {
            flags = flags | ActorFlags::GOOD_GUY;
        }
        if self.penalty {
            flags = flags | ActorFlags::PENALTY;
        }
        flags
    }
}

/// Static object declared by a scenario.
#[derive(Clone, Debug, Deserialize)]
pub(crate) struct ObjectSpec {
    pub(crate) class: String,
    pub(crate) pos: Vec2i,
    /// Overrides the class health.
    #[serde(default)]
    pub(crate) health: Option<i32>,
    /// Blocks movement and stops bullets.
    #[serde(default = "default_true")]
    pub(crate) solid: bool,
    #[serde(default)]
    pub(crate) objective: bool,
}

/// Bullet fired at a scripted tick.
#[derive(Clone, Debug, Deserialize)]
pub(crate) struct VolleySpec {
    pub(crate) tick: u32,
    pub(crate) class: String,
    /// Muzzle position in real coordinates.
    pub(crate) from: Vec2i,
    /// Firing angle in radians, zero pointing up.
    pub(crate) angle: f64,
    /// Actor pulling the trigger; the environment fires when absent.
    #[serde(default)]
    pub(crate) actor: Option<u32>,
    /// Actor a homing bullet steers toward.
    #[serde(default)]
    pub(crate) target: Option<u32>,
    #[serde(default)]
    pub(crate) hurt_always: bool,
}

const fn default_pickup_delay() -> u32 {
    30
}

const fn default_actor_health() -> i32 {
    100
}

const fn default_true() -> bool {
    true
}

impl Scenario {
    /// Checks references between the scenario's sections.
    pub(crate) fn validate(&self) -> Result<(), ScenarioError> {
        if self.arena.x <= 0 || self.arena.y <= 0 {
            return Err(ScenarioError::EmptyArena {
                x: self.arena.x,
                y: self.arena.y,
            });
        }

        let mut uids = BTreeSet::new();
        for actor in &self.actors {
            if !uids.insert(actor.uid) {
                return Err(ScenarioError::DuplicateActor(actor.uid));
            }
        }

        for volley in &self.volleys {
            for actor in volley.actor.iter().chain(volley.target.iter()) {
                if !uids.contains(actor) {
                    return Err(ScenarioError::UnknownActor {
                        tick: volley.tick,
                        actor: *actor,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Reads and validates a scenario file.
pub(crate) fn load_scenario(path: &Path) -> Result<Scenario> {
    let text =
        fs::read_to_string(path).with_context(|| format!("read scenario {}", path.display()))?;
    let scenario: Scenario = toml::from_str(&text)
        .with_context(|| format!("parse scenario {}", path.display()))?;
    scenario
        .validate()
        .with_context(|| format!("validate scenario {}", path.display()))?;
    Ok(scenario)
}

/// Reads a class manifest and resolves it into a class table.
pub(crate) fn load_classes(path: &Path) -> Result<ClassTable> {
    let text =
        fs::read_to_string(path).with_context(|| format!("read classes {}", path.display()))?;
    let manifest: ClassManifest =
        toml::from_str(&text).with_context(|| format!("parse classes {}", path.display()))?;
    ClassTable::from_manifest(manifest)
        .with_context(|| format!("resolve classes {}", path.display()))
}
