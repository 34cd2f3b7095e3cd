//! Immutable class descriptors shared by every instance of an entity kind.

use std::{collections::HashMap, f64::consts::PI, sync::Arc};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Attribution, BulletSpawn, Event, HitFlags, HitSounds, SpecialDamage, Vec2i};

/// Manifest version understood by [`ClassTable::from_manifest`].
pub const CLASS_MANIFEST_VERSION: u32 = 1;

/// Errors raised while resolving class names.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ClassError {
    /// The manifest was written for a different format version.
    #[error("unsupported class manifest version {found}; expected {expected}")]
    UnsupportedVersion {
        /// Version found in the manifest.
        found: u32,
        /// Version this build understands.
        expected: u32,
    },
    /// Two classes of the same kind share a name.
    #[error("duplicate {kind} class `{name}`")]
    Duplicate {
        /// Kind of class that was duplicated.
        kind: &'static str,
        /// Duplicated name.
        name: String,
    },
    /// No map object class carries the name.
    #[error("unknown map object class `{0}`")]
    UnknownObjectClass(String),
    /// No bullet class carries the name.
    #[error("unknown bullet class `{0}`")]
    UnknownBulletClass(String),
    /// No particle class carries the name.
    #[error("unknown particle class `{0}`")]
    UnknownParticleClass(String),
    /// No gun carries the name.
    #[error("unknown gun `{0}`")]
    UnknownGun(String),
}

/// Behaviour of a map object class.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MapObjectKind {
    /// Scenery with no per-tick behaviour.
    #[default]
    Normal,
    /// Periodically produces a pickup.
    PickupSpawner {
        /// Name of the pickup class produced.
        pickup: String,
        /// Ticks between the pickup being taken and the next spawn.
        interval: i32,
    },
}

/// Descriptor of a static map object class.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapObjectClass {
    /// Unique class name.
    pub name: String,
    /// Size of the bounding box in real coordinates.
    pub size: Vec2i,
    /// Default health of new instances.
    #[serde(default)]
    pub health: i32,
    /// Per-tick behaviour.
    #[serde(default)]
    pub kind: MapObjectKind,
    /// Picture left behind once destroyed; `None` removes the object entirely.
    #[serde(default)]
    pub wreck: Option<String>,
    /// Guns fired at the object's position when it is destroyed.
    #[serde(default)]
    pub destroy_guns: Vec<String>,
}

/// Descriptor of a bullet class.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BulletClass {
    /// Unique class name.
    pub name: String,
    /// Size of the bounding box in real coordinates.
    pub size: Vec2i,
    /// Distance travelled per tick in full coordinates.
    pub speed: i32,
    /// Lifetime in ticks.
    pub range: i32,
    /// Damage dealt on hit.
    #[serde(default)]
    pub power: i32,
    /// Special damage applied on hit.
    #[serde(default)]
    pub special: SpecialDamage,
    /// Sounds played on impact.
    #[serde(default)]
    pub hit_sounds: HitSounds,
    /// Keeps travelling after a hit and may hit several targets per tick.
    #[serde(default)]
    pub pierces: bool,
    /// Steers toward its target actor.
    #[serde(default)]
    pub homing: bool,
}

/// Descriptor of a particle class.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticleClass {
    /// Unique class name.
    pub name: String,
    /// Lifetime in ticks.
    pub range: i32,
    /// Downward acceleration applied to the height each tick.
    #[serde(default)]
    pub gravity: i32,
}

/// Descriptor of a gun, used for weapons that go off when objects explode.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Gun {
    /// Unique gun name.
    pub name: String,
    /// Name of the bullet class fired.
    pub bullet: String,
    /// Number of bullets fired per shot.
    #[serde(default = "default_spread_count")]
    pub spread_count: u32,
    /// Angle between neighbouring bullets of a spread, in radians.
    #[serde(default)]
    pub spread_width: f64,
    /// Vertical velocity given to each bullet.
    #[serde(default)]
    pub elevation: i32,
    /// Sound played when the gun fires.
    #[serde(default)]
    pub sound: Option<String>,
}

const fn default_spread_count() -> u32 {
    1
}

impl Gun {
    /// Emits the bullets of one shot fired from `full_pos`.
    ///
    /// Spreads are centered on `angle`. When `play_sound` is set and the gun
    /// has a sound, a positional sound is emitted after the bullets.
    #[allow(clippy::too_many_arguments)]
    pub fn fire(
        &self,
        full_pos: Vec2i,
        muzzle_height: i32,
        angle: f64,
        flags: HitFlags,
        attribution: Attribution,
        play_sound: bool,
        out: &mut Vec<Event>,
    ) {
        let count = self.spread_count.max(1);
        let first = angle - f64::from(count - 1) * self.spread_width / 2.0;
        for step in 0..count {
            out.push(Event::AddBullet(BulletSpawn {
                class: self.bullet.clone(),
                muzzle_pos: full_pos,
                muzzle_height,
                angle: (first + f64::from(step) * self.spread_width).rem_euclid(PI * 2.0),
                elevation: self.elevation,
                flags,
                attribution,
                target: None,
            }));
        }

        if !play_sound {
            return;
        }

        if let Some(sound) = &self.sound {
            out.push(Event::SoundAt {
                sound: sound.clone(),
                pos: full_pos.full_to_real(),
                is_hit: false,
            });
        }
    }
}

/// Serialized form of a class table.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ClassManifest {
    /// Format version of the manifest.
    pub version: u32,
    /// Map object classes.
    #[serde(default)]
    pub objects: Vec<MapObjectClass>,
    /// Bullet classes.
    #[serde(default)]
    pub bullets: Vec<BulletClass>,
    /// Particle classes.
    #[serde(default)]
    pub particles: Vec<ParticleClass>,
    /// Guns.
    #[serde(default)]
    pub guns: Vec<Gun>,
}

/// Preloaded immutable table resolving class names to shared descriptors.
#[derive(Clone, Debug, Default)]
pub struct ClassTable {
    objects: HashMap<String, Arc<MapObjectClass>>,
    bullets: HashMap<String, Arc<BulletClass>>,
    particles: HashMap<String, Arc<ParticleClass>>,
    guns: HashMap<String, Arc<Gun>>,
}

impl ClassTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from a manifest, rejecting duplicates and dangling references.
    pub fn from_manifest(manifest: ClassManifest) -> Result<Self, ClassError> {
        if manifest.version != CLASS_MANIFEST_VERSION {
            return Err(ClassError::UnsupportedVersion {
                found: manifest.version,
                expected: CLASS_MANIFEST_VERSION,
            });
        }

        let mut table = Self::new();
        for class in manifest.objects {
            table.insert_object(class)?;
        }
        for class in manifest.bullets {
            table.insert_bullet(class)?;
        }
        for class in manifest.particles {
            table.insert_particle(class)?;
        }
        for gun in manifest.guns {
            table.insert_gun(gun)?;
        }
        table.validate()?;
        Ok(table)
    }

    /// Registers a map object class.
    pub fn insert_object(&mut self, class: MapObjectClass) -> Result<(), ClassError> {
        insert_unique(&mut self.objects, "map object", class.name.clone(), class)
    }

    /// Registers a bullet class.
    pub fn insert_bullet(&mut self, class: BulletClass) -> Result<(), ClassError> {
        insert_unique(&mut self.bullets, "bullet", class.name.clone(), class)
    }

    /// Registers a particle class.
    pub fn insert_particle(&mut self, class: ParticleClass) -> Result<(), ClassError> {
        insert_unique(&mut self.particles, "particle", class.name.clone(), class)
    }

    /// Registers a gun.
    pub fn insert_gun(&mut self, gun: Gun) -> Result<(), ClassError> {
        insert_unique(&mut self.guns, "gun", gun.name.clone(), gun)
    }

    /// Checks that every gun and destroy-gun reference resolves.
    pub fn validate(&self) -> Result<(), ClassError> {
        for gun in self.guns.values() {
            let _ = self.bullet(&gun.bullet)?;
        }
        for class in self.objects.values() {
            for gun in &class.destroy_guns {
                let _ = self.gun(gun)?;
            }
        }
        Ok(())
    }

    /// Resolves a map object class by name.
    pub fn object(&self, name: &str) -> Result<Arc<MapObjectClass>, ClassError> {
        self.objects
            .get(name)
            .cloned()
            .ok_or_else(|| ClassError::UnknownObjectClass(name.to_owned()))
    }

    /// Resolves a bullet class by name.
    pub fn bullet(&self, name: &str) -> Result<Arc<BulletClass>, ClassError> {
        self.bullets
            .get(name)
            .cloned()
            .ok_or_else(|| ClassError::UnknownBulletClass(name.to_owned()))
    }

    /// Resolves a particle class by name.
    pub fn particle(&self, name: &str) -> Result<Arc<ParticleClass>, ClassError> {
        self.particles
            .get(name)
            .cloned()
            .ok_or_else(|| ClassError::UnknownParticleClass(name.to_owned()))
    }

    /// Resolves a gun by name.
    pub fn gun(&self, name: &str) -> Result<Arc<Gun>, ClassError> {
        self.guns
            .get(name)
            .cloned()
            .ok_or_else(|| ClassError::UnknownGun(name.to_owned()))
    }
}

fn insert_unique<T>(
    entries: &mut HashMap<String, Arc<T>>,
    kind: &'static str,
    name: String,
    value: T,
) -> Result<(), ClassError> {
    if entries.contains_key(&name) {
        return Err(ClassError::Duplicate { kind, name });
    }
    let _ = entries.insert(name, Arc::new(value));
    Ok(())
}
