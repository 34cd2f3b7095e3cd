//! Gameplay toggles read by the combat core.

use serde::{Deserialize, Serialize};

/// Amount of blood emitted when characters take damage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoreLevel {
    /// No blood particles.
    None,
    /// Sparse blood; the budget shrinks to an eighth per particle.
    #[default]
    Low,
    /// Moderate blood; the budget halves per particle.
    Medium,
    /// Heavy blood; seven eighths of the budget survive each particle.
    High,
}

impl GoreLevel {
    /// Shrinks the remaining blood budget after one particle was emitted.
    #[must_use]
    pub const fn decay(self, blood: i32) -> i32 {
        match self {
            Self::Low => blood / 8,
            Self::Medium => blood / 2,
            Self::None | Self::High => blood / 8 * 7 + blood % 8 * 7 / 8,
        }
    }
}

/// Game modes that alter friendly-fire and scoring rules.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    /// Cooperative mission play.
    #[default]
    Campaign,
    /// Players fight each other without AI enemies.
    Dogfight,
    /// Players fight each other and the AI.
    Deathmatch,
}

impl GameMode {
    /// Reports whether players may damage and score against each other.
    #[must_use]
    pub const fn is_pvp(self) -> bool {
        matches!(self, Self::Dogfight | Self::Deathmatch)
    }
}

/// Gameplay configuration consumed by the world.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameplayConfig {
    /// Whether bullets push characters back.
    pub shots_pushback: bool,
    /// Amount of gore.
    pub gore: GoreLevel,
    /// Active game mode.
    pub mode: GameMode,
    /// Whether this process is a network client that never originates spawns.
    pub is_client: bool,
    /// Sound played when a static object is wrecked.
    pub wreck_sound: String,
    /// Bullet class spawned as the wreck explosion.
    pub wreck_bullet: String,
}

impl Default for GameplayConfig {
    fn default() -> Self {
        Self {
            shots_pushback: true,
            gore: GoreLevel::default(),
            mode: GameMode::default(),
            is_client: false,
            wreck_sound: "bang".to_owned(),
            wreck_bullet: "fireball_wreck".to_owned(),
        }
    }
}
