//! Run configuration describing the level layout, economy and wave table.

use std::time::Duration;

use glam::Vec2;
use serde::Deserialize;
use thiserror::Error;
use wave_defence_core::{AgentKind, KindWeight, WaveConfig};

const DEFAULT_SEED: u64 = 0x5eed_0f_da7a_c0de;

/// Complete description of a run, loaded once and never mutated.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Waypoints every agent walks from first to last.
    pub path: Vec<Vec2>,
    /// Positions where emplacements may be built, indexed by slot.
    pub build_slots: Vec<Vec2>,
    /// Wave table; its length is the run's `maxWaves`.
    pub waves: Vec<WaveConfig>,
    /// Starting economy values.
    pub economy: EconomyConfig,
    /// Screen dimensions bounding the avatar.
    pub screen: ScreenConfig,
    /// Seed for the spawn-selection random stream.
    pub seed: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            path: vec![
                Vec2::new(0.0, 150.0),
                Vec2::new(300.0, 150.0),
                Vec2::new(300.0, 450.0),
                Vec2::new(700.0, 450.0),
                Vec2::new(700.0, 250.0),
                Vec2::new(1_024.0, 250.0),
            ],
            build_slots: vec![
                Vec2::new(200.0, 250.0),
                Vec2::new(400.0, 350.0),
                Vec2::new(600.0, 350.0),
                Vec2::new(800.0, 350.0),
                Vec2::new(500.0, 550.0),
            ],
            waves: default_waves(),
            economy: EconomyConfig::default(),
            screen: ScreenConfig::default(),
            seed: DEFAULT_SEED,
        }
    }
}

impl RunConfig {
    /// Number of waves in the run.
    #[must_use]
    pub fn max_waves(&self) -> u32 {
        u32::try_from(self.waves.len()).unwrap_or(u32::MAX)
    }

    /// Checks the invariants the simulation relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.path.is_empty() {
            return Err(ConfigError::EmptyPath);
        }

        let points = self.path.iter().chain(self.build_slots.iter());
        if let Some(point) = points.copied().find(|point| !point.is_finite()) {
            return Err(ConfigError::NonFinitePoint {
                x: point.x,
                y: point.y,
            });
        }

        if self.waves.is_empty() {
            return Err(ConfigError::NoWaves);
        }

        for (index, wave) in self.waves.iter().enumerate() {
            for entry in &wave.weights {
                if !entry.weight.is_finite() || entry.weight < 0.0 {
                    return Err(ConfigError::InvalidWeight {
                        wave: index + 1,
                        weight: entry.weight,
                    });
                }
            }
        }

        if self.screen.width <= self.screen.margin * 2.0
            || self.screen.height <= self.screen.margin * 2.0
        {
            return Err(ConfigError::DegenerateScreen {
                width: self.screen.width,
                height: self.screen.height,
            });
        }

        Ok(())
    }
}

/// Starting values for the run's economy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    /// Lives granted when a run starts.
    pub starting_lives: u32,
    /// Currency granted when a run starts.
    pub starting_currency: u32,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            starting_lives: 20,
            starting_currency: 100,
        }
    }
}

/// Screen dimensions and the inset that keeps the avatar on screen.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    /// Screen width in world units.
    pub width: f32,
    /// Screen height in world units.
    pub height: f32,
    /// Inset applied on every edge; half the avatar's size.
    pub margin: f32,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            width: 1_024.0,
            height: 768.0,
            margin: 16.0,
        }
    }
}

impl ScreenConfig {
    /// Screen centre, where the avatar appears.
    #[must_use]
    pub fn centre(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Smallest position the avatar may occupy.
    #[must_use]
    pub fn playable_min(&self) -> Vec2 {
        Vec2::splat(self.margin)
    }

    /// Largest position the avatar may occupy.
    #[must_use]
    pub fn playable_max(&self) -> Vec2 {
        Vec2::new(self.width - self.margin, self.height - self.margin)
    }
}

/// Reasons a run configuration may be refused.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// The path has no waypoints.
    #[error("the agent path must contain at least one waypoint")]
    EmptyPath,
    /// A waypoint or build slot has a NaN or infinite coordinate.
    #[error("point ({x}, {y}) is not finite")]
    NonFinitePoint {
        /// Horizontal coordinate.
        x: f32,
        /// Vertical coordinate.
        y: f32,
    },
    /// The wave table is empty.
    #[error("the run must configure at least one wave")]
    NoWaves,
    /// A spawn weight is negative or not finite.
    #[error("wave {wave} has invalid spawn weight {weight}")]
    InvalidWeight {
        /// One-based index of the offending wave.
        wave: usize,
        /// Offending weight.
        weight: f32,
    },
    /// The screen leaves no playable area after the margin.
    #[error("screen {width}x{height} leaves no playable area")]
    DegenerateScreen {
        /// Configured width.
        width: f32,
        /// Configured height.
        height: f32,
    },
}

fn default_waves() -> Vec<WaveConfig> {
    vec![
        WaveConfig::new(
            5,
            Duration::from_millis(1_500),
            vec![KindWeight::new(AgentKind::Goblin, 1.0)],
        ),
        WaveConfig::new(
            8,
            Duration::from_millis(1_200),
            vec![
                KindWeight::new(AgentKind::Goblin, 0.6),
                KindWeight::new(AgentKind::Slime, 0.4),
            ],
        ),
        WaveConfig::new(
            12,
            Duration::from_millis(1_000),
            vec![
                KindWeight::new(AgentKind::Goblin, 0.4),
                KindWeight::new(AgentKind::Slime, 0.3),
                KindWeight::new(AgentKind::Wolf, 0.3),
            ],
        ),
    ]
}
