//! Data-driven game balance
//!
//! Every gameplay number lives here so a round can be re-balanced from a JSON
//! file without touching the simulation. Missing fields fall back to the
//! defaults, so a file only needs the values it overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::MAX_FPS;
use crate::error::TuningError;

/// Ship health, shield and animation timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShipTuning {
    pub max_health: f32,
    pub max_shield: f32,
    /// Seconds a temporary shield takes to drain from full
    pub temp_shield_duration: f32,
    /// Shield added by a Type1 pickup while a permanent shield is up
    pub shield_stack_bonus: f32,
    /// Seconds between flight animation frames
    pub animation_interval: f32,
    pub flight_frames: u32,
    /// Movement below this many pixels per axis is treated as sensor jitter
    pub movement_threshold: f32,
    /// Seconds between explosion frames
    pub explosion_interval: f32,
    pub explosion_frames: u32,
}

impl Default for ShipTuning {
    fn default() -> Self {
        Self {
            max_health: 100.0,
            max_shield: 100.0,
            temp_shield_duration: 5.0,
            shield_stack_bonus: 10.0,
            animation_interval: 0.2,
            flight_frames: 4,
            movement_threshold: 3.0,
            explosion_interval: 0.1,
            explosion_frames: 8,
        }
    }
}

/// Spawn rates and launch parameters for falling entities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnTuning {
    /// Asteroids per second outside a wave
    pub idle_asteroid_rate: f32,
    /// Asteroids per second during a wave
    pub wave_asteroid_rate: f32,
    pub asteroid_speed_min: f32,
    pub asteroid_speed_max: f32,
    /// Rotation rate range in whole degrees per second (inclusive)
    pub rotation_rate_min: u32,
    pub rotation_rate_max: u32,
    /// Horizontal drift range of the launch direction before normalizing
    pub max_drift: f32,
    /// Spawn line (sprite center y, above the top edge)
    pub spawn_y: f32,
    pub shield_speed_min: f32,
    pub shield_speed_max: f32,
    /// Type1 pickups per second while a wave is running
    pub shield1_rate: f32,
    /// Type2 pickups per second while a wave is running
    pub shield2_rate: f32,
    pub shield1_per_wave: u32,
}

impl Default for SpawnTuning {
    fn default() -> Self {
        Self {
            idle_asteroid_rate: 1.3,
            wave_asteroid_rate: 5.0,
            asteroid_speed_min: 100.0,
            asteroid_speed_max: 500.0,
            rotation_rate_min: 20,
            rotation_rate_max: 50,
            max_drift: 0.5,
            spawn_y: -50.0,
            shield_speed_min: 50.0,
            shield_speed_max: 150.0,
            shield1_rate: 0.3,
            shield2_rate: 0.12,
            shield1_per_wave: 3,
        }
    }
}

/// Wave timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveTuning {
    /// Quiet seconds before the first wave and between waves
    pub interval: f32,
    pub initial_duration: f32,
    /// Per-wave duration growth is drawn once per session from
    /// `increment_min..increment_max` whole seconds
    pub increment_min: u32,
    pub increment_max: u32,
}

impl Default for WaveTuning {
    fn default() -> Self {
        Self {
            interval: 30.0,
            initial_duration: 30.0,
            increment_min: 10,
            increment_max: 20,
        }
    }
}

/// Hand-tracking filter constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictorTuning {
    /// Sensor polls per second at most
    pub max_sample_rate: f32,
    pub velocity_decay: f32,
    pub prediction_factor: f32,
    pub smoothing_factor: f32,
}

impl Default for PredictorTuning {
    fn default() -> Self {
        Self {
            max_sample_rate: MAX_FPS,
            velocity_decay: 0.5,
            prediction_factor: 0.5,
            smoothing_factor: 0.1,
        }
    }
}

impl PredictorTuning {
    /// Seconds between sensor polls
    pub fn sample_interval(&self) -> f32 {
        1.0 / self.max_sample_rate
    }
}

/// Background and alert presentation timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresentationTuning {
    /// Background scroll speed (pixels/s)
    pub scroll_speed: f32,
    /// Height of the background tile the scroll wraps at
    pub background_height: f32,
    /// Seconds an alert banner stays up
    pub alert_duration: f32,
}

impl Default for PresentationTuning {
    fn default() -> Self {
        Self {
            scroll_speed: 100.0,
            background_height: crate::consts::SCREEN_HEIGHT,
            alert_duration: 3.0,
        }
    }
}

/// Complete balance sheet for a session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub ship: ShipTuning,
    pub spawn: SpawnTuning,
    pub wave: WaveTuning,
    pub predictor: PredictorTuning,
    pub presentation: PresentationTuning,
}

impl Tuning {
    /// Parse and validate a tuning document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load and validate a tuning file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        fn positive(field: &'static str, value: f32) -> Result<(), TuningError> {
            if value > 0.0 && value.is_finite() {
                Ok(())
            } else {
                Err(TuningError::Invalid {
                    field,
                    reason: format!("must be positive, got {value}"),
                })
            }
        }
        fn ordered(field: &'static str, min: f32, max: f32) -> Result<(), TuningError> {
            if min <= max {
                Ok(())
            } else {
                Err(TuningError::Invalid {
                    field,
                    reason: format!("min {min} exceeds max {max}"),
                })
            }
        }
        fn unit(field: &'static str, value: f32) -> Result<(), TuningError> {
            if (0.0..=1.0).contains(&value) {
                Ok(())
            } else {
                Err(TuningError::Invalid {
                    field,
                    reason: format!("must lie in [0, 1], got {value}"),
                })
            }
        }

        let ship = &self.ship;
        positive("ship.max_health", ship.max_health)?;
        positive("ship.max_shield", ship.max_shield)?;
        positive("ship.temp_shield_duration", ship.temp_shield_duration)?;
        positive("ship.animation_interval", ship.animation_interval)?;
        positive("ship.explosion_interval", ship.explosion_interval)?;
        if ship.flight_frames == 0 {
            return Err(TuningError::Invalid {
                field: "ship.flight_frames",
                reason: "need at least one flight frame".into(),
            });
        }

        let spawn = &self.spawn;
        ordered("spawn.asteroid_speed", spawn.asteroid_speed_min, spawn.asteroid_speed_max)?;
        ordered("spawn.shield_speed", spawn.shield_speed_min, spawn.shield_speed_max)?;
        ordered(
            "spawn.rotation_rate",
            spawn.rotation_rate_min as f32,
            spawn.rotation_rate_max as f32,
        )?;

        let wave = &self.wave;
        positive("wave.interval", wave.interval)?;
        positive("wave.initial_duration", wave.initial_duration)?;
        if wave.increment_min >= wave.increment_max {
            return Err(TuningError::Invalid {
                field: "wave.increment",
                reason: format!(
                    "range {}..{} is empty",
                    wave.increment_min, wave.increment_max
                ),
            });
        }

        let predictor = &self.predictor;
        positive("predictor.max_sample_rate", predictor.max_sample_rate)?;
        unit("predictor.velocity_decay", predictor.velocity_decay)?;
        unit("predictor.smoothing_factor", predictor.smoothing_factor)?;

        positive("presentation.background_height", self.presentation.background_height)?;
        positive("presentation.alert_duration", self.presentation.alert_duration)?;
        Ok(())
    }
}
