//! The player's ship: movement, health/shield model and explosion sequence

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::ShieldKind;
use crate::clamp_to_screen;
use crate::consts::SHIP_SIZE;
use crate::tuning::ShipTuning;

/// How the current shield behaves over time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ShieldMode {
    None,
    /// Drains linearly to zero; `remaining` seconds left on the timer
    Temporary { remaining: f32 },
    /// Holds until consumed by damage
    Permanent,
}

/// Sprite the presentation layer should show for the ship
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShipSprite {
    Idle,
    Flight(u32),
    Explosion(u32),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ship {
    /// Sprite center
    pub pos: Vec2,
    pub size: Vec2,
    pub health: f32,
    pub shield: f32,
    pub shield_mode: ShieldMode,
    /// Moved more than the deadband on the last steer
    pub moving: bool,
    pub flight_frame: u32,
    animation_timer: f32,
    pub exploding: bool,
    /// Explosion frames shown so far
    pub explosion_frame: u32,
    explosion_timer: f32,
    /// Explosion finished and the sprite has been taken off screen
    pub removed: bool,
    tuning: ShipTuning,
}

impl Ship {
    pub fn new(pos: Vec2, tuning: &ShipTuning) -> Self {
        Self {
            pos,
            size: Vec2::new(SHIP_SIZE.0 as f32, SHIP_SIZE.1 as f32),
            health: tuning.max_health,
            shield: 0.0,
            shield_mode: ShieldMode::None,
            moving: false,
            flight_frame: 0,
            animation_timer: 0.0,
            exploding: false,
            explosion_frame: 0,
            explosion_timer: 0.0,
            removed: false,
            tuning: tuning.clone(),
        }
    }

    pub fn max_health(&self) -> f32 {
        self.tuning.max_health
    }

    pub fn max_shield(&self) -> f32 {
        self.tuning.max_shield
    }

    pub fn has_permanent_shield(&self) -> bool {
        self.shield_mode == ShieldMode::Permanent
    }

    /// Seconds left on a temporary shield (0 otherwise)
    pub fn temp_shield_remaining(&self) -> f32 {
        match self.shield_mode {
            ShieldMode::Temporary { remaining } => remaining,
            _ => 0.0,
        }
    }

    /// Move toward the cursor, ignoring jitter below the deadband
    pub fn steer(&mut self, target: Vec2, dt: f32, screen: Vec2) {
        if self.exploding {
            return;
        }

        let clamped = clamp_to_screen(target, self.size, screen);
        let delta = clamped - self.pos;
        let threshold = self.tuning.movement_threshold;
        self.moving = delta.x.abs() > threshold || delta.y.abs() > threshold;

        if self.moving {
            self.pos = clamped;
            self.animation_timer += dt;
            while self.animation_timer >= self.tuning.animation_interval {
                self.animation_timer -= self.tuning.animation_interval;
                self.flight_frame = (self.flight_frame + 1) % self.tuning.flight_frames;
            }
        } else {
            self.flight_frame = 0;
        }
    }

    /// Per-frame update: explosion playback, or shield decay while alive
    pub fn update(&mut self, dt: f32) {
        if self.exploding {
            self.advance_explosion(dt);
        } else {
            self.decay_shield(dt);
        }
    }

    fn advance_explosion(&mut self, dt: f32) {
        if self.removed {
            return;
        }
        self.explosion_timer += dt;
        while self.explosion_timer >= self.tuning.explosion_interval {
            self.explosion_timer -= self.tuning.explosion_interval;
            if self.explosion_frame < self.tuning.explosion_frames {
                self.explosion_frame += 1;
            } else {
                self.removed = true;
                break;
            }
        }
    }

    fn decay_shield(&mut self, dt: f32) {
        let ShieldMode::Temporary { remaining } = self.shield_mode else {
            return;
        };
        let drain = self.tuning.max_shield / self.tuning.temp_shield_duration * dt;
        let remaining = remaining - dt;
        self.shield = (self.shield - drain).max(0.0);
        if remaining <= 0.0 || self.shield <= 0.0 {
            self.shield = 0.0;
            self.shield_mode = ShieldMode::None;
        } else {
            self.shield_mode = ShieldMode::Temporary { remaining };
        }
    }

    /// Apply a hit. The shield soaks the whole hit if it has anything left;
    /// damage never spills over into health within one hit.
    pub fn take_damage(&mut self, amount: f32) {
        if self.exploding || amount <= 0.0 {
            return;
        }
        if self.shield > 0.0 {
            self.shield = (self.shield - amount).max(0.0);
            if self.shield == 0.0 {
                self.shield_mode = ShieldMode::None;
            }
        } else {
            self.health = (self.health - amount).max(0.0);
        }
    }

    /// Apply a shield pickup
    pub fn add_shield(&mut self, kind: ShieldKind) {
        let max = self.tuning.max_shield;
        match kind {
            ShieldKind::Temporary => {
                if self.has_permanent_shield() {
                    self.shield = (self.shield + self.tuning.shield_stack_bonus).min(max);
                } else {
                    // A fresh pickup restarts the full timer
                    self.shield = max;
                    self.shield_mode = ShieldMode::Temporary {
                        remaining: self.tuning.temp_shield_duration,
                    };
                }
            }
            ShieldKind::Permanent => {
                self.shield = max;
                self.shield_mode = ShieldMode::Permanent;
            }
        }
    }

    pub fn is_destroyed(&self) -> bool {
        self.health <= 0.0
    }

    /// Begin the explosion sequence. Returns false if already exploding.
    pub fn start_explosion(&mut self) -> bool {
        if self.exploding {
            return false;
        }
        self.exploding = true;
        self.moving = false;
        self.explosion_frame = 0;
        self.explosion_timer = 0.0;
        true
    }

    /// Every explosion frame has been shown
    pub fn explosion_complete(&self) -> bool {
        self.exploding && self.explosion_frame >= self.tuning.explosion_frames
    }

    pub fn sprite(&self) -> ShipSprite {
        if self.exploding {
            let last = self.tuning.explosion_frames.saturating_sub(1);
            ShipSprite::Explosion(self.explosion_frame.min(last))
        } else if self.moving {
            ShipSprite::Flight(self.flight_frame)
        } else {
            ShipSprite::Idle
        }
    }

    pub fn health_fraction(&self) -> f32 {
        self.health / self.tuning.max_health
    }

    pub fn shield_fraction(&self) -> f32 {
        self.shield / self.tuning.max_shield
    }
}
