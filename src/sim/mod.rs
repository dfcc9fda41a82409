//! Simulation module
//!
//! All gameplay logic lives here. It stays free of rendering and platform
//! dependencies:
//! - Frame delta is an input, clamped before use
//! - One seeded RNG per session
//! - Stable iteration order (by entity ID)

pub mod collision;
pub mod entity;
pub mod mask;
pub mod predictor;
pub mod ship;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod wave;

pub use collision::{CollisionReport, masks_collide, resolve_collisions};
pub use entity::{Asteroid, Entity, EntityArena, EntityKind, Roles, Shield, ShieldKind, SizeClass};
pub use mask::{ALPHA_THRESHOLD, CollisionMask, SpriteMasks};
pub use predictor::{HandSensor, InputPredictor};
pub use ship::{ShieldMode, Ship, ShipSprite};
pub use spawner::{SpawnReport, spawn_frame};
pub use state::{GameEvent, GameOverChoice, GamePhase, GameState, RoundSummary};
pub use tick::{TickInput, tick};
pub use wave::{WaveDirector, WavePhase, WaveTransition};
