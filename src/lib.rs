//! Astro Dodger - a hand-tracked vertical asteroid dodger
//!
//! Core modules:
//! - `sim`: Simulation (input prediction, waves, spawning, collisions, round lifecycle)
//! - `render`: Draw list handed to an external renderer
//! - `audio`: Named sound triggers derived from simulation events
//! - `ui`: HUD values, alert banner, loading progress, gamertag rules
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod error;
pub mod highscores;
pub mod render;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use error::{GamertagError, MaskError, SensorError, StartupError, TuningError};
pub use highscores::HighScores;
pub use settings::Settings;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Screen dimensions (pixels)
    pub const SCREEN_WIDTH: f32 = 1280.0;
    pub const SCREEN_HEIGHT: f32 = 720.0;

    /// Target render rate; also caps how often the hand sensor is polled
    pub const MAX_FPS: f32 = 60.0;

    /// Largest frame delta fed to the simulation (a stalled frame must not
    /// teleport asteroids through the ship)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Default sprite footprints (pixels)
    pub const SHIP_SIZE: (u32, u32) = (80, 80);
    pub const ASTEROID_LARGE_SIZE: u32 = 96;
    pub const ASTEROID_MEDIUM_SIZE: u32 = 64;
    pub const ASTEROID_SMALL_SIZE: u32 = 40;
    pub const SHIELD_SIZE: u32 = 48;
}

/// Screen size as a vector
#[inline]
pub fn screen_size() -> Vec2 {
    Vec2::new(consts::SCREEN_WIDTH, consts::SCREEN_HEIGHT)
}

/// Clamp a sprite center so the whole sprite stays on screen
#[inline]
pub fn clamp_to_screen(center: Vec2, sprite_size: Vec2, screen: Vec2) -> Vec2 {
    let half = (sprite_size / 2.0).floor();
    Vec2::new(
        center.x.clamp(half.x, (screen.x - half.x).max(half.x)),
        center.y.clamp(half.y, (screen.y - half.y).max(half.y)),
    )
}

/// Wrap an angle in degrees into [0, 360)
#[inline]
pub fn wrap_degrees(angle: f32) -> f32 {
    angle.rem_euclid(360.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_to_screen_keeps_sprite_inside() {
        let screen = Vec2::new(100.0, 50.0);
        let size = Vec2::new(20.0, 10.0);
        assert_eq!(clamp_to_screen(Vec2::new(-5.0, 100.0), size, screen), Vec2::new(10.0, 45.0));
        assert_eq!(clamp_to_screen(Vec2::new(50.0, 25.0), size, screen), Vec2::new(50.0, 25.0));
    }

    #[test]
    fn test_wrap_degrees() {
        assert!((wrap_degrees(370.0) - 10.0).abs() < 1e-4);
        assert!((wrap_degrees(-10.0) - 350.0).abs() < 1e-4);
        assert_eq!(wrap_degrees(0.0), 0.0);
    }
}
