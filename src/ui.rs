//! UI state the presentation layer reads each frame
//!
//! Nothing here draws; these are the values behind the HUD bars, the wave
//! alert banner, the loading screen and the gamertag prompt.

use serde::{Deserialize, Serialize};

use crate::error::GamertagError;
use crate::sim::GameState;

/// Longest accepted gamertag
pub const MAX_GAMERTAG_CHARS: usize = 14;

/// Check a gamertag against the entry screen rules
pub fn validate_gamertag(tag: &str) -> Result<String, GamertagError> {
    if tag.is_empty() {
        return Err(GamertagError::Empty);
    }
    if tag.chars().count() > MAX_GAMERTAG_CHARS {
        return Err(GamertagError::TooLong {
            max: MAX_GAMERTAG_CHARS,
        });
    }
    Ok(tag.to_string())
}

/// HUD values: score and bar fill fractions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hud {
    pub score: u64,
    /// Health bar fill, [0, 1]
    pub health: f32,
    /// Shield bar fill, [0, 1]
    pub shield: f32,
    pub wave: u32,
}

impl Hud {
    pub fn from_state(state: &GameState) -> Self {
        Self {
            score: state.score,
            health: state.ship.health_fraction().clamp(0.0, 1.0),
            shield: state.ship.shield_fraction().clamp(0.0, 1.0),
            wave: state.wave.wave_number,
        }
    }

    /// Filled width of a bar `full_width` pixels wide
    pub fn bar_width(fraction: f32, full_width: u32) -> u32 {
        (full_width as f32 * fraction.clamp(0.0, 1.0)) as u32
    }
}

/// Timed, blinking banner for wave alerts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlertBanner {
    text: String,
    remaining: f32,
}

impl AlertBanner {
    pub fn show(&mut self, text: &str, duration: f32) {
        self.text = text.to_string();
        self.remaining = duration;
    }

    pub fn update(&mut self, dt: f32) {
        if self.remaining > 0.0 {
            self.remaining -= dt;
            if self.remaining <= 0.0 {
                self.remaining = 0.0;
                self.text.clear();
            }
        }
    }

    pub fn is_active(&self) -> bool {
        self.remaining > 0.0
    }

    /// Current text, if the banner is up
    pub fn text(&self) -> Option<&str> {
        self.is_active().then_some(self.text.as_str())
    }

    /// Whether to draw the banner this frame. It blinks at 1 Hz unless
    /// `reduced_motion` is set.
    pub fn visible(&self, reduced_motion: bool) -> bool {
        if !self.is_active() {
            return false;
        }
        reduced_motion || (self.remaining * 2.0) % 2.0 > 1.0
    }
}

/// Loading sequence stages and how long each takes (seconds)
pub const LOADING_STEPS: [(&str, f32); 4] = [
    ("Loading images", 0.3),
    ("Loading sounds", 0.2),
    ("Initializing game objects", 0.2),
    ("Preparing game environment", 0.3),
];

/// Seconds between loading-dot updates
const DOT_INTERVAL: f32 = 0.5;

/// Staged loading progress
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadingProgress {
    step: usize,
    /// Fraction of the current step done
    progress: f32,
    dot_timer: f32,
    dots: u32,
}

impl LoadingProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self, dt: f32) {
        self.dot_timer += dt;
        while self.dot_timer > DOT_INTERVAL {
            self.dot_timer -= DOT_INTERVAL;
            self.dots = (self.dots + 1) % 4;
        }

        let mut left = dt;
        while left > 0.0 && self.step < LOADING_STEPS.len() {
            let (label, duration) = LOADING_STEPS[self.step];
            let needed = (1.0 - self.progress) * duration;
            if left >= needed {
                left -= needed;
                self.progress = 0.0;
                self.step += 1;
                log::debug!("Loading step done: {label}");
            } else {
                self.progress += left / duration;
                left = 0.0;
            }
        }
    }

    pub fn is_complete(&self) -> bool {
        self.step >= LOADING_STEPS.len()
    }

    /// Label of the stage in progress
    pub fn current_label(&self) -> Option<&'static str> {
        LOADING_STEPS.get(self.step).map(|(label, _)| *label)
    }

    /// Overall progress bar fill, [0, 1]
    pub fn fraction(&self) -> f32 {
        if self.is_complete() {
            return 1.0;
        }
        (self.step as f32 + self.progress) / LOADING_STEPS.len() as f32
    }

    /// "Loading" followed by 0-3 animated dots
    pub fn caption(&self) -> String {
        format!("Loading{}", ".".repeat(self.dots as usize))
    }
}

/// Vertically scrolling background made of two stacked tiles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Background {
    pub offset: f32,
    speed: f32,
    height: f32,
}

impl Background {
    pub fn new(speed: f32, height: f32) -> Self {
        Self {
            offset: 0.0,
            speed,
            height,
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.offset += self.speed * dt;
        if self.offset >= self.height {
            self.offset = 0.0;
        }
    }

    /// Top edge of the two tiles to draw
    pub fn tile_offsets(&self) -> [f32; 2] {
        [self.offset, self.offset - self.height]
    }
}
