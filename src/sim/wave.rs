//! Wave director: timed Idle/Active state machine
//!
//! A wave is a stretch of heavier asteroid traffic with shield drops. Each
//! wave lasts longer than the one before by a fixed, per-session increment.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::tuning::WaveTuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WavePhase {
    Idle,
    Active,
}

/// A phase change reported by [`WaveDirector::update`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum WaveTransition {
    Started { wave: u32, duration: f32 },
    Ended { wave: u32 },
}

impl WaveTransition {
    /// Banner text shown for this transition
    pub fn alert_text(&self) -> &'static str {
        match self {
            WaveTransition::Started { .. } => "wave incoming!",
            WaveTransition::Ended { .. } => "wave has ended!",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaveDirector {
    pub phase: WavePhase,
    /// Waves started this session
    pub wave_number: u32,
    /// Length of the current (or last) wave in seconds
    pub wave_duration: f32,
    /// Growth per wave, fixed for the session
    pub increment: f32,
    /// Session time of the last Idle/Active switch
    pub last_transition: f32,
    /// Type1 pickups dropped this wave
    pub shield1_spawned: u32,
    /// Type2 pickup dropped this wave
    pub shield2_spawned: bool,
    interval: f32,
    initial_duration: f32,
}

impl WaveDirector {
    /// Create an idle director, drawing the session's duration increment.
    /// An empty range falls back to `increment_min`.
    pub fn new<R: Rng + ?Sized>(tuning: &WaveTuning, rng: &mut R) -> Self {
        let increment = if tuning.increment_max > tuning.increment_min {
            rng.random_range(tuning.increment_min..tuning.increment_max)
        } else {
            tuning.increment_min
        };
        Self::with_increment(tuning, increment as f32)
    }

    /// Create an idle director with a known increment
    pub fn with_increment(tuning: &WaveTuning, increment: f32) -> Self {
        Self {
            phase: WavePhase::Idle,
            wave_number: 0,
            wave_duration: tuning.initial_duration,
            increment,
            last_transition: 0.0,
            shield1_spawned: 0,
            shield2_spawned: false,
            interval: tuning.interval,
            initial_duration: tuning.initial_duration,
        }
    }

    pub fn is_active(&self) -> bool {
        self.phase == WavePhase::Active
    }

    /// Duration of wave `n` (1-based)
    pub fn duration_for(&self, wave: u32) -> f32 {
        self.initial_duration + wave.saturating_sub(1) as f32 * self.increment
    }

    /// Evaluate timers at session time `elapsed`. At most one transition per call.
    pub fn update(&mut self, elapsed: f32) -> Option<WaveTransition> {
        let since_transition = elapsed - self.last_transition;
        match self.phase {
            WavePhase::Idle => {
                if elapsed >= self.interval && since_transition >= self.interval {
                    Some(self.start_wave(elapsed))
                } else {
                    None
                }
            }
            WavePhase::Active => {
                if since_transition >= self.wave_duration {
                    Some(self.end_wave(elapsed))
                } else {
                    None
                }
            }
        }
    }

    fn start_wave(&mut self, elapsed: f32) -> WaveTransition {
        self.shield1_spawned = 0;
        self.shield2_spawned = false;
        self.phase = WavePhase::Active;
        self.last_transition = elapsed;
        self.wave_number += 1;
        self.wave_duration = self.duration_for(self.wave_number);
        log::info!(
            "Wave {} incoming ({:.0}s)",
            self.wave_number,
            self.wave_duration
        );
        WaveTransition::Started {
            wave: self.wave_number,
            duration: self.wave_duration,
        }
    }

    fn end_wave(&mut self, elapsed: f32) -> WaveTransition {
        self.phase = WavePhase::Idle;
        self.last_transition = elapsed;
        log::info!("Wave {} ended", self.wave_number);
        WaveTransition::Ended {
            wave: self.wave_number,
        }
    }
}
