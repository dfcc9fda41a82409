//! Session state and round lifecycle
//!
//! Everything one play session owns lives in [`GameState`]. The frame
//! pipeline in `tick` borrows the pieces it needs from here.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{EntityArena, ShieldKind, SizeClass};
use super::mask::SpriteMasks;
use super::predictor::{HandSensor, InputPredictor};
use super::ship::Ship;
use super::wave::WaveDirector;
use crate::error::{GamertagError, StartupError};
use crate::screen_size;
use crate::tuning::Tuning;
use crate::ui::{AlertBanner, Background, LoadingProgress, validate_gamertag};

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Staged loading sequence; the sensor is not open yet
    Loading,
    /// Active round
    Playing,
    /// Round over, waiting for the player's choice
    GameOver,
}

/// Things that happened during a frame, for audio and UI
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    AsteroidImpact { size: SizeClass },
    ShieldPickup { kind: ShieldKind },
    WaveIncoming { wave: u32 },
    WaveEnded { wave: u32 },
    ShipExploded,
    /// Round started; background music should be running
    BackgroundLoop,
    GameOver { score: u64 },
}

/// Choice made on the game-over screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverChoice {
    PlayAgain,
    Quit,
}

/// Result of a finished round, for the leaderboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub gamertag: String,
    pub score: u64,
    pub waves: u32,
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Session seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub tuning: Tuning,
    pub masks: SpriteMasks,
    pub screen: Vec2,
    pub phase: GamePhase,
    pub ship: Ship,
    /// Asteroids and shield pickups
    pub arena: EntityArena,
    pub wave: WaveDirector,
    pub predictor: InputPredictor,
    /// Seconds since the round started
    pub elapsed: f32,
    /// Whole seconds survived; frozen once the ship explodes
    pub score: u64,
    pub alert: AlertBanner,
    pub background: Background,
    pub loading: LoadingProgress,
    pub gamertag: String,
    /// Events raised since the last drain
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a session in the Loading phase
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        if let Err(e) = tuning.validate() {
            log::warn!("Starting with inconsistent tuning: {e}");
        }
        let mut rng = Pcg32::seed_from_u64(seed);
        let screen = screen_size();
        let wave = WaveDirector::new(&tuning.wave, &mut rng);
        log::debug!(
            "New session seed={} wave increment={:.0}s",
            seed,
            wave.increment
        );

        Self {
            seed,
            rng,
            masks: SpriteMasks::default(),
            screen,
            phase: GamePhase::Loading,
            ship: Ship::new(screen / 2.0, &tuning.ship),
            arena: EntityArena::new(),
            wave,
            predictor: InputPredictor::new(screen, &tuning.predictor),
            elapsed: 0.0,
            score: 0,
            alert: AlertBanner::default(),
            background: Background::new(
                tuning.presentation.scroll_speed,
                tuning.presentation.background_height,
            ),
            loading: LoadingProgress::new(),
            gamertag: String::new(),
            events: Vec::new(),
            tuning,
        }
    }

    /// Replace the default shapes with masks built from sprite alpha
    pub fn with_masks(mut self, masks: SpriteMasks) -> Self {
        self.masks = masks;
        self
    }

    pub fn set_gamertag(&mut self, tag: &str) -> Result<(), GamertagError> {
        self.gamertag = validate_gamertag(tag)?;
        Ok(())
    }

    /// Open the sensor and start the round once loading has finished.
    /// A sensor failure is fatal and leaves the session in Loading.
    pub fn begin_round<S: HandSensor + ?Sized>(
        &mut self,
        sensor: &mut S,
    ) -> Result<(), StartupError> {
        if self.phase != GamePhase::Loading {
            return Err(StartupError::NotLoading);
        }
        if !self.loading.is_complete() {
            return Err(StartupError::StillLoading);
        }
        if let Err(e) = sensor.open() {
            log::error!("Failed to initialize hand tracking: {e}");
            return Err(e.into());
        }

        self.elapsed = 0.0;
        self.score = 0;
        self.phase = GamePhase::Playing;
        self.events.push(GameEvent::BackgroundLoop);
        log::info!("Round started for '{}'", self.gamertag);
        Ok(())
    }

    /// Move to GameOver and report the final score
    pub fn end_round(&mut self) {
        if self.phase != GamePhase::Playing {
            return;
        }
        self.phase = GamePhase::GameOver;
        self.events.push(GameEvent::GameOver { score: self.score });
        log::info!(
            "Game over: '{}' survived {}s across {} waves",
            self.gamertag,
            self.score,
            self.wave.wave_number
        );
    }

    pub fn summary(&self) -> RoundSummary {
        RoundSummary {
            gamertag: self.gamertag.clone(),
            score: self.score,
            waves: self.wave.wave_number,
        }
    }

    /// Apply the game-over choice. Returns true if the session continues.
    /// Play again only restarts from the game-over screen.
    pub fn resolve_game_over(&mut self, choice: GameOverChoice) -> bool {
        match choice {
            GameOverChoice::PlayAgain if self.phase == GamePhase::GameOver => {
                self.restart();
                true
            }
            GameOverChoice::PlayAgain => {
                log::warn!("Play again ignored in {:?}", self.phase);
                true
            }
            GameOverChoice::Quit => false,
        }
    }

    /// Full reset back to Loading with a seed drawn from this session's RNG.
    /// Gamertag, tuning and masks carry over.
    pub fn restart(&mut self) {
        let seed = self.rng.random::<u64>();
        let gamertag = std::mem::take(&mut self.gamertag);
        let masks = std::mem::take(&mut self.masks);
        let tuning = self.tuning.clone();
        *self = GameState::new(seed, tuning).with_masks(masks);
        self.gamertag = gamertag;
        log::info!("Restarting with seed {seed}");
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
