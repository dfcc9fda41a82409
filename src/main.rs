//! Astro Dodger entry point
//!
//! Headless demo: plays one round against a synthetic hand sensor at a fixed
//! frame rate and records the result on the local leaderboard.
//!
//! Usage: `astro-dodger [tuning.json]`, with `ASTRO_SEED` selecting the seed
//! and `RUST_LOG` the log level.

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Library-only on the web
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::error::Error;
    use std::time::{SystemTime, UNIX_EPOCH};

    use glam::Vec2;

    use astro_dodger::audio::{AudioManager, LogSink};
    use astro_dodger::consts::MAX_FPS;
    use astro_dodger::highscores::SHOWN_HIGH_SCORES;
    use astro_dodger::render::build_draw_list;
    use astro_dodger::sim::{GamePhase, GameState, HandSensor, TickInput, tick};
    use astro_dodger::ui::Hud;
    use astro_dodger::{HighScores, SensorError, Settings, Tuning};

    const DEMO_GAMERTAG: &str = "demo";
    const SETTINGS_PATH: &str = "astro_dodger_settings.json";
    const HIGHSCORES_PATH: &str = "astro_dodger_scores.json";
    /// Give up after five simulated minutes
    const MAX_FRAMES: u32 = 60 * 60 * 5;
    /// Frames between HUD log lines
    const REPORT_EVERY: u32 = 600;

    /// Hand that drifts around the lower half of the frame and now and then
    /// drops out of view
    #[derive(Default)]
    struct SweepSensor {
        t: f32,
        reads: u32,
    }

    impl HandSensor for SweepSensor {
        fn open(&mut self) -> Result<(), SensorError> {
            log::info!("Synthetic hand sensor ready");
            Ok(())
        }

        fn read(&mut self) -> Option<Vec2> {
            self.reads += 1;
            self.t += 1.0 / MAX_FPS;
            if self.reads % 23 == 0 {
                return None;
            }
            Some(Vec2::new(
                0.5 + 0.42 * (self.t * 0.9).sin(),
                0.7 + 0.15 * (self.t * 1.7).cos(),
            ))
        }
    }

    fn unix_now() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }

    pub fn run() -> Result<(), Box<dyn Error>> {
        env_logger::init();
        log::info!("Astro Dodger (headless) starting...");

        let tuning = match std::env::args().nth(1) {
            Some(path) => Tuning::load(&path)?,
            None => Tuning::default(),
        };
        let seed = match std::env::var("ASTRO_SEED") {
            Ok(raw) => raw.trim().parse::<u64>()?,
            Err(_) => SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(0),
        };
        log::info!("Seed {seed}");

        let settings = Settings::load_from(SETTINGS_PATH);
        let audio = AudioManager::new(settings.clone());
        let mut sink = LogSink;

        let mut state = GameState::new(seed, tuning);
        state.set_gamertag(DEMO_GAMERTAG)?;
        let mut sensor = SweepSensor::default();
        let dt = 1.0 / MAX_FPS;

        while !state.loading.is_complete() {
            if let Some(label) = state.loading.current_label() {
                log::debug!(
                    "{} {} ({:.0}%)",
                    state.loading.caption(),
                    label,
                    state.loading.fraction() * 100.0
                );
            }
            tick(&mut state, &mut sensor, &TickInput::default(), dt);
        }

        state.begin_round(&mut sensor)?;

        let mut frames = 0u32;
        while state.phase == GamePhase::Playing {
            let input = TickInput {
                quit: frames >= MAX_FRAMES,
            };
            tick(&mut state, &mut sensor, &input, dt);
            audio.dispatch(&state.drain_events(), &mut sink);

            if state.alert.visible(!settings.alert_blink()) {
                log::trace!("Banner: {}", state.alert.text().unwrap_or_default());
            }
            if frames % REPORT_EVERY == 0 {
                let hud = Hud::from_state(&state);
                log::info!(
                    "t={}s health={:.0}% shield={:.0}% wave={} sprites={}",
                    hud.score,
                    hud.health * 100.0,
                    hud.shield * 100.0,
                    hud.wave,
                    build_draw_list(&state).len()
                );
            }
            frames += 1;
        }

        let summary = state.summary();
        println!(
            "{} survived {}s and saw {} waves",
            summary.gamertag, summary.score, summary.waves
        );

        let mut scores = HighScores::load_from(HIGHSCORES_PATH);
        if let Some(rank) = scores.add_score(&summary, unix_now()) {
            println!("New high score! Rank #{rank}");
            scores.save_to(HIGHSCORES_PATH)?;
        }
        println!("High scores:");
        for (i, entry) in scores.top(SHOWN_HIGH_SCORES).iter().enumerate() {
            println!("{:>2}. {:<14} {:>5}s", i + 1, entry.gamertag, entry.score);
        }
        Ok(())
    }
}
