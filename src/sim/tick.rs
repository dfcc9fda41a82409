//! Per-frame simulation step
//!
//! Advances the session by one variable frame delta in a fixed order:
//! background, input prediction, steering, then waves, spawns and collisions
//! while the ship is alive, score, entity updates, sweep, alert timing and
//! finally the end-of-round check.

use super::collision::resolve_collisions;
use super::predictor::HandSensor;
use super::spawner::spawn_frame;
use super::state::{GameEvent, GamePhase, GameState};
use super::wave::WaveTransition;
use crate::consts::MAX_FRAME_DT;

/// Input commands for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Window close or quit key
    pub quit: bool,
}

/// Advance the session by one frame
pub fn tick<S: HandSensor + ?Sized>(
    state: &mut GameState,
    sensor: &mut S,
    input: &TickInput,
    dt: f32,
) {
    let dt = dt.clamp(0.0, MAX_FRAME_DT);

    match state.phase {
        GamePhase::Loading => {
            state.loading.advance(dt);
            return;
        }
        GamePhase::GameOver => return,
        GamePhase::Playing => {}
    }

    if input.quit {
        log::info!("Quit requested");
        state.end_round();
        return;
    }

    state.elapsed += dt;
    state.background.update(dt);

    let target = state.predictor.update(sensor, dt);
    let screen = state.screen;
    state.ship.steer(target, dt, screen);

    if !state.ship.exploding {
        step_hazards(state, dt);
        state.score = state.elapsed.max(0.0).floor() as u64;
    }

    state.ship.update(dt);
    for entity in state.arena.iter_mut() {
        entity.update(dt, screen.y);
    }
    state.arena.sweep();

    state.alert.update(dt);

    if state.ship.explosion_complete()
        && state.arena.asteroid_count() == 0
        && state.arena.shield_count() == 0
    {
        state.end_round();
    }
}

/// Waves, spawning and collisions for a live ship
fn step_hazards(state: &mut GameState, dt: f32) {
    if let Some(transition) = state.wave.update(state.elapsed) {
        state
            .alert
            .show(transition.alert_text(), state.tuning.presentation.alert_duration);
        state.events.push(match transition {
            WaveTransition::Started { wave, .. } => GameEvent::WaveIncoming { wave },
            WaveTransition::Ended { wave } => GameEvent::WaveEnded { wave },
        });
    }

    let GameState {
        rng,
        wave,
        arena,
        tuning,
        screen,
        ..
    } = state;
    spawn_frame(rng, wave, arena, &tuning.spawn, dt, screen.x);

    let report = resolve_collisions(&mut state.ship, &mut state.arena, &state.masks);
    for (_, size) in report.impacts {
        state.events.push(GameEvent::AsteroidImpact { size });
    }
    for (_, kind) in report.pickups {
        state.events.push(GameEvent::ShieldPickup { kind });
    }
    if report.ship_destroyed {
        state.events.push(GameEvent::ShipExploded);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SensorError;
    use crate::sim::entity::{Asteroid, EntityKind, Shield, ShieldKind, SizeClass};
    use crate::tuning::Tuning;
    use glam::Vec2;

    /// Sensor pinned to one normalized point
    struct Steady(Vec2);

    impl HandSensor for Steady {
        fn open(&mut self) -> Result<(), SensorError> {
            Ok(())
        }

        fn read(&mut self) -> Option<Vec2> {
            Some(self.0)
        }
    }

    /// Sensor tracing a slow figure eight
    struct Sweep {
        t: f32,
    }

    impl HandSensor for Sweep {
        fn open(&mut self) -> Result<(), SensorError> {
            Ok(())
        }

        fn read(&mut self) -> Option<Vec2> {
            self.t += 1.0 / 60.0;
            Some(Vec2::new(
                0.5 + 0.4 * (self.t * 0.7).sin(),
                0.6 + 0.2 * (self.t * 1.4).sin(),
            ))
        }
    }

    fn quiet_tuning() -> Tuning {
        let mut tuning = Tuning::default();
        tuning.spawn.idle_asteroid_rate = 0.0;
        tuning.spawn.wave_asteroid_rate = 0.0;
        tuning.spawn.shield1_rate = 0.0;
        tuning.spawn.shield2_rate = 0.0;
        tuning
    }

    fn playing(seed: u64, tuning: Tuning) -> GameState {
        let mut state = GameState::new(seed, tuning);
        let mut sensor = Steady(Vec2::splat(0.5));
        while state.phase == GamePhase::Loading {
            tick(&mut state, &mut sensor, &TickInput::default(), 1.0 / 60.0);
            if state.loading.is_complete() {
                state.begin_round(&mut sensor).unwrap();
            }
        }
        state.drain_events();
        state
    }

    #[test]
    fn test_loading_advances_without_simulating() {
        let mut state = GameState::new(1, Tuning::default());
        let mut sensor = Steady(Vec2::new(0.1, 0.1));
        tick(&mut state, &mut sensor, &TickInput::default(), 0.05);
        assert_eq!(state.phase, GamePhase::Loading);
        assert!(state.loading.fraction() > 0.0);
        assert_eq!(state.elapsed, 0.0);
        assert_eq!(state.ship.pos, Vec2::new(640.0, 360.0));
    }

    #[test]
    fn test_frame_delta_is_clamped() {
        let mut state = playing(1, quiet_tuning());
        tick(&mut state, &mut Steady(Vec2::splat(0.5)), &TickInput::default(), 5.0);
        assert!((state.elapsed - MAX_FRAME_DT).abs() < 1e-6);
    }

    #[test]
    fn test_score_is_whole_seconds() {
        let mut state = playing(1, quiet_tuning());
        let mut sensor = Steady(Vec2::splat(0.5));
        for _ in 0..30 {
            tick(&mut state, &mut sensor, &TickInput::default(), 0.05);
        }
        assert_eq!(state.score, 1);
    }

    #[test]
    fn test_ship_follows_hand() {
        let mut state = playing(1, quiet_tuning());
        let mut sensor = Steady(Vec2::new(0.25, 0.5));
        for _ in 0..180 {
            tick(&mut state, &mut sensor, &TickInput::default(), 1.0 / 60.0);
        }
        // Within the steering deadband of the hand
        assert!((state.ship.pos.x - 320.0).abs() <= 4.0, "x={}", state.ship.pos.x);
        assert!((state.ship.pos.y - 360.0).abs() <= 4.0);
    }

    #[test]
    fn test_wave_start_raises_alert() {
        let mut state = playing(1, quiet_tuning());
        let mut sensor = Steady(Vec2::splat(0.5));
        for _ in 0..305 {
            tick(&mut state, &mut sensor, &TickInput::default(), 0.1);
        }
        assert!(state.wave.is_active());
        assert!(state.drain_events().contains(&GameEvent::WaveIncoming { wave: 1 }));
        assert_eq!(state.alert.text(), Some("wave incoming!"));
    }

    #[test]
    fn test_lethal_hit_freezes_score_then_game_over() {
        let mut state = playing(3, quiet_tuning());
        let mut sensor = Steady(Vec2::splat(0.5));
        for _ in 0..45 {
            tick(&mut state, &mut sensor, &TickInput::default(), 0.05);
        }
        assert_eq!(state.score, 2);

        state.ship.health = 1.0;
        let ship_pos = state.ship.pos;
        state.arena.spawn(EntityKind::Asteroid(Asteroid {
            pos: ship_pos,
            dir: Vec2::Y,
            speed: 0.0,
            size: SizeClass::Large,
            rotation: 0.0,
            rotation_rate: 0.0,
        }));
        // Slow pickup still on screen after the explosion ends
        state.arena.spawn(EntityKind::Shield(Shield {
            pos: Vec2::new(100.0, 600.0),
            dir: Vec2::Y,
            speed: 50.0,
            kind: ShieldKind::Temporary,
        }));

        tick(&mut state, &mut sensor, &TickInput::default(), 0.05);
        assert!(state.ship.exploding);
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::AsteroidImpact {
            size: SizeClass::Large
        }));
        assert!(events.contains(&GameEvent::ShipExploded));
        let frozen = state.score;

        for _ in 0..30 {
            tick(&mut state, &mut sensor, &TickInput::default(), 0.05);
        }
        assert!(state.ship.explosion_complete());
        assert_eq!(state.phase, GamePhase::Playing, "waits for the pickup to leave");

        for _ in 0..60 {
            tick(&mut state, &mut sensor, &TickInput::default(), 0.05);
        }
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.score, frozen);
        assert!(state.drain_events().contains(&GameEvent::GameOver { score: frozen }));
    }

    #[test]
    fn test_exploding_ship_stops_spawns_and_collisions() {
        let mut tuning = quiet_tuning();
        // One asteroid every frame while the ship is alive
        tuning.spawn.idle_asteroid_rate = 1000.0;
        let mut state = playing(4, tuning);
        let mut sensor = Steady(Vec2::splat(0.5));

        tick(&mut state, &mut sensor, &TickInput::default(), 0.05);
        assert_eq!(state.arena.asteroid_count(), 1);

        let ship_pos = state.ship.pos;
        let pickup = state.arena.spawn(EntityKind::Shield(Shield {
            pos: ship_pos,
            dir: Vec2::Y,
            speed: 0.0,
            kind: ShieldKind::Permanent,
        }));
        state.ship.health = 0.0;
        assert!(state.ship.start_explosion());
        let shield = state.ship.shield;
        let score = state.score;
        state.drain_events();

        for _ in 0..10 {
            tick(&mut state, &mut sensor, &TickInput::default(), 0.05);
            assert!(state.arena.iter().all(|e| e.id <= pickup), "spawned while exploding");
        }
        // The pickup under the wreck is never collected
        assert!(state.arena.get(pickup).is_some_and(|e| e.is_live()));
        assert_eq!(state.ship.shield, shield);
        assert_eq!(state.score, score);
        assert!(state.drain_events().iter().all(|e| !matches!(
            e,
            GameEvent::AsteroidImpact { .. } | GameEvent::ShieldPickup { .. }
        )));
    }

    #[test]
    fn test_quit_ends_round() {
        let mut state = playing(1, quiet_tuning());
        let mut sensor = Steady(Vec2::splat(0.5));
        tick(&mut state, &mut sensor, &TickInput { quit: true }, 1.0 / 60.0);
        assert_eq!(state.phase, GamePhase::GameOver);

        // Nothing moves after the round is over
        let elapsed = state.elapsed;
        tick(&mut state, &mut sensor, &TickInput::default(), 1.0 / 60.0);
        assert_eq!(state.elapsed, elapsed);
    }

    #[test]
    fn test_entities_leave_the_arena() {
        let mut state = playing(1, quiet_tuning());
        let mut sensor = Steady(Vec2::new(0.1, 0.9));
        state.arena.spawn(EntityKind::Asteroid(Asteroid {
            pos: Vec2::new(1200.0, 700.0),
            dir: Vec2::Y,
            speed: 400.0,
            size: SizeClass::Small,
            rotation: 0.0,
            rotation_rate: 30.0,
        }));
        for _ in 0..10 {
            tick(&mut state, &mut sensor, &TickInput::default(), 0.05);
        }
        assert!(state.arena.is_empty());
        assert_eq!(state.arena.iter().count(), 0);
    }

    #[test]
    fn test_determinism() {
        // Two sessions with the same seed and inputs evolve identically
        let mut a = playing(99999, Tuning::default());
        let mut b = playing(99999, Tuning::default());
        let mut sensor_a = Sweep { t: 0.0 };
        let mut sensor_b = Sweep { t: 0.0 };

        for _ in 0..2400 {
            tick(&mut a, &mut sensor_a, &TickInput::default(), 1.0 / 60.0);
            tick(&mut b, &mut sensor_b, &TickInput::default(), 1.0 / 60.0);
        }

        assert_eq!(a.phase, b.phase);
        assert_eq!(a.score, b.score);
        assert_eq!(a.ship.health, b.ship.health);
        assert_eq!(a.ship.shield, b.ship.shield);
        assert_eq!(a.ship.pos, b.ship.pos);
        assert_eq!(a.wave.wave_number, b.wave.wave_number);
        assert_eq!(a.arena, b.arena);
        assert_eq!(a.events, b.events);
    }
}
