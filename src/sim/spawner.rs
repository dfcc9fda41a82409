//! Procedural spawning of asteroids and shield pickups
//!
//! Spawn chances are rates per second scaled by the frame delta, so the
//! expected traffic does not depend on frame rate.

use glam::Vec2;
use rand::Rng;

use super::entity::{Asteroid, EntityArena, EntityKind, Shield, ShieldKind, SizeClass};
use super::wave::WaveDirector;
use crate::tuning::SpawnTuning;

/// What a single spawn pass created
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpawnReport {
    pub asteroids: Vec<u32>,
    pub shields: Vec<(u32, ShieldKind)>,
}

impl SpawnReport {
    pub fn is_empty(&self) -> bool {
        self.asteroids.is_empty() && self.shields.is_empty()
    }
}

/// Roll this frame's spawns. The caller only invokes this while the round is
/// live and the ship is not exploding.
pub fn spawn_frame<R: Rng + ?Sized>(
    rng: &mut R,
    wave: &mut WaveDirector,
    arena: &mut EntityArena,
    tuning: &SpawnTuning,
    dt: f32,
    screen_width: f32,
) -> SpawnReport {
    let mut report = SpawnReport::default();

    let rate = if wave.is_active() {
        tuning.wave_asteroid_rate
    } else {
        tuning.idle_asteroid_rate
    };
    if rng.random::<f32>() < rate * dt {
        let asteroid = roll_asteroid(rng, tuning, screen_width);
        log::debug!(
            "Asteroid {:?} at x={:.0} speed={:.0}",
            asteroid.size,
            asteroid.pos.x,
            asteroid.speed
        );
        report
            .asteroids
            .push(arena.spawn(EntityKind::Asteroid(asteroid)));
    }

    if wave.is_active() {
        if wave.shield1_spawned < tuning.shield1_per_wave
            && rng.random::<f32>() < tuning.shield1_rate * dt
        {
            let shield = roll_shield(rng, tuning, screen_width, ShieldKind::Temporary);
            report.shields.push((
                arena.spawn(EntityKind::Shield(shield)),
                ShieldKind::Temporary,
            ));
            wave.shield1_spawned += 1;
            log::debug!(
                "Temporary shield dropped ({}/{})",
                wave.shield1_spawned,
                tuning.shield1_per_wave
            );
        }

        if !wave.shield2_spawned && rng.random::<f32>() < tuning.shield2_rate * dt {
            let shield = roll_shield(rng, tuning, screen_width, ShieldKind::Permanent);
            report.shields.push((
                arena.spawn(EntityKind::Shield(shield)),
                ShieldKind::Permanent,
            ));
            wave.shield2_spawned = true;
            log::debug!("Permanent shield dropped in wave {}", wave.wave_number);
        }
    }

    report
}

/// Bounds in ascending order, so a swapped pair still yields a valid range
fn ordered<T: PartialOrd>(a: T, b: T) -> (T, T) {
    if a <= b { (a, b) } else { (b, a) }
}

/// Random position on the spawn line above the top edge
fn spawn_point<R: Rng + ?Sized>(rng: &mut R, tuning: &SpawnTuning, screen_width: f32) -> Vec2 {
    let x = rng.random_range(0..=screen_width.max(0.0) as u32) as f32;
    Vec2::new(x, tuning.spawn_y)
}

/// Mostly downward direction with some sideways drift
fn fall_direction<R: Rng + ?Sized>(rng: &mut R, tuning: &SpawnTuning) -> Vec2 {
    let drift = tuning.max_drift.abs();
    Vec2::new(rng.random_range(-drift..=drift), 1.0).normalize()
}

fn roll_asteroid<R: Rng + ?Sized>(rng: &mut R, tuning: &SpawnTuning, screen_width: f32) -> Asteroid {
    let pos = spawn_point(rng, tuning, screen_width);
    let size = SizeClass::ALL[rng.random_range(0..SizeClass::ALL.len())];
    let dir = fall_direction(rng, tuning);
    let (lo, hi) = ordered(tuning.asteroid_speed_min, tuning.asteroid_speed_max);
    let speed = rng.random_range(lo..=hi);
    let (lo, hi) = ordered(tuning.rotation_rate_min, tuning.rotation_rate_max);
    let rotation_rate = rng.random_range(lo..=hi) as f32;
    Asteroid {
        pos,
        dir,
        speed,
        size,
        rotation: 0.0,
        rotation_rate,
    }
}

fn roll_shield<R: Rng + ?Sized>(
    rng: &mut R,
    tuning: &SpawnTuning,
    screen_width: f32,
    kind: ShieldKind,
) -> Shield {
    let pos = spawn_point(rng, tuning, screen_width);
    let dir = fall_direction(rng, tuning);
    let (lo, hi) = ordered(tuning.shield_speed_min, tuning.shield_speed_max);
    let speed = rng.random_range(lo..=hi);
    Shield {
        pos,
        dir,
        speed,
        kind,
    }
}
