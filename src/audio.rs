//! Sound triggers derived from simulation events
//!
//! The simulation never touches an audio device. Each frame's events map to
//! named effects with a base volume and repeat count, scaled by the player's
//! settings and handed to whatever [`AudioSink`] the platform provides.

use crate::settings::Settings;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Asteroid hits the ship
    AsteroidImpact,
    /// Shield pickup collected
    ShieldPickup,
    /// Wave starts
    Alert,
    /// Ship destroyed
    Explosion,
    /// Background music
    BackgroundTrack,
}

/// How many times an effect plays
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repeat {
    Times(u32),
    Forever,
}

impl SoundEffect {
    /// Asset name the sink should play
    pub fn name(self) -> &'static str {
        match self {
            SoundEffect::AsteroidImpact => "asteroid_impact",
            SoundEffect::ShieldPickup => "shield_pickup",
            SoundEffect::Alert => "alert",
            SoundEffect::Explosion => "explosion",
            SoundEffect::BackgroundTrack => "bg_track",
        }
    }

    /// Mix level before settings are applied
    pub fn base_volume(self) -> f32 {
        match self {
            SoundEffect::AsteroidImpact => 0.2,
            SoundEffect::ShieldPickup => 0.2,
            SoundEffect::Alert => 0.2,
            SoundEffect::Explosion => 0.4,
            SoundEffect::BackgroundTrack => 0.06,
        }
    }

    pub fn repeat(self) -> Repeat {
        match self {
            SoundEffect::Alert => Repeat::Times(3),
            SoundEffect::BackgroundTrack => Repeat::Forever,
            _ => Repeat::Times(1),
        }
    }

    pub fn is_music(self) -> bool {
        self == SoundEffect::BackgroundTrack
    }

    /// Effect triggered by a simulation event, if any
    pub fn for_event(event: &GameEvent) -> Option<SoundEffect> {
        match event {
            GameEvent::AsteroidImpact { .. } => Some(SoundEffect::AsteroidImpact),
            GameEvent::ShieldPickup { .. } => Some(SoundEffect::ShieldPickup),
            GameEvent::WaveIncoming { .. } => Some(SoundEffect::Alert),
            GameEvent::ShipExploded => Some(SoundEffect::Explosion),
            GameEvent::BackgroundLoop => Some(SoundEffect::BackgroundTrack),
            // The end of a wave only changes the banner
            GameEvent::WaveEnded { .. } | GameEvent::GameOver { .. } => None,
        }
    }
}

/// Platform audio output
pub trait AudioSink {
    fn play(&mut self, name: &'static str, volume: f32, repeat: Repeat);

    /// Silence everything, including looping music
    fn stop_all(&mut self) {}
}

/// Sink that only logs what would play
#[derive(Debug, Default)]
pub struct LogSink;

impl AudioSink for LogSink {
    fn play(&mut self, name: &'static str, volume: f32, repeat: Repeat) {
        log::debug!("play {name} at {volume:.3} ({repeat:?})");
    }

    fn stop_all(&mut self) {
        log::debug!("stop all audio");
    }
}

/// Audio manager for the game
#[derive(Debug, Clone, Default)]
pub struct AudioManager {
    settings: Settings,
}

impl AudioManager {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Final volume for an effect
    pub fn volume_for(&self, effect: SoundEffect) -> f32 {
        let scale = if effect.is_music() {
            self.settings.effective_music_volume()
        } else {
            self.settings.effective_sfx_volume()
        };
        effect.base_volume() * scale
    }

    /// Play one effect
    pub fn play(&self, effect: SoundEffect, sink: &mut dyn AudioSink) {
        let volume = self.volume_for(effect);
        if volume <= 0.0 {
            return;
        }
        sink.play(effect.name(), volume, effect.repeat());
    }

    /// Play everything a frame's events call for
    pub fn dispatch(&self, events: &[GameEvent], sink: &mut dyn AudioSink) {
        for event in events {
            if let GameEvent::GameOver { .. } = event {
                sink.stop_all();
                continue;
            }
            if let Some(effect) = SoundEffect::for_event(event) {
                self.play(effect, sink);
            }
        }
    }
}
