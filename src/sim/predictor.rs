//! Hand-tracking input smoothing and latency compensation
//!
//! The sensor is slow and noisy. Polling is rate-limited independently of the
//! render rate, and each accepted sample goes through three stages:
//! velocity smoothing, a short extrapolation ahead of the hand to hide sensor
//! latency, and a low-pass blend with the previous output.

use glam::Vec2;

use crate::error::SensorError;
use crate::tuning::PredictorTuning;

/// External hand-tracking device
pub trait HandSensor {
    /// Bring the device up. Called once before the round starts; failure is fatal.
    fn open(&mut self) -> Result<(), SensorError>;

    /// Latest tracked point in normalized image space ([0, 1] on both axes),
    /// or `None` if no hand was found or the frame could not be read.
    fn read(&mut self) -> Option<Vec2>;
}

impl<S: HandSensor + ?Sized> HandSensor for Box<S> {
    fn open(&mut self) -> Result<(), SensorError> {
        (**self).open()
    }

    fn read(&mut self) -> Option<Vec2> {
        (**self).read()
    }
}

/// Smoothed, predicted cursor driven by sensor samples
#[derive(Debug, Clone)]
pub struct InputPredictor {
    /// Current smoothed cursor (screen pixels)
    pub position: Vec2,
    /// Smoothed per-sample velocity (pixels per sample)
    pub velocity: Vec2,
    since_sample: f32,
    screen: Vec2,
    tuning: PredictorTuning,
}

impl InputPredictor {
    /// Start at the screen center, at rest
    pub fn new(screen: Vec2, tuning: &PredictorTuning) -> Self {
        Self {
            position: screen / 2.0,
            velocity: Vec2::ZERO,
            since_sample: 0.0,
            screen,
            tuning: tuning.clone(),
        }
    }

    /// Advance the sampling clock and, when a sample is due, poll the sensor.
    /// Returns the cursor position to steer toward this frame.
    pub fn update<S: HandSensor + ?Sized>(&mut self, sensor: &mut S, dt: f32) -> Vec2 {
        self.since_sample += dt;
        if self.since_sample >= self.tuning.sample_interval() {
            self.since_sample = 0.0;
            match sensor.read() {
                Some(normalized) => {
                    self.apply_sample(normalized * self.screen);
                }
                None => log::trace!("No hand in sample, holding cursor"),
            }
        }
        self.position
    }

    /// Fold one raw sample (screen pixels) into the filter
    pub fn apply_sample(&mut self, raw: Vec2) -> Vec2 {
        let decay = self.tuning.velocity_decay;
        let delta = raw - self.position;
        self.velocity = self.velocity * decay + delta * (1.0 - decay);

        let predicted = raw + self.velocity * self.tuning.prediction_factor;
        let alpha = self.tuning.smoothing_factor;
        self.position = predicted * alpha + self.position * (1.0 - alpha);
        self.position
    }
}
