#![forbid(unsafe_code)]

//! Damped spring driving normalized settle progress from 0.0 to 1.0.
//!
//! Settle animations are expressed the way touch toolkits describe them: a
//! duration plus a damping ratio. [`Spring::settle`] converts that pair into
//! coefficients for
//!
//!   F = -stiffness × (progress - 1) - damping × velocity
//!
//! with `stiffness = (2π / duration)²` and `damping = 2ζ√stiffness`.
//!
//! # Integration
//!
//! Semi-implicit Euler, subdivided into steps of at most 4ms so a long frame
//! cannot blow up a stiff spring. Steps are counted on the integer
//! [`Duration`], and the spring stops integrating the moment it comes to rest.
//!
//! # Invariants
//!
//! 1. `progress()` is raw and may overshoot 1.0 while the spring bounces.
//! 2. Once at rest, progress is exactly 1.0 and further `advance` calls are
//!    no-ops.
//! 3. Stiffness is at least 0.1 and damping is never negative.

use std::time::Duration;

const MAX_STEP: Duration = Duration::from_millis(4);

/// Distance from 1.0 below which the spring may come to rest.
const REST_THRESHOLD: f64 = 0.001;

/// Speed below which (together with the distance) the spring is at rest.
const VELOCITY_THRESHOLD: f64 = 0.01;

const MIN_STIFFNESS: f64 = 0.1;

const TARGET: f64 = 1.0;

/// Normalized settle spring.
#[derive(Debug, Clone)]
pub struct Spring {
    progress: f64,
    velocity: f64,
    stiffness: f64,
    damping: f64,
    at_rest: bool,
}

impl Spring {
    /// Spring at progress 0.0 with explicit coefficients.
    #[must_use]
    pub fn with_coefficients(stiffness: f64, damping: f64) -> Self {
        Self {
            progress: 0.0,
            velocity: 0.0,
            stiffness: stiffness.max(MIN_STIFFNESS),
            damping: damping.max(0.0),
            at_rest: false,
        }
    }

    /// Spring whose period matches `duration` at the given damping ratio.
    #[must_use]
    pub fn settle(damping_ratio: f64, duration: Duration) -> Self {
        let secs = duration.as_secs_f64().max(f64::EPSILON);
        let omega = std::f64::consts::TAU / secs;
        let stiffness = omega * omega;
        Self::with_coefficients(stiffness, 2.0 * damping_ratio * stiffness.sqrt())
    }

    #[inline]
    #[must_use]
    pub fn progress(&self) -> f64 {
        self.progress
    }

    #[inline]
    #[must_use]
    pub fn stiffness(&self) -> f64 {
        self.stiffness
    }

    #[inline]
    #[must_use]
    pub fn damping(&self) -> f64 {
        self.damping
    }

    /// Damping ratio ζ = c / (2√k).
    #[must_use]
    pub fn damping_ratio(&self) -> f64 {
        self.damping / (2.0 * self.stiffness.sqrt())
    }

    /// Add to velocity, in progress units per second. Wakes the spring.
    pub fn impulse(&mut self, velocity_delta: f64) {
        self.velocity += velocity_delta;
        self.at_rest = false;
    }

    #[inline]
    #[must_use]
    pub fn is_at_rest(&self) -> bool {
        self.at_rest
    }

    /// Advance by `dt` in sub-steps of at most 4ms.
    pub fn advance(&mut self, dt: Duration) {
        let mut remaining = dt;
        while !self.at_rest && !remaining.is_zero() {
            let step = remaining.min(MAX_STEP);
            remaining -= step;
            self.step(step.as_secs_f64());
        }
    }

    fn step(&mut self, dt: f64) {
        let displacement = self.progress - TARGET;
        let acceleration = -self.stiffness * displacement - self.damping * self.velocity;
        self.velocity += acceleration * dt;
        self.progress += self.velocity * dt;

        if (self.progress - TARGET).abs() < REST_THRESHOLD
            && self.velocity.abs() < VELOCITY_THRESHOLD
        {
            self.progress = TARGET;
            self.velocity = 0.0;
            self.at_rest = true;
        }
    }
}
