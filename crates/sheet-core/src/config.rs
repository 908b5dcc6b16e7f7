#![forbid(unsafe_code)]

//! Controller and animation configuration.
//!
//! Defaults reproduce the stock sheet: rests at `Middle`, flings past
//! 1000 pt/s skip distance snapping, settles with a 600 ms spring at damping
//! ratio 0.7.

use std::time::Duration;

use crate::error::{Result, SheetError};
use crate::position::Position;

/// What happens when a gesture begins while a settle animation is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum InterruptPolicy {
    /// Ignore the whole gesture until the animation reports completion.
    #[default]
    Block,
    /// Abandon the running animation and track the finger immediately.
    Interrupt,
}

/// Spring parameters for the settle animation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AnimationConfig {
    /// Suggested settle duration (default: 600ms).
    #[cfg_attr(feature = "serde", serde(with = "duration_ms"))]
    pub duration: Duration,
    /// Damping ratio; 1.0 is critical (default: 0.7).
    pub damping_ratio: f64,
    /// Initial velocity relative to the travel distance, per second
    /// (default: 10.0).
    pub initial_velocity: f64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(600),
            damping_ratio: 0.7,
            initial_velocity: 10.0,
        }
    }
}

impl AnimationConfig {
    /// Check invariants.
    pub fn validate(&self) -> Result<()> {
        if self.duration.is_zero() {
            return Err(SheetError::invalid_config("duration", "must be non-zero"));
        }
        if !self.damping_ratio.is_finite() || self.damping_ratio <= 0.0 {
            return Err(SheetError::invalid_config(
                "damping_ratio",
                "must be finite and positive",
            ));
        }
        if !self.initial_velocity.is_finite() {
            return Err(SheetError::invalid_config(
                "initial_velocity",
                "must be finite",
            ));
        }
        Ok(())
    }
}

/// Configuration for [`DragController`](crate::controller::DragController).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SheetConfig {
    /// Position the sheet rests at when first attached (default: Middle).
    pub initial_position: Position,
    /// Speed in points/sec past which a gesture end commits to the adjacent
    /// position regardless of distance (default: 1000.0).
    pub fling_velocity: f64,
    /// Clamp live geometry to `[0, container height]` while dragging
    /// (default: true).
    pub clamp_live_origin: bool,
    /// Extra sheet height below the container edge (default: 40.0).
    pub overhang: f64,
    pub interrupt_policy: InterruptPolicy,
    pub animation: AnimationConfig,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            initial_position: Position::Middle,
            fling_velocity: 1000.0,
            clamp_live_origin: true,
            overhang: 40.0,
            interrupt_policy: InterruptPolicy::Block,
            animation: AnimationConfig::default(),
        }
    }
}

impl SheetConfig {
    #[must_use]
    pub fn with_initial_position(mut self, position: Position) -> Self {
        self.initial_position = position;
        self
    }

    #[must_use]
    pub fn with_fling_velocity(mut self, velocity: f64) -> Self {
        self.fling_velocity = velocity;
        self
    }

    #[must_use]
    pub fn with_clamp_live_origin(mut self, clamp: bool) -> Self {
        self.clamp_live_origin = clamp;
        self
    }

    #[must_use]
    pub fn with_overhang(mut self, overhang: f64) -> Self {
        self.overhang = overhang;
        self
    }

    #[must_use]
    pub fn with_interrupt_policy(mut self, policy: InterruptPolicy) -> Self {
        self.interrupt_policy = policy;
        self
    }

    #[must_use]
    pub fn with_animation(mut self, animation: AnimationConfig) -> Self {
        self.animation = animation;
        self
    }

    /// Check invariants. Called by the controller on construction.
    pub fn validate(&self) -> Result<()> {
        if !self.fling_velocity.is_finite() || self.fling_velocity <= 0.0 {
            return Err(SheetError::invalid_config(
                "fling_velocity",
                "must be finite and positive",
            ));
        }
        if !self.overhang.is_finite() || self.overhang < 0.0 {
            return Err(SheetError::invalid_config(
                "overhang",
                "must be finite and non-negative",
            ));
        }
        self.animation.validate()
    }
}

/// Serde adapter storing a `Duration` as whole milliseconds.
#[cfg(feature = "serde")]
pub(crate) mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
