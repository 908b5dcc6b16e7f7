#![forbid(unsafe_code)]

//! Gesture input events.
//!
//! The host translates raw touch or pointer input into [`GestureEvent`]s. A
//! gesture is one `Began`, any number of `Changed`, and exactly one `Ended`
//! or `Cancelled`.

/// Lifecycle phase of a pan gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum GesturePhase {
    Began,
    Changed,
    Ended,
    /// The system took the touch away (incoming call, competing recognizer).
    Cancelled,
}

impl GesturePhase {
    /// Whether this phase terminates the gesture.
    #[inline]
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Ended | Self::Cancelled)
    }
}

/// One vertical pan sample.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GestureEvent {
    /// Cumulative vertical translation since the gesture began, in points.
    /// Positive values move the sheet down.
    pub translation_y: f64,
    /// Vertical velocity in points per second. Negative is upward.
    pub velocity_y: f64,
    pub phase: GesturePhase,
}

impl GestureEvent {
    /// Create a new event.
    #[inline]
    pub const fn new(translation_y: f64, velocity_y: f64, phase: GesturePhase) -> Self {
        Self {
            translation_y,
            velocity_y,
            phase,
        }
    }

    /// Finger down, nothing moved yet.
    #[inline]
    pub const fn began() -> Self {
        Self::new(0.0, 0.0, GesturePhase::Began)
    }

    #[inline]
    pub const fn changed(translation_y: f64, velocity_y: f64) -> Self {
        Self::new(translation_y, velocity_y, GesturePhase::Changed)
    }

    #[inline]
    pub const fn ended(translation_y: f64, velocity_y: f64) -> Self {
        Self::new(translation_y, velocity_y, GesturePhase::Ended)
    }

    #[inline]
    pub const fn cancelled() -> Self {
        Self::new(0.0, 0.0, GesturePhase::Cancelled)
    }
}
