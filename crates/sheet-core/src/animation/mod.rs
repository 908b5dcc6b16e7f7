#![forbid(unsafe_code)]

//! Animation primitives.
//!
//! The controller only *requests* animations. Hosts that lack a native
//! spring engine can hand each [`AnimateCommand`](crate::host::AnimateCommand)
//! to a [`SheetAnimator`] and pull frames from it on every display tick.

pub mod animator;
pub mod spring;

use std::time::Duration;

pub use animator::{SheetAnimator, SheetFrame};
pub use spring::Spring;

/// A time-driven animation.
pub trait Animation {
    /// Advance by `dt`.
    fn tick(&mut self, dt: Duration);

    /// Whether the animation has settled.
    fn is_complete(&self) -> bool;

    /// Normalized progress in `[0.0, 1.0]`.
    fn value(&self) -> f64;

    /// Return to the initial state.
    fn reset(&mut self);
}
