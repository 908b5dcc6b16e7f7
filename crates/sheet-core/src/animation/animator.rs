#![forbid(unsafe_code)]

//! In-process settle animation engine.
//!
//! [`SheetAnimator`] executes one [`AnimateCommand`] at a time. Sheet origin
//! and dim alpha share a single normalized [`Spring`], so the overlay fades in
//! lockstep with the sheet's travel.
//!
//! # Invariants
//!
//! 1. At most one animation is driven at a time.
//! 2. `frame().dim_alpha` is always in `[0, 1]`; `frame().origin_y` may
//!    overshoot the target while the spring bounces.
//! 3. When the spring comes to rest the frame equals the command's target
//!    exactly and the animator is idle.
//! 4. Under [`InterruptPolicy::Block`] a second command while busy is refused;
//!    under [`InterruptPolicy::Interrupt`] it restarts from the current frame.

use std::time::Duration;

use super::{Animation, Spring};
use crate::config::InterruptPolicy;
use crate::error::{Result, SheetError};
use crate::host::AnimateCommand;
use crate::position::Position;

/// Visual state of the sheet and overlay at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SheetFrame {
    pub origin_y: f64,
    pub dim_alpha: f64,
}

impl SheetFrame {
    #[inline]
    pub const fn new(origin_y: f64, dim_alpha: f64) -> Self {
        Self {
            origin_y,
            dim_alpha,
        }
    }
}

#[derive(Debug, Clone)]
struct Active {
    from: SheetFrame,
    to: SheetFrame,
    target: Position,
    spring: Spring,
}

impl Active {
    fn sample(&self) -> SheetFrame {
        let t = self.spring.progress();
        let alpha = self.from.dim_alpha + (self.to.dim_alpha - self.from.dim_alpha) * t;
        SheetFrame {
            origin_y: self.from.origin_y + (self.to.origin_y - self.from.origin_y) * t,
            dim_alpha: alpha.clamp(0.0, 1.0),
        }
    }
}

/// Drives settle animations frame by frame.
#[derive(Debug, Clone)]
pub struct SheetAnimator {
    policy: InterruptPolicy,
    frame: SheetFrame,
    active: Option<Active>,
}

impl SheetAnimator {
    /// Create an idle animator showing `frame`.
    #[must_use]
    pub fn new(policy: InterruptPolicy, frame: SheetFrame) -> Self {
        Self {
            policy,
            frame,
            active: None,
        }
    }

    /// Start executing `command`.
    ///
    /// An idle animator starts from the command's `from_*` values. A busy one
    /// either refuses or restarts from wherever it currently is, depending on
    /// the policy.
    pub fn start(&mut self, command: &AnimateCommand) -> Result<()> {
        let from = if self.active.is_some() {
            match self.policy {
                InterruptPolicy::Block => return Err(SheetError::AnimationInFlight),
                InterruptPolicy::Interrupt => self.frame,
            }
        } else {
            SheetFrame::new(command.from_origin_y, command.from_dim_alpha)
        };

        let mut spring = Spring::settle(command.spring.damping_ratio, command.duration);
        spring.impulse(command.spring.initial_velocity);

        self.frame = from;
        self.active = Some(Active {
            from,
            to: SheetFrame::new(command.target_origin_y, command.target_dim_alpha),
            target: command.target,
            spring,
        });
        Ok(())
    }

    /// Advance by `dt` and return the new frame, or `None` when idle.
    pub fn advance(&mut self, dt: Duration) -> Option<SheetFrame> {
        let active = self.active.as_mut()?;
        active.spring.advance(dt);
        if active.spring.is_at_rest() {
            self.frame = active.to;
            self.active = None;
        } else {
            self.frame = active.sample();
        }
        Some(self.frame)
    }

    /// Stop where the sheet currently is. Returns the frame it stopped at,
    /// or `None` if nothing was running.
    pub fn interrupt(&mut self) -> Option<SheetFrame> {
        self.active.take().map(|_| self.frame)
    }

    /// Move the visual state without animating (live drag tracking).
    pub fn set_frame(&mut self, frame: SheetFrame) {
        self.frame = frame;
    }

    #[inline]
    #[must_use]
    pub fn frame(&self) -> SheetFrame {
        self.frame
    }

    #[inline]
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.active.is_none()
    }

    /// Position the running animation is heading to.
    #[must_use]
    pub fn target(&self) -> Option<Position> {
        self.active.as_ref().map(|a| a.target)
    }

    #[inline]
    #[must_use]
    pub fn policy(&self) -> InterruptPolicy {
        self.policy
    }
}

impl Animation for SheetAnimator {
    fn tick(&mut self, dt: Duration) {
        self.advance(dt);
    }

    fn is_complete(&self) -> bool {
        self.is_idle()
    }

    fn value(&self) -> f64 {
        self.active
            .as_ref()
            .map_or(1.0, |a| a.spring.progress().clamp(0.0, 1.0))
    }

    fn reset(&mut self) {
        self.active = None;
    }
}
