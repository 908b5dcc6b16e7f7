#![forbid(unsafe_code)]

//! Host boundary.
//!
//! The controller never touches a view. It reports what the sheet and dim
//! overlay should look like through [`SheetHost`], and the host applies it to
//! whatever UI toolkit it runs on.
//!
//! # Contract
//!
//! 1. `on_attach` fires once per [`attach`](crate::controller::DragController::attach)
//!    and is immediately followed by the settled geometry and dim alpha.
//! 2. `on_geometry_change` and `on_dim_alpha_change` fire together on every
//!    accepted drag sample, never on a rejected one.
//! 3. `on_animate_request` fires exactly once per finished or cancelled
//!    gesture. The host must call
//!    [`animation_finished`](crate::controller::DragController::animation_finished)
//!    when the animation settles.

use std::time::Duration;

use crate::config::AnimationConfig;
use crate::geometry::Size;
use crate::position::Position;

/// Spring curve parameters attached to an animate command.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpringTiming {
    pub damping_ratio: f64,
    /// Initial velocity relative to the travel distance, per second.
    pub initial_velocity: f64,
}

/// Request to animate the sheet and overlay to a settled position.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnimateCommand {
    pub target: Position,
    /// Origin the sheet is visually at when the command is issued.
    pub from_origin_y: f64,
    pub target_origin_y: f64,
    /// Dim alpha the overlay is visually at when the command is issued.
    pub from_dim_alpha: f64,
    pub target_dim_alpha: f64,
    #[cfg_attr(feature = "serde", serde(with = "crate::config::duration_ms"))]
    pub duration: Duration,
    pub spring: SpringTiming,
}

impl AnimateCommand {
    /// Build a command settling at `target` inside a container of
    /// `container_height`, starting from the given visual state.
    #[must_use]
    pub fn settle(
        target: Position,
        container_height: f64,
        from_origin_y: f64,
        from_dim_alpha: f64,
        animation: &AnimationConfig,
    ) -> Self {
        Self {
            target,
            from_origin_y,
            target_origin_y: target.y_origin(container_height),
            from_dim_alpha,
            target_dim_alpha: target.dim_alpha(),
            duration: animation.duration,
            spring: SpringTiming {
                damping_ratio: animation.damping_ratio,
                initial_velocity: animation.initial_velocity,
            },
        }
    }

    /// Vertical distance the sheet travels.
    #[inline]
    #[must_use]
    pub fn travel(&self) -> f64 {
        self.target_origin_y - self.from_origin_y
    }
}

/// Callbacks the controller drives. All values are in logical points.
pub trait SheetHost {
    /// The sheet was attached to a container of `size`; insert the dim layer
    /// and sheet surface.
    fn on_attach(&mut self, size: Size);

    /// The sheet was detached; remove the dim layer and sheet surface.
    fn on_detach(&mut self) {}

    /// Move the sheet's top edge to `origin_y`.
    fn on_geometry_change(&mut self, origin_y: f64);

    /// Set the dim overlay opacity, in `[0, 1]`.
    fn on_dim_alpha_change(&mut self, alpha: f64);

    /// Start animating to a settled position.
    fn on_animate_request(&mut self, command: &AnimateCommand);

    /// A new gesture took over from a running animation; stop it where it is.
    fn on_animation_interrupted(&mut self) {}
}

impl<H: SheetHost + ?Sized> SheetHost for &mut H {
    fn on_attach(&mut self, size: Size) {
        (**self).on_attach(size);
    }

    fn on_detach(&mut self) {
        (**self).on_detach();
    }

    fn on_geometry_change(&mut self, origin_y: f64) {
        (**self).on_geometry_change(origin_y);
    }

    fn on_dim_alpha_change(&mut self, alpha: f64) {
        (**self).on_dim_alpha_change(alpha);
    }

    fn on_animate_request(&mut self, command: &AnimateCommand) {
        (**self).on_animate_request(command);
    }

    fn on_animation_interrupted(&mut self) {
        (**self).on_animation_interrupted();
    }
}
