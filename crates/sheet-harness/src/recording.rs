#![forbid(unsafe_code)]

//! Host that records every callback the controller makes.

use serde::Serialize;
use sheet_core::{AnimateCommand, SheetHost, Size};

/// One host callback, in the order it was received.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum HostCall {
    Attach { width: f64, height: f64 },
    Detach,
    Geometry { origin_y: f64 },
    DimAlpha { alpha: f64 },
    Animate { command: AnimateCommand },
    AnimationInterrupted,
}

impl HostCall {
    /// Stable name matching the serialized `call` tag.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Attach { .. } => "attach",
            Self::Detach => "detach",
            Self::Geometry { .. } => "geometry",
            Self::DimAlpha { .. } => "dim_alpha",
            Self::Animate { .. } => "animate",
            Self::AnimationInterrupted => "animation_interrupted",
        }
    }
}

/// [`SheetHost`] that keeps a log of calls and nothing else.
#[derive(Debug, Default, Clone)]
pub struct RecordingHost {
    calls: Vec<HostCall>,
}

impl RecordingHost {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn calls(&self) -> &[HostCall] {
        &self.calls
    }

    /// Animate commands received so far.
    pub fn commands(&self) -> impl Iterator<Item = &AnimateCommand> {
        self.calls.iter().filter_map(|call| match call {
            HostCall::Animate { command } => Some(command),
            _ => None,
        })
    }

    /// Number of calls named `name`.
    #[must_use]
    pub fn count(&self, name: &str) -> usize {
        self.calls.iter().filter(|call| call.name() == name).count()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }

    #[must_use]
    pub fn into_calls(self) -> Vec<HostCall> {
        self.calls
    }
}

impl SheetHost for RecordingHost {
    fn on_attach(&mut self, size: Size) {
        self.calls.push(HostCall::Attach {
            width: size.width,
            height: size.height,
        });
    }

    fn on_detach(&mut self) {
        self.calls.push(HostCall::Detach);
    }

    fn on_geometry_change(&mut self, origin_y: f64) {
        self.calls.push(HostCall::Geometry { origin_y });
    }

    fn on_dim_alpha_change(&mut self, alpha: f64) {
        self.calls.push(HostCall::DimAlpha { alpha });
    }

    fn on_animate_request(&mut self, command: &AnimateCommand) {
        self.calls.push(HostCall::Animate { command: *command });
    }

    fn on_animation_interrupted(&mut self) {
        self.calls.push(HostCall::AnimationInterrupted);
    }
}
