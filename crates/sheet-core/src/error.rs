#![forbid(unsafe_code)]

//! Error types.
//!
//! Position logic itself is total: every translation, velocity, and starting
//! position has a defined outcome. The variants here cover precondition
//! violations at the host boundary and invalid configuration.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SheetError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SheetError {
    #[error("gesture received before a container size was attached")]
    NotAttached,

    #[error("container size must be finite and positive (got {width}x{height})")]
    InvalidContainer { width: f64, height: f64 },

    #[error("invalid config field `{field}`: {reason}")]
    InvalidConfig {
        field: &'static str,
        reason: &'static str,
    },

    #[error("an animation is already in flight and the policy forbids interrupting it")]
    AnimationInFlight,
}

impl SheetError {
    #[must_use]
    pub fn invalid_config(field: &'static str, reason: &'static str) -> Self {
        Self::InvalidConfig { field, reason }
    }
}
