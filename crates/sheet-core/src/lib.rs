// Forbid unsafe in production; deny in tests.
#![cfg_attr(not(test), forbid(unsafe_code))]
#![cfg_attr(test, deny(unsafe_code))]

//! Core: drag-to-position state machine for a three-position bottom sheet.
//!
//! # Role
//! `sheet-core` owns every decision the sheet makes: where each resting
//! position sits, which position a finished gesture snaps to, and what the
//! live geometry and dim opacity are while a finger is down. Everything that
//! touches pixels goes through the [`host::SheetHost`] trait, so the crate
//! has no dependency on any UI framework.
//!
//! # Primary responsibilities
//! - **Position model**: resting heights, snap boundaries, adjacency table.
//! - **DragController**: consumes [`event::GestureEvent`]s, emits live
//!   geometry and one [`host::AnimateCommand`] per finished gesture.
//! - **SheetAnimator**: an in-process spring engine that executes commands.
//! - **TouchForwarder**: hit testing that lets touches fall through the
//!   overlay to content behind the sheet.
//!
//! # How it fits together
//! Host input → [`controller::DragController`] → [`position::Position`]
//! lookups → host callbacks (live) or an animate command (terminal) →
//! [`animation::SheetAnimator`] or the host's own animation engine.

pub mod animation;
pub mod config;
pub mod controller;
pub mod error;
pub mod event;
pub mod geometry;
pub mod host;
pub mod logging;
pub mod passthrough;
pub mod position;

pub use animation::{SheetAnimator, SheetFrame};
pub use config::{AnimationConfig, InterruptPolicy, SheetConfig};
pub use controller::{DragController, DragResponse};
pub use error::{Result, SheetError};
pub use event::{GestureEvent, GesturePhase};
pub use geometry::{Point, Rect, Size};
pub use host::{AnimateCommand, SheetHost, SpringTiming};
pub use passthrough::{Hit, HitTarget, Region, TouchForwarder};
pub use position::{Direction, Position};

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, info, trace, warn};
