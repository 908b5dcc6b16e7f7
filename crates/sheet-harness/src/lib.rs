#![forbid(unsafe_code)]

//! Replay harness for the draggable sheet.
//!
//! Loads JSON gesture scripts, replays them against
//! [`sheet_core::DragController`] with a recording host and the in-process
//! spring animator, and reports every host call and animation frame as JSON
//! or JSONL.

pub mod cli;
pub mod error;
pub mod recording;
pub mod replay;

pub use cli::run_from_env;
pub use error::{HarnessError, Result};
pub use recording::{HostCall, RecordingHost};
pub use replay::{GestureScript, ReplayReport, ReportEntry, Step, TargetSpec, replay};
