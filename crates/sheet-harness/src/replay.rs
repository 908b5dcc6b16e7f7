#![forbid(unsafe_code)]

//! Deterministic gesture-script replay.
//!
//! A [`GestureScript`] describes a container, a controller configuration,
//! optional passthrough targets, and a list of [`Step`]s. [`replay`] drives a
//! [`DragController`] through the steps with an in-process [`SheetAnimator`]
//! standing in for the UI toolkit's animation engine, and collects a
//! [`ReplayReport`].
//!
//! Time only moves on `tick` and `settle` steps, so a script always produces
//! the same report.
//!
//! # Script Schema
//!
//! ```json
//! {
//!   "name": "open-then-dismiss",
//!   "container": {"width": 390.0, "height": 844.0},
//!   "config": {"interrupt_policy": "interrupt"},
//!   "targets": [{"id": "map", "frame": {"x": 0.0, "y": 0.0, "width": 390.0, "height": 844.0}}],
//!   "steps": [
//!     {"op": "gesture", "phase": "began"},
//!     {"op": "gesture", "phase": "changed", "translation_y": -120.0},
//!     {"op": "gesture", "phase": "ended", "translation_y": -300.0, "velocity_y": -400.0},
//!     {"op": "tick", "ms": 16, "frames": 5},
//!     {"op": "settle"},
//!     {"op": "touch", "x": 20.0, "y": 40.0}
//!   ]
//! }
//! ```
//!
//! # JSONL Schema
//!
//! ```json
//! {"event":"tracked","step":1,"origin_y":302.32,"dim_alpha":0.1}
//! {"event":"committed","step":2,"command":{"target":"open", ...}}
//! {"event":"frame","step":3,"origin_y":301.9,"dim_alpha":0.11}
//! {"event":"settled","step":4,"position":"open"}
//! {"event":"summary","final_position":"open","commands":1, ...}
//! ```

use std::collections::HashSet;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use sheet_core::{
    AnimateCommand, DragController, DragResponse, GestureEvent, GesturePhase, Hit, Point,
    Position, Rect, Region, SheetAnimator, SheetConfig, SheetFrame, SheetHost, Size,
    TouchForwarder,
};
use tracing::{debug, info, warn};

use crate::error::{HarnessError, Result};
use crate::recording::{HostCall, RecordingHost};

/// Frame interval used by `settle` steps.
pub const SETTLE_FRAME: Duration = Duration::from_millis(16);

/// Upper bound on frames a single `settle` step may run.
pub const MAX_SETTLE_FRAMES: usize = 1_000;

/// Longest single frame a `tick` step may request, in milliseconds.
pub const MAX_TICK_MS: u64 = 1_000;

// ============================================================================
// Script
// ============================================================================

/// A named rectangle behind the sheet that receives forwarded touches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetSpec {
    pub id: String,
    pub frame: Rect,
}

/// One scripted action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    /// Feed one pan sample to the controller.
    Gesture {
        phase: GesturePhase,
        #[serde(default)]
        translation_y: f64,
        #[serde(default)]
        velocity_y: f64,
    },
    /// Advance the animator `frames` times by `ms` each (at most
    /// [`MAX_TICK_MS`]).
    Tick {
        ms: u64,
        #[serde(default = "default_frames")]
        frames: u32,
    },
    /// Advance the animator until it comes to rest.
    Settle,
    /// Change the container size.
    Resize { width: f64, height: f64 },
    /// Hit test a point in container coordinates.
    Touch { x: f64, y: f64 },
    /// Remove the sheet.
    Detach,
}

fn default_frames() -> u32 {
    1
}

impl Step {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Gesture { .. } => "gesture",
            Self::Tick { .. } => "tick",
            Self::Settle => "settle",
            Self::Resize { .. } => "resize",
            Self::Touch { .. } => "touch",
            Self::Detach => "detach",
        }
    }
}

/// A complete replay scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GestureScript {
    #[serde(default)]
    pub name: Option<String>,
    pub container: Size,
    #[serde(default)]
    pub config: SheetConfig,
    /// Passthrough targets, highest precedence first.
    #[serde(default)]
    pub targets: Vec<TargetSpec>,
    pub steps: Vec<Step>,
}

impl GestureScript {
    /// Parse a script from JSON text and validate it.
    pub fn from_json(text: &str) -> Result<Self> {
        let script: Self = serde_json::from_str(text)?;
        script.validate()?;
        Ok(script)
    }

    /// Load a script from disk and validate it.
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(HarnessError::MissingScript {
                path: path.to_path_buf(),
            });
        }
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Structural checks that do not need a controller. Container and config
    /// values are checked by the controller itself.
    pub fn validate(&self) -> Result<()> {
        if self.steps.is_empty() {
            return Err(HarnessError::invalid("script has no steps"));
        }

        let mut seen = HashSet::new();
        for target in &self.targets {
            if !seen.insert(target.id.as_str()) {
                return Err(HarnessError::invalid(format!(
                    "duplicate target id `{}`",
                    target.id
                )));
            }
        }

        for (index, step) in self.steps.iter().enumerate() {
            match *step {
                Step::Gesture {
                    translation_y,
                    velocity_y,
                    ..
                } if !translation_y.is_finite() || !velocity_y.is_finite() => {
                    return Err(HarnessError::invalid(format!(
                        "step {index}: gesture values must be finite"
                    )));
                }
                Step::Tick { ms, frames } if ms == 0 || frames == 0 => {
                    return Err(HarnessError::invalid(format!(
                        "step {index}: tick needs a positive ms and frame count"
                    )));
                }
                Step::Tick { ms, .. } if ms > MAX_TICK_MS => {
                    return Err(HarnessError::invalid(format!(
                        "step {index}: tick of {ms} ms exceeds the {MAX_TICK_MS} ms frame limit"
                    )));
                }
                Step::Touch { x, y } if !x.is_finite() || !y.is_finite() => {
                    return Err(HarnessError::invalid(format!(
                        "step {index}: touch point must be finite"
                    )));
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn forwarder(&self) -> TouchForwarder<Region<usize>> {
        self.targets.iter().enumerate().fold(
            TouchForwarder::new(Rect::from_size(self.container)),
            |forwarder, (id, target)| {
                forwarder.with_target(Region {
                    id,
                    frame: target.frame,
                })
            },
        )
    }
}

// ============================================================================
// Report
// ============================================================================

/// One observable outcome of a step.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ReportEntry {
    Tracked {
        step: usize,
        origin_y: f64,
        dim_alpha: f64,
    },
    Rejected {
        step: usize,
    },
    Ignored {
        step: usize,
    },
    Committed {
        step: usize,
        command: AnimateCommand,
    },
    /// The animator refused a command because one was already running.
    AnimationRefused {
        step: usize,
    },
    Frame {
        step: usize,
        origin_y: f64,
        dim_alpha: f64,
    },
    Settled {
        step: usize,
        position: Position,
    },
    Resized {
        step: usize,
        width: f64,
        height: f64,
    },
    Hit {
        step: usize,
        x: f64,
        y: f64,
        /// `sheet`, `overlay`, a target id, or `None` outside the container.
        target: Option<String>,
    },
    Detached {
        step: usize,
    },
}

/// Everything a replay produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplayReport {
    pub name: Option<String>,
    pub final_position: Position,
    pub final_frame: SheetFrame,
    pub commands: usize,
    pub entries: Vec<ReportEntry>,
    pub host_calls: Vec<HostCall>,
}

impl ReplayReport {
    /// Trailing summary record for JSONL output.
    #[must_use]
    pub fn summary(&self) -> serde_json::Value {
        serde_json::json!({
            "event": "summary",
            "name": self.name,
            "final_position": self.final_position,
            "final_frame": self.final_frame,
            "commands": self.commands,
            "entries": self.entries.len(),
            "host_calls": self.host_calls.len(),
        })
    }

    /// Write one JSON object per entry, then the summary.
    pub fn write_jsonl<W: Write>(&self, out: &mut W) -> Result<()> {
        for entry in &self.entries {
            serde_json::to_writer(&mut *out, entry)?;
            out.write_all(b"\n")?;
        }
        serde_json::to_writer(&mut *out, &self.summary())?;
        out.write_all(b"\n")?;
        Ok(())
    }

    /// Entries of one kind, by serialized `event` name.
    pub fn events<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a ReportEntry> + 'a {
        self.entries
            .iter()
            .filter(move |entry| entry_name(entry) == name)
    }
}

fn entry_name(entry: &ReportEntry) -> &'static str {
    match entry {
        ReportEntry::Tracked { .. } => "tracked",
        ReportEntry::Rejected { .. } => "rejected",
        ReportEntry::Ignored { .. } => "ignored",
        ReportEntry::Committed { .. } => "committed",
        ReportEntry::AnimationRefused { .. } => "animation_refused",
        ReportEntry::Frame { .. } => "frame",
        ReportEntry::Settled { .. } => "settled",
        ReportEntry::Resized { .. } => "resized",
        ReportEntry::Hit { .. } => "hit",
        ReportEntry::Detached { .. } => "detached",
    }
}

// ============================================================================
// Replay
// ============================================================================

/// Recording host that also executes animate commands.
#[derive(Debug)]
struct ReplayHost {
    recorder: RecordingHost,
    animator: SheetAnimator,
    refused: usize,
}

impl SheetHost for ReplayHost {
    fn on_attach(&mut self, size: Size) {
        self.recorder.on_attach(size);
    }

    fn on_detach(&mut self) {
        self.animator.interrupt();
        self.recorder.on_detach();
    }

    fn on_geometry_change(&mut self, origin_y: f64) {
        self.recorder.on_geometry_change(origin_y);
        let frame = self.animator.frame();
        self.animator.set_frame(SheetFrame::new(origin_y, frame.dim_alpha));
    }

    fn on_dim_alpha_change(&mut self, alpha: f64) {
        self.recorder.on_dim_alpha_change(alpha);
        let frame = self.animator.frame();
        self.animator.set_frame(SheetFrame::new(frame.origin_y, alpha));
    }

    fn on_animate_request(&mut self, command: &AnimateCommand) {
        self.recorder.on_animate_request(command);
        if let Err(err) = self.animator.start(command) {
            warn!(position = %command.target, %err, "animate command refused");
            self.refused += 1;
        }
    }

    fn on_animation_interrupted(&mut self) {
        self.recorder.on_animation_interrupted();
        self.animator.interrupt();
    }
}

type Controller = DragController<ReplayHost>;

/// Run `script` to completion.
pub fn replay(script: &GestureScript) -> Result<ReplayReport> {
    script.validate()?;

    let host = ReplayHost {
        recorder: RecordingHost::new(),
        animator: SheetAnimator::new(script.config.interrupt_policy, SheetFrame::default()),
        refused: 0,
    };
    let mut ctl = DragController::new(script.config.clone(), host)?;
    ctl.attach(script.container)?;
    let mut forwarder = script.forwarder();
    let mut entries = Vec::new();

    info!(
        name = script.name.as_deref().unwrap_or("<unnamed>"),
        steps = script.steps.len(),
        "replay started"
    );

    for (step, op) in script.steps.iter().enumerate() {
        debug!(step, op = op.name(), "replay step");
        match *op {
            Step::Gesture {
                phase,
                translation_y,
                velocity_y,
            } => {
                let refused = ctl.host().refused;
                let event = GestureEvent::new(translation_y, velocity_y, phase);
                entries.push(response_entry(step, ctl.process(&event)?));
                if ctl.host().refused > refused {
                    entries.push(ReportEntry::AnimationRefused { step });
                }
            }
            Step::Tick { ms, frames } => {
                let dt = Duration::from_millis(ms);
                for _ in 0..frames {
                    if !advance(&mut ctl, dt, step, &mut entries) {
                        break;
                    }
                }
            }
            Step::Settle => {
                for _ in 0..MAX_SETTLE_FRAMES {
                    if !advance(&mut ctl, SETTLE_FRAME, step, &mut entries) {
                        break;
                    }
                }
            }
            Step::Resize { width, height } => {
                let size = Size::new(width, height);
                ctl.host_mut().animator.interrupt();
                ctl.resize(size)?;
                ctl.animation_finished();
                forwarder.set_bounds(Rect::from_size(size));
                entries.push(ReportEntry::Resized {
                    step,
                    width,
                    height,
                });
            }
            Step::Touch { x, y } => {
                let target = hit_test(&ctl, &forwarder, script, Point::new(x, y));
                entries.push(ReportEntry::Hit { step, x, y, target });
            }
            Step::Detach => {
                ctl.detach();
                entries.push(ReportEntry::Detached { step });
            }
        }
    }

    let final_position = ctl.settled_position();
    let final_frame = ctl.host().animator.frame();
    let host = ctl.into_host();
    let commands = host.recorder.commands().count();
    info!(%final_position, commands, "replay finished");

    Ok(ReplayReport {
        name: script.name.clone(),
        final_position,
        final_frame,
        commands,
        entries,
        host_calls: host.recorder.into_calls(),
    })
}

fn response_entry(step: usize, response: DragResponse) -> ReportEntry {
    match response {
        DragResponse::Tracked {
            origin_y,
            dim_alpha,
        } => ReportEntry::Tracked {
            step,
            origin_y,
            dim_alpha,
        },
        DragResponse::Rejected => ReportEntry::Rejected { step },
        DragResponse::Ignored => ReportEntry::Ignored { step },
        DragResponse::Committed(command) => ReportEntry::Committed { step, command },
    }
}

/// Advance the animator one frame. Returns `false` when it was already idle.
fn advance(
    ctl: &mut Controller,
    dt: Duration,
    step: usize,
    entries: &mut Vec<ReportEntry>,
) -> bool {
    let Some(frame) = ctl.host_mut().animator.advance(dt) else {
        return false;
    };
    entries.push(ReportEntry::Frame {
        step,
        origin_y: frame.origin_y,
        dim_alpha: frame.dim_alpha,
    });
    if ctl.host().animator.is_idle() {
        ctl.animation_finished();
        entries.push(ReportEntry::Settled {
            step,
            position: ctl.settled_position(),
        });
    }
    true
}

fn hit_test(
    ctl: &Controller,
    forwarder: &TouchForwarder<Region<usize>>,
    script: &GestureScript,
    point: Point,
) -> Option<String> {
    let origin_y = ctl.host().animator.frame().origin_y;
    let sheet = ctl.sheet_frame()?.with_y(origin_y);
    let hit = forwarder.hit_test(point, sheet)?;
    Some(match hit {
        Hit::Sheet => "sheet".to_string(),
        Hit::Overlay => "overlay".to_string(),
        Hit::Passthrough(index) => script
            .targets
            .get(index)
            .map_or_else(|| "overlay".to_string(), |target| target.id.clone()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn script(steps: Vec<Step>) -> GestureScript {
        GestureScript {
            name: Some("unit".to_string()),
            container: Size::new(390.0, 1000.0),
            config: SheetConfig::default(),
            targets: Vec::new(),
            steps,
        }
    }

    fn gesture(phase: GesturePhase, translation_y: f64, velocity_y: f64) -> Step {
        Step::Gesture {
            phase,
            translation_y,
            velocity_y,
        }
    }

    #[test]
    fn empty_script_is_rejected() {
        let err = replay(&script(Vec::new())).unwrap_err();
        assert!(matches!(err, HarnessError::InvalidScript { .. }));
    }

    #[test]
    fn zero_tick_is_rejected() {
        let err = script(vec![Step::Tick { ms: 0, frames: 1 }])
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("step 0"));
    }

    #[test]
    fn oversized_tick_is_rejected() {
        let err = replay(&script(vec![
            gesture(GesturePhase::Ended, 0.0, -2000.0),
            Step::Tick {
                ms: 100_000_000_000_000_000,
                frames: 1,
            },
        ]))
        .unwrap_err();
        assert!(matches!(err, HarnessError::InvalidScript { .. }));
        assert!(err.to_string().contains("step 1"), "{err}");
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn longest_allowed_tick_settles() {
        let report = replay(&script(vec![
            gesture(GesturePhase::Ended, 0.0, -2000.0),
            Step::Tick {
                ms: MAX_TICK_MS,
                frames: 5,
            },
        ]))
        .unwrap();
        assert_eq!(report.events("settled").count(), 1);
        assert_eq!(report.final_position, Position::Open);
        assert!((report.final_frame.origin_y - 100.0).abs() < 1e-9);
    }

    #[test]
    fn duplicate_targets_are_rejected() {
        let mut s = script(vec![Step::Settle]);
        let frame = Rect::new(0.0, 0.0, 10.0, 10.0);
        s.targets = vec![
            TargetSpec {
                id: "a".into(),
                frame,
            },
            TargetSpec {
                id: "a".into(),
                frame,
            },
        ];
        assert!(s.validate().is_err());
    }

    #[test]
    fn gesture_then_settle_reaches_target() {
        let report = replay(&script(vec![
            gesture(GesturePhase::Began, 0.0, 0.0),
            gesture(GesturePhase::Changed, -400.0, 0.0),
            gesture(GesturePhase::Ended, -400.0, 0.0),
            Step::Settle,
        ]))
        .unwrap();

        assert_eq!(report.final_position, Position::Open);
        assert_eq!(report.commands, 1);
        assert!((report.final_frame.origin_y - 100.0).abs() < 1e-9);
        assert_eq!(report.events("settled").count(), 1);
        assert!(report.events("frame").count() > 1);
    }

    #[test]
    fn tick_stops_when_idle() {
        let report = replay(&script(vec![Step::Tick { ms: 16, frames: 10 }])).unwrap();
        assert_eq!(report.events("frame").count(), 0);
        assert_eq!(report.final_position, Position::Middle);
    }

    #[test]
    fn touch_reports_sheet_and_outside() {
        let report = replay(&script(vec![
            Step::Touch { x: 10.0, y: 600.0 },
            Step::Touch { x: 10.0, y: 100.0 },
            Step::Touch { x: -5.0, y: 100.0 },
        ]))
        .unwrap();
        let targets: Vec<_> = report
            .events("hit")
            .map(|entry| match entry {
                ReportEntry::Hit { target, .. } => target.clone(),
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(
            targets,
            [Some("sheet".to_string()), Some("overlay".to_string()), None]
        );
    }

    #[test]
    fn jsonl_ends_with_summary() {
        let report = replay(&script(vec![gesture(GesturePhase::Ended, 0.0, -2000.0)])).unwrap();
        let mut out = Vec::new();
        report.write_jsonl(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), report.entries.len() + 1);
        let last: serde_json::Value = serde_json::from_str(lines[lines.len() - 1]).unwrap();
        assert_eq!(last["event"], "summary");
        assert_eq!(last["final_position"], "open");
        assert_eq!(last["commands"], 1);
    }
}
