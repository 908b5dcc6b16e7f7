#![forbid(unsafe_code)]

//! Drag controller: turns pan samples into live geometry and settle commands.
//!
//! [`DragController`] is the only stateful piece of the sheet. It owns the
//! settled [`Position`], the direction of the latest sample, the container
//! size, and (while a finger is down) a `DragSession`.
//!
//! # State Machine
//!
//! ```text
//!            attach                Began               Ended / Cancelled
//! Detached ─────────▶ Settled ─────────────▶ Dragging ───────────────────▶ Settled
//!                       ▲                      │ Changed (live geometry)       │
//!                       │                      ▼                               │
//!                       └──── animation_finished ◀──── Animating ◀─────────────┘
//! ```
//!
//! # Invariants
//!
//! 1. Exactly one settled position exists at any time. It changes only on
//!    commit, and it changes the instant the animate command is issued, not
//!    when the animation finishes.
//! 2. Every `Ended` gesture produces exactly one animate command. Every
//!    `Cancelled` gesture with a live session produces exactly one command
//!    back to the settled position.
//! 3. An upward sample while settled at `Open` is rejected: no geometry and
//!    no dim callback.
//! 4. Live dim alpha is always in `[0, 1]`. With clamping enabled the live
//!    origin is always in `[0, container height]`.
//!
//! # Failure Modes
//!
//! - Gesture before [`attach`](DragController::attach): `SheetError::NotAttached`.
//! - Non-finite or non-positive container: `SheetError::InvalidContainer`.
//! - A resize mid-drag abandons the gesture and re-emits settled geometry.
//! - A non-finite translation is rejected like an upward drag while open. A
//!   non-finite velocity never triggers a fling.

use crate::animation::SheetFrame;
use crate::config::{InterruptPolicy, SheetConfig};
use crate::error::{Result, SheetError};
use crate::event::{GestureEvent, GesturePhase};
use crate::geometry::{Rect, Size};
use crate::host::{AnimateCommand, SheetHost};
use crate::position::{Direction, Position, sheet_frame};

#[cfg(feature = "tracing")]
use crate::logging::{debug, info, trace, warn};
#[cfg(not(feature = "tracing"))]
use crate::{debug, info, trace, warn};

// ---------------------------------------------------------------------------
// Snap decision
// ---------------------------------------------------------------------------

/// Choose the position a finished gesture settles at.
///
/// A fling faster than `fling_velocity` in either direction commits to the
/// adjacent position. Otherwise the distance from the sheet's top edge to the
/// container bottom is compared against the `Open` then `Middle` boundary for
/// the drag direction; the first one exceeded wins, else `Collapsed`.
#[must_use]
pub fn snap_target(
    settled: Position,
    direction: Direction,
    proposed_origin_y: f64,
    velocity_y: f64,
    container_height: f64,
    fling_velocity: f64,
) -> Position {
    if velocity_y < -fling_velocity {
        return settled.next(Direction::Up);
    }
    if velocity_y > fling_velocity {
        return settled.next(Direction::Down);
    }

    let distance_from_bottom = container_height - proposed_origin_y;
    if distance_from_bottom > container_height * Position::Open.boundary(direction) {
        Position::Open
    } else if distance_from_bottom > container_height * Position::Middle.boundary(direction) {
        Position::Middle
    } else {
        Position::Collapsed
    }
}

/// Live dim alpha while dragging away from `settled`.
///
/// Only interpolates when the drag leaves `Open` or heads toward it; every
/// other pair holds the settled alpha (zero for `Collapsed` and `Middle`).
#[must_use]
pub fn preview_dim_alpha(
    settled: Position,
    direction: Direction,
    live_origin_y: f64,
    container_height: f64,
) -> f64 {
    let current = settled.y_origin(container_height);
    let next = settled.next(direction);
    let area = match direction {
        Direction::Up => current,
        Direction::Down => next.y_origin(container_height) - current,
    };

    let involves_open =
        (live_origin_y != area && settled == Position::Open) || next == Position::Open;
    if !involves_open || area == 0.0 {
        return settled.dim_alpha();
    }

    let percentage = (area - live_origin_y) / area;
    (percentage * Position::Open.dim_alpha()).clamp(0.0, 1.0)
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Outcome of feeding one sample to the controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragResponse {
    /// Sample accepted; the host received new geometry and dim alpha.
    Tracked { origin_y: f64, dim_alpha: f64 },
    /// Upward drag while open; nothing moved.
    Rejected,
    /// Gesture finished; the settled position changed to `command.target`.
    Committed(AnimateCommand),
    /// Gesture ignored while a settle animation runs.
    Ignored,
}

/// State of the gesture in progress.
#[derive(Debug, Clone)]
struct DragSession {
    /// Settled position when the finger went down.
    start: Position,
    /// Unclamped origin from the latest sample, used by the snap decision.
    proposed_y: f64,
    /// Whether the whole gesture is being ignored.
    blocked: bool,
}

impl DragSession {
    fn new(start: Position, origin_y: f64, blocked: bool) -> Self {
        Self {
            start,
            proposed_y: origin_y,
            blocked,
        }
    }
}

// ---------------------------------------------------------------------------
// DragController
// ---------------------------------------------------------------------------

/// Stateful drag-to-position controller.
///
/// Call [`attach`](Self::attach) once the container size is known, then feed
/// every pan sample to [`process`](Self::process). Call
/// [`animation_finished`](Self::animation_finished) when the host's settle
/// animation completes.
pub struct DragController<H: SheetHost> {
    config: SheetConfig,
    host: H,
    settled: Position,
    direction: Direction,
    container: Option<Size>,
    session: Option<DragSession>,
    animating: bool,
    /// Last frame handed to the host, live or settled.
    visual: SheetFrame,
}

impl<H: SheetHost> std::fmt::Debug for DragController<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DragController")
            .field("settled", &self.settled)
            .field("direction", &self.direction)
            .field("container", &self.container)
            .field("dragging", &self.is_dragging())
            .field("animating", &self.animating)
            .finish_non_exhaustive()
    }
}

impl<H: SheetHost> DragController<H> {
    /// Create a detached controller.
    pub fn new(config: SheetConfig, host: H) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            settled: config.initial_position,
            config,
            host,
            direction: Direction::Up,
            container: None,
            session: None,
            animating: false,
            visual: SheetFrame::default(),
        })
    }

    /// Attach to a container and show the sheet at its settled position.
    pub fn attach(&mut self, size: Size) -> Result<()> {
        validate_container(size)?;
        info!(
            width = size.width,
            height = size.height,
            position = %self.settled,
            "sheet attached"
        );
        self.container = Some(size);
        self.session = None;
        self.animating = false;
        self.host.on_attach(size);
        self.show_settled(size.height);
        Ok(())
    }

    /// The container changed size. Any gesture in progress is abandoned.
    pub fn resize(&mut self, size: Size) -> Result<()> {
        if self.container.is_none() {
            return Err(SheetError::NotAttached);
        }
        validate_container(size)?;
        if self.session.take().is_some() {
            warn!("container resized mid-drag; gesture abandoned");
        }
        info!(width = size.width, height = size.height, "sheet resized");
        self.container = Some(size);
        self.show_settled(size.height);
        Ok(())
    }

    /// Remove the sheet from its container.
    pub fn detach(&mut self) {
        if self.container.take().is_some() {
            info!(position = %self.settled, "sheet detached");
            self.session = None;
            self.animating = false;
            self.host.on_detach();
        }
    }

    /// Feed one gesture sample.
    pub fn process(&mut self, event: &GestureEvent) -> Result<DragResponse> {
        let height = self.container_height()?;
        match event.phase {
            GesturePhase::Began => {
                self.session = None;
                self.on_drag_update(event.translation_y, event.velocity_y, false)
            }
            GesturePhase::Changed | GesturePhase::Ended => self.on_drag_update(
                event.translation_y,
                event.velocity_y,
                event.phase.is_terminal(),
            ),
            GesturePhase::Cancelled => match self.session.take() {
                Some(session) if !session.blocked => {
                    debug!(position = %session.start, "gesture cancelled; returning to start");
                    Ok(DragResponse::Committed(self.commit(session.start, height)))
                }
                _ => Ok(DragResponse::Ignored),
            },
        }
    }

    /// Handle one drag sample.
    ///
    /// `translation_y` is the cumulative translation since the gesture began.
    /// A sample with no session in progress starts one. When
    /// `gesture_has_ended` is set the session is closed, a target is chosen,
    /// and a single animate command is issued.
    ///
    /// A non-finite translation is rejected without touching the gesture's
    /// direction or proposed origin. A non-finite velocity counts as zero.
    pub fn on_drag_update(
        &mut self,
        translation_y: f64,
        velocity_y: f64,
        gesture_has_ended: bool,
    ) -> Result<DragResponse> {
        let height = self.container_height()?;

        if self.session.is_none() {
            self.begin_session(height);
        }
        if self.session.as_ref().is_some_and(|s| s.blocked) {
            if gesture_has_ended {
                self.session = None;
            }
            return Ok(DragResponse::Ignored);
        }

        let response = if translation_y.is_finite() {
            let current = self.settled.y_origin(height);
            let proposed = current + translation_y;
            self.direction = Direction::from_offsets(current, proposed);
            if let Some(session) = self.session.as_mut() {
                session.proposed_y = proposed;
            }
            self.track(proposed, height)
        } else {
            warn!(translation_y, "non-finite drag sample rejected");
            DragResponse::Rejected
        };

        if !gesture_has_ended {
            return Ok(response);
        }

        let velocity_y = if velocity_y.is_finite() {
            velocity_y
        } else {
            warn!(velocity_y, "non-finite release velocity treated as zero");
            0.0
        };

        let proposed = self
            .session
            .take()
            .map_or_else(|| self.settled.y_origin(height), |s| s.proposed_y);
        if velocity_y.abs() > self.config.fling_velocity {
            debug!(velocity_y, from = %self.settled, "fling override");
        }
        let target = snap_target(
            self.settled,
            self.direction,
            proposed,
            velocity_y,
            height,
            self.config.fling_velocity,
        );
        Ok(DragResponse::Committed(self.commit(target, height)))
    }

    /// The host's settle animation completed.
    pub fn animation_finished(&mut self) {
        if self.animating {
            trace!(position = %self.settled, "settle animation finished");
            self.animating = false;
        }
    }

    #[inline]
    #[must_use]
    pub fn settled_position(&self) -> Position {
        self.settled
    }

    /// Direction of the most recent sample.
    #[inline]
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[inline]
    #[must_use]
    pub fn container(&self) -> Option<Size> {
        self.container
    }

    /// Whether a gesture is being tracked (ignored gestures do not count).
    #[inline]
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.session.as_ref().is_some_and(|s| !s.blocked)
    }

    /// Unclamped origin proposed by the latest sample of the gesture in
    /// progress, including rejected samples.
    #[must_use]
    pub fn proposed_origin(&self) -> Option<f64> {
        self.session
            .as_ref()
            .filter(|s| !s.blocked)
            .map(|s| s.proposed_y)
    }

    #[inline]
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.animating
    }

    /// Last frame handed to the host. After a commit this is the target frame.
    #[inline]
    #[must_use]
    pub fn frame(&self) -> SheetFrame {
        self.visual
    }

    /// Settled sheet frame, including overhang.
    #[must_use]
    pub fn sheet_frame(&self) -> Option<Rect> {
        self.container
            .map(|size| sheet_frame(self.settled, size, self.config.overhang))
    }

    /// Sheet frame at the last position handed to the host, so hit testing
    /// follows the finger mid-drag.
    #[must_use]
    pub fn live_sheet_frame(&self) -> Option<Rect> {
        self.sheet_frame().map(|frame| frame.with_y(self.visual.origin_y))
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &SheetConfig {
        &self.config
    }

    #[inline]
    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    #[inline]
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    #[must_use]
    pub fn into_host(self) -> H {
        self.host
    }
}

// ---------------------------------------------------------------------------
// Internals
// ---------------------------------------------------------------------------

impl<H: SheetHost> DragController<H> {
    fn container_height(&self) -> Result<f64> {
        self.container
            .map(|size| size.height)
            .ok_or(SheetError::NotAttached)
    }

    fn begin_session(&mut self, height: f64) {
        let blocked = self.animating && self.config.interrupt_policy == InterruptPolicy::Block;
        if blocked {
            trace!("gesture ignored while settle animation runs");
        } else if self.animating {
            debug!(position = %self.settled, "gesture interrupted settle animation");
            self.animating = false;
            self.host.on_animation_interrupted();
        }
        let origin = self.settled.y_origin(height);
        self.session = Some(DragSession::new(self.settled, origin, blocked));
    }

    /// Emit live geometry for `proposed`, unless the sample is an upward drag
    /// while open.
    fn track(&mut self, proposed: f64, height: f64) -> DragResponse {
        if self.direction == Direction::Up && self.settled == Position::Open {
            trace!(proposed, "upward drag rejected while open");
            return DragResponse::Rejected;
        }
        let origin_y = if self.config.clamp_live_origin {
            proposed.clamp(0.0, height)
        } else {
            proposed
        };
        let dim_alpha = preview_dim_alpha(self.settled, self.direction, origin_y, height);
        self.visual = SheetFrame::new(origin_y, dim_alpha);
        self.host.on_geometry_change(origin_y);
        self.host.on_dim_alpha_change(dim_alpha);
        DragResponse::Tracked {
            origin_y,
            dim_alpha,
        }
    }

    fn show_settled(&mut self, height: f64) {
        self.visual = SheetFrame::new(self.settled.y_origin(height), self.settled.dim_alpha());
        self.host.on_geometry_change(self.visual.origin_y);
        self.host.on_dim_alpha_change(self.visual.dim_alpha);
    }

    fn commit(&mut self, target: Position, height: f64) -> AnimateCommand {
        let command = AnimateCommand::settle(
            target,
            height,
            self.visual.origin_y,
            self.visual.dim_alpha,
            &self.config.animation,
        );
        debug!(from = %self.settled, to = %target, direction = %self.direction, "commit");
        self.settled = target;
        self.animating = true;
        self.visual = SheetFrame::new(command.target_origin_y, command.target_dim_alpha);
        self.host.on_animate_request(&command);
        command
    }
}

fn validate_container(size: Size) -> Result<()> {
    if size.is_valid() {
        Ok(())
    } else {
        Err(SheetError::InvalidContainer {
            width: size.width,
            height: size.height,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const H: f64 = 1000.0;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Attach(Size),
        Detach,
        Geometry(f64),
        Dim(f64),
        Animate(AnimateCommand),
        Interrupted,
    }

    #[derive(Debug, Default)]
    struct Recorder {
        calls: Vec<Call>,
    }

    impl Recorder {
        fn animations(&self) -> Vec<AnimateCommand> {
            self.calls
                .iter()
                .filter_map(|c| match c {
                    Call::Animate(cmd) => Some(*cmd),
                    _ => None,
                })
                .collect()
        }

        fn geometry_count(&self) -> usize {
            self.calls
                .iter()
                .filter(|c| matches!(c, Call::Geometry(_)))
                .count()
        }
    }

    impl SheetHost for Recorder {
        fn on_attach(&mut self, size: Size) {
            self.calls.push(Call::Attach(size));
        }
        fn on_detach(&mut self) {
            self.calls.push(Call::Detach);
        }
        fn on_geometry_change(&mut self, origin_y: f64) {
            self.calls.push(Call::Geometry(origin_y));
        }
        fn on_dim_alpha_change(&mut self, alpha: f64) {
            self.calls.push(Call::Dim(alpha));
        }
        fn on_animate_request(&mut self, command: &AnimateCommand) {
            self.calls.push(Call::Animate(*command));
        }
        fn on_animation_interrupted(&mut self) {
            self.calls.push(Call::Interrupted);
        }
    }

    fn attached(position: Position) -> DragController<Recorder> {
        let config = SheetConfig::default().with_initial_position(position);
        let mut ctl = DragController::new(config, Recorder::default()).unwrap();
        ctl.attach(Size::new(400.0, H)).unwrap();
        ctl.host_mut().calls.clear();
        ctl
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    /// Run a full gesture and acknowledge the resulting animation.
    fn gesture(ctl: &mut DragController<Recorder>, translation: f64, velocity: f64) -> Position {
        ctl.process(&GestureEvent::began()).unwrap();
        ctl.process(&GestureEvent::changed(translation, velocity)).unwrap();
        let response = ctl
            .process(&GestureEvent::ended(translation, velocity))
            .unwrap();
        ctl.animation_finished();
        match response {
            DragResponse::Committed(cmd) => cmd.target,
            other => panic!("expected commit, got {other:?}"),
        }
    }

    // --- Lifecycle ---

    #[test]
    fn gesture_before_attach_fails_fast() {
        let mut ctl = DragController::new(SheetConfig::default(), Recorder::default()).unwrap();
        let err = ctl.process(&GestureEvent::began()).unwrap_err();
        assert_eq!(err, SheetError::NotAttached);
        assert!(ctl.host().calls.is_empty());
    }

    #[test]
    fn attach_rejects_degenerate_container() {
        let mut ctl = DragController::new(SheetConfig::default(), Recorder::default()).unwrap();
        let err = ctl.attach(Size::new(400.0, 0.0)).unwrap_err();
        assert!(matches!(err, SheetError::InvalidContainer { .. }));
        assert!(ctl.container().is_none());
    }

    #[test]
    fn new_rejects_invalid_config() {
        let config = SheetConfig::default().with_fling_velocity(-5.0);
        assert!(DragController::new(config, Recorder::default()).is_err());
    }

    #[test]
    fn attach_emits_settled_geometry() {
        let mut ctl = DragController::new(SheetConfig::default(), Recorder::default()).unwrap();
        ctl.attach(Size::new(400.0, H)).unwrap();
        assert_eq!(
            ctl.host().calls,
            vec![
                Call::Attach(Size::new(400.0, H)),
                Call::Geometry(520.0),
                Call::Dim(0.0),
            ]
        );
        let frame = ctl.sheet_frame().unwrap();
        assert!(approx(frame.y, 520.0));
        assert_eq!(frame.height, H + 40.0);
        assert_eq!(ctl.live_sheet_frame(), Some(frame));
    }

    #[test]
    fn resize_mid_drag_abandons_gesture() {
        let mut ctl = attached(Position::Middle);
        ctl.process(&GestureEvent::began()).unwrap();
        ctl.process(&GestureEvent::changed(-50.0, 0.0)).unwrap();
        assert!(ctl.is_dragging());

        ctl.resize(Size::new(400.0, 800.0)).unwrap();
        assert!(!ctl.is_dragging());
        assert_eq!(ctl.settled_position(), Position::Middle);
        assert!(approx(ctl.frame().origin_y, 800.0 - 800.0 * 0.48));
    }

    #[test]
    fn resize_requires_attach() {
        let mut ctl = DragController::new(SheetConfig::default(), Recorder::default()).unwrap();
        assert_eq!(
            ctl.resize(Size::new(1.0, 1.0)).unwrap_err(),
            SheetError::NotAttached
        );
    }

    #[test]
    fn detach_notifies_host_once() {
        let mut ctl = attached(Position::Middle);
        ctl.detach();
        ctl.detach();
        assert_eq!(ctl.host().calls, vec![Call::Detach]);
        assert_eq!(
            ctl.process(&GestureEvent::began()).unwrap_err(),
            SheetError::NotAttached
        );
    }

    // --- Live tracking ---

    #[test]
    fn live_geometry_follows_translation() {
        let mut ctl = attached(Position::Middle);
        ctl.process(&GestureEvent::began()).unwrap();
        let response = ctl.process(&GestureEvent::changed(-120.0, -300.0)).unwrap();
        match response {
            DragResponse::Tracked { origin_y, .. } => assert!(approx(origin_y, 400.0)),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(ctl.direction(), Direction::Up);
        assert!(ctl.is_dragging());
        assert_eq!(ctl.proposed_origin(), Some(400.0));
    }

    #[test]
    fn upward_drag_while_open_is_rejected() {
        let mut ctl = attached(Position::Open);
        ctl.process(&GestureEvent::began()).unwrap();
        let response = ctl.process(&GestureEvent::changed(-80.0, -200.0)).unwrap();
        assert_eq!(response, DragResponse::Rejected);
        assert_eq!(ctl.host().geometry_count(), 0);

        let end = ctl.process(&GestureEvent::ended(-80.0, -200.0)).unwrap();
        match end {
            DragResponse::Committed(cmd) => assert_eq!(cmd.target, Position::Open),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(ctl.settled_position(), Position::Open);
        assert_eq!(ctl.host().geometry_count(), 0);
    }

    #[test]
    fn downward_drag_while_collapsed_is_clamped_to_container() {
        let mut ctl = attached(Position::Collapsed);
        ctl.process(&GestureEvent::began()).unwrap();
        let response = ctl.process(&GestureEvent::changed(500.0, 100.0)).unwrap();
        assert_eq!(
            response,
            DragResponse::Tracked {
                origin_y: H,
                dim_alpha: 0.0
            }
        );
    }

    #[test]
    fn unclamped_config_lets_origin_overshoot() {
        let config = SheetConfig::default()
            .with_initial_position(Position::Collapsed)
            .with_clamp_live_origin(false);
        let mut ctl = DragController::new(config, Recorder::default()).unwrap();
        ctl.attach(Size::new(400.0, H)).unwrap();
        let response = ctl.process(&GestureEvent::changed(500.0, 0.0)).unwrap();
        assert!(matches!(response, DragResponse::Tracked { origin_y, .. } if approx(origin_y, 1400.0)));
    }

    #[test]
    fn dim_preview_ramps_toward_open() {
        let mut ctl = attached(Position::Middle);
        ctl.process(&GestureEvent::began()).unwrap();
        let DragResponse::Tracked { dim_alpha, .. } =
            ctl.process(&GestureEvent::changed(-220.0, 0.0)).unwrap()
        else {
            panic!("expected tracked sample");
        };
        // area = 520, origin = 300 → (520 - 300) / 520 * 0.45
        assert!(approx(dim_alpha, 220.0 / 520.0 * 0.45));
    }

    #[test]
    fn dim_preview_stays_zero_between_collapsed_and_middle() {
        let mut ctl = attached(Position::Collapsed);
        ctl.process(&GestureEvent::began()).unwrap();
        for t in [-10.0, -200.0, -380.0] {
            let DragResponse::Tracked { dim_alpha, .. } =
                ctl.process(&GestureEvent::changed(t, 0.0)).unwrap()
            else {
                panic!("expected tracked sample");
            };
            assert_eq!(dim_alpha, 0.0);
        }
    }

    #[test]
    fn dim_preview_when_leaving_open() {
        let mut ctl = attached(Position::Open);
        ctl.process(&GestureEvent::began()).unwrap();
        let DragResponse::Tracked { dim_alpha, .. } =
            ctl.process(&GestureEvent::changed(100.0, 0.0)).unwrap()
        else {
            panic!("expected tracked sample");
        };
        // area = 520 - 100 = 420, origin = 200 → (420 - 200) / 420 * 0.45
        assert!(approx(dim_alpha, 220.0 / 420.0 * 0.45));

        let DragResponse::Tracked { dim_alpha, .. } =
            ctl.process(&GestureEvent::changed(600.0, 0.0)).unwrap()
        else {
            panic!("expected tracked sample");
        };
        assert_eq!(dim_alpha, 0.0, "past the area the preview clamps to zero");
    }

    #[test]
    fn non_finite_translation_is_rejected() {
        let mut ctl = attached(Position::Middle);
        ctl.process(&GestureEvent::began()).unwrap();
        ctl.process(&GestureEvent::changed(-100.0, 0.0)).unwrap();
        ctl.host_mut().calls.clear();

        for t in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert_eq!(
                ctl.process(&GestureEvent::changed(t, 0.0)).unwrap(),
                DragResponse::Rejected,
                "translation {t}"
            );
        }
        assert!(ctl.host().calls.is_empty());
        assert_eq!(ctl.proposed_origin(), Some(420.0));
        assert!(approx(ctl.frame().origin_y, 420.0));

        // A finite sample afterwards is tracked normally.
        let response = ctl.process(&GestureEvent::changed(-150.0, 0.0)).unwrap();
        let DragResponse::Tracked {
            origin_y,
            dim_alpha,
        } = response
        else {
            panic!("expected tracked sample, got {response:?}");
        };
        assert!(approx(origin_y, 370.0));
        assert!((0.0..=1.0).contains(&dim_alpha));

        // Releasing on a NaN sample snaps from the last finite origin.
        let end = ctl.process(&GestureEvent::ended(f64::NAN, 0.0)).unwrap();
        let DragResponse::Committed(cmd) = end else {
            panic!("expected commit, got {end:?}");
        };
        assert_eq!(cmd.target, Position::Middle);
        assert!(cmd.from_origin_y.is_finite() && cmd.from_dim_alpha.is_finite());
    }

    #[test]
    fn non_finite_first_sample_snaps_back_to_settled() {
        let mut ctl = attached(Position::Collapsed);
        let end = ctl
            .process(&GestureEvent::ended(f64::INFINITY, f64::NAN))
            .unwrap();
        let DragResponse::Committed(cmd) = end else {
            panic!("expected commit, got {end:?}");
        };
        assert_eq!(cmd.target, Position::Collapsed);
        assert_eq!(ctl.host().geometry_count(), 0);
    }

    #[test]
    fn non_finite_velocity_never_flings() {
        for velocity in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let mut ctl = attached(Position::Middle);
            // origin 420, distance 580: between middle.up (270) and open.up (650)
            assert_eq!(gesture(&mut ctl, -100.0, velocity), Position::Middle);
        }
    }

    // --- Snap decision ---

    #[test]
    fn fast_upward_fling_goes_to_next_up() {
        let mut ctl = attached(Position::Middle);
        assert_eq!(gesture(&mut ctl, 5.0, -1500.0), Position::Open);
    }

    #[test]
    fn fast_downward_fling_goes_to_next_down() {
        let mut ctl = attached(Position::Middle);
        assert_eq!(gesture(&mut ctl, -300.0, 1500.0), Position::Collapsed);
    }

    #[test]
    fn fling_threshold_is_strict() {
        assert_eq!(
            snap_target(Position::Middle, Direction::Up, 520.0, -1000.0, H, 1000.0),
            Position::Middle
        );
        assert_eq!(
            snap_target(Position::Middle, Direction::Up, 520.0, -1000.1, H, 1000.0),
            Position::Open
        );
    }

    #[test]
    fn distance_snap_from_collapsed_to_open() {
        let mut ctl = attached(Position::Collapsed);
        // origin 900 - 750 = 150, distance from bottom 850 > 650
        assert_eq!(gesture(&mut ctl, -750.0, 0.0), Position::Open);
    }

    #[test]
    fn distance_snap_uses_direction_specific_boundaries() {
        // distance 300: above middle.up (270) but below middle.down (350)
        assert_eq!(
            snap_target(Position::Collapsed, Direction::Up, 700.0, 0.0, H, 1000.0),
            Position::Middle
        );
        assert_eq!(
            snap_target(Position::Middle, Direction::Down, 700.0, 0.0, H, 1000.0),
            Position::Collapsed
        );
    }

    #[test]
    fn open_then_drag_down_lands_on_middle() {
        let mut ctl = attached(Position::Middle);
        assert_eq!(gesture(&mut ctl, -400.0, 0.0), Position::Open);
        // open origin 100 + 450 = 550, distance 450: below open.down (800),
        // above middle.down (350)
        assert_eq!(gesture(&mut ctl, 450.0, 0.0), Position::Middle);
    }

    #[test]
    fn commit_issues_exactly_one_command() {
        let mut ctl = attached(Position::Middle);
        ctl.process(&GestureEvent::began()).unwrap();
        ctl.process(&GestureEvent::changed(-50.0, 0.0)).unwrap();
        ctl.process(&GestureEvent::changed(-100.0, 0.0)).unwrap();
        ctl.process(&GestureEvent::ended(-100.0, 0.0)).unwrap();

        let commands = ctl.host().animations();
        assert_eq!(commands.len(), 1);
        let cmd = commands[0];
        assert_eq!(cmd.target, Position::Middle);
        assert!(approx(cmd.from_origin_y, 420.0));
        assert!(approx(cmd.target_origin_y, 520.0));
        assert!(!ctl.is_dragging());
    }

    #[test]
    fn settled_position_changes_before_animation_finishes() {
        let mut ctl = attached(Position::Middle);
        ctl.process(&GestureEvent::ended(0.0, -2000.0)).unwrap();
        assert_eq!(ctl.settled_position(), Position::Open);
        assert!(ctl.is_animating());
        ctl.animation_finished();
        assert!(!ctl.is_animating());
    }

    #[test]
    fn cancel_returns_to_settled_position() {
        let mut ctl = attached(Position::Middle);
        ctl.process(&GestureEvent::began()).unwrap();
        ctl.process(&GestureEvent::changed(-300.0, 0.0)).unwrap();
        let response = ctl.process(&GestureEvent::cancelled()).unwrap();
        let DragResponse::Committed(cmd) = response else {
            panic!("expected commit, got {response:?}");
        };
        assert_eq!(cmd.target, Position::Middle);
        assert!(approx(cmd.from_origin_y, 220.0));
        assert_eq!(ctl.settled_position(), Position::Middle);

        assert_eq!(
            ctl.process(&GestureEvent::cancelled()).unwrap(),
            DragResponse::Ignored
        );
    }

    // --- Interrupt policy ---

    #[test]
    fn block_policy_ignores_gestures_while_animating() {
        let mut ctl = attached(Position::Middle);
        ctl.process(&GestureEvent::ended(-400.0, 0.0)).unwrap();
        assert!(ctl.is_animating());
        ctl.host_mut().calls.clear();

        assert_eq!(
            ctl.process(&GestureEvent::began()).unwrap(),
            DragResponse::Ignored
        );
        assert_eq!(
            ctl.process(&GestureEvent::changed(300.0, 0.0)).unwrap(),
            DragResponse::Ignored
        );
        // Finishing mid-gesture does not revive the ignored gesture.
        ctl.animation_finished();
        assert_eq!(
            ctl.process(&GestureEvent::ended(300.0, 0.0)).unwrap(),
            DragResponse::Ignored
        );
        assert!(ctl.host().calls.is_empty());
        assert_eq!(ctl.settled_position(), Position::Open);

        // The next gesture is tracked normally.
        assert!(matches!(
            ctl.process(&GestureEvent::began()).unwrap(),
            DragResponse::Tracked { .. } | DragResponse::Rejected
        ));
    }

    #[test]
    fn interrupt_policy_takes_over_running_animation() {
        let config = SheetConfig::default().with_interrupt_policy(InterruptPolicy::Interrupt);
        let mut ctl = DragController::new(config, Recorder::default()).unwrap();
        ctl.attach(Size::new(400.0, H)).unwrap();
        ctl.process(&GestureEvent::ended(-400.0, 0.0)).unwrap();
        assert!(ctl.is_animating());
        ctl.host_mut().calls.clear();

        ctl.process(&GestureEvent::began()).unwrap();
        assert!(!ctl.is_animating());
        assert_eq!(ctl.host().calls.first(), Some(&Call::Interrupted));
        assert!(ctl.is_dragging());
    }
}
