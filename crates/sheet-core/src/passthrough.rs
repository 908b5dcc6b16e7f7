#![forbid(unsafe_code)]

//! Touch forwarding for the area around the sheet.
//!
//! The dim overlay covers the whole container, but while the sheet is not
//! fully modal the content behind it should stay interactive. A
//! [`TouchForwarder`] resolves a touch in this order:
//!
//! 1. Outside the container: no hit.
//! 2. Inside the sheet frame: the sheet.
//! 3. Inside a passthrough target that claims it: that target (first
//!    registered wins).
//! 4. Otherwise: the overlay itself.

use crate::geometry::{Point, Rect};

/// Something behind the sheet that can receive forwarded touches.
pub trait HitTarget {
    type Id;

    /// Frame in container coordinates.
    fn frame(&self) -> Rect;

    /// Resolve a point in the target's local coordinates. Only called for
    /// points inside [`frame`](Self::frame).
    fn hit_test(&self, local: Point) -> Option<Self::Id>;
}

/// A plain rectangular target that claims every point inside it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region<Id> {
    pub id: Id,
    pub frame: Rect,
}

impl<Id: Copy> HitTarget for Region<Id> {
    type Id = Id;

    fn frame(&self) -> Rect {
        self.frame
    }

    fn hit_test(&self, _local: Point) -> Option<Id> {
        Some(self.id)
    }
}

/// Where a touch landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit<Id> {
    Sheet,
    Passthrough(Id),
    Overlay,
}

/// Hit tester covering the container behind the sheet.
#[derive(Debug, Clone)]
pub struct TouchForwarder<T> {
    bounds: Rect,
    targets: Vec<T>,
}

impl<T: HitTarget> TouchForwarder<T> {
    #[must_use]
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            targets: Vec::new(),
        }
    }

    /// Register a passthrough target. Earlier targets take precedence.
    pub fn push(&mut self, target: T) {
        self.targets.push(target);
    }

    #[must_use]
    pub fn with_target(mut self, target: T) -> Self {
        self.push(target);
        self
    }

    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    #[must_use]
    pub fn targets(&self) -> &[T] {
        &self.targets
    }

    /// Resolve `point` (container coordinates) given the current sheet frame.
    pub fn hit_test(&self, point: Point, sheet: Rect) -> Option<Hit<T::Id>> {
        if !self.bounds.contains(point) {
            return None;
        }
        if sheet.contains(point) {
            return Some(Hit::Sheet);
        }

        let forwarded = self.targets.iter().find_map(|target| {
            let frame = target.frame();
            if !frame.contains(point) {
                return None;
            }
            target.hit_test(Point::new(point.x - frame.x, point.y - frame.y))
        });

        Some(forwarded.map_or(Hit::Overlay, Hit::Passthrough))
    }
}
