#![forbid(unsafe_code)]

//! Position model: resting heights, snap boundaries, and adjacency.
//!
//! Everything here is a pure function of a [`Position`], a [`Direction`], and
//! the container height. There is no state and no failure mode: the
//! adjacency table in [`Position::next`] is total, so every
//! (position, direction) pair has exactly one successor.
//!
//! # Constants
//!
//! | Position | height fraction | down boundary | up boundary | dim alpha |
//! |-----------|-----|------|------|------|
//! | Collapsed | 0.1 | 0.0 | 0.0 | 0.0 |
//! | Middle | 0.48 | 0.35 | 0.27 | 0.0 |
//! | Open | 0.9 | 0.8 | 0.65 | 0.45 |
//!
//! The height fraction is where the sheet rests. The boundaries are
//! hysteresis bands for the snap decision and are never used for layout.

use crate::geometry::{Rect, Size};

/// One of the three resting states of the sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Position {
    Collapsed,
    #[default]
    Middle,
    Open,
}

/// Instantaneous vertical drag direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Direction {
    #[default]
    Up,
    Down,
}

impl Direction {
    /// Direction of travel from `current` to `proposed` origin.
    ///
    /// Y grows downward, so a larger proposed origin is a downward drag. No
    /// movement at all counts as `Up`.
    #[inline]
    #[must_use]
    pub fn from_offsets(current: f64, proposed: f64) -> Self {
        if proposed > current {
            Self::Down
        } else {
            Self::Up
        }
    }
}

impl Position {
    /// All positions, lowest resting height first.
    pub const ALL: [Position; 3] = [Position::Collapsed, Position::Middle, Position::Open];

    /// Fraction of the container height the sheet covers when settled here.
    #[inline]
    #[must_use]
    pub const fn height_fraction(self) -> f64 {
        match self {
            Self::Collapsed => 0.1,
            Self::Middle => 0.48,
            Self::Open => 0.9,
        }
    }

    /// Snap threshold used while dragging down.
    #[inline]
    #[must_use]
    pub const fn down_boundary(self) -> f64 {
        match self {
            Self::Collapsed => 0.0,
            Self::Middle => 0.35,
            Self::Open => 0.8,
        }
    }

    /// Snap threshold used while dragging up.
    #[inline]
    #[must_use]
    pub const fn up_boundary(self) -> f64 {
        match self {
            Self::Collapsed => 0.0,
            Self::Middle => 0.27,
            Self::Open => 0.65,
        }
    }

    /// Snap threshold for the given drag direction.
    #[inline]
    #[must_use]
    pub const fn boundary(self, direction: Direction) -> f64 {
        match direction {
            Direction::Up => self.up_boundary(),
            Direction::Down => self.down_boundary(),
        }
    }

    /// Dim overlay opacity when settled here.
    #[inline]
    #[must_use]
    pub const fn dim_alpha(self) -> f64 {
        match self {
            Self::Collapsed | Self::Middle => 0.0,
            Self::Open => 0.45,
        }
    }

    /// Y origin of the sheet's top edge when settled in a container of the
    /// given height.
    #[inline]
    #[must_use]
    pub fn y_origin(self, container_height: f64) -> f64 {
        container_height - container_height * self.height_fraction()
    }

    /// Adjacent position in the given direction.
    ///
    /// Saturates at the extremes: `Open` has nothing above it and
    /// `Collapsed` has nothing below it.
    #[must_use]
    pub const fn next(self, direction: Direction) -> Position {
        match (self, direction) {
            (Self::Collapsed, Direction::Up) => Self::Middle,
            (Self::Collapsed, Direction::Down) => Self::Collapsed,
            (Self::Middle, Direction::Up) => Self::Open,
            (Self::Middle, Direction::Down) => Self::Collapsed,
            (Self::Open, Direction::Up) => Self::Open,
            (Self::Open, Direction::Down) => Self::Middle,
        }
    }

    /// Stable lowercase name for logs and reports.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Collapsed => "collapsed",
            Self::Middle => "middle",
            Self::Open => "open",
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Up => "up",
            Self::Down => "down",
        })
    }
}

/// Frame of the sheet surface when settled at `position`.
///
/// The sheet is `overhang` points taller than the container so a spring that
/// overshoots upward never reveals its bottom edge.
#[must_use]
pub fn sheet_frame(position: Position, container: Size, overhang: f64) -> Rect {
    Rect::new(
        0.0,
        position.y_origin(container.height),
        container.width,
        container.height + overhang,
    )
}
