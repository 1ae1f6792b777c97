// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recognizer states, gesture kinds, and the direction/edge masks used to tune them.

use core::fmt;

/// State of a native recognizer at the time of a call-out.
///
/// The numeric codes match the platform's recognizer state machine:
/// `possible → began → changed* → ended | cancelled | failed`.
/// Discrete gestures (tap, swipe) report [`GestureState::RECOGNIZED`], which is
/// the same state as [`GestureState::Ended`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum GestureState {
    /// The recognizer has not yet recognized its gesture.
    #[default]
    Possible,
    /// A continuous gesture has started.
    Began,
    /// A continuous gesture has changed.
    Changed,
    /// The gesture finished (or a discrete gesture was recognized).
    Ended,
    /// The platform cancelled the gesture (for example an incoming call).
    Cancelled,
    /// The recognizer failed to recognize its gesture.
    Failed,
}

impl GestureState {
    /// Alias used by discrete gestures.
    pub const RECOGNIZED: Self = Self::Ended;

    /// Converts a raw platform state code.
    ///
    /// Returns `None` for codes outside `0..=5`.
    #[must_use]
    pub const fn from_code(code: i64) -> Option<Self> {
        Some(match code {
            0 => Self::Possible,
            1 => Self::Began,
            2 => Self::Changed,
            3 => Self::Ended,
            4 => Self::Cancelled,
            5 => Self::Failed,
            _ => return None,
        })
    }

    /// Returns the raw platform state code.
    #[must_use]
    pub const fn code(self) -> i64 {
        match self {
            Self::Possible => 0,
            Self::Began => 1,
            Self::Changed => 2,
            Self::Ended => 3,
            Self::Cancelled => 4,
            Self::Failed => 5,
        }
    }

    /// Lower-case state name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Possible => "possible",
            Self::Began => "began",
            Self::Changed => "changed",
            Self::Ended => "ended",
            Self::Cancelled => "cancelled",
            Self::Failed => "failed",
        }
    }

    /// Returns `true` for `cancelled` and `failed`.
    #[must_use]
    pub const fn is_failure(self) -> bool {
        matches!(self, Self::Cancelled | Self::Failed)
    }
}

impl fmt::Display for GestureState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.code())
    }
}

/// The kind of gesture a binding was registered for.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum GestureKind {
    /// Discrete tap (including double tap).
    Tap,
    /// Continuous long press.
    LongPress,
    /// Continuous pan.
    Pan,
    /// Pan starting from a screen edge.
    EdgePan,
    /// Two-finger pinch.
    Pinch,
    /// Two-finger rotation.
    Rotation,
    /// Discrete swipe.
    Swipe,
    /// Long press filtered by touch pressure.
    ForcePress,
    /// Drag source, carried by a long press.
    Drag,
    /// Drop target.
    Drop,
}

impl GestureKind {
    /// Snake-case name of the kind, as used by the registration calls.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Tap => "tap",
            Self::LongPress => "long_press",
            Self::Pan => "pan",
            Self::EdgePan => "edge_pan",
            Self::Pinch => "pinch",
            Self::Rotation => "rotation",
            Self::Swipe => "swipe",
            Self::ForcePress => "force_press",
            Self::Drag => "drag",
            Self::Drop => "drop",
        }
    }

    /// Returns `true` for kinds whose events carry a translation and a 2D velocity.
    #[must_use]
    pub const fn is_pan_like(self) -> bool {
        matches!(self, Self::Pan | Self::EdgePan)
    }
}

impl fmt::Display for GestureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

bitflags::bitflags! {
    /// Swipe directions a swipe recognizer reacts to.
    ///
    /// Several directions may be combined; the handler then receives no
    /// indication of which one occurred.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct SwipeDirection: u8 {
        /// Swipe to the right.
        const RIGHT = 0b0000_0001;
        /// Swipe to the left.
        const LEFT  = 0b0000_0010;
        /// Swipe up.
        const UP    = 0b0000_0100;
        /// Swipe down.
        const DOWN  = 0b0000_1000;
    }
}

bitflags::bitflags! {
    /// Screen edges an edge-pan recognizer starts from.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Edges: u8 {
        /// Top edge.
        const TOP    = 0b0000_0001;
        /// Left edge.
        const LEFT   = 0b0000_0010;
        /// Bottom edge.
        const BOTTOM = 0b0000_0100;
        /// Right edge.
        const RIGHT  = 0b0000_1000;
        /// All four edges.
        const ALL = Self::TOP.bits() | Self::LEFT.bits() | Self::BOTTOM.bits() | Self::RIGHT.bits();
    }
}
