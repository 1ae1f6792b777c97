// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-kind tuning options and their validation.
//!
//! Every option is optional: `None` leaves the platform default in place.
//! Options are validated into a [`RecognizerConfig`] before the platform is
//! asked to create a recognizer, so an out-of-domain value never reaches it.
//!
//! ```
//! use understory_gesture::options::{LongPressOptions, RecognizerConfig};
//!
//! let ok = RecognizerConfig::LongPress(LongPressOptions::new().minimum_press_duration(0.8));
//! assert!(ok.validate().is_ok());
//!
//! let bad = RecognizerConfig::LongPress(LongPressOptions::new().minimum_press_duration(-1.0));
//! assert!(bad.validate().is_err());
//! ```

use crate::error::GestureError;
use crate::state::{Edges, GestureKind, SwipeDirection};

/// Default pressure fraction a force press must reach.
pub const DEFAULT_FORCE_THRESHOLD: f64 = 0.4;

fn check_count(option: &'static str, value: Option<u32>) -> Result<(), GestureError> {
    match value {
        Some(0) => Err(GestureError::invalid(option, "must be at least 1")),
        _ => Ok(()),
    }
}

fn check_non_negative(option: &'static str, value: Option<f64>) -> Result<(), GestureError> {
    match value {
        Some(v) if !v.is_finite() => Err(GestureError::invalid(option, "must be finite")),
        Some(v) if v < 0.0 => Err(GestureError::invalid(option, "must not be negative")),
        _ => Ok(()),
    }
}

/// Options for tap recognizers.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct TapOptions {
    /// Taps needed for recognition.
    pub number_of_taps_required: Option<u32>,
    /// Fingers needed for recognition.
    pub number_of_touches_required: Option<u32>,
}

impl TapOptions {
    /// All platform defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `taps` taps.
    #[must_use]
    pub fn taps(mut self, taps: u32) -> Self {
        self.number_of_taps_required = Some(taps);
        self
    }

    /// Require `touches` fingers.
    #[must_use]
    pub fn touches(mut self, touches: u32) -> Self {
        self.number_of_touches_required = Some(touches);
        self
    }

    fn validate(&self) -> Result<(), GestureError> {
        check_count("number_of_taps_required", self.number_of_taps_required)?;
        check_count("number_of_touches_required", self.number_of_touches_required)
    }
}

/// Options for long-press recognizers (also used by drag sources).
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct LongPressOptions {
    /// Taps needed before the press.
    pub number_of_taps_required: Option<u32>,
    /// Fingers needed for recognition.
    pub number_of_touches_required: Option<u32>,
    /// Seconds the press must last; the platform default is 0.5.
    pub minimum_press_duration: Option<f64>,
    /// Points the touch may move; the platform default is 10.
    pub allowable_movement: Option<f64>,
}

impl LongPressOptions {
    /// All platform defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `taps` taps before the press.
    #[must_use]
    pub fn taps(mut self, taps: u32) -> Self {
        self.number_of_taps_required = Some(taps);
        self
    }

    /// Require `touches` fingers.
    #[must_use]
    pub fn touches(mut self, touches: u32) -> Self {
        self.number_of_touches_required = Some(touches);
        self
    }

    /// Set the minimum press duration in seconds.
    #[must_use]
    pub fn minimum_press_duration(mut self, seconds: f64) -> Self {
        self.minimum_press_duration = Some(seconds);
        self
    }

    /// Set the allowable movement in points.
    #[must_use]
    pub fn allowable_movement(mut self, points: f64) -> Self {
        self.allowable_movement = Some(points);
        self
    }

    fn validate(&self) -> Result<(), GestureError> {
        check_count("number_of_taps_required", self.number_of_taps_required)?;
        check_count("number_of_touches_required", self.number_of_touches_required)?;
        check_non_negative("minimum_press_duration", self.minimum_press_duration)?;
        check_non_negative("allowable_movement", self.allowable_movement)
    }
}

/// Options for pan recognizers.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PanOptions {
    /// Fewest fingers that may pan.
    pub minimum_number_of_touches: Option<u32>,
    /// Most fingers that may pan.
    pub maximum_number_of_touches: Option<u32>,
}

impl PanOptions {
    /// All platform defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum number of fingers.
    #[must_use]
    pub fn minimum_touches(mut self, touches: u32) -> Self {
        self.minimum_number_of_touches = Some(touches);
        self
    }

    /// Set the maximum number of fingers.
    #[must_use]
    pub fn maximum_touches(mut self, touches: u32) -> Self {
        self.maximum_number_of_touches = Some(touches);
        self
    }

    fn validate(&self) -> Result<(), GestureError> {
        check_count("minimum_number_of_touches", self.minimum_number_of_touches)?;
        check_count("maximum_number_of_touches", self.maximum_number_of_touches)?;
        if let (Some(min), Some(max)) = (
            self.minimum_number_of_touches,
            self.maximum_number_of_touches,
        ) && min > max
        {
            return Err(GestureError::invalid(
                "minimum_number_of_touches",
                "must not exceed maximum_number_of_touches",
            ));
        }
        Ok(())
    }
}

/// Options for edge-pan recognizers.
///
/// Unlike the other kinds, the edge set has no platform default.
/// Pans from different edges that must be told apart need separate recognizers.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct EdgePanOptions {
    /// Edges the pan may start from.
    pub edges: Edges,
}

impl EdgePanOptions {
    /// Recognize pans starting from `edges`.
    #[must_use]
    pub fn new(edges: Edges) -> Self {
        Self { edges }
    }

    fn validate(&self) -> Result<(), GestureError> {
        if self.edges.is_empty() {
            return Err(GestureError::invalid("edges", "must name at least one edge"));
        }
        Ok(())
    }
}

/// Options for swipe recognizers.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct SwipeOptions {
    /// Directions to recognize; the platform default is right.
    pub direction: Option<SwipeDirection>,
    /// Fingers needed for recognition.
    pub number_of_touches_required: Option<u32>,
    /// Points the touch must travel.
    pub minimum_distance: Option<f64>,
}

impl SwipeOptions {
    /// All platform defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the recognized directions.
    #[must_use]
    pub fn direction(mut self, direction: SwipeDirection) -> Self {
        self.direction = Some(direction);
        self
    }

    /// Require `touches` fingers.
    #[must_use]
    pub fn touches(mut self, touches: u32) -> Self {
        self.number_of_touches_required = Some(touches);
        self
    }

    /// Set the minimum travel in points.
    #[must_use]
    pub fn minimum_distance(mut self, points: f64) -> Self {
        self.minimum_distance = Some(points);
        self
    }

    fn validate(&self) -> Result<(), GestureError> {
        if self.direction.is_some_and(|d| d.is_empty()) {
            return Err(GestureError::invalid(
                "direction",
                "must name at least one direction",
            ));
        }
        check_count("number_of_touches_required", self.number_of_touches_required)?;
        check_non_negative("minimum_distance", self.minimum_distance)
    }
}

/// Options for force-press recognizers.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ForcePressOptions {
    /// Fraction of the maximum possible force needed, within `[0, 1]`.
    pub threshold: f64,
}

impl Default for ForcePressOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_FORCE_THRESHOLD,
        }
    }
}

impl ForcePressOptions {
    /// Use `threshold` as the pressure fraction.
    #[must_use]
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    fn validate(&self) -> Result<(), GestureError> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(GestureError::invalid("threshold", "must be within [0, 1]"));
        }
        Ok(())
    }
}

/// A validated description of the native recognizer to create.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum RecognizerConfig {
    /// Tap recognizer.
    Tap(TapOptions),
    /// Long-press recognizer.
    LongPress(LongPressOptions),
    /// Pan recognizer.
    Pan(PanOptions),
    /// Screen-edge pan recognizer.
    EdgePan(EdgePanOptions),
    /// Pinch recognizer.
    Pinch,
    /// Rotation recognizer.
    Rotation,
    /// Swipe recognizer.
    Swipe(SwipeOptions),
    /// Long-press recognizer reporting pressure.
    ForcePress(ForcePressOptions),
    /// Long-press recognizer carrying a drag.
    Drag(LongPressOptions),
    /// Drop interaction; never delivers action call-outs.
    Drop,
}

impl RecognizerConfig {
    /// The gesture kind this configuration creates.
    #[must_use]
    pub const fn kind(&self) -> GestureKind {
        match self {
            Self::Tap(_) => GestureKind::Tap,
            Self::LongPress(_) => GestureKind::LongPress,
            Self::Pan(_) => GestureKind::Pan,
            Self::EdgePan(_) => GestureKind::EdgePan,
            Self::Pinch => GestureKind::Pinch,
            Self::Rotation => GestureKind::Rotation,
            Self::Swipe(_) => GestureKind::Swipe,
            Self::ForcePress(_) => GestureKind::ForcePress,
            Self::Drag(_) => GestureKind::Drag,
            Self::Drop => GestureKind::Drop,
        }
    }

    /// Check every option against its domain.
    pub fn validate(&self) -> Result<(), GestureError> {
        match self {
            Self::Tap(o) => o.validate(),
            Self::LongPress(o) | Self::Drag(o) => o.validate(),
            Self::Pan(o) => o.validate(),
            Self::EdgePan(o) => o.validate(),
            Self::Swipe(o) => o.validate(),
            Self::ForcePress(o) => o.validate(),
            Self::Pinch | Self::Rotation | Self::Drop => Ok(()),
        }
    }

    /// Pressure threshold, for force presses.
    #[must_use]
    pub fn force_threshold(&self) -> Option<f64> {
        match self {
            Self::ForcePress(o) => Some(o.threshold),
            _ => None,
        }
    }
}
