// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-event gesture data handed to handlers.
//!
//! A [`GestureData`] is built fresh for every call-out by reading the recognizer
//! through [`GesturePlatform`]. Attribute values are only meaningful during the
//! call-out, so the record is never stored by the dispatcher.
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::{Point, Vec2};
//! use understory_gesture::{GestureData, GestureDetails, GestureState};
//!
//! let data = GestureData {
//!     recognizer: 7_u32,
//!     view: 1_u32,
//!     location: Point::new(10.0, 20.0),
//!     state: GestureState::Changed,
//!     number_of_touches: 1,
//!     details: GestureDetails::Pan {
//!         translation: Vec2::new(5.0, 0.0),
//!         velocity: Vec2::new(120.0, 0.0),
//!     },
//! };
//! assert!(data.changed());
//! assert_eq!(data.translation(), Some(Vec2::new(5.0, 0.0)));
//! assert_eq!(data.scale(), None);
//! ```

use core::fmt;

use kurbo::{Point, Vec2};

use crate::platform::GesturePlatform;
use crate::state::{GestureKind, GestureState};

/// Gesture-specific attributes.
///
/// Only the kinds that define extension fields carry them; everything else is
/// [`GestureDetails::None`].
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub enum GestureDetails {
    /// Tap, long press, swipe and drag carry no extension fields.
    #[default]
    None,
    /// Pan and edge pan.
    Pan {
        /// Translation since the gesture began.
        translation: Vec2,
        /// Points per second.
        velocity: Vec2,
    },
    /// Pinch.
    Pinch {
        /// Finger distance relative to the start.
        scale: f64,
        /// Scale per second.
        velocity: f64,
    },
    /// Rotation.
    Rotation {
        /// Radians relative to the start.
        rotation: f64,
        /// Radians per second.
        velocity: f64,
    },
    /// Force press.
    Force {
        /// Pressure as a fraction of the maximum possible force.
        force: f64,
    },
}

/// Everything a handler learns about one recognizer call-out.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GestureData<V, R> {
    /// The native recognizer.
    pub recognizer: R,
    /// The view the recognizer is attached to.
    pub view: V,
    /// Gesture location in `view` coordinates.
    pub location: Point,
    /// Recognizer state.
    pub state: GestureState,
    /// Number of touches.
    pub number_of_touches: usize,
    /// Kind-specific attributes.
    pub details: GestureDetails,
}

impl<V: Copy, R: Copy> GestureData<V, R> {
    /// Read the current state of `recognizer` for a gesture of `kind` on `view`.
    pub fn read<P>(platform: &P, kind: GestureKind, recognizer: R, view: V) -> Self
    where
        P: GesturePlatform<View = V, Recognizer = R> + ?Sized,
    {
        let details = match kind {
            GestureKind::Pan | GestureKind::EdgePan => GestureDetails::Pan {
                translation: platform.translation_in(recognizer, view),
                velocity: platform.velocity_in(recognizer, view),
            },
            GestureKind::Pinch => GestureDetails::Pinch {
                scale: platform.scale(recognizer),
                velocity: platform.velocity(recognizer),
            },
            GestureKind::Rotation => GestureDetails::Rotation {
                rotation: platform.rotation(recognizer),
                velocity: platform.velocity(recognizer),
            },
            GestureKind::ForcePress => platform
                .touch_force(recognizer)
                .and_then(|f| f.fraction())
                .map_or(GestureDetails::None, |force| GestureDetails::Force { force }),
            GestureKind::Tap
            | GestureKind::LongPress
            | GestureKind::Swipe
            | GestureKind::Drag
            | GestureKind::Drop => GestureDetails::None,
        };
        Self {
            recognizer,
            view,
            location: platform.location_in(recognizer, view),
            state: platform.state(recognizer),
            number_of_touches: platform.number_of_touches(recognizer),
            details,
        }
    }
}

impl<V, R> GestureData<V, R> {
    /// `state == began`.
    #[must_use]
    pub fn began(&self) -> bool {
        self.state == GestureState::Began
    }

    /// `state == changed`.
    #[must_use]
    pub fn changed(&self) -> bool {
        self.state == GestureState::Changed
    }

    /// `state == ended` (or recognized).
    #[must_use]
    pub fn ended(&self) -> bool {
        self.state == GestureState::Ended
    }

    /// `state` is `failed` or `cancelled`.
    #[must_use]
    pub fn failed(&self) -> bool {
        self.state.is_failure()
    }

    /// Pan translation.
    #[must_use]
    pub fn translation(&self) -> Option<Vec2> {
        match self.details {
            GestureDetails::Pan { translation, .. } => Some(translation),
            _ => None,
        }
    }

    /// Pan velocity in points per second.
    #[must_use]
    pub fn pan_velocity(&self) -> Option<Vec2> {
        match self.details {
            GestureDetails::Pan { velocity, .. } => Some(velocity),
            _ => None,
        }
    }

    /// Pinch scale.
    #[must_use]
    pub fn scale(&self) -> Option<f64> {
        match self.details {
            GestureDetails::Pinch { scale, .. } => Some(scale),
            _ => None,
        }
    }

    /// Rotation in radians.
    #[must_use]
    pub fn rotation(&self) -> Option<f64> {
        match self.details {
            GestureDetails::Rotation { rotation, .. } => Some(rotation),
            _ => None,
        }
    }

    /// Pinch or rotation velocity.
    #[must_use]
    pub fn velocity(&self) -> Option<f64> {
        match self.details {
            GestureDetails::Pinch { velocity, .. } | GestureDetails::Rotation { velocity, .. } => {
                Some(velocity)
            }
            _ => None,
        }
    }

    /// Force-press pressure fraction.
    #[must_use]
    pub fn force(&self) -> Option<f64> {
        match self.details {
            GestureDetails::Force { force } => Some(force),
            _ => None,
        }
    }
}

impl<V: fmt::Debug, R: fmt::Debug> fmt::Display for GestureData<V, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Gesture data:")?;
        writeln!(f, "  recognizer: {:?}", self.recognizer)?;
        writeln!(f, "  view: {:?}", self.view)?;
        writeln!(f, "  location: ({}, {})", self.location.x, self.location.y)?;
        writeln!(f, "  state: {}", self.state)?;
        write!(f, "  number_of_touches: {}", self.number_of_touches)?;
        match self.details {
            GestureDetails::None => Ok(()),
            GestureDetails::Pan {
                translation,
                velocity,
            } => write!(
                f,
                "\n  translation: ({}, {})\n  velocity: ({}, {})",
                translation.x, translation.y, velocity.x, velocity.y
            ),
            GestureDetails::Pinch { scale, velocity } => {
                write!(f, "\n  scale: {scale}\n  velocity: {velocity}")
            }
            GestureDetails::Rotation { rotation, velocity } => {
                write!(f, "\n  rotation: {rotation}\n  velocity: {velocity}")
            }
            GestureDetails::Force { force } => write!(f, "\n  force: {force}"),
        }
    }
}
