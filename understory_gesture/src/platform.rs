// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The host platform seen from the dispatcher.
//!
//! The platform owns the native recognizers and views. It creates, attaches and
//! enables recognizers on request, exposes their attributes during a call-out,
//! and forwards its own call-outs to [`Gestures`](crate::Gestures).
//!
//! Attribute readers take `&self`: building a [`GestureData`](crate::GestureData)
//! never mutates a recognizer.

use core::fmt::Debug;
use core::hash::Hash;

use kurbo::{Point, Vec2};

use crate::drag_drop::EncodedItem;
use crate::options::RecognizerConfig;
use crate::state::GestureState;

/// Raw pressure of the first touch of a recognizer.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TouchForce {
    /// Current force.
    pub force: f64,
    /// Largest force the hardware can report.
    pub maximum_possible_force: f64,
}

impl TouchForce {
    /// Force as a fraction of the maximum, clamped to `[0, 1]`.
    ///
    /// Returns `None` when the hardware reports no usable maximum.
    #[must_use]
    pub fn fraction(self) -> Option<f64> {
        if self.maximum_possible_force > 0.0 && self.force.is_finite() {
            Some((self.force / self.maximum_possible_force).clamp(0.0, 1.0))
        } else {
            None
        }
    }
}

/// The built-in dismiss gesture of a presented container view.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CloseGesture<V, R> {
    /// Container that owns the dismiss gesture.
    pub container: V,
    /// The built-in two-finger swipe-down recognizer.
    pub recognizer: R,
}

/// Native gesture engine and view system.
pub trait GesturePlatform {
    /// Opaque view identity.
    type View: Copy + Eq + Hash + Debug;
    /// Opaque recognizer identity.
    type Recognizer: Copy + Eq + Hash + Debug;

    /// Create a native recognizer configured by `config`.
    fn create_recognizer(&mut self, config: &RecognizerConfig) -> Self::Recognizer;

    /// Attach `recognizer` to `view`.
    fn attach(&mut self, view: Self::View, recognizer: Self::Recognizer);

    /// Detach `recognizer` from `view` and release it.
    fn detach(&mut self, view: Self::View, recognizer: Self::Recognizer);

    /// Toggle whether `recognizer` observes touches.
    fn set_recognizer_enabled(&mut self, recognizer: Self::Recognizer, enabled: bool);

    /// Toggle whether `view` receives touches at all.
    fn set_touch_enabled(&mut self, view: Self::View, enabled: bool);

    /// Current recognizer state.
    fn state(&self, recognizer: Self::Recognizer) -> GestureState;

    /// Gesture location in `view` coordinates.
    fn location_in(&self, recognizer: Self::Recognizer, view: Self::View) -> Point;

    /// Number of touches the recognizer is tracking.
    fn number_of_touches(&self, recognizer: Self::Recognizer) -> usize;

    /// Pan translation since the gesture began, in `view` coordinates.
    fn translation_in(&self, recognizer: Self::Recognizer, view: Self::View) -> Vec2;

    /// Pan velocity in points per second, in `view` coordinates.
    fn velocity_in(&self, recognizer: Self::Recognizer, view: Self::View) -> Vec2;

    /// Pinch scale relative to the starting finger distance.
    fn scale(&self, recognizer: Self::Recognizer) -> f64;

    /// Rotation in radians relative to the starting finger positions.
    fn rotation(&self, recognizer: Self::Recognizer) -> f64;

    /// Scale per second (pinch) or radians per second (rotation).
    fn velocity(&self, recognizer: Self::Recognizer) -> f64;

    /// Pressure of the first touch, if the hardware reports it.
    fn touch_force(&self, recognizer: Self::Recognizer) -> Option<TouchForce>;

    /// The deepest view under the recognizer's touch, for drop targeting.
    fn view_under_touch(&self, recognizer: Self::Recognizer) -> Option<Self::View>;

    /// Find the built-in dismiss gesture of the container presenting `view`.
    fn close_gesture(&self, view: Self::View) -> Option<CloseGesture<Self::View, Self::Recognizer>>;

    /// Dismiss the presented `container`.
    fn dismiss(&mut self, container: Self::View);

    /// Show whether the drop target under the touch would accept the payload.
    fn drop_affordance(&mut self, _target: Self::View, _accepted: bool) {}

    /// Offer an encoded payload to other applications for the drag in progress.
    fn offer_external(&mut self, _source: Self::View, _item: &EncodedItem) {}
}
