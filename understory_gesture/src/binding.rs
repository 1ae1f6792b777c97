// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Binding handles returned by registration.

use crate::dispatcher::Gestures;
use crate::error::GestureError;
use crate::platform::GesturePlatform;
use crate::registry::BindingId;

/// Handle to one registered recognizer.
///
/// A binding is a plain copyable id; operations take the owning [`Gestures`]
/// explicitly. After [`Binding::remove`] every operation fails with
/// [`GestureError::StaleHandle`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Binding(BindingId);

impl Binding {
    pub(crate) const fn new(id: BindingId) -> Self {
        Self(id)
    }

    /// Registry id of this binding.
    #[must_use]
    pub const fn id(self) -> BindingId {
        self.0
    }

    /// See [`Gestures::enable`].
    pub fn enable<P: GesturePlatform>(self, gestures: &mut Gestures<P>) -> Result<(), GestureError> {
        gestures.enable(self)
    }

    /// See [`Gestures::disable`].
    pub fn disable<P: GesturePlatform>(
        self,
        gestures: &mut Gestures<P>,
    ) -> Result<(), GestureError> {
        gestures.disable(self)
    }

    /// See [`Gestures::remove`].
    pub fn remove<P: GesturePlatform>(self, gestures: &mut Gestures<P>) -> Result<(), GestureError> {
        gestures.remove(self)
    }

    /// This binding gets first claim: `other` waits for it to fail.
    pub fn before<P: GesturePlatform>(
        self,
        other: Self,
        gestures: &mut Gestures<P>,
    ) -> Result<(), GestureError> {
        gestures.before(self, other)
    }

    /// This binding waits for `other` to fail.
    pub fn after<P: GesturePlatform>(
        self,
        other: Self,
        gestures: &mut Gestures<P>,
    ) -> Result<(), GestureError> {
        gestures.after(self, other)
    }

    /// Let this binding and `other` recognize at the same time.
    pub fn together_with<P: GesturePlatform>(
        self,
        other: Self,
        gestures: &mut Gestures<P>,
    ) -> Result<(), GestureError> {
        gestures.together_with(self, other)
    }
}
