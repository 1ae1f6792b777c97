// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The [`Gestures`] front end.
//!
//! `Gestures` owns a [`GesturePlatform`] and everything registered on it. The
//! host calls registration methods during setup, and forwards the platform's
//! call-outs to [`Gestures::on_action`], [`Gestures::on_external_drop`] and the
//! three arbitration predicates.
//!
//! ## Dispatch
//!
//! For every action call-out:
//!
//! - An unknown recognizer is [`Outcome::Ignored`]; a disabled one is
//!   [`Outcome::Disabled`].
//! - Gesture handlers receive a fresh [`GestureData`]. Force presses below their
//!   threshold are dropped as [`Outcome::BelowThreshold`].
//! - A handler error is logged and reported as [`Outcome::HandlerFailed`]. The
//!   registry is untouched and later events dispatch normally.
//! - Drag sources drive the [`DragDropCoordinator`]: `began` captures the
//!   payload, `changed` updates the drop affordance, `ended` drops onto the view
//!   under the touch, `cancelled`/`failed` abandon the drag.

use alloc::boxed::Box;
use core::fmt;

use crate::arbiter::{self, ArbitrationPolicy, Arbiter};
use crate::binding::Binding;
use crate::data::GestureData;
use crate::drag_drop::{DragDropCoordinator, DragPhase, DragSource, DropTarget, EncodedItem};
use crate::error::{GestureError, HandlerResult};
use crate::options::{
    EdgePanOptions, ForcePressOptions, LongPressOptions, PanOptions, RecognizerConfig,
    SwipeOptions, TapOptions,
};
use crate::platform::GesturePlatform;
use crate::registry::Registry;
use crate::state::GestureState;

/// Boxed gesture handler.
pub type HandlerFn<V, R> = Box<dyn FnMut(&GestureData<V, R>) -> HandlerResult>;

/// What happens when a registered recognizer fires.
pub enum Handler<V, R> {
    /// Call a function with the gesture data.
    Custom(HandlerFn<V, R>),
    /// Take over the host's built-in dismiss gesture: the recognizer is
    /// attached to the presenting container, the built-in gesture is disabled,
    /// and the container is dismissed when the recognizer ends.
    ReplaceCloseGesture,
}

impl<V, R> Handler<V, R> {
    /// Wrap a closure.
    #[must_use]
    pub fn custom(f: impl FnMut(&GestureData<V, R>) -> HandlerResult + 'static) -> Self {
        Self::Custom(Box::new(f))
    }
}

impl<V, R> fmt::Debug for Handler<V, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Custom(_) => f.write_str("Custom(..)"),
            Self::ReplaceCloseGesture => f.write_str("ReplaceCloseGesture"),
        }
    }
}

/// What a registered recognizer routes to.
pub(crate) enum Route<V, R> {
    Gesture(HandlerFn<V, R>),
    Close { builtin: R },
    DragSource(DragSource),
    DropTarget,
}

/// Result of dispatching one platform call-out.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The handler ran and succeeded.
    Handled,
    /// A close-gesture replacement dismissed its container.
    Dismissed,
    /// Nothing is registered for the recognizer, or the call-out has no effect.
    Ignored,
    /// The binding is disabled.
    Disabled,
    /// A force press did not reach its threshold.
    BelowThreshold,
    /// The handler returned an error.
    HandlerFailed,
    /// A drag started or moved.
    Dragging,
    /// A drag delivered its payload.
    Dropped,
    /// A drag ended without delivery.
    DragCancelled,
}

/// Gesture registrations on top of a [`GesturePlatform`].
pub struct Gestures<P: GesturePlatform> {
    platform: P,
    registry: Registry<P::View, P::Recognizer, Route<P::View, P::Recognizer>>,
    arbiter: Arbiter,
    drag: DragDropCoordinator<P::View>,
}

impl<P: GesturePlatform + fmt::Debug> fmt::Debug for Gestures<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gestures")
            .field("platform", &self.platform)
            .field("registry", &self.registry)
            .field("arbiter", &self.arbiter)
            .field("drag", &self.drag)
            .finish()
    }
}

impl<P: GesturePlatform> Gestures<P> {
    /// Wrap `platform` with no registrations and no kind-level policy.
    pub fn new(platform: P) -> Self {
        Self::with_policy(platform, ArbitrationPolicy::default())
    }

    /// Wrap `platform`, falling back to `policy` for undeclared pairs.
    pub fn with_policy(platform: P, policy: ArbitrationPolicy) -> Self {
        Self {
            platform,
            registry: Registry::new(),
            arbiter: Arbiter::new(policy),
            drag: DragDropCoordinator::new(),
        }
    }

    /// The wrapped platform.
    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// The wrapped platform, mutably.
    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    /// Replace the kind-level arbitration policy.
    pub fn set_policy(&mut self, policy: ArbitrationPolicy) {
        self.arbiter.set_policy(policy);
    }

    /// Phase of the current drag session.
    pub fn drag_phase(&self) -> DragPhase {
        self.drag.phase()
    }

    /// Number of live bindings.
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Whether `binding` is still registered.
    pub fn is_registered(&self, binding: Binding) -> bool {
        self.registry.is_alive(binding.id())
    }

    /// Whether `binding` is enabled.
    pub fn is_enabled(&self, binding: Binding) -> Result<bool, GestureError> {
        Ok(self.registry.get(binding.id())?.enabled)
    }

    /// The native recognizer behind `binding`.
    pub fn recognizer(&self, binding: Binding) -> Result<P::Recognizer, GestureError> {
        Ok(self.registry.get(binding.id())?.recognizer)
    }

    /// The binding registered for a native recognizer.
    pub fn binding_for(&self, recognizer: P::Recognizer) -> Option<Binding> {
        self.registry.find(recognizer).map(Binding::new)
    }

    // --- registration ---

    /// Register a recognizer configured by `config` on `view`.
    ///
    /// The configuration is validated before anything reaches the platform.
    /// The view is made touch-enabled.
    pub fn register(
        &mut self,
        view: P::View,
        config: RecognizerConfig,
        handler: Handler<P::View, P::Recognizer>,
    ) -> Result<Binding, GestureError> {
        config.validate()?;
        let (view, route) = match handler {
            Handler::Custom(f) => (view, Route::Gesture(f)),
            Handler::ReplaceCloseGesture => {
                let close = self
                    .platform
                    .close_gesture(view)
                    .ok_or(GestureError::CloseGestureUnavailable)?;
                self.platform.set_recognizer_enabled(close.recognizer, false);
                (
                    close.container,
                    Route::Close {
                        builtin: close.recognizer,
                    },
                )
            }
        };
        Ok(self.attach(view, config, route))
    }

    fn attach(
        &mut self,
        view: P::View,
        config: RecognizerConfig,
        route: Route<P::View, P::Recognizer>,
    ) -> Binding {
        let recognizer = self.platform.create_recognizer(&config);
        if let Some(stale) = self.registry.find(recognizer) {
            tracing::warn!(?recognizer, "platform reused a live recognizer id");
            if let Err(err) = self.remove(Binding::new(stale)) {
                tracing::warn!(?recognizer, error = %err, "evicting the previous binding failed");
            }
        }
        self.platform.attach(view, recognizer);
        self.platform.set_touch_enabled(view, true);
        let id = self.registry.insert(view, recognizer, config, route);
        tracing::debug!(?view, ?recognizer, kind = %config.kind(), "gesture registered");
        Binding::new(id)
    }

    /// Call `handler` on taps.
    pub fn tap(
        &mut self,
        view: P::View,
        options: TapOptions,
        handler: impl FnMut(&GestureData<P::View, P::Recognizer>) -> HandlerResult + 'static,
    ) -> Result<Binding, GestureError> {
        self.register(view, RecognizerConfig::Tap(options), Handler::custom(handler))
    }

    /// Call `handler` on double taps.
    pub fn doubletap(
        &mut self,
        view: P::View,
        handler: impl FnMut(&GestureData<P::View, P::Recognizer>) -> HandlerResult + 'static,
    ) -> Result<Binding, GestureError> {
        self.tap(view, TapOptions::new().taps(2), handler)
    }

    /// Call `handler` on long presses.
    pub fn long_press(
        &mut self,
        view: P::View,
        options: LongPressOptions,
        handler: impl FnMut(&GestureData<P::View, P::Recognizer>) -> HandlerResult + 'static,
    ) -> Result<Binding, GestureError> {
        self.register(view, RecognizerConfig::LongPress(options), Handler::custom(handler))
    }

    /// Call `handler` while panning.
    pub fn pan(
        &mut self,
        view: P::View,
        options: PanOptions,
        handler: impl FnMut(&GestureData<P::View, P::Recognizer>) -> HandlerResult + 'static,
    ) -> Result<Binding, GestureError> {
        self.register(view, RecognizerConfig::Pan(options), Handler::custom(handler))
    }

    /// Call `handler` while panning in from a screen edge.
    pub fn edge_pan(
        &mut self,
        view: P::View,
        options: EdgePanOptions,
        handler: impl FnMut(&GestureData<P::View, P::Recognizer>) -> HandlerResult + 'static,
    ) -> Result<Binding, GestureError> {
        self.register(view, RecognizerConfig::EdgePan(options), Handler::custom(handler))
    }

    /// Call `handler` while pinching.
    pub fn pinch(
        &mut self,
        view: P::View,
        handler: impl FnMut(&GestureData<P::View, P::Recognizer>) -> HandlerResult + 'static,
    ) -> Result<Binding, GestureError> {
        self.register(view, RecognizerConfig::Pinch, Handler::custom(handler))
    }

    /// Call `handler` while rotating.
    pub fn rotation(
        &mut self,
        view: P::View,
        handler: impl FnMut(&GestureData<P::View, P::Recognizer>) -> HandlerResult + 'static,
    ) -> Result<Binding, GestureError> {
        self.register(view, RecognizerConfig::Rotation, Handler::custom(handler))
    }

    /// Call `handler` on swipes.
    pub fn swipe(
        &mut self,
        view: P::View,
        options: SwipeOptions,
        handler: impl FnMut(&GestureData<P::View, P::Recognizer>) -> HandlerResult + 'static,
    ) -> Result<Binding, GestureError> {
        self.register(view, RecognizerConfig::Swipe(options), Handler::custom(handler))
    }

    /// Call `handler` while the touch presses at least `options.threshold` hard.
    pub fn force_press(
        &mut self,
        view: P::View,
        options: ForcePressOptions,
        handler: impl FnMut(&GestureData<P::View, P::Recognizer>) -> HandlerResult + 'static,
    ) -> Result<Binding, GestureError> {
        self.register(view, RecognizerConfig::ForcePress(options), Handler::custom(handler))
    }

    /// Make `view` a drag source, started by a long press.
    pub fn drag(
        &mut self,
        view: P::View,
        source: DragSource,
        options: LongPressOptions,
    ) -> Result<Binding, GestureError> {
        let config = RecognizerConfig::Drag(options);
        config.validate()?;
        Ok(self.attach(view, config, Route::DragSource(source)))
    }

    /// Make `view` a drop target.
    ///
    /// A view has at most one drop target; registering another replaces it.
    pub fn drop(
        &mut self,
        view: P::View,
        target: DropTarget<P::View>,
    ) -> Result<Binding, GestureError> {
        if let Some(previous) = self.drop_binding(view) {
            self.remove(previous)?;
        }
        self.drag.add_target(view, target);
        Ok(self.attach(view, RecognizerConfig::Drop, Route::DropTarget))
    }

    /// Replace the host's built-in dismiss gesture for the container presenting
    /// `view` with a recognizer configured by `config`.
    pub fn replace_close_gesture(
        &mut self,
        view: P::View,
        config: RecognizerConfig,
    ) -> Result<Binding, GestureError> {
        self.register(view, config, Handler::ReplaceCloseGesture)
    }

    /// Disable the host's built-in two-finger dismiss swipe for the container
    /// presenting `view`. Returns whether one was found.
    pub fn disable_swipe_to_close(&mut self, view: P::View) -> bool {
        match self.platform.close_gesture(view) {
            Some(close) => {
                self.platform.set_recognizer_enabled(close.recognizer, false);
                true
            }
            None => false,
        }
    }

    // --- binding operations ---

    /// Let `binding` observe touches again. No-op if already enabled.
    pub fn enable(&mut self, binding: Binding) -> Result<(), GestureError> {
        self.set_enabled(binding, true)
    }

    /// Stop `binding` observing touches. No-op if already disabled.
    pub fn disable(&mut self, binding: Binding) -> Result<(), GestureError> {
        self.set_enabled(binding, false)
    }

    fn set_enabled(&mut self, binding: Binding, enabled: bool) -> Result<(), GestureError> {
        let entry = self.registry.get_mut(binding.id())?;
        if entry.enabled != enabled {
            entry.enabled = enabled;
            self.platform.set_recognizer_enabled(entry.recognizer, enabled);
            tracing::trace!(recognizer = ?entry.recognizer, enabled, "gesture toggled");
            if !enabled && matches!(entry.value, Route::DragSource(_)) {
                let view = entry.view;
                self.cancel_drag_from(view);
            }
        }
        Ok(())
    }

    /// A drag whose source stops observing touches never sees its end event,
    /// so the session is cancelled here.
    fn cancel_drag_from(&mut self, source: P::View) {
        if self.drag.session().is_some_and(|session| session.source == source) {
            tracing::debug!(?source, "drag source went away, cancelling drag");
            self.drag.cancel();
        }
    }

    /// Detach and forget `binding`. Later operations on it fail with
    /// [`GestureError::StaleHandle`].
    pub fn remove(&mut self, binding: Binding) -> Result<(), GestureError> {
        let entry = self.registry.remove(binding.id())?;
        self.platform.detach(entry.view, entry.recognizer);
        match entry.value {
            Route::DropTarget => {
                self.drag.remove_target(entry.view);
            }
            Route::Close { builtin } => self.platform.set_recognizer_enabled(builtin, true),
            Route::DragSource(_) => self.cancel_drag_from(entry.view),
            Route::Gesture(_) => {}
        }
        tracing::debug!(
            view = ?entry.view,
            recognizer = ?entry.recognizer,
            kind = %entry.config.kind(),
            "gesture removed"
        );
        Ok(())
    }

    /// Remove every binding attached to `view`. Returns how many were removed.
    pub fn remove_all_gestures(&mut self, view: P::View) -> usize {
        let mut removed = 0;
        for id in self.registry.bindings_for_view(view) {
            if self.remove(Binding::new(id)).is_ok() {
                removed += 1;
            }
        }
        removed
    }

    /// `first` gets first claim: `then` waits for `first` to fail.
    pub fn before(&mut self, first: Binding, then: Binding) -> Result<(), GestureError> {
        arbiter::declare_before(&mut self.registry, first.id(), then.id())
    }

    /// `later` waits for `first` to fail.
    pub fn after(&mut self, later: Binding, first: Binding) -> Result<(), GestureError> {
        arbiter::declare_before(&mut self.registry, first.id(), later.id())
    }

    /// Let `a` and `b` recognize at the same time.
    pub fn together_with(&mut self, a: Binding, b: Binding) -> Result<(), GestureError> {
        arbiter::declare_simultaneous(&mut self.registry, a.id(), b.id())
    }

    // --- platform call-outs ---

    /// Dispatch an action call-out from `recognizer`.
    pub fn on_action(&mut self, recognizer: P::Recognizer) -> Outcome {
        let Some(id) = self.registry.find(recognizer) else {
            tracing::trace!(?recognizer, "action from unknown recognizer");
            return Outcome::Ignored;
        };
        let Ok(entry) = self.registry.get_mut(id) else {
            return Outcome::Ignored;
        };
        if !entry.enabled {
            return Outcome::Disabled;
        }
        let view = entry.view;
        let config = entry.config;
        let kind = config.kind();
        match &mut entry.value {
            Route::Gesture(handler) => {
                let data = GestureData::read(&self.platform, kind, recognizer, view);
                if let Some(threshold) = config.force_threshold()
                    && !data.force().is_some_and(|force| force >= threshold)
                {
                    tracing::trace!(?recognizer, force = ?data.force(), threshold, "below threshold");
                    return Outcome::BelowThreshold;
                }
                match handler(&data) {
                    Ok(()) => Outcome::Handled,
                    Err(err) => {
                        tracing::error!(?recognizer, %kind, error = %err, "gesture handler failed");
                        Outcome::HandlerFailed
                    }
                }
            }
            Route::Close { .. } => {
                if self.platform.state(recognizer) == GestureState::Ended {
                    tracing::debug!(container = ?view, "dismissing");
                    self.platform.dismiss(view);
                    Outcome::Dismissed
                } else {
                    Outcome::Handled
                }
            }
            Route::DragSource(source) => {
                let state = self.platform.state(recognizer);
                if state == GestureState::Began {
                    if let Some(item) = self.drag.begin(view, source) {
                        self.platform.offer_external(view, &item);
                    }
                    return Outcome::Dragging;
                }
                self.drag_update(recognizer, state)
            }
            Route::DropTarget => Outcome::Ignored,
        }
    }

    fn drag_update(&mut self, recognizer: P::Recognizer, state: GestureState) -> Outcome {
        match state {
            GestureState::Changed => {
                let target = self.platform.view_under_touch(recognizer);
                if let Some(view) = self.active_drop_target(target)
                    && let Some(accepted) = self.drag.would_accept(view)
                {
                    self.platform.drop_affordance(view, accepted);
                }
                Outcome::Dragging
            }
            GestureState::Ended => {
                let target = self.platform.view_under_touch(recognizer);
                let target = self.active_drop_target(target);
                match self.drag.finish(target) {
                    Ok(DragPhase::Dropped) => Outcome::Dropped,
                    Ok(_) => Outcome::DragCancelled,
                    Err(err) => {
                        tracing::error!(?target, error = %err, "drop handler failed");
                        Outcome::HandlerFailed
                    }
                }
            }
            GestureState::Cancelled | GestureState::Failed => {
                self.drag.cancel();
                Outcome::DragCancelled
            }
            GestureState::Possible | GestureState::Began => Outcome::Ignored,
        }
    }

    /// Deliver an item dragged in from another application onto `target`.
    pub fn on_external_drop(&mut self, target: P::View, item: &EncodedItem) -> Outcome {
        let Some(target) = self.active_drop_target(Some(target)) else {
            return Outcome::DragCancelled;
        };
        match self.drag.receive_external(target, item) {
            Ok(DragPhase::Dropped) => Outcome::Dropped,
            Ok(_) => Outcome::DragCancelled,
            Err(err) => {
                tracing::error!(?target, error = %err, "drop handler failed");
                Outcome::HandlerFailed
            }
        }
    }

    /// May recognizers `a` and `b` recognize at the same time?
    pub fn should_recognize_simultaneously(&self, a: P::Recognizer, b: P::Recognizer) -> bool {
        let (Some(a), Some(b)) = (self.registry.find(a), self.registry.find(b)) else {
            return false;
        };
        self.arbiter.should_recognize_simultaneously(&self.registry, a, b)
    }

    /// Must `a` wait for `b` to fail?
    pub fn should_require_failure_of(&self, a: P::Recognizer, b: P::Recognizer) -> bool {
        let (Some(a), Some(b)) = (self.registry.find(a), self.registry.find(b)) else {
            return false;
        };
        self.arbiter.should_require_failure_of(&self.registry, a, b)
    }

    /// Must `a` fail before `b` may recognize?
    pub fn should_be_required_to_fail_by(&self, a: P::Recognizer, b: P::Recognizer) -> bool {
        let (Some(a), Some(b)) = (self.registry.find(a), self.registry.find(b)) else {
            return false;
        };
        self.arbiter.should_be_required_to_fail_by(&self.registry, a, b)
    }

    // --- helpers ---

    fn drop_binding(&self, view: P::View) -> Option<Binding> {
        self.registry
            .iter()
            .find(|(_, e)| e.view == view && matches!(e.value, Route::DropTarget))
            .map(|(id, _)| Binding::new(id))
    }

    /// `view` if it has an enabled drop target.
    fn active_drop_target(&self, view: Option<P::View>) -> Option<P::View> {
        let view = view?;
        let binding = self.drop_binding(view)?;
        let enabled = self.registry.get(binding.id()).is_ok_and(|e| e.enabled);
        (enabled && self.drag.is_target(view)).then_some(view)
    }
}

