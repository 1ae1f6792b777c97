// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag-and-drop payload passing.
//!
//! A drag is carried by a long-press recognizer on a source view. When it
//! begins, the source's payload is captured into a session; when it ends over a
//! registered drop target whose [`AcceptRule`] agrees, the target's handler
//! receives the payload.
//!
//! In-process payloads travel by reference: an [`Payload::Object`] arrives at the
//! drop handler as the same `Rc` the source handed out. Text and images are also
//! encoded into an [`EncodedItem`] so they can cross to other applications.
//!
//! ## Session states
//!
//! ```text
//! idle ──begin──▶ dragging ──finish (accepted)──▶ dropped
//!                    │
//!                    └──finish (rejected) / cancel──▶ cancelled
//! ```
//!
//! `dropped` and `cancelled` are terminal for a session; the next `begin`
//! starts a fresh one.
//!
//! ## Minimal example
//!
//! ```
//! use understory_gesture::drag_drop::{
//!     AcceptRule, DragDropCoordinator, DragPhase, DragSource, DropTarget, Payload, PayloadKind,
//! };
//!
//! let mut coordinator: DragDropCoordinator<u32> = DragDropCoordinator::new();
//! coordinator.add_target(
//!     2,
//!     DropTarget::new(AcceptRule::ByType(PayloadKind::Text), |event| {
//!         assert_eq!(event.payload.as_text(), Some("hello"));
//!         assert_eq!(event.source, Some(1));
//!         Ok(())
//!     }),
//! );
//!
//! let mut source = DragSource::new(Payload::text("hello"));
//! coordinator.begin(1, &mut source);
//! assert_eq!(coordinator.would_accept(2), Some(true));
//! assert_eq!(coordinator.finish(Some(2)).unwrap(), DragPhase::Dropped);
//! ```

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::any::{Any, TypeId};
use core::fmt;
use core::hash::Hash;

use hashbrown::HashMap;

use crate::error::{GestureError, HandlerError, HandlerResult};

/// Uniform type identifier for UTF-8 plain text.
pub const TEXT_TYPE: &str = "public.utf8-plain-text";

/// Uniform type identifier for PNG images.
pub const IMAGE_TYPE: &str = "public.png";

/// An image carried as encoded PNG bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Image {
    /// PNG-encoded bytes.
    pub png: Vec<u8>,
}

/// Something being dragged.
#[derive(Clone)]
pub enum Payload {
    /// Plain text.
    Text(String),
    /// An image.
    Image(Image),
    /// Any in-process object, passed by reference.
    Object(Rc<dyn Any>),
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Self::Image(image) => f
                .debug_struct("Image")
                .field("png_len", &image.png.len())
                .finish(),
            Self::Object(_) => f.write_str("Object(..)"),
        }
    }
}

impl Payload {
    /// A text payload.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// An in-process object payload.
    #[must_use]
    pub fn object<T: Any>(value: T) -> Self {
        Self::Object(Rc::new(value))
    }

    /// The kind of this payload.
    #[must_use]
    pub fn kind(&self) -> PayloadKind {
        match self {
            Self::Text(_) => PayloadKind::Text,
            Self::Image(_) => PayloadKind::Image,
            Self::Object(object) => PayloadKind::Object(Any::type_id(&**object)),
        }
    }

    /// The text, if this is a text payload.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Borrow the object as `T`, if this is an object payload of that type.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Self::Object(object) => object.downcast_ref(),
            _ => None,
        }
    }

    /// Whether the payload can be encoded for other applications.
    #[must_use]
    pub fn is_exportable(&self) -> bool {
        matches!(self, Self::Text(_) | Self::Image(_))
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Self::text(text)
    }
}

impl From<Image> for Payload {
    fn from(image: Image) -> Self {
        Self::Image(image)
    }
}

/// Type check used by [`AcceptRule::ByType`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PayloadKind {
    /// Plain text.
    Text,
    /// An image.
    Image,
    /// An in-process object of one concrete type.
    Object(TypeId),
    /// Anything.
    Any,
}

impl PayloadKind {
    /// Object payloads of type `T`.
    #[must_use]
    pub fn of<T: Any>() -> Self {
        Self::Object(TypeId::of::<T>())
    }

    /// Whether `payload` is of this kind.
    #[must_use]
    pub fn matches(self, payload: &Payload) -> bool {
        self == Self::Any || self == payload.kind()
    }
}

/// Where a drag source gets its payload.
pub enum PayloadSource {
    /// A fixed payload, cloned for every drag.
    Value(Payload),
    /// Produces the payload when the drag begins.
    Callable(Box<dyn FnMut() -> Payload>),
}

impl fmt::Debug for PayloadSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(payload) => f.debug_tuple("Value").field(payload).finish(),
            Self::Callable(_) => f.write_str("Callable(..)"),
        }
    }
}

impl PayloadSource {
    fn capture(&mut self) -> Payload {
        match self {
            Self::Value(payload) => payload.clone(),
            Self::Callable(produce) => produce(),
        }
    }
}

/// Drag source registration.
#[derive(Debug)]
pub struct DragSource {
    /// The payload, or how to produce it.
    pub payload: PayloadSource,
    /// Offer text and image payloads to other applications as well.
    pub allow_others: bool,
}

impl DragSource {
    /// Drag a fixed payload within this process.
    #[must_use]
    pub fn new(payload: impl Into<Payload>) -> Self {
        Self {
            payload: PayloadSource::Value(payload.into()),
            allow_others: false,
        }
    }

    /// Drag whatever `produce` returns when the drag begins.
    #[must_use]
    pub fn from_fn(produce: impl FnMut() -> Payload + 'static) -> Self {
        Self {
            payload: PayloadSource::Callable(Box::new(produce)),
            allow_others: false,
        }
    }

    /// Allow the payload to be dropped in other applications.
    #[must_use]
    pub fn allow_others(mut self, allow: bool) -> Self {
        self.allow_others = allow;
        self
    }
}

/// A payload encoded for the cross-process drag session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedItem {
    /// Uniform type identifier, [`TEXT_TYPE`] or [`IMAGE_TYPE`].
    pub type_identifier: &'static str,
    /// Encoded bytes.
    pub data: Vec<u8>,
}

impl EncodedItem {
    /// Encode a text or image payload.
    ///
    /// Object payloads only travel within the process.
    pub fn encode(payload: &Payload) -> Result<Self, GestureError> {
        match payload {
            Payload::Text(text) => Ok(Self {
                type_identifier: TEXT_TYPE,
                data: text.as_bytes().to_vec(),
            }),
            Payload::Image(image) => Ok(Self {
                type_identifier: IMAGE_TYPE,
                data: image.png.clone(),
            }),
            Payload::Object(_) => Err(GestureError::UnsupportedPayloadType(payload.kind())),
        }
    }

    /// Decode an item received from another application.
    ///
    /// Returns `None` for unknown type identifiers and text that is not UTF-8.
    #[must_use]
    pub fn decode(&self) -> Option<Payload> {
        match self.type_identifier {
            TEXT_TYPE => String::from_utf8(self.data.clone()).ok().map(Payload::Text),
            IMAGE_TYPE => Some(Payload::Image(Image {
                png: self.data.clone(),
            })),
            _ => None,
        }
    }
}

/// Caller-supplied accept predicate.
pub type AcceptPredicate = Box<dyn Fn(&Payload) -> Result<bool, HandlerError>>;

/// Decides whether a drop target takes a payload.
pub enum AcceptRule {
    /// Accept payloads of a kind.
    ByType(PayloadKind),
    /// Accept payloads the predicate approves. A failing predicate rejects.
    ByPredicate(AcceptPredicate),
}

impl fmt::Debug for AcceptRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ByType(kind) => f.debug_tuple("ByType").field(kind).finish(),
            Self::ByPredicate(_) => f.write_str("ByPredicate(..)"),
        }
    }
}

impl AcceptRule {
    /// Accept payloads for which `f` returns `Ok(true)`.
    #[must_use]
    pub fn predicate(f: impl Fn(&Payload) -> Result<bool, HandlerError> + 'static) -> Self {
        Self::ByPredicate(Box::new(f))
    }

    /// Evaluate the rule against `payload`.
    #[must_use]
    pub fn accepts(&self, payload: &Payload) -> bool {
        match self {
            Self::ByType(kind) => kind.matches(payload),
            Self::ByPredicate(f) => match f(payload) {
                Ok(accepted) => accepted,
                Err(err) => {
                    tracing::warn!(error = %err, "accept predicate failed, rejecting drop");
                    false
                }
            },
        }
    }
}

/// What a drop handler receives.
#[derive(Clone, Debug)]
pub struct DropEvent<V> {
    /// The dropped payload.
    pub payload: Payload,
    /// Source view, or `None` when the drag came from another application.
    pub source: Option<V>,
    /// The view the payload was dropped on.
    pub target: V,
}

/// Drop handler callback.
pub type DropHandler<V> = Box<dyn FnMut(DropEvent<V>) -> HandlerResult>;

/// Drop target registration.
pub struct DropTarget<V> {
    /// Which payloads this target takes.
    pub accept: AcceptRule,
    /// Called with accepted payloads.
    pub handler: DropHandler<V>,
}

impl<V> fmt::Debug for DropTarget<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DropTarget")
            .field("accept", &self.accept)
            .finish_non_exhaustive()
    }
}

impl<V> DropTarget<V> {
    /// Create a drop target.
    #[must_use]
    pub fn new(
        accept: AcceptRule,
        handler: impl FnMut(DropEvent<V>) -> HandlerResult + 'static,
    ) -> Self {
        Self {
            accept,
            handler: Box::new(handler),
        }
    }
}

/// Phase of the current drag session.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum DragPhase {
    /// No drag has started yet.
    #[default]
    Idle,
    /// A payload is being carried.
    Dragging,
    /// The payload was delivered to a drop target.
    Dropped,
    /// The drag ended without delivery.
    Cancelled,
}

/// A drag in progress.
#[derive(Debug)]
pub struct DragSession<V> {
    /// Source view.
    pub source: V,
    /// Captured payload.
    pub payload: Payload,
    /// Cross-process encoding, for text and image payloads.
    pub encoded: Option<EncodedItem>,
    /// Whether other applications may receive the payload.
    pub allow_others: bool,
}

/// Owns drop targets and the drag session.
pub struct DragDropCoordinator<V> {
    targets: HashMap<V, DropTarget<V>>,
    session: Option<DragSession<V>>,
    phase: DragPhase,
}

impl<V> Default for DragDropCoordinator<V> {
    fn default() -> Self {
        Self {
            targets: HashMap::new(),
            session: None,
            phase: DragPhase::Idle,
        }
    }
}

impl<V: fmt::Debug> fmt::Debug for DragDropCoordinator<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DragDropCoordinator")
            .field("targets", &self.targets.len())
            .field("session", &self.session)
            .field("phase", &self.phase)
            .finish()
    }
}

impl<V: Copy + Eq + Hash + fmt::Debug> DragDropCoordinator<V> {
    /// Create a coordinator with no targets.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `view` as a drop target, replacing any previous registration.
    pub fn add_target(&mut self, view: V, target: DropTarget<V>) {
        self.targets.insert(view, target);
    }

    /// Stop treating `view` as a drop target.
    pub fn remove_target(&mut self, view: V) -> Option<DropTarget<V>> {
        self.targets.remove(&view)
    }

    /// Whether `view` is a registered drop target.
    #[must_use]
    pub fn is_target(&self, view: V) -> bool {
        self.targets.contains_key(&view)
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    /// The drag in progress, if any.
    #[must_use]
    pub fn session(&self) -> Option<&DragSession<V>> {
        self.session.as_ref()
    }

    /// Start a drag from `source`, capturing its payload.
    ///
    /// Returns the item to offer to other applications when the source allows
    /// it. An object payload with `allow_others` set still drags in-process.
    pub fn begin(&mut self, source: V, drag: &mut DragSource) -> Option<EncodedItem> {
        if self.session.is_some() {
            tracing::debug!(?source, "replacing unfinished drag session");
        }
        let payload = drag.payload.capture();
        let encoded = match EncodedItem::encode(&payload) {
            Ok(item) => Some(item),
            Err(err) => {
                if drag.allow_others {
                    tracing::warn!(?source, error = %err, "payload stays in-process");
                }
                None
            }
        };
        let offer = if drag.allow_others {
            encoded.clone()
        } else {
            None
        };
        tracing::debug!(?source, kind = ?payload.kind(), "drag began");
        self.session = Some(DragSession {
            source,
            payload,
            encoded,
            allow_others: drag.allow_others,
        });
        self.phase = DragPhase::Dragging;
        offer
    }

    /// Whether the target at `view` would take the current payload.
    ///
    /// `None` when nothing is being dragged or `view` is not a drop target.
    #[must_use]
    pub fn would_accept(&self, view: V) -> Option<bool> {
        let session = self.session.as_ref()?;
        let target = self.targets.get(&view)?;
        Some(target.accept.accepts(&session.payload))
    }

    /// End the drag over `target` (or over nothing).
    ///
    /// Returns the terminal phase. With no drag in progress the phase is
    /// returned unchanged. A handler failure is returned after the session has
    /// been released.
    pub fn finish(&mut self, target: Option<V>) -> Result<DragPhase, HandlerError> {
        let Some(session) = self.session.take() else {
            return Ok(self.phase);
        };
        let DragSession {
            source, payload, ..
        } = session;
        let delivered = match target {
            Some(view) => self
                .targets
                .get_mut(&view)
                .filter(|t| t.accept.accepts(&payload))
                .map(|t| (view, t)),
            None => None,
        };
        let Some((view, drop_target)) = delivered else {
            tracing::debug!(?source, ?target, "drag cancelled");
            self.phase = DragPhase::Cancelled;
            return Ok(self.phase);
        };
        tracing::debug!(?source, target = ?view, "drag dropped");
        self.phase = DragPhase::Dropped;
        (drop_target.handler)(DropEvent {
            payload,
            source: Some(source),
            target: view,
        })?;
        Ok(self.phase)
    }

    /// Abandon the drag in progress, releasing its payload.
    pub fn cancel(&mut self) {
        if let Some(session) = self.session.take() {
            tracing::debug!(source = ?session.source, "drag cancelled");
            self.phase = DragPhase::Cancelled;
        }
    }

    /// Deliver an item dragged in from another application onto `target`.
    ///
    /// The in-process session is not affected. Returns `Dropped` when the
    /// target accepted and its handler ran, `Cancelled` otherwise.
    pub fn receive_external(
        &mut self,
        target: V,
        item: &EncodedItem,
    ) -> Result<DragPhase, HandlerError> {
        let Some(payload) = item.decode() else {
            tracing::warn!(
                ?target,
                type_identifier = item.type_identifier,
                "undecodable external drop"
            );
            return Ok(DragPhase::Cancelled);
        };
        let Some(drop_target) = self.targets.get_mut(&target) else {
            return Ok(DragPhase::Cancelled);
        };
        if !drop_target.accept.accepts(&payload) {
            return Ok(DragPhase::Cancelled);
        }
        tracing::debug!(?target, kind = ?payload.kind(), "external drop");
        (drop_target.handler)(DropEvent {
            payload,
            source: None,
            target,
        })?;
        Ok(DragPhase::Dropped)
    }
}
