// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_gesture --heading-base-level=0

//! Understory Gesture: a dispatcher for platform gesture recognizers.
//!
//! This crate sits between a native gesture engine and application code. It does
//! **not** recognize gestures itself: the platform owns the recognizers, does the
//! hit-testing and decides when a gesture begins, changes or ends. This crate
//! does the bookkeeping around that:
//!
//! - Registration: one call per gesture kind creates, configures and attaches a
//!   native recognizer and returns a [`Binding`] handle.
//! - Dispatch: platform call-outs become a [`GestureData`] record handed to the
//!   bound handler.
//! - Arbitration: `before`/`after`/`together_with` declarations answer the
//!   platform's simultaneity and failure-requirement questions.
//! - Drag and drop: payloads travel from drag sources to drop targets, by
//!   reference within the process and as encoded text or images between
//!   applications.
//!
//! The platform is reached through the [`GesturePlatform`] trait, with opaque,
//! copyable view and recognizer ids.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Point, Vec2};
//! use understory_gesture::options::TapOptions;
//! use understory_gesture::{
//!     CloseGesture, GesturePlatform, GestureState, Gestures, Outcome, RecognizerConfig,
//!     TouchForce,
//! };
//!
//! #[derive(Default)]
//! struct Host {
//!     next: u32,
//!     state: GestureState,
//! }
//!
//! impl GesturePlatform for Host {
//!     type View = u32;
//!     type Recognizer = u32;
//!
//!     fn create_recognizer(&mut self, _: &RecognizerConfig) -> u32 {
//!         self.next += 1;
//!         self.next
//!     }
//!     fn attach(&mut self, _: u32, _: u32) {}
//!     fn detach(&mut self, _: u32, _: u32) {}
//!     fn set_recognizer_enabled(&mut self, _: u32, _: bool) {}
//!     fn set_touch_enabled(&mut self, _: u32, _: bool) {}
//!     fn state(&self, _: u32) -> GestureState { self.state }
//!     fn location_in(&self, _: u32, _: u32) -> Point { Point::new(4.0, 2.0) }
//!     fn number_of_touches(&self, _: u32) -> usize { 1 }
//!     fn translation_in(&self, _: u32, _: u32) -> Vec2 { Vec2::ZERO }
//!     fn velocity_in(&self, _: u32, _: u32) -> Vec2 { Vec2::ZERO }
//!     fn scale(&self, _: u32) -> f64 { 1.0 }
//!     fn rotation(&self, _: u32) -> f64 { 0.0 }
//!     fn velocity(&self, _: u32) -> f64 { 0.0 }
//!     fn touch_force(&self, _: u32) -> Option<TouchForce> { None }
//!     fn view_under_touch(&self, _: u32) -> Option<u32> { None }
//!     fn close_gesture(&self, _: u32) -> Option<CloseGesture<u32, u32>> { None }
//!     fn dismiss(&mut self, _: u32) {}
//! }
//!
//! let mut gestures = Gestures::new(Host::default());
//! let view = 1;
//! let tap = gestures
//!     .tap(view, TapOptions::new(), |data| {
//!         assert!(data.ended());
//!         assert_eq!(data.location, Point::new(4.0, 2.0));
//!         Ok(())
//!     })
//!     .unwrap();
//!
//! let recognizer = gestures.recognizer(tap).unwrap();
//! gestures.platform_mut().state = GestureState::Ended;
//! assert_eq!(gestures.on_action(recognizer), Outcome::Handled);
//!
//! tap.disable(&mut gestures).unwrap();
//! assert_eq!(gestures.on_action(recognizer), Outcome::Disabled);
//! ```
//!
//! ## Arbitration
//!
//! By default only one recognizer wins. `a.before(b)` gives `a` first claim:
//! the platform is told that `b` must wait for `a` to fail. `a.after(b)` is the
//! same declaration seen from the other side, and `a.together_with(b)` lets both
//! recognize at once. Pairs with no declaration can fall back to a kind-level
//! [`ArbitrationPolicy`] for recognizers on the same view.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod arbiter;
mod binding;
mod data;
mod dispatcher;
pub mod drag_drop;
mod error;
pub mod options;
mod platform;
pub mod registry;
mod state;

pub use arbiter::ArbitrationPolicy;
pub use binding::Binding;
pub use data::{GestureData, GestureDetails};
pub use dispatcher::{Gestures, Handler, HandlerFn, Outcome};
pub use drag_drop::{
    AcceptRule, DragPhase, DragSource, DropEvent, DropTarget, EncodedItem, Image, Payload,
    PayloadKind,
};
pub use error::{GestureError, HandlerError, HandlerResult};
pub use options::RecognizerConfig;
pub use platform::{CloseGesture, GesturePlatform, TouchForce};
pub use registry::BindingId;
pub use state::{Edges, GestureKind, GestureState, SwipeDirection};
