// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.

use alloc::boxed::Box;
use core::fmt;

use crate::drag_drop::PayloadKind;
use crate::registry::BindingId;

/// Error raised by a caller-supplied handler or accept predicate.
pub type HandlerError = Box<dyn core::error::Error + 'static>;

/// Result returned by caller-supplied handlers.
pub type HandlerResult = Result<(), HandlerError>;

/// Errors returned by registration and binding operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GestureError {
    /// A tuning option is outside its documented domain.
    ///
    /// Raised at registration time, before any native recognizer is created.
    InvalidConfiguration {
        /// Name of the offending option.
        option: &'static str,
        /// What the option must satisfy.
        reason: &'static str,
    },
    /// The binding was already removed.
    StaleHandle(BindingId),
    /// The payload cannot leave the process; only text and images can.
    UnsupportedPayloadType(PayloadKind),
    /// The host does not present a built-in close gesture for this view.
    CloseGestureUnavailable,
}

impl GestureError {
    pub(crate) const fn invalid(option: &'static str, reason: &'static str) -> Self {
        Self::InvalidConfiguration { option, reason }
    }
}

impl fmt::Display for GestureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfiguration { option, reason } => {
                write!(f, "invalid gesture option `{option}`: {reason}")
            }
            Self::StaleHandle(id) => write!(f, "{id:?} was already removed"),
            Self::UnsupportedPayloadType(kind) => {
                write!(f, "{kind:?} payloads cannot be dragged to other applications")
            }
            Self::CloseGestureUnavailable => {
                f.write_str("no built-in close gesture found for this view")
            }
        }
    }
}

impl core::error::Error for GestureError {}
