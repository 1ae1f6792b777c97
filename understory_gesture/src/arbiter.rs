// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Simultaneity and priority arbitration.
//!
//! The platform asks three questions whenever two recognizers compete:
//!
//! - may `a` and `b` recognize at the same time?
//! - must `a` wait for `b` to fail?
//! - must `a` fail before `b` may recognize?
//!
//! Answers come from per-binding [`Declarations`] first. `X.before(Y)` means
//! `Y` waits for `X` to fail, so `X` gets first claim; it is stored on both
//! sides (`X.priority_before ∋ Y`, `Y.priority_after ∋ X`) so the lookup does
//! not depend on which binding is queried. When no declaration decides, the
//! optional kind-level [`ArbitrationPolicy`] is consulted for recognizers on
//! the same view. Otherwise the answer is `false`, which leaves the platform's
//! exclusive default in place.
//!
//! ```
//! use understory_gesture::arbiter::{self, Arbiter};
//! use understory_gesture::options::{PanOptions, RecognizerConfig, SwipeOptions};
//! use understory_gesture::registry::Registry;
//!
//! let mut registry: Registry<u32, u32, ()> = Registry::new();
//! let swipe = registry.insert(1, 10, RecognizerConfig::Swipe(SwipeOptions::new()), ());
//! let pan = registry.insert(1, 11, RecognizerConfig::Pan(PanOptions::new()), ());
//!
//! arbiter::declare_before(&mut registry, swipe, pan).unwrap();
//!
//! let arbiter = Arbiter::default();
//! assert!(arbiter.should_require_failure_of(&registry, pan, swipe));
//! assert!(!arbiter.should_require_failure_of(&registry, swipe, pan));
//! ```

use alloc::boxed::Box;
use core::fmt;

use smallvec::SmallVec;

use crate::error::GestureError;
use crate::registry::{BindingId, Registry};
use crate::state::GestureKind;

type BindingSet = SmallVec<[BindingId; 2]>;

fn insert_unique(set: &mut BindingSet, id: BindingId) {
    if !set.contains(&id) {
        set.push(id);
    }
}

fn remove_all(set: &mut BindingSet, id: BindingId) {
    set.retain(|other| *other != id);
}

/// Arbitration declarations recorded for one binding.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Declarations {
    /// Bindings this one goes before (they wait for this one to fail).
    pub priority_before: BindingSet,
    /// Bindings this one goes after (this one waits for them to fail).
    pub priority_after: BindingSet,
    /// Bindings allowed to recognize together with this one.
    pub simultaneous_with: BindingSet,
}

impl Declarations {
    /// Drop every declaration mentioning `id`.
    pub fn forget(&mut self, id: BindingId) {
        remove_all(&mut self.priority_before, id);
        remove_all(&mut self.priority_after, id);
        remove_all(&mut self.simultaneous_with, id);
    }

    /// Returns `true` when no declaration was made.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.priority_before.is_empty()
            && self.priority_after.is_empty()
            && self.simultaneous_with.is_empty()
    }
}

/// Declare that `first` goes before `then`: `then` waits for `first` to fail.
///
/// A previous opposite declaration between the two is replaced.
pub fn declare_before<V, R, T>(
    registry: &mut Registry<V, R, T>,
    first: BindingId,
    then: BindingId,
) -> Result<(), GestureError>
where
    V: Copy + Eq,
    R: Copy + Eq + core::hash::Hash,
{
    let (f, t) = registry.get2_mut(first, then)?;
    remove_all(&mut f.declarations.priority_after, then);
    remove_all(&mut t.declarations.priority_before, first);
    insert_unique(&mut f.declarations.priority_before, then);
    insert_unique(&mut t.declarations.priority_after, first);
    Ok(())
}

/// Declare that `a` and `b` may recognize at the same time.
pub fn declare_simultaneous<V, R, T>(
    registry: &mut Registry<V, R, T>,
    a: BindingId,
    b: BindingId,
) -> Result<(), GestureError>
where
    V: Copy + Eq,
    R: Copy + Eq + core::hash::Hash,
{
    let (ea, _) = registry.get2_mut(a, b)?;
    insert_unique(&mut ea.declarations.simultaneous_with, b);
    Ok(())
}

/// Predicate over a pair of gesture kinds.
pub type KindPredicate = Box<dyn Fn(GestureKind, GestureKind) -> bool>;

/// Kind-level fallback answers, used for recognizers on the same view.
///
/// All three predicates default to "no".
///
/// ```
/// use understory_gesture::arbiter::ArbitrationPolicy;
/// use understory_gesture::GestureKind;
///
/// let policy = ArbitrationPolicy::new().recognize_simultaneously(|a, b| {
///     a == GestureKind::Pan && b == GestureKind::Pinch
/// });
/// assert!(policy.simultaneous(GestureKind::Pan, GestureKind::Pinch));
/// assert!(!policy.simultaneous(GestureKind::Pinch, GestureKind::Tap));
/// ```
#[derive(Default)]
pub struct ArbitrationPolicy {
    recognize_simultaneously: Option<KindPredicate>,
    require_failure_of: Option<KindPredicate>,
    be_required_to_fail_by: Option<KindPredicate>,
}

impl fmt::Debug for ArbitrationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArbitrationPolicy")
            .field(
                "recognize_simultaneously",
                &self.recognize_simultaneously.is_some(),
            )
            .field("require_failure_of", &self.require_failure_of.is_some())
            .field(
                "be_required_to_fail_by",
                &self.be_required_to_fail_by.is_some(),
            )
            .finish()
    }
}

impl ArbitrationPolicy {
    /// A policy that answers "no" to everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allow kinds matching `f` to recognize together.
    #[must_use]
    pub fn recognize_simultaneously(
        mut self,
        f: impl Fn(GestureKind, GestureKind) -> bool + 'static,
    ) -> Self {
        self.recognize_simultaneously = Some(Box::new(f));
        self
    }

    /// Make the first kind wait for the second to fail when `f` matches.
    #[must_use]
    pub fn require_failure_of(
        mut self,
        f: impl Fn(GestureKind, GestureKind) -> bool + 'static,
    ) -> Self {
        self.require_failure_of = Some(Box::new(f));
        self
    }

    /// Make the first kind fail before the second may recognize when `f` matches.
    #[must_use]
    pub fn be_required_to_fail_by(
        mut self,
        f: impl Fn(GestureKind, GestureKind) -> bool + 'static,
    ) -> Self {
        self.be_required_to_fail_by = Some(Box::new(f));
        self
    }

    /// Kind-level simultaneity answer.
    #[must_use]
    pub fn simultaneous(&self, a: GestureKind, b: GestureKind) -> bool {
        self.recognize_simultaneously.as_ref().is_some_and(|f| f(a, b))
    }

    /// Kind-level "`a` waits for `b`" answer.
    #[must_use]
    pub fn waits_for(&self, a: GestureKind, b: GestureKind) -> bool {
        self.require_failure_of.as_ref().is_some_and(|f| f(a, b))
    }

    /// Kind-level "`a` must fail before `b`" answer.
    #[must_use]
    pub fn yields_to(&self, a: GestureKind, b: GestureKind) -> bool {
        self.be_required_to_fail_by.as_ref().is_some_and(|f| f(a, b))
    }
}

/// Answers the platform's arbitration questions.
#[derive(Debug, Default)]
pub struct Arbiter {
    policy: ArbitrationPolicy,
}

impl Arbiter {
    /// Create an arbiter falling back to `policy`.
    #[must_use]
    pub fn new(policy: ArbitrationPolicy) -> Self {
        Self { policy }
    }

    /// The kind-level fallback policy.
    #[must_use]
    pub fn policy(&self) -> &ArbitrationPolicy {
        &self.policy
    }

    /// Replace the kind-level fallback policy.
    pub fn set_policy(&mut self, policy: ArbitrationPolicy) {
        self.policy = policy;
    }

    /// May `a` and `b` recognize at the same time?
    pub fn should_recognize_simultaneously<V, R, T>(
        &self,
        registry: &Registry<V, R, T>,
        a: BindingId,
        b: BindingId,
    ) -> bool
    where
        V: Copy + Eq,
        R: Copy + Eq + core::hash::Hash,
    {
        let (Ok(ea), Ok(eb)) = (registry.get(a), registry.get(b)) else {
            return false;
        };
        if ea.declarations.simultaneous_with.contains(&b)
            || eb.declarations.simultaneous_with.contains(&a)
        {
            return true;
        }
        ea.view == eb.view && self.policy.simultaneous(ea.kind(), eb.kind())
    }

    /// Must `a` wait for `b` to fail before recognizing?
    ///
    /// True when `b.before(a)` (equivalently `a.after(b)`) was declared.
    pub fn should_require_failure_of<V, R, T>(
        &self,
        registry: &Registry<V, R, T>,
        a: BindingId,
        b: BindingId,
    ) -> bool
    where
        V: Copy + Eq,
        R: Copy + Eq + core::hash::Hash,
    {
        let (Ok(ea), Ok(eb)) = (registry.get(a), registry.get(b)) else {
            return false;
        };
        if ea.declarations.priority_after.contains(&b) {
            return true;
        }
        if ea.declarations.priority_before.contains(&b) {
            return false;
        }
        ea.view == eb.view && self.policy.waits_for(ea.kind(), eb.kind())
    }

    /// Must `a` fail before `b` may recognize?
    ///
    /// The mirror of [`Arbiter::should_require_failure_of`] with the arguments swapped.
    pub fn should_be_required_to_fail_by<V, R, T>(
        &self,
        registry: &Registry<V, R, T>,
        a: BindingId,
        b: BindingId,
    ) -> bool
    where
        V: Copy + Eq,
        R: Copy + Eq + core::hash::Hash,
    {
        if self.should_require_failure_of(registry, b, a) {
            return true;
        }
        let (Ok(ea), Ok(eb)) = (registry.get(a), registry.get(b)) else {
            return false;
        };
        if ea.declarations.priority_after.contains(&b) {
            return false;
        }
        ea.view == eb.view && self.policy.yields_to(ea.kind(), eb.kind())
    }
}
