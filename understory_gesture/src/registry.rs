// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Handler registry: an owned arena of registered recognizers.
//!
//! Each entry is keyed by a generational [`BindingId`] and indexed by the native
//! recognizer, so call-outs can find their entry and callers can find theirs.
//! The registry keeps the entry value (the handler) alive exactly as long as
//! the recognizer is registered.
//!
//! ```
//! use understory_gesture::options::{RecognizerConfig, TapOptions};
//! use understory_gesture::registry::Registry;
//!
//! let mut registry: Registry<u32, u32, &str> = Registry::new();
//! let id = registry.insert(1, 100, RecognizerConfig::Tap(TapOptions::new()), "tap");
//! assert_eq!(registry.find(100), Some(id));
//!
//! registry.remove(id).unwrap();
//! assert!(!registry.is_alive(id));
//! assert!(registry.get(id).is_err());
//! ```

use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::Hash;

use hashbrown::HashMap;

use crate::arbiter::Declarations;
use crate::error::GestureError;
use crate::options::RecognizerConfig;
use crate::state::GestureKind;

/// Identifier of a registered recognizer.
///
/// A slot index plus a generation counter, following the box tree's `NodeId`:
///
/// - On insert, a fresh slot starts at generation `1`.
/// - On remove, the slot is freed and every `BindingId` pointing at it is stale.
/// - On reuse, the generation is incremented so stale ids never alias a new entry.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct BindingId(pub(crate) u32, pub(crate) u32);

impl BindingId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// One registered recognizer.
#[derive(Debug)]
pub struct Entry<V, R, T> {
    /// View the recognizer is attached to.
    pub view: V,
    /// Native recognizer.
    pub recognizer: R,
    /// Validated configuration the recognizer was created with.
    pub config: RecognizerConfig,
    /// Whether the recognizer currently observes touches.
    pub enabled: bool,
    /// Priority and simultaneity declarations.
    pub declarations: Declarations,
    /// Caller payload (the handler).
    pub value: T,
}

impl<V, R, T> Entry<V, R, T> {
    /// Kind of the registered gesture.
    #[must_use]
    pub fn kind(&self) -> GestureKind {
        self.config.kind()
    }
}

struct Slot<V, R, T> {
    generation: u32,
    entry: Entry<V, R, T>,
}

/// Arena of registered recognizers.
pub struct Registry<V, R, T> {
    slots: Vec<Option<Slot<V, R, T>>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
    by_recognizer: HashMap<R, BindingId>,
}

impl<V, R, T> Default for Registry<V, R, T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            by_recognizer: HashMap::new(),
        }
    }
}

impl<V, R, T> Registry<V, R, T> {
    /// Number of live entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len() - self.free_list.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<V, R, T> Debug for Registry<V, R, T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Registry")
            .field("live", &self.len())
            .field("slots", &self.slots.len())
            .field("free_list", &self.free_list.len())
            .finish_non_exhaustive()
    }
}

impl<V, R, T> Registry<V, R, T>
where
    V: Copy + Eq,
    R: Copy + Eq + Hash,
{
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new entry and return its id.
    ///
    /// A recognizer that is already registered has its old entry replaced and
    /// dropped; callers that own resources in the entry remove it first.
    pub fn insert(&mut self, view: V, recognizer: R, config: RecognizerConfig, value: T) -> BindingId {
        if let Some(old) = self.by_recognizer.get(&recognizer).copied() {
            let _ = self.remove(old);
        }
        let entry = Entry {
            view,
            recognizer,
            config,
            enabled: true,
            declarations: Declarations::default(),
            value,
        };
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.slots[idx] = Some(Slot { generation, entry });
            (idx, generation)
        } else {
            let generation = 1_u32;
            self.slots.push(Some(Slot { generation, entry }));
            self.generations.push(generation);
            (self.slots.len() - 1, generation)
        };
        #[expect(
            clippy::cast_possible_truncation,
            reason = "BindingId uses 32-bit indices by design."
        )]
        let id = BindingId::new(idx as u32, generation);
        self.by_recognizer.insert(recognizer, id);
        id
    }

    /// Returns `true` if `id` refers to a live entry.
    #[must_use]
    pub fn is_alive(&self, id: BindingId) -> bool {
        self.slots
            .get(id.idx())
            .and_then(|s| s.as_ref())
            .is_some_and(|s| s.generation == id.1)
    }

    /// Borrow the entry for `id`.
    pub fn get(&self, id: BindingId) -> Result<&Entry<V, R, T>, GestureError> {
        match self.slots.get(id.idx()) {
            Some(Some(slot)) if slot.generation == id.1 => Ok(&slot.entry),
            _ => Err(GestureError::StaleHandle(id)),
        }
    }

    /// Mutably borrow the entry for `id`.
    pub fn get_mut(&mut self, id: BindingId) -> Result<&mut Entry<V, R, T>, GestureError> {
        match self.slots.get_mut(id.idx()) {
            Some(Some(slot)) if slot.generation == id.1 => Ok(&mut slot.entry),
            _ => Err(GestureError::StaleHandle(id)),
        }
    }

    /// Mutably borrow two distinct entries at once.
    pub fn get2_mut(
        &mut self,
        a: BindingId,
        b: BindingId,
    ) -> Result<(&mut Entry<V, R, T>, &mut Entry<V, R, T>), GestureError> {
        self.get(a)?;
        self.get(b)?;
        if a.idx() == b.idx() {
            return Err(GestureError::invalid(
                "other",
                "must be a different binding than the one declaring",
            ));
        }
        let (lo, hi) = if a.idx() < b.idx() { (a, b) } else { (b, a) };
        let (head, tail) = self.slots.split_at_mut(hi.idx());
        let lo_entry = head[lo.idx()].as_mut().map(|s| &mut s.entry);
        let hi_entry = tail[0].as_mut().map(|s| &mut s.entry);
        match (lo_entry, hi_entry) {
            (Some(l), Some(h)) if a.idx() < b.idx() => Ok((l, h)),
            (Some(l), Some(h)) => Ok((h, l)),
            _ => Err(GestureError::StaleHandle(a)),
        }
    }

    /// Look up the entry registered for a native recognizer.
    #[must_use]
    pub fn find(&self, recognizer: R) -> Option<BindingId> {
        self.by_recognizer.get(&recognizer).copied()
    }

    /// Remove the entry for `id`, returning it.
    ///
    /// Declarations other entries made about `id` are dropped with it.
    pub fn remove(&mut self, id: BindingId) -> Result<Entry<V, R, T>, GestureError> {
        if !self.is_alive(id) {
            return Err(GestureError::StaleHandle(id));
        }
        let Some(slot) = self.slots[id.idx()].take() else {
            return Err(GestureError::StaleHandle(id));
        };
        self.free_list.push(id.idx());
        self.by_recognizer.remove(&slot.entry.recognizer);
        for other in self.slots.iter_mut().flatten() {
            other.entry.declarations.forget(id);
        }
        Ok(slot.entry)
    }

    /// Ids of every live entry attached to `view`, oldest slot first.
    #[must_use]
    pub fn bindings_for_view(&self, view: V) -> Vec<BindingId> {
        self.iter()
            .filter(|(_, e)| e.view == view)
            .map(|(id, _)| id)
            .collect()
    }

    /// Iterate over live entries.
    pub fn iter(&self) -> impl Iterator<Item = (BindingId, &Entry<V, R, T>)> + '_ {
        self.slots.iter().enumerate().filter_map(|(idx, slot)| {
            slot.as_ref().map(|s| {
                #[expect(
                    clippy::cast_possible_truncation,
                    reason = "BindingId uses 32-bit indices by design."
                )]
                let id = BindingId::new(idx as u32, s.generation);
                (id, &s.entry)
            })
        })
    }
}
