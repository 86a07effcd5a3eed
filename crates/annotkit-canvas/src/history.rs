//! Bounded snapshot history.
//!
//! Each entry is a full copy of the shape set taken after a committed edit,
//! so the newest entry always mirrors the live state. Restoring drops that
//! entry and hands back the one below it.

use std::collections::VecDeque;

/// Bounded stack of state snapshots with a redo trail.
#[derive(Debug, Clone)]
pub struct SnapshotHistory<T> {
    snapshots: VecDeque<T>,
    /// `(prior, current)` pairs popped by each restore.
    undone: Vec<(T, T)>,
    capacity: usize,
}

impl<T: Clone> SnapshotHistory<T> {
    /// Empty history holding at most `capacity` snapshots (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            snapshots: VecDeque::with_capacity(capacity + 1),
            undone: Vec::new(),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// The newest snapshot.
    pub fn latest(&self) -> Option<&T> {
        self.snapshots.back()
    }

    /// Snapshots from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.snapshots.iter()
    }

    /// Record a new state. Evicts the oldest snapshot past capacity and
    /// forgets anything that could have been redone.
    pub fn push(&mut self, state: T) {
        self.undone.clear();
        self.push_bounded(state);
    }

    /// Drop the newest snapshot and record `state` in its place.
    pub fn replace_latest(&mut self, state: T) {
        self.snapshots.pop_back();
        self.push(state);
    }

    /// A restore needs the current snapshot plus one before it.
    pub fn can_restore(&self) -> bool {
        self.snapshots.len() >= 2
    }

    pub fn can_redo(&self) -> bool {
        !self.undone.is_empty()
    }

    /// Pop the current snapshot, then pop and return the one before it.
    ///
    /// Both leave the stack, so a second restore straight after the first
    /// only succeeds while two older snapshots remain. With fewer than two
    /// snapshots this is a no-op returning `None`.
    pub fn restore(&mut self) -> Option<T> {
        if !self.can_restore() {
            return None;
        }
        let current = self.snapshots.pop_back()?;
        let prior = self.snapshots.pop_back()?;
        self.undone.push((prior.clone(), current));
        Some(prior)
    }

    /// Undo the most recent restore: both popped snapshots go back on the
    /// stack and the newer one is returned.
    pub fn redo(&mut self) -> Option<T> {
        let (prior, current) = self.undone.pop()?;
        self.push_bounded(prior);
        self.push_bounded(current.clone());
        Some(current)
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
        self.undone.clear();
    }

    fn push_bounded(&mut self, state: T) {
        self.snapshots.push_back(state);
        while self.snapshots.len() > self.capacity {
            self.snapshots.pop_front();
        }
    }
}

impl<T: Clone> Default for SnapshotHistory<T> {
    fn default() -> Self {
        Self::new(annotkit_core::constants::DEFAULT_HISTORY_CAPACITY)
    }
}
