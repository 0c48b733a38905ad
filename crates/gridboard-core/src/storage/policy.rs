//! When layout snapshots get written.

use super::{LayoutPersistence, Storage, StorageResult};
use crate::widget::Widget;
use std::time::{Duration, Instant};

/// How eagerly mutations reach storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WritePolicy {
    /// Write the snapshot on every mutation.
    #[default]
    Immediate,
    /// Write at most once per interval; `flush` forces pending writes.
    Debounced(Duration),
}

impl WritePolicy {
    /// `Immediate` for zero, `Debounced` otherwise.
    pub fn from_millis(ms: u64) -> Self {
        if ms == 0 {
            WritePolicy::Immediate
        } else {
            WritePolicy::Debounced(Duration::from_millis(ms))
        }
    }
}

/// Tracks unsaved layout changes and writes them according to a policy.
///
/// A failed write keeps the writer dirty so the next attempt retries.
pub struct LayoutWriter<S: Storage + ?Sized> {
    persistence: LayoutPersistence<S>,
    policy: WritePolicy,
    last_save: Option<Instant>,
    dirty: bool,
}

impl<S: Storage + ?Sized> LayoutWriter<S> {
    pub fn new(persistence: LayoutPersistence<S>, policy: WritePolicy) -> Self {
        Self {
            persistence,
            policy,
            last_save: None,
            dirty: false,
        }
    }

    pub fn persistence(&self) -> &LayoutPersistence<S> {
        &self.persistence
    }

    pub fn policy(&self) -> WritePolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: WritePolicy) {
        self.policy = policy;
    }

    /// Check if there are unsaved changes.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Check if a pending change is due at `now`.
    pub fn should_save_at(&self, now: Instant) -> bool {
        if !self.dirty {
            return false;
        }
        match (self.policy, self.last_save) {
            (WritePolicy::Immediate, _) | (_, None) => true,
            (WritePolicy::Debounced(interval), Some(last)) => {
                now.saturating_duration_since(last) >= interval
            }
        }
    }

    pub fn should_save(&self) -> bool {
        self.should_save_at(Instant::now())
    }

    /// Note a mutation and write it if the policy says so.
    pub fn record(&mut self, widgets: &[Widget]) {
        self.dirty = true;
        self.maybe_save_at(widgets, Instant::now());
    }

    /// Write if a change is pending and due. Returns true if a write happened.
    pub fn maybe_save_at(&mut self, widgets: &[Widget], now: Instant) -> bool {
        if !self.should_save_at(now) {
            return false;
        }
        self.write_logged(widgets, now)
    }

    /// Write now, regardless of policy.
    pub fn save(&mut self, widgets: &[Widget]) -> StorageResult<()> {
        self.persistence.save_layout(widgets)?;
        self.last_save = Some(Instant::now());
        self.dirty = false;
        Ok(())
    }

    /// Write pending changes now. Returns false if the write failed.
    pub fn flush(&mut self, widgets: &[Widget]) -> bool {
        if !self.dirty {
            return true;
        }
        self.write_logged(widgets, Instant::now())
    }

    /// Remove the stored snapshot and drop any pending change.
    ///
    /// On failure the writer stays dirty, so the next flush overwrites the
    /// old snapshot with whatever the caller holds by then.
    pub fn clear(&mut self) -> StorageResult<()> {
        match self.persistence.clear_layout() {
            Ok(()) => {
                self.dirty = false;
                Ok(())
            }
            Err(e) => {
                self.dirty = true;
                Err(e)
            }
        }
    }

    fn write_logged(&mut self, widgets: &[Widget], now: Instant) -> bool {
        match self.persistence.save_layout(widgets) {
            Ok(()) => {
                self.last_save = Some(now);
                self.dirty = false;
                true
            }
            Err(e) => {
                log::error!("Failed to save layout: {}", e);
                false
            }
        }
    }
}
