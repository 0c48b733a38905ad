//! Exclusive pointer capture for the duration of a gesture.
//!
//! While a widget is being dragged or resized the shell must keep feeding it
//! pointer moves even when the cursor wanders off the widget (or off the
//! canvas). A gesture holds a [`PointerCapture`]; the shell asks the
//! [`PointerRouter`] whether anyone holds one before deciding where a
//! pointer event goes. Dropping the guard releases the capture, so every way
//! a gesture can end also ends the capture.

use crate::widget::WidgetId;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Hands out at most one [`PointerCapture`] at a time.
///
/// Clones share the same capture slot.
#[derive(Debug, Clone, Default)]
pub struct PointerRouter {
    captured: Arc<AtomicBool>,
}

impl PointerRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture the pointer for `owner`. Returns `None` if already captured.
    pub fn capture(&self, owner: WidgetId) -> Option<PointerCapture> {
        if self
            .captured
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return None;
        }
        log::debug!("Pointer captured by widget {}", owner);
        Some(PointerCapture {
            captured: Arc::clone(&self.captured),
            owner,
        })
    }

    /// Whether a gesture currently owns the pointer.
    pub fn is_captured(&self) -> bool {
        self.captured.load(Ordering::SeqCst)
    }
}

/// Guard for a pointer capture. Released on drop.
#[derive(Debug)]
pub struct PointerCapture {
    captured: Arc<AtomicBool>,
    owner: WidgetId,
}

impl PointerCapture {
    pub fn owner(&self) -> WidgetId {
        self.owner
    }
}

impl Drop for PointerCapture {
    fn drop(&mut self) {
        self.captured.store(false, Ordering::SeqCst);
        log::debug!("Pointer released by widget {}", self.owner);
    }
}
