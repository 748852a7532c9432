//! One-shot apply notification
//!
//! After editing, the UI fires a single notification; the core
//! consumes it at a convenient point in its loop and re-reads the
//! snapshot. Fires between two observations collapse into one.

/// One-shot "configuration changed" latch
#[derive(Debug, Default)]
pub struct ApplyNotifier {
    pending: bool,
}

impl ApplyNotifier {
    pub fn new() -> Self {
        Self { pending: false }
    }

    /// The UI side: mark the snapshot as edited
    pub fn fire(&mut self) {
        self.pending = true;
    }

    /// The core side: consume the notification, true at most once per
    /// fire
    pub fn observe(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }

    /// Peek without consuming
    pub fn is_pending(&self) -> bool {
        self.pending
    }
}
