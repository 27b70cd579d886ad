//! Restart requests from the dispatcher to its supervisor.
//!
//! The restart effect only raises a flag. The dispatcher checks it after a
//! cycle has written every log record and hands control back to whoever
//! launched it, which decides how to restart the process.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared, cloneable restart flag
#[derive(Debug, Clone, Default)]
pub struct RestartSignal {
    requested: Arc<AtomicBool>,
}

impl RestartSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self) {
        self.requested.store(true, Ordering::SeqCst);
    }

    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    /// Consume a pending request, returning whether one was set
    pub fn take(&self) -> bool {
        self.requested.swap(false, Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_the_flag() {
        let signal = RestartSignal::new();
        let handle = signal.clone();

        assert!(!signal.is_requested());
        handle.request();
        assert!(signal.is_requested());
    }

    #[test]
    fn test_take_resets() {
        let signal = RestartSignal::new();
        signal.request();

        assert!(signal.take());
        assert!(!signal.take());
        assert!(!signal.is_requested());
    }
}
