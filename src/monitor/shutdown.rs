use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Clonable stop flag polled once per tick. The loop side only reads it;
/// a signal handler or test harness flips it from anywhere.
#[derive(Clone, Debug, Default)]
pub struct ShutdownToken(Arc<AtomicBool>);

impl ShutdownToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shutdown(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_shutdown(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_running() {
        assert!(!ShutdownToken::new().is_shutdown());
    }

    #[test]
    fn test_shutdown_is_visible_through_clones() {
        let token = ShutdownToken::new();
        let clone = token.clone();
        clone.shutdown();
        assert!(token.is_shutdown());
        // A second shutdown is harmless.
        token.shutdown();
        assert!(clone.is_shutdown());
    }
}
