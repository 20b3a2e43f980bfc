//! Cancellation signal port
//!
//! The cancellation monitor polls a caller-supplied signal at a fixed
//! interval. Both a [`CancellationToken`] and a plain [`AtomicBool`] flag
//! can serve as that signal.

use std::sync::atomic::{AtomicBool, Ordering};
use tokio_util::sync::CancellationToken;

pub trait CancellationSignal: Send + Sync {
    fn is_cancelled(&self) -> bool;
}

impl CancellationSignal for CancellationToken {
    fn is_cancelled(&self) -> bool {
        CancellationToken::is_cancelled(self)
    }
}

impl CancellationSignal for AtomicBool {
    fn is_cancelled(&self) -> bool {
        self.load(Ordering::SeqCst)
    }
}

/// Signal that never fires.
pub struct NeverCancelled;

impl CancellationSignal for NeverCancelled {
    fn is_cancelled(&self) -> bool {
        false
    }
}
