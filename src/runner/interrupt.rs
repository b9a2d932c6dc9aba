//! Ctrl-C handling
//!
//! The signal handler only raises a flag. The executor polls it while a
//! child is running and tears the child down when it is set.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::warn;

/// Shared interrupt flag
#[derive(Debug, Clone, Default)]
pub struct Interrupt {
    flag: Arc<AtomicBool>,
}

impl Interrupt {
    /// Create a flag that is never raised by a signal
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a flag raised by Ctrl-C
    ///
    /// Only one handler can be installed per process; later calls fail.
    pub fn install() -> Result<Self, ctrlc::Error> {
        let interrupt = Self::new();
        let flag = Arc::clone(&interrupt.flag);
        ctrlc::set_handler(move || {
            if flag.swap(true, Ordering::SeqCst) {
                warn!("interrupt already in progress");
            }
        })?;
        Ok(interrupt)
    }

    /// Raise the flag by hand
    pub fn trigger(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_triggered(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}
