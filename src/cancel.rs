//! Cooperative cancellation. The engine never spawns threads or blocks; a
//! caller running a query on a worker thread can signal it to stop between
//! rounds through this handle instead.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A cheaply cloneable flag checked once per RAPTOR round.
///
/// Deliberately the lightest primitive that can satisfy a cooperative
/// check between rounds — no async runtime, no channel, just a shared
/// bool. Timeouts are the caller's responsibility and use the same
/// mechanism (e.g. a timer thread flipping the flag).
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}
