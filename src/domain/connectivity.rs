//! Network availability flag shared between screens.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Whether the device currently has a network connection.
///
/// The host platform flips this; reads feed the `is_network_available`
/// arguments of cache-first interactors.
#[derive(Debug, Clone)]
pub struct NetworkStatus {
    available: Arc<AtomicBool>,
}

impl NetworkStatus {
    pub fn new(available: bool) -> Self {
        Self {
            available: Arc::new(AtomicBool::new(available)),
        }
    }

    pub fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    pub fn set_available(&self, available: bool) {
        let previous = self.available.swap(available, Ordering::SeqCst);
        if previous != available {
            tracing::info!("Network available: {}", available);
        }
    }
}

impl Default for NetworkStatus {
    fn default() -> Self {
        Self::new(true)
    }
}
