//! Shared application state handed to every request handler.

pub mod phase;

use std::sync::{Arc, Mutex, MutexGuard};

use rand::{SeedableRng, rngs::StdRng};

use crate::{config::AppConfig, dao::store::SessionStore};

/// Cheaply cloneable handle to the application state.
pub type SharedState = Arc<AppState>;

/// Central application state.
///
/// The server is stateless between requests: everything a request needs is
/// loaded from the session store, so this only carries the store handle, the
/// immutable configuration, and the injected random source. Randomness is a
/// capability rather than an ambient call so tests can seed it and assert
/// exact imposter/word/code selection.
pub struct AppState {
    store: Arc<dyn SessionStore>,
    config: AppConfig,
    rng: Mutex<StdRng>,
}

impl AppState {
    /// Construct the state with an OS-seeded random source.
    pub fn new(config: AppConfig, store: Arc<dyn SessionStore>) -> SharedState {
        Self::with_rng(config, store, StdRng::from_os_rng())
    }

    /// Construct the state with a caller-provided random source.
    pub fn with_rng(config: AppConfig, store: Arc<dyn SessionStore>, rng: StdRng) -> SharedState {
        Arc::new(Self {
            store,
            config,
            rng: Mutex::new(rng),
        })
    }

    /// Handle to the session store.
    pub fn store(&self) -> Arc<dyn SessionStore> {
        Arc::clone(&self.store)
    }

    /// Immutable runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Exclusive access to the shared random source.
    pub fn rng(&self) -> MutexGuard<'_, StdRng> {
        self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
