//! Process-wide, lazily loaded zone index.

use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use tracing::{info, instrument};

use super::{ZoneIndex, ZoneProvider};

static GLOBAL: ZoneCatalog = ZoneCatalog::new();

/// Holds at most one [`ZoneIndex`], loaded on first use.
///
/// Concurrent first callers serialise on an internal guard so the provider is
/// read exactly once per successful load. A failed load leaves the catalog
/// empty and the next caller retries.
#[derive(Debug, Default)]
pub struct ZoneCatalog {
    index: OnceLock<Arc<ZoneIndex>>,
    load_guard: Mutex<()>,
}

impl ZoneCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            index: OnceLock::new(),
            load_guard: Mutex::new(()),
        }
    }

    /// Returns the process-wide catalog.
    #[must_use]
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    /// Returns the loaded index, if any.
    #[must_use]
    pub fn get(&self) -> Option<Arc<ZoneIndex>> {
        self.index.get().cloned()
    }

    /// Returns `true` once an index has been loaded.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.index.get().is_some()
    }

    /// Returns the loaded index, reading it from `provider` on first use.
    ///
    /// # Errors
    /// Propagates the provider's error; the catalog stays empty in that case.
    #[instrument(name = "core.zone_catalog.load", skip(self, provider), fields(provider = provider.name()))]
    pub fn get_or_load<P: ZoneProvider>(&self, provider: &P) -> Result<Arc<ZoneIndex>, P::Error> {
        if let Some(index) = self.index.get() {
            return Ok(Arc::clone(index));
        }

        let _guard = self
            .load_guard
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(index) = self.index.get() {
            return Ok(Arc::clone(index));
        }

        let index = Arc::new(ZoneIndex::from_records(provider.zones()?));
        info!(zones = index.len(), "zone catalog loaded");
        Ok(Arc::clone(self.index.get_or_init(|| index)))
    }
}
