//! Process-wide store handle
//!
//! A single shared store instance serves every view. It is initialized once
//! at startup with immutable configuration and exposes only stateless
//! request methods; no teardown is needed beyond process exit.

use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::info;

use crate::store::RecordStore;
use crate::RemoteQueryError;

/// Immutable connection configuration for the hosted store
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Base endpoint, e.g. `https://example.supabase.co`
    pub url: String,
    /// Publishable API key; row-level security is enforced server-side
    pub api_key: String,
}

static STORE: OnceCell<Arc<dyn RecordStore>> = OnceCell::new();

/// Install the process-wide store. Returns an error if one is already set.
pub fn init_store(store: Arc<dyn RecordStore>) -> Result<(), RemoteQueryError> {
    let name = store.store_name().to_string();
    STORE
        .set(store)
        .map_err(|_| RemoteQueryError::InvalidQuery("store already initialized".into()))?;
    info!(store = %name, "record store initialized");
    Ok(())
}

/// The process-wide store, if initialized
pub fn store() -> Result<Arc<dyn RecordStore>, RemoteQueryError> {
    STORE.get().cloned().ok_or(RemoteQueryError::Uninitialized)
}
