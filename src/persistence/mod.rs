//! LocalStorage persistence for preferences, history and stats
//!
//! Everything is stored as a JSON blob per key. Missing or corrupt data is
//! treated as absent; callers fall back to defaults.

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Failure while writing persisted data
#[derive(Debug, Error)]
pub enum StorageError {
    /// No LocalStorage available (native build, private mode, sandboxed iframe)
    #[error("local storage unavailable")]
    Unavailable,
    #[error("failed to serialize: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to write key {0}")]
    Write(String),
}

/// Decode a stored blob, treating corrupt data as absent
pub fn decode<T: DeserializeOwned>(key: &str, json: &str) -> Option<T> {
    match serde_json::from_str(json) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("Ignoring corrupt data under {}: {}", key, e);
            None
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn storage() -> Option<web_sys::Storage> {
    web_sys::window()
        .and_then(|w| w.local_storage().ok())
        .flatten()
}

/// Load a JSON value from LocalStorage
#[cfg(target_arch = "wasm32")]
pub fn load<T: DeserializeOwned>(key: &str) -> Option<T> {
    let json = storage()?.get_item(key).ok()??;
    decode(key, &json)
}

/// Save a JSON value to LocalStorage
#[cfg(target_arch = "wasm32")]
pub fn save<T: Serialize>(key: &str, value: &T) -> Result<(), StorageError> {
    let storage = storage().ok_or(StorageError::Unavailable)?;
    let json = serde_json::to_string(value)?;
    storage
        .set_item(key, &json)
        .map_err(|_| StorageError::Write(key.to_string()))
}

/// Remove a key from LocalStorage
#[cfg(target_arch = "wasm32")]
pub fn remove(key: &str) {
    if let Some(storage) = storage() {
        let _ = storage.remove_item(key);
    }
}

/// Native stubs
#[cfg(not(target_arch = "wasm32"))]
pub fn load<T: DeserializeOwned>(_key: &str) -> Option<T> {
    None
}

#[cfg(not(target_arch = "wasm32"))]
pub fn save<T: Serialize>(_key: &str, _value: &T) -> Result<(), StorageError> {
    Err(StorageError::Unavailable)
}

#[cfg(not(target_arch = "wasm32"))]
pub fn remove(_key: &str) {}
