//! Error types shared across the experience.
//!
//! Nothing here is fatal: asset failures are recorded per asset, navigation
//! errors are reported to the caller and leave state untouched. Missing
//! capabilities and missing metrics are not errors at all (`false` / `None`).

use thiserror::Error;
use wasm_bindgen::JsValue;

/// Failure to load one asset. Recorded on that asset only; siblings keep loading.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetLoadError {
    #[error("network error while loading {0}")]
    Network(String),
    #[error("could not decode {0}")]
    Decode(String),
    #[error("unsupported format for {0}")]
    Unsupported(String),
    #[error("loading {0} timed out after {1} ms")]
    TimedOut(String, u32),
}

impl AssetLoadError {
    /// URI of the asset the error belongs to.
    pub fn uri(&self) -> &str {
        match self {
            AssetLoadError::Network(u)
            | AssetLoadError::Decode(u)
            | AssetLoadError::Unsupported(u)
            | AssetLoadError::TimedOut(u, _) => u,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NavigationError {
    #[error("already at the last screen")]
    AtLastScreen,
    #[error("screen index {index} out of range (len {len})")]
    OutOfRange { index: usize, len: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SpinError {
    #[error("the wheel is already spinning")]
    AlreadySpinning,
    #[error("the wheel has no prizes")]
    NoPrizes,
    #[error("prize {index} out of range (len {len})")]
    InvalidPrize { index: usize, len: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("photo {index} out of range (len {len})")]
pub struct GalleryError {
    pub index: usize,
    pub len: usize,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[cfg(feature = "serde_json")]
    #[error("invalid manifest json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("manifest entry {0} has an empty uri")]
    EmptyUri(usize),
}

impl From<ConfigError> for JsValue {
    fn from(err: ConfigError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
