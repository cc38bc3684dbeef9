//! Tunables for the whole experience, plus the asset manifest.
//!
//! Everything has a default matching the shipped experience; a JSON manifest
//! (feature `serde_json`) can replace the asset list at startup.

use crate::error::ConfigError;
use crate::prize_wheel::SpinSchedule;
use crate::preload::{AssetRequest, ReadinessPolicy};

#[cfg(feature = "serde")]
use serde::Deserialize;

#[derive(Clone, Debug, PartialEq)]
pub struct PreloadConfig {
    pub policy: ReadinessPolicy,
    /// Per-asset timeout. `None` waits forever.
    pub timeout_ms: Option<u32>,
}

impl Default for PreloadConfig {
    fn default() -> Self {
        Self { policy: ReadinessPolicy::Lenient, timeout_ms: Some(15_000) }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RevealConfig {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub cell_size: u32,
    pub brush_radius: f64,
    pub threshold: f64,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self { canvas_width: 400, canvas_height: 300, cell_size: 1, brush_radius: 20.0, threshold: 0.5 }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExperienceConfig {
    pub assets: Vec<AssetRequest>,
    pub preload: PreloadConfig,
    /// Loading view stays up at least this long after assets settle.
    pub min_loading_ms: f64,
    /// Samples below this fps are logged as warnings.
    pub low_fps_threshold: u32,
    pub reveal: RevealConfig,
    pub spin: SpinSchedule,
    /// Background track started with the flow and looped.
    pub background_track: Option<String>,
    pub memories_track: Option<String>,
}

impl Default for ExperienceConfig {
    fn default() -> Self {
        Self {
            assets: default_assets(),
            preload: PreloadConfig::default(),
            min_loading_ms: 1000.0,
            low_fps_threshold: 30,
            reveal: RevealConfig::default(),
            spin: SpinSchedule::default(),
            background_track: Some("/music/background.mp3".into()),
            memories_track: Some("/music/memories.mp3".into()),
        }
    }
}

pub fn default_assets() -> Vec<AssetRequest> {
    vec![
        AssetRequest::image("/images/photo1.jpg"),
        AssetRequest::image("/images/photo2.jpg"),
        AssetRequest::image("/images/photo3.jpg"),
        AssetRequest::image("/images/surprise.jpg"),
        AssetRequest::audio("/music/background.mp3"),
        AssetRequest::audio("/music/memories.mp3"),
    ]
}

/// `{ "assets": [ { "uri": "...", "kind": "image" | "audio" } ] }`
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub struct AssetManifest {
    pub assets: Vec<AssetRequest>,
}

impl AssetManifest {
    #[cfg(feature = "serde_json")]
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let manifest: AssetManifest = serde_json::from_str(json)?;
        manifest.validate()?;
        Ok(manifest)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.assets.iter().position(|a| a.id.trim().is_empty()) {
            Some(i) => Err(ConfigError::EmptyUri(i)),
            None => Ok(()),
        }
    }
}

impl ExperienceConfig {
    /// Replaces the asset list with the manifest's.
    pub fn with_manifest(mut self, manifest: AssetManifest) -> Self {
        self.assets = manifest.assets;
        self
    }
}
