//! Layout construction parameters

use serde::{Deserialize, Serialize};

use crate::error::{SpatialError, SpatialResult};
use crate::layout::{DEFAULT_DECAY_DB, LayoutKind, SpeakerLayout};
use crate::mix::SingularityPolicy;

/// DBAP configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DbapConfig {
    /// Speaker arrangement
    pub layout: LayoutKind,
    /// Decay in dB, converted to the rolloff constant
    pub decay_db: f32,
    /// Zero-distance handling
    pub singularity: SingularityPolicy,
}

impl Default for DbapConfig {
    fn default() -> Self {
        Self {
            layout: LayoutKind::Desktop,
            decay_db: DEFAULT_DECAY_DB,
            singularity: SingularityPolicy::Snap,
        }
    }
}

impl DbapConfig {
    /// Parse from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> SpatialResult<Self> {
        serde_json::from_str(json).map_err(|e| SpatialError::Config(e.to_string()))
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> SpatialResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| SpatialError::Config(e.to_string()))
    }

    /// Build the configured layout
    pub fn build(&self) -> SpatialResult<SpeakerLayout> {
        SpeakerLayout::from_config(self)
    }
}

impl SpeakerLayout {
    /// Build a layout from configuration
    pub fn from_config(config: &DbapConfig) -> SpatialResult<Self> {
        Ok(Self::new(config.layout, config.decay_db)?.with_singularity_policy(config.singularity))
    }
}
