use std::time::Duration;

use serde::Deserialize;
use smart_default::SmartDefault;

use crate::FormatError;

/// Tunables for loading atlases. Every field has a default, so a settings
/// file only needs to list what it overrides.
#[derive(SmartDefault, Deserialize, Debug, Clone, PartialEq)]
#[serde(default, rename_all = "snake_case")]
pub struct AtlasSettings {
    /// Atlas images larger than this on either axis are rejected.
    #[default(2048)]
    pub max_image_dimension: u32,
    /// Maximum number of entries kept by each loader cache.
    #[default(16)]
    pub cache_capacity: usize,
    /// Cached entries are dropped after being idle for this long.
    #[default(300)]
    pub cache_ttl_secs: u64,
    /// Field separator of tabular frame and box records.
    #[default('\t')]
    pub delimiter: char,
}

impl AtlasSettings {
    pub fn from_yaml(yaml: &str) -> Result<Self, FormatError> {
        serde_yaml::from_str(yaml).map_err(|e| FormatError::Metadata(Box::new(e)))
    }

    #[inline]
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}
