//! Configuration for block drivers
//!
//! Centralized driver configuration with sensible defaults.

use crate::types::OffsetWidth;

/// Configuration shared by block driver handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DriverConfig {
    // -------------------------------------------------------------------------
    // Positioning
    // -------------------------------------------------------------------------
    /// Skip repositioning when the tracked position and last operation
    /// already match the request (sequential access of one kind).
    pub seek_optimization: bool,

    /// Width of the medium's native signed offset; bounds every address.
    pub offset_width: OffsetWidth,

    // -------------------------------------------------------------------------
    // Durability
    // -------------------------------------------------------------------------
    /// Push flushed data through to stable storage (`fsync`), not just to
    /// the operating system.
    pub sync_on_flush: bool,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            seek_optimization: true,
            offset_width: OffsetWidth::NATIVE,
            sync_on_flush: true,
        }
    }
}

impl DriverConfig {
    /// Create a new config builder
    pub fn builder() -> DriverConfigBuilder {
        DriverConfigBuilder::default()
    }

    /// Parse a config from JSON; missing fields take their defaults.
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> crate::Result<Self> {
        serde_json::from_str(json).map_err(|e| crate::VolError::Args(format!("driver config: {e}")))
    }

    /// Serialize the config to JSON.
    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> crate::Result<String> {
        serde_json::to_string(self)
            .map_err(|e| crate::VolError::Args(format!("driver config: {e}")))
    }
}

/// Builder for [`DriverConfig`]
#[derive(Debug, Default)]
pub struct DriverConfigBuilder {
    config: DriverConfig,
}

impl DriverConfigBuilder {
    /// Enable or disable the seek-skip optimization
    pub fn seek_optimization(mut self, enabled: bool) -> Self {
        self.config.seek_optimization = enabled;
        self
    }

    /// Set the native offset width
    pub fn offset_width(mut self, width: OffsetWidth) -> Self {
        self.config.offset_width = width;
        self
    }

    /// Choose whether `flush` also syncs to stable storage
    pub fn sync_on_flush(mut self, enabled: bool) -> Self {
        self.config.sync_on_flush = enabled;
        self
    }

    /// Finish building
    pub fn build(self) -> DriverConfig {
        self.config
    }
}
