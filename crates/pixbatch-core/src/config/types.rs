//! Sub-configuration structs with their defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Resource limits to protect against problematic inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum input buffer size in megabytes
    pub max_file_size_mb: u64,

    /// Maximum image dimension (width or height), for sources and targets
    pub max_image_dimension: u32,

    /// Maximum pixel count (width * height), for sources and targets
    pub max_image_pixels: u64,

    /// Decode timeout in milliseconds
    pub decode_timeout_ms: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_file_size_mb: 50,
            max_image_dimension: 16_384,
            max_image_pixels: 100_000_000,
            decode_timeout_ms: 30_000,
        }
    }
}

impl LimitsConfig {
    /// Size ceiling in bytes.
    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_mb.saturating_mul(1024 * 1024)
    }

    /// Whether a `width` x `height` raster fits both image limits.
    pub fn allows_image(&self, width: u32, height: u32) -> bool {
        width <= self.max_image_dimension
            && height <= self.max_image_dimension
            && u64::from(width) * u64::from(height) <= self.max_image_pixels
    }
}

/// Accepted ranges for resize settings.
///
/// Defaults are scale 0.25–6.0 and target edge 1–4000 px.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResizeBounds {
    pub min_scale: f64,
    pub max_scale: f64,
    pub min_dimension: u32,
    pub max_dimension: u32,
}

impl Default for ResizeBounds {
    fn default() -> Self {
        Self {
            min_scale: 0.25,
            max_scale: 6.0,
            min_dimension: 1,
            max_dimension: 4000,
        }
    }
}

/// Orchestrator pacing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Pause after each item so progress observers can refresh.
    /// `0` only yields to the scheduler.
    pub yield_ms: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self { yield_ms: 10 }
    }
}

/// How each image is resized. Width and height modes always keep the
/// source aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum ResizeConfig {
    /// Multiply both edges by `factor`
    Scale { factor: f64 },
    /// Fixed output width
    Width { target: u32 },
    /// Fixed output height
    Height { target: u32 },
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self::Scale { factor: 0.5 }
    }
}

/// Encoder quality as a percentage in 1..=100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quality(pub u8);

impl Quality {
    /// Quality as the encoder fraction (`value / 100`).
    pub fn fraction(self) -> f32 {
        f32::from(self.0) / 100.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(90)
    }
}

/// Output naming rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingConfig {
    /// Keep the original file name (prefix/suffix ignored)
    pub keep_original: bool,
    pub prefix: String,
    /// Inserted between stem and extension
    pub suffix: String,
    /// Optional tag prepended as `{tag}_`, sanitized to `[A-Za-z0-9_-]`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_folder_tag: Option<String>,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            keep_original: false,
            prefix: String::new(),
            suffix: "_resized".to_string(),
            output_folder_tag: None,
        }
    }
}

/// Settings applied to every item of one batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchSettings {
    pub resize: ResizeConfig,
    pub quality: Quality,
    pub naming: NamingConfig,
}

/// Output settings used by the command-line collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory artifacts are written to
    pub dir: PathBuf,

    /// Report format ("json" or "jsonl")
    pub format: String,

    /// Pretty-print JSON reports
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("./resized"),
            format: "json".to_string(),
            pretty: false,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
