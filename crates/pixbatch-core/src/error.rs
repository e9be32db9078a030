//! Error types for the pixbatch resizing pipeline.
//!
//! Errors are split by when they can happen: `ConfigError` while loading
//! settings, `ValidationError` before a batch starts, and `PipelineError`
//! for a single item while the batch is running. Pipeline errors never
//! abort a batch; the orchestrator records them and moves on.

use thiserror::Error;

/// Top-level error type for pixbatch operations.
#[derive(Error, Debug)]
pub enum PixbatchError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Whole-batch validation failed before any item was touched
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Pipeline processing errors
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),

    /// No configured or built-in profile has this name
    #[error("Unknown profile '{name}' (available: {available})")]
    UnknownProfile { name: String, available: String },
}

/// Errors that reject a batch before it starts.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// An item's declared format is not in the accepted allow-list
    #[error("Unsupported format for {item}: {format} (accepted: jpeg, png, webp, gif)")]
    UnsupportedFormat { item: String, format: String },

    /// A resize setting is outside the configured bounds
    #[error("{field} = {value} is outside the allowed range {min}..={max}")]
    OutOfBounds {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Quality percentage outside 1..=100
    #[error("quality = {0} is outside the allowed range 1..=100")]
    Quality(u8),
}

/// Per-item pipeline errors, one variant per failure class.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    /// Buffer exceeds the configured size ceiling
    #[error("File too large ({size_mb:.1}MB > {max_mb}MB)")]
    SizeLimitExceeded { size_mb: f64, max_mb: u64 },

    /// Decoder did not produce a raster in time
    #[error("Decode timed out after {timeout_ms}ms")]
    DecodeTimeout { timeout_ms: u64 },

    /// Content is corrupt or not a decodable image
    #[error("Decode failed: {message}")]
    Decode { message: String },

    /// Re-encode failed or produced no bytes
    #[error("Encode failed: {message}")]
    Encode { message: String },

    /// Source has a zero-length edge
    #[error("Invalid source dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// Source or target raster exceeds the configured image limits
    #[error("Image too large: {width}x{height} (max {max_dimension}px per edge, {max_pixels} pixels)")]
    ImageTooLarge {
        width: u32,
        height: u32,
        max_dimension: u32,
        max_pixels: u64,
    },

    /// Anything else, message kept verbatim
    #[error("{0}")]
    Unknown(String),
}

/// Convenience type alias for pixbatch results.
pub type Result<T> = std::result::Result<T, PixbatchError>;

/// Convenience type alias for pipeline-specific results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;

/// Turn a panic payload into a readable message.
pub(crate) fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic with non-string payload".to_string()
    }
}
