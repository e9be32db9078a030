//! Core data types for the pixbatch pipeline.
//!
//! Inputs arrive as [`InputItem`]s, successful items leave as
//! [`OutputArtifact`]s, and failures are kept as [`ProcessingError`]s in
//! input order.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

/// Image formats accepted by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Jpeg,
    Png,
    Gif,
    Webp,
}

impl ImageFormat {
    /// Parse a declared format: MIME type (`image/jpeg`), bare name, or
    /// file extension. Case-insensitive.
    pub fn from_declared(declared: &str) -> Option<Self> {
        let lower = declared.trim().to_ascii_lowercase();
        let name = lower.strip_prefix("image/").unwrap_or(&lower);
        match name.trim_start_matches('.') {
            "jpeg" | "jpg" | "pjpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "gif" => Some(Self::Gif),
            "webp" => Some(Self::Webp),
            _ => None,
        }
    }

    /// Guess the format from a file name's extension.
    pub fn from_file_name(name: &str) -> Option<Self> {
        name.rsplit_once('.')
            .and_then(|(_, ext)| Self::from_declared(ext))
    }

    /// Lowercase short name ("jpeg", "png", ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::Gif => "gif",
            Self::Webp => "webp",
        }
    }

    /// MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Gif => "image/gif",
            Self::Webp => "image/webp",
        }
    }
}

impl std::fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<ImageFormat> for image::ImageFormat {
    fn from(format: ImageFormat) -> Self {
        match format {
            ImageFormat::Jpeg => image::ImageFormat::Jpeg,
            ImageFormat::Png => image::ImageFormat::Png,
            ImageFormat::Gif => image::ImageFormat::Gif,
            ImageFormat::Webp => image::ImageFormat::WebP,
        }
    }
}

/// Width and height in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// One image buffer handed to a batch. Immutable once admitted.
#[derive(Debug, Clone)]
pub struct InputItem {
    /// Caller-assigned identifier
    pub id: String,
    /// Original file name, used for naming and error messages
    pub name: String,
    /// Format the caller claims (MIME type or extension)
    pub declared_format: String,
    /// Size reported by the caller
    pub size_bytes: u64,
    /// Raw encoded bytes, shared with decode handles
    pub raw_bytes: Arc<[u8]>,
}

impl InputItem {
    /// Build an item from owned bytes; `size_bytes` is taken from the buffer.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        declared_format: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        let size_bytes = bytes.len() as u64;
        Self {
            id: id.into(),
            name: name.into(),
            declared_format: declared_format.into(),
            size_bytes,
            raw_bytes: Arc::from(bytes),
        }
    }
}

/// The resized, re-encoded result for one item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputArtifact {
    /// Output file name from the naming policy
    pub name: String,

    /// Encoded bytes (not included in reports)
    #[serde(skip)]
    pub bytes: Vec<u8>,

    /// Encoded format, always the input's format
    pub format: ImageFormat,

    pub original_dims: Dimensions,
    pub new_dims: Dimensions,
    pub original_size_bytes: u64,
    pub new_size_bytes: u64,
}

impl OutputArtifact {
    /// Human-readable before/after line, e.g.
    /// `2000x1000 → 1000x500 | 1.2 MB → 310.5 KB`.
    pub fn comparison(&self) -> String {
        format!(
            "{} → {} | {} → {}",
            self.original_dims,
            self.new_dims,
            format_size(self.original_size_bytes),
            format_size(self.new_size_bytes)
        )
    }
}

/// A failed item. Failed items still count toward the batch total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingError {
    pub item_name: String,
    pub message: String,
}

impl ProcessingError {
    /// The error-log line for this failure.
    pub fn log_line(&self) -> String {
        format!("Error processing {}: {}", self.item_name, self.message)
    }
}

/// Lifecycle phase of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchPhase {
    #[default]
    Idle,
    Running,
    Completed,
}

/// Snapshot of batch progress published to observers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchState {
    pub phase: BatchPhase,
    pub total: usize,
    /// Items that succeeded so far
    pub completed_count: usize,
    /// Items that failed so far
    pub failed_count: usize,
    pub current_item_name: Option<String>,
    pub started_at: Option<SystemTime>,
}

impl BatchState {
    /// Items finished so far, successful or not.
    pub fn processed(&self) -> usize {
        self.completed_count + self.failed_count
    }

    /// Fraction of items processed, in `0.0..=1.0`. An empty batch counts
    /// as fully processed.
    pub fn progress(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        self.processed() as f64 / self.total as f64
    }
}

/// Final result of a batch run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchSummary {
    pub success_count: usize,
    pub total_count: usize,
    /// Artifacts in input order
    pub artifacts: Vec<OutputArtifact>,
    /// Per-item failures in input order
    pub errors: Vec<ProcessingError>,
    /// Set when the batch loop itself failed unexpectedly
    #[serde(skip_serializing_if = "Option::is_none")]
    pub global_error: Option<String>,
    pub elapsed: Duration,
}

impl BatchSummary {
    /// `"{success}/{total}"`.
    pub fn summary_line(&self) -> String {
        format!("{}/{}", self.success_count, self.total_count)
    }

    /// Cumulative, append-only error log (one line per failure).
    pub fn error_log(&self) -> String {
        let mut lines: Vec<String> = self.errors.iter().map(ProcessingError::log_line).collect();
        if let Some(global) = &self.global_error {
            lines.push(format!("Global error: {global}"));
        }
        lines.join("\n")
    }

    pub fn failed_count(&self) -> usize {
        self.errors.len()
    }
}

/// Diagnostic result of header sniffing for one item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignatureAnalysis {
    pub name: String,
    pub declared_format: String,
    /// Format recognized from the header, `None` if unknown
    pub actual_format: Option<ImageFormat>,
    pub size_bytes: u64,
    pub is_valid: bool,
}

impl SignatureAnalysis {
    /// Actual format as shown to users ("unknown" when not recognized).
    pub fn actual_format_label(&self) -> &'static str {
        self.actual_format.map_or("unknown", |f| f.as_str())
    }

    pub fn size_formatted(&self) -> String {
        format_size(self.size_bytes)
    }
}

/// Aggregate of a diagnostic pass over a batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticReport {
    pub analyses: Vec<SignatureAnalysis>,
    pub valid_count: usize,
    pub invalid_count: usize,
    pub total_size_bytes: u64,
}

impl DiagnosticReport {
    pub fn total_size_formatted(&self) -> String {
        format_size(self.total_size_bytes)
    }
}

/// Format a byte count with base-1024 units and at most two decimals.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    // Compare the value as it will print, so 1023.999 KB becomes 1 MB
    while (value * 100.0).round() / 100.0 >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let rounded = format!("{:.2}", value);
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, UNITS[unit])
}
