//! Pixbatch Core - Embeddable batch image resizing library.
//!
//! Pixbatch takes a batch of encoded images, resizes each one under a
//! single policy and re-encodes it in its original format. Failures are
//! isolated per item: one corrupt or slow file never stops the batch.
//!
//! # Architecture
//!
//! ```text
//! Items → Validate formats → [Size check → Decode (timeout) → Resize → Encode → Name] → Summary
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use pixbatch_core::{BatchOrchestrator, Config, InputItem};
//!
//! #[tokio::main]
//! async fn main() -> pixbatch_core::Result<()> {
//!     let config = Config::load()?;
//!     let orchestrator = BatchOrchestrator::new(&config, config.batch.clone())?;
//!
//!     let bytes = std::fs::read("photo.jpg")?;
//!     let item = InputItem::new("1", "photo.jpg", "image/jpeg", bytes);
//!     let summary = orchestrator.run(vec![item]).await?;
//!     println!("Resized {}", summary.summary_line());
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod types;

// Re-exports for convenient access
pub use config::Config;
pub use error::{
    ConfigError, PipelineError, PipelineResult, PixbatchError, Result, ValidationError,
};
pub use output::{OutputFormat, OutputWriter};
pub use pipeline::{BatchOrchestrator, SignatureValidator};
pub use types::{
    BatchPhase, BatchState, BatchSummary, DiagnosticReport, Dimensions, ImageFormat, InputItem,
    OutputArtifact, ProcessingError, SignatureAnalysis,
};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
