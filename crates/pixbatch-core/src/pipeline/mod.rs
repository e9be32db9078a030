//! Image resizing pipeline components.
//!
//! This module contains all the stages of the batch pipeline:
//! - **signature**: Header sniffing and diagnostic reports
//! - **codec**: Decode, resample and encode behind a backend trait
//! - **resize**: Pure target-dimension calculation
//! - **naming**: Deterministic output file names
//! - **lifecycle**: RAII tracking of decode/encode handles
//! - **orchestrator**: Runs a batch item by item and publishes progress

pub mod codec;
pub mod lifecycle;
pub mod naming;
pub mod orchestrator;
pub mod resize;
pub mod signature;

// Re-exports for convenient access
pub use codec::{resample_filter, ImageCodec, ImageRsBackend, Raster, RasterBackend};
pub use lifecycle::{HandleKind, ResourceHandle, ResourceTracker};
pub use naming::{output_name, sanitize_tag};
pub use orchestrator::BatchOrchestrator;
pub use resize::calculate_target_dimensions;
pub use signature::SignatureValidator;
