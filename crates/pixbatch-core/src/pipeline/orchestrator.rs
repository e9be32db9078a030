//! Batch orchestration: runs every item through the pipeline in order.
//!
//! Items are processed strictly sequentially. A failing item is recorded in
//! the error log and the loop moves on; only whole-batch validation can
//! stop a batch from starting. Progress is published as [`BatchState`]
//! snapshots on a `watch` channel.

use futures_util::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime};
use tokio::sync::watch;

use crate::config::{BatchSettings, Config, PipelineConfig};
use crate::error::{panic_message, PipelineResult, ValidationError};
use crate::types::{
    BatchPhase, BatchState, BatchSummary, ImageFormat, InputItem, OutputArtifact, ProcessingError,
};

use super::codec::{ImageCodec, RasterBackend};
use super::lifecycle::ResourceTracker;
use super::naming::output_name;
use super::resize::calculate_target_dimensions;

/// Drives a batch of items through decode → resize → encode → naming.
pub struct BatchOrchestrator {
    codec: ImageCodec,
    settings: BatchSettings,
    pipeline: PipelineConfig,
    state: watch::Sender<BatchState>,
}

impl BatchOrchestrator {
    /// Create an orchestrator on the default `image` backend.
    ///
    /// Fails with a validation error if `settings` are outside the
    /// configured bounds.
    pub fn new(config: &Config, settings: BatchSettings) -> Result<Self, ValidationError> {
        Self::build(config, settings, ImageCodec::new(config.limits.clone()))
    }

    /// Create an orchestrator on a custom raster backend.
    pub fn with_backend(
        config: &Config,
        settings: BatchSettings,
        backend: Arc<dyn RasterBackend>,
    ) -> Result<Self, ValidationError> {
        let codec = ImageCodec::with_backend(config.limits.clone(), backend);
        Self::build(config, settings, codec)
    }

    fn build(
        config: &Config,
        settings: BatchSettings,
        codec: ImageCodec,
    ) -> Result<Self, ValidationError> {
        settings.validate(&config.bounds)?;
        let (state, _) = watch::channel(BatchState::default());
        Ok(Self {
            codec,
            settings,
            pipeline: config.pipeline.clone(),
            state,
        })
    }

    /// Subscribe to progress snapshots.
    pub fn subscribe(&self) -> watch::Receiver<BatchState> {
        self.state.subscribe()
    }

    /// Current progress snapshot.
    pub fn state(&self) -> BatchState {
        self.state.borrow().clone()
    }

    /// Settings this orchestrator was built with.
    pub fn settings(&self) -> &BatchSettings {
        &self.settings
    }

    /// Tracker for decode/encode handles.
    pub fn tracker(&self) -> &ResourceTracker {
        self.codec.tracker()
    }

    /// Run a batch over `items` in order.
    ///
    /// Every item's declared format is checked against the allow-list
    /// first; a mismatch rejects the whole batch before any item is
    /// touched. After that, per-item failures only land in the summary's
    /// error log.
    pub async fn run(&self, items: Vec<InputItem>) -> Result<BatchSummary, ValidationError> {
        let formats = admit(&items)?;
        let total = items.len();
        let start = Instant::now();

        self.state.send_replace(BatchState {
            phase: BatchPhase::Running,
            total,
            started_at: Some(SystemTime::now()),
            ..Default::default()
        });
        tracing::debug!("Batch started: {} item(s), {:?}", total, self.settings.resize);

        let mut summary = BatchSummary {
            total_count: total,
            ..Default::default()
        };

        let outcome = AssertUnwindSafe(self.run_items(&items, &formats, &mut summary))
            .catch_unwind()
            .await;
        if let Err(payload) = outcome {
            let message = panic_message(payload);
            tracing::error!("Batch aborted: {}", message);
            summary.global_error = Some(message);
        }

        summary.success_count = summary.artifacts.len();
        summary.elapsed = start.elapsed();
        self.state.send_modify(|state| {
            state.phase = BatchPhase::Completed;
            state.current_item_name = None;
        });
        tracing::debug!(
            "Batch completed: {} in {:?}",
            summary.summary_line(),
            summary.elapsed
        );
        Ok(summary)
    }

    async fn run_items(
        &self,
        items: &[InputItem],
        formats: &[ImageFormat],
        summary: &mut BatchSummary,
    ) {
        for (item, &format) in items.iter().zip(formats) {
            self.state.send_modify(|state| {
                state.current_item_name = Some(item.name.clone());
            });

            match self.process_item(item, format).await {
                Ok(artifact) => {
                    summary.artifacts.push(artifact);
                    self.state.send_modify(|state| state.completed_count += 1);
                }
                Err(e) => {
                    tracing::warn!("Failed: {} - {}", item.name, e);
                    summary.errors.push(ProcessingError {
                        item_name: item.name.clone(),
                        message: e.to_string(),
                    });
                    self.state.send_modify(|state| state.failed_count += 1);
                }
            }

            self.pause().await;
        }
    }

    /// Run one item through the full pipeline.
    pub async fn process_item(
        &self,
        item: &InputItem,
        format: ImageFormat,
    ) -> PipelineResult<OutputArtifact> {
        let start = Instant::now();
        tracing::debug!("Processing: {}", item.name);

        // Size ceiling is enforced inside decode, before any decode work
        let decode_start = Instant::now();
        let raster = self.codec.decode(item, format).await?;
        let original_dims = raster.dimensions();
        tracing::trace!("  Decode: {:?}", decode_start.elapsed());

        let new_dims = calculate_target_dimensions(original_dims, &self.settings.resize)?;
        tracing::trace!("  Resize: {} -> {}", original_dims, new_dims);

        let encode_start = Instant::now();
        let bytes = self
            .codec
            .encode(
                &item.name,
                raster,
                new_dims,
                format,
                self.settings.quality.fraction(),
            )
            .await?;
        tracing::trace!("  Encode: {:?}", encode_start.elapsed());

        let name = output_name(&item.name, &self.settings.naming);
        tracing::debug!(
            "Processed {} -> {} in {:?} ({} -> {})",
            item.name,
            name,
            start.elapsed(),
            original_dims,
            new_dims
        );

        Ok(OutputArtifact {
            name,
            new_size_bytes: bytes.len() as u64,
            bytes,
            format,
            original_dims,
            new_dims,
            original_size_bytes: item.size_bytes,
        })
    }

    /// Let observers catch up between items.
    async fn pause(&self) {
        if self.pipeline.yield_ms == 0 {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(Duration::from_millis(self.pipeline.yield_ms)).await;
        }
    }
}

/// Check every item's declared format against the allow-list.
fn admit(items: &[InputItem]) -> Result<Vec<ImageFormat>, ValidationError> {
    items
        .iter()
        .map(|item| {
            ImageFormat::from_declared(&item.declared_format).ok_or_else(|| {
                ValidationError::UnsupportedFormat {
                    item: item.name.clone(),
                    format: item.declared_format.clone(),
                }
            })
        })
        .collect()
}
