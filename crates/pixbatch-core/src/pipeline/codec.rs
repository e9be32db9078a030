//! Image decode and resample/encode with size limits, timeout and handle tracking.
//!
//! [`ImageCodec`] enforces the limits and owns the resource handles. The
//! pixel work itself is delegated to a [`RasterBackend`]; the default
//! [`ImageRsBackend`] runs the `image` crate on the blocking thread pool.

use async_trait::async_trait;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};
use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

use crate::config::LimitsConfig;
use crate::error::{panic_message, PipelineError, PipelineResult};
use crate::types::{Dimensions, ImageFormat, InputItem};

use super::lifecycle::{HandleKind, ResourceHandle, ResourceTracker};

/// Worst-case bytes per pixel a decoder may allocate (16-bit RGBA).
const MAX_BYTES_PER_PIXEL: u64 = 8;

/// A decoded pixel grid.
#[derive(Debug, Clone)]
pub struct Raster {
    pub image: DynamicImage,
}

impl Raster {
    pub fn new(image: DynamicImage) -> Self {
        Self { image }
    }

    pub fn dimensions(&self) -> Dimensions {
        let (width, height) = self.image.dimensions();
        Dimensions::new(width, height)
    }
}

/// Decoder/encoder seam. Implementations do the pixel work; limits,
/// timeouts and handles are applied by [`ImageCodec`].
#[async_trait]
pub trait RasterBackend: Send + Sync {
    /// Decode `bytes` into a raster. `declared` is a hint used when the
    /// content itself does not reveal its format.
    ///
    /// `handle` must be held until the decode work has really stopped. If
    /// the work outlives the returned future (a blocking worker that keeps
    /// running after a timeout), the handle goes with it.
    async fn decode(
        &self,
        bytes: Arc<[u8]>,
        declared: ImageFormat,
        handle: ResourceHandle,
    ) -> PipelineResult<Raster>;

    /// Resample `raster` to `target` and encode it as `format`.
    /// `quality` is a fraction in `0.01..=1.0`.
    async fn encode(
        &self,
        raster: Raster,
        target: Dimensions,
        format: ImageFormat,
        quality: f32,
    ) -> PipelineResult<Vec<u8>>;
}

/// Reject rasters beyond the configured edge and pixel limits.
pub fn check_image_limits(limits: &LimitsConfig, dims: Dimensions) -> PipelineResult<()> {
    if limits.allows_image(dims.width, dims.height) {
        return Ok(());
    }
    Err(PipelineError::ImageTooLarge {
        width: dims.width,
        height: dims.height,
        max_dimension: limits.max_image_dimension,
        max_pixels: limits.max_image_pixels,
    })
}

/// Default backend built on the `image` crate.
#[derive(Debug, Clone, Default)]
pub struct ImageRsBackend {
    limits: LimitsConfig,
}

impl ImageRsBackend {
    /// Backend whose decoder refuses images beyond `limits`.
    pub fn new(limits: LimitsConfig) -> Self {
        Self { limits }
    }

    fn decoder_limits(&self) -> image::Limits {
        let mut limits = image::Limits::default();
        limits.max_image_width = Some(self.limits.max_image_dimension);
        limits.max_image_height = Some(self.limits.max_image_dimension);
        limits.max_alloc = Some(
            self.limits
                .max_image_pixels
                .saturating_mul(MAX_BYTES_PER_PIXEL),
        );
        limits
    }

    fn reader(bytes: &[u8], declared: ImageFormat) -> PipelineResult<image::ImageReader<Cursor<&[u8]>>> {
        let mut reader = image::ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| PipelineError::Decode {
                message: format!("Cannot detect image format: {}", e),
            })?;
        if reader.format().is_none() {
            reader.set_format(declared.into());
        }
        Ok(reader)
    }

    /// Synchronous decode (runs in spawn_blocking).
    ///
    /// The header is checked against the image limits before any pixel
    /// buffer is allocated.
    pub fn decode_sync(&self, bytes: &[u8], declared: ImageFormat) -> PipelineResult<Raster> {
        let (width, height) = Self::reader(bytes, declared)?
            .into_dimensions()
            .map_err(|e| PipelineError::Decode {
                message: e.to_string(),
            })?;
        check_image_limits(&self.limits, Dimensions::new(width, height))?;

        let mut reader = Self::reader(bytes, declared)?;
        reader.limits(self.decoder_limits());
        let image = reader.decode().map_err(|e| PipelineError::Decode {
            message: e.to_string(),
        })?;
        Ok(Raster::new(image))
    }

    /// Synchronous resample + encode (runs in spawn_blocking).
    pub fn encode_sync(
        raster: Raster,
        target: Dimensions,
        format: ImageFormat,
        quality: f32,
    ) -> PipelineResult<Vec<u8>> {
        let source = raster.dimensions();
        let resized = if source == target {
            raster.image
        } else {
            raster
                .image
                .resize_exact(target.width, target.height, resample_filter(source, target))
        };

        let mut buffer = Vec::new();
        let written = match format {
            ImageFormat::Jpeg => {
                let encoder = JpegEncoder::new_with_quality(&mut buffer, jpeg_quality(quality));
                // JPEG has no alpha channel
                DynamicImage::ImageRgb8(resized.to_rgb8()).write_with_encoder(encoder)
            }
            ImageFormat::Png => resized.write_to(&mut Cursor::new(&mut buffer), format.into()),
            ImageFormat::Gif | ImageFormat::Webp => DynamicImage::ImageRgba8(resized.to_rgba8())
                .write_to(&mut Cursor::new(&mut buffer), format.into()),
        };
        written.map_err(|e| PipelineError::Encode {
            message: e.to_string(),
        })?;
        Ok(buffer)
    }
}

#[async_trait]
impl RasterBackend for ImageRsBackend {
    async fn decode(
        &self,
        bytes: Arc<[u8]>,
        declared: ImageFormat,
        handle: ResourceHandle,
    ) -> PipelineResult<Raster> {
        let backend = self.clone();
        tokio::task::spawn_blocking(move || {
            let result = backend.decode_sync(&bytes, declared);
            // Source bytes go first, the handle last
            drop(bytes);
            drop(handle);
            result
        })
        .await
        .map_err(join_error)?
    }

    async fn encode(
        &self,
        raster: Raster,
        target: Dimensions,
        format: ImageFormat,
        quality: f32,
    ) -> PipelineResult<Vec<u8>> {
        tokio::task::spawn_blocking(move || Self::encode_sync(raster, target, format, quality))
            .await
            .map_err(join_error)?
    }
}

/// A blocking task that panicked or was cancelled maps to `Unknown`,
/// keeping the panic message.
fn join_error(e: tokio::task::JoinError) -> PipelineError {
    if e.is_panic() {
        PipelineError::Unknown(panic_message(e.into_panic()))
    } else {
        PipelineError::Unknown(format!("Task join error: {}", e))
    }
}

/// Bicubic when shrinking, Lanczos when enlarging. Never nearest-neighbor.
pub fn resample_filter(source: Dimensions, target: Dimensions) -> FilterType {
    let source_px = u64::from(source.width) * u64::from(source.height);
    let target_px = u64::from(target.width) * u64::from(target.height);
    if target_px < source_px {
        FilterType::CatmullRom
    } else {
        FilterType::Lanczos3
    }
}

/// Map the quality fraction onto the JPEG encoder's 1..=100 scale.
fn jpeg_quality(fraction: f32) -> u8 {
    (fraction * 100.0).round().clamp(1.0, 100.0) as u8
}

/// Image codec with configurable limits and timeout.
pub struct ImageCodec {
    backend: Arc<dyn RasterBackend>,
    limits: LimitsConfig,
    tracker: ResourceTracker,
}

impl ImageCodec {
    /// Create a codec on the default `image` backend.
    pub fn new(limits: LimitsConfig) -> Self {
        let backend = Arc::new(ImageRsBackend::new(limits.clone()));
        Self::with_backend(limits, backend)
    }

    /// Create a codec on a custom backend.
    pub fn with_backend(limits: LimitsConfig, backend: Arc<dyn RasterBackend>) -> Self {
        Self {
            backend,
            limits,
            tracker: ResourceTracker::new(),
        }
    }

    /// Tracker for the handles this codec hands out.
    pub fn tracker(&self) -> &ResourceTracker {
        &self.tracker
    }

    /// Reject items above the size ceiling before any decode work.
    pub fn check_size(&self, item: &InputItem) -> PipelineResult<()> {
        if item.size_bytes > self.limits.max_file_size_bytes() {
            return Err(PipelineError::SizeLimitExceeded {
                size_mb: item.size_bytes as f64 / (1024.0 * 1024.0),
                max_mb: self.limits.max_file_size_mb,
            });
        }
        Ok(())
    }

    /// Decode an item's bytes with size check, image limits and timeout.
    ///
    /// On timeout the error is returned at once. A backend whose work
    /// cannot be cancelled keeps the decode handle until that work ends,
    /// so [`ResourceTracker::live`] still counts it.
    pub async fn decode(&self, item: &InputItem, declared: ImageFormat) -> PipelineResult<Raster> {
        self.check_size(item)?;

        let handle = self
            .tracker
            .acquire(HandleKind::Decode, &item.name, item.raw_bytes.len());
        let timeout_ms = self.limits.decode_timeout_ms;
        let decoding = self
            .backend
            .decode(Arc::clone(&item.raw_bytes), declared, handle);

        let raster = match timeout(Duration::from_millis(timeout_ms), decoding).await {
            Ok(result) => result?,
            Err(_) => {
                if self.tracker.live() > 0 {
                    tracing::debug!("Decode of {} still winding down after timeout", item.name);
                }
                return Err(PipelineError::DecodeTimeout { timeout_ms });
            }
        };

        let dims = raster.dimensions();
        if dims.width == 0 || dims.height == 0 {
            return Err(PipelineError::InvalidDimensions {
                width: dims.width,
                height: dims.height,
            });
        }
        check_image_limits(&self.limits, dims)?;
        Ok(raster)
    }

    /// Resample and encode. The target is checked against the image limits
    /// before any resampling; fails with `Encode` if nothing was written.
    pub async fn encode(
        &self,
        item_name: &str,
        raster: Raster,
        target: Dimensions,
        format: ImageFormat,
        quality: f32,
    ) -> PipelineResult<Vec<u8>> {
        check_image_limits(&self.limits, target)?;

        let estimate = target.width as usize * target.height as usize * 4;
        let _handle = self.tracker.acquire(HandleKind::Encode, item_name, estimate);

        let bytes = self.backend.encode(raster, target, format, quality).await?;
        if bytes.is_empty() {
            return Err(PipelineError::Encode {
                message: "encoder produced no output".to_string(),
            });
        }
        Ok(bytes)
    }
}
