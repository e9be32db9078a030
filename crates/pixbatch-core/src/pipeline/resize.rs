//! Pure target-dimension calculation.
//!
//! No I/O and no images: takes the source size and the batch's resize
//! policy, returns the output size.

use crate::config::ResizeConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::types::Dimensions;

/// Compute output dimensions for `original` under `policy`.
///
/// Rounds to nearest with ties away from zero. Width and height modes keep
/// the source aspect ratio. A computed edge of zero is clamped to one pixel.
///
/// # Examples
/// ```
/// # use pixbatch_core::pipeline::calculate_target_dimensions;
/// # use pixbatch_core::config::ResizeConfig;
/// # use pixbatch_core::types::Dimensions;
/// let dims = calculate_target_dimensions(
///     Dimensions::new(2000, 1000),
///     &ResizeConfig::Width { target: 500 },
/// ).unwrap();
/// assert_eq!(dims, Dimensions::new(500, 250));
/// ```
pub fn calculate_target_dimensions(
    original: Dimensions,
    policy: &ResizeConfig,
) -> PipelineResult<Dimensions> {
    let Dimensions { width, height } = original;
    if width == 0 || height == 0 {
        return Err(PipelineError::InvalidDimensions { width, height });
    }
    let (w, h) = (f64::from(width), f64::from(height));

    let (new_w, new_h) = match *policy {
        ResizeConfig::Scale { factor } => (round_edge(w * factor), round_edge(h * factor)),
        ResizeConfig::Width { target } => (target, round_edge(f64::from(target) * h / w)),
        ResizeConfig::Height { target } => (round_edge(f64::from(target) * w / h), target),
    };

    Ok(Dimensions::new(new_w.max(1), new_h.max(1)))
}

/// `f64::round` rounds half away from zero; the cast saturates.
fn round_edge(value: f64) -> u32 {
    value.round() as u32
}
