//! Configuration validation with range checks.

use crate::error::{ConfigError, ValidationError};

use super::{BatchSettings, Config, ResizeBounds, ResizeConfig};

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.limits.max_file_size_mb == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_file_size_mb must be > 0".into(),
            ));
        }
        if self.limits.max_image_dimension == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_image_dimension must be > 0".into(),
            ));
        }
        if self.limits.max_image_pixels == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_image_pixels must be > 0".into(),
            ));
        }
        if self.limits.decode_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "limits.decode_timeout_ms must be > 0".into(),
            ));
        }
        let b = &self.bounds;
        if !(b.min_scale > 0.0 && b.min_scale <= b.max_scale) {
            return Err(ConfigError::ValidationError(
                "bounds.min_scale must be > 0 and <= bounds.max_scale".into(),
            ));
        }
        if b.min_dimension == 0 || b.min_dimension > b.max_dimension {
            return Err(ConfigError::ValidationError(
                "bounds.min_dimension must be > 0 and <= bounds.max_dimension".into(),
            ));
        }
        self.batch
            .validate(&self.bounds)
            .map_err(|e| ConfigError::ValidationError(format!("batch: {e}")))?;
        for (name, settings) in &self.profiles {
            if name.trim().is_empty() {
                return Err(ConfigError::ValidationError(
                    "profile names must not be empty".into(),
                ));
            }
            settings
                .validate(&self.bounds)
                .map_err(|e| ConfigError::ValidationError(format!("profiles.{name}: {e}")))?;
        }
        Ok(())
    }
}

impl BatchSettings {
    /// Check resize and quality settings against the accepted bounds.
    ///
    /// Runs before a batch starts; a failure here means no item is touched.
    pub fn validate(&self, bounds: &ResizeBounds) -> Result<(), ValidationError> {
        match self.resize {
            ResizeConfig::Scale { factor } => {
                // NaN fails both comparisons and is rejected here too
                if !(factor >= bounds.min_scale && factor <= bounds.max_scale) {
                    return Err(ValidationError::OutOfBounds {
                        field: "scale",
                        value: factor,
                        min: bounds.min_scale,
                        max: bounds.max_scale,
                    });
                }
            }
            ResizeConfig::Width { target } => check_dimension("width", target, bounds)?,
            ResizeConfig::Height { target } => check_dimension("height", target, bounds)?,
        }
        if !(1..=100).contains(&self.quality.0) {
            return Err(ValidationError::Quality(self.quality.0));
        }
        Ok(())
    }
}

fn check_dimension(
    field: &'static str,
    target: u32,
    bounds: &ResizeBounds,
) -> Result<(), ValidationError> {
    if target < bounds.min_dimension || target > bounds.max_dimension {
        return Err(ValidationError::OutOfBounds {
            field,
            value: f64::from(target),
            min: f64::from(bounds.min_dimension),
            max: f64::from(bounds.max_dimension),
        });
    }
    Ok(())
}
