//! CLI enum types for the resize command.

use clap::ValueEnum;
use pixbatch_core::OutputFormat as CoreOutputFormat;

/// Supported report formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Single JSON object
    Json,
    /// One JSON record per line (newline-delimited)
    Jsonl,
}

impl ReportFormat {
    /// Parse the `[output] format` config value.
    pub fn from_config(value: &str) -> Option<Self> {
        CoreOutputFormat::parse(value).map(Self::from)
    }
}

impl From<CoreOutputFormat> for ReportFormat {
    fn from(format: CoreOutputFormat) -> Self {
        match format {
            CoreOutputFormat::Json => ReportFormat::Json,
            CoreOutputFormat::JsonLines => ReportFormat::Jsonl,
        }
    }
}

impl From<ReportFormat> for CoreOutputFormat {
    fn from(format: ReportFormat) -> Self {
        match format {
            ReportFormat::Json => CoreOutputFormat::Json,
            ReportFormat::Jsonl => CoreOutputFormat::JsonLines,
        }
    }
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportFormat::Json => write!(f, "json"),
            ReportFormat::Jsonl => write!(f, "jsonl"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_value() {
        assert_eq!(ReportFormat::from_config("json"), Some(ReportFormat::Json));
        assert_eq!(ReportFormat::from_config("ndjson"), Some(ReportFormat::Jsonl));
        assert_eq!(ReportFormat::from_config("yaml"), None);
    }
}
