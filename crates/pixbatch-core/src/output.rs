//! Batch report output in JSON or JSONL.
//!
//! Reports carry artifact metadata and the error log, never encoded bytes.
//! JSON writes one report object; JSONL writes one record per line, tagged
//! by `type`, so a consumer can stream it.

use serde::Serialize;
use std::io::{self, Write};

use crate::types::{BatchSummary, OutputArtifact, ProcessingError};

/// Report format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Single JSON object
    Json,
    /// One JSON record per line (newline-delimited JSON)
    JsonLines,
}

impl OutputFormat {
    /// Parse format from string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "jsonl" | "jsonlines" | "ndjson" => Some(Self::JsonLines),
            _ => None,
        }
    }
}

/// Whole-batch report, as written in JSON mode.
#[derive(Debug, Serialize)]
pub struct BatchReport<'a> {
    pub summary: String,
    pub success_count: usize,
    pub total_count: usize,
    pub elapsed_ms: u128,
    pub artifacts: &'a [OutputArtifact],
    pub errors: &'a [ProcessingError],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub global_error: Option<&'a str>,
}

impl<'a> From<&'a BatchSummary> for BatchReport<'a> {
    fn from(summary: &'a BatchSummary) -> Self {
        Self {
            summary: summary.summary_line(),
            success_count: summary.success_count,
            total_count: summary.total_count,
            elapsed_ms: summary.elapsed.as_millis(),
            artifacts: &summary.artifacts,
            errors: &summary.errors,
            global_error: summary.global_error.as_deref(),
        }
    }
}

/// One line of a JSONL report.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReportRecord<'a> {
    Artifact(&'a OutputArtifact),
    Error(&'a ProcessingError),
    GlobalError { message: &'a str },
    Summary {
        summary: String,
        success_count: usize,
        total_count: usize,
        elapsed_ms: u128,
    },
}

/// A writer that serializes reports to JSON or JSONL.
pub struct OutputWriter<W: Write> {
    writer: W,
    format: OutputFormat,
    pretty: bool,
    records_written: usize,
}

impl<W: Write> OutputWriter<W> {
    /// Create a new output writer.
    ///
    /// `pretty` only affects JSON; JSONL is always one record per line.
    pub fn new(writer: W, format: OutputFormat, pretty: bool) -> Self {
        Self {
            writer,
            format,
            pretty,
            records_written: 0,
        }
    }

    /// Write a single serializable value followed by a newline.
    pub fn write<T: Serialize>(&mut self, item: &T) -> io::Result<()> {
        if self.pretty && self.format == OutputFormat::Json {
            serde_json::to_writer_pretty(&mut self.writer, item).map_err(io::Error::other)?;
        } else {
            serde_json::to_writer(&mut self.writer, item).map_err(io::Error::other)?;
        }
        writeln!(self.writer)?;
        self.records_written += 1;
        Ok(())
    }

    /// Write the report for a finished batch.
    ///
    /// JSONL order: artifacts, then errors, then the global error if any,
    /// then one closing summary record.
    pub fn write_summary(&mut self, summary: &BatchSummary) -> io::Result<()> {
        match self.format {
            OutputFormat::Json => self.write(&BatchReport::from(summary)),
            OutputFormat::JsonLines => {
                for artifact in &summary.artifacts {
                    self.write(&ReportRecord::Artifact(artifact))?;
                }
                for error in &summary.errors {
                    self.write(&ReportRecord::Error(error))?;
                }
                if let Some(message) = summary.global_error.as_deref() {
                    self.write(&ReportRecord::GlobalError { message })?;
                }
                self.write(&ReportRecord::Summary {
                    summary: summary.summary_line(),
                    success_count: summary.success_count,
                    total_count: summary.total_count,
                    elapsed_ms: summary.elapsed.as_millis(),
                })
            }
        }
    }

    /// Number of JSON values written so far.
    pub fn records_written(&self) -> usize {
        self.records_written
    }

    /// Flush the underlying writer.
    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    /// Consume the writer and return the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Convenience function to serialize an item to a JSON string.
pub fn to_json<T: Serialize>(item: &T, pretty: bool) -> Result<String, serde_json::Error> {
    if pretty {
        serde_json::to_string_pretty(item)
    } else {
        serde_json::to_string(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Dimensions, ImageFormat};
    use std::time::Duration;

    fn sample_summary() -> BatchSummary {
        BatchSummary {
            success_count: 1,
            total_count: 2,
            artifacts: vec![OutputArtifact {
                name: "A_resized.jpg".to_string(),
                bytes: vec![0xFF; 64],
                format: ImageFormat::Jpeg,
                original_dims: Dimensions::new(2000, 1000),
                new_dims: Dimensions::new(1000, 500),
                original_size_bytes: 4096,
                new_size_bytes: 64,
            }],
            errors: vec![ProcessingError {
                item_name: "C.jpg".to_string(),
                message: "Failed to decode image: corrupt".to_string(),
            }],
            global_error: None,
            elapsed: Duration::from_millis(1500),
        }
    }

    #[test]
    fn test_write_json_report() {
        let mut buffer = Vec::new();
        let mut writer = OutputWriter::new(&mut buffer, OutputFormat::Json, false);
        writer.write_summary(&sample_summary()).unwrap();
        assert_eq!(writer.records_written(), 1);

        let output = String::from_utf8(buffer).unwrap();
        let value: serde_json::Value = serde_json::from_str(output.trim()).unwrap();
        assert_eq!(value["summary"], "1/2");
        assert_eq!(value["elapsed_ms"], 1500);
        assert_eq!(value["artifacts"][0]["name"], "A_resized.jpg");
        assert_eq!(value["artifacts"][0]["format"], "jpeg");
        assert_eq!(value["errors"][0]["item_name"], "C.jpg");
        // Encoded bytes never reach the report
        assert!(value["artifacts"][0].get("bytes").is_none());
        assert!(value.get("global_error").is_none());
    }

    #[test]
    fn test_write_jsonl_report() {
        let mut summary = sample_summary();
        summary.global_error = Some("worker crashed".to_string());

        let mut buffer = Vec::new();
        let mut writer = OutputWriter::new(&mut buffer, OutputFormat::JsonLines, true);
        writer.write_summary(&summary).unwrap();

        let output = String::from_utf8(buffer).unwrap();
        let types: Vec<String> = output
            .lines()
            .map(|line| {
                let value: serde_json::Value = serde_json::from_str(line).unwrap();
                value["type"].as_str().unwrap().to_string()
            })
            .collect();
        assert_eq!(types, ["artifact", "error", "global_error", "summary"]);
    }

    #[test]
    fn test_pretty_json_spans_lines() {
        let mut buffer = Vec::new();
        let mut writer = OutputWriter::new(&mut buffer, OutputFormat::Json, true);
        writer.write_summary(&sample_summary()).unwrap();
        writer.flush().unwrap();

        let output = String::from_utf8(buffer).unwrap();
        assert!(output.lines().count() > 1);
    }

    #[test]
    fn test_format_parse() {
        assert_eq!(OutputFormat::parse("json"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::parse("jsonl"), Some(OutputFormat::JsonLines));
        assert_eq!(OutputFormat::parse("NDJSON"), Some(OutputFormat::JsonLines));
        assert_eq!(OutputFormat::parse("xml"), None);
    }
}
