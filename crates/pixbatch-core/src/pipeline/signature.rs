//! Header sniffing: identify an image's real format from its magic bytes.
//!
//! This is a diagnostic pass. It runs over a batch independently of
//! processing and never blocks an item from being decoded.

use crate::types::{DiagnosticReport, ImageFormat, InputItem, SignatureAnalysis};

/// Number of header bytes inspected.
pub const HEADER_LEN: usize = 12;

/// One entry of the signature table.
#[derive(Debug, Clone, Copy)]
pub struct Signature {
    pub format: ImageFormat,
    /// Bytes the buffer must start with
    pub prefix: &'static [u8],
    /// Additional marker required at a fixed offset
    pub marker: Option<(usize, &'static [u8])>,
}

impl Signature {
    fn matches(&self, header: &[u8]) -> bool {
        if !header.starts_with(self.prefix) {
            return false;
        }
        match self.marker {
            Some((offset, marker)) => header
                .get(offset..offset + marker.len())
                .is_some_and(|bytes| bytes == marker),
            None => true,
        }
    }
}

/// Ordered signature table. First match wins.
pub const SIGNATURES: &[Signature] = &[
    Signature {
        format: ImageFormat::Jpeg,
        prefix: &[0xFF, 0xD8, 0xFF],
        marker: None,
    },
    Signature {
        format: ImageFormat::Png,
        prefix: &[0x89, 0x50, 0x4E, 0x47],
        marker: None,
    },
    Signature {
        format: ImageFormat::Gif,
        prefix: &[0x47, 0x49, 0x46],
        marker: None,
    },
    Signature {
        format: ImageFormat::Webp,
        prefix: &[0x52, 0x49, 0x46, 0x46],
        marker: Some((8, b"WEBP")),
    },
];

/// Classifies buffers against [`SIGNATURES`].
pub struct SignatureValidator;

impl SignatureValidator {
    /// Detect the format of a buffer from its header.
    pub fn detect(bytes: &[u8]) -> Option<ImageFormat> {
        let header = &bytes[..bytes.len().min(HEADER_LEN)];
        SIGNATURES
            .iter()
            .find(|sig| sig.matches(header))
            .map(|sig| sig.format)
    }

    /// Analyze a single item.
    pub fn analyze_item(item: &InputItem) -> SignatureAnalysis {
        let actual_format = Self::detect(&item.raw_bytes);
        SignatureAnalysis {
            name: item.name.clone(),
            declared_format: item.declared_format.clone(),
            actual_format,
            size_bytes: item.size_bytes,
            is_valid: actual_format.is_some(),
        }
    }

    /// Analyze every item and aggregate the counts.
    pub fn analyze(items: &[InputItem]) -> DiagnosticReport {
        let mut report = DiagnosticReport::default();
        for item in items {
            let analysis = Self::analyze_item(item);
            if analysis.is_valid {
                report.valid_count += 1;
            } else {
                report.invalid_count += 1;
            }
            report.total_size_bytes += analysis.size_bytes;
            report.analyses.push(analysis);
        }
        tracing::debug!(
            "Signature pass: {} valid, {} invalid",
            report.valid_count,
            report.invalid_count
        );
        report
    }
}
