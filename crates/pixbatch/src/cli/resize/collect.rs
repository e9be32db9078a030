//! Input discovery: turn paths on the command line into `InputItem`s.

use anyhow::Context;
use pixbatch_core::types::{ImageFormat, InputItem};
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// How much of each file to read.
#[derive(Debug, Clone, Copy)]
pub enum ReadMode {
    /// Whole file, unless it is larger than `max_bytes`. Oversized files
    /// are admitted with empty bytes so the pipeline reports them.
    Full { max_bytes: u64 },
    /// Only the first `len` bytes (enough for header sniffing).
    Header { len: usize },
}

/// Expand inputs into an ordered, de-duplicated file list.
///
/// Files named explicitly are kept whatever their extension, so the batch
/// can reject an unsupported one. Directories are walked recursively and
/// only yield files with a supported extension, sorted by path.
pub fn discover(inputs: &[PathBuf]) -> anyhow::Result<Vec<PathBuf>> {
    let mut seen = HashSet::new();
    let mut files = Vec::new();

    for input in inputs {
        if !input.exists() {
            anyhow::bail!(
                "Input path does not exist: {:?}\n\n  Hint: Check the file path and try again.",
                input
            );
        }

        let found = if input.is_file() {
            vec![input.clone()]
        } else {
            walk_dir(input)
        };

        for path in found {
            if seen.insert(path.clone()) {
                files.push(path);
            }
        }
    }

    Ok(files)
}

fn walk_dir(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| is_supported(path))
        .collect();

    // Sort by path for deterministic ordering
    files.sort();
    files
}

/// Check if a file has a supported image extension.
fn is_supported(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .and_then(ImageFormat::from_file_name)
        .is_some()
}

/// Read files into items, in order. The declared format is the lowercased
/// extension (empty when there is none).
pub fn load_items(files: &[PathBuf], mode: ReadMode) -> anyhow::Result<Vec<InputItem>> {
    files
        .iter()
        .enumerate()
        .map(|(index, path)| load_item(index, path, mode))
        .collect()
}

fn load_item(index: usize, path: &Path, mode: ReadMode) -> anyhow::Result<InputItem> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let declared = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    let size = std::fs::metadata(path)
        .with_context(|| format!("Failed to stat {}", path.display()))?
        .len();

    let bytes = match mode {
        ReadMode::Full { max_bytes } if size > max_bytes => {
            tracing::debug!("Not reading {} ({} bytes): over the size limit", name, size);
            Vec::new()
        }
        ReadMode::Full { .. } => {
            std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?
        }
        ReadMode::Header { len } => {
            let mut header = Vec::with_capacity(len);
            File::open(path)
                .and_then(|file| file.take(len as u64).read_to_end(&mut header))
                .with_context(|| format!("Failed to read {}", path.display()))?;
            header
        }
    };

    let mut item = InputItem::new(index.to_string(), name, declared, bytes);
    item.size_bytes = size;
    Ok(item)
}
