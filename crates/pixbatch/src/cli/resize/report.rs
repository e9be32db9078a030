//! Progress display, artifact writing and summary output.

use indicatif::{ProgressBar, ProgressStyle};
use pixbatch_core::types::{BatchPhase, BatchState, BatchSummary};
use pixbatch_core::OutputWriter;
use std::collections::HashSet;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::types::ReportFormat;

/// Drive a progress bar from the orchestrator's state snapshots.
///
/// The task ends once the batch completes or the orchestrator is dropped.
pub fn spawn_progress(mut rx: watch::Receiver<BatchState>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let progress = create_progress_bar();

        while rx.changed().await.is_ok() {
            let state = rx.borrow_and_update().clone();
            progress.set_length(state.total as u64);
            progress.set_position(state.processed() as u64);
            if let Some(name) = &state.current_item_name {
                progress.set_message(name.clone());
            }
            if state.failed_count > 0 {
                progress.set_prefix(format!("{} failed", state.failed_count));
            }
            if state.phase == BatchPhase::Completed {
                break;
            }
        }

        progress.finish_and_clear();
    })
}

fn create_progress_bar() -> ProgressBar {
    let pb = ProgressBar::new(0);
    let style = ProgressStyle::default_bar()
        .template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {prefix:.red} {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-");
    pb.set_style(style);
    pb.set_message("starting...");
    pb
}

/// Write every artifact into `dir`. Returns how many files were written.
///
/// Existing files are left alone unless `force` is set. When two inputs
/// map to the same output name, the first one wins.
pub fn write_artifacts(dir: &Path, summary: &BatchSummary, force: bool) -> anyhow::Result<usize> {
    std::fs::create_dir_all(dir)?;

    let mut written = HashSet::new();
    for artifact in &summary.artifacts {
        let path = dir.join(&artifact.name);

        if written.contains(&artifact.name) {
            tracing::warn!("Skipping {}: name already written in this batch", artifact.name);
            continue;
        }
        if path.exists() && !force {
            tracing::warn!(
                "Skipping {}: file exists (use --force to overwrite)",
                path.display()
            );
            continue;
        }

        std::fs::write(&path, &artifact.bytes)?;
        tracing::debug!("Wrote {} ({} bytes)", path.display(), artifact.bytes.len());
        written.insert(artifact.name.clone());
    }

    Ok(written.len())
}

/// Write the batch report to `path`.
pub fn write_report(
    path: &Path,
    format: ReportFormat,
    pretty: bool,
    summary: &BatchSummary,
) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let mut writer = OutputWriter::new(BufWriter::new(file), format.into(), pretty);
    writer.write_summary(summary)?;
    writer.flush()?;
    tracing::info!("Report written to {:?}", path);
    Ok(())
}

/// Print comparison lines to stdout, then the error log and a summary box
/// to stderr.
pub fn print_summary(summary: &BatchSummary, files_written: usize, output_dir: &Path) {
    for artifact in &summary.artifacts {
        println!("{}: {}", artifact.name, artifact.comparison());
    }

    let log = summary.error_log();
    if !log.is_empty() {
        eprintln!();
        for line in log.lines() {
            eprintln!("  {line}");
        }
    }

    eprintln!();
    eprintln!("  ====================================");
    eprintln!("               Summary");
    eprintln!("  ====================================");
    eprintln!("    Resized:      {:>8}", summary.summary_line());
    if summary.failed_count() > 0 {
        eprintln!("    Failed:       {:>8}", summary.failed_count());
    }
    eprintln!("    Written:      {:>8}", files_written);
    eprintln!("  ------------------------------------");
    eprintln!("    Duration:     {:>7.1}s", summary.elapsed.as_secs_f64());
    eprintln!("    Output:       {}", output_dir.display());
    eprintln!("  ====================================");
}
