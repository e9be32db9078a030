//! The `pixbatch resize` command.

pub mod collect;
mod report;
mod setup;
pub mod types;

pub use types::ReportFormat;

use clap::{ArgGroup, Args};
use pixbatch_core::{BatchOrchestrator, Config};
use std::path::PathBuf;

use collect::{discover, load_items, ReadMode};
use report::{print_summary, spawn_progress, write_artifacts, write_report};
use setup::plan;

/// Arguments for the `resize` command.
#[derive(Args, Debug)]
#[command(group(ArgGroup::new("mode").args(["scale", "width", "height"])))]
pub struct ResizeArgs {
    /// Image files or directories to resize
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Start from a named profile instead of `[batch]` (web, mobile,
    /// thumbnail, print, email, archive, or a `[profiles.<name>]` table)
    #[arg(short, long)]
    pub profile: Option<String>,

    /// Output directory (defaults to `[output] dir` from config)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Scale both edges by this factor
    #[arg(long)]
    pub scale: Option<f64>,

    /// Fit to this width, keeping the aspect ratio
    #[arg(long)]
    pub width: Option<u32>,

    /// Fit to this height, keeping the aspect ratio
    #[arg(long)]
    pub height: Option<u32>,

    /// Encoder quality, 1-100
    #[arg(short, long)]
    pub quality: Option<u8>,

    /// Prefix for output names
    #[arg(long)]
    pub prefix: Option<String>,

    /// Suffix inserted before the extension
    #[arg(long)]
    pub suffix: Option<String>,

    /// Keep original file names (prefix and suffix are ignored)
    #[arg(long)]
    pub keep_original: bool,

    /// Tag prepended to every output name
    #[arg(long)]
    pub folder_tag: Option<String>,

    /// Overwrite existing files in the output directory
    #[arg(long)]
    pub force: bool,

    /// Write a batch report to this file
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Report format (defaults to `[output] format` from config)
    #[arg(short, long, value_enum)]
    pub format: Option<ReportFormat>,

    /// Pretty-print JSON reports
    #[arg(long)]
    pub pretty: bool,
}

/// Execute the resize command.
pub async fn execute(args: ResizeArgs, config: Config) -> anyhow::Result<()> {
    let files = discover(&args.inputs)?;
    if files.is_empty() {
        tracing::warn!("No supported image files found in {:?}", args.inputs);
        return Ok(());
    }
    tracing::info!("Found {} image(s) to resize", files.len());

    let plan = plan(&args, &config)?;
    let orchestrator = BatchOrchestrator::new(&config, plan.settings.clone())?;

    let items = load_items(
        &files,
        ReadMode::Full {
            max_bytes: config.limits.max_file_size_bytes(),
        },
    )?;

    let progress = spawn_progress(orchestrator.subscribe());
    let outcome = orchestrator.run(items).await;
    // Closing the channel ends the progress task on the rejected path too
    drop(orchestrator);
    progress.await?;
    let summary = outcome?;

    let written = write_artifacts(&plan.output_dir, &summary, args.force)?;
    print_summary(&summary, written, &plan.output_dir);

    if let Some(path) = &args.report {
        write_report(path, plan.report_format, plan.pretty, &summary)?;
    }

    if let Some(global) = &summary.global_error {
        anyhow::bail!("Batch aborted: {global}");
    }
    if summary.success_count == 0 {
        anyhow::bail!("No images were resized ({} failed)", summary.failed_count());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, RgbImage};
    use std::io::Cursor;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let mut buffer = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(RgbImage::new(width, height))
            .write_to(&mut buffer, image::ImageFormat::Png)
            .unwrap();
        buffer.into_inner()
    }

    fn args(inputs: Vec<PathBuf>, output: PathBuf) -> ResizeArgs {
        ResizeArgs {
            inputs,
            profile: None,
            output: Some(output),
            scale: Some(0.5),
            width: None,
            height: None,
            quality: None,
            prefix: None,
            suffix: None,
            keep_original: false,
            folder_tag: None,
            force: false,
            report: None,
            format: None,
            pretty: false,
        }
    }

    fn quiet_config() -> Config {
        let mut config = Config::default();
        config.pipeline.yield_ms = 0;
        config
    }

    #[tokio::test]
    async fn test_resize_directory_writes_outputs_and_report() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in");
        std::fs::create_dir_all(&input).unwrap();
        std::fs::write(input.join("a.png"), png(40, 20)).unwrap();
        std::fs::write(input.join("broken.png"), b"not a png").unwrap();
        let out = dir.path().join("out");
        let report = dir.path().join("report.jsonl");

        let mut args = args(vec![input], out.clone());
        args.report = Some(report.clone());
        args.format = Some(ReportFormat::Jsonl);
        execute(args, quiet_config()).await.unwrap();

        let resized = image::open(out.join("a_resized.png")).unwrap();
        assert_eq!((resized.width(), resized.height()), (20, 10));
        assert!(!out.join("broken_resized.png").exists());

        let content = std::fs::read_to_string(report).unwrap();
        let last: serde_json::Value =
            serde_json::from_str(content.lines().last().unwrap()).unwrap();
        assert_eq!(last["type"], "summary");
        assert_eq!(last["summary"], "1/2");
    }

    #[tokio::test]
    async fn test_unsupported_file_rejects_batch() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("a.png");
        let bad = dir.path().join("scan.tiff");
        std::fs::write(&good, png(8, 8)).unwrap();
        std::fs::write(&bad, b"II*\0").unwrap();
        let out = dir.path().join("out");

        let err = execute(args(vec![good, bad], out.clone()), quiet_config())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("scan.tiff"));
        assert!(!out.exists());
    }

    #[tokio::test]
    async fn test_out_of_bounds_scale_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("a.png");
        std::fs::write(&good, png(8, 8)).unwrap();

        let mut args = args(vec![good], dir.path().join("out"));
        args.scale = Some(10.0);
        assert!(execute(args, quiet_config()).await.is_err());
    }

    #[tokio::test]
    async fn test_profile_drives_naming_and_size() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("photo.png");
        std::fs::write(&input, png(600, 300)).unwrap();
        let out = dir.path().join("out");

        let mut args = args(vec![input], out.clone());
        args.scale = None;
        args.profile = Some("thumbnail".to_string());
        execute(args, quiet_config()).await.unwrap();

        let thumb = image::open(out.join("photo_thumb.png")).unwrap();
        assert_eq!((thumb.width(), thumb.height()), (300, 150));
    }
}
