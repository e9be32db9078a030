//! Resize setup: fold CLI flags over the config's batch defaults.

use pixbatch_core::config::{BatchSettings, Quality, ResizeConfig};
use pixbatch_core::Config;
use std::path::PathBuf;

use super::types::ReportFormat;
use super::ResizeArgs;

/// Everything the resize command needs besides the inputs.
#[derive(Debug)]
pub struct ResizePlan {
    pub settings: BatchSettings,
    pub output_dir: PathBuf,
    pub report_format: ReportFormat,
    pub pretty: bool,
}

/// Build the batch settings and output options for this run.
///
/// The base is `--profile` if given, else `[batch]`; explicit flags win over
/// both. Range checks are left to the orchestrator, which rejects the batch
/// before any file is touched.
pub fn plan(args: &ResizeArgs, config: &Config) -> anyhow::Result<ResizePlan> {
    let mut settings = match &args.profile {
        Some(name) => {
            tracing::debug!("Using profile {name}");
            config.profile(name)?
        }
        None => config.batch.clone(),
    };

    if let Some(factor) = args.scale {
        settings.resize = ResizeConfig::Scale { factor };
    } else if let Some(target) = args.width {
        settings.resize = ResizeConfig::Width { target };
    } else if let Some(target) = args.height {
        settings.resize = ResizeConfig::Height { target };
    }

    if let Some(quality) = args.quality {
        settings.quality = Quality(quality);
    }
    if let Some(prefix) = &args.prefix {
        settings.naming.prefix = prefix.clone();
    }
    if let Some(suffix) = &args.suffix {
        settings.naming.suffix = suffix.clone();
    }
    if args.keep_original {
        settings.naming.keep_original = true;
    }
    if let Some(tag) = &args.folder_tag {
        settings.naming.output_folder_tag = Some(tag.clone());
    }

    let output_dir = match &args.output {
        Some(dir) => PathBuf::from(shellexpand::tilde(&dir.to_string_lossy()).into_owned()),
        None => config.output_dir(),
    };

    let report_format = args.format.unwrap_or_else(|| {
        ReportFormat::from_config(&config.output.format).unwrap_or_else(|| {
            tracing::warn!(
                "Unknown report format {:?} in config, using json",
                config.output.format
            );
            ReportFormat::Json
        })
    });

    Ok(ResizePlan {
        settings,
        output_dir,
        report_format,
        pretty: args.pretty || config.output.pretty,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        args: ResizeArgs,
    }

    fn parse(argv: &[&str]) -> ResizeArgs {
        let mut full = vec!["pixbatch"];
        full.extend_from_slice(argv);
        Harness::parse_from(full).args
    }

    #[test]
    fn test_config_defaults_apply_without_flags() {
        let config = Config::default();
        let plan = plan(&parse(&["a.jpg"]), &config).unwrap();
        assert_eq!(plan.settings, config.batch);
        assert_eq!(plan.output_dir, PathBuf::from("./resized"));
        assert_eq!(plan.report_format, ReportFormat::Json);
        assert!(!plan.pretty);
    }

    #[test]
    fn test_flags_override_config() {
        let config = Config::default();
        let args = parse(&[
            "a.jpg",
            "--width",
            "1280",
            "--quality",
            "75",
            "--prefix",
            "web_",
            "--suffix",
            "",
            "--folder-tag",
            "Summer 24",
            "--output",
            "out",
            "--format",
            "jsonl",
            "--pretty",
        ]);
        let plan = plan(&args, &config).unwrap();

        assert_eq!(plan.settings.resize, ResizeConfig::Width { target: 1280 });
        assert_eq!(plan.settings.quality, Quality(75));
        assert_eq!(plan.settings.naming.prefix, "web_");
        assert_eq!(plan.settings.naming.suffix, "");
        assert_eq!(
            plan.settings.naming.output_folder_tag.as_deref(),
            Some("Summer 24")
        );
        assert_eq!(plan.output_dir, PathBuf::from("out"));
        assert_eq!(plan.report_format, ReportFormat::Jsonl);
        assert!(plan.pretty);
    }

    #[test]
    fn test_resize_modes_are_exclusive() {
        let result = Harness::try_parse_from(["pixbatch", "a.jpg", "--scale", "2", "--height", "10"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_config_report_format_is_used() {
        let mut config = Config::default();
        config.output.format = "jsonl".to_string();
        config.output.pretty = true;
        let plan = plan(&parse(&["a.jpg"]), &config).unwrap();
        assert_eq!(plan.report_format, ReportFormat::Jsonl);
        assert!(plan.pretty);
    }

    #[test]
    fn test_profile_replaces_batch_defaults() {
        let config = Config::default();
        let plan = plan(&parse(&["a.jpg", "--profile", "mobile"]), &config).unwrap();
        assert_eq!(plan.settings.resize, ResizeConfig::Width { target: 768 });
        assert_eq!(plan.settings.quality, Quality(75));
        assert_eq!(plan.settings.naming.suffix, "_mobile");
    }

    #[test]
    fn test_flags_override_profile() {
        let config = Config::default();
        let args = parse(&["a.jpg", "--profile", "web", "--scale", "0.5", "--suffix", "_half"]);
        let plan = plan(&args, &config).unwrap();
        assert_eq!(plan.settings.resize, ResizeConfig::Scale { factor: 0.5 });
        assert_eq!(plan.settings.quality, Quality(85));
        assert_eq!(plan.settings.naming.suffix, "_half");
    }

    #[test]
    fn test_unknown_profile_is_an_error() {
        let err = plan(&parse(&["a.jpg", "--profile", "poster"]), &Config::default()).unwrap_err();
        assert!(err.to_string().contains("Unknown profile 'poster'"));
    }
}
