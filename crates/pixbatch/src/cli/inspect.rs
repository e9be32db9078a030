//! The `pixbatch inspect` command: header sniffing without decoding.

use clap::Args;
use pixbatch_core::pipeline::signature::HEADER_LEN;
use pixbatch_core::types::DiagnosticReport;
use pixbatch_core::{Config, SignatureValidator};
use std::path::PathBuf;

use super::resize::collect::{discover, load_items, ReadMode};

/// Arguments for the `inspect` command.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Image files or directories to inspect
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Exit with an error if any file is not a recognized image
    #[arg(long)]
    pub strict: bool,
}

/// Execute the inspect command.
pub fn execute(args: InspectArgs, config: &Config) -> anyhow::Result<()> {
    let files = discover(&args.inputs)?;
    let items = load_items(&files, ReadMode::Header { len: HEADER_LEN })?;
    let report = SignatureValidator::analyze(&items);

    if args.json {
        let json = if config.output.pretty {
            serde_json::to_string_pretty(&report)?
        } else {
            serde_json::to_string(&report)?
        };
        println!("{json}");
    } else {
        print!("{}", render(&report));
    }

    if args.strict && report.invalid_count > 0 {
        anyhow::bail!("{} file(s) are not recognized images", report.invalid_count);
    }
    Ok(())
}

/// Human-readable table plus the aggregate line.
fn render(report: &DiagnosticReport) -> String {
    let mut out = String::new();
    for a in &report.analyses {
        out.push_str(&format!(
            "{:<7} {:<32} declared {:<10} actual {:<8} {:>10}\n",
            if a.is_valid { "valid" } else { "INVALID" },
            a.name,
            a.declared_format,
            a.actual_format_label(),
            a.size_formatted(),
        ));
    }
    out.push_str(&format!(
        "{} valid, {} invalid, {} total\n",
        report.valid_count,
        report.invalid_count,
        report.total_size_formatted()
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_flags_mismatches() {
        let dir = tempfile::tempdir().unwrap();
        let disguised = dir.path().join("x.jpg");
        let zeros = dir.path().join("zeros.png");
        std::fs::write(&disguised, [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]).unwrap();
        std::fs::write(&zeros, [0u8; 2048]).unwrap();

        let files = discover(&[dir.path().to_path_buf()]).unwrap();
        let items = load_items(&files, ReadMode::Header { len: HEADER_LEN }).unwrap();
        let report = SignatureValidator::analyze(&items);
        let text = render(&report);

        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("valid"));
        assert!(lines[0].contains("actual png"));
        assert!(lines[1].starts_with("INVALID"));
        assert!(lines[1].contains("unknown"));
        assert_eq!(lines[2], "1 valid, 1 invalid, 2.01 KB total");
    }

    #[test]
    fn test_strict_fails_on_invalid() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("fake.gif"), b"plain text").unwrap();

        let args = InspectArgs {
            inputs: vec![dir.path().to_path_buf()],
            json: true,
            strict: true,
        };
        assert!(execute(args, &Config::default()).is_err());
    }
}
