//! CLI binary for upload2png.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ConversionConfig`, builds an `Upload` from files or a dumped widget
//! value, and prints the result.

use anyhow::{Context, Result};
use clap::Parser;
use std::io;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use upload2png::{convert, ConversionConfig, MultiFilePolicy, Upload, DEFAULT_OUTPUT_NAME};

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert a JPEG into ./image.png (cat.jpg is read, staged and removed from ./lab00)
  upload2png cat.jpg -d lab00

  # Use a different output name
  upload2png scan.bmp -d out --output-name scan.png

  # Convert a widget value dumped as JSON ({"name": {"content": "<base64>"}})
  upload2png --upload-json upload.json -d lab00

  # Several files: pick the first by name instead of failing
  upload2png b.gif a.jpg --multi-file first -d out

  # Machine-readable report
  upload2png cat.jpg -d out --json

NOTES:
  The uploaded file is written into the output directory under its own name
  and deleted after conversion. Input files that already live there under
  the same name are refused, so a source file is never deleted."#;

/// Convert an uploaded image to a fixed-name PNG.
#[derive(Parser, Debug)]
#[command(
    name = "upload2png",
    version,
    about = "Convert an uploaded image to a fixed-name PNG",
    long_about = "Convert one uploaded image (PNG, JPEG, GIF, BMP, WebP, TIFF, ICO) to PNG. \
The upload is staged in the output directory under its original name, decoded, written as \
image.png (or --output-name), and the staged original is removed.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Image files to treat as the upload.
    #[arg(required_unless_present = "upload_json", conflicts_with = "upload_json")]
    files: Vec<PathBuf>,

    /// Read the upload from a widget value dumped as JSON.
    #[arg(long, env = "UPLOAD2PNG_UPLOAD_JSON")]
    upload_json: Option<PathBuf>,

    /// Directory for the staged upload and the PNG.
    #[arg(short = 'd', long = "dir", env = "UPLOAD2PNG_DIR", default_value = ".")]
    dir: PathBuf,

    /// Name of the PNG to write.
    #[arg(long, env = "UPLOAD2PNG_OUTPUT_NAME", default_value = DEFAULT_OUTPUT_NAME)]
    output_name: String,

    /// What to do when more than one file is uploaded.
    #[arg(long, env = "UPLOAD2PNG_MULTI_FILE", value_enum, default_value = "reject")]
    multi_file: MultiFileArg,

    /// Print the conversion report as JSON on stdout.
    #[arg(long, env = "UPLOAD2PNG_JSON")]
    json: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "UPLOAD2PNG_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "UPLOAD2PNG_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum MultiFileArg {
    Reject,
    First,
}

impl From<MultiFileArg> for MultiFilePolicy {
    fn from(v: MultiFileArg) -> Self {
        match v {
            MultiFileArg::Reject => MultiFilePolicy::Reject,
            MultiFileArg::First => MultiFilePolicy::FirstByName,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || cli.json {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config and upload ──────────────────────────────────────────
    let config = ConversionConfig::builder()
        .output_dir(&cli.dir)
        .output_name(&cli.output_name)
        .multi_file(cli.multi_file.clone().into())
        .build()
        .context("Invalid configuration")?;

    let upload = load_upload(&cli)?;

    // ── Run conversion ───────────────────────────────────────────────────
    let output = convert(&upload, &config).context("Conversion failed")?;

    if cli.json {
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
        println!("{json}");
    } else if !cli.quiet {
        eprintln!(
            "{}  {} → {}  {}",
            green("✔"),
            output.source_name,
            bold(&output.output_path.display().to_string()),
            dim(&format!(
                "{}x{} {}, {} bytes, {}ms",
                output.width,
                output.height,
                output.color_type,
                output.bytes_written,
                output.duration_ms
            )),
        );
    }

    Ok(())
}

/// Build the `Upload` from `--upload-json` or the positional files.
fn load_upload(cli: &Cli) -> Result<Upload> {
    if let Some(ref path) = cli.upload_json {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read upload JSON from {:?}", path))?;
        return Upload::from_json(&json).context("Failed to parse upload JSON");
    }

    for file in &cli.files {
        ensure_not_staged_over(file, &cli.dir)?;
    }
    Upload::from_paths(&cli.files).context("Failed to read input files")
}

/// Refuse inputs whose staged copy would be the input itself.
///
/// Staging writes `<dir>/<file name>` and removes it afterwards; if that is
/// the input path, the user's file would be deleted.
fn ensure_not_staged_over(file: &Path, dir: &Path) -> Result<()> {
    let Some(name) = file.file_name() else {
        return Ok(());
    };
    let staged = dir.join(name);
    let (Ok(src), Ok(dst)) = (file.canonicalize(), staged.canonicalize()) else {
        return Ok(());
    };
    if src == dst {
        anyhow::bail!(
            "'{}' is already in the output directory and would be deleted after conversion.\n\
Copy it elsewhere or choose another --dir.",
            file.display()
        );
    }
    Ok(())
}
