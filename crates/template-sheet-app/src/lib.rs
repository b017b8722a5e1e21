#![warn(missing_docs)]
//! # template-sheet-app
//!
//! ## Purpose
//! Resolves command-line input and orchestrates the `create`, `replicate` and
//! `list` commands of the `template-sheet` tool.
//!
//! ## Responsibilities
//! - Parse the command word, its operand and `-flag value` pairs into a
//!   [`Command`] with resolved [`Settings`].
//! - Allocate canvases, drive the tiling engine and write output files.
//! - Render help text and user-facing progress lines.
//!
//! ## Data flow
//! CLI words -> [`parse_command`] -> [`Command`] -> [`run`] -> core/tiling/io
//! crates -> `template.png` / `generated.png` plus progress on the output sink.
//!
//! ## Ownership and lifetimes
//! Commands own their operands. The canvas lives for one command invocation:
//! allocated, filled, encoded and dropped before [`run`] returns.
//!
//! ## Error model
//! Every failure is an [`AppError`]; all of them are fatal and map to exit
//! code 1 through [`AppError::exit_code`]. Zero-cell replication is not an
//! error.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use template_sheet_core::{
    CoreError, PaperSize, PixelBuffer, Settings, allocate_canvas, paper_by_index,
};
use template_sheet_io::{IoError, decode_image, encode_png, list_templates};
use template_sheet_tiling::{Replication, replicate};
use thiserror::Error;
use tracing::{debug, warn};

/// Build-time application version loaded from root `VERSION` file.
pub const APP_VERSION: &str = env!("TEMPLATE_SHEET_VERSION");

/// Output file written by `create`.
pub const TEMPLATE_FILE_NAME: &str = "template.png";

/// Output file written by `replicate`.
pub const GENERATED_FILE_NAME: &str = "generated.png";

/// Flags that print help and exit successfully wherever they appear.
pub const HELP_FLAGS: [&str; 3] = ["-h", "-help", "--help"];

/// Env var holding the `tracing` filter directive for the binary.
pub const LOG_ENV: &str = "TEMPLATE_SHEET_LOG";

/// Returns the app version sourced from root `VERSION`.
pub fn app_version() -> &'static str {
    APP_VERSION
}

/// One parsed invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Write a blank `width_mm x height_mm` template.
    Create {
        /// Template width in millimeters.
        width_mm: i64,
        /// Template height in millimeters.
        height_mm: i64,
        /// Resolved settings; only the resolution is used.
        settings: Settings,
    },
    /// Tile the image at `template` across a paper canvas.
    Replicate {
        /// Path of the template image.
        template: PathBuf,
        /// Resolved paper, resolution and margin.
        settings: Settings,
    },
    /// Print image files in the working directory.
    List,
    /// Print usage.
    Help,
}

/// Parses CLI words (without the program name) into a [`Command`].
///
/// # Semantics
/// - No words or an unknown command word yield [`Command::Help`].
/// - A help flag anywhere after the command word yields [`Command::Help`]
///   before anything else is validated.
///
/// # Errors
/// Returns [`AppError::Configuration`] for a missing operand, malformed
/// dimensions or an invalid flag value.
pub fn parse_command(args: &[String]) -> Result<Command, AppError> {
    let Some((command, rest)) = args.split_first() else {
        return Ok(Command::Help);
    };

    match command.as_str() {
        "create" | "replicate" if rest.iter().any(|arg| is_help_flag(arg)) => Ok(Command::Help),
        "create" => {
            let (dimensions, flags) = rest.split_first().ok_or_else(|| {
                AppError::Configuration(
                    "expected dimensions after `create`, e.g. `create 50x20`".to_string(),
                )
            })?;
            let (width_mm, height_mm) = parse_dimensions(dimensions)?;
            Ok(Command::Create {
                width_mm,
                height_mm,
                settings: resolve_settings(flags)?,
            })
        }
        "replicate" => {
            let (template, flags) = rest.split_first().ok_or_else(|| {
                AppError::Configuration(
                    "expected a template path after `replicate`, e.g. `replicate template.png`"
                        .to_string(),
                )
            })?;
            Ok(Command::Replicate {
                template: PathBuf::from(template),
                settings: resolve_settings(flags)?,
            })
        }
        "list" | "ls" => Ok(Command::List),
        _ => Ok(Command::Help),
    }
}

/// Returns `true` for `-h`, `-help` and `--help`.
pub fn is_help_flag(arg: &str) -> bool {
    HELP_FLAGS.contains(&arg)
}

/// Parses a `<width>x<height>` millimeter pair, splitting at the first `x`.
///
/// # Errors
/// Returns [`AppError::Configuration`] when the delimiter is missing, either
/// side is not an integer, or either side is not positive.
pub fn parse_dimensions(dimensions: &str) -> Result<(i64, i64), AppError> {
    let (width, height) = dimensions.split_once('x').ok_or_else(|| {
        AppError::Configuration(format!(
            "no `x` delimiter found in dimensions, given: {dimensions}"
        ))
    })?;

    let width = parse_positive(width, "width")?;
    let height = parse_positive(height, "height")?;
    Ok((width, height))
}

fn parse_positive(raw: &str, name: &str) -> Result<i64, AppError> {
    let value: i64 = raw
        .parse()
        .map_err(|_| AppError::Configuration(format!("failed to parse `{name}` from: {raw}")))?;
    if value <= 0 {
        return Err(AppError::Configuration(format!(
            "`{name}` must be a positive number of millimeters, given: {value}"
        )));
    }
    Ok(value)
}

/// Builds [`Settings`] from defaults overridden by `-paper`, `-px` and
/// `-margin` flags.
///
/// Words not starting with `-` are ignored. Unknown flags are skipped with a
/// warning and do not consume the following word.
///
/// # Errors
/// Returns [`AppError::Configuration`] when a known flag has no value, the
/// value does not parse, the paper is outside A0-A8, the resolution is not
/// positive, or the margin overflows once converted to pixels.
pub fn resolve_settings(flags: &[String]) -> Result<Settings, AppError> {
    let mut settings = Settings::default();
    let mut index = 0;

    while index < flags.len() {
        let flag = flags[index].as_str();
        if !flag.starts_with('-') || is_help_flag(flag) {
            index += 1;
            continue;
        }

        if !matches!(flag, "-paper" | "-px" | "-margin") {
            warn!(flag, "ignoring unknown flag");
            index += 1;
            continue;
        }

        let value = flags
            .get(index + 1)
            .ok_or_else(|| AppError::Configuration(format!("expected value after flag {flag}")))?;
        match flag {
            "-paper" => settings.paper = parse_paper(value)?,
            "-px" => {
                let pixels_per_mm: i64 = value.parse().map_err(|_| {
                    AppError::Configuration(format!(
                        "failed to parse pixels per mm, given: {value}"
                    ))
                })?;
                if pixels_per_mm <= 0 {
                    return Err(AppError::Configuration(format!(
                        "pixels per mm must be positive, given: {pixels_per_mm}"
                    )));
                }
                settings.pixels_per_mm = pixels_per_mm;
            }
            _ => {
                settings.margin_mm = value.parse().map_err(|_| {
                    AppError::Configuration(format!("failed to parse margin, given: {value}"))
                })?;
            }
        }
        index += 2;
    }

    settings.margin_px().map_err(|_| {
        AppError::Configuration(format!(
            "margin of {} mm at {} px/mm is too large",
            settings.margin_mm, settings.pixels_per_mm
        ))
    })?;

    debug!(?settings, "settings resolved");
    Ok(settings)
}

/// Parses `A<n>` / `a<n>` into an A-series paper size.
///
/// # Errors
/// Returns [`AppError::Configuration`] for a missing `A` prefix, a
/// non-integer index or an index outside 0-8.
pub fn parse_paper(value: &str) -> Result<PaperSize, AppError> {
    let index = value
        .strip_prefix('A')
        .or_else(|| value.strip_prefix('a'))
        .ok_or_else(|| {
            AppError::Configuration(format!(
                "paper size should start with letter 'A', given: {value}"
            ))
        })?;
    let index: i64 = index.parse().map_err(|_| {
        AppError::Configuration(format!("failed to parse paper size from: {index}"))
    })?;

    paper_by_index(index).map_err(|error| AppError::Configuration(error.to_string()))
}

/// Result of a `create` run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateReport {
    /// Written file.
    pub output: PathBuf,
    /// Template width in pixels.
    pub width_px: u32,
    /// Template height in pixels.
    pub height_px: u32,
}

/// Result of a `replicate` run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplicateReport {
    /// Written file.
    pub output: PathBuf,
    /// Detected template format.
    pub format_name: &'static str,
    /// Template width in pixels.
    pub template_width: u32,
    /// Template height in pixels.
    pub template_height: u32,
    /// Canvas width in pixels.
    pub canvas_width: u32,
    /// Canvas height in pixels.
    pub canvas_height: u32,
    /// Grid placement outcome.
    pub replication: Replication,
    /// Time spent copying pixels.
    pub elapsed: Duration,
}

/// Writes a blank, fully transparent template into `out_dir`.
///
/// # Errors
/// Returns [`AppError::Core`] when the canvas exceeds the size cap and
/// [`AppError::Io`] when the PNG cannot be written.
pub fn run_create(
    width_mm: i64,
    height_mm: i64,
    settings: &Settings,
    out_dir: &Path,
    out: &mut dyn Write,
) -> Result<CreateReport, AppError> {
    let template = allocate_canvas(width_mm, height_mm, settings.pixels_per_mm)?;
    let output = out_dir.join(TEMPLATE_FILE_NAME);

    save(&template, &output, out)?;
    Ok(CreateReport {
        output,
        width_px: template.width(),
        height_px: template.height(),
    })
}

/// Tiles the template at `template_path` across a paper canvas and writes the
/// result into `out_dir`.
///
/// # Errors
/// Returns [`AppError::Io`] when the template cannot be decoded or the output
/// cannot be written, and [`AppError::Core`] when the canvas exceeds the size
/// cap.
pub fn run_replicate(
    template_path: &Path,
    settings: &Settings,
    out_dir: &Path,
    out: &mut dyn Write,
) -> Result<ReplicateReport, AppError> {
    let decoded = decode_image(template_path)?;
    let template = decoded.buffer;
    writeln!(
        out,
        "Extension detected: {} | Template size: {}x{}",
        decoded.format_name,
        template.width(),
        template.height()
    )?;

    let mut canvas = allocate_canvas(
        settings.paper.width_mm,
        settings.paper.height_mm,
        settings.pixels_per_mm,
    )?;
    let margin_px = settings.margin_px()?;

    let start = Instant::now();
    let replication = replicate(&template, &mut canvas, margin_px);
    let elapsed = start.elapsed();
    writeln!(
        out,
        "Replicated {} pixels in {elapsed:?}",
        replication.pixels_written
    )?;

    if replication.is_empty() {
        debug!(margin_px, "template does not fit on canvas");
        writeln!(
            out,
            "WARNING: template ({}x{} px) does not fit inside the {}x{} px canvas with a {} px margin",
            template.width(),
            template.height(),
            canvas.width(),
            canvas.height(),
            margin_px
        )?;
    } else {
        writeln!(
            out,
            "Placed {} copies ({} columns x {} rows)",
            replication.cells, replication.columns, replication.rows
        )?;
    }

    let output = out_dir.join(GENERATED_FILE_NAME);
    save(&canvas, &output, out)?;

    Ok(ReplicateReport {
        output,
        format_name: decoded.format_name,
        template_width: template.width(),
        template_height: template.height(),
        canvas_width: canvas.width(),
        canvas_height: canvas.height(),
        replication,
        elapsed,
    })
}

fn save(buffer: &PixelBuffer, output: &Path, out: &mut dyn Write) -> Result<(), AppError> {
    writeln!(out, "Saving image...")?;
    encode_png(buffer, output)?;
    let name = output
        .file_name()
        .map_or_else(|| output.display().to_string(), |name| name.to_string_lossy().into_owned());
    writeln!(out, "Saved as {name}")?;
    Ok(())
}

/// Prints every template image in `dir` as `- <name>`.
///
/// # Errors
/// Returns [`AppError::Io`] when the directory cannot be read.
pub fn run_list(dir: &Path, out: &mut dyn Write) -> Result<Vec<String>, AppError> {
    let names = list_templates(dir)?;
    for name in &names {
        writeln!(out, "- {name}")?;
    }
    Ok(names)
}

/// Executes `command` against `work_dir`, writing user-facing lines to `out`.
///
/// # Errors
/// Propagates the failing command's [`AppError`].
pub fn run(command: Command, work_dir: &Path, exe: &str, out: &mut dyn Write) -> Result<(), AppError> {
    match command {
        Command::Create {
            width_mm,
            height_mm,
            settings,
        } => run_create(width_mm, height_mm, &settings, work_dir, out).map(|_| ()),
        Command::Replicate { template, settings } => {
            run_replicate(&work_dir.join(template), &settings, work_dir, out).map(|_| ())
        }
        Command::List => run_list(work_dir, out).map(|_| ()),
        Command::Help => {
            write!(out, "{}", help_text(exe))?;
            Ok(())
        }
    }
}

/// Returns the running executable's file name for usage lines.
pub fn executable_name() -> String {
    std::env::current_exe()
        .ok()
        .and_then(|path| path.file_name().map(|name| name.to_string_lossy().into_owned()))
        .or_else(|| std::env::args().next())
        .unwrap_or_else(|| "template-sheet".to_string())
}

/// Renders the usage banner for executable name `exe`.
pub fn help_text(exe: &str) -> String {
    let banner = format!("TEMPLATE SHEET v{APP_VERSION}");
    let rule = format!("+{}+", "-".repeat(banner.len() + 2));
    format!(
        "{rule}
| {banner} |
{rule}

Usage:
     {exe} create <dimensions>        - creates a width x height image [mm]
     {exe} replicate <path>           - replicates template across paper
     {exe} ls                         - lists images in current folder

Options:
    -paper A4            Sets paper size (A0-A8) (default: A4)
    -px 10               Pixels per millimeter (default: 10) [px]
    -margin 10           Sets margin to each side during replication (default: 10) [mm]
    -h, --help           Displays this help message (any order)

Example usage:
     {exe} create 50x20 -px 16
     {exe} replicate label.jpg -margin 20
"
    )
}

/// App integration error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid command line input.
    #[error("{0}")]
    Configuration(String),
    /// Core model error, including the canvas size cap.
    #[error("{0}")]
    Core(#[from] CoreError),
    /// Image read/write or directory listing error.
    #[error("{0}")]
    Io(#[from] IoError),
    /// Progress output could not be written.
    #[error("console output failed: {0}")]
    Console(#[from] std::io::Error),
}

impl AppError {
    /// Process exit code for this failure.
    pub fn exit_code(&self) -> i32 {
        1
    }

    /// Stable category label for logs.
    pub fn category(&self) -> &'static str {
        match self {
            AppError::Configuration(_) => "configuration",
            AppError::Core(CoreError::SizeLimitExceeded { .. }) => "size_limit",
            AppError::Core(_) => "configuration",
            AppError::Io(IoError::Decode { .. }) => "decode",
            AppError::Io(IoError::Write { .. }) => "write",
            AppError::Io(IoError::List { .. }) => "list",
            AppError::Console(_) => "console",
        }
    }
}
