//! Boxcount: box statistics for CVAT annotation exports.
//!
//! Boxcount reads a CVAT XML export (bare or zipped), builds a per-frame
//! model of its bounding boxes, and reports counts over a frame range:
//! totals, exclusions by label and skip/pass semantics, per-label
//! breakdowns and duplicate boxes.
//!
//! # Modules
//!
//! - [`source`]: Locating `annotations.xml` in `.xml` or `.zip` input
//! - [`model`]: Parsed document model and the CVAT XML reader
//! - [`duplicates`]: Exact and IoU-based duplicate detection
//! - [`stats`]: Range aggregation and the results report
//! - [`session`]: Holder for the most recently loaded document
//! - [`config`]: Persisted exclude-label preferences
//! - [`error`]: Error types for boxcount operations

pub mod config;
pub mod duplicates;
pub mod error;
pub mod model;
pub mod session;
pub mod source;
pub mod stats;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use log::debug;

pub use error::BoxCountError;

use config::{config_path, ExcludeConfig};
use duplicates::DuplicateOptions;
use session::Session;
use stats::RangeOptions;

/// The boxcount CLI application.
#[derive(Parser)]
#[command(name = "boxcount")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    /// Exclude-label preference file (YAML, or JSON by extension).
    #[arg(long, global = true, env = "BOXCOUNT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Count boxes over a frame range.
    Count(CountArgs),
    /// List the labels declared in an export.
    Labels(LabelsArgs),
    /// Manage the persisted exclude-label list.
    Exclude {
        #[command(subcommand)]
        action: ExcludeAction,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Arguments for the count subcommand.
#[derive(clap::Args)]
struct CountArgs {
    /// Input `.xml` or `.zip` export.
    input: PathBuf,

    /// First frame id (defaults to the first frame).
    #[arg(long, allow_negative_numbers = true)]
    start: Option<i64>,

    /// Last frame id (defaults to the last frame).
    #[arg(long, allow_negative_numbers = true)]
    end: Option<i64>,

    /// Additional label to exclude (repeatable, case-insensitive).
    #[arg(long = "exclude", value_name = "LABEL")]
    exclude: Vec<String>,

    /// Ignore the labels stored in the preference file.
    #[arg(long)]
    no_config_excludes: bool,

    /// Minimum IoU for a near-duplicate pair.
    #[arg(long, default_value_t = 0.99)]
    near_iou: f64,

    /// Also list per-label totals and duplicate pairs.
    #[arg(long)]
    details: bool,

    /// Output format for the report.
    #[arg(long, value_enum, default_value = "text")]
    output: OutputFormat,
}

/// Arguments for the labels subcommand.
#[derive(clap::Args)]
struct LabelsArgs {
    /// Input `.xml` or `.zip` export.
    input: PathBuf,

    /// Output format.
    #[arg(long, value_enum, default_value = "text")]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum ExcludeAction {
    /// Print the stored labels.
    List,
    /// Store a label.
    Add { label: String },
    /// Remove a stored label.
    Remove { label: String },
}

/// Run the boxcount CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), BoxCountError> {
    // `try_init` so repeated calls (e.g. from tests) do not panic.
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .try_init();

    let cli = Cli::parse();
    let config_file = config_path(cli.config.as_deref());

    match cli.command {
        Some(Commands::Count(args)) => run_count(args, &config_file),
        Some(Commands::Labels(args)) => run_labels(args),
        Some(Commands::Exclude { action }) => run_exclude(action, &config_file),
        None => {
            println!("boxcount {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Box statistics for CVAT annotation exports.");
            println!();
            println!("Run 'boxcount --help' for usage information.");
            Ok(())
        }
    }
}

/// Execute the count subcommand.
fn run_count(args: CountArgs, config_file: &Path) -> Result<(), BoxCountError> {
    let mut exclude_labels = if args.no_config_excludes {
        Vec::new()
    } else {
        ExcludeConfig::load(config_file)?.exclude_labels
    };
    exclude_labels.extend(args.exclude);
    debug!("excluding labels: {exclude_labels:?}");

    let mut session = Session::new();
    session.load_path(&args.input)?;

    let opts = RangeOptions {
        start: args.start,
        end: args.end,
        exclude_labels,
        duplicates: DuplicateOptions {
            near_iou_threshold: args.near_iou,
            ..DuplicateOptions::default()
        },
    };
    let report = session.stats(&opts)?;

    match args.output {
        OutputFormat::Json => println!("{}", to_json(&report)?),
        OutputFormat::Text if args.details => print!("{}", report.detailed()),
        OutputFormat::Text => print!("{report}"),
    }
    Ok(())
}

/// Execute the labels subcommand.
fn run_labels(args: LabelsArgs) -> Result<(), BoxCountError> {
    let mut session = Session::new();
    let document = session.load_path(&args.input)?;

    match args.output {
        OutputFormat::Json => println!("{}", to_json(&document.labels)?),
        OutputFormat::Text => {
            if document.labels.is_empty() {
                println!("No labels declared.");
            }
            for (name, def) in document.labels.iter() {
                if def.attribute_names.is_empty() {
                    println!("{name}");
                } else {
                    println!("{name} [{}]", def.attribute_names.join(", "));
                }
            }
        }
    }
    Ok(())
}

/// Execute the exclude subcommand.
fn run_exclude(action: ExcludeAction, config_file: &Path) -> Result<(), BoxCountError> {
    let mut config = ExcludeConfig::load(config_file)?;

    let changed = match action {
        ExcludeAction::List => {
            for label in &config.exclude_labels {
                println!("{label}");
            }
            false
        }
        ExcludeAction::Add { label } => config.add(&label),
        ExcludeAction::Remove { label } => config.remove(&label),
    };

    if changed {
        config.save(config_file)?;
        println!(
            "Saved {} label(s) to {}",
            config.exclude_labels.len(),
            config_file.display()
        );
    }
    Ok(())
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, BoxCountError> {
    Ok(serde_json::to_string_pretty(value).map_err(std::io::Error::from)?)
}
