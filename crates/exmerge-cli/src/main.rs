//! exmerge CLI
//!
//! Command-line tool for merging per-exercise CSV files into one table per class.

use clap::{Parser, Subcommand};
use exmerge_core::{
    ex_label, find_matching_column, parse_csv, scan_directory, ClassMetadata, CsvMerger,
    MergerConfig, Role, RunSummary,
};
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "exmerge")]
#[command(about = "Merge exercise CSV files by class", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Show debug output (column matching, per-column copies)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only show warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge every class under a root directory
    Run {
        /// Root directory whose subdirectories are classes
        #[arg(short, long, required_unless_present = "config")]
        root: Option<PathBuf>,

        /// Output directory for merged files
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// JSON config file with root and output_dir
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Also write the run summary as JSON
        #[arg(long)]
        summary_json: Option<PathBuf>,
    },

    /// List classes and their CSV files in merge order
    Classes {
        /// Root directory whose subdirectories are classes
        #[arg(short, long)]
        root: PathBuf,
    },

    /// Parse and describe a single CSV file
    Parse {
        /// Path to CSV file
        #[arg(short, long)]
        file: PathBuf,

        /// Number of rows to display
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },

    /// Create a config file template
    CreateConfig {
        /// Output path for the config file
        #[arg(short, long)]
        output: PathBuf,

        /// Root directory to include
        #[arg(short, long)]
        root: PathBuf,

        /// Output directory for merged files
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> exmerge_core::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Run {
            root,
            output,
            config,
            summary_json,
        } => cmd_run(root, output, config, summary_json),
        Commands::Classes { root } => cmd_classes(&root),
        Commands::Parse { file, limit } => cmd_parse(&file, limit),
        Commands::CreateConfig {
            output,
            root,
            output_dir,
        } => cmd_create_config(&output, root, output_dir),
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    // RUST_LOG directives still apply on top of the flag-derived default.
    let level = if verbose {
        Level::DEBUG
    } else if quiet {
        Level::WARN
    } else {
        Level::INFO
    };
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}

fn cmd_run(
    root: Option<PathBuf>,
    output: Option<PathBuf>,
    config: Option<PathBuf>,
    summary_json: Option<PathBuf>,
) -> exmerge_core::Result<()> {
    // --root overrides the root from a config file
    let config = match (config, root) {
        (Some(path), Some(root)) => MergerConfig {
            root,
            ..MergerConfig::load(path)?
        },
        (Some(path), None) => MergerConfig::load(path)?,
        (None, root) => MergerConfig::new(root.unwrap_or_default()),
    };

    let merger = CsvMerger::from_config(config)?;
    let summary = merger.run(output.as_deref())?;

    print_summary(&summary);

    if let Some(path) = summary_json {
        summary.save(&path)?;
        println!("\nSummary written to {}", path.display());
    }

    Ok(())
}

fn cmd_classes(root: &Path) -> exmerge_core::Result<()> {
    let classes = scan_directory(root)?;

    println!("Classes ({}):", classes.len());
    println!();

    for class in &classes {
        println!("{} ({} files)", class.name, class.files.len());
        for file in &class.files {
            println!("  {}: {}", ex_label(file.ex_number), file.name);
        }
        println!();
    }

    Ok(())
}

fn cmd_parse(file: &Path, limit: usize) -> exmerge_core::Result<()> {
    let table = parse_csv(file)?;
    let names = table.column_names();

    println!("File: {}", file.display());
    println!("Columns: {}", table.column_count());
    println!("Rows: {}", table.row_count());
    println!();

    for role in [Role::Channel, Role::X, Role::Y, Role::Z] {
        let found = find_matching_column(role, &names).unwrap_or("(none)");
        println!("  {:<8} -> {}", role.label(), found);
    }
    println!();

    println!("{}", names.join("\t"));
    println!("{}", "-".repeat(names.len() * 12));

    for row in table.rows.iter().take(limit) {
        let values: Vec<String> = row.cells.iter().map(|c| c.to_string_value()).collect();
        println!("{}", values.join("\t"));
    }

    if table.row_count() > limit {
        println!("... ({} more rows)", table.row_count() - limit);
    }

    Ok(())
}

fn cmd_create_config(
    output: &Path,
    root: PathBuf,
    output_dir: Option<PathBuf>,
) -> exmerge_core::Result<()> {
    let mut config = MergerConfig::new(root);
    if let Some(dir) = output_dir {
        config = config.with_output_dir(dir);
    }

    config.save(output)?;
    println!("Created config file: {}", output.display());
    println!();
    println!("Edit the file if needed, then run:");
    println!("  exmerge run --config {}", output.display());

    Ok(())
}

fn print_summary(summary: &RunSummary) {
    let rule = "=".repeat(60);
    println!("\n{}", rule);
    println!("SUMMARY");
    println!("{}", rule);
    println!("Root directory:   {}", summary.root.display());
    println!("Output directory: {}", summary.output_dir.display());

    if summary.classes.is_empty() {
        println!("\nNo class folders found.");
        return;
    }

    for class in &summary.classes {
        print_class(class);
    }

    println!();
    println!(
        "{} class(es) processed, {} file(s) written",
        summary.classes.len(),
        summary.written.len()
    );
}

fn print_class(meta: &ClassMetadata) {
    println!("\nClass: {}", meta.class);
    println!("   Files processed: {}", meta.files.len());
    println!("   Total rows: {}", meta.total_rows);
    println!("   Total columns: {}", meta.total_columns);

    if !meta.files.is_empty() {
        println!("   File details:");
        for file in &meta.files {
            println!(
                "     - {}: {} ({} rows, {} cols)",
                file.label(),
                file.name,
                file.rows,
                file.columns
            );
        }
    }

    if !meta.skipped.is_empty() {
        println!("   Skipped (unreadable): {}", meta.skipped.join(", "));
    }

    for note in &meta.notes {
        println!("   Note: {}", note);
    }
}
