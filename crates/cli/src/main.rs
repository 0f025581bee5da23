mod report;
mod table_file;

use anyhow::{Context, Result, bail};
use argscan::Session;
use clap::{Parser, Subcommand};
use std::{
    fs,
    path::{Path, PathBuf},
    process::ExitCode,
};
use tracing_subscriber::{EnvFilter, fmt};

use crate::report::{EventRecord, ScanReport};
use crate::table_file::{DEFAULT_TABLE_NAME, FlagCells, TableFile};

#[derive(Parser)]
#[command(name = "argscan")]
#[command(version, about = "Scan arguments against a getopt-style option table", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a sample option table
    Init(InitArgs),

    /// Validate an option table
    Check(CheckArgs),

    /// Scan arguments and print the event stream
    Scan(ScanArgs),
}

#[derive(Parser)]
struct InitArgs {
    /// Directory to write the table into (default: current directory)
    #[arg(value_name = "DIR")]
    dir: Option<PathBuf>,

    /// Overwrite an existing table
    #[arg(long)]
    force: bool,
}

#[derive(Parser)]
struct CheckArgs {
    /// Path to the option table
    #[arg(short, long, default_value = DEFAULT_TABLE_NAME, value_name = "FILE")]
    table: PathBuf,
}

#[derive(Parser)]
struct ScanArgs {
    /// Path to the option table
    #[arg(short, long, default_value = DEFAULT_TABLE_NAME, value_name = "FILE")]
    table: PathBuf,

    /// Only output a JSON report
    #[arg(long)]
    json: bool,

    /// Exit with status 2 if any unknown or missing-value event occurs
    #[arg(long)]
    strict: bool,

    /// Program name placed at argv[0]
    #[arg(long, default_value = "argscan", value_name = "NAME")]
    program: String,

    /// Arguments to scan (after `--`)
    #[arg(last = true, value_name = "ARGS")]
    args: Vec<String>,
}

fn main() -> Result<ExitCode> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Init(args) => init(args),
        Commands::Check(args) => check(args),
        Commands::Scan(args) => scan(args),
    }
}

fn init(args: InitArgs) -> Result<ExitCode> {
    let dir = args.dir.unwrap_or_else(|| PathBuf::from("."));

    fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create directory: {}", dir.display()))?;

    let table_path = dir.join(DEFAULT_TABLE_NAME);
    if table_path.exists() && !args.force {
        bail!(
            "{DEFAULT_TABLE_NAME} already exists in {} (use --force to overwrite)",
            dir.display()
        );
    }

    let json = serde_json::to_string_pretty(&TableFile::sample())?;
    fs::write(&table_path, &json)
        .with_context(|| format!("failed to write {}", table_path.display()))?;

    eprintln!("Created: {}", table_path.display());
    eprintln!("\nTry:");
    eprintln!("  argscan scan -- -a --cccc=value -g -f free");

    Ok(ExitCode::SUCCESS)
}

fn check(args: CheckArgs) -> Result<ExitCode> {
    tracing::debug!("executing check command");

    let file = TableFile::from_file(&args.table)?;
    let cells = FlagCells::new(&file.flags);
    let table = file.descriptors(&cells)?;
    argscan::validate_table(&table)
        .with_context(|| format!("invalid option table: {}", args.table.display()))?;

    println!(
        "OK: {} option(s), {} flag cell(s) in {}",
        table.len(),
        file.flags.len(),
        args.table.display()
    );
    Ok(ExitCode::SUCCESS)
}

fn scan(args: ScanArgs) -> Result<ExitCode> {
    tracing::debug!("executing scan command");

    let file = TableFile::from_file(&args.table)?;
    let cells = FlagCells::new(&file.flags);
    let table = file.descriptors(&cells)?;

    let argv: Vec<&str> = std::iter::once(args.program.as_str())
        .chain(args.args.iter().map(String::as_str))
        .collect();
    let session = Session::new(&argv, &table)
        .with_context(|| format!("invalid option table: {}", args.table.display()))?;

    let events: Vec<EventRecord> = session
        .filter_map(|event| EventRecord::from_event(&event))
        .collect();
    let errors = events.iter().filter(|e| e.is_error()).count();
    tracing::debug!(events = events.len(), errors, "scan finished");

    let report = ScanReport {
        table: display_path(&args.table),
        arguments: args.args.clone(),
        events,
        flags: cells.snapshot(),
        errors,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for event in &report.events {
            println!("{}", event.line());
        }
        for (name, value) in &report.flags {
            println!("flag          {name} = {value}");
        }
        if report.errors > 0 {
            eprintln!("{} error event(s)", report.errors);
        }
    }

    if args.strict && report.errors > 0 {
        return Ok(ExitCode::from(2));
    }
    Ok(ExitCode::SUCCESS)
}

fn display_path(path: &Path) -> String {
    path.display().to_string()
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
