use std::collections::BTreeSet;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use gradesheet::io::excel_read;
use gradesheet::model::{Category, ExportFlags, Session, SheetLayout};
use gradesheet::roster::RosterOptions;
use gradesheet::{ProcessError, Result, classify, engine, roster};
use serde::Serialize;
use tracing::info;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = run(cli) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    init_tracing()?;
    match cli.command {
        Command::Process(args) => execute_process(args),
        Command::Inspect(args) => execute_inspect(args),
    }
}

fn init_tracing() -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|error| ProcessError::Logging(error.to_string()))
}

fn execute_process(args: ProcessArgs) -> Result<()> {
    let results_bytes = read_input(&args.results)?;
    let roster_bytes = read_input(&args.roster)?;

    let results = excel_read::read_table(&results_bytes)?;
    let roster = roster::parse(
        &roster_bytes,
        RosterOptions {
            skip_rows: args.skip_rows,
        },
    )?;
    info!(
        students = roster.len(),
        rows = results.rows.len(),
        "inputs loaded"
    );

    let selected_groups: BTreeSet<String> = if args.groups.is_empty() {
        roster.groups().into_iter().collect()
    } else {
        args.groups.iter().cloned().collect()
    };

    let session = Session {
        results: Some(results),
        roster: Some(roster),
        selected_groups,
        exports: resolve_exports(&args.categories),
        layout: if args.flat {
            SheetLayout::Flat
        } else {
            SheetLayout::PerGroup
        },
    };

    let outcome = engine::process(&session)?;

    std::fs::create_dir_all(&args.out_dir)?;
    let mut written = Vec::with_capacity(outcome.files.len());
    for file in &outcome.files {
        let path = args.out_dir.join(&file.filename);
        std::fs::write(&path, &file.bytes)?;
        written.push(path.display().to_string());
    }

    if args.json {
        let summary = ProcessSummary {
            matched: outcome.matched_count,
            unmatched: outcome.unmatched_count,
            files: written,
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("matched students: {}", outcome.matched_count);
    println!("unmatched students: {}", outcome.unmatched_count);
    if written.is_empty() {
        println!("no report documents produced; check the group selection and the results headers");
    }
    for path in &written {
        println!("wrote {path}");
    }

    Ok(())
}

fn execute_inspect(args: InspectArgs) -> Result<()> {
    if args.results.is_none() && args.roster.is_none() {
        return Err(ProcessError::MissingInput(
            "nothing to inspect: pass --results and/or --roster",
        ));
    }

    if let Some(path) = &args.results {
        let bytes = read_input(path)?;
        let table = excel_read::read_table(&bytes)?;
        let catalog = classify::classify(&table.headers);
        println!(
            "results: {} rows, {} columns",
            table.rows.len(),
            table.headers.len()
        );
        println!("  lecture tests: {}", catalog.lectures.len());
        println!("  lab tests: {}", catalog.labs.len());
        println!("  final tests: {}", catalog.finals.len());
    }

    if let Some(path) = &args.roster {
        let bytes = read_input(path)?;
        let roster = roster::parse(
            &bytes,
            RosterOptions {
                skip_rows: args.skip_rows,
            },
        )?;
        println!("roster: {} students", roster.len());
        println!("  groups: {}", roster.groups().join(", "));
    }

    Ok(())
}

fn read_input(path: &PathBuf) -> Result<Vec<u8>> {
    if !path.exists() {
        return Err(ProcessError::MissingFile(path.clone()));
    }
    Ok(std::fs::read(path)?)
}

fn resolve_exports(categories: &[CategoryArg]) -> ExportFlags {
    if categories.is_empty() {
        return ExportFlags::default();
    }

    let mut exports = ExportFlags::none();
    for category in categories {
        exports.enable(Category::from(*category));
    }
    exports
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Reconcile a course roster with test results and emit grade reports."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Reconcile the two workbooks and write per-category report files.
    Process(ProcessArgs),
    /// Describe the input workbooks without writing any reports.
    Inspect(InspectArgs),
}

#[derive(clap::Args)]
struct ProcessArgs {
    /// Workbook holding the test results table.
    #[arg(long)]
    results: PathBuf,

    /// Workbook holding the student roster.
    #[arg(long)]
    roster: PathBuf,

    /// Groups to include in the reports; defaults to every roster group.
    #[arg(long, value_delimiter = ',')]
    groups: Vec<String>,

    /// Test categories to export; defaults to all of them.
    #[arg(long, value_enum, value_delimiter = ',')]
    categories: Vec<CategoryArg>,

    /// Put every group on one sheet instead of one sheet per group.
    #[arg(long)]
    flat: bool,

    /// Leading roster rows to skip before scanning for students.
    #[arg(long, default_value_t = 2)]
    skip_rows: usize,

    /// Directory the report files are written into.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Print the processing summary as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(clap::Args)]
struct InspectArgs {
    /// Workbook holding the test results table.
    #[arg(long)]
    results: Option<PathBuf>,

    /// Workbook holding the student roster.
    #[arg(long)]
    roster: Option<PathBuf>,

    /// Leading roster rows to skip before scanning for students.
    #[arg(long, default_value_t = 2)]
    skip_rows: usize,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum CategoryArg {
    Lecture,
    Lab,
    Final,
}

impl From<CategoryArg> for Category {
    fn from(kind: CategoryArg) -> Self {
        match kind {
            CategoryArg::Lecture => Category::Lecture,
            CategoryArg::Lab => Category::Lab,
            CategoryArg::Final => Category::Final,
        }
    }
}

#[derive(Serialize)]
struct ProcessSummary {
    matched: usize,
    unmatched: usize,
    files: Vec<String>,
}
