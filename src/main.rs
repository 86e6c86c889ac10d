// src/main.rs
mod utils;
mod filing;
mod extractors;
mod storage;

use clap::Parser;
use extractors::{GenderGuesser, NameGenderTable, OrganizationRecord, RecordAssembler};
use filing::{FilingDocument, FilingPeriod};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::{Path, PathBuf};
use storage::{RecordSink, StorageManager};
use utils::AppError;

/// Command Line Interface for the IRS 990 organization extractor
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory of extracted IRS 990 XML files (e.g. 2024_TEOS_XML_01A)
    #[arg(short, long)]
    input_dir: PathBuf,

    /// CSV of first names and female probabilities (columns: Name,female_prob)
    #[arg(short, long, env = "IRS990_NAMES_CSV")]
    names_csv: PathBuf,

    /// Filing year (defaults to the year in the input directory name)
    #[arg(long)]
    year: Option<u32>,

    /// Filing period code (defaults to the code in the input directory name)
    #[arg(long)]
    period: Option<String>,

    /// Output directory for extracted records
    #[arg(short, long, default_value = "./output")]
    output_dir: PathBuf,

    /// Seed for the gender inference random source, for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Debug mode - write a report of failed filings
    #[arg(short, long)]
    debug: bool,
}

/// Works out the filing period from the CLI, falling back to the input directory name.
fn resolve_period(args: &Args) -> Result<FilingPeriod, AppError> {
    let dir_name = args
        .input_dir
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    let from_dir = FilingPeriod::from_archive_name(dir_name);

    let year = args
        .year
        .or_else(|| from_dir.as_ref().map(|p| p.year))
        .ok_or_else(|| AppError::Config(format!("Cannot infer filing year from '{}'; pass --year", dir_name)))?;
    let code = args
        .period
        .clone()
        .or_else(|| from_dir.map(|p| p.code))
        .ok_or_else(|| AppError::Config(format!("Cannot infer period code from '{}'; pass --period", dir_name)))?;

    let period = FilingPeriod::new(year, code);
    period.validate_year().map_err(AppError::Config)?;
    Ok(period)
}

/// Lists the XML filings in `dir`, sorted by file name.
fn list_filings(dir: &Path) -> Result<Vec<PathBuf>, AppError> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("xml"))
        })
        .collect();
    files.sort();
    Ok(files)
}

/// Reads, parses and assembles a single filing.
fn process_filing(
    path: &Path,
    assembler: &RecordAssembler,
    period: &FilingPeriod,
    rng: &mut StdRng,
) -> Result<OrganizationRecord, AppError> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let xml = std::fs::read_to_string(path)?;
    let doc = FilingDocument::parse(file_name, &xml)?;
    Ok(assembler.assemble(&doc, period, rng)?)
}

/// Processes every filing, skipping the ones that fail. Returns the assembled
/// records and one `"<file>: <error>"` line per skipped filing.
fn process_batch(
    filings: &[PathBuf],
    assembler: &RecordAssembler,
    period: &FilingPeriod,
    rng: &mut StdRng,
) -> (Vec<OrganizationRecord>, Vec<String>) {
    let mut records = Vec::with_capacity(filings.len());
    let mut failures: Vec<String> = Vec::new();

    for path in filings {
        tracing::debug!("Processing file {}", path.display());
        match process_filing(path, assembler, period, rng) {
            Ok(record) => records.push(record),
            Err(AppError::Extraction(e)) => {
                tracing::error!("Skipping filing {}: {}", e.file(), e);
                failures.push(format!("{}: {}", e.file(), e));
            }
            Err(e) => {
                tracing::error!("Skipping {}: {}", path.display(), e);
                failures.push(format!("{}: {}", path.display(), e));
            }
        }
    }

    (records, failures)
}

fn main() -> Result<(), AppError> {
    // 1. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging();

    // 2. Parse CLI Arguments
    let args = Args::parse();
    tracing::info!("Starting processing for args: {:?}", args);

    let period = resolve_period(&args)?;
    tracing::info!("Filing period: {} {}", period.year, period.code);

    // 3. Load the name table once for the whole run
    let table = NameGenderTable::from_csv_path(&args.names_csv)?;
    if table.is_empty() {
        tracing::warn!("Name table {} is empty; every name will be a coin flip", args.names_csv.display());
    }
    let assembler = RecordAssembler::new(GenderGuesser::new(table));

    let mut rng = match args.seed {
        Some(seed) => {
            tracing::debug!("Seeding gender inference with {}", seed);
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };

    // 4. Initialize storage
    let mut storage = StorageManager::new(&args.output_dir, period.clone())?;

    // 5. Process each filing
    let filings = list_filings(&args.input_dir)?;
    tracing::info!("Found {} XML filings in {}", filings.len(), args.input_dir.display());

    if filings.is_empty() {
        return Err(AppError::Config(format!("No XML filings found in {}", args.input_dir.display())));
    }

    let (records, failures) = process_batch(&filings, &assembler, &period, &mut rng);

    // 6. Hand the batch to the sink
    if !records.is_empty() {
        storage.write_batch(&records)?;
    }

    if args.debug && !failures.is_empty() {
        let report_path = storage.target_dir().join("extraction_failures.txt");
        std::fs::create_dir_all(storage.target_dir())?;
        if let Err(e) = std::fs::write(&report_path, failures.join("\n") + "\n") {
            tracing::error!("Failed to save failure report: {}", e);
        } else {
            tracing::info!("Saved failure report to {}", report_path.display());
        }
    }

    tracing::info!("Processing finished. Success: {}, Failures: {}", records.len(), failures.len());

    if records.is_empty() {
        return Err(AppError::Processing(format!("Failed to extract any records from {} filings", failures.len())));
    }

    Ok(())
}
