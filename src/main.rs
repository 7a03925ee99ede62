use std::fs;
use std::path::PathBuf;

use chrono::Utc;
use clap::{Parser, Subcommand};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use beagle::config;
use beagle::models::{RenderMode, RunRecord};
use beagle::pipeline::{
    aggregate, AnthropicClient, DocumentProcessor, ExtractionError, PdfTextExtractor,
    SignalExtractor, SourceDocument,
};
use beagle::report::render;
use beagle::store::{ReportStore, StoreError};

/// Maximum length of the address prefix used in report filenames.
const ADDRESS_FILENAME_MAX: usize = 50;

#[derive(Parser)]
#[command(name = "beagle", version, about = "Property search report generator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Process search PDFs and write internal and client reports
    Generate {
        /// Property address the reports are for
        #[arg(long)]
        address: String,

        /// Search report PDFs (local authority, environmental, drainage & water)
        #[arg(required = true, num_args = 1..=3)]
        pdfs: Vec<PathBuf>,

        /// Directory the rendered reports are written under
        #[arg(long)]
        out: Option<PathBuf>,

        /// Path of the run history database
        #[arg(long)]
        db: Option<PathBuf>,
    },
    /// List recent runs, newest first
    History {
        /// Path of the run history database
        #[arg(long)]
        db: Option<PathBuf>,

        #[arg(long, default_value_t = 50)]
        limit: usize,
    },
}

#[derive(Error, Debug)]
enum RunError {
    #[error("no document produced any signals; nothing to report")]
    AllDocumentsFailed,

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Generate {
            address,
            pdfs,
            out,
            db,
        } => generate(&address, &pdfs, out, db),
        Command::History { db, limit } => history(db, limit),
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "run failed");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn generate(
    address: &str,
    pdfs: &[PathBuf],
    out: Option<PathBuf>,
    db: Option<PathBuf>,
) -> Result<(), RunError> {
    tracing::info!("{} v{} starting", config::APP_NAME, config::APP_VERSION);

    let mut documents = Vec::with_capacity(pdfs.len());
    for path in pdfs {
        let bytes = fs::read(path)?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        documents.push(SourceDocument { filename, bytes });
    }

    let llm = AnthropicClient::from_env()?;
    let processor = DocumentProcessor::new(
        Box::new(PdfTextExtractor),
        SignalExtractor::new(Box::new(llm)),
    );

    let outcome = processor.process(&documents);
    for failure in &outcome.failures {
        eprintln!("skipped {}: {}", failure.filename, failure.error);
    }
    if outcome.all_failed() {
        return Err(RunError::AllDocumentsFailed);
    }

    let generated_at = Utc::now();
    let report = aggregate(address, generated_at, &outcome.results);

    let internal_html = render(&report, RenderMode::Internal);
    let client_html = render(&report, RenderMode::Client);

    let run_dir = out
        .unwrap_or_else(config::reports_dir)
        .join(generated_at.format("%Y%m%d_%H%M%S").to_string());
    fs::create_dir_all(&run_dir)?;

    let safe = safe_address(address);
    let internal_path = run_dir.join(format!("{safe}_INTERNAL.html"));
    let client_path = run_dir.join(format!("{safe}_CLIENT.html"));
    fs::write(&internal_path, &internal_html)?;
    fs::write(&client_path, &client_html)?;

    let totals = report.totals();
    let store = ReportStore::open(&db.unwrap_or_else(config::database_path))?;
    store.insert_run(&RunRecord {
        id: None,
        property_address: address.to_string(),
        created_at: generated_at,
        internal_report_path: internal_path.display().to_string(),
        client_report_path: client_path.display().to_string(),
        signal_count: totals.total(),
        red_count: totals.red,
        amber_count: totals.amber,
        green_count: totals.green,
    })?;

    println!("Internal report: {}", internal_path.display());
    println!("Client report:   {}", client_path.display());
    println!(
        "Signals: {} red, {} amber, {} green",
        totals.red, totals.amber, totals.green
    );
    Ok(())
}

fn history(db: Option<PathBuf>, limit: usize) -> Result<(), RunError> {
    let store = ReportStore::open(&db.unwrap_or_else(config::database_path))?;
    let runs = store.recent(limit)?;

    if runs.is_empty() {
        println!("No runs recorded.");
        return Ok(());
    }
    for run in runs {
        println!(
            "{}  {}  ({} red / {} amber / {} green)",
            run.created_at.format("%Y-%m-%d %H:%M"),
            run.property_address,
            run.red_count,
            run.amber_count,
            run.green_count,
        );
    }
    Ok(())
}

/// Make an address safe for use as a filename prefix.
fn safe_address(address: &str) -> String {
    address
        .replace(['/', '\\'], "-")
        .chars()
        .take(ADDRESS_FILENAME_MAX)
        .collect()
}
