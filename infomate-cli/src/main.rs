//! # InfoMate CLI
//!
//! Command-line access to the analysis history, evaluation and report stores.
//!
//! Run with: `infomate --data-dir ./data list --sort score --order desc`

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use serde_json::json;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use infomate_core::config::{LogFormat, LoggingConfig};
use infomate_core::url::{extract_domain, is_news_site, normalize_url, parse_url, validate_url};
use infomate_core::{
    AnalysisData, AnalysisSubmission, Config, EvaluationSubmission, Payload, RecordId,
    ReportSubmission, SearchField,
};
use infomate_storage::{FileBlobStore, InfomateStores, RecordStore};

#[derive(Parser)]
#[command(name = "infomate")]
#[command(version, about = "InfoMate - news credibility history, evaluations and reports")]
struct Cli {
    /// JSON configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Overrides storage.data_dir from the configuration
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Log at debug level regardless of configuration
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum StoreKind {
    History,
    Evaluations,
    Reports,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Store(StoreCommand),
    /// Parse and classify a URL without touching any store
    CheckUrl { url: String },
}

/// Commands that open the record stores
#[derive(Subcommand)]
enum StoreCommand {
    /// Record an analysis result for a URL
    Record {
        url: String,
        #[arg(long)]
        score: Option<f64>,
        #[arg(long)]
        fake: bool,
        #[arg(long)]
        publisher: Option<String>,
    },
    /// Rate an article from 1 to 5
    Evaluate {
        url: String,
        #[arg(long)]
        rating: u8,
        #[arg(long)]
        feedback: Option<String>,
    },
    /// Report a problem with an article
    Report {
        url: String,
        #[arg(long)]
        reason: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Show the record stored for a URL
    Get {
        url: String,
        #[arg(long, value_enum, default_value = "history")]
        store: StoreKind,
    },
    /// List records in sorted order
    List {
        #[arg(long, value_enum, default_value = "history")]
        store: StoreKind,
        /// date, score or count
        #[arg(long, default_value = "date")]
        sort: String,
        /// asc or desc
        #[arg(long, default_value = "desc")]
        order: String,
    },
    /// Case-insensitive search over URLs and metadata
    Search {
        query: String,
        /// url, publisher or all
        #[arg(long = "in", default_value = "all")]
        field: String,
        #[arg(long, value_enum, default_value = "history")]
        store: StoreKind,
    },
    /// Analysis history statistics
    Stats,
    /// Delete a record by id
    Delete {
        id: u64,
        #[arg(long, value_enum, default_value = "history")]
        store: StoreKind,
    },
    /// Remove every record from a store
    Clear {
        #[arg(long, value_enum, default_value = "history")]
        store: StoreKind,
    },
}

fn init_logging(config: &LoggingConfig, verbose: bool) {
    let level = if verbose { "debug" } else { config.level.as_str() };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match config.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Normalize a user-supplied URL and reject malformed ones
fn checked_url(input: &str) -> Result<String> {
    let url = normalize_url(input);
    if !validate_url(&url) {
        bail!("invalid URL: {}", input);
    }
    Ok(url)
}

fn get<P: Payload>(store: &RecordStore<P>, url: &str) -> Result<()> {
    match store.get_by_key(&normalize_url(url)) {
        Some(record) => print_json(record),
        None => bail!("no record for {}", url),
    }
}

fn list<P: Payload>(store: &RecordStore<P>, sort: &str, order: &str) -> Result<()> {
    print_json(&store.sorted_by_name(sort, order))
}

fn search<P: Payload>(store: &RecordStore<P>, query: &str, field: &str) -> Result<()> {
    print_json(&store.search(query, SearchField::parse_lenient(field)))
}

fn delete<P: Payload>(store: &mut RecordStore<P>, id: u64) -> Result<()> {
    if !store.delete(RecordId(id)) {
        bail!("no record with id {} in {}", id, store.storage_key());
    }
    info!("Deleted record {}", id);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(dir) = cli.data_dir {
        config.storage.data_dir = dir;
    }

    init_logging(&config.logging, cli.verbose);
    debug!("Using data directory {:?}", config.storage.data_dir);

    match cli.command {
        Commands::CheckUrl { url } => check_url(&url),
        Commands::Store(command) => {
            let blob = Arc::new(FileBlobStore::open(&config.storage.data_dir)?);
            let mut stores = InfomateStores::open(&config, blob);
            run(command, &mut stores)
        }
    }
}

fn check_url(url: &str) -> Result<()> {
    let normalized = normalize_url(url);
    print_json(&json!({
        "url": normalized,
        "valid": validate_url(&normalized),
        "domain": extract_domain(&normalized),
        "newsSite": is_news_site(&normalized),
        "parts": parse_url(&normalized),
    }))
}

fn run(command: StoreCommand, stores: &mut InfomateStores) -> Result<()> {
    match command {
        StoreCommand::Record { url, score, fake, publisher } => {
            let mut data = AnalysisData {
                reliability_score: score,
                is_fake: Some(fake),
                ..Default::default()
            };
            if let Some(publisher) = publisher {
                data = data.with_publisher(publisher);
            }
            let submission = AnalysisSubmission { url: checked_url(&url)?, data };
            print_json(&stores.history.record_analysis(submission))?;
        }
        StoreCommand::Evaluate { url, rating, feedback } => {
            let submission = EvaluationSubmission { url: checked_url(&url)?, rating, feedback };
            print_json(&stores.evaluations.submit_evaluation(submission)?)?;
        }
        StoreCommand::Report { url, reason, description } => {
            let submission = ReportSubmission { url: checked_url(&url)?, reason, description };
            print_json(&stores.reports.submit_report(submission)?)?;
        }
        StoreCommand::Get { url, store } => match store {
            StoreKind::History => get(&stores.history, &url)?,
            StoreKind::Evaluations => get(&stores.evaluations, &url)?,
            StoreKind::Reports => get(&stores.reports, &url)?,
        },
        StoreCommand::List { store, sort, order } => match store {
            StoreKind::History => list(&stores.history, &sort, &order)?,
            StoreKind::Evaluations => list(&stores.evaluations, &sort, &order)?,
            StoreKind::Reports => list(&stores.reports, &sort, &order)?,
        },
        StoreCommand::Search { query, field, store } => match store {
            StoreKind::History => search(&stores.history, &query, &field)?,
            StoreKind::Evaluations => search(&stores.evaluations, &query, &field)?,
            StoreKind::Reports => search(&stores.reports, &query, &field)?,
        },
        StoreCommand::Stats => print_json(&stores.history.statistics())?,
        StoreCommand::Delete { id, store } => match store {
            StoreKind::History => delete(&mut stores.history, id)?,
            StoreKind::Evaluations => delete(&mut stores.evaluations, id)?,
            StoreKind::Reports => delete(&mut stores.reports, id)?,
        },
        StoreCommand::Clear { store } => match store {
            StoreKind::History => stores.history.clear(),
            StoreKind::Evaluations => stores.evaluations.clear(),
            StoreKind::Reports => stores.reports.clear(),
        },
    }

    Ok(())
}
