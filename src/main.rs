use anyhow::Context;
use casebase::dataset::{self, DatasetOptions, DEFAULT_MISSING_MARKER, DEFAULT_SEED};
use casebase::presets::{self, INCOME_DROPPED_COLUMNS, INCOME_LABEL, INCOME_SAMPLE_ROWS};
use casebase::{
    Case, CaseBase, CaseSimilarity, Classifier, DegenerateNumericPolicy, LeaveOneOut,
    SimilarityConfig, WeightTable,
};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Case-based classification of tabular records
#[derive(Parser, Debug)]
#[command(name = "casebase")]
#[command(about = "Case-based reasoning classifier for tabular records", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Log level (overridden by RUST_LOG when set)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify one query against the collection
    Classify {
        #[command(flatten)]
        data: DataArgs,

        /// JSON object of attribute values; defaults to the built-in income query
        #[arg(short, long)]
        query: Option<PathBuf>,

        /// Number of neighbors voting on the prediction
        #[arg(long, default_value_t = 1)]
        limit: usize,
    },

    /// Estimate accuracy by leave-one-out evaluation
    Evaluate {
        #[command(flatten)]
        data: DataArgs,

        /// Number of neighbors voting on each prediction
        #[arg(short, long, default_value_t = 10)]
        k: usize,

        /// Number of cases to hold out, taken in collection order
        #[arg(long, default_value_t = 500)]
        sample_size: usize,

        /// Worker threads (default: available parallelism)
        #[arg(long)]
        threads: Option<usize>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(clap::Args, Debug)]
struct DataArgs {
    /// Path to the CSV dataset
    #[arg(short, long, default_value = "./datasets/adult.csv")]
    data: PathBuf,

    /// Label column
    #[arg(long, default_value = INCOME_LABEL)]
    label: String,

    /// Comma-separated columns to drop (default: fnlwgt,education_num,capital_gain,capital_loss)
    #[arg(long, value_delimiter = ',')]
    drop_columns: Option<Vec<String>>,

    /// Rows to sample from the cleaned dataset; 0 keeps every row
    #[arg(long, default_value_t = INCOME_SAMPLE_ROWS)]
    sample_rows: usize,

    /// Seed for row sampling
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Cell content marking a missing value
    #[arg(long, default_value = DEFAULT_MISSING_MARKER)]
    missing_marker: String,

    /// Apply per-attribute weights (the built-in income weights unless --weights is given)
    #[arg(long)]
    use_weights: bool,

    /// JSON object mapping attribute names to weights; implies --use-weights
    #[arg(long)]
    weights: Option<PathBuf>,

    /// Handling of numeric columns whose maximum is not positive: equality or reject
    #[arg(long, default_value = "equality")]
    degenerate_numeric: DegenerateNumericPolicy,
}

impl DataArgs {
    fn dataset_options(&self) -> DatasetOptions {
        DatasetOptions {
            label: self.label.clone(),
            missing_marker: self.missing_marker.clone(),
            drop_columns: self
                .drop_columns
                .clone()
                .unwrap_or_else(|| INCOME_DROPPED_COLUMNS.iter().map(|c| c.to_string()).collect()),
            sample_rows: (self.sample_rows > 0).then_some(self.sample_rows),
            seed: self.seed,
        }
    }

    fn similarity_config(&self) -> anyhow::Result<SimilarityConfig> {
        let config = match &self.weights {
            Some(path) => SimilarityConfig::weighted(read_json::<WeightTable>(path)?),
            None if self.use_weights => SimilarityConfig::weighted(presets::income_weights()),
            None => SimilarityConfig::unweighted(),
        };
        Ok(config.with_degenerate_numeric(self.degenerate_numeric))
    }

    fn load_casebase(&self) -> anyhow::Result<CaseBase> {
        info!("Loading dataset: {:?}", self.data);
        let casebase = dataset::load_path(&self.data, &self.dataset_options())
            .with_context(|| format!("failed to load dataset {}", self.data.display()))?;
        info!("Cases in collection: {}", casebase.len());
        Ok(casebase)
    }

    fn build_similarity(&self, casebase: &CaseBase) -> anyhow::Result<CaseSimilarity> {
        let config = self.similarity_config()?;
        info!(
            "Building similarity function ({})",
            if config.use_weights { "weighted" } else { "unweighted" }
        );
        CaseSimilarity::from_casebase(casebase, &config).context("failed to build similarity function")
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid JSON in {}", path.display()))
}

fn init_tracing(log_level: &str) -> anyhow::Result<()> {
    if std::env::var_os("RUST_LOG").is_some() {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
        return Ok(());
    }

    let log_level = match log_level {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn classify<W: Write>(data: &DataArgs, query: Option<&Path>, limit: usize, out: &mut W) -> anyhow::Result<()> {
    let casebase = data.load_casebase()?;
    if casebase.is_empty() {
        writeln!(out, "No similar case found")?;
        return Ok(());
    }
    let similarity = data.build_similarity(&casebase)?;
    let query: Case = match query {
        Some(path) => read_json(path)?,
        None => presets::income_sample_query(),
    };

    info!("Running retrieval and reuse");
    let classifier = Classifier::new(&similarity, limit)?;
    match classifier.classify(casebase.view(), &query)? {
        Some(result) => {
            writeln!(out, "Best match: case {}", result.case_id)?;
            writeln!(out, "Predicted {}: {}", casebase.label(), result.prediction)?;
            writeln!(out, "Global similarity: {:.2}%", result.score * 100.0)?;
            writeln!(out, "Similarity by attribute:")?;
            for (name, score) in &result.breakdown {
                writeln!(out, "  {:<16} {:.4}", name, score)?;
            }
        }
        None => writeln!(out, "No similar case found")?,
    }
    Ok(())
}

fn evaluate(
    data: &DataArgs,
    k: usize,
    sample_size: usize,
    threads: Option<usize>,
    json: bool,
) -> anyhow::Result<()> {
    let casebase = data.load_casebase()?;
    let similarity = data.build_similarity(&casebase)?;

    let mut evaluator = LeaveOneOut::new(sample_size, k)?;
    if let Some(threads) = threads {
        evaluator = evaluator.with_threads(threads)?;
    }
    info!(
        "Starting leave-one-out evaluation with k={} {} ({} cases)",
        k,
        if data.use_weights || data.weights.is_some() { "with weights" } else { "without weights" },
        sample_size
    );
    let report = evaluator.evaluate(&casebase, &similarity)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Total cases tested: {}", report.tested);
        println!("Neighbors (k): {}", report.k);
        println!("Correct predictions: {}", report.correct);
        println!("Accuracy: {:.2}%", report.accuracy * 100.0);
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level)?;

    info!("Starting casebase v{}", env!("CARGO_PKG_VERSION"));

    match &args.command {
        Command::Classify { data, query, limit } => {
            classify(data, query.as_deref(), *limit, &mut std::io::stdout().lock())
        }
        Command::Evaluate {
            data,
            k,
            sample_size,
            threads,
            json,
        } => evaluate(data, *k, *sample_size, *threads, *json),
    }
}
