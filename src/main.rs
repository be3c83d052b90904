//! Cyber Attack Predictor - CLI Entry Point
//!
//! - `attack-predictor predict <input.csv>` -- label every row with an attack type
//! - `attack-predictor features <input.csv>` -- write the encoded feature matrix only
//! - `attack-predictor schema` -- print the feature layout the model expects

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use attack_predictor::config::Config;
use attack_predictor::constants::{self, PREDICTION_COLUMN};
use attack_predictor::logic::dataset::{read_table_from_path, write_features_to_path, write_table_to_path};
use attack_predictor::logic::features::LayoutInfo;
use attack_predictor::{build_features, predict_batch, FeatureSchema, OnnxClassifier, PredictionReport, Table};

/// Cyber attack prediction from raw network traffic exports.
#[derive(Parser)]
#[command(name = "attack-predictor", about = "Cyber attack prediction from raw network traffic", version)]
struct Cli {
    /// Enable verbose (debug-level) logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify every row of a raw CSV file.
    Predict {
        /// Raw network data CSV.
        input: PathBuf,

        /// ONNX model (defaults to ATTACK_MODEL_PATH).
        #[arg(short, long)]
        model: Option<PathBuf>,

        /// Labeled output CSV (defaults to ATTACK_OUTPUT_PATH).
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Rows shown in the terminal preview.
        #[arg(long)]
        preview: Option<usize>,
    },

    /// Write the encoded feature matrix without classifying.
    Features {
        /// Raw network data CSV.
        input: PathBuf,

        /// Feature matrix output CSV.
        #[arg(short, long, default_value = constants::DEFAULT_FEATURES_OUTPUT_PATH)]
        output: PathBuf,
    },

    /// Print the feature layout as JSON.
    Schema,
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    log::debug!("Starting {} v{}", constants::APP_NAME, constants::APP_VERSION);

    if let Err(e) = run(cli.command) {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run(command: Commands) -> anyhow::Result<()> {
    let schema = FeatureSchema::current();

    match command {
        Commands::Predict { input, model, output, preview } => {
            let config = Config::from_env().with_overrides(model, output);
            let preview_rows = preview.unwrap_or(config.preview_rows);

            let raw = read_table_from_path(&input)
                .with_context(|| format!("Failed to read {}", input.display()))?;
            log::info!("Loaded {} rows from {}", raw.len(), input.display());

            let classifier = OnnxClassifier::load(&config.model_path)?;
            classifier.validate_schema(schema)?;

            let report = predict_batch(&raw, schema, &classifier)
                .context("Error during preprocessing or prediction")?;

            let labeled = report.to_table()?;
            write_table_to_path(&config.output_path, &labeled)
                .with_context(|| format!("Failed to write {}", config.output_path.display()))?;

            print_preview(&labeled, preview_rows);
            print_summary(&report);

            let status = classifier.status();
            log::info!(
                "{} inference call(s), avg latency {:.2}ms",
                status.inference_count,
                status.avg_latency_ms
            );
        }
        Commands::Features { input, output } => {
            let raw = read_table_from_path(&input)
                .with_context(|| format!("Failed to read {}", input.display()))?;

            let matrix = build_features(&raw, schema)
                .context("Error during preprocessing")?;
            write_features_to_path(&output, &matrix)
                .with_context(|| format!("Failed to write {}", output.display()))?;
        }
        Commands::Schema => {
            println!("{}", serde_json::to_string_pretty(&LayoutInfo::current())?);
        }
    }

    Ok(())
}

fn print_preview(table: &Table, rows: usize) {
    if rows == 0 || table.is_empty() {
        return;
    }

    println!("{:<22} {}", "Timestamp", PREDICTION_COLUMN);
    for row in 0..rows.min(table.len()) {
        println!(
            "{:<22} {}",
            table.get(row, "Timestamp").unwrap_or("-"),
            table.get(row, PREDICTION_COLUMN).unwrap_or("-"),
        );
    }
    if table.len() > rows {
        println!("... {} more rows", table.len() - rows);
    }
}

fn print_summary(report: &PredictionReport) {
    println!();
    for (attack, count) in report.counts() {
        println!("{:<10} {}", attack.as_str(), count);
    }
    println!("{:<10} {}", "Total", report.len());
}
