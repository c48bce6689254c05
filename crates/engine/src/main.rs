use std::path::{Path, PathBuf};
use std::sync::Arc;

use hypecycle_engine::batch::{analyze_batch, AnalysisJob};
use hypecycle_engine::{config, input};

const USAGE: &str = "usage: hypecycle [LABEL=]RECORDS.json|RECORDS.jsonl ...";

#[tokio::main]
async fn main() {
    // Logs go to stderr; stdout carries only the JSON report.
    tracing_subscriber::fmt()
        .json()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        eprintln!("{}", USAGE);
        std::process::exit(2);
    }

    // Load configuration: refuse to analyze anything on misconfiguration.
    let config_dir = std::env::var("HYPECYCLE_CONFIG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config"));

    let engine_config = match config::load_config(&config_dir) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Failed to load configuration, refusing to start");
            std::process::exit(1);
        }
    };

    let mut jobs = Vec::with_capacity(args.len());
    for arg in &args {
        let (label, path) = parse_job_arg(arg);
        match input::load_records(&path) {
            Ok(records) => jobs.push(AnalysisJob::new(label, records)),
            Err(e) => {
                tracing::error!(error = %e, "Failed to load records");
                std::process::exit(1);
            }
        }
    }

    let pool_size = engine_config.system.concurrency.worker_pool_size;
    let analysis_config = Arc::new(engine_config.system.analysis);
    let outcomes = analyze_batch(jobs, analysis_config, pool_size).await;

    let reports: Vec<_> = outcomes.iter().map(|o| o.report()).collect();
    match serde_json::to_string_pretty(&reports) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize results");
            std::process::exit(1);
        }
    }
}

/// `label=path` or a bare path, labelled by its file stem.
fn parse_job_arg(arg: &str) -> (String, PathBuf) {
    if let Some((label, path)) = arg.split_once('=') {
        if !label.is_empty() && !path.is_empty() {
            return (label.to_string(), PathBuf::from(path));
        }
    }

    let path = PathBuf::from(arg);
    let label = Path::new(arg)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(arg)
        .to_string();
    (label, path)
}
