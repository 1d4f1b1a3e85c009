//! `sosens` CLI: tréning a lokálna inferencia nad uloženými artefaktmi.

use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;
use sosens::serving::parse_request;
use sosens::{
    logging, ArtifactStore, PredictionError, PredictionRequest, PredictionService, SosensConfig, SosensError,
    TrainerBuilder,
};
use tracing::{error, Level};

#[derive(Parser, Debug)]
#[command(name = "sosens", version, about = "Crop recommendation: training pipeline and prediction service")]
struct Args {
    #[arg(short, long, global = true, help = "JSON config file (overrides SOSENS_CONFIG)")]
    config: Option<PathBuf>,

    #[arg(long, global = true, help = "Models directory (overrides config)")]
    models_dir: Option<PathBuf>,

    #[arg(
        short,
        long,
        action = clap::ArgAction::Count,
        global = true,
        help = "Verbosity (-v debug, -vv trace); RUST_LOG wins when set"
    )]
    verbose: u8,

    #[arg(long, global = true, help = "Log as JSON lines on stderr")]
    json_logs: bool,

    #[arg(long, global = true, help = "Pretty-print JSON output")]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[command(about = "Train the classifier and write artifacts + reports")]
    Train {
        #[arg(short, long, help = "Dataset path (CSV or JSON)")]
        data: Option<PathBuf>,

        #[arg(long)]
        target: Option<String>,

        #[arg(long)]
        outputs_dir: Option<PathBuf>,

        #[arg(long)]
        seed: Option<u64>,

        #[arg(long)]
        trees: Option<usize>,
    },
    #[command(about = "Show which artifacts are loaded")]
    Status,
    #[command(about = "Print the active feature schema")]
    Features,
    #[command(about = "Predict a crop from a JSON object (file or stdin)")]
    Predict {
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: String,
    status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    feature: Option<&'a str>,
}

fn level(verbose: u8) -> Level {
    match verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<(), SosensError> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", text);
    Ok(())
}

fn read_request(input: Option<&PathBuf>) -> Result<PredictionRequest, PredictionError> {
    let text = match input {
        Some(path) => std::fs::read_to_string(path),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf).map(|_| buf)
        }
    }
    .map_err(|e| PredictionError::InvalidPayload(format!("cannot read payload: {}", e)))?;
    parse_request(&text)
}

fn run(args: Args) -> Result<ExitCode, SosensError> {
    let mut config = SosensConfig::resolve(args.config.as_deref())?;
    if let Some(dir) = &args.models_dir {
        config.models_dir = dir.clone();
    }

    match args.command {
        Command::Train { data, target, outputs_dir, seed, trees } => {
            let mut builder = TrainerBuilder::from_config(config);
            if let Some(path) = data {
                builder = builder.dataset(path);
            }
            if let Some(column) = target {
                builder = builder.target_column(&column);
            }
            if let Some(dir) = outputs_dir {
                builder = builder.outputs_dir(dir);
            }
            if let Some(seed) = seed {
                builder = builder.seed(seed);
            }
            if let Some(trees) = trees {
                builder = builder.n_trees(trees);
            }
            let outcome = builder.build()?.run()?;
            print_json(&outcome.manifest, args.pretty)?;
            println!("{}", outcome.report.to_text());
            Ok(ExitCode::SUCCESS)
        }
        Command::Status => {
            let service = PredictionService::from_store(&ArtifactStore::new(&config.models_dir));
            print_json(service.status(), args.pretty)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Features => {
            let service = PredictionService::from_store(&ArtifactStore::new(&config.models_dir));
            print_json(&service.feature_schema(), args.pretty)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Predict { input } => {
            // Stav služby sa overí skôr než payload: bez artefaktov je odpoveď vždy 503
            let service = PredictionService::from_store(&ArtifactStore::new(&config.models_dir));
            let result = service
                .ensure_ready()
                .and_then(|_| read_request(input.as_ref()))
                .and_then(|request| service.predict(&request));
            match result {
                Ok(response) => {
                    print_json(&response, args.pretty)?;
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => {
                    let body = ErrorBody { error: e.to_string(), status: e.status_code(), feature: e.feature() };
                    print_json(&body, args.pretty)?;
                    Ok(exit_code(&e))
                }
            }
        }
    }
}

fn exit_code(err: &PredictionError) -> ExitCode {
    if err.is_client_error() {
        ExitCode::from(2)
    } else {
        ExitCode::from(3)
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    logging::init(level(args.verbose), args.json_logs);

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            error!(error = %e, "command failed");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
