use std::path::{Path, PathBuf};
use std::process::ExitCode;

use camera::CameraCommandKind;
use clap::{Parser, Subcommand};
use serde::Serialize;
use session::{RetrievalConfig, load_highlight, load_layout_spec};
use tools::{SimulateOptions, SimulationTrace, ToolError, plan_report, simulate, trace_digest};
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Inspect and replay box-retrieval walks")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the standing position, category and walking route as JSON
    Plan {
        /// Layout JSON: { bays: [{ bay, shelfLabels }], rows: [{ row, label }] }
        #[arg(long)]
        layout: PathBuf,

        /// Highlight JSON: { bay, shelf, row, label, metadata? } or null
        #[arg(long)]
        highlight: PathBuf,

        /// Optional config JSON (partial files keep defaults)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Run the retrieval headless at a fixed step and print the trace
    Simulate {
        #[arg(long)]
        layout: PathBuf,

        #[arg(long)]
        highlight: PathBuf,

        #[arg(long)]
        config: Option<PathBuf>,

        /// Frames per second
        #[arg(long, default_value_t = 60)]
        fps: u32,

        /// Simulated duration in seconds (capped at MAX_SIMULATED_FRAMES frames)
        #[arg(long, default_value_t = 20.0)]
        seconds: f64,

        /// Camera command issued with the highlight (front, top, side, focus, reset)
        #[arg(long)]
        camera: Option<CameraCommandKind>,
    },
}

#[derive(Serialize)]
struct SimulationOutput<'a> {
    trace: &'a SimulationTrace,
    digest: &'a str,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "retrieval failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), ToolError> {
    match args.command {
        Command::Plan {
            layout,
            highlight,
            config,
        } => {
            let config = load_config(config.as_deref())?;
            let spec = load_layout_spec(&layout)?;
            let highlight = load_highlight(&highlight)?;
            let report = plan_report(&config, &spec, highlight)?;
            print_json(&report)
        }
        Command::Simulate {
            layout,
            highlight,
            config,
            fps,
            seconds,
            camera,
        } => {
            let config = load_config(config.as_deref())?;
            let spec = load_layout_spec(&layout)?;
            let highlight = load_highlight(&highlight)?;
            let options = SimulateOptions {
                fps,
                seconds,
                camera,
            };
            let trace = simulate(&config, &spec, highlight, options)?;
            let digest = trace_digest(&trace)?;
            eprintln!("trace blake3={digest}");
            print_json(&SimulationOutput {
                trace: &trace,
                digest: &digest,
            })
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<RetrievalConfig, ToolError> {
    match path {
        Some(path) => Ok(RetrievalConfig::load(path)?),
        None => Ok(RetrievalConfig::default()),
    }
}

fn print_json(value: &impl Serialize) -> Result<(), ToolError> {
    let payload = serde_json::to_string_pretty(value).map_err(ToolError::Json)?;
    println!("{payload}");
    Ok(())
}
