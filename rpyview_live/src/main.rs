//! rpyview CLI
//!
//! Live cube and path plots from a polled `rpy_data.txt` line.

use clap::Parser;
use rpyview_env::{FileSource, TokioClock};
use rpyview_live::{LiveRunner, RerunLogger, ViewMode, ViewerConfig};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

const APP_ID: &str = "rpyview";

/// Live attitude cube and lat/lon path viewer
#[derive(Parser, Debug)]
#[command(name = "rpyview")]
#[command(about = "Animate a rotating cube and a path trace from a polled data line", long_about = None)]
struct Args {
    /// Data file read every tick
    #[arg(short, long, default_value = "rpy_data.txt")]
    file: PathBuf,

    /// Views to run (cube, path, both)
    #[arg(short, long, default_value = "cube")]
    mode: ViewMode,

    /// Tick interval in milliseconds
    #[arg(short, long, default_value = "100")]
    interval_ms: u64,

    /// Number of points kept in the path trace
    #[arg(long, default_value = "7")]
    max_points: usize,

    /// Full longitude range of the path view (degrees)
    #[arg(long, default_value = "0.1")]
    lon_range: f64,

    /// Full latitude range of the path view (degrees)
    #[arg(long, default_value = "0.1")]
    lat_range: f64,

    /// Initial longitude of the path view center
    #[arg(long, allow_negative_numbers = true)]
    initial_lon: Option<f64>,

    /// Initial latitude of the path view center
    #[arg(long, allow_negative_numbers = true)]
    initial_lat: Option<f64>,

    /// Samples kept in the attitude time series
    #[arg(long, default_value = "100")]
    history: usize,

    /// Stop after this many frames (runs until Ctrl+C by default)
    #[arg(long)]
    frames: Option<u64>,

    /// Record to a Rerun .rrd file instead of spawning the viewer
    #[arg(long)]
    save: Option<PathBuf>,

    /// Run without any viewer (logs only)
    #[arg(long)]
    headless: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Print the run summary as JSON on exit
    #[arg(long)]
    json: bool,
}

impl Args {
    fn to_config(&self) -> ViewerConfig {
        ViewerConfig {
            data_path: self.file.clone(),
            mode: self.mode,
            interval: Duration::from_millis(self.interval_ms),
            max_points: self.max_points,
            lon_range: self.lon_range,
            lat_range: self.lat_range,
            initial_lon: self.initial_lon,
            initial_lat: self.initial_lat,
            history_len: self.history,
            max_frames: self.frames,
        }
    }

    fn logger(&self) -> RerunLogger {
        if self.headless {
            RerunLogger::disabled()
        } else if let Some(path) = &self.save {
            RerunLogger::save(APP_ID, path)
        } else {
            RerunLogger::spawn(APP_ID)
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();

    // Initialize logging
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }

    let config = args.to_config();
    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        std::process::exit(1);
    }

    info!("rpyview v{}", env!("CARGO_PKG_VERSION"));

    let source = FileSource::new(&config.data_path);
    let clock = TokioClock::new(config.interval);
    let mut runner = LiveRunner::new(config, source, clock, args.logger());

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    let stats = runner.run(shutdown).await;

    if args.json {
        match serde_json::to_string_pretty(stats) {
            Ok(summary) => println!("{}", summary),
            Err(e) => error!("Failed to serialize run summary: {}", e),
        }
    } else {
        info!(
            "Done: {} frames | cube {} drawn / {} skipped | path {} drawn / {} skipped | {} rescales",
            stats.frames,
            stats.cube_drawn,
            stats.cube_skipped,
            stats.path_drawn,
            stats.path_skipped,
            stats.rescales
        );
    }
}
