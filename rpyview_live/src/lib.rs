//! rpyview Live Viewer
//!
//! Polls a one-line data file every tick and redraws two independent views:
//!
//! - **Cube**: a ±1 cube rotated by the pitch/roll/yaw of a 3-field line
//! - **Path**: the last 7 lon/lat fixes of a 6-field line, auto-rescaled
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                      LiveRunner                      │
//! │   FrameClock ──tick──► step()                        │
//! │                         │                            │
//! │        ┌────────────────┴───────────────┐            │
//! │   LineSource.read_line()       LineSource.read_line()│
//! │        │                                │            │
//! │   CubeAnimator                      PathTracer       │
//! │        └──────────► RerunLogger ◄───────┘            │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use rpyview_env::{FileSource, TokioClock};
//! use rpyview_live::{LiveRunner, RerunLogger, ViewerConfig};
//!
//! let config = ViewerConfig::default();
//! let clock = TokioClock::new(config.interval);
//! let source = FileSource::new(&config.data_path);
//! let mut runner = LiveRunner::new(config, source, clock, RerunLogger::spawn("rpyview"));
//! runner.run(std::future::pending()).await;
//! ```

pub mod config;
pub mod runner;
pub mod visualizer;

pub use config::{ConfigError, ViewMode, ViewerConfig};
pub use runner::{ComponentOutcome, LiveRunner, RunStats, SkipReason, TickReport};
pub use visualizer::RerunLogger;
