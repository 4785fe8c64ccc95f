//! rpyview Environment Abstraction Layer
//!
//! Keeps the outside world behind two seams so the tick logic can run against
//! real files and wall-clock time, or against scripted lines and virtual time:
//! - **Data**: `LineSource` (`read_line()`)
//! - **Time**: `FrameClock` (`tick()`, `elapsed()`)
//!
//! # Example
//!
//! ```ignore
//! use rpyview_env::{FileSource, FrameClock, LineSource, TokioClock};
//!
//! async fn poll<C: FrameClock>(clock: &mut C, source: &FileSource) {
//!     loop {
//!         clock.tick().await;
//!         match source.read_line() {
//!             Ok(line) => redraw(&line),
//!             Err(e) => eprintln!("{e}"),
//!         }
//!     }
//! }
//! ```

mod clock;
mod error;
mod source;

pub use clock::{FrameClock, ManualClock, TokioClock, DEFAULT_FRAME_INTERVAL};
pub use error::EnvError;
pub use source::{FileSource, LineSource, ScriptedRead, ScriptedSource, DEFAULT_DATA_FILE};
