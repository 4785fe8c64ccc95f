//! Tick runner: poll, parse, update, redraw.
//!
//! All mutable plotting state lives in [`LiveRunner`] and is handed to each
//! component update explicitly. A tick is fully synchronous and every enabled
//! component opens and reads the data file on its own.

use crate::config::{ViewMode, ViewerConfig};
use crate::visualizer::RerunLogger;
use rpyview_core::sample::{ORIENTATION_FIELDS, POSITION_FIELDS};
use rpyview_core::{
    AttitudeHistory, CubeAnimator, GeoPoint, OrientationSample, PathTracer, PositionSample,
    SampleError,
};
use rpyview_env::{EnvError, FrameClock, LineSource};
use serde::Serialize;
use std::future::Future;
use tracing::{debug, info, warn};

/// Why a component skipped its redraw this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The data file could not be opened or read
    FileAccess,

    /// Wrong field count, non-numeric, non-finite or undecodable value
    MalformedData,
}

/// What one component did during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentOutcome {
    /// New data drawn
    Drawn,

    /// New data drawn and the view bounds jumped
    Rescaled,

    /// Nothing changed, previous drawing kept
    Skipped(SkipReason),
}

impl ComponentOutcome {
    pub fn is_skipped(&self) -> bool {
        matches!(self, ComponentOutcome::Skipped(_))
    }
}

/// Per-tick result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    pub frame: u64,
    pub cube: Option<ComponentOutcome>,
    pub path: Option<ComponentOutcome>,
}

/// Run summary, printed as JSON with `--json`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunStats {
    pub frames: u64,
    pub cube_drawn: u64,
    pub cube_skipped: u64,
    pub path_drawn: u64,
    pub path_skipped: u64,
    pub file_access_failures: u64,
    pub malformed_lines: u64,
    /// Lines in `both` mode that carried the other component's layout
    pub other_layout_lines: u64,
    pub rescales: u64,
    pub elapsed_secs: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_orientation: Option<OrientationSample>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_position: Option<GeoPoint>,
}

impl RunStats {
    fn record_skip(&mut self, reason: SkipReason) {
        match reason {
            SkipReason::FileAccess => self.file_access_failures += 1,
            SkipReason::MalformedData => self.malformed_lines += 1,
        }
    }
}

/// The live viewer loop with its explicit plotting context.
pub struct LiveRunner<S: LineSource, C: FrameClock> {
    config: ViewerConfig,
    source: S,
    clock: C,
    logger: RerunLogger,
    cube: CubeAnimator,
    tracer: PathTracer,
    history: AttitudeHistory,
    stats: RunStats,
}

impl<S: LineSource, C: FrameClock> LiveRunner<S, C> {
    pub fn new(config: ViewerConfig, source: S, clock: C, logger: RerunLogger) -> Self {
        let tracer = PathTracer::new(config.tracer_config());
        let history = AttitudeHistory::new(config.history_len);
        logger.log_scene_setup();

        Self {
            config,
            source,
            clock,
            logger,
            cube: CubeAnimator::default(),
            tracer,
            history,
            stats: RunStats::default(),
        }
    }

    /// Runs one tick of every enabled component.
    pub fn step(&mut self) -> TickReport {
        self.stats.frames += 1;
        let frame = self.stats.frames;
        let elapsed = self.clock.elapsed();
        self.stats.elapsed_secs = elapsed.as_secs_f64();
        self.logger.set_frame(frame, elapsed);

        let cube = self.config.mode.shows_cube().then(|| self.update_cube());
        let path = self.config.mode.shows_path().then(|| self.update_path());

        if self.config.mode.shows_cube() || !self.history.is_empty() {
            self.logger.log_attitude(&self.history);
        }

        debug!("frame {} | cube={:?} | path={:?}", frame, cube, path);
        TickReport { frame, cube, path }
    }

    fn update_cube(&mut self) -> ComponentOutcome {
        let line = match self.source.read_line() {
            Ok(line) => line,
            Err(e) => return self.skip_cube(skip_reason_for(&e), &e.to_string()),
        };

        match self.cube.update_from_line(&line) {
            Ok(frame) => {
                self.logger.log_cube(frame);
                let sample = frame.sample;
                self.history.record(self.stats.elapsed_secs, sample);
                self.stats.last_orientation = Some(sample);
                self.stats.cube_drawn += 1;
                ComponentOutcome::Drawn
            }
            Err(e) => {
                self.stats.cube_skipped += 1;
                self.skip_data("cube", &e, &line, POSITION_FIELDS)
            }
        }
    }

    fn update_path(&mut self) -> ComponentOutcome {
        let line = match self.source.read_line() {
            Ok(line) => line,
            Err(e) => return self.skip_path(skip_reason_for(&e), &e.to_string()),
        };

        let sample = match PositionSample::parse_line(&line) {
            Ok(sample) => sample,
            Err(e) => {
                self.stats.path_skipped += 1;
                return self.skip_data("path", &e, &line, ORIENTATION_FIELDS);
            }
        };

        let update = self.tracer.push(sample.point());
        self.logger.log_path(&self.tracer);
        self.logger.log_height(sample.height);
        if !self.config.mode.shows_cube() {
            // The cube feeds the attitude panel when it runs.
            self.history.record(self.stats.elapsed_secs, sample.attitude());
        }

        self.stats.last_position = Some(update.point);
        self.stats.path_drawn += 1;
        if update.rescaled {
            self.stats.rescales += 1;
            if let Some(bounds) = self.tracer.bounds() {
                debug!(
                    "view rescaled to lon [{:.5}, {:.5}] lat [{:.5}, {:.5}]",
                    bounds.x.min, bounds.x.max, bounds.y.min, bounds.y.max
                );
            }
            ComponentOutcome::Rescaled
        } else {
            ComponentOutcome::Drawn
        }
    }

    fn skip_cube(&mut self, reason: SkipReason, detail: &str) -> ComponentOutcome {
        self.stats.cube_skipped += 1;
        self.skip("cube", reason, detail)
    }

    fn skip_path(&mut self, reason: SkipReason, detail: &str) -> ComponentOutcome {
        self.stats.path_skipped += 1;
        self.skip("path", reason, detail)
    }

    /// Skips on a parse failure. In `both` mode a line with the other
    /// component's field count is expected every tick and only logged at debug.
    fn skip_data(
        &mut self,
        component: &str,
        error: &SampleError,
        line: &str,
        other_fields: usize,
    ) -> ComponentOutcome {
        let detail = format_data_error(error, line);
        if self.config.mode == ViewMode::Both && error.found_fields() == Some(other_fields) {
            self.stats.other_layout_lines += 1;
            debug!("[{}] {}-field line left to the other view: {}", component, other_fields, detail);
            return ComponentOutcome::Skipped(SkipReason::MalformedData);
        }
        self.skip(component, SkipReason::MalformedData, &detail)
    }

    fn skip(&mut self, component: &str, reason: SkipReason, detail: &str) -> ComponentOutcome {
        self.stats.record_skip(reason);
        let message = match reason {
            SkipReason::FileAccess => "File not accessible",
            SkipReason::MalformedData => "Error in data format",
        };
        warn!("[{}] {}: {}", component, message, detail);
        self.logger
            .log_event(&format!("logs/{}", component), &format!("{}: {}", message, detail));
        ComponentOutcome::Skipped(reason)
    }

    /// Ticks until `max_frames` is reached or `shutdown` resolves.
    pub async fn run<F>(&mut self, shutdown: F) -> &RunStats
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        info!(
            "Polling {} every {:?} (mode: {})",
            self.source.describe(),
            self.clock.period(),
            self.config.mode
        );

        loop {
            if let Some(max) = self.config.max_frames {
                if self.stats.frames >= max {
                    info!("Reached {} frames", max);
                    break;
                }
            }

            // Shutdown wins when both are ready.
            let ticked = tokio::select! {
                biased;
                _ = &mut shutdown => false,
                _ = self.clock.tick() => true,
            };
            if !ticked {
                info!("Shutdown requested after {} frames", self.stats.frames);
                break;
            }
            self.step();
        }

        &self.stats
    }

    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    pub fn cube(&self) -> &CubeAnimator {
        &self.cube
    }

    pub fn tracer(&self) -> &PathTracer {
        &self.tracer
    }

    pub fn history(&self) -> &AttitudeHistory {
        &self.history
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}

fn format_data_error(error: &SampleError, line: &str) -> String {
    format!("{} in {:?}", error, line)
}

/// Maps an environment error onto the skip reason it causes.
fn skip_reason_for(error: &EnvError) -> SkipReason {
    match error {
        EnvError::FileAccess { .. } => SkipReason::FileAccess,
        EnvError::InvalidEncoding { .. } => SkipReason::MalformedData,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rpyview_env::{FileSource, ManualClock, ScriptedRead, ScriptedSource};
    use std::time::Duration;
    use tempfile::NamedTempFile;

    fn runner(mode: ViewMode, source: ScriptedSource) -> LiveRunner<ScriptedSource, ManualClock> {
        let config = ViewerConfig {
            mode,
            ..Default::default()
        };
        LiveRunner::new(config, source, ManualClock::default(), RerunLogger::disabled())
    }

    fn file_runner(mode: ViewMode, file: &NamedTempFile) -> LiveRunner<FileSource, ManualClock> {
        let config = ViewerConfig {
            mode,
            ..Default::default()
        };
        let source = FileSource::new(file.path());
        LiveRunner::new(config, source, ManualClock::default(), RerunLogger::disabled())
    }

    fn data_file(contents: &[u8]) -> NamedTempFile {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), contents).unwrap();
        file
    }

    #[test]
    fn test_cube_tick_draws() {
        let mut runner = runner(ViewMode::Cube, ScriptedSource::from_lines(["0.1,0.2,0.3"]));
        let report = runner.step();

        assert_eq!(report.cube, Some(ComponentOutcome::Drawn));
        assert_eq!(report.path, None);
        assert_eq!(runner.cube().current().unwrap().sample, OrientationSample::new(0.2, 0.1, 0.3));
        assert_eq!(runner.history().len(), 1);
    }

    #[test]
    fn test_malformed_line_keeps_cube() {
        let mut runner = runner(
            ViewMode::Cube,
            ScriptedSource::from_lines(["0.1,0.2,0.3", "abc,1.0,2.0"]),
        );
        runner.step();
        let before = runner.cube().current().cloned();

        let report = runner.step();
        assert_eq!(report.cube, Some(ComponentOutcome::Skipped(SkipReason::MalformedData)));
        assert!(report.cube.unwrap().is_skipped());
        assert_eq!(runner.cube().current().cloned(), before);
        assert_eq!(runner.stats().malformed_lines, 1);
        assert_eq!(runner.stats().cube_skipped, 1);
    }

    #[test]
    fn test_missing_file_skips() {
        let mut runner = runner(
            ViewMode::Path,
            ScriptedSource::new(vec![ScriptedRead::Missing, "0,0,0,13.5,121.0,0".into()]),
        );

        let report = runner.step();
        assert_eq!(report.path, Some(ComponentOutcome::Skipped(SkipReason::FileAccess)));
        assert!(runner.tracer().buffer().is_empty());
        assert_eq!(runner.stats().file_access_failures, 1);

        let report = runner.step();
        assert_eq!(report.path, Some(ComponentOutcome::Rescaled));
        assert_eq!(runner.tracer().buffer().last(), Some(&GeoPoint::new(121.0, 13.5)));
    }

    #[test]
    fn test_path_mode_feeds_attitude_history() {
        let mut runner = runner(ViewMode::Path, ScriptedSource::from_lines(["0.1,0.2,0.3,13.5,121.0,5.0"]));
        runner.step();
        let (_, sample) = *runner.history().latest().unwrap();
        assert_eq!(sample, OrientationSample::new(0.2, 0.1, 0.3));
    }

    #[test]
    fn test_both_mode_reads_file_per_component() {
        // A polled file holds one layout, so only one reader draws per tick.
        let file = data_file(b"0.1,0.2,0.3\n");
        let mut runner = file_runner(ViewMode::Both, &file);

        let report = runner.step();
        assert_eq!(report.cube, Some(ComponentOutcome::Drawn));
        assert_eq!(report.path, Some(ComponentOutcome::Skipped(SkipReason::MalformedData)));
        assert_eq!(runner.stats().other_layout_lines, 1);
        assert_eq!(runner.stats().malformed_lines, 0);
        assert_eq!(runner.stats().path_skipped, 1);

        std::fs::write(file.path(), "0,0,0,13.5,121.0,0\n").unwrap();
        let report = runner.step();
        assert_eq!(report.cube, Some(ComponentOutcome::Skipped(SkipReason::MalformedData)));
        assert_eq!(report.path, Some(ComponentOutcome::Rescaled));
        assert_eq!(runner.stats().other_layout_lines, 2);
        assert_eq!(runner.stats().malformed_lines, 0);
        assert!(runner.cube().current().is_some());
    }

    #[test]
    fn test_both_mode_still_reports_bad_lines() {
        let file = data_file(b"1,2,3,4\n");
        let mut runner = file_runner(ViewMode::Both, &file);

        let report = runner.step();
        assert!(report.cube.unwrap().is_skipped());
        assert!(report.path.unwrap().is_skipped());
        assert_eq!(runner.stats().malformed_lines, 2);
        assert_eq!(runner.stats().other_layout_lines, 0);
    }

    #[test]
    fn test_single_mode_counts_other_layout_as_malformed() {
        let file = data_file(b"0,0,0,13.5,121.0,0\n");
        let mut runner = file_runner(ViewMode::Cube, &file);

        runner.step();
        assert_eq!(runner.stats().malformed_lines, 1);
        assert_eq!(runner.stats().other_layout_lines, 0);
    }

    #[test]
    fn test_invalid_utf8_is_malformed_data() {
        let file = data_file(b"0.1,\xff\xfe,0.3\n");
        let mut runner = file_runner(ViewMode::Cube, &file);

        let report = runner.step();
        assert_eq!(report.cube, Some(ComponentOutcome::Skipped(SkipReason::MalformedData)));
        assert_eq!(runner.stats().malformed_lines, 1);
        assert_eq!(runner.stats().file_access_failures, 0);
    }

    #[test]
    fn test_eight_reads_keep_seven_points() {
        let lines: Vec<String> = (0..8)
            .map(|i| format!("0,0,0,{},{},0", 13.5 + i as f64 * 0.01, 121.0 + i as f64 * 0.01))
            .collect();
        let source = ScriptedSource::from_lines(lines.iter().map(|s| s.as_str()));
        let mut runner = runner(ViewMode::Path, source);

        for _ in 0..8 {
            runner.step();
            assert!(runner.tracer().buffer().len() <= 7);
        }
        assert_eq!(runner.tracer().buffer().len(), 7);
        assert_eq!(runner.stats().path_drawn, 8);
        assert!(runner.stats().rescales >= 1);
    }

    #[tokio::test]
    async fn test_run_stops_after_max_frames() {
        let config = ViewerConfig {
            mode: ViewMode::Cube,
            max_frames: Some(5),
            ..Default::default()
        };
        let source = ScriptedSource::from_lines(["0.0,0.0,0.0"]);
        let mut runner = LiveRunner::new(config, source, ManualClock::default(), RerunLogger::disabled());

        let stats = runner.run(std::future::pending()).await;
        assert_eq!(stats.frames, 5);
        assert_eq!(stats.cube_drawn, 5);
        assert!((stats.elapsed_secs - 0.4).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown() {
        let source = ScriptedSource::from_lines(["0.0,0.0,0.0"]);
        let mut runner = runner(ViewMode::Cube, source);

        // Both futures are ready on the first poll; shutdown must win.
        let stats = runner.run(std::future::ready(())).await;
        assert_eq!(stats.frames, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_with_tokio_clock() {
        let config = ViewerConfig {
            mode: ViewMode::Path,
            max_frames: Some(3),
            ..Default::default()
        };
        let source = ScriptedSource::from_lines(["0,0,0,13.5,121.0,0"]);
        let clock = rpyview_env::TokioClock::new(config.interval);
        let mut runner = LiveRunner::new(config, source, clock, RerunLogger::disabled());

        let stats = runner.run(std::future::pending()).await;
        assert_eq!(stats.frames, 3);
        assert!(stats.elapsed_secs >= Duration::from_millis(200).as_secs_f64());
    }

    #[test]
    fn test_stats_serialize() {
        let mut runner = runner(ViewMode::Path, ScriptedSource::from_lines(["0,0,0,13.5,121.0,0"]));
        runner.step();
        let json = serde_json::to_value(runner.stats()).unwrap();
        assert_eq!(json["path_drawn"], 1);
        assert_eq!(json["last_position"]["longitude"], 121.0);
        assert!(json.get("last_orientation").is_none());
    }

    #[test]
    fn test_skip_reason_for_env_error() {
        let err = EnvError::file_access("rpy_data.txt", std::io::Error::from(std::io::ErrorKind::NotFound));
        assert_eq!(skip_reason_for(&err), SkipReason::FileAccess);

        let bytes = vec![0x30, 0xff];
        let utf8 = String::from_utf8(bytes).unwrap_err();
        let err = EnvError::invalid_encoding("rpy_data.txt", utf8);
        assert_eq!(skip_reason_for(&err), SkipReason::MalformedData);
    }
}
