//! CSV state log
//!
//! One line per tick of a logged run: the `n` net volumes, comma-separated.
//! The file is truncated when a run starts and closed when it ends, so it
//! always holds exactly the last logged run.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use simulation::SimulationHook;
use tracing::{debug, warn};
use types::{BookSnapshot, Tick, Volume};

/// Internal state protected by Mutex.
#[derive(Default)]
struct LogState {
    writer: Option<BufWriter<File>>,
    records: u64,
}

/// State-log sink writing one CSV record per tick.
///
/// I/O failures never reach the simulation: they are logged and the sink
/// stops writing until the next run starts.
pub struct CsvStateLog {
    path: PathBuf,
    state: Mutex<LogState>,
}

impl CsvStateLog {
    /// Create a sink for `path`. Nothing is opened until a run starts.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            state: Mutex::new(LogState::default()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Records written during the current or last run.
    pub fn records_written(&self) -> u64 {
        self.state.lock().records
    }

    /// Check if the sink currently holds an open file.
    pub fn is_open(&self) -> bool {
        self.state.lock().writer.is_some()
    }
}

/// Format one record: `v1,v2,...,vn`.
pub fn format_record(volumes: &[Volume]) -> String {
    volumes
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

fn write_record(writer: &mut BufWriter<File>, volumes: &[Volume]) -> io::Result<()> {
    writer.write_all(format_record(volumes).as_bytes())?;
    writer.write_all(b"\n")
}

impl SimulationHook for CsvStateLog {
    fn name(&self) -> &str {
        "CsvStateLog"
    }

    fn on_run_start(&self, levels: usize) {
        let mut state = self.state.lock();
        state.records = 0;
        state.writer = match File::create(&self.path) {
            Ok(file) => {
                debug!(path = %self.path.display(), levels, "state log opened");
                Some(BufWriter::new(file))
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to open state log");
                None
            }
        };
    }

    fn on_tick_end(&self, snapshot: &BookSnapshot) {
        let mut state = self.state.lock();
        let Some(writer) = state.writer.as_mut() else {
            return;
        };
        match write_record(writer, &snapshot.volumes) {
            Ok(()) => state.records += 1,
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    tick = snapshot.tick,
                    error = %e,
                    "Failed to write state record, logging stopped for this run"
                );
                state.writer = None;
            }
        }
    }

    fn on_run_end(&self, ticks: Tick) {
        let mut state = self.state.lock();
        if let Some(mut writer) = state.writer.take() {
            if let Err(e) = writer.flush() {
                warn!(path = %self.path.display(), error = %e, "Failed to flush state log");
            }
        }
        debug!(ticks, records = state.records, "state log closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn snapshot(tick: Tick, volumes: Vec<Volume>) -> BookSnapshot {
        BookSnapshot {
            tick,
            volumes,
            best_bid: 0,
            best_ask: 0,
        }
    }

    #[test]
    fn test_format_record() {
        assert_eq!(format_record(&[0, -10, 5, 0]), "0,-10,5,0");
        assert_eq!(format_record(&[]), "");
    }

    #[test]
    fn test_writes_one_line_per_tick() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output.csv");
        let log = CsvStateLog::new(&path);

        log.on_run_start(3);
        assert!(log.is_open());
        log.on_tick_end(&snapshot(1, vec![-1, 0, 2]));
        log.on_tick_end(&snapshot(2, vec![-3, 0, 0]));
        log.on_run_end(2);

        assert!(!log.is_open());
        assert_eq!(log.records_written(), 2);
        assert_eq!(fs::read_to_string(&path).unwrap(), "-1,0,2\n-3,0,0\n");
    }

    #[test]
    fn test_new_run_truncates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output.csv");
        let log = CsvStateLog::new(&path);

        log.on_run_start(2);
        log.on_tick_end(&snapshot(1, vec![4, 4]));
        log.on_tick_end(&snapshot(2, vec![5, 5]));
        log.on_run_end(2);

        log.on_run_start(2);
        log.on_tick_end(&snapshot(3, vec![-7, 1]));
        log.on_run_end(1);

        assert_eq!(fs::read_to_string(&path).unwrap(), "-7,1\n");
        assert_eq!(log.records_written(), 1);
    }

    #[test]
    fn test_ticks_outside_a_run_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output.csv");
        let log = CsvStateLog::new(&path);

        log.on_tick_end(&snapshot(1, vec![1]));
        assert_eq!(log.records_written(), 0);
        assert!(!path.exists());
    }

    #[test]
    fn test_unopenable_path_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("output.csv");
        let log = CsvStateLog::new(&path);

        log.on_run_start(2);
        log.on_tick_end(&snapshot(1, vec![1, 2]));
        log.on_run_end(1);

        assert!(!log.is_open());
        assert_eq!(log.records_written(), 0);
    }
}
