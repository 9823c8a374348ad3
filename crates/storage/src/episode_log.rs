//! Episode journal
//!
//! Appends one JSON object per trained episode (JSON lines), flushed as each
//! episode ends so a long training run can be followed from another process.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use simulation::{EpisodeSummary, SimulationHook};
use tracing::warn;

/// JSON-lines sink for [`EpisodeSummary`] records.
pub struct EpisodeJournal {
    path: PathBuf,
    writer: Mutex<Option<BufWriter<File>>>,
}

impl EpisodeJournal {
    /// Create (or truncate) the journal file.
    pub fn create(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path)?;
        Ok(Self {
            path,
            writer: Mutex::new(Some(BufWriter::new(file))),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if the journal is still accepting records.
    pub fn is_active(&self) -> bool {
        self.writer.lock().is_some()
    }
}

fn append(writer: &mut BufWriter<File>, summary: &EpisodeSummary) -> io::Result<()> {
    serde_json::to_writer(&mut *writer, summary)?;
    writer.write_all(b"\n")?;
    writer.flush()
}

impl SimulationHook for EpisodeJournal {
    fn name(&self) -> &str {
        "EpisodeJournal"
    }

    fn on_episode_end(&self, summary: &EpisodeSummary) {
        let mut guard = self.writer.lock();
        let Some(writer) = guard.as_mut() else {
            return;
        };
        if let Err(e) = append(writer, summary) {
            warn!(
                path = %self.path.display(),
                episode = summary.episode,
                error = %e,
                "Failed to append episode, journal disabled"
            );
            *guard = None;
        }
    }
}
