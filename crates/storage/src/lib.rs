//! Storage layer for the order book gym
//!
//! **Philosophy:** Declarative, Modular, SoC
//! - Modular: every sink is a `SimulationHook`, added or left out per run
//! - SoC: this crate ONLY handles persistence, no simulation logic
//!
//! Sinks:
//! - `CsvStateLog`: one line of net volumes per tick of a logged market run
//! - `EpisodeJournal`: one JSON object per trained episode

mod csv_log;
mod episode_log;

pub use csv_log::{CsvStateLog, format_record};
pub use episode_log::EpisodeJournal;
