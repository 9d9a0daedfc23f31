// Metadata backends and cue notifiers

pub mod cues;
pub mod simulated;

pub use cues::{BellCueNotifier, LogCueNotifier};
pub use simulated::SimulatedBackend;
