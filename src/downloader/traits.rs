// Collaborator seams for the session: metadata backend, cues, storage, RNG

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::errors::{NotifyError, SessionError, StorageError};
use super::models::{VideoDetails, VideoId};

/// Source of video metadata
#[async_trait]
pub trait MetadataBackend: Send + Sync {
    /// Name of the backend (for logging)
    fn name(&self) -> &'static str;

    /// Resolve details for an identifier
    async fn get_video_info(&self, id: &VideoId) -> Result<VideoDetails, SessionError>;
}

/// Kinds of audible feedback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CueKind {
    Click,
    StartDownload,
    Toggle,
    Complete,
}

impl fmt::Display for CueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Click => "click",
            Self::StartDownload => "start-download",
            Self::Toggle => "toggle",
            Self::Complete => "complete",
        };
        f.write_str(s)
    }
}

/// Best-effort audio feedback. Failures are logged by the caller and
/// never change session state.
pub trait CueNotifier: Send {
    fn play_cue(&self, kind: CueKind) -> Result<(), NotifyError>;
}

/// Durable string key-value storage
pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Uniform random numbers for the simulation
pub trait RandomSource: Send {
    /// Uniform in [0, 1)
    fn next_f64(&mut self) -> f64;

    /// Uniform in [low, high)
    fn next_range(&mut self, low: f64, high: f64) -> f64 {
        low + self.next_f64() * (high - low)
    }
}
