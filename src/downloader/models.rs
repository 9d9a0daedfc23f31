// Common data models for the download session

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::errors::SessionError;
use super::history::DEFAULT_HISTORY_CAPACITY;
use super::utils::default_settings_path;

/// Length of a YouTube video identifier
pub const VIDEO_ID_LEN: usize = 11;

/// Canonical 11-character video identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VideoId(String);

impl VideoId {
    /// Accepts exactly 11 characters from `[a-zA-Z0-9_-]`
    pub fn parse(raw: &str) -> Option<Self> {
        let valid = raw.len() == VIDEO_ID_LEN
            && raw
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');
        valid.then(|| Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Video information produced by the metadata backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoDetails {
    pub id: VideoId,
    pub title: String,
    pub author: String,
    pub thumbnail_url: String,
    pub duration_seconds: u32,
}

/// Output container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Format {
    #[serde(rename = "MP3")]
    Audio,
    #[default]
    #[serde(rename = "MP4")]
    Video,
}

impl Format {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Audio => "MP3",
            Self::Video => "MP4",
        }
    }

    /// Parse user input like "mp3", "audio", "MP4"
    pub fn from_label(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "mp3" | "audio" => Some(Self::Audio),
            "mp4" | "video" => Some(Self::Video),
            _ => None,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Selected subrange of the video, in whole seconds.
///
/// Invariant: `0 <= start_seconds < end_seconds <= duration`. Edits that
/// would break it are rejected, never clamped to the other bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrimRange {
    pub start_seconds: u32,
    pub end_seconds: u32,
}

impl TrimRange {
    /// Whole-video range
    pub fn full(duration_seconds: u32) -> Self {
        Self {
            start_seconds: 0,
            end_seconds: duration_seconds,
        }
    }

    pub fn len_seconds(&self) -> u32 {
        self.end_seconds.saturating_sub(self.start_seconds)
    }

    pub fn set_start(&mut self, start: u32) -> Result<(), SessionError> {
        if start >= self.end_seconds {
            return Err(SessionError::InvalidTrim {
                start,
                end: self.end_seconds,
            });
        }
        self.start_seconds = start;
        Ok(())
    }

    pub fn set_end(&mut self, end: u32, duration_seconds: u32) -> Result<(), SessionError> {
        if end <= self.start_seconds || end > duration_seconds {
            return Err(SessionError::InvalidTrim {
                start: self.start_seconds,
                end,
            });
        }
        self.end_seconds = end;
        Ok(())
    }
}

/// Download progress, live only while downloading
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DownloadProgress {
    pub percent: f64,
    pub speed_label: String,
}

/// One completed simulated download
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadRecord {
    pub id: String,
    pub title: String,
    pub format: Format,
    pub quality: String,
    #[serde(with = "time::serde::rfc3339")]
    pub completed_at: OffsetDateTime,
}

impl DownloadRecord {
    /// "MP4 - 720p"
    pub fn subtitle(&self) -> String {
        format!("{} - {}", self.format, self.quality)
    }

    /// "Oct 19, 03:04 PM"
    pub fn display_timestamp(&self) -> String {
        let fmt = time::macros::format_description!(
            "[month repr:short] [day padding:none], [hour repr:12]:[minute] [period]"
        );
        self.completed_at
            .format(&fmt)
            .unwrap_or_else(|_| self.completed_at.to_string())
    }
}

/// Lifecycle phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Fetching,
    Previewing,
    Downloading,
    /// Download finished; details are cleared after the finish delay
    Completed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Fetching => "fetching",
            Self::Previewing => "previewing",
            Self::Downloading => "downloading",
            Self::Completed => "completed",
        };
        f.write_str(s)
    }
}

/// User's format, quality and trim choices for the loaded video
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub details: VideoDetails,
    pub format: Format,
    pub quality: String,
    pub trim: TrimRange,
}

/// Read-only view handed to the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: Phase,
    pub url: String,
    pub video_details: Option<VideoDetails>,
    pub format: Option<Format>,
    pub quality: Option<String>,
    pub trim: Option<TrimRange>,
    pub estimated_size: Option<String>,
    pub error: Option<String>,
    pub progress: Option<f64>,
    pub speed_label: Option<String>,
    pub history: Vec<DownloadRecord>,
    pub is_dark_mode: bool,
}

/// Timing and storage configuration for a session
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Simulated metadata fetch
    pub fetch_delay: Duration,

    /// Period between progress ticks
    pub tick_interval: Duration,

    /// How long a finished download stays on screen
    pub finish_delay: Duration,

    pub history_capacity: usize,

    /// JSON file holding the theme flag
    pub settings_path: PathBuf,

    /// Fixed RNG seed; wall-clock seeded when `None`
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            fetch_delay: Duration::from_millis(2500),
            tick_interval: Duration::from_millis(200),
            finish_delay: Duration::from_millis(1000),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            settings_path: default_settings_path(),
            seed: None,
        }
    }
}

impl SessionConfig {
    pub fn with_fetch_delay(mut self, delay: Duration) -> Self {
        self.fetch_delay = delay;
        self
    }

    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    pub fn with_finish_delay(mut self, delay: Duration) -> Self {
        self.finish_delay = delay;
        self
    }

    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    pub fn with_settings_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.settings_path = path.into();
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Multiply every delay by `factor` (e.g. 0.1 for a quick demo)
    pub fn with_time_scale(mut self, factor: f64) -> Self {
        let factor = factor.max(0.0);
        self.fetch_delay = self.fetch_delay.mul_f64(factor);
        self.tick_interval = self.tick_interval.mul_f64(factor);
        self.finish_delay = self.finish_delay.mul_f64(factor);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_id_validation() {
        assert!(VideoId::parse("dQw4w9WgXcQ").is_some());
        assert!(VideoId::parse("abc-_123XYZ").is_some());
        assert!(VideoId::parse("short").is_none());
        assert!(VideoId::parse("dQw4w9WgXcQQ").is_none());
        assert!(VideoId::parse("dQw4w9WgXc!").is_none());
    }

    #[test]
    fn test_trim_rejects_crossing_bounds() {
        let mut trim = TrimRange::full(212);
        assert!(trim.set_start(212).is_err());
        assert!(trim.set_start(100).is_ok());
        assert!(trim.set_end(100, 212).is_err());
        assert!(trim.set_end(213, 212).is_err());
        assert!(trim.set_end(150, 212).is_ok());
        assert_eq!(trim, TrimRange { start_seconds: 100, end_seconds: 150 });
        assert_eq!(trim.len_seconds(), 50);
    }

    #[test]
    fn test_format_serde_labels() {
        assert_eq!(serde_json::to_string(&Format::Audio).unwrap(), "\"MP3\"");
        assert_eq!(Format::from_label("mp4"), Some(Format::Video));
        assert_eq!(Format::from_label("flac"), None);
        assert_eq!(Format::default(), Format::Video);
    }

    #[test]
    fn test_record_display() {
        let record = DownloadRecord {
            id: "1".into(),
            title: "t".into(),
            format: Format::Video,
            quality: "720p".into(),
            completed_at: time::macros::datetime!(2024-10-19 15:04 UTC),
        };
        assert_eq!(record.subtitle(), "MP4 - 720p");
        assert_eq!(record.display_timestamp(), "Oct 19, 03:04 PM");
    }

    #[test]
    fn test_config_time_scale() {
        let config = SessionConfig::default().with_time_scale(0.1);
        assert_eq!(config.fetch_delay, Duration::from_millis(250));
        assert_eq!(config.tick_interval, Duration::from_millis(20));
        assert_eq!(config.finish_delay, Duration::from_millis(100));
        assert_eq!(config.history_capacity, 5);
    }
}
