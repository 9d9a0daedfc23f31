// Error types for the download session

use std::fmt;

use super::models::Phase;

/// Errors returned by session entry points
#[derive(Debug, Clone, PartialEq)]
pub enum SessionError {
    /// Input does not match any accepted YouTube URL shape
    InvalidUrl(String),

    /// Drag-and-drop payload was empty
    EmptyDrop,

    /// Trim edit would break `0 <= start < end <= duration`
    InvalidTrim { start: u32, end: u32 },

    /// Quality value is not offered for the current format
    UnknownQuality(String),

    /// Intent is not valid in the current phase
    NotAllowed { intent: &'static str, phase: Phase },

    /// Metadata backend failed
    Backend(String),

    /// Session task has stopped
    Closed,
}

impl SessionError {
    /// Whether the message belongs in the error overlay shown to the user.
    /// Everything else is rejected without touching the overlay.
    pub fn is_user_facing(&self) -> bool {
        matches!(self, Self::InvalidUrl(_) | Self::EmptyDrop | Self::Backend(_))
    }
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidUrl(_) => write!(f, "Please enter a valid YouTube video URL."),
            Self::EmptyDrop => write!(f, "Please drop a valid YouTube link."),
            Self::InvalidTrim { start, end } => {
                write!(f, "Invalid trim range: {}..{}", start, end)
            }
            Self::UnknownQuality(q) => write!(f, "Unknown quality: {}", q),
            Self::NotAllowed { intent, phase } => {
                write!(f, "Cannot {} while {}", intent, phase)
            }
            Self::Backend(msg) => write!(f, "Could not fetch video details: {}", msg),
            Self::Closed => write!(f, "Session is closed"),
        }
    }
}

impl std::error::Error for SessionError {}

/// Errors from the durable key-value store
#[derive(Debug, Clone, PartialEq)]
pub enum StorageError {
    Io(String),
    Json(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "Storage I/O error: {}", msg),
            Self::Json(msg) => write!(f, "Storage JSON error: {}", msg),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Audio cue could not be played. Logged, never surfaced.
#[derive(Debug, Clone, PartialEq)]
pub struct NotifyError(pub String);

impl fmt::Display for NotifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cue failed: {}", self.0)
    }
}

impl std::error::Error for NotifyError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_facing_split() {
        assert!(SessionError::InvalidUrl("x".into()).is_user_facing());
        assert!(SessionError::EmptyDrop.is_user_facing());
        assert!(!SessionError::InvalidTrim { start: 5, end: 3 }.is_user_facing());
        assert!(!SessionError::UnknownQuality("9k".into()).is_user_facing());
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            SessionError::InvalidUrl("nope".into()).to_string(),
            "Please enter a valid YouTube video URL."
        );
        assert_eq!(
            SessionError::NotAllowed { intent: "download", phase: Phase::Fetching }.to_string(),
            "Cannot download while fetching"
        );
    }

    #[test]
    fn test_storage_from_io() {
        let err: StorageError = std::io::Error::new(std::io::ErrorKind::Other, "disk").into();
        assert!(matches!(err, StorageError::Io(_)));
    }
}
