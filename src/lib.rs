pub mod console;
pub mod downloader;

pub use downloader::{Format, Intent, Phase, Session, SessionConfig, SessionError, SessionHandle, Snapshot};
