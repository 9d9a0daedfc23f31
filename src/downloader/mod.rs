// Downloader module - simulated download session engine

pub mod backends;
pub mod errors;
pub mod format_selector;
pub mod history;
pub mod models;
pub mod orchestrator;
pub mod random;
pub mod session;
pub mod theme;
pub mod traits;
pub mod utils;

pub use errors::{NotifyError, SessionError, StorageError};
pub use format_selector::{QualityCatalog, QualityOption, SizeEstimator};
pub use history::HistoryStore;
pub use models::{
    DownloadProgress, DownloadRecord, Format, Phase, Selection, SessionConfig, Snapshot,
    TrimRange, VideoDetails, VideoId,
};
pub use orchestrator::{Effect, SessionController, TimerEvent};
pub use session::{Intent, Session, SessionHandle};
pub use theme::{JsonFileStore, MemoryStore, ThemePreference};
pub use traits::{CueKind, CueNotifier, KeyValueStore, MetadataBackend, RandomSource};
pub use utils::UrlResolver;
