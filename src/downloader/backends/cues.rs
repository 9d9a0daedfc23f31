use std::io::Write;

use crate::downloader::errors::NotifyError;
use crate::downloader::traits::{CueKind, CueNotifier};

/// Logs each cue instead of playing it
#[derive(Debug, Default, Clone, Copy)]
pub struct LogCueNotifier;

impl CueNotifier for LogCueNotifier {
    fn play_cue(&self, kind: CueKind) -> Result<(), NotifyError> {
        tracing::debug!("[Cue] {}", kind);
        Ok(())
    }
}

/// Rings the terminal bell on start and completion
#[derive(Debug, Default, Clone, Copy)]
pub struct BellCueNotifier;

impl CueNotifier for BellCueNotifier {
    fn play_cue(&self, kind: CueKind) -> Result<(), NotifyError> {
        if !matches!(kind, CueKind::StartDownload | CueKind::Complete) {
            return Ok(());
        }
        let mut stderr = std::io::stderr();
        stderr
            .write_all(b"\x07")
            .and_then(|_| stderr.flush())
            .map_err(|e| NotifyError(e.to_string()))
    }
}
