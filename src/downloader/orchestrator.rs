// Session controller - the download lifecycle state machine
//
// idle -> fetching -> previewing -> downloading -> completed -> idle
//
// The controller is synchronous. Anything that has to happen later (the
// metadata fetch, progress ticks, the finish delay) is pushed as an
// `Effect` for the owner to run; the result comes back through
// `complete_fetch` / `fire` tagged with the epoch it was scheduled under.
// Every new timer chain bumps the epoch, so stray timers from an earlier
// chain are dropped instead of landing in a different state.

use std::time::Duration;

use time::OffsetDateTime;

use super::errors::SessionError;
use super::format_selector::{QualityCatalog, SizeEstimator};
use super::history::HistoryStore;
use super::models::{
    DownloadProgress, DownloadRecord, Format, Phase, Selection, SessionConfig, Snapshot,
    TrimRange, VideoDetails, VideoId,
};
use super::theme::ThemePreference;
use super::traits::{CueKind, CueNotifier, RandomSource};
use super::utils::UrlResolver;

/// Progress increment per tick is drawn from [MIN, MAX)
const TICK_INCREMENT_MIN: f64 = 1.0;
const TICK_INCREMENT_MAX: f64 = 6.0;
/// Simulated bandwidth in MB/s, drawn from [MIN, MAX)
const SPEED_MIN: f64 = 2.0;
const SPEED_MAX: f64 = 5.0;

/// Deferred events the owner schedules on the controller's behalf
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    ProgressTick,
    Finish,
}

/// Work requested by a transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Look up metadata, then call `complete_fetch`
    Fetch { epoch: u64, id: VideoId },
    /// Call `fire(epoch, event)` after `after`
    Schedule {
        epoch: u64,
        event: TimerEvent,
        after: Duration,
    },
    /// Drop whatever is pending
    Cancel,
}

#[derive(Debug, Clone)]
enum SessionState {
    Idle,
    Fetching { id: VideoId },
    Previewing(Selection),
    Downloading {
        selection: Selection,
        progress: DownloadProgress,
    },
    Completed(Selection),
}

impl SessionState {
    fn phase(&self) -> Phase {
        match self {
            Self::Idle => Phase::Idle,
            Self::Fetching { .. } => Phase::Fetching,
            Self::Previewing(_) => Phase::Previewing,
            Self::Downloading { .. } => Phase::Downloading,
            Self::Completed(_) => Phase::Completed,
        }
    }

    fn selection(&self) -> Option<&Selection> {
        match self {
            Self::Previewing(s) | Self::Completed(s) => Some(s),
            Self::Downloading { selection, .. } => Some(selection),
            Self::Idle | Self::Fetching { .. } => None,
        }
    }
}

pub struct SessionController {
    state: SessionState,
    url: String,
    error: Option<String>,
    history: HistoryStore,
    theme: ThemePreference,
    notifier: Box<dyn CueNotifier>,
    rng: Box<dyn RandomSource>,
    tick_interval: Duration,
    finish_delay: Duration,
    epoch: u64,
    effects: Vec<Effect>,
    completed_count: u64,
}

impl SessionController {
    pub fn new(
        config: &SessionConfig,
        theme: ThemePreference,
        notifier: Box<dyn CueNotifier>,
        rng: Box<dyn RandomSource>,
    ) -> Self {
        Self {
            state: SessionState::Idle,
            url: String::new(),
            error: None,
            history: HistoryStore::new(config.history_capacity),
            theme,
            notifier,
            rng,
            tick_interval: config.tick_interval,
            finish_delay: config.finish_delay,
            epoch: 0,
            effects: Vec::new(),
            completed_count: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    /// Epoch of the current timer chain
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Effects produced since the last drain, in order
    pub fn drain_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn is_dark_mode(&self) -> bool {
        self.theme.is_dark()
    }

    pub fn into_theme(self) -> ThemePreference {
        self.theme
    }

    /// Resolve `text` and start the metadata fetch
    pub fn submit_url(&mut self, text: &str) -> Result<(), SessionError> {
        self.require(
            "submit a URL",
            &[Phase::Idle, Phase::Previewing, Phase::Completed],
        )?;
        self.url = text.to_string();

        let Some(id) = UrlResolver::resolve(text) else {
            if self.phase() == Phase::Completed {
                self.cancel_chain();
            }
            self.state = SessionState::Idle;
            return Err(self.fail(SessionError::InvalidUrl(text.to_string())));
        };

        self.cue(CueKind::Click);
        self.error = None;
        let epoch = self.cancel_chain();
        tracing::info!("[Session] Fetching details for {}", id);
        self.state = SessionState::Fetching { id: id.clone() };
        self.effects.push(Effect::Fetch { epoch, id });
        Ok(())
    }

    /// Drag-and-drop entry point. An empty drop shows an error in any
    /// phase and leaves the state alone.
    pub fn drop_url(&mut self, text: &str) -> Result<(), SessionError> {
        if text.trim().is_empty() {
            return Err(self.fail(SessionError::EmptyDrop));
        }
        self.submit_url(text)
    }

    /// Reset to idle with an empty input
    pub fn clear_input(&mut self) -> Result<(), SessionError> {
        self.require(
            "clear the input",
            &[Phase::Idle, Phase::Previewing, Phase::Completed],
        )?;
        self.cue(CueKind::Click);
        if self.phase() == Phase::Completed {
            self.cancel_chain();
        }
        self.url.clear();
        self.error = None;
        self.state = SessionState::Idle;
        Ok(())
    }

    pub fn edit_trim_start(&mut self, seconds: u32) -> Result<(), SessionError> {
        let selection = self.previewing_mut("edit the trim range")?;
        selection.trim.set_start(seconds)?;
        self.error = None;
        Ok(())
    }

    pub fn edit_trim_end(&mut self, seconds: u32) -> Result<(), SessionError> {
        let selection = self.previewing_mut("edit the trim range")?;
        let duration = selection.details.duration_seconds;
        selection.trim.set_end(seconds, duration)?;
        self.error = None;
        Ok(())
    }

    /// Switch format; quality resets to the new format's default.
    /// Selecting the current format again changes nothing.
    pub fn change_format(&mut self, format: Format) -> Result<(), SessionError> {
        let selection = self.previewing_mut("change the format")?;
        if selection.format == format {
            return Ok(());
        }
        selection.format = format;
        selection.quality = QualityCatalog::default_option(format).value.to_string();
        self.error = None;
        self.cue(CueKind::Toggle);
        Ok(())
    }

    pub fn change_quality(&mut self, value: &str) -> Result<(), SessionError> {
        let selection = self.previewing_mut("change the quality")?;
        if !QualityCatalog::contains(selection.format, value) {
            return Err(SessionError::UnknownQuality(value.to_string()));
        }
        selection.quality = value.to_string();
        self.error = None;
        self.cue(CueKind::Toggle);
        Ok(())
    }

    pub fn start_download(&mut self) -> Result<(), SessionError> {
        let selection = match std::mem::replace(&mut self.state, SessionState::Idle) {
            SessionState::Previewing(selection) => selection,
            other => {
                self.state = other;
                return Err(self.not_allowed("start a download"));
            }
        };

        self.cue(CueKind::StartDownload);
        self.error = None;
        tracing::info!(
            "[Session] Downloading {} as {} {}",
            selection.details.id,
            selection.format,
            selection.quality
        );
        self.state = SessionState::Downloading {
            selection,
            progress: DownloadProgress::default(),
        };
        let epoch = self.cancel_chain();
        self.schedule(epoch, TimerEvent::ProgressTick, self.tick_interval);
        Ok(())
    }

    /// Flip dark mode and persist it. Storage failures are logged; the
    /// in-memory flag still flips.
    pub fn toggle_theme(&mut self) -> bool {
        self.cue(CueKind::Toggle);
        match self.theme.toggle() {
            Ok(dark) => dark,
            Err(e) => {
                tracing::warn!("[Theme] Could not persist preference: {}", e);
                self.theme.is_dark()
            }
        }
    }

    /// Deliver the metadata lookup result. Returns false if the fetch is stale.
    pub fn complete_fetch(
        &mut self,
        epoch: u64,
        result: Result<VideoDetails, SessionError>,
    ) -> bool {
        if epoch != self.epoch || self.phase() != Phase::Fetching {
            tracing::debug!("[Session] Dropping stale fetch result (epoch {})", epoch);
            return false;
        }

        let result = result.and_then(|details| {
            if details.duration_seconds == 0 {
                Err(SessionError::Backend(format!(
                    "video {} has no playable length",
                    details.id
                )))
            } else {
                Ok(details)
            }
        });

        match result {
            Ok(details) => {
                let format = Format::default();
                let selection = Selection {
                    trim: TrimRange::full(details.duration_seconds),
                    quality: QualityCatalog::default_option(format).value.to_string(),
                    format,
                    details,
                };
                tracing::info!("[Session] Loaded \"{}\"", selection.details.title);
                self.state = SessionState::Previewing(selection);
            }
            Err(e) => {
                tracing::warn!("[Session] Fetch failed: {}", e);
                self.state = SessionState::Idle;
                self.fail(e);
            }
        }
        true
    }

    /// Deliver a timer. Returns false if the timer is stale.
    pub fn fire(&mut self, epoch: u64, event: TimerEvent) -> bool {
        if epoch != self.epoch {
            return false;
        }
        match (event, self.phase()) {
            (TimerEvent::ProgressTick, Phase::Downloading) => {
                self.advance_progress();
                true
            }
            (TimerEvent::Finish, Phase::Completed) => {
                tracing::debug!("[Session] Clearing finished download");
                self.state = SessionState::Idle;
                true
            }
            _ => false,
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        let selection = self.state.selection();
        let progress = match &self.state {
            SessionState::Downloading { progress, .. } => Some(progress),
            _ => None,
        };

        Snapshot {
            phase: self.phase(),
            url: self.url.clone(),
            video_details: selection.map(|s| s.details.clone()),
            format: selection.map(|s| s.format),
            quality: selection.map(|s| s.quality.clone()),
            trim: selection.map(|s| s.trim),
            estimated_size: selection.and_then(|s| {
                SizeEstimator::estimate_label(s.format, &s.quality, s.trim.len_seconds())
            }),
            error: self.error.clone(),
            progress: progress.map(|p| p.percent),
            speed_label: progress.map(|p| p.speed_label.clone()),
            history: self.history.all(),
            is_dark_mode: self.theme.is_dark(),
        }
    }

    fn advance_progress(&mut self) {
        let increment = self.rng.next_range(TICK_INCREMENT_MIN, TICK_INCREMENT_MAX);
        let speed = self.rng.next_range(SPEED_MIN, SPEED_MAX);

        let SessionState::Downloading { progress, .. } = &mut self.state else {
            return;
        };
        progress.percent = (progress.percent + increment).min(100.0);
        progress.speed_label = format!("{:.1} MB/s", speed);
        tracing::debug!("[Session] Progress {:.1}% @ {}", progress.percent, progress.speed_label);
        let done = progress.percent >= 100.0;

        if !done {
            self.schedule(self.epoch, TimerEvent::ProgressTick, self.tick_interval);
            return;
        }

        let SessionState::Downloading { selection, .. } =
            std::mem::replace(&mut self.state, SessionState::Idle)
        else {
            return;
        };
        self.finish_download(selection);
    }

    fn finish_download(&mut self, selection: Selection) {
        let completed_at = OffsetDateTime::now_utc();
        self.completed_count += 1;
        let record = DownloadRecord {
            id: format!(
                "{}-{}",
                completed_at.unix_timestamp_nanos() / 1_000_000,
                self.completed_count
            ),
            title: selection.details.title.clone(),
            format: selection.format,
            quality: selection.quality.clone(),
            completed_at,
        };
        tracing::info!("[Session] Finished \"{}\" ({})", record.title, record.subtitle());
        self.history.record(record);
        self.cue(CueKind::Complete);

        self.state = SessionState::Completed(selection);
        self.schedule(self.epoch, TimerEvent::Finish, self.finish_delay);
    }

    fn previewing_mut(&mut self, intent: &'static str) -> Result<&mut Selection, SessionError> {
        let phase = self.phase();
        match &mut self.state {
            SessionState::Previewing(selection) => Ok(selection),
            _ => Err(SessionError::NotAllowed { intent, phase }),
        }
    }

    fn require(&self, intent: &'static str, allowed: &[Phase]) -> Result<(), SessionError> {
        if allowed.contains(&self.phase()) {
            Ok(())
        } else {
            Err(self.not_allowed(intent))
        }
    }

    fn not_allowed(&self, intent: &'static str) -> SessionError {
        tracing::debug!("[Session] Ignoring \"{}\" while {}", intent, self.phase());
        SessionError::NotAllowed {
            intent,
            phase: self.phase(),
        }
    }

    /// Show a user-facing error in the overlay and hand it back
    fn fail(&mut self, err: SessionError) -> SessionError {
        if err.is_user_facing() {
            self.error = Some(err.to_string());
        }
        err
    }

    /// Invalidate pending timers and start a new epoch
    fn cancel_chain(&mut self) -> u64 {
        self.epoch += 1;
        self.effects.push(Effect::Cancel);
        self.epoch
    }

    fn schedule(&mut self, epoch: u64, event: TimerEvent, after: Duration) {
        self.effects.push(Effect::Schedule { epoch, event, after });
    }

    fn cue(&self, kind: CueKind) {
        if let Err(e) = self.notifier.play_cue(kind) {
            tracing::warn!("[Cue] {} failed: {}", kind, e);
        }
    }
}
