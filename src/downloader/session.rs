// Session actor - one task owns the controller
//
// Intents from the presentation layer and timer/fetch completions arrive
// on the same channel, so transitions are applied strictly one at a time.
// Each processed message publishes a fresh snapshot on a watch channel.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;

use super::backends::SimulatedBackend;
use super::errors::SessionError;
use super::models::{Format, SessionConfig, Snapshot, VideoDetails};
use super::orchestrator::{Effect, SessionController, TimerEvent};
use super::random::SplitMix64;
use super::theme::{JsonFileStore, MemoryStore, ThemePreference};
use super::traits::{CueNotifier, KeyValueStore, MetadataBackend};

const CHANNEL_CAPACITY: usize = 64;

/// User intents forwarded by the presentation layer
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    SubmitUrl(String),
    DropUrl(String),
    ClearInput,
    EditTrimStart(u32),
    EditTrimEnd(u32),
    ChangeFormat(Format),
    ChangeQuality(String),
    StartDownload,
    ToggleTheme,
}

enum Message {
    Intent(Intent, oneshot::Sender<Result<(), SessionError>>),
    Fetched {
        epoch: u64,
        result: Result<VideoDetails, SessionError>,
    },
    Timer {
        epoch: u64,
        event: TimerEvent,
    },
}

pub struct Session {
    controller: SessionController,
    backend: Arc<dyn MetadataBackend>,
    rx: mpsc::Receiver<Message>,
    tx: mpsc::WeakSender<Message>,
    snapshots: watch::Sender<Snapshot>,
    pending: Option<JoinHandle<()>>,
}

impl Session {
    /// Start a session with the simulated backend and the on-disk theme file.
    /// Must be called inside a tokio runtime.
    pub fn start(config: SessionConfig, notifier: Box<dyn CueNotifier>) -> SessionHandle {
        let store = JsonFileStore::open(&config.settings_path);
        tracing::info!("[Session] Settings file: {}", store.path().display());
        Self::start_with_store(config, Box::new(store), notifier)
    }

    /// Same as `start`, but nothing touches the disk
    pub fn start_in_memory(config: SessionConfig, notifier: Box<dyn CueNotifier>) -> SessionHandle {
        Self::start_with_store(config, Box::new(MemoryStore::new()), notifier)
    }

    fn start_with_store(
        config: SessionConfig,
        store: Box<dyn KeyValueStore>,
        notifier: Box<dyn CueNotifier>,
    ) -> SessionHandle {
        let rng = match config.seed {
            Some(seed) => SplitMix64::new(seed),
            None => SplitMix64::from_entropy(),
        };
        let controller = SessionController::new(
            &config,
            ThemePreference::load(store),
            notifier,
            Box::new(rng),
        );
        let backend = Arc::new(SimulatedBackend::new(config.fetch_delay));
        Self::spawn(controller, backend)
    }

    /// Run `controller` on its own task
    pub fn spawn(
        controller: SessionController,
        backend: Arc<dyn MetadataBackend>,
    ) -> SessionHandle {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let (snapshots, snapshot_rx) = watch::channel(controller.snapshot());

        tracing::debug!("[Session] Using metadata backend: {}", backend.name());
        let session = Session {
            controller,
            backend,
            rx,
            tx: tx.downgrade(),
            snapshots,
            pending: None,
        };
        tokio::spawn(session.run());

        SessionHandle {
            tx,
            snapshots: snapshot_rx,
        }
    }

    async fn run(mut self) {
        while let Some(message) = self.rx.recv().await {
            let reply = match message {
                Message::Intent(intent, reply) => Some((reply, self.apply(intent))),
                Message::Fetched { epoch, result } => {
                    self.controller.complete_fetch(epoch, result);
                    None
                }
                Message::Timer { epoch, event } => {
                    self.controller.fire(epoch, event);
                    None
                }
            };
            self.run_effects();
            self.snapshots.send_replace(self.controller.snapshot());

            // Reply after publishing so callers see their own transition
            if let Some((reply, result)) = reply {
                let _ = reply.send(result);
            }
        }

        if let Some(task) = self.pending.take() {
            task.abort();
        }
        tracing::debug!("[Session] All handles dropped, stopping");
    }

    fn apply(&mut self, intent: Intent) -> Result<(), SessionError> {
        let c = &mut self.controller;
        match intent {
            Intent::SubmitUrl(text) => c.submit_url(&text),
            Intent::DropUrl(text) => c.drop_url(&text),
            Intent::ClearInput => c.clear_input(),
            Intent::EditTrimStart(s) => c.edit_trim_start(s),
            Intent::EditTrimEnd(s) => c.edit_trim_end(s),
            Intent::ChangeFormat(f) => c.change_format(f),
            Intent::ChangeQuality(q) => c.change_quality(&q),
            Intent::StartDownload => c.start_download(),
            Intent::ToggleTheme => {
                c.toggle_theme();
                Ok(())
            }
        }
    }

    fn run_effects(&mut self) {
        for effect in self.controller.drain_effects() {
            match effect {
                Effect::Cancel => {
                    if let Some(task) = self.pending.take() {
                        task.abort();
                    }
                }
                Effect::Fetch { epoch, id } => {
                    let backend = Arc::clone(&self.backend);
                    let tx = self.tx.clone();
                    self.replace_pending(tokio::spawn(async move {
                        let result = backend.get_video_info(&id).await;
                        if let Some(tx) = tx.upgrade() {
                            let _ = tx.send(Message::Fetched { epoch, result }).await;
                        }
                    }));
                }
                Effect::Schedule { epoch, event, after } => {
                    let tx = self.tx.clone();
                    self.replace_pending(tokio::spawn(async move {
                        tokio::time::sleep(after).await;
                        if let Some(tx) = tx.upgrade() {
                            let _ = tx.send(Message::Timer { epoch, event }).await;
                        }
                    }));
                }
            }
        }
    }

    fn replace_pending(&mut self, task: JoinHandle<()>) {
        if let Some(old) = self.pending.replace(task) {
            old.abort();
        }
    }
}

/// Cloneable client for a running session
#[derive(Clone)]
pub struct SessionHandle {
    tx: mpsc::Sender<Message>,
    snapshots: watch::Receiver<Snapshot>,
}

impl SessionHandle {
    pub async fn send(&self, intent: Intent) -> Result<(), SessionError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(Message::Intent(intent, reply_tx))
            .await
            .map_err(|_| SessionError::Closed)?;
        reply_rx.await.map_err(|_| SessionError::Closed)?
    }

    pub async fn submit_url(&self, text: impl Into<String>) -> Result<(), SessionError> {
        self.send(Intent::SubmitUrl(text.into())).await
    }

    pub async fn drop_url(&self, text: impl Into<String>) -> Result<(), SessionError> {
        self.send(Intent::DropUrl(text.into())).await
    }

    pub async fn clear_input(&self) -> Result<(), SessionError> {
        self.send(Intent::ClearInput).await
    }

    pub async fn edit_trim_start(&self, seconds: u32) -> Result<(), SessionError> {
        self.send(Intent::EditTrimStart(seconds)).await
    }

    pub async fn edit_trim_end(&self, seconds: u32) -> Result<(), SessionError> {
        self.send(Intent::EditTrimEnd(seconds)).await
    }

    pub async fn change_format(&self, format: Format) -> Result<(), SessionError> {
        self.send(Intent::ChangeFormat(format)).await
    }

    pub async fn change_quality(&self, value: impl Into<String>) -> Result<(), SessionError> {
        self.send(Intent::ChangeQuality(value.into())).await
    }

    pub async fn start_download(&self) -> Result<(), SessionError> {
        self.send(Intent::StartDownload).await
    }

    pub async fn toggle_theme(&self) -> Result<(), SessionError> {
        self.send(Intent::ToggleTheme).await
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> Snapshot {
        self.snapshots.borrow().clone()
    }

    /// Receiver that is notified on every transition
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshots.clone()
    }

    /// Wait until a snapshot satisfies `predicate`
    pub async fn wait_for(
        &self,
        predicate: impl FnMut(&Snapshot) -> bool,
    ) -> Result<Snapshot, SessionError> {
        let mut rx = self.snapshots.clone();
        let snapshot = rx
            .wait_for(predicate)
            .await
            .map_err(|_| SessionError::Closed)?;
        Ok(snapshot.clone())
    }
}
