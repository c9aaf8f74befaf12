//! Editor autosave.
//!
//! Field changes restart a quiet-period timer. When it fires, the latest
//! values are written to a single snapshot slot, replacing whatever was
//! there. Only the newest snapshot survives.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::fs;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::common::SnapshotError;
use crate::models::{ArticleKey, DraftSnapshot, SnapshotFields};

/// Single-slot snapshot storage.
#[async_trait]
pub trait SnapshotStore: Send + Sync + 'static {
    async fn save(&self, snapshot: &DraftSnapshot) -> Result<(), SnapshotError>;

    async fn load(&self) -> Result<Option<DraftSnapshot>, SnapshotError>;

    async fn clear(&self) -> Result<(), SnapshotError>;
}

/// Keeps the slot in one JSON file.
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    path: PathBuf,
}

impl FileSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SnapshotStore for FileSnapshotStore {
    async fn save(&self, snapshot: &DraftSnapshot) -> Result<(), SnapshotError> {
        let bytes = serde_json::to_vec_pretty(snapshot)?;

        // A crash mid-write must never leave half a snapshot in the slot.
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, bytes).await?;
        fs::rename(&tmp, &self.path).await?;

        Ok(())
    }

    async fn load(&self) -> Result<Option<DraftSnapshot>, SnapshotError> {
        match fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn clear(&self) -> Result<(), SnapshotError> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    slot: Mutex<Option<DraftSnapshot>>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SnapshotStore for MemorySnapshotStore {
    async fn save(&self, snapshot: &DraftSnapshot) -> Result<(), SnapshotError> {
        *self
            .slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) =
            Some(snapshot.clone());
        Ok(())
    }

    async fn load(&self) -> Result<Option<DraftSnapshot>, SnapshotError> {
        Ok(self
            .slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone())
    }

    async fn clear(&self) -> Result<(), SnapshotError> {
        self.slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        Ok(())
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum AutosaveStatus {
    /// Nothing tracked yet.
    Idle,
    /// Changes waiting for the quiet period to pass.
    Pending,
    Saved { at: DateTime<Utc> },
    /// The last write failed; the editor shows "unsaved".
    Unsaved { reason: String },
}

enum Command {
    Track(SnapshotFields),
    Flush(oneshot::Sender<()>),
}

/// A debounced autosave loop for one editor.
pub struct AutosaveSession {
    key: ArticleKey,
    commands: mpsc::UnboundedSender<Command>,
    status: watch::Receiver<AutosaveStatus>,
    task: JoinHandle<()>,
}

impl AutosaveSession {
    pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_secs(2);

    pub fn start<T: SnapshotStore>(
        key: ArticleKey,
        store: Arc<T>,
        quiet_period: Duration,
    ) -> Self {
        let (commands, rx) = mpsc::unbounded_channel();
        let (status_tx, status) = watch::channel(AutosaveStatus::Idle);

        let task = tokio::spawn(run_session(
            key,
            store,
            quiet_period,
            rx,
            status_tx,
        ));

        Self {
            key,
            commands,
            status,
            task,
        }
    }

    pub fn key(&self) -> ArticleKey {
        self.key
    }

    /// Records the current field values and restarts the quiet period.
    pub fn track(&self, fields: SnapshotFields) {
        if self.commands.send(Command::Track(fields)).is_err() {
            log::warn!("Autosave session for {} is closed", self.key);
        }
    }

    /// Writes any pending change now.
    pub async fn flush(&self) {
        let (ack, done) = oneshot::channel();
        if self.commands.send(Command::Flush(ack)).is_ok() {
            let _ = done.await;
        }
    }

    pub fn status(&self) -> AutosaveStatus {
        self.status.borrow().clone()
    }

    /// Flushes pending changes and stops the session.
    pub async fn close(self) {
        let Self { commands, task, .. } = self;
        drop(commands);

        if let Err(e) = task.await {
            log::error!("Autosave task failed: {}", e);
        }
    }
}

async fn run_session<T: SnapshotStore>(
    key: ArticleKey,
    store: Arc<T>,
    quiet_period: Duration,
    mut rx: mpsc::UnboundedReceiver<Command>,
    status: watch::Sender<AutosaveStatus>,
) {
    let mut pending: Option<SnapshotFields> = None;

    loop {
        let command = if pending.is_some() {
            match tokio::time::timeout(quiet_period, rx.recv()).await {
                Ok(command) => command,
                Err(_elapsed) => {
                    if let Some(fields) = pending.take() {
                        write_snapshot(key, store.as_ref(), fields, &status).await;
                    }
                    continue;
                }
            }
        } else {
            rx.recv().await
        };

        match command {
            Some(Command::Track(fields)) => {
                pending = Some(fields);
                status.send_replace(AutosaveStatus::Pending);
            }
            Some(Command::Flush(ack)) => {
                if let Some(fields) = pending.take() {
                    write_snapshot(key, store.as_ref(), fields, &status).await;
                }
                let _ = ack.send(());
            }
            None => {
                if let Some(fields) = pending.take() {
                    write_snapshot(key, store.as_ref(), fields, &status).await;
                }
                break;
            }
        }
    }
}

async fn write_snapshot<T: SnapshotStore + ?Sized>(
    key: ArticleKey,
    store: &T,
    fields: SnapshotFields,
    status: &watch::Sender<AutosaveStatus>,
) {
    let snapshot = DraftSnapshot {
        article_key: key,
        fields,
        saved_at: Utc::now(),
    };

    match store.save(&snapshot).await {
        Ok(()) => {
            log::debug!("Autosaved {} at {}", key, snapshot.saved_at);
            status.send_replace(AutosaveStatus::Saved {
                at: snapshot.saved_at,
            });
        }
        Err(e) => {
            log::warn!("Autosave for {} failed: {}", key, e);
            status.send_replace(AutosaveStatus::Unsaved {
                reason: e.to_string(),
            });
        }
    }
}

/// Reads back the slot if it belongs to `key`.
pub async fn restore<T: SnapshotStore + ?Sized>(
    store: &T,
    key: &ArticleKey,
) -> Result<Option<DraftSnapshot>, SnapshotError> {
    Ok(store.load().await?.filter(|snapshot| snapshot.belongs_to(key)))
}
