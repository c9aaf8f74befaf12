//! Background promotion of scheduled articles.
//!
//! Editors can schedule an article for a future time; this job is what
//! actually flips it live once that time has passed.

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use uuid::Uuid;

use std::sync::Arc;
use std::time::Duration;

use crate::common::ArticleError;
use crate::db::ArticleStore;

/// One reconciliation pass: publishes every article whose schedule is due.
pub async fn promote_due<S: ArticleStore + ?Sized>(
    store: &S,
    now: DateTime<Utc>,
) -> Result<Vec<Uuid>, ArticleError> {
    let promoted = store.promote_due(now).await?;

    if !promoted.is_empty() {
        log::info!(
            "Promoted {} scheduled article(s): {:?}",
            promoted.len(),
            promoted
        );
    }

    Ok(promoted)
}

pub struct PromotionScheduler<S: ArticleStore> {
    store: Arc<S>,
    interval: Duration,
}

impl<S: ArticleStore> PromotionScheduler<S> {
    pub fn new(store: Arc<S>, interval: Duration) -> Self {
        Self { store, interval }
    }

    /// Runs until `shutdown` turns true or its sender is dropped. The first
    /// pass happens immediately.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        log::info!(
            "Promotion scheduler started, interval {:?}",
            self.interval
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = promote_due(self.store.as_ref(), Utc::now()).await {
                        log::error!("Scheduled promotion failed: {}", e);
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        log::info!("Promotion scheduler stopped");
    }

    pub fn spawn(self) -> SchedulerHandle {
        let (tx, rx) = watch::channel(false);
        let task = tokio::spawn(self.run(rx));

        SchedulerHandle { shutdown: tx, task }
    }
}

pub struct SchedulerHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Signals the job to stop and waits for the current pass to finish.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);

        if let Err(e) = self.task.await {
            log::error!("Promotion scheduler task failed: {}", e);
        }
    }
}
