//! Buffered visit writer
//!
//! Incoming visits go through a bounded mpsc channel to a single actor task
//! that owns the write buffer, so request handlers never wait on the
//! database. The actor appends buffered visits to the event store when the
//! batch size is reached, on a fixed interval, and on explicit flush or
//! shutdown requests. Arrival order is preserved, so store ids follow
//! ingestion order.

use anyhow::{anyhow, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::config::RecorderConfig;
use crate::models::NewVisit;
use crate::storage::EventStore;

/// Message types for the RecorderActor
enum ActorMessage {
    Record(NewVisit),
    /// Write everything buffered so far, then report the outcome
    Flush(oneshot::Sender<Result<()>>),
    /// Final flush, then stop
    Shutdown(oneshot::Sender<Result<()>>),
}

struct RecorderActor {
    receiver: mpsc::Receiver<ActorMessage>,
    buffer: Vec<NewVisit>,
    store: Arc<dyn EventStore>,
    batch_size: usize,
    /// Upper bound on visits kept for retry after a failed flush
    max_buffered: usize,
    flush_interval: Duration,
    /// Set after a failed flush; size-triggered flushes wait for the next tick
    retry_pending: bool,
}

impl RecorderActor {
    async fn run(mut self) {
        let mut flush_ticker = tokio::time::interval(self.flush_interval);

        // Skip the first tick which fires immediately
        flush_ticker.tick().await;

        loop {
            tokio::select! {
                msg = self.receiver.recv() => {
                    match msg {
                        Some(ActorMessage::Record(visit)) => {
                            self.buffer.push(visit);
                            if self.buffer.len() >= self.batch_size && !self.retry_pending {
                                let _ = self.flush().await;
                            }
                        }
                        Some(ActorMessage::Flush(ack)) => {
                            let _ = ack.send(self.flush().await);
                        }
                        Some(ActorMessage::Shutdown(ack)) => {
                            info!("Visit recorder received shutdown signal, flushing...");
                            let _ = ack.send(self.flush().await);
                            break;
                        }
                        None => {
                            warn!("Visit recorder channel closed unexpectedly, flushing...");
                            let _ = self.flush().await;
                            break;
                        }
                    }
                }
                _ = flush_ticker.tick() => {
                    let _ = self.flush().await;
                }
            }
        }
    }

    async fn flush(&mut self) -> Result<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }

        let batch = std::mem::take(&mut self.buffer);
        match self.store.append_visits(&batch).await {
            Ok(written) => {
                debug!(written, "Flushed visit batch");
                self.retry_pending = false;
                Ok(())
            }
            Err(e) => {
                let pending = batch.len();
                if pending <= self.max_buffered {
                    error!(error = %e, visits = pending, "Failed to flush visits, will retry");
                    self.buffer = batch;
                    self.retry_pending = true;
                } else {
                    error!(error = %e, visits = pending, "Failed to flush visits, dropping batch");
                    self.retry_pending = false;
                }
                Err(e.context(format!("failed to write {pending} buffered visits")))
            }
        }
    }
}

/// Handle to the recorder actor
pub struct VisitRecorder {
    actor_tx: mpsc::Sender<ActorMessage>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl VisitRecorder {
    /// Spawn the recorder actor on the current tokio runtime
    pub fn new(store: Arc<dyn EventStore>, config: &RecorderConfig) -> Self {
        let (actor_tx, actor_rx) = mpsc::channel(config.buffer_size.max(1));

        let actor = RecorderActor {
            receiver: actor_rx,
            buffer: Vec::with_capacity(config.batch_size),
            store,
            batch_size: config.batch_size.max(1),
            max_buffered: config.buffer_size.max(config.batch_size),
            flush_interval: Duration::from_millis(config.flush_interval_ms.max(1)),
            retry_pending: false,
        };

        let task = tokio::spawn(async move {
            actor.run().await;
        });

        Self {
            actor_tx,
            task: Mutex::new(Some(task)),
        }
    }

    /// Queue a visit without waiting for the database
    ///
    /// Returns `false` when the visit was dropped because the channel is full
    /// or the recorder has stopped.
    pub fn record(&self, visit: NewVisit) -> bool {
        match self.actor_tx.try_send(ActorMessage::Record(visit)) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!("Visit buffer full, dropping visit");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                warn!("Visit recorder stopped, dropping visit");
                false
            }
        }
    }

    /// Wait until every visit queued before this call has been written
    ///
    /// Fails when the store rejected the batch. The visits stay buffered, up
    /// to the configured buffer size, and are retried on the next flush.
    pub async fn flush(&self) -> Result<()> {
        let (ack_tx, ack_rx) = oneshot::channel();
        self.actor_tx
            .send(ActorMessage::Flush(ack_tx))
            .await
            .map_err(|_| anyhow!("visit recorder is not running"))?;
        ack_rx
            .await
            .map_err(|_| anyhow!("visit recorder stopped before flushing"))?
    }

    /// Flush pending visits and stop the actor
    ///
    /// Returns the error of the final flush; visits it could not write are
    /// lost. Calling this on a stopped recorder is a no-op.
    pub async fn shutdown(&self) -> Result<()> {
        let (ack_tx, ack_rx) = oneshot::channel();
        let flushed = match self.actor_tx.send(ActorMessage::Shutdown(ack_tx)).await {
            Ok(()) => ack_rx
                .await
                .unwrap_or_else(|_| Err(anyhow!("visit recorder stopped before flushing"))),
            Err(_) => Ok(()),
        };

        if let Some(task) = self.task.lock().await.take() {
            if let Err(e) = task.await {
                error!("Visit recorder task failed: {}", e);
            }
        }

        flushed
    }
}
