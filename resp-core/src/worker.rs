//! # Inference Worker
//!
//! Runs inference calls on a dedicated thread so the UI thread never blocks.
//! The GUI hands jobs over a crossbeam channel and polls for outcomes on its
//! tick, the same way it would poll any other background producer.
//!
//! ## Cancellation
//! Every job gets a request id. Only the most recent id is pending; calling
//! [`InferenceWorker::abandon`] (the user left the upload flow) forgets it.
//! The in-flight call is not aborted, but its outcome is dropped when it
//! arrives because its id no longer matches.

use crate::InferenceResult;
use crate::error::TransportError;
use crate::inference::InferenceClient;
use crate::upload::AcceptedUpload;
use anyhow::{Context, Result};
use crossbeam_channel::{Receiver, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

pub type RequestId = u64;

/// One submission queued for the worker thread.
#[derive(Debug)]
struct InferenceJob {
    id: RequestId,
    upload: AcceptedUpload,
}

/// The outcome of one submission.
#[derive(Debug)]
pub struct InferenceOutcome {
    pub id: RequestId,
    pub result: Result<InferenceResult, TransportError>,
}

/// Handle to the inference thread.
pub struct InferenceWorker {
    job_tx: Sender<InferenceJob>,
    outcome_rx: Receiver<InferenceOutcome>,
    shutdown_tx: Sender<()>,
    thread_handle: Option<JoinHandle<()>>,
    next_id: RequestId,
    pending: Option<RequestId>,
}

impl InferenceWorker {
    /// Starts the worker thread with its own single-threaded tokio runtime.
    pub fn spawn<C>(client: C) -> Result<Self>
    where
        C: InferenceClient + 'static,
    {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("building inference runtime")?;

        let (job_tx, job_rx) = crossbeam_channel::unbounded::<InferenceJob>();
        let (outcome_tx, outcome_rx) = crossbeam_channel::unbounded();
        let (shutdown_tx, shutdown_rx) = crossbeam_channel::bounded(1);

        let thread_handle = thread::Builder::new()
            .name("inference-worker".to_string())
            .spawn(move || {
                tracing::debug!("inference worker started");
                loop {
                    crossbeam_channel::select! {
                        recv(job_rx) -> msg => match msg {
                            Ok(job) => {
                                let result = runtime.block_on(client.submit(&job.upload));
                                if outcome_tx.send(InferenceOutcome { id: job.id, result }).is_err() {
                                    tracing::debug!("outcome receiver dropped");
                                    break;
                                }
                            }
                            Err(_) => break,
                        },
                        recv(shutdown_rx) -> _ => break,
                    }
                }
                tracing::debug!("inference worker finished");
            })
            .context("spawning inference worker thread")?;

        Ok(Self {
            job_tx,
            outcome_rx,
            shutdown_tx,
            thread_handle: Some(thread_handle),
            next_id: 0,
            pending: None,
        })
    }

    /// Queues a submission and makes it the pending request.
    pub fn submit(&mut self, upload: AcceptedUpload) -> Result<RequestId, TransportError> {
        self.next_id += 1;
        let id = self.next_id;
        self.job_tx
            .send(InferenceJob { id, upload })
            .map_err(|_| TransportError::new("Analysis worker is not running."))?;
        self.pending = Some(id);
        Ok(id)
    }

    /// Forgets the pending request; its outcome will be discarded.
    pub fn abandon(&mut self) {
        if let Some(id) = self.pending.take() {
            tracing::debug!(id, "abandoned pending inference");
        }
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    /// Returns the pending request's outcome if it has arrived.
    /// Stale outcomes are drained and dropped.
    pub fn poll(&mut self) -> Option<InferenceOutcome> {
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            if let Some(accepted) = self.accept(outcome) {
                return Some(accepted);
            }
        }
        None
    }

    /// Like [`poll`](Self::poll) but waits up to `timeout` for the outcome.
    pub fn wait(&mut self, timeout: Duration) -> Option<InferenceOutcome> {
        let deadline = std::time::Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(std::time::Instant::now());
            let outcome = self.outcome_rx.recv_timeout(remaining).ok()?;
            if let Some(accepted) = self.accept(outcome) {
                return Some(accepted);
            }
        }
    }

    fn accept(&mut self, outcome: InferenceOutcome) -> Option<InferenceOutcome> {
        if self.pending == Some(outcome.id) {
            self.pending = None;
            Some(outcome)
        } else {
            tracing::debug!(id = outcome.id, "discarding stale inference outcome");
            None
        }
    }

    /// Signals the thread to stop once any in-flight call returns.
    pub fn shutdown(&mut self) {
        let _ = self.shutdown_tx.try_send(());
        // The thread may be blocked on a slow request; detach instead of joining.
        self.thread_handle.take();
    }
}

impl Drop for InferenceWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}
