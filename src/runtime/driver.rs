use std::fmt::Debug;

use futures::StreamExt;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::bus::EventStream;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("state stream ended before producing an initial state")]
    NoInitialState,
    #[error("state driver task failed: {0}")]
    Join(String),
}

/// Owns the task that consumes a page's state stream.
///
/// Every snapshot is logged, handed to `on_snapshot` (typically render and
/// display) exactly once, and then published as the latest state.
pub struct StateDriver<S> {
    snapshots: watch::Receiver<S>,
    task: JoinHandle<u64>,
}

impl<S> StateDriver<S>
where
    S: Clone + Debug + Send + Sync + 'static,
{
    /// Wait for the initial snapshot, then keep driving `states` in a spawned task.
    pub async fn start<F>(mut states: EventStream<S>, mut on_snapshot: F) -> Result<Self, RuntimeError>
    where
        F: FnMut(&S) + Send + 'static,
    {
        let initial = states.next().await.ok_or(RuntimeError::NoInitialState)?;
        tracing::debug!("application state #1: {initial:?}");
        on_snapshot(&initial);

        let (tx, snapshots) = watch::channel(initial);
        let task = tokio::spawn(async move {
            let mut seen = 1u64;
            while let Some(state) = states.next().await {
                seen += 1;
                tracing::debug!("application state #{seen}: {state:?}");
                on_snapshot(&state);
                tx.send_replace(state);
            }
            tracing::debug!("state stream ended after {seen} snapshot(s)");
            seen
        });

        Ok(Self { snapshots, task })
    }

    /// The most recent snapshot.
    pub fn latest(&self) -> S {
        self.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<S> {
        self.snapshots.clone()
    }

    /// Wait until the latest snapshot satisfies `predicate`.
    ///
    /// Returns `None` if the stream ended without ever satisfying it.
    pub async fn wait_until(&mut self, predicate: impl Fn(&S) -> bool) -> Option<S> {
        loop {
            {
                let current = self.snapshots.borrow_and_update();
                if predicate(&current) {
                    return Some(current.clone());
                }
            }
            if self.snapshots.changed().await.is_err() {
                let current = self.snapshots.borrow();
                return predicate(&current).then(|| current.clone());
            }
        }
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Abort the driver task.
    pub fn stop(self) {
        self.task.abort();
    }

    /// Wait for the state stream to end; returns the number of snapshots seen.
    pub async fn join(self) -> Result<u64, RuntimeError> {
        self.task
            .await
            .map_err(|error| RuntimeError::Join(error.to_string()))
    }
}
