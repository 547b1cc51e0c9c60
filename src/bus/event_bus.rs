use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use futures::channel::mpsc;
use futures::StreamExt;

use super::stream::EventStream;

/// Hot multicast channel that UI collaborators push events into.
///
/// Every call to [`Bus::stream`] registers a new observer backed by its own
/// unbounded FIFO queue. `push` enqueues the event into every registered queue
/// before returning, so each observer sees every later push exactly once and in
/// push order. Observers registered after a push never see it.
///
/// Cloning a `Bus` yields another handle to the same channel. Derived streams
/// end once the last handle is dropped.
pub struct Bus<T> {
    inner: Arc<BusInner<T>>,
}

struct BusInner<T> {
    name: String,
    observers: Mutex<Vec<mpsc::UnboundedSender<T>>>,
    pushed: AtomicU64,
}

impl<T> Clone for Bus<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> fmt::Debug for Bus<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bus")
            .field("name", &self.inner.name)
            .field("pushed", &self.inner.pushed.load(Ordering::Relaxed))
            .finish()
    }
}

impl<T: Clone + Send + 'static> Bus<T> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(BusInner {
                name: name.into(),
                observers: Mutex::new(Vec::new()),
                pushed: AtomicU64::new(0),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Deliver `event` to every current observer.
    pub fn push(&self, event: T) {
        let seq = self.inner.pushed.fetch_add(1, Ordering::Relaxed);
        let mut observers = self
            .inner
            .observers
            .lock()
            .expect("bus observers mutex poisoned");
        // Dropped streams show up as closed senders; prune them here.
        observers.retain(|tx| tx.unbounded_send(event.clone()).is_ok());
        tracing::trace!(
            "bus '{}' delivered event #{seq} to {} observer(s)",
            self.inner.name,
            observers.len()
        );
    }

    /// Register a new observer and return the stream of events pushed from now on.
    pub fn stream(&self) -> EventStream<T> {
        let (tx, rx) = mpsc::unbounded();
        self.inner
            .observers
            .lock()
            .expect("bus observers mutex poisoned")
            .push(tx);
        rx.boxed()
    }

    /// Number of observers that were still attached at the last push or registration.
    pub fn observer_count(&self) -> usize {
        self.inner
            .observers
            .lock()
            .expect("bus observers mutex poisoned")
            .len()
    }

    /// Total number of events pushed so far.
    pub fn pushed(&self) -> u64 {
        self.inner.pushed.load(Ordering::Relaxed)
    }
}
