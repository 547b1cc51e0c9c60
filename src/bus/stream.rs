//! Combinators that derive new event streams from buses.
//!
//! All combinators are lazy: nothing runs until the resulting stream is polled,
//! and every derived stream only produces values in reaction to upstream pushes.

use std::fmt::Display;
use std::future::{ready, Future};

use futures::stream::{self, BoxStream};
use futures::StreamExt;

/// A derived, composable sequence of events.
pub type EventStream<T> = BoxStream<'static, T>;

/// Emit `f(event)` for every upstream event.
pub fn map<T, U, F>(stream: EventStream<T>, f: F) -> EventStream<U>
where
    T: Send + 'static,
    U: Send + 'static,
    F: FnMut(T) -> U + Send + 'static,
{
    stream.map(f).boxed()
}

/// Emit only the events for which `predicate` holds.
pub fn filter<T, P>(stream: EventStream<T>, mut predicate: P) -> EventStream<T>
where
    T: Send + 'static,
    P: FnMut(&T) -> bool + Send + 'static,
{
    stream.filter(move |event| ready(predicate(event))).boxed()
}

/// Map and filter in one step: `None` drops the event.
pub fn filter_map<T, U, F>(stream: EventStream<T>, mut f: F) -> EventStream<U>
where
    T: Send + 'static,
    U: Send + 'static,
    F: FnMut(T) -> Option<U> + Send + 'static,
{
    stream.filter_map(move |event| ready(f(event))).boxed()
}

/// Run a side effect for every event and pass it through unchanged.
pub fn inspect<T, F>(stream: EventStream<T>, f: F) -> EventStream<T>
where
    T: Send + 'static,
    F: FnMut(&T) + Send + 'static,
{
    stream.inspect(f).boxed()
}

/// Start `f(event)` for every event and emit each successful result as soon as
/// it completes. Results arrive in completion order, not input order. Failed
/// operations are dropped.
pub fn flat_map_async<T, U, E, F, Fut>(stream: EventStream<T>, f: F) -> EventStream<U>
where
    T: Send + 'static,
    U: Send + 'static,
    E: Display + Send + 'static,
    F: FnMut(T) -> Fut + Send + 'static,
    Fut: Future<Output = Result<U, E>> + Send + 'static,
{
    flat_map_async_reporting(stream, f, |error: E| {
        tracing::debug!("async operation failed, dropping it: {error}");
    })
}

/// Like [`flat_map_async`], but hands every failure to `on_error` instead of
/// dropping it silently.
pub fn flat_map_async_reporting<T, U, E, F, Fut, R>(
    stream: EventStream<T>,
    f: F,
    mut on_error: R,
) -> EventStream<U>
where
    T: Send + 'static,
    U: Send + 'static,
    E: Send + 'static,
    F: FnMut(T) -> Fut + Send + 'static,
    Fut: Future<Output = Result<U, E>> + Send + 'static,
    R: FnMut(E) + Send + 'static,
{
    stream
        .map(f)
        // No concurrency cap: every submission is in flight at once.
        .buffer_unordered(usize::MAX)
        .filter_map(move |result| {
            ready(match result {
                Ok(value) => Some(value),
                Err(error) => {
                    on_error(error);
                    None
                }
            })
        })
        .boxed()
}

/// Interleave all `streams` in the order their events are produced.
pub fn merge<T>(streams: impl IntoIterator<Item = EventStream<T>>) -> EventStream<T>
where
    T: Send + 'static,
{
    stream::select_all(streams).boxed()
}
