//! Folds events from many streams into one ordered stream of state snapshots.

use std::future::ready;
use std::sync::Arc;

use futures::stream;
use futures::StreamExt;

use crate::bus::EventStream;

type Transition<S> = Box<dyn FnOnce(&S) -> S + Send>;

/// Builder that pairs event streams with the reducer responsible for them.
///
/// Each `(stream, reducer)` pair is turned into a stream of transitions that
/// only ever apply that pair's reducer. [`Accumulator::fold`] merges all
/// transition streams and scans over them, so every event from every source is
/// applied exactly once, in the order the merge observes them.
pub struct Accumulator<S> {
    sources: Vec<EventStream<Transition<S>>>,
}

impl<S: Clone + Send + 'static> Default for Accumulator<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Clone + Send + 'static> Accumulator<S> {
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    /// Register `reducer` for every event of `events`.
    pub fn on<E, R>(mut self, events: EventStream<E>, reducer: R) -> Self
    where
        E: Send + 'static,
        R: Fn(&S, E) -> S + Send + Sync + 'static,
    {
        let reducer = Arc::new(reducer);
        let transitions = events
            .map(move |event| {
                let reducer = reducer.clone();
                Box::new(move |state: &S| (*reducer)(state, event)) as Transition<S>
            })
            .boxed();
        self.sources.push(transitions);
        self
    }

    /// Produce the live sequence of snapshots: `initial` first, then one new
    /// snapshot per event observed on any registered stream.
    pub fn fold(self, initial: S) -> EventStream<S> {
        let updates = stream::select_all(self.sources).scan(
            initial.clone(),
            |state, transition: Transition<S>| {
                let next = transition(&*state);
                *state = next.clone();
                ready(Some(next))
            },
        );
        stream::once(ready(initial)).chain(updates).boxed()
    }
}

#[cfg(test)]
mod tests {
    use futures::StreamExt;

    use super::Accumulator;
    use crate::bus::Bus;

    #[derive(Debug, Clone, PartialEq, Eq, Default)]
    struct Tally {
        total: i64,
        labels: Vec<String>,
    }

    #[tokio::test]
    async fn emits_initial_state_then_one_snapshot_per_event() {
        let numbers = Bus::new("numbers");
        let labels = Bus::new("labels");

        let states = Accumulator::new()
            .on(numbers.stream(), |state: &Tally, n: i64| Tally {
                total: state.total + n,
                ..state.clone()
            })
            .on(labels.stream(), |state: &Tally, label: String| {
                let mut next = state.clone();
                next.labels.push(label);
                next
            })
            .fold(Tally::default());

        numbers.push(2);
        labels.push("a".to_string());
        numbers.push(3);
        drop(numbers);
        drop(labels);

        let snapshots: Vec<Tally> = states.collect().await;
        assert_eq!(snapshots.len(), 4);
        assert_eq!(snapshots[0], Tally::default());

        let last = snapshots.last().unwrap();
        assert_eq!(last.total, 5);
        assert_eq!(last.labels, vec!["a".to_string()]);
    }

    #[tokio::test]
    async fn reducers_only_see_events_from_their_own_stream() {
        let adds = Bus::new("adds");
        let subs = Bus::new("subs");

        let states = Accumulator::new()
            .on(adds.stream(), |total: &i64, n: i64| total + n)
            .on(subs.stream(), |total: &i64, n: i64| total - n)
            .fold(0);

        adds.push(10);
        subs.push(4);
        adds.push(1);
        drop(adds);
        drop(subs);

        let snapshots: Vec<i64> = states.collect().await;
        assert_eq!(snapshots.first(), Some(&0));
        assert_eq!(snapshots.last(), Some(&7));
        assert_eq!(snapshots.len(), 4);
    }

    #[tokio::test]
    async fn without_sources_only_the_initial_state_is_emitted() {
        let states = Accumulator::<u8>::new().fold(42);
        assert_eq!(states.collect::<Vec<_>>().await, vec![42]);
    }

    #[tokio::test]
    async fn earlier_snapshots_are_never_mutated() {
        let bus = Bus::new("items");
        let mut states = Accumulator::new()
            .on(bus.stream(), |items: &Vec<u8>, item: u8| {
                let mut next = items.clone();
                next.push(item);
                next
            })
            .fold(Vec::new());

        let initial = states.next().await.unwrap();
        bus.push(1);
        let after_one = states.next().await.unwrap();
        bus.push(2);
        let after_two = states.next().await.unwrap();

        assert!(initial.is_empty());
        assert_eq!(after_one, vec![1]);
        assert_eq!(after_two, vec![1, 2]);
    }
}
