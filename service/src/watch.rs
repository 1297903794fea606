use std::collections::{BTreeMap, BTreeSet};
use std::future::Future;
use std::ops::ControlFlow;
use std::time::Duration;

use chrono::Utc;
use domain::model::vo::{EventKind, WatchEvent};
use domain::model::Resource;
use domain::Result;
use infrastructure::sync::timer;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);
pub const DEFAULT_BUFFER: usize = 16;

/// Poll interval and channel capacity used when a watch does not set its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchDefaults {
    pub poll_interval: Duration,
    pub buffer: usize,
}

impl Default for WatchDefaults {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            buffer: DEFAULT_BUFFER,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PollerConfig {
    pub interval: Duration,
    pub buffer: usize,
    pub max_events: Option<usize>,
    /// Empty delivers every kind.
    pub kinds: Vec<EventKind>,
}

pub type Snapshot<R> = BTreeMap<<R as Resource>::Id, R>;

/// Starts a diff-over-poll loop and returns the receiving end of its events.
///
/// The first successful `list` only records a baseline. The channel closes
/// when `cancel` fires, when the receiver is dropped or after `max_events`
/// deliveries.
pub fn spawn<R, L, Fut>(
    list: L,
    config: PollerConfig,
    cancel: CancellationToken,
) -> mpsc::Receiver<WatchEvent<R>>
where
    R: Resource,
    L: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = Result<Vec<R>>> + Send,
{
    let (tx, rx) = mpsc::channel(config.buffer.max(1));
    let span = tracing::debug_span!("watch", resource = %R::KIND);
    let interval = config.interval;

    let poller = Poller {
        list,
        tx,
        snapshot: None,
        delivered: 0,
        max_events: config.max_events,
        kinds: config.kinds,
    };

    tokio::spawn(
        async move {
            match timer::new(interval, &cancel, poller, Poller::tick).await {
                None => tracing::debug!("Watch cancelled"),
                Some(Stop::ConsumerGone) => tracing::debug!("Watch receiver dropped"),
                Some(Stop::MaxEvents(n)) => {
                    tracing::debug!(delivered = n, "Watch reached its event limit")
                }
            }
        }
        .instrument(span),
    );

    rx
}

/// Events turning `previous` into `current`, in ascending id order.
pub fn diff<R: Resource>(previous: &Snapshot<R>, current: &Snapshot<R>) -> Vec<WatchEvent<R>> {
    let timestamp = Utc::now();
    let ids: BTreeSet<&R::Id> = previous.keys().chain(current.keys()).collect();

    ids.into_iter()
        .filter_map(|id| {
            let (kind, old, new) = match (previous.get(id), current.get(id)) {
                (None, Some(new)) => (EventKind::Created, None, Some(new)),
                (Some(old), None) => (EventKind::Deleted, Some(old), None),
                (Some(old), Some(new)) if old.observed_state() != new.observed_state() => {
                    (EventKind::Updated, Some(old), Some(new))
                }
                _ => return None,
            };
            Some(WatchEvent {
                kind,
                id: id.clone(),
                old_state: old.map(Resource::observed_state),
                new_state: new.map(Resource::observed_state),
                timestamp,
                object: new.or(old).cloned(),
            })
        })
        .collect()
}

enum Stop {
    ConsumerGone,
    MaxEvents(usize),
}

struct Poller<R: Resource, L> {
    list: L,
    tx: mpsc::Sender<WatchEvent<R>>,
    snapshot: Option<Snapshot<R>>,
    delivered: usize,
    max_events: Option<usize>,
    kinds: Vec<EventKind>,
}

impl<R, L, Fut> Poller<R, L>
where
    R: Resource,
    L: FnMut() -> Fut,
    Fut: Future<Output = Result<Vec<R>>>,
{
    async fn tick(mut self) -> ControlFlow<Stop, Self> {
        let items = match (self.list)().await {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!(
                    cause = %e,
                    retryable = e.is_retryable(),
                    "Watch poll failed, skipping tick"
                );
                return ControlFlow::Continue(self);
            }
        };
        let current: Snapshot<R> = items.into_iter().map(|item| (item.id(), item)).collect();

        let Some(previous) = self.snapshot.take() else {
            tracing::debug!(items = current.len(), "Watch baseline recorded");
            self.snapshot = Some(current);
            return ControlFlow::Continue(self);
        };
        let events = diff(&previous, &current);
        self.snapshot = Some(current);

        for event in events {
            if !self.kinds.is_empty() && !self.kinds.contains(&event.kind) {
                continue;
            }
            if self.tx.send(event).await.is_err() {
                return ControlFlow::Break(Stop::ConsumerGone);
            }
            self.delivered += 1;
            if self.max_events.is_some_and(|max| self.delivered >= max) {
                return ControlFlow::Break(Stop::MaxEvents(self.delivered));
            }
        }

        ControlFlow::Continue(self)
    }
}
