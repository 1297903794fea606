use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::model::Resource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum EventKind {
    Created,
    /// The observable state changed between two polls.
    Updated,
    Deleted,
}

#[derive(Debug, Clone)]
pub struct WatchEvent<R: Resource> {
    pub kind: EventKind,
    pub id: R::Id,
    pub old_state: Option<R::State>,
    pub new_state: Option<R::State>,
    pub timestamp: DateTime<Utc>,
    /// Latest known copy; for `Deleted` this is the last one seen.
    pub object: Option<R>,
}

#[derive(Debug, Clone)]
pub struct WatchOptions<R: Resource> {
    pub filter: R::ListOptions,
    /// Falls back to the client's configured interval.
    pub poll_interval: Option<Duration>,
    /// Falls back to the client's configured channel capacity.
    pub buffer: Option<usize>,
    /// Stops the watch after this many delivered events.
    pub max_events: Option<usize>,
    /// Only these kinds are delivered; empty means all.
    pub kinds: Vec<EventKind>,
}

impl<R: Resource> Default for WatchOptions<R> {
    fn default() -> Self {
        Self {
            filter: R::ListOptions::default(),
            poll_interval: None,
            buffer: None,
            max_events: None,
            kinds: Vec::new(),
        }
    }
}

impl<R: Resource> WatchOptions<R> {
    pub fn with_filter(filter: R::ListOptions) -> Self {
        Self {
            filter,
            ..Default::default()
        }
    }

    pub fn accepts(&self, kind: EventKind) -> bool {
        self.kinds.is_empty() || self.kinds.contains(&kind)
    }
}
