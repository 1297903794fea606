use std::sync::Arc;

use domain::model::entity::{Job, JobSubmitResponse, Node, NodeStateChange, NodeUpdate};
use domain::model::vo::{List, Operation, WatchEvent, WatchOptions};
use domain::model::{Filter, Patch, Resource};
use domain::service::{Adapted, ResourceAdapter, VersionAdapter};
use domain::{Error, Result};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::watch::{self, PollerConfig, WatchDefaults};

/// Version-neutral entry point for one resource kind.
pub struct ResourceManager<R: Adapted> {
    version: Arc<dyn VersionAdapter>,
    adapter: Arc<dyn ResourceAdapter<R>>,
    defaults: WatchDefaults,
}

pub type JobManager = ResourceManager<Job>;
pub type NodeManager = ResourceManager<Node>;

impl<R: Adapted> Clone for ResourceManager<R> {
    fn clone(&self) -> Self {
        Self {
            version: self.version.clone(),
            adapter: self.adapter.clone(),
            defaults: self.defaults,
        }
    }
}

impl<R: Adapted> ResourceManager<R> {
    pub fn new(version: Arc<dyn VersionAdapter>, defaults: WatchDefaults) -> Self {
        let adapter = R::adapter(version.as_ref());
        Self {
            version,
            adapter,
            defaults,
        }
    }

    pub fn supports(&self, operation: Operation) -> bool {
        self.version.capabilities().supports(R::KIND, operation)
    }

    pub async fn list(&self, options: &R::ListOptions) -> Result<List<R>> {
        self.adapter.list(options).await
    }

    pub async fn get(&self, id: &R::Id) -> Result<R> {
        self.adapter.get(id).await
    }

    pub async fn create(&self, create: &R::Create) -> Result<R::CreateResponse> {
        self.adapter.create(create).await
    }

    /// An empty patch is refused here; an unsupported update is left to the
    /// adapter so the caller sees `UnsupportedOperation` either way.
    pub async fn update(&self, id: &R::Id, update: &R::Update) -> Result<()> {
        if update.is_empty() && self.supports(Operation::Update) {
            return Err(Error::validation(format!("update of {} {id} sets no fields", R::KIND)));
        }
        self.adapter.update(id, update).await
    }

    pub async fn delete(&self, id: &R::Id) -> Result<()> {
        self.adapter.delete(id).await
    }

    /// Polls `list` with `options.filter` and streams the differences until
    /// `cancel` fires or the receiver is dropped. Must be called inside a
    /// Tokio runtime.
    pub fn watch(
        &self,
        options: WatchOptions<R>,
        cancel: CancellationToken,
    ) -> Result<mpsc::Receiver<WatchEvent<R>>> {
        let interval = options.poll_interval.unwrap_or(self.defaults.poll_interval);
        let buffer = options.buffer.unwrap_or(self.defaults.buffer);
        if interval.is_zero() {
            return Err(Error::validation("watch poll interval must be positive"));
        }
        if buffer == 0 {
            return Err(Error::validation("watch buffer must hold at least one event"));
        }
        if options.max_events == Some(0) {
            return Err(Error::validation("watch max_events must be positive"));
        }

        let adapter = self.adapter.clone();
        // Diffing one page would report items paging out as deleted.
        let filter = options.filter.unpaged();
        let list = move || {
            let adapter = adapter.clone();
            let filter = filter.clone();
            async move { adapter.list(&filter).await.map(|list| list.items) }
        };
        let config = PollerConfig {
            interval,
            buffer,
            max_events: options.max_events,
            kinds: options.kinds,
        };

        tracing::debug!(
            resource = %R::KIND,
            version = %self.version.version(),
            ?interval,
            "Starting watch"
        );
        Ok(watch::spawn(list, config, cancel))
    }
}

impl ResourceManager<Job> {
    pub async fn submit(&self, create: &<Job as Resource>::Create) -> Result<JobSubmitResponse> {
        self.create(create).await
    }

    pub async fn cancel(&self, job_id: u32, signal: Option<&str>) -> Result<()> {
        self.version.job_control().cancel(job_id, signal).await
    }

    pub async fn signal(&self, job_id: u32, signal: &str) -> Result<()> {
        if signal.trim().is_empty() {
            return Err(Error::validation("signal name must not be empty"));
        }
        self.version.job_control().signal(job_id, signal).await
    }

    pub async fn requeue(&self, job_id: u32) -> Result<()> {
        self.version.job_control().requeue(job_id).await
    }

    pub async fn hold(&self, job_id: u32) -> Result<()> {
        self.version.job_control().hold(job_id).await
    }

    pub async fn release(&self, job_id: u32) -> Result<()> {
        self.version.job_control().release(job_id).await
    }
}

impl ResourceManager<Node> {
    pub async fn drain(&self, name: &str, reason: &str) -> Result<()> {
        if reason.trim().is_empty() {
            return Err(Error::validation("draining a node requires a reason"));
        }
        let update = NodeUpdate {
            state: Some(NodeStateChange::Drain),
            reason: Some(reason.to_owned()),
            ..Default::default()
        };
        self.update(&name.to_owned(), &update).await
    }

    pub async fn resume(&self, name: &str) -> Result<()> {
        let update = NodeUpdate {
            state: Some(NodeStateChange::Resume),
            ..Default::default()
        };
        self.update(&name.to_owned(), &update).await
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use domain::model::entity::{JobListOptions, JobState, JobUpdate};
    use domain::model::vo::{EventKind, ResourceKind};
    use domain::ErrorKind;

    use super::*;
    use crate::testing::{job, MemoryVersion, READ_ONLY};

    fn manager(version: &Arc<MemoryVersion>) -> JobManager {
        ResourceManager::new(version.clone(), WatchDefaults::default())
    }

    #[tokio::test]
    async fn list_filters_then_pages() {
        let version = MemoryVersion::with_jobs(vec![
            job(1, JobState::Running),
            job(2, JobState::Pending),
            job(3, JobState::Running),
            job(4, JobState::Running),
        ]);
        let options = JobListOptions {
            states: vec![JobState::Running],
            offset: 1,
            limit: Some(5),
            ..Default::default()
        };
        let list = manager(&version).list(&options).await.unwrap();
        assert_eq!(list.total, 3);
        let ids: Vec<u32> = list.items.iter().map(|j| j.job_id).collect();
        assert_eq!(ids, [3, 4]);
    }

    #[tokio::test]
    async fn empty_update_is_rejected_locally() {
        let version = MemoryVersion::with_jobs(vec![job(1, JobState::Running)]);
        let err = manager(&version).update(&1, &JobUpdate::default()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationFailed);
        assert_eq!(version.update_calls(), 0);
    }

    #[tokio::test]
    async fn unsupported_update_wins_over_empty_patch() {
        let version = MemoryVersion::new(Vec::new(), READ_ONLY);
        let err = manager(&version).update(&1, &JobUpdate::default()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedOperation);
        assert!(!manager(&version).supports(Operation::Update));
        assert!(manager(&version).supports(Operation::Watch));
    }

    #[tokio::test]
    async fn hold_goes_through_job_control() {
        let version = MemoryVersion::with_jobs(vec![job(9, JobState::Pending)]);
        manager(&version).hold(9).await.unwrap();
        assert_eq!(version.update_calls(), 1);
    }

    #[tokio::test]
    async fn requeue_puts_the_job_back() {
        let version = MemoryVersion::with_jobs(vec![job(4, JobState::Running)]);
        manager(&version).requeue(4).await.unwrap();
        assert_eq!(manager(&version).get(&4).await.unwrap().state, JobState::Pending);

        let err = manager(&version).requeue(5).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let read_only = MemoryVersion::new(vec![job(4, JobState::Running)], READ_ONLY);
        let err = manager(&read_only).requeue(4).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedOperation);
    }

    #[tokio::test]
    async fn watch_validates_options() {
        let version = MemoryVersion::with_jobs(Vec::new());
        let options = WatchOptions::<Job> {
            poll_interval: Some(Duration::ZERO),
            ..Default::default()
        };
        let err = manager(&version).watch(options, CancellationToken::new()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationFailed);
    }

    #[tokio::test(start_paused = true)]
    async fn watch_follows_backend() {
        let version = MemoryVersion::with_jobs(vec![job(1, JobState::Pending)]);
        let options = WatchOptions::<Job> {
            poll_interval: Some(Duration::from_millis(50)),
            ..Default::default()
        };
        let cancel = CancellationToken::new();
        let mut rx = manager(&version).watch(options, cancel.clone()).unwrap();

        // Let the baseline poll happen before the backend changes.
        tokio::time::sleep(Duration::from_millis(10)).await;
        version.set_jobs(vec![job(1, JobState::Running)]);

        let event = rx.recv().await.unwrap();
        assert_eq!(event.kind, EventKind::Updated);
        assert_eq!(event.new_state, Some(JobState::Running));
        assert_eq!(Job::KIND, ResourceKind::Job);

        cancel.cancel();
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn watch_sees_past_the_page_window() {
        let version =
            MemoryVersion::with_jobs(vec![job(1, JobState::Running), job(2, JobState::Running)]);
        let options = WatchOptions::<Job> {
            filter: JobListOptions {
                limit: Some(1),
                offset: 0,
                ..Default::default()
            },
            poll_interval: Some(Duration::from_millis(50)),
            ..Default::default()
        };
        let cancel = CancellationToken::new();
        let mut rx = manager(&version).watch(options, cancel.clone()).unwrap();

        tokio::time::sleep(Duration::from_millis(10)).await;
        version.set_jobs(vec![
            job(1, JobState::Running),
            job(2, JobState::Completed),
            job(3, JobState::Pending),
        ]);

        let first = tokio::time::timeout(Duration::from_secs(1), rx.recv()).await.unwrap().unwrap();
        assert_eq!((first.kind, first.id), (EventKind::Updated, 2));
        let second = rx.recv().await.unwrap();
        assert_eq!((second.kind, second.id), (EventKind::Created, 3));
        cancel.cancel();
    }

    #[tokio::test]
    async fn drain_needs_reason() {
        let version = MemoryVersion::with_jobs(Vec::new());
        let nodes: NodeManager = ResourceManager::new(version.clone(), WatchDefaults::default());
        let err = nodes.drain("n1", " ").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationFailed);
    }
}
