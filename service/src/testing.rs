use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use domain::model::entity::{Job, JobState, JobUpdate};
use domain::model::vo::{
    ApiVersion, Capabilities, Cluster, ClusterInfo, ControllerPing, List, Operation, SchedulerStats,
};
use domain::model::{Filter, Resource};
use domain::service::{ClusterAdapter, JobControl, ResourceAdapter, VersionAdapter};
use domain::{Error, Result};

pub const FULL: Capabilities = Capabilities {
    job_submit: true,
    job_update: true,
    job_cancel: true,
    job_signal: true,
    job_requeue: true,
    node_create: true,
    node_update: true,
    node_delete: true,
    partition_write: true,
    reservation_write: true,
    reservation_delete: true,
    qos_write: true,
    account_write: true,
    user_write: true,
    association_write: true,
    job_exclusive_field: false,
    required_switches: true,
};

pub const READ_ONLY: Capabilities = Capabilities {
    job_submit: false,
    job_update: false,
    job_cancel: false,
    job_signal: false,
    job_requeue: false,
    node_create: false,
    node_update: false,
    node_delete: false,
    partition_write: false,
    reservation_write: false,
    reservation_delete: false,
    qos_write: false,
    account_write: false,
    user_write: false,
    association_write: false,
    job_exclusive_field: false,
    required_switches: true,
};

pub fn job(id: u32, state: JobState) -> Job {
    Job {
        job_id: id,
        name: format!("job-{id}"),
        state,
        ..Default::default()
    }
}

/// Jobs kept in memory; every other resource is empty and read-only.
pub struct MemoryVersion {
    jobs: Arc<MemoryJobs>,
}

struct MemoryJobs {
    jobs: Mutex<Vec<Job>>,
    updates: AtomicUsize,
    capabilities: Capabilities,
}

struct Empty;

impl MemoryVersion {
    pub fn new(jobs: Vec<Job>, capabilities: Capabilities) -> Arc<Self> {
        Arc::new(Self {
            jobs: Arc::new(MemoryJobs {
                jobs: Mutex::new(jobs),
                updates: AtomicUsize::new(0),
                capabilities,
            }),
        })
    }

    pub fn with_jobs(jobs: Vec<Job>) -> Arc<Self> {
        Self::new(jobs, FULL)
    }

    pub fn set_jobs(&self, jobs: Vec<Job>) {
        *self.jobs.jobs.lock().unwrap() = jobs;
    }

    pub fn update_calls(&self) -> usize {
        self.jobs.updates.load(Ordering::SeqCst)
    }
}

impl VersionAdapter for MemoryVersion {
    fn version(&self) -> ApiVersion {
        ApiVersion::V0_0_42
    }

    fn capabilities(&self) -> &Capabilities {
        &self.jobs.capabilities
    }

    fn jobs(&self) -> Arc<dyn ResourceAdapter<Job>> {
        self.jobs.clone()
    }

    fn job_control(&self) -> Arc<dyn JobControl> {
        self.jobs.clone()
    }

    fn nodes(&self) -> Arc<dyn ResourceAdapter<domain::model::entity::Node>> {
        Arc::new(Empty)
    }

    fn partitions(&self) -> Arc<dyn ResourceAdapter<domain::model::entity::Partition>> {
        Arc::new(Empty)
    }

    fn reservations(&self) -> Arc<dyn ResourceAdapter<domain::model::entity::Reservation>> {
        Arc::new(Empty)
    }

    fn qos(&self) -> Arc<dyn ResourceAdapter<domain::model::entity::Qos>> {
        Arc::new(Empty)
    }

    fn accounts(&self) -> Arc<dyn ResourceAdapter<domain::model::entity::Account>> {
        Arc::new(Empty)
    }

    fn users(&self) -> Arc<dyn ResourceAdapter<domain::model::entity::User>> {
        Arc::new(Empty)
    }

    fn associations(&self) -> Arc<dyn ResourceAdapter<domain::model::entity::Association>> {
        Arc::new(Empty)
    }

    fn cluster(&self) -> Arc<dyn ClusterAdapter> {
        Arc::new(Empty)
    }
}

#[async_trait::async_trait]
impl ResourceAdapter<Job> for MemoryJobs {
    async fn list(&self, options: &<Job as Resource>::ListOptions) -> Result<List<Job>> {
        let jobs = self.jobs.lock().unwrap().clone();
        Ok(List::paginate(jobs, options.page(), |j| options.matches(j)))
    }

    async fn get(&self, id: &u32) -> Result<Job> {
        self.jobs
            .lock()
            .unwrap()
            .iter()
            .find(|j| j.job_id == *id)
            .cloned()
            .ok_or_else(|| Error::not_found(format!("job {id}")))
    }

    async fn create(
        &self,
        _: &<Job as Resource>::Create,
    ) -> Result<<Job as Resource>::CreateResponse> {
        Err(Error::unsupported(ApiVersion::V0_0_42, Job::KIND, Operation::Create))
    }

    async fn update(&self, id: &u32, update: &JobUpdate) -> Result<()> {
        JobControl::update(self, *id, update).await
    }

    async fn delete(&self, id: &u32) -> Result<()> {
        JobControl::cancel(self, *id, None).await
    }
}

#[async_trait::async_trait]
impl JobControl for MemoryJobs {
    async fn cancel(&self, job_id: u32, _: Option<&str>) -> Result<()> {
        self.jobs.lock().unwrap().retain(|j| j.job_id != job_id);
        Ok(())
    }

    async fn signal(&self, _: u32, _: &str) -> Result<()> {
        Ok(())
    }

    async fn requeue(&self, job_id: u32) -> Result<()> {
        if !self.capabilities.job_requeue {
            return Err(Error::unsupported(ApiVersion::V0_0_42, Job::KIND, Operation::Requeue));
        }
        let mut jobs = self.jobs.lock().unwrap();
        let job = jobs
            .iter_mut()
            .find(|j| j.job_id == job_id)
            .ok_or_else(|| Error::not_found(format!("job {job_id}")))?;
        job.state = JobState::Pending;
        Ok(())
    }

    async fn update(&self, _: u32, _: &JobUpdate) -> Result<()> {
        if !self.capabilities.job_update {
            return Err(Error::unsupported(ApiVersion::V0_0_42, Job::KIND, Operation::Update));
        }
        self.updates.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait::async_trait]
impl<R: Resource> ResourceAdapter<R> for Empty {
    async fn list(&self, _: &R::ListOptions) -> Result<List<R>> {
        Ok(List::default())
    }

    async fn get(&self, id: &R::Id) -> Result<R> {
        Err(Error::not_found(format!("{} {id}", R::KIND)))
    }

    async fn create(&self, _: &R::Create) -> Result<R::CreateResponse> {
        Err(Error::unsupported(ApiVersion::V0_0_42, R::KIND, Operation::Create))
    }

    async fn update(&self, _: &R::Id, _: &R::Update) -> Result<()> {
        Err(Error::unsupported(ApiVersion::V0_0_42, R::KIND, Operation::Update))
    }

    async fn delete(&self, _: &R::Id) -> Result<()> {
        Err(Error::unsupported(ApiVersion::V0_0_42, R::KIND, Operation::Delete))
    }
}

#[async_trait::async_trait]
impl ClusterAdapter for Empty {
    async fn ping(&self) -> Result<Vec<ControllerPing>> {
        Ok(vec![ControllerPing {
            hostname: "ctl".to_owned(),
            mode: "primary".to_owned(),
            responding: true,
            latency: Some(120),
        }])
    }

    async fn info(&self) -> Result<ClusterInfo> {
        Ok(ClusterInfo {
            cluster_name: "test".to_owned(),
            release: "25.05.1".to_owned(),
            api_version: ApiVersion::V0_0_42,
        })
    }

    async fn diagnostics(&self) -> Result<SchedulerStats> {
        Ok(SchedulerStats {
            jobs_running: 1,
            ..Default::default()
        })
    }

    async fn clusters(&self) -> Result<Vec<Cluster>> {
        Ok(vec![Cluster {
            name: "test".to_owned(),
            ..Default::default()
        }])
    }
}
