use crate::error::Result;
use crate::model::entity::JobUpdate;
use crate::model::vo::{Cluster, ClusterInfo, ControllerPing, List, SchedulerStats};
use crate::model::Resource;

/// CRUD for one resource kind against one API version.
#[async_trait::async_trait]
pub trait ResourceAdapter<R: Resource>: Send + Sync {
    async fn list(&self, options: &R::ListOptions) -> Result<List<R>>;

    async fn get(&self, id: &R::Id) -> Result<R>;

    async fn create(&self, create: &R::Create) -> Result<R::CreateResponse>;

    async fn update(&self, id: &R::Id, update: &R::Update) -> Result<()>;

    async fn delete(&self, id: &R::Id) -> Result<()>;
}

/// Job operations outside plain CRUD.
#[async_trait::async_trait]
pub trait JobControl: Send + Sync {
    /// Cancels with a specific signal, `SIGTERM` when `None`.
    async fn cancel(&self, job_id: u32, signal: Option<&str>) -> Result<()>;

    async fn signal(&self, job_id: u32, signal: &str) -> Result<()>;

    /// Stops the job and puts it back in the queue.
    async fn requeue(&self, job_id: u32) -> Result<()>;

    async fn update(&self, job_id: u32, update: &JobUpdate) -> Result<()>;

    async fn hold(&self, job_id: u32) -> Result<()> {
        let update = JobUpdate {
            hold: Some(true),
            ..Default::default()
        };
        self.update(job_id, &update).await
    }

    async fn release(&self, job_id: u32) -> Result<()> {
        let update = JobUpdate {
            hold: Some(false),
            ..Default::default()
        };
        self.update(job_id, &update).await
    }
}

#[async_trait::async_trait]
pub trait ClusterAdapter: Send + Sync {
    async fn ping(&self) -> Result<Vec<ControllerPing>>;

    /// Cluster name and Slurm release, from the ping response metadata.
    async fn info(&self) -> Result<ClusterInfo>;

    async fn diagnostics(&self) -> Result<SchedulerStats>;

    /// Clusters known to slurmdbd.
    async fn clusters(&self) -> Result<Vec<Cluster>>;
}
