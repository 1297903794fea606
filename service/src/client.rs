use std::sync::Arc;

use domain::model::entity::{Account, Association, Job, Node, Partition, Qos, Reservation, User};
use domain::model::vo::{
    ApiVersion, Capabilities, Cluster, ClusterInfo, ClusterStats, ControllerPing, SchedulerStats,
};
use domain::service::{Adapted, VersionAdapter};
use domain::Result;

use crate::manager::ResourceManager;
use crate::watch::WatchDefaults;

/// The object applications hold. Cheap to clone, safe to share across tasks.
#[derive(Clone)]
pub struct SlurmClient {
    adapter: Arc<dyn VersionAdapter>,
    defaults: WatchDefaults,
}

impl SlurmClient {
    pub fn new(adapter: Arc<dyn VersionAdapter>, defaults: WatchDefaults) -> Self {
        Self { adapter, defaults }
    }

    pub fn version(&self) -> ApiVersion {
        self.adapter.version()
    }

    pub fn capabilities(&self) -> &Capabilities {
        self.adapter.capabilities()
    }

    pub fn manager<R: Adapted>(&self) -> ResourceManager<R> {
        ResourceManager::new(self.adapter.clone(), self.defaults)
    }

    pub fn jobs(&self) -> ResourceManager<Job> {
        self.manager()
    }

    pub fn nodes(&self) -> ResourceManager<Node> {
        self.manager()
    }

    pub fn partitions(&self) -> ResourceManager<Partition> {
        self.manager()
    }

    pub fn reservations(&self) -> ResourceManager<Reservation> {
        self.manager()
    }

    pub fn qos(&self) -> ResourceManager<Qos> {
        self.manager()
    }

    pub fn accounts(&self) -> ResourceManager<Account> {
        self.manager()
    }

    pub fn users(&self) -> ResourceManager<User> {
        self.manager()
    }

    pub fn associations(&self) -> ResourceManager<Association> {
        self.manager()
    }

    pub async fn ping(&self) -> Result<Vec<ControllerPing>> {
        self.adapter.cluster().ping().await
    }

    pub async fn info(&self) -> Result<ClusterInfo> {
        self.adapter.cluster().info().await
    }

    pub async fn diagnostics(&self) -> Result<SchedulerStats> {
        self.adapter.cluster().diagnostics().await
    }

    /// Scheduler counters plus a tally over every node.
    pub async fn stats(&self) -> Result<ClusterStats> {
        let scheduler = self.diagnostics().await?;
        let nodes = self.adapter.nodes().list(&Default::default()).await?;
        Ok(ClusterStats::tally(scheduler, &nodes.items))
    }

    pub async fn clusters(&self) -> Result<Vec<Cluster>> {
        self.adapter.cluster().clusters().await
    }
}

impl std::fmt::Debug for SlurmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlurmClient")
            .field("version", &self.adapter.version())
            .field("defaults", &self.defaults)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use domain::model::entity::JobState;
    use domain::model::vo::{ApiVersion, Operation, ResourceKind};

    use super::*;
    use crate::testing::{job, MemoryVersion};

    #[tokio::test]
    async fn managers_share_the_adapter() {
        let client = SlurmClient::new(
            MemoryVersion::with_jobs(vec![job(3, JobState::Running)]),
            WatchDefaults::default(),
        );
        assert_eq!(client.version(), ApiVersion::V0_0_42);
        assert!(client.capabilities().supports(ResourceKind::Partition, Operation::Create));

        let fetched = client.jobs().get(&3).await.unwrap();
        assert_eq!(fetched.name, "job-3");
        assert!(client.nodes().list(&Default::default()).await.unwrap().is_empty());

        let pings = client.ping().await.unwrap();
        assert!(pings[0].responding);
    }

    #[tokio::test]
    async fn cluster_reads() {
        let client =
            SlurmClient::new(MemoryVersion::with_jobs(Vec::new()), WatchDefaults::default());
        let info = client.info().await.unwrap();
        assert_eq!(info.cluster_name, "test");
        assert_eq!(info.api_version, client.version());

        let stats = client.stats().await.unwrap();
        assert_eq!(stats.scheduler.jobs_running, 1);
        assert_eq!(stats.nodes, 0);

        assert_eq!(client.clusters().await.unwrap()[0].name, "test");
    }
}
