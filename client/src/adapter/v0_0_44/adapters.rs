use std::sync::Arc;

use domain::model::entity::{
    Account, AccountListOptions, Association, AssociationKey, AssociationListOptions, Created, Job,
    JobCreate, JobListOptions, JobSubmitResponse, JobUpdate, Node, NodeCreate, NodeListOptions,
    NodeUpdate, Partition, PartitionCreate, PartitionListOptions, PartitionUpdate, Qos,
    QosListOptions, Reservation, ReservationCreate, ReservationListOptions, ReservationUpdate, User,
    UserListOptions,
};
use domain::model::vo::{
    ApiVersion, Capabilities, Cluster, ClusterInfo, ControllerPing, List, ResourceKind,
    SchedulerStats,
};
use domain::model::{Filter, Resource, Validate};
use domain::service::{ClusterAdapter, JobControl, ResourceAdapter, VersionAdapter};
use domain::Result;
use serde::de::IgnoredAny;

use super::{converters as convert, models as wire, CAPABILITIES, DB_PREFIX, PREFIX, VERSION};
use crate::adapter::rest::{Query, RestClient};
use crate::http::Transport;

/// Every resource adapter of this version, sharing one [`RestClient`].
pub struct Adapter {
    jobs: Arc<JobAdapter>,
    nodes: Arc<NodeAdapter>,
    partitions: Arc<PartitionAdapter>,
    reservations: Arc<ReservationAdapter>,
    qos: Arc<QosAdapter>,
    accounts: Arc<AccountAdapter>,
    users: Arc<UserAdapter>,
    associations: Arc<AssociationAdapter>,
    cluster: Arc<ClusterInfoAdapter>,
}

impl Adapter {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        let rest = RestClient::new(transport, VERSION, convert::diagnostics);
        Self {
            jobs: Arc::new(JobAdapter { rest: rest.clone() }),
            nodes: Arc::new(NodeAdapter { rest: rest.clone() }),
            partitions: Arc::new(PartitionAdapter { rest: rest.clone() }),
            reservations: Arc::new(ReservationAdapter { rest: rest.clone() }),
            qos: Arc::new(QosAdapter { rest: rest.clone() }),
            accounts: Arc::new(AccountAdapter { rest: rest.clone() }),
            users: Arc::new(UserAdapter { rest: rest.clone() }),
            associations: Arc::new(AssociationAdapter { rest: rest.clone() }),
            cluster: Arc::new(ClusterInfoAdapter { rest }),
        }
    }
}

impl VersionAdapter for Adapter {
    fn version(&self) -> ApiVersion {
        VERSION
    }

    fn capabilities(&self) -> &Capabilities {
        &CAPABILITIES
    }

    fn jobs(&self) -> Arc<dyn ResourceAdapter<Job>> {
        self.jobs.clone()
    }

    fn job_control(&self) -> Arc<dyn JobControl> {
        self.jobs.clone()
    }

    fn nodes(&self) -> Arc<dyn ResourceAdapter<Node>> {
        self.nodes.clone()
    }

    fn partitions(&self) -> Arc<dyn ResourceAdapter<Partition>> {
        self.partitions.clone()
    }

    fn reservations(&self) -> Arc<dyn ResourceAdapter<Reservation>> {
        self.reservations.clone()
    }

    fn qos(&self) -> Arc<dyn ResourceAdapter<Qos>> {
        self.qos.clone()
    }

    fn accounts(&self) -> Arc<dyn ResourceAdapter<Account>> {
        self.accounts.clone()
    }

    fn users(&self) -> Arc<dyn ResourceAdapter<User>> {
        self.users.clone()
    }

    fn associations(&self) -> Arc<dyn ResourceAdapter<Association>> {
        self.associations.clone()
    }

    fn cluster(&self) -> Arc<dyn ClusterAdapter> {
        self.cluster.clone()
    }
}

// ---- jobs ----

pub struct JobAdapter {
    rest: RestClient,
}

#[async_trait::async_trait]
impl ResourceAdapter<Job> for JobAdapter {
    async fn list(&self, options: &JobListOptions) -> Result<List<Job>> {
        let query = Query::new().opt("update_time", options.updated_since.map(|t| t.timestamp()));
        let resp: wire::JobsResponse =
            self.rest.get("list jobs", format!("{PREFIX}/jobs"), query).await?;
        let jobs = resp.jobs.into_iter().map(convert::job_from_wire).collect();
        Ok(List::paginate(jobs, options.page(), |job| options.matches(job)))
    }

    async fn get(&self, id: &u32) -> Result<Job> {
        Job::validate_id(id)?;
        let resp: wire::JobsResponse =
            self.rest.get("get job", format!("{PREFIX}/job/{id}"), Query::new()).await?;
        resp.jobs
            .into_iter()
            .next()
            .map(convert::job_from_wire)
            .ok_or_else(|| self.rest.not_found(ResourceKind::Job, id))
    }

    async fn create(&self, create: &JobCreate) -> Result<JobSubmitResponse> {
        create.validate()?;
        let body = convert::job_submit_to_wire(create);
        let resp: wire::JobSubmitResponse =
            self.rest.post("submit job", format!("{PREFIX}/job/submit"), &body).await?;
        convert::job_submit_from_wire(resp)
            .ok_or_else(|| self.rest.invalid_response("submit job: response carries no job id"))
    }

    async fn update(&self, id: &u32, update: &JobUpdate) -> Result<()> {
        JobControl::update(self, *id, update).await
    }

    async fn delete(&self, id: &u32) -> Result<()> {
        JobControl::cancel(self, *id, None).await
    }
}

#[async_trait::async_trait]
impl JobControl for JobAdapter {
    async fn cancel(&self, job_id: u32, signal: Option<&str>) -> Result<()> {
        Job::validate_id(&job_id)?;
        let query = Query::new().opt("signal", signal);
        let _: IgnoredAny =
            self.rest.delete("cancel job", format!("{PREFIX}/job/{job_id}"), query).await?;
        Ok(())
    }

    async fn signal(&self, job_id: u32, signal: &str) -> Result<()> {
        Job::validate_id(&job_id)?;
        let query = Query::new().set("signal", signal);
        let _: IgnoredAny =
            self.rest.delete("signal job", format!("{PREFIX}/job/{job_id}"), query).await?;
        Ok(())
    }

    async fn requeue(&self, job_id: u32) -> Result<()> {
        Job::validate_id(&job_id)?;
        let query = Query::new().set("flags", "FEDERATION_REQUEUE");
        let _: IgnoredAny =
            self.rest.delete("requeue job", format!("{PREFIX}/job/{job_id}"), query).await?;
        Ok(())
    }

    async fn update(&self, job_id: u32, update: &JobUpdate) -> Result<()> {
        Job::validate_id(&job_id)?;
        let body = convert::job_update_to_wire(update);
        let _: IgnoredAny =
            self.rest.post("update job", format!("{PREFIX}/job/{job_id}"), &body).await?;
        Ok(())
    }
}

// ---- nodes ----

pub struct NodeAdapter {
    rest: RestClient,
}

#[async_trait::async_trait]
impl ResourceAdapter<Node> for NodeAdapter {
    async fn list(&self, options: &NodeListOptions) -> Result<List<Node>> {
        let query = Query::new().opt("update_time", options.updated_since.map(|t| t.timestamp()));
        let resp: wire::NodesResponse =
            self.rest.get("list nodes", format!("{PREFIX}/nodes"), query).await?;
        let nodes = resp.nodes.into_iter().map(convert::node_from_wire).collect();
        Ok(List::paginate(nodes, options.page(), |node| options.matches(node)))
    }

    async fn get(&self, name: &String) -> Result<Node> {
        Node::validate_id(name)?;
        let resp: wire::NodesResponse =
            self.rest.get("get node", format!("{PREFIX}/node/{name}"), Query::new()).await?;
        resp.nodes
            .into_iter()
            .next()
            .map(convert::node_from_wire)
            .ok_or_else(|| self.rest.not_found(ResourceKind::Node, name))
    }

    async fn create(&self, create: &NodeCreate) -> Result<Created<String>> {
        create.validate()?;
        let name = create.node_name().unwrap_or_default().to_owned();
        let body = convert::node_create_to_wire(create);
        let resp: wire::Acknowledgement =
            self.rest.post("create node", format!("{PREFIX}/new/node"), &body).await?;
        Ok(Created {
            id: name,
            warnings: convert::warnings_from_wire(resp.warnings),
        })
    }

    async fn update(&self, name: &String, update: &NodeUpdate) -> Result<()> {
        Node::validate_id(name)?;
        let body = convert::node_update_to_wire(update);
        let _: IgnoredAny =
            self.rest.post("update node", format!("{PREFIX}/node/{name}"), &body).await?;
        Ok(())
    }

    async fn delete(&self, name: &String) -> Result<()> {
        Node::validate_id(name)?;
        let _: IgnoredAny = self
            .rest
            .delete("delete node", format!("{PREFIX}/node/{name}"), Query::new())
            .await?;
        Ok(())
    }
}

// ---- partitions ----

pub struct PartitionAdapter {
    rest: RestClient,
}

#[async_trait::async_trait]
impl ResourceAdapter<Partition> for PartitionAdapter {
    async fn list(&self, options: &PartitionListOptions) -> Result<List<Partition>> {
        let query = Query::new().opt("update_time", options.updated_since.map(|t| t.timestamp()));
        let resp: wire::PartitionsResponse =
            self.rest.get("list partitions", format!("{PREFIX}/partitions"), query).await?;
        let partitions = resp.partitions.into_iter().map(convert::partition_from_wire).collect();
        Ok(List::paginate(partitions, options.page(), |p| options.matches(p)))
    }

    async fn get(&self, name: &String) -> Result<Partition> {
        Partition::validate_id(name)?;
        let resp: wire::PartitionsResponse = self
            .rest
            .get("get partition", format!("{PREFIX}/partition/{name}"), Query::new())
            .await?;
        resp.partitions
            .into_iter()
            .next()
            .map(convert::partition_from_wire)
            .ok_or_else(|| self.rest.not_found(ResourceKind::Partition, name))
    }

    async fn create(&self, create: &PartitionCreate) -> Result<Created<String>> {
        create.validate()?;
        let body = wire::PartitionsDescReq {
            partitions: vec![convert::partition_create_to_wire(create)],
        };
        let resp: wire::Acknowledgement = self
            .rest
            .post("create partition", format!("{PREFIX}/partitions"), &body)
            .await?;
        Ok(Created {
            id: create.name.clone(),
            warnings: convert::warnings_from_wire(resp.warnings),
        })
    }

    async fn update(&self, name: &String, update: &PartitionUpdate) -> Result<()> {
        Partition::validate_id(name)?;
        let body = convert::partition_update_to_wire(name, update);
        let _: IgnoredAny = self
            .rest
            .post("update partition", format!("{PREFIX}/partition/{name}"), &body)
            .await?;
        Ok(())
    }

    async fn delete(&self, name: &String) -> Result<()> {
        Partition::validate_id(name)?;
        let _: IgnoredAny = self
            .rest
            .delete("delete partition", format!("{PREFIX}/partition/{name}"), Query::new())
            .await?;
        Ok(())
    }
}

// ---- reservations ----

pub struct ReservationAdapter {
    rest: RestClient,
}

#[async_trait::async_trait]
impl ResourceAdapter<Reservation> for ReservationAdapter {
    async fn list(&self, options: &ReservationListOptions) -> Result<List<Reservation>> {
        let resp: wire::ReservationsResponse = self
            .rest
            .get("list reservations", format!("{PREFIX}/reservations"), Query::new())
            .await?;
        let reservations =
            resp.reservations.into_iter().map(convert::reservation_from_wire).collect();
        Ok(List::paginate(reservations, options.page(), |r| options.matches(r)))
    }

    async fn get(&self, name: &String) -> Result<Reservation> {
        Reservation::validate_id(name)?;
        let resp: wire::ReservationsResponse = self
            .rest
            .get("get reservation", format!("{PREFIX}/reservation/{name}"), Query::new())
            .await?;
        resp.reservations
            .into_iter()
            .next()
            .map(convert::reservation_from_wire)
            .ok_or_else(|| self.rest.not_found(ResourceKind::Reservation, name))
    }

    async fn create(&self, create: &ReservationCreate) -> Result<Created<String>> {
        create.validate()?;
        let body = wire::ReservationsDescReq {
            reservations: vec![convert::reservation_create_to_wire(create)],
        };
        let resp: wire::Acknowledgement = self
            .rest
            .post("create reservation", format!("{PREFIX}/reservations"), &body)
            .await?;
        Ok(Created {
            id: create.name.clone(),
            warnings: convert::warnings_from_wire(resp.warnings),
        })
    }

    /// The controller matches the reservation by the name inside the body.
    async fn update(&self, name: &String, update: &ReservationUpdate) -> Result<()> {
        Reservation::validate_id(name)?;
        let body = convert::reservation_update_to_wire(name, update);
        let _: IgnoredAny = self
            .rest
            .post("update reservation", format!("{PREFIX}/reservation"), &body)
            .await?;
        Ok(())
    }

    async fn delete(&self, name: &String) -> Result<()> {
        Reservation::validate_id(name)?;
        let _: IgnoredAny = self
            .rest
            .delete("delete reservation", format!("{PREFIX}/reservation/{name}"), Query::new())
            .await?;
        Ok(())
    }
}

// ---- qos ----

pub struct QosAdapter {
    rest: RestClient,
}

#[async_trait::async_trait]
impl ResourceAdapter<Qos> for QosAdapter {
    async fn list(&self, options: &QosListOptions) -> Result<List<Qos>> {
        let resp: wire::QosResponse =
            self.rest.get("list qos", format!("{DB_PREFIX}/qos"), Query::new()).await?;
        let qos = resp.qos.into_iter().map(convert::qos_from_wire).collect();
        Ok(List::paginate(qos, options.page(), |q| options.matches(q)))
    }

    async fn get(&self, name: &String) -> Result<Qos> {
        Qos::validate_id(name)?;
        let resp: wire::QosResponse =
            self.rest.get("get qos", format!("{DB_PREFIX}/qos/{name}"), Query::new()).await?;
        resp.qos
            .into_iter()
            .find(|q| &q.name == name)
            .map(convert::qos_from_wire)
            .ok_or_else(|| self.rest.not_found(ResourceKind::Qos, name))
    }

    async fn create(&self, create: &<Qos as Resource>::Create) -> Result<Created<String>> {
        create.validate()?;
        let body = wire::QosResponse {
            qos: vec![convert::qos_create_to_wire(create)],
        };
        let resp: wire::Acknowledgement =
            self.rest.post("create qos", format!("{DB_PREFIX}/qos"), &body).await?;
        Ok(Created {
            id: create.name.clone(),
            warnings: convert::warnings_from_wire(resp.warnings),
        })
    }

    async fn update(&self, name: &String, update: &<Qos as Resource>::Update) -> Result<()> {
        Qos::validate_id(name)?;
        let body = wire::QosResponse {
            qos: vec![convert::qos_update_to_wire(name, update)],
        };
        let _: IgnoredAny = self.rest.post("update qos", format!("{DB_PREFIX}/qos"), &body).await?;
        Ok(())
    }

    async fn delete(&self, name: &String) -> Result<()> {
        Qos::validate_id(name)?;
        let _: IgnoredAny = self
            .rest
            .delete("delete qos", format!("{DB_PREFIX}/qos/{name}"), Query::new())
            .await?;
        Ok(())
    }
}

// ---- accounts ----

pub struct AccountAdapter {
    rest: RestClient,
}

#[async_trait::async_trait]
impl ResourceAdapter<Account> for AccountAdapter {
    async fn list(&self, options: &AccountListOptions) -> Result<List<Account>> {
        let query = Query::new().opt("with_deleted", options.with_deleted.then_some("true"));
        let resp: wire::AccountsResponse =
            self.rest.get("list accounts", format!("{DB_PREFIX}/accounts"), query).await?;
        let accounts = resp.accounts.into_iter().map(convert::account_from_wire).collect();
        Ok(List::paginate(accounts, options.page(), |a| options.matches(a)))
    }

    async fn get(&self, name: &String) -> Result<Account> {
        Account::validate_id(name)?;
        let resp: wire::AccountsResponse = self
            .rest
            .get("get account", format!("{DB_PREFIX}/account/{name}"), Query::new())
            .await?;
        resp.accounts
            .into_iter()
            .find(|a| &a.name == name)
            .map(convert::account_from_wire)
            .ok_or_else(|| self.rest.not_found(ResourceKind::Account, name))
    }

    async fn create(&self, create: &<Account as Resource>::Create) -> Result<Created<String>> {
        create.validate()?;
        let body = wire::AccountsResponse {
            accounts: vec![convert::account_create_to_wire(create)],
        };
        let resp: wire::Acknowledgement =
            self.rest.post("create account", format!("{DB_PREFIX}/accounts"), &body).await?;
        Ok(Created {
            id: create.name.clone(),
            warnings: convert::warnings_from_wire(resp.warnings),
        })
    }

    async fn update(&self, name: &String, update: &<Account as Resource>::Update) -> Result<()> {
        Account::validate_id(name)?;
        let body = wire::AccountsResponse {
            accounts: vec![convert::account_update_to_wire(name, update)],
        };
        let _: IgnoredAny =
            self.rest.post("update account", format!("{DB_PREFIX}/accounts"), &body).await?;
        Ok(())
    }

    async fn delete(&self, name: &String) -> Result<()> {
        Account::validate_id(name)?;
        let _: IgnoredAny = self
            .rest
            .delete("delete account", format!("{DB_PREFIX}/account/{name}"), Query::new())
            .await?;
        Ok(())
    }
}

// ---- users ----

pub struct UserAdapter {
    rest: RestClient,
}

#[async_trait::async_trait]
impl ResourceAdapter<User> for UserAdapter {
    async fn list(&self, options: &UserListOptions) -> Result<List<User>> {
        let query = Query::new().set("with_assocs", "true");
        let resp: wire::UsersResponse =
            self.rest.get("list users", format!("{DB_PREFIX}/users"), query).await?;
        let users = resp.users.into_iter().map(convert::user_from_wire).collect();
        Ok(List::paginate(users, options.page(), |u| options.matches(u)))
    }

    async fn get(&self, name: &String) -> Result<User> {
        User::validate_id(name)?;
        let query = Query::new().set("with_assocs", "true");
        let resp: wire::UsersResponse =
            self.rest.get("get user", format!("{DB_PREFIX}/user/{name}"), query).await?;
        resp.users
            .into_iter()
            .find(|u| &u.name == name)
            .map(convert::user_from_wire)
            .ok_or_else(|| self.rest.not_found(ResourceKind::User, name))
    }

    async fn create(&self, create: &<User as Resource>::Create) -> Result<Created<String>> {
        create.validate()?;
        let body = wire::UsersResponse {
            users: vec![convert::user_create_to_wire(create)],
        };
        let resp: wire::Acknowledgement =
            self.rest.post("create user", format!("{DB_PREFIX}/users"), &body).await?;
        Ok(Created {
            id: create.name.clone(),
            warnings: convert::warnings_from_wire(resp.warnings),
        })
    }

    async fn update(&self, name: &String, update: &<User as Resource>::Update) -> Result<()> {
        User::validate_id(name)?;
        let body = wire::UsersResponse {
            users: vec![convert::user_update_to_wire(name, update)],
        };
        let _: IgnoredAny =
            self.rest.post("update user", format!("{DB_PREFIX}/users"), &body).await?;
        Ok(())
    }

    async fn delete(&self, name: &String) -> Result<()> {
        User::validate_id(name)?;
        let _: IgnoredAny = self
            .rest
            .delete("delete user", format!("{DB_PREFIX}/user/{name}"), Query::new())
            .await?;
        Ok(())
    }
}

// ---- associations ----

pub struct AssociationAdapter {
    rest: RestClient,
}

fn key_query(key: &AssociationKey) -> Query {
    let non_empty = |s: &String| Some(s.clone()).filter(|s| !s.is_empty());
    Query::new()
        .set("cluster", &key.cluster)
        .set("account", &key.account)
        .opt("user", non_empty(&key.user))
        .opt("partition", non_empty(&key.partition))
}

#[async_trait::async_trait]
impl ResourceAdapter<Association> for AssociationAdapter {
    async fn list(&self, options: &AssociationListOptions) -> Result<List<Association>> {
        let query = Query::new()
            .csv("cluster", &options.clusters)
            .csv("account", &options.accounts)
            .csv("user", &options.users)
            .csv("partition", &options.partitions);
        let resp: wire::AssociationsResponse = self
            .rest
            .get("list associations", format!("{DB_PREFIX}/associations"), query)
            .await?;
        let associations =
            resp.associations.into_iter().map(convert::association_from_wire).collect();
        Ok(List::paginate(associations, options.page(), |a| options.matches(a)))
    }

    async fn get(&self, key: &AssociationKey) -> Result<Association> {
        Association::validate_id(key)?;
        let resp: wire::AssociationsResponse = self
            .rest
            .get("get association", format!("{DB_PREFIX}/association"), key_query(key))
            .await?;
        resp.associations
            .into_iter()
            .map(convert::association_from_wire)
            .find(|a| &a.key() == key)
            .ok_or_else(|| self.rest.not_found(ResourceKind::Association, key))
    }

    async fn create(
        &self,
        create: &<Association as Resource>::Create,
    ) -> Result<Created<AssociationKey>> {
        create.validate()?;
        let body = wire::AssociationsResponse {
            associations: vec![convert::association_create_to_wire(create)],
        };
        let resp: wire::Acknowledgement = self
            .rest
            .post("create association", format!("{DB_PREFIX}/associations"), &body)
            .await?;
        Ok(Created {
            id: create.key(),
            warnings: convert::warnings_from_wire(resp.warnings),
        })
    }

    async fn update(
        &self,
        key: &AssociationKey,
        update: &<Association as Resource>::Update,
    ) -> Result<()> {
        Association::validate_id(key)?;
        let body = wire::AssociationsResponse {
            associations: vec![convert::association_update_to_wire(key, update)],
        };
        let _: IgnoredAny = self
            .rest
            .post("update association", format!("{DB_PREFIX}/associations"), &body)
            .await?;
        Ok(())
    }

    async fn delete(&self, key: &AssociationKey) -> Result<()> {
        Association::validate_id(key)?;
        let _: IgnoredAny = self
            .rest
            .delete("delete association", format!("{DB_PREFIX}/association"), key_query(key))
            .await?;
        Ok(())
    }
}

// ---- cluster ----

pub struct ClusterInfoAdapter {
    rest: RestClient,
}

#[async_trait::async_trait]
impl ClusterAdapter for ClusterInfoAdapter {
    async fn ping(&self) -> Result<Vec<ControllerPing>> {
        let resp: wire::PingResponse =
            self.rest.get("ping", format!("{PREFIX}/ping"), Query::new()).await?;
        Ok(resp.pings.into_iter().map(convert::ping_from_wire).collect())
    }

    async fn info(&self) -> Result<ClusterInfo> {
        let resp: wire::PingResponse =
            self.rest.get("cluster info", format!("{PREFIX}/ping"), Query::new()).await?;
        Ok(convert::cluster_info_from_wire(resp.meta))
    }

    async fn diagnostics(&self) -> Result<SchedulerStats> {
        let resp: wire::DiagResponse =
            self.rest.get("diagnostics", format!("{PREFIX}/diag"), Query::new()).await?;
        Ok(convert::scheduler_stats_from_wire(resp.statistics))
    }

    async fn clusters(&self) -> Result<Vec<Cluster>> {
        let resp: wire::ClustersResponse =
            self.rest.get("list clusters", format!("{DB_PREFIX}/clusters"), Query::new()).await?;
        Ok(resp.clusters.into_iter().map(convert::cluster_from_wire).collect())
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::*;
    use crate::http::{ApiResponse, MockTransport};

    fn adapter(transport: MockTransport) -> Adapter {
        Adapter::new(Arc::new(transport))
    }

    #[tokio::test]
    async fn submit_sends_script_inside_job() {
        let mut transport = MockTransport::new();
        transport
            .expect_execute()
            .withf(|req| {
                req.path == "/slurm/v0.0.44/job/submit"
                    && req.body.as_ref().is_some_and(|b| {
                        b["job"]["script"] == "#!/bin/sh\ntrue" && b.get("script").is_none()
                    })
            })
            .times(1)
            .returning(|_| {
                Ok(ApiResponse::new(
                    200,
                    indoc! {r#"
                        {
                          "result": {"job_id": 77, "step_id": "batch", "job_submit_user_msg": ""},
                          "warnings": []
                        }
                    "#},
                ))
            });

        let create = JobCreate {
            script: Some("#!/bin/sh\ntrue".to_owned()),
            ..Default::default()
        };
        let resp = adapter(transport).jobs().create(&create).await.unwrap();
        assert_eq!(resp.job_id, 77);
    }

    #[tokio::test]
    async fn node_create_posts_conf_line() {
        let mut transport = MockTransport::new();
        transport
            .expect_execute()
            .withf(|req| {
                req.method == reqwest::Method::POST
                    && req.path == "/slurm/v0.0.44/new/node"
                    && req.body == Some(serde_json::json!({"node_conf": "NodeName=n9 CPUs=4"}))
            })
            .times(1)
            .returning(|_| {
                Ok(ApiResponse::new(
                    200,
                    r#"{"warnings": [{"description": "node added"}]}"#,
                ))
            });

        let create = NodeCreate {
            node_conf: "NodeName=n9 CPUs=4".to_owned(),
        };
        let created = adapter(transport).nodes().create(&create).await.unwrap();
        assert_eq!(created.id, "n9");
        assert_eq!(created.warnings, ["node added"]);
    }

    #[tokio::test]
    async fn reservation_create_is_bulk() {
        let mut transport = MockTransport::new();
        transport
            .expect_execute()
            .withf(|req| {
                req.path == "/slurm/v0.0.44/reservations"
                    && req.body.as_ref().is_some_and(|b| b["reservations"][0]["name"] == "maint")
            })
            .times(1)
            .returning(|_| Ok(ApiResponse::new(200, "{}")));
        let create = ReservationCreate {
            name: "maint".to_owned(),
            accounts: vec!["ops".to_owned()],
            ..Default::default()
        };
        let created = adapter(transport).reservations().create(&create).await.unwrap();
        assert_eq!(created.id, "maint");
    }

    #[tokio::test]
    async fn association_get_filters_by_key() {
        let mut transport = MockTransport::new();
        transport
            .expect_execute()
            .withf(|req| {
                req.path == "/slurmdb/v0.0.44/association"
                    && req.query
                        == [
                            ("cluster".to_owned(), "c1".to_owned()),
                            ("account".to_owned(), "physics".to_owned()),
                            ("user".to_owned(), "alice".to_owned()),
                        ]
            })
            .returning(|_| {
                Ok(ApiResponse::new(
                    200,
                    r#"{"associations": [
                        {
                          "cluster": "c1", "account": "physics", "user": "alice", "partition": "gpu"
                        },
                        {"cluster": "c1", "account": "physics", "user": "alice", "is_default": true}
                    ]}"#,
                ))
            });
        let key = AssociationKey {
            cluster: "c1".to_owned(),
            account: "physics".to_owned(),
            user: "alice".to_owned(),
            partition: String::new(),
        };
        let association = adapter(transport).associations().get(&key).await.unwrap();
        assert!(association.is_default);
        assert_eq!(association.key(), key);
    }
}
