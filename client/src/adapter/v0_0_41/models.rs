//! Wire schema of slurmrestd `v0.0.41` (Slurm 24.11).

use serde::{Deserialize, Serialize};

/// Slurm's optional number. Never leaves the converters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoVal<T> {
    pub set: bool,
    pub infinite: bool,
    pub number: T,
}

impl<T> NoVal<T> {
    pub fn some(number: T) -> Self {
        Self {
            set: true,
            infinite: false,
            number,
        }
    }

    pub fn value(self) -> Option<T> {
        (self.set && !self.infinite).then_some(self.number)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OpenapiError {
    pub description: String,
    pub error_number: i32,
    pub error: String,
    pub source: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenapiWarning {
    pub description: String,
    pub source: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Envelope {
    pub errors: Vec<OpenapiError>,
    pub warnings: Vec<OpenapiWarning>,
}

/// Any response whose payload is only the envelope.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Acknowledgement {
    pub warnings: Vec<OpenapiWarning>,
}

// ---- slurmctld ----

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobInfo {
    pub job_id: u32,
    pub name: String,
    pub user_id: Option<u32>,
    pub user_name: String,
    pub account: String,
    pub partition: String,
    pub qos: String,
    pub job_state: Vec<String>,
    pub state_reason: String,
    pub time_limit: Option<NoVal<u32>>,
    pub priority: Option<NoVal<u32>>,
    pub cpus: Option<NoVal<u32>>,
    pub node_count: Option<NoVal<u32>>,
    pub nodes: String,
    pub memory_per_node: Option<NoVal<u64>>,
    pub submit_time: Option<NoVal<i64>>,
    pub start_time: Option<NoVal<i64>>,
    pub end_time: Option<NoVal<i64>>,
    pub current_working_directory: String,
    pub command: String,
    pub standard_output: String,
    pub standard_error: String,
    pub comment: String,
    pub exit_code: Option<ProcessExitCode>,
    pub array_job_id: Option<NoVal<u32>>,
    pub array_task_id: Option<NoVal<u32>>,
    pub required_switches: Option<u32>,
    /// `["true"]`, `["user"]`, `["mcs"]` or `["false"]`.
    pub exclusive: Vec<String>,
    pub oversubscribe: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessExitCode {
    pub status: Vec<String>,
    pub return_code: Option<NoVal<i32>>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JobsResponse {
    pub jobs: Vec<JobInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobDescMsg {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qos: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub argv: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_working_directory: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub environment: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_limit: Option<NoVal<u32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<NoVal<u32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tasks: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpus_per_task: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_nodes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_per_node: Option<NoVal<u64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub standard_output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub standard_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dependency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub array: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_switches: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hold: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobSubmitReq {
    pub job: JobDescMsg,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JobSubmitResponse {
    pub job_id: Option<u32>,
    pub step_id: String,
    pub job_submit_user_msg: String,
    pub warnings: Vec<OpenapiWarning>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeInfo {
    pub name: String,
    pub hostname: String,
    pub address: String,
    pub state: Vec<String>,
    pub cpus: Option<u32>,
    pub real_memory: Option<u64>,
    pub free_mem: Option<NoVal<u64>>,
    pub partitions: Vec<String>,
    pub features: Vec<String>,
    pub reason: String,
    pub architecture: String,
    pub operating_system: String,
    pub boot_time: Option<NoVal<i64>>,
    pub weight: Option<u32>,
    pub comment: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NodesResponse {
    pub nodes: Vec<NodeInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateNodeMsg {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub state: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartitionInfo {
    pub name: String,
    pub nodes: PartitionNodes,
    pub cpus: PartitionCpus,
    pub partition: PartitionStatus,
    pub maximums: PartitionTimes,
    pub defaults: PartitionTimes,
    pub priority: PartitionPriority,
    pub accounts: PartitionAllowed,
    pub qos: PartitionAllowed,
    pub flags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartitionNodes {
    /// Hostlist expression.
    pub configured: String,
    pub total: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartitionCpus {
    pub total: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartitionStatus {
    pub state: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartitionTimes {
    pub time: Option<NoVal<u32>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartitionPriority {
    pub tier: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartitionAllowed {
    /// Comma separated.
    pub allowed: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PartitionsResponse {
    pub partitions: Vec<PartitionInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReservationInfo {
    pub name: String,
    pub start_time: Option<NoVal<i64>>,
    pub end_time: Option<NoVal<i64>>,
    pub node_list: String,
    pub node_count: Option<u32>,
    pub partition: String,
    pub users: String,
    pub accounts: String,
    pub flags: Vec<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReservationsResponse {
    pub reservations: Vec<ReservationInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerPing {
    pub hostname: String,
    pub responding: bool,
    pub latency: Option<u64>,
    pub mode: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PingResponse {
    pub pings: Vec<ControllerPing>,
    pub meta: Meta,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Meta {
    pub slurm: SlurmMeta,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlurmMeta {
    pub release: String,
    pub cluster: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct StatsMsg {
    pub server_thread_count: u32,
    pub agent_queue_size: u32,
    pub jobs_submitted: u32,
    pub jobs_started: u32,
    pub jobs_completed: u32,
    pub jobs_canceled: u32,
    pub jobs_failed: u32,
    pub jobs_pending: u32,
    pub jobs_running: u32,
    pub schedule_cycle_last: u32,
    pub bf_active: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DiagResponse {
    pub statistics: StatsMsg,
}

// ---- slurmdbd ----

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClusterController {
    pub host: String,
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TresCount {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub count: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClusterRec {
    pub name: String,
    pub controller: ClusterController,
    pub flags: Vec<String>,
    /// Hostlist expression.
    pub nodes: String,
    pub rpc_version: Option<u32>,
    pub tres: Vec<TresCount>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ClustersResponse {
    pub clusters: Vec<ClusterRec>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Qos {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<NoVal<u32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preempt: Option<QosPreempt>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_factor: Option<NoVal<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limits: Option<QosLimits>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QosPreempt {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QosLimits {
    pub max: QosMax,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QosMax {
    pub wall_clock: QosWallClock,
    pub jobs: QosJobs,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QosWallClock {
    pub per: QosPerJob,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QosPerJob {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job: Option<NoVal<u32>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QosJobs {
    pub active_jobs: QosActiveJobs,
    pub per: QosPerUser,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QosActiveJobs {
    pub per: QosPerUser,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QosPerUser {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<NoVal<u32>>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QosResponse {
    pub qos: Vec<Qos>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Coordinator {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direct: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Account {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinators: Option<Vec<Coordinator>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flags: Option<Vec<String>>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountsResponse {
    pub accounts: Vec<Account>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<UserDefault>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub administrator_level: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinators: Option<Vec<Coordinator>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub associations: Option<Vec<AssociationShort>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserDefault {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wckey: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssociationShort {
    pub account: String,
    pub cluster: String,
    pub partition: String,
    pub user: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UsersResponse {
    pub users: Vec<User>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Association {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    pub cluster: String,
    pub account: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub user: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub partition: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_account: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_default: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shares_raw: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<NoVal<u32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qos: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<AssociationDefault>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<AssociationMax>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssociationDefault {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qos: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssociationMax {
    pub jobs: AssociationMaxJobs,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssociationMaxJobs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<NoVal<u32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<NoVal<u32>>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AssociationsResponse {
    pub associations: Vec<Association>,
}
