use chrono::{DateTime, Utc};
use domain::model::entity::{
    Account, AccountCreate, AccountUpdate, AdminLevel, Association, AssociationCreate,
    AssociationKey, AssociationUpdate, Job, JobCreate, JobState, JobSubmitResponse, JobUpdate, Node,
    NodeCreate, NodeState, NodeUpdate, Partition, PartitionCreate, PartitionState, PartitionUpdate,
    Qos, QosCreate, QosUpdate, Reservation, ReservationCreate, ReservationUpdate, User, UserCreate,
    UserUpdate,
};
use domain::model::vo::{Cluster, ClusterInfo, ControllerPing, SchedulerStats};
use domain::ApiErrorDetail;

use super::models as wire;
use super::models::NoVal;
use crate::adapter::convert::{
    base_and_flags, compress_hosts, env_to_wire, expand_hosts, join_csv, non_empty, non_empty_vec,
    split_csv, timestamp, tres, unix, with_flags,
};
use crate::adapter::normalize::Diagnostics;

fn no_val<T>(value: Option<T>) -> Option<NoVal<T>> {
    value.map(NoVal::some)
}

fn value<T>(wire: Option<NoVal<T>>) -> Option<T> {
    wire.and_then(NoVal::value)
}

fn time_to_wire(t: Option<DateTime<Utc>>) -> Option<NoVal<i64>> {
    no_val(t.map(unix))
}

fn time_from_wire(wire: Option<NoVal<i64>>) -> Option<DateTime<Utc>> {
    value(wire).and_then(timestamp)
}

pub fn diagnostics(body: &[u8]) -> Diagnostics {
    let envelope: wire::Envelope = serde_json::from_slice(body).unwrap_or_default();
    Diagnostics {
        errors: envelope.errors.into_iter().map(error_from_wire).collect(),
        warnings: warnings_from_wire(envelope.warnings),
    }
}

fn error_from_wire(e: wire::OpenapiError) -> ApiErrorDetail {
    ApiErrorDetail {
        code: e.error,
        number: Some(e.error_number).filter(|n| *n != 0),
        description: e.description,
        source: e.source,
    }
}

pub fn warnings_from_wire(warnings: Vec<wire::OpenapiWarning>) -> Vec<String> {
    warnings.into_iter().map(|w| w.description).filter(|d| !d.is_empty()).collect()
}

// ---- jobs ----

pub fn job_to_wire(job: &Job) -> wire::JobInfo {
    wire::JobInfo {
        job_id: job.job_id,
        name: job.name.clone(),
        user_id: job.user_id,
        user_name: job.user_name.clone(),
        account: job.account.clone(),
        partition: job.partition.clone(),
        qos: job.qos.clone(),
        job_state: with_flags(job.state, &job.state_flags),
        state_reason: job.state_reason.clone(),
        time_limit: no_val(job.time_limit),
        priority: no_val(job.priority),
        cpus: no_val(job.cpus),
        node_count: no_val(job.node_count),
        nodes: job.node_list.clone(),
        memory_per_node: no_val(job.memory_per_node),
        submit_time: time_to_wire(job.submit_time),
        start_time: time_to_wire(job.start_time),
        end_time: time_to_wire(job.end_time),
        current_working_directory: job.working_directory.clone(),
        command: job.command.clone(),
        standard_output: job.standard_output.clone(),
        standard_error: job.standard_error.clone(),
        comment: job.comment.clone(),
        exit_code: job.exit_code.map(|code| wire::ProcessExitCode {
            status: Vec::new(),
            return_code: Some(NoVal::some(code)),
        }),
        array_job_id: no_val(job.array_job_id),
        array_task_id: no_val(job.array_task_id),
        required_switches: job.required_switches,
    }
}

pub fn job_from_wire(job: wire::JobInfo) -> Job {
    let (state, state_flags) = base_and_flags(job.job_state);
    Job {
        job_id: job.job_id,
        name: job.name,
        user_name: job.user_name,
        user_id: job.user_id,
        account: job.account,
        partition: job.partition,
        qos: job.qos,
        state: JobState::parse(&state),
        state_flags,
        state_reason: job.state_reason,
        time_limit: value(job.time_limit),
        priority: value(job.priority),
        cpus: value(job.cpus),
        node_count: value(job.node_count),
        node_list: job.nodes,
        memory_per_node: value(job.memory_per_node),
        submit_time: time_from_wire(job.submit_time),
        start_time: time_from_wire(job.start_time),
        end_time: time_from_wire(job.end_time),
        working_directory: job.current_working_directory,
        command: job.command,
        standard_output: job.standard_output,
        standard_error: job.standard_error,
        comment: job.comment,
        exit_code: job.exit_code.and_then(|e| value(e.return_code)),
        array_job_id: value(job.array_job_id),
        array_task_id: value(job.array_task_id),
        required_switches: job.required_switches,
        exclusive: None,
    }
}

pub fn job_submit_to_wire(create: &JobCreate) -> wire::JobSubmitReq {
    wire::JobSubmitReq {
        job: wire::JobDescMsg {
            script: create.script.clone(),
            name: non_empty(&create.name),
            account: non_empty(&create.account),
            partition: non_empty(&create.partition),
            qos: non_empty(&create.qos),
            argv: create.argv.clone(),
            current_working_directory: non_empty(&create.working_directory),
            environment: env_to_wire(&create.environment),
            time_limit: no_val(create.time_limit),
            priority: no_val(create.priority),
            tasks: create.tasks,
            cpus_per_task: create.cpus_per_task,
            minimum_nodes: create.nodes,
            memory_per_node: no_val(create.memory_per_node),
            standard_output: non_empty(&create.standard_output),
            standard_error: non_empty(&create.standard_error),
            comment: non_empty(&create.comment),
            dependency: non_empty(&create.dependency),
            array: non_empty(&create.array),
            required_switches: create.required_switches,
            hold: create.hold.then_some(true),
        },
    }
}

pub fn job_update_to_wire(update: &JobUpdate) -> wire::JobDescMsg {
    wire::JobDescMsg {
        name: update.name.clone(),
        account: update.account.clone(),
        partition: update.partition.clone(),
        qos: update.qos.clone(),
        comment: update.comment.clone(),
        time_limit: no_val(update.time_limit),
        priority: no_val(update.priority),
        hold: update.hold,
        ..Default::default()
    }
}

/// `None` when the controller accepted the job but did not say which id it got.
pub fn job_submit_from_wire(resp: wire::JobSubmitResponse) -> Option<JobSubmitResponse> {
    let result = resp.result?;
    Some(JobSubmitResponse {
        job_id: result.job_id.filter(|id| *id != 0)?,
        step_id: result.step_id,
        user_message: result.job_submit_user_msg,
        warnings: warnings_from_wire(resp.warnings),
    })
}

// ---- nodes ----

pub fn node_to_wire(node: &Node) -> wire::NodeInfo {
    wire::NodeInfo {
        name: node.name.clone(),
        hostname: node.hostname.clone(),
        address: node.address.clone(),
        state: with_flags(node.state, &node.state_flags),
        cpus: node.cpus,
        real_memory: node.real_memory,
        free_mem: no_val(node.free_memory),
        partitions: node.partitions.clone(),
        features: node.features.clone(),
        reason: node.reason.clone(),
        architecture: node.architecture.clone(),
        operating_system: node.operating_system.clone(),
        boot_time: time_to_wire(node.boot_time),
        weight: node.weight,
        comment: node.comment.clone(),
    }
}

pub fn node_from_wire(node: wire::NodeInfo) -> Node {
    let (state, state_flags) = base_and_flags(node.state);
    Node {
        name: node.name,
        hostname: node.hostname,
        address: node.address,
        state: NodeState::parse(&state),
        state_flags,
        cpus: node.cpus,
        real_memory: node.real_memory,
        free_memory: value(node.free_mem),
        partitions: node.partitions,
        features: node.features,
        reason: node.reason,
        architecture: node.architecture,
        operating_system: node.operating_system,
        boot_time: time_from_wire(node.boot_time),
        weight: node.weight,
        comment: node.comment,
    }
}

pub fn node_create_to_wire(create: &NodeCreate) -> wire::NodeCreateReq {
    wire::NodeCreateReq {
        node_conf: create.node_conf.clone(),
    }
}

pub fn node_update_to_wire(update: &NodeUpdate) -> wire::UpdateNodeMsg {
    wire::UpdateNodeMsg {
        state: update.state.map(|s| vec![s.to_string()]).unwrap_or_default(),
        reason: update.reason.clone(),
        features: update.features.clone(),
        comment: update.comment.clone(),
        weight: update.weight,
    }
}

// ---- partitions ----

pub fn partition_to_wire(partition: &Partition) -> wire::PartitionInfo {
    wire::PartitionInfo {
        name: partition.name.clone(),
        nodes: wire::PartitionNodes {
            configured: compress_hosts(&partition.nodes),
            total: partition.total_nodes,
        },
        cpus: wire::PartitionCpus {
            total: partition.total_cpus,
        },
        partition: wire::PartitionStatus {
            state: vec![partition.state.to_string()],
        },
        maximums: wire::PartitionTimes {
            time: no_val(partition.max_time),
        },
        defaults: wire::PartitionTimes {
            time: no_val(partition.default_time),
        },
        priority: wire::PartitionPriority {
            tier: partition.priority_tier,
        },
        accounts: wire::PartitionAllowed {
            allowed: join_csv(&partition.allowed_accounts),
        },
        qos: wire::PartitionAllowed {
            allowed: join_csv(&partition.allowed_qos),
        },
        flags: if partition.is_default {
            vec!["DEFAULT".to_owned()]
        } else {
            Vec::new()
        },
    }
}

pub fn partition_from_wire(partition: wire::PartitionInfo) -> Partition {
    Partition {
        name: partition.name,
        state: partition
            .partition
            .state
            .first()
            .map_or(PartitionState::Unknown, |s| PartitionState::parse(s)),
        nodes: expand_hosts(&partition.nodes.configured),
        total_nodes: partition.nodes.total,
        total_cpus: partition.cpus.total,
        max_time: value(partition.maximums.time),
        default_time: value(partition.defaults.time),
        priority_tier: partition.priority.tier,
        allowed_accounts: split_csv(&partition.accounts.allowed),
        allowed_qos: split_csv(&partition.qos.allowed),
        is_default: partition.flags.iter().any(|f| f == "DEFAULT"),
    }
}

pub fn partition_create_to_wire(create: &PartitionCreate) -> wire::PartitionDescMsg {
    wire::PartitionDescMsg {
        name: Some(create.name.clone()),
        nodes: Some(compress_hosts(&create.nodes)).filter(|n| !n.is_empty()),
        state: create.state.map(|s| vec![s.to_string()]),
        max_time: no_val(create.max_time),
        default_time: no_val(create.default_time),
        priority_tier: create.priority_tier,
        allow_accounts: Some(join_csv(&create.allowed_accounts)).filter(|a| !a.is_empty()),
        allow_qos: Some(join_csv(&create.allowed_qos)).filter(|q| !q.is_empty()),
    }
}

pub fn partition_update_to_wire(name: &str, update: &PartitionUpdate) -> wire::PartitionDescMsg {
    wire::PartitionDescMsg {
        name: Some(name.to_owned()),
        nodes: update.nodes.as_deref().map(compress_hosts),
        state: update.state.map(|s| vec![s.to_string()]),
        max_time: no_val(update.max_time),
        default_time: no_val(update.default_time),
        priority_tier: update.priority_tier,
        allow_accounts: update.allowed_accounts.as_deref().map(join_csv),
        allow_qos: update.allowed_qos.as_deref().map(join_csv),
    }
}

// ---- reservations ----

pub fn reservation_to_wire(reservation: &Reservation) -> wire::ReservationInfo {
    wire::ReservationInfo {
        name: reservation.name.clone(),
        start_time: time_to_wire(reservation.start_time),
        end_time: time_to_wire(reservation.end_time),
        node_list: compress_hosts(&reservation.nodes),
        node_count: reservation.node_count,
        partition: reservation.partition.clone(),
        users: join_csv(&reservation.users),
        accounts: join_csv(&reservation.accounts),
        flags: reservation.flags.clone(),
    }
}

pub fn reservation_from_wire(reservation: wire::ReservationInfo) -> Reservation {
    Reservation {
        name: reservation.name,
        start_time: time_from_wire(reservation.start_time),
        end_time: time_from_wire(reservation.end_time),
        nodes: expand_hosts(&reservation.node_list),
        node_count: reservation.node_count,
        partition: reservation.partition,
        users: split_csv(&reservation.users),
        accounts: split_csv(&reservation.accounts),
        flags: reservation.flags,
    }
}

pub fn reservation_create_to_wire(create: &ReservationCreate) -> wire::ReservationDescMsg {
    wire::ReservationDescMsg {
        name: create.name.clone(),
        start_time: time_to_wire(create.start_time),
        end_time: time_to_wire(create.end_time),
        duration: no_val(create.duration),
        node_list: (!create.nodes.is_empty()).then(|| vec![compress_hosts(&create.nodes)]),
        node_count: no_val(create.node_count),
        partition: non_empty(&create.partition),
        users: non_empty_vec(&create.users),
        accounts: non_empty_vec(&create.accounts),
        flags: non_empty_vec(&create.flags),
    }
}

pub fn reservation_update_to_wire(
    name: &str,
    update: &ReservationUpdate,
) -> wire::ReservationDescMsg {
    wire::ReservationDescMsg {
        name: name.to_owned(),
        start_time: time_to_wire(update.start_time),
        end_time: time_to_wire(update.end_time),
        duration: no_val(update.duration),
        node_list: update.nodes.as_deref().map(|nodes| vec![compress_hosts(nodes)]),
        node_count: no_val(update.node_count),
        partition: None,
        users: update.users.clone(),
        accounts: update.accounts.clone(),
        flags: update.flags.clone(),
    }
}

// ---- cluster ----

pub fn ping_from_wire(ping: wire::ControllerPing) -> ControllerPing {
    ControllerPing {
        responding: ping.responding,
        hostname: ping.hostname,
        mode: ping.mode,
        latency: ping.latency,
    }
}

pub fn cluster_info_from_wire(meta: wire::Meta) -> ClusterInfo {
    ClusterInfo {
        cluster_name: meta.slurm.cluster,
        release: meta.slurm.release,
        api_version: super::VERSION,
    }
}

pub fn scheduler_stats_from_wire(stats: wire::StatsMsg) -> SchedulerStats {
    SchedulerStats {
        server_thread_count: stats.server_thread_count,
        agent_queue_size: stats.agent_queue_size,
        jobs_submitted: stats.jobs_submitted,
        jobs_started: stats.jobs_started,
        jobs_completed: stats.jobs_completed,
        jobs_canceled: stats.jobs_canceled,
        jobs_failed: stats.jobs_failed,
        jobs_pending: stats.jobs_pending,
        jobs_running: stats.jobs_running,
        schedule_cycle_last: stats.schedule_cycle_last,
        backfill_active: stats.bf_active,
    }
}

pub fn cluster_from_wire(cluster: wire::ClusterRec) -> Cluster {
    Cluster {
        nodes: expand_hosts(&cluster.nodes),
        tres: cluster
            .tres
            .iter()
            .map(|t| tres(&t.kind, &t.name, t.count.unwrap_or(0)))
            .collect(),
        name: cluster.name,
        controller_host: cluster.controller.host,
        controller_port: cluster.controller.port.filter(|&port| port != 0),
        rpc_version: cluster.rpc_version.filter(|&rpc| rpc != 0),
        flags: cluster.flags,
    }
}

// ---- qos ----

fn qos_limits(
    max_wall: Option<u32>,
    max_jobs: Option<u32>,
    max_submit: Option<u32>,
) -> Option<wire::QosLimits> {
    if max_wall.is_none() && max_jobs.is_none() && max_submit.is_none() {
        return None;
    }
    Some(wire::QosLimits {
        max: wire::QosMax {
            wall_clock: wire::QosWallClock {
                per: wire::QosPerJob { job: no_val(max_wall) },
            },
            jobs: wire::QosJobs {
                active_jobs: wire::QosActiveJobs {
                    per: wire::QosPerUser { user: no_val(max_jobs) },
                },
                per: wire::QosPerUser {
                    user: no_val(max_submit),
                },
            },
        },
    })
}

pub fn qos_to_wire(qos: &Qos) -> wire::Qos {
    wire::Qos {
        name: qos.name.clone(),
        description: non_empty(&qos.description),
        priority: no_val(qos.priority),
        flags: non_empty_vec(&qos.flags),
        preempt: (!qos.preempt_mode.is_empty() || !qos.preempt_list.is_empty()).then(|| {
            wire::QosPreempt {
                mode: non_empty_vec(&qos.preempt_mode),
                list: non_empty_vec(&qos.preempt_list),
            }
        }),
        usage_factor: no_val(qos.usage_factor),
        limits: qos_limits(
            qos.max_wall_per_job,
            qos.max_jobs_per_user,
            qos.max_submit_jobs_per_user,
        ),
    }
}

pub fn qos_from_wire(qos: wire::Qos) -> Qos {
    let preempt = qos.preempt.unwrap_or_default();
    let max = qos.limits.unwrap_or_default().max;
    Qos {
        name: qos.name,
        description: qos.description.unwrap_or_default(),
        priority: value(qos.priority),
        flags: qos.flags.unwrap_or_default(),
        preempt_mode: preempt.mode.unwrap_or_default(),
        preempt_list: preempt.list.unwrap_or_default(),
        usage_factor: value(qos.usage_factor),
        max_wall_per_job: value(max.wall_clock.per.job),
        max_jobs_per_user: value(max.jobs.active_jobs.per.user),
        max_submit_jobs_per_user: value(max.jobs.per.user),
    }
}

pub fn qos_create_to_wire(create: &QosCreate) -> wire::Qos {
    wire::Qos {
        name: create.name.clone(),
        description: non_empty(&create.description),
        priority: no_val(create.priority),
        flags: non_empty_vec(&create.flags),
        preempt: (!create.preempt_mode.is_empty() || !create.preempt_list.is_empty()).then(|| {
            wire::QosPreempt {
                mode: non_empty_vec(&create.preempt_mode),
                list: non_empty_vec(&create.preempt_list),
            }
        }),
        usage_factor: no_val(create.usage_factor),
        limits: qos_limits(
            create.max_wall_per_job,
            create.max_jobs_per_user,
            create.max_submit_jobs_per_user,
        ),
    }
}

pub fn qos_update_to_wire(name: &str, update: &QosUpdate) -> wire::Qos {
    wire::Qos {
        name: name.to_owned(),
        description: update.description.clone(),
        priority: no_val(update.priority),
        flags: update.flags.clone(),
        preempt: (update.preempt_mode.is_some() || update.preempt_list.is_some()).then(|| {
            wire::QosPreempt {
                mode: update.preempt_mode.clone(),
                list: update.preempt_list.clone(),
            }
        }),
        usage_factor: no_val(update.usage_factor),
        limits: qos_limits(
            update.max_wall_per_job,
            update.max_jobs_per_user,
            update.max_submit_jobs_per_user,
        ),
    }
}

// ---- accounts ----

fn coordinators_to_wire(names: &[String]) -> Option<Vec<wire::Coordinator>> {
    (!names.is_empty()).then(|| {
        names
            .iter()
            .map(|name| wire::Coordinator {
                name: name.clone(),
                direct: None,
            })
            .collect()
    })
}

fn coordinators_from_wire(coordinators: Option<Vec<wire::Coordinator>>) -> Vec<String> {
    coordinators.unwrap_or_default().into_iter().map(|c| c.name).collect()
}

pub fn account_to_wire(account: &Account) -> wire::Account {
    wire::Account {
        name: account.name.clone(),
        description: non_empty(&account.description),
        organization: non_empty(&account.organization),
        coordinators: coordinators_to_wire(&account.coordinators),
        flags: non_empty_vec(&account.flags),
    }
}

pub fn account_from_wire(account: wire::Account) -> Account {
    Account {
        name: account.name,
        description: account.description.unwrap_or_default(),
        organization: account.organization.unwrap_or_default(),
        coordinators: coordinators_from_wire(account.coordinators),
        flags: account.flags.unwrap_or_default(),
    }
}

pub fn account_create_to_wire(create: &AccountCreate) -> wire::Account {
    wire::Account {
        name: create.name.clone(),
        description: non_empty(&create.description),
        organization: non_empty(&create.organization),
        coordinators: coordinators_to_wire(&create.coordinators),
        flags: None,
    }
}

pub fn account_update_to_wire(name: &str, update: &AccountUpdate) -> wire::Account {
    wire::Account {
        name: name.to_owned(),
        description: update.description.clone(),
        organization: update.organization.clone(),
        coordinators: update
            .coordinators
            .as_deref()
            .map(|names| coordinators_to_wire(names).unwrap_or_default()),
        flags: None,
    }
}

// ---- users ----

fn user_default(account: Option<String>, wckey: Option<String>) -> Option<wire::UserDefault> {
    (account.is_some() || wckey.is_some()).then_some(wire::UserDefault { account, wckey })
}

pub fn user_to_wire(user: &User) -> wire::User {
    wire::User {
        name: user.name.clone(),
        default: user_default(non_empty(&user.default_account), non_empty(&user.default_wckey)),
        administrator_level: Some(vec![user.admin_level.to_string()]),
        coordinators: coordinators_to_wire(&user.coordinator_accounts),
        associations: (!user.accounts.is_empty()).then(|| {
            user.accounts
                .iter()
                .map(|account| wire::AssociationShort {
                    account: account.clone(),
                    user: user.name.clone(),
                    ..Default::default()
                })
                .collect()
        }),
    }
}

pub fn user_from_wire(user: wire::User) -> User {
    let default = user.default.unwrap_or_default();
    let mut accounts: Vec<String> = user
        .associations
        .unwrap_or_default()
        .into_iter()
        .map(|a| a.account)
        .collect();
    accounts.sort();
    accounts.dedup();
    User {
        name: user.name,
        default_account: default.account.unwrap_or_default(),
        default_wckey: default.wckey.unwrap_or_default(),
        admin_level: user
            .administrator_level
            .unwrap_or_default()
            .first()
            .map_or(AdminLevel::None, |level| AdminLevel::parse(level)),
        coordinator_accounts: coordinators_from_wire(user.coordinators),
        accounts,
    }
}

pub fn user_create_to_wire(create: &UserCreate) -> wire::User {
    wire::User {
        name: create.name.clone(),
        default: user_default(non_empty(&create.default_account), non_empty(&create.default_wckey)),
        administrator_level: create.admin_level.map(|level| vec![level.to_string()]),
        coordinators: None,
        associations: None,
    }
}

pub fn user_update_to_wire(name: &str, update: &UserUpdate) -> wire::User {
    wire::User {
        name: name.to_owned(),
        default: user_default(update.default_account.clone(), update.default_wckey.clone()),
        administrator_level: update.admin_level.map(|level| vec![level.to_string()]),
        coordinators: None,
        associations: None,
    }
}

// ---- associations ----

fn association_max(
    max_jobs: Option<u32>,
    max_submit_jobs: Option<u32>,
) -> Option<wire::AssociationMax> {
    (max_jobs.is_some() || max_submit_jobs.is_some()).then(|| wire::AssociationMax {
        jobs: wire::AssociationMaxJobs {
            active: no_val(max_jobs),
            total: no_val(max_submit_jobs),
        },
    })
}

pub fn association_to_wire(association: &Association) -> wire::Association {
    wire::Association {
        id: association.id,
        cluster: association.cluster.clone(),
        account: association.account.clone(),
        user: association.user.clone(),
        partition: association.partition.clone(),
        parent_account: non_empty(&association.parent_account),
        is_default: Some(association.is_default),
        shares_raw: association.shares_raw,
        priority: no_val(association.priority),
        qos: non_empty_vec(&association.qos),
        default: non_empty(&association.default_qos)
            .map(|qos| wire::AssociationDefault { qos: Some(qos) }),
        max: association_max(association.max_jobs, association.max_submit_jobs),
    }
}

pub fn association_from_wire(association: wire::Association) -> Association {
    let max = association.max.unwrap_or_default();
    Association {
        id: association.id,
        cluster: association.cluster,
        account: association.account,
        user: association.user,
        partition: association.partition,
        parent_account: association.parent_account.unwrap_or_default(),
        is_default: association.is_default.unwrap_or(false),
        shares_raw: association.shares_raw,
        priority: value(association.priority),
        qos: association.qos.unwrap_or_default(),
        default_qos: association.default.and_then(|d| d.qos).unwrap_or_default(),
        max_jobs: value(max.jobs.active),
        max_submit_jobs: value(max.jobs.total),
    }
}

pub fn association_create_to_wire(create: &AssociationCreate) -> wire::Association {
    wire::Association {
        id: None,
        cluster: create.cluster.clone(),
        account: create.account.clone(),
        user: create.user.clone(),
        partition: create.partition.clone(),
        parent_account: non_empty(&create.parent_account),
        is_default: None,
        shares_raw: create.shares_raw,
        priority: no_val(create.priority),
        qos: non_empty_vec(&create.qos),
        default: non_empty(&create.default_qos)
            .map(|qos| wire::AssociationDefault { qos: Some(qos) }),
        max: association_max(create.max_jobs, create.max_submit_jobs),
    }
}

pub fn association_update_to_wire(
    key: &AssociationKey,
    update: &AssociationUpdate,
) -> wire::Association {
    wire::Association {
        id: None,
        cluster: key.cluster.clone(),
        account: key.account.clone(),
        user: key.user.clone(),
        partition: key.partition.clone(),
        parent_account: None,
        is_default: None,
        shares_raw: update.shares_raw,
        priority: no_val(update.priority),
        qos: update.qos.clone(),
        default: update
            .default_qos
            .clone()
            .map(|qos| wire::AssociationDefault { qos: Some(qos) }),
        max: association_max(update.max_jobs, update.max_submit_jobs),
    }
}
