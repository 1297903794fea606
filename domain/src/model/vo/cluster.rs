use crate::model::entity::{Node, NodeState};
use crate::model::vo::ApiVersion;

/// Result of pinging one slurmctld instance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControllerPing {
    pub hostname: String,
    /// `primary`, `backup1`, ...
    pub mode: String,
    pub responding: bool,
    /// Round trip in microseconds, when reported.
    pub latency: Option<u64>,
}

/// The cluster behind slurmrestd, as reported in response metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterInfo {
    pub cluster_name: String,
    /// Slurm release such as `25.05.1`; empty when the server hides it.
    pub release: String,
    pub api_version: ApiVersion,
}

/// slurmctld scheduler counters since the last statistics reset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    pub server_thread_count: u32,
    pub agent_queue_size: u32,
    pub jobs_submitted: u32,
    pub jobs_started: u32,
    pub jobs_completed: u32,
    pub jobs_canceled: u32,
    pub jobs_failed: u32,
    pub jobs_pending: u32,
    pub jobs_running: u32,
    /// Microseconds.
    pub schedule_cycle_last: u32,
    pub backfill_active: bool,
}

/// Scheduler counters next to a tally of the node table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClusterStats {
    pub scheduler: SchedulerStats,
    pub nodes: u32,
    pub idle_nodes: u32,
    /// Fully allocated or mixed.
    pub allocated_nodes: u32,
    pub cpus: u32,
    pub idle_cpus: u32,
}

impl ClusterStats {
    pub fn tally(scheduler: SchedulerStats, nodes: &[Node]) -> Self {
        let mut stats = Self {
            scheduler,
            ..Default::default()
        };
        for node in nodes {
            let cpus = node.cpus.unwrap_or(0);
            stats.nodes += 1;
            stats.cpus += cpus;
            match node.state {
                NodeState::Idle => {
                    stats.idle_nodes += 1;
                    stats.idle_cpus += cpus;
                }
                NodeState::Allocated | NodeState::Mixed => stats.allocated_nodes += 1,
                _ => {}
            }
        }
        stats
    }
}

/// A cluster registered in slurmdbd.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cluster {
    pub name: String,
    pub controller_host: String,
    pub controller_port: Option<u16>,
    pub rpc_version: Option<u32>,
    pub nodes: Vec<String>,
    pub flags: Vec<String>,
    /// `cpu=128`, `gres/gpu=8`, ...
    pub tres: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(name: &str, state: NodeState, cpus: u32) -> Node {
        Node {
            name: name.to_owned(),
            state,
            cpus: Some(cpus),
            ..Default::default()
        }
    }

    #[test]
    fn tally_counts_nodes_by_state() {
        let scheduler = SchedulerStats {
            jobs_running: 3,
            ..Default::default()
        };
        let nodes = [
            node("n1", NodeState::Idle, 8),
            node("n2", NodeState::Mixed, 8),
            node("n3", NodeState::Allocated, 16),
            node("n4", NodeState::Down, 4),
        ];
        let stats = ClusterStats::tally(scheduler.clone(), &nodes);
        assert_eq!(stats.scheduler, scheduler);
        assert_eq!((stats.nodes, stats.idle_nodes, stats.allocated_nodes), (4, 1, 2));
        assert_eq!((stats.cpus, stats.idle_cpus), (36, 8));
    }
}
