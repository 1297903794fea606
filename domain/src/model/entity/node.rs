use chrono::{DateTime, Utc};

use crate::error::{Error, Result};
use crate::model::resource::{any_in, any_of, require_name, Filter, Patch, Resource, Validate};
use crate::model::vo::{Page, ResourceKind};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Node {
    pub name: String,
    pub hostname: String,
    pub address: String,
    pub state: NodeState,
    /// Flags such as `DRAIN`, `MAINTENANCE` or `RESERVED`.
    pub state_flags: Vec<String>,
    pub cpus: Option<u32>,
    /// MiB.
    pub real_memory: Option<u64>,
    /// MiB.
    pub free_memory: Option<u64>,
    pub partitions: Vec<String>,
    pub features: Vec<String>,
    pub reason: String,
    pub architecture: String,
    pub operating_system: String,
    pub boot_time: Option<DateTime<Utc>>,
    pub weight: Option<u32>,
    pub comment: String,
}

impl Node {
    pub fn is_draining(&self) -> bool {
        self.state_flags.iter().any(|f| f == "DRAIN")
    }
}

#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum NodeState {
    Idle,
    Allocated,
    Mixed,
    Down,
    Error,
    Future,
    #[default]
    Unknown,
}

impl NodeState {
    pub fn parse(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }
}

/// State transitions an administrator can request for a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeStateChange {
    Drain,
    Resume,
    Undrain,
    Down,
    Idle,
}

/// Dynamic node registration, v0.0.43 onwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeCreate {
    /// A `slurm.conf` style line, `NodeName=n01 CPUs=8 State=CLOUD`.
    pub node_conf: String,
}

impl NodeCreate {
    /// The value of the `NodeName=` key.
    pub fn node_name(&self) -> Option<&str> {
        self.node_conf
            .split_whitespace()
            .find_map(|kv| kv.strip_prefix("NodeName="))
            .filter(|name| !name.is_empty())
    }
}

impl Validate for NodeCreate {
    fn validate(&self) -> Result<()> {
        if self.node_name().is_none() {
            return Err(Error::validation("node_conf must contain NodeName=<name>"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeUpdate {
    pub state: Option<NodeStateChange>,
    pub reason: Option<String>,
    pub features: Option<Vec<String>>,
    pub comment: Option<String>,
    pub weight: Option<u32>,
}

impl Patch for NodeUpdate {
    fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeListOptions {
    pub names: Vec<String>,
    pub states: Vec<NodeState>,
    pub partitions: Vec<String>,
    pub features: Vec<String>,
    /// Forwarded as `update_time`.
    pub updated_since: Option<DateTime<Utc>>,
    pub limit: Option<usize>,
    pub offset: usize,
}

impl Filter<Node> for NodeListOptions {
    fn matches(&self, node: &Node) -> bool {
        any_of(&self.names, node.name.as_str())
            && any_of(&self.states, &node.state)
            && any_in(&self.partitions, &node.partitions)
            && any_in(&self.features, &node.features)
    }

    fn page(&self) -> Page {
        Page {
            offset: self.offset,
            limit: self.limit,
        }
    }

    fn unpaged(&self) -> Self {
        Self {
            offset: 0,
            limit: None,
            ..self.clone()
        }
    }
}

impl Resource for Node {
    const KIND: ResourceKind = ResourceKind::Node;

    type Id = String;
    /// Base state and flags, e.g. `IDLE+DRAIN`, so draining shows up as a change.
    type State = String;
    type Create = NodeCreate;
    type CreateResponse = super::Created<String>;
    type Update = NodeUpdate;
    type ListOptions = NodeListOptions;

    fn id(&self) -> String {
        self.name.clone()
    }

    fn observed_state(&self) -> String {
        std::iter::once(self.state.to_string())
            .chain(self.state_flags.iter().cloned())
            .collect::<Vec<_>>()
            .join("+")
    }

    fn validate_id(id: &String) -> Result<()> {
        require_name("node", id)
    }
}
