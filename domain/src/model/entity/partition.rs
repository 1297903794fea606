use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::model::resource::{any_of, require_name, Filter, Patch, Resource, Validate};
use crate::model::vo::{Page, ResourceKind};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Partition {
    pub name: String,
    pub state: PartitionState,
    /// Member nodes, expanded from the controller's hostlist.
    pub nodes: Vec<String>,
    pub total_nodes: Option<u32>,
    pub total_cpus: Option<u32>,
    /// Minutes.
    pub max_time: Option<u32>,
    /// Minutes.
    pub default_time: Option<u32>,
    pub priority_tier: Option<u32>,
    pub allowed_accounts: Vec<String>,
    pub allowed_qos: Vec<String>,
    pub is_default: bool,
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
pub enum PartitionState {
    Up,
    Down,
    Drain,
    Inactive,
    #[default]
    Unknown,
}

impl PartitionState {
    pub fn parse(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartitionCreate {
    pub name: String,
    pub nodes: Vec<String>,
    pub state: Option<PartitionState>,
    pub max_time: Option<u32>,
    pub default_time: Option<u32>,
    pub priority_tier: Option<u32>,
    pub allowed_accounts: Vec<String>,
    pub allowed_qos: Vec<String>,
}

impl Validate for PartitionCreate {
    fn validate(&self) -> Result<()> {
        require_name("partition", &self.name)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartitionUpdate {
    pub nodes: Option<Vec<String>>,
    pub state: Option<PartitionState>,
    pub max_time: Option<u32>,
    pub default_time: Option<u32>,
    pub priority_tier: Option<u32>,
    pub allowed_accounts: Option<Vec<String>>,
    pub allowed_qos: Option<Vec<String>>,
}

impl Patch for PartitionUpdate {
    fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartitionListOptions {
    pub names: Vec<String>,
    pub states: Vec<PartitionState>,
    /// Forwarded as `update_time`.
    pub updated_since: Option<DateTime<Utc>>,
    pub limit: Option<usize>,
    pub offset: usize,
}

impl Filter<Partition> for PartitionListOptions {
    fn matches(&self, partition: &Partition) -> bool {
        any_of(&self.names, partition.name.as_str()) && any_of(&self.states, &partition.state)
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

impl Resource for Partition {
    const KIND: ResourceKind = ResourceKind::Partition;

    type Id = String;
    type State = PartitionState;
    type Create = PartitionCreate;
    type CreateResponse = super::Created<String>;
    type Update = PartitionUpdate;
    type ListOptions = PartitionListOptions;

    fn id(&self) -> String {
        self.name.clone()
    }

    fn observed_state(&self) -> PartitionState {
        self.state
    }

    fn validate_id(id: &String) -> Result<()> {
        require_name("partition", id)
    }
}
