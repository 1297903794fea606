use crate::error::Result;
use crate::model::resource::{any_of, require_name, Filter, Patch, Resource, Validate};
use crate::model::vo::{Page, ResourceKind};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Qos {
    pub name: String,
    pub description: String,
    pub priority: Option<u32>,
    pub flags: Vec<String>,
    pub preempt_mode: Vec<String>,
    pub preempt_list: Vec<String>,
    pub usage_factor: Option<f64>,
    /// Minutes.
    pub max_wall_per_job: Option<u32>,
    pub max_jobs_per_user: Option<u32>,
    pub max_submit_jobs_per_user: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct QosCreate {
    pub name: String,
    pub description: String,
    pub priority: Option<u32>,
    pub flags: Vec<String>,
    pub preempt_mode: Vec<String>,
    pub preempt_list: Vec<String>,
    pub usage_factor: Option<f64>,
    pub max_wall_per_job: Option<u32>,
    pub max_jobs_per_user: Option<u32>,
    pub max_submit_jobs_per_user: Option<u32>,
}

impl Validate for QosCreate {
    fn validate(&self) -> Result<()> {
        require_name("qos", &self.name)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct QosUpdate {
    pub description: Option<String>,
    pub priority: Option<u32>,
    pub flags: Option<Vec<String>>,
    pub preempt_mode: Option<Vec<String>>,
    pub preempt_list: Option<Vec<String>>,
    pub usage_factor: Option<f64>,
    pub max_wall_per_job: Option<u32>,
    pub max_jobs_per_user: Option<u32>,
    pub max_submit_jobs_per_user: Option<u32>,
}

impl Patch for QosUpdate {
    fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct QosListOptions {
    pub names: Vec<String>,
    pub limit: Option<usize>,
    pub offset: usize,
}

impl Filter<Qos> for QosListOptions {
    fn matches(&self, qos: &Qos) -> bool {
        any_of(&self.names, qos.name.as_str())
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

impl Resource for Qos {
    const KIND: ResourceKind = ResourceKind::Qos;

    type Id = String;
    type State = Qos;
    type Create = QosCreate;
    type CreateResponse = super::Created<String>;
    type Update = QosUpdate;
    type ListOptions = QosListOptions;

    fn id(&self) -> String {
        self.name.clone()
    }

    fn observed_state(&self) -> Qos {
        self.clone()
    }

    fn validate_id(id: &String) -> Result<()> {
        require_name("qos", id)
    }
}
