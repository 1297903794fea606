use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::error::{Error, Result};
use crate::model::resource::{any_of, Filter, Patch, Resource, Validate};
use crate::model::vo::{Page, ResourceKind};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Job {
    pub job_id: u32,
    pub name: String,
    pub user_name: String,
    pub user_id: Option<u32>,
    pub account: String,
    pub partition: String,
    pub qos: String,
    pub state: JobState,
    /// Extra state flags reported next to the base state, e.g. `COMPLETING`.
    pub state_flags: Vec<String>,
    pub state_reason: String,
    /// Minutes.
    pub time_limit: Option<u32>,
    pub priority: Option<u32>,
    pub cpus: Option<u32>,
    pub node_count: Option<u32>,
    /// Allocated nodes as the hostlist expression the controller reported.
    pub node_list: String,
    /// MiB.
    pub memory_per_node: Option<u64>,
    pub submit_time: Option<DateTime<Utc>>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub working_directory: String,
    pub command: String,
    pub standard_output: String,
    pub standard_error: String,
    pub comment: String,
    pub exit_code: Option<i32>,
    pub array_job_id: Option<u32>,
    pub array_task_id: Option<u32>,
    pub required_switches: Option<u32>,
    /// Only reported by API versions before v0.0.42.
    pub exclusive: Option<bool>,
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
pub enum JobState {
    Pending,
    Running,
    Suspended,
    Completing,
    Completed,
    Cancelled,
    Failed,
    Timeout,
    NodeFail,
    Preempted,
    BootFail,
    Deadline,
    OutOfMemory,
    #[default]
    Unknown,
}

impl JobState {
    /// Unrecognized states collapse to `Unknown`.
    pub fn parse(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Completed
                | Self::Cancelled
                | Self::Failed
                | Self::Timeout
                | Self::NodeFail
                | Self::Preempted
                | Self::BootFail
                | Self::Deadline
                | Self::OutOfMemory
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobCreate {
    pub name: String,
    pub account: String,
    pub partition: String,
    pub qos: String,
    /// Batch script body. Mutually exclusive with `argv`.
    pub script: Option<String>,
    /// Command to run without a script. Mutually exclusive with `script`.
    pub argv: Vec<String>,
    pub working_directory: String,
    pub environment: BTreeMap<String, String>,
    pub time_limit: Option<u32>,
    pub priority: Option<u32>,
    pub tasks: Option<u32>,
    pub cpus_per_task: Option<u32>,
    pub nodes: Option<u32>,
    pub memory_per_node: Option<u64>,
    pub standard_output: String,
    pub standard_error: String,
    pub comment: String,
    pub dependency: String,
    pub array: String,
    pub required_switches: Option<u32>,
    pub hold: bool,
}

impl Validate for JobCreate {
    fn validate(&self) -> Result<()> {
        let has_script = self.script.as_deref().is_some_and(|s| !s.trim().is_empty());
        match (has_script, self.argv.is_empty()) {
            (true, false) => {
                Err(Error::validation("a job takes either a script or a command, not both"))
            }
            (false, true) => Err(Error::validation("a job needs a script or a command")),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobUpdate {
    pub name: Option<String>,
    pub account: Option<String>,
    pub partition: Option<String>,
    pub qos: Option<String>,
    pub comment: Option<String>,
    pub time_limit: Option<u32>,
    pub priority: Option<u32>,
    pub hold: Option<bool>,
}

impl Patch for JobUpdate {
    fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobSubmitResponse {
    pub job_id: u32,
    pub step_id: String,
    pub user_message: String,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobListOptions {
    pub job_ids: Vec<u32>,
    pub names: Vec<String>,
    pub users: Vec<String>,
    pub accounts: Vec<String>,
    pub partitions: Vec<String>,
    pub qos: Vec<String>,
    pub states: Vec<JobState>,
    /// Forwarded as `update_time`; the controller only returns jobs changed since.
    pub updated_since: Option<DateTime<Utc>>,
    pub limit: Option<usize>,
    pub offset: usize,
}

impl Filter<Job> for JobListOptions {
    fn matches(&self, job: &Job) -> bool {
        any_of(&self.job_ids, &job.job_id)
            && any_of(&self.names, job.name.as_str())
            && any_of(&self.users, job.user_name.as_str())
            && any_of(&self.accounts, job.account.as_str())
            && any_of(&self.partitions, job.partition.as_str())
            && any_of(&self.qos, job.qos.as_str())
            && any_of(&self.states, &job.state)
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

impl Resource for Job {
    const KIND: ResourceKind = ResourceKind::Job;

    type Id = u32;
    type State = JobState;
    type Create = JobCreate;
    type CreateResponse = JobSubmitResponse;
    type Update = JobUpdate;
    type ListOptions = JobListOptions;

    fn id(&self) -> u32 {
        self.job_id
    }

    fn observed_state(&self) -> JobState {
        self.state
    }

    fn validate_id(id: &u32) -> Result<()> {
        if *id == 0 {
            return Err(Error::validation("job id must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_parsing() {
        assert_eq!(JobState::parse("RUNNING"), JobState::Running);
        assert_eq!(JobState::parse("node_fail"), JobState::NodeFail);
        assert_eq!(JobState::parse("OUT_OF_MEMORY"), JobState::OutOfMemory);
        assert_eq!(JobState::parse("REQUEUE_HOLD"), JobState::Unknown);
        assert_eq!(JobState::Timeout.to_string(), "TIMEOUT");
    }

    #[test]
    fn script_xor_command() {
        let mut create = JobCreate::default();
        assert!(create.validate().is_err());

        create.script = Some("#!/bin/bash\nhostname".to_owned());
        assert!(create.validate().is_ok());

        create.argv = vec!["hostname".to_owned()];
        assert!(create.validate().is_err());

        create.script = None;
        assert!(create.validate().is_ok());
    }

    #[test]
    fn filter_by_state_and_account() {
        let job = Job {
            job_id: 7,
            account: "physics".to_owned(),
            state: JobState::Running,
            ..Default::default()
        };
        let mut options = JobListOptions::default();
        assert!(options.matches(&job));

        options.states = vec![JobState::Pending, JobState::Running];
        options.accounts = vec!["physics".to_owned()];
        assert!(options.matches(&job));

        options.accounts = vec!["chemistry".to_owned()];
        assert!(!options.matches(&job));
    }

    #[test]
    fn empty_patch() {
        assert!(JobUpdate::default().is_empty());
        let update = JobUpdate {
            hold: Some(false),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }
}
