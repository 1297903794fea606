//! Slurm 25.11 (`v0.0.44`): the submit response nests the job id under
//! `result`, and reservations are created in bulk through `POST /reservations`.

mod adapters;
pub mod converters;
pub mod models;

use std::sync::Arc;

use domain::model::vo::{ApiVersion, Capabilities};
use domain::service::VersionAdapter;

pub use self::adapters::Adapter;
use crate::http::Transport;

pub const VERSION: ApiVersion = ApiVersion::V0_0_44;

const PREFIX: &str = "/slurm/v0.0.44";
const DB_PREFIX: &str = "/slurmdb/v0.0.44";

pub const CAPABILITIES: Capabilities = Capabilities {
    job_submit: true,
    job_update: true,
    job_cancel: true,
    job_signal: true,
    job_requeue: true,
    node_create: true,
    node_update: true,
    node_delete: true,
    partition_write: true,
    reservation_write: true,
    reservation_delete: true,
    qos_write: true,
    account_write: true,
    user_write: true,
    association_write: true,
    job_exclusive_field: false,
    required_switches: true,
};

pub fn adapter(transport: Arc<dyn Transport>) -> Arc<dyn VersionAdapter> {
    Arc::new(Adapter::new(transport))
}
