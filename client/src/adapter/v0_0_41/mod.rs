//! Slurm 24.11 (`v0.0.41`): `required_switches`, the script inside the job
//! description, node features as an array. Jobs can be updated and nodes
//! updated or removed.

mod adapters;
pub mod converters;
pub mod models;

use std::sync::Arc;

use domain::model::vo::{ApiVersion, Capabilities};
use domain::service::VersionAdapter;

pub use self::adapters::Adapter;
use crate::http::Transport;

pub const VERSION: ApiVersion = ApiVersion::V0_0_41;

const PREFIX: &str = "/slurm/v0.0.41";
const DB_PREFIX: &str = "/slurmdb/v0.0.41";

pub const CAPABILITIES: Capabilities = Capabilities {
    job_submit: true,
    job_update: true,
    job_cancel: true,
    job_signal: true,
    job_requeue: false,
    node_create: false,
    node_update: true,
    node_delete: true,
    partition_write: false,
    reservation_write: false,
    reservation_delete: false,
    qos_write: true,
    account_write: true,
    user_write: true,
    association_write: true,
    job_exclusive_field: true,
    required_switches: true,
};

pub fn adapter(transport: Arc<dyn Transport>) -> Arc<dyn VersionAdapter> {
    Arc::new(Adapter::new(transport))
}
