//! Slurm 24.05 (`v0.0.40`): job `exclusive`/`oversubscribe` and `minimum_switches`,
//! the script at the top level of a submit body, node features as one CSV string.
//! Nodes can be updated or removed and reservations removed; partitions are
//! read-only.

mod adapters;
pub mod converters;
pub mod models;

use std::sync::Arc;

use domain::model::vo::{ApiVersion, Capabilities};
use domain::service::VersionAdapter;

pub use self::adapters::Adapter;
use crate::http::Transport;

pub const VERSION: ApiVersion = ApiVersion::V0_0_40;

const PREFIX: &str = "/slurm/v0.0.40";
const DB_PREFIX: &str = "/slurmdb/v0.0.40";

pub const CAPABILITIES: Capabilities = Capabilities {
    job_submit: true,
    job_update: false,
    job_cancel: true,
    job_signal: true,
    job_requeue: false,
    node_create: false,
    node_update: true,
    node_delete: true,
    partition_write: false,
    reservation_write: false,
    reservation_delete: true,
    qos_write: true,
    account_write: true,
    user_write: true,
    association_write: true,
    job_exclusive_field: true,
    required_switches: false,
};

pub fn adapter(transport: Arc<dyn Transport>) -> Arc<dyn VersionAdapter> {
    Arc::new(Adapter::new(transport))
}
