//! Slurm 25.05 (`v0.0.42`): as `v0.0.41`, except that job records no longer
//! report `exclusive` or `oversubscribe`.

mod adapters;
pub mod converters;
pub mod models;

use std::sync::Arc;

use domain::model::vo::{ApiVersion, Capabilities};
use domain::service::VersionAdapter;

pub use self::adapters::Adapter;
use crate::http::Transport;

pub const VERSION: ApiVersion = ApiVersion::V0_0_42;

const PREFIX: &str = "/slurm/v0.0.42";
const DB_PREFIX: &str = "/slurmdb/v0.0.42";

pub const CAPABILITIES: Capabilities = Capabilities {
    job_submit: true,
    job_update: true,
    job_cancel: true,
    job_signal: true,
    job_requeue: true,
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
    job_exclusive_field: false,
    required_switches: true,
};

pub fn adapter(transport: Arc<dyn Transport>) -> Arc<dyn VersionAdapter> {
    Arc::new(Adapter::new(transport))
}
