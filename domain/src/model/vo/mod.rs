mod capability;
mod cluster;
mod list;
mod version;
mod watch;

#[rustfmt::skip]
pub use self::{
    capability::{Capabilities, Operation, ResourceKind},
    cluster::{Cluster, ClusterInfo, ClusterStats, ControllerPing, SchedulerStats},
    list::{List, Page},
    version::ApiVersion,
    watch::{EventKind, WatchEvent, WatchOptions},
};
