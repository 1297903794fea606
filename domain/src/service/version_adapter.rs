use std::sync::Arc;

use super::{ClusterAdapter, JobControl, ResourceAdapter};
use crate::model::entity::{Account, Association, Job, Node, Partition, Qos, Reservation, User};
use crate::model::vo::{ApiVersion, Capabilities};
use crate::model::Resource;

/// Every resource adapter of one API version, plus what that version can do.
pub trait VersionAdapter: Send + Sync {
    fn version(&self) -> ApiVersion;

    fn capabilities(&self) -> &Capabilities;

    fn jobs(&self) -> Arc<dyn ResourceAdapter<Job>>;

    fn job_control(&self) -> Arc<dyn JobControl>;

    fn nodes(&self) -> Arc<dyn ResourceAdapter<Node>>;

    fn partitions(&self) -> Arc<dyn ResourceAdapter<Partition>>;

    fn reservations(&self) -> Arc<dyn ResourceAdapter<Reservation>>;

    fn qos(&self) -> Arc<dyn ResourceAdapter<Qos>>;

    fn accounts(&self) -> Arc<dyn ResourceAdapter<Account>>;

    fn users(&self) -> Arc<dyn ResourceAdapter<User>>;

    fn associations(&self) -> Arc<dyn ResourceAdapter<Association>>;

    fn cluster(&self) -> Arc<dyn ClusterAdapter>;
}

/// Picks the adapter serving `Self` out of a [`VersionAdapter`].
pub trait Adapted: Resource {
    fn adapter(version: &dyn VersionAdapter) -> Arc<dyn ResourceAdapter<Self>>;
}

macro_rules! adapted {
    ($($resource:ty => $accessor:ident),* $(,)?) => {
        $(
            impl Adapted for $resource {
                fn adapter(version: &dyn VersionAdapter) -> Arc<dyn ResourceAdapter<Self>> {
                    version.$accessor()
                }
            }
        )*
    };
}

adapted! {
    Job => jobs,
    Node => nodes,
    Partition => partitions,
    Reservation => reservations,
    Qos => qos,
    Account => accounts,
    User => users,
    Association => associations,
}
