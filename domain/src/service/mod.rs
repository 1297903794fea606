mod resource_adapter;
mod version_adapter;

#[rustfmt::skip]
pub use self::{
    resource_adapter::{ClusterAdapter, JobControl, ResourceAdapter},
    version_adapter::{Adapted, VersionAdapter},
};
