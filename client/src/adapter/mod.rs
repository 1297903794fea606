//! Wire adapters, one module per slurmrestd API version.
//!
//! Every version module owns its wire structs, its converters and its
//! [`VersionAdapter`]. Nothing outside a version module sees a wire type.

pub mod convert;
pub mod normalize;
pub mod rest;
pub mod v0_0_40;
pub mod v0_0_41;
pub mod v0_0_42;
pub mod v0_0_43;
pub mod v0_0_44;

use std::sync::Arc;

use domain::model::vo::ApiVersion;
use domain::service::VersionAdapter;

use crate::http::Transport;

pub type Constructor = fn(Arc<dyn Transport>) -> Arc<dyn VersionAdapter>;

/// Every version this crate speaks, oldest first.
pub const BUILTIN: [(ApiVersion, Constructor); 5] = [
    (v0_0_40::VERSION, v0_0_40::adapter),
    (v0_0_41::VERSION, v0_0_41::adapter),
    (v0_0_42::VERSION, v0_0_42::adapter),
    (v0_0_43::VERSION, v0_0_43::adapter),
    (v0_0_44::VERSION, v0_0_44::adapter),
];

#[cfg(test)]
mod tests {
    use domain::model::entity::{
        AccountCreate, AccountUpdate, AssociationCreate, AssociationKey, AssociationUpdate,
        JobCreate, JobUpdate, NodeCreate, NodeStateChange, NodeUpdate, PartitionCreate,
        PartitionUpdate, QosCreate, QosUpdate, ReservationCreate, ReservationUpdate, UserCreate,
        UserUpdate,
    };
    use domain::model::vo::{Operation, ResourceKind};
    use domain::{ErrorKind, Result};
    use strum::IntoEnumIterator;

    use super::*;
    use crate::http::{ApiResponse, MockTransport};

    fn key() -> AssociationKey {
        AssociationKey {
            cluster: "c1".to_owned(),
            account: "physics".to_owned(),
            user: "alice".to_owned(),
            partition: String::new(),
        }
    }

    /// Runs one write operation with a payload that passes local validation.
    async fn write(adapter: &dyn VersionAdapter, kind: ResourceKind, op: Operation) -> Result<()> {
        let name = "x".to_owned();
        match (kind, op) {
            (ResourceKind::Job, Operation::Create) => {
                let create = JobCreate {
                    script: Some("#!/bin/sh\ntrue".to_owned()),
                    ..Default::default()
                };
                adapter.jobs().create(&create).await.map(drop)
            }
            (ResourceKind::Job, Operation::Update) => {
                let update = JobUpdate {
                    hold: Some(true),
                    ..Default::default()
                };
                adapter.jobs().update(&1, &update).await
            }
            (ResourceKind::Job, Operation::Delete) => adapter.jobs().delete(&1).await,
            (ResourceKind::Job, Operation::Signal) => {
                adapter.job_control().signal(1, "SIGINT").await
            }
            (ResourceKind::Job, Operation::Requeue) => adapter.job_control().requeue(1).await,
            (ResourceKind::Node, Operation::Create) => {
                let create = NodeCreate {
                    node_conf: "NodeName=x".to_owned(),
                };
                adapter.nodes().create(&create).await.map(drop)
            }
            (ResourceKind::Node, Operation::Update) => {
                let update = NodeUpdate {
                    state: Some(NodeStateChange::Drain),
                    ..Default::default()
                };
                adapter.nodes().update(&name, &update).await
            }
            (ResourceKind::Node, Operation::Delete) => adapter.nodes().delete(&name).await,
            (ResourceKind::Partition, Operation::Create) => {
                let create = PartitionCreate {
                    name,
                    ..Default::default()
                };
                adapter.partitions().create(&create).await.map(drop)
            }
            (ResourceKind::Partition, Operation::Update) => {
                let update = PartitionUpdate {
                    max_time: Some(60),
                    ..Default::default()
                };
                adapter.partitions().update(&name, &update).await
            }
            (ResourceKind::Partition, Operation::Delete) => {
                adapter.partitions().delete(&name).await
            }
            (ResourceKind::Reservation, Operation::Create) => {
                let create = ReservationCreate {
                    name,
                    users: vec!["root".to_owned()],
                    ..Default::default()
                };
                adapter.reservations().create(&create).await.map(drop)
            }
            (ResourceKind::Reservation, Operation::Update) => {
                let update = ReservationUpdate {
                    node_count: Some(2),
                    ..Default::default()
                };
                adapter.reservations().update(&name, &update).await
            }
            (ResourceKind::Reservation, Operation::Delete) => {
                adapter.reservations().delete(&name).await
            }
            (ResourceKind::Qos, Operation::Create) => {
                let create = QosCreate {
                    name,
                    ..Default::default()
                };
                adapter.qos().create(&create).await.map(drop)
            }
            (ResourceKind::Qos, Operation::Update) => {
                let update = QosUpdate {
                    priority: Some(1),
                    ..Default::default()
                };
                adapter.qos().update(&name, &update).await
            }
            (ResourceKind::Qos, Operation::Delete) => adapter.qos().delete(&name).await,
            (ResourceKind::Account, Operation::Create) => {
                let create = AccountCreate {
                    name,
                    ..Default::default()
                };
                adapter.accounts().create(&create).await.map(drop)
            }
            (ResourceKind::Account, Operation::Update) => {
                let update = AccountUpdate {
                    description: Some("d".to_owned()),
                    ..Default::default()
                };
                adapter.accounts().update(&name, &update).await
            }
            (ResourceKind::Account, Operation::Delete) => adapter.accounts().delete(&name).await,
            (ResourceKind::User, Operation::Create) => {
                let create = UserCreate {
                    name,
                    ..Default::default()
                };
                adapter.users().create(&create).await.map(drop)
            }
            (ResourceKind::User, Operation::Update) => {
                let update = UserUpdate {
                    default_account: Some("physics".to_owned()),
                    ..Default::default()
                };
                adapter.users().update(&name, &update).await
            }
            (ResourceKind::User, Operation::Delete) => adapter.users().delete(&name).await,
            (ResourceKind::Association, Operation::Create) => {
                let create = AssociationCreate {
                    cluster: "c1".to_owned(),
                    account: "physics".to_owned(),
                    user: "alice".to_owned(),
                    ..Default::default()
                };
                adapter.associations().create(&create).await.map(drop)
            }
            (ResourceKind::Association, Operation::Update) => {
                let update = AssociationUpdate {
                    max_jobs: Some(4),
                    ..Default::default()
                };
                adapter.associations().update(&key(), &update).await
            }
            (ResourceKind::Association, Operation::Delete) => {
                adapter.associations().delete(&key()).await
            }
            (kind, op) => unreachable!("{op} {kind} is not a write"),
        }
    }

    fn writes(kind: ResourceKind) -> Vec<Operation> {
        let mut ops = vec![Operation::Create, Operation::Update, Operation::Delete];
        if kind == ResourceKind::Job {
            ops.extend([Operation::Signal, Operation::Requeue]);
        }
        ops
    }

    #[tokio::test]
    async fn unsupported_writes_never_reach_the_transport() {
        for (version, constructor) in BUILTIN {
            for kind in ResourceKind::iter() {
                for op in writes(kind) {
                    let mut transport = MockTransport::new();
                    let supported = constructor(Arc::new(MockTransport::new()))
                        .capabilities()
                        .supports(kind, op);
                    if supported {
                        transport
                            .expect_execute()
                            .times(1)
                            .returning(|_| Ok(ApiResponse::new(404, "")));
                    } else {
                        transport.expect_execute().never();
                    }

                    let adapter = constructor(Arc::new(transport));
                    let err = write(adapter.as_ref(), kind, op).await.unwrap_err();
                    let expected = if supported {
                        ErrorKind::NotFound
                    } else {
                        ErrorKind::UnsupportedOperation
                    };
                    assert_eq!(err.kind(), expected, "{version} {op} {kind}");
                    assert_eq!(err.version(), Some(version), "{version} {op} {kind}");
                }
            }
        }
    }

    #[test]
    fn builtin_versions_are_ordered_and_self_describing() {
        for pair in BUILTIN.windows(2) {
            assert!(pair[0].0 < pair[1].0);
        }
        for (version, constructor) in BUILTIN {
            let adapter = constructor(Arc::new(MockTransport::new()));
            assert_eq!(adapter.version(), version);
        }
    }

    #[test]
    fn capability_matrix() {
        let caps = |v| {
            BUILTIN
                .iter()
                .find(|(version, _)| *version == v)
                .map(|(_, constructor)| *constructor(Arc::new(MockTransport::new())).capabilities())
                .unwrap()
        };
        let v40 = caps(ApiVersion::V0_0_40);
        let v41 = caps(ApiVersion::V0_0_41);
        let v42 = caps(ApiVersion::V0_0_42);
        let v43 = caps(ApiVersion::V0_0_43);
        let v44 = caps(ApiVersion::V0_0_44);

        assert!(!v40.supports(ResourceKind::Job, Operation::Update));
        assert!(!v41.supports(ResourceKind::Job, Operation::Requeue));
        assert!(v42.supports(ResourceKind::Job, Operation::Requeue));
        assert!(v41.supports(ResourceKind::Job, Operation::Update));
        assert!(!v42.supports(ResourceKind::Node, Operation::Create));
        assert!(v43.supports(ResourceKind::Node, Operation::Create));
        assert!(!v42.supports(ResourceKind::Partition, Operation::Create));
        assert!(v40.supports(ResourceKind::Node, Operation::Update));
        assert!(v40.supports(ResourceKind::Node, Operation::Delete));
        assert!(v40.supports(ResourceKind::Reservation, Operation::Delete));
        assert!(!v40.supports(ResourceKind::Reservation, Operation::Create));
        assert!(!v41.supports(ResourceKind::Reservation, Operation::Delete));
        assert!(v42.supports(ResourceKind::Reservation, Operation::Delete));
        assert!(!v42.supports(ResourceKind::Reservation, Operation::Update));
        assert!(v44.supports(ResourceKind::Reservation, Operation::Delete));
        assert!(v40.job_exclusive_field && v41.job_exclusive_field && !v42.job_exclusive_field);
        assert!(!v40.required_switches && v44.required_switches);
    }
}
