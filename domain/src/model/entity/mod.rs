pub mod account;
pub mod association;
pub mod job;
pub mod node;
pub mod partition;
pub mod qos;
pub mod reservation;
pub mod user;

#[rustfmt::skip]
pub use self::{
    account::{Account, AccountCreate, AccountListOptions, AccountUpdate},
    association::{
        Association, AssociationCreate, AssociationKey, AssociationListOptions, AssociationUpdate,
    },
    job::{Job, JobCreate, JobListOptions, JobState, JobSubmitResponse, JobUpdate},
    node::{Node, NodeCreate, NodeListOptions, NodeState, NodeStateChange, NodeUpdate},
    partition::{Partition, PartitionCreate, PartitionListOptions, PartitionState, PartitionUpdate},
    qos::{Qos, QosCreate, QosListOptions, QosUpdate},
    reservation::{Reservation, ReservationCreate, ReservationListOptions, ReservationUpdate},
    user::{AdminLevel, User, UserCreate, UserListOptions, UserUpdate},
};

/// What a create call returns for everything except jobs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Created<Id> {
    pub id: Id,
    /// Warnings the backend attached to an otherwise successful call.
    pub warnings: Vec<String>,
}
