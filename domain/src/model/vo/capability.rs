#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, strum::Display, strum::EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum ResourceKind {
    Job,
    Node,
    Partition,
    Reservation,
    Qos,
    Account,
    User,
    Association,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum Operation {
    List,
    Get,
    Create,
    Update,
    Delete,
    Watch,
    /// Job signalling.
    Signal,
    /// Putting a job back in the queue.
    Requeue,
}

/// What one API version can do. Adapters consult nothing else before refusing a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub job_submit: bool,
    pub job_update: bool,
    pub job_cancel: bool,
    pub job_signal: bool,
    pub job_requeue: bool,
    pub node_create: bool,
    pub node_update: bool,
    pub node_delete: bool,
    pub partition_write: bool,
    /// Create and update.
    pub reservation_write: bool,
    pub reservation_delete: bool,
    pub qos_write: bool,
    pub account_write: bool,
    pub user_write: bool,
    pub association_write: bool,
    /// Job records still carry `exclusive` and `oversubscribe`.
    pub job_exclusive_field: bool,
    /// Job records use `required_switches` instead of `minimum_switches`.
    pub required_switches: bool,
}

impl Capabilities {
    pub fn supports(&self, resource: ResourceKind, operation: Operation) -> bool {
        use Operation::*;
        use ResourceKind::*;

        match (resource, operation) {
            (_, List | Get | Watch) => true,
            (Job, Create) => self.job_submit,
            (Job, Update) => self.job_update,
            (Job, Delete) => self.job_cancel,
            (Job, Signal) => self.job_signal,
            (Job, Requeue) => self.job_requeue,
            (_, Signal | Requeue) => false,
            (Node, Create) => self.node_create,
            (Node, Update) => self.node_update,
            (Node, Delete) => self.node_delete,
            (Partition, _) => self.partition_write,
            (Reservation, Delete) => self.reservation_delete,
            (Reservation, _) => self.reservation_write,
            (Qos, _) => self.qos_write,
            (Account, _) => self.account_write,
            (User, _) => self.user_write,
            (Association, _) => self.association_write,
        }
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    const NONE: Capabilities = Capabilities {
        job_submit: false,
        job_update: false,
        job_cancel: false,
        job_signal: false,
        job_requeue: false,
        node_create: false,
        node_update: false,
        node_delete: false,
        partition_write: false,
        reservation_write: false,
        reservation_delete: false,
        qos_write: false,
        account_write: false,
        user_write: false,
        association_write: false,
        job_exclusive_field: false,
        required_switches: false,
    };

    #[test]
    fn reads_always_supported() {
        for kind in ResourceKind::iter() {
            for op in [Operation::List, Operation::Get, Operation::Watch] {
                assert!(NONE.supports(kind, op), "{op} {kind}");
            }
            for op in [Operation::Create, Operation::Update, Operation::Delete] {
                assert!(!NONE.supports(kind, op), "{op} {kind}");
            }
        }
    }

    #[test]
    fn partition_write_gates_all_writes() {
        let caps = Capabilities {
            partition_write: true,
            ..NONE
        };
        assert!(caps.supports(ResourceKind::Partition, Operation::Create));
        assert!(caps.supports(ResourceKind::Partition, Operation::Delete));
        assert!(!caps.supports(ResourceKind::Reservation, Operation::Create));
        assert!(!caps.supports(ResourceKind::Partition, Operation::Signal));
    }

    #[test]
    fn requeue_is_a_job_operation() {
        let caps = Capabilities {
            job_requeue: true,
            ..NONE
        };
        assert!(caps.supports(ResourceKind::Job, Operation::Requeue));
        assert!(!caps.supports(ResourceKind::Job, Operation::Signal));
        assert!(!caps.supports(ResourceKind::Node, Operation::Requeue));
    }

    #[test]
    fn reservation_delete_stands_alone() {
        let caps = Capabilities {
            reservation_delete: true,
            ..NONE
        };
        assert!(caps.supports(ResourceKind::Reservation, Operation::Delete));
        assert!(!caps.supports(ResourceKind::Reservation, Operation::Create));
        assert!(!caps.supports(ResourceKind::Reservation, Operation::Update));
    }
}
