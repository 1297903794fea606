use std::fmt;

use crate::error::{Error, Result};
use crate::model::resource::{any_of, Filter, Patch, Resource, Validate};
use crate::model::vo::{Page, ResourceKind};

/// Identifies an association. An empty `user` is the account-level
/// association, an empty `partition` applies to every partition.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AssociationKey {
    pub cluster: String,
    pub account: String,
    pub user: String,
    pub partition: String,
}

impl fmt::Display for AssociationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.cluster, self.account)?;
        if !self.user.is_empty() {
            write!(f, "/{}", self.user)?;
        }
        if !self.partition.is_empty() {
            write!(f, "@{}", self.partition)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Association {
    pub id: Option<u32>,
    pub cluster: String,
    pub account: String,
    pub user: String,
    pub partition: String,
    pub parent_account: String,
    pub is_default: bool,
    pub shares_raw: Option<u32>,
    pub priority: Option<u32>,
    pub qos: Vec<String>,
    pub default_qos: String,
    pub max_jobs: Option<u32>,
    pub max_submit_jobs: Option<u32>,
}

impl Association {
    pub fn key(&self) -> AssociationKey {
        AssociationKey {
            cluster: self.cluster.clone(),
            account: self.account.clone(),
            user: self.user.clone(),
            partition: self.partition.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssociationCreate {
    pub cluster: String,
    pub account: String,
    pub user: String,
    pub partition: String,
    pub parent_account: String,
    pub shares_raw: Option<u32>,
    pub priority: Option<u32>,
    pub qos: Vec<String>,
    pub default_qos: String,
    pub max_jobs: Option<u32>,
    pub max_submit_jobs: Option<u32>,
}

impl AssociationCreate {
    pub fn key(&self) -> AssociationKey {
        AssociationKey {
            cluster: self.cluster.clone(),
            account: self.account.clone(),
            user: self.user.clone(),
            partition: self.partition.clone(),
        }
    }
}

impl Validate for AssociationCreate {
    fn validate(&self) -> Result<()> {
        validate_key(&self.key())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssociationUpdate {
    pub shares_raw: Option<u32>,
    pub priority: Option<u32>,
    pub qos: Option<Vec<String>>,
    pub default_qos: Option<String>,
    pub max_jobs: Option<u32>,
    pub max_submit_jobs: Option<u32>,
}

impl Patch for AssociationUpdate {
    fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssociationListOptions {
    pub clusters: Vec<String>,
    pub accounts: Vec<String>,
    pub users: Vec<String>,
    pub partitions: Vec<String>,
    pub limit: Option<usize>,
    pub offset: usize,
}

impl Filter<Association> for AssociationListOptions {
    fn matches(&self, association: &Association) -> bool {
        any_of(&self.clusters, association.cluster.as_str())
            && any_of(&self.accounts, association.account.as_str())
            && any_of(&self.users, association.user.as_str())
            && any_of(&self.partitions, association.partition.as_str())
    }

    fn page(&self) -> Page {
        Page {
            offset: self.offset,
            limit: self.limit,
        }
    }

    fn unpaged(&self) -> Self {
        Self {
            offset: 0,
            limit: None,
            ..self.clone()
        }
    }
}

impl Resource for Association {
    const KIND: ResourceKind = ResourceKind::Association;

    type Id = AssociationKey;
    type State = Association;
    type Create = AssociationCreate;
    type CreateResponse = super::Created<AssociationKey>;
    type Update = AssociationUpdate;
    type ListOptions = AssociationListOptions;

    fn id(&self) -> AssociationKey {
        self.key()
    }

    fn observed_state(&self) -> Association {
        self.clone()
    }

    fn validate_id(id: &AssociationKey) -> Result<()> {
        validate_key(id)
    }
}

fn validate_key(key: &AssociationKey) -> Result<()> {
    if key.cluster.trim().is_empty() || key.account.trim().is_empty() {
        return Err(Error::validation("association needs a cluster and an account"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_display() {
        let key = AssociationKey {
            cluster: "c1".to_owned(),
            account: "physics".to_owned(),
            user: "alice".to_owned(),
            partition: String::new(),
        };
        assert_eq!(key.to_string(), "c1/physics/alice");
        assert!(Association::validate_id(&key).is_ok());
        assert!(Association::validate_id(&AssociationKey::default()).is_err());
    }
}
