use crate::error::Result;
use crate::model::resource::{any_of, require_name, Filter, Patch, Resource, Validate};
use crate::model::vo::{Page, ResourceKind};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Account {
    pub name: String,
    pub description: String,
    pub organization: String,
    pub coordinators: Vec<String>,
    /// e.g. `DELETED`.
    pub flags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountCreate {
    pub name: String,
    pub description: String,
    pub organization: String,
    pub coordinators: Vec<String>,
}

impl Validate for AccountCreate {
    fn validate(&self) -> Result<()> {
        require_name("account", &self.name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountUpdate {
    pub description: Option<String>,
    pub organization: Option<String>,
    pub coordinators: Option<Vec<String>>,
}

impl Patch for AccountUpdate {
    fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountListOptions {
    pub names: Vec<String>,
    pub organizations: Vec<String>,
    /// Also return accounts flagged `DELETED`.
    pub with_deleted: bool,
    pub limit: Option<usize>,
    pub offset: usize,
}

impl Filter<Account> for AccountListOptions {
    fn matches(&self, account: &Account) -> bool {
        any_of(&self.names, account.name.as_str())
            && any_of(&self.organizations, account.organization.as_str())
            && (self.with_deleted || !account.flags.iter().any(|f| f == "DELETED"))
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

impl Resource for Account {
    const KIND: ResourceKind = ResourceKind::Account;

    type Id = String;
    type State = Account;
    type Create = AccountCreate;
    type CreateResponse = super::Created<String>;
    type Update = AccountUpdate;
    type ListOptions = AccountListOptions;

    fn id(&self) -> String {
        self.name.clone()
    }

    fn observed_state(&self) -> Account {
        self.clone()
    }

    fn validate_id(id: &String) -> Result<()> {
        require_name("account", id)
    }
}
