use crate::error::Result;
use crate::model::resource::{any_of, require_name, Filter, Patch, Resource, Validate};
use crate::model::vo::{Page, ResourceKind};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct User {
    pub name: String,
    pub default_account: String,
    pub default_wckey: String,
    pub admin_level: AdminLevel,
    /// Accounts this user coordinates.
    pub coordinator_accounts: Vec<String>,
    /// Accounts this user has an association with.
    pub accounts: Vec<String>,
}

#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum AdminLevel {
    #[default]
    None,
    Operator,
    #[strum(to_string = "Administrator", serialize = "Admin")]
    Administrator,
}

impl AdminLevel {
    pub fn parse(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserCreate {
    pub name: String,
    pub default_account: String,
    pub default_wckey: String,
    pub admin_level: Option<AdminLevel>,
}

impl Validate for UserCreate {
    fn validate(&self) -> Result<()> {
        require_name("user", &self.name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserUpdate {
    pub default_account: Option<String>,
    pub default_wckey: Option<String>,
    pub admin_level: Option<AdminLevel>,
}

impl Patch for UserUpdate {
    fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserListOptions {
    pub names: Vec<String>,
    pub default_accounts: Vec<String>,
    pub admin_levels: Vec<AdminLevel>,
    pub limit: Option<usize>,
    pub offset: usize,
}

impl Filter<User> for UserListOptions {
    fn matches(&self, user: &User) -> bool {
        any_of(&self.names, user.name.as_str())
            && any_of(&self.default_accounts, user.default_account.as_str())
            && any_of(&self.admin_levels, &user.admin_level)
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

impl Resource for User {
    const KIND: ResourceKind = ResourceKind::User;

    type Id = String;
    type State = User;
    type Create = UserCreate;
    type CreateResponse = super::Created<String>;
    type Update = UserUpdate;
    type ListOptions = UserListOptions;

    fn id(&self) -> String {
        self.name.clone()
    }

    fn observed_state(&self) -> User {
        self.clone()
    }

    fn validate_id(id: &String) -> Result<()> {
        require_name("user", id)
    }
}

#[cfg(test)]
mod tests {
    use super::AdminLevel;

    #[test]
    fn admin_level_names() {
        assert_eq!(AdminLevel::parse("Administrator"), AdminLevel::Administrator);
        assert_eq!(AdminLevel::parse("admin"), AdminLevel::Administrator);
        assert_eq!(AdminLevel::parse("operator"), AdminLevel::Operator);
        assert_eq!(AdminLevel::parse("Not Set"), AdminLevel::None);
        assert_eq!(AdminLevel::Administrator.to_string(), "Administrator");
    }
}
