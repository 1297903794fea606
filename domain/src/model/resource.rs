use std::fmt::{Debug, Display};

use crate::error::Result;
use crate::model::vo::{Page, ResourceKind};

/// A scheduler object the client can list, fetch, mutate and watch.
pub trait Resource: Clone + Debug + Send + Sync + 'static {
    const KIND: ResourceKind;

    type Id: Clone + Debug + Display + Ord + Send + Sync + 'static;
    /// What a watch compares between two polls.
    type State: Clone + Debug + PartialEq + Send + Sync + 'static;
    type Create: Validate + Debug + Send + Sync;
    type CreateResponse: Debug + Send + Sync;
    type Update: Patch + Debug + Send + Sync;
    type ListOptions: Filter<Self> + Clone + Debug + Default + Send + Sync + 'static;

    fn id(&self) -> Self::Id;

    fn observed_state(&self) -> Self::State;

    /// Rejects identifiers that can never name an object.
    fn validate_id(id: &Self::Id) -> Result<()>;
}

/// Client-side half of a list query.
pub trait Filter<R> {
    fn matches(&self, item: &R) -> bool;

    fn page(&self) -> Page;

    /// The same filter without the offset/limit window.
    fn unpaged(&self) -> Self
    where
        Self: Sized;
}

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// A sparse update.
pub trait Patch {
    fn is_empty(&self) -> bool;
}

/// Empty `wanted` accepts everything.
pub(crate) fn any_of<T, U>(wanted: &[T], value: &U) -> bool
where
    T: PartialEq<U>,
    U: ?Sized,
{
    wanted.is_empty() || wanted.iter().any(|w| w == value)
}

/// Empty `wanted` accepts everything, otherwise one of `values` must be wanted.
pub(crate) fn any_in<T, U>(wanted: &[T], values: &[U]) -> bool
where
    T: PartialEq<U>,
{
    wanted.is_empty() || values.iter().any(|v| wanted.iter().any(|w| w == v))
}

/// Names end up as URL path segments.
pub(crate) fn require_name(what: &str, name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(crate::Error::validation(format!("{what} name must not be empty")));
    }
    if name.contains(|c: char| c == '/' || c.is_whitespace()) {
        return Err(crate::Error::validation(format!("invalid {what} name {name:?}")));
    }
    Ok(())
}
