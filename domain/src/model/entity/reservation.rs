use chrono::{DateTime, Utc};

use crate::error::{Error, Result};
use crate::model::resource::{any_in, any_of, require_name, Filter, Patch, Resource, Validate};
use crate::model::vo::{Page, ResourceKind};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reservation {
    pub name: String,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    /// Reserved nodes, expanded from the controller's hostlist.
    pub nodes: Vec<String>,
    pub node_count: Option<u32>,
    pub partition: String,
    pub users: Vec<String>,
    pub accounts: Vec<String>,
    pub flags: Vec<String>,
}

impl Reservation {
    pub fn is_active_at(&self, at: DateTime<Utc>) -> bool {
        self.start_time.map_or(true, |start| start <= at)
            && self.end_time.map_or(true, |end| at < end)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReservationCreate {
    pub name: String,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    /// Minutes; used when `end_time` is absent.
    pub duration: Option<u32>,
    pub nodes: Vec<String>,
    pub node_count: Option<u32>,
    pub partition: String,
    pub users: Vec<String>,
    pub accounts: Vec<String>,
    pub flags: Vec<String>,
}

impl Validate for ReservationCreate {
    fn validate(&self) -> Result<()> {
        require_name("reservation", &self.name)?;
        if self.users.is_empty() && self.accounts.is_empty() {
            return Err(Error::validation("a reservation needs users or accounts"));
        }
        if let (Some(start), Some(end)) = (self.start_time, self.end_time) {
            if end <= start {
                return Err(Error::validation("reservation ends before it starts"));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReservationUpdate {
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub duration: Option<u32>,
    pub nodes: Option<Vec<String>>,
    pub node_count: Option<u32>,
    pub users: Option<Vec<String>>,
    pub accounts: Option<Vec<String>>,
    pub flags: Option<Vec<String>>,
}

impl Patch for ReservationUpdate {
    fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReservationListOptions {
    pub names: Vec<String>,
    pub users: Vec<String>,
    pub accounts: Vec<String>,
    pub partitions: Vec<String>,
    pub limit: Option<usize>,
    pub offset: usize,
}

impl Filter<Reservation> for ReservationListOptions {
    fn matches(&self, reservation: &Reservation) -> bool {
        any_of(&self.names, reservation.name.as_str())
            && any_in(&self.users, &reservation.users)
            && any_in(&self.accounts, &reservation.accounts)
            && any_of(&self.partitions, reservation.partition.as_str())
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

impl Resource for Reservation {
    const KIND: ResourceKind = ResourceKind::Reservation;

    type Id = String;
    /// Reservations have no status field; any change to the record counts.
    type State = Reservation;
    type Create = ReservationCreate;
    type CreateResponse = super::Created<String>;
    type Update = ReservationUpdate;
    type ListOptions = ReservationListOptions;

    fn id(&self) -> String {
        self.name.clone()
    }

    fn observed_state(&self) -> Reservation {
        self.clone()
    }

    fn validate_id(id: &String) -> Result<()> {
        require_name("reservation", id)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn create_needs_principals() {
        let mut create = ReservationCreate {
            name: "maint".to_owned(),
            ..Default::default()
        };
        assert!(create.validate().is_err());
        create.users = vec!["root".to_owned()];
        assert!(create.validate().is_ok());

        create.start_time = Some(Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap());
        create.end_time = Some(Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap());
        assert!(create.validate().is_err());
    }

    #[test]
    fn active_window() {
        let reservation = Reservation {
            start_time: Some(Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap()),
            end_time: Some(Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()),
            ..Default::default()
        };
        assert!(reservation.is_active_at(Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap()));
        assert!(!reservation.is_active_at(Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()));
    }
}
