//! Read visibility per principal.
//!
//! Each resource gets a scope computed from the principal's role and hostel
//! affiliation:
//!
//! | Resource   | admin | warden                       | resident               |
//! |------------|-------|------------------------------|------------------------|
//! | Hostels    | all   | `wardenId == principal.id`   | `id == principal.hostel` |
//! | Rooms      | all   | `hostelId == principal.hostel` | `hostelId == principal.hostel` |
//! | Users      | all   | `hostelId == principal.hostel` | forbidden            |
//! | Attendance | all   | residents of principal.hostel | own entries           |
//! | Complaints | all   | authors in principal.hostel  | own complaints         |
//!
//! A warden or resident without an affiliation gets [`RecordScope::Nothing`],
//! never an error and never "all". Scopes are plain values; stores evaluate
//! them with the `admits_*` predicates.

use chrono::NaiveDate;

use crate::error::Violation;
use crate::model::{AttendanceEntry, Hostel, HostelId, Role, Room, User, UserId};
use crate::request::Principal;

/// Which hostels a principal may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostelScope {
    /// Every hostel
    All,
    /// Hostels kept by this warden
    WardenedBy(UserId),
    /// Exactly one hostel
    Only(HostelId),
    /// No hostel
    Nothing,
}

impl HostelScope {
    /// Returns `true` if `hostel` is visible under this scope.
    pub fn admits_hostel(&self, hostel: &Hostel) -> bool {
        match self {
            HostelScope::All => true,
            HostelScope::WardenedBy(warden) => hostel.warden_id == Some(*warden),
            HostelScope::Only(id) => hostel.id == *id,
            HostelScope::Nothing => false,
        }
    }
}

/// Which hostel-bound records a principal may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordScope {
    /// Every record
    All,
    /// Records belonging to one hostel (by room, or by the owner's current hostel)
    Hostel(HostelId),
    /// Records owned by one user
    Owner(UserId),
    /// No record
    Nothing,
}

impl RecordScope {
    fn for_hostel(hostel: Option<HostelId>) -> Self {
        hostel.map_or(RecordScope::Nothing, RecordScope::Hostel)
    }

    /// Returns `true` if a record owned by `owner`, who currently lives in
    /// `owner_hostel`, is visible.
    pub fn admits_owner(&self, owner: UserId, owner_hostel: Option<HostelId>) -> bool {
        match self {
            RecordScope::All => true,
            RecordScope::Hostel(h) => owner_hostel == Some(*h),
            RecordScope::Owner(id) => owner == *id,
            RecordScope::Nothing => false,
        }
    }

    /// Returns `true` if `room` is visible.
    pub fn admits_room(&self, room: &Room) -> bool {
        match self {
            RecordScope::All => true,
            RecordScope::Hostel(h) => room.hostel_id == *h,
            RecordScope::Owner(_) | RecordScope::Nothing => false,
        }
    }

    /// Returns `true` if `user` is visible.
    pub fn admits_user(&self, user: &User) -> bool {
        self.admits_owner(user.id, user.hostel_id)
    }
}

/// Hostels visible to `principal`.
pub fn hostels(principal: &Principal) -> HostelScope {
    match principal.role {
        Role::Admin => HostelScope::All,
        Role::Warden => HostelScope::WardenedBy(principal.id),
        Role::Resident => principal
            .hostel
            .map_or(HostelScope::Nothing, HostelScope::Only),
    }
}

/// Rooms visible to `principal`.
pub fn rooms(principal: &Principal) -> RecordScope {
    match principal.role {
        Role::Admin => RecordScope::All,
        Role::Warden | Role::Resident => RecordScope::for_hostel(principal.hostel),
    }
}

/// Users visible to `principal`.
///
/// # Errors
///
/// Residents may not list users and get a `Forbidden` violation.
pub fn users(principal: &Principal) -> Result<RecordScope, Violation> {
    match principal.role {
        Role::Admin => Ok(RecordScope::All),
        Role::Warden => Ok(RecordScope::for_hostel(principal.hostel)),
        Role::Resident => Err(Violation::forbidden("Forbidden")),
    }
}

/// Attendance entries visible to `principal`.
pub fn attendance(principal: &Principal) -> RecordScope {
    owned_records(principal)
}

/// Complaints visible to `principal`.
pub fn complaints(principal: &Principal) -> RecordScope {
    owned_records(principal)
}

fn owned_records(principal: &Principal) -> RecordScope {
    match principal.role {
        Role::Admin => RecordScope::All,
        Role::Warden => RecordScope::for_hostel(principal.hostel),
        Role::Resident => RecordScope::Owner(principal.id),
    }
}

/// A room listing: the principal's scope narrowed by an optional hostel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomFilter {
    /// Visibility bound
    pub scope: RecordScope,
    /// Requested hostel, if any
    pub hostel: Option<HostelId>,
}

impl RoomFilter {
    /// Every room visible under `scope`.
    pub fn new(scope: RecordScope) -> Self {
        Self {
            scope,
            hostel: None,
        }
    }

    /// Narrows the listing to one hostel.
    pub fn in_hostel(mut self, hostel: Option<HostelId>) -> Self {
        self.hostel = hostel;
        self
    }

    /// Returns `true` if `room` passes both the scope and the request filter.
    pub fn admits(&self, room: &Room) -> bool {
        self.scope.admits_room(room) && self.hostel.map_or(true, |h| room.hostel_id == h)
    }
}

/// An attendance listing: the principal's scope narrowed by optional
/// resident and inclusive date bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttendanceFilter {
    /// Visibility bound
    pub scope: RecordScope,
    /// Requested resident, if any
    pub resident: Option<UserId>,
    /// First day to include
    pub from: Option<NaiveDate>,
    /// Last day to include
    pub to: Option<NaiveDate>,
}

impl AttendanceFilter {
    /// Every entry visible under `scope`.
    pub fn new(scope: RecordScope) -> Self {
        Self {
            scope,
            resident: None,
            from: None,
            to: None,
        }
    }

    /// Returns `true` if `entry` passes the scope and every request filter.
    ///
    /// `resident_hostel` is the current hostel of the entry's resident.
    pub fn admits(&self, entry: &AttendanceEntry, resident_hostel: Option<HostelId>) -> bool {
        self.scope.admits_owner(entry.resident_id, resident_hostel)
            && self.resident.map_or(true, |r| entry.resident_id == r)
            && self.from.map_or(true, |d| entry.date >= d)
            && self.to.map_or(true, |d| entry.date <= d)
    }
}
