//! Hostel domain records.
//!
//! Records are plain data. Who may see or change them is decided in
//! [`crate::scope`] and [`crate::guard`]; how they are stored is the
//! [`crate::store::Store`]'s business.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::password::PasswordHash;

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generates a fresh random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wraps an existing UUID.
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the underlying UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s.trim()).map(Self)
            }
        }
    };
}

record_id!(
    /// Identifies a user (admin, warden or resident).
    UserId
);
record_id!(
    /// Identifies a hostel.
    HostelId
);
record_id!(
    /// Identifies a room.
    RoomId
);
record_id!(
    /// Identifies a complaint.
    ComplaintId
);
record_id!(
    /// Identifies an attendance entry.
    AttendanceId
);

/// The role a user acts under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Sees and changes everything
    Admin,
    /// Scoped to the one hostel they keep
    Warden,
    /// Scoped to their own records
    #[default]
    Resident,
}

impl Role {
    /// Every role, in privilege order.
    pub const ALL: [Role; 3] = [Role::Admin, Role::Warden, Role::Resident];

    /// Returns the wire name of the role.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Warden => "warden",
            Role::Resident => "resident",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "warden" => Ok(Role::Warden),
            "resident" => Ok(Role::Resident),
            other => Err(format!("unknown role '{other}'")),
        }
    }
}

/// A stored user account.
///
/// The password hash never leaves the crate in serialized form.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique identifier
    pub id: UserId,
    /// Display name
    pub name: String,
    /// Login email, stored lowercased
    pub email: String,
    /// Salted password hash
    #[serde(skip_serializing)]
    pub password_hash: PasswordHash,
    /// Role the user acts under
    pub role: Role,
    /// Hostel the user belongs to (residents) or keeps (wardens)
    pub hostel_id: Option<HostelId>,
    /// Room the user occupies
    pub room_id: Option<RoomId>,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Creates an unaffiliated user.
    pub fn new(name: String, email: String, password_hash: PasswordHash, role: Role) -> Self {
        Self {
            id: UserId::new(),
            name,
            email,
            password_hash,
            role,
            hostel_id: None,
            room_id: None,
            created_at: Utc::now(),
        }
    }
}

/// A hostel building.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hostel {
    /// Unique identifier
    pub id: HostelId,
    /// Display name
    pub name: String,
    /// Number of beds
    pub capacity: u32,
    /// Warden keeping this hostel
    pub warden_id: Option<UserId>,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

impl Hostel {
    /// Creates a hostel with no warden.
    pub fn new(name: String, capacity: u32) -> Self {
        Self {
            id: HostelId::new(),
            name,
            capacity,
            warden_id: None,
            created_at: Utc::now(),
        }
    }
}

/// A room inside a hostel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    /// Unique identifier
    pub id: RoomId,
    /// Owning hostel
    pub hostel_id: HostelId,
    /// Room label, e.g. "A-101"
    pub number: String,
    /// Maximum number of occupants
    pub capacity: u32,
    /// Current occupants; a set, so a user appears at most once
    pub occupants: BTreeSet<UserId>,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

impl Room {
    /// Creates an empty room.
    pub fn new(hostel_id: HostelId, number: String, capacity: u32) -> Self {
        Self {
            id: RoomId::new(),
            hostel_id,
            number,
            capacity,
            occupants: BTreeSet::new(),
            created_at: Utc::now(),
        }
    }

    /// Returns `true` when no further occupant fits.
    pub fn is_full(&self) -> bool {
        self.occupants.len() >= self.capacity as usize
    }

    /// Returns `true` if the user already occupies this room.
    pub fn houses(&self, user: UserId) -> bool {
        self.occupants.contains(&user)
    }
}

/// Daily attendance mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    /// Resident was present
    Present,
    /// Resident was absent
    Absent,
}

/// One attendance entry; unique per (resident, date).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceEntry {
    /// Unique identifier, stable across re-marks
    pub id: AttendanceId,
    /// The resident the mark is for
    pub resident_id: UserId,
    /// Calendar day
    pub date: NaiveDate,
    /// Latest status
    pub status: AttendanceStatus,
    /// Staff member who last marked the entry
    pub marked_by: UserId,
    /// Time of the latest mark
    pub updated_at: DateTime<Utc>,
}

/// Lifecycle of a complaint.
///
/// ```text
/// pending ──> in-progress ──> resolved
///    └──────────────────────────^
/// ```
///
/// Transitions only move forward; `resolved` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComplaintStatus {
    /// Filed, not yet picked up
    #[default]
    Pending,
    /// Staff are working on it
    InProgress,
    /// Closed by staff
    Resolved,
}

impl ComplaintStatus {
    fn rank(self) -> u8 {
        match self {
            ComplaintStatus::Pending => 0,
            ComplaintStatus::InProgress => 1,
            ComplaintStatus::Resolved => 2,
        }
    }

    /// Returns `true` if a complaint in this state may move to `next`.
    ///
    /// Staying in the same state is allowed so staff can amend the response.
    /// A pending complaint may be resolved without passing through
    /// in-progress.
    pub fn can_transition_to(self, next: ComplaintStatus) -> bool {
        next.rank() >= self.rank()
    }

    /// Returns the wire name of the status.
    pub fn as_str(self) -> &'static str {
        match self {
            ComplaintStatus::Pending => "pending",
            ComplaintStatus::InProgress => "in-progress",
            ComplaintStatus::Resolved => "resolved",
        }
    }
}

impl fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resident's complaint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Complaint {
    /// Unique identifier
    pub id: ComplaintId,
    /// Resident who filed it
    pub author_id: UserId,
    /// Author's hostel at filing time
    pub hostel_id: Option<HostelId>,
    /// Short summary
    pub title: String,
    /// Full description
    pub description: String,
    /// Current lifecycle state
    pub status: ComplaintStatus,
    /// Staff response, if any
    pub response: Option<String>,
    /// Filing time
    pub created_at: DateTime<Utc>,
    /// Time of the latest change
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_roundtrip_through_strings() {
        let id = RoomId::new();
        let parsed: RoomId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
        assert!("not-a-uuid".parse::<RoomId>().is_err());
    }

    #[test]
    fn role_wire_names() {
        assert_eq!(serde_json::to_string(&Role::Warden).unwrap(), "\"warden\"");
        assert_eq!("resident".parse::<Role>().unwrap(), Role::Resident);
        assert!("superuser".parse::<Role>().is_err());
        assert_eq!(Role::default(), Role::Resident);
    }

    #[test]
    fn complaint_status_uses_kebab_case() {
        assert_eq!(
            serde_json::to_string(&ComplaintStatus::InProgress).unwrap(),
            "\"in-progress\""
        );
        let parsed: ComplaintStatus = serde_json::from_str("\"resolved\"").unwrap();
        assert_eq!(parsed, ComplaintStatus::Resolved);
    }

    #[test]
    fn complaint_transitions_only_move_forward() {
        use ComplaintStatus::*;
        assert!(Pending.can_transition_to(InProgress));
        assert!(InProgress.can_transition_to(Resolved));
        assert!(InProgress.can_transition_to(InProgress));
        assert!(!InProgress.can_transition_to(Pending));
        assert!(!Resolved.can_transition_to(Pending));
        assert!(!Resolved.can_transition_to(InProgress));
        assert!(Resolved.can_transition_to(Resolved));
    }

    #[test]
    fn pending_complaint_may_be_resolved_directly() {
        assert!(ComplaintStatus::Pending.can_transition_to(ComplaintStatus::Resolved));
    }

    #[test]
    fn room_fullness_tracks_capacity() {
        let mut room = Room::new(HostelId::new(), "A-1".into(), 2);
        assert!(!room.is_full());
        room.occupants.insert(UserId::new());
        room.occupants.insert(UserId::new());
        assert!(room.is_full());
    }

    #[test]
    fn user_serialization_omits_password_hash() {
        let user = User::new(
            "Ada".into(),
            "ada@hostel.com".into(),
            PasswordHash::from_encoded("pbkdf2-sha256$1$c2FsdA$aGFzaA"),
            Role::Resident,
        );
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["role"], "resident");
        assert!(json["hostelId"].is_null());
    }
}
