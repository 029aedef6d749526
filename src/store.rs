//! Persistence contract.
//!
//! Lookups return `Ok(None)` for absent records; services turn that into a
//! `NotFound` violation naming the entity. Listings take scope values from
//! [`crate::scope`] and must return only admitted records.
//!
//! Operations that touch several records ([`Store::update_user`],
//! [`Store::place_in_room`], [`Store::assign_warden`],
//! [`Store::upsert_attendance`]) must apply all of their changes atomically
//! or none of them. Conditional writes ([`Store::update_complaint`]) re-check
//! their condition under the same guard that applies the write.

mod memory;

pub use memory::MemoryStore;

use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

use crate::model::{
    AttendanceEntry, AttendanceStatus, Complaint, ComplaintId, ComplaintStatus, Hostel, HostelId,
    Role, Room, RoomId, User, UserId,
};
use crate::scope::{AttendanceFilter, HostelScope, RecordScope, RoomFilter};

/// Store failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A record named by an update does not exist.
    #[error("{entity} {id} not found")]
    NotFound {
        /// Entity name, e.g. "Room"
        entity: &'static str,
        /// The missing identifier
        id: String,
    },
    /// The room has no free place.
    #[error("room {room} is full")]
    RoomFull {
        /// The full room
        room: RoomId,
    },
    /// Another user already has this email.
    #[error("email {0} already registered")]
    DuplicateEmail(String),
    /// A warden's hostel may only change through [`Store::assign_warden`].
    #[error("warden {0} is bound to a hostel only by assignment")]
    WardenRebind(UserId),
    /// The complaint's current status does not allow the requested move.
    #[error("complaint cannot move from {from} to {to}")]
    BackwardTransition {
        /// Status at the time of the write
        from: ComplaintStatus,
        /// Requested status
        to: ComplaintStatus,
    },
    /// The backing store failed.
    #[error("store backend failure: {0}")]
    Backend(String),
}

impl StoreError {
    pub(crate) fn not_found(entity: &'static str, id: impl ToString) -> Self {
        StoreError::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

/// A single attendance mark to record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttendanceMark {
    /// The resident being marked
    pub resident_id: UserId,
    /// Calendar day
    pub date: NaiveDate,
    /// Status for that day
    pub status: AttendanceStatus,
    /// Staff member recording the mark
    pub marked_by: UserId,
    /// Time of the mark
    pub at: DateTime<Utc>,
}

/// Changes to apply to one user in a single step.
///
/// `None` leaves a field as it is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChange {
    /// New display name
    pub name: Option<String>,
    /// New role
    pub role: Option<Role>,
    /// New hostel; ignored when `room_id` is set
    pub hostel_id: Option<HostelId>,
    /// Room to move the user into
    pub room_id: Option<RoomId>,
}

/// A staff update to one complaint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplaintChange {
    /// Requested status
    pub status: ComplaintStatus,
    /// Replacement staff response, if any
    pub response: Option<String>,
    /// Time of the update
    pub at: DateTime<Utc>,
}

/// Storage for every hostel record.
///
/// Implementations are shared across request threads.
pub trait Store: Send + Sync {
    /// Inserts a new user.
    ///
    /// # Errors
    ///
    /// [`StoreError::DuplicateEmail`] if the email is taken.
    fn insert_user(&self, user: User) -> Result<User, StoreError>;

    /// Looks up a user by id.
    fn user(&self, id: UserId) -> Result<Option<User>, StoreError>;

    /// Looks up a user by (lowercased) email.
    fn user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Lists users admitted by `scope`.
    fn users(&self, scope: RecordScope) -> Result<Vec<User>, StoreError>;

    /// Applies `change` to user `id` atomically.
    ///
    /// Keeps room placement, hostel affiliation and warden assignment in
    /// agreement:
    /// - a room change behaves like [`Store::place_in_room`] and the user
    ///   takes the room's hostel
    /// - a hostel change that leaves the user's room in another hostel
    ///   vacates that room
    /// - a user who becomes a warden leaves their room and hostel, and one
    ///   who stops being a warden no longer keeps any hostel
    ///
    /// # Errors
    ///
    /// - [`StoreError::NotFound`] for a missing user, hostel or room
    /// - [`StoreError::WardenRebind`] when the user ends up a warden and the
    ///   change names a hostel or room other than the one they keep
    /// - [`StoreError::RoomFull`] when the room has no space
    ///
    /// Nothing changes on error.
    fn update_user(&self, id: UserId, change: UserChange) -> Result<User, StoreError>;

    /// Inserts a new hostel.
    fn insert_hostel(&self, hostel: Hostel) -> Result<Hostel, StoreError>;

    /// Looks up a hostel by id.
    fn hostel(&self, id: HostelId) -> Result<Option<Hostel>, StoreError>;

    /// Lists hostels admitted by `scope`.
    fn hostels(&self, scope: HostelScope) -> Result<Vec<Hostel>, StoreError>;

    /// Finds the hostel kept by `warden`, if any.
    fn hostel_wardened_by(&self, warden: UserId) -> Result<Option<Hostel>, StoreError>;

    /// Makes `warden` the warden of `hostel`.
    ///
    /// Sets `hostel.warden_id` and the warden's `hostel_id` together, clears
    /// the warden from any hostel they kept before, and unbinds the hostel's
    /// previous warden.
    fn assign_warden(&self, hostel: HostelId, warden: UserId) -> Result<Hostel, StoreError>;

    /// Inserts a new room.
    fn insert_room(&self, room: Room) -> Result<Room, StoreError>;

    /// Looks up a room by id.
    fn room(&self, id: RoomId) -> Result<Option<Room>, StoreError>;

    /// Lists rooms admitted by `filter`.
    fn rooms(&self, filter: RoomFilter) -> Result<Vec<Room>, StoreError>;

    /// Adds `user` to `room` if it has space.
    ///
    /// In one atomic step: checks capacity, removes the user from their
    /// previous room, adds them to this room's occupant set and sets the
    /// user's `room_id` and `hostel_id`. A current occupant is accepted even
    /// when the room is full.
    ///
    /// # Errors
    ///
    /// [`StoreError::RoomFull`] when there is no space; nothing changes.
    fn place_in_room(&self, room: RoomId, user: UserId) -> Result<Room, StoreError>;

    /// Records an attendance mark, replacing any mark for the same
    /// (resident, date).
    fn upsert_attendance(&self, mark: AttendanceMark) -> Result<AttendanceEntry, StoreError>;

    /// Lists attendance entries admitted by `filter`.
    fn attendance(&self, filter: AttendanceFilter) -> Result<Vec<AttendanceEntry>, StoreError>;

    /// Inserts a new complaint.
    fn insert_complaint(&self, complaint: Complaint) -> Result<Complaint, StoreError>;

    /// Looks up a complaint by id.
    fn complaint(&self, id: ComplaintId) -> Result<Option<Complaint>, StoreError>;

    /// Lists complaints admitted by `scope`, judged by each author's current
    /// hostel.
    fn complaints(&self, scope: RecordScope) -> Result<Vec<Complaint>, StoreError>;

    /// Moves complaint `id` to `change.status` if its stored status allows
    /// it, replacing the response when one is given.
    ///
    /// # Errors
    ///
    /// [`StoreError::BackwardTransition`] if the stored status has already
    /// moved past `change.status`; nothing changes.
    fn update_complaint(&self, id: ComplaintId, change: ComplaintChange) -> Result<Complaint, StoreError>;
}
