use std::collections::HashMap;

use chrono::NaiveDate;
use parking_lot::RwLock;

use super::{AttendanceMark, ComplaintChange, Store, StoreError, UserChange};
use crate::model::{
    AttendanceEntry, AttendanceId, Complaint, ComplaintId, Hostel, HostelId, Role, Room, RoomId,
    User, UserId,
};
use crate::scope::{AttendanceFilter, HostelScope, RecordScope, RoomFilter};

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<UserId, User>,
    emails: HashMap<String, UserId>,
    hostels: HashMap<HostelId, Hostel>,
    rooms: HashMap<RoomId, Room>,
    attendance: HashMap<(UserId, NaiveDate), AttendanceEntry>,
    complaints: HashMap<ComplaintId, Complaint>,
}

impl Tables {
    fn hostel_of(&self, user: UserId) -> Option<HostelId> {
        self.users.get(&user).and_then(|u| u.hostel_id)
    }
}

/// An in-memory [`Store`].
///
/// All tables sit behind one `RwLock`; every multi-record update runs under a
/// single write guard. Listings come back in creation order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn sorted<T, K: Ord>(mut items: Vec<T>, key: impl Fn(&T) -> K) -> Vec<T> {
    items.sort_by_key(|item| key(item));
    items
}

impl Store for MemoryStore {
    fn insert_user(&self, user: User) -> Result<User, StoreError> {
        let mut t = self.tables.write();
        let email = user.email.to_lowercase();
        if t.emails.contains_key(&email) {
            return Err(StoreError::DuplicateEmail(email));
        }
        t.emails.insert(email, user.id);
        t.users.insert(user.id, user.clone());
        Ok(user)
    }

    fn user(&self, id: UserId) -> Result<Option<User>, StoreError> {
        Ok(self.tables.read().users.get(&id).cloned())
    }

    fn user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let t = self.tables.read();
        Ok(t.emails
            .get(&email.to_lowercase())
            .and_then(|id| t.users.get(id))
            .cloned())
    }

    fn users(&self, scope: RecordScope) -> Result<Vec<User>, StoreError> {
        let t = self.tables.read();
        let found = t
            .users
            .values()
            .filter(|u| scope.admits_user(u))
            .cloned()
            .collect();
        Ok(sorted(found, |u: &User| (u.created_at, u.id)))
    }

    fn update_user(&self, id: UserId, change: UserChange) -> Result<User, StoreError> {
        let mut t = self.tables.write();
        let current = t
            .users
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("User", id))?;
        if let Some(hostel) = change.hostel_id {
            if !t.hostels.contains_key(&hostel) {
                return Err(StoreError::not_found("Hostel", hostel));
            }
        }
        let target = match change.room_id {
            Some(room) => Some(
                t.rooms
                    .get(&room)
                    .cloned()
                    .ok_or_else(|| StoreError::not_found("Room", room))?,
            ),
            None => None,
        };

        let role = change.role.unwrap_or(current.role);
        if role == Role::Warden {
            let kept = t
                .hostels
                .values()
                .find(|h| h.warden_id == Some(id))
                .map(|h| h.id);
            if target.is_some() || change.hostel_id.is_some_and(|h| Some(h) != kept) {
                return Err(StoreError::WardenRebind(id));
            }
        }
        if let Some(room) = &target {
            if room.is_full() && !room.houses(id) {
                return Err(StoreError::RoomFull { room: room.id });
            }
        }

        let mut room_id = current.room_id;
        let mut hostel_id = current.hostel_id;
        if current.role == Role::Warden && role != Role::Warden {
            for hostel in t.hostels.values_mut() {
                if hostel.warden_id == Some(id) {
                    hostel.warden_id = None;
                }
            }
            hostel_id = None;
        }
        if role == Role::Warden && current.role != Role::Warden {
            room_id = None;
            hostel_id = None;
        }
        match &target {
            Some(room) => {
                room_id = Some(room.id);
                hostel_id = Some(room.hostel_id);
            }
            None => {
                if let Some(hostel) = change.hostel_id {
                    hostel_id = Some(hostel);
                }
            }
        }
        if let Some(room) = room_id {
            let same_hostel = t
                .rooms
                .get(&room)
                .is_some_and(|r| Some(r.hostel_id) == hostel_id);
            if !same_hostel {
                room_id = None;
            }
        }

        if let Some(old) = current.room_id.filter(|old| Some(*old) != room_id) {
            if let Some(old_room) = t.rooms.get_mut(&old) {
                old_room.occupants.remove(&id);
            }
        }
        if let Some(new_room) = room_id.and_then(|room| t.rooms.get_mut(&room)) {
            new_room.occupants.insert(id);
        }

        let stored = t
            .users
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found("User", id))?;
        if let Some(name) = change.name {
            stored.name = name;
        }
        stored.role = role;
        stored.room_id = room_id;
        stored.hostel_id = hostel_id;
        Ok(stored.clone())
    }

    fn insert_hostel(&self, hostel: Hostel) -> Result<Hostel, StoreError> {
        self.tables.write().hostels.insert(hostel.id, hostel.clone());
        Ok(hostel)
    }

    fn hostel(&self, id: HostelId) -> Result<Option<Hostel>, StoreError> {
        Ok(self.tables.read().hostels.get(&id).cloned())
    }

    fn hostels(&self, scope: HostelScope) -> Result<Vec<Hostel>, StoreError> {
        let t = self.tables.read();
        let found = t
            .hostels
            .values()
            .filter(|h| scope.admits_hostel(h))
            .cloned()
            .collect();
        Ok(sorted(found, |h: &Hostel| (h.created_at, h.id)))
    }

    fn hostel_wardened_by(&self, warden: UserId) -> Result<Option<Hostel>, StoreError> {
        let t = self.tables.read();
        Ok(t.hostels
            .values()
            .find(|h| h.warden_id == Some(warden))
            .cloned())
    }

    fn assign_warden(&self, hostel: HostelId, warden: UserId) -> Result<Hostel, StoreError> {
        let mut t = self.tables.write();
        if !t.users.contains_key(&warden) {
            return Err(StoreError::not_found("Warden", warden));
        }
        let previous = match t.hostels.get(&hostel) {
            Some(h) => h.warden_id,
            None => return Err(StoreError::not_found("Hostel", hostel)),
        };

        for other in t.hostels.values_mut() {
            if other.id != hostel && other.warden_id == Some(warden) {
                other.warden_id = None;
            }
        }
        if let Some(old) = previous.filter(|old| *old != warden) {
            if let Some(old_warden) = t.users.get_mut(&old) {
                if old_warden.hostel_id == Some(hostel) {
                    old_warden.hostel_id = None;
                }
            }
        }
        if let Some(user) = t.users.get_mut(&warden) {
            user.hostel_id = Some(hostel);
        }

        let stored = t
            .hostels
            .get_mut(&hostel)
            .ok_or_else(|| StoreError::not_found("Hostel", hostel))?;
        stored.warden_id = Some(warden);
        Ok(stored.clone())
    }

    fn insert_room(&self, room: Room) -> Result<Room, StoreError> {
        let mut t = self.tables.write();
        if !t.hostels.contains_key(&room.hostel_id) {
            return Err(StoreError::not_found("Hostel", room.hostel_id));
        }
        t.rooms.insert(room.id, room.clone());
        Ok(room)
    }

    fn room(&self, id: RoomId) -> Result<Option<Room>, StoreError> {
        Ok(self.tables.read().rooms.get(&id).cloned())
    }

    fn rooms(&self, filter: RoomFilter) -> Result<Vec<Room>, StoreError> {
        let t = self.tables.read();
        let found = t
            .rooms
            .values()
            .filter(|r| filter.admits(r))
            .cloned()
            .collect();
        Ok(sorted(found, |r: &Room| (r.created_at, r.id)))
    }

    fn place_in_room(&self, room: RoomId, user: UserId) -> Result<Room, StoreError> {
        let mut t = self.tables.write();
        let previous = match t.users.get(&user) {
            Some(u) => u.room_id,
            None => return Err(StoreError::not_found("User", user)),
        };
        let target = t
            .rooms
            .get_mut(&room)
            .ok_or_else(|| StoreError::not_found("Room", room))?;

        if !target.houses(user) {
            if target.is_full() {
                return Err(StoreError::RoomFull { room });
            }
            target.occupants.insert(user);
        }
        let placed = target.clone();

        if let Some(old) = previous.filter(|old| *old != room) {
            if let Some(old_room) = t.rooms.get_mut(&old) {
                old_room.occupants.remove(&user);
            }
        }
        if let Some(u) = t.users.get_mut(&user) {
            u.room_id = Some(room);
            u.hostel_id = Some(placed.hostel_id);
        }
        Ok(placed)
    }

    fn upsert_attendance(&self, mark: AttendanceMark) -> Result<AttendanceEntry, StoreError> {
        let mut t = self.tables.write();
        if !t.users.contains_key(&mark.resident_id) {
            return Err(StoreError::not_found("Resident", mark.resident_id));
        }
        let entry = t
            .attendance
            .entry((mark.resident_id, mark.date))
            .and_modify(|e| {
                e.status = mark.status;
                e.marked_by = mark.marked_by;
                e.updated_at = mark.at;
            })
            .or_insert_with(|| AttendanceEntry {
                id: AttendanceId::new(),
                resident_id: mark.resident_id,
                date: mark.date,
                status: mark.status,
                marked_by: mark.marked_by,
                updated_at: mark.at,
            });
        Ok(entry.clone())
    }

    fn attendance(&self, filter: AttendanceFilter) -> Result<Vec<AttendanceEntry>, StoreError> {
        let t = self.tables.read();
        let found = t
            .attendance
            .values()
            .filter(|e| filter.admits(e, t.hostel_of(e.resident_id)))
            .cloned()
            .collect();
        Ok(sorted(found, |e: &AttendanceEntry| (e.date, e.resident_id)))
    }

    fn insert_complaint(&self, complaint: Complaint) -> Result<Complaint, StoreError> {
        self.tables
            .write()
            .complaints
            .insert(complaint.id, complaint.clone());
        Ok(complaint)
    }

    fn complaint(&self, id: ComplaintId) -> Result<Option<Complaint>, StoreError> {
        Ok(self.tables.read().complaints.get(&id).cloned())
    }

    fn complaints(&self, scope: RecordScope) -> Result<Vec<Complaint>, StoreError> {
        let t = self.tables.read();
        let found = t
            .complaints
            .values()
            .filter(|c| scope.admits_owner(c.author_id, t.hostel_of(c.author_id)))
            .cloned()
            .collect();
        Ok(sorted(found, |c: &Complaint| (c.created_at, c.id)))
    }

    fn update_complaint(
        &self,
        id: ComplaintId,
        change: ComplaintChange,
    ) -> Result<Complaint, StoreError> {
        let mut t = self.tables.write();
        let stored = t
            .complaints
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found("Complaint", id))?;
        if !stored.status.can_transition_to(change.status) {
            return Err(StoreError::BackwardTransition {
                from: stored.status,
                to: change.status,
            });
        }
        stored.status = change.status;
        if let Some(response) = change.response {
            stored.response = Some(response);
        }
        stored.updated_at = change.at;
        Ok(stored.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AttendanceStatus, ComplaintStatus, Role};
    use crate::password::PasswordHash;
    use chrono::Utc;
    use std::sync::Arc;

    fn resident(store: &MemoryStore, email: &str) -> User {
        store
            .insert_user(User::new(
                "Resident".into(),
                email.into(),
                PasswordHash::from_encoded("x"),
                Role::Resident,
            ))
            .unwrap()
    }

    fn hostel_with_room(store: &MemoryStore, capacity: u32) -> (Hostel, Room) {
        let hostel = store.insert_hostel(Hostel::new("Hostel A".into(), 100)).unwrap();
        let room = store
            .insert_room(Room::new(hostel.id, "A-1".into(), capacity))
            .unwrap();
        (hostel, room)
    }

    #[test]
    fn duplicate_emails_are_rejected_case_insensitively() {
        let store = MemoryStore::new();
        resident(&store, "ada@hostel.com");
        let dup = store.insert_user(User::new(
            "Other".into(),
            "ADA@hostel.com".into(),
            PasswordHash::from_encoded("x"),
            Role::Resident,
        ));
        assert!(matches!(dup, Err(StoreError::DuplicateEmail(_))));
        assert!(store.user_by_email("Ada@Hostel.com").unwrap().is_some());
    }

    #[test]
    fn placement_moves_user_between_rooms() {
        let store = MemoryStore::new();
        let (hostel, first) = hostel_with_room(&store, 2);
        let second = store.insert_room(Room::new(hostel.id, "A-2".into(), 2)).unwrap();
        let r = resident(&store, "r@hostel.com");

        store.place_in_room(first.id, r.id).unwrap();
        store.place_in_room(second.id, r.id).unwrap();

        assert!(store.room(first.id).unwrap().unwrap().occupants.is_empty());
        assert!(store.room(second.id).unwrap().unwrap().houses(r.id));
        let stored = store.user(r.id).unwrap().unwrap();
        assert_eq!(stored.room_id, Some(second.id));
        assert_eq!(stored.hostel_id, Some(hostel.id));
    }

    #[test]
    fn placement_is_a_set_add() {
        let store = MemoryStore::new();
        let (_, room) = hostel_with_room(&store, 1);
        let r = resident(&store, "r@hostel.com");

        store.place_in_room(room.id, r.id).unwrap();
        let again = store.place_in_room(room.id, r.id).unwrap();
        assert_eq!(again.occupants.len(), 1);
    }

    #[test]
    fn full_room_rejects_and_leaves_state_untouched() {
        let store = MemoryStore::new();
        let (_, room) = hostel_with_room(&store, 1);
        let a = resident(&store, "a@hostel.com");
        let b = resident(&store, "b@hostel.com");

        store.place_in_room(room.id, a.id).unwrap();
        let err = store.place_in_room(room.id, b.id).unwrap_err();
        assert_eq!(err, StoreError::RoomFull { room: room.id });
        assert_eq!(store.user(b.id).unwrap().unwrap().room_id, None);
        assert_eq!(store.room(room.id).unwrap().unwrap().occupants.len(), 1);
    }

    #[test]
    fn concurrent_placement_never_exceeds_capacity() {
        let store = Arc::new(MemoryStore::new());
        let (_, room) = hostel_with_room(&store, 3);
        let residents: Vec<User> = (0..16)
            .map(|i| resident(&store, &format!("r{i}@hostel.com")))
            .collect();

        let successes = std::thread::scope(|s| {
            let handles: Vec<_> = residents
                .iter()
                .map(|r| {
                    let store = Arc::clone(&store);
                    let id = r.id;
                    s.spawn(move || store.place_in_room(room.id, id).is_ok())
                })
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap())
                .filter(|ok| *ok)
                .count()
        });

        assert_eq!(successes, 3);
        assert_eq!(store.room(room.id).unwrap().unwrap().occupants.len(), 3);
    }

    #[test]
    fn warden_assignment_keeps_both_sides_in_sync() {
        let store = MemoryStore::new();
        let a = store.insert_hostel(Hostel::new("A".into(), 10)).unwrap();
        let b = store.insert_hostel(Hostel::new("B".into(), 10)).unwrap();
        let w = store
            .insert_user(User::new(
                "Warden".into(),
                "w@hostel.com".into(),
                PasswordHash::from_encoded("x"),
                Role::Warden,
            ))
            .unwrap();

        store.assign_warden(a.id, w.id).unwrap();
        store.assign_warden(b.id, w.id).unwrap();

        assert_eq!(store.hostel(a.id).unwrap().unwrap().warden_id, None);
        assert_eq!(store.hostel(b.id).unwrap().unwrap().warden_id, Some(w.id));
        assert_eq!(store.user(w.id).unwrap().unwrap().hostel_id, Some(b.id));
        assert_eq!(store.hostel_wardened_by(w.id).unwrap().unwrap().id, b.id);
    }

    #[test]
    fn attendance_upsert_overwrites() {
        let store = MemoryStore::new();
        let r = resident(&store, "r@hostel.com");
        let staff = UserId::new();
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        let mark = |status| AttendanceMark {
            resident_id: r.id,
            date,
            status,
            marked_by: staff,
            at: Utc::now(),
        };

        let first = store.upsert_attendance(mark(AttendanceStatus::Present)).unwrap();
        let second = store.upsert_attendance(mark(AttendanceStatus::Absent)).unwrap();
        assert_eq!(first.id, second.id);

        let all = store
            .attendance(AttendanceFilter::new(RecordScope::All))
            .unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].status, AttendanceStatus::Absent);
    }

    #[test]
    fn complaint_scope_follows_author_hostel() {
        let store = MemoryStore::new();
        let (hostel, room) = hostel_with_room(&store, 2);
        let r = resident(&store, "r@hostel.com");
        store.place_in_room(room.id, r.id).unwrap();

        let c = Complaint {
            id: ComplaintId::new(),
            author_id: r.id,
            hostel_id: None,
            title: "Noise".into(),
            description: "Loud".into(),
            status: Default::default(),
            response: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        store.insert_complaint(c).unwrap();

        assert_eq!(store.complaints(RecordScope::Hostel(hostel.id)).unwrap().len(), 1);
        assert!(store
            .complaints(RecordScope::Hostel(HostelId::new()))
            .unwrap()
            .is_empty());
    }

    fn warden(store: &MemoryStore, email: &str) -> User {
        store
            .insert_user(User::new(
                "Warden".into(),
                email.into(),
                PasswordHash::from_encoded("x"),
                Role::Warden,
            ))
            .unwrap()
    }

    fn pending_complaint(store: &MemoryStore, author: UserId) -> Complaint {
        let now = Utc::now();
        store
            .insert_complaint(Complaint {
                id: ComplaintId::new(),
                author_id: author,
                hostel_id: None,
                title: "Heating".into(),
                description: "Radiator is cold".into(),
                status: ComplaintStatus::Pending,
                response: None,
                created_at: now,
                updated_at: now,
            })
            .unwrap()
    }

    fn to(status: ComplaintStatus) -> ComplaintChange {
        ComplaintChange {
            status,
            response: None,
            at: Utc::now(),
        }
    }

    #[test]
    fn hostel_change_vacates_room_elsewhere() {
        let store = MemoryStore::new();
        let (_, room) = hostel_with_room(&store, 2);
        let other = store.insert_hostel(Hostel::new("Hostel B".into(), 10)).unwrap();
        let r = resident(&store, "r@hostel.com");
        store.place_in_room(room.id, r.id).unwrap();

        let moved = store
            .update_user(
                r.id,
                UserChange {
                    hostel_id: Some(other.id),
                    ..UserChange::default()
                },
            )
            .unwrap();

        assert_eq!(moved.hostel_id, Some(other.id));
        assert_eq!(moved.room_id, None);
        assert!(!store.room(room.id).unwrap().unwrap().houses(r.id));
    }

    #[test]
    fn same_hostel_keeps_the_room() {
        let store = MemoryStore::new();
        let (hostel, room) = hostel_with_room(&store, 2);
        let r = resident(&store, "r@hostel.com");
        store.place_in_room(room.id, r.id).unwrap();

        let kept = store
            .update_user(
                r.id,
                UserChange {
                    name: Some("Renamed".into()),
                    hostel_id: Some(hostel.id),
                    ..UserChange::default()
                },
            )
            .unwrap();

        assert_eq!(kept.name, "Renamed");
        assert_eq!(kept.room_id, Some(room.id));
        assert!(store.room(room.id).unwrap().unwrap().houses(r.id));
    }

    #[test]
    fn rejected_update_changes_nothing() {
        let store = MemoryStore::new();
        let (_, room) = hostel_with_room(&store, 1);
        let a = resident(&store, "a@hostel.com");
        let b = resident(&store, "b@hostel.com");
        store.place_in_room(room.id, a.id).unwrap();

        let err = store
            .update_user(
                b.id,
                UserChange {
                    name: Some("Bea".into()),
                    room_id: Some(room.id),
                    ..UserChange::default()
                },
            )
            .unwrap_err();

        assert_eq!(err, StoreError::RoomFull { room: room.id });
        let stored = store.user(b.id).unwrap().unwrap();
        assert_eq!(stored.name, "Resident");
        assert_eq!(stored.room_id, None);
    }

    #[test]
    fn warden_hostel_moves_only_by_assignment() {
        let store = MemoryStore::new();
        let a = store.insert_hostel(Hostel::new("A".into(), 10)).unwrap();
        let b = store.insert_hostel(Hostel::new("B".into(), 10)).unwrap();
        let room = store.insert_room(Room::new(b.id, "B-1".into(), 2)).unwrap();
        let w = warden(&store, "w@hostel.com");
        store.assign_warden(a.id, w.id).unwrap();

        let rebind = UserChange {
            hostel_id: Some(b.id),
            ..UserChange::default()
        };
        assert_eq!(store.update_user(w.id, rebind).unwrap_err(), StoreError::WardenRebind(w.id));
        let house = UserChange {
            room_id: Some(room.id),
            ..UserChange::default()
        };
        assert_eq!(store.update_user(w.id, house).unwrap_err(), StoreError::WardenRebind(w.id));

        let same = UserChange {
            name: Some("Head Warden".into()),
            hostel_id: Some(a.id),
            ..UserChange::default()
        };
        assert_eq!(store.update_user(w.id, same).unwrap().hostel_id, Some(a.id));
        assert_eq!(store.hostel_wardened_by(w.id).unwrap().unwrap().id, a.id);
        assert!(store.room(room.id).unwrap().unwrap().occupants.is_empty());
    }

    #[test]
    fn role_changes_keep_warden_assignment_in_sync() {
        let store = MemoryStore::new();
        let (hostel, room) = hostel_with_room(&store, 2);
        let w = warden(&store, "w@hostel.com");
        store.assign_warden(hostel.id, w.id).unwrap();

        let demoted = store
            .update_user(
                w.id,
                UserChange {
                    role: Some(Role::Resident),
                    ..UserChange::default()
                },
            )
            .unwrap();
        assert_eq!(demoted.hostel_id, None);
        assert_eq!(store.hostel(hostel.id).unwrap().unwrap().warden_id, None);

        let r = resident(&store, "r@hostel.com");
        store.place_in_room(room.id, r.id).unwrap();
        let promoted = store
            .update_user(
                r.id,
                UserChange {
                    role: Some(Role::Warden),
                    ..UserChange::default()
                },
            )
            .unwrap();
        assert_eq!(promoted.role, Role::Warden);
        assert_eq!(promoted.hostel_id, None);
        assert_eq!(promoted.room_id, None);
        assert!(store.room(room.id).unwrap().unwrap().occupants.is_empty());
    }

    #[test]
    fn complaint_update_rechecks_stored_status() {
        let store = MemoryStore::new();
        let r = resident(&store, "r@hostel.com");
        let c = pending_complaint(&store, r.id);

        store.update_complaint(c.id, to(ComplaintStatus::Resolved)).unwrap();
        let err = store
            .update_complaint(c.id, to(ComplaintStatus::InProgress))
            .unwrap_err();
        assert_eq!(
            err,
            StoreError::BackwardTransition {
                from: ComplaintStatus::Resolved,
                to: ComplaintStatus::InProgress,
            }
        );
        assert_eq!(
            store.complaint(c.id).unwrap().unwrap().status,
            ComplaintStatus::Resolved
        );
    }

    #[test]
    fn racing_complaint_updates_never_move_backward() {
        let store = Arc::new(MemoryStore::new());
        let r = resident(&store, "r@hostel.com");

        for _ in 0..200 {
            let c = pending_complaint(&store, r.id);
            let (progress, resolve) = std::thread::scope(|s| {
                let first = s.spawn(|| store.update_complaint(c.id, to(ComplaintStatus::InProgress)));
                let second = s.spawn(|| store.update_complaint(c.id, to(ComplaintStatus::Resolved)));
                (first.join().unwrap(), second.join().unwrap())
            });

            assert!(resolve.is_ok());
            let stored = store.complaint(c.id).unwrap().unwrap();
            assert_eq!(stored.status, ComplaintStatus::Resolved);
            if let Err(err) = progress {
                assert!(matches!(err, StoreError::BackwardTransition { .. }));
            }
        }
    }
}
