//! Property tests for scoping and mutation invariants.
//!
//! These build random populations directly in the store and check that the
//! service never returns a record outside the caller's scope and never
//! breaks room capacity or the complaint lifecycle.

use std::sync::Arc;

use chrono::NaiveDate;
use hostel_access::input::{Allocate, AttendanceQuery, ComplaintUpdate, MarkAttendance, NewComplaint};
use hostel_access::password::PasswordHash;
use hostel_access::scope::{RecordScope, RoomFilter};
use hostel_access::store::UserChange;
use hostel_access::{
    AttendanceStatus, Authed, ComplaintStatus, Config, Ctx, Hostel, HostelService, MemoryStore,
    PolicyGate, Principal, RequestMeta, Role, Room, Store, User, UserId,
};
use proptest::prelude::*;

fn service() -> HostelService<MemoryStore> {
    let config = Config::with_secret("property-test-secret-01")
        .unwrap()
        .password_iterations(1);
    HostelService::new(Arc::new(MemoryStore::new()), &config)
}

fn ctx(principal: Principal) -> Ctx<Authed> {
    PolicyGate::new(RequestMeta::for_principal("req-prop", principal))
        .build()
        .unwrap()
}

fn add_resident(service: &HostelService<MemoryStore>, n: usize) -> User {
    service
        .store()
        .insert_user(User::new(
            format!("Resident {n}"),
            format!("r{n}@hostel.com"),
            PasswordHash::from_encoded("x"),
            Role::Resident,
        ))
        .unwrap()
}

fn admin() -> Principal {
    Principal::admin(UserId::new(), "admin@hostel.com")
}

fn arb_status() -> impl Strategy<Value = AttendanceStatus> {
    prop_oneof![Just(AttendanceStatus::Present), Just(AttendanceStatus::Absent)]
}

fn arb_complaint_status() -> impl Strategy<Value = ComplaintStatus> {
    prop_oneof![
        Just(ComplaintStatus::Pending),
        Just(ComplaintStatus::InProgress),
        Just(ComplaintStatus::Resolved),
    ]
}

fn rank(status: ComplaintStatus) -> u8 {
    match status {
        ComplaintStatus::Pending => 0,
        ComplaintStatus::InProgress => 1,
        ComplaintStatus::Resolved => 2,
    }
}

proptest! {
    /// Residents only ever see attendance entries for themselves, whatever
    /// filter they send.
    #[test]
    fn resident_attendance_is_own_only(
        marks in prop::collection::vec((0usize..4, 1u32..28, arb_status()), 1..30),
        probe in 0usize..4,
    ) {
        let service = service();
        let residents: Vec<User> = (0..4).map(|n| add_resident(&service, n)).collect();
        let staff = ctx(admin());
        for (who, day, status) in &marks {
            let date = NaiveDate::from_ymd_opt(2024, 2, *day).unwrap();
            service
                .mark_attendance(&staff, MarkAttendance::new(residents[*who].id, date, *status))
                .unwrap();
        }

        for resident in &residents {
            let me = ctx(Principal::resident(resident.id, resident.email.clone(), None));
            let own = service.list_attendance(&me, AttendanceQuery::default()).unwrap();
            prop_assert!(own.iter().all(|e| e.resident_id == resident.id));

            let expected_days: std::collections::BTreeSet<u32> = marks
                .iter()
                .filter(|(who, _, _)| residents[*who].id == resident.id)
                .map(|(_, day, _)| *day)
                .collect();
            prop_assert_eq!(own.len(), expected_days.len());

            let peek = AttendanceQuery::new(Some(residents[probe].id), None, None);
            let filtered = service.list_attendance(&me, peek).unwrap();
            prop_assert!(filtered.iter().all(|e| e.resident_id == resident.id));
        }
    }

    /// Wardens only see rooms in the hostel they keep, even when they ask
    /// for another hostel explicitly.
    #[test]
    fn warden_rooms_are_own_hostel_only(
        placements in prop::collection::vec(any::<bool>(), 0..20),
        ask_foreign in any::<bool>(),
    ) {
        let service = service();
        let store = service.store();
        let kept = store.insert_hostel(Hostel::new("Kept".into(), 100)).unwrap();
        let foreign = store.insert_hostel(Hostel::new("Foreign".into(), 100)).unwrap();
        for (i, in_kept) in placements.iter().enumerate() {
            let hostel = if *in_kept { kept.id } else { foreign.id };
            store.insert_room(Room::new(hostel, format!("R-{i}"), 2)).unwrap();
        }

        let warden = ctx(Principal::warden(UserId::new(), "warden@hostel.com", Some(kept.id)));
        let filter = ask_foreign.then_some(foreign.id);
        let rooms = service.list_rooms(&warden, filter).unwrap();

        prop_assert!(rooms.iter().all(|r| r.hostel_id == kept.id));
        let expected = if ask_foreign { 0 } else { placements.iter().filter(|k| **k).count() };
        prop_assert_eq!(rooms.len(), expected);
    }

    /// A room never holds more occupants than its capacity; extra
    /// allocations fail without side effects.
    #[test]
    fn full_room_rejects_allocation(capacity in 1u32..5, extra in 1usize..4) {
        let service = service();
        let store = service.store();
        let hostel = store.insert_hostel(Hostel::new("H".into(), 100)).unwrap();
        let room = store.insert_room(Room::new(hostel.id, "H-1".into(), capacity)).unwrap();
        let staff = ctx(admin());

        let mut placed = 0;
        for n in 0..capacity as usize + extra {
            let resident = add_resident(&service, n);
            match service.allocate_room(&staff, room.id, Allocate::new(resident.id)) {
                Ok(_) => placed += 1,
                Err(err) => {
                    prop_assert_eq!(err.status(), 400);
                    let untouched = store.user(resident.id).unwrap().unwrap();
                    prop_assert_eq!(untouched.room_id, None);
                }
            }
        }

        prop_assert_eq!(placed, capacity as usize);
        let room = store.room(room.id).unwrap().unwrap();
        prop_assert_eq!(room.occupants.len(), capacity as usize);
    }

    /// Complaint status never moves backward, whatever sequence staff send.
    #[test]
    fn complaint_status_is_monotonic(
        steps in prop::collection::vec(arb_complaint_status(), 1..10),
    ) {
        let service = service();
        let author = add_resident(&service, 0);
        let filed = service
            .file_complaint(
                &ctx(Principal::resident(author.id, author.email.clone(), None)),
                NewComplaint::new("Heating", "Radiator is cold").unwrap(),
            )
            .unwrap();
        let staff = ctx(admin());

        let mut current = filed.status;
        for next in steps {
            let result = service.update_complaint(&staff, filed.id, ComplaintUpdate::new(next, None).unwrap());
            if rank(next) >= rank(current) {
                prop_assert!(result.is_ok());
                current = next;
            } else {
                prop_assert_eq!(result.unwrap_err().status(), 409);
            }
            let stored = service.store().complaint(filed.id).unwrap().unwrap();
            prop_assert_eq!(stored.status, current);
        }
    }

    /// Whatever mix of room and hostel changes an admin applies, every
    /// placed user sits in a room of their own hostel and every occupant set
    /// names exactly the users placed there.
    #[test]
    fn placement_and_affiliation_stay_consistent(
        steps in prop::collection::vec((0usize..3, prop::option::of(0usize..2), prop::option::of(0usize..4)), 1..25),
    ) {
        let service = service();
        let store = service.store();
        let hostels: Vec<Hostel> = (0..2)
            .map(|i| store.insert_hostel(Hostel::new(format!("H{i}"), 50)).unwrap())
            .collect();
        let rooms: Vec<Room> = (0..4)
            .map(|i| store.insert_room(Room::new(hostels[i % 2].id, format!("R-{i}"), 2)).unwrap())
            .collect();
        let residents: Vec<User> = (0..3).map(|n| add_resident(&service, n)).collect();

        for (who, hostel, room) in steps {
            let change = UserChange {
                hostel_id: hostel.map(|h| hostels[h].id),
                room_id: room.map(|r| rooms[r].id),
                ..UserChange::default()
            };
            let _ = store.update_user(residents[who].id, change);
        }

        let rooms = store.rooms(RoomFilter::new(RecordScope::All)).unwrap();
        for user in store.users(RecordScope::All).unwrap() {
            if let Some(room_id) = user.room_id {
                let room = rooms.iter().find(|r| r.id == room_id).unwrap();
                prop_assert_eq!(user.hostel_id, Some(room.hostel_id));
                prop_assert!(room.houses(user.id));
            }
        }
        for room in &rooms {
            prop_assert!(room.occupants.len() <= room.capacity as usize);
            for occupant in &room.occupants {
                let user = store.user(*occupant).unwrap().unwrap();
                prop_assert_eq!(user.room_id, Some(room.id));
            }
        }
    }
}
