//! Write permissions.
//!
//! Each guard is a pure decision over records the caller has already
//! fetched. Authorization is always decided before capacity or state checks,
//! so a caller without rights learns nothing about the target.
//!
//! Guards never mutate. The store repeats the capacity check atomically when
//! the write is applied.

use crate::error::{Violation, ViolationKind};
use crate::input::UserUpdate;
use crate::model::{Complaint, ComplaintStatus, Hostel, Role, Room, User};
use crate::request::Principal;

fn forbidden() -> Violation {
    Violation::forbidden("Forbidden")
}

fn admin_only(principal: &Principal) -> Result<(), Violation> {
    if principal.is_admin() {
        Ok(())
    } else {
        Err(forbidden())
    }
}

/// `true` if `principal` is a warden bound to the same hostel as `hostel`.
fn keeps(principal: &Principal, hostel: Option<crate::model::HostelId>) -> bool {
    principal.role == Role::Warden && principal.hostel.is_some() && principal.hostel == hostel
}

fn ensure_resident(user: &User) -> Result<(), Violation> {
    if user.role == Role::Resident {
        Ok(())
    } else {
        Err(Violation::invalid("User is not a resident"))
    }
}

fn ensure_room_space(room: &Room, user: &User) -> Result<(), Violation> {
    if room.is_full() && !room.houses(user.id) {
        return Err(Violation::new(ViolationKind::CapacityExceeded, "Room is full"));
    }
    Ok(())
}

/// Any admin-only operation, checked before the target is looked up.
pub fn administer(principal: &Principal) -> Result<(), Violation> {
    admin_only(principal)
}

/// Creating a hostel: admin only.
pub fn create_hostel(principal: &Principal) -> Result<(), Violation> {
    admin_only(principal)
}

/// Creating an account of any role: admin only.
pub fn create_user(principal: &Principal) -> Result<(), Violation> {
    admin_only(principal)
}

/// Assigning a warden to a hostel: admin only, and the target must be a warden.
pub fn assign_warden(principal: &Principal, warden: &User) -> Result<(), Violation> {
    admin_only(principal)?;
    if warden.role != Role::Warden {
        return Err(Violation::invalid("User is not a warden"));
    }
    Ok(())
}

/// Creating a room: admin, or the warden of the target hostel.
pub fn create_room(principal: &Principal, hostel: &Hostel) -> Result<(), Violation> {
    match principal.role {
        Role::Admin => Ok(()),
        Role::Warden if hostel.warden_id == Some(principal.id) => Ok(()),
        _ => Err(forbidden()),
    }
}

/// Allocating `resident` to `room`.
///
/// Admins may allocate anywhere. A warden may allocate only into rooms of
/// their own hostel, and only residents who are unaffiliated or already
/// theirs. Re-allocating a current occupant is allowed even when the room is
/// full.
pub fn allocate_room(principal: &Principal, room: &Room, resident: &User) -> Result<(), Violation> {
    match principal.role {
        Role::Admin => {}
        Role::Warden
            if keeps(principal, Some(room.hostel_id))
                && (resident.hostel_id.is_none() || resident.hostel_id == principal.hostel) => {}
        _ => return Err(forbidden()),
    }
    ensure_resident(resident)?;
    ensure_room_space(room, resident)
}

/// Moving a complaint to `next`.
///
/// Residents are always denied. A warden may update only complaints whose
/// author currently lives in the warden's hostel; `author` is `None` when the
/// author record no longer exists. Status may only move forward.
pub fn update_complaint(
    principal: &Principal,
    complaint: &Complaint,
    author: Option<&User>,
    next: ComplaintStatus,
) -> Result<(), Violation> {
    match principal.role {
        Role::Admin => {}
        Role::Warden if keeps(principal, author.and_then(|a| a.hostel_id)) => {}
        _ => return Err(forbidden()),
    }
    if !complaint.status.can_transition_to(next) {
        return Err(Violation::new(
            ViolationKind::Conflict,
            format!("Cannot move complaint from {} to {}", complaint.status, next),
        ));
    }
    Ok(())
}

/// Applying `update` to `target`.
///
/// `room` is the already-fetched room named by `update.room_id`, if any.
/// Admins may change any field. A warden may only move users of their own
/// hostel into rooms of that hostel; any other field is forbidden. Residents
/// are denied.
pub fn update_user(
    principal: &Principal,
    target: &User,
    update: &UserUpdate,
    room: Option<&Room>,
) -> Result<(), Violation> {
    match principal.role {
        Role::Admin => {}
        Role::Warden => {
            if !keeps(principal, target.hostel_id) || !update.touches_only_room() {
                return Err(forbidden());
            }
            if let Some(room) = room {
                if !keeps(principal, Some(room.hostel_id)) {
                    return Err(Violation::forbidden("Room not allowed"));
                }
            }
        }
        Role::Resident => return Err(forbidden()),
    }
    match room {
        Some(room) => ensure_room_space(room, target),
        None => Ok(()),
    }
}

/// Marking attendance for `resident`: admin, or the warden of the resident's hostel.
pub fn mark_attendance(principal: &Principal, resident: &User) -> Result<(), Violation> {
    match principal.role {
        Role::Admin => {}
        Role::Warden if keeps(principal, resident.hostel_id) => {}
        _ => return Err(forbidden()),
    }
    ensure_resident(resident)
}

/// Filing a complaint: residents only.
pub fn create_complaint(principal: &Principal) -> Result<(), Violation> {
    if principal.role == Role::Resident {
        Ok(())
    } else {
        Err(forbidden())
    }
}
