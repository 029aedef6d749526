use serde::Serialize;

use super::{require, HostelService};
use crate::context::Ctx;
use crate::error::{Result, Violation};
use crate::model::{AttendanceStatus, ComplaintStatus, Role};
use crate::scope::{AttendanceFilter, HostelScope, RecordScope, RoomFilter};
use crate::state::Authed;
use crate::store::Store;

/// User counts by role.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UserTotals {
    /// All users
    pub total: usize,
    /// Admins
    pub admin: usize,
    /// Wardens
    pub warden: usize,
    /// Residents
    pub resident: usize,
}

/// Hostel count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HostelTotals {
    /// All hostels
    pub total: usize,
}

/// Room counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RoomTotals {
    /// All rooms
    pub total: usize,
    /// Rooms with at least one occupant
    pub occupied: usize,
}

/// Complaint counts by status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintTotals {
    /// All complaints
    pub total: usize,
    /// Pending
    pub pending: usize,
    /// In progress
    pub in_progress: usize,
    /// Resolved
    pub resolved: usize,
}

/// Attendance entry count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AttendanceTotals {
    /// All entries
    pub total: usize,
}

/// Site-wide totals for admins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AdminStats {
    /// Users
    pub users: UserTotals,
    /// Hostels
    pub hostels: HostelTotals,
    /// Rooms
    pub rooms: RoomTotals,
    /// Complaints
    pub complaints: ComplaintTotals,
    /// Attendance
    pub attendance: AttendanceTotals,
}

/// Totals for the hostel a warden keeps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WardenStats {
    /// Hostel name
    pub hostel: String,
    /// Residents living there
    pub residents: usize,
    /// Rooms
    pub rooms: usize,
    /// Complaints by its residents
    pub complaints: usize,
}

/// A resident's own figures.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResidentStats {
    /// Label of the resident's room, if placed
    pub room_number: Option<String>,
    /// Share of marked days present, 0 to 100
    pub attendance_rate: f64,
}

fn require_role(ctx: &Ctx<Authed>, role: Role) -> std::result::Result<(), Violation> {
    if ctx.principal().role == role {
        Ok(())
    } else {
        Err(Violation::forbidden("Forbidden"))
    }
}

impl<S: Store> HostelService<S> {
    /// Site-wide totals. Admin only.
    pub fn admin_stats(&self, ctx: &Ctx<Authed>) -> Result<AdminStats> {
        self.enforce(ctx, "admin_stats", require_role(ctx, Role::Admin))?;

        let users = self.store.users(RecordScope::All)?;
        let rooms = self.store.rooms(RoomFilter::new(RecordScope::All))?;
        let complaints = self.store.complaints(RecordScope::All)?;
        let count_role = |role: Role| users.iter().filter(|u| u.role == role).count();
        let count_status =
            |status: ComplaintStatus| complaints.iter().filter(|c| c.status == status).count();

        Ok(AdminStats {
            users: UserTotals {
                total: users.len(),
                admin: count_role(Role::Admin),
                warden: count_role(Role::Warden),
                resident: count_role(Role::Resident),
            },
            hostels: HostelTotals {
                total: self.store.hostels(HostelScope::All)?.len(),
            },
            rooms: RoomTotals {
                total: rooms.len(),
                occupied: rooms.iter().filter(|r| !r.occupants.is_empty()).count(),
            },
            complaints: ComplaintTotals {
                total: complaints.len(),
                pending: count_status(ComplaintStatus::Pending),
                in_progress: count_status(ComplaintStatus::InProgress),
                resolved: count_status(ComplaintStatus::Resolved),
            },
            attendance: AttendanceTotals {
                total: self
                    .store
                    .attendance(AttendanceFilter::new(RecordScope::All))?
                    .len(),
            },
        })
    }

    /// Totals for the caller's hostel. Wardens only.
    ///
    /// # Errors
    ///
    /// `NotFound` ("Hostel not found") for a warden without a hostel.
    pub fn warden_stats(&self, ctx: &Ctx<Authed>) -> Result<WardenStats> {
        self.enforce(ctx, "warden_stats", require_role(ctx, Role::Warden))?;
        let hostel_id = require(ctx.principal().hostel, "Hostel")?;
        let hostel = require(self.store.hostel(hostel_id)?, "Hostel")?;
        let scope = RecordScope::Hostel(hostel.id);

        Ok(WardenStats {
            residents: self
                .store
                .users(scope)?
                .iter()
                .filter(|u| u.role == Role::Resident)
                .count(),
            rooms: self.store.rooms(RoomFilter::new(scope))?.len(),
            complaints: self.store.complaints(scope)?.len(),
            hostel: hostel.name,
        })
    }

    /// The caller's room and attendance rate.
    pub fn resident_stats(&self, ctx: &Ctx<Authed>) -> Result<ResidentStats> {
        let me = require(self.store.user(ctx.principal().id)?, "User")?;
        let room_number = match me.room_id {
            Some(room) => self.store.room(room)?.map(|r| r.number),
            None => None,
        };

        let entries = self
            .store
            .attendance(AttendanceFilter::new(RecordScope::Owner(me.id)))?;
        let present = entries
            .iter()
            .filter(|e| e.status == AttendanceStatus::Present)
            .count();
        let attendance_rate = if entries.is_empty() {
            0.0
        } else {
            present as f64 / entries.len() as f64 * 100.0
        };

        Ok(ResidentStats {
            room_number,
            attendance_rate,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use crate::input::{MarkAttendance, NewComplaint};
    use crate::model::{AttendanceStatus, Role};
    use chrono::NaiveDate;

    #[test]
    fn admin_totals() {
        let service = service();
        let w = world(&service);
        service
            .file_complaint(
                &ctx_for(&service, &w.resident),
                NewComplaint::new("Noise", "Loud music after midnight").unwrap(),
            )
            .unwrap();

        let stats = service.admin_stats(&ctx_for(&service, &w.admin)).unwrap();
        assert_eq!(stats.users.total, 3);
        assert_eq!(stats.users.warden, 1);
        assert_eq!(stats.hostels.total, 1);
        assert_eq!(stats.rooms.occupied, 1);
        assert_eq!(stats.complaints.pending, 1);
        assert_eq!(stats.attendance.total, 0);

        let err = service.admin_stats(&ctx_for(&service, &w.warden)).unwrap_err();
        assert_eq!(err.status(), 403);
    }

    #[test]
    fn warden_totals_cover_own_hostel() {
        let service = service();
        let w = world(&service);
        let stats = service.warden_stats(&ctx_for(&service, &w.warden)).unwrap();
        assert_eq!(stats.hostel, "Hostel A");
        assert_eq!(stats.residents, 1);
        assert_eq!(stats.rooms, 1);
        assert_eq!(stats.complaints, 0);

        let idle = add_user(&service, "idle@hostel.com", Role::Warden, None);
        let err = service.warden_stats(&ctx_for(&service, &idle)).unwrap_err();
        assert_eq!(err.violation().unwrap().message, "Hostel not found");
    }

    #[test]
    fn resident_rate_and_room() {
        let service = service();
        let w = world(&service);
        let admin = ctx_for(&service, &w.admin);
        for (d, status) in [(1, AttendanceStatus::Present), (2, AttendanceStatus::Absent)] {
            let date = NaiveDate::from_ymd_opt(2024, 5, d).unwrap();
            service
                .mark_attendance(&admin, MarkAttendance::new(w.resident.id, date, status))
                .unwrap();
        }

        let stats = service.resident_stats(&ctx_for(&service, &w.resident)).unwrap();
        assert_eq!(stats.room_number.as_deref(), Some("A-1"));
        assert!((stats.attendance_rate - 50.0).abs() < f64::EPSILON);

        let fresh = add_user(&service, "f@hostel.com", Role::Resident, None);
        let stats = service.resident_stats(&ctx_for(&service, &fresh)).unwrap();
        assert_eq!(stats.room_number, None);
        assert_eq!(stats.attendance_rate, 0.0);
    }
}
