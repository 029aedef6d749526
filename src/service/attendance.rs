use chrono::Utc;

use super::{require, HostelService};
use crate::audit::AuditEventKind;
use crate::context::Ctx;
use crate::error::Result;
use crate::guard;
use crate::input::{AttendanceQuery, MarkAttendance};
use crate::model::AttendanceEntry;
use crate::scope::{self, AttendanceFilter};
use crate::state::Authed;
use crate::store::{AttendanceMark, Store};

impl<S: Store> HostelService<S> {
    /// Records attendance for one resident and day; re-marking overwrites.
    pub fn mark_attendance(&self, ctx: &Ctx<Authed>, cmd: MarkAttendance) -> Result<AttendanceEntry> {
        let resident = require(self.store.user(cmd.resident_id)?, "Resident")?;
        self.enforce(ctx, "mark_attendance", guard::mark_attendance(ctx.principal(), &resident))?;

        let entry = self.store.upsert_attendance(AttendanceMark {
            resident_id: resident.id,
            date: cmd.date,
            status: cmd.status,
            marked_by: ctx.principal().id,
            at: Utc::now(),
        })?;
        self.record_change(ctx, AuditEventKind::StateChange, "mark_attendance", entry.id);
        Ok(entry)
    }

    /// Lists the attendance entries the caller may see, narrowed by `query`.
    pub fn list_attendance(&self, ctx: &Ctx<Authed>, query: AttendanceQuery) -> Result<Vec<AttendanceEntry>> {
        let filter = AttendanceFilter {
            resident: query.resident_id,
            from: query.start,
            to: query.end,
            ..AttendanceFilter::new(scope::attendance(ctx.principal()))
        };
        Ok(self.store.attendance(filter)?)
    }
}
