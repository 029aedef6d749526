use chrono::Utc;

use super::{require, HostelService};
use crate::audit::AuditEventKind;
use crate::context::Ctx;
use crate::error::{Error, Result};
use crate::guard;
use crate::input::{ComplaintUpdate, NewComplaint};
use crate::model::{Complaint, ComplaintId, ComplaintStatus};
use crate::scope;
use crate::state::Authed;
use crate::store::{ComplaintChange, Store};

impl<S: Store> HostelService<S> {
    /// Files a complaint as the calling resident.
    pub fn file_complaint(&self, ctx: &Ctx<Authed>, cmd: NewComplaint) -> Result<Complaint> {
        self.enforce(ctx, "file_complaint", guard::create_complaint(ctx.principal()))?;
        let author = require(self.store.user(ctx.principal().id)?, "User")?;

        let now = Utc::now();
        let complaint = self.store.insert_complaint(Complaint {
            id: ComplaintId::new(),
            author_id: author.id,
            hostel_id: author.hostel_id,
            title: cmd.title,
            description: cmd.description,
            status: ComplaintStatus::Pending,
            response: None,
            created_at: now,
            updated_at: now,
        })?;
        self.record_change(ctx, AuditEventKind::StateChange, "file_complaint", complaint.id);
        Ok(complaint)
    }

    /// Lists the complaints the caller may see.
    pub fn list_complaints(&self, ctx: &Ctx<Authed>) -> Result<Vec<Complaint>> {
        Ok(self.store.complaints(scope::complaints(ctx.principal()))?)
    }

    /// Moves complaint `id` to `update.status`, optionally replacing the
    /// staff response.
    ///
    /// # Errors
    ///
    /// `Forbidden` for residents and for wardens outside the author's
    /// current hostel; `Conflict` for a backward transition, judged again
    /// against the stored status when the write is applied.
    pub fn update_complaint(
        &self,
        ctx: &Ctx<Authed>,
        id: ComplaintId,
        update: ComplaintUpdate,
    ) -> Result<Complaint> {
        let complaint = require(self.store.complaint(id)?, "Complaint")?;
        let author = self.store.user(complaint.author_id)?;
        self.enforce(
            ctx,
            "update_complaint",
            guard::update_complaint(ctx.principal(), &complaint, author.as_ref(), update.status),
        )?;

        let change = ComplaintChange {
            status: update.status,
            response: update.response,
            at: Utc::now(),
        };
        let complaint = self.store.update_complaint(id, change).map_err(|e| {
            let err: Error = e.into();
            self.record_failure(ctx, "update_complaint", &err);
            err
        })?;

        self.record_change(ctx, AuditEventKind::StateChange, "update_complaint", complaint.id);
        Ok(complaint)
    }
}
