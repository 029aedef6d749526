use super::{require, HostelService};
use crate::audit::AuditEventKind;
use crate::context::Ctx;
use crate::error::Result;
use crate::guard;
use crate::input::{AssignWarden, NewHostel};
use crate::model::{Hostel, HostelId};
use crate::scope;
use crate::state::Authed;
use crate::store::Store;

impl<S: Store> HostelService<S> {
    /// Creates a hostel. Admin only.
    pub fn create_hostel(&self, ctx: &Ctx<Authed>, cmd: NewHostel) -> Result<Hostel> {
        self.enforce(ctx, "create_hostel", guard::create_hostel(ctx.principal()))?;
        let hostel = self
            .store
            .insert_hostel(Hostel::new(cmd.name, cmd.capacity))?;
        self.record_change(ctx, AuditEventKind::AdminAction, "create_hostel", hostel.id);
        Ok(hostel)
    }

    /// Lists the hostels the caller may see.
    pub fn list_hostels(&self, ctx: &Ctx<Authed>) -> Result<Vec<Hostel>> {
        Ok(self.store.hostels(scope::hostels(ctx.principal()))?)
    }

    /// Makes `cmd.warden_id` the warden of `hostel`. Admin only.
    ///
    /// The warden leaves any hostel they kept before.
    pub fn assign_warden(&self, ctx: &Ctx<Authed>, hostel: HostelId, cmd: AssignWarden) -> Result<Hostel> {
        self.enforce(ctx, "assign_warden", guard::administer(ctx.principal()))?;
        require(self.store.hostel(hostel)?, "Hostel")?;
        let warden = require(self.store.user(cmd.warden_id)?, "Warden")?;
        self.enforce(ctx, "assign_warden", guard::assign_warden(ctx.principal(), &warden))?;

        let hostel = self.store.assign_warden(hostel, warden.id)?;
        self.record_change(ctx, AuditEventKind::AdminAction, "assign_warden", hostel.id);
        Ok(hostel)
    }
}
