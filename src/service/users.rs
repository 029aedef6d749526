use super::{require, HostelService};
use crate::audit::AuditEventKind;
use crate::context::Ctx;
use crate::error::{Error, Result};
use crate::guard;
use crate::input::{NewUser, UserUpdate};
use crate::model::{Role, User, UserId};
use crate::scope;
use crate::state::Authed;
use crate::store::{Store, UserChange};

impl<S: Store> HostelService<S> {
    /// Lists the users the caller may see.
    ///
    /// # Errors
    ///
    /// `Forbidden` for residents.
    pub fn list_users(&self, ctx: &Ctx<Authed>) -> Result<Vec<User>> {
        let scope =
            scope::users(ctx.principal()).map_err(|denied| self.deny(ctx, "list_users", denied))?;
        Ok(self.store.users(scope)?)
    }

    /// Creates an account of any role. Admin only.
    ///
    /// A warden created with a `hostelId` is assigned to that hostel through
    /// [`Store::assign_warden`], so the hostel names them too.
    pub fn create_user(&self, ctx: &Ctx<Authed>, cmd: NewUser) -> Result<User> {
        self.enforce(ctx, "create_user", guard::create_user(ctx.principal()))?;
        if let Some(hostel) = cmd.hostel_id {
            require(self.store.hostel(hostel)?, "Hostel")?;
        }

        let hash = self.hasher.hash(cmd.password.expose_secret());
        let mut user = User::new(cmd.name, cmd.email, hash, cmd.role);
        if cmd.role != Role::Warden {
            user.hostel_id = cmd.hostel_id;
        }
        let mut user = self.store.insert_user(user)?;
        if let (Role::Warden, Some(hostel)) = (cmd.role, cmd.hostel_id) {
            self.store.assign_warden(hostel, user.id)?;
            user = require(self.store.user(user.id)?, "User")?;
        }

        self.record_change(ctx, AuditEventKind::AdminAction, "create_user", user.id);
        Ok(user)
    }

    /// Applies `update` to user `id` in one [`Store::update_user`] step.
    ///
    /// A room change moves the user into exactly one room and gives them that
    /// room's hostel; an explicit `hostelId` in the same update is overridden.
    /// A warden's hostel only changes through warden assignment.
    pub fn update_user(&self, ctx: &Ctx<Authed>, id: UserId, update: UserUpdate) -> Result<User> {
        let target = require(self.store.user(id)?, "User")?;
        let room = match update.room_id {
            Some(room) => Some(require(self.store.room(room)?, "Room")?),
            None => None,
        };
        self.enforce(
            ctx,
            "update_user",
            guard::update_user(ctx.principal(), &target, &update, room.as_ref()),
        )?;

        let change = UserChange {
            name: update.name,
            role: update.role,
            hostel_id: update.hostel_id,
            room_id: update.room_id,
        };
        let user = self.store.update_user(id, change).map_err(|e| {
            let err: Error = e.into();
            self.record_failure(ctx, "update_user", &err);
            err
        })?;

        self.record_change(ctx, AuditEventKind::StateChange, "update_user", id);
        Ok(user)
    }
}
