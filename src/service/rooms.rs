use super::{require, HostelService};
use crate::audit::AuditEventKind;
use crate::context::Ctx;
use crate::error::{Error, Result};
use crate::guard;
use crate::input::{Allocate, NewRoom};
use crate::model::{HostelId, Room, RoomId};
use crate::scope::{self, RoomFilter};
use crate::state::Authed;
use crate::store::Store;

impl<S: Store> HostelService<S> {
    /// Creates a room in `cmd.hostel_id`: admin, or that hostel's warden.
    pub fn create_room(&self, ctx: &Ctx<Authed>, cmd: NewRoom) -> Result<Room> {
        let hostel = require(self.store.hostel(cmd.hostel_id)?, "Hostel")?;
        self.enforce(ctx, "create_room", guard::create_room(ctx.principal(), &hostel))?;

        let room = self
            .store
            .insert_room(Room::new(hostel.id, cmd.number, cmd.capacity))?;
        self.record_change(ctx, AuditEventKind::StateChange, "create_room", room.id);
        Ok(room)
    }

    /// Lists the rooms the caller may see, optionally narrowed to `hostel`.
    pub fn list_rooms(&self, ctx: &Ctx<Authed>, hostel: Option<HostelId>) -> Result<Vec<Room>> {
        let filter = RoomFilter::new(scope::rooms(ctx.principal())).in_hostel(hostel);
        Ok(self.store.rooms(filter)?)
    }

    /// Places `cmd.resident_id` in room `id`.
    ///
    /// Capacity is checked by the guard and again atomically by the store, so
    /// concurrent allocations never overfill the room.
    pub fn allocate_room(&self, ctx: &Ctx<Authed>, id: RoomId, cmd: Allocate) -> Result<Room> {
        let room = require(self.store.room(id)?, "Room")?;
        let resident = require(self.store.user(cmd.resident_id)?, "Resident")?;
        self.enforce(
            ctx,
            "allocate_room",
            guard::allocate_room(ctx.principal(), &room, &resident),
        )?;

        let room = self
            .store
            .place_in_room(room.id, resident.id)
            .map_err(|e| {
                let err: Error = e.into();
                self.record_failure(ctx, "allocate_room", &err);
                err
            })?;
        self.record_change(ctx, AuditEventKind::StateChange, "allocate_room", room.id);
        Ok(room)
    }
}
