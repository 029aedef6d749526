//! Route table mapping HTTP requests onto [`HostelService`] operations.

use std::sync::Arc;

use serde_json::json;

use crate::error::{Error, Result};
use crate::input::{
    self, Allocate, AssignWarden, AttendanceQuery, ComplaintUpdate, Login, MarkAttendance,
    NewComplaint, NewHostel, NewRoom, NewUser, Register, UserUpdate,
};
use crate::model::{ComplaintId, HostelId, Role, RoomId, UserId};
use crate::policy::{Authenticated, HasRole, PolicyReq};
use crate::service::HostelService;
use crate::store::Store;
use crate::Tainted;

use super::{
    extract_authed, extract_unauthed, AuthenticatedExtraction, Method, RequestAdapter, Response,
    UnauthenticatedExtraction,
};

const WARDEN: HasRole = HasRole::any_of(&[Role::Warden]);

/// Dispatches requests to the hostel service.
///
/// Every response, errors included, carries the CORS headers. `OPTIONS`
/// on any path answers 200 without touching the service.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use hostel_access::{Config, HostelService, MemoryStore, Router};
/// use hostel_access::web::{Method, RequestAdapter};
///
/// let config = Config::with_secret("router-doc-secret-0123").unwrap();
/// let service = HostelService::new(Arc::new(MemoryStore::new()), &config);
/// let router = Router::new(Arc::new(service));
///
/// let response = router.handle(&RequestAdapter::new("req-1", Method::Get, "/ping"));
/// assert_eq!(response.status(), 200);
/// assert_eq!(response.body()["message"], "pong");
///
/// let response = router.handle(&RequestAdapter::new("req-2", Method::Get, "/users"));
/// assert_eq!(response.status(), 401);
/// assert_eq!(response.header("Access-Control-Allow-Origin"), Some("*"));
/// ```
pub struct Router<S: Store> {
    service: Arc<HostelService<S>>,
}

impl<S: Store> Clone for Router<S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
        }
    }
}

impl<S: Store> Router<S> {
    /// Creates a router over `service`.
    pub fn new(service: Arc<HostelService<S>>) -> Self {
        Self { service }
    }

    /// Returns the underlying service.
    pub fn service(&self) -> &HostelService<S> {
        &self.service
    }

    /// Handles one request.
    pub fn handle(&self, request: &RequestAdapter) -> Response {
        let span = tracing::info_span!(
            "request",
            request_id = %request.request_id(),
            method = %request.method(),
            path = %request.path(),
        );
        let _entered = span.enter();

        if request.method() == Method::Options {
            return Response::ok(json!({}));
        }

        let response = match self.dispatch(request) {
            Ok(response) => response,
            Err(err) => {
                if let Error::Server(details) = &err {
                    tracing::error!(%details, "request failed");
                }
                Response::from_error(&err)
            }
        };
        tracing::info!(status = response.status(), "request handled");
        response
    }

    fn dispatch(&self, request: &RequestAdapter) -> Result<Response> {
        let segments: Vec<&str> = request
            .path()
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        match (request.method(), segments.as_slice()) {
            (Method::Get, ["ping"]) => Ok(Response::ok(json!({ "message": "pong" }))),

            (Method::Post, ["auth", "register"]) => self.register(request),
            (Method::Post, ["auth", "login"]) => self.login(request),
            (Method::Get, ["auth", "me"]) => {
                let auth = self.authed(request, &[])?;
                let user = self.service.me(&auth.context)?;
                Ok(Response::ok(json!({ "user": user })))
            }
            (Method::Post, ["auth", "seed-demo-users"]) => self.seed(request),

            (Method::Get, ["users"]) => {
                let auth = self.authed(request, &[])?;
                let users = self.service.list_users(&auth.context)?;
                Ok(Response::ok(json!({ "users": users })))
            }
            (Method::Post, ["users"]) => {
                let mut auth = self.authed(request, &[])?;
                let cmd = NewUser::from_json(auth.inputs.take_body())?;
                let user = self.service.create_user(&auth.context, cmd)?;
                Response::message("User created successfully", json!({ "user": user }))
            }
            (Method::Put, ["users", id]) => {
                let mut auth = self.authed(request, &[])?;
                let id: UserId = input::parse_id(Tainted::new(*id), "User")?;
                let update = UserUpdate::from_json(auth.inputs.take_body())?;
                let user = self.service.update_user(&auth.context, id, update)?;
                Response::message("User updated successfully", json!({ "user": user }))
            }

            (Method::Post, ["hostels"]) => {
                let mut auth = self.authed(request, &[])?;
                let cmd = NewHostel::from_json(auth.inputs.take_body())?;
                let hostel = self.service.create_hostel(&auth.context, cmd)?;
                Response::message("Hostel created successfully", json!({ "hostel": hostel }))
            }
            (Method::Get, ["hostels"]) => {
                let auth = self.authed(request, &[])?;
                let hostels = self.service.list_hostels(&auth.context)?;
                Ok(Response::ok(json!({ "hostels": hostels })))
            }
            (Method::Post, ["hostels", id, "assign-warden"]) => {
                let mut auth = self.authed(request, &[])?;
                let id: HostelId = input::parse_id(Tainted::new(*id), "Hostel")?;
                let cmd = AssignWarden::from_json(auth.inputs.take_body())?;
                let hostel = self.service.assign_warden(&auth.context, id, cmd)?;
                Response::message("Warden assigned successfully", json!({ "hostel": hostel }))
            }

            (Method::Post, ["rooms"]) => {
                let mut auth = self.authed(request, &[])?;
                let cmd = NewRoom::from_json(auth.inputs.take_body())?;
                let room = self.service.create_room(&auth.context, cmd)?;
                Response::message("Room created", json!({ "room": room }))
            }
            (Method::Get, ["rooms"]) => {
                let auth = self.authed(request, &[])?;
                let hostel = auth
                    .inputs
                    .query_params()
                    .get("hostelId")
                    .map(|raw| input::parse_id::<HostelId>(raw.as_str(), "Hostel"))
                    .transpose()?;
                let rooms = self.service.list_rooms(&auth.context, hostel)?;
                Ok(Response::ok(json!({ "rooms": rooms })))
            }
            (Method::Post, ["rooms", id, "allocate"]) => {
                let mut auth = self.authed(request, &[])?;
                let id: RoomId = input::parse_id(Tainted::new(*id), "Room")?;
                let cmd = Allocate::from_json(auth.inputs.take_body())?;
                self.service.allocate_room(&auth.context, id, cmd)?;
                Ok(Response::ok(json!({ "message": "Room allocated successfully" })))
            }

            (Method::Post, ["complaints"]) => {
                let mut auth = self.authed(request, &[])?;
                let cmd = NewComplaint::from_json(auth.inputs.take_body())?;
                let complaint = self.service.file_complaint(&auth.context, cmd)?;
                Response::message("Complaint created successfully", json!({ "complaint": complaint }))
            }
            (Method::Get, ["complaints"]) => {
                let auth = self.authed(request, &[])?;
                let complaints = self.service.list_complaints(&auth.context)?;
                Ok(Response::ok(json!({ "complaints": complaints })))
            }
            (Method::Put, ["complaints", id]) => {
                let mut auth = self.authed(request, &[])?;
                let id: ComplaintId = input::parse_id(Tainted::new(*id), "Complaint")?;
                let update = ComplaintUpdate::from_json(auth.inputs.take_body())?;
                let complaint = self.service.update_complaint(&auth.context, id, update)?;
                Response::message("Complaint updated successfully", json!({ "complaint": complaint }))
            }

            (Method::Post, ["attendance"]) => {
                let mut auth = self.authed(request, &[])?;
                let cmd = MarkAttendance::from_json(auth.inputs.take_body())?;
                let entry = self.service.mark_attendance(&auth.context, cmd)?;
                Response::message("Attendance marked successfully", json!({ "attendance": entry }))
            }
            (Method::Get, ["attendance"]) => {
                let auth = self.authed(request, &[])?;
                let query = AttendanceQuery::from_query(&auth.inputs.query_for_validation())?;
                let entries = self.service.list_attendance(&auth.context, query)?;
                Ok(Response::ok(json!({ "attendance": entries })))
            }

            (Method::Get, ["dashboard", "stats"]) => {
                let auth = self.authed(request, &[HasRole::ADMIN.into()])?;
                let stats = self.service.admin_stats(&auth.context)?;
                Ok(Response::ok(json!({ "stats": stats })))
            }
            (Method::Get, ["dashboard", "warden-stats"]) => {
                let auth = self.authed(request, &[WARDEN.into()])?;
                let stats = self.service.warden_stats(&auth.context)?;
                Ok(Response::ok(json!({ "stats": stats })))
            }
            (Method::Get, ["dashboard", "resident-stats"]) => {
                let auth = self.authed(request, &[])?;
                let stats = self.service.resident_stats(&auth.context)?;
                Ok(Response::ok(json!({ "stats": stats })))
            }

            _ => {
                tracing::debug!("no route");
                Ok(Response::new(404, json!({ "error": "Not found" })))
            }
        }
    }

    /// Resolves the bearer token and checks `Authenticated` plus `extra`.
    fn authed(&self, request: &RequestAdapter, extra: &[PolicyReq]) -> Result<AuthenticatedExtraction> {
        let mut requirements = vec![PolicyReq::from(Authenticated)];
        requirements.extend_from_slice(extra);
        Ok(extract_authed(request, &*self.service, &requirements)?)
    }

    fn register(&self, request: &RequestAdapter) -> Result<Response> {
        let UnauthenticatedExtraction { context, mut inputs } = extract_unauthed(request);
        let cmd = Register::from_json(inputs.take_body())?;
        let session = self.service.register(&context, cmd)?;
        Ok(Response::ok(session_body("User registered successfully", &session)))
    }

    fn login(&self, request: &RequestAdapter) -> Result<Response> {
        let UnauthenticatedExtraction { context, mut inputs } = extract_unauthed(request);
        let cmd = Login::from_json(inputs.take_body())?;
        let session = self.service.login(&context, cmd)?;
        Ok(Response::ok(session_body("Login successful", &session)))
    }

    fn seed(&self, request: &RequestAdapter) -> Result<Response> {
        let UnauthenticatedExtraction { context, .. } = extract_unauthed(request);
        let created = self.service.seed_demo_users(&context)?;
        if created.is_empty() {
            return Ok(Response::ok(json!({ "message": "Demo users already exist" })));
        }
        Ok(Response::ok(json!({
            "message": "Demo users seeded successfully",
            "users": created,
        })))
    }
}

fn session_body(message: &str, session: &crate::service::Session) -> serde_json::Value {
    json!({
        "message": message,
        "token": session.token,
        "userId": session.user.id,
        "email": session.user.email,
        "name": session.user.name,
        "role": session.user.role,
    })
}
