//! Integration tests for the web router.
//!
//! These drive complete requests through `Router::handle`: token
//! resolution, route-level policy checks, body validation, service scoping
//! and the JSON error mapping.

use std::sync::Arc;
use std::thread;

use chrono::{Duration, Utc};
use hostel_access::token::TokenIssuer;
use hostel_access::web::{extract_authed, ExtractMetadata, Method, RequestAdapter, Response};
use hostel_access::{Authenticated, Config, HostelService, MemoryStore, Router, Store};
use serde_json::{json, Value};

const SECRET: &str = "web-integration-secret";

fn router() -> Router<MemoryStore> {
    let config = Config::with_secret(SECRET)
        .unwrap()
        .seed_demo_users(true)
        .password_iterations(1);
    Router::new(Arc::new(HostelService::new(Arc::new(MemoryStore::new()), &config)))
}

fn send(
    router: &Router<MemoryStore>,
    method: Method,
    path: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response {
    let mut request = RequestAdapter::new("req-web", method, path);
    if let Some(token) = token {
        request.add_header("Authorization", format!("Bearer {token}"));
    }
    if let Some(body) = body {
        request.add_header("Content-Type", "application/json");
        request.set_body(body);
    }
    router.handle(&request)
}

fn login(router: &Router<MemoryStore>, email: &str) -> String {
    let response = send(
        router,
        Method::Post,
        "/auth/login",
        None,
        Some(json!({ "email": email, "password": "password123" })),
    );
    assert_eq!(response.status(), 200, "login failed: {:?}", response.body());
    response.body()["token"].as_str().unwrap().to_string()
}

fn seeded() -> (Router<MemoryStore>, String) {
    let router = router();
    let response = send(&router, Method::Post, "/auth/seed-demo-users", None, None);
    assert_eq!(response.body()["message"], "Demo users seeded successfully");
    let admin = login(&router, "admin@hostel.com");
    (router, admin)
}

fn id_of(response: &Response, key: &str) -> String {
    response.body()[key]["id"].as_str().unwrap().to_string()
}

#[test]
fn ping_and_preflight() {
    let router = router();
    let response = send(&router, Method::Get, "/ping", None, None);
    assert_eq!(response.status(), 200);
    assert_eq!(response.body(), &json!({ "message": "pong" }));

    let response = send(&router, Method::Options, "/hostels", None, None);
    assert_eq!(response.status(), 200);
    assert_eq!(response.header("Access-Control-Allow-Origin"), Some("*"));
}

#[test]
fn cors_headers_on_errors_too() {
    let router = router();
    for response in [
        send(&router, Method::Get, "/users", None, None),
        send(&router, Method::Get, "/missing", None, None),
        send(&router, Method::Post, "/auth/login", None, Some(json!({}))),
    ] {
        assert_eq!(response.header("Access-Control-Allow-Origin"), Some("*"));
        assert_eq!(
            response.header("Access-Control-Allow-Headers"),
            Some("Content-Type, Authorization")
        );
        assert!(response.body()["error"].is_string());
    }
}

#[test]
fn register_login_and_me() {
    let router = router();
    let response = send(
        &router,
        Method::Post,
        "/auth/register",
        None,
        Some(json!({ "name": "Asha", "email": "asha@hostel.com", "password": "s3cret" })),
    );
    assert_eq!(response.status(), 200);
    assert_eq!(response.body()["message"], "User registered successfully");
    assert_eq!(response.body()["role"], "resident");
    let token = response.body()["token"].as_str().unwrap().to_string();

    let me = send(&router, Method::Get, "/auth/me", Some(&token), None);
    assert_eq!(me.status(), 200);
    assert_eq!(me.body()["user"]["email"], "asha@hostel.com");
    assert!(me.body()["user"].get("passwordHash").is_none());

    let duplicate = send(
        &router,
        Method::Post,
        "/auth/register",
        None,
        Some(json!({ "name": "Asha", "email": "asha@hostel.com", "password": "other" })),
    );
    assert_eq!(duplicate.status(), 409);

    let missing = send(&router, Method::Post, "/auth/register", None, Some(json!({ "name": "Asha" })));
    assert_eq!(missing.status(), 400);
}

#[test]
fn bad_foreign_and_expired_tokens_are_anonymous() {
    let (router, _) = seeded();
    let student = router
        .service()
        .store()
        .user_by_email("student@hostel.com")
        .unwrap()
        .unwrap();

    let foreign = TokenIssuer::new(b"some-other-signing-key", Duration::hours(1))
        .issue(&student, Utc::now())
        .unwrap();
    let expired = TokenIssuer::new(SECRET.as_bytes(), Duration::hours(1))
        .issue(&student, Utc::now() - Duration::hours(2))
        .unwrap();

    for token in ["garbage", "a.b.c", foreign.as_str(), expired.as_str()] {
        let response = send(&router, Method::Get, "/auth/me", Some(token), None);
        assert_eq!(response.status(), 401, "token {token} should not resolve");
        assert_eq!(response.body()["error"], "Unauthorized");
    }

    let valid = TokenIssuer::new(SECRET.as_bytes(), Duration::hours(1))
        .issue(&student, Utc::now())
        .unwrap();
    assert_eq!(send(&router, Method::Get, "/auth/me", Some(&valid), None).status(), 200);
}

#[test]
fn unknown_fields_are_rejected() {
    let (router, admin) = seeded();
    let response = send(
        &router,
        Method::Post,
        "/hostels",
        Some(&admin),
        Some(json!({ "name": "Hostel A", "capacity": 10, "wardenId": "x" })),
    );
    assert_eq!(response.status(), 400);

    let listed = send(&router, Method::Get, "/hostels", Some(&admin), None);
    assert_eq!(listed.body()["hostels"], json!([]));
}

#[test]
fn warden_flow_through_routes() {
    let (router, admin) = seeded();
    let users = send(&router, Method::Get, "/users", Some(&admin), None);
    let find = |email: &str| {
        users.body()["users"]
            .as_array()
            .unwrap()
            .iter()
            .find(|u| u["email"] == email)
            .unwrap()["id"]
            .as_str()
            .unwrap()
            .to_string()
    };
    let warden_id = find("warden@hostel.com");
    let student_id = find("student@hostel.com");

    let hostel = send(&router, Method::Post, "/hostels", Some(&admin), Some(json!({ "name": "Hostel A", "capacity": 100 })));
    let hostel_id = id_of(&hostel, "hostel");
    let assigned = send(
        &router,
        Method::Post,
        &format!("/hostels/{hostel_id}/assign-warden"),
        Some(&admin),
        Some(json!({ "wardenId": warden_id })),
    );
    assert_eq!(assigned.status(), 200);
    assert_eq!(assigned.body()["message"], "Warden assigned successfully");
    assert_eq!(assigned.body()["hostel"]["wardenId"], warden_id.as_str());

    // The warden's token was issued after assignment, but affiliation comes
    // from the store either way.
    let warden = login(&router, "warden@hostel.com");
    let room = send(
        &router,
        Method::Post,
        "/rooms",
        Some(&warden),
        Some(json!({ "hostelId": hostel_id, "number": "A-101", "capacity": 2 })),
    );
    assert_eq!(room.status(), 200);
    assert_eq!(room.body()["message"], "Room created");
    let room_id = id_of(&room, "room");

    let allocated = send(
        &router,
        Method::Post,
        &format!("/rooms/{room_id}/allocate"),
        Some(&warden),
        Some(json!({ "residentId": student_id })),
    );
    assert_eq!(allocated.status(), 200);
    assert_eq!(allocated.body(), &json!({ "message": "Room allocated successfully" }));

    let rooms = send(&router, Method::Get, &format!("/rooms?hostelId={hostel_id}"), Some(&warden), None);
    assert_eq!(rooms.body()["rooms"][0]["occupants"], json!([student_id]));

    let student = login(&router, "student@hostel.com");
    let complaint = send(
        &router,
        Method::Post,
        "/complaints",
        Some(&student),
        Some(json!({ "title": "Fan broken", "description": "Ceiling fan stopped" })),
    );
    assert_eq!(complaint.body()["complaint"]["status"], "pending");
    let complaint_id = id_of(&complaint, "complaint");

    let updated = send(
        &router,
        Method::Put,
        &format!("/complaints/{complaint_id}"),
        Some(&warden),
        Some(json!({ "status": "in-progress", "response": "Electrician tomorrow" })),
    );
    assert_eq!(updated.status(), 200);
    assert_eq!(updated.body()["complaint"]["status"], "in-progress");

    let backwards = send(
        &router,
        Method::Put,
        &format!("/complaints/{complaint_id}"),
        Some(&warden),
        Some(json!({ "status": "pending" })),
    );
    assert_eq!(backwards.status(), 409);

    let marked = send(
        &router,
        Method::Post,
        "/attendance",
        Some(&warden),
        Some(json!({ "residentId": student_id, "date": "2024-09-01", "status": "present" })),
    );
    assert_eq!(marked.status(), 200);
    let own = send(&router, Method::Get, "/attendance?startDate=2024-09-01", Some(&student), None);
    assert_eq!(own.body()["attendance"].as_array().unwrap().len(), 1);

    let stats = send(&router, Method::Get, "/dashboard/warden-stats", Some(&warden), None);
    assert_eq!(stats.body()["stats"]["residents"], 1);
    let stats = send(&router, Method::Get, "/dashboard/resident-stats", Some(&student), None);
    assert_eq!(stats.body()["stats"]["roomNumber"], "A-101");
    assert_eq!(stats.body()["stats"]["attendanceRate"], 100.0);
}

#[test]
fn residents_are_refused_staff_routes() {
    let (router, _) = seeded();
    let student = login(&router, "student@hostel.com");

    let hostel = send(&router, Method::Post, "/hostels", Some(&student), Some(json!({ "name": "Mine", "capacity": 1 })));
    assert_eq!(hostel.status(), 403);
    assert_eq!(send(&router, Method::Get, "/users", Some(&student), None).status(), 403);
    assert_eq!(send(&router, Method::Get, "/dashboard/stats", Some(&student), None).status(), 403);
    assert_eq!(send(&router, Method::Get, "/complaints", Some(&student), None).status(), 200);
}

#[test]
fn concurrent_allocations_never_overfill() {
    const CAPACITY: u32 = 3;
    const CONTENDERS: usize = 12;

    let (router, admin) = seeded();
    let hostel = send(&router, Method::Post, "/hostels", Some(&admin), Some(json!({ "name": "Hostel A", "capacity": 100 })));
    let room = send(
        &router,
        Method::Post,
        "/rooms",
        Some(&admin),
        Some(json!({ "hostelId": id_of(&hostel, "hostel"), "number": "A-1", "capacity": CAPACITY })),
    );
    let room_id = id_of(&room, "room");

    let residents: Vec<String> = (0..CONTENDERS)
        .map(|n| {
            let created = send(
                &router,
                Method::Post,
                "/users",
                Some(&admin),
                Some(json!({
                    "name": format!("Resident {n}"),
                    "email": format!("r{n}@hostel.com"),
                    "password": "password123",
                })),
            );
            assert_eq!(created.status(), 200, "{:?}", created.body());
            id_of(&created, "user")
        })
        .collect();

    let statuses: Vec<u16> = thread::scope(|s| {
        let handles: Vec<_> = residents
            .iter()
            .map(|resident| {
                let router = router.clone();
                let admin = admin.clone();
                let path = format!("/rooms/{room_id}/allocate");
                s.spawn(move || {
                    send(&router, Method::Post, &path, Some(&admin), Some(json!({ "residentId": resident })))
                        .status()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(statuses.iter().filter(|s| **s == 200).count(), CAPACITY as usize);
    assert!(statuses.iter().all(|s| *s == 200 || *s == 400));

    let rooms = send(&router, Method::Get, "/rooms", Some(&admin), None);
    assert_eq!(rooms.body()["rooms"][0]["occupants"].as_array().unwrap().len(), CAPACITY as usize);
}

#[test]
fn adapter_feeds_custom_extraction() {
    let (router, admin) = seeded();
    let mut adapter = RequestAdapter::new("req-custom", Method::Get, "/custom");
    adapter.add_header("authorization", format!("Bearer {admin}"));

    let meta = adapter.extract_metadata(router.service());
    assert_eq!(meta.request_id, "req-custom");
    assert_eq!(meta.principal.as_ref().unwrap().email, "admin@hostel.com");

    let extraction = extract_authed(&adapter, router.service(), &[Authenticated.into()]).unwrap();
    assert_eq!(extraction.context.principal().email, "admin@hostel.com");
}
