//! Shared fixtures: an in-memory store seeded with one student, one active
//! session, three clearance items and two staff accounts.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, header};
use chrono::{Duration, Utc};
use fake::Fake;
use fake::faker::name::en::Name;
use http_body_util::BodyExt;
use serde_json::Value;

use clearance::router::init_router;
use clearance::state::AppState;
use clearance_auth::JwtMaker;
use clearance_config::{CorsConfig, JwtConfig};
use clearance_core::hash_password;
use clearance_db::InMemoryStore;
use clearance_models::{
    ClearanceItem, ClearanceItemId, ClearanceSession, DepartmentId, RoleId, SessionId, StaffUser,
    StaffUserId, Student, StudentId, roles,
};

pub const TEST_SECRET: &str = "test-secret-that-is-long-enough-for-hs256";
pub const STUDENT_ID: i64 = 42;
pub const SESSION_ID: i64 = 7;
pub const ITEM_IDS: [i64; 3] = [1, 2, 3];
pub const STAFF_ID: i64 = 3;
pub const ADMIN_ID: i64 = 1;
pub const STAFF_USERNAME: &str = "library.approver";
pub const ADMIN_USERNAME: &str = "registrar";
pub const PASSWORD: &str = "testpass123";

pub fn jwt_config() -> JwtConfig {
    JwtConfig {
        secret: TEST_SECRET.to_string(),
        access_token_expiry: 3600,
    }
}

pub fn cors_config() -> CorsConfig {
    CorsConfig {
        allowed_origins: vec!["http://localhost:3000".to_string()],
    }
}

pub fn jwt_maker() -> JwtMaker {
    JwtMaker::new(TEST_SECRET).unwrap()
}

pub fn token_for(user_id: i64, role: &str) -> String {
    let (token, _) = jwt_maker()
        .create_token(user_id, role, Duration::minutes(15))
        .unwrap();
    token
}

pub fn staff_token() -> String {
    token_for(STAFF_ID, roles::STAFF)
}

pub fn admin_token() -> String {
    token_for(ADMIN_ID, roles::ADMIN)
}

pub fn student(id: i64) -> Student {
    Student {
        id: StudentId::new(id),
        student_number: format!("STU{id:05}"),
        full_name: Name().fake(),
        department_id: DepartmentId::new(1),
        created_at: Utc::now(),
    }
}

pub fn session(id: i64, is_active: bool) -> ClearanceSession {
    ClearanceSession {
        id: SessionId::new(id),
        name: format!("Session {id}"),
        is_active,
        created_at: Utc::now(),
    }
}

pub fn item(id: i64, title: &str, sequence: i32) -> ClearanceItem {
    ClearanceItem {
        id: ClearanceItemId::new(id),
        code: format!("ITEM{id}"),
        title: title.to_string(),
        description: String::new(),
        department_id: DepartmentId::new(1),
        approver_staff_id: StaffUserId::new(STAFF_ID),
        requires_attachment: false,
        sequence,
        created_at: Utc::now(),
    }
}

pub fn staff_user(id: i64, username: &str) -> StaffUser {
    StaffUser {
        id: StaffUserId::new(id),
        username: username.to_string(),
        full_name: Name().fake(),
        role_id: RoleId::new(id),
        created_at: Utc::now(),
    }
}

/// Student 42, active session 7, items A/B/C (ids 1..=3) and two staff users.
pub fn seeded_store() -> InMemoryStore {
    let store = InMemoryStore::new();

    store.insert_student(student(STUDENT_ID));
    store.insert_session(session(SESSION_ID, true));
    for (id, title) in ITEM_IDS.iter().zip(["A", "B", "C"]) {
        store.insert_item(item(*id, title, *id as i32));
    }

    let password_hash = hash_password(PASSWORD).unwrap();
    store.insert_staff_user(
        staff_user(STAFF_ID, STAFF_USERNAME),
        roles::STAFF,
        password_hash.clone(),
    );
    store.insert_staff_user(
        staff_user(ADMIN_ID, ADMIN_USERNAME),
        roles::ADMIN,
        password_hash,
    );

    store
}

pub fn test_app(store: InMemoryStore) -> Router {
    let state = AppState::new(Arc::new(store), jwt_config(), cors_config()).unwrap();
    init_router(state)
}

pub fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn body_json(response: axum::response::Response) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}
