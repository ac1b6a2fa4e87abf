mod common;

use std::sync::Arc;

use axum::http::{HeaderValue, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use clearance::state::AppState;
use clearance_config::JwtConfig;
use clearance_db::InMemoryStore;
use common::{
    ADMIN_USERNAME, ITEM_IDS, PASSWORD, SESSION_ID, STAFF_ID, STAFF_USERNAME, STUDENT_ID,
    TEST_SECRET, admin_token, body_json, cors_config, request, seeded_store, staff_token,
    test_app, token_for,
};

#[tokio::test]
async fn test_login_success() {
    let app = test_app(seeded_store());

    let response = app
        .oneshot(request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "username": STAFF_USERNAME, "password": PASSWORD })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert!(body["access_token"].is_string());
    assert_eq!(body["payload"]["user_id"], STAFF_ID);
    assert_eq!(body["payload"]["role"], "staff");
    assert_eq!(body["user"]["username"], STAFF_USERNAME);
    assert!(body["user"].get("password_hash").is_none());

    let issued_at = body["payload"]["iat"].as_i64().unwrap();
    let expires_at = body["payload"]["exp"].as_i64().unwrap();
    assert_eq!(expires_at - issued_at, 3600);
}

#[test]
fn test_state_rejects_out_of_range_token_lifetime() {
    for expiry in [0, -1, 9_000_000_000_000, i64::MAX] {
        let jwt_config = JwtConfig {
            secret: TEST_SECRET.to_string(),
            access_token_expiry: expiry,
        };
        let result = AppState::new(Arc::new(InMemoryStore::new()), jwt_config, cors_config());
        assert!(result.is_err(), "expiry: {expiry}");
    }
}

#[tokio::test]
async fn test_login_token_opens_protected_routes() {
    let store = seeded_store();
    let app = test_app(store);

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "username": ADMIN_USERNAME, "password": PASSWORD })),
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    let token = body["access_token"].as_str().unwrap().to_string();

    let response = app
        .oneshot(request(
            "GET",
            &format!("/api/sessions/{SESSION_ID}/records"),
            Some(&token),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_login_invalid_credentials() {
    let app = test_app(seeded_store());

    for (username, password) in [(STAFF_USERNAME, "wrongpass"), ("nobody", PASSWORD)] {
        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/api/auth/login",
                None,
                Some(json!({ "username": username, "password": password })),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["error"], "invalid username or password");
    }
}

#[tokio::test]
async fn test_protected_route_without_token() {
    let app = test_app(seeded_store());

    let response = app
        .oneshot(request(
            "POST",
            &format!("/api/students/{STUDENT_ID}/clearance_request"),
            None,
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"], "missing authorization header");
}

#[tokio::test]
async fn test_protected_route_with_malformed_header() {
    let app = test_app(seeded_store());

    let mut req = request(
        "POST",
        &format!("/api/students/{STUDENT_ID}/clearance_request"),
        None,
        None,
    );
    req.headers_mut()
        .insert("authorization", "Token abc".parse().unwrap());

    let response = app.oneshot(req).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"], "invalid authorization header format");
}

#[tokio::test]
async fn test_protected_route_with_non_ascii_header() {
    let app = test_app(seeded_store());

    let mut req = request(
        "POST",
        &format!("/api/students/{STUDENT_ID}/clearance_request"),
        None,
        None,
    );
    req.headers_mut().insert(
        "authorization",
        HeaderValue::from_bytes(b"Bearer \xfftoken").unwrap(),
    );

    let response = app.oneshot(req).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"], "invalid authorization header format");
}

#[tokio::test]
async fn test_non_numeric_id_is_a_json_bad_request() {
    let app = test_app(seeded_store());
    let token = staff_token();

    for uri in [
        "/api/clearance_records/abc",
        "/api/clearance_requests/abc/records",
        "/api/notifications/student/abc",
    ] {
        let response = app
            .clone()
            .oneshot(request("GET", uri, Some(&token), None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "uri: {uri}");
        let body = body_json(response).await;
        assert!(
            body["error"]
                .as_str()
                .unwrap()
                .starts_with("Invalid path parameter"),
            "uri: {uri}"
        );
    }
}

#[tokio::test]
async fn test_protected_route_with_wrong_role() {
    let app = test_app(seeded_store());
    let token = token_for(99, "student");

    let response = app
        .oneshot(request(
            "POST",
            &format!("/api/students/{STUDENT_ID}/clearance_request"),
            Some(&token),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_submit_then_duplicate() {
    let app = test_app(seeded_store());
    let token = staff_token();
    let uri = format!("/api/students/{STUDENT_ID}/clearance_request");

    let response = app
        .clone()
        .oneshot(request("POST", &uri, Some(&token), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    assert_eq!(body["request"]["student_id"], STUDENT_ID);
    assert_eq!(body["request"]["session_id"], SESSION_ID);
    assert_eq!(body["overall_status"], "pending");
    assert_eq!(body["records"].as_array().unwrap().len(), ITEM_IDS.len());

    let response = app
        .oneshot(request("POST", &uri, Some(&token), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "clearance request already submitted");
}

#[tokio::test]
async fn test_submit_for_unknown_student() {
    let app = test_app(seeded_store());

    let response = app
        .oneshot(request(
            "POST",
            "/api/students/404/clearance_request",
            Some(&staff_token()),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"], "student not found");
}

#[tokio::test]
async fn test_update_record_status_flow() {
    let store = seeded_store();
    let app = test_app(store.clone());
    let token = staff_token();

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            &format!("/api/students/{STUDENT_ID}/clearance_request"),
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    let submitted = body_json(response).await;
    let record_id = submitted["records"][1]["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(request(
            "PATCH",
            &format!("/api/clearance_records/{record_id}/status"),
            Some(&token),
            Some(json!({ "status": "rejected", "note": "fees owed" })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "rejected");
    assert_eq!(body["note"], "fees owed");
    assert_eq!(body["handled_by"], STAFF_ID);

    let response = app
        .clone()
        .oneshot(request(
            "GET",
            &format!("/api/notifications/student/{STUDENT_ID}"),
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let notifications = body_json(response).await;
    assert_eq!(notifications.as_array().unwrap().len(), 1);
    assert_eq!(
        notifications[0]["message"],
        "Your clearance item 'B' has been rejected. Note: fees owed"
    );
    assert_eq!(notifications[0]["recipient"], json!({"kind": "student", "id": STUDENT_ID}));
    assert_eq!(notifications[0]["read"], false);

    let notification_id = notifications[0]["id"].as_i64().unwrap();
    let response = app
        .clone()
        .oneshot(request(
            "PATCH",
            &format!("/api/notifications/{notification_id}/read"),
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["read"], true);

    let response = app
        .oneshot(request(
            "GET",
            &format!("/api/notifications/user/{STAFF_ID}"),
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    let notifications = body_json(response).await;
    assert_eq!(notifications.as_array().unwrap().len(), 1);
    assert_eq!(
        notifications[0]["message"],
        format!("You updated clearance record {record_id} with status 'rejected'.")
    );
}

#[tokio::test]
async fn test_update_record_rejects_bad_status() {
    let store = seeded_store();
    let app = test_app(store);
    let token = staff_token();

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            &format!("/api/students/{STUDENT_ID}/clearance_request"),
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    let submitted = body_json(response).await;
    let record_id = submitted["records"][0]["id"].as_i64().unwrap();
    let uri = format!("/api/clearance_records/{record_id}/status");

    for status in ["pending", "done"] {
        let response = app
            .clone()
            .oneshot(request("PATCH", &uri, Some(&token), Some(json!({ "status": status }))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "status: {status}");
    }

    let response = app
        .oneshot(request(
            "PATCH",
            "/api/clearance_records/9999/status",
            Some(&token),
            Some(json!({ "status": "approved" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_session_records_require_admin() {
    let app = test_app(seeded_store());
    let uri = format!("/api/sessions/{SESSION_ID}/records");

    let response = app
        .clone()
        .oneshot(request("GET", &uri, Some(&staff_token()), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .oneshot(request("GET", &uri, Some(&admin_token()), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_json(response).await.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_request_reads_over_http() {
    let app = test_app(seeded_store());
    let token = staff_token();

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            &format!("/api/students/{STUDENT_ID}/clearance_request"),
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    let submitted = body_json(response).await;
    let request_id = submitted["request"]["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(request(
            "GET",
            &format!("/api/clearance_requests/{request_id}"),
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, submitted);

    let response = app
        .clone()
        .oneshot(request(
            "GET",
            &format!("/api/students/{STUDENT_ID}/records"),
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await.as_array().unwrap().len(), ITEM_IDS.len());

    let response = app
        .oneshot(request("GET", "/api/clearance_requests/9999", Some(&token), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
