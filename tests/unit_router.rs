//! Requests that are answered before any query runs: the pool behind this app
//! never connects.

mod common;

use axum::http::StatusCode;
use common::{bearer_token, json_request, send, setup_offline_app};
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn test_health() {
    let app = setup_offline_app();

    let (status, body) = send(&app, json_request("GET", "/health", None, None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = setup_offline_app();

    let (status, body) =
        send(&app, json_request("GET", "/api-docs/openapi.json", None, None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["info"]["title"], "LearnHub API");
    assert!(body["paths"]["/api/v1/course"].is_object());
    assert!(body["components"]["securitySchemes"]["bearer_auth"].is_object());
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let app = setup_offline_app();

    let (status, body) = send(&app, json_request("GET", "/api/v1/user", None, None)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "You need to login first");
}

#[tokio::test]
async fn test_invalid_token_is_unauthorized() {
    let app = setup_offline_app();

    let (status, body) = send(
        &app,
        json_request("GET", "/api/v1/user", Some("not-a-jwt"), None),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid or expired token");
}

#[tokio::test]
async fn test_student_cannot_create_users() {
    let app = setup_offline_app();
    let token = bearer_token(Uuid::new_v4(), "student");

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/user",
            Some(&token),
            Some(json!({
                "username": "someone",
                "email": "someone@example.com",
                "password": "Abc123!@",
                "fullname": "Some One"
            })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(
        body["error"],
        "Access denied. Administrator privileges required."
    );
}

#[tokio::test]
async fn test_student_cannot_list_users() {
    let app = setup_offline_app();
    let token = bearer_token(Uuid::new_v4(), "student");

    let (status, _) = send(&app, json_request("GET", "/api/v1/user", Some(&token), None)).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_payments_are_admin_only() {
    let app = setup_offline_app();

    let (status, _) = send(&app, json_request("GET", "/api/v1/payment", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    for role in ["student", "instructor"] {
        let token = bearer_token(Uuid::new_v4(), role);
        let (status, body) =
            send(&app, json_request("GET", "/api/v1/payment", Some(&token), None)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert!(body["error"].as_str().unwrap().contains(role));
    }
}

#[tokio::test]
async fn test_student_cannot_create_courses() {
    let app = setup_offline_app();
    let token = bearer_token(Uuid::new_v4(), "student");

    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/course",
            Some(&token),
            Some(json!({ "title": "Rust 101" })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_register_missing_field() {
    let app = setup_offline_app();

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/auth/register",
            None,
            Some(json!({
                "email": "ada@example.com",
                "password": "Abc123!@",
                "fullname": "Ada Lovelace"
            })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "username is required");
}

#[tokio::test]
async fn test_register_invalid_email() {
    let app = setup_offline_app();

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/auth/register",
            None,
            Some(json!({
                "username": "ada",
                "email": "not-an-email",
                "password": "Abc123!@",
                "fullname": "Ada Lovelace"
            })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("Invalid email format"));
}

#[tokio::test]
async fn test_register_weak_password() {
    let app = setup_offline_app();

    for password in ["Abc12345", "abc123!@", "Ab1!"] {
        let (status, body) = send(
            &app,
            json_request(
                "POST",
                "/api/v1/auth/register",
                None,
                Some(json!({
                    "username": "ada",
                    "email": "ada@example.com",
                    "password": password,
                    "fullname": "Ada Lovelace"
                })),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "password {password}");
        assert_eq!(body["error"], "Password is invalid");
    }
}

#[tokio::test]
async fn test_login_wrong_field_type() {
    let app = setup_offline_app();

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/auth/login",
            None,
            Some(json!({ "email": "ada@example.com", "password": 12345 })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid field type in request");
}

#[tokio::test]
async fn test_refresh_without_cookie() {
    let app = setup_offline_app();

    let (status, body) =
        send(&app, json_request("POST", "/api/v1/auth/refresh-token", None, None)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Refresh token not found");
}

#[tokio::test]
async fn test_logout_without_cookie() {
    let app = setup_offline_app();
    let token = bearer_token(Uuid::new_v4(), "student");

    let (status, body) = send(
        &app,
        json_request("POST", "/api/v1/auth/logout", Some(&token), None),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Refresh token not found");
}

#[tokio::test]
async fn test_modules_require_course_id() {
    let app = setup_offline_app();

    let (status, body) = send(&app, json_request("GET", "/api/v1/module", None, None)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No course ID provided");
}

#[tokio::test]
async fn test_invalid_query_parameter() {
    let app = setup_offline_app();

    let (status, body) = send(
        &app,
        json_request("GET", "/api/v1/course?status=archived", None, None),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .starts_with("Invalid query parameters")
    );
}

#[tokio::test]
async fn test_conversation_needs_two_participants() {
    let app = setup_offline_app();
    let user_id = Uuid::new_v4();
    let token = bearer_token(user_id, "student");

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/conversation",
            Some(&token),
            Some(json!({ "participants": [user_id, user_id], "type": "direct" })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "Participants must be an array of at least 2 user IDs"
    );
}

#[tokio::test]
async fn test_conversation_rejects_unknown_type() {
    let app = setup_offline_app();
    let token = bearer_token(Uuid::new_v4(), "student");

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/conversation",
            Some(&token),
            Some(json!({
                "participants": [Uuid::new_v4(), Uuid::new_v4()],
                "type": "broadcast"
            })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid conversation type");
}

#[tokio::test]
async fn test_conversation_update_requires_metadata() {
    let app = setup_offline_app();
    let token = bearer_token(Uuid::new_v4(), "student");
    let uri = format!("/api/v1/conversation/{}", Uuid::new_v4());

    let (status, body) = send(&app, json_request("PUT", &uri, Some(&token), Some(json!({})))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Metadata is required");
}

#[tokio::test]
async fn test_review_rating_out_of_range() {
    let app = setup_offline_app();
    let token = bearer_token(Uuid::new_v4(), "student");

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/review",
            Some(&token),
            Some(json!({
                "course_id": Uuid::new_v4(),
                "rating": 6,
                "comment": "Too good"
            })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Rating must be between 1 and 5");
}

#[tokio::test]
async fn test_course_level_too_long() {
    let app = setup_offline_app();
    let token = bearer_token(Uuid::new_v4(), "instructor");

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/course",
            Some(&token),
            Some(json!({ "title": "Rust 101", "level": "x".repeat(51) })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Level cannot exceed 50 characters");
}

#[tokio::test]
async fn test_payment_transaction_id_too_long() {
    let app = setup_offline_app();
    let token = bearer_token(Uuid::new_v4(), "admin");

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/payment",
            Some(&token),
            Some(json!({
                "user_id": Uuid::new_v4(),
                "course_id": Uuid::new_v4(),
                "amount": 10.0,
                "method": "card",
                "transaction_id": "t".repeat(256)
            })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Transaction ID cannot exceed 255 characters");
}
