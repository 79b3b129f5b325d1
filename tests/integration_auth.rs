#![cfg(feature = "integration-db")]

mod common;

use axum::Router;
use axum::http::{StatusCode, header};
use common::{
    TEST_PASSWORD, create_test_user, generate_unique_email, json_request, send,
    setup_app_with_failing_email, setup_test_app,
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

/// Logs in and returns the response body plus the `refreshToken=...` pair from
/// `Set-Cookie`.
async fn login(app: &Router, email: &str, password: &str) -> (StatusCode, Value, Option<String>) {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/auth/login",
            None,
            Some(json!({ "email": email, "password": password })),
        ))
        .await
        .unwrap();

    let status = response.status();
    let cookie = response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find(|value| value.starts_with("refreshToken="))
        .map(|value| value.split(';').next().unwrap().to_string());
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();

    (status, body, cookie)
}

fn with_cookie(
    mut request: axum::http::Request<axum::body::Body>,
    cookie: &str,
) -> axum::http::Request<axum::body::Body> {
    request
        .headers_mut()
        .insert(header::COOKIE, cookie.parse().unwrap());
    request
}

#[sqlx::test(migrations = "./migrations")]
async fn test_register_verify_and_login(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let email = generate_unique_email();

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/auth/register",
            None,
            Some(json!({
                "username": "ada",
                "email": email.to_uppercase(),
                "password": TEST_PASSWORD,
                "fullname": "Ada Lovelace"
            })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["email"], email);
    assert_eq!(body["data"]["status"], "pending");
    assert_eq!(body["data"]["role"], "student");
    assert!(body["data"].get("password").is_none());

    let code: String = sqlx::query_scalar("SELECT verify_code FROM users WHERE email = $1")
        .bind(&email)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(code.len(), 6);

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/auth/verify-email",
            None,
            Some(json!({ "code": code })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "active");

    // the code is single use
    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/auth/verify-email",
            None,
            Some(json!({ "code": code })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Invalid code");

    let (status, body, cookie) = login(&app, &email, TEST_PASSWORD).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["token"].is_string());
    assert_eq!(body["data"]["user"]["username"], "ada");
    assert!(cookie.is_some());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_register_duplicate_email(pool: PgPool) {
    let existing = create_test_user(&pool, "student", "active").await;
    let app = setup_test_app(pool);

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/auth/register",
            None,
            Some(json!({
                "username": "fresh_name",
                "email": existing.email,
                "password": TEST_PASSWORD,
                "fullname": "Someone Else"
            })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Email already exists");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_register_duplicate_username(pool: PgPool) {
    let existing = create_test_user(&pool, "student", "active").await;
    let app = setup_test_app(pool);

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/auth/register",
            None,
            Some(json!({
                "username": existing.username,
                "email": generate_unique_email(),
                "password": TEST_PASSWORD,
                "fullname": "Someone Else"
            })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Username already exists");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_verify_expired_code(pool: PgPool) {
    let user = create_test_user(&pool, "student", "pending").await;
    sqlx::query(
        "UPDATE users SET verify_code = '123456', verify_code_expires_at = NOW() - INTERVAL '1 minute'
         WHERE id = $1",
    )
    .bind(user.id)
    .execute(&pool)
    .await
    .unwrap();
    let app = setup_test_app(pool);

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/auth/verify-email",
            None,
            Some(json!({ "code": "123456" })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Code expired");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_invalid_credentials(pool: PgPool) {
    let user = create_test_user(&pool, "student", "active").await;
    let app = setup_test_app(pool);

    let (status, body, cookie) = login(&app, &user.email, "Wrong123!@").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid email or password");
    assert!(cookie.is_none());

    let (status, body, _) = login(&app, "nobody@test.com", TEST_PASSWORD).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid email or password");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_blocked_user_cannot_login(pool: PgPool) {
    let user = create_test_user(&pool, "student", "block").await;
    let app = setup_test_app(pool);

    let (status, body, _) = login(&app, &user.email, TEST_PASSWORD).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Account inactive");

    let (status, body, cookie) = login(&app, &user.email, "Wrong123!@").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Account inactive");
    assert!(cookie.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_refresh_and_logout(pool: PgPool) {
    let user = create_test_user(&pool, "instructor", "active").await;
    let app = setup_test_app(pool);

    let (_, body, cookie) = login(&app, &user.email, TEST_PASSWORD).await;
    let cookie = cookie.unwrap();
    let access_token = body["data"]["token"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        with_cookie(
            json_request("POST", "/api/v1/auth/refresh-token", None, None),
            &cookie,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["token"].is_string());

    let (status, body) = send(
        &app,
        with_cookie(
            json_request("POST", "/api/v1/auth/logout", Some(&access_token), None),
            &cookie,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (status, body) = send(
        &app,
        with_cookie(
            json_request("POST", "/api/v1/auth/refresh-token", None, None),
            &cookie,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Refresh token is expired or used");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_new_login_replaces_previous_session(pool: PgPool) {
    let user = create_test_user(&pool, "student", "active").await;
    let app = setup_test_app(pool);

    let (_, _, first_cookie) = login(&app, &user.email, TEST_PASSWORD).await;
    let (_, _, second_cookie) = login(&app, &user.email, TEST_PASSWORD).await;

    let (status, _) = send(
        &app,
        with_cookie(
            json_request("POST", "/api/v1/auth/refresh-token", None, None),
            &first_cookie.unwrap(),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        with_cookie(
            json_request("POST", "/api/v1/auth/refresh-token", None, None),
            &second_cookie.unwrap(),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_refresh_with_garbage_cookie(pool: PgPool) {
    let app = setup_test_app(pool);

    let (status, body) = send(
        &app,
        with_cookie(
            json_request("POST", "/api/v1/auth/refresh-token", None, None),
            "refreshToken=garbage",
        ),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Invalid refresh token");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_forgot_and_reset_password(pool: PgPool) {
    let user = create_test_user(&pool, "student", "active").await;
    let app = setup_test_app(pool.clone());

    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/auth/forgot-password",
            None,
            Some(json!({ "email": user.email })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let code: String =
        sqlx::query_scalar("SELECT reset_password_code FROM users WHERE id = $1")
            .bind(user.id)
            .fetch_one(&pool)
            .await
            .unwrap();

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/auth/reset-password",
            None,
            Some(json!({ "code": code, "password": "N3w-Passw0rd!" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Password is invalid");

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/auth/reset-password",
            None,
            Some(json!({ "code": code, "password": "N3wPassw0rd!" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["token"].is_string());

    let (status, _, _) = login(&app, &user.email, TEST_PASSWORD).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _, _) = login(&app, &user.email, "N3wPassw0rd!").await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/auth/reset-password",
            None,
            Some(json!({ "code": code, "password": "An0ther!pass" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Token is invalid or has expired");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_forgot_password_unknown_email(pool: PgPool) {
    let app = setup_test_app(pool);

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/auth/forgot-password",
            None,
            Some(json!({ "email": format!("{}@nowhere.test", Uuid::new_v4()) })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "User not found");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_register_keeps_user_when_email_fails(pool: PgPool) {
    let app = setup_app_with_failing_email(pool.clone());
    let email = generate_unique_email();

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/auth/register",
            None,
            Some(json!({
                "username": "no_mail",
                "email": email,
                "password": TEST_PASSWORD,
                "fullname": "No Mail"
            })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Email could not be sent");

    let (status, code): (String, Option<String>) =
        sqlx::query_as("SELECT status::text, verify_code FROM users WHERE email = $1")
            .bind(&email)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(status, "pending");
    assert!(code.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_forgot_password_clears_code_when_email_fails(pool: PgPool) {
    let user = create_test_user(&pool, "student", "active").await;
    let app = setup_app_with_failing_email(pool.clone());

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/auth/forgot-password",
            None,
            Some(json!({ "email": user.email })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Email could not be sent");

    let code: Option<String> =
        sqlx::query_scalar("SELECT reset_password_code FROM users WHERE id = $1")
            .bind(user.id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert!(code.is_none());
}
