//! HTTP-level integration tests for caretaker and system PIN login.
//!
//! Covers successful login, bad PINs, the lockout policy (for caretakers
//! and the system PIN), system-PIN families and tokens of caretakers
//! removed after login.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete_auth, get_auth, post_json, post_json_auth, setup_session};
use serde_json::json;
use sqlx::PgPool;

async fn caretaker_login(
    app: axum::Router,
    slug: &str,
    login_id: &str,
    pin: &str,
) -> axum::response::Response {
    post_json(
        app,
        "/api/auth/caretaker",
        json!({ "familySlug": slug, "loginId": login_id, "securityPin": pin }),
    )
    .await
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn caretaker_login_success(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let family = common::create_family(app.clone(), &pool, "login-family").await;

    let response = caretaker_login(app.clone(), "login-family", "01", "111111").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert!(json["data"]["token"].is_string());
    assert!(json["data"]["expiresIn"].is_number());
    assert_eq!(json["data"]["familyName"], "Test Family");
    assert_eq!(json["data"]["caretakerName"], "Parent");
    assert_eq!(json["data"]["authType"], "CARETAKER");
    assert_eq!(json["data"]["identity"]["kind"], "caretaker");
    assert_eq!(json["data"]["identity"]["familyId"], family.id);
    assert_eq!(json["data"]["identity"]["role"], "ADMIN");

    let token = json["data"]["token"].as_str().unwrap();
    let response = get_auth(app, "/api/auth/me", token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["familySlug"], "login-family");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn wrong_pin_returns_401(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    common::create_family(app.clone(), &pool, "pin-family").await;

    let response = caretaker_login(app.clone(), "pin-family", "01", "999999").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = caretaker_login(app, "pin-family", "02", "111111").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_family_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = caretaker_login(app, "no-such-family", "01", "111111").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn repeated_failures_lock_the_caretaker(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    common::create_family(app.clone(), &pool, "lock-family").await;

    for _ in 0..5 {
        let response = caretaker_login(app.clone(), "lock-family", "01", "000000").await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    // Even the correct PIN is refused while locked.
    let response = caretaker_login(app, "lock-family", "01", "111111").await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let locked_until: Option<chrono::DateTime<chrono::Utc>> =
        sqlx::query_scalar("SELECT locked_until FROM caretakers WHERE login_id = '01'")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert!(locked_until.is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn successful_login_resets_failure_count(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    common::create_family(app.clone(), &pool, "reset-family").await;

    for _ in 0..4 {
        caretaker_login(app.clone(), "reset-family", "01", "000000").await;
    }
    let response = caretaker_login(app.clone(), "reset-family", "01", "111111").await;
    assert_eq!(response.status(), StatusCode::OK);

    let count: i32 =
        sqlx::query_scalar("SELECT failed_login_count FROM caretakers WHERE login_id = '01'")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(count, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn system_pin_family_logs_in_without_login_id(pool: PgPool) {
    common::create_setup_token(&pool, "system-token", "setup-password").await;
    let app = common::build_test_app(pool);
    let session = setup_session(app.clone(), "system-token", "setup-password").await;

    let body = json!({
        "name": "Shared Tablet",
        "slug": "shared-tablet",
        "securityPin": "222222",
    });
    let response = post_json_auth(app.clone(), "/api/setup/start", body, &session).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["settings"]["authType"], "SYSTEM");

    let response = post_json(
        app.clone(),
        "/api/auth/caretaker",
        json!({ "familySlug": "shared-tablet", "securityPin": "222222" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["authType"], "SYSTEM");
    assert!(json["data"]["caretakerName"].is_null());
    assert_eq!(json["data"]["identity"]["role"], "ADMIN");
    assert!(json["data"]["identity"]["caretakerId"].is_null());

    let response = post_json(
        app,
        "/api/auth/caretaker",
        json!({ "familySlug": "shared-tablet", "securityPin": "333333" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn repeated_failures_lock_the_system_pin(pool: PgPool) {
    common::create_setup_token(&pool, "kiosk-token", "setup-password").await;
    let app = common::build_test_app(pool.clone());
    let session = setup_session(app.clone(), "kiosk-token", "setup-password").await;
    let body = json!({ "name": "Kiosk", "slug": "kiosk-family", "securityPin": "222222" });
    let response = post_json_auth(app.clone(), "/api/setup/start", body, &session).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let system_login = |pin: &'static str| {
        post_json(
            app.clone(),
            "/api/auth/caretaker",
            json!({ "familySlug": "kiosk-family", "securityPin": pin }),
        )
    };

    for _ in 0..5 {
        assert_eq!(system_login("000000").await.status(), StatusCode::UNAUTHORIZED);
    }
    assert_eq!(system_login("222222").await.status(), StatusCode::FORBIDDEN);

    let (count, locked_until): (i32, Option<chrono::DateTime<chrono::Utc>>) = sqlx::query_as(
        "SELECT s.failed_login_count, s.locked_until FROM settings s
         JOIN families f ON f.id = s.family_id WHERE f.slug = 'kiosk-family'",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(count, 5);
    assert!(locked_until.is_some());

    // Once the lock lapses the correct PIN works and clears the counter.
    sqlx::query("UPDATE settings SET locked_until = NOW() - INTERVAL '1 minute'")
        .execute(&pool)
        .await
        .unwrap();
    assert_eq!(system_login("222222").await.status(), StatusCode::OK);

    let count: i32 = sqlx::query_scalar("SELECT failed_login_count FROM settings")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn removed_caretaker_token_stops_working(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let family = common::create_family(app.clone(), &pool, "staff-family").await;

    let response = post_json_auth(
        app.clone(),
        "/api/caretaker",
        json!({ "loginId": "02", "name": "Nanny", "securityPin": "444444" }),
        &family.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let nanny = body_json(response).await;
    let nanny_id = nanny["data"]["id"].as_i64().unwrap();
    assert_eq!(nanny["data"]["role"], "USER");

    let login = body_json(caretaker_login(app.clone(), "staff-family", "02", "444444").await).await;
    let nanny_token = login["data"]["token"].as_str().unwrap().to_string();

    // Regular caretakers cannot manage other caretakers.
    let response = get_auth(app.clone(), "/api/caretaker", &nanny_token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = delete_auth(app.clone(), &format!("/api/caretaker/{nanny_id}"), &family.token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(app, "/api/baby", &nanny_token).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn last_admin_cannot_be_removed(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let family = common::create_family(app.clone(), &pool, "solo-family").await;

    let caretakers = body_json(get_auth(app.clone(), "/api/caretaker", &family.token).await).await;
    let admin_id = caretakers["data"][0]["id"].as_i64().unwrap();

    let response = delete_auth(app.clone(), &format!("/api/caretaker/{admin_id}"), &family.token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = common::put_json_auth(
        app,
        &format!("/api/caretaker/{admin_id}"),
        json!({ "role": "USER" }),
        &family.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
