//! HTTP-level integration tests for families, slugs, setup links and the
//! setup wizard.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, get, get_auth, post_json, post_json_auth, put_json_auth, setup_body, setup_session,
    SYSADMIN_PASSWORD,
};
use serde_json::json;
use sqlx::PgPool;

async fn sysadmin_token(app: axum::Router) -> String {
    let response = post_json(
        app,
        "/api/auth/sysadmin",
        json!({ "password": SYSADMIN_PASSWORD }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["data"]["token"]
        .as_str()
        .unwrap()
        .to_string()
}

// ---------------------------------------------------------------------------
// Slugs
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn reserved_slug_is_unavailable(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/family/check-slug?slug=admin").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["available"], false);
    assert_eq!(json["data"]["reason"], "This slug is reserved");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn taken_slug_is_unavailable(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    common::create_family(app.clone(), &pool, "smith-family").await;

    let json = body_json(get(app.clone(), "/api/family/check-slug?slug=Smith-Family").await).await;
    assert_eq!(json["data"]["available"], false);

    let json = body_json(get(app, "/api/family/check-slug?slug=jones-family").await).await;
    assert_eq!(json["data"]["available"], true);
    assert!(json["data"]["reason"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn public_lookup_by_slug(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let family = common::create_family(app.clone(), &pool, "lookup-family").await;

    let response = get(app.clone(), "/api/family/by-slug/lookup-family").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["id"], family.id);
    assert_eq!(json["data"]["name"], "Test Family");

    let response = get(app, "/api/family/by-slug/nobody-here").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Setup wizard
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn setup_creates_family_and_admin_session(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let family = common::create_family(app.clone(), &pool, "new-family").await;

    let response = get_auth(app.clone(), "/api/family", &family.token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["family"]["slug"], "new-family");
    assert_eq!(json["data"]["settings"]["authType"], "CARETAKER");

    let response = get_auth(app, "/api/caretaker", &family.token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let caretakers = json["data"].as_array().unwrap();
    assert_eq!(caretakers.len(), 1);
    assert_eq!(caretakers[0]["role"], "ADMIN");
    assert!(caretakers[0].get("securityPinHash").is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn blank_slug_is_derived_from_name(pool: PgPool) {
    common::create_setup_token(&pool, "derive-token", "setup-password").await;
    let app = common::build_test_app(pool);
    let session = setup_session(app.clone(), "derive-token", "setup-password").await;

    let mut body = setup_body("");
    body["name"] = json!("The O'Brien Family");
    let response = post_json_auth(app, "/api/setup/start", body, &session).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["family"]["slug"], "the-o-brien-family");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn setup_token_is_single_use(pool: PgPool) {
    common::create_setup_token(&pool, "one-shot-token", "setup-password").await;
    let app = common::build_test_app(pool);
    let session = setup_session(app.clone(), "one-shot-token", "setup-password").await;

    let first = post_json_auth(app.clone(), "/api/setup/start", setup_body("first-family"), &session).await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second =
        post_json_auth(app.clone(), "/api/setup/start", setup_body("second-family"), &session).await;
    assert_eq!(second.status(), StatusCode::GONE);

    let relogin = post_json(
        app,
        "/api/auth/setup-token",
        json!({ "token": "one-shot-token", "password": "setup-password" }),
    )
    .await;
    assert_eq!(relogin.status(), StatusCode::GONE);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn expired_setup_token_is_gone(pool: PgPool) {
    let token_id = common::create_setup_token(&pool, "late-link", "setup-password").await;
    let app = common::build_test_app(pool.clone());
    let session = setup_session(app.clone(), "late-link", "setup-password").await;

    sqlx::query("UPDATE setup_tokens SET expires_at = NOW() - INTERVAL '1 minute' WHERE id = $1")
        .bind(token_id)
        .execute(&pool)
        .await
        .unwrap();

    let response =
        post_json_auth(app.clone(), "/api/setup/start", setup_body("late-family"), &session).await;
    assert_eq!(response.status(), StatusCode::GONE);

    let response = post_json(
        app,
        "/api/auth/setup-token",
        json!({ "token": "late-link", "password": "setup-password" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::GONE);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn setup_token_rejects_wrong_password(pool: PgPool) {
    common::create_setup_token(&pool, "guarded-token", "setup-password").await;
    let app = common::build_test_app(pool);

    let response = post_json(
        app.clone(),
        "/api/auth/setup-token",
        json!({ "token": "guarded-token", "password": "not-the-password" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = post_json(
        app,
        "/api/auth/setup-token",
        json!({ "token": "unknown-token", "password": "setup-password" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn setup_rejects_reserved_slug_and_missing_admin(pool: PgPool) {
    common::create_setup_token(&pool, "strict-token", "setup-password").await;
    let app = common::build_test_app(pool);
    let session = setup_session(app.clone(), "strict-token", "setup-password").await;

    let response = post_json_auth(app.clone(), "/api/setup/start", setup_body("api"), &session).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let mut body = setup_body("no-admin-family");
    body["caretakers"][0]["role"] = json!("USER");
    body["securityPin"] = json!("222222");
    let response = post_json_auth(app, "/api/setup/start", body, &session).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn setup_with_duplicate_slug_conflicts(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    common::create_family(app.clone(), &pool, "popular-slug").await;

    common::create_setup_token(&pool, "late-token", "setup-password").await;
    let session = setup_session(app.clone(), "late-token", "setup-password").await;
    let response = post_json_auth(app, "/api/setup/start", setup_body("popular-slug"), &session).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn family_and_settings_names_stay_in_step(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let family = common::create_family(app.clone(), &pool, "rename-family").await;

    let response =
        put_json_auth(app.clone(), "/api/family", json!({ "name": "Renamed Family" }), &family.token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let settings = body_json(get_auth(app.clone(), "/api/settings", &family.token).await).await;
    assert_eq!(settings["data"]["familyName"], "Renamed Family");

    let response = put_json_auth(
        app.clone(),
        "/api/settings",
        json!({ "familyName": "Settled Family" }),
        &family.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(get_auth(app, "/api/family", &family.token).await).await;
    assert_eq!(json["data"]["family"]["name"], "Settled Family");
    assert_eq!(json["data"]["settings"]["familyName"], "Settled Family");
}

// ---------------------------------------------------------------------------
// Sysadmin
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn sysadmin_login_checks_password(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(app, "/api/auth/sysadmin", json!({ "password": "guess" })).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn sysadmin_issues_working_setup_link(pool: PgPool) {
    let app = common::build_test_app(pool);
    let admin = sysadmin_token(app.clone()).await;

    let response = post_json_auth(
        app.clone(),
        "/api/family/setup-link",
        json!({ "password": "link-password" }),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    let token = json["data"]["token"].as_str().unwrap().to_string();
    assert_eq!(
        json["data"]["url"],
        format!("http://localhost:5173/setup/{token}")
    );

    let session = setup_session(app.clone(), &token, "link-password").await;
    let response = post_json_auth(app, "/api/setup/start", setup_body("linked-family"), &session).await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn sysadmin_can_deactivate_family(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let family = common::create_family(app.clone(), &pool, "paused-family").await;
    let admin = sysadmin_token(app.clone()).await;

    let response = get_auth(app.clone(), "/api/family/list", &admin).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 1);

    let response = put_json_auth(
        app.clone(),
        &format!("/api/family/{}", family.id),
        json!({ "isActive": false }),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // Existing tokens lose access and new logins are refused.
    let response = get_auth(app.clone(), "/api/baby", &family.token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = post_json(
        app,
        "/api/auth/caretaker",
        json!({ "familySlug": "paused-family", "loginId": "01", "securityPin": "111111" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn family_list_requires_sysadmin(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let family = common::create_family(app.clone(), &pool, "curious-family").await;

    let response = get_auth(app, "/api/family/list", &family.token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
