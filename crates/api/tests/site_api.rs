//! HTTP-level tests for the contact form, newsletter and site content.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete, get, get_auth, patch_json_auth, post_json, put_json_auth};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Contact form
// ---------------------------------------------------------------------------

fn contact_body() -> serde_json::Value {
    serde_json::json!({
        "name": "Julián",
        "email": "Julian@Example.com",
        "subject": "compra",
        "message": "¿Sigue disponible la obra?",
    })
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn contact_submission_is_stored_as_new(pool: PgPool) {
    let response = post_json(common::build_test_app(pool.clone()), "/api/v1/contact", contact_body()).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "new");
    assert_eq!(json["data"]["email"], "julian@example.com");
    let id = json["data"]["id"].as_i64().unwrap();

    let admin = common::admin_token(&pool).await;

    // Opening a new message marks it read.
    let response = get_auth(common::build_test_app(pool.clone()), &format!("/api/v1/contact/{id}"), &admin).await;
    assert_eq!(body_json(response).await["data"]["status"], "read");

    let response = patch_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/contact/{id}/status"),
        serde_json::json!({ "status": "replied" }),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get_auth(common::build_test_app(pool), "/api/v1/contact?status=replied", &admin).await;
    assert_eq!(body_json(response).await["data"]["total"], 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn contact_submission_validation(pool: PgPool) {
    let mut bad_email = contact_body();
    bad_email["email"] = serde_json::json!("nope");
    let mut bad_subject = contact_body();
    bad_subject["subject"] = serde_json::json!("spam");
    let mut empty_message = contact_body();
    empty_message["message"] = serde_json::json!("");

    for body in [bad_email, bad_subject, empty_message] {
        let response = post_json(common::build_test_app(pool.clone()), "/api/v1/contact", body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn contact_inbox_is_admin_only(pool: PgPool) {
    let response = get(common::build_test_app(pool), "/api/v1/contact").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Newsletter
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn subscribe_unsubscribe_and_reactivate(pool: PgPool) {
    let body = serde_json::json!({ "email": " Lector@Example.com ", "name": "Lector" });

    let response = post_json(common::build_test_app(pool.clone()), "/api/v1/newsletter/subscribe", body.clone()).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["outcome"], "subscribed");
    assert_eq!(json["data"]["subscriber"]["email"], "lector@example.com");

    let response = post_json(common::build_test_app(pool.clone()), "/api/v1/newsletter/subscribe", body.clone()).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["outcome"], "already_subscribed");

    let response = delete(
        common::build_test_app(pool.clone()),
        "/api/v1/newsletter/unsubscribe/lector@example.com",
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = post_json(common::build_test_app(pool.clone()), "/api/v1/newsletter/subscribe", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["outcome"], "reactivated");
    assert_eq!(json["data"]["subscriber"]["status"], "active");

    let admin = common::admin_token(&pool).await;
    let response = get_auth(common::build_test_app(pool), "/api/v1/newsletter/subscribers", &admin).await;
    assert_eq!(body_json(response).await["data"]["total"], 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unsubscribe_unknown_email_returns_404(pool: PgPool) {
    let response = delete(
        common::build_test_app(pool),
        "/api/v1/newsletter/unsubscribe/nadie@example.com",
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn subscription_source_is_recorded_and_validated(pool: PgPool) {
    let response = post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/newsletter/subscribe",
        serde_json::json!({ "email": "feria@example.com", "source": "import" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["data"]["subscriber"]["source"], "import");

    let response = post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/newsletter/subscribe",
        serde_json::json!({ "email": "web@example.com" }),
    )
    .await;
    assert_eq!(body_json(response).await["data"]["subscriber"]["source"], "website");

    let response = post_json(
        common::build_test_app(pool),
        "/api/v1/newsletter/subscribe",
        serde_json::json!({ "email": "otro@example.com", "source": "flyer" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Site content
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn site_info_starts_with_defaults(pool: PgPool) {
    let response = get(common::build_test_app(pool), "/api/v1/siteinfo").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["biography"]["title"], "Biografía");
    assert_eq!(json["data"]["contact"]["email"], "contacto@ejemplo.com");
    assert_eq!(
        json["data"]["legal_pages"]["privacy_policy"]["title"],
        "Política de Privacidad"
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn site_info_update_merges_sections(pool: PgPool) {
    let admin = common::admin_token(&pool).await;

    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/siteinfo",
        serde_json::json!({ "biography": { "content": "Pintora rosarina." } }),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["updated_by"], "Test User");

    let response = get(common::build_test_app(pool), "/api/v1/siteinfo/biography").await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["content"], "Pintora rosarina.");
    assert_eq!(json["data"]["title"], "Biografía");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn legal_page_update_requires_content(pool: PgPool) {
    let admin = common::admin_token(&pool).await;

    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/siteinfo/legal/terms",
        serde_json::json!({ "content": "Condiciones de venta." }),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["content"], "Condiciones de venta.");
    assert_eq!(json["data"]["title"], "Términos y Condiciones");

    let response = put_json_auth(
        common::build_test_app(pool),
        "/api/v1/siteinfo/legal/terms",
        serde_json::json!({ "content": "  " }),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
