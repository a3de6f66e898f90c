//! HTTP-level tests for the back office: ledger, budgets, CRM, tasks, notes.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, delete_auth, get, get_auth, patch_json_auth, post_file_auth, post_json_auth,
    put_json_auth, FakeMedia, TestProviders,
};
use sqlx::PgPool;
use std::sync::Arc;

async fn create_transaction(pool: &PgPool, token: &str, body: serde_json::Value) -> i64 {
    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/admin/finances/transactions",
        body,
        token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

async fn create_budget(pool: &PgPool, token: &str, year: i32, month: u32) {
    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/admin/finances/budgets",
        serde_json::json!({ "year": year, "month": month }),
        token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

async fn budget_json(pool: &PgPool, token: &str, year: i32, month: u32) -> serde_json::Value {
    let response = get_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/admin/finances/budgets/{year}/{month}"),
        token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["data"].clone()
}

async fn create_event(pool: &PgPool, token: &str, body: serde_json::Value) -> serde_json::Value {
    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/admin/agenda/events",
        body,
        token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

fn event(title: &str, start: &str, end: &str) -> serde_json::Value {
    serde_json::json!({
        "title": title,
        "type": "exhibition",
        "start_date": start,
        "end_date": end,
    })
}

fn ids(list: &serde_json::Value) -> Vec<i64> {
    list.as_array()
        .unwrap()
        .iter()
        .map(|e| e["id"].as_i64().unwrap())
        .collect()
}

fn transaction(kind: &str, category: &str, amount: f64, status: &str) -> serde_json::Value {
    serde_json::json!({
        "type": kind,
        "amount": amount,
        "category": category,
        "description": format!("{category} {amount}"),
        "date": "2025-03-10T12:00:00Z",
        "payment_status": status,
    })
}

// ---------------------------------------------------------------------------
// Access
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn back_office_requires_admin(pool: PgPool) {
    let response = get(common::build_test_app(pool.clone()), "/api/v1/admin/finances/summary").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let (_user, token) = common::customer_token(&pool, "curioso@example.com").await;
    let response = get_auth(common::build_test_app(pool), "/api/v1/admin/agenda/tasks", &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Finances and budgets
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn budget_actuals_follow_completed_ledger_entries(pool: PgPool) {
    let admin = common::admin_token(&pool).await;

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/admin/finances/budgets",
        serde_json::json!({ "year": 2025, "month": 3 }),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["actual_income"], 0.0);
    assert!(!json["data"]["categories"].as_array().unwrap().is_empty());

    create_transaction(&pool, &admin, transaction("income", "artwork_sale", 1500.0, "completed")).await;
    let materials =
        create_transaction(&pool, &admin, transaction("expense", "materials", 300.0, "completed")).await;
    create_transaction(&pool, &admin, transaction("expense", "rent", 200.0, "pending")).await;

    let response = get_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/admin/finances/budgets/2025/3",
        &admin,
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["actual_income"], 1500.0);
    assert_eq!(json["data"]["actual_expense"], 300.0);
    assert_eq!(json["data"]["actual_balance"], 1200.0);

    // Deleting a ledger entry re-syncs its month.
    let response = delete_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/admin/finances/transactions/{materials}"),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(
        common::build_test_app(pool),
        "/api/v1/admin/finances/budgets/2025/3",
        &admin,
    )
    .await;
    assert_eq!(body_json(response).await["data"]["actual_expense"], 0.0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn budget_validation_and_missing_sync(pool: PgPool) {
    let admin = common::admin_token(&pool).await;

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/admin/finances/budgets",
        serde_json::json!({ "year": 2025, "month": 13 }),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = patch_json_auth(
        common::build_test_app(pool),
        "/api/v1/admin/finances/budgets/2024/6/sync",
        serde_json::json!({}),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn ledger_filters_and_reports(pool: PgPool) {
    let admin = common::admin_token(&pool).await;
    create_transaction(&pool, &admin, transaction("income", "artwork_sale", 1500.0, "completed")).await;
    create_transaction(&pool, &admin, transaction("expense", "materials", 300.0, "completed")).await;
    create_transaction(&pool, &admin, transaction("expense", "materials", 100.0, "completed")).await;

    let response = get_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/admin/finances/transactions?type=expense&start_date=2025-03-01&end_date=2025-03-31",
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["total"], 2);

    let response = get_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/admin/finances/category-breakdown?year=2025&month=3",
        &admin,
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["type"], "expense");
    assert_eq!(json["data"]["total"], 400.0);
    assert_eq!(json["data"]["categories"][0]["category"], "materials");
    assert_eq!(json["data"]["categories"][0]["count"], 2);

    let response = get_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/admin/finances/yearly-comparison?year=2025",
        &admin,
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["months"].as_array().unwrap().len(), 12);
    assert_eq!(json["data"]["balance"], 1100.0);

    let response = get_auth(
        common::build_test_app(pool),
        "/api/v1/admin/finances/transactions?start_date=marzo",
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn transaction_rejects_bad_amount_and_type(pool: PgPool) {
    let admin = common::admin_token(&pool).await;

    for body in [
        transaction("income", "artwork_sale", -5.0, "completed"),
        transaction("gift", "artwork_sale", 5.0, "completed"),
        transaction("income", "artwork_sale", 5.0, "maybe"),
    ] {
        let response = post_json_auth(
            common::build_test_app(pool.clone()),
            "/api/v1/admin/finances/transactions",
            body,
            &admin,
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn moving_a_transaction_across_months_resyncs_both_budgets(pool: PgPool) {
    let admin = common::admin_token(&pool).await;
    create_budget(&pool, &admin, 2025, 3).await;
    create_budget(&pool, &admin, 2025, 4).await;

    let id = create_transaction(&pool, &admin, transaction("income", "artwork_sale", 800.0, "completed")).await;
    assert_eq!(budget_json(&pool, &admin, 2025, 3).await["actual_income"], 800.0);
    assert_eq!(budget_json(&pool, &admin, 2025, 4).await["actual_income"], 0.0);

    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/admin/finances/transactions/{id}"),
        serde_json::json!({ "date": "2025-04-02T09:00:00Z" }),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    assert_eq!(budget_json(&pool, &admin, 2025, 3).await["actual_income"], 0.0);
    assert_eq!(budget_json(&pool, &admin, 2025, 4).await["actual_income"], 800.0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn transaction_update_rejects_blank_category(pool: PgPool) {
    let admin = common::admin_token(&pool).await;
    let id = create_transaction(&pool, &admin, transaction("expense", "materials", 50.0, "completed")).await;

    for category in ["", "   "] {
        let response = put_json_auth(
            common::build_test_app(pool.clone()),
            &format!("/api/v1/admin/finances/transactions/{id}"),
            serde_json::json!({ "category": category }),
            &admin,
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    let response = get_auth(
        common::build_test_app(pool),
        &format!("/api/v1/admin/finances/transactions/{id}"),
        &admin,
    )
    .await;
    assert_eq!(body_json(response).await["data"]["category"], "materials");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn reports_reject_out_of_range_years(pool: PgPool) {
    let admin = common::admin_token(&pool).await;

    for uri in [
        "/api/v1/admin/finances/summary?year=-2147483648&month=12",
        "/api/v1/admin/finances/summary?year=2147483647&month=12",
        "/api/v1/admin/finances/summary?year=2025&month=13",
        "/api/v1/admin/finances/category-breakdown?year=0",
        "/api/v1/admin/finances/yearly-comparison?year=2147483647",
    ] {
        let response = get_auth(common::build_test_app(pool.clone()), uri, &admin).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
    }

    let response = get_auth(
        common::build_test_app(pool),
        "/api/v1/admin/finances/summary?year=2025&month=12",
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// CRM contacts
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn client_history_accumulates_purchases(pool: PgPool) {
    let admin = common::admin_token(&pool).await;

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/admin/contacts",
        serde_json::json!({ "type": "client", "name": "Coleccionista", "email": "col@example.com" }),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let id = body_json(response).await["data"]["id"].as_i64().unwrap();

    for amount in [1000.0, 2500.0] {
        let response = post_json_auth(
            common::build_test_app(pool.clone()),
            &format!("/api/v1/admin/contacts/{id}/history"),
            serde_json::json!({ "amount": amount, "description": "Compra" }),
            &admin,
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/admin/contacts/{id}/history"),
        serde_json::json!({ "amount": -1.0 }),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = get_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/admin/contacts/{id}"),
        &admin,
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["total_purchases"], 3500.0);
    assert_eq!(json["data"]["history"].as_array().unwrap().len(), 2);

    let response = patch_json_auth(
        common::build_test_app(pool),
        &format!("/api/v1/admin/contacts/{id}/favorite"),
        serde_json::json!({}),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["is_favorite"], true);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn contact_type_is_validated(pool: PgPool) {
    let admin = common::admin_token(&pool).await;

    let response = post_json_auth(
        common::build_test_app(pool),
        "/api/v1/admin/contacts",
        serde_json::json!({ "type": "friend", "name": "Nadie" }),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Agenda
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn event_validation(pool: PgPool) {
    let admin = common::admin_token(&pool).await;

    let mut bodies = vec![
        event("Al revés", "2025-05-10T18:00:00Z", "2025-05-10T17:00:00Z"),
        serde_json::json!({
            "title": "Sin tipo",
            "type": "party",
            "start_date": "2025-05-10T17:00:00Z",
            "end_date": "2025-05-10T18:00:00Z",
        }),
    ];
    let mut with_participants = event("Reunión", "2025-05-10T17:00:00Z", "2025-05-10T18:00:00Z");
    with_participants["participants"] =
        serde_json::json!([{ "name": "Ana", "status": "maybe" }]);
    bodies.push(with_participants);

    for body in bodies {
        let response = post_json_auth(
            common::build_test_app(pool.clone()),
            "/api/v1/admin/agenda/events",
            body,
            &admin,
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    // Same instant for both ends is allowed.
    let instant = create_event(
        &pool,
        &admin,
        event("Entrega", "2025-05-10T17:00:00Z", "2025-05-10T17:00:00Z"),
    )
    .await;
    assert_eq!(instant["color"].as_str().map(str::is_empty), Some(false));

    // Moving only the end before the stored start is rejected.
    let id = instant["id"].as_i64().unwrap();
    let response = put_json_auth(
        common::build_test_app(pool),
        &format!("/api/v1/admin/agenda/events/{id}"),
        serde_json::json!({ "end_date": "2025-05-09T17:00:00Z" }),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn calendar_lists_events_overlapping_the_month(pool: PgPool) {
    let admin = common::admin_token(&pool).await;

    let spanning = create_event(
        &pool,
        &admin,
        event("Muestra colectiva", "2025-04-25T10:00:00Z", "2025-05-03T20:00:00Z"),
    )
    .await["id"]
        .as_i64()
        .unwrap();
    let inside = create_event(
        &pool,
        &admin,
        event("Taller", "2025-05-15T15:00:00Z", "2025-05-15T18:00:00Z"),
    )
    .await["id"]
        .as_i64()
        .unwrap();
    let cancelled = create_event(
        &pool,
        &admin,
        event("Feria", "2025-05-20T10:00:00Z", "2025-05-20T19:00:00Z"),
    )
    .await["id"]
        .as_i64()
        .unwrap();
    let outside = create_event(
        &pool,
        &admin,
        event("Inauguración", "2025-06-02T19:00:00Z", "2025-06-02T22:00:00Z"),
    )
    .await["id"]
        .as_i64()
        .unwrap();

    let response = patch_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/admin/agenda/events/{cancelled}/status"),
        serde_json::json!({ "status": "cancelled" }),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/admin/agenda/calendar/2025/5",
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(ids(&json["data"]), vec![spanning, inside]);
    assert_eq!(json["data"][0]["type"], "exhibition");

    // The list filter selects by overlap too, cancelled events included.
    let response = get_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/admin/agenda/events?start_date=2025-05-01&end_date=2025-05-31",
        &admin,
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(ids(&json["data"]), vec![spanning, inside, cancelled]);
    assert!(!ids(&json["data"]).contains(&outside));

    let response = get_auth(
        common::build_test_app(pool),
        "/api/v1/admin/agenda/calendar/2025/13",
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Tasks and notes
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn task_checklist_and_completion(pool: PgPool) {
    let admin = common::admin_token(&pool).await;

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/admin/agenda/tasks",
        serde_json::json!({
            "title": "Preparar muestra",
            "priority": "high",
            "checklist": [{ "text": "Enmarcar" }, { "text": "Catálogo" }],
        }),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    let id = json["data"]["id"].as_i64().unwrap();
    assert_eq!(json["data"]["checklist_progress"]["percentage"], 0);

    let response = patch_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/admin/agenda/tasks/{id}/checklist/0"),
        serde_json::json!({}),
        &admin,
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["checklist"][0]["is_completed"], true);
    assert_eq!(json["data"]["checklist_progress"]["percentage"], 50);

    let response = patch_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/admin/agenda/tasks/{id}/checklist/7"),
        serde_json::json!({}),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = patch_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/admin/agenda/tasks/{id}/status"),
        serde_json::json!({ "status": "completed" }),
        &admin,
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "completed");
    assert!(json["data"]["completed_at"].is_string());

    let response = patch_json_auth(
        common::build_test_app(pool),
        &format!("/api/v1/admin/agenda/tasks/{id}/status"),
        serde_json::json!({ "status": "pending" }),
        &admin,
    )
    .await;
    assert!(body_json(response).await["data"]["completed_at"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn notes_pin_and_archive(pool: PgPool) {
    let admin = common::admin_token(&pool).await;

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/admin/notes",
        serde_json::json!({ "title": "Llamar al enmarcador", "content": "Antes del viernes" }),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let response = patch_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/admin/notes/{id}/pin"),
        serde_json::json!({}),
        &admin,
    )
    .await;
    assert_eq!(body_json(response).await["data"]["is_pinned"], true);

    let response = patch_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/admin/notes/{id}/archive"),
        serde_json::json!({}),
        &admin,
    )
    .await;
    assert_eq!(body_json(response).await["data"]["is_archived"], true);

    let response = delete_auth(
        common::build_test_app(pool),
        &format!("/api/v1/admin/notes/{id}"),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn note_attachments_upload_and_remove(pool: PgPool) {
    let admin = common::admin_token(&pool).await;
    let media = Arc::new(FakeMedia::default());
    let providers = TestProviders {
        media: Some(media.clone()),
        ..TestProviders::default()
    };

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/admin/notes",
        serde_json::json!({ "title": "Contrato de consignación", "content": "Firmado" }),
        &admin,
    )
    .await;
    let id = body_json(response).await["data"]["id"].as_i64().unwrap();
    let uri = format!("/api/v1/admin/notes/{id}/attachments");

    let response = post_file_auth(
        common::build_test_app_with(pool.clone(), providers.clone()),
        &uri,
        "file",
        "contrato.pdf",
        "application/pdf",
        b"%PDF-1.4 contrato",
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    let attachment = json["data"]["attachments"][0].clone();
    assert_eq!(attachment["filename"], "contrato.pdf");
    assert_eq!(attachment["mime_type"], "application/pdf");
    assert_eq!(attachment["public_id"], "notes/contrato.pdf");
    assert_eq!(attachment["size"], 17);

    let response = post_file_auth(
        common::build_test_app_with(pool.clone(), providers.clone()),
        &uri,
        "file",
        "script.sh",
        "application/x-sh",
        b"echo hola",
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_file_auth(
        common::build_test_app_with(pool.clone(), providers.clone()),
        &uri,
        "document",
        "contrato.pdf",
        "application/pdf",
        b"%PDF-1.4",
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = delete_auth(
        common::build_test_app_with(pool.clone(), providers.clone()),
        &format!("{uri}/desconocido"),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let attachment_id = attachment["id"].as_str().unwrap();
    let response = delete_auth(
        common::build_test_app_with(pool, providers),
        &format!("{uri}/{attachment_id}"),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_json(response).await["data"]["attachments"]
        .as_array()
        .unwrap()
        .is_empty());
    assert_eq!(media.destroyed(), vec!["notes/contrato.pdf".to_string()]);
}

// ---------------------------------------------------------------------------
// Dashboards
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn dashboard_and_activity_feed(pool: PgPool) {
    let admin = common::admin_token(&pool).await;

    let response = get_auth(common::build_test_app(pool.clone()), "/api/v1/stats/dashboard", &admin).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["artworks"]["total"], 0);
    assert_eq!(json["data"]["revenue"], 0.0);

    let response = get_auth(common::build_test_app(pool), "/api/v1/admin/activity", &admin).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_json(response).await["data"].is_array());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn sales_stats_echo_the_period(pool: PgPool) {
    let admin = common::admin_token(&pool).await;

    let response = get_auth(common::build_test_app(pool.clone()), "/api/v1/stats/sales?period=year", &admin).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["period"], "year");

    let response = get_auth(common::build_test_app(pool.clone()), "/api/v1/stats/sales", &admin).await;
    assert_eq!(body_json(response).await["data"]["period"], "30days");

    let response = get_auth(common::build_test_app(pool), "/api/v1/stats/sales?period=decade", &admin).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
