//! HTTP-level tests for order placement and status transitions.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, get_auth, patch_json_auth, post_json, post_json_auth};
use sqlx::PgPool;

async fn seed_artwork(pool: &PgPool, token: &str, title: &str, base_price: f64) -> i64 {
    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/artworks",
        serde_json::json!({
            "title": title,
            "category": "abstracto",
            "base_price": base_price,
        }),
        token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

fn order_body(artwork_ids: &[i64]) -> serde_json::Value {
    serde_json::json!({
        "customer": {
            "name": "Marta Gómez",
            "email": "Marta@Example.com",
            "phone": "+54 11 5555-0000",
        },
        "items": artwork_ids.iter().map(|id| serde_json::json!({ "artwork_id": id })).collect::<Vec<_>>(),
        "shipping": { "method": "delivery", "cost": 500.0, "address": "Calle 1", "city": "Rosario" },
        "payment_method": "transfer",
    })
}

async fn artwork_json(pool: &PgPool, id: i64) -> serde_json::Value {
    let response = get(common::build_test_app(pool.clone()), &format!("/api/v1/artworks/{id}")).await;
    body_json(response).await["data"].clone()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn anonymous_order_is_priced_from_the_catalog(pool: PgPool) {
    let admin = common::admin_token(&pool).await;
    let a = seed_artwork(&pool, &admin, "Rojo", 1000.0).await;
    let b = seed_artwork(&pool, &admin, "Azul", 2500.0).await;

    let response = post_json(common::build_test_app(pool.clone()), "/api/v1/orders", order_body(&[a, b])).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let order = body_json(response).await["data"].clone();
    assert!(order["order_number"].as_str().unwrap().starts_with("ORD-"));
    assert!(order["order_number"].as_str().unwrap().ends_with("-0001"));
    assert_eq!(order["subtotal"], 3500.0);
    assert_eq!(order["total"], 4000.0);
    assert_eq!(order["status"], "pending");
    assert_eq!(order["customer_email"], "marta@example.com");
    assert!(order["user_id"].is_null());
    assert_eq!(order["items"].as_array().unwrap().len(), 2);
    assert_eq!(order["status_history"].as_array().unwrap().len(), 1);

    let artwork = artwork_json(&pool, a).await;
    assert_eq!(artwork["is_reserved"], true);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn order_items_keep_the_catalog_discount(pool: PgPool) {
    let admin = common::admin_token(&pool).await;
    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/artworks",
        serde_json::json!({
            "title": "Verde",
            "category": "abstracto",
            "base_price": 2000.0,
            "has_discount": true,
            "discount": 10.0,
            "discount_type": "percentage",
        }),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let discounted = body_json(response).await["data"]["id"].as_i64().unwrap();
    let plain = seed_artwork(&pool, &admin, "Gris", 500.0).await;

    let response = post_json(
        common::build_test_app(pool),
        "/api/v1/orders",
        order_body(&[discounted, plain]),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let order = body_json(response).await["data"].clone();

    let item = |id: i64| {
        order["items"]
            .as_array()
            .unwrap()
            .iter()
            .find(|i| i["artwork_id"] == id)
            .cloned()
            .unwrap()
    };
    let first = item(discounted);
    assert_eq!(first["price"], 2000.0);
    assert_eq!(first["discount"], 10.0);
    assert_eq!(first["final_price"], 1800.0);
    assert_eq!(item(plain)["discount"], 0.0);
    assert_eq!(order["subtotal"], 2500.0);
    assert_eq!(order["total"], 2800.0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn order_numbers_increase_within_the_month(pool: PgPool) {
    let admin = common::admin_token(&pool).await;
    let a = seed_artwork(&pool, &admin, "Uno", 100.0).await;
    let b = seed_artwork(&pool, &admin, "Dos", 100.0).await;

    let first = body_json(post_json(common::build_test_app(pool.clone()), "/api/v1/orders", order_body(&[a])).await).await;
    let second = body_json(post_json(common::build_test_app(pool), "/api/v1/orders", order_body(&[b])).await).await;

    assert!(first["data"]["order_number"].as_str().unwrap().ends_with("-0001"));
    assert!(second["data"]["order_number"].as_str().unwrap().ends_with("-0002"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn order_validation_failures(pool: PgPool) {
    let admin = common::admin_token(&pool).await;
    let a = seed_artwork(&pool, &admin, "Verde", 100.0).await;

    let cases = [
        order_body(&[]),
        order_body(&[a, a]),
        order_body(&[424242]),
        {
            let mut body = order_body(&[a]);
            body["shipping"]["method"] = serde_json::json!("teleport");
            body
        },
        {
            let mut body = order_body(&[a]);
            body["customer"]["email"] = serde_json::json!("not-an-email");
            body
        },
    ];
    for body in cases {
        let response = post_json(common::build_test_app(pool.clone()), "/api/v1/orders", body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn paid_marks_sold_and_cancel_releases(pool: PgPool) {
    let admin = common::admin_token(&pool).await;
    let sold = seed_artwork(&pool, &admin, "Vendida", 100.0).await;
    let released = seed_artwork(&pool, &admin, "Liberada", 100.0).await;

    let paid_order = body_json(post_json(common::build_test_app(pool.clone()), "/api/v1/orders", order_body(&[sold])).await).await;
    let paid_id = paid_order["data"]["id"].as_i64().unwrap();
    let cancel_order = body_json(post_json(common::build_test_app(pool.clone()), "/api/v1/orders", order_body(&[released])).await).await;
    let cancel_id = cancel_order["data"]["id"].as_i64().unwrap();

    let response = patch_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/orders/{paid_id}/status"),
        serde_json::json!({ "status": "paid", "notes": "Transferencia recibida" }),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "paid");
    assert_eq!(json["data"]["status_history"].as_array().unwrap().len(), 2);

    let artwork = artwork_json(&pool, sold).await;
    assert_eq!(artwork["is_sold"], true);
    assert_eq!(artwork["is_available"], false);
    assert_eq!(artwork["is_reserved"], false);

    // A sold artwork can no longer be ordered.
    let response = post_json(common::build_test_app(pool.clone()), "/api/v1/orders", order_body(&[sold])).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = patch_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/orders/{cancel_id}/status"),
        serde_json::json!({ "status": "cancelled" }),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let artwork = artwork_json(&pool, released).await;
    assert_eq!(artwork["is_reserved"], false);
    assert_eq!(artwork["is_sold"], false);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_status_is_rejected(pool: PgPool) {
    let admin = common::admin_token(&pool).await;
    let a = seed_artwork(&pool, &admin, "Gris", 100.0).await;
    let order = body_json(post_json(common::build_test_app(pool.clone()), "/api/v1/orders", order_body(&[a])).await).await;
    let id = order["data"]["id"].as_i64().unwrap();

    let response = patch_json_auth(
        common::build_test_app(pool),
        &format!("/api/v1/orders/{id}/status"),
        serde_json::json!({ "status": "lost" }),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn customers_only_see_their_own_orders(pool: PgPool) {
    let admin = common::admin_token(&pool).await;
    let a = seed_artwork(&pool, &admin, "Propia", 100.0).await;
    let b = seed_artwork(&pool, &admin, "Ajena", 100.0).await;
    let (_owner, owner_token) = common::customer_token(&pool, "owner@example.com").await;
    let (_other, other_token) = common::customer_token(&pool, "other@example.com").await;

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/orders",
        order_body(&[a]),
        &owner_token,
    )
    .await;
    let own_id = body_json(response).await["data"]["id"].as_i64().unwrap();
    post_json(common::build_test_app(pool.clone()), "/api/v1/orders", order_body(&[b])).await;

    let response = get_auth(common::build_test_app(pool.clone()), "/api/v1/orders/my", &owner_token).await;
    let json = body_json(response).await;
    let mine = json["data"].as_array().unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0]["id"], own_id);

    let response = get_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/orders/{own_id}"),
        &other_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = get_auth(common::build_test_app(pool.clone()), "/api/v1/orders", &admin).await;
    assert_eq!(body_json(response).await["data"]["total"], 2);

    let response = get_auth(common::build_test_app(pool), "/api/v1/orders", &owner_token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn manual_payment_confirmation_marks_the_order_paid(pool: PgPool) {
    let admin = common::admin_token(&pool).await;
    let a = seed_artwork(&pool, &admin, "Confirmada", 100.0).await;
    let order = body_json(post_json(common::build_test_app(pool.clone()), "/api/v1/orders", order_body(&[a])).await).await;
    let id = order["data"]["id"].as_i64().unwrap();

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/payments/confirm",
        serde_json::json!({ "order_id": id, "transaction_id": "TRX-1" }),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "completed");
    assert_eq!(json["data"]["transaction_id"], "TRX-1");

    let response = get_auth(
        common::build_test_app(pool),
        &format!("/api/v1/orders/{id}"),
        &admin,
    )
    .await;
    assert_eq!(body_json(response).await["data"]["status"], "paid");
}
