//! Integration tests for the repository layer against a real database:
//! - Users: create, lookup, lockout bookkeeping
//! - Artworks: create, unique code, likes, reservations
//! - Orders: create with items and history, status changes

use chrono::{Duration, Utc};
use sqlx::PgPool;
use galeria_db::models::artwork::{ArtworkFilter, CreateArtwork};
use galeria_db::models::order::{BillingInfo, CreateOrder, CreateOrderItem, ShippingInfo};
use galeria_db::models::user::CreateUser;
use galeria_db::repositories::{ArtworkRepo, OrderRepo, UserRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_user(email: &str) -> CreateUser {
    CreateUser {
        email: email.to_string(),
        password_hash: "$argon2id$placeholder".to_string(),
        name: "Ana Cliente".to_string(),
        phone: None,
        role: "customer".to_string(),
    }
}

fn new_artwork(code: &str, price: f64) -> CreateArtwork {
    CreateArtwork {
        code: code.to_string(),
        title: format!("Obra {code}"),
        artist: "Mirta Susana Aguilar".to_string(),
        description: None,
        year: Some(2024),
        technique: Some("Óleo".to_string()),
        dimensions: None,
        category: "paisaje".to_string(),
        main_image_url: None,
        main_image_public_id: None,
        thumbnail_url: None,
        gallery: Vec::new(),
        base_price: price,
        currency: "ARS".to_string(),
        has_discount: false,
        discount: 0.0,
        discount_type: "percentage".to_string(),
        final_price: price,
        is_available: true,
        tags: vec!["paisaje".to_string()],
        featured: false,
        meta_title: None,
        meta_description: None,
        slug: format!("obra-{}", code.to_lowercase()),
    }
}

fn new_order(number: &str, user_id: Option<i64>, artwork_id: i64, price: f64) -> CreateOrder {
    CreateOrder {
        order_number: number.to_string(),
        user_id,
        customer_name: "Ana Cliente".to_string(),
        customer_email: "ana@example.com".to_string(),
        customer_phone: "1155550000".to_string(),
        customer_dni: None,
        subtotal: price,
        discount_total: 0.0,
        total: price,
        shipping: ShippingInfo {
            method: "pickup".to_string(),
            ..Default::default()
        },
        billing: BillingInfo::default(),
        payment_method: "mercadopago".to_string(),
        payment_preference_id: None,
        customer_notes: None,
        items: vec![CreateOrderItem {
            artwork_id,
            title: "Obra".to_string(),
            artist: None,
            price,
            discount: 0.0,
            final_price: price,
        }],
        initial_note: Some("Orden creada".to_string()),
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_user_lookup_is_case_insensitive(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("ana@example.com"))
        .await
        .unwrap();

    let found = UserRepo::find_by_email(&pool, "ANA@Example.com")
        .await
        .unwrap()
        .expect("user should be found");
    assert_eq!(found.id, user.id);
    assert!(found.is_active);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_email_rejected(pool: PgPool) {
    UserRepo::create(&pool, &new_user("dup@example.com"))
        .await
        .unwrap();
    let err = UserRepo::create(&pool, &new_user("dup@example.com"))
        .await
        .unwrap_err();

    match err {
        sqlx::Error::Database(db_err) => {
            assert_eq!(db_err.constraint(), Some("uq_users_email"));
        }
        other => panic!("Expected unique violation, got {other:?}"),
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_failed_logins_count_and_reset(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("lock@example.com"))
        .await
        .unwrap();

    assert_eq!(UserRepo::increment_failed_login(&pool, user.id).await.unwrap(), 1);
    assert_eq!(UserRepo::increment_failed_login(&pool, user.id).await.unwrap(), 2);

    UserRepo::record_successful_login(&pool, user.id).await.unwrap();
    let user = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert_eq!(user.failed_login_count, 0);
    assert!(user.last_login_at.is_some());
}

// ---------------------------------------------------------------------------
// Artworks
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_artwork_code_is_unique(pool: PgPool) {
    ArtworkRepo::create(&pool, &new_artwork("MSA-001", 1000.0))
        .await
        .unwrap();
    let mut dup = new_artwork("MSA-001", 2000.0);
    dup.slug = "otra".to_string();
    let err = ArtworkRepo::create(&pool, &dup).await.unwrap_err();

    match err {
        sqlx::Error::Database(db_err) => {
            assert_eq!(db_err.constraint(), Some("uq_artworks_code"));
        }
        other => panic!("Expected unique violation, got {other:?}"),
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_artwork_list_filters_availability(pool: PgPool) {
    let a = ArtworkRepo::create(&pool, &new_artwork("MSA-001", 1000.0))
        .await
        .unwrap();
    ArtworkRepo::create(&pool, &new_artwork("MSA-002", 500.0))
        .await
        .unwrap();
    ArtworkRepo::mark_sold(&pool, &[a.id], None).await.unwrap();

    let filter = ArtworkFilter {
        available: Some(true),
        ..Default::default()
    };
    let available = ArtworkRepo::list(&pool, &filter, 20, 0).await.unwrap();
    assert_eq!(available.len(), 1);
    assert_eq!(available[0].code, "MSA-002");
    assert_eq!(ArtworkRepo::count(&pool, &filter).await.unwrap(), 1);

    let codes = ArtworkRepo::all_codes(&pool).await.unwrap();
    assert_eq!(codes.len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_toggle_like_adds_then_removes(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("fan@example.com"))
        .await
        .unwrap();
    let art = ArtworkRepo::create(&pool, &new_artwork("MSA-010", 100.0))
        .await
        .unwrap();

    let liked = ArtworkRepo::toggle_like(&pool, art.id, user.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(liked.likes, vec![user.id]);

    let unliked = ArtworkRepo::toggle_like(&pool, art.id, user.id)
        .await
        .unwrap()
        .unwrap();
    assert!(unliked.likes.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_expired_reservations_are_released(pool: PgPool) {
    let art = ArtworkRepo::create(&pool, &new_artwork("MSA-020", 100.0))
        .await
        .unwrap();
    ArtworkRepo::reserve(&pool, &[art.id], None, Utc::now() - Duration::minutes(1))
        .await
        .unwrap();

    let released = ArtworkRepo::release_expired_reservations(&pool).await.unwrap();
    assert_eq!(released, 1);

    let art = ArtworkRepo::find_by_id(&pool, art.id).await.unwrap().unwrap();
    assert!(!art.is_reserved);
    assert!(art.reserved_until.is_none());
}

// ---------------------------------------------------------------------------
// Orders
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_order_create_writes_items_and_history(pool: PgPool) {
    let art = ArtworkRepo::create(&pool, &new_artwork("MSA-030", 1500.0))
        .await
        .unwrap();
    let order = OrderRepo::create(&pool, &new_order("ORD-202501-0001", None, art.id, 1500.0))
        .await
        .unwrap();
    assert_eq!(order.status, "pending");
    assert_eq!(order.total, 1500.0);

    let detail = OrderRepo::find_detail(&pool, order.id)
        .await
        .unwrap()
        .expect("order detail should exist");
    assert_eq!(detail.items.len(), 1);
    assert_eq!(detail.status_history.len(), 1);
    assert_eq!(detail.status_history[0].status, "pending");

    let ids = OrderRepo::artwork_ids(&pool, order.id).await.unwrap();
    assert_eq!(ids, vec![art.id]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_order_status_change_appends_history(pool: PgPool) {
    let art = ArtworkRepo::create(&pool, &new_artwork("MSA-031", 800.0))
        .await
        .unwrap();
    let order = OrderRepo::create(&pool, &new_order("ORD-202501-0002", None, art.id, 800.0))
        .await
        .unwrap();

    let updated = OrderRepo::change_status(&pool, order.id, "paid", Some("Pago aprobado"), None)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.status, "paid");

    let history = OrderRepo::history_for(&pool, order.id).await.unwrap();
    let statuses: Vec<&str> = history.iter().map(|h| h.status.as_str()).collect();
    assert_eq!(statuses, vec!["pending", "paid"]);

    let missing = OrderRepo::change_status(&pool, 999_999, "paid", None, None)
        .await
        .unwrap();
    assert!(missing.is_none());
}
