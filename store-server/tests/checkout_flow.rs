//! End-to-end checkout flow against a real embedded database.
//! Run: cargo test -p store-server --test checkout_flow

use store_server::db::DbService;
use store_server::db::models::{CakeCreate, CakeLayer, CakeSize, PromoCodeCreate, PromoType};
use store_server::db::repository::{CakeRepository, OrderRepository, PromoCodeRepository};
use store_server::services::{CheckoutItem, CheckoutRequest, CheckoutService};

const TZ: chrono_tz::Tz = chrono_tz::Africa::Nairobi;

async fn test_db() -> (tempfile::TempDir, DbService) {
    let tmp = tempfile::tempdir().unwrap();
    let db_path = tmp.path().join("store.db");
    let service = DbService::new(&db_path.to_string_lossy()).await.unwrap();
    (tmp, service)
}

fn cake_create(name: &str, base_price: f64, stock: Option<i64>) -> CakeCreate {
    CakeCreate {
        name: name.to_string(),
        description: None,
        image: None,
        category: Some("Birthday".to_string()),
        base_price,
        sizes: Some(vec![
            CakeSize {
                name: "Small".to_string(),
                price: 0.0,
                serves: "4-6".to_string(),
            },
            CakeSize {
                name: "Medium".to_string(),
                price: 800.0,
                serves: "8-10".to_string(),
            },
        ]),
        flavors: Some(vec!["Vanilla".to_string(), "Chocolate".to_string()]),
        layers: Some(vec![
            CakeLayer {
                name: "Single Layer".to_string(),
                price: 0.0,
            },
            CakeLayer {
                name: "Double Layer".to_string(),
                price: 500.0,
            },
        ]),
        stock,
        sort_order: None,
    }
}

fn checkout_request(cake_id: &str, quantity: i64, client_price: f64) -> CheckoutRequest {
    CheckoutRequest {
        items: vec![CheckoutItem {
            cake_id: cake_id.to_string(),
            quantity,
            selected_size: "Medium".to_string(),
            selected_flavor: "Vanilla".to_string(),
            selected_layer: "Double Layer".to_string(),
            price: client_price,
        }],
        subtotal: client_price * quantity as f64,
        promo_code: None,
        customer_name: "Amina Otieno".to_string(),
        phone: "+254700000001".to_string(),
        email: "amina@example.com".to_string(),
        address_line: "Riverside Drive 12".to_string(),
        city: "Nairobi".to_string(),
        notes: String::new(),
        delivery_date: "2030-01-15".to_string(),
        delivery_time: "10:00 - 12:00".to_string(),
    }
}

#[tokio::test]
async fn checkout_recomputes_prices_and_decrements_stock() {
    let (_tmp, db) = test_db().await;
    let cakes = CakeRepository::new(db.db.clone());
    let orders = OrderRepository::new(db.db.clone());
    let checkout = CheckoutService::new(db.db.clone(), TZ);

    // base 2000 + Medium 800 + Double Layer 500 = 3300, qty 5 → rate 0.10
    let cake = cakes.create(cake_create("Chocolate Fudge", 2000.0, Some(10))).await.unwrap();
    let cake_id = cake.id.as_ref().unwrap().to_string();

    // Client submits a deliberately wrong price; server figures must win
    let response = checkout.checkout(checkout_request(&cake_id, 5, 1.0)).await.unwrap();

    let order = &response.order;
    assert_eq!(order.items.len(), 1);
    assert_eq!(order.items[0].unit_price, 3300.0);
    assert_eq!(order.items[0].discounted_unit_price, 2970.0);
    assert_eq!(order.items[0].line_total, 14850.0);
    assert_eq!(order.subtotal, 14850.0);
    assert_eq!(order.delivery_fee, 500.0); // seeded default
    assert_eq!(order.discount, 0.0);
    assert_eq!(order.total, 15350.0);
    assert!(order.order_number.starts_with("CK-"));

    // Payment instructions reference the order number
    assert_eq!(response.payment_instructions.account_reference, order.order_number);
    assert_eq!(response.payment_instructions.amount, order.total);

    // Stock decremented 10 → 5
    let after = cakes.find_by_id(&cake_id).await.unwrap().unwrap();
    assert_eq!(after.stock, Some(5));
    assert!(after.in_stock);

    // Order retrievable by its number (customer tracking path)
    let tracked = orders.find_by_order_number(&order.order_number).await.unwrap().unwrap();
    assert_eq!(tracked.total, 15350.0);
}

#[tokio::test]
async fn checkout_applies_fixed_promo() {
    let (_tmp, db) = test_db().await;
    let cakes = CakeRepository::new(db.db.clone());
    let promos = PromoCodeRepository::new(db.db.clone());
    let checkout = CheckoutService::new(db.db.clone(), TZ);

    // unit = 4200 + 800 + 0 = 5000, qty 2 → no volume discount, subtotal 10000
    let cake = cakes.create(cake_create("Red Velvet", 4200.0, None)).await.unwrap();
    let cake_id = cake.id.as_ref().unwrap().to_string();

    promos
        .create(PromoCodeCreate {
            code: "KARIBU1000".to_string(),
            description: None,
            promo_type: PromoType::Fixed,
            discount: 1000.0,
            min_order: None,
            max_discount: None,
            valid_from: None,
            valid_until: None,
            usage_limit: None,
        })
        .await
        .unwrap();

    let mut request = checkout_request(&cake_id, 2, 5000.0);
    request.items[0].selected_layer = "Single Layer".to_string();
    // case-insensitive lookup
    request.promo_code = Some("karibu1000".to_string());

    let response = checkout.checkout(request).await.unwrap();

    // subtotal 10000, delivery 500, FIXED 1000 → total 9500
    assert_eq!(response.order.subtotal, 10000.0);
    assert_eq!(response.order.discount, 1000.0);
    assert_eq!(response.order.total, 9500.0);
    assert_eq!(response.order.promo_code.as_deref(), Some("KARIBU1000"));

    // usage claimed exactly once
    let promo = promos.find_by_code("KARIBU1000").await.unwrap().unwrap();
    assert_eq!(promo.usage_count, 1);
}

#[tokio::test]
async fn checkout_rejects_unknown_size() {
    let (_tmp, db) = test_db().await;
    let cakes = CakeRepository::new(db.db.clone());
    let checkout = CheckoutService::new(db.db.clone(), TZ);

    let cake = cakes.create(cake_create("Lemon Drizzle", 2000.0, None)).await.unwrap();
    let cake_id = cake.id.as_ref().unwrap().to_string();

    let mut request = checkout_request(&cake_id, 1, 2000.0);
    request.items[0].selected_size = "Mega".to_string();

    let err = checkout.checkout(request).await.unwrap_err();
    assert_eq!(err.code(), shared::error::ErrorCode::InvalidSelection);
}

#[tokio::test]
async fn checkout_rejects_insufficient_stock() {
    let (_tmp, db) = test_db().await;
    let cakes = CakeRepository::new(db.db.clone());
    let checkout = CheckoutService::new(db.db.clone(), TZ);

    let cake = cakes.create(cake_create("Marble Cake", 2000.0, Some(1))).await.unwrap();
    let cake_id = cake.id.as_ref().unwrap().to_string();

    let err = checkout.checkout(checkout_request(&cake_id, 2, 3300.0)).await.unwrap_err();
    assert_eq!(err.code(), shared::error::ErrorCode::InsufficientStock);

    // stock untouched after the failed checkout
    let after = cakes.find_by_id(&cake_id).await.unwrap().unwrap();
    assert_eq!(after.stock, Some(1));
}

#[tokio::test]
async fn checkout_rejects_past_delivery_date() {
    let (_tmp, db) = test_db().await;
    let cakes = CakeRepository::new(db.db.clone());
    let checkout = CheckoutService::new(db.db.clone(), TZ);

    let cake = cakes.create(cake_create("Fruit Cake", 2000.0, None)).await.unwrap();
    let cake_id = cake.id.as_ref().unwrap().to_string();

    let mut request = checkout_request(&cake_id, 1, 3300.0);
    request.delivery_date = "2020-01-01".to_string();

    let err = checkout.checkout(request).await.unwrap_err();
    assert_eq!(err.code(), shared::error::ErrorCode::InvalidDeliveryDate);
}

#[tokio::test]
async fn quote_reports_soft_promo_rejection() {
    let (_tmp, db) = test_db().await;
    let cakes = CakeRepository::new(db.db.clone());
    let checkout = CheckoutService::new(db.db.clone(), TZ);

    let cake = cakes.create(cake_create("Carrot Cake", 2000.0, None)).await.unwrap();
    let cake_id = cake.id.as_ref().unwrap().to_string();

    let quote = checkout
        .quote(store_server::services::QuoteRequest {
            items: vec![CheckoutItem {
                cake_id,
                quantity: 1,
                selected_size: "Small".to_string(),
                selected_flavor: "Vanilla".to_string(),
                selected_layer: "Single Layer".to_string(),
                price: 2000.0,
            }],
            promo_code: Some("NOSUCHCODE".to_string()),
        })
        .await
        .unwrap();

    // quote succeeds, promo soft-fails with the storefront error string
    assert_eq!(quote.subtotal, 2000.0);
    assert_eq!(quote.discount, 0.0);
    assert_eq!(quote.promo_valid, Some(false));
    assert_eq!(quote.promo_error.as_deref(), Some("INVALID_CODE"));
}
