//! End-to-end billing flow tests
//!
//! Seed a catalog, price a cart, freeze bill items at checkout, decode
//! breakdowns from the frozen rows, pay, void, and recompute member
//! spend — against a real (temporary) SQLite store.

use shared::BillingError;
use shared::billing::VariantSelection;
use shared::models::{MemberCreate, PaymentCreate, ServiceCreate, ServiceVariantCreate, VariantType};
use studio_billing::billing::checkout::{CheckoutLine, checkout_bill_items, price_cart_item};
use studio_billing::billing::breakdown::decode_bill_item;
use studio_billing::db::DbService;
use studio_billing::db::repository::{bill, cart, member, payment, service};
use studio_billing::{aggregator, pricing};
use tempfile::TempDir;

const COLOR_META: &str = r#"{"colorPriceDiff":1000,"excludeSizes":["Z"],"zColorPrice":1000}"#;

struct TestDb {
    _dir: TempDir,
    db: DbService,
}

async fn test_db() -> TestDb {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("studio.db");
    let db = DbService::new(path.to_str().unwrap()).await.unwrap();
    TestDb { _dir: dir, db }
}

/// Seed the catalog used across tests: base 1000, sizes T-1/Z, a
/// size-relative color, a position, and a catalog design fee. Size is
/// required.
async fn seed_service(db: &DbService) -> i64 {
    let svc = service::create(
        &db.pool,
        ServiceCreate {
            name: "圖騰小圖案".to_string(),
            base_price: 1000,
            branch_id: Some("branch-a".to_string()),
            required_types: Some(vec![VariantType::Size]),
            sort_order: None,
        },
    )
    .await
    .unwrap();

    let variants = [
        (VariantType::Size, "T-1", 2000, None),
        (VariantType::Size, "Z", 5000, None),
        (VariantType::Color, "彩色", 800, Some(COLOR_META)),
        (VariantType::Position, "手臂", 500, None),
        (VariantType::DesignFee, "客製設計", 1500, None),
    ];
    for (variant_type, name, price_modifier, metadata) in variants {
        service::create_variant(
            &db.pool,
            ServiceVariantCreate {
                service_id: svc.id,
                variant_type,
                name: name.to_string(),
                code: name.to_string(),
                price_modifier,
                sort_order: None,
                metadata: metadata.map(|s: &str| s.to_string()),
            },
        )
        .await
        .unwrap();
    }

    svc.id
}

async fn seed_member(db: &DbService, name: &str) -> i64 {
    member::create(
        &db.pool,
        MemberCreate {
            name: name.to_string(),
            phone: None,
        },
    )
    .await
    .unwrap()
    .id
}

async fn pay(db: &DbService, bill_id: i64, amount: i64) -> i64 {
    payment::record(
        &db.pool,
        PaymentCreate {
            bill_id,
            amount,
            method: "cash".to_string(),
            note: None,
        },
    )
    .await
    .unwrap()
    .id
}

#[tokio::test]
async fn cart_pricing_matches_checkout_snapshot() {
    let t = test_db().await;
    let service_id = seed_service(&t.db).await;
    let customer_id = seed_member(&t.db, "Mei").await;

    let selection = VariantSelection::new()
        .choose(VariantType::Size, "T-1")
        .choose(VariantType::Color, "彩色")
        .with_custom_addon(200);

    // shopping: 1000 base + 2000 size + (2000+1000) color + 200 addon
    let cart_item = price_cart_item(&t.db.pool, customer_id, service_id, &selection)
        .await
        .unwrap();
    assert_eq!(cart_item.base_price, 1000);
    assert_eq!(cart_item.final_price, 6200);
    assert_eq!(cart::find_for_customer(&t.db.pool, customer_id).await.unwrap().len(), 1);

    // checkout freezes the same numbers
    let bill_row = bill::create(&t.db.pool, customer_id, Some("branch-a".to_string()))
        .await
        .unwrap();
    let items = checkout_bill_items(
        &t.db.pool,
        bill_row.id,
        &[CheckoutLine {
            service_id,
            selection: selection.clone(),
        }],
    )
    .await
    .unwrap();

    assert_eq!(items.len(), 1);
    let item = &items[0];
    assert_eq!(item.name_snapshot, "圖騰小圖案-彩色");
    assert_eq!(item.final_price_snapshot, 6200);
    let variants = item.variants();
    assert_eq!(variants["size"], "T-1");
    assert_eq!(variants["color"], "彩色");
    assert_eq!(variants["custom_addon"], 200);

    // the cart was superseded in the same transaction
    assert!(cart::find_for_customer(&t.db.pool, customer_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn snapshots_survive_catalog_edits_and_deletions() {
    let t = test_db().await;
    let service_id = seed_service(&t.db).await;
    let customer_id = seed_member(&t.db, "Mei").await;

    let selection = VariantSelection::new()
        .choose(VariantType::Size, "T-1")
        .choose(VariantType::Color, "彩色")
        .with_design_fee(500);

    let bill_row = bill::create(&t.db.pool, customer_id, None).await.unwrap();
    let items = checkout_bill_items(
        &t.db.pool,
        bill_row.id,
        &[CheckoutLine {
            service_id,
            selection: selection.clone(),
        }],
    )
    .await
    .unwrap();
    let before = decode_bill_item(&items[0]);

    // reprice the size and retire the color entirely
    let fetched = service::fetch_with_variants(&t.db.pool, service_id)
        .await
        .unwrap()
        .unwrap();
    for v in &fetched.variants {
        match v.variant_type {
            VariantType::Size => {
                service::update_variant_price(&t.db.pool, v.id, 9900).await.unwrap();
            }
            VariantType::Color => {
                service::deactivate_variant(&t.db.pool, v.id).await.unwrap();
            }
            _ => {}
        }
    }

    // new price computations see the new catalog...
    let refetched = service::fetch_with_variants(&t.db.pool, service_id)
        .await
        .unwrap()
        .unwrap();
    let catalog = pricing::VariantCatalog::new(refetched.service, refetched.variants);
    let new_quote = pricing::resolve_price(
        &catalog,
        &VariantSelection::new().choose(VariantType::Size, "T-1"),
    )
    .unwrap();
    assert_eq!(new_quote.final_price, 1000 + 9900);

    // ...but the frozen row decodes exactly as before
    let stored = bill::list_items(&t.db.pool, bill_row.id).await.unwrap();
    let after = decode_bill_item(&stored[0]);
    assert_eq!(after, before);
    assert_eq!(after.service_name, "圖騰小圖案");
    assert_eq!(after.color.as_deref(), Some("彩色"));
    assert_eq!(after.final_price, 1000 + 2000 + 3000 + 500);
    assert_eq!(after.addons_total, 500);
    assert_eq!(after.service_price + after.addons_total, after.final_price);
}

#[tokio::test]
async fn failed_checkout_rolls_back_and_keeps_cart() {
    let t = test_db().await;
    let service_id = seed_service(&t.db).await;
    let customer_id = seed_member(&t.db, "Mei").await;

    let good = VariantSelection::new().choose(VariantType::Size, "T-1");
    price_cart_item(&t.db.pool, customer_id, service_id, &good)
        .await
        .unwrap();

    let bill_row = bill::create(&t.db.pool, customer_id, None).await.unwrap();
    let err = checkout_bill_items(
        &t.db.pool,
        bill_row.id,
        &[
            CheckoutLine {
                service_id,
                selection: good.clone(),
            },
            CheckoutLine {
                service_id,
                selection: VariantSelection::new().choose(VariantType::Size, "T-9"),
            },
        ],
    )
    .await
    .unwrap_err();
    assert!(matches!(err, BillingError::Validation(_)));

    // nothing was billed, the cart is untouched
    assert!(bill::list_items(&t.db.pool, bill_row.id).await.unwrap().is_empty());
    assert_eq!(cart::find_for_customer(&t.db.pool, customer_id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn missing_required_variant_blocks_checkout() {
    let t = test_db().await;
    let service_id = seed_service(&t.db).await;
    let customer_id = seed_member(&t.db, "Mei").await;
    let bill_row = bill::create(&t.db.pool, customer_id, None).await.unwrap();

    // size is required for this service
    let err = checkout_bill_items(
        &t.db.pool,
        bill_row.id,
        &[CheckoutLine {
            service_id,
            selection: VariantSelection::new().choose(VariantType::Position, "手臂"),
        }],
    )
    .await
    .unwrap_err();
    assert!(matches!(err, BillingError::Validation(_)));
}

#[tokio::test]
async fn allocations_link_payments_to_items_idempotently() {
    let t = test_db().await;
    let service_id = seed_service(&t.db).await;
    let customer_id = seed_member(&t.db, "Mei").await;

    let bill_row = bill::create(&t.db.pool, customer_id, None).await.unwrap();
    let items = checkout_bill_items(
        &t.db.pool,
        bill_row.id,
        &[CheckoutLine {
            service_id,
            selection: VariantSelection::new().choose(VariantType::Size, "T-1"),
        }],
    )
    .await
    .unwrap();

    let payment_id = pay(&t.db, bill_row.id, 3000).await;
    let first = payment::allocate(&t.db.pool, payment_id, items[0].id).await.unwrap();
    let second = payment::allocate(&t.db.pool, payment_id, items[0].id).await.unwrap();
    assert_eq!(first.id, second.id);
    assert_eq!(payment::list_allocations(&t.db.pool, payment_id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn spend_recompute_excludes_void_bills_and_converges() {
    let t = test_db().await;
    let mei = seed_member(&t.db, "Mei").await;
    let lin = seed_member(&t.db, "Lin").await;

    let active_bill = bill::create(&t.db.pool, mei, None).await.unwrap();
    pay(&t.db, active_bill.id, 3000).await;
    pay(&t.db, active_bill.id, 1200).await;

    let voided_bill = bill::create(&t.db.pool, mei, None).await.unwrap();
    pay(&t.db, voided_bill.id, 500).await;
    bill::void(&t.db.pool, voided_bill.id).await.unwrap();

    let lin_bill = bill::create(&t.db.pool, lin, None).await.unwrap();
    pay(&t.db, lin_bill.id, 800).await;

    // the raw ledger fetch keeps voided bills' payments visible
    assert_eq!(payment::find_for_customer(&t.db.pool, mei).await.unwrap().len(), 3);

    let report = aggregator::recompute_total_spent(&t.db.pool).await.unwrap();
    assert_eq!(report.processed, 2);
    assert_eq!(report.updated, 2);
    assert_eq!(report.failed, 0);

    let mei_row = member::find_by_id(&t.db.pool, mei).await.unwrap().unwrap();
    let lin_row = member::find_by_id(&t.db.pool, lin).await.unwrap().unwrap();
    assert_eq!(mei_row.total_spent, 4200); // 500 on the voided bill excluded
    assert_eq!(lin_row.total_spent, 800);

    // second pass with no new payments: converged, zero writes
    let report = aggregator::recompute_total_spent(&t.db.pool).await.unwrap();
    assert_eq!(report.processed, 2);
    assert_eq!(report.updated, 0);
    assert_eq!(report.failed, 0);

    // voiding later moves the total on the next run
    bill::void(&t.db.pool, lin_bill.id).await.unwrap();
    let report = aggregator::recompute_total_spent(&t.db.pool).await.unwrap();
    assert_eq!(report.updated, 1);
    let lin_row = member::find_by_id(&t.db.pool, lin).await.unwrap().unwrap();
    assert_eq!(lin_row.total_spent, 0);
}
