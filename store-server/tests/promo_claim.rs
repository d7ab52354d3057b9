//! Atomic promo usage claims: the limit check and the increment happen in
//! one conditional UPDATE, so the last slot can only be claimed once.
//! Run: cargo test -p store-server --test promo_claim

use store_server::db::DbService;
use store_server::db::models::{PromoCodeCreate, PromoType};
use store_server::db::repository::PromoCodeRepository;

async fn repo_with_promo(usage_limit: Option<i64>) -> (tempfile::TempDir, PromoCodeRepository) {
    let tmp = tempfile::tempdir().unwrap();
    let db_path = tmp.path().join("store.db");
    let service = DbService::new(&db_path.to_string_lossy()).await.unwrap();

    let repo = PromoCodeRepository::new(service.db.clone());
    repo.create(PromoCodeCreate {
        code: "SAVE10".to_string(),
        description: Some("10% off".to_string()),
        promo_type: PromoType::Percentage,
        discount: 10.0,
        min_order: None,
        max_discount: Some(500.0),
        valid_from: None,
        valid_until: None,
        usage_limit,
    })
    .await
    .unwrap();

    (tmp, repo)
}

#[tokio::test]
async fn claims_stop_exactly_at_the_limit() {
    let (_tmp, repo) = repo_with_promo(Some(2)).await;

    assert!(repo.try_claim_usage("SAVE10").await.unwrap());
    assert!(repo.try_claim_usage("SAVE10").await.unwrap());
    // third claim must fail: usage_count == usage_limit
    assert!(!repo.try_claim_usage("SAVE10").await.unwrap());

    let promo = repo.find_by_code("SAVE10").await.unwrap().unwrap();
    assert_eq!(promo.usage_count, 2);
}

#[tokio::test]
async fn claim_is_case_insensitive() {
    let (_tmp, repo) = repo_with_promo(Some(1)).await;

    assert!(repo.try_claim_usage("save10").await.unwrap());
    assert!(!repo.try_claim_usage("SAVE10").await.unwrap());
}

#[tokio::test]
async fn release_returns_the_slot() {
    let (_tmp, repo) = repo_with_promo(Some(1)).await;

    assert!(repo.try_claim_usage("SAVE10").await.unwrap());
    assert!(!repo.try_claim_usage("SAVE10").await.unwrap());

    // compensation path: a failed order write releases the claim
    repo.release_usage("SAVE10").await.unwrap();
    let promo = repo.find_by_code("SAVE10").await.unwrap().unwrap();
    assert_eq!(promo.usage_count, 0);

    assert!(repo.try_claim_usage("SAVE10").await.unwrap());
}

#[tokio::test]
async fn unlimited_promos_always_claim() {
    let (_tmp, repo) = repo_with_promo(None).await;

    for _ in 0..20 {
        assert!(repo.try_claim_usage("SAVE10").await.unwrap());
    }
    let promo = repo.find_by_code("SAVE10").await.unwrap().unwrap();
    assert_eq!(promo.usage_count, 20);
}

#[tokio::test]
async fn inactive_promo_cannot_be_claimed() {
    let (_tmp, repo) = repo_with_promo(None).await;

    let promo = repo.find_by_code("SAVE10").await.unwrap().unwrap();
    let id = promo.id.as_ref().unwrap().to_string();
    repo.update(
        &id,
        store_server::db::models::PromoCodeUpdate {
            description: None,
            promo_type: None,
            discount: None,
            min_order: None,
            max_discount: None,
            valid_from: None,
            valid_until: None,
            usage_limit: None,
            is_active: Some(false),
        },
    )
    .await
    .unwrap();

    assert!(!repo.try_claim_usage("SAVE10").await.unwrap());
}
