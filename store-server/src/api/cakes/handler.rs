//! Cake Catalog API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::models::{Cake, CakeCreate, CakeUpdate};
use crate::db::repository::CakeRepository;
use crate::utils::validation::{MAX_NAME_LEN, MAX_NOTE_LEN, MAX_URL_LEN, validate_amount, validate_optional_text, validate_required_text};
use crate::utils::{AppError, AppResult};

/// Query params for the storefront catalog
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub category: Option<String>,
}

/// GET /api/cakes - 商店前台目录 (仅可见蛋糕，可按分类过滤)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Cake>>> {
    let repo = CakeRepository::new(state.db.clone());
    let cakes = match query.category {
        Some(category) => repo.find_by_category(&category).await?,
        None => repo.find_visible().await?,
    };
    Ok(Json(cakes))
}

/// GET /api/cakes/all - 后台目录 (含隐藏蛋糕)
pub async fn list_all(State(state): State<ServerState>) -> AppResult<Json<Vec<Cake>>> {
    let repo = CakeRepository::new(state.db.clone());
    Ok(Json(repo.find_all().await?))
}

/// GET /api/cakes/categories - 分类名列表
pub async fn list_categories(State(state): State<ServerState>) -> AppResult<Json<Vec<String>>> {
    let repo = CakeRepository::new(state.db.clone());
    Ok(Json(repo.list_categories().await?))
}

/// GET /api/cakes/:id - 单个蛋糕
///
/// 前台只展示可见蛋糕；隐藏蛋糕对未登录请求一律 404。
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Cake>> {
    let repo = CakeRepository::new(state.db.clone());
    let cake = repo
        .find_by_id(&id)
        .await?
        .filter(|c| c.is_visible)
        .ok_or_else(|| AppError::not_found(format!("Cake {}", id)))?;
    Ok(Json(cake))
}

/// 校验蛋糕 payload 的公共部分
fn validate_cake_payload(
    name: Option<&str>,
    description: &Option<String>,
    image: &Option<String>,
    base_price: Option<f64>,
    sizes_prices: &[f64],
    layers_prices: &[f64],
) -> AppResult<()> {
    if let Some(name) = name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_optional_text(description, "description", MAX_NOTE_LEN)?;
    validate_optional_text(image, "image", MAX_URL_LEN)?;
    if let Some(price) = base_price {
        validate_amount(price, "base_price")?;
    }
    for price in sizes_prices {
        validate_amount(*price, "size price")?;
    }
    for price in layers_prices {
        validate_amount(*price, "layer price")?;
    }
    Ok(())
}

/// POST /api/cakes - 创建蛋糕 (后台)
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CakeCreate>,
) -> AppResult<Json<Cake>> {
    validate_cake_payload(
        Some(&payload.name),
        &payload.description,
        &payload.image,
        Some(payload.base_price),
        &payload
            .sizes
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|s| s.price)
            .collect::<Vec<_>>(),
        &payload
            .layers
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|l| l.price)
            .collect::<Vec<_>>(),
    )?;

    let repo = CakeRepository::new(state.db.clone());
    let cake = repo.create(payload).await?;
    tracing::info!(name = %cake.name, "Cake created");
    Ok(Json(cake))
}

/// PUT /api/cakes/:id - 更新蛋糕 (后台)
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<CakeUpdate>,
) -> AppResult<Json<Cake>> {
    validate_cake_payload(
        payload.name.as_deref(),
        &payload.description,
        &payload.image,
        payload.base_price,
        &payload
            .sizes
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|s| s.price)
            .collect::<Vec<_>>(),
        &payload
            .layers
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|l| l.price)
            .collect::<Vec<_>>(),
    )?;

    let repo = CakeRepository::new(state.db.clone());
    let cake = repo.update(&id, payload).await?;
    Ok(Json(cake))
}

/// DELETE /api/cakes/:id - 删除蛋糕 (后台)
///
/// 历史订单持有价格和名称快照，删除目录项不影响已有订单。
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = CakeRepository::new(state.db.clone());
    let deleted = repo.delete(&id).await?;
    if !deleted {
        return Err(AppError::not_found(format!("Cake {}", id)));
    }
    tracing::info!(cake_id = %id, "Cake deleted");
    Ok(Json(true))
}
