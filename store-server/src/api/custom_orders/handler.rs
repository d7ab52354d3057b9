//! Custom Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use validator::Validate;

use crate::core::ServerState;
use crate::db::models::{CustomOrderCreate, CustomOrderRequest, CustomOrderStatus, CustomOrderUpdate};
use crate::db::repository::CustomOrderRepository;
use crate::utils::validation::{MAX_NOTE_LEN, validate_amount, validate_optional_text};
use crate::utils::{AppError, AppResult, time};

/// 前台提交 payload
#[derive(Debug, Deserialize, Validate)]
pub struct CreateRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 7, max = 100))]
    pub phone: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(max = 100))]
    pub occasion: Option<String>,
    #[validate(range(min = 1, max = 5000))]
    pub serves: Option<i64>,
    #[validate(length(max = 500))]
    pub flavor_notes: Option<String>,
    #[validate(length(max = 500))]
    pub design_notes: Option<String>,
    pub budget: Option<f64>,
    /// YYYY-MM-DD
    pub event_date: String,
    #[validate(length(max = 2048))]
    pub reference_image: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<CustomOrderStatus>,
}

/// POST /api/custom-orders - 提交定制蛋糕请求 (商店前台)
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CreateRequest>,
) -> AppResult<Json<CustomOrderRequest>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    if let Some(budget) = payload.budget {
        validate_amount(budget, "budget")?;
    }
    let event_date = time::parse_date(&payload.event_date)?;
    time::validate_not_past(event_date, state.config.timezone)?;

    let repo = CustomOrderRepository::new(state.db.clone());
    let request = repo
        .create(CustomOrderCreate {
            name: payload.name,
            phone: payload.phone,
            email: payload.email,
            occasion: payload.occasion,
            serves: payload.serves,
            flavor_notes: payload.flavor_notes,
            design_notes: payload.design_notes,
            budget: payload.budget,
            event_date: payload.event_date,
            reference_image: payload.reference_image,
        })
        .await?;

    tracing::info!(email = %request.email, occasion = %request.occasion, "Custom order request received");
    Ok(Json(request))
}

/// GET /api/custom-orders - 定制请求列表 (后台)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<CustomOrderRequest>>> {
    let repo = CustomOrderRepository::new(state.db.clone());
    Ok(Json(repo.find_all(query.status).await?))
}

/// GET /api/custom-orders/:id - 定制请求详情 (后台)
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<CustomOrderRequest>> {
    let repo = CustomOrderRepository::new(state.db.clone());
    let request = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Custom order {}", id)))?;
    Ok(Json(request))
}

/// PATCH /api/custom-orders/:id - 后台跟进 (状态/报价/备注)
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<CustomOrderUpdate>,
) -> AppResult<Json<CustomOrderRequest>> {
    validate_optional_text(&payload.admin_notes, "admin_notes", MAX_NOTE_LEN)?;
    if let Some(Some(price)) = payload.quoted_price {
        validate_amount(price, "quoted_price")?;
    }

    let repo = CustomOrderRepository::new(state.db.clone());
    let request = repo.update(&id, payload).await?;
    Ok(Json(request))
}
