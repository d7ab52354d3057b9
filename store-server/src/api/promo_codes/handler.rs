//! Promo Code API Handlers
//!
//! /validate 返回软结果 (`{valid: false, error}`，HTTP 200)，
//! 优惠码问题永远不是异常 — 前台据此渲染提示。

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::db::models::{PromoCode, PromoCodeCreate, PromoCodeUpdate, PromoType};
use crate::db::repository::PromoCodeRepository;
use crate::pricing::{PromoRejection, validate_promo};
use crate::utils::validation::{MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_amount, validate_optional_text, validate_required_text};
use crate::utils::{AppError, AppResult};

// =============================================================================
// Validate (storefront)
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct ValidateQuery {
    pub code: String,
    #[serde(default)]
    pub subtotal: f64,
}

/// 校验通过时返回的优惠摘要
#[derive(Debug, Serialize)]
pub struct ValidatedPromo {
    pub code: String,
    pub promo_type: PromoType,
    pub discount: f64,
    pub max_discount: Option<f64>,
    /// 按提交的小计算出的折扣金额 (已夹到 [0, subtotal])
    pub discount_amount: f64,
}

/// 软校验结果
#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promo: Option<ValidatedPromo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
}

/// GET /api/promo-codes/validate?code=&subtotal= - 前台优惠码校验
pub async fn validate(
    State(state): State<ServerState>,
    Query(query): Query<ValidateQuery>,
) -> AppResult<Json<ValidateResponse>> {
    let repo = PromoCodeRepository::new(state.db.clone());

    let rejected = |rejection: PromoRejection| ValidateResponse {
        valid: false,
        promo: None,
        error: Some(rejection.as_str()),
    };

    let promo = match repo.find_by_code(&query.code).await? {
        Some(promo) => promo,
        None => return Ok(Json(rejected(PromoRejection::InvalidCode))),
    };

    let response = match validate_promo(&promo, query.subtotal, shared::now_millis()) {
        Err(rejection) => rejected(rejection),
        Ok(discount_amount) => ValidateResponse {
            valid: true,
            promo: Some(ValidatedPromo {
                code: promo.code,
                promo_type: promo.promo_type,
                discount: promo.discount,
                max_discount: promo.max_discount,
                discount_amount,
            }),
            error: None,
        },
    };

    Ok(Json(response))
}

// =============================================================================
// CRUD (back office)
// =============================================================================

/// GET /api/promo-codes - 全部优惠码
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<PromoCode>>> {
    let repo = PromoCodeRepository::new(state.db.clone());
    Ok(Json(repo.find_all().await?))
}

/// GET /api/promo-codes/:id - 单个优惠码
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<PromoCode>> {
    let repo = PromoCodeRepository::new(state.db.clone());
    let promo = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Promo code {}", id)))?;
    Ok(Json(promo))
}

fn validate_promo_payload(
    discount: Option<f64>,
    promo_type: Option<PromoType>,
    min_order: Option<f64>,
    max_discount: Option<f64>,
) -> AppResult<()> {
    if let Some(discount) = discount {
        validate_amount(discount, "discount")?;
        if promo_type == Some(PromoType::Percentage) && discount > 100.0 {
            return Err(AppError::validation(format!(
                "Percentage discount must be in [0, 100], got {discount}"
            )));
        }
    }
    if let Some(min_order) = min_order {
        validate_amount(min_order, "min_order")?;
    }
    if let Some(max_discount) = max_discount {
        validate_amount(max_discount, "max_discount")?;
    }
    Ok(())
}

/// POST /api/promo-codes - 创建优惠码
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<PromoCodeCreate>,
) -> AppResult<Json<PromoCode>> {
    validate_required_text(&payload.code, "code", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    validate_promo_payload(
        Some(payload.discount),
        Some(payload.promo_type),
        payload.min_order,
        payload.max_discount,
    )?;
    if let (Some(from), Some(until)) = (payload.valid_from, payload.valid_until)
        && from > until
    {
        return Err(AppError::validation(
            "valid_from must not be after valid_until".to_string(),
        ));
    }

    let repo = PromoCodeRepository::new(state.db.clone());
    let promo = repo.create(payload).await?;
    tracing::info!(code = %promo.code, "Promo code created");
    Ok(Json(promo))
}

/// PUT /api/promo-codes/:id - 更新优惠码
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<PromoCodeUpdate>,
) -> AppResult<Json<PromoCode>> {
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    validate_promo_payload(
        payload.discount,
        payload.promo_type,
        payload.min_order.flatten(),
        payload.max_discount.flatten(),
    )?;

    let repo = PromoCodeRepository::new(state.db.clone());
    let promo = repo.update(&id, payload).await?;
    Ok(Json(promo))
}

/// DELETE /api/promo-codes/:id - 删除优惠码
///
/// 历史订单只存 code 字符串快照，删除不影响已完成订单。
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = PromoCodeRepository::new(state.db.clone());
    let deleted = repo.delete(&id).await?;
    if !deleted {
        return Err(AppError::not_found(format!("Promo code {}", id)));
    }
    tracing::info!(promo_id = %id, "Promo code deleted");
    Ok(Json(true))
}
