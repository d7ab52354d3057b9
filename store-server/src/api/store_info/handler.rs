//! Store Info API Handlers

use axum::{Json, extract::State};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{StoreInfo, StoreInfoUpdate};
use crate::db::repository::StoreInfoRepository;
use crate::utils::validation::{MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_amount, validate_optional_text};
use crate::utils::{AppError, AppResult};

/// GET /api/store-info - 商店设置 (前台展示 Paybill 号、配送费、营业时间)
pub async fn get(State(state): State<ServerState>) -> AppResult<Json<StoreInfo>> {
    let repo = StoreInfoRepository::new(state.db.clone());
    let info = repo
        .get()
        .await?
        .ok_or_else(|| AppError::internal("Store settings missing"))?;
    Ok(Json(info))
}

/// PUT /api/store-info - 更新商店设置 (ADMIN)
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<StoreInfoUpdate>,
) -> AppResult<Json<StoreInfo>> {
    if !user.is_admin() {
        return Err(AppError::admin_required());
    }
    validate_optional_text(&payload.store_name, "store_name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.paybill_number, "paybill_number", MAX_SHORT_TEXT_LEN)?;
    if let Some(name) = &payload.store_name
        && name.trim().is_empty()
    {
        return Err(AppError::validation("store_name must not be empty".to_string()));
    }
    if let Some(number) = &payload.paybill_number {
        // Paybill 商户号是 5-7 位数字
        if !(5..=7).contains(&number.len()) || !number.chars().all(|c| c.is_ascii_digit()) {
            return Err(AppError::validation(format!(
                "paybill_number must be 5-7 digits, got '{number}'"
            )));
        }
    }
    if let Some(fee) = payload.delivery_fee {
        validate_amount(fee, "delivery_fee")?;
    }

    let repo = StoreInfoRepository::new(state.db.clone());
    let info = repo.update(payload).await?;
    tracing::info!(store = %info.store_name, "Store settings updated");
    Ok(Json(info))
}
