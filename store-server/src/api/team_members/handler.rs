//! Team Member API Handlers
//!
//! 整个模块挂在 require_admin 之后。种子账号 (is_system) 受保护：
//! 不可删除、不可停用、不可降级。

use axum::{
    Json,
    extract::{Path, State},
};
use shared::error::ErrorCode;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{StaffRole, TeamMember, TeamMemberCreate, TeamMemberUpdate};
use crate::db::repository::TeamMemberRepository;
use crate::utils::validation::{MAX_NAME_LEN, MAX_PASSWORD_LEN, MAX_SHORT_TEXT_LEN, validate_required_text};
use crate::utils::{AppError, AppResult};

/// Minimum password length for new accounts
const MIN_PASSWORD_LEN: usize = 8;

/// GET /api/team-members - 团队列表
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<TeamMember>>> {
    let repo = TeamMemberRepository::new(state.db.clone());
    Ok(Json(repo.find_all().await?))
}

/// GET /api/team-members/:id - 单个成员
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<TeamMember>> {
    let repo = TeamMemberRepository::new(state.db.clone());
    let member = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Team member {}", id)))?;
    Ok(Json(member))
}

/// POST /api/team-members - 创建成员
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<TeamMemberCreate>,
) -> AppResult<Json<TeamMember>> {
    validate_required_text(&payload.username, "username", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&payload.password, "password", MAX_PASSWORD_LEN)?;
    if payload.password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    if let Some(name) = &payload.display_name {
        validate_required_text(name, "display_name", MAX_NAME_LEN)?;
    }

    let repo = TeamMemberRepository::new(state.db.clone());
    let member = repo.create(payload).await?;
    tracing::info!(username = %member.username, role = member.role.as_str(), "Team member created");
    Ok(Json(member))
}

/// PUT /api/team-members/:id - 更新成员
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<TeamMemberUpdate>,
) -> AppResult<Json<TeamMember>> {
    if let Some(password) = &payload.password {
        validate_required_text(password, "password", MAX_PASSWORD_LEN)?;
        if password.len() < MIN_PASSWORD_LEN {
            return Err(AppError::validation(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
    }

    let repo = TeamMemberRepository::new(state.db.clone());
    let existing = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Team member {}", id)))?;

    // 种子账号不可停用、不可降级
    if existing.is_system
        && (payload.is_active == Some(false) || payload.role == Some(StaffRole::Staff))
    {
        return Err(AppError::business(
            ErrorCode::CannotModifySystemAccount,
            "System account cannot be deactivated or demoted",
        ));
    }

    let member = repo.update(&id, payload).await?;
    Ok(Json(member))
}

/// DELETE /api/team-members/:id - 删除成员
pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = TeamMemberRepository::new(state.db.clone());
    let existing = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Team member {}", id)))?;

    if existing.is_system {
        return Err(AppError::business(
            ErrorCode::CannotModifySystemAccount,
            "System account cannot be deleted",
        ));
    }
    if user.id == id {
        return Err(AppError::business(
            ErrorCode::CannotDeleteSelf,
            "You cannot delete your own account",
        ));
    }

    let deleted = repo.delete(&id).await?;
    tracing::info!(member_id = %id, deleted_by = %user.username, "Team member deleted");
    Ok(Json(deleted))
}
