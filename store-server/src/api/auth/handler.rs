//! Authentication Handlers
//!
//! Handles login and token management for back-office staff

use std::time::Duration;

use axum::{Json, extract::State};

use shared::client::{ChangePasswordRequest, LoginRequest, LoginResponse, UserInfo};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::TeamMemberUpdate;
use crate::db::repository::TeamMemberRepository;
use crate::utils::validation::{MAX_PASSWORD_LEN, validate_required_text};
use crate::utils::{AppError, AppResult};

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

/// Minimum password length for change-password
const MIN_PASSWORD_LEN: usize = 8;

/// POST /api/auth/login - 员工登录
///
/// Authenticates staff credentials and returns a JWT token
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let repo = TeamMemberRepository::new(state.db.clone());
    let member = repo.find_by_username(&req.username).await?;

    // Fixed delay to prevent timing attacks (before checking result)
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    // Check authentication result - unified error message to prevent username enumeration
    let member = match member {
        Some(m) => {
            // User found - check active status
            if !m.is_active {
                return Err(AppError::forbidden("Account has been disabled".to_string()));
            }

            // Verify password
            let password_valid = m
                .verify_password(&req.password)
                .map_err(|e| AppError::internal(format!("Password verification failed: {e}")))?;

            if !password_valid {
                tracing::warn!(username = %req.username, "Login failed - invalid credentials");
                return Err(AppError::invalid("Invalid username or password".to_string()));
            }

            m
        }
        None => {
            tracing::warn!(username = %req.username, "Login failed - user not found");
            return Err(AppError::invalid("Invalid username or password".to_string()));
        }
    };

    let member_id = member
        .id
        .as_ref()
        .map(|id| id.to_string())
        .ok_or_else(|| AppError::internal("Team member has no ID".to_string()))?;

    let token = state
        .jwt_service
        .generate_token(
            &member_id,
            &member.username,
            &member.display_name,
            member.role.as_str(),
        )
        .map_err(|e| AppError::internal(format!("Failed to generate token: {e}")))?;

    tracing::info!(username = %member.username, role = member.role.as_str(), "Login succeeded");

    Ok(Json(LoginResponse {
        token,
        user: UserInfo {
            id: member_id,
            username: member.username,
            display_name: member.display_name,
            role: member.role.as_str().to_string(),
        },
    }))
}

/// GET /api/auth/me - 当前登录用户信息
pub async fn me(user: CurrentUser) -> Json<UserInfo> {
    Json(UserInfo {
        id: user.id,
        username: user.username,
        display_name: user.display_name,
        role: user.role,
    })
}

/// POST /api/auth/change-password - 修改自己的密码
pub async fn change_password(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(req): Json<ChangePasswordRequest>,
) -> AppResult<Json<UserInfo>> {
    validate_required_text(&req.new_password, "new_password", MAX_PASSWORD_LEN)?;
    if req.new_password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "new_password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    let repo = TeamMemberRepository::new(state.db.clone());
    let member = repo
        .find_by_id(&user.id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Team member {}", user.id)))?;

    let current_valid = member
        .verify_password(&req.current_password)
        .map_err(|e| AppError::internal(format!("Password verification failed: {e}")))?;
    if !current_valid {
        return Err(AppError::invalid("Current password is incorrect".to_string()));
    }

    let updated = repo
        .update(
            &user.id,
            TeamMemberUpdate {
                password: Some(req.new_password),
                display_name: None,
                role: None,
                is_active: None,
            },
        )
        .await?;

    tracing::info!(username = %updated.username, "Password changed");

    Ok(Json(UserInfo {
        id: user.id,
        username: updated.username,
        display_name: updated.display_name,
        role: updated.role.as_str().to_string(),
    }))
}
