//! Customer Message API Handlers
//!
//! 会话以归一化邮箱为 key。前台按邮箱查看自己的时间线，
//! 后台在收件箱里按会话折叠处理。

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use validator::Validate;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{ConversationSummary, Message, MessageSender};
use crate::db::repository::MessageRepository;
use crate::utils::validation::{MAX_MESSAGE_LEN, validate_required_text};
use crate::utils::{AppError, AppResult};

/// 前台留言 payload
#[derive(Debug, Deserialize, Validate)]
pub struct SendRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 2000))]
    pub body: String,
}

/// 后台回复 payload
#[derive(Debug, Deserialize)]
pub struct ReplyRequest {
    pub body: String,
}

#[derive(Debug, Deserialize)]
pub struct ThreadQuery {
    pub email: String,
}

/// POST /api/messages - 客户发送留言 (商店前台)
pub async fn send(
    State(state): State<ServerState>,
    Json(payload): Json<SendRequest>,
) -> AppResult<Json<Message>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let repo = MessageRepository::new(state.db.clone());
    let message = repo
        .create(&payload.email, &payload.name, MessageSender::Customer, &payload.body)
        .await?;

    tracing::info!(conversation = %message.conversation_key, "Customer message received");
    Ok(Json(message))
}

/// GET /api/messages?email= - 客户查看自己的会话 (商店前台)
pub async fn my_thread(
    State(state): State<ServerState>,
    Query(query): Query<ThreadQuery>,
) -> AppResult<Json<Vec<Message>>> {
    let repo = MessageRepository::new(state.db.clone());
    Ok(Json(repo.find_by_conversation(&query.email).await?))
}

/// GET /api/messages/conversations - 后台收件箱
pub async fn list_conversations(
    State(state): State<ServerState>,
) -> AppResult<Json<Vec<ConversationSummary>>> {
    let repo = MessageRepository::new(state.db.clone());
    Ok(Json(repo.list_conversations().await?))
}

/// GET /api/messages/conversations/:key - 会话详情 (后台)
pub async fn get_conversation(
    State(state): State<ServerState>,
    Path(key): Path<String>,
) -> AppResult<Json<Vec<Message>>> {
    let repo = MessageRepository::new(state.db.clone());
    let messages = repo.find_by_conversation(&key).await?;
    if messages.is_empty() {
        return Err(AppError::not_found(format!("Conversation {}", key)));
    }
    Ok(Json(messages))
}

/// POST /api/messages/conversations/:key/reply - 店员回复 (后台)
pub async fn reply(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(key): Path<String>,
    Json(payload): Json<ReplyRequest>,
) -> AppResult<Json<Message>> {
    validate_required_text(&payload.body, "body", MAX_MESSAGE_LEN)?;

    let repo = MessageRepository::new(state.db.clone());
    // 回复沿用会话里客户的显示名；空会话不可回复
    let thread = repo.find_by_conversation(&key).await?;
    let customer_name = thread
        .iter()
        .rev()
        .find(|m| m.sender == MessageSender::Customer)
        .map(|m| m.customer_name.clone())
        .ok_or_else(|| AppError::not_found(format!("Conversation {}", key)))?;

    let message = repo
        .create(&key, &customer_name, MessageSender::Staff, &payload.body)
        .await?;

    tracing::info!(conversation = %message.conversation_key, staff = %user.username, "Staff reply sent");
    Ok(Json(message))
}

/// POST /api/messages/conversations/:key/read - 标记会话已读 (后台)
pub async fn mark_read(
    State(state): State<ServerState>,
    Path(key): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = MessageRepository::new(state.db.clone());
    repo.mark_read(&key).await?;
    Ok(Json(true))
}
