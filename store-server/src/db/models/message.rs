//! Customer Message Model
//!
//! 客户留言/聊天：以归一化邮箱为会话 key，客户和店员消息在同一时间线。

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

/// Message ID type
pub type MessageId = RecordId;

/// 消息发送方
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageSender {
    Customer,
    Staff,
}

/// Message entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<MessageId>,
    /// 会话 key = 归一化客户邮箱
    pub conversation_key: String,
    /// 客户显示名 (客户消息携带，店员回复沿用会话内最近值)
    pub customer_name: String,
    pub sender: MessageSender,
    pub body: String,
    /// 店员是否已读 (仅对客户消息有意义)
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub is_read: bool,
    pub created_at: i64,
}

/// 会话摘要 (后台收件箱列表)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationSummary {
    pub conversation_key: String,
    pub customer_name: String,
    pub last_message: String,
    pub last_message_at: i64,
    pub unread_count: i64,
}
