//! Customer Message Repository

use std::collections::BTreeMap;

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{ConversationSummary, Message, MessageSender};
use crate::utils::validation::normalize_email;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "message";

#[derive(Clone)]
pub struct MessageRepository {
    base: BaseRepository,
}

impl MessageRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Append a message to a conversation
    pub async fn create(
        &self,
        conversation_key: &str,
        customer_name: &str,
        sender: MessageSender,
        body: &str,
    ) -> RepoResult<Message> {
        let message = Message {
            id: None,
            conversation_key: normalize_email(conversation_key),
            customer_name: customer_name.to_string(),
            sender,
            body: body.to_string(),
            // 店员回复对后台而言天然已读
            is_read: sender == MessageSender::Staff,
            created_at: shared::now_millis(),
        };

        let created: Option<Message> = self.base.db().create(TABLE).content(message).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create message".to_string()))
    }

    /// Full thread for one conversation, oldest first
    pub async fn find_by_conversation(&self, conversation_key: &str) -> RepoResult<Vec<Message>> {
        let key = normalize_email(conversation_key);
        let messages: Vec<Message> = self
            .base
            .db()
            .query("SELECT * FROM message WHERE conversation_key = $key ORDER BY created_at")
            .bind(("key", key))
            .await?
            .take(0)?;
        Ok(messages)
    }

    /// 后台收件箱：按会话折叠，带最后一条消息和未读数
    ///
    /// 小店留言量有限，直接整表折叠；会话按最后消息时间倒序。
    pub async fn list_conversations(&self) -> RepoResult<Vec<ConversationSummary>> {
        let messages: Vec<Message> = self
            .base
            .db()
            .query("SELECT * FROM message ORDER BY created_at")
            .await?
            .take(0)?;

        let mut grouped: BTreeMap<String, ConversationSummary> = BTreeMap::new();
        for msg in messages {
            let entry = grouped
                .entry(msg.conversation_key.clone())
                .or_insert_with(|| ConversationSummary {
                    conversation_key: msg.conversation_key.clone(),
                    customer_name: msg.customer_name.clone(),
                    last_message: String::new(),
                    last_message_at: 0,
                    unread_count: 0,
                });
            // 客户消息携带最新显示名
            if msg.sender == MessageSender::Customer {
                entry.customer_name = msg.customer_name.clone();
                if !msg.is_read {
                    entry.unread_count += 1;
                }
            }
            entry.last_message = msg.body.clone();
            entry.last_message_at = msg.created_at;
        }

        let mut summaries: Vec<ConversationSummary> = grouped.into_values().collect();
        summaries.sort_by(|a, b| b.last_message_at.cmp(&a.last_message_at));
        Ok(summaries)
    }

    /// Mark all customer messages in a conversation as read
    pub async fn mark_read(&self, conversation_key: &str) -> RepoResult<()> {
        let key = normalize_email(conversation_key);
        self.base
            .db()
            .query(
                "UPDATE message SET is_read = true WHERE conversation_key = $key AND sender = 'CUSTOMER'",
            )
            .bind(("key", key))
            .await?;
        Ok(())
    }
}
