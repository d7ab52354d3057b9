//! Team Member Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{StaffRole, TeamMember, TeamMemberCreate, TeamMemberUpdate};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "team_member";

#[derive(Clone)]
pub struct TeamMemberRepository {
    base: BaseRepository,
}

impl TeamMemberRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all team members (including inactive)
    pub async fn find_all(&self) -> RepoResult<Vec<TeamMember>> {
        let members: Vec<TeamMember> = self
            .base
            .db()
            .query("SELECT * FROM team_member ORDER BY username")
            .await?
            .take(0)?;
        Ok(members)
    }

    /// Total number of accounts (seed check)
    pub async fn count(&self) -> RepoResult<i64> {
        #[derive(serde::Deserialize)]
        struct Row {
            total: i64,
        }
        let rows: Vec<Row> = self
            .base
            .db()
            .query("SELECT count() AS total FROM team_member GROUP ALL")
            .await?
            .take(0)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0))
    }

    /// Find team member by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<TeamMember>> {
        let record = self.base.parse_id(TABLE, id)?;
        let member: Option<TeamMember> = self.base.db().select(record).await?;
        Ok(member)
    }

    /// Find team member by username
    pub async fn find_by_username(&self, username: &str) -> RepoResult<Option<TeamMember>> {
        let username_owned = username.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM team_member WHERE username = $username LIMIT 1")
            .bind(("username", username_owned))
            .await?;
        let members: Vec<TeamMember> = result.take(0)?;
        Ok(members.into_iter().next())
    }

    /// Create a new team member
    ///
    /// `hash_pass` 被 serde skip_serializing 保护，不能走 .content()，
    /// 必须用显式 CREATE SET 写入。
    pub async fn create(&self, data: TeamMemberCreate) -> RepoResult<TeamMember> {
        // Check duplicate username
        if self.find_by_username(&data.username).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Username '{}' already exists",
                data.username
            )));
        }

        // Hash password
        let hash_pass = TeamMember::hash_password(&data.password)
            .map_err(|e| RepoError::Database(format!("Failed to hash password: {e}")))?;

        let display_name = data.display_name.unwrap_or_else(|| data.username.clone());

        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE team_member SET
                    username = $username,
                    display_name = $display_name,
                    hash_pass = $hash_pass,
                    role = $role,
                    is_system = false,
                    is_active = true,
                    created_at = $now
                RETURN AFTER"#,
            )
            .bind(("username", data.username))
            .bind(("display_name", display_name))
            .bind(("hash_pass", hash_pass))
            .bind(("role", data.role))
            .bind(("now", shared::now_millis()))
            .await?;

        let created: Option<TeamMember> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create team member".to_string()))
    }

    /// 创建种子管理员 (is_system = true，启动时调用)
    pub async fn create_system_admin(
        &self,
        username: &str,
        display_name: &str,
        hash_pass: &str,
        role: StaffRole,
    ) -> RepoResult<TeamMember> {
        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE team_member SET
                    username = $username,
                    display_name = $display_name,
                    hash_pass = $hash_pass,
                    role = $role,
                    is_system = true,
                    is_active = true,
                    created_at = $now
                RETURN AFTER"#,
            )
            .bind(("username", username.to_string()))
            .bind(("display_name", display_name.to_string()))
            .bind(("hash_pass", hash_pass.to_string()))
            .bind(("role", role))
            .bind(("now", shared::now_millis()))
            .await?;

        let created: Option<TeamMember> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create system admin".to_string()))
    }

    /// Update a team member
    pub async fn update(&self, id: &str, data: TeamMemberUpdate) -> RepoResult<TeamMember> {
        let record = self.base.parse_id(TABLE, id)?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Team member {} not found", id)))?;

        // Re-hash password if changing; the rest merges as-is
        let mut patch = serde_json::to_value(&data).map_err(|e| RepoError::Database(e.to_string()))?;
        if let Some(password) = &data.password {
            let hash_pass = TeamMember::hash_password(password)
                .map_err(|e| RepoError::Database(format!("Failed to hash password: {e}")))?;
            if let Some(obj) = patch.as_object_mut() {
                obj.remove("password");
                obj.insert("hash_pass".into(), serde_json::json!(hash_pass));
            }
        }

        self.base
            .db()
            .query("UPDATE $member MERGE $data")
            .bind(("member", record))
            .bind(("data", patch))
            .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Team member {} not found", id)))
    }

    /// Delete a team member
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let record = self.base.parse_id(TABLE, id)?;
        let deleted: Option<TeamMember> = self.base.db().delete(record).await?;
        Ok(deleted.is_some())
    }
}
