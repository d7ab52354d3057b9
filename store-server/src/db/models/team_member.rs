//! Team Member Model

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

/// Team member ID type
pub type TeamMemberId = RecordId;

/// 后台角色
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StaffRole {
    /// 管理员：团队管理、商店设置
    Admin,
    /// 店员：订单、留言、目录日常操作
    Staff,
}

impl StaffRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            StaffRole::Admin => "ADMIN",
            StaffRole::Staff => "STAFF",
        }
    }
}

/// Team member model matching the back-office accounts table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamMember {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<TeamMemberId>,
    pub username: String,
    pub display_name: String,
    #[serde(skip_serializing)]
    pub hash_pass: String,
    pub role: StaffRole,
    /// 种子管理员账号，禁止删除/停用/降级
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub is_system: bool,
    #[serde(
        default = "default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: i64,
}

fn default_true() -> bool {
    true
}

/// Create team member payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamMemberCreate {
    pub username: String,
    pub password: String,
    pub display_name: Option<String>,
    pub role: StaffRole,
}

/// Update team member payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamMemberUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<StaffRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl TeamMember {
    /// Verify password using argon2
    pub fn verify_password(&self, password: &str) -> Result<bool, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHash, PasswordVerifier},
        };

        let parsed_hash = PasswordHash::new(&self.hash_pass)?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash password using argon2
    pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
        };

        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let password_hash = argon2.hash_password(password.as_bytes(), &salt)?;
        Ok(password_hash.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_and_verify() {
        let hash = TeamMember::hash_password("correct horse battery").unwrap();
        let member = TeamMember {
            id: None,
            username: "amina".to_string(),
            display_name: "Amina".to_string(),
            hash_pass: hash,
            role: StaffRole::Staff,
            is_system: false,
            is_active: true,
            created_at: 0,
        };
        assert!(member.verify_password("correct horse battery").unwrap());
        assert!(!member.verify_password("wrong password").unwrap());
    }

    #[test]
    fn hash_pass_never_serialized() {
        let member = TeamMember {
            id: None,
            username: "amina".to_string(),
            display_name: "Amina".to_string(),
            hash_pass: "$argon2id$secret".to_string(),
            role: StaffRole::Admin,
            is_system: true,
            is_active: true,
            created_at: 0,
        };
        let json = serde_json::to_string(&member).unwrap();
        assert!(!json.contains("argon2id"));
        assert!(!json.contains("hash_pass"));
    }
}
