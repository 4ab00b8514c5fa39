use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::RecordStatus;

// 用户角色
#[derive(Debug, Clone, Serialize, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub enum UserRole {
    Student,    // 学生
    Company,    // 企业
    Tutor,      // 校内导师
    Supervisor, // 实习督导（教务）
    Admin,      // 管理员
}

impl UserRole {
    pub const STUDENT: &'static str = "student";
    pub const COMPANY: &'static str = "company";
    pub const TUTOR: &'static str = "tutor";
    pub const SUPERVISOR: &'static str = "supervisor";
    pub const ADMIN: &'static str = "admin";

    pub fn admin_roles() -> &'static [&'static UserRole] {
        &[&Self::Admin]
    }
    /// 可维护基础数据与实习流程的角色
    pub fn staff_roles() -> &'static [&'static UserRole] {
        &[&Self::Supervisor, &Self::Admin]
    }
    /// 可查看报表的角色
    pub fn reviewer_roles() -> &'static [&'static UserRole] {
        &[&Self::Tutor, &Self::Supervisor, &Self::Admin]
    }
    /// 可提交实习评价的角色
    pub fn evaluator_roles() -> &'static [&'static UserRole] {
        &[&Self::Company, &Self::Tutor, &Self::Supervisor, &Self::Admin]
    }
    pub fn all_roles() -> &'static [&'static UserRole] {
        &[
            &Self::Student,
            &Self::Company,
            &Self::Tutor,
            &Self::Supervisor,
            &Self::Admin,
        ]
    }

    pub fn is_staff(&self) -> bool {
        matches!(self, UserRole::Supervisor | UserRole::Admin)
    }
}

impl<'de> Deserialize<'de> for UserRole {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<UserRole>().map_err(|_| {
            serde::de::Error::custom(format!(
                "Invalid user role: '{s}'. Supported roles: student, company, tutor, supervisor, admin"
            ))
        })
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Student => write!(f, "{}", UserRole::STUDENT),
            UserRole::Company => write!(f, "{}", UserRole::COMPANY),
            UserRole::Tutor => write!(f, "{}", UserRole::TUTOR),
            UserRole::Supervisor => write!(f, "{}", UserRole::SUPERVISOR),
            UserRole::Admin => write!(f, "{}", UserRole::ADMIN),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            UserRole::STUDENT => Ok(UserRole::Student),
            UserRole::COMPANY => Ok(UserRole::Company),
            UserRole::TUTOR => Ok(UserRole::Tutor),
            UserRole::SUPERVISOR => Ok(UserRole::Supervisor),
            UserRole::ADMIN => Ok(UserRole::Admin),
            _ => Err(format!("Invalid user role: {s}")),
        }
    }
}

// 用户实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub phone: Option<String>,
    #[serde(skip_serializing, default)] // 不序列化到JSON响应中
    #[ts(skip)]
    pub password_hash: String,
    pub role: UserRole,
    pub status: RecordStatus,
    pub display_name: Option<String>,
    pub last_login: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl User {
    // 生成 token 对（access + refresh）
    pub fn generate_token_pair(
        &self,
        remember_me: bool,
    ) -> Result<crate::utils::jwt::TokenPair, String> {
        crate::utils::jwt::JwtUtils::generate_token_pair(
            self.id,
            &self.role.to_string(),
            remember_me,
        )
        .map_err(|e| format!("Failed to generate token pair: {e}"))
    }

    pub fn is_active(&self) -> bool {
        self.status == RecordStatus::Activo
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_and_display() {
        for role in UserRole::all_roles() {
            let text = role.to_string();
            assert_eq!(&text.parse::<UserRole>().unwrap(), *role);
        }
        assert!("coordinator".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_role_deserialize_error_lists_supported_roles() {
        let err = serde_json::from_str::<UserRole>("\"root\"").unwrap_err();
        assert!(err.to_string().contains("supervisor"));
    }

    #[test]
    fn test_staff_roles() {
        assert!(UserRole::Admin.is_staff());
        assert!(UserRole::Supervisor.is_staff());
        assert!(!UserRole::Tutor.is_staff());
    }
}
