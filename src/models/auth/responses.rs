use crate::models::users::entities::User;
use serde::Serialize;
use ts_rs::TS;

/// 账号关联的档案；管理员和督导没有
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(tag = "kind", rename_all = "lowercase")]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub enum ProfileRef {
    Student { id: i64, workshop_id: i64 },
    Company { id: i64 },
    Tutor { id: i64, workshop_id: i64 },
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    /// access token 有效期（秒）
    pub expires_in: i64,
    pub user: User,
    pub profile: Option<ProfileRef>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct RefreshTokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct UserInfoResponse {
    pub user: User,
    pub profile: Option<ProfileRef>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct TokenVerificationResponse {
    pub is_valid: bool,
    pub user_id: i64,
    pub role: String,
}

pub const TOKEN_TYPE: &str = "Bearer";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_ref_is_tagged() {
        let json = serde_json::to_value(ProfileRef::Tutor {
            id: 3,
            workshop_id: 7,
        })
        .unwrap();
        assert_eq!(json["kind"], "tutor");
        assert_eq!(json["workshop_id"], 7);
    }
}
