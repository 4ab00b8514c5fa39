use serde::Deserialize;
use ts_rs::TS;

// 登录请求，username 字段也接受邮箱
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct LoginRequest {
    #[serde(alias = "email")]
    pub username: String,
    pub password: String,
    /// 记住我时 refresh token 使用较长有效期
    #[serde(default)]
    pub remember_me: bool,
}

// 个人资料更新请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct UpdateProfileRequest {
    pub display_name: Option<String>,
    pub phone: Option<String>,
    /// 修改密码时必须提供当前密码
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_accepts_email_field() {
        let req: LoginRequest =
            serde_json::from_str(r#"{"email":"ana@itla.edu.do","password":"secret"}"#).unwrap();
        assert_eq!(req.username, "ana@itla.edu.do");
        assert!(!req.remember_me);
    }
}
