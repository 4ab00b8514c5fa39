//! JWT 签发与校验
//!
//! access token 放在响应体，refresh token 只通过 HttpOnly cookie 下发。

use crate::config::AppConfig;
use actix_web::HttpRequest;
use actix_web::cookie::{Cookie, SameSite};
use jsonwebtoken::errors::{Error as JwtError, ErrorKind};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

pub const REFRESH_COOKIE_NAME: &str = "imsystem_refresh";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// 用户 ID
    pub sub: String,
    pub role: String,
    pub kind: TokenKind,
    pub exp: usize,
    pub iat: usize,
}

impl Claims {
    pub fn user_id(&self) -> Result<i64, JwtError> {
        self.sub
            .parse::<i64>()
            .map_err(|_| JwtError::from(ErrorKind::InvalidToken))
    }
}

#[derive(Debug)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// refresh token 有效期（秒），用于设置 cookie
    pub refresh_max_age: i64,
}

fn sign(
    user_id: i64,
    role: &str,
    kind: TokenKind,
    ttl: chrono::Duration,
    secret: &str,
) -> Result<String, JwtError> {
    let now = chrono::Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        role: role.to_string(),
        kind,
        exp: (now + ttl).timestamp() as usize,
        iat: now.timestamp() as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

fn verify(token: &str, expected: TokenKind, secret: &str) -> Result<Claims, JwtError> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    if data.claims.kind != expected {
        return Err(ErrorKind::InvalidToken.into());
    }
    Ok(data.claims)
}

pub struct JwtUtils;

impl JwtUtils {
    fn secret() -> &'static str {
        &AppConfig::get().jwt.secret
    }

    /// access token 有效期（秒）
    pub fn access_ttl_secs() -> i64 {
        AppConfig::get().jwt.access_token_expiry * 60
    }

    pub fn generate_access_token(user_id: i64, role: &str) -> Result<String, JwtError> {
        let ttl = chrono::Duration::seconds(Self::access_ttl_secs());
        sign(user_id, role, TokenKind::Access, ttl, Self::secret())
    }

    /// 签发一对 token；`remember_me` 时 refresh token 使用更长的有效期
    pub fn generate_token_pair(
        user_id: i64,
        role: &str,
        remember_me: bool,
    ) -> Result<TokenPair, JwtError> {
        let jwt = &AppConfig::get().jwt;
        let days = if remember_me {
            jwt.refresh_token_remember_me_expiry
        } else {
            jwt.refresh_token_expiry
        };
        let ttl = chrono::Duration::days(days);

        Ok(TokenPair {
            access_token: Self::generate_access_token(user_id, role)?,
            refresh_token: sign(user_id, role, TokenKind::Refresh, ttl, Self::secret())?,
            refresh_max_age: ttl.num_seconds(),
        })
    }

    pub fn verify_access_token(token: &str) -> Result<Claims, JwtError> {
        verify(token, TokenKind::Access, Self::secret())
    }

    pub fn verify_refresh_token(token: &str) -> Result<Claims, JwtError> {
        verify(token, TokenKind::Refresh, Self::secret())
    }

    pub fn refresh_cookie(refresh_token: &str, max_age_secs: i64) -> Cookie<'static> {
        Cookie::build(REFRESH_COOKIE_NAME, refresh_token.to_string())
            .path("/api/v1/auth")
            .max_age(actix_web::cookie::time::Duration::seconds(max_age_secs))
            .same_site(SameSite::Strict)
            .http_only(true)
            .secure(AppConfig::get().is_production())
            .finish()
    }

    /// 注销时覆盖掉 refresh cookie
    pub fn expired_refresh_cookie() -> Cookie<'static> {
        Self::refresh_cookie("", 0)
    }

    pub fn refresh_token_from(req: &HttpRequest) -> Option<String> {
        req.cookie(REFRESH_COOKIE_NAME)
            .map(|c| c.value().to_string())
            .filter(|v| !v.is_empty())
    }

    /// 从 `Authorization: Bearer <token>` 中取出 token
    pub fn bearer_token(req: &HttpRequest) -> Option<String> {
        req.headers()
            .get(actix_web::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    const SECRET: &str = "unit-test-secret";

    #[test]
    fn test_token_kind_is_enforced() {
        let ttl = chrono::Duration::minutes(5);
        let refresh = sign(7, "tutor", TokenKind::Refresh, ttl, SECRET).unwrap();

        let claims = verify(&refresh, TokenKind::Refresh, SECRET).unwrap();
        assert_eq!(claims.user_id().unwrap(), 7);
        assert_eq!(claims.role, "tutor");

        assert!(verify(&refresh, TokenKind::Access, SECRET).is_err());
        assert!(verify(&refresh, TokenKind::Refresh, "other-secret").is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let token = sign(
            1,
            "admin",
            TokenKind::Access,
            chrono::Duration::hours(-2),
            SECRET,
        )
        .unwrap();
        assert!(verify(&token, TokenKind::Access, SECRET).is_err());
    }

    #[test]
    fn test_bearer_token_parsing() {
        let req = TestRequest::default()
            .insert_header(("Authorization", "Bearer abc.def.ghi"))
            .to_http_request();
        assert_eq!(JwtUtils::bearer_token(&req).as_deref(), Some("abc.def.ghi"));

        let req = TestRequest::default()
            .insert_header(("Authorization", "Basic xyz"))
            .to_http_request();
        assert!(JwtUtils::bearer_token(&req).is_none());
    }
}
