use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use crate::models::auth::{
    RefreshTokenResponse, TOKEN_TYPE, TokenVerificationResponse, UserInfoResponse,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::current_user;
use crate::services::scope::Viewer;
use crate::utils::jwt::JwtUtils;

use super::AuthService;

fn session_expired() -> HttpResponse {
    HttpResponse::Unauthorized()
        .cookie(JwtUtils::expired_refresh_cookie())
        .json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Login expired or invalid, please login again",
        ))
}

pub async fn handle_refresh_token(
    service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(refresh_token) = JwtUtils::refresh_token_from(request) else {
        return Ok(ApiResponse::reply(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        ));
    };

    let claims = match JwtUtils::verify_refresh_token(&refresh_token) {
        Ok(claims) => claims,
        Err(e) => {
            info!("Refresh token rejected: {}", e);
            return Ok(session_expired());
        }
    };
    let Ok(user_id) = claims.user_id() else {
        return Ok(session_expired());
    };

    // 角色和状态以数据库为准，账号停用后 refresh token 立即失效
    let storage = service.get_storage(request)?;
    let user = match storage.get_user_by_id(user_id).await {
        Ok(Some(user)) if user.is_active() => user,
        Ok(_) => return Ok(session_expired()),
        Err(e) => {
            error!("Failed to load user {} during refresh: {}", user_id, e);
            return Ok(ApiResponse::reply(
                ErrorCode::InternalServerError,
                "Token refresh failed",
            ));
        }
    };

    match JwtUtils::generate_access_token(user.id, &user.role.to_string()) {
        Ok(access_token) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            RefreshTokenResponse {
                access_token,
                token_type: TOKEN_TYPE.to_string(),
                expires_in: JwtUtils::access_ttl_secs(),
            },
            "Token refreshed successfully",
        ))),
        Err(e) => {
            error!("Failed to sign access token: {}", e);
            Ok(ApiResponse::reply(
                ErrorCode::InternalServerError,
                "Token refresh failed",
            ))
        }
    }
}

pub async fn handle_verify_token(
    _service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    // 能走到这里说明 RequireJWT 已经通过
    match current_user(request) {
        Ok(user) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            TokenVerificationResponse {
                is_valid: true,
                user_id: user.id,
                role: user.role.to_string(),
            },
            "Token is valid",
        ))),
        Err(resp) => Ok(resp),
    }
}

pub async fn handle_get_user(
    service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;
    let profile = match Viewer::load(&storage, &user).await {
        Ok(viewer) => viewer.and_then(|v| v.profile()),
        Err(e) => {
            error!("Failed to load profile of user {}: {}", user.id, e);
            return Ok(ApiResponse::reply(
                ErrorCode::InternalServerError,
                "Failed to load user profile",
            ));
        }
    };
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        UserInfoResponse { user, profile },
        "User information retrieved successfully",
    )))
}
