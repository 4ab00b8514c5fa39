use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info, warn};

use crate::models::{
    ApiResponse, ErrorCode,
    auth::{LoginRequest, LoginResponse, TOKEN_TYPE},
};
use crate::services::scope::Viewer;
use crate::utils::jwt::JwtUtils;
use crate::utils::password::verify_password;

use super::AuthService;

fn login_failed() -> HttpResponse {
    ApiResponse::reply(ErrorCode::AuthFailed, "Username or password is incorrect")
}

pub async fn handle_login(
    service: &AuthService,
    login_request: LoginRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let identifier = login_request.username.trim();
    let user = match storage.get_user_by_username_or_email(identifier).await {
        Ok(Some(user)) => user,
        Ok(None) => return Ok(login_failed()),
        Err(e) => {
            error!("Login lookup failed: {}", e);
            return Ok(ApiResponse::reply(
                ErrorCode::InternalServerError,
                "Login failed",
            ));
        }
    };

    if !verify_password(&login_request.password, &user.password_hash) {
        info!("Wrong password for user {}", user.username);
        return Ok(login_failed());
    }

    // 软删除的账号不能登录
    if !user.is_active() {
        return Ok(ApiResponse::reply(
            ErrorCode::AuthFailed,
            "User account is disabled",
        ));
    }

    if let Err(e) = storage.update_last_login(user.id).await {
        warn!("Failed to record last login for {}: {}", user.id, e);
    }

    let tokens = match user.generate_token_pair(login_request.remember_me) {
        Ok(tokens) => tokens,
        Err(e) => {
            error!("{}", e);
            return Ok(ApiResponse::reply(
                ErrorCode::InternalServerError,
                "Login failed, unable to generate token",
            ));
        }
    };

    info!("User {} logged in ({})", user.username, user.role);

    // 档案缺失不影响登录，前端据此提示
    let profile = match Viewer::load(&storage, &user).await {
        Ok(viewer) => viewer.and_then(|v| v.profile()),
        Err(e) => {
            warn!("Failed to load profile of user {}: {}", user.id, e);
            None
        }
    };

    let cookie = JwtUtils::refresh_cookie(&tokens.refresh_token, tokens.refresh_max_age);
    let response = LoginResponse {
        access_token: tokens.access_token,
        token_type: TOKEN_TYPE.to_string(),
        expires_in: JwtUtils::access_ttl_secs(),
        user,
        profile,
    };

    Ok(HttpResponse::Ok()
        .cookie(cookie)
        .json(ApiResponse::success(response, "Login successful")))
}
