use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::ApiResponse;
use crate::utils::jwt::JwtUtils;

use super::AuthService;

/// 清除 refresh cookie，并丢弃当前 access token 的缓存用户
pub async fn handle_logout(
    service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    service.evict_cached_user(request).await;

    Ok(HttpResponse::Ok()
        .cookie(JwtUtils::expired_refresh_cookie())
        .json(ApiResponse::<()>::success_empty("Logout successful")))
}
