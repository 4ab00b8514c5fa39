use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::auth::requests::UpdateProfileRequest;
use crate::models::users::requests::UpdateUserRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::users::user_response;
use crate::services::{current_user, storage_error};
use crate::utils::password::{hash_password, verify_password};
use crate::utils::validate::{validate_password_simple, validate_phone};

use super::AuthService;

pub async fn handle_update_profile(
    service: &AuthService,
    update_data: UpdateProfileRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let current = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;

    if let Some(phone) = update_data.phone.as_deref().filter(|p| !p.trim().is_empty())
        && let Err(msg) = validate_phone(phone)
    {
        return Ok(ApiResponse::reply(ErrorCode::UserPhoneInvalid, msg));
    }

    let password = match update_data.new_password.as_deref() {
        Some(new_password) => {
            // 缓存中的用户不含密码哈希，需要重新读取
            let stored = match storage.get_user_by_id(current.id).await {
                Ok(Some(user)) => user,
                Ok(None) => {
                    return Ok(ApiResponse::reply(ErrorCode::UserNotFound, "User not found"));
                }
                Err(e) => return Ok(storage_error(&e, ErrorCode::UserNotFound)),
            };
            let confirmed = update_data
                .current_password
                .as_deref()
                .is_some_and(|p| verify_password(p, &stored.password_hash));
            if !confirmed {
                return Ok(ApiResponse::reply(
                    ErrorCode::UserPasswordInvalid,
                    "Current password is incorrect",
                ));
            }
            if let Err(msg) = validate_password_simple(new_password) {
                return Ok(ApiResponse::reply(ErrorCode::UserPasswordInvalid, msg));
            }
            match hash_password(new_password) {
                Ok(hash) => Some(hash),
                Err(e) => {
                    tracing::error!("{}", e);
                    return Ok(ApiResponse::reply(
                        ErrorCode::InternalServerError,
                        "Password hashing failed",
                    ));
                }
            }
        }
        None => None,
    };

    // 角色、状态和邮箱只能由管理员修改
    let update = UpdateUserRequest {
        password,
        display_name: update_data.display_name,
        phone: update_data.phone,
        ..Default::default()
    };

    match storage.update_user(current.id, update).await {
        Ok(Some(user)) => {
            service.evict_cached_user(request).await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                user_response(&storage, user).await,
                "Profile updated successfully",
            )))
        }
        Ok(None) => Ok(ApiResponse::reply(ErrorCode::UserNotFound, "User not found")),
        Err(e) => Ok(storage_error(&e, ErrorCode::UserNotFound)),
    }
}
