use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{UserService, user_response};
use crate::models::{
    ApiResponse, ErrorCode,
    users::requests::UpdateUserRequest,
};
use crate::services::storage_error;
use crate::utils::password::hash_password;
use crate::utils::validate::{validate_email, validate_password_simple, validate_phone};

pub async fn update_user(
    service: &UserService,
    user_id: i64,
    mut update_data: UpdateUserRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Some(email) = update_data.email.as_mut() {
        *email = email.trim().to_lowercase();
        if let Err(msg) = validate_email(email) {
            return Ok(ApiResponse::reply(ErrorCode::UserEmailInvalid, msg));
        }
    }
    if let Some(phone) = update_data.phone.as_deref().filter(|p| !p.trim().is_empty())
        && let Err(msg) = validate_phone(phone)
    {
        return Ok(ApiResponse::reply(ErrorCode::UserPhoneInvalid, msg));
    }

    if let Some(password) = update_data.password.take() {
        if let Err(msg) = validate_password_simple(&password) {
            return Ok(ApiResponse::reply(ErrorCode::UserPasswordInvalid, msg));
        }
        match hash_password(&password) {
            Ok(hash) => update_data.password = Some(hash),
            Err(e) => {
                tracing::error!("{}", e);
                return Ok(ApiResponse::reply(
                    ErrorCode::InternalServerError,
                    "Password hashing failed",
                ));
            }
        }
    }

    let storage = service.get_storage(request)?;
    match storage.update_user(user_id, update_data).await {
        Ok(Some(user)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            user_response(&storage, user).await,
            "User information updated successfully",
        ))),
        Ok(None) => Ok(ApiResponse::reply(ErrorCode::UserNotFound, "User not found")),
        Err(e) => Ok(storage_error(&e, ErrorCode::UserNotFound)),
    }
}
