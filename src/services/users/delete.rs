use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::UserService;
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::storage_error;

pub async fn delete_user(
    service: &UserService,
    user_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    // 不能停用自己的账号
    if RequireJWT::extract_user_id(request) == Some(user_id) {
        return Ok(ApiResponse::reply(
            ErrorCode::CanNotDeleteCurrentUser,
            "Cannot delete current user",
        ));
    }

    let storage = service.get_storage(request)?;
    match storage.delete_user(user_id).await {
        Ok(true) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("User deleted successfully")))
        }
        Ok(false) => Ok(ApiResponse::reply(ErrorCode::UserNotFound, "User not found")),
        Err(e) => Ok(storage_error(&e, ErrorCode::UserNotFound)),
    }
}
