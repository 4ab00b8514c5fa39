use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{UserService, user_response};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::storage_error;

pub async fn get_user(
    service: &UserService,
    user_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.get_user_by_id(user_id).await {
        Ok(Some(user)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            user_response(&storage, user).await,
            "User information retrieved successfully",
        ))),
        Ok(None) => Ok(ApiResponse::reply(ErrorCode::UserNotFound, "User not found")),
        Err(e) => Ok(storage_error(&e, ErrorCode::UserNotFound)),
    }
}
