use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{UserService, prepare_account};
use crate::models::{
    ApiResponse, ErrorCode,
    users::{requests::CreateUserRequest, responses::UserResponse},
};
use crate::services::storage_error;

pub async fn create_user(
    service: &UserService,
    mut user_data: CreateUserRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    user_data.username = user_data.username.trim().to_string();
    user_data.email = user_data.email.trim().to_lowercase();

    user_data.password = match prepare_account(
        &user_data.username,
        &user_data.email,
        &user_data.password,
        user_data.phone.as_deref(),
    ) {
        Ok(hash) => hash,
        Err(resp) => return Ok(resp),
    };

    let storage = service.get_storage(request)?;
    match storage.create_user(user_data).await {
        Ok(user) => {
            info!("User {} created with role {}", user.username, user.role);
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(
                UserResponse {
                    user,
                    profile: None,
                },
                "User created successfully",
            )))
        }
        Err(e) => Ok(storage_error(&e, ErrorCode::UserNotFound)),
    }
}
