pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::users::entities::User;
use crate::models::users::requests::{CreateUserRequest, UpdateUserRequest, UserListParams};
use crate::models::users::responses::UserResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::scope::Viewer;
use crate::storage::Storage;
use crate::utils::password::hash_password;
use crate::utils::validate::{
    validate_email, validate_password_simple, validate_phone, validate_username,
};

pub struct UserService {
    storage: Option<Arc<dyn Storage>>,
}

/// 新账号的用户名、邮箱、密码和电话校验，通过后返回密码哈希
///
/// 学生、导师的创建也会复用这里。
pub(crate) fn prepare_account(
    username: &str,
    email: &str,
    password: &str,
    phone: Option<&str>,
) -> Result<String, HttpResponse> {
    validate_username(username)
        .map_err(|msg| ApiResponse::reply(ErrorCode::UserNameInvalid, msg))?;
    validate_email(email).map_err(|msg| ApiResponse::reply(ErrorCode::UserEmailInvalid, msg))?;
    if let Some(phone) = phone.filter(|p| !p.trim().is_empty()) {
        validate_phone(phone).map_err(|msg| ApiResponse::reply(ErrorCode::UserPhoneInvalid, msg))?;
    }
    validate_password_simple(password)
        .map_err(|msg| ApiResponse::reply(ErrorCode::UserPasswordInvalid, msg))?;

    hash_password(password).map_err(|e| {
        tracing::error!("{}", e);
        ApiResponse::reply(ErrorCode::InternalServerError, "Password hashing failed")
    })
}

/// 组装用户响应；档案读取失败只记日志
pub(crate) async fn user_response(storage: &Arc<dyn Storage>, user: User) -> UserResponse {
    let profile = match Viewer::load(storage, &user).await {
        Ok(viewer) => viewer.and_then(|v| v.profile()),
        Err(e) => {
            tracing::warn!("Failed to load profile of user {}: {}", user.id, e);
            None
        }
    };
    UserResponse { user, profile }
}

impl UserService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        super::resolve_storage(&self.storage, request)
    }

    pub async fn list_users(
        &self,
        query: UserListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_users(self, query, request).await
    }

    pub async fn create_user(
        &self,
        user_data: CreateUserRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_user(self, user_data, request).await
    }

    pub async fn get_user(&self, user_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::get_user(self, user_id, request).await
    }

    pub async fn update_user(
        &self,
        user_id: i64,
        update_data: UpdateUserRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_user(self, user_id, update_data, request).await
    }

    pub async fn delete_user(
        &self,
        user_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_user(self, user_id, request).await
    }
}
