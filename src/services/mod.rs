//! 业务服务层
//!
//! 每个资源一个 `XxxService`，由路由层以 `Lazy` 静态实例持有；
//! 存储实例在请求时从 `app_data` 中取得。

pub mod auth;
pub mod companies;
pub mod contacts;
pub mod documents;
pub mod evaluations;
pub mod grades;
pub mod internships;
pub mod modules;
pub mod reports;
pub(crate) mod scope;
pub mod students;
pub mod tutors;
pub mod users;
pub mod workshops;

pub use auth::AuthService;
pub use companies::CompanyService;
pub use contacts::ContactService;
pub use documents::DocumentService;
pub use evaluations::EvaluationService;
pub use grades::GradeService;
pub use internships::InternshipService;
pub use modules::ModuleService;
pub use reports::ReportService;
pub use students::StudentService;
pub use tutors::TutorService;
pub use users::UserService;
pub use workshops::WorkshopService;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::Arc;
use tracing::error;

use crate::errors::IMSystemError;
use crate::middlewares::RequireJWT;
use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

/// 优先使用服务自带的存储实例，否则从 `app_data` 中获取
pub(crate) fn resolve_storage(
    own: &Option<Arc<dyn Storage>>,
    request: &HttpRequest,
) -> ActixResult<Arc<dyn Storage>> {
    if let Some(storage) = own {
        return Ok(storage.clone());
    }
    request
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .map(|s| s.get_ref().clone())
        .ok_or_else(|| {
            error!("Storage is not registered in app data");
            actix_web::error::ErrorInternalServerError("Storage unavailable")
        })
}

/// 当前认证用户；路由未经过 `RequireJWT` 时返回 401 响应
pub(crate) fn current_user(request: &HttpRequest) -> Result<User, HttpResponse> {
    RequireJWT::extract_user(request).ok_or_else(|| {
        ApiResponse::reply(ErrorCode::Unauthorized, "Unauthorized access, please login")
    })
}

/// 存储层错误转 HTTP 响应
///
/// `not_found` 为该资源的“不存在”错误码。
pub(crate) fn storage_error(err: &IMSystemError, not_found: ErrorCode) -> HttpResponse {
    let code = match err {
        IMSystemError::NotFound(_) => not_found,
        IMSystemError::Conflict(_) => ErrorCode::Conflict,
        IMSystemError::Validation(_) => ErrorCode::BadRequest,
        IMSystemError::InvalidState(_) => ErrorCode::InternshipStateInvalid,
        IMSystemError::Authentication(_) => ErrorCode::Unauthorized,
        IMSystemError::Authorization(_) => ErrorCode::Forbidden,
        other => {
            error!("{}", other);
            return ApiResponse::reply(ErrorCode::InternalServerError, "Internal server error");
        }
    };
    ApiResponse::reply(code, err.message())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn test_storage_error_statuses() {
        let cases = [
            (IMSystemError::not_found("x"), StatusCode::NOT_FOUND),
            (IMSystemError::conflict("x"), StatusCode::CONFLICT),
            (IMSystemError::validation("x"), StatusCode::BAD_REQUEST),
            (IMSystemError::invalid_state("x"), StatusCode::CONFLICT),
            (
                IMSystemError::database_operation("x"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(
                storage_error(&err, ErrorCode::StudentNotFound).status(),
                status
            );
        }
    }
}
