//! 业务数据模型
//!
//! 每个子模块按 `entities` / `requests` / `responses` 划分，
//! 并通过 ts-rs 导出前端使用的 TypeScript 类型。

pub mod auth;
pub mod common;
pub mod companies;
pub mod contacts;
pub mod documents;
pub mod evaluations;
pub mod grades;
pub mod internships;
pub mod modules;
pub mod reports;
pub mod students;
pub mod tutors;
pub mod users;
pub mod workshops;

pub use common::{ApiResponse, PaginationInfo, PaginationQuery, RecordStatus};

/// 程序启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

/// API 业务错误码
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    Conflict = 1009,
    RateLimitExceeded = 1029,
    InternalServerError = 1500,

    // 认证与用户
    AuthFailed = 2000,
    UserNotFound = 2001,
    UserAlreadyExists = 2002,
    UserNameInvalid = 2003,
    UserEmailInvalid = 2004,
    UserPasswordInvalid = 2005,
    UserPhoneInvalid = 2006,
    CanNotDeleteCurrentUser = 2007,

    // 基础数据
    WorkshopNotFound = 3001,
    CompanyNotFound = 3101,
    ContactNotFound = 3201,
    StudentNotFound = 3301,
    TutorNotFound = 3401,

    // 实习流程
    InternshipNotFound = 4001,
    InternshipStateInvalid = 4002,
    InternshipAlreadyOpen = 4003,
    InternshipDateInvalid = 4004,
    EvaluationInvalid = 4101,
    EvaluationMissing = 4102,
    GradeNotFound = 4201,
    ModuleNotFound = 4301,

    // 文档
    FileNotFound = 5001,
    FileUploadFailed = 5002,
    FileTypeNotAllowed = 5003,
    FileSizeExceeded = 5004,
    MultifileUploadNotAllowed = 5005,
}

impl ErrorCode {
    /// 错误码对应的 HTTP 状态
    pub fn http_status(self) -> actix_web::http::StatusCode {
        use ErrorCode::*;
        use actix_web::http::StatusCode;
        match self {
            Success => StatusCode::OK,
            Unauthorized | AuthFailed => StatusCode::UNAUTHORIZED,
            Forbidden => StatusCode::FORBIDDEN,
            NotFound | UserNotFound | WorkshopNotFound | CompanyNotFound | ContactNotFound
            | StudentNotFound | TutorNotFound | InternshipNotFound | GradeNotFound
            | ModuleNotFound | FileNotFound => StatusCode::NOT_FOUND,
            Conflict | UserAlreadyExists | InternshipStateInvalid | InternshipAlreadyOpen => {
                StatusCode::CONFLICT
            }
            FileSizeExceeded => StatusCode::PAYLOAD_TOO_LARGE,
            RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            InternalServerError | FileUploadFailed => StatusCode::INTERNAL_SERVER_ERROR,
            BadRequest | UserNameInvalid | UserEmailInvalid | UserPasswordInvalid
            | UserPhoneInvalid | CanNotDeleteCurrentUser | InternshipDateInvalid
            | EvaluationInvalid | EvaluationMissing | FileTypeNotAllowed
            | MultifileUploadNotAllowed => StatusCode::BAD_REQUEST,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values_are_stable() {
        assert_eq!(ErrorCode::Success as i32, 0);
        assert_eq!(ErrorCode::Unauthorized as i32, 1001);
        assert_eq!(ErrorCode::InternshipStateInvalid as i32, 4002);
    }

    #[test]
    fn test_http_status_mapping() {
        use actix_web::http::StatusCode;
        assert_eq!(ErrorCode::StudentNotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::Conflict.http_status(), StatusCode::CONFLICT);
        assert_eq!(ErrorCode::EvaluationInvalid.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::Forbidden.http_status(), StatusCode::FORBIDDEN);
        assert_eq!(
            ErrorCode::FileSizeExceeded.http_status(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
    }
}
