use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::ErrorCode;

/// 统一的 API 响应信封：`code` 为业务错误码，0 表示成功
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/api.ts")]
pub struct ApiResponse<T: TS> {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl<T: TS> ApiResponse<T> {
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Success as i32,
            message: message.into(),
            data: Some(data),
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn error(code: ErrorCode, data: T, message: impl Into<String>) -> Self {
        Self {
            code: code as i32,
            message: message.into(),
            data: Some(data),
            timestamp: chrono::Utc::now(),
        }
    }
}

impl ApiResponse<()> {
    /// 直接构造带对应 HTTP 状态的错误响应
    pub fn reply(code: ErrorCode, message: impl Into<String>) -> actix_web::HttpResponse {
        actix_web::HttpResponse::build(code.http_status()).json(Self::error_empty(code, message))
    }

    pub fn success_empty(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Success as i32,
            message: message.into(),
            data: None,
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn error_empty(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code as i32,
            message: message.into(),
            data: None,
            timestamp: chrono::Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_payload_is_omitted() {
        let body = serde_json::to_value(ApiResponse::error_empty(
            ErrorCode::InternshipNotFound,
            "Internship not found",
        ))
        .unwrap();
        assert_eq!(body["code"], 4001);
        assert!(body.get("data").is_none());
        assert!(body["timestamp"].is_string());
    }

    #[test]
    fn test_reply_uses_code_status() {
        let resp = ApiResponse::reply(ErrorCode::InternshipAlreadyOpen, "open");
        assert_eq!(resp.status(), actix_web::http::StatusCode::CONFLICT);
    }
}
