//! 安全的路径参数提取器
//!
//! 路径参数解析失败时直接返回统一格式的 400 响应，而不是 actix 默认的纯文本错误。

use actix_web::{FromRequest, HttpRequest, HttpResponse, dev::Payload, error::InternalError};
use std::future::{Ready, ready};

use crate::models::{ApiResponse, ErrorCode};

fn bad_path_param(name: &str, raw: &str) -> actix_web::Error {
    let response = HttpResponse::BadRequest().json(ApiResponse::error_empty(
        ErrorCode::BadRequest,
        format!("Invalid path parameter `{name}`: {raw}"),
    ));
    InternalError::from_response(format!("invalid path parameter {name}"), response).into()
}

/// 定义一个从路径中提取正整数 ID 的提取器
macro_rules! define_safe_i64_extractor {
    ($name:ident, $param:literal) => {
        #[derive(Debug, Clone, Copy)]
        pub struct $name(pub i64);

        impl FromRequest for $name {
            type Error = actix_web::Error;
            type Future = Ready<Result<Self, Self::Error>>;

            fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
                let raw = req.match_info().get($param).unwrap_or_default();
                ready(match parse_positive_id(raw) {
                    Some(id) => Ok($name(id)),
                    None => Err(bad_path_param($param, raw)),
                })
            }
        }
    };
}

/// 解析正整数 ID
pub fn parse_positive_id(raw: &str) -> Option<i64> {
    raw.parse::<i64>().ok().filter(|id| *id > 0)
}

define_safe_i64_extractor!(SafeIDI64, "id");
define_safe_i64_extractor!(SafeWorkshopIdI64, "workshop_id");

/// 文档下载令牌（32 位十六进制）
#[derive(Debug, Clone)]
pub struct SafeDownloadToken(pub String);

impl FromRequest for SafeDownloadToken {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let raw = req.match_info().get("token").unwrap_or_default();
        let valid = raw.len() == 32 && raw.chars().all(|c| c.is_ascii_hexdigit());
        ready(if valid {
            Ok(SafeDownloadToken(raw.to_ascii_lowercase()))
        } else {
            Err(bad_path_param("token", raw))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_positive_id() {
        assert_eq!(parse_positive_id("42"), Some(42));
        assert_eq!(parse_positive_id("0"), None);
        assert_eq!(parse_positive_id("-1"), None);
        assert_eq!(parse_positive_id("abc"), None);
        assert_eq!(parse_positive_id("99999999999999999999"), None);
        assert_eq!(parse_positive_id(""), None);
    }
}
