/*!
 * 固定窗口速率限制中间件
 *
 * ```rust,ignore
 * web::resource("/login")
 *     .wrap(middlewares::RateLimit::login())
 *     .route(web::post().to(login))
 * ```
 *
 * 已认证请求按用户 ID 计数，否则按客户端 IP 计数；
 * 超过限制返回 429，并带上 `Retry-After`。
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    http::header::CONTENT_TYPE,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use moka::future::Cache;
use once_cell::sync::Lazy;
use std::rc::Rc;
use std::time::{Duration, Instant};
use tracing::warn;

use crate::models::{ApiResponse, ErrorCode};

/// 计数窗口：(窗口开始时间, 请求数)
///
/// 各 worker 共享同一份计数，条目在最长窗口后自动过期。
static RATE_LIMIT_CACHE: Lazy<Cache<String, (Instant, u32)>> = Lazy::new(|| {
    Cache::builder()
        .time_to_live(Duration::from_secs(15 * 60))
        .max_capacity(100_000)
        .build()
});

#[derive(Clone)]
pub struct RateLimit {
    max_requests: u32,
    window_secs: u64,
    key_prefix: &'static str,
}

impl RateLimit {
    pub fn new(key_prefix: &'static str, max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window_secs,
            key_prefix,
        }
    }

    /// 登录：每 IP 每分钟 5 次
    pub fn login() -> Self {
        Self::new("login", 5, 60)
    }

    /// 刷新令牌：每分钟 10 次
    pub fn refresh_token() -> Self {
        Self::new("refresh", 10, 60)
    }

    /// 文档上传：每用户每分钟 10 次
    pub fn document_upload() -> Self {
        Self::new("upload", 10, 60)
    }
}

/// 在窗口内记一次请求，返回 `Some(剩余次数)`；超限时返回 `None`
fn register_hit(
    entry: Option<(Instant, u32)>,
    now: Instant,
    max_requests: u32,
    window: Duration,
) -> Option<(Instant, u32)> {
    let (started, count) = match entry {
        Some((started, count)) if now.duration_since(started) < window => (started, count),
        _ => (now, 0),
    };
    if count >= max_requests {
        return None;
    }
    Some((started, count + 1))
}

/// 从请求中提取客户端 IP
///
/// 安全注意事项：
/// - 如果服务部署在反向代理后面，需要在反向代理中配置正确的 X-Forwarded-For / X-Real-IP 头
/// - 此实现会验证 IP 格式，防止伪造的无效头导致问题
/// - 在不可信网络中直接暴露服务时，攻击者可能伪造转发头来绕过限制
fn extract_client_ip(req: &ServiceRequest) -> String {
    // 尝试从连接信息获取真实 IP（最可信）
    let connection_ip = req
        .connection_info()
        .realip_remote_addr()
        .map(|s| s.to_string());

    // 如果连接信息有有效 IP，优先使用
    if let Some(ref ip) = connection_ip
        && is_valid_ip(ip)
    {
        return ip.clone();
    }

    // 从 X-Forwarded-For 头获取（用于反向代理场景）
    // 只取第一个 IP（最接近客户端的）
    if let Some(forwarded) = req.headers().get("X-Forwarded-For")
        && let Ok(value) = forwarded.to_str()
        && let Some(ip) = value.split(',').next()
    {
        let ip = ip.trim();
        if is_valid_ip(ip) {
            return ip.to_string();
        }
    }

    // 从 X-Real-IP 头获取
    if let Some(real_ip) = req.headers().get("X-Real-IP")
        && let Ok(ip) = real_ip.to_str()
    {
        let ip = ip.trim();
        if is_valid_ip(ip) {
            return ip.to_string();
        }
    }

    // 如果都没有有效 IP，使用连接信息的默认值
    connection_ip.unwrap_or_else(|| "unknown".to_string())
}

/// 验证 IP 地址格式是否有效
fn is_valid_ip(ip: &str) -> bool {
    use std::net::IpAddr;
    ip.parse::<IpAddr>().is_ok()
}

/// 从请求中提取用户 ID（如果已认证）
fn extract_user_id(req: &ServiceRequest) -> Option<i64> {
    use crate::models::users::entities::User;
    req.extensions().get::<User>().map(|user| user.id)
}

fn create_rate_limit_response(retry_after: u64) -> HttpResponse {
    HttpResponse::build(StatusCode::TOO_MANY_REQUESTS)
        .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
        .insert_header(("Retry-After", retry_after.to_string()))
        .json(ApiResponse::<()>::error_empty(
            ErrorCode::RateLimitExceeded,
            "Too many requests, please try again later",
        ))
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service: Rc::new(service),
            limit: self.clone(),
        }))
    }
}

pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    limit: RateLimit,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let limit = self.limit.clone();

        Box::pin(async move {
            let identifier = extract_user_id(&req)
                .map(|id| format!("user:{id}"))
                .unwrap_or_else(|| format!("ip:{}", extract_client_ip(&req)));
            let cache_key = format!("{}:{}", limit.key_prefix, identifier);

            let window = Duration::from_secs(limit.window_secs);
            let entry = RATE_LIMIT_CACHE.get(&cache_key).await;
            match register_hit(entry, Instant::now(), limit.max_requests, window) {
                Some(next) => {
                    RATE_LIMIT_CACHE.insert(cache_key, next).await;
                    Ok(srv.call(req).await?.map_into_left_body())
                }
                None => {
                    warn!(
                        "Rate limit exceeded for {} ({} per {}s)",
                        cache_key, limit.max_requests, limit.window_secs
                    );
                    Ok(req.into_response(
                        create_rate_limit_response(limit.window_secs).map_into_right_body(),
                    ))
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        let login = RateLimit::login();
        assert_eq!((login.max_requests, login.window_secs), (5, 60));
        assert_eq!(login.key_prefix, "login");
        assert_eq!(RateLimit::document_upload().max_requests, 10);
    }

    #[test]
    fn test_window_counts_and_blocks() {
        let window = Duration::from_secs(60);
        let t0 = Instant::now();

        let mut entry = None;
        for _ in 0..3 {
            entry = register_hit(entry, t0, 3, window);
            assert!(entry.is_some());
        }
        assert_eq!(entry.map(|(_, c)| c), Some(3));
        assert!(register_hit(entry, t0 + Duration::from_secs(30), 3, window).is_none());

        // 窗口结束后重新计数
        let reset = register_hit(entry, t0 + Duration::from_secs(61), 3, window);
        assert_eq!(reset.map(|(_, c)| c), Some(1));
    }
}
