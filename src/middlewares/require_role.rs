/*!
 * 基于角色的访问控制中间件
 *
 * 必须套在 `RequireJWT` 之内使用，只检查当前用户的角色是否在允许列表中。
 *
 * ```rust,ignore
 * web::scope("")
 *     .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles()))
 *     .route("", web::post().to(create_workshop))
 * ```
 *
 * 资源级别的归属判断（例如企业只能修改自己的企业）由业务层完成。
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::info;

use crate::models::{
    ErrorCode,
    users::entities::{User, UserRole},
};

use super::create_error_response;

#[derive(Clone)]
pub struct RequireRole {
    allowed: Vec<UserRole>,
}

impl RequireRole {
    /// 允许列表中任一角色访问
    pub fn new_any(roles: &[&UserRole]) -> Self {
        Self {
            allowed: roles.iter().map(|r| (*r).clone()).collect(),
        }
    }

    pub(crate) fn permits(&self, role: &UserRole) -> bool {
        self.allowed.contains(role)
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireRoleMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRoleMiddleware {
            service: Rc::new(service),
            policy: Rc::new(self.clone()),
        }))
    }
}

pub struct RequireRoleMiddleware<S> {
    service: Rc<S>,
    policy: Rc<RequireRole>,
}

impl<S, B> Service<ServiceRequest> for RequireRoleMiddleware<S>
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
        let policy = self.policy.clone();

        Box::pin(async move {
            let current = req
                .extensions()
                .get::<User>()
                .map(|user| (user.id, user.role.clone()));

            match current {
                Some((_, role)) if policy.permits(&role) => {
                    Ok(srv.call(req).await?.map_into_left_body())
                }
                Some((user_id, role)) => {
                    info!(
                        "Access denied for user {} (role: {}), allowed: {:?}",
                        user_id, role, policy.allowed
                    );
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::FORBIDDEN,
                            ErrorCode::Forbidden,
                            "Access denied",
                        )
                        .map_into_right_body(),
                    ))
                }
                None => {
                    info!("Role check without an authenticated user on {}", req.path());
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::UNAUTHORIZED,
                            ErrorCode::Unauthorized,
                            "Authentication required",
                        )
                        .map_into_right_body(),
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
    fn test_staff_policy() {
        let policy = RequireRole::new_any(UserRole::staff_roles());
        assert!(policy.permits(&UserRole::Admin));
        assert!(policy.permits(&UserRole::Supervisor));
        assert!(!policy.permits(&UserRole::Tutor));
        assert!(!policy.permits(&UserRole::Student));
    }

    #[test]
    fn test_evaluator_policy_excludes_students() {
        let policy = RequireRole::new_any(UserRole::evaluator_roles());
        assert!(policy.permits(&UserRole::Company));
        assert!(policy.permits(&UserRole::Tutor));
        assert!(!policy.permits(&UserRole::Student));
    }

    fn user_with(role: UserRole) -> User {
        let now = chrono::Utc::now();
        User {
            id: 1,
            username: "someone".to_string(),
            email: "someone@example.com".to_string(),
            phone: None,
            password_hash: String::new(),
            role,
            status: crate::models::RecordStatus::Activo,
            display_name: None,
            last_login: None,
            created_at: now,
            updated_at: now,
        }
    }

    async fn status_for(current: Option<User>) -> StatusCode {
        use actix_web::{App, HttpResponse, test, web};

        let app = test::init_service(
            App::new()
                .wrap(RequireRole::new_any(UserRole::staff_roles()))
                .wrap_fn(move |req, srv| {
                    if let Some(user) = current.clone() {
                        req.extensions_mut().insert(user);
                    }
                    srv.call(req)
                })
                .route(
                    "/workshops",
                    web::post().to(|| async { HttpResponse::Created().finish() }),
                ),
        )
        .await;
        let req = test::TestRequest::post().uri("/workshops").to_request();
        test::call_service(&app, req).await.status()
    }

    #[actix_web::test]
    async fn test_role_gate_statuses() {
        assert_eq!(status_for(Some(user_with(UserRole::Admin))).await, StatusCode::CREATED);
        assert_eq!(
            status_for(Some(user_with(UserRole::Student))).await,
            StatusCode::FORBIDDEN
        );
        assert_eq!(status_for(None).await, StatusCode::UNAUTHORIZED);
    }
}
