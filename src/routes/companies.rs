use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::companies::requests::{
    CompanyListParams, CreateCompanyRequest, UpdateCompanyRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::CompanyService;
use crate::utils::SafeIDI64;

static COMPANY_SERVICE: Lazy<CompanyService> = Lazy::new(CompanyService::new_lazy);

pub async fn list_companies(
    req: HttpRequest,
    query: web::Query<CompanyListParams>,
) -> ActixResult<HttpResponse> {
    COMPANY_SERVICE.list_companies(query.into_inner(), &req).await
}

pub async fn get_company(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    COMPANY_SERVICE.get_company(id.0, &req).await
}

pub async fn create_company(
    req: HttpRequest,
    body: web::Json<CreateCompanyRequest>,
) -> ActixResult<HttpResponse> {
    COMPANY_SERVICE.create_company(body.into_inner(), &req).await
}

// 企业账号可以修改自己的企业，归属在业务层判断
pub async fn update_company(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<UpdateCompanyRequest>,
) -> ActixResult<HttpResponse> {
    COMPANY_SERVICE
        .update_company(id.0, body.into_inner(), &req)
        .await
}

pub async fn delete_company(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    COMPANY_SERVICE.delete_company(id.0, &req).await
}

pub fn configure_company_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/companies")
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_companies))
            .route("/{id}", web::get().to(get_company))
            .route("/{id}", web::put().to(update_company))
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles()))
                    .route("", web::post().to(create_company))
                    .route("/{id}", web::delete().to(delete_company)),
            ),
    );
}
