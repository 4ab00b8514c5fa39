use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::modules::requests::ModuleListParams;
use crate::services::ModuleService;
use crate::utils::SafeIDI64;

static MODULE_SERVICE: Lazy<ModuleService> = Lazy::new(ModuleService::new_lazy);

pub async fn list_modules(
    req: HttpRequest,
    query: web::Query<ModuleListParams>,
) -> ActixResult<HttpResponse> {
    MODULE_SERVICE.list_modules(query.into_inner(), &req).await
}

pub async fn get_module(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    MODULE_SERVICE.get_module(id.0, &req).await
}

pub fn configure_module_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/modules")
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_modules))
            .route("/{id}", web::get().to(get_module)),
    );
}
