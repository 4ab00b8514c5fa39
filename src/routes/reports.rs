use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::users::entities::UserRole;
use crate::services::ReportService;
use crate::utils::SafeWorkshopIdI64;

static REPORT_SERVICE: Lazy<ReportService> = Lazy::new(ReportService::new_lazy);

pub async fn summary(req: HttpRequest) -> ActixResult<HttpResponse> {
    REPORT_SERVICE.summary(&req).await
}

pub async fn workshop_report(
    req: HttpRequest,
    workshop_id: SafeWorkshopIdI64,
) -> ActixResult<HttpResponse> {
    REPORT_SERVICE.workshop_report(workshop_id.0, &req).await
}

pub fn configure_report_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/reports")
            .wrap(middlewares::RequireJWT)
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::reviewer_roles()))
                    .route("/summary", web::get().to(summary))
                    .route("/workshops/{workshop_id}", web::get().to(workshop_report)),
            ),
    );
}
