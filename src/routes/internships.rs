use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::evaluations::requests::UpsertEvaluationRequest;
use crate::models::internships::requests::{
    CloseAllInternshipsRequest, CreateInternshipRequest, InternshipListParams,
    UpdateInternshipRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::{EvaluationService, InternshipService};
use crate::utils::SafeIDI64;

static INTERNSHIP_SERVICE: Lazy<InternshipService> = Lazy::new(InternshipService::new_lazy);
static EVALUATION_SERVICE: Lazy<EvaluationService> = Lazy::new(EvaluationService::new_lazy);

// 列表按角色限定范围
pub async fn list_internships(
    req: HttpRequest,
    query: web::Query<InternshipListParams>,
) -> ActixResult<HttpResponse> {
    INTERNSHIP_SERVICE
        .list_internships(query.into_inner(), &req)
        .await
}

pub async fn get_internship(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    INTERNSHIP_SERVICE.get_internship(id.0, &req).await
}

pub async fn create_internship(
    req: HttpRequest,
    body: web::Json<CreateInternshipRequest>,
) -> ActixResult<HttpResponse> {
    INTERNSHIP_SERVICE
        .create_internship(body.into_inner(), &req)
        .await
}

pub async fn update_internship(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<UpdateInternshipRequest>,
) -> ActixResult<HttpResponse> {
    INTERNSHIP_SERVICE
        .update_internship(id.0, body.into_inner(), &req)
        .await
}

pub async fn start_internship(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    INTERNSHIP_SERVICE.start_internship(id.0, &req).await
}

// DELETE 即取消
pub async fn cancel_internship(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    INTERNSHIP_SERVICE.cancel_internship(id.0, &req).await
}

pub async fn get_grade(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    INTERNSHIP_SERVICE.get_grade(id.0, &req).await
}

pub async fn preview_grade(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    INTERNSHIP_SERVICE.preview_grade(id.0, &req).await
}

pub async fn save_grade(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    INTERNSHIP_SERVICE.save_grade(id.0, &req).await
}

pub async fn close_internship(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    INTERNSHIP_SERVICE.close_internship(id.0, &req).await
}

pub async fn close_all(
    req: HttpRequest,
    body: Option<web::Json<CloseAllInternshipsRequest>>,
) -> ActixResult<HttpResponse> {
    let body = body.map(|b| b.into_inner()).unwrap_or_default();
    INTERNSHIP_SERVICE.close_all(body, &req).await
}

pub async fn list_evaluations(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    EVALUATION_SERVICE.list_evaluations(id.0, &req).await
}

pub async fn upsert_evaluation(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<UpsertEvaluationRequest>,
) -> ActixResult<HttpResponse> {
    EVALUATION_SERVICE
        .upsert_evaluation(id.0, body.into_inner(), &req)
        .await
}

pub fn configure_internship_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/internships")
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_internships))
            .route("/{id}", web::get().to(get_internship))
            .route("/{id}/grade", web::get().to(get_grade))
            .route("/{id}/grade/preview", web::get().to(preview_grade))
            .route("/{id}/evaluations", web::get().to(list_evaluations))
            .service(
                web::resource("/{id}/evaluation")
                    .wrap(middlewares::RequireRole::new_any(UserRole::evaluator_roles()))
                    .route(web::put().to(upsert_evaluation)),
            )
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles()))
                    .route("", web::post().to(create_internship))
                    .route("/close-all", web::post().to(close_all))
                    .route("/{id}", web::put().to(update_internship))
                    .route("/{id}", web::delete().to(cancel_internship))
                    .route("/{id}/start", web::post().to(start_internship))
                    .route("/{id}/grade", web::post().to(save_grade))
                    .route("/{id}/close", web::post().to(close_internship)),
            ),
    );
}
