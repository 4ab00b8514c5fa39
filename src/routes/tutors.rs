use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::tutors::requests::{CreateTutorRequest, TutorListParams, UpdateTutorRequest};
use crate::models::users::entities::UserRole;
use crate::services::TutorService;
use crate::utils::SafeIDI64;

static TUTOR_SERVICE: Lazy<TutorService> = Lazy::new(TutorService::new_lazy);

pub async fn list_tutors(
    req: HttpRequest,
    query: web::Query<TutorListParams>,
) -> ActixResult<HttpResponse> {
    TUTOR_SERVICE.list_tutors(query.into_inner(), &req).await
}

pub async fn get_tutor(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    TUTOR_SERVICE.get_tutor(id.0, &req).await
}

pub async fn create_tutor(
    req: HttpRequest,
    body: web::Json<CreateTutorRequest>,
) -> ActixResult<HttpResponse> {
    TUTOR_SERVICE.create_tutor(body.into_inner(), &req).await
}

pub async fn update_tutor(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<UpdateTutorRequest>,
) -> ActixResult<HttpResponse> {
    TUTOR_SERVICE
        .update_tutor(id.0, body.into_inner(), &req)
        .await
}

pub async fn delete_tutor(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    TUTOR_SERVICE.delete_tutor(id.0, &req).await
}

pub fn configure_tutor_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/tutors")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .guard(actix_web::guard::Get())
                    .wrap(middlewares::RequireRole::new_any(UserRole::reviewer_roles()))
                    .route(web::get().to(list_tutors)),
            )
            .service(
                web::resource("/{id}")
                    .guard(actix_web::guard::Get())
                    .wrap(middlewares::RequireRole::new_any(UserRole::reviewer_roles()))
                    .route(web::get().to(get_tutor)),
            )
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles()))
                    .route("", web::post().to(create_tutor))
                    .route("/{id}", web::put().to(update_tutor))
                    .route("/{id}", web::delete().to(delete_tutor)),
            ),
    );
}
