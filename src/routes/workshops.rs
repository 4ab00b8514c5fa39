use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::users::entities::UserRole;
use crate::models::workshops::requests::{
    CreateWorkshopRequest, UpdateWorkshopRequest, WorkshopListParams,
};
use crate::services::WorkshopService;
use crate::utils::SafeIDI64;

static WORKSHOP_SERVICE: Lazy<WorkshopService> = Lazy::new(WorkshopService::new_lazy);

pub async fn list_workshops(
    req: HttpRequest,
    query: web::Query<WorkshopListParams>,
) -> ActixResult<HttpResponse> {
    WORKSHOP_SERVICE.list_workshops(query.into_inner(), &req).await
}

pub async fn get_workshop(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    WORKSHOP_SERVICE.get_workshop(id.0, &req).await
}

pub async fn create_workshop(
    req: HttpRequest,
    body: web::Json<CreateWorkshopRequest>,
) -> ActixResult<HttpResponse> {
    WORKSHOP_SERVICE.create_workshop(body.into_inner(), &req).await
}

pub async fn update_workshop(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<UpdateWorkshopRequest>,
) -> ActixResult<HttpResponse> {
    WORKSHOP_SERVICE
        .update_workshop(id.0, body.into_inner(), &req)
        .await
}

pub async fn delete_workshop(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    WORKSHOP_SERVICE.delete_workshop(id.0, &req).await
}

pub fn configure_workshop_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/workshops")
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_workshops))
            .route("/{id}", web::get().to(get_workshop))
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles()))
                    .route("", web::post().to(create_workshop))
                    .route("/{id}", web::put().to(update_workshop))
                    .route("/{id}", web::delete().to(delete_workshop)),
            ),
    );
}
