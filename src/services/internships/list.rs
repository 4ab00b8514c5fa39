use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::InternshipService;
use crate::models::internships::requests::{InternshipListParams, InternshipListQuery};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::scope::Viewer;
use crate::services::{current_user, storage_error};

pub async fn list_internships(
    service: &InternshipService,
    params: InternshipListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;
    let viewer = match Viewer::resolve(&storage, &user).await {
        Ok(viewer) => viewer,
        Err(resp) => return Ok(resp),
    };

    let mut query = InternshipListQuery::from(params);
    viewer.restrict_internships(&mut query);

    match storage.list_internships_with_pagination(query).await {
        Ok(resp) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            resp,
            "Internship list retrieved successfully",
        ))),
        Err(e) => Ok(storage_error(&e, ErrorCode::InternshipNotFound)),
    }
}

pub async fn get_internship(
    service: &InternshipService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    match service.load_visible(&storage, id, request).await {
        Ok((_, internship)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            internship,
            "Internship retrieved successfully",
        ))),
        Err(resp) => Ok(resp),
    }
}
