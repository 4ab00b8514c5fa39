use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use tracing::info;

use crate::models::tutors::requests::{
    CreateTutorRequest, TutorListParams, TutorListQuery, UpdateTutorRequest,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::students::validate_person;
use crate::services::storage_error;
use crate::services::users::prepare_account;
use crate::storage::Storage;

pub struct TutorService {
    storage: Option<Arc<dyn Storage>>,
}

impl TutorService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        super::resolve_storage(&self.storage, request)
    }

    pub async fn list_tutors(
        &self,
        query: TutorListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        match storage
            .list_tutors_with_pagination(TutorListQuery::from(query))
            .await
        {
            Ok(resp) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                resp,
                "Tutor list retrieved successfully",
            ))),
            Err(e) => Ok(storage_error(&e, ErrorCode::TutorNotFound)),
        }
    }

    pub async fn get_tutor(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        match storage.get_tutor_by_id(id).await {
            Ok(Some(tutor)) => Ok(HttpResponse::Ok()
                .json(ApiResponse::success(tutor, "Tutor retrieved successfully"))),
            Ok(None) => Ok(ApiResponse::reply(ErrorCode::TutorNotFound, "Tutor not found")),
            Err(e) => Ok(storage_error(&e, ErrorCode::TutorNotFound)),
        }
    }

    pub async fn create_tutor(
        &self,
        mut req: CreateTutorRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        req.username = req.username.trim().to_string();
        req.email = req.email.trim().to_lowercase();
        req.first_name = req.first_name.trim().to_string();
        req.last_name = req.last_name.trim().to_string();

        if let Err(resp) = validate_person(
            Some(&req.first_name),
            Some(&req.last_name),
            req.phone.as_deref(),
        ) {
            return Ok(resp);
        }
        req.password = match prepare_account(&req.username, &req.email, &req.password, None) {
            Ok(hash) => hash,
            Err(resp) => return Ok(resp),
        };

        let storage = self.get_storage(request)?;
        match storage.create_tutor(req).await {
            Ok(tutor) => {
                info!("Tutor {} created for workshop {}", tutor.id, tutor.workshop_id);
                Ok(HttpResponse::Created()
                    .json(ApiResponse::success(tutor, "Tutor created successfully")))
            }
            Err(e) => Ok(storage_error(&e, ErrorCode::WorkshopNotFound)),
        }
    }

    pub async fn update_tutor(
        &self,
        id: i64,
        req: UpdateTutorRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        if let Err(resp) = validate_person(
            req.first_name.as_deref(),
            req.last_name.as_deref(),
            req.phone.as_deref(),
        ) {
            return Ok(resp);
        }

        let storage = self.get_storage(request)?;
        match storage.update_tutor(id, req).await {
            Ok(Some(tutor)) => Ok(HttpResponse::Ok()
                .json(ApiResponse::success(tutor, "Tutor updated successfully"))),
            Ok(None) => Ok(ApiResponse::reply(ErrorCode::TutorNotFound, "Tutor not found")),
            Err(e) => Ok(storage_error(&e, ErrorCode::TutorNotFound)),
        }
    }

    pub async fn delete_tutor(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        match storage.delete_tutor(id).await {
            Ok(true) => Ok(HttpResponse::Ok()
                .json(ApiResponse::success_empty("Tutor deleted successfully"))),
            Ok(false) => Ok(ApiResponse::reply(ErrorCode::TutorNotFound, "Tutor not found")),
            Err(e) => Ok(storage_error(&e, ErrorCode::TutorNotFound)),
        }
    }
}
