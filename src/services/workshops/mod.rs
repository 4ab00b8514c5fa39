use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::workshops::requests::{
    CreateWorkshopRequest, UpdateWorkshopRequest, WorkshopListParams, WorkshopListQuery,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::storage_error;
use crate::storage::Storage;
use crate::utils::validate::validate_required_text;

pub struct WorkshopService {
    storage: Option<Arc<dyn Storage>>,
}

fn validate_name_and_code(name: Option<&str>, code: Option<&str>) -> Result<(), HttpResponse> {
    if let Some(name) = name {
        validate_required_text("name", name, 100)
            .map_err(|msg| ApiResponse::reply(ErrorCode::BadRequest, msg))?;
    }
    if let Some(code) = code {
        validate_required_text("code", code, 20)
            .map_err(|msg| ApiResponse::reply(ErrorCode::BadRequest, msg))?;
    }
    Ok(())
}

impl WorkshopService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        super::resolve_storage(&self.storage, request)
    }

    pub async fn list_workshops(
        &self,
        query: WorkshopListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        match storage
            .list_workshops_with_pagination(WorkshopListQuery::from(query))
            .await
        {
            Ok(resp) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                resp,
                "Workshop list retrieved successfully",
            ))),
            Err(e) => Ok(storage_error(&e, ErrorCode::WorkshopNotFound)),
        }
    }

    pub async fn get_workshop(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        match storage.get_workshop_by_id(id).await {
            Ok(Some(workshop)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                workshop,
                "Workshop retrieved successfully",
            ))),
            Ok(None) => Ok(ApiResponse::reply(
                ErrorCode::WorkshopNotFound,
                "Workshop not found",
            )),
            Err(e) => Ok(storage_error(&e, ErrorCode::WorkshopNotFound)),
        }
    }

    pub async fn create_workshop(
        &self,
        mut req: CreateWorkshopRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        req.name = req.name.trim().to_string();
        req.code = req.code.trim().to_uppercase();
        if let Err(resp) = validate_name_and_code(Some(&req.name), Some(&req.code)) {
            return Ok(resp);
        }

        let storage = self.get_storage(request)?;
        match storage.create_workshop(req).await {
            Ok(workshop) => Ok(HttpResponse::Created().json(ApiResponse::success(
                workshop,
                "Workshop created successfully",
            ))),
            Err(e) => Ok(storage_error(&e, ErrorCode::WorkshopNotFound)),
        }
    }

    pub async fn update_workshop(
        &self,
        id: i64,
        mut req: UpdateWorkshopRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        if let Some(code) = req.code.as_mut() {
            *code = code.trim().to_uppercase();
        }
        if let Err(resp) = validate_name_and_code(req.name.as_deref(), req.code.as_deref()) {
            return Ok(resp);
        }

        let storage = self.get_storage(request)?;
        match storage.update_workshop(id, req).await {
            Ok(Some(workshop)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                workshop,
                "Workshop updated successfully",
            ))),
            Ok(None) => Ok(ApiResponse::reply(
                ErrorCode::WorkshopNotFound,
                "Workshop not found",
            )),
            Err(e) => Ok(storage_error(&e, ErrorCode::WorkshopNotFound)),
        }
    }

    pub async fn delete_workshop(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        match storage.delete_workshop(id).await {
            Ok(true) => Ok(HttpResponse::Ok()
                .json(ApiResponse::success_empty("Workshop deleted successfully"))),
            Ok(false) => Ok(ApiResponse::reply(
                ErrorCode::WorkshopNotFound,
                "Workshop not found",
            )),
            Err(e) => Ok(storage_error(&e, ErrorCode::WorkshopNotFound)),
        }
    }
}
