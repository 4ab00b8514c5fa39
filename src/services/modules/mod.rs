use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::modules::entities::InternshipModule;
use crate::models::modules::requests::{ModuleListParams, ModuleListQuery};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::scope::Viewer;
use crate::services::{current_user, storage_error};
use crate::storage::Storage;

pub struct ModuleService {
    storage: Option<Arc<dyn Storage>>,
}

fn can_see_module(viewer: &Viewer, module: &InternshipModule) -> bool {
    match viewer {
        Viewer::Staff => true,
        Viewer::Student(s) => s.id == module.student_id,
        Viewer::Tutor(t) => t.workshop_id == module.workshop_id,
        Viewer::Company(_) => false,
    }
}

impl ModuleService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        super::resolve_storage(&self.storage, request)
    }

    pub async fn list_modules(
        &self,
        params: ModuleListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let user = match current_user(request) {
            Ok(user) => user,
            Err(resp) => return Ok(resp),
        };
        let storage = self.get_storage(request)?;
        let mut query = ModuleListQuery::from(params);

        match Viewer::resolve(&storage, &user).await {
            Ok(Viewer::Staff) => {}
            Ok(Viewer::Student(student)) => query.student_id = Some(student.id),
            Ok(Viewer::Tutor(tutor)) => query.workshop_id = Some(tutor.workshop_id),
            Ok(Viewer::Company(_)) => {
                return Ok(ApiResponse::reply(ErrorCode::Forbidden, "Access denied"));
            }
            Err(resp) => return Ok(resp),
        }

        match storage.list_modules_with_pagination(query).await {
            Ok(resp) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                resp,
                "Module list retrieved successfully",
            ))),
            Err(e) => Ok(storage_error(&e, ErrorCode::ModuleNotFound)),
        }
    }

    pub async fn get_module(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let user = match current_user(request) {
            Ok(user) => user,
            Err(resp) => return Ok(resp),
        };
        let storage = self.get_storage(request)?;
        let viewer = match Viewer::resolve(&storage, &user).await {
            Ok(viewer) => viewer,
            Err(resp) => return Ok(resp),
        };

        match storage.get_module_by_id(id).await {
            Ok(Some(module)) if can_see_module(&viewer, &module) => Ok(HttpResponse::Ok()
                .json(ApiResponse::success(module, "Module retrieved successfully"))),
            Ok(_) => Ok(ApiResponse::reply(ErrorCode::ModuleNotFound, "Module not found")),
            Err(e) => Ok(storage_error(&e, ErrorCode::ModuleNotFound)),
        }
    }
}
