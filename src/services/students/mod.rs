pub mod create;
pub mod read;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::students::requests::{
    CreateStudentRequest, StudentListParams, UpdateStudentRequest,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::storage_error;
use crate::storage::Storage;
use crate::utils::validate::{validate_phone, validate_required_text};

pub struct StudentService {
    storage: Option<Arc<dyn Storage>>,
}

/// 姓名与电话校验，导师档案也用同一套规则
pub(crate) fn validate_person(
    first_name: Option<&str>,
    last_name: Option<&str>,
    phone: Option<&str>,
) -> Result<(), HttpResponse> {
    for (field, value) in [("first_name", first_name), ("last_name", last_name)] {
        if let Some(value) = value {
            validate_required_text(field, value, 100)
                .map_err(|msg| ApiResponse::reply(ErrorCode::BadRequest, msg))?;
        }
    }
    if let Some(phone) = phone.filter(|p| !p.trim().is_empty()) {
        validate_phone(phone).map_err(|msg| ApiResponse::reply(ErrorCode::UserPhoneInvalid, msg))?;
    }
    Ok(())
}

impl StudentService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        super::resolve_storage(&self.storage, request)
    }

    pub async fn list_students(
        &self,
        query: StudentListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        read::list_students(self, query, request).await
    }

    pub async fn get_student(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        read::get_student(self, id, request).await
    }

    pub async fn get_own_student(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        read::get_own_student(self, request).await
    }

    pub async fn create_student(
        &self,
        req: CreateStudentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_student(self, req, request).await
    }

    pub async fn update_student(
        &self,
        id: i64,
        req: UpdateStudentRequest,
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
        match storage.update_student(id, req).await {
            Ok(Some(student)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                student,
                "Student updated successfully",
            ))),
            Ok(None) => Ok(ApiResponse::reply(ErrorCode::StudentNotFound, "Student not found")),
            Err(e) => Ok(storage_error(&e, ErrorCode::StudentNotFound)),
        }
    }

    /// 同时停用学生的登录账号
    pub async fn delete_student(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        match storage.delete_student(id).await {
            Ok(true) => Ok(HttpResponse::Ok()
                .json(ApiResponse::success_empty("Student deleted successfully"))),
            Ok(false) => Ok(ApiResponse::reply(ErrorCode::StudentNotFound, "Student not found")),
            Err(e) => Ok(storage_error(&e, ErrorCode::StudentNotFound)),
        }
    }
}
