use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{StudentService, validate_person};
use crate::models::students::requests::CreateStudentRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::storage_error;
use crate::services::users::prepare_account;

pub async fn create_student(
    service: &StudentService,
    mut req: CreateStudentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    req.username = req.username.trim().to_string();
    req.email = req.email.trim().to_lowercase();
    req.first_name = req.first_name.trim().to_string();
    req.last_name = req.last_name.trim().to_string();
    req.document_id = req
        .document_id
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());

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

    let storage = service.get_storage(request)?;
    match storage.create_student(req).await {
        Ok(student) => {
            info!(
                "Student {} created in workshop {}",
                student.id, student.workshop_id
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                student,
                "Student created successfully",
            )))
        }
        // 工坊不存在时存储层返回 Validation
        Err(e) => Ok(storage_error(&e, ErrorCode::WorkshopNotFound)),
    }
}
