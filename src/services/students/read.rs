use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::StudentService;
use crate::models::students::requests::{StudentListParams, StudentListQuery};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::scope::Viewer;
use crate::services::{current_user, storage_error};

pub async fn list_students(
    service: &StudentService,
    params: StudentListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;
    let mut query = StudentListQuery::from(params);

    match Viewer::resolve(&storage, &user).await {
        Ok(Viewer::Staff) => {}
        // 导师只能看到本工坊的学生
        Ok(Viewer::Tutor(tutor)) => query.workshop_id = Some(tutor.workshop_id),
        Ok(_) => {
            return Ok(ApiResponse::reply(ErrorCode::Forbidden, "Access denied"));
        }
        Err(resp) => return Ok(resp),
    }

    match storage.list_students_with_pagination(query).await {
        Ok(resp) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            resp,
            "Student list retrieved successfully",
        ))),
        Err(e) => Ok(storage_error(&e, ErrorCode::StudentNotFound)),
    }
}

pub async fn get_student(
    service: &StudentService,
    id: i64,
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

    let student = match storage.get_student_by_id(id).await {
        Ok(Some(student)) => student,
        Ok(None) => {
            return Ok(ApiResponse::reply(ErrorCode::StudentNotFound, "Student not found"));
        }
        Err(e) => return Ok(storage_error(&e, ErrorCode::StudentNotFound)),
    };

    let visible = match &viewer {
        Viewer::Staff => true,
        Viewer::Tutor(tutor) => tutor.workshop_id == student.workshop_id,
        Viewer::Student(own) => own.id == student.id,
        Viewer::Company(_) => false,
    };
    if !visible {
        return Ok(ApiResponse::reply(ErrorCode::Forbidden, "Access denied"));
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        student,
        "Student retrieved successfully",
    )))
}

pub async fn get_own_student(
    service: &StudentService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;

    match storage.get_student_by_user_id(user.id).await {
        Ok(Some(student)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            student,
            "Student retrieved successfully",
        ))),
        Ok(None) => Ok(ApiResponse::reply(
            ErrorCode::StudentNotFound,
            "No student profile is linked to this account",
        )),
        Err(e) => Ok(storage_error(&e, ErrorCode::StudentNotFound)),
    }
}
