use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::InternshipService;
use crate::errors::IMSystemError;
use crate::models::internships::entities::InternshipStatus;
use crate::models::internships::requests::{CreateInternshipRequest, UpdateInternshipRequest};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, storage_error};

fn validate_schedule(
    start: Option<chrono::DateTime<chrono::Utc>>,
    end: Option<chrono::DateTime<chrono::Utc>>,
    hours_required: Option<i32>,
) -> Result<(), HttpResponse> {
    if let (Some(start), Some(end)) = (start, end)
        && end < start
    {
        return Err(ApiResponse::reply(
            ErrorCode::InternshipDateInvalid,
            "end_date must not be before start_date",
        ));
    }
    if hours_required.is_some_and(|h| h <= 0) {
        return Err(ApiResponse::reply(
            ErrorCode::BadRequest,
            "hours_required must be positive",
        ));
    }
    Ok(())
}

pub async fn create_internship(
    service: &InternshipService,
    req: CreateInternshipRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    if let Err(resp) = validate_schedule(Some(req.start_date), Some(req.end_date), req.hours_required)
    {
        return Ok(resp);
    }

    let storage = service.get_storage(request)?;
    match storage.create_internship(req, user.id).await {
        Ok(internship) => {
            info!(
                "Internship {} created for student {} by user {}",
                internship.id, internship.student_id, user.id
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                internship,
                "Internship created successfully",
            )))
        }
        Err(IMSystemError::Conflict(msg)) => {
            Ok(ApiResponse::reply(ErrorCode::InternshipAlreadyOpen, msg))
        }
        Err(e) => Ok(storage_error(&e, ErrorCode::StudentNotFound)),
    }
}

pub async fn update_internship(
    service: &InternshipService,
    id: i64,
    req: UpdateInternshipRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Err(resp) = validate_schedule(req.start_date, req.end_date, req.hours_required) {
        return Ok(resp);
    }

    let storage = service.get_storage(request)?;
    match storage.update_internship(id, req).await {
        Ok(Some(internship)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            internship,
            "Internship updated successfully",
        ))),
        Ok(None) => Ok(ApiResponse::reply(
            ErrorCode::InternshipNotFound,
            "Internship not found",
        )),
        // 日期倒置或引用无效时存储层返回 Validation
        Err(e) => Ok(storage_error(&e, ErrorCode::InternshipNotFound)),
    }
}

async fn transition(
    service: &InternshipService,
    id: i64,
    next: InternshipStatus,
    message: &'static str,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    match storage.transition_internship(id, next).await {
        Ok(Some(internship)) => {
            info!("Internship {} moved to {}", id, next);
            Ok(HttpResponse::Ok().json(ApiResponse::success(internship, message)))
        }
        Ok(None) => Ok(ApiResponse::reply(
            ErrorCode::InternshipNotFound,
            "Internship not found",
        )),
        Err(e) => Ok(storage_error(&e, ErrorCode::InternshipNotFound)),
    }
}

pub async fn start_internship(
    service: &InternshipService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    transition(
        service,
        id,
        InternshipStatus::EnProceso,
        "Internship started",
        request,
    )
    .await
}

/// DELETE 不删除记录，只把实习置为 Cancelada
pub async fn cancel_internship(
    service: &InternshipService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    transition(
        service,
        id,
        InternshipStatus::Cancelada,
        "Internship cancelled",
        request,
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_schedule_validation() {
        let start = Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();

        assert!(validate_schedule(Some(start), Some(start), Some(240)).is_ok());
        assert!(validate_schedule(None, Some(end), None).is_ok());

        let resp = validate_schedule(Some(start), Some(end), None).unwrap_err();
        assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);
        assert!(validate_schedule(None, None, Some(0)).is_err());
    }
}
