//! 成绩评定与实习结业

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use tracing::{info, warn};

use super::InternshipService;
use crate::errors::Result;
use crate::models::grades::calculator::compute_outcome;
use crate::models::grades::responses::GradePreviewResponse;
use crate::models::internships::entities::InternshipStatus;
use crate::models::internships::requests::CloseAllInternshipsRequest;
use crate::models::internships::responses::{BulkClosureIssue, BulkClosureResponse};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, storage_error};
use crate::storage::Storage;

pub async fn get_grade(
    service: &InternshipService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    if let Err(resp) = service.load_visible(&storage, id, request).await {
        return Ok(resp);
    }

    match storage.get_grade_by_internship(id).await {
        Ok(Some(grade)) => Ok(HttpResponse::Ok()
            .json(ApiResponse::success(grade, "Grade retrieved successfully"))),
        Ok(None) => Ok(ApiResponse::reply(
            ErrorCode::GradeNotFound,
            "Internship has not been graded yet",
        )),
        Err(e) => Ok(storage_error(&e, ErrorCode::GradeNotFound)),
    }
}

/// 按当前评价计算成绩，不写库
pub async fn preview_grade(
    service: &InternshipService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    if let Err(resp) = service.load_visible(&storage, id, request).await {
        return Ok(resp);
    }

    let evaluations = match storage.list_evaluations_by_internship(id).await {
        Ok(list) => list,
        Err(e) => return Ok(storage_error(&e, ErrorCode::InternshipNotFound)),
    };
    let scores: Vec<_> = evaluations.iter().map(|e| e.scores).collect();
    let pass_threshold = service.pass_threshold();

    match compute_outcome(&scores, pass_threshold) {
        Some(outcome) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            GradePreviewResponse {
                internship_id: id,
                pass_threshold,
                outcome,
            },
            "Grade preview computed",
        ))),
        None => Ok(ApiResponse::reply(
            ErrorCode::EvaluationMissing,
            "Internship has no evaluations",
        )),
    }
}

fn grading_error(e: &crate::errors::IMSystemError) -> HttpResponse {
    match e {
        // 存储层在没有评价时返回 Validation
        crate::errors::IMSystemError::Validation(msg) => {
            ApiResponse::reply(ErrorCode::EvaluationMissing, msg.as_str())
        }
        other => storage_error(other, ErrorCode::InternshipNotFound),
    }
}

pub async fn save_grade(
    service: &InternshipService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;

    match storage
        .save_grade(id, user.id, service.pass_threshold())
        .await
    {
        Ok(result) => {
            info!(
                "Internship {} graded: {} ({})",
                id, result.grade.average, result.grade.result
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(result, "Grade saved successfully")))
        }
        Err(e) => Ok(grading_error(&e)),
    }
}

pub async fn close_internship(
    service: &InternshipService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;

    match storage
        .close_internship(id, user.id, service.pass_threshold())
        .await
    {
        Ok(result) => {
            info!(
                "Internship {} closed by user {}: {}",
                id, user.id, result.module.result
            );
            Ok(HttpResponse::Ok()
                .json(ApiResponse::success(result, "Internship closed successfully")))
        }
        Err(e) => Ok(grading_error(&e)),
    }
}

/// 逐个结业所有进行中的实习，每个实习独立事务
///
/// 没有评价的实习记为 skipped，结业失败的记为 failed，不影响后续实习。
pub(crate) async fn close_in_sequence(
    storage: &Arc<dyn Storage>,
    graded_by: i64,
    pass_threshold: f64,
    workshop_id: Option<i64>,
) -> Result<BulkClosureResponse> {
    let ids = storage
        .list_internship_ids_by_status(InternshipStatus::EnProceso, workshop_id)
        .await?;
    let mut report = BulkClosureResponse::default();

    for internship_id in ids {
        match storage.list_evaluations_by_internship(internship_id).await {
            Ok(evaluations) if evaluations.is_empty() => {
                report.skipped.push(BulkClosureIssue {
                    internship_id,
                    reason: "Internship has no evaluations".to_string(),
                });
                continue;
            }
            Ok(_) => {}
            Err(e) => {
                report.failed.push(BulkClosureIssue {
                    internship_id,
                    reason: e.message().to_string(),
                });
                continue;
            }
        }

        match storage
            .close_internship(internship_id, graded_by, pass_threshold)
            .await
        {
            Ok(closed) => report.closed.push(closed),
            Err(e) => {
                warn!("Bulk closure failed for internship {}: {}", internship_id, e);
                report.failed.push(BulkClosureIssue {
                    internship_id,
                    reason: e.message().to_string(),
                });
            }
        }
    }

    Ok(report)
}

pub async fn close_all(
    service: &InternshipService,
    req: CloseAllInternshipsRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;

    match close_in_sequence(&storage, user.id, service.pass_threshold(), req.workshop_id).await {
        Ok(report) => {
            info!(
                "Bulk closure by user {}: {} closed, {} skipped, {} failed",
                user.id,
                report.closed.len(),
                report.skipped.len(),
                report.failed.len()
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(report, "Bulk closure finished")))
        }
        Err(e) => Ok(storage_error(&e, ErrorCode::InternshipNotFound)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::companies::requests::CreateCompanyRequest;
    use crate::models::evaluations::entities::RaScores;
    use crate::models::grades::entities::GradeResult;
    use crate::models::internships::requests::CreateInternshipRequest;
    use crate::models::students::requests::CreateStudentRequest;
    use crate::models::users::{entities::UserRole, requests::CreateUserRequest};
    use crate::models::workshops::requests::CreateWorkshopRequest;
    use crate::storage::sea_orm_storage::test_support::memory_storage;
    use chrono::{TimeZone, Utc};

    async fn started(
        storage: &Arc<dyn Storage>,
        workshop_id: i64,
        company_id: i64,
        name: &str,
    ) -> i64 {
        let student = storage
            .create_student(CreateStudentRequest {
                username: name.to_string(),
                email: format!("{name}@example.com"),
                password: "hashed".to_string(),
                workshop_id,
                first_name: "Luis".to_string(),
                last_name: name.to_string(),
                document_id: None,
                phone: None,
            })
            .await
            .unwrap();
        let internship = storage
            .create_internship(
                CreateInternshipRequest {
                    student_id: student.id,
                    company_id,
                    tutor_id: None,
                    contact_id: None,
                    position: None,
                    start_date: Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap(),
                    end_date: Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap(),
                    hours_required: None,
                },
                1,
            )
            .await
            .unwrap();
        storage
            .transition_internship(internship.id, InternshipStatus::EnProceso)
            .await
            .unwrap()
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_close_in_sequence_reports_each_internship() {
        let storage: Arc<dyn Storage> = Arc::new(memory_storage().await);
        let workshop = storage
            .create_workshop(CreateWorkshopRequest {
                name: "Informática".to_string(),
                code: "INF".to_string(),
                description: None,
            })
            .await
            .unwrap();
        let company = storage
            .create_company(CreateCompanyRequest {
                user_id: None,
                name: "Soluciones SRL".to_string(),
                tax_id: None,
                sector: None,
                address: None,
                email: None,
                phone: None,
            })
            .await
            .unwrap();

        let supervisor = storage
            .create_user(CreateUserRequest {
                username: "supervisor".to_string(),
                email: "supervisor@example.com".to_string(),
                password: "hashed".to_string(),
                role: UserRole::Supervisor,
                display_name: None,
                phone: None,
            })
            .await
            .unwrap();

        let graded = started(&storage, workshop.id, company.id, "alumno1").await;
        let ungraded = started(&storage, workshop.id, company.id, "alumno2").await;
        storage
            .upsert_evaluation(graded, supervisor.id, RaScores::from_array([90.0; 7]), None)
            .await
            .unwrap();

        let report = close_in_sequence(&storage, supervisor.id, 70.0, Some(workshop.id))
            .await
            .unwrap();

        assert_eq!(report.closed.len(), 1);
        assert_eq!(report.closed[0].internship.id, graded);
        assert_eq!(report.closed[0].module.result, GradeResult::Aprobado);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].internship_id, ungraded);
        assert!(report.failed.is_empty());

        // 已结业的实习不会被再次处理
        let again = close_in_sequence(&storage, supervisor.id, 70.0, None).await.unwrap();
        assert!(again.closed.is_empty());
        assert_eq!(again.skipped.len(), 1);
    }
}
