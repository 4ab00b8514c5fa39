//! 统计报表：学生人数、各状态实习数与模块通过情况

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::errors::Result;
use crate::models::grades::calculator::round2;
use crate::models::grades::entities::GradeResult;
use crate::models::modules::entities::InternshipModule;
use crate::models::reports::responses::{ModuleSummary, ReportSummary, WorkshopReport};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::scope::Viewer;
use crate::services::{current_user, storage_error};
use crate::storage::Storage;

/// 汇总模块通过情况
pub fn summarize_modules(modules: &[InternshipModule]) -> ModuleSummary {
    if modules.is_empty() {
        return ModuleSummary::default();
    }
    let total = modules.len() as i64;
    let approved = modules
        .iter()
        .filter(|m| m.result == GradeResult::Aprobado)
        .count() as i64;
    let sum: f64 = modules.iter().map(|m| m.average).sum();
    ModuleSummary {
        total,
        approved,
        failed: total - approved,
        average: Some(round2(sum / total as f64)),
        pass_rate: Some(round2(approved as f64 * 100.0 / total as f64)),
    }
}

pub struct ReportService {
    storage: Option<Arc<dyn Storage>>,
}

impl ReportService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        super::resolve_storage(&self.storage, request)
    }

    async fn collect(
        storage: &Arc<dyn Storage>,
        workshop_id: Option<i64>,
    ) -> Result<ReportSummary> {
        let (students_total, students_active) = storage.count_students(workshop_id).await?;
        let internships = storage.count_internships_by_status(workshop_id).await?;
        let modules = storage.list_all_modules(workshop_id).await?;
        Ok(ReportSummary {
            students_total,
            students_active,
            internships,
            modules: summarize_modules(&modules),
            generated_at: chrono::Utc::now(),
        })
    }

    /// 调用者可查看的工坊范围：`None` 表示全部
    async fn visible_workshop(
        storage: &Arc<dyn Storage>,
        request: &HttpRequest,
    ) -> std::result::Result<Option<i64>, HttpResponse> {
        let user = current_user(request)?;
        match Viewer::resolve(storage, &user).await? {
            Viewer::Staff => Ok(None),
            Viewer::Tutor(tutor) => Ok(Some(tutor.workshop_id)),
            Viewer::Student(_) | Viewer::Company(_) => Err(ApiResponse::reply(
                ErrorCode::Forbidden,
                "Reports are only available to staff and tutors",
            )),
        }
    }

    pub async fn summary(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let scope = match Self::visible_workshop(&storage, request).await {
            Ok(scope) => scope,
            Err(resp) => return Ok(resp),
        };
        match Self::collect(&storage, scope).await {
            Ok(summary) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                summary,
                "Report generated successfully",
            ))),
            Err(e) => Ok(storage_error(&e, ErrorCode::NotFound)),
        }
    }

    pub async fn workshop_report(
        &self,
        workshop_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;

        // 导师只能查看本工坊
        match Self::visible_workshop(&storage, request).await {
            Ok(Some(own)) if own != workshop_id => {
                return Ok(ApiResponse::reply(
                    ErrorCode::Forbidden,
                    "Tutors can only view reports of their own workshop",
                ));
            }
            Ok(_) => {}
            Err(resp) => return Ok(resp),
        }

        let workshop = match storage.get_workshop_by_id(workshop_id).await {
            Ok(Some(workshop)) => workshop,
            Ok(None) => {
                return Ok(ApiResponse::reply(
                    ErrorCode::WorkshopNotFound,
                    "Workshop not found",
                ));
            }
            Err(e) => return Ok(storage_error(&e, ErrorCode::WorkshopNotFound)),
        };

        match Self::collect(&storage, Some(workshop_id)).await {
            Ok(summary) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                WorkshopReport {
                    workshop_id,
                    workshop_name: workshop.name,
                    students_total: summary.students_total,
                    students_active: summary.students_active,
                    internships: summary.internships,
                    modules: summary.modules,
                    generated_at: summary.generated_at,
                },
                "Report generated successfully",
            ))),
            Err(e) => Ok(storage_error(&e, ErrorCode::WorkshopNotFound)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::students::requests::CreateStudentRequest;
    use crate::models::tutors::requests::CreateTutorRequest;
    use crate::models::users::{
        entities::{User, UserRole},
        requests::CreateUserRequest,
    };
    use crate::models::workshops::requests::CreateWorkshopRequest;
    use crate::storage::sea_orm_storage::test_support::memory_storage;
    use actix_web::{HttpMessage, body::to_bytes, http::StatusCode, test::TestRequest};

    struct Fixture {
        service: ReportService,
        storage: Arc<dyn Storage>,
        own_workshop: i64,
        other_workshop: i64,
    }

    async fn fixture() -> Fixture {
        let storage: Arc<dyn Storage> = Arc::new(memory_storage().await);
        let mut workshops = Vec::new();
        for code in ["ELE", "MEC"] {
            let workshop = storage
                .create_workshop(CreateWorkshopRequest {
                    name: format!("Taller {code}"),
                    code: code.to_string(),
                    description: None,
                })
                .await
                .unwrap();
            storage
                .create_student(CreateStudentRequest {
                    username: format!("alumno_{code}").to_lowercase(),
                    email: format!("alumno_{code}@example.com").to_lowercase(),
                    password: "hashed".to_string(),
                    workshop_id: workshop.id,
                    first_name: "Ana".to_string(),
                    last_name: code.to_string(),
                    document_id: None,
                    phone: None,
                })
                .await
                .unwrap();
            workshops.push(workshop.id);
        }
        Fixture {
            service: ReportService {
                storage: Some(storage.clone()),
            },
            storage,
            own_workshop: workshops[0],
            other_workshop: workshops[1],
        }
    }

    fn request_as(user: User) -> HttpRequest {
        let req = TestRequest::default().to_http_request();
        req.extensions_mut().insert(user);
        req
    }

    async fn tutor_of(storage: &Arc<dyn Storage>, workshop_id: i64) -> User {
        let tutor = storage
            .create_tutor(CreateTutorRequest {
                username: "tutora".to_string(),
                email: "tutora@example.com".to_string(),
                password: "hashed".to_string(),
                workshop_id,
                first_name: "Rosa".to_string(),
                last_name: "Mena".to_string(),
                phone: None,
            })
            .await
            .unwrap();
        storage.get_user_by_id(tutor.user_id).await.unwrap().unwrap()
    }

    async fn data_of(resp: HttpResponse) -> serde_json::Value {
        let body = to_bytes(resp.into_body()).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        value["data"].clone()
    }

    #[tokio::test]
    async fn test_tutor_summary_is_limited_to_own_workshop() {
        let f = fixture().await;
        let tutor = tutor_of(&f.storage, f.own_workshop).await;

        let resp = f.service.summary(&request_as(tutor)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(data_of(resp).await["students_total"], 1);

        let resp = f.service.summary(&request_as(admin(&f.storage).await)).await.unwrap();
        assert_eq!(data_of(resp).await["students_total"], 2);
    }

    async fn admin(storage: &Arc<dyn Storage>) -> User {
        storage
            .create_user(CreateUserRequest {
                username: "admin".to_string(),
                email: "admin@example.com".to_string(),
                password: "hashed".to_string(),
                role: UserRole::Admin,
                display_name: None,
                phone: None,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_tutor_cannot_read_other_workshop_report() {
        let f = fixture().await;
        let tutor = tutor_of(&f.storage, f.own_workshop).await;

        let own = f
            .service
            .workshop_report(f.own_workshop, &request_as(tutor.clone()))
            .await
            .unwrap();
        assert_eq!(own.status(), StatusCode::OK);

        let other = f
            .service
            .workshop_report(f.other_workshop, &request_as(tutor))
            .await
            .unwrap();
        assert_eq!(other.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_tutor_account_without_profile_is_rejected() {
        let f = fixture().await;
        // 只有账号没有导师档案
        let orphan = f
            .storage
            .create_user(CreateUserRequest {
                username: "sinperfil".to_string(),
                email: "sinperfil@example.com".to_string(),
                password: "hashed".to_string(),
                role: UserRole::Tutor,
                display_name: None,
                phone: None,
            })
            .await
            .unwrap();

        let report = f
            .service
            .workshop_report(f.other_workshop, &request_as(orphan.clone()))
            .await
            .unwrap();
        assert_eq!(report.status(), StatusCode::FORBIDDEN);

        let summary = f.service.summary(&request_as(orphan)).await.unwrap();
        assert_eq!(summary.status(), StatusCode::FORBIDDEN);
    }

    fn module(id: i64, average: f64, result: GradeResult) -> InternshipModule {
        let now = chrono::Utc::now();
        InternshipModule {
            id,
            student_id: id,
            workshop_id: 1,
            internship_id: id,
            grade_id: id,
            average,
            result,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_summarize_empty() {
        assert_eq!(summarize_modules(&[]), ModuleSummary::default());
    }

    #[test]
    fn test_summarize_modules() {
        let modules = [
            module(1, 85.0, GradeResult::Aprobado),
            module(2, 60.5, GradeResult::Reprobado),
            module(3, 70.0, GradeResult::Aprobado),
        ];
        let summary = summarize_modules(&modules);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.approved, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.average, Some(71.83));
        assert_eq!(summary.pass_rate, Some(66.67));
    }
}
