pub mod closure;
pub mod list;
pub mod manage;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::models::internships::entities::Internship;
use crate::models::internships::requests::{
    CloseAllInternshipsRequest, CreateInternshipRequest, InternshipListParams,
    UpdateInternshipRequest,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::scope::Viewer;
use crate::services::{current_user, storage_error};
use crate::storage::Storage;

pub struct InternshipService {
    storage: Option<Arc<dyn Storage>>,
}

impl InternshipService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        super::resolve_storage(&self.storage, request)
    }

    pub(crate) fn pass_threshold(&self) -> f64 {
        AppConfig::get().grading.pass_threshold
    }

    /// 读取实习并确认当前用户可见；不可见时按不存在处理
    pub(crate) async fn load_visible(
        &self,
        storage: &Arc<dyn Storage>,
        id: i64,
        request: &HttpRequest,
    ) -> Result<(Viewer, Internship), HttpResponse> {
        let user = current_user(request)?;
        let viewer = Viewer::resolve(storage, &user).await?;
        match storage.get_internship_by_id(id).await {
            Ok(Some(internship)) if viewer.can_see_internship(&internship) => {
                Ok((viewer, internship))
            }
            Ok(_) => Err(ApiResponse::reply(
                ErrorCode::InternshipNotFound,
                "Internship not found",
            )),
            Err(e) => Err(storage_error(&e, ErrorCode::InternshipNotFound)),
        }
    }

    pub async fn list_internships(
        &self,
        query: InternshipListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_internships(self, query, request).await
    }

    pub async fn get_internship(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::get_internship(self, id, request).await
    }

    pub async fn create_internship(
        &self,
        req: CreateInternshipRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        manage::create_internship(self, req, request).await
    }

    pub async fn update_internship(
        &self,
        id: i64,
        req: UpdateInternshipRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        manage::update_internship(self, id, req, request).await
    }

    pub async fn start_internship(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        manage::start_internship(self, id, request).await
    }

    pub async fn cancel_internship(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        manage::cancel_internship(self, id, request).await
    }

    pub async fn get_grade(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        closure::get_grade(self, id, request).await
    }

    pub async fn preview_grade(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        closure::preview_grade(self, id, request).await
    }

    pub async fn save_grade(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        closure::save_grade(self, id, request).await
    }

    pub async fn close_internship(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        closure::close_internship(self, id, request).await
    }

    pub async fn close_all(
        &self,
        req: CloseAllInternshipsRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        closure::close_all(self, req, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::companies::requests::CreateCompanyRequest;
    use crate::models::students::requests::CreateStudentRequest;
    use crate::models::users::entities::{User, UserRole};
    use crate::models::users::requests::CreateUserRequest;
    use crate::models::workshops::requests::CreateWorkshopRequest;
    use crate::storage::sea_orm_storage::test_support::memory_storage;
    use actix_web::{HttpMessage, http::StatusCode, test::TestRequest};
    use chrono::{TimeZone, Utc};

    fn request_as(user: User) -> HttpRequest {
        let req = TestRequest::default().to_http_request();
        req.extensions_mut().insert(user);
        req
    }

    async fn student_user(storage: &Arc<dyn Storage>, workshop_id: i64, name: &str) -> (i64, User) {
        let student = storage
            .create_student(CreateStudentRequest {
                username: name.to_string(),
                email: format!("{name}@example.com"),
                password: "hashed".to_string(),
                workshop_id,
                first_name: "Sofía".to_string(),
                last_name: name.to_string(),
                document_id: None,
                phone: None,
            })
            .await
            .unwrap();
        let user = storage.get_user_by_id(student.user_id).await.unwrap().unwrap();
        (student.id, user)
    }

    #[tokio::test]
    async fn test_foreign_internship_reads_as_not_found() {
        let storage: Arc<dyn Storage> = Arc::new(memory_storage().await);
        let service = InternshipService {
            storage: Some(storage.clone()),
        };
        let workshop = storage
            .create_workshop(CreateWorkshopRequest {
                name: "Electrónica".to_string(),
                code: "ELN".to_string(),
                description: None,
            })
            .await
            .unwrap();
        let company = storage
            .create_company(CreateCompanyRequest {
                user_id: None,
                name: "Redes SRL".to_string(),
                tax_id: None,
                sector: None,
                address: None,
                email: None,
                phone: None,
            })
            .await
            .unwrap();
        let (owner_id, owner) = student_user(&storage, workshop.id, "duena").await;
        let (_, stranger) = student_user(&storage, workshop.id, "ajeno").await;
        let admin = storage
            .create_user(CreateUserRequest {
                username: "admin".to_string(),
                email: "admin@example.com".to_string(),
                password: "hashed".to_string(),
                role: UserRole::Admin,
                display_name: None,
                phone: None,
            })
            .await
            .unwrap();

        let internship = storage
            .create_internship(
                CreateInternshipRequest {
                    student_id: owner_id,
                    company_id: company.id,
                    tutor_id: None,
                    contact_id: None,
                    position: None,
                    start_date: Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap(),
                    end_date: Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap(),
                    hours_required: None,
                },
                admin.id,
            )
            .await
            .unwrap();

        let hidden = service
            .get_internship(internship.id, &request_as(stranger))
            .await
            .unwrap();
        assert_eq!(hidden.status(), StatusCode::NOT_FOUND);

        let own = service
            .get_internship(internship.id, &request_as(owner))
            .await
            .unwrap();
        assert_eq!(own.status(), StatusCode::OK);

        let staff = service
            .get_internship(internship.id, &request_as(admin))
            .await
            .unwrap();
        assert_eq!(staff.status(), StatusCode::OK);
    }
}
