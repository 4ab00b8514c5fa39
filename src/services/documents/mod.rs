pub mod download;
pub mod upload;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::documents::entities::Document;
use crate::models::documents::requests::{DocumentListParams, DocumentListQuery};
use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::internships::InternshipService;
use crate::services::scope::Viewer;
use crate::services::{current_user, storage_error};
use crate::storage::Storage;

pub struct DocumentService {
    storage: Option<Arc<dyn Storage>>,
    internships: InternshipService,
}

impl DocumentService {
    pub fn new_lazy() -> Self {
        Self {
            storage: None,
            internships: InternshipService::new_lazy(),
        }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        super::resolve_storage(&self.storage, request)
    }

    /// 文档可见性：上传者本人、管理人员、能看到所属实习的用户，
    /// 以及学生本人和同工坊导师（针对未挂实习的学生文档）
    pub(crate) async fn can_access(
        &self,
        storage: &Arc<dyn Storage>,
        user: &User,
        viewer: &Viewer,
        doc: &Document,
    ) -> crate::errors::Result<bool> {
        if doc.owner_id == user.id || viewer.is_staff() {
            return Ok(true);
        }
        if let Some(internship_id) = doc.internship_id
            && let Some(internship) = storage.get_internship_by_id(internship_id).await?
            && viewer.can_see_internship(&internship)
        {
            return Ok(true);
        }
        let Some(student_id) = doc.student_id else {
            return Ok(false);
        };
        Ok(match viewer {
            Viewer::Student(s) => s.id == student_id,
            Viewer::Tutor(t) => storage
                .get_student_by_id(student_id)
                .await?
                .is_some_and(|s| s.workshop_id == t.workshop_id),
            _ => false,
        })
    }

    pub async fn upload(
        &self,
        request: &HttpRequest,
        payload: Multipart,
    ) -> ActixResult<HttpResponse> {
        upload::handle_upload(self, request, payload).await
    }

    pub async fn download(&self, request: &HttpRequest, token: &str) -> ActixResult<HttpResponse> {
        download::handle_download(self, request, token).await
    }

    pub async fn list_documents(
        &self,
        params: DocumentListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let user = match current_user(request) {
            Ok(user) => user,
            Err(resp) => return Ok(resp),
        };
        let storage = self.get_storage(request)?;
        let viewer = match Viewer::resolve(&storage, &user).await {
            Ok(viewer) => viewer,
            Err(resp) => return Ok(resp),
        };
        let mut query = DocumentListQuery::from(params);

        if let Some(internship_id) = query.internship_id {
            // 按实习查询时以实习可见性为准
            if let Err(resp) = self
                .internships
                .load_visible(&storage, internship_id, request)
                .await
            {
                return Ok(resp);
            }
        } else {
            match &viewer {
                Viewer::Staff => {}
                Viewer::Student(s) => query.student_id = Some(s.id),
                Viewer::Tutor(t) => {
                    let allowed = match query.student_id {
                        Some(student_id) => match storage.get_student_by_id(student_id).await {
                            Ok(student) => {
                                student.is_some_and(|s| s.workshop_id == t.workshop_id)
                            }
                            Err(e) => return Ok(storage_error(&e, ErrorCode::StudentNotFound)),
                        },
                        None => false,
                    };
                    if !allowed {
                        query.owner_id = Some(user.id);
                    }
                }
                Viewer::Company(_) => query.owner_id = Some(user.id),
            }
        }

        match storage.list_documents_with_pagination(query).await {
            Ok(resp) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                resp,
                "Document list retrieved successfully",
            ))),
            Err(e) => Ok(storage_error(&e, ErrorCode::FileNotFound)),
        }
    }
}
