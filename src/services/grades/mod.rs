use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::grades::requests::{GradeListParams, GradeListQuery};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::scope::Viewer;
use crate::services::{current_user, storage_error};
use crate::storage::Storage;

pub struct GradeService {
    storage: Option<Arc<dyn Storage>>,
}

impl GradeService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        super::resolve_storage(&self.storage, request)
    }

    /// 成绩列表：管理人员看全部，学生只看自己的；
    /// 企业和导师通过 `/internships/{id}/grade` 查看可见实习的成绩
    pub async fn list_grades(
        &self,
        params: GradeListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let user = match current_user(request) {
            Ok(user) => user,
            Err(resp) => return Ok(resp),
        };
        let storage = self.get_storage(request)?;
        let mut query = GradeListQuery::from(params);

        match Viewer::resolve(&storage, &user).await {
            Ok(Viewer::Staff) => {}
            Ok(Viewer::Student(student)) => query.student_id = Some(student.id),
            Ok(_) => return Ok(ApiResponse::reply(ErrorCode::Forbidden, "Access denied")),
            Err(resp) => return Ok(resp),
        }

        match storage.list_grades_with_pagination(query).await {
            Ok(resp) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                resp,
                "Grade list retrieved successfully",
            ))),
            Err(e) => Ok(storage_error(&e, ErrorCode::GradeNotFound)),
        }
    }
}
