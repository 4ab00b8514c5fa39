use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use tracing::info;

use crate::models::evaluations::requests::UpsertEvaluationRequest;
use crate::models::evaluations::responses::EvaluationListResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::internships::InternshipService;
use crate::services::{current_user, storage_error};
use crate::storage::Storage;

pub struct EvaluationService {
    storage: Option<Arc<dyn Storage>>,
    internships: InternshipService,
}

impl EvaluationService {
    pub fn new_lazy() -> Self {
        Self {
            storage: None,
            internships: InternshipService::new_lazy(),
        }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        super::resolve_storage(&self.storage, request)
    }

    /// 当前用户对该实习提交（或覆盖）自己的评分
    pub async fn upsert_evaluation(
        &self,
        internship_id: i64,
        mut req: UpsertEvaluationRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        if let Err(msg) = req.scores.validate() {
            return Ok(ApiResponse::reply(ErrorCode::EvaluationInvalid, msg));
        }
        let user = match current_user(request) {
            Ok(user) => user,
            Err(resp) => return Ok(resp),
        };

        let storage = self.get_storage(request)?;
        let (viewer, internship) = match self
            .internships
            .load_visible(&storage, internship_id, request)
            .await
        {
            Ok(found) => found,
            Err(resp) => return Ok(resp),
        };
        if !viewer.can_evaluate(&internship) {
            return Ok(ApiResponse::reply(
                ErrorCode::Forbidden,
                "You are not allowed to evaluate this internship",
            ));
        }

        req.comment = req
            .comment
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        match storage
            .upsert_evaluation(internship_id, user.id, req.scores, req.comment)
            .await
        {
            Ok(evaluation) => {
                info!(
                    "Evaluation {} saved for internship {} by user {}",
                    evaluation.id, internship_id, user.id
                );
                Ok(HttpResponse::Ok().json(ApiResponse::success(
                    evaluation,
                    "Evaluation saved successfully",
                )))
            }
            Err(e) => Ok(storage_error(&e, ErrorCode::InternshipNotFound)),
        }
    }

    pub async fn list_evaluations(
        &self,
        internship_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        if let Err(resp) = self
            .internships
            .load_visible(&storage, internship_id, request)
            .await
        {
            return Ok(resp);
        }

        match storage.list_evaluations_by_internship(internship_id).await {
            Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                EvaluationListResponse { items },
                "Evaluation list retrieved successfully",
            ))),
            Err(e) => Ok(storage_error(&e, ErrorCode::InternshipNotFound)),
        }
    }
}
