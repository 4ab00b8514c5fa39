use crate::models::{PaginationQuery, RecordStatus};
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/tutor.ts")]
pub struct TutorListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub workshop_id: Option<i64>,
    pub status: Option<RecordStatus>,
    pub search: Option<String>,
}

// 创建导师请求（同时创建登录账号）
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/tutor.ts")]
pub struct CreateTutorRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub workshop_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/tutor.ts")]
pub struct UpdateTutorRequest {
    pub workshop_id: Option<i64>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub status: Option<RecordStatus>,
}

#[derive(Debug, Clone, Default)]
pub struct TutorListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub workshop_id: Option<i64>,
    pub status: Option<RecordStatus>,
    pub search: Option<String>,
}

impl From<TutorListParams> for TutorListQuery {
    fn from(params: TutorListParams) -> Self {
        Self {
            page: Some(params.pagination.page),
            size: Some(params.pagination.size),
            workshop_id: params.workshop_id,
            status: params.status,
            search: params.search,
        }
    }
}
