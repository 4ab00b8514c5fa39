use crate::models::{PaginationQuery, RecordStatus};
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/workshop.ts")]
pub struct WorkshopListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub status: Option<RecordStatus>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/workshop.ts")]
pub struct CreateWorkshopRequest {
    pub name: String,
    pub code: String,
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/workshop.ts")]
pub struct UpdateWorkshopRequest {
    pub name: Option<String>,
    pub code: Option<String>,
    pub description: Option<String>,
    pub status: Option<RecordStatus>,
}

// 存储层查询参数
#[derive(Debug, Clone, Default)]
pub struct WorkshopListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub status: Option<RecordStatus>,
    pub search: Option<String>,
}

impl From<WorkshopListParams> for WorkshopListQuery {
    fn from(params: WorkshopListParams) -> Self {
        Self {
            page: Some(params.pagination.page),
            size: Some(params.pagination.size),
            status: params.status,
            search: params.search,
        }
    }
}
