use serde::Deserialize;
use ts_rs::TS;

use crate::models::PaginationQuery;
use crate::models::grades::entities::GradeResult;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/module.ts")]
pub struct ModuleListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub student_id: Option<i64>,
    pub workshop_id: Option<i64>,
    pub result: Option<GradeResult>,
}

#[derive(Debug, Clone, Default)]
pub struct ModuleListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub student_id: Option<i64>,
    pub workshop_id: Option<i64>,
    pub result: Option<GradeResult>,
}

impl From<ModuleListParams> for ModuleListQuery {
    fn from(params: ModuleListParams) -> Self {
        Self {
            page: Some(params.pagination.page),
            size: Some(params.pagination.size),
            student_id: params.student_id,
            workshop_id: params.workshop_id,
            result: params.result,
        }
    }
}
