use chrono::{DateTime, Utc};
use serde::Deserialize;
use ts_rs::TS;

use super::entities::InternshipStatus;
use crate::models::PaginationQuery;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/internship.ts")]
pub struct InternshipListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub status: Option<InternshipStatus>,
    pub workshop_id: Option<i64>,
    pub company_id: Option<i64>,
    pub student_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/internship.ts")]
pub struct CreateInternshipRequest {
    pub student_id: i64,
    pub company_id: i64,
    pub tutor_id: Option<i64>,
    pub contact_id: Option<i64>,
    pub position: Option<String>,
    pub start_date: DateTime<Utc>, // ISO 8601 格式，如 "2026-02-01T00:00:00Z"
    pub end_date: DateTime<Utc>,
    pub hours_required: Option<i32>,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/internship.ts")]
pub struct UpdateInternshipRequest {
    pub company_id: Option<i64>,
    pub tutor_id: Option<i64>,
    pub contact_id: Option<i64>,
    pub position: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub hours_required: Option<i32>,
}

// 批量结业请求
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/internship.ts")]
pub struct CloseAllInternshipsRequest {
    pub workshop_id: Option<i64>,
}

// 存储层查询参数
#[derive(Debug, Clone, Default)]
pub struct InternshipListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub status: Option<InternshipStatus>,
    pub workshop_id: Option<i64>,
    pub company_id: Option<i64>,
    pub student_id: Option<i64>,
    // 导师可见范围：自己指导的实习，或所属工坊的实习
    pub tutor_id: Option<i64>,
    pub tutor_workshop_id: Option<i64>,
}

impl From<InternshipListParams> for InternshipListQuery {
    fn from(params: InternshipListParams) -> Self {
        Self {
            page: Some(params.pagination.page),
            size: Some(params.pagination.size),
            status: params.status,
            workshop_id: params.workshop_id,
            company_id: params.company_id,
            student_id: params.student_id,
            tutor_id: None,
            tutor_workshop_id: None,
        }
    }
}
