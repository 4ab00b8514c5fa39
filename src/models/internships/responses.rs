use serde::Serialize;
use ts_rs::TS;

use super::entities::Internship;
use crate::models::common::PaginationInfo;
use crate::models::grades::entities::Grade;
use crate::models::modules::entities::InternshipModule;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/internship.ts")]
pub struct InternshipListResponse {
    pub items: Vec<Internship>,
    pub pagination: PaginationInfo,
}

/// 成绩保存 / 实习结业的结果
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/internship.ts")]
pub struct ClosureResponse {
    pub internship: Internship,
    pub grade: Grade,
    pub module: InternshipModule,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/internship.ts")]
pub struct BulkClosureIssue {
    pub internship_id: i64,
    pub reason: String,
}

/// 批量结业结果，逐条报告
#[derive(Debug, Default, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/internship.ts")]
pub struct BulkClosureResponse {
    pub closed: Vec<ClosureResponse>,
    pub skipped: Vec<BulkClosureIssue>,
    pub failed: Vec<BulkClosureIssue>,
}
