use serde::Serialize;
use ts_rs::TS;

use super::entities::{Grade, GradeOutcome};
use crate::models::common::PaginationInfo;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct GradeListResponse {
    pub items: Vec<Grade>,
    pub pagination: PaginationInfo,
}

/// 成绩预览（不落库）
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct GradePreviewResponse {
    pub internship_id: i64,
    pub pass_threshold: f64,
    #[serde(flatten)]
    #[ts(flatten)]
    pub outcome: GradeOutcome,
}
