use super::entities::Tutor;
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/tutor.ts")]
pub struct TutorListResponse {
    pub items: Vec<Tutor>,
    pub pagination: PaginationInfo,
}
