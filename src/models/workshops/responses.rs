use super::entities::Workshop;
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/workshop.ts")]
pub struct WorkshopListResponse {
    pub items: Vec<Workshop>,
    pub pagination: PaginationInfo,
}
