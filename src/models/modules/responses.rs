use serde::Serialize;
use ts_rs::TS;

use super::entities::InternshipModule;
use crate::models::common::PaginationInfo;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/module.ts")]
pub struct ModuleListResponse {
    pub items: Vec<InternshipModule>,
    pub pagination: PaginationInfo,
}
