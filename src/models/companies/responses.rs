use super::entities::Company;
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/company.ts")]
pub struct CompanyListResponse {
    pub items: Vec<Company>,
    pub pagination: PaginationInfo,
}
