use super::entities::Contact;
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/contact.ts")]
pub struct ContactListResponse {
    pub items: Vec<Contact>,
    pub pagination: PaginationInfo,
}
