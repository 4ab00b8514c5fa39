use crate::models::{PaginationQuery, RecordStatus};
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/contact.ts")]
pub struct ContactListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub company_id: Option<i64>,
    pub status: Option<RecordStatus>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/contact.ts")]
pub struct CreateContactRequest {
    pub company_id: i64,
    pub name: String,
    pub position: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/contact.ts")]
pub struct UpdateContactRequest {
    pub name: Option<String>,
    pub position: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: Option<RecordStatus>,
}

#[derive(Debug, Clone, Default)]
pub struct ContactListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub company_id: Option<i64>,
    pub status: Option<RecordStatus>,
    pub search: Option<String>,
}

impl From<ContactListParams> for ContactListQuery {
    fn from(params: ContactListParams) -> Self {
        Self {
            page: Some(params.pagination.page),
            size: Some(params.pagination.size),
            company_id: params.company_id,
            status: params.status,
            search: params.search,
        }
    }
}
