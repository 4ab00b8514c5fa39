use crate::models::{PaginationQuery, RecordStatus};
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/company.ts")]
pub struct CompanyListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub status: Option<RecordStatus>,
    pub sector: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/company.ts")]
pub struct CreateCompanyRequest {
    pub user_id: Option<i64>,
    pub name: String,
    pub tax_id: Option<String>,
    pub sector: Option<String>,
    pub address: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/company.ts")]
pub struct UpdateCompanyRequest {
    pub user_id: Option<i64>,
    pub name: Option<String>,
    pub tax_id: Option<String>,
    pub sector: Option<String>,
    pub address: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: Option<RecordStatus>,
}

#[derive(Debug, Clone, Default)]
pub struct CompanyListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub user_id: Option<i64>,
    pub status: Option<RecordStatus>,
    pub sector: Option<String>,
    pub search: Option<String>,
}

impl From<CompanyListParams> for CompanyListQuery {
    fn from(params: CompanyListParams) -> Self {
        Self {
            page: Some(params.pagination.page),
            size: Some(params.pagination.size),
            user_id: None,
            status: params.status,
            sector: params.sector,
            search: params.search,
        }
    }
}
