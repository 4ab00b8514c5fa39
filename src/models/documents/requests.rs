use serde::Deserialize;
use ts_rs::TS;

use super::entities::DocumentType;
use crate::models::PaginationQuery;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/document.ts")]
pub struct DocumentListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub student_id: Option<i64>,
    pub internship_id: Option<i64>,
    pub document_type: Option<DocumentType>,
}

#[derive(Debug, Clone, Default)]
pub struct DocumentListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub owner_id: Option<i64>,
    pub student_id: Option<i64>,
    pub internship_id: Option<i64>,
    pub document_type: Option<DocumentType>,
}

impl From<DocumentListParams> for DocumentListQuery {
    fn from(params: DocumentListParams) -> Self {
        Self {
            page: Some(params.pagination.page),
            size: Some(params.pagination.size),
            owner_id: None,
            student_id: params.student_id,
            internship_id: params.internship_id,
            document_type: params.document_type,
        }
    }
}

/// 存储层写入参数
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub original_name: String,
    pub stored_name: String,
    pub file_size: i64,
    pub file_type: String,
    pub document_type: DocumentType,
    pub owner_id: i64,
    pub student_id: Option<i64>,
    pub internship_id: Option<i64>,
}
