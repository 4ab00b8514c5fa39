use serde::Serialize;
use ts_rs::TS;

use super::entities::{Document, DocumentType};
use crate::models::common::PaginationInfo;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/document.ts")]
pub struct DocumentUploadResponse {
    pub id: i64,
    pub download_token: String,
    /// 原始文件名
    pub file_name: String,
    /// 文件大小(字节)
    pub size: i64,
    pub content_type: String,
    pub document_type: DocumentType,
    pub uploaded_at: chrono::DateTime<chrono::Utc>,
}

impl From<Document> for DocumentUploadResponse {
    fn from(doc: Document) -> Self {
        Self {
            id: doc.id,
            download_token: doc.download_token,
            file_name: doc.original_name,
            size: doc.file_size,
            content_type: doc.file_type,
            document_type: doc.document_type,
            uploaded_at: doc.uploaded_at,
        }
    }
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/document.ts")]
pub struct DocumentListResponse {
    pub items: Vec<Document>,
    pub pagination: PaginationInfo,
}
