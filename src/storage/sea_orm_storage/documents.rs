//! 文档存储操作

use super::{SeaOrmStorage, db_error, now_ts};
use crate::entity::documents::{ActiveModel, Column, Entity as Documents};
use crate::errors::Result;
use crate::models::{
    PaginationInfo,
    common::pagination::normalize_page,
    documents::{
        entities::Document,
        requests::{DocumentListQuery, NewDocument},
        responses::DocumentListResponse,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

impl SeaOrmStorage {
    /// 创建文档记录，生成下载令牌
    pub async fn create_document_impl(&self, doc: NewDocument) -> Result<Document> {
        let model = ActiveModel {
            download_token: Set(Uuid::new_v4().simple().to_string()),
            original_name: Set(doc.original_name),
            stored_name: Set(doc.stored_name),
            file_size: Set(doc.file_size),
            file_type: Set(doc.file_type),
            document_type: Set(doc.document_type.to_string()),
            owner_id: Set(doc.owner_id),
            student_id: Set(doc.student_id),
            internship_id: Set(doc.internship_id),
            uploaded_at: Set(now_ts()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| db_error("上传文件记录失败", e))?;

        Ok(result.into_document())
    }

    /// 通过 token 获取文档
    pub async fn get_document_by_token_impl(&self, token: &str) -> Result<Option<Document>> {
        let result = Documents::find()
            .filter(Column::DownloadToken.eq(token))
            .one(&self.db)
            .await
            .map_err(|e| db_error("查询文件失败", e))?;

        Ok(result.map(|m| m.into_document()))
    }

    pub async fn list_documents_with_pagination_impl(
        &self,
        query: DocumentListQuery,
    ) -> Result<DocumentListResponse> {
        let (page, size) = normalize_page(query.page, query.size, 20);

        let mut select = Documents::find();
        if let Some(owner_id) = query.owner_id {
            select = select.filter(Column::OwnerId.eq(owner_id));
        }
        if let Some(student_id) = query.student_id {
            select = select.filter(Column::StudentId.eq(student_id));
        }
        if let Some(internship_id) = query.internship_id {
            select = select.filter(Column::InternshipId.eq(internship_id));
        }
        if let Some(document_type) = query.document_type {
            select = select.filter(Column::DocumentType.eq(document_type.to_string()));
        }

        let paginator = select
            .order_by_desc(Column::UploadedAt)
            .order_by_desc(Column::Id)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| db_error("查询文件总数失败", e))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| db_error("查询文件页数失败", e))?;
        let documents = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| db_error("查询文件列表失败", e))?;

        Ok(DocumentListResponse {
            items: documents.into_iter().map(|m| m.into_document()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::internships::fixtures::seed;
    use super::super::test_support::memory_storage;
    use crate::models::documents::entities::DocumentType;
    use crate::models::documents::requests::{DocumentListQuery, NewDocument};

    #[tokio::test]
    async fn test_document_record_and_listing() {
        let storage = memory_storage().await;
        let s = seed(&storage, "doc").await;

        let cv = storage
            .create_document_impl(NewDocument {
                original_name: "cv.pdf".to_string(),
                stored_name: "1700000000-abc.bin".to_string(),
                file_size: 1024,
                file_type: "application/pdf".to_string(),
                document_type: DocumentType::Cv,
                owner_id: s.student.user_id,
                student_id: Some(s.student.id),
                internship_id: None,
            })
            .await
            .unwrap();
        assert_eq!(cv.download_token.len(), 32);

        let found = storage
            .get_document_by_token_impl(&cv.download_token)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, cv.id);
        assert_eq!(found.document_type, DocumentType::Cv);
        assert!(
            storage
                .get_document_by_token_impl("missing")
                .await
                .unwrap()
                .is_none()
        );

        let by_student = storage
            .list_documents_with_pagination_impl(DocumentListQuery {
                student_id: Some(s.student.id),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_student.items.len(), 1);

        let reports = storage
            .list_documents_with_pagination_impl(DocumentListQuery {
                document_type: Some(DocumentType::Report),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(reports.items.is_empty());
    }
}
