//! 工坊存储操作

use super::{SeaOrmStorage, db_error, now_ts};
use crate::entity::workshops::{ActiveModel, Column, Entity as Workshops};
use crate::errors::Result;
use crate::models::{
    PaginationInfo, RecordStatus,
    common::pagination::normalize_page,
    workshops::{
        entities::Workshop,
        requests::{CreateWorkshopRequest, UpdateWorkshopRequest, WorkshopListQuery},
        responses::WorkshopListResponse,
    },
};
use crate::utils::sql::contains_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set, sea_query::Expr,
};

impl SeaOrmStorage {
    pub async fn create_workshop_impl(&self, req: CreateWorkshopRequest) -> Result<Workshop> {
        let now = now_ts();

        let model = ActiveModel {
            name: Set(req.name),
            code: Set(req.code),
            description: Set(req.description),
            status: Set(RecordStatus::Activo.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| db_error("创建工坊失败", e))?;

        Ok(result.into_workshop())
    }

    pub async fn get_workshop_by_id_impl(&self, id: i64) -> Result<Option<Workshop>> {
        let result = Workshops::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| db_error("查询工坊失败", e))?;

        Ok(result.map(|m| m.into_workshop()))
    }

    pub async fn list_workshops_with_pagination_impl(
        &self,
        query: WorkshopListQuery,
    ) -> Result<WorkshopListResponse> {
        let (page, size) = normalize_page(query.page, query.size, 20);

        let mut select = Workshops::find()
            .filter(Column::Status.eq(query.status.unwrap_or_default().to_string()));

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let search = search.trim();
            select = select.filter(
                Condition::any()
                    .add(Column::Name.like(contains_pattern(search)))
                    .add(Column::Code.like(contains_pattern(search))),
            );
        }

        let paginator = select.order_by_asc(Column::Name).paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| db_error("查询工坊总数失败", e))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| db_error("查询工坊页数失败", e))?;
        let workshops = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| db_error("查询工坊列表失败", e))?;

        Ok(WorkshopListResponse {
            items: workshops.into_iter().map(|m| m.into_workshop()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    pub async fn update_workshop_impl(
        &self,
        id: i64,
        update: UpdateWorkshopRequest,
    ) -> Result<Option<Workshop>> {
        if self.get_workshop_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now_ts()),
            ..Default::default()
        };

        if let Some(name) = update.name {
            model.name = Set(name);
        }
        if let Some(code) = update.code {
            model.code = Set(code);
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }
        if let Some(status) = update.status {
            model.status = Set(status.to_string());
        }

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| db_error("更新工坊失败", e))?;

        Ok(Some(updated.into_workshop()))
    }

    /// 软删除
    pub async fn delete_workshop_impl(&self, id: i64) -> Result<bool> {
        let result = Workshops::update_many()
            .col_expr(Column::Status, Expr::value(RecordStatus::DELETED))
            .col_expr(Column::UpdatedAt, Expr::value(now_ts()))
            .filter(Column::Id.eq(id))
            .filter(Column::Status.eq(RecordStatus::ACTIVE))
            .exec(&self.db)
            .await
            .map_err(|e| db_error("删除工坊失败", e))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::memory_storage;
    use crate::errors::IMSystemError;
    use crate::models::workshops::requests::{
        CreateWorkshopRequest, UpdateWorkshopRequest, WorkshopListQuery,
    };

    fn workshop(name: &str, code: &str) -> CreateWorkshopRequest {
        CreateWorkshopRequest {
            name: name.to_string(),
            code: code.to_string(),
            description: None,
        }
    }

    #[tokio::test]
    async fn test_workshop_name_and_code_are_unique() {
        let storage = memory_storage().await;
        storage
            .create_workshop_impl(workshop("Electricidad", "ELE"))
            .await
            .unwrap();

        let same_name = storage
            .create_workshop_impl(workshop("Electricidad", "EL2"))
            .await;
        assert!(matches!(same_name, Err(IMSystemError::Conflict(_))));

        let same_code = storage
            .create_workshop_impl(workshop("Electrónica", "ELE"))
            .await;
        assert!(matches!(same_code, Err(IMSystemError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_workshop_update_and_soft_delete() {
        let storage = memory_storage().await;
        let w = storage
            .create_workshop_impl(workshop("Mecánica", "MEC"))
            .await
            .unwrap();
        storage
            .create_workshop_impl(workshop("Informática", "INF"))
            .await
            .unwrap();

        let updated = storage
            .update_workshop_impl(
                w.id,
                UpdateWorkshopRequest {
                    description: Some("Mecánica automotriz".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.description.as_deref(), Some("Mecánica automotriz"));
        assert_eq!(updated.code, "MEC");

        assert!(storage.delete_workshop_impl(w.id).await.unwrap());
        let list = storage
            .list_workshops_with_pagination_impl(WorkshopListQuery::default())
            .await
            .unwrap();
        assert_eq!(list.items.len(), 1);
        assert_eq!(list.items[0].code, "INF");
        assert_eq!(list.pagination.total, 1);

        // 软删除后记录仍可按 ID 读取
        let still_there = storage.get_workshop_by_id_impl(w.id).await.unwrap().unwrap();
        assert!(!still_there.status.is_active());
    }
}
