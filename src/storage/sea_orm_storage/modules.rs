//! 实习模块存储操作

use super::{SeaOrmStorage, db_error};
use crate::entity::modules::{Column, Entity as Modules};
use crate::errors::Result;
use crate::models::{
    PaginationInfo,
    common::pagination::normalize_page,
    modules::{
        entities::InternshipModule, requests::ModuleListQuery, responses::ModuleListResponse,
    },
};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};

impl SeaOrmStorage {
    pub async fn get_module_by_id_impl(&self, id: i64) -> Result<Option<InternshipModule>> {
        let result = Modules::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| db_error("查询实习模块失败", e))?;

        Ok(result.map(|m| m.into_module()))
    }

    pub async fn list_modules_with_pagination_impl(
        &self,
        query: ModuleListQuery,
    ) -> Result<ModuleListResponse> {
        let (page, size) = normalize_page(query.page, query.size, 20);

        let mut select = Modules::find();
        if let Some(student_id) = query.student_id {
            select = select.filter(Column::StudentId.eq(student_id));
        }
        if let Some(workshop_id) = query.workshop_id {
            select = select.filter(Column::WorkshopId.eq(workshop_id));
        }
        if let Some(result) = query.result {
            select = select.filter(Column::Result.eq(result.to_string()));
        }

        let paginator = select
            .order_by_desc(Column::UpdatedAt)
            .order_by_desc(Column::Id)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| db_error("查询实习模块总数失败", e))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| db_error("查询实习模块页数失败", e))?;
        let modules = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| db_error("查询实习模块列表失败", e))?;

        Ok(ModuleListResponse {
            items: modules.into_iter().map(|m| m.into_module()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    pub async fn list_all_modules_impl(
        &self,
        workshop_id: Option<i64>,
    ) -> Result<Vec<InternshipModule>> {
        let mut select = Modules::find();
        if let Some(workshop_id) = workshop_id {
            select = select.filter(Column::WorkshopId.eq(workshop_id));
        }

        let rows = select
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| db_error("查询实习模块失败", e))?;

        Ok(rows.into_iter().map(|m| m.into_module()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::super::SeaOrmStorage;
    use super::super::internships::fixtures::{seed, started_internship};
    use super::super::test_support::memory_storage;
    use crate::models::evaluations::entities::RaScores;
    use crate::models::grades::entities::GradeResult;
    use crate::models::modules::requests::ModuleListQuery;
    use crate::models::users::{entities::UserRole, requests::CreateUserRequest};

    async fn graded_module(storage: &SeaOrmStorage, tag: &str, evaluator: i64, score: f64) -> i64 {
        let s = seed(storage, tag).await;
        let i = started_internship(storage, s.student.id, s.company_id).await;
        storage
            .upsert_evaluation_impl(i.id, evaluator, RaScores::from_array([score; 7]), None)
            .await
            .unwrap();
        storage
            .grade_internship_impl(i.id, evaluator, 70.0, true)
            .await
            .unwrap();
        s.workshop_id
    }

    #[tokio::test]
    async fn test_module_list_filters() {
        let storage = memory_storage().await;
        let evaluator = storage
            .create_user_impl(CreateUserRequest {
                username: "evaluador".to_string(),
                email: "evaluador@example.com".to_string(),
                password: "hashed".to_string(),
                role: UserRole::Supervisor,
                display_name: None,
                phone: None,
            })
            .await
            .unwrap()
            .id;

        let ele = graded_module(&storage, "ele", evaluator, 90.0).await;
        let mec = graded_module(&storage, "mec", evaluator, 40.0).await;

        let all = storage
            .list_modules_with_pagination_impl(ModuleListQuery::default())
            .await
            .unwrap();
        assert_eq!(all.pagination.total, 2);

        let of_ele = storage
            .list_modules_with_pagination_impl(ModuleListQuery {
                workshop_id: Some(ele),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(of_ele.items.len(), 1);
        assert_eq!(of_ele.items[0].result, GradeResult::Aprobado);

        let student = of_ele.items[0].student_id;
        let own = storage
            .list_modules_with_pagination_impl(ModuleListQuery {
                student_id: Some(student),
                workshop_id: Some(mec),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(own.items.is_empty());

        let failed = storage
            .list_modules_with_pagination_impl(ModuleListQuery {
                result: Some(GradeResult::Reprobado),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(failed.items.len(), 1);
        assert_eq!(failed.items[0].workshop_id, mec);

        let per_workshop = storage.list_all_modules_impl(Some(mec)).await.unwrap();
        assert_eq!(per_workshop.len(), 1);
        let module = storage
            .get_module_by_id_impl(per_workshop[0].id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(module.average, 40.0);
    }
}
