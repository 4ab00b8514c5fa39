//! 导师存储操作

use super::{SeaOrmStorage, db_error, now_ts, optional_text};
use crate::entity::tutors::{ActiveModel, Column, Entity as Tutors};
use crate::entity::users::{
    ActiveModel as UserActiveModel, Column as UserColumn, Entity as Users,
};
use crate::errors::Result;
use crate::models::{
    PaginationInfo, RecordStatus,
    common::pagination::normalize_page,
    tutors::{
        entities::Tutor,
        requests::{CreateTutorRequest, TutorListQuery, UpdateTutorRequest},
        responses::TutorListResponse,
    },
    users::entities::UserRole,
};
use crate::utils::sql::contains_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set, TransactionTrait, sea_query::Expr,
};

impl SeaOrmStorage {
    /// 创建导师及其登录账号（同一事务）
    pub async fn create_tutor_impl(&self, req: CreateTutorRequest) -> Result<Tutor> {
        let now = now_ts();
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| db_error("开启事务失败", e))?;

        let phone = req.phone.and_then(optional_text);
        let user = UserActiveModel {
            username: Set(req.username),
            email: Set(req.email),
            phone: Set(phone.clone()),
            password_hash: Set(req.password),
            role: Set(UserRole::Tutor.to_string()),
            status: Set(RecordStatus::Activo.to_string()),
            display_name: Set(Some(format!("{} {}", req.first_name, req.last_name))),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| db_error("创建导师账号失败", e))?;

        let tutor = ActiveModel {
            user_id: Set(user.id),
            workshop_id: Set(req.workshop_id),
            first_name: Set(req.first_name),
            last_name: Set(req.last_name),
            phone: Set(phone),
            status: Set(RecordStatus::Activo.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| db_error("创建导师失败", e))?;

        txn.commit()
            .await
            .map_err(|e| db_error("提交事务失败", e))?;

        Ok(tutor.into_tutor())
    }

    pub async fn get_tutor_by_id_impl(&self, id: i64) -> Result<Option<Tutor>> {
        let result = Tutors::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| db_error("查询导师失败", e))?;

        Ok(result.map(|m| m.into_tutor()))
    }

    pub async fn get_tutor_by_user_id_impl(&self, user_id: i64) -> Result<Option<Tutor>> {
        let result = Tutors::find()
            .filter(Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(|e| db_error("查询导师失败", e))?;

        Ok(result.map(|m| m.into_tutor()))
    }

    pub async fn list_tutors_with_pagination_impl(
        &self,
        query: TutorListQuery,
    ) -> Result<TutorListResponse> {
        let (page, size) = normalize_page(query.page, query.size, 20);

        let mut select = Tutors::find()
            .filter(Column::Status.eq(query.status.unwrap_or_default().to_string()));

        if let Some(workshop_id) = query.workshop_id {
            select = select.filter(Column::WorkshopId.eq(workshop_id));
        }

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let search = search.trim();
            select = select.filter(
                Condition::any()
                    .add(Column::FirstName.like(contains_pattern(search)))
                    .add(Column::LastName.like(contains_pattern(search))),
            );
        }

        let paginator = select
            .order_by_asc(Column::LastName)
            .order_by_asc(Column::FirstName)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| db_error("查询导师总数失败", e))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| db_error("查询导师页数失败", e))?;
        let tutors = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| db_error("查询导师列表失败", e))?;

        Ok(TutorListResponse {
            items: tutors.into_iter().map(|m| m.into_tutor()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    pub async fn update_tutor_impl(
        &self,
        id: i64,
        update: UpdateTutorRequest,
    ) -> Result<Option<Tutor>> {
        if self.get_tutor_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now_ts()),
            ..Default::default()
        };

        if let Some(workshop_id) = update.workshop_id {
            model.workshop_id = Set(workshop_id);
        }
        if let Some(first_name) = update.first_name {
            model.first_name = Set(first_name);
        }
        if let Some(last_name) = update.last_name {
            model.last_name = Set(last_name);
        }
        if let Some(phone) = update.phone {
            model.phone = Set(optional_text(phone));
        }
        if let Some(status) = update.status {
            model.status = Set(status.to_string());
        }

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| db_error("更新导师失败", e))?;

        Ok(Some(updated.into_tutor()))
    }

    /// 软删除导师，并停用其登录账号
    pub async fn delete_tutor_impl(&self, id: i64) -> Result<bool> {
        let Some(tutor) = Tutors::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| db_error("查询导师失败", e))?
        else {
            return Ok(false);
        };
        if tutor.status != RecordStatus::ACTIVE {
            return Ok(false);
        }

        let now = now_ts();
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| db_error("开启事务失败", e))?;

        Tutors::update_many()
            .col_expr(Column::Status, Expr::value(RecordStatus::DELETED))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::Id.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| db_error("删除导师失败", e))?;

        Users::update_many()
            .col_expr(UserColumn::Status, Expr::value(RecordStatus::DELETED))
            .col_expr(UserColumn::UpdatedAt, Expr::value(now))
            .filter(UserColumn::Id.eq(tutor.user_id))
            .exec(&txn)
            .await
            .map_err(|e| db_error("停用导师账号失败", e))?;

        txn.commit()
            .await
            .map_err(|e| db_error("提交事务失败", e))?;

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::memory_storage;
    use crate::errors::IMSystemError;
    use crate::models::RecordStatus;
    use crate::models::tutors::requests::{CreateTutorRequest, TutorListQuery};
    use crate::models::users::entities::UserRole;
    use crate::models::workshops::requests::CreateWorkshopRequest;

    fn tutor(username: &str, phone: Option<&str>, workshop_id: i64) -> CreateTutorRequest {
        CreateTutorRequest {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password: "hashed".to_string(),
            workshop_id,
            first_name: "Marta".to_string(),
            last_name: username.to_string(),
            phone: phone.map(str::to_string),
        }
    }

    async fn workshop(storage: &super::SeaOrmStorage, code: &str) -> i64 {
        storage
            .create_workshop_impl(CreateWorkshopRequest {
                name: format!("Taller {code}"),
                code: code.to_string(),
                description: None,
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_tutor_phone_is_unique_only_when_present() {
        let storage = memory_storage().await;
        let w = workshop(&storage, "ELE").await;

        let t = storage
            .create_tutor_impl(tutor("pena", Some("809-555-0001"), w))
            .await
            .unwrap();
        let user = storage.get_user_by_id_impl(t.user_id).await.unwrap().unwrap();
        assert_eq!(user.role, UserRole::Tutor);
        assert_eq!(user.phone.as_deref(), Some("809-555-0001"));

        let dup = storage
            .create_tutor_impl(tutor("mora", Some("809-555-0001"), w))
            .await;
        assert!(matches!(dup, Err(IMSystemError::Conflict(_))));
        // 回滚后用户名可以再次使用
        assert!(
            storage
                .get_user_by_username_or_email_impl("mora")
                .await
                .unwrap()
                .is_none()
        );

        storage
            .create_tutor_impl(tutor("leon", Some(""), w))
            .await
            .unwrap();
        storage
            .create_tutor_impl(tutor("cruz", Some(" "), w))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_delete_tutor_is_soft_and_hides_from_list() {
        let storage = memory_storage().await;
        let w = workshop(&storage, "MEC").await;
        let kept = storage
            .create_tutor_impl(tutor("rios", None, w))
            .await
            .unwrap();
        let gone = storage
            .create_tutor_impl(tutor("soto", None, w))
            .await
            .unwrap();

        assert!(storage.delete_tutor_impl(gone.id).await.unwrap());
        assert!(!storage.delete_tutor_impl(gone.id).await.unwrap());

        let row = storage.get_tutor_by_id_impl(gone.id).await.unwrap().unwrap();
        assert_eq!(row.status, RecordStatus::Eliminado);
        let account = storage.get_user_by_id_impl(gone.user_id).await.unwrap().unwrap();
        assert_eq!(account.status, RecordStatus::Eliminado);

        let active = storage
            .list_tutors_with_pagination_impl(TutorListQuery {
                workshop_id: Some(w),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(active.items.len(), 1);
        assert_eq!(active.items[0].id, kept.id);

        let deleted = storage
            .list_tutors_with_pagination_impl(TutorListQuery {
                status: Some(RecordStatus::Eliminado),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(deleted.items.len(), 1);
    }
}
