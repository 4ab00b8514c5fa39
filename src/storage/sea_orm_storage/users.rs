use super::{SeaOrmStorage, db_error, now_ts, optional_text};
use crate::entity::users::{ActiveModel, Column, Entity as Users};
use crate::errors::Result;
use crate::models::{
    PaginationInfo, RecordStatus,
    common::pagination::normalize_page,
    users::{
        entities::User,
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
        responses::UserListResponse,
    },
};
use crate::utils::sql::contains_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};

impl SeaOrmStorage {
    /// 创建用户（password 字段为已哈希的密码）
    pub async fn create_user_impl(&self, req: CreateUserRequest) -> Result<User> {
        let now = now_ts();

        let model = ActiveModel {
            username: Set(req.username),
            email: Set(req.email),
            phone: Set(req.phone.and_then(optional_text)),
            password_hash: Set(req.password),
            role: Set(req.role.to_string()),
            status: Set(RecordStatus::Activo.to_string()),
            display_name: Set(req.display_name),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| db_error("创建用户失败", e))?;

        Ok(result.into_user())
    }

    /// 通过 ID 获取用户
    pub async fn get_user_by_id_impl(&self, id: i64) -> Result<Option<User>> {
        let result = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| db_error("查询用户失败", e))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过用户名或邮箱获取用户
    pub async fn get_user_by_username_or_email_impl(
        &self,
        identifier: &str,
    ) -> Result<Option<User>> {
        let result = Users::find()
            .filter(
                Condition::any()
                    .add(Column::Username.eq(identifier))
                    .add(Column::Email.eq(identifier)),
            )
            .one(&self.db)
            .await
            .map_err(|e| db_error("查询用户失败", e))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 分页列出用户
    pub async fn list_users_with_pagination_impl(
        &self,
        query: UserListQuery,
    ) -> Result<UserListResponse> {
        let (page, size) = normalize_page(query.page, query.size, 10);

        let mut select = Users::find();

        // 搜索条件
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let search = search.trim();
            select = select.filter(
                Condition::any()
                    .add(Column::Username.like(contains_pattern(search)))
                    .add(Column::Email.like(contains_pattern(search)))
                    .add(Column::DisplayName.like(contains_pattern(search))),
            );
        }

        if let Some(ref role) = query.role {
            select = select.filter(Column::Role.eq(role.to_string()));
        }

        // 默认隐藏已删除用户
        let status = query.status.unwrap_or(RecordStatus::Activo);
        select = select.filter(Column::Status.eq(status.to_string()));

        select = select.order_by_desc(Column::CreatedAt);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| db_error("查询用户总数失败", e))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| db_error("查询用户页数失败", e))?;
        let users = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| db_error("查询用户列表失败", e))?;

        Ok(UserListResponse {
            items: users.into_iter().map(|m| m.into_user()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    /// 更新用户最后登录时间
    pub async fn update_last_login_impl(&self, id: i64) -> Result<bool> {
        let result = Users::update_many()
            .col_expr(Column::LastLogin, sea_orm::sea_query::Expr::value(now_ts()))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| db_error("更新最后登录时间失败", e))?;

        Ok(result.rows_affected > 0)
    }

    /// 更新用户信息
    pub async fn update_user_impl(
        &self,
        id: i64,
        update: UpdateUserRequest,
    ) -> Result<Option<User>> {
        if self.get_user_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now_ts()),
            ..Default::default()
        };

        if let Some(email) = update.email {
            model.email = Set(email);
        }
        if let Some(password) = update.password {
            model.password_hash = Set(password);
        }
        if let Some(role) = update.role {
            model.role = Set(role.to_string());
        }
        if let Some(status) = update.status {
            model.status = Set(status.to_string());
        }
        if let Some(display_name) = update.display_name {
            model.display_name = Set(Some(display_name));
        }
        // 空字符串表示清除手机号
        if let Some(phone) = update.phone {
            model.phone = Set(optional_text(phone));
        }

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| db_error("更新用户失败", e))?;

        Ok(Some(updated.into_user()))
    }

    /// 软删除用户
    pub async fn delete_user_impl(&self, id: i64) -> Result<bool> {
        let result = Users::update_many()
            .col_expr(
                Column::Status,
                sea_orm::sea_query::Expr::value(RecordStatus::Eliminado.to_string()),
            )
            .col_expr(Column::UpdatedAt, sea_orm::sea_query::Expr::value(now_ts()))
            .filter(Column::Id.eq(id))
            .filter(Column::Status.eq(RecordStatus::Activo.to_string()))
            .exec(&self.db)
            .await
            .map_err(|e| db_error("删除用户失败", e))?;

        Ok(result.rows_affected > 0)
    }

    /// 统计用户数量
    pub async fn count_users_impl(&self) -> Result<u64> {
        Users::find()
            .count(&self.db)
            .await
            .map_err(|e| db_error("统计用户数量失败", e))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::memory_storage;
    use crate::errors::IMSystemError;
    use crate::models::RecordStatus;
    use crate::models::users::entities::UserRole;
    use crate::models::users::requests::{CreateUserRequest, UpdateUserRequest, UserListQuery};

    fn new_user(username: &str, email: &str, phone: Option<&str>) -> CreateUserRequest {
        CreateUserRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: "hashed".to_string(),
            role: UserRole::Supervisor,
            display_name: None,
            phone: phone.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_duplicate_username_email_phone_conflict() {
        let storage = memory_storage().await;
        storage
            .create_user_impl(new_user("ana", "ana@example.com", Some("8091234567")))
            .await
            .unwrap();

        let dup_name = storage
            .create_user_impl(new_user("ana", "other@example.com", None))
            .await;
        assert!(matches!(dup_name, Err(IMSystemError::Conflict(_))));

        let dup_email = storage
            .create_user_impl(new_user("bob", "ana@example.com", None))
            .await;
        assert!(matches!(dup_email, Err(IMSystemError::Conflict(_))));

        let dup_phone = storage
            .create_user_impl(new_user("carl", "carl@example.com", Some("8091234567")))
            .await;
        assert!(matches!(dup_phone, Err(IMSystemError::Conflict(_))));

        // 多个无手机号用户可以共存
        storage
            .create_user_impl(new_user("dan", "dan@example.com", None))
            .await
            .unwrap();
        assert_eq!(storage.count_users_impl().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_soft_delete_hides_user_from_default_list() {
        let storage = memory_storage().await;
        let user = storage
            .create_user_impl(new_user("eve", "eve@example.com", None))
            .await
            .unwrap();

        assert!(storage.delete_user_impl(user.id).await.unwrap());
        // 重复删除无效果
        assert!(!storage.delete_user_impl(user.id).await.unwrap());

        let active = storage
            .list_users_with_pagination_impl(UserListQuery::default())
            .await
            .unwrap();
        assert!(active.items.is_empty());

        let deleted = storage
            .list_users_with_pagination_impl(UserListQuery {
                status: Some(RecordStatus::Eliminado),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(deleted.items.len(), 1);
        assert_eq!(deleted.items[0].status, RecordStatus::Eliminado);
    }

    #[tokio::test]
    async fn test_update_user_and_search() {
        let storage = memory_storage().await;
        let user = storage
            .create_user_impl(new_user("frank_01", "frank@example.com", None))
            .await
            .unwrap();
        storage
            .create_user_impl(new_user("frankie", "frankie@example.com", None))
            .await
            .unwrap();

        let updated = storage
            .update_user_impl(
                user.id,
                UpdateUserRequest {
                    display_name: Some("Frank".to_string()),
                    phone: Some("8090000000".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.display_name.as_deref(), Some("Frank"));
        assert_eq!(updated.phone.as_deref(), Some("8090000000"));

        // 下划线按字面匹配
        let found = storage
            .list_users_with_pagination_impl(UserListQuery {
                search: Some("frank_".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(found.items.len(), 1);
        assert_eq!(found.items[0].id, user.id);

        assert!(
            storage
                .update_user_impl(9999, UpdateUserRequest::default())
                .await
                .unwrap()
                .is_none()
        );
    }
}
