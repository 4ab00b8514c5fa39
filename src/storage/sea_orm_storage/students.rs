//! 学生存储操作

use super::{SeaOrmStorage, db_error, now_ts, optional_text};
use crate::entity::students::{ActiveModel, Column, Entity as Students};
use crate::entity::users::{
    ActiveModel as UserActiveModel, Column as UserColumn, Entity as Users,
};
use crate::errors::Result;
use crate::models::{
    PaginationInfo, RecordStatus,
    common::pagination::normalize_page,
    students::{
        entities::Student,
        requests::{CreateStudentRequest, StudentListQuery, UpdateStudentRequest},
        responses::StudentListResponse,
    },
    users::entities::UserRole,
};
use crate::utils::sql::contains_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set, TransactionTrait, sea_query::Expr,
};

impl SeaOrmStorage {
    /// 创建学生及其登录账号（同一事务）
    pub async fn create_student_impl(&self, req: CreateStudentRequest) -> Result<Student> {
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
            role: Set(UserRole::Student.to_string()),
            status: Set(RecordStatus::Activo.to_string()),
            display_name: Set(Some(format!("{} {}", req.first_name, req.last_name))),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| db_error("创建学生账号失败", e))?;

        let student = ActiveModel {
            user_id: Set(user.id),
            workshop_id: Set(req.workshop_id),
            first_name: Set(req.first_name),
            last_name: Set(req.last_name),
            document_id: Set(req.document_id.and_then(optional_text)),
            phone: Set(phone),
            status: Set(RecordStatus::Activo.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| db_error("创建学生失败", e))?;

        txn.commit()
            .await
            .map_err(|e| db_error("提交事务失败", e))?;

        Ok(student.into_student())
    }

    pub async fn get_student_by_id_impl(&self, id: i64) -> Result<Option<Student>> {
        let result = Students::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| db_error("查询学生失败", e))?;

        Ok(result.map(|m| m.into_student()))
    }

    pub async fn get_student_by_user_id_impl(&self, user_id: i64) -> Result<Option<Student>> {
        let result = Students::find()
            .filter(Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(|e| db_error("查询学生失败", e))?;

        Ok(result.map(|m| m.into_student()))
    }

    pub async fn list_students_with_pagination_impl(
        &self,
        query: StudentListQuery,
    ) -> Result<StudentListResponse> {
        let (page, size) = normalize_page(query.page, query.size, 20);

        let mut select = Students::find()
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
                    .add(Column::LastName.like(contains_pattern(search)))
                    .add(Column::DocumentId.like(contains_pattern(search))),
            );
        }

        let paginator = select
            .order_by_asc(Column::LastName)
            .order_by_asc(Column::FirstName)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| db_error("查询学生总数失败", e))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| db_error("查询学生页数失败", e))?;
        let students = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| db_error("查询学生列表失败", e))?;

        Ok(StudentListResponse {
            items: students.into_iter().map(|m| m.into_student()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    pub async fn update_student_impl(
        &self,
        id: i64,
        update: UpdateStudentRequest,
    ) -> Result<Option<Student>> {
        if self.get_student_by_id_impl(id).await?.is_none() {
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
        if let Some(document_id) = update.document_id {
            model.document_id = Set(optional_text(document_id));
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
            .map_err(|e| db_error("更新学生失败", e))?;

        Ok(Some(updated.into_student()))
    }

    /// 软删除学生，并停用其登录账号
    pub async fn delete_student_impl(&self, id: i64) -> Result<bool> {
        let Some(student) = Students::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| db_error("查询学生失败", e))?
        else {
            return Ok(false);
        };
        if student.status != RecordStatus::ACTIVE {
            return Ok(false);
        }

        let now = now_ts();
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| db_error("开启事务失败", e))?;

        Students::update_many()
            .col_expr(Column::Status, Expr::value(RecordStatus::DELETED))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::Id.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| db_error("删除学生失败", e))?;

        Users::update_many()
            .col_expr(UserColumn::Status, Expr::value(RecordStatus::DELETED))
            .col_expr(UserColumn::UpdatedAt, Expr::value(now))
            .filter(UserColumn::Id.eq(student.user_id))
            .exec(&txn)
            .await
            .map_err(|e| db_error("停用学生账号失败", e))?;

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
    use crate::models::common::pagination::MAX_PAGE;
    use crate::models::students::requests::{
        CreateStudentRequest, StudentListQuery, UpdateStudentRequest,
    };
    use crate::models::users::entities::UserRole;
    use crate::models::workshops::requests::CreateWorkshopRequest;

    fn student(username: &str, document_id: &str, workshop_id: i64) -> CreateStudentRequest {
        CreateStudentRequest {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password: "hashed".to_string(),
            workshop_id,
            first_name: "Luis".to_string(),
            last_name: username.to_string(),
            document_id: Some(document_id.to_string()),
            phone: None,
        }
    }

    #[tokio::test]
    async fn test_create_student_creates_account() {
        let storage = memory_storage().await;
        let w = storage
            .create_workshop_impl(CreateWorkshopRequest {
                name: "Electricidad".to_string(),
                code: "ELE".to_string(),
                description: None,
            })
            .await
            .unwrap();

        let s = storage
            .create_student_impl(student("perez", "001-0000001-1", w.id))
            .await
            .unwrap();
        let user = storage.get_user_by_id_impl(s.user_id).await.unwrap().unwrap();
        assert_eq!(user.role, UserRole::Student);
        assert_eq!(user.display_name.as_deref(), Some("Luis perez"));

        let by_user = storage
            .get_student_by_user_id_impl(user.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_user.id, s.id);
    }

    #[tokio::test]
    async fn test_duplicate_document_rolls_back_account() {
        let storage = memory_storage().await;
        let w = storage
            .create_workshop_impl(CreateWorkshopRequest {
                name: "Mecánica".to_string(),
                code: "MEC".to_string(),
                description: None,
            })
            .await
            .unwrap();

        storage
            .create_student_impl(student("gomez", "001-0000002-2", w.id))
            .await
            .unwrap();
        let dup = storage
            .create_student_impl(student("diaz", "001-0000002-2", w.id))
            .await;
        assert!(matches!(dup, Err(IMSystemError::Conflict(_))));

        // 事务回滚，账号不应残留
        assert!(
            storage
                .get_user_by_username_or_email_impl("diaz")
                .await
                .unwrap()
                .is_none()
        );
        assert_eq!(storage.count_users_impl().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_unknown_workshop_is_rejected() {
        let storage = memory_storage().await;
        let result = storage
            .create_student_impl(student("ruiz", "001-0000003-3", 42))
            .await;
        assert!(matches!(result, Err(IMSystemError::Validation(_))));
    }

    #[tokio::test]
    async fn test_delete_student_disables_account() {
        let storage = memory_storage().await;
        let w = storage
            .create_workshop_impl(CreateWorkshopRequest {
                name: "Informática".to_string(),
                code: "INF".to_string(),
                description: None,
            })
            .await
            .unwrap();
        let s = storage
            .create_student_impl(student("vega", "001-0000004-4", w.id))
            .await
            .unwrap();

        assert!(storage.delete_student_impl(s.id).await.unwrap());
        assert!(!storage.delete_student_impl(s.id).await.unwrap());

        let user = storage.get_user_by_id_impl(s.user_id).await.unwrap().unwrap();
        assert_eq!(user.status, RecordStatus::Eliminado);

        let list = storage
            .list_students_with_pagination_impl(StudentListQuery {
                workshop_id: Some(w.id),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(list.items.is_empty());
    }

    #[tokio::test]
    async fn test_blank_phone_is_stored_as_null() {
        let storage = memory_storage().await;
        let w = storage
            .create_workshop_impl(CreateWorkshopRequest {
                name: "Contabilidad".to_string(),
                code: "CON".to_string(),
                description: None,
            })
            .await
            .unwrap();

        // 表单提交的空字符串不应占用唯一列
        let mut first = student("uno", "", w.id);
        first.phone = Some(String::new());
        let mut second = student("dos", "  ", w.id);
        second.phone = Some("   ".to_string());

        let a = storage.create_student_impl(first).await.unwrap();
        let b = storage.create_student_impl(second).await.unwrap();
        assert!(a.phone.is_none());
        assert!(b.phone.is_none());
        assert!(b.document_id.is_none());
        let user = storage.get_user_by_id_impl(b.user_id).await.unwrap().unwrap();
        assert!(user.phone.is_none());

        let updated = storage
            .update_student_impl(
                a.id,
                UpdateStudentRequest {
                    phone: Some(" 809-555-0101 ".to_string()),
                    document_id: Some(String::new()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.phone.as_deref(), Some("809-555-0101"));
        assert!(updated.document_id.is_none());
    }

    #[tokio::test]
    async fn test_huge_page_returns_empty_list() {
        let storage = memory_storage().await;
        let list = storage
            .list_students_with_pagination_impl(StudentListQuery {
                page: Some(i64::MAX),
                size: Some(100),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(list.items.is_empty());
        assert_eq!(list.pagination.page, MAX_PAGE);
    }
}
