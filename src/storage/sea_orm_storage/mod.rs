//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod companies;
mod contacts;
mod documents;
mod evaluations;
mod grading;
mod internships;
mod modules;
mod reports;
mod students;
mod tutors;
mod users;
mod workshops;

use crate::config::AppConfig;
use crate::errors::{IMSystemError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr, SqlErr};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        let storage = Self::from_connection(db).await?;
        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(storage)
    }

    /// 使用已有连接创建存储并执行迁移
    pub async fn from_connection(db: DatabaseConnection) -> Result<Self> {
        Migrator::up(&db, None)
            .await
            .map_err(|e| IMSystemError::database_operation(format!("数据库迁移失败: {e}")))?;

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| IMSystemError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| IMSystemError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(2)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| IMSystemError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite://") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(IMSystemError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

/// 数据库错误转换：唯一约束冲突映射为 Conflict，外键不存在映射为 Validation
pub(crate) fn db_error(context: &str, err: DbErr) -> IMSystemError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            IMSystemError::conflict(format!("{context}: {detail}"))
        }
        Some(SqlErr::ForeignKeyConstraintViolation(detail)) => {
            IMSystemError::validation(format!("{context}: referenced record does not exist ({detail})"))
        }
        _ => IMSystemError::database_operation(format!("{context}: {err}")),
    }
}

/// 可选文本字段：空白视为未填写，唯一列因此只约束有值的记录
pub(crate) fn optional_text(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// 当前 UNIX 秒
pub(crate) fn now_ts() -> i64 {
    chrono::Utc::now().timestamp()
}

// Storage trait 实现
use crate::models::{
    companies::{
        entities::Company,
        requests::{CompanyListQuery, CreateCompanyRequest, UpdateCompanyRequest},
        responses::CompanyListResponse,
    },
    contacts::{
        entities::Contact,
        requests::{ContactListQuery, CreateContactRequest, UpdateContactRequest},
        responses::ContactListResponse,
    },
    documents::{
        entities::Document,
        requests::{DocumentListQuery, NewDocument},
        responses::DocumentListResponse,
    },
    evaluations::entities::{Evaluation, RaScores},
    grades::{entities::Grade, requests::GradeListQuery, responses::GradeListResponse},
    internships::{
        entities::{Internship, InternshipStatus},
        requests::{CreateInternshipRequest, InternshipListQuery, UpdateInternshipRequest},
        responses::{ClosureResponse, InternshipListResponse},
    },
    modules::{
        entities::InternshipModule, requests::ModuleListQuery, responses::ModuleListResponse,
    },
    reports::responses::InternshipStatusCounts,
    students::{
        entities::Student,
        requests::{CreateStudentRequest, StudentListQuery, UpdateStudentRequest},
        responses::StudentListResponse,
    },
    tutors::{
        entities::Tutor,
        requests::{CreateTutorRequest, TutorListQuery, UpdateTutorRequest},
        responses::TutorListResponse,
    },
    users::{
        entities::User,
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
        responses::UserListResponse,
    },
    workshops::{
        entities::Workshop,
        requests::{CreateWorkshopRequest, UpdateWorkshopRequest, WorkshopListQuery},
        responses::WorkshopListResponse,
    },
};
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>> {
        self.get_user_by_username_or_email_impl(identifier).await
    }

    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse> {
        self.list_users_with_pagination_impl(query).await
    }

    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>> {
        self.update_user_impl(id, update).await
    }

    async fn delete_user(&self, id: i64) -> Result<bool> {
        self.delete_user_impl(id).await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    async fn count_users(&self) -> Result<u64> {
        self.count_users_impl().await
    }

    // 工坊模块
    async fn create_workshop(&self, req: CreateWorkshopRequest) -> Result<Workshop> {
        self.create_workshop_impl(req).await
    }

    async fn get_workshop_by_id(&self, id: i64) -> Result<Option<Workshop>> {
        self.get_workshop_by_id_impl(id).await
    }

    async fn list_workshops_with_pagination(
        &self,
        query: WorkshopListQuery,
    ) -> Result<WorkshopListResponse> {
        self.list_workshops_with_pagination_impl(query).await
    }

    async fn update_workshop(
        &self,
        id: i64,
        update: UpdateWorkshopRequest,
    ) -> Result<Option<Workshop>> {
        self.update_workshop_impl(id, update).await
    }

    async fn delete_workshop(&self, id: i64) -> Result<bool> {
        self.delete_workshop_impl(id).await
    }

    // 企业模块
    async fn create_company(&self, req: CreateCompanyRequest) -> Result<Company> {
        self.create_company_impl(req).await
    }

    async fn get_company_by_id(&self, id: i64) -> Result<Option<Company>> {
        self.get_company_by_id_impl(id).await
    }

    async fn get_company_by_user_id(&self, user_id: i64) -> Result<Option<Company>> {
        self.get_company_by_user_id_impl(user_id).await
    }

    async fn list_companies_with_pagination(
        &self,
        query: CompanyListQuery,
    ) -> Result<CompanyListResponse> {
        self.list_companies_with_pagination_impl(query).await
    }

    async fn update_company(
        &self,
        id: i64,
        update: UpdateCompanyRequest,
    ) -> Result<Option<Company>> {
        self.update_company_impl(id, update).await
    }

    async fn delete_company(&self, id: i64) -> Result<bool> {
        self.delete_company_impl(id).await
    }

    // 联系人模块
    async fn create_contact(&self, req: CreateContactRequest) -> Result<Contact> {
        self.create_contact_impl(req).await
    }

    async fn get_contact_by_id(&self, id: i64) -> Result<Option<Contact>> {
        self.get_contact_by_id_impl(id).await
    }

    async fn list_contacts_with_pagination(
        &self,
        query: ContactListQuery,
    ) -> Result<ContactListResponse> {
        self.list_contacts_with_pagination_impl(query).await
    }

    async fn update_contact(
        &self,
        id: i64,
        update: UpdateContactRequest,
    ) -> Result<Option<Contact>> {
        self.update_contact_impl(id, update).await
    }

    async fn delete_contact(&self, id: i64) -> Result<bool> {
        self.delete_contact_impl(id).await
    }

    // 学生模块
    async fn create_student(&self, req: CreateStudentRequest) -> Result<Student> {
        self.create_student_impl(req).await
    }

    async fn get_student_by_id(&self, id: i64) -> Result<Option<Student>> {
        self.get_student_by_id_impl(id).await
    }

    async fn get_student_by_user_id(&self, user_id: i64) -> Result<Option<Student>> {
        self.get_student_by_user_id_impl(user_id).await
    }

    async fn list_students_with_pagination(
        &self,
        query: StudentListQuery,
    ) -> Result<StudentListResponse> {
        self.list_students_with_pagination_impl(query).await
    }

    async fn update_student(
        &self,
        id: i64,
        update: UpdateStudentRequest,
    ) -> Result<Option<Student>> {
        self.update_student_impl(id, update).await
    }

    async fn delete_student(&self, id: i64) -> Result<bool> {
        self.delete_student_impl(id).await
    }

    // 导师模块
    async fn create_tutor(&self, req: CreateTutorRequest) -> Result<Tutor> {
        self.create_tutor_impl(req).await
    }

    async fn get_tutor_by_id(&self, id: i64) -> Result<Option<Tutor>> {
        self.get_tutor_by_id_impl(id).await
    }

    async fn get_tutor_by_user_id(&self, user_id: i64) -> Result<Option<Tutor>> {
        self.get_tutor_by_user_id_impl(user_id).await
    }

    async fn list_tutors_with_pagination(
        &self,
        query: TutorListQuery,
    ) -> Result<TutorListResponse> {
        self.list_tutors_with_pagination_impl(query).await
    }

    async fn update_tutor(&self, id: i64, update: UpdateTutorRequest) -> Result<Option<Tutor>> {
        self.update_tutor_impl(id, update).await
    }

    async fn delete_tutor(&self, id: i64) -> Result<bool> {
        self.delete_tutor_impl(id).await
    }

    // 实习模块
    async fn create_internship(
        &self,
        req: CreateInternshipRequest,
        created_by: i64,
    ) -> Result<Internship> {
        self.create_internship_impl(req, created_by).await
    }

    async fn get_internship_by_id(&self, id: i64) -> Result<Option<Internship>> {
        self.get_internship_by_id_impl(id).await
    }

    async fn list_internships_with_pagination(
        &self,
        query: InternshipListQuery,
    ) -> Result<InternshipListResponse> {
        self.list_internships_with_pagination_impl(query).await
    }

    async fn update_internship(
        &self,
        id: i64,
        update: UpdateInternshipRequest,
    ) -> Result<Option<Internship>> {
        self.update_internship_impl(id, update).await
    }

    async fn transition_internship(
        &self,
        id: i64,
        next: InternshipStatus,
    ) -> Result<Option<Internship>> {
        self.transition_internship_impl(id, next).await
    }

    async fn list_internship_ids_by_status(
        &self,
        status: InternshipStatus,
        workshop_id: Option<i64>,
    ) -> Result<Vec<i64>> {
        self.list_internship_ids_by_status_impl(status, workshop_id)
            .await
    }

    // 评价模块
    async fn upsert_evaluation(
        &self,
        internship_id: i64,
        evaluator_id: i64,
        scores: RaScores,
        comment: Option<String>,
    ) -> Result<Evaluation> {
        self.upsert_evaluation_impl(internship_id, evaluator_id, scores, comment)
            .await
    }

    async fn list_evaluations_by_internship(&self, internship_id: i64) -> Result<Vec<Evaluation>> {
        self.list_evaluations_by_internship_impl(internship_id)
            .await
    }

    // 成绩模块
    async fn save_grade(
        &self,
        internship_id: i64,
        graded_by: i64,
        pass_threshold: f64,
    ) -> Result<ClosureResponse> {
        self.grade_internship_impl(internship_id, graded_by, pass_threshold, false)
            .await
    }

    async fn close_internship(
        &self,
        internship_id: i64,
        graded_by: i64,
        pass_threshold: f64,
    ) -> Result<ClosureResponse> {
        self.grade_internship_impl(internship_id, graded_by, pass_threshold, true)
            .await
    }

    async fn get_grade_by_internship(&self, internship_id: i64) -> Result<Option<Grade>> {
        self.get_grade_by_internship_impl(internship_id).await
    }

    async fn list_grades_with_pagination(
        &self,
        query: GradeListQuery,
    ) -> Result<GradeListResponse> {
        self.list_grades_with_pagination_impl(query).await
    }

    // 模块
    async fn get_module_by_id(&self, id: i64) -> Result<Option<InternshipModule>> {
        self.get_module_by_id_impl(id).await
    }

    async fn list_modules_with_pagination(
        &self,
        query: ModuleListQuery,
    ) -> Result<ModuleListResponse> {
        self.list_modules_with_pagination_impl(query).await
    }

    async fn list_all_modules(&self, workshop_id: Option<i64>) -> Result<Vec<InternshipModule>> {
        self.list_all_modules_impl(workshop_id).await
    }

    // 文档模块
    async fn create_document(&self, doc: NewDocument) -> Result<Document> {
        self.create_document_impl(doc).await
    }

    async fn get_document_by_token(&self, token: &str) -> Result<Option<Document>> {
        self.get_document_by_token_impl(token).await
    }

    async fn list_documents_with_pagination(
        &self,
        query: DocumentListQuery,
    ) -> Result<DocumentListResponse> {
        self.list_documents_with_pagination_impl(query).await
    }

    // 报表
    async fn count_students(&self, workshop_id: Option<i64>) -> Result<(i64, i64)> {
        self.count_students_impl(workshop_id).await
    }

    async fn count_internships_by_status(
        &self,
        workshop_id: Option<i64>,
    ) -> Result<InternshipStatusCounts> {
        self.count_internships_by_status_impl(workshop_id).await
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::SeaOrmStorage;
    use sea_orm::{ConnectOptions, Database};

    /// 内存 SQLite，单连接保证所有查询落在同一个库上
    pub(crate) async fn memory_storage() -> SeaOrmStorage {
        let mut opt = ConnectOptions::new("sqlite::memory:");
        opt.max_connections(1)
            .min_connections(1)
            .sqlx_logging(false);
        let db = Database::connect(opt)
            .await
            .expect("failed to open in-memory sqlite");
        SeaOrmStorage::from_connection(db)
            .await
            .expect("failed to migrate in-memory sqlite")
    }
}
