use std::sync::Arc;

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

use crate::errors::Result;

pub mod sea_orm_storage;

/// 存储层抽象
///
/// 密码字段在进入存储层前必须已经是哈希值。
/// 删除操作对基础数据均为软删除（状态置为 `Eliminado`）。
#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过用户名或邮箱获取用户信息
    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>>;
    // 列出用户
    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse>;
    // 更新用户信息
    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>>;
    // 软删除用户
    async fn delete_user(&self, id: i64) -> Result<bool>;
    // 更新用户最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    // 统计用户数量
    async fn count_users(&self) -> Result<u64>;

    /// 工坊
    async fn create_workshop(&self, req: CreateWorkshopRequest) -> Result<Workshop>;
    async fn get_workshop_by_id(&self, id: i64) -> Result<Option<Workshop>>;
    async fn list_workshops_with_pagination(
        &self,
        query: WorkshopListQuery,
    ) -> Result<WorkshopListResponse>;
    async fn update_workshop(
        &self,
        id: i64,
        update: UpdateWorkshopRequest,
    ) -> Result<Option<Workshop>>;
    async fn delete_workshop(&self, id: i64) -> Result<bool>;

    /// 企业
    async fn create_company(&self, req: CreateCompanyRequest) -> Result<Company>;
    async fn get_company_by_id(&self, id: i64) -> Result<Option<Company>>;
    // 企业账号对应的企业
    async fn get_company_by_user_id(&self, user_id: i64) -> Result<Option<Company>>;
    async fn list_companies_with_pagination(
        &self,
        query: CompanyListQuery,
    ) -> Result<CompanyListResponse>;
    async fn update_company(
        &self,
        id: i64,
        update: UpdateCompanyRequest,
    ) -> Result<Option<Company>>;
    async fn delete_company(&self, id: i64) -> Result<bool>;

    /// 企业联系人
    async fn create_contact(&self, req: CreateContactRequest) -> Result<Contact>;
    async fn get_contact_by_id(&self, id: i64) -> Result<Option<Contact>>;
    async fn list_contacts_with_pagination(
        &self,
        query: ContactListQuery,
    ) -> Result<ContactListResponse>;
    async fn update_contact(
        &self,
        id: i64,
        update: UpdateContactRequest,
    ) -> Result<Option<Contact>>;
    async fn delete_contact(&self, id: i64) -> Result<bool>;

    /// 学生（创建时同时创建登录账号）
    async fn create_student(&self, req: CreateStudentRequest) -> Result<Student>;
    async fn get_student_by_id(&self, id: i64) -> Result<Option<Student>>;
    async fn get_student_by_user_id(&self, user_id: i64) -> Result<Option<Student>>;
    async fn list_students_with_pagination(
        &self,
        query: StudentListQuery,
    ) -> Result<StudentListResponse>;
    async fn update_student(
        &self,
        id: i64,
        update: UpdateStudentRequest,
    ) -> Result<Option<Student>>;
    async fn delete_student(&self, id: i64) -> Result<bool>;

    /// 导师（创建时同时创建登录账号）
    async fn create_tutor(&self, req: CreateTutorRequest) -> Result<Tutor>;
    async fn get_tutor_by_id(&self, id: i64) -> Result<Option<Tutor>>;
    async fn get_tutor_by_user_id(&self, user_id: i64) -> Result<Option<Tutor>>;
    async fn list_tutors_with_pagination(&self, query: TutorListQuery)
    -> Result<TutorListResponse>;
    async fn update_tutor(&self, id: i64, update: UpdateTutorRequest) -> Result<Option<Tutor>>;
    async fn delete_tutor(&self, id: i64) -> Result<bool>;

    /// 实习
    // 学生已有未结束实习时返回 Conflict
    async fn create_internship(
        &self,
        req: CreateInternshipRequest,
        created_by: i64,
    ) -> Result<Internship>;
    async fn get_internship_by_id(&self, id: i64) -> Result<Option<Internship>>;
    async fn list_internships_with_pagination(
        &self,
        query: InternshipListQuery,
    ) -> Result<InternshipListResponse>;
    async fn update_internship(
        &self,
        id: i64,
        update: UpdateInternshipRequest,
    ) -> Result<Option<Internship>>;
    // 状态流转，非法流转返回 InvalidState
    async fn transition_internship(
        &self,
        id: i64,
        next: InternshipStatus,
    ) -> Result<Option<Internship>>;
    async fn list_internship_ids_by_status(
        &self,
        status: InternshipStatus,
        workshop_id: Option<i64>,
    ) -> Result<Vec<i64>>;

    /// 评价
    async fn upsert_evaluation(
        &self,
        internship_id: i64,
        evaluator_id: i64,
        scores: RaScores,
        comment: Option<String>,
    ) -> Result<Evaluation>;
    async fn list_evaluations_by_internship(&self, internship_id: i64) -> Result<Vec<Evaluation>>;

    /// 成绩与结业（单事务）
    // 写入成绩并更新实习模块
    async fn save_grade(
        &self,
        internship_id: i64,
        graded_by: i64,
        pass_threshold: f64,
    ) -> Result<ClosureResponse>;
    // 写入成绩、更新模块并将实习置为 Finalizada
    async fn close_internship(
        &self,
        internship_id: i64,
        graded_by: i64,
        pass_threshold: f64,
    ) -> Result<ClosureResponse>;
    async fn get_grade_by_internship(&self, internship_id: i64) -> Result<Option<Grade>>;
    async fn list_grades_with_pagination(&self, query: GradeListQuery)
    -> Result<GradeListResponse>;

    /// 实习模块
    async fn get_module_by_id(&self, id: i64) -> Result<Option<InternshipModule>>;
    async fn list_modules_with_pagination(
        &self,
        query: ModuleListQuery,
    ) -> Result<ModuleListResponse>;
    // 报表用，不分页
    async fn list_all_modules(&self, workshop_id: Option<i64>) -> Result<Vec<InternshipModule>>;

    /// 文档
    async fn create_document(&self, doc: NewDocument) -> Result<Document>;
    async fn get_document_by_token(&self, token: &str) -> Result<Option<Document>>;
    async fn list_documents_with_pagination(
        &self,
        query: DocumentListQuery,
    ) -> Result<DocumentListResponse>;

    /// 报表统计
    // (总数, 在读数)
    async fn count_students(&self, workshop_id: Option<i64>) -> Result<(i64, i64)>;
    async fn count_internships_by_status(
        &self,
        workshop_id: Option<i64>,
    ) -> Result<InternshipStatusCounts>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
