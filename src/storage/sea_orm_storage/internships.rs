//! 实习存储操作

use super::{SeaOrmStorage, db_error, now_ts};
use crate::entity::companies::Entity as Companies;
use crate::entity::contacts::Entity as Contacts;
use crate::entity::internships::{ActiveModel, Column, Entity as Internships};
use crate::entity::students::Entity as Students;
use crate::entity::tutors::Entity as Tutors;
use crate::errors::{IMSystemError, Result};
use crate::models::{
    PaginationInfo, RecordStatus,
    common::pagination::normalize_page,
    internships::{
        entities::{Internship, InternshipStatus},
        requests::{CreateInternshipRequest, InternshipListQuery, UpdateInternshipRequest},
        responses::InternshipListResponse,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

/// 未结束状态的字符串表示
fn open_statuses() -> [String; 2] {
    [
        InternshipStatus::Pendiente.to_string(),
        InternshipStatus::EnProceso.to_string(),
    ]
}

impl SeaOrmStorage {
    /// 学生当前未结束实习的数量
    pub(crate) async fn count_open_internships<C: ConnectionTrait>(
        conn: &C,
        student_id: i64,
        exclude_id: Option<i64>,
    ) -> Result<u64> {
        let mut select = Internships::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::Status.is_in(open_statuses()));
        if let Some(id) = exclude_id {
            select = select.filter(Column::Id.ne(id));
        }
        select
            .count(conn)
            .await
            .map_err(|e| db_error("查询学生实习失败", e))
    }

    /// 校验实习引用的企业、导师与联系人均有效，联系人须属于该企业
    async fn check_references<C: ConnectionTrait>(
        conn: &C,
        company_id: Option<i64>,
        tutor_id: Option<i64>,
        contact_id: Option<i64>,
        contact_company_id: i64,
    ) -> Result<()> {
        if let Some(company_id) = company_id {
            let active = Companies::find_by_id(company_id)
                .one(conn)
                .await
                .map_err(|e| db_error("查询企业失败", e))?
                .is_some_and(|c| c.status == RecordStatus::ACTIVE);
            if !active {
                return Err(IMSystemError::validation(format!(
                    "Company {company_id} does not exist or is inactive"
                )));
            }
        }

        if let Some(tutor_id) = tutor_id {
            let active = Tutors::find_by_id(tutor_id)
                .one(conn)
                .await
                .map_err(|e| db_error("查询导师失败", e))?
                .is_some_and(|t| t.status == RecordStatus::ACTIVE);
            if !active {
                return Err(IMSystemError::validation(format!(
                    "Tutor {tutor_id} does not exist or is inactive"
                )));
            }
        }

        if let Some(contact_id) = contact_id {
            let contact = Contacts::find_by_id(contact_id)
                .one(conn)
                .await
                .map_err(|e| db_error("查询联系人失败", e))?
                .filter(|c| c.status == RecordStatus::ACTIVE)
                .ok_or_else(|| {
                    IMSystemError::validation(format!(
                        "Contact {contact_id} does not exist or is inactive"
                    ))
                })?;
            if contact.company_id != contact_company_id {
                return Err(IMSystemError::validation(format!(
                    "Contact {contact_id} does not belong to company {contact_company_id}"
                )));
            }
        }

        Ok(())
    }

    /// 创建实习，状态为 Pendiente；工坊取学生所属工坊
    pub async fn create_internship_impl(
        &self,
        req: CreateInternshipRequest,
        created_by: i64,
    ) -> Result<Internship> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| db_error("开启事务失败", e))?;

        let student = Students::find_by_id(req.student_id)
            .one(&txn)
            .await
            .map_err(|e| db_error("查询学生失败", e))?
            .filter(|s| s.status == RecordStatus::ACTIVE)
            .ok_or_else(|| {
                IMSystemError::not_found(format!("Student {} not found", req.student_id))
            })?;

        if Self::count_open_internships(&txn, student.id, None).await? > 0 {
            return Err(IMSystemError::conflict(format!(
                "Student {} already has an open internship",
                student.id
            )));
        }

        Self::check_references(
            &txn,
            Some(req.company_id),
            req.tutor_id,
            req.contact_id,
            req.company_id,
        )
        .await?;

        let now = now_ts();
        let model = ActiveModel {
            student_id: Set(student.id),
            company_id: Set(req.company_id),
            workshop_id: Set(student.workshop_id),
            tutor_id: Set(req.tutor_id),
            contact_id: Set(req.contact_id),
            position: Set(req.position),
            start_date: Set(req.start_date.timestamp()),
            end_date: Set(req.end_date.timestamp()),
            hours_required: Set(req.hours_required.unwrap_or(0)),
            status: Set(InternshipStatus::Pendiente.to_string()),
            closed_at: Set(None),
            created_by: Set(created_by),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| db_error("创建实习失败", e))?;

        txn.commit()
            .await
            .map_err(|e| db_error("提交事务失败", e))?;

        Ok(model.into_internship())
    }

    pub async fn get_internship_by_id_impl(&self, id: i64) -> Result<Option<Internship>> {
        let result = Internships::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| db_error("查询实习失败", e))?;

        Ok(result.map(|m| m.into_internship()))
    }

    pub async fn list_internships_with_pagination_impl(
        &self,
        query: InternshipListQuery,
    ) -> Result<InternshipListResponse> {
        let (page, size) = normalize_page(query.page, query.size, 20);

        let mut select = Internships::find();

        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }
        if let Some(workshop_id) = query.workshop_id {
            select = select.filter(Column::WorkshopId.eq(workshop_id));
        }
        if let Some(company_id) = query.company_id {
            select = select.filter(Column::CompanyId.eq(company_id));
        }
        if let Some(student_id) = query.student_id {
            select = select.filter(Column::StudentId.eq(student_id));
        }

        // 导师范围：指导的实习，或所属工坊的实习
        if let Some(tutor_id) = query.tutor_id {
            let mut scope = Condition::any().add(Column::TutorId.eq(tutor_id));
            if let Some(workshop_id) = query.tutor_workshop_id {
                scope = scope.add(Column::WorkshopId.eq(workshop_id));
            }
            select = select.filter(scope);
        }

        let paginator = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| db_error("查询实习总数失败", e))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| db_error("查询实习页数失败", e))?;
        let internships = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| db_error("查询实习列表失败", e))?;

        Ok(InternshipListResponse {
            items: internships.into_iter().map(|m| m.into_internship()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    /// 更新实习信息，已结束的实习不可修改
    pub async fn update_internship_impl(
        &self,
        id: i64,
        update: UpdateInternshipRequest,
    ) -> Result<Option<Internship>> {
        let Some(existing) = self.get_internship_by_id_impl(id).await? else {
            return Ok(None);
        };
        if !existing.status.is_open() {
            return Err(IMSystemError::invalid_state(format!(
                "Internship {id} is {} and can no longer be modified",
                existing.status
            )));
        }

        // 只换企业时，原联系人也必须属于新企业
        let contact_id = if update.company_id.is_some() || update.contact_id.is_some() {
            update.contact_id.or(existing.contact_id)
        } else {
            None
        };
        Self::check_references(
            &self.db,
            update.company_id,
            update.tutor_id,
            contact_id,
            update.company_id.unwrap_or(existing.company_id),
        )
        .await?;

        let start = update.start_date.unwrap_or(existing.start_date);
        let end = update.end_date.unwrap_or(existing.end_date);
        if end < start {
            return Err(IMSystemError::validation(
                "end_date must not be earlier than start_date",
            ));
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now_ts()),
            ..Default::default()
        };

        if let Some(company_id) = update.company_id {
            model.company_id = Set(company_id);
        }
        if let Some(tutor_id) = update.tutor_id {
            model.tutor_id = Set(Some(tutor_id));
        }
        if let Some(contact_id) = update.contact_id {
            model.contact_id = Set(Some(contact_id));
        }
        if let Some(position) = update.position {
            model.position = Set(Some(position));
        }
        if update.start_date.is_some() {
            model.start_date = Set(start.timestamp());
        }
        if update.end_date.is_some() {
            model.end_date = Set(end.timestamp());
        }
        if let Some(hours) = update.hours_required {
            model.hours_required = Set(hours);
        }

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| db_error("更新实习失败", e))?;

        Ok(Some(updated.into_internship()))
    }

    /// 开始或取消实习；结业只能通过 close 流程完成
    pub async fn transition_internship_impl(
        &self,
        id: i64,
        next: InternshipStatus,
    ) -> Result<Option<Internship>> {
        let Some(existing) = self.get_internship_by_id_impl(id).await? else {
            return Ok(None);
        };

        if next == InternshipStatus::Finalizada || !existing.status.can_transition_to(next) {
            return Err(IMSystemError::invalid_state(format!(
                "Cannot move internship {id} from {} to {next}",
                existing.status
            )));
        }

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| db_error("开启事务失败", e))?;

        let now = now_ts();
        // 以当前状态为条件更新，避免并发请求重复流转
        let result = Internships::update_many()
            .col_expr(Column::Status, sea_orm::sea_query::Expr::value(next.to_string()))
            .col_expr(Column::UpdatedAt, sea_orm::sea_query::Expr::value(now))
            .filter(Column::Id.eq(id))
            .filter(Column::Status.eq(existing.status.to_string()))
            .exec(&txn)
            .await
            .map_err(|e| db_error("更新实习状态失败", e))?;

        if result.rows_affected == 0 {
            return Err(IMSystemError::invalid_state(format!(
                "Internship {id} was modified concurrently"
            )));
        }

        // 取消的实习不再计入实习模块
        if next == InternshipStatus::Cancelada {
            Self::retract_grade(&txn, &existing).await?;
        }

        txn.commit()
            .await
            .map_err(|e| db_error("提交事务失败", e))?;

        self.get_internship_by_id_impl(id).await
    }

    pub async fn list_internship_ids_by_status_impl(
        &self,
        status: InternshipStatus,
        workshop_id: Option<i64>,
    ) -> Result<Vec<i64>> {
        let mut select = Internships::find()
            .select_only()
            .column(Column::Id)
            .filter(Column::Status.eq(status.to_string()));
        if let Some(workshop_id) = workshop_id {
            select = select.filter(Column::WorkshopId.eq(workshop_id));
        }

        select
            .order_by_asc(Column::Id)
            .into_tuple::<i64>()
            .all(&self.db)
            .await
            .map_err(|e| db_error("查询实习列表失败", e))
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::super::SeaOrmStorage;
    use crate::models::companies::requests::CreateCompanyRequest;
    use crate::models::internships::entities::Internship;
    use crate::models::internships::requests::CreateInternshipRequest;
    use crate::models::students::{entities::Student, requests::CreateStudentRequest};
    use crate::models::workshops::requests::CreateWorkshopRequest;
    use chrono::{TimeZone, Utc};

    pub(crate) struct Seed {
        pub workshop_id: i64,
        pub company_id: i64,
        pub student: Student,
    }

    pub(crate) async fn seed(storage: &SeaOrmStorage, tag: &str) -> Seed {
        let workshop = storage
            .create_workshop_impl(CreateWorkshopRequest {
                name: format!("Taller {tag}"),
                code: tag.to_uppercase(),
                description: None,
            })
            .await
            .unwrap();
        let company = storage
            .create_company_impl(CreateCompanyRequest {
                user_id: None,
                name: format!("Empresa {tag}"),
                tax_id: None,
                sector: None,
                address: None,
                email: None,
                phone: None,
            })
            .await
            .unwrap();
        let student = add_student(storage, tag, workshop.id).await;

        Seed {
            workshop_id: workshop.id,
            company_id: company.id,
            student,
        }
    }

    pub(crate) async fn add_student(
        storage: &SeaOrmStorage,
        username: &str,
        workshop_id: i64,
    ) -> Student {
        storage
            .create_student_impl(CreateStudentRequest {
                username: username.to_string(),
                email: format!("{username}@example.com"),
                password: "hashed".to_string(),
                workshop_id,
                first_name: "Ana".to_string(),
                last_name: username.to_string(),
                document_id: None,
                phone: None,
            })
            .await
            .unwrap()
    }

    pub(crate) fn internship_request(student_id: i64, company_id: i64) -> CreateInternshipRequest {
        CreateInternshipRequest {
            student_id,
            company_id,
            tutor_id: None,
            contact_id: None,
            position: Some("Auxiliar".to_string()),
            start_date: Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap(),
            end_date: Utc.with_ymd_and_hms(2026, 5, 31, 0, 0, 0).unwrap(),
            hours_required: Some(240),
        }
    }

    pub(crate) async fn started_internship(
        storage: &SeaOrmStorage,
        student_id: i64,
        company_id: i64,
    ) -> Internship {
        let internship = storage
            .create_internship_impl(internship_request(student_id, company_id), 1)
            .await
            .unwrap();
        storage
            .transition_internship_impl(
                internship.id,
                crate::models::internships::entities::InternshipStatus::EnProceso,
            )
            .await
            .unwrap()
            .unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::memory_storage;
    use super::fixtures::{add_student, internship_request, seed};
    use crate::errors::IMSystemError;
    use crate::models::internships::entities::InternshipStatus;
    use crate::models::contacts::requests::CreateContactRequest;
    use crate::models::internships::requests::{InternshipListQuery, UpdateInternshipRequest};
    use crate::models::tutors::requests::CreateTutorRequest;

    #[tokio::test]
    async fn test_student_has_at_most_one_open_internship() {
        let storage = memory_storage().await;
        let s = seed(&storage, "ele").await;

        let first = storage
            .create_internship_impl(internship_request(s.student.id, s.company_id), 1)
            .await
            .unwrap();
        assert_eq!(first.status, InternshipStatus::Pendiente);
        assert_eq!(first.workshop_id, s.workshop_id);
        assert_eq!(first.hours_required, 240);

        let second = storage
            .create_internship_impl(internship_request(s.student.id, s.company_id), 1)
            .await;
        assert!(matches!(second, Err(IMSystemError::Conflict(_))));

        // 取消后可以重新分配
        storage
            .transition_internship_impl(first.id, InternshipStatus::Cancelada)
            .await
            .unwrap();
        storage
            .create_internship_impl(internship_request(s.student.id, s.company_id), 1)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_lifecycle_transitions() {
        let storage = memory_storage().await;
        let s = seed(&storage, "mec").await;
        let i = storage
            .create_internship_impl(internship_request(s.student.id, s.company_id), 1)
            .await
            .unwrap();

        // Finalizada 只能经由结业流程
        let finish = storage
            .transition_internship_impl(i.id, InternshipStatus::Finalizada)
            .await;
        assert!(matches!(finish, Err(IMSystemError::InvalidState(_))));

        let started = storage
            .transition_internship_impl(i.id, InternshipStatus::EnProceso)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(started.status, InternshipStatus::EnProceso);

        let again = storage
            .transition_internship_impl(i.id, InternshipStatus::EnProceso)
            .await;
        assert!(matches!(again, Err(IMSystemError::InvalidState(_))));

        let cancelled = storage
            .transition_internship_impl(i.id, InternshipStatus::Cancelada)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cancelled.status, InternshipStatus::Cancelada);

        let update = storage
            .update_internship_impl(
                i.id,
                UpdateInternshipRequest {
                    position: Some("Técnico".to_string()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(update, Err(IMSystemError::InvalidState(_))));

        assert!(
            storage
                .transition_internship_impl(9999, InternshipStatus::Cancelada)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_list_scopes_and_status_ids() {
        let storage = memory_storage().await;
        let s = seed(&storage, "inf").await;
        let other = add_student(&storage, "otro", s.workshop_id).await;

        let a = storage
            .create_internship_impl(internship_request(s.student.id, s.company_id), 1)
            .await
            .unwrap();
        let b = storage
            .create_internship_impl(internship_request(other.id, s.company_id), 1)
            .await
            .unwrap();
        storage
            .transition_internship_impl(b.id, InternshipStatus::EnProceso)
            .await
            .unwrap();

        let own = storage
            .list_internships_with_pagination_impl(InternshipListQuery {
                student_id: Some(s.student.id),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(own.items.len(), 1);
        assert_eq!(own.items[0].id, a.id);

        // 导师没有直接指导的实习时，按工坊可见
        let tutor_view = storage
            .list_internships_with_pagination_impl(InternshipListQuery {
                tutor_id: Some(77),
                tutor_workshop_id: Some(s.workshop_id),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(tutor_view.pagination.total, 2);

        let in_progress = storage
            .list_internship_ids_by_status_impl(InternshipStatus::EnProceso, None)
            .await
            .unwrap();
        assert_eq!(in_progress, vec![b.id]);
    }

    #[tokio::test]
    async fn test_update_rejects_inverted_dates() {
        let storage = memory_storage().await;
        let s = seed(&storage, "con").await;
        let i = storage
            .create_internship_impl(internship_request(s.student.id, s.company_id), 1)
            .await
            .unwrap();

        let result = storage
            .update_internship_impl(
                i.id,
                UpdateInternshipRequest {
                    end_date: Some(i.start_date - chrono::Duration::days(1)),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(IMSystemError::Validation(_))));
    }

    #[tokio::test]
    async fn test_references_must_be_active_and_consistent() {
        let storage = memory_storage().await;
        let s = seed(&storage, "ref").await;
        let other = seed(&storage, "otr").await;

        let own_contact = storage
            .create_contact_impl(CreateContactRequest {
                company_id: s.company_id,
                name: "Lidia".to_string(),
                position: None,
                email: None,
                phone: None,
            })
            .await
            .unwrap();
        let foreign_contact = storage
            .create_contact_impl(CreateContactRequest {
                company_id: other.company_id,
                name: "Tomás".to_string(),
                position: None,
                email: None,
                phone: None,
            })
            .await
            .unwrap();

        // 联系人属于别的企业
        let mut req = internship_request(s.student.id, s.company_id);
        req.contact_id = Some(foreign_contact.id);
        let mismatch = storage.create_internship_impl(req, 1).await;
        assert!(matches!(mismatch, Err(IMSystemError::Validation(_))));

        // 已删除的企业
        storage.delete_company_impl(other.company_id).await.unwrap();
        let deleted = storage
            .create_internship_impl(internship_request(s.student.id, other.company_id), 1)
            .await;
        assert!(matches!(deleted, Err(IMSystemError::Validation(_))));

        let mut req = internship_request(s.student.id, s.company_id);
        req.contact_id = Some(own_contact.id);
        let created = storage.create_internship_impl(req, 1).await.unwrap();
        assert_eq!(created.contact_id, Some(own_contact.id));

        let tutor = storage
            .create_tutor_impl(CreateTutorRequest {
                username: "tutor_ref".to_string(),
                email: "tutor_ref@example.com".to_string(),
                password: "hashed".to_string(),
                workshop_id: s.workshop_id,
                first_name: "Elena".to_string(),
                last_name: "Ruiz".to_string(),
                phone: None,
            })
            .await
            .unwrap();
        storage.delete_tutor_impl(tutor.id).await.unwrap();
        let inactive_tutor = storage
            .update_internship_impl(
                created.id,
                UpdateInternshipRequest {
                    tutor_id: Some(tutor.id),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(inactive_tutor, Err(IMSystemError::Validation(_))));

        // 换企业时原联系人不再匹配
        let third = seed(&storage, "ter").await;
        let moved = storage
            .update_internship_impl(
                created.id,
                UpdateInternshipRequest {
                    company_id: Some(third.company_id),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(moved, Err(IMSystemError::Validation(_))));
    }
}
