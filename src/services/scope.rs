//! 按角色划分的数据可见范围
//!
//! 管理员和督导看到全部数据；学生、企业、导师通过各自的档案
//! （`Student` / `Company` / `Tutor`）限定范围。

use actix_web::HttpResponse;
use std::sync::Arc;

use crate::errors::Result;
use crate::models::auth::ProfileRef;
use crate::models::companies::entities::Company;
use crate::models::internships::entities::Internship;
use crate::models::internships::requests::InternshipListQuery;
use crate::models::students::entities::Student;
use crate::models::tutors::entities::Tutor;
use crate::models::users::entities::{User, UserRole};
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

#[derive(Debug, Clone)]
pub(crate) enum Viewer {
    Staff,
    Student(Student),
    Company(Company),
    Tutor(Tutor),
}

impl Viewer {
    /// 根据用户角色加载对应档案；没有档案的非管理账号看不到任何数据
    pub(crate) async fn resolve(
        storage: &Arc<dyn Storage>,
        user: &User,
    ) -> std::result::Result<Self, HttpResponse> {
        Self::load(storage, user)
            .await
            .map_err(|e| super::storage_error(&e, ErrorCode::NotFound))?
            .ok_or_else(|| {
                ApiResponse::reply(
                    ErrorCode::Forbidden,
                    "No profile is linked to this account",
                )
            })
    }

    pub(crate) async fn load(storage: &Arc<dyn Storage>, user: &User) -> Result<Option<Self>> {
        Ok(match user.role {
            UserRole::Admin | UserRole::Supervisor => Some(Viewer::Staff),
            UserRole::Student => storage
                .get_student_by_user_id(user.id)
                .await?
                .map(Viewer::Student),
            UserRole::Company => storage
                .get_company_by_user_id(user.id)
                .await?
                .map(Viewer::Company),
            UserRole::Tutor => storage
                .get_tutor_by_user_id(user.id)
                .await?
                .map(Viewer::Tutor),
        })
    }

    /// 返回给前端的档案引用
    pub(crate) fn profile(&self) -> Option<ProfileRef> {
        match self {
            Viewer::Staff => None,
            Viewer::Student(s) => Some(ProfileRef::Student {
                id: s.id,
                workshop_id: s.workshop_id,
            }),
            Viewer::Company(c) => Some(ProfileRef::Company { id: c.id }),
            Viewer::Tutor(t) => Some(ProfileRef::Tutor {
                id: t.id,
                workshop_id: t.workshop_id,
            }),
        }
    }

    pub(crate) fn is_staff(&self) -> bool {
        matches!(self, Viewer::Staff)
    }

    pub(crate) fn can_see_internship(&self, internship: &Internship) -> bool {
        match self {
            Viewer::Staff => true,
            Viewer::Student(s) => internship.student_id == s.id,
            Viewer::Company(c) => internship.company_id == c.id,
            Viewer::Tutor(t) => {
                internship.tutor_id == Some(t.id) || internship.workshop_id == t.workshop_id
            }
        }
    }

    /// 可以提交评价：企业方、该实习的指导导师、管理人员
    pub(crate) fn can_evaluate(&self, internship: &Internship) -> bool {
        match self {
            Viewer::Staff => true,
            Viewer::Company(c) => internship.company_id == c.id,
            Viewer::Tutor(t) => internship.tutor_id == Some(t.id),
            Viewer::Student(_) => false,
        }
    }

    pub(crate) fn can_manage_company(&self, company_id: i64) -> bool {
        match self {
            Viewer::Staff => true,
            Viewer::Company(c) => c.id == company_id,
            _ => false,
        }
    }

    /// 把可见范围写进实习列表查询，覆盖调用方传入的同名条件
    pub(crate) fn restrict_internships(&self, query: &mut InternshipListQuery) {
        match self {
            Viewer::Staff => {}
            Viewer::Student(s) => query.student_id = Some(s.id),
            Viewer::Company(c) => query.company_id = Some(c.id),
            Viewer::Tutor(t) => {
                query.tutor_id = Some(t.id);
                query.tutor_workshop_id = Some(t.workshop_id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RecordStatus;
    use crate::models::internships::entities::InternshipStatus;
    use chrono::Utc;

    fn internship(
        student_id: i64,
        company_id: i64,
        workshop_id: i64,
        tutor_id: Option<i64>,
    ) -> Internship {
        Internship {
            id: 1,
            student_id,
            company_id,
            workshop_id,
            tutor_id,
            contact_id: None,
            position: None,
            start_date: Utc::now(),
            end_date: Utc::now(),
            hours_required: 240,
            status: InternshipStatus::EnProceso,
            closed_at: None,
            created_by: 1,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn tutor(id: i64, workshop_id: i64) -> Viewer {
        Viewer::Tutor(Tutor {
            id,
            user_id: 100 + id,
            workshop_id,
            first_name: "Ana".into(),
            last_name: "Pérez".into(),
            phone: None,
            status: RecordStatus::Activo,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        })
    }

    #[test]
    fn test_tutor_sees_workshop_and_tutored_internships() {
        let viewer = tutor(5, 2);
        assert!(viewer.can_see_internship(&internship(1, 1, 2, None)));
        assert!(viewer.can_see_internship(&internship(1, 1, 9, Some(5))));
        assert!(!viewer.can_see_internship(&internship(1, 1, 9, Some(6))));
    }

    #[test]
    fn test_only_assigned_tutor_evaluates() {
        let viewer = tutor(5, 2);
        assert!(viewer.can_evaluate(&internship(1, 1, 2, Some(5))));
        // 同工坊但不是指导导师
        assert!(!viewer.can_evaluate(&internship(1, 1, 2, None)));
        assert!(Viewer::Staff.can_evaluate(&internship(1, 1, 2, None)));
    }

    #[test]
    fn test_restrict_overrides_requested_filters() {
        let viewer = tutor(5, 2);
        let mut query = InternshipListQuery {
            workshop_id: Some(7),
            ..Default::default()
        };
        viewer.restrict_internships(&mut query);
        assert_eq!(query.tutor_id, Some(5));
        assert_eq!(query.tutor_workshop_id, Some(2));

        let mut query = InternshipListQuery::default();
        Viewer::Staff.restrict_internships(&mut query);
        assert!(query.tutor_id.is_none() && query.student_id.is_none());
    }
}
