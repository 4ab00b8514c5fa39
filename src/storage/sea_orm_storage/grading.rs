//! 成绩计算落库与实习结业
//!
//! 成绩、实习模块与实习状态在同一事务内提交。

use super::{SeaOrmStorage, db_error, now_ts};
use crate::entity::evaluations::{Column as EvaluationColumn, Entity as Evaluations};
use crate::entity::grades::{
    ActiveModel as GradeActiveModel, Column as GradeColumn, Entity as Grades,
};
use crate::entity::internships::{
    ActiveModel as InternshipActiveModel, Column as InternshipColumn, Entity as Internships,
};
use crate::entity::modules::{
    ActiveModel as ModuleActiveModel, Column as ModuleColumn, Entity as Modules,
};
use crate::errors::{IMSystemError, Result};
use crate::models::{
    PaginationInfo,
    common::pagination::normalize_page,
    grades::{
        calculator::{compute_outcome, result_for},
        entities::Grade,
        requests::GradeListQuery,
        responses::GradeListResponse,
    },
    internships::{
        entities::{Internship, InternshipStatus},
        responses::ClosureResponse,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::{debug, info};

impl SeaOrmStorage {
    /// 计算并保存成绩，更新实习模块；`close` 为真时同时结业
    pub async fn grade_internship_impl(
        &self,
        internship_id: i64,
        graded_by: i64,
        pass_threshold: f64,
        close: bool,
    ) -> Result<ClosureResponse> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| db_error("开启事务失败", e))?;

        let internship = Internships::find_by_id(internship_id)
            .one(&txn)
            .await
            .map_err(|e| db_error("查询实习失败", e))?
            .ok_or_else(|| {
                IMSystemError::not_found(format!("Internship {internship_id} not found"))
            })?;

        let status = internship
            .status
            .parse::<InternshipStatus>()
            .map_err(IMSystemError::database_operation)?;
        // 结业要求 EnProceso；单独评分也允许对已结业实习重新计算
        let allowed = if close {
            status == InternshipStatus::EnProceso
        } else {
            matches!(
                status,
                InternshipStatus::EnProceso | InternshipStatus::Finalizada
            )
        };
        if !allowed {
            return Err(IMSystemError::invalid_state(format!(
                "Internship {internship_id} is {status}"
            )));
        }

        let scores: Vec<_> = Evaluations::find()
            .filter(EvaluationColumn::InternshipId.eq(internship_id))
            .all(&txn)
            .await
            .map_err(|e| db_error("查询评价失败", e))?
            .iter()
            .map(|e| e.scores())
            .collect();
        let outcome = compute_outcome(&scores, pass_threshold).ok_or_else(|| {
            IMSystemError::validation(format!("Internship {internship_id} has no evaluations"))
        })?;

        let now = now_ts();

        // 成绩：每个实习一条
        let existing_grade = Grades::find()
            .filter(GradeColumn::InternshipId.eq(internship_id))
            .one(&txn)
            .await
            .map_err(|e| db_error("查询成绩失败", e))?;
        let mut grade = match existing_grade {
            Some(found) => GradeActiveModel {
                id: Set(found.id),
                ..Default::default()
            },
            None => GradeActiveModel {
                internship_id: Set(internship_id),
                student_id: Set(internship.student_id),
                ..Default::default()
            },
        };
        let [ra1, ra2, ra3, ra4, ra5, ra6, ra7] = outcome.criteria.to_array();
        grade.ra1 = Set(ra1);
        grade.ra2 = Set(ra2);
        grade.ra3 = Set(ra3);
        grade.ra4 = Set(ra4);
        grade.ra5 = Set(ra5);
        grade.ra6 = Set(ra6);
        grade.ra7 = Set(ra7);
        grade.average = Set(outcome.average);
        grade.result = Set(outcome.result.to_string());
        grade.evaluation_count = Set(outcome.evaluation_count);
        grade.graded_by = Set(graded_by);
        grade.graded_at = Set(now);
        grade.updated_at = Set(now);
        let grade = if grade.id.is_set() {
            grade.update(&txn).await
        } else {
            grade.insert(&txn).await
        }
        .map_err(|e| db_error("保存成绩失败", e))?;

        // 实习模块：每个学生每个工坊一条，保留最好成绩
        let existing_module = Modules::find()
            .filter(ModuleColumn::StudentId.eq(internship.student_id))
            .filter(ModuleColumn::WorkshopId.eq(internship.workshop_id))
            .one(&txn)
            .await
            .map_err(|e| db_error("查询实习模块失败", e))?;
        let module = match existing_module {
            None => ModuleActiveModel {
                student_id: Set(internship.student_id),
                workshop_id: Set(internship.workshop_id),
                internship_id: Set(internship_id),
                grade_id: Set(grade.id),
                average: Set(outcome.average),
                result: Set(outcome.result.to_string()),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(|e| db_error("创建实习模块失败", e))?,
            // 同一实习重新评分时以新成绩为准
            Some(found)
                if found.internship_id == internship_id || outcome.average > found.average =>
            {
                ModuleActiveModel {
                    id: Set(found.id),
                    internship_id: Set(internship_id),
                    grade_id: Set(grade.id),
                    average: Set(outcome.average),
                    result: Set(result_for(outcome.average, pass_threshold).to_string()),
                    updated_at: Set(now),
                    ..Default::default()
                }
                .update(&txn)
                .await
                .map_err(|e| db_error("更新实习模块失败", e))?
            }
            Some(found) => {
                debug!(
                    "实习 {} 平均分 {} 未超过模块 {} 已有的 {}",
                    internship_id, outcome.average, found.id, found.average
                );
                found
            }
        };

        let internship = if close {
            InternshipActiveModel {
                id: Set(internship_id),
                status: Set(InternshipStatus::Finalizada.to_string()),
                closed_at: Set(Some(now)),
                updated_at: Set(now),
                ..Default::default()
            }
            .update(&txn)
            .await
            .map_err(|e| db_error("更新实习状态失败", e))?
        } else {
            internship
        };

        txn.commit()
            .await
            .map_err(|e| db_error("提交事务失败", e))?;

        Ok(ClosureResponse {
            internship: internship.into_internship(),
            grade: grade.into_grade(),
            module: module.into_module(),
        })
    }

    /// 撤回实习的成绩；模块若来自该实习，则改用同工坊其余未取消实习中的最好成绩，没有则删除
    pub(crate) async fn retract_grade<C: ConnectionTrait>(
        conn: &C,
        internship: &Internship,
    ) -> Result<()> {
        let Some(grade) = Grades::find()
            .filter(GradeColumn::InternshipId.eq(internship.id))
            .one(conn)
            .await
            .map_err(|e| db_error("查询成绩失败", e))?
        else {
            return Ok(());
        };

        let module = Modules::find()
            .filter(ModuleColumn::StudentId.eq(internship.student_id))
            .filter(ModuleColumn::WorkshopId.eq(internship.workshop_id))
            .one(conn)
            .await
            .map_err(|e| db_error("查询实习模块失败", e))?;

        if let Some(module) = module.filter(|m| m.internship_id == internship.id) {
            let candidates: Vec<i64> = Internships::find()
                .select_only()
                .column(InternshipColumn::Id)
                .filter(InternshipColumn::StudentId.eq(internship.student_id))
                .filter(InternshipColumn::WorkshopId.eq(internship.workshop_id))
                .filter(InternshipColumn::Id.ne(internship.id))
                .filter(InternshipColumn::Status.ne(InternshipStatus::Cancelada.to_string()))
                .into_tuple()
                .all(conn)
                .await
                .map_err(|e| db_error("查询学生实习失败", e))?;

            let best = if candidates.is_empty() {
                None
            } else {
                Grades::find()
                    .filter(GradeColumn::InternshipId.is_in(candidates))
                    .order_by_desc(GradeColumn::Average)
                    .order_by_asc(GradeColumn::Id)
                    .one(conn)
                    .await
                    .map_err(|e| db_error("查询成绩失败", e))?
            };

            match best {
                Some(best) => {
                    ModuleActiveModel {
                        id: Set(module.id),
                        internship_id: Set(best.internship_id),
                        grade_id: Set(best.id),
                        average: Set(best.average),
                        result: Set(best.result.clone()),
                        updated_at: Set(now_ts()),
                        ..Default::default()
                    }
                    .update(conn)
                    .await
                    .map_err(|e| db_error("更新实习模块失败", e))?;
                }
                None => {
                    module
                        .delete(conn)
                        .await
                        .map_err(|e| db_error("删除实习模块失败", e))?;
                }
            }
        }

        grade
            .delete(conn)
            .await
            .map_err(|e| db_error("删除成绩失败", e))?;
        info!("实习 {} 已取消，撤回其成绩", internship.id);
        Ok(())
    }

    pub async fn get_grade_by_internship_impl(&self, internship_id: i64) -> Result<Option<Grade>> {
        let result = Grades::find()
            .filter(GradeColumn::InternshipId.eq(internship_id))
            .one(&self.db)
            .await
            .map_err(|e| db_error("查询成绩失败", e))?;

        Ok(result.map(|m| m.into_grade()))
    }

    pub async fn list_grades_with_pagination_impl(
        &self,
        query: GradeListQuery,
    ) -> Result<GradeListResponse> {
        let (page, size) = normalize_page(query.page, query.size, 20);

        let mut select = Grades::find();
        if let Some(student_id) = query.student_id {
            select = select.filter(GradeColumn::StudentId.eq(student_id));
        }
        if let Some(result) = query.result {
            select = select.filter(GradeColumn::Result.eq(result.to_string()));
        }

        let paginator = select
            .order_by_desc(GradeColumn::GradedAt)
            .order_by_desc(GradeColumn::Id)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| db_error("查询成绩总数失败", e))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| db_error("查询成绩页数失败", e))?;
        let grades = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| db_error("查询成绩列表失败", e))?;

        Ok(GradeListResponse {
            items: grades.into_iter().map(|m| m.into_grade()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::internships::fixtures::{
        add_student, internship_request, seed, started_internship,
    };
    use super::super::test_support::memory_storage;
    use crate::errors::IMSystemError;
    use crate::models::evaluations::entities::RaScores;
    use crate::models::grades::entities::GradeResult;
    use crate::models::internships::entities::InternshipStatus;
    use crate::models::users::{entities::UserRole, requests::CreateUserRequest};

    async fn evaluator(storage: &super::SeaOrmStorage, username: &str) -> i64 {
        storage
            .create_user_impl(CreateUserRequest {
                username: username.to_string(),
                email: format!("{username}@example.com"),
                password: "hashed".to_string(),
                role: UserRole::Tutor,
                display_name: None,
                phone: None,
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_close_persists_grade_module_and_status() {
        let storage = memory_storage().await;
        let s = seed(&storage, "ele").await;
        let i = started_internship(&storage, s.student.id, s.company_id).await;
        let tutor = evaluator(&storage, "tutor1").await;
        let company = evaluator(&storage, "empresa1").await;

        storage
            .upsert_evaluation_impl(
                i.id,
                tutor,
                RaScores::from_array([80.0, 70.0, 90.0, 60.0, 100.0, 75.0, 85.0]),
                None,
            )
            .await
            .unwrap();
        storage
            .upsert_evaluation_impl(i.id, company, RaScores::from_array([70.0; 7]), None)
            .await
            .unwrap();

        let closed = storage
            .grade_internship_impl(i.id, tutor, 70.0, true)
            .await
            .unwrap();

        assert_eq!(closed.internship.status, InternshipStatus::Finalizada);
        assert!(closed.internship.closed_at.is_some());
        assert_eq!(closed.grade.criteria.ra1, 75.0);
        assert_eq!(closed.grade.criteria.ra4, 65.0);
        assert_eq!(closed.grade.average, 75.0);
        assert_eq!(closed.grade.result, GradeResult::Aprobado);
        assert_eq!(closed.grade.evaluation_count, 2);
        assert_eq!(closed.module.grade_id, closed.grade.id);
        assert_eq!(closed.module.workshop_id, s.workshop_id);
        assert_eq!(closed.module.result, GradeResult::Aprobado);

        // 已结业不可再次结业
        let again = storage.grade_internship_impl(i.id, tutor, 70.0, true).await;
        assert!(matches!(again, Err(IMSystemError::InvalidState(_))));
    }

    #[tokio::test]
    async fn test_close_without_evaluations_changes_nothing() {
        let storage = memory_storage().await;
        let s = seed(&storage, "mec").await;
        let i = started_internship(&storage, s.student.id, s.company_id).await;

        let result = storage.grade_internship_impl(i.id, 1, 70.0, true).await;
        assert!(matches!(result, Err(IMSystemError::Validation(_))));

        let still_open = storage.get_internship_by_id_impl(i.id).await.unwrap().unwrap();
        assert_eq!(still_open.status, InternshipStatus::EnProceso);
        assert!(storage.get_grade_by_internship_impl(i.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_pending_internship_cannot_be_graded() {
        let storage = memory_storage().await;
        let s = seed(&storage, "inf").await;
        let i = storage
            .create_internship_impl(internship_request(s.student.id, s.company_id), 1)
            .await
            .unwrap();

        let result = storage.grade_internship_impl(i.id, 1, 70.0, false).await;
        assert!(matches!(result, Err(IMSystemError::InvalidState(_))));
    }

    #[tokio::test]
    async fn test_module_keeps_best_average() {
        let storage = memory_storage().await;
        let s = seed(&storage, "ref").await;
        let tutor = evaluator(&storage, "tutor2").await;

        // 第一次实习未通过
        let first = started_internship(&storage, s.student.id, s.company_id).await;
        storage
            .upsert_evaluation_impl(first.id, tutor, RaScores::from_array([50.0; 7]), None)
            .await
            .unwrap();
        let failed = storage
            .grade_internship_impl(first.id, tutor, 70.0, true)
            .await
            .unwrap();
        assert_eq!(failed.module.result, GradeResult::Reprobado);

        // 第二次实习通过，模块更新为更好的成绩
        let second = started_internship(&storage, s.student.id, s.company_id).await;
        storage
            .upsert_evaluation_impl(second.id, tutor, RaScores::from_array([88.0; 7]), None)
            .await
            .unwrap();
        let passed = storage
            .grade_internship_impl(second.id, tutor, 70.0, true)
            .await
            .unwrap();
        assert_eq!(passed.module.id, failed.module.id);
        assert_eq!(passed.module.internship_id, second.id);
        assert_eq!(passed.module.average, 88.0);
        assert_eq!(passed.module.result, GradeResult::Aprobado);

        // 更低的成绩不覆盖模块
        let third = started_internship(&storage, s.student.id, s.company_id).await;
        storage
            .upsert_evaluation_impl(third.id, tutor, RaScores::from_array([75.0; 7]), None)
            .await
            .unwrap();
        let lower = storage
            .grade_internship_impl(third.id, tutor, 70.0, true)
            .await
            .unwrap();
        assert_eq!(lower.grade.average, 75.0);
        assert_eq!(lower.module.internship_id, second.id);
        assert_eq!(lower.module.average, 88.0);

        // 另一个学生独立成模块
        let other = add_student(&storage, "otra", s.workshop_id).await;
        let i = started_internship(&storage, other.id, s.company_id).await;
        storage
            .upsert_evaluation_impl(i.id, tutor, RaScores::from_array([90.0; 7]), None)
            .await
            .unwrap();
        let own = storage
            .grade_internship_impl(i.id, tutor, 70.0, false)
            .await
            .unwrap();
        assert_ne!(own.module.id, failed.module.id);
        assert_eq!(own.internship.status, InternshipStatus::EnProceso);
    }

    #[tokio::test]
    async fn test_cancelled_internship_no_longer_counts_for_module() {
        let storage = memory_storage().await;
        let s = seed(&storage, "can").await;
        let tutor = evaluator(&storage, "tutor3").await;

        // 评分但未结业，随后取消
        let a = started_internship(&storage, s.student.id, s.company_id).await;
        storage
            .upsert_evaluation_impl(a.id, tutor, RaScores::from_array([95.0; 7]), None)
            .await
            .unwrap();
        let graded = storage
            .grade_internship_impl(a.id, tutor, 70.0, false)
            .await
            .unwrap();
        assert_eq!(graded.module.result, GradeResult::Aprobado);

        storage
            .transition_internship_impl(a.id, InternshipStatus::Cancelada)
            .await
            .unwrap();
        assert!(storage.get_grade_by_internship_impl(a.id).await.unwrap().is_none());
        assert!(
            storage
                .get_module_by_id_impl(graded.module.id)
                .await
                .unwrap()
                .is_none()
        );

        let b = started_internship(&storage, s.student.id, s.company_id).await;
        storage
            .upsert_evaluation_impl(b.id, tutor, RaScores::from_array([50.0; 7]), None)
            .await
            .unwrap();
        let closed = storage
            .grade_internship_impl(b.id, tutor, 70.0, true)
            .await
            .unwrap();
        assert_eq!(closed.module.internship_id, b.id);
        assert_eq!(closed.module.average, 50.0);
        assert_eq!(closed.module.result, GradeResult::Reprobado);
    }

    #[tokio::test]
    async fn test_cancel_falls_back_to_previous_best_grade() {
        let storage = memory_storage().await;
        let s = seed(&storage, "fal").await;
        let tutor = evaluator(&storage, "tutor4").await;

        let first = started_internship(&storage, s.student.id, s.company_id).await;
        storage
            .upsert_evaluation_impl(first.id, tutor, RaScores::from_array([60.0; 7]), None)
            .await
            .unwrap();
        let closed = storage
            .grade_internship_impl(first.id, tutor, 70.0, true)
            .await
            .unwrap();

        let second = started_internship(&storage, s.student.id, s.company_id).await;
        storage
            .upsert_evaluation_impl(second.id, tutor, RaScores::from_array([90.0; 7]), None)
            .await
            .unwrap();
        storage
            .grade_internship_impl(second.id, tutor, 70.0, false)
            .await
            .unwrap();
        storage
            .transition_internship_impl(second.id, InternshipStatus::Cancelada)
            .await
            .unwrap();

        let module = storage
            .get_module_by_id_impl(closed.module.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(module.internship_id, first.id);
        assert_eq!(module.grade_id, closed.grade.id);
        assert_eq!(module.average, 60.0);
        assert_eq!(module.result, GradeResult::Reprobado);
    }
}
