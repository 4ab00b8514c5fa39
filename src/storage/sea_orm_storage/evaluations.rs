//! 实习评价存储操作

use super::{SeaOrmStorage, db_error, now_ts};
use crate::entity::evaluations::{ActiveModel, Column, Entity as Evaluations};
use crate::entity::internships::Entity as Internships;
use crate::errors::{IMSystemError, Result};
use crate::models::{
    evaluations::entities::{Evaluation, RaScores},
    internships::entities::InternshipStatus,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 写入或覆盖某评价人对实习的评分，实习必须处于 EnProceso
    pub async fn upsert_evaluation_impl(
        &self,
        internship_id: i64,
        evaluator_id: i64,
        scores: RaScores,
        comment: Option<String>,
    ) -> Result<Evaluation> {
        scores.validate().map_err(IMSystemError::validation)?;

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
        if internship.status != InternshipStatus::EnProceso.to_string() {
            return Err(IMSystemError::invalid_state(format!(
                "Internship {internship_id} is {} and cannot be evaluated",
                internship.status
            )));
        }

        let existing = Evaluations::find()
            .filter(Column::InternshipId.eq(internship_id))
            .filter(Column::EvaluatorId.eq(evaluator_id))
            .one(&txn)
            .await
            .map_err(|e| db_error("查询评价失败", e))?;

        let now = now_ts();
        let mut model = match existing {
            Some(found) => ActiveModel {
                id: Set(found.id),
                ..Default::default()
            },
            None => ActiveModel {
                internship_id: Set(internship_id),
                evaluator_id: Set(evaluator_id),
                evaluated_at: Set(now),
                ..Default::default()
            },
        };
        let [ra1, ra2, ra3, ra4, ra5, ra6, ra7] = scores.to_array();
        model.ra1 = Set(ra1);
        model.ra2 = Set(ra2);
        model.ra3 = Set(ra3);
        model.ra4 = Set(ra4);
        model.ra5 = Set(ra5);
        model.ra6 = Set(ra6);
        model.ra7 = Set(ra7);
        model.comment = Set(comment);
        model.updated_at = Set(now);

        let saved = if model.id.is_set() {
            model.update(&txn).await
        } else {
            model.insert(&txn).await
        }
        .map_err(|e| db_error("保存评价失败", e))?;

        txn.commit()
            .await
            .map_err(|e| db_error("提交事务失败", e))?;

        Ok(saved.into_evaluation())
    }

    pub async fn list_evaluations_by_internship_impl(
        &self,
        internship_id: i64,
    ) -> Result<Vec<Evaluation>> {
        let rows = Evaluations::find()
            .filter(Column::InternshipId.eq(internship_id))
            .order_by_asc(Column::EvaluatedAt)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| db_error("查询评价失败", e))?;

        Ok(rows.into_iter().map(|m| m.into_evaluation()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::super::internships::fixtures::{seed, started_internship};
    use super::super::test_support::memory_storage;
    use crate::errors::IMSystemError;
    use crate::models::evaluations::entities::RaScores;

    #[tokio::test]
    async fn test_one_evaluation_per_evaluator_is_upserted() {
        let storage = memory_storage().await;
        let s = seed(&storage, "ele").await;
        let i = started_internship(&storage, s.student.id, s.company_id).await;
        let evaluator = s.student.user_id;

        let first = storage
            .upsert_evaluation_impl(i.id, evaluator, RaScores::from_array([60.0; 7]), None)
            .await
            .unwrap();
        let second = storage
            .upsert_evaluation_impl(
                i.id,
                evaluator,
                RaScores::from_array([90.0; 7]),
                Some("Mejoró".to_string()),
            )
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        let all = storage.list_evaluations_by_internship_impl(i.id).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].scores.ra1, 90.0);
        assert_eq!(all[0].comment.as_deref(), Some("Mejoró"));
    }

    #[tokio::test]
    async fn test_evaluation_requires_in_progress_and_valid_scores() {
        let storage = memory_storage().await;
        let s = seed(&storage, "mec").await;
        let pending = storage
            .create_internship_impl(
                super::super::internships::fixtures::internship_request(s.student.id, s.company_id),
                1,
            )
            .await
            .unwrap();

        let not_started = storage
            .upsert_evaluation_impl(pending.id, 1, RaScores::from_array([80.0; 7]), None)
            .await;
        assert!(matches!(not_started, Err(IMSystemError::InvalidState(_))));

        let out_of_range = storage
            .upsert_evaluation_impl(
                pending.id,
                1,
                RaScores::from_array([80.0, 80.0, 80.0, 101.0, 80.0, 80.0, 80.0]),
                None,
            )
            .await;
        assert!(matches!(out_of_range, Err(IMSystemError::Validation(_))));

        let missing = storage
            .upsert_evaluation_impl(404, 1, RaScores::from_array([80.0; 7]), None)
            .await;
        assert!(matches!(missing, Err(IMSystemError::NotFound(_))));
    }
}
