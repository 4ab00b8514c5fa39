//! 报表统计查询

use super::{SeaOrmStorage, db_error};
use crate::entity::internships::{Column as InternshipColumn, Entity as Internships};
use crate::entity::students::{Column as StudentColumn, Entity as Students};
use crate::errors::Result;
use crate::models::{
    RecordStatus, internships::entities::InternshipStatus,
    reports::responses::InternshipStatusCounts,
};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QuerySelect};

impl SeaOrmStorage {
    /// 学生总数与在读（Activo）数量
    pub async fn count_students_impl(&self, workshop_id: Option<i64>) -> Result<(i64, i64)> {
        let mut total = Students::find();
        let mut active = Students::find().filter(StudentColumn::Status.eq(RecordStatus::ACTIVE));
        if let Some(workshop_id) = workshop_id {
            total = total.filter(StudentColumn::WorkshopId.eq(workshop_id));
            active = active.filter(StudentColumn::WorkshopId.eq(workshop_id));
        }

        let total = total
            .count(&self.db)
            .await
            .map_err(|e| db_error("统计学生数量失败", e))?;
        let active = active
            .count(&self.db)
            .await
            .map_err(|e| db_error("统计学生数量失败", e))?;

        Ok((total as i64, active as i64))
    }

    /// 按状态分组统计实习数量
    pub async fn count_internships_by_status_impl(
        &self,
        workshop_id: Option<i64>,
    ) -> Result<InternshipStatusCounts> {
        let mut select = Internships::find()
            .select_only()
            .column(InternshipColumn::Status)
            .column_as(InternshipColumn::Id.count(), "count")
            .group_by(InternshipColumn::Status);
        if let Some(workshop_id) = workshop_id {
            select = select.filter(InternshipColumn::WorkshopId.eq(workshop_id));
        }

        let rows: Vec<(String, i64)> = select
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| db_error("统计实习数量失败", e))?;

        let mut counts = InternshipStatusCounts::default();
        for (status, count) in rows {
            match status.parse::<InternshipStatus>() {
                Ok(InternshipStatus::Pendiente) => counts.pendiente = count,
                Ok(InternshipStatus::EnProceso) => counts.en_proceso = count,
                Ok(InternshipStatus::Finalizada) => counts.finalizada = count,
                Ok(InternshipStatus::Cancelada) => counts.cancelada = count,
                Err(e) => tracing::warn!("忽略未知实习状态: {}", e),
            }
        }

        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::super::internships::fixtures::{add_student, internship_request, seed};
    use super::super::test_support::memory_storage;
    use crate::models::internships::entities::InternshipStatus;

    #[tokio::test]
    async fn test_report_counts() {
        let storage = memory_storage().await;
        let s = seed(&storage, "rep").await;
        let other = add_student(&storage, "segundo", s.workshop_id).await;
        let third = add_student(&storage, "tercero", s.workshop_id).await;
        storage.delete_student_impl(third.id).await.unwrap();

        let a = storage
            .create_internship_impl(internship_request(s.student.id, s.company_id), 1)
            .await
            .unwrap();
        let b = storage
            .create_internship_impl(internship_request(other.id, s.company_id), 1)
            .await
            .unwrap();
        storage
            .transition_internship_impl(a.id, InternshipStatus::EnProceso)
            .await
            .unwrap();
        storage
            .transition_internship_impl(b.id, InternshipStatus::Cancelada)
            .await
            .unwrap();

        assert_eq!(
            storage.count_students_impl(Some(s.workshop_id)).await.unwrap(),
            (3, 2)
        );
        assert_eq!(storage.count_students_impl(Some(999)).await.unwrap(), (0, 0));

        let counts = storage.count_internships_by_status_impl(None).await.unwrap();
        assert_eq!(counts.en_proceso, 1);
        assert_eq!(counts.cancelada, 1);
        assert_eq!(counts.pendiente, 0);
        assert_eq!(counts.total(), 2);
    }
}
