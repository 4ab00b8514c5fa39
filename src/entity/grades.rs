//! 实习成绩实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "grades")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub internship_id: i64,
    pub student_id: i64,
    pub ra1: f64,
    pub ra2: f64,
    pub ra3: f64,
    pub ra4: f64,
    pub ra5: f64,
    pub ra6: f64,
    pub ra7: f64,
    pub average: f64,
    pub result: String,
    pub evaluation_count: i32,
    pub graded_by: i64,
    pub graded_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::internships::Entity",
        from = "Column::InternshipId",
        to = "super::internships::Column::Id",
        on_delete = "Cascade"
    )]
    Internships,
}

impl Related<super::internships::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Internships.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_grade(self) -> crate::models::grades::entities::Grade {
        use crate::models::evaluations::entities::RaScores;
        use crate::models::grades::entities::{Grade, GradeResult};

        Grade {
            id: self.id,
            internship_id: self.internship_id,
            student_id: self.student_id,
            criteria: RaScores::from_array([
                self.ra1, self.ra2, self.ra3, self.ra4, self.ra5, self.ra6, self.ra7,
            ]),
            average: self.average,
            result: self
                .result
                .parse::<GradeResult>()
                .unwrap_or(GradeResult::Reprobado),
            evaluation_count: self.evaluation_count,
            graded_by: self.graded_by,
            graded_at: super::ts_to_datetime(self.graded_at),
            updated_at: super::ts_to_datetime(self.updated_at),
        }
    }
}
