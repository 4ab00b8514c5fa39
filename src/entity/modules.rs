//! 实习模块（Módulo de pasantía）实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "modules")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub workshop_id: i64,
    pub internship_id: i64,
    pub grade_id: i64,
    pub average: f64,
    pub result: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::students::Entity",
        from = "Column::StudentId",
        to = "super::students::Column::Id",
        on_delete = "Cascade"
    )]
    Students,
    #[sea_orm(
        belongs_to = "super::grades::Entity",
        from = "Column::GradeId",
        to = "super::grades::Column::Id"
    )]
    Grades,
}

impl Related<super::students::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Students.def()
    }
}

impl Related<super::grades::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Grades.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_module(self) -> crate::models::modules::entities::InternshipModule {
        use crate::models::grades::entities::GradeResult;
        use crate::models::modules::entities::InternshipModule;

        InternshipModule {
            id: self.id,
            student_id: self.student_id,
            workshop_id: self.workshop_id,
            internship_id: self.internship_id,
            grade_id: self.grade_id,
            average: self.average,
            result: self
                .result
                .parse::<GradeResult>()
                .unwrap_or(GradeResult::Reprobado),
            created_at: super::ts_to_datetime(self.created_at),
            updated_at: super::ts_to_datetime(self.updated_at),
        }
    }
}
