//! 实习评价实体（RA1..RA7 评分）

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "evaluations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub internship_id: i64,
    pub evaluator_id: i64,
    pub ra1: f64,
    pub ra2: f64,
    pub ra3: f64,
    pub ra4: f64,
    pub ra5: f64,
    pub ra6: f64,
    pub ra7: f64,
    #[sea_orm(column_type = "Text", nullable)]
    pub comment: Option<String>,
    pub evaluated_at: i64,
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
    pub fn scores(&self) -> crate::models::evaluations::entities::RaScores {
        crate::models::evaluations::entities::RaScores::from_array([
            self.ra1, self.ra2, self.ra3, self.ra4, self.ra5, self.ra6, self.ra7,
        ])
    }

    pub fn into_evaluation(self) -> crate::models::evaluations::entities::Evaluation {
        crate::models::evaluations::entities::Evaluation {
            id: self.id,
            internship_id: self.internship_id,
            evaluator_id: self.evaluator_id,
            scores: self.scores(),
            comment: self.comment,
            evaluated_at: super::ts_to_datetime(self.evaluated_at),
            updated_at: super::ts_to_datetime(self.updated_at),
        }
    }
}
