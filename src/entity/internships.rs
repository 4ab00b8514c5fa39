//! 实习（Pasantía）实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "internships")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub company_id: i64,
    pub workshop_id: i64,
    pub tutor_id: Option<i64>,
    pub contact_id: Option<i64>,
    pub position: Option<String>,
    pub start_date: i64,
    pub end_date: i64,
    pub hours_required: i32,
    pub status: String,
    pub closed_at: Option<i64>,
    pub created_by: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::students::Entity",
        from = "Column::StudentId",
        to = "super::students::Column::Id"
    )]
    Students,
    #[sea_orm(
        belongs_to = "super::companies::Entity",
        from = "Column::CompanyId",
        to = "super::companies::Column::Id"
    )]
    Companies,
    #[sea_orm(
        belongs_to = "super::workshops::Entity",
        from = "Column::WorkshopId",
        to = "super::workshops::Column::Id"
    )]
    Workshops,
    #[sea_orm(
        belongs_to = "super::tutors::Entity",
        from = "Column::TutorId",
        to = "super::tutors::Column::Id",
        on_delete = "SetNull"
    )]
    Tutors,
    #[sea_orm(
        belongs_to = "super::contacts::Entity",
        from = "Column::ContactId",
        to = "super::contacts::Column::Id",
        on_delete = "SetNull"
    )]
    Contacts,
    #[sea_orm(has_many = "super::evaluations::Entity")]
    Evaluations,
    #[sea_orm(has_one = "super::grades::Entity")]
    Grades,
}

impl Related<super::students::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Students.def()
    }
}

impl Related<super::companies::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Companies.def()
    }
}

impl Related<super::workshops::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Workshops.def()
    }
}

impl Related<super::tutors::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tutors.def()
    }
}

impl Related<super::contacts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Contacts.def()
    }
}

impl Related<super::evaluations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Evaluations.def()
    }
}

impl Related<super::grades::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Grades.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_internship(self) -> crate::models::internships::entities::Internship {
        use crate::models::internships::entities::{Internship, InternshipStatus};

        Internship {
            id: self.id,
            student_id: self.student_id,
            company_id: self.company_id,
            workshop_id: self.workshop_id,
            tutor_id: self.tutor_id,
            contact_id: self.contact_id,
            position: self.position,
            start_date: super::ts_to_datetime(self.start_date),
            end_date: super::ts_to_datetime(self.end_date),
            hours_required: self.hours_required,
            status: self
                .status
                .parse::<InternshipStatus>()
                .unwrap_or(InternshipStatus::Pendiente),
            closed_at: self.closed_at.map(super::ts_to_datetime),
            created_by: self.created_by,
            created_at: super::ts_to_datetime(self.created_at),
            updated_at: super::ts_to_datetime(self.updated_at),
        }
    }
}
