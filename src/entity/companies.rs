//! 企业实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "companies")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    // 企业账号（role = company）
    pub user_id: Option<i64>,
    #[sea_orm(unique)]
    pub name: String,
    pub tax_id: Option<String>,
    pub sector: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub address: Option<String>,
    pub email: Option<String>,
    #[sea_orm(unique)]
    pub phone: Option<String>,
    pub status: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_delete = "SetNull"
    )]
    Users,
    #[sea_orm(has_many = "super::contacts::Entity")]
    Contacts,
    #[sea_orm(has_many = "super::internships::Entity")]
    Internships,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::contacts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Contacts.def()
    }
}

impl Related<super::internships::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Internships.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_company(self) -> crate::models::companies::entities::Company {
        crate::models::companies::entities::Company {
            id: self.id,
            user_id: self.user_id,
            name: self.name,
            tax_id: self.tax_id,
            sector: self.sector,
            address: self.address,
            email: self.email,
            phone: self.phone,
            status: self.status.parse().unwrap_or_default(),
            created_at: super::ts_to_datetime(self.created_at),
            updated_at: super::ts_to_datetime(self.updated_at),
        }
    }
}
