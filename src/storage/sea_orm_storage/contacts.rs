//! 企业联系人存储操作

use super::{SeaOrmStorage, db_error, now_ts, optional_text};
use crate::entity::contacts::{ActiveModel, Column, Entity as Contacts};
use crate::errors::Result;
use crate::models::{
    PaginationInfo, RecordStatus,
    common::pagination::normalize_page,
    contacts::{
        entities::Contact,
        requests::{ContactListQuery, CreateContactRequest, UpdateContactRequest},
        responses::ContactListResponse,
    },
};
use crate::utils::sql::contains_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set, sea_query::Expr,
};

impl SeaOrmStorage {
    pub async fn create_contact_impl(&self, req: CreateContactRequest) -> Result<Contact> {
        let now = now_ts();

        let model = ActiveModel {
            company_id: Set(req.company_id),
            name: Set(req.name),
            position: Set(req.position),
            email: Set(req.email),
            phone: Set(req.phone.and_then(optional_text)),
            status: Set(RecordStatus::Activo.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| db_error("创建联系人失败", e))?;

        Ok(result.into_contact())
    }

    pub async fn get_contact_by_id_impl(&self, id: i64) -> Result<Option<Contact>> {
        let result = Contacts::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| db_error("查询联系人失败", e))?;

        Ok(result.map(|m| m.into_contact()))
    }

    pub async fn list_contacts_with_pagination_impl(
        &self,
        query: ContactListQuery,
    ) -> Result<ContactListResponse> {
        let (page, size) = normalize_page(query.page, query.size, 20);

        let mut select = Contacts::find()
            .filter(Column::Status.eq(query.status.unwrap_or_default().to_string()));

        if let Some(company_id) = query.company_id {
            select = select.filter(Column::CompanyId.eq(company_id));
        }

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let search = search.trim();
            select = select.filter(
                Condition::any()
                    .add(Column::Name.like(contains_pattern(search)))
                    .add(Column::Email.like(contains_pattern(search))),
            );
        }

        let paginator = select.order_by_asc(Column::Name).paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| db_error("查询联系人总数失败", e))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| db_error("查询联系人页数失败", e))?;
        let contacts = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| db_error("查询联系人列表失败", e))?;

        Ok(ContactListResponse {
            items: contacts.into_iter().map(|m| m.into_contact()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    pub async fn update_contact_impl(
        &self,
        id: i64,
        update: UpdateContactRequest,
    ) -> Result<Option<Contact>> {
        if self.get_contact_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now_ts()),
            ..Default::default()
        };

        if let Some(name) = update.name {
            model.name = Set(name);
        }
        if let Some(position) = update.position {
            model.position = Set(Some(position));
        }
        if let Some(email) = update.email {
            model.email = Set(Some(email));
        }
        if let Some(phone) = update.phone {
            model.phone = Set(optional_text(phone));
        }
        if let Some(status) = update.status {
            model.status = Set(status.to_string());
        }

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| db_error("更新联系人失败", e))?;

        Ok(Some(updated.into_contact()))
    }

    pub async fn delete_contact_impl(&self, id: i64) -> Result<bool> {
        let result = Contacts::update_many()
            .col_expr(Column::Status, Expr::value(RecordStatus::DELETED))
            .col_expr(Column::UpdatedAt, Expr::value(now_ts()))
            .filter(Column::Id.eq(id))
            .filter(Column::Status.eq(RecordStatus::ACTIVE))
            .exec(&self.db)
            .await
            .map_err(|e| db_error("删除联系人失败", e))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::memory_storage;
    use crate::errors::IMSystemError;
    use crate::models::RecordStatus;
    use crate::models::companies::requests::CreateCompanyRequest;
    use crate::models::contacts::requests::{
        ContactListQuery, CreateContactRequest, UpdateContactRequest,
    };

    fn contact(company_id: i64, name: &str) -> CreateContactRequest {
        CreateContactRequest {
            company_id,
            name: name.to_string(),
            position: Some("RRHH".to_string()),
            email: Some(format!("{}@empresa.com", name.to_lowercase())),
            phone: Some(String::new()),
        }
    }

    async fn company(storage: &super::SeaOrmStorage, name: &str) -> i64 {
        storage
            .create_company_impl(CreateCompanyRequest {
                user_id: None,
                name: name.to_string(),
                tax_id: None,
                sector: None,
                address: None,
                email: None,
                phone: None,
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_contacts_are_listed_per_company() {
        let storage = memory_storage().await;
        let a = company(&storage, "Alfa").await;
        let b = company(&storage, "Beta").await;

        let first = storage.create_contact_impl(contact(a, "Carmen")).await.unwrap();
        assert!(first.phone.is_none());
        storage.create_contact_impl(contact(a, "Pedro")).await.unwrap();
        storage.create_contact_impl(contact(b, "Julia")).await.unwrap();

        let of_a = storage
            .list_contacts_with_pagination_impl(ContactListQuery {
                company_id: Some(a),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(of_a.pagination.total, 2);
        assert!(of_a.items.iter().all(|c| c.company_id == a));

        let found = storage
            .list_contacts_with_pagination_impl(ContactListQuery {
                search: Some("jul".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(found.items.len(), 1);
        assert_eq!(found.items[0].company_id, b);
    }

    #[tokio::test]
    async fn test_unknown_company_is_rejected() {
        let storage = memory_storage().await;
        let result = storage.create_contact_impl(contact(404, "Nadie")).await;
        assert!(matches!(result, Err(IMSystemError::Validation(_))));
    }

    #[tokio::test]
    async fn test_delete_contact_is_soft() {
        let storage = memory_storage().await;
        let a = company(&storage, "Gamma").await;
        let c = storage.create_contact_impl(contact(a, "Rafael")).await.unwrap();

        let updated = storage
            .update_contact_impl(
                c.id,
                UpdateContactRequest {
                    phone: Some(" 809-555-0199 ".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.phone.as_deref(), Some("809-555-0199"));

        assert!(storage.delete_contact_impl(c.id).await.unwrap());
        assert!(!storage.delete_contact_impl(c.id).await.unwrap());

        let row = storage.get_contact_by_id_impl(c.id).await.unwrap().unwrap();
        assert_eq!(row.status, RecordStatus::Eliminado);
        let active = storage
            .list_contacts_with_pagination_impl(ContactListQuery {
                company_id: Some(a),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(active.items.is_empty());

        assert!(
            storage
                .update_contact_impl(9999, UpdateContactRequest::default())
                .await
                .unwrap()
                .is_none()
        );
    }
}
