//! 企业存储操作

use super::{SeaOrmStorage, db_error, now_ts, optional_text};
use crate::entity::companies::{ActiveModel, Column, Entity as Companies};
use crate::errors::Result;
use crate::models::{
    PaginationInfo, RecordStatus,
    common::pagination::normalize_page,
    companies::{
        entities::Company,
        requests::{CompanyListQuery, CreateCompanyRequest, UpdateCompanyRequest},
        responses::CompanyListResponse,
    },
};
use crate::utils::sql::contains_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set, sea_query::Expr,
};

impl SeaOrmStorage {
    pub async fn create_company_impl(&self, req: CreateCompanyRequest) -> Result<Company> {
        let now = now_ts();

        let model = ActiveModel {
            user_id: Set(req.user_id),
            name: Set(req.name),
            tax_id: Set(req.tax_id.and_then(optional_text)),
            sector: Set(req.sector.and_then(optional_text)),
            address: Set(req.address.and_then(optional_text)),
            email: Set(req.email.and_then(optional_text)),
            phone: Set(req.phone.and_then(optional_text)),
            status: Set(RecordStatus::Activo.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| db_error("创建企业失败", e))?;

        Ok(result.into_company())
    }

    pub async fn get_company_by_id_impl(&self, id: i64) -> Result<Option<Company>> {
        let result = Companies::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| db_error("查询企业失败", e))?;

        Ok(result.map(|m| m.into_company()))
    }

    pub async fn get_company_by_user_id_impl(&self, user_id: i64) -> Result<Option<Company>> {
        let result = Companies::find()
            .filter(Column::UserId.eq(user_id))
            .filter(Column::Status.eq(RecordStatus::ACTIVE))
            .one(&self.db)
            .await
            .map_err(|e| db_error("查询企业失败", e))?;

        Ok(result.map(|m| m.into_company()))
    }

    pub async fn list_companies_with_pagination_impl(
        &self,
        query: CompanyListQuery,
    ) -> Result<CompanyListResponse> {
        let (page, size) = normalize_page(query.page, query.size, 20);

        let mut select = Companies::find()
            .filter(Column::Status.eq(query.status.unwrap_or_default().to_string()));

        if let Some(user_id) = query.user_id {
            select = select.filter(Column::UserId.eq(user_id));
        }

        if let Some(ref sector) = query.sector
            && !sector.trim().is_empty()
        {
            select = select.filter(Column::Sector.eq(sector.trim()));
        }

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let search = search.trim();
            select = select.filter(
                Condition::any()
                    .add(Column::Name.like(contains_pattern(search)))
                    .add(Column::TaxId.like(contains_pattern(search)))
                    .add(Column::Email.like(contains_pattern(search))),
            );
        }

        let paginator = select.order_by_asc(Column::Name).paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| db_error("查询企业总数失败", e))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| db_error("查询企业页数失败", e))?;
        let companies = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| db_error("查询企业列表失败", e))?;

        Ok(CompanyListResponse {
            items: companies.into_iter().map(|m| m.into_company()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    pub async fn update_company_impl(
        &self,
        id: i64,
        update: UpdateCompanyRequest,
    ) -> Result<Option<Company>> {
        if self.get_company_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now_ts()),
            ..Default::default()
        };

        if let Some(user_id) = update.user_id {
            model.user_id = Set(Some(user_id));
        }
        if let Some(name) = update.name {
            model.name = Set(name);
        }
        if let Some(tax_id) = update.tax_id {
            model.tax_id = Set(optional_text(tax_id));
        }
        if let Some(sector) = update.sector {
            model.sector = Set(optional_text(sector));
        }
        if let Some(address) = update.address {
            model.address = Set(optional_text(address));
        }
        if let Some(email) = update.email {
            model.email = Set(optional_text(email));
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
            .map_err(|e| db_error("更新企业失败", e))?;

        Ok(Some(updated.into_company()))
    }

    /// 软删除
    pub async fn delete_company_impl(&self, id: i64) -> Result<bool> {
        let result = Companies::update_many()
            .col_expr(Column::Status, Expr::value(RecordStatus::DELETED))
            .col_expr(Column::UpdatedAt, Expr::value(now_ts()))
            .filter(Column::Id.eq(id))
            .filter(Column::Status.eq(RecordStatus::ACTIVE))
            .exec(&self.db)
            .await
            .map_err(|e| db_error("删除企业失败", e))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::memory_storage;
    use crate::errors::IMSystemError;
    use crate::models::companies::requests::{
        CompanyListQuery, CreateCompanyRequest, UpdateCompanyRequest,
    };

    fn company(name: &str, phone: Option<&str>) -> CreateCompanyRequest {
        CreateCompanyRequest {
            user_id: None,
            name: name.to_string(),
            tax_id: Some("131-00000-1".to_string()),
            sector: Some("Industria".to_string()),
            address: None,
            email: None,
            phone: phone.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_company_phone_unique_and_blank_cleared() {
        let storage = memory_storage().await;
        let acme = storage
            .create_company_impl(company("Acme", Some("8095550000")))
            .await
            .unwrap();

        let dup = storage
            .create_company_impl(company("Globex", Some("8095550000")))
            .await;
        assert!(matches!(dup, Err(IMSystemError::Conflict(_))));

        // 空白手机号存为 NULL，不参与唯一性
        storage
            .create_company_impl(company("Initech", Some("  ")))
            .await
            .unwrap();
        storage
            .create_company_impl(company("Umbrella", Some("")))
            .await
            .unwrap();

        let cleared = storage
            .update_company_impl(
                acme.id,
                UpdateCompanyRequest {
                    phone: Some(String::new()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert!(cleared.phone.is_none());
    }

    #[tokio::test]
    async fn test_company_filters() {
        let storage = memory_storage().await;
        let acme = storage
            .create_company_impl(company("Acme", None))
            .await
            .unwrap();
        storage
            .create_company_impl(CreateCompanyRequest {
                sector: Some("Servicios".to_string()),
                ..company("Hotel Caribe", None)
            })
            .await
            .unwrap();

        let industry = storage
            .list_companies_with_pagination_impl(CompanyListQuery {
                sector: Some("Industria".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(industry.items.len(), 1);
        assert_eq!(industry.items[0].id, acme.id);

        assert!(storage.delete_company_impl(acme.id).await.unwrap());
        let remaining = storage
            .list_companies_with_pagination_impl(CompanyListQuery::default())
            .await
            .unwrap();
        assert_eq!(remaining.items.len(), 1);
        assert_eq!(remaining.items[0].name, "Hotel Caribe");
    }
}
