use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::companies::requests::{
    CompanyListParams, CompanyListQuery, CreateCompanyRequest, UpdateCompanyRequest,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::scope::Viewer;
use crate::services::{current_user, storage_error};
use crate::storage::Storage;
use crate::utils::validate::{validate_email, validate_phone, validate_required_text};

pub struct CompanyService {
    storage: Option<Arc<dyn Storage>>,
}

/// 名称、邮箱、电话的格式校验，联系人也复用
pub(crate) fn validate_contact_fields(
    name: Option<&str>,
    email: Option<&str>,
    phone: Option<&str>,
) -> Result<(), HttpResponse> {
    if let Some(name) = name {
        validate_required_text("name", name, 150)
            .map_err(|msg| ApiResponse::reply(ErrorCode::BadRequest, msg))?;
    }
    if let Some(email) = email.filter(|e| !e.trim().is_empty()) {
        validate_email(email.trim())
            .map_err(|msg| ApiResponse::reply(ErrorCode::UserEmailInvalid, msg))?;
    }
    if let Some(phone) = phone.filter(|p| !p.trim().is_empty()) {
        validate_phone(phone).map_err(|msg| ApiResponse::reply(ErrorCode::UserPhoneInvalid, msg))?;
    }
    Ok(())
}

impl CompanyService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        super::resolve_storage(&self.storage, request)
    }

    pub async fn list_companies(
        &self,
        query: CompanyListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        match storage
            .list_companies_with_pagination(CompanyListQuery::from(query))
            .await
        {
            Ok(resp) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                resp,
                "Company list retrieved successfully",
            ))),
            Err(e) => Ok(storage_error(&e, ErrorCode::CompanyNotFound)),
        }
    }

    pub async fn get_company(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        match storage.get_company_by_id(id).await {
            Ok(Some(company)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                company,
                "Company retrieved successfully",
            ))),
            Ok(None) => Ok(ApiResponse::reply(ErrorCode::CompanyNotFound, "Company not found")),
            Err(e) => Ok(storage_error(&e, ErrorCode::CompanyNotFound)),
        }
    }

    pub async fn create_company(
        &self,
        mut req: CreateCompanyRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        req.name = req.name.trim().to_string();
        if let Err(resp) =
            validate_contact_fields(Some(&req.name), req.email.as_deref(), req.phone.as_deref())
        {
            return Ok(resp);
        }

        let storage = self.get_storage(request)?;
        if let Some(user_id) = req.user_id
            && let Err(resp) = ensure_company_account(&storage, user_id).await
        {
            return Ok(resp);
        }

        match storage.create_company(req).await {
            Ok(company) => Ok(HttpResponse::Created().json(ApiResponse::success(
                company,
                "Company created successfully",
            ))),
            Err(e) => Ok(storage_error(&e, ErrorCode::CompanyNotFound)),
        }
    }

    /// 管理人员可修改任意企业；企业账号只能修改自己的企业资料
    pub async fn update_company(
        &self,
        id: i64,
        mut req: UpdateCompanyRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let user = match current_user(request) {
            Ok(user) => user,
            Err(resp) => return Ok(resp),
        };
        let storage = self.get_storage(request)?;
        let viewer = match Viewer::resolve(&storage, &user).await {
            Ok(viewer) => viewer,
            Err(resp) => return Ok(resp),
        };
        if !viewer.can_manage_company(id) {
            return Ok(ApiResponse::reply(
                ErrorCode::Forbidden,
                "You can only update your own company",
            ));
        }
        if !viewer.is_staff() {
            // 账号绑定和状态只能由管理人员修改
            req.user_id = None;
            req.status = None;
        }

        if let Err(resp) = validate_contact_fields(
            req.name.as_deref(),
            req.email.as_deref(),
            req.phone.as_deref(),
        ) {
            return Ok(resp);
        }
        if let Some(user_id) = req.user_id
            && let Err(resp) = ensure_company_account(&storage, user_id).await
        {
            return Ok(resp);
        }

        match storage.update_company(id, req).await {
            Ok(Some(company)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                company,
                "Company updated successfully",
            ))),
            Ok(None) => Ok(ApiResponse::reply(ErrorCode::CompanyNotFound, "Company not found")),
            Err(e) => Ok(storage_error(&e, ErrorCode::CompanyNotFound)),
        }
    }

    pub async fn delete_company(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        match storage.delete_company(id).await {
            Ok(true) => Ok(HttpResponse::Ok()
                .json(ApiResponse::success_empty("Company deleted successfully"))),
            Ok(false) => Ok(ApiResponse::reply(ErrorCode::CompanyNotFound, "Company not found")),
            Err(e) => Ok(storage_error(&e, ErrorCode::CompanyNotFound)),
        }
    }
}

/// 绑定的账号必须存在且角色为 company
async fn ensure_company_account(
    storage: &Arc<dyn Storage>,
    user_id: i64,
) -> Result<(), HttpResponse> {
    use crate::models::users::entities::UserRole;

    match storage.get_user_by_id(user_id).await {
        Ok(Some(user)) if user.role == UserRole::Company => Ok(()),
        Ok(Some(_)) => Err(ApiResponse::reply(
            ErrorCode::BadRequest,
            "Linked account must have the company role",
        )),
        Ok(None) => Err(ApiResponse::reply(ErrorCode::UserNotFound, "User not found")),
        Err(e) => Err(storage_error(&e, ErrorCode::UserNotFound)),
    }
}
