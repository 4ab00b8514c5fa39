use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::contacts::requests::{
    ContactListParams, ContactListQuery, CreateContactRequest, UpdateContactRequest,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::companies::validate_contact_fields;
use crate::services::scope::Viewer;
use crate::services::{current_user, storage_error};
use crate::storage::Storage;

pub struct ContactService {
    storage: Option<Arc<dyn Storage>>,
}

impl ContactService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        super::resolve_storage(&self.storage, request)
    }

    /// 写操作的权限：管理人员，或联系人所属企业的企业账号
    async fn authorize(
        &self,
        storage: &Arc<dyn Storage>,
        company_id: i64,
        request: &HttpRequest,
    ) -> Result<(), HttpResponse> {
        let user = current_user(request)?;
        let viewer = Viewer::resolve(storage, &user).await?;
        if viewer.can_manage_company(company_id) {
            Ok(())
        } else {
            Err(ApiResponse::reply(
                ErrorCode::Forbidden,
                "You can only manage contacts of your own company",
            ))
        }
    }

    async fn load(
        &self,
        storage: &Arc<dyn Storage>,
        id: i64,
    ) -> Result<crate::models::contacts::entities::Contact, HttpResponse> {
        match storage.get_contact_by_id(id).await {
            Ok(Some(contact)) => Ok(contact),
            Ok(None) => Err(ApiResponse::reply(ErrorCode::ContactNotFound, "Contact not found")),
            Err(e) => Err(storage_error(&e, ErrorCode::ContactNotFound)),
        }
    }

    pub async fn list_contacts(
        &self,
        query: ContactListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        match storage
            .list_contacts_with_pagination(ContactListQuery::from(query))
            .await
        {
            Ok(resp) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                resp,
                "Contact list retrieved successfully",
            ))),
            Err(e) => Ok(storage_error(&e, ErrorCode::ContactNotFound)),
        }
    }

    pub async fn get_contact(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        match self.load(&storage, id).await {
            Ok(contact) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                contact,
                "Contact retrieved successfully",
            ))),
            Err(resp) => Ok(resp),
        }
    }

    pub async fn create_contact(
        &self,
        mut req: CreateContactRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        req.name = req.name.trim().to_string();
        if let Err(resp) =
            validate_contact_fields(Some(&req.name), req.email.as_deref(), req.phone.as_deref())
        {
            return Ok(resp);
        }

        let storage = self.get_storage(request)?;
        if let Err(resp) = self.authorize(&storage, req.company_id, request).await {
            return Ok(resp);
        }

        match storage.create_contact(req).await {
            Ok(contact) => Ok(HttpResponse::Created().json(ApiResponse::success(
                contact,
                "Contact created successfully",
            ))),
            Err(e) => Ok(storage_error(&e, ErrorCode::CompanyNotFound)),
        }
    }

    pub async fn update_contact(
        &self,
        id: i64,
        req: UpdateContactRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        if let Err(resp) = validate_contact_fields(
            req.name.as_deref(),
            req.email.as_deref(),
            req.phone.as_deref(),
        ) {
            return Ok(resp);
        }

        let storage = self.get_storage(request)?;
        let contact = match self.load(&storage, id).await {
            Ok(contact) => contact,
            Err(resp) => return Ok(resp),
        };
        if let Err(resp) = self.authorize(&storage, contact.company_id, request).await {
            return Ok(resp);
        }

        match storage.update_contact(id, req).await {
            Ok(Some(contact)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                contact,
                "Contact updated successfully",
            ))),
            Ok(None) => Ok(ApiResponse::reply(ErrorCode::ContactNotFound, "Contact not found")),
            Err(e) => Ok(storage_error(&e, ErrorCode::ContactNotFound)),
        }
    }

    pub async fn delete_contact(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let contact = match self.load(&storage, id).await {
            Ok(contact) => contact,
            Err(resp) => return Ok(resp),
        };
        if let Err(resp) = self.authorize(&storage, contact.company_id, request).await {
            return Ok(resp);
        }

        match storage.delete_contact(id).await {
            Ok(true) => Ok(HttpResponse::Ok()
                .json(ApiResponse::success_empty("Contact deleted successfully"))),
            Ok(false) => Ok(ApiResponse::reply(ErrorCode::ContactNotFound, "Contact not found")),
            Err(e) => Ok(storage_error(&e, ErrorCode::ContactNotFound)),
        }
    }
}
