use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, middleware, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::documents::requests::DocumentListParams;
use crate::services::DocumentService;
use crate::utils::SafeDownloadToken;

static DOCUMENT_SERVICE: Lazy<DocumentService> = Lazy::new(DocumentService::new_lazy);

pub async fn upload_document(
    request: HttpRequest,
    payload: actix_multipart::Multipart,
) -> ActixResult<HttpResponse> {
    DOCUMENT_SERVICE.upload(&request, payload).await
}

pub async fn download_document(
    request: HttpRequest,
    token: SafeDownloadToken,
) -> ActixResult<HttpResponse> {
    DOCUMENT_SERVICE.download(&request, &token.0).await
}

pub async fn list_documents(
    request: HttpRequest,
    query: web::Query<DocumentListParams>,
) -> ActixResult<HttpResponse> {
    DOCUMENT_SERVICE
        .list_documents(query.into_inner(), &request)
        .await
}

pub fn configure_document_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/documents")
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_documents))
            .service(
                web::resource("/upload")
                    .wrap(middlewares::RateLimit::document_upload())
                    .route(web::post().to(upload_document)),
            )
            .service(
                web::resource("/download/{token}")
                    .wrap(middleware::Compress::default())
                    .route(web::get().to(download_document)),
            ),
    );
}
