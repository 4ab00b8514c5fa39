use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::header};
use std::path::Path;
use tracing::error;

use super::DocumentService;
use crate::config::AppConfig;
use crate::errors::IMSystemError;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::scope::Viewer;
use crate::services::{current_user, storage_error};

/// Content-Disposition 中的文件名去掉引号和控制字符
fn header_safe_name(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_control() && *c != '"' && *c != '\\')
        .collect()
}

pub async fn handle_download(
    service: &DocumentService,
    request: &HttpRequest,
    token: &str,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;

    let doc = match storage.get_document_by_token(token).await {
        Ok(Some(doc)) => doc,
        Ok(None) => return Ok(ApiResponse::reply(ErrorCode::FileNotFound, "File not found")),
        Err(e) => return Ok(storage_error(&e, ErrorCode::FileNotFound)),
    };

    let viewer = match Viewer::resolve(&storage, &user).await {
        Ok(viewer) => viewer,
        Err(resp) => return Ok(resp),
    };
    match service.can_access(&storage, &user, &viewer, &doc).await {
        Ok(true) => {}
        // 无权访问时不暴露文件是否存在
        Ok(false) => return Ok(ApiResponse::reply(ErrorCode::FileNotFound, "File not found")),
        Err(e) => return Ok(storage_error(&e, ErrorCode::FileNotFound)),
    }

    let path = Path::new(&AppConfig::get().upload.dir).join(&doc.stored_name);
    let bytes = match std::fs::read(&path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            error!("Stored file missing for document {}: {}", doc.id, path.display());
            return Ok(ApiResponse::reply(ErrorCode::FileNotFound, "File not found"));
        }
        Err(e) => {
            error!("{}", IMSystemError::file_operation(format!("{e}")));
            return Ok(ApiResponse::reply(
                ErrorCode::InternalServerError,
                "File read failed",
            ));
        }
    };

    let content_type = if doc.file_type.is_empty() {
        "application/octet-stream".to_string()
    } else {
        doc.file_type.clone()
    };

    Ok(HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, content_type))
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!(
                "attachment; filename=\"{}\"",
                header_safe_name(&doc.original_name)
            ),
        ))
        .body(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_safe_name() {
        assert_eq!(header_safe_name("informe \"final\".pdf"), "informe final.pdf");
        assert_eq!(header_safe_name("cv\r\n.pdf"), "cv.pdf");
        assert_eq!(header_safe_name("Currículum.docx"), "Currículum.docx");
    }
}
