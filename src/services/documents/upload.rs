use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use futures_util::TryStreamExt;
use futures_util::stream::StreamExt;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use super::DocumentService;
use crate::config::AppConfig;
use crate::errors::IMSystemError;
use crate::models::documents::entities::DocumentType;
use crate::models::documents::requests::NewDocument;
use crate::models::documents::responses::DocumentUploadResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::scope::Viewer;
use crate::services::{current_user, storage_error};
use crate::utils::validate_magic_bytes;

/// 上传过程中落盘的文件，未 commit 时在 drop 里删除
struct PendingFile {
    path: PathBuf,
    committed: bool,
}

impl PendingFile {
    fn commit(mut self) {
        self.committed = true;
    }
}

impl Drop for PendingFile {
    fn drop(&mut self) {
        if !self.committed {
            let _ = fs::remove_file(&self.path);
        }
    }
}

/// 文件名扩展名，带点且小写
fn extension_of(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_lowercase()))
        .unwrap_or_default()
}

async fn read_text_field(field: &mut actix_multipart::Field) -> ActixResult<String> {
    let mut buf = Vec::new();
    while let Some(chunk) = field.next().await {
        buf.extend_from_slice(&chunk?);
        if buf.len() > 64 {
            break;
        }
    }
    Ok(String::from_utf8_lossy(&buf).trim().to_string())
}

pub async fn handle_upload(
    service: &DocumentService,
    request: &HttpRequest,
    mut payload: Multipart,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let config = AppConfig::get();
    let upload_dir = &config.upload.dir;
    let max_size = config.upload.max_size;

    if !Path::new(upload_dir).exists()
        && let Err(e) = fs::create_dir_all(upload_dir)
    {
        tracing::error!("{}", IMSystemError::file_operation(format!("{e}")));
        return Ok(ApiResponse::reply(
            ErrorCode::FileUploadFailed,
            "Failed to create upload directory",
        ));
    }

    let mut pending: Option<PendingFile> = None;
    let mut original_name = String::new();
    let mut stored_name = String::new();
    let mut file_type = String::new();
    let mut file_size: i64 = 0;
    let mut document_type: Option<DocumentType> = None;
    let mut internship_id: Option<i64> = None;

    while let Ok(Some(mut field)) = payload.try_next().await {
        let content_disposition = field.content_disposition();
        let name = content_disposition
            .and_then(|cd| cd.get_name())
            .unwrap_or_default()
            .to_string();

        match name.as_str() {
            "file" => {
                if pending.is_some() {
                    return Ok(ApiResponse::reply(
                        ErrorCode::MultifileUploadNotAllowed,
                        "Only one file can be uploaded at a time",
                    ));
                }

                original_name = content_disposition
                    .and_then(|cd| cd.get_filename())
                    .map(|s| s.to_string())
                    .unwrap_or_default();

                let extension = extension_of(&original_name);
                if !config
                    .upload
                    .allowed_types
                    .iter()
                    .any(|t| t.to_lowercase() == extension)
                {
                    return Ok(ApiResponse::reply(
                        ErrorCode::FileTypeNotAllowed,
                        "File type not allowed",
                    ));
                }

                // MIME 类型只做记录
                file_type = field
                    .content_type()
                    .map(|ct| ct.to_string())
                    .unwrap_or_default();

                stored_name = format!("{}.bin", Uuid::new_v4().simple());
                let path = Path::new(upload_dir).join(&stored_name);
                let mut f = match File::create(&path) {
                    Ok(file) => file,
                    Err(e) => {
                        tracing::error!("{}", IMSystemError::file_operation(format!("{e}")));
                        return Ok(ApiResponse::reply(
                            ErrorCode::FileUploadFailed,
                            "Failed to create file",
                        ));
                    }
                };
                let guard = PendingFile {
                    path,
                    committed: false,
                };

                let mut total_size: usize = 0;
                let mut first_chunk = true;
                while let Some(chunk) = field.next().await {
                    let data = chunk?;

                    // 首个分块校验魔数
                    if first_chunk {
                        first_chunk = false;
                        if !validate_magic_bytes(&data, &extension) {
                            return Ok(ApiResponse::reply(
                                ErrorCode::FileTypeNotAllowed,
                                "File content does not match its extension",
                            ));
                        }
                    }

                    total_size += data.len();
                    if total_size > max_size {
                        return Ok(ApiResponse::reply(
                            ErrorCode::FileSizeExceeded,
                            "File size exceeds the limit",
                        ));
                    }
                    f.write_all(&data)?;
                }

                if total_size == 0 {
                    return Ok(ApiResponse::reply(ErrorCode::BadRequest, "Uploaded file is empty"));
                }
                file_size = total_size as i64;
                pending = Some(guard);
            }
            "document_type" => {
                let raw = read_text_field(&mut field).await?;
                match raw.parse::<DocumentType>() {
                    Ok(kind) => document_type = Some(kind),
                    Err(msg) => return Ok(ApiResponse::reply(ErrorCode::BadRequest, msg)),
                }
            }
            "internship_id" => {
                let raw = read_text_field(&mut field).await?;
                if !raw.is_empty() {
                    match raw.parse::<i64>() {
                        Ok(id) if id > 0 => internship_id = Some(id),
                        _ => {
                            return Ok(ApiResponse::reply(
                                ErrorCode::BadRequest,
                                "Invalid internship_id",
                            ));
                        }
                    }
                }
            }
            // 其它字段忽略
            _ => {}
        }
    }

    let Some(pending) = pending else {
        return Ok(ApiResponse::reply(
            ErrorCode::FileNotFound,
            "No file found in upload payload",
        ));
    };
    let document_type = document_type.unwrap_or(DocumentType::Other);

    let storage = service.get_storage(request)?;

    // 关联学生：挂在实习上时取实习的学生，否则学生上传者即本人
    let student_id = match internship_id {
        Some(id) => match service.internships.load_visible(&storage, id, request).await {
            Ok((_, internship)) => Some(internship.student_id),
            Err(resp) => return Ok(resp),
        },
        None => match Viewer::resolve(&storage, &user).await {
            Ok(Viewer::Student(student)) => Some(student.id),
            Ok(_) => None,
            Err(resp) => return Ok(resp),
        },
    };

    let new_doc = NewDocument {
        original_name,
        stored_name,
        file_size,
        file_type,
        document_type,
        owner_id: user.id,
        student_id,
        internship_id,
    };

    match storage.create_document(new_doc).await {
        Ok(doc) => {
            pending.commit();
            tracing::info!(
                "Document {} uploaded by user {} ({} bytes)",
                doc.id,
                user.id,
                doc.file_size
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                DocumentUploadResponse::from(doc),
                "File uploaded successfully",
            )))
        }
        Err(e) => Ok(storage_error(&e, ErrorCode::FileUploadFailed)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("Informe.PDF"), ".pdf");
        assert_eq!(extension_of("archive.tar.zip"), ".zip");
        assert_eq!(extension_of("README"), "");
    }

    #[test]
    fn test_pending_file_removed_unless_committed() {
        let dir = std::env::temp_dir();
        let dropped = dir.join(format!("{}.bin", Uuid::new_v4().simple()));
        let kept = dir.join(format!("{}.bin", Uuid::new_v4().simple()));
        fs::write(&dropped, b"x").unwrap();
        fs::write(&kept, b"x").unwrap();

        drop(PendingFile {
            path: dropped.clone(),
            committed: false,
        });
        PendingFile {
            path: kept.clone(),
            committed: false,
        }
        .commit();

        assert!(!dropped.exists());
        assert!(kept.exists());
        fs::remove_file(kept).unwrap();
    }
}
