/// Upload handler - single-file multipart media upload
use crate::error::{AppError, Result};
use crate::models::MediaType;
use crate::services::StorageBackend;
use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use futures_util::StreamExt;
use std::sync::Arc;

/// Size guardrail for a single uploaded file (50MB; stories allow video)
const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Store one uploaded media file and return its public URL
pub async fn upload_media(
    storage: web::Data<Arc<dyn StorageBackend>>,
    mut payload: Multipart,
) -> Result<HttpResponse> {
    let mut uploaded: Option<(String, String, Vec<u8>)> = None;

    while let Some(field) = payload.next().await {
        let mut field =
            field.map_err(|e| AppError::BadRequest(format!("Multipart error: {}", e)))?;

        if field.name() != "file" {
            continue;
        }

        let filename = field
            .content_disposition()
            .get_filename()
            .unwrap_or("upload.bin")
            .to_string();
        let content_type = field
            .content_type()
            .map(|m| m.to_string())
            .unwrap_or_else(|| mime::APPLICATION_OCTET_STREAM.to_string());

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let data =
                chunk.map_err(|e| AppError::BadRequest(format!("File read error: {}", e)))?;
            bytes.extend_from_slice(&data);
            if bytes.len() > MAX_UPLOAD_BYTES {
                return Err(AppError::BadRequest("File exceeds 50MB limit".into()));
            }
        }

        uploaded = Some((filename, content_type, bytes));
    }

    let (filename, content_type, bytes) =
        uploaded.ok_or_else(|| AppError::BadRequest("No file uploaded".into()))?;

    let media_type = MediaType::from_mime(&content_type);
    let url = storage.save(media_type, &filename, bytes).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "url": url })))
}
