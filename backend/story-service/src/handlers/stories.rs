/// Story handlers - HTTP endpoints for story operations
use crate::error::{AppError, Result};
use crate::models::MediaType;
use crate::services::{NewStoryItem, StorageBackend, StoriesService, MAX_ITEMS_PER_STORY};
use crate::store::{StoryStore, UserStore};
use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use futures_util::StreamExt;
use serde::Deserialize;
use std::sync::Arc;

/// Per-file size guardrail for multipart story creation (20MB)
const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListStoriesQuery {
    pub user_id: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStoryItemRequest {
    pub url: String,
    pub content_type: String,
    pub duration_secs: Option<u32>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStoryRequest {
    pub user_id: String,
    pub items: Vec<CreateStoryItemRequest>,
    pub category: Option<String>,
}

/// List active stories, newest first, optionally filtered by author
pub async fn get_stories(
    stories: web::Data<Arc<StoryStore>>,
    users: web::Data<Arc<UserStore>>,
    query: web::Query<ListStoriesQuery>,
) -> Result<HttpResponse> {
    let service = StoriesService::new(stories.get_ref().clone(), users.get_ref().clone());
    let listed = service.list_stories(query.user_id.as_deref());

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "stories": listed,
    })))
}

/// Create a story from already-uploaded media descriptors
pub async fn create_story(
    stories: web::Data<Arc<StoryStore>>,
    users: web::Data<Arc<UserStore>>,
    req: web::Json<CreateStoryRequest>,
) -> Result<HttpResponse> {
    let service = StoriesService::new(stories.get_ref().clone(), users.get_ref().clone());
    let req = req.into_inner();

    let items = req
        .items
        .into_iter()
        .map(|item| NewStoryItem {
            url: item.url,
            content_type: item.content_type,
            duration_secs: item.duration_secs,
        })
        .collect();

    let story = service.create_story(&req.user_id, items, req.category)?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "success": true,
        "message": "Story created successfully",
        "story": story,
    })))
}

/// Create a story directly from a multipart form: a `userId` field plus
/// 1-10 `files` parts. Each file is stored first, then the story is
/// assembled from the resulting URLs.
pub async fn create_story_multipart(
    stories: web::Data<Arc<StoryStore>>,
    users: web::Data<Arc<UserStore>>,
    storage: web::Data<Arc<dyn StorageBackend>>,
    mut payload: Multipart,
) -> Result<HttpResponse> {
    let mut user_id = String::new();
    let mut items: Vec<NewStoryItem> = Vec::new();

    while let Some(field) = payload.next().await {
        let mut field =
            field.map_err(|e| AppError::BadRequest(format!("Multipart error: {}", e)))?;

        let field_name = field.name().to_string();
        match field_name.as_str() {
            "userId" => {
                let mut value = Vec::new();
                while let Some(chunk) = field.next().await {
                    let data = chunk
                        .map_err(|e| AppError::BadRequest(format!("Field read error: {}", e)))?;
                    value.extend_from_slice(&data);
                }
                user_id = String::from_utf8_lossy(&value).to_string();
            }
            "files" => {
                // Refuse before writing an over-limit file to storage
                if items.len() >= MAX_ITEMS_PER_STORY {
                    return Err(AppError::ValidationError(format!(
                        "Maximum {} files allowed",
                        MAX_ITEMS_PER_STORY
                    )));
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
                    let data = chunk
                        .map_err(|e| AppError::BadRequest(format!("File read error: {}", e)))?;
                    bytes.extend_from_slice(&data);
                    if bytes.len() > MAX_UPLOAD_BYTES {
                        return Err(AppError::BadRequest("File exceeds 20MB limit".into()));
                    }
                }

                let media_type = MediaType::from_mime(&content_type);
                let url = storage.save(media_type, &filename, bytes).await?;
                items.push(NewStoryItem {
                    url,
                    content_type,
                    duration_secs: None,
                });
            }
            _ => {
                // Ignore unknown fields
            }
        }
    }

    let service = StoriesService::new(stories.get_ref().clone(), users.get_ref().clone());
    let story = service.create_story(&user_id, items, None)?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "success": true,
        "message": "Story created successfully",
        "story": story,
    })))
}
