/// Download handler - token-gated story download
use crate::config::AccessConfig;
use crate::error::Result;
use crate::services::{AccessGate, DownloadGrant};
use crate::store::{StoryStore, UserStore};
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadRequest {
    pub user_id: String,
    pub story_id: Uuid,
}

#[derive(Serialize)]
pub struct DownloadResponse {
    pub success: bool,
    #[serde(flatten)]
    pub grant: DownloadGrant,
}

/// Grant a paid download: permission check, balance check, debit, URLs
pub async fn download_story(
    stories: web::Data<Arc<StoryStore>>,
    users: web::Data<Arc<UserStore>>,
    access: web::Data<AccessConfig>,
    req: web::Json<DownloadRequest>,
) -> Result<HttpResponse> {
    let gate = AccessGate::new(
        stories.get_ref().clone(),
        users.get_ref().clone(),
        access.download_cost,
    );
    let grant = gate.download_story(&req.user_id, req.story_id)?;

    Ok(HttpResponse::Ok().json(DownloadResponse {
        success: true,
        grant,
    }))
}
