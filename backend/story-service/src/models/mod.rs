/// Data models for story-service
///
/// This module defines structures for:
/// - Story: Ephemeral, time-boxed media post with 1-10 ordered items
/// - StoryItem: A single image or video inside a story
/// - User: Viewer/author record carrying the token balance
use crate::error::AppError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Display time for image items (seconds)
pub const IMAGE_DISPLAY_SECS: u32 = 5;

/// Duration assigned to video items when the uploader provides none (seconds)
pub const DEFAULT_VIDEO_DURATION_SECS: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Image => "image",
            MediaType::Video => "video",
        }
    }

    /// Tag media by MIME prefix: `video/*` is video, everything else image
    pub fn from_mime(content_type: &str) -> Self {
        if content_type.starts_with("video/") {
            MediaType::Video
        } else {
            MediaType::Image
        }
    }
}

impl TryFrom<&str> for MediaType {
    type Error = AppError;
    fn try_from(s: &str) -> std::result::Result<Self, Self::Error> {
        match s {
            "image" => Ok(MediaType::Image),
            "video" => Ok(MediaType::Video),
            _ => Err(AppError::BadRequest("invalid media type".into())),
        }
    }
}

/// A single media item inside a story
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryItem {
    pub id: Uuid,
    pub url: String,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    /// Playback duration in seconds; videos only, images use the fixed display time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_secs: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Story {
    pub id: Uuid,
    pub user_id: String,
    pub items: Vec<StoryItem>,
    pub category: String,
    pub downloadable: bool,
    pub is_adult: bool,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Story {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Listing entry: a story enriched with its author's display data
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryWithAuthor {
    #[serde(flatten)]
    pub story: Story,
    pub username: String,
    pub user_image: String,
}

/// User record; ids are phone numbers in the demo data set
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    pub token_balance: i64,
    pub digilocker_verified: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_type_from_mime_prefix() {
        assert_eq!(MediaType::from_mime("video/mp4"), MediaType::Video);
        assert_eq!(MediaType::from_mime("video/webm"), MediaType::Video);
        assert_eq!(MediaType::from_mime("image/png"), MediaType::Image);
        // Unknown MIME falls back to image, matching the upload tagging rule
        assert_eq!(MediaType::from_mime("application/pdf"), MediaType::Image);
    }

    #[test]
    fn media_type_round_trip() {
        assert_eq!(MediaType::try_from("video").unwrap(), MediaType::Video);
        assert_eq!(MediaType::try_from("image").unwrap(), MediaType::Image);
        assert!(MediaType::try_from("audio").is_err());
    }
}
