use crate::error::{AppError, Result};
use crate::metrics;
use crate::models::{
    MediaType, Story, StoryItem, StoryWithAuthor, DEFAULT_VIDEO_DURATION_SECS,
};
use crate::store::{StoryStore, UserStore};
use chrono::{Duration, Utc};
use std::sync::Arc;
use uuid::Uuid;

/// Story lifetime; `expires_at` is always exactly this far past `created_at`
pub const STORY_TTL_HOURS: i64 = 24;

/// Upload bounds per story
pub const MAX_ITEMS_PER_STORY: usize = 10;

/// Placeholder avatar served for every author in the demo data set
const PLACEHOLDER_USER_IMAGE: &str = "/placeholder-user.jpg";

/// Uploaded-media descriptor accepted by story creation
#[derive(Debug, Clone)]
pub struct NewStoryItem {
    pub url: String,
    pub content_type: String,
    pub duration_secs: Option<u32>,
}

pub struct StoriesService {
    stories: Arc<StoryStore>,
    users: Arc<UserStore>,
}

impl StoriesService {
    pub fn new(stories: Arc<StoryStore>, users: Arc<UserStore>) -> Self {
        Self { stories, users }
    }

    /// Create a story from 1-10 uploaded media descriptors.
    ///
    /// Items are tagged image/video by MIME prefix; videos get a default
    /// duration when none is supplied, images none at all.
    pub fn create_story(
        &self,
        user_id: &str,
        items: Vec<NewStoryItem>,
        category: Option<String>,
    ) -> Result<Story> {
        if user_id.trim().is_empty() {
            return Err(AppError::ValidationError("User ID is required".into()));
        }
        if items.is_empty() {
            return Err(AppError::ValidationError(
                "At least one file is required".into(),
            ));
        }
        if items.len() > MAX_ITEMS_PER_STORY {
            return Err(AppError::ValidationError(format!(
                "Maximum {} files allowed",
                MAX_ITEMS_PER_STORY
            )));
        }

        let story_items: Vec<StoryItem> = items
            .into_iter()
            .map(|item| {
                let media_type = MediaType::from_mime(&item.content_type);
                let duration_secs = match media_type {
                    MediaType::Video => Some(
                        item.duration_secs
                            .filter(|d| *d > 0)
                            .unwrap_or(DEFAULT_VIDEO_DURATION_SECS),
                    ),
                    MediaType::Image => None,
                };
                StoryItem {
                    id: Uuid::new_v4(),
                    url: item.url,
                    media_type,
                    duration_secs,
                }
            })
            .collect();

        let created_at = Utc::now();
        let story = Story {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            items: story_items,
            category: category.unwrap_or_else(|| "general".to_string()),
            downloadable: true,
            is_adult: false,
            created_at,
            expires_at: created_at + Duration::hours(STORY_TTL_HOURS),
        };

        self.stories.insert(story.clone());
        metrics::stories::record_story_created();
        tracing::info!(story_id = %story.id, user_id = %story.user_id, items = story.items.len(), "Story created");

        Ok(story)
    }

    /// Active stories, newest first, enriched with author display data.
    /// `user_filter` narrows the listing to one author.
    pub fn list_stories(&self, user_filter: Option<&str>) -> Vec<StoryWithAuthor> {
        let now = Utc::now();
        let mut stories = self.stories.list_active(now);

        if let Some(user_id) = user_filter {
            stories.retain(|story| story.user_id == user_id);
        }
        stories.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        stories
            .into_iter()
            .map(|story| {
                let username = self
                    .users
                    .username_of(&story.user_id)
                    .unwrap_or_else(|| "User".to_string());
                StoryWithAuthor {
                    story,
                    username,
                    user_image: PLACEHOLDER_USER_IMAGE.to_string(),
                }
            })
            .collect()
    }

    /// Fetch a single active story
    pub fn get_story(&self, story_id: Uuid) -> Option<Story> {
        self.stories.get_active(story_id, Utc::now())
    }
}
