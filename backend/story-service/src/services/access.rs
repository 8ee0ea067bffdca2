//! Token-gated download flow
//!
//! A paid download resolves the story, verifies the `downloadable`
//! permission, then performs an atomic balance check-and-debit before
//! handing back the media URLs. There are no idempotency or retry
//! semantics: a double-submit double-charges.

use crate::error::{AppError, Result};
use crate::metrics;
use crate::models::MediaType;
use crate::store::{StoryStore, TokenDebit, UserStore};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

/// One downloadable media item of a granted story
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadItem {
    pub id: Uuid,
    pub url: String,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    pub filename: String,
}

/// A granted download with the viewer's post-debit balance
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadGrant {
    pub downloads: Vec<DownloadItem>,
    pub remaining_balance: i64,
}

pub struct AccessGate {
    stories: Arc<StoryStore>,
    users: Arc<UserStore>,
    download_cost: i64,
}

impl AccessGate {
    pub fn new(stories: Arc<StoryStore>, users: Arc<UserStore>, download_cost: i64) -> Self {
        Self {
            stories,
            users,
            download_cost,
        }
    }

    pub fn download_cost(&self) -> i64 {
        self.download_cost
    }

    /// Grant a paid download of every item in the story, debiting the
    /// viewer's balance on success.
    pub fn download_story(&self, user_id: &str, story_id: Uuid) -> Result<DownloadGrant> {
        let story = self
            .stories
            .get_active(story_id, Utc::now())
            .ok_or_else(|| {
                metrics::stories::record_download("not_found");
                AppError::NotFound("Story not found".into())
            })?;

        if !story.downloadable {
            metrics::stories::record_download("forbidden");
            return Err(AppError::Forbidden("Story is not downloadable".into()));
        }

        let downloads: Vec<DownloadItem> = story
            .items
            .iter()
            .map(|item| DownloadItem {
                id: item.id,
                url: item.url.clone(),
                media_type: item.media_type,
                filename: derive_filename(&item.url)
                    .unwrap_or_else(|| format!("story-{}", item.id)),
            })
            .collect();

        let remaining_balance = match self.users.debit_tokens(user_id, self.download_cost) {
            TokenDebit::Debited(remaining) => remaining,
            TokenDebit::Insufficient(balance) => {
                metrics::stories::record_download("insufficient_tokens");
                tracing::debug!(user_id, %story_id, balance, cost = self.download_cost, "Download refused: insufficient tokens");
                return Err(AppError::Forbidden("Insufficient token balance".into()));
            }
            TokenDebit::UnknownUser => {
                metrics::stories::record_download("forbidden");
                return Err(AppError::Forbidden("Unknown viewer".into()));
            }
        };

        metrics::stories::record_download("granted");
        metrics::stories::record_tokens_debited(self.download_cost as u64);
        tracing::info!(user_id, %story_id, remaining_balance, "Paid download granted");

        Ok(DownloadGrant {
            downloads,
            remaining_balance,
        })
    }
}

/// Last path segment of the media URL, if it has one
fn derive_filename(url: &str) -> Option<String> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let segment = path.rsplit('/').next()?;
    if segment.is_empty() {
        None
    } else {
        Some(segment.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Story, StoryItem, User};
    use chrono::Duration;

    const COST: i64 = 350;

    fn seed(balance: i64, downloadable: bool) -> (AccessGate, Uuid) {
        let stories = Arc::new(StoryStore::new());
        let users = Arc::new(UserStore::new());
        users.upsert(User {
            id: "1234567890".to_string(),
            username: "Demo User".to_string(),
            token_balance: balance,
            digilocker_verified: true,
        });

        let now = Utc::now();
        let story = Story {
            id: Uuid::new_v4(),
            user_id: "9876543210".to_string(),
            items: vec![
                StoryItem {
                    id: Uuid::new_v4(),
                    url: "/images/story-17-4.jpg".to_string(),
                    media_type: MediaType::Image,
                    duration_secs: None,
                },
                StoryItem {
                    id: Uuid::new_v4(),
                    url: "/videos/story-17-5.mp4".to_string(),
                    media_type: MediaType::Video,
                    duration_secs: Some(10),
                },
            ],
            category: "general".to_string(),
            downloadable,
            is_adult: false,
            created_at: now,
            expires_at: now + Duration::hours(24),
        };
        let story_id = story.id;
        stories.insert(story);

        (AccessGate::new(stories, users, COST), story_id)
    }

    #[test]
    fn grant_debits_exactly_the_cost() {
        let (gate, story_id) = seed(1_000, true);
        let grant = gate.download_story("1234567890", story_id).unwrap();
        assert_eq!(grant.remaining_balance, 650);
        assert_eq!(grant.downloads.len(), 2);
        assert_eq!(grant.downloads[0].filename, "story-17-4.jpg");
        assert_eq!(grant.downloads[1].filename, "story-17-5.mp4");
    }

    #[test]
    fn insufficient_balance_is_forbidden_and_charges_nothing() {
        let (gate, story_id) = seed(349, true);
        let err = gate.download_story("1234567890", story_id).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        // Balance untouched; topping up to the cost makes it succeed
        let (gate, story_id) = seed(COST, true);
        let grant = gate.download_story("1234567890", story_id).unwrap();
        assert_eq!(grant.remaining_balance, 0);
    }

    #[test]
    fn double_submit_double_charges() {
        let (gate, story_id) = seed(700, true);
        assert_eq!(
            gate.download_story("1234567890", story_id)
                .unwrap()
                .remaining_balance,
            350
        );
        assert_eq!(
            gate.download_story("1234567890", story_id)
                .unwrap()
                .remaining_balance,
            0
        );
        assert!(gate.download_story("1234567890", story_id).is_err());
    }

    #[test]
    fn non_downloadable_story_is_forbidden() {
        let (gate, story_id) = seed(1_000, false);
        let err = gate.download_story("1234567890", story_id).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[test]
    fn missing_story_is_not_found() {
        let (gate, _) = seed(1_000, true);
        let err = gate
            .download_story("1234567890", Uuid::new_v4())
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn unknown_viewer_is_forbidden() {
        let (gate, story_id) = seed(1_000, true);
        let err = gate.download_story("0000000000", story_id).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[test]
    fn filename_derivation_handles_awkward_urls() {
        assert_eq!(derive_filename("/images/a.jpg").as_deref(), Some("a.jpg"));
        assert_eq!(
            derive_filename("https://cdn.example.com/videos/b.mp4?sig=x").as_deref(),
            Some("b.mp4")
        );
        assert_eq!(derive_filename("/images/"), None);
    }
}
