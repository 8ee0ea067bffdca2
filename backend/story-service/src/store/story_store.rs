use crate::models::Story;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use uuid::Uuid;

/// Story records keyed by id
#[derive(Default)]
pub struct StoryStore {
    stories: DashMap<Uuid, Story>,
}

impl StoryStore {
    pub fn new() -> Self {
        Self {
            stories: DashMap::new(),
        }
    }

    pub fn insert(&self, story: Story) {
        self.stories.insert(story.id, story);
    }

    /// Fetch a story regardless of expiry
    pub fn get(&self, story_id: Uuid) -> Option<Story> {
        self.stories.get(&story_id).map(|entry| entry.value().clone())
    }

    /// Fetch a story, treating expired records as absent
    pub fn get_active(&self, story_id: Uuid, now: DateTime<Utc>) -> Option<Story> {
        self.stories
            .get(&story_id)
            .filter(|entry| !entry.value().is_expired(now))
            .map(|entry| entry.value().clone())
    }

    /// All unexpired stories, unordered
    pub fn list_active(&self, now: DateTime<Utc>) -> Vec<Story> {
        self.stories
            .iter()
            .filter(|entry| !entry.value().is_expired(now))
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// Physically remove expired stories. Returns the number removed.
    pub fn remove_expired(&self, now: DateTime<Utc>) -> u64 {
        let before = self.stories.len();
        self.stories.retain(|_, story| !story.is_expired(now));
        (before - self.stories.len()) as u64
    }

    pub fn len(&self) -> usize {
        self.stories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stories.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MediaType, StoryItem};
    use chrono::Duration;

    fn story(expires_in: Duration) -> Story {
        let now = Utc::now();
        Story {
            id: Uuid::new_v4(),
            user_id: "1234567890".to_string(),
            items: vec![StoryItem {
                id: Uuid::new_v4(),
                url: "/images/story-1.jpg".to_string(),
                media_type: MediaType::Image,
                duration_secs: None,
            }],
            category: "general".to_string(),
            downloadable: true,
            is_adult: false,
            created_at: now,
            expires_at: now + expires_in,
        }
    }

    #[test]
    fn expired_stories_are_invisible_to_active_reads() {
        let store = StoryStore::new();
        let live = story(Duration::hours(1));
        let dead = story(Duration::seconds(-1));
        let dead_id = dead.id;
        store.insert(live.clone());
        store.insert(dead);

        let now = Utc::now();
        assert!(store.get_active(live.id, now).is_some());
        assert!(store.get_active(dead_id, now).is_none());
        assert_eq!(store.list_active(now).len(), 1);
        // Still physically present until a sweep runs
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn remove_expired_reclaims_only_dead_records() {
        let store = StoryStore::new();
        store.insert(story(Duration::hours(1)));
        store.insert(story(Duration::seconds(-1)));
        store.insert(story(Duration::seconds(-30)));

        let removed = store.remove_expired(Utc::now());
        assert_eq!(removed, 2);
        assert_eq!(store.len(), 1);
    }
}
