//! Story Cleaner Background Job
//!
//! Stories carry a 24-hour TTL. Reads already filter expired records, so
//! this job exists purely to reclaim memory: every sweep interval it
//! removes stories whose `expires_at` has passed.

use crate::metrics::story_cleaner as metrics;
use crate::store::StoryStore;
use chrono::Utc;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::sleep;

/// Sweep interval for expired-story cleanup
const SWEEP_INTERVAL: Duration = Duration::from_secs(60 * 60); // 1 hour

pub async fn start_story_cleaner(stories: Arc<StoryStore>) {
    tracing::info!(
        "Starting story cleaner background job (sweep_interval={}m)",
        SWEEP_INTERVAL.as_secs() / 60
    );

    loop {
        sleep(SWEEP_INTERVAL).await;

        let sweep_start = Instant::now();
        let removed = stories.remove_expired(Utc::now());

        metrics::record_cleanup_run("success");
        if removed > 0 {
            metrics::record_stories_removed(removed);
        }
        tracing::info!(
            removed,
            remaining = stories.len(),
            duration_ms = sweep_start.elapsed().as_millis(),
            "Story cleanup sweep completed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        assert_eq!(SWEEP_INTERVAL, Duration::from_secs(3600));
    }
}
