//! Prometheus metrics for the story cleaner background job

use once_cell::sync::Lazy;
use prometheus::{
    register_int_counter, register_int_counter_vec, IntCounter, IntCounterVec,
};

/// Total number of cleanup sweeps run
static CLEANUP_RUNS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "story_cleaner_runs_total",
        "Total number of expired-story cleanup sweeps",
        &["status"]
    )
    .expect("failed to register story_cleaner_runs_total")
});

/// Total expired stories removed
static STORIES_REMOVED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "story_cleaner_removed_total",
        "Total expired stories removed by the cleaner"
    )
    .expect("failed to register story_cleaner_removed_total")
});

/// Record a cleanup sweep completion
pub fn record_cleanup_run(status: &str) {
    CLEANUP_RUNS_TOTAL.with_label_values(&[status]).inc();
}

/// Record removed stories
pub fn record_stories_removed(count: u64) {
    STORIES_REMOVED_TOTAL.inc_by(count);
}
