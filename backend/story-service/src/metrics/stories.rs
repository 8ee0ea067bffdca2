//! Prometheus metrics for the story lifecycle
//!
//! Tracks creations, paid download outcomes, and token debits.

use once_cell::sync::Lazy;
use prometheus::{
    register_int_counter, register_int_counter_vec, IntCounter, IntCounterVec,
};

/// Total stories created
static STORIES_CREATED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("story_created_total", "Total number of stories created")
        .expect("failed to register story_created_total")
});

/// Paid download attempts by outcome
static DOWNLOADS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "story_downloads_total",
        "Paid story download attempts (granted/forbidden/insufficient_tokens/not_found)",
        &["result"]
    )
    .expect("failed to register story_downloads_total")
});

/// Tokens debited by granted downloads
static TOKENS_DEBITED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "story_tokens_debited_total",
        "Total tokens debited by granted downloads"
    )
    .expect("failed to register story_tokens_debited_total")
});

/// Record a story creation
pub fn record_story_created() {
    STORIES_CREATED_TOTAL.inc();
}

/// Record a paid download attempt outcome
pub fn record_download(result: &str) {
    DOWNLOADS_TOTAL.with_label_values(&[result]).inc();
}

/// Record tokens debited by a granted download
pub fn record_tokens_debited(amount: u64) {
    TOKENS_DEBITED_TOTAL.inc_by(amount);
}
