/// Business logic layer for story-service
///
/// This module provides high-level operations:
/// - Stories service: Story creation, listing, lookup
/// - Sequencer: Story playback state machine
/// - Access gate: Token-gated paid downloads
/// - Storage: Uploaded media persistence
/// - DigiLocker: OAuth2 identity verification
pub mod access;
pub mod digilocker;
pub mod sequencer;
pub mod storage;
pub mod stories;

// Re-export commonly used services
pub use access::{AccessGate, DownloadGrant, DownloadItem};
pub use digilocker::{DigiLockerError, DigiLockerIdentity, DigiLockerProvider};
pub use sequencer::{Advance, StorySequencer, StoryTimeline, ViewingState, TICK_INTERVAL};
pub use storage::{LocalDiskStorage, StorageBackend};
pub use stories::{NewStoryItem, StoriesService, MAX_ITEMS_PER_STORY, STORY_TTL_HOURS};
