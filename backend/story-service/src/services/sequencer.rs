//! Story playback sequencer
//!
//! Drives sequential playback across a viewer's story tray: each story's
//! items play in order, then playback rolls over to the next story, and
//! the viewer closes after the last item of the last story. The caller
//! owns the clock and feeds elapsed time in via [`StorySequencer::tick`];
//! the expected cadence is one tick per [`TICK_INTERVAL`].

use crate::models::{MediaType, Story, DEFAULT_VIDEO_DURATION_SECS, IMAGE_DISPLAY_SECS};
use std::time::Duration;
use uuid::Uuid;

/// Progress recomputation cadence
pub const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Playback durations for one story's items
#[derive(Debug, Clone)]
pub struct StoryTimeline {
    pub story_id: Uuid,
    pub item_durations: Vec<Duration>,
}

impl StoryTimeline {
    pub fn from_story(story: &Story) -> Self {
        let item_durations = story
            .items
            .iter()
            .map(|item| match item.media_type {
                MediaType::Video => Duration::from_secs(
                    item.duration_secs.unwrap_or(DEFAULT_VIDEO_DURATION_SECS) as u64,
                ),
                MediaType::Image => Duration::from_secs(IMAGE_DISPLAY_SECS as u64),
            })
            .collect();

        Self {
            story_id: story.id,
            item_durations,
        }
    }
}

/// Transient playback cursor; never persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewingState {
    pub story_index: usize,
    pub item_index: usize,
}

/// What a tick or navigation call did to the cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Still on the same item
    Displaying,
    /// Moved to the next item within the same story
    NextItem,
    /// Crossed a story boundary
    NextStory,
    /// Reached the end of the last story; the viewer is closed
    Closed,
}

#[derive(Debug)]
pub struct StorySequencer {
    timelines: Vec<StoryTimeline>,
    cursor: ViewingState,
    elapsed: Duration,
    paused: bool,
    closed: bool,
}

impl StorySequencer {
    /// Build a sequencer over the given stories, starting at `initial_story`.
    ///
    /// Returns `None` when there is nothing to play: no stories, an
    /// out-of-range start index, or a start story with no items.
    pub fn new(timelines: Vec<StoryTimeline>, initial_story: usize) -> Option<Self> {
        let start = timelines.get(initial_story)?;
        if start.item_durations.is_empty() {
            return None;
        }

        Some(Self {
            timelines,
            cursor: ViewingState {
                story_index: initial_story,
                item_index: 0,
            },
            elapsed: Duration::ZERO,
            paused: false,
            closed: false,
        })
    }

    pub fn for_stories(stories: &[Story], initial_story: usize) -> Option<Self> {
        Self::new(
            stories.iter().map(StoryTimeline::from_story).collect(),
            initial_story,
        )
    }

    pub fn position(&self) -> ViewingState {
        self.cursor
    }

    pub fn current_story_id(&self) -> Option<Uuid> {
        self.timelines
            .get(self.cursor.story_index)
            .map(|t| t.story_id)
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Fraction of the current item's duration already displayed, in 0.0..=1.0
    pub fn progress(&self) -> f32 {
        let duration = self.current_duration();
        if duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f32() / duration.as_secs_f32()).min(1.0)
    }

    /// Advance the clock. Crossing the current item's duration moves the
    /// cursor; progress restarts from zero on every move.
    pub fn tick(&mut self, dt: Duration) -> Advance {
        if self.closed {
            return Advance::Closed;
        }
        if self.paused {
            return Advance::Displaying;
        }

        self.elapsed += dt;
        if self.elapsed < self.current_duration() {
            return Advance::Displaying;
        }

        self.advance()
    }

    /// Manual forward navigation; resets progress
    pub fn next(&mut self) -> Advance {
        if self.closed {
            return Advance::Closed;
        }
        self.advance()
    }

    /// Manual backward navigation; resets progress. A no-op at the first
    /// item of the first story.
    pub fn previous(&mut self) -> Advance {
        if self.closed {
            return Advance::Closed;
        }
        self.elapsed = Duration::ZERO;

        if self.cursor.item_index > 0 {
            self.cursor.item_index -= 1;
            return Advance::NextItem;
        }
        if self.cursor.story_index > 0 {
            self.cursor.story_index -= 1;
            self.cursor.item_index = self
                .timelines[self.cursor.story_index]
                .item_durations
                .len()
                .saturating_sub(1);
            return Advance::NextStory;
        }

        Advance::Displaying
    }

    fn advance(&mut self) -> Advance {
        self.elapsed = Duration::ZERO;

        let items_in_story = self.timelines[self.cursor.story_index]
            .item_durations
            .len();
        if self.cursor.item_index + 1 < items_in_story {
            self.cursor.item_index += 1;
            return Advance::NextItem;
        }

        // Last item of the current story: roll over, skipping empty stories
        let mut next_story = self.cursor.story_index + 1;
        while next_story < self.timelines.len()
            && self.timelines[next_story].item_durations.is_empty()
        {
            next_story += 1;
        }

        if next_story >= self.timelines.len() {
            self.closed = true;
            return Advance::Closed;
        }

        self.cursor = ViewingState {
            story_index: next_story,
            item_index: 0,
        };
        Advance::NextStory
    }

    fn current_duration(&self) -> Duration {
        self.timelines
            .get(self.cursor.story_index)
            .and_then(|t| t.item_durations.get(self.cursor.item_index))
            .copied()
            .unwrap_or(Duration::ZERO)
    }
}
