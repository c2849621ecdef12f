// crates/network/src/qna.rs
//! Community Q&A board on top of a [`CommunityStore`]

use crate::store::CommunityStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use vinylcast_core::{
    CommunityQuestion, NewQuestion, Result, Timestamp, MAX_NAME_CHARS, MAX_QUESTION_CHARS,
};

pub const DEFAULT_FEED_LIMIT: usize = 50;
/// Shortest polling period `watch` will use
pub const MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QnaLimits {
    pub max_name_chars: usize,
    pub max_question_chars: usize,
    /// Questions kept in the feed
    pub feed_limit: usize,
}

impl Default for QnaLimits {
    fn default() -> Self {
        Self {
            max_name_chars: MAX_NAME_CHARS,
            max_question_chars: MAX_QUESTION_CHARS,
            feed_limit: DEFAULT_FEED_LIMIT,
        }
    }
}

/// Submission form and live feed
///
/// Invalid submissions are rejected before the store is contacted. The
/// store never sees updates or deletes.
pub struct QnaBoard {
    store: Arc<dyn CommunityStore>,
    limits: QnaLimits,
    feed: Vec<CommunityQuestion>,
}

impl QnaBoard {
    pub fn new(store: Arc<dyn CommunityStore>) -> Self {
        Self::with_limits(store, QnaLimits::default())
    }

    pub fn with_limits(store: Arc<dyn CommunityStore>, limits: QnaLimits) -> Self {
        Self {
            store,
            limits,
            feed: Vec::new(),
        }
    }

    pub fn limits(&self) -> QnaLimits {
        self.limits
    }

    /// Current feed, newest first
    pub fn feed(&self) -> &[CommunityQuestion] {
        &self.feed
    }

    /// Validates, stamps and stores a question
    pub async fn submit(&mut self, name: &str, question: &str) -> Result<CommunityQuestion> {
        let submission = NewQuestion::with_limits(
            name,
            question,
            self.limits.max_name_chars,
            self.limits.max_question_chars,
        )?;

        let stored = self.store.append(submission, Timestamp::now()).await?;

        self.feed.retain(|q| q.id != stored.id);
        self.feed.insert(0, stored.clone());
        self.feed.truncate(self.limits.feed_limit);
        Ok(stored)
    }

    /// Replaces the feed with the store's latest questions
    pub async fn refresh(&mut self) -> Result<&[CommunityQuestion]> {
        self.feed = self.store.recent(self.limits.feed_limit).await?;
        Ok(&self.feed)
    }

    /// Polls the store every `interval` and publishes each read
    ///
    /// Failed reads are logged and the last good feed stays published. The
    /// task ends once every receiver is dropped. Periods shorter than
    /// [`MIN_REFRESH_INTERVAL`] are raised to it.
    pub fn watch(
        &self,
        interval: Duration,
    ) -> (watch::Receiver<Vec<CommunityQuestion>>, JoinHandle<()>) {
        let (tx, rx) = watch::channel(self.feed.clone());
        let store = Arc::clone(&self.store);
        let limit = self.limits.feed_limit;

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval.max(MIN_REFRESH_INTERVAL));
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {}
                    _ = tx.closed() => break,
                }

                match store.recent(limit).await {
                    Ok(feed) => {
                        if tx.send(feed).is_err() {
                            break;
                        }
                    }
                    Err(e) => log::warn!("Could not refresh questions: {}", e),
                }
            }
            log::debug!("Question feed watcher stopped");
        });

        (rx, task)
    }
}
