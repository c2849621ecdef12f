//! Domain types for VinylCast
//!
//! - `episode`: podcast episodes and the ordered catalog
//! - `timeline`: historical timeline events
//! - `quiz`: quiz content and scoring sessions
//! - `question`: community Q&A entries
//! - `common`: timestamps, durations and validation

mod common;
mod episode;
mod question;
mod quiz;
mod timeline;

pub use common::{format_clock, Duration, Timestamp, Validator};
pub use episode::{Episode, EpisodeCatalog};
pub use question::{CommunityQuestion, NewQuestion, MAX_NAME_CHARS, MAX_QUESTION_CHARS};
pub use quiz::{AnswerOutcome, Quiz, QuizQuestion, QuizSession, ScoreTier};
pub use timeline::{Category, Source, Timeline, TimelineEvent};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_ordering() {
        let t1 = Timestamp::now();
        std::thread::sleep(std::time::Duration::from_millis(10));
        let t2 = Timestamp::now();
        assert!(t2 > t1);
    }

    #[test]
    fn test_duration_formatting() {
        let d = Duration::from_seconds(1805);
        assert_eq!(d.to_string(), "30:05");
    }
}
