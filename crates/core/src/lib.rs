//! Core domain model shared by every VinylCast crate

pub mod error;
pub mod types;

pub use error::{AppError, ErrorSeverity, RecoveryAction, Result};
pub use types::{
    format_clock, AnswerOutcome, Category, CommunityQuestion, Duration, Episode, EpisodeCatalog,
    NewQuestion, Quiz, QuizQuestion, QuizSession, ScoreTier, Source, Timeline, TimelineEvent,
    Timestamp, Validator, MAX_NAME_CHARS, MAX_QUESTION_CHARS,
};
