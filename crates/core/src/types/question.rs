//! Community Q&A entries

use crate::error::{AppError, Result};
use crate::types::Timestamp;
use serde::{Deserialize, Serialize};

/// Longest accepted display name, in characters
pub const MAX_NAME_CHARS: usize = 50;

/// Longest accepted question body, in characters
pub const MAX_QUESTION_CHARS: usize = 500;

/// A question as stored and read back from the community store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunityQuestion {
    /// Key assigned by the store
    pub id: String,
    pub name: String,
    pub question: String,
    pub timestamp: Timestamp,
}

impl CommunityQuestion {
    /// Upper-cased first letter of the author's name, for avatars
    pub fn initial(&self) -> char {
        self.name
            .chars()
            .next()
            .and_then(|c| c.to_uppercase().next())
            .unwrap_or('?')
    }
}

/// A validated submission that has not been written yet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewQuestion {
    name: String,
    question: String,
}

impl NewQuestion {
    /// Validates with the default 50/500 character limits
    pub fn new(name: &str, question: &str) -> Result<Self> {
        Self::with_limits(name, question, MAX_NAME_CHARS, MAX_QUESTION_CHARS)
    }

    /// Trims both fields and checks them against the given limits
    pub fn with_limits(
        name: &str,
        question: &str,
        max_name_chars: usize,
        max_question_chars: usize,
    ) -> Result<Self> {
        let name = name.trim();
        let question = question.trim();

        if name.is_empty() {
            return Err(AppError::invalid_input("name", "must not be empty"));
        }
        if question.is_empty() {
            return Err(AppError::invalid_input("question", "must not be empty"));
        }
        if name.chars().count() > max_name_chars {
            return Err(AppError::invalid_input(
                "name",
                format!("must be at most {} characters", max_name_chars),
            ));
        }
        if question.chars().count() > max_question_chars {
            return Err(AppError::invalid_input(
                "question",
                format!("must be at most {} characters", max_question_chars),
            ));
        }

        Ok(Self {
            name: name.to_string(),
            question: question.to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    /// Attaches the store key and submission time
    pub fn into_stored(self, id: String, timestamp: Timestamp) -> CommunityQuestion {
        CommunityQuestion {
            id,
            name: self.name,
            question: self.question,
            timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_submission_is_trimmed() {
        let q = NewQuestion::new("  An ", " Khi nào Việt Nam gia nhập WTO? ").unwrap();
        assert_eq!(q.name(), "An");
        assert_eq!(q.question(), "Khi nào Việt Nam gia nhập WTO?");
    }

    #[test]
    fn test_empty_fields_rejected() {
        assert!(NewQuestion::new("", "question").is_err());
        assert!(NewQuestion::new("   ", "question").is_err());
        assert!(NewQuestion::new("An", "").is_err());
        assert!(NewQuestion::new("An", "\n\t").is_err());
    }

    #[test]
    fn test_limits_count_characters_not_bytes() {
        // 50 multi-byte characters is still within the limit
        let name: String = std::iter::repeat('ệ').take(50).collect();
        assert!(NewQuestion::new(&name, "q").is_ok());

        let long_name: String = std::iter::repeat('a').take(51).collect();
        assert!(NewQuestion::new(&long_name, "q").is_err());

        let long_question: String = std::iter::repeat('ư').take(501).collect();
        assert!(NewQuestion::new("An", &long_question).is_err());
    }

    #[test]
    fn test_into_stored_and_initial() {
        let q = NewQuestion::new("an", "q")
            .unwrap()
            .into_stored("-Nabc".to_string(), Timestamp::from_millis(5));
        assert_eq!(q.id, "-Nabc");
        assert_eq!(q.initial(), 'A');
        assert_eq!(q.timestamp.as_millis(), 5);
    }
}
