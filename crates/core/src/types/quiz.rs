//! Multiple-choice quiz content and scoring

use crate::error::{AppError, Result};
use crate::types::Validator;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub id: u32,
    pub question: String,
    pub options: Vec<String>,
    /// Index into `options`
    pub correct_answer: usize,
    pub explanation: String,
}

impl Validator for QuizQuestion {
    fn validate(&self) -> std::result::Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.options.len() < 2 {
            errors.push(format!("Question {} needs at least two options", self.id));
        }

        if self.correct_answer >= self.options.len() {
            errors.push(format!(
                "Question {} marks option {} correct but has {} options",
                self.id,
                self.correct_answer,
                self.options.len()
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Validated, non-empty question set
#[derive(Debug, Clone, PartialEq)]
pub struct Quiz {
    questions: Vec<QuizQuestion>,
}

impl Quiz {
    pub fn new(questions: Vec<QuizQuestion>) -> Result<Self> {
        if questions.is_empty() {
            return Err(AppError::invalid_data("quiz", "no questions"));
        }
        for q in &questions {
            q.validate()
                .map_err(|errors| AppError::invalid_data("quiz", errors.join("; ")))?;
        }
        Ok(Self { questions })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let questions = serde_json::from_str(json)
            .map_err(|e| AppError::invalid_data("quiz", e.to_string()))?;
        Self::new(questions)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&QuizQuestion> {
        self.questions.get(index)
    }
}

/// Result of answering the current question
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub correct: bool,
    pub correct_answer: usize,
    pub explanation: String,
}

/// Final grade bands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreTier {
    Excellent,
    Good,
    Fair,
    KeepTrying,
}

impl ScoreTier {
    /// Bands at 90%, 70% and 50%
    pub fn for_score(score: usize, total: usize) -> Self {
        let percentage = if total == 0 {
            0.0
        } else {
            score as f64 / total as f64 * 100.0
        };

        if percentage >= 90.0 {
            ScoreTier::Excellent
        } else if percentage >= 70.0 {
            ScoreTier::Good
        } else if percentage >= 50.0 {
            ScoreTier::Fair
        } else {
            ScoreTier::KeepTrying
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ScoreTier::Excellent => "Excellent!",
            ScoreTier::Good => "Well done!",
            ScoreTier::Fair => "Not bad!",
            ScoreTier::KeepTrying => "Keep trying!",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ScoreTier::Excellent => "You know this period of Vietnam's development in depth.",
            ScoreTier::Good => "You have a solid grasp of Vietnam's economic history.",
            ScoreTier::Fair => "You have the basics covered.",
            ScoreTier::KeepTrying => "Revisit the timeline and try again.",
        }
    }
}

/// One run through a quiz
///
/// Only the first answer given to a question counts; later answers to the
/// same question are ignored.
#[derive(Debug, Clone)]
pub struct QuizSession {
    quiz: Quiz,
    current: usize,
    selected: Option<usize>,
    answered: Vec<bool>,
    score: usize,
    finished: bool,
}

impl QuizSession {
    pub fn new(quiz: Quiz) -> Self {
        let answered = vec![false; quiz.len()];
        Self {
            quiz,
            current: 0,
            selected: None,
            answered,
            score: 0,
            finished: false,
        }
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_question(&self) -> Option<&QuizQuestion> {
        if self.finished {
            None
        } else {
            self.quiz.get(self.current)
        }
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn total(&self) -> usize {
        self.quiz.len()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn is_answered(&self) -> bool {
        self.answered.get(self.current).copied().unwrap_or(false)
    }

    /// Answers the current question
    ///
    /// Returns `None` when the question was already answered, the quiz is
    /// finished, or `option` is out of range.
    pub fn answer(&mut self, option: usize) -> Option<AnswerOutcome> {
        if self.finished || self.is_answered() {
            return None;
        }

        let question = self.quiz.get(self.current)?;
        if option >= question.options.len() {
            return None;
        }

        let correct = option == question.correct_answer;
        let outcome = AnswerOutcome {
            correct,
            correct_answer: question.correct_answer,
            explanation: question.explanation.clone(),
        };

        self.selected = Some(option);
        self.answered[self.current] = true;
        if correct {
            self.score += 1;
        }

        Some(outcome)
    }

    /// Moves to the next question, or finishes after the last one
    pub fn advance(&mut self) {
        if self.finished {
            return;
        }
        if self.current + 1 < self.quiz.len() {
            self.current += 1;
            self.selected = None;
        } else {
            self.finished = true;
        }
    }

    pub fn restart(&mut self) {
        self.current = 0;
        self.selected = None;
        self.answered = vec![false; self.quiz.len()];
        self.score = 0;
        self.finished = false;
    }

    pub fn score_tier(&self) -> ScoreTier {
        ScoreTier::for_score(self.score, self.quiz.len())
    }
}
