//! Historical timeline content

use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Thematic category of a timeline event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Economy,
    Social,
    Policy,
    Integration,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Economy,
        Category::Social,
        Category::Policy,
        Category::Integration,
    ];
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Economy => write!(f, "economy"),
            Category::Social => write!(f, "social"),
            Category::Policy => write!(f, "policy"),
            Category::Integration => write!(f, "integration"),
        }
    }
}

impl std::str::FromStr for Category {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "economy" => Ok(Category::Economy),
            "social" => Ok(Category::Social),
            "policy" => Ok(Category::Policy),
            "integration" => Ok(Category::Integration),
            other => Err(AppError::invalid_input(
                "category",
                format!("unknown category '{}'", other),
            )),
        }
    }
}

/// Reference attached to an event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub title: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub year: String,
    pub title: String,
    pub description: String,
    pub details: String,
    pub category: Category,
    pub image: String,
    #[serde(default)]
    pub sources: Vec<Source>,
}

/// Read-only list of events in presentation order
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    events: Vec<TimelineEvent>,
}

impl Timeline {
    pub fn new(events: Vec<TimelineEvent>) -> Self {
        Self { events }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let events = serde_json::from_str(json)
            .map_err(|e| AppError::invalid_data("timeline", e.to_string()))?;
        Ok(Self::new(events))
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TimelineEvent> {
        self.events.iter()
    }

    pub fn by_category(&self, category: Category) -> impl Iterator<Item = &TimelineEvent> {
        self.events.iter().filter(move |e| e.category == category)
    }

    pub fn find_year(&self, year: &str) -> Option<&TimelineEvent> {
        self.events.iter().find(|e| e.year == year)
    }
}
