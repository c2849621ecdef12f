//! Podcast episodes and the read-only catalog they are played from

use crate::error::{AppError, Result};
use crate::types::{Duration, Validator};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One podcast episode ("record" on the turntable)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Episode {
    pub id: u32,
    pub title: String,
    pub description: String,
    /// Nominal length in whole seconds
    pub duration: u32,
    pub image_url: String,
    pub audio_url: String,
    pub release_date: NaiveDate,
}

impl Episode {
    /// Nominal length as a duration
    pub fn nominal_duration(&self) -> Duration {
        Duration::from_seconds(u64::from(self.duration))
    }
}

impl Validator for Episode {
    fn validate(&self) -> std::result::Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.title.trim().is_empty() {
            errors.push(format!("Episode {} has an empty title", self.id));
        }

        if self.audio_url.trim().is_empty() {
            errors.push(format!("Episode {} has no audio source", self.id));
        }

        if self.duration == 0 {
            errors.push(format!("Episode {} has zero duration", self.id));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Ordered, immutable list of episodes
///
/// Episodes are ordered by release date; indices handed out by the catalog
/// are always valid offsets.
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeCatalog {
    episodes: Vec<Episode>,
}

impl EpisodeCatalog {
    /// Builds a catalog, validating every episode
    pub fn new(mut episodes: Vec<Episode>) -> Result<Self> {
        if episodes.is_empty() {
            return Err(AppError::invalid_data("episode catalog", "no episodes"));
        }

        let mut seen = HashSet::new();
        for episode in &episodes {
            if !seen.insert(episode.id) {
                return Err(AppError::invalid_data(
                    "episode catalog",
                    format!("duplicate episode id {}", episode.id),
                ));
            }
            episode
                .validate()
                .map_err(|errors| AppError::invalid_data("episode catalog", errors.join("; ")))?;
        }

        // stable: episodes released the same day keep their listed order
        episodes.sort_by_key(|e| e.release_date);

        Ok(Self { episodes })
    }

    /// Parses the `[{id, title, description, duration, imageUrl, audioUrl, releaseDate}]` schema
    pub fn from_json(json: &str) -> Result<Self> {
        let episodes: Vec<Episode> = serde_json::from_str(json)
            .map_err(|e| AppError::invalid_data("episode catalog", e.to_string()))?;
        Self::new(episodes)
    }

    pub fn len(&self) -> usize {
        self.episodes.len()
    }

    /// Always false; an empty catalog cannot be constructed
    pub fn is_empty(&self) -> bool {
        self.episodes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Episode> {
        self.episodes.get(index)
    }

    pub fn first_index(&self) -> usize {
        0
    }

    pub fn last_index(&self) -> usize {
        self.episodes.len() - 1
    }

    pub fn contains_index(&self, index: usize) -> bool {
        index < self.episodes.len()
    }

    pub fn has_next(&self, index: usize) -> bool {
        index < self.last_index()
    }

    pub fn position_of(&self, id: u32) -> Option<usize> {
        self.episodes.iter().position(|e| e.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Episode> {
        self.episodes.iter()
    }
}
