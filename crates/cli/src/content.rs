// FILE: crates/cli/src/content.rs
//! Episode, timeline and quiz data
//!
//! The bundled JSON ships inside the binary. `app.catalog_path` may point at
//! a directory whose files replace the bundled ones one by one.

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use vinylcast_core::{EpisodeCatalog, Quiz, Timeline};

const EPISODES_JSON: &str = include_str!("../data/episodes.json");
const TIMELINE_JSON: &str = include_str!("../data/timeline.json");
const QUIZ_JSON: &str = include_str!("../data/quiz.json");

pub fn episodes(dir: Option<&Path>) -> Result<Arc<EpisodeCatalog>> {
    let json = read_or_bundled(dir, "episodes.json", EPISODES_JSON)?;
    let catalog = EpisodeCatalog::from_json(&json).context("Invalid episode catalog")?;
    Ok(Arc::new(catalog))
}

pub fn timeline(dir: Option<&Path>) -> Result<Timeline> {
    let json = read_or_bundled(dir, "timeline.json", TIMELINE_JSON)?;
    Timeline::from_json(&json).context("Invalid timeline data")
}

pub fn quiz(dir: Option<&Path>) -> Result<Quiz> {
    let json = read_or_bundled(dir, "quiz.json", QUIZ_JSON)?;
    Quiz::from_json(&json).context("Invalid quiz data")
}

fn read_or_bundled(dir: Option<&Path>, file: &str, bundled: &str) -> Result<String> {
    if let Some(path) = dir.map(|dir| dir.join(file)).filter(|path| path.exists()) {
        log::debug!("Loading {} from {}", file, path.display());
        return std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()));
    }
    Ok(bundled.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_bundled_data_is_valid() {
        let catalog = episodes(None).unwrap();
        assert_eq!(catalog.len(), 5);
        assert_eq!(catalog.get(0).unwrap().id, 1);

        assert!(!timeline(None).unwrap().is_empty());
        assert_eq!(quiz(None).unwrap().len(), 8);
    }

    #[test]
    fn test_directory_overrides_single_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("episodes.json"),
            r#"[{"id":9,"title":"Thử","description":"","duration":60,
                "imageUrl":"","audioUrl":"test.mp3","releaseDate":"2024-05-01"}]"#,
        )
        .unwrap();

        let catalog = episodes(Some(dir.path())).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(0).unwrap().id, 9);

        // no quiz.json in the directory
        assert_eq!(quiz(Some(dir.path())).unwrap().len(), 8);
    }

    #[test]
    fn test_broken_override_is_reported() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("timeline.json"), "{").unwrap();
        assert!(timeline(Some(dir.path())).is_err());
    }
}
