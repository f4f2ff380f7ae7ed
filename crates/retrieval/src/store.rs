//! The project document store.
//!
//! Loaded once from `{"projects": [{"id", "name", "milestones": [...]}]}` and
//! never mutated afterwards. Projects are keyed by id; when the file repeats
//! an id the later entry wins.

use std::collections::HashMap;
use std::path::Path;

use riskcast_core::error::RetrievalError;
use serde::{Deserialize, Serialize};
use tracing::info;

/// A dated milestone entry within a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    pub date: String,
    pub title: String,
    pub notes: String,
}

impl Milestone {
    /// The display form used for both scoring and output.
    pub fn display(&self) -> String {
        format!("{}: {} - {}", self.date, self.title, self.notes)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub milestones: Vec<Milestone>,
}

#[derive(Deserialize)]
struct ProjectsFile {
    #[serde(default)]
    projects: Vec<Project>,
}

/// Read-only collection of projects keyed by id.
#[derive(Debug, Clone, Default)]
pub struct DocumentStore {
    projects: HashMap<String, Project>,
}

impl DocumentStore {
    pub fn from_projects(projects: impl IntoIterator<Item = Project>) -> Self {
        Self {
            projects: projects.into_iter().map(|p| (p.id.clone(), p)).collect(),
        }
    }

    /// Parse the projects JSON document.
    pub fn from_json(json: &str) -> Result<Self, RetrievalError> {
        let file: ProjectsFile =
            serde_json::from_str(json).map_err(|e| RetrievalError::Parse(e.to_string()))?;
        Ok(Self::from_projects(file.projects))
    }

    /// Load the projects JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self, RetrievalError> {
        let content = std::fs::read_to_string(path).map_err(|e| RetrievalError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let store = Self::from_json(&content)?;
        info!(path = %path.display(), projects = store.len(), "Loaded project store");
        Ok(store)
    }

    pub fn get(&self, id: &str) -> Option<&Project> {
        self.projects.get(id)
    }

    /// Projects sorted by id.
    pub fn projects(&self) -> Vec<&Project> {
        let mut all: Vec<&Project> = self.projects.values().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        all
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "projects": [
            {"id": "p1", "name": "Bridge", "milestones": [
                {"date": "2024-01", "title": "Start", "notes": "kickoff"}
            ]},
            {"id": "p2", "name": "Tunnel", "milestones": []}
        ]
    }"#;

    #[test]
    fn parses_projects_by_id() {
        let store = DocumentStore::from_json(SAMPLE).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.get("p1").unwrap().name, "Bridge");
        assert!(store.get("p3").is_none());
    }

    #[test]
    fn milestone_display_format() {
        let store = DocumentStore::from_json(SAMPLE).unwrap();
        let m = &store.get("p1").unwrap().milestones[0];
        assert_eq!(m.display(), "2024-01: Start - kickoff");
    }

    #[test]
    fn missing_projects_key_is_empty_store() {
        let store = DocumentStore::from_json("{}").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn malformed_json_is_parse_error() {
        assert!(matches!(
            DocumentStore::from_json("{\"projects\": [1]}"),
            Err(RetrievalError::Parse(_))
        ));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("projects.json");
        std::fs::write(&path, SAMPLE).unwrap();
        let store = DocumentStore::load(&path).unwrap();
        let ids: Vec<&str> = store.projects().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p2"]);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = DocumentStore::load(Path::new("/nonexistent/projects.json")).unwrap_err();
        assert!(matches!(err, RetrievalError::Io { .. }));
    }
}
