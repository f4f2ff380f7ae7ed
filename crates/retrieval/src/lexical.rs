//! Keyword-overlap retrieval over project milestones.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::store::DocumentStore;

/// A milestone display string with its overlap score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredDoc {
    pub text: String,
    pub score: usize,
}

/// Lower-cased, whitespace-split token set. Duplicates collapse.
fn tokens(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Rank the milestones of `project_id` by token overlap with `query`.
///
/// Sorted by score descending, ties by ascending display text, truncated to
/// `top_k`. An unknown project yields an empty result.
pub fn retrieve(store: &DocumentStore, project_id: &str, query: &str, top_k: usize) -> Vec<ScoredDoc> {
    let Some(project) = store.get(project_id) else {
        return Vec::new();
    };

    let query_tokens = tokens(query);
    let mut scored: Vec<ScoredDoc> = project
        .milestones
        .iter()
        .map(|m| {
            let text = m.display();
            let score = tokens(&text).intersection(&query_tokens).count();
            ScoredDoc { text, score }
        })
        .collect();

    scored.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.text.cmp(&b.text)));
    scored.truncate(top_k);
    scored
}

impl DocumentStore {
    /// See [`retrieve`].
    pub fn retrieve(&self, project_id: &str, query: &str, top_k: usize) -> Vec<ScoredDoc> {
        retrieve(self, project_id, query, top_k)
    }
}
