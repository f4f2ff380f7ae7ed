//! Embedding-backed document index.
//!
//! Holds the chunks of one document paired 1:1 with their embeddings. Built
//! once per uploaded document and read-only afterwards, so one index can serve
//! concurrent questions. Embeddings come from an [`Embedder`], which in the
//! pipeline is the retrying, time-bounded model caller.

use riskcast_core::error::{ProviderError, RetrievalError};
use riskcast_core::provider::Embedder;
use tracing::{debug, info};

use crate::vector::{FlatL2Index, Neighbor};

/// Inputs per embedding request when indexing.
const EMBED_BATCH: usize = 64;

#[derive(Debug, Clone)]
pub struct DocumentIndex {
    chunks: Vec<String>,
    index: FlatL2Index,
}

fn embedding_failed(e: ProviderError) -> RetrievalError {
    RetrievalError::EmbeddingFailed(e.to_string())
}

/// Embed `inputs` and check the gateway returned one vector per input.
async fn embed_all(
    embedder: &dyn Embedder,
    model: &str,
    inputs: Vec<String>,
) -> Result<Vec<Vec<f32>>, RetrievalError> {
    let expected = inputs.len();
    let embeddings = embedder.embed_texts(model, inputs).await.map_err(embedding_failed)?;
    if embeddings.len() != expected {
        return Err(RetrievalError::EmbeddingFailed(format!(
            "expected {expected} embeddings, got {}",
            embeddings.len()
        )));
    }
    Ok(embeddings)
}

impl DocumentIndex {
    /// Embed every chunk and index the vectors. Any embedding failure fails
    /// the whole build; no partial index is returned.
    pub async fn build(
        embedder: &dyn Embedder,
        embed_model: &str,
        chunks: Vec<String>,
    ) -> Result<Self, RetrievalError> {
        if chunks.is_empty() {
            return Err(RetrievalError::EmptyIndex);
        }

        let mut vectors = Vec::with_capacity(chunks.len());
        for batch in chunks.chunks(EMBED_BATCH) {
            vectors.extend(embed_all(embedder, embed_model, batch.to_vec()).await?);
        }
        let index = FlatL2Index::from_vectors(vectors)?;

        info!(
            chunks = chunks.len(),
            dimension = index.dimension(),
            model = embed_model,
            "Built document index"
        );
        Ok(Self { chunks, index })
    }

    /// Nearest chunks to `query` with their distances, ascending.
    pub async fn search(
        &self,
        embedder: &dyn Embedder,
        embed_model: &str,
        query: &str,
        k: usize,
    ) -> Result<Vec<(String, Neighbor)>, RetrievalError> {
        let mut vectors = embed_all(embedder, embed_model, vec![query.to_string()]).await?;
        let query_vector = vectors.pop().ok_or(RetrievalError::EmptyIndex)?;
        let hits = self.index.search(&query_vector, k)?;
        debug!(k, hits = hits.len(), "Vector search");
        Ok(hits
            .into_iter()
            .map(|hit| (self.chunks[hit.index].clone(), hit))
            .collect())
    }

    /// The `k` chunks closest to `query`, ascending by distance.
    pub async fn retrieve(
        &self,
        embedder: &dyn Embedder,
        embed_model: &str,
        query: &str,
        k: usize,
    ) -> Result<Vec<String>, RetrievalError> {
        Ok(self
            .search(embedder, embed_model, query, k)
            .await?
            .into_iter()
            .map(|(chunk, _)| chunk)
            .collect())
    }

    pub fn chunks(&self) -> &[String] {
        &self.chunks
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Embeds text as [word count, length of first word]; counts calls.
    struct ShapeEmbedder {
        calls: Mutex<usize>,
        fail: bool,
    }

    impl ShapeEmbedder {
        fn new() -> Self {
            Self {
                calls: Mutex::new(0),
                fail: false,
            }
        }
    }

    #[async_trait]
    impl Embedder for ShapeEmbedder {
        async fn embed_texts(&self, _model: &str, inputs: Vec<String>) -> Result<Vec<Vec<f32>>, ProviderError> {
            *self.calls.lock().unwrap() += 1;
            if self.fail {
                return Err(ProviderError::Network("connection refused".into()));
            }
            Ok(inputs
                .iter()
                .map(|t| {
                    let words = t.split_whitespace().count() as f32;
                    let first = t.split_whitespace().next().map_or(0, str::len) as f32;
                    vec![words, first]
                })
                .collect())
        }
    }

    /// Returns one vector fewer than asked for.
    struct ShortEmbedder;

    #[async_trait]
    impl Embedder for ShortEmbedder {
        async fn embed_texts(&self, _model: &str, inputs: Vec<String>) -> Result<Vec<Vec<f32>>, ProviderError> {
            Ok(vec![vec![1.0]; inputs.len().saturating_sub(1)])
        }
    }

    fn chunks() -> Vec<String> {
        vec!["aa bb".into(), "a b c d".into(), "aaaa".into()]
    }

    #[tokio::test]
    async fn query_equal_to_chunk_returns_it_first() {
        let embedder = ShapeEmbedder::new();
        let index = DocumentIndex::build(&embedder, "embed", chunks()).await.unwrap();
        let hits = index.search(&embedder, "embed", "a b c d", 2).await.unwrap();
        assert_eq!(hits[0].0, "a b c d");
        assert_eq!(hits[0].1.distance, 0.0);
        assert_eq!(hits.len(), 2);
    }

    #[tokio::test]
    async fn retrieve_returns_at_most_k() {
        let embedder = ShapeEmbedder::new();
        let index = DocumentIndex::build(&embedder, "embed", chunks()).await.unwrap();
        let found = index.retrieve(&embedder, "embed", "zzzz", 5).await.unwrap();
        assert_eq!(found.len(), 3);
        assert_eq!(found[0], "aaaa");
    }

    #[tokio::test]
    async fn build_batches_embedding_calls() {
        let embedder = ShapeEmbedder::new();
        let many: Vec<String> = (0..EMBED_BATCH + 1).map(|i| format!("chunk {i}")).collect();
        let index = DocumentIndex::build(&embedder, "embed", many).await.unwrap();
        assert_eq!(index.len(), EMBED_BATCH + 1);
        assert_eq!(*embedder.calls.lock().unwrap(), 2);
    }

    #[tokio::test]
    async fn embedding_failure_fails_build() {
        let embedder = ShapeEmbedder {
            calls: Mutex::new(0),
            fail: true,
        };
        let err = DocumentIndex::build(&embedder, "embed", chunks()).await.unwrap_err();
        assert!(matches!(err, RetrievalError::EmbeddingFailed(_)));
    }

    #[tokio::test]
    async fn no_chunks_is_empty_index() {
        let embedder = ShapeEmbedder::new();
        let err = DocumentIndex::build(&embedder, "embed", vec![]).await.unwrap_err();
        assert!(matches!(err, RetrievalError::EmptyIndex));
    }

    #[tokio::test]
    async fn missing_vectors_fail_build() {
        let err = DocumentIndex::build(&ShortEmbedder, "embed", chunks()).await.unwrap_err();
        assert!(matches!(err, RetrievalError::EmbeddingFailed(m) if m.contains("expected 3")));
    }
}
