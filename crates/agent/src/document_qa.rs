//! Question answering over one uploaded document.
//!
//! A session chunks and embeds the document once; every question after that
//! embeds only the question, pulls the nearest chunks and answers from them
//! alone.

use std::sync::Arc;

use riskcast_core::error::Result;
use riskcast_core::log::{LogEvent, LogSink};
use riskcast_core::message::Message;
use riskcast_core::provider::StreamReceiver;
use riskcast_providers::ModelCaller;
use riskcast_retrieval::{chunk_text, ChunkConfig, DocumentIndex};
use serde::Serialize;
use tracing::info;

use crate::prompts;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentAnswer {
    pub answer: String,
    /// Chunks the answer was grounded on, nearest first
    pub chunks: Vec<String>,
    pub latency_ms: u64,
}

pub struct DocumentSession {
    index: DocumentIndex,
    caller: Arc<ModelCaller>,
    embed_model: String,
    sink: Arc<dyn LogSink>,
}

impl DocumentSession {
    /// Chunk and index `text`. Embedding calls get the caller's retries and
    /// timeout; fails without a session if the text has no words or an
    /// embedding call still fails after them.
    pub async fn build(
        caller: Arc<ModelCaller>,
        embed_model: &str,
        text: &str,
        chunking: ChunkConfig,
        sink: Arc<dyn LogSink>,
    ) -> Result<Self> {
        let chunks = chunk_text(text, chunking.chunk_size, chunking.overlap)?;
        let index = DocumentIndex::build(&*caller, embed_model, chunks).await?;
        info!(chunks = index.len(), model = embed_model, "Document session ready");
        Ok(Self {
            index,
            caller,
            embed_model: embed_model.to_string(),
            sink,
        })
    }

    pub fn chunk_count(&self) -> usize {
        self.index.len()
    }

    /// The `k` nearest chunks and the context-only prompt built from them.
    async fn prepare(&self, question: &str, k: usize) -> Result<(Vec<String>, Vec<Message>)> {
        let chunks = self
            .index
            .retrieve(&*self.caller, &self.embed_model, question, k)
            .await?;
        let messages = vec![
            Message::system(prompts::document_system(&chunks.join("\n\n"))),
            Message::user(question),
        ];
        Ok((chunks, messages))
    }

    pub async fn ask(&self, model: &str, question: &str, k: usize) -> Result<DocumentAnswer> {
        let (chunks, messages) = self.prepare(question, k).await?;
        let result = self.caller.call(model, messages).await;

        self.sink.record(
            &LogEvent::new("/doc", "document_qa", question)
                .model(model)
                .response_len(result.content.len())
                .latency_ms(result.latency_ms)
                .error(result.error.clone()),
        );

        let latency_ms = result.latency_ms;
        Ok(DocumentAnswer {
            answer: result.into_result()?,
            chunks,
            latency_ms,
        })
    }

    /// Same prompt as [`ask`](Self::ask), answered as a stream of text deltas.
    pub async fn ask_stream(&self, model: &str, question: &str, k: usize) -> Result<StreamReceiver> {
        let (_, messages) = self.prepare(question, k).await?;
        Ok(self.caller.stream(model, messages).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{caller, MockGateway};
    use riskcast_core::error::{Error, RetrievalError};
    use riskcast_providers::RetryPolicy;
    use riskcast_telemetry::MemoryLogSink;

    const DOC: &str = "aaaa aaaa aaaa zzzz zzzz zzzz mmmm mmmm mmmm";

    async fn session(gateway: Arc<MockGateway>) -> DocumentSession {
        DocumentSession::build(
            caller(gateway),
            "embed",
            DOC,
            ChunkConfig::new(3, 0).unwrap(),
            Arc::new(MemoryLogSink::new()),
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn answers_from_nearest_chunk() {
        let gateway = Arc::new(MockGateway::new().script("m", vec![Ok("it says zzzz".into())]));
        let session = session(gateway.clone()).await;
        assert_eq!(session.chunk_count(), 3);

        let answer = session.ask("m", "zzzz", 1).await.unwrap();
        assert_eq!(answer.chunks, vec!["zzzz zzzz zzzz"]);
        assert_eq!(answer.answer, "it says zzzz");

        let request = &gateway.requests()[0];
        assert!(request.messages[0].content.contains("Context:\nzzzz zzzz zzzz\n\nIf the answer"));
        assert_eq!(request.messages[1].content, "zzzz");
    }

    #[tokio::test]
    async fn chunks_joined_with_blank_lines() {
        let gateway = Arc::new(MockGateway::new());
        let answer = session(gateway.clone()).await.ask("m", "aaaa mmmm", 2).await.unwrap();
        assert_eq!(answer.chunks.len(), 2);
        let system = &gateway.requests()[0].messages[0].content;
        assert!(system.contains(&answer.chunks.join("\n\n")));
    }

    #[tokio::test]
    async fn streamed_answer_arrives_in_pieces() {
        let gateway = Arc::new(MockGateway::new().script("m", vec![Ok("three word answer".into())]));
        let mut rx = session(gateway).await.ask_stream("m", "aaaa", 1).await.unwrap();

        let mut text = String::new();
        let mut pieces = 0;
        while let Some(chunk) = rx.recv().await {
            let chunk = chunk.unwrap();
            if let Some(delta) = chunk.content {
                text.push_str(&delta);
                pieces += 1;
            }
            if chunk.done {
                break;
            }
        }
        assert_eq!(text, "three word answer");
        assert_eq!(pieces, 3);
    }

    #[tokio::test]
    async fn empty_document_has_no_session() {
        let gateway = Arc::new(MockGateway::new());
        let result = DocumentSession::build(
            caller(gateway),
            "embed",
            "   ",
            ChunkConfig::default(),
            Arc::new(MemoryLogSink::new()),
        )
        .await;
        assert!(matches!(result, Err(Error::Retrieval(RetrievalError::EmptyIndex))));
    }

    #[tokio::test(start_paused = true)]
    async fn transient_embedding_failure_is_retried() {
        let gateway = Arc::new(MockGateway::new().fail_embeddings(1));
        let caller = Arc::new(ModelCaller::new(gateway.clone()).with_policy(RetryPolicy::default()));

        let session = DocumentSession::build(
            caller,
            "embed",
            DOC,
            ChunkConfig::new(3, 0).unwrap(),
            Arc::new(MemoryLogSink::new()),
        )
        .await
        .unwrap();

        assert_eq!(session.chunk_count(), 3);
        assert_eq!(gateway.embed_calls(), 2);
    }

    #[tokio::test]
    async fn persistent_embedding_failure_fails_build() {
        let gateway = Arc::new(MockGateway::new().fail_embeddings(1));
        let result = DocumentSession::build(
            caller(gateway),
            "embed",
            DOC,
            ChunkConfig::new(3, 0).unwrap(),
            Arc::new(MemoryLogSink::new()),
        )
        .await;
        assert!(matches!(result, Err(Error::Retrieval(RetrievalError::EmbeddingFailed(_)))));
    }
}
