//! `riskcast doc`: chunk, embed and question a text or PDF document.

use std::io::Write;
use std::path::Path;

use riskcast_agent::DocumentSession;
use riskcast_retrieval::{load_document_text, ChunkConfig};
use tracing::info;

use crate::app::{print_json, App, CliResult};

pub async fn run(
    config_path: Option<&Path>,
    path: &Path,
    questions: Vec<String>,
    model: Option<String>,
    k: Option<usize>,
    stream: bool,
) -> CliResult {
    let app = App::load(config_path)?;
    let model = app.model(model);
    let k = k.unwrap_or(app.config.retrieval.document_top_k);
    let retrieval = &app.config.retrieval;

    let text = load_document_text(path)?;
    let chunking = ChunkConfig::new(retrieval.chunk_size, retrieval.chunk_overlap)?;
    let session = DocumentSession::build(
        app.caller.clone(),
        &app.config.models.embedding_model,
        &text,
        chunking,
        app.sink.clone(),
    )
    .await?;
    info!(path = %path.display(), chunks = session.chunk_count(), "Indexed document");

    for question in &questions {
        if stream {
            stream_answer(&session, &model, question, k).await?;
        } else {
            print_json(&session.ask(&model, question, k).await?)?;
        }
    }

    Ok(())
}

async fn stream_answer(session: &DocumentSession, model: &str, question: &str, k: usize) -> CliResult {
    let mut rx = session.ask_stream(model, question, k).await?;
    let mut stdout = std::io::stdout();

    println!("Q: {question}");
    while let Some(chunk) = rx.recv().await {
        let chunk = chunk?;
        if let Some(delta) = chunk.content {
            write!(stdout, "{delta}")?;
            stdout.flush()?;
        }
        if chunk.done {
            break;
        }
    }
    println!("\n");
    Ok(())
}
