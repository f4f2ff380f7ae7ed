//! Word-window chunking for the vector retrieval path.

use riskcast_core::error::RetrievalError;

/// Window size and overlap, both counted in whitespace-separated words.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkConfig {
    pub chunk_size: usize,
    pub overlap: usize,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            chunk_size: 500,
            overlap: 50,
        }
    }
}

impl ChunkConfig {
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self, RetrievalError> {
        if chunk_size == 0 || overlap >= chunk_size {
            return Err(RetrievalError::InvalidChunking { chunk_size, overlap });
        }
        Ok(Self { chunk_size, overlap })
    }

    fn step(&self) -> usize {
        self.chunk_size - self.overlap
    }
}

/// Split `text` into windows of `chunk_size` words, starting a new window
/// every `chunk_size - overlap` words. Windows are joined with single spaces
/// and the last one may be shorter. Text without words yields no chunks.
pub fn chunk_text(text: &str, chunk_size: usize, overlap: usize) -> Result<Vec<String>, RetrievalError> {
    let config = ChunkConfig::new(chunk_size, overlap)?;
    let words: Vec<&str> = text.split_whitespace().collect();

    Ok((0..words.len())
        .step_by(config.step())
        .map(|start| {
            let end = (start + config.chunk_size).min(words.len());
            words[start..end].join(" ")
        })
        .collect())
}
