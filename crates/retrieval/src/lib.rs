//! Retrieval for riskcast.
//!
//! Two retrieval paths share this crate:
//!
//! - **Lexical**: project milestones loaded once from JSON into a
//!   [`DocumentStore`] and ranked by token overlap with the query.
//! - **Vector**: free text (usually extracted from a PDF) split into
//!   overlapping word windows, embedded through the gateway, and searched
//!   with a flat squared-L2 index.
//!
//! Everything here is read-only after construction and can be shared across
//! concurrent requests behind an `Arc`.

pub mod chunk;
pub mod index;
pub mod lexical;
pub mod pdf;
pub mod store;
pub mod vector;

pub use chunk::{chunk_text, ChunkConfig};
pub use index::DocumentIndex;
pub use lexical::{retrieve, ScoredDoc};
pub use pdf::{extract_pdf_text, load_document_text};
pub use store::{DocumentStore, Milestone, Project};
pub use vector::{FlatL2Index, Neighbor};
