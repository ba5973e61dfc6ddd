//! Graphmint Extractor
//!
//! Turns unstructured document text into a deduplicated property graph
//! via repeated LLM extraction calls.
//!
//! # Overview
//!
//! Documents are split into overlapping chunks, each chunk is sent to
//! an extraction backend as a structured prompt, the raw output is
//! parsed into chunk-local nodes and edges, and a reconciler merges
//! everything into one canonical graph: exactly one node per entity
//! name (case-folded), exactly one edge per (start, type, end), plus
//! the accumulated label/relationship-type vocabulary.
//!
//! # Architecture
//!
//! ```text
//! Text → TextSplitter → [Chunk]* → PromptBuilder → ExtractionClient
//!      → raw text → parser → (nodes, edges) per chunk
//!      → Reconciler → GraphSnapshot → GraphSink
//! ```
//!
//! Extraction calls fan out concurrently; reconciliation applies their
//! results sequentially in chunk order, so runs are reproducible and a
//! failed chunk never corrupts what the surviving chunks built.
//!
//! # Example Usage
//!
//! ```
//! use graphmint_extractor::{Extractor, ExtractorConfig};
//! use graphmint_llm::MockClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = MockClient::new(
//!     r#"{"Nodes": [["0", "Person", {"name": "Ada"}]], "Edges": []}"#,
//! );
//! let mut extractor = Extractor::new(client, ExtractorConfig::default())?;
//!
//! let report = extractor.ingest("Ada Lovelace wrote the first program.").await?;
//! assert_eq!(report.chunks_total, 1);
//!
//! let snapshot = extractor.snapshot();
//! assert_eq!(snapshot.nodes.len(), 1);
//! assert_eq!(snapshot.vocabulary.labels, vec!["Person"]);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod chunking;
mod config;
mod error;
mod extractor;
mod parser;
mod prompt;
mod reconciler;
mod report;


pub use chunking::TextSplitter;
pub use config::{ExtractorConfig, SchemaHints};
pub use error::ExtractorError;
pub use extractor::Extractor;
pub use parser::{parse_extraction, ParsedExtraction};
pub use prompt::PromptBuilder;
pub use reconciler::{ChunkReconciliation, Reconciler};
pub use report::IngestReport;
