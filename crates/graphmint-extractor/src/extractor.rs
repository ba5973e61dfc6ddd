//! Pipeline orchestration
//!
//! Fan-out/fan-in: extraction calls for independent chunks run
//! concurrently (they have no data dependency), then results are
//! applied to the reconciler one at a time in ascending chunk order so
//! first-occurrence policies stay reproducible.

use crate::config::{ExtractorConfig, SchemaHints};
use crate::chunking::TextSplitter;
use crate::error::ExtractorError;
use crate::parser::parse_extraction;
use crate::prompt::PromptBuilder;
use crate::reconciler::Reconciler;
use crate::report::IngestReport;
use graphmint_domain::traits::{ExtractionClient, GraphSink};
use graphmint_domain::{GraphSnapshot, RunId, Vocabulary};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Drives text through chunking, extraction, parsing, and reconciliation
///
/// Generic over the extraction backend; the same pipeline runs against
/// a mock in tests and a real model in production. One extractor
/// accumulates a single canonical graph across any number of `ingest`
/// calls, so several documents can feed one graph; dropping it discards
/// partially reconciled state wholesale.
pub struct Extractor<C>
where
    C: ExtractionClient,
{
    client: Arc<C>,
    config: ExtractorConfig,
    reconciler: Reconciler,
    run_id: RunId,
}

impl<C> Extractor<C>
where
    C: ExtractionClient + Send + Sync + 'static,
    C::Error: std::fmt::Display,
{
    /// Create a new extractor
    ///
    /// Fails with `InvalidConfiguration` when the configuration is
    /// unusable; nothing else about construction can fail.
    pub fn new(client: C, config: ExtractorConfig) -> Result<Self, ExtractorError> {
        config.validate()?;
        let reconciler = Reconciler::new();
        Ok(Self {
            client: Arc::new(client),
            config,
            reconciler,
            run_id: RunId::new(),
        })
    }

    /// The id tagging this run in logs and reports
    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    /// The configuration this extractor was built with
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Labels and relationship types observed so far
    pub fn vocabulary(&self) -> &Vocabulary {
        self.reconciler.vocabulary()
    }

    /// Ingest one document into the canonical graph
    ///
    /// Per-chunk failures (extraction errors, timeouts, unparseable
    /// output) are logged, counted in the report, and skipped; the
    /// chunks that survive still produce a valid partial graph.
    pub async fn ingest(&mut self, text: &str) -> Result<IngestReport, ExtractorError> {
        let start_time = Instant::now();
        let mut report = IngestReport::new(self.run_id);

        let splitter = TextSplitter::from_config(&self.config)?;
        let chunks = splitter.split(text);
        report.chunks_total = chunks.len();

        info!(
            run_id = %self.run_id,
            chunks = chunks.len(),
            text_len = text.len(),
            "starting ingestion"
        );

        if chunks.is_empty() {
            report.processing_time_ms = start_time.elapsed().as_millis() as u64;
            return Ok(report);
        }

        // Hints for this document: configured schema plus whatever the
        // vocabulary picked up from earlier documents.
        let hints = self.effective_schema_hints();
        debug!(
            labels = hints.labels.len(),
            rel_types = hints.rel_types.len(),
            "schema hints for this document"
        );

        let mut join_set = JoinSet::new();
        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent_extractions));
        let call_timeout = self.config.extraction_timeout();

        for chunk in &chunks {
            let prompt = PromptBuilder::new(self.config.instruction.as_str(), chunk.text.as_str())
                .with_schema_hints(hints.labels.clone(), hints.rel_types.clone())
                .with_examples(self.config.examples.as_str())
                .build();
            let client = Arc::clone(&self.client);
            let semaphore = Arc::clone(&semaphore);
            let index = chunk.index;

            join_set.spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .expect("extraction semaphore closed");

                // The client trait is synchronous; run it off the
                // async worker threads.
                let call = tokio::task::spawn_blocking(move || {
                    client
                        .extract(&prompt)
                        .map_err(|e| ExtractorError::Extraction(e.to_string()))
                });

                let result = match timeout(call_timeout, call).await {
                    Err(_) => Err(ExtractorError::Timeout),
                    Ok(Err(join_error)) => Err(ExtractorError::Extraction(format!(
                        "extraction task failed: {}",
                        join_error
                    ))),
                    Ok(Ok(inner)) => inner,
                };

                (index, result)
            });
        }

        let mut results: Vec<(usize, Result<String, ExtractorError>)> =
            Vec::with_capacity(chunks.len());
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok(pair) => results.push(pair),
                Err(join_error) => {
                    warn!(run_id = %self.run_id, error = %join_error, "extraction task aborted");
                    report.chunks_failed += 1;
                }
            }
        }

        // Reconcile in ascending chunk order, one chunk at a time; the
        // reconciler owns shared state and is not safe for concurrent
        // mutation.
        results.sort_by_key(|(index, _)| *index);

        for (index, result) in results {
            let raw = match result {
                Ok(raw) => raw,
                Err(e) => {
                    warn!(
                        run_id = %self.run_id,
                        chunk = index,
                        error = %e,
                        "chunk extraction failed; continuing without it"
                    );
                    report.chunks_failed += 1;
                    continue;
                }
            };

            let parsed = match parse_extraction(&raw) {
                Ok(parsed) => parsed,
                Err(e) => {
                    warn!(
                        run_id = %self.run_id,
                        chunk = index,
                        error = %e,
                        "chunk output unusable; continuing without it"
                    );
                    report.chunks_failed += 1;
                    continue;
                }
            };

            debug!(
                chunk = index,
                nodes = parsed.nodes.len(),
                edges = parsed.edges.len(),
                "reconciling chunk"
            );
            report.nodes_skipped += parsed.nodes_skipped;
            report.edges_skipped += parsed.edges_skipped;

            let outcome = self
                .reconciler
                .reconcile_chunk(index, &parsed.nodes, &parsed.edges);
            report.nodes_created += outcome.nodes_created;
            report.nodes_merged += outcome.nodes_merged;
            report.edges_created += outcome.edges_created;
            report.edges_merged += outcome.edges_merged;
            report.unresolved_edges += outcome.unresolved_edges;
            report.label_conflicts += outcome.label_conflicts;
        }

        report.processing_time_ms = start_time.elapsed().as_millis() as u64;

        info!(
            run_id = %self.run_id,
            nodes = self.reconciler.node_count(),
            edges = self.reconciler.edge_count(),
            chunks_failed = report.chunks_failed,
            "ingestion complete"
        );

        Ok(report)
    }

    /// Copy out the current canonical graph
    pub fn snapshot(&self) -> GraphSnapshot {
        self.reconciler.snapshot()
    }

    /// Consume the extractor, yielding the canonical graph
    pub fn into_snapshot(self) -> GraphSnapshot {
        self.reconciler.into_snapshot()
    }

    /// Hand the current graph to a sink, read-only
    pub fn publish_to<S: GraphSink>(&self, sink: &mut S) -> Result<(), S::Error> {
        sink.publish(&self.snapshot())
    }

    /// Configured schema hints merged with the accumulated vocabulary
    fn effective_schema_hints(&self) -> SchemaHints {
        let mut merged =
            Vocabulary::seeded(&self.config.schema.labels, &self.config.schema.rel_types);
        for label in &self.reconciler.vocabulary().labels {
            merged.observe_label(label);
        }
        for rel_type in &self.reconciler.vocabulary().rel_types {
            merged.observe_rel_type(rel_type);
        }
        SchemaHints {
            labels: merged.labels,
            rel_types: merged.rel_types,
        }
    }
}
