// * Summarizer: map each chunk through the model, then reduce the partial summaries.

pub mod llm;
pub mod prompt;

pub use llm::{CompletionModel, OpenAiClient, SummarizerError};
pub use prompt::{SummaryModel, SECTION_HEADINGS, SYSTEM_PROMPT};

use crate::ops::telemetry::record_llm_call;
use crate::refinery::chunker::SlidingWindowChunker;
use std::sync::Arc;
use tracing::info;

pub struct Summarizer {
    llm: Arc<dyn CompletionModel>,
    chunker: SlidingWindowChunker,
}

/// Final summary plus how it was produced
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryReport {
    pub summary: String,
    pub chunk_count: usize,
}

impl Summarizer {
    pub fn new(llm: Arc<dyn CompletionModel>) -> Self {
        Self::with_chunker(llm, SlidingWindowChunker::new())
    }

    pub fn with_chunker(llm: Arc<dyn CompletionModel>, chunker: SlidingWindowChunker) -> Self {
        Self { llm, chunker }
    }

    /// One call per chunk, then one aggregation call over the joined outputs.
    ///
    /// The aggregation pass runs even for a single chunk.
    pub async fn summarize(&self, model: SummaryModel, text: &str) -> Result<SummaryReport, SummarizerError> {
        let chunks = self.chunker.chunk_simple(text);
        info!(model = %model, chunks = chunks.len(), "summarizing");

        let mut partials = Vec::with_capacity(chunks.len());
        for chunk in &chunks {
            record_llm_call("chunk");
            partials.push(self.llm.complete(model.as_str(), SYSTEM_PROMPT, chunk).await?);
        }

        let combined = partials.join("\n");
        record_llm_call("aggregate");
        let summary = self.llm.complete(model.as_str(), SYSTEM_PROMPT, &combined).await?;

        Ok(SummaryReport {
            summary,
            chunk_count: chunks.len(),
        })
    }
}
