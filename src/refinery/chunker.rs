// * Sliding Window Chunker
// * Character-window chunking for the token-limited summarizer.
// * Windows count Unicode scalar values, so Hangul text is never split mid-character.

use crate::config::constants::{CHUNK_CHAR_OVERLAP, CHUNK_CHAR_WINDOW};
use serde::{Deserialize, Serialize};

/// Represents a text chunk with metadata
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TextChunk {
    pub content: String,
    pub char_count: usize,
    /// Start offset in characters
    pub start_index: usize,
    /// End offset in characters (exclusive)
    pub end_index: usize,
    pub chunk_index: usize,
}

impl TextChunk {
    /// The part of this chunk not already covered by a chunk ending at `previous_end`
    pub fn fresh_suffix(&self, previous_end: usize) -> &str {
        let skip = previous_end.saturating_sub(self.start_index);
        match self.content.char_indices().nth(skip) {
            Some((byte, _)) => &self.content[byte..],
            None => "",
        }
    }
}

/// Configuration for the sliding window chunker
#[derive(Debug, Clone)]
pub struct ChunkerConfig {
    /// Maximum characters per chunk (default: CHUNK_CHAR_WINDOW = 6000)
    pub window_size: usize,
    /// Characters shared by consecutive chunks (default: CHUNK_CHAR_OVERLAP = 400)
    pub overlap: usize,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            window_size: CHUNK_CHAR_WINDOW,
            overlap: CHUNK_CHAR_OVERLAP,
        }
    }
}

impl ChunkerConfig {
    /// Creates a new config with explicit window and overlap
    pub fn new(window_size: usize, overlap: usize) -> Self {
        Self {
            window_size: window_size.max(1),
            overlap,
        }
    }
}

/// Sliding window text chunker
pub struct SlidingWindowChunker {
    config: ChunkerConfig,
}

impl SlidingWindowChunker {
    /// Creates a new chunker with default configuration
    /// Default: window=6000 chars, overlap=400 chars
    pub fn new() -> Self {
        Self {
            config: ChunkerConfig::default(),
        }
    }

    /// Creates a new chunker with custom configuration
    pub fn with_config(config: ChunkerConfig) -> Self {
        Self { config }
    }

    /// Splits text into overlapping windows.
    ///
    /// Each window after the first starts `overlap` characters before the previous
    /// window's end, but never at or before the previous start. The last window ends
    /// exactly at the end of the text. Empty text yields no chunks.
    pub fn chunk(&self, text: &str) -> Vec<TextChunk> {
        // * Byte offset of every character boundary, including the end
        let boundaries: Vec<usize> = text
            .char_indices()
            .map(|(byte, _)| byte)
            .chain(std::iter::once(text.len()))
            .collect();
        let total_chars = boundaries.len() - 1;
        let window = self.config.window_size.max(1);

        let mut chunks = Vec::new();
        let mut start = 0;

        while start < total_chars {
            let end = (start + window).min(total_chars);
            chunks.push(TextChunk {
                content: text[boundaries[start]..boundaries[end]].to_string(),
                char_count: end - start,
                start_index: start,
                end_index: end,
                chunk_index: chunks.len(),
            });

            if end >= total_chars {
                break;
            }

            // * Step back by the overlap, but always make progress
            let next = end.saturating_sub(self.config.overlap);
            start = next.max(start + 1);
        }

        chunks
    }

    /// Chunks text and returns only the content strings (simplified API)
    pub fn chunk_simple(&self, text: &str) -> Vec<String> {
        self.chunk(text).into_iter().map(|c| c.content).collect()
    }

    /// Returns the current configuration
    pub fn config(&self) -> &ChunkerConfig {
        &self.config
    }
}

impl Default for SlidingWindowChunker {
    fn default() -> Self {
        Self::new()
    }
}

/// Utility function for quick chunking with default settings
pub fn chunk_text(text: &str) -> Vec<String> {
    SlidingWindowChunker::new().chunk_simple(text)
}

/// Concatenates each chunk's fresh suffix, undoing the overlap
pub fn reassemble(chunks: &[TextChunk]) -> String {
    let mut out = String::new();
    let mut previous_end = 0;
    for chunk in chunks {
        out.push_str(chunk.fresh_suffix(previous_end));
        previous_end = chunk.end_index;
    }
    out
}
