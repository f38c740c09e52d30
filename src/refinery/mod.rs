// * The Refinery: PDF bytes in, summarizer-ready text windows out.

pub mod chunker;
pub mod pdf_text;

// * Re-exports for convenient access
pub use chunker::{chunk_text, reassemble, ChunkerConfig, SlidingWindowChunker, TextChunk};
pub use pdf_text::{looks_like_pdf, ExtractionError, PageTextSource, PdfTextExtractor};
