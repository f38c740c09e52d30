//! Research-report digests from the ALIO public-institution disclosure portal.
//!
//! Probes the portal's listing endpoints for report entries, resolves a PDF
//! attachment for a chosen entry, extracts its text and summarizes it with a
//! hosted LLM.

pub mod config;
pub mod engine;
pub mod network;
pub mod ops;
pub mod pipeline;
pub mod refinery;
pub mod session;
pub mod summarizer;

pub use pipeline::{AppError, DigestOutcome, Pipeline};
pub use session::{SearchInputs, SessionContext};
