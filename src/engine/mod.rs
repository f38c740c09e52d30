pub mod candidates;
pub mod normalization;
pub mod normalizer;
pub mod prober;
pub mod resolver;

pub use candidates::{first_success, Exhausted};
pub use normalizer::{normalize_entries, ReportCandidate};
pub use prober::{ListPage, ListProbeResult, ListProber, ListQuery, ProbeError};
pub use resolver::{PdfLink, PdfResolver, ResolveContext, ResolvePhase};
