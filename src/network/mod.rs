pub mod client;
pub mod errors;
pub mod identity;
pub mod transport;

pub use client::PortalClient;
pub use errors::NetworkError;
pub use transport::{BodyEncoding, HttpMethod, PortalRequest, PortalResponse, RequestBody, Transport};
