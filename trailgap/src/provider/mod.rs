//! HTTP access for the remote services.
//!
//! Both the heatmap tile server and the Overpass API are reached through the
//! [`HttpClient`] trait so tests can substitute canned responses.

mod http;
mod types;

pub use http::{HttpClient, ReqwestClient};
pub use types::ProviderError;

#[cfg(test)]
pub use http::tests::MockHttpClient;
