//! # upstream-adapters
//!
//! Implementations of [`domains::UpstreamApi`]. The only one today talks
//! HTTP through reqwest.

pub mod http;

pub use http::HttpUpstream;
