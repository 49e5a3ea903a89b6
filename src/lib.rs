//! crpt-client - Rate-limited CRPT ISMP Document Submission Client
//!
//! This crate implements a client for the CRPT ISMP "create document"
//! endpoint. Outbound requests are throttled by a fixed-window rate limit
//! gate that is safe to share across any number of concurrent callers; the
//! gate is the core of the crate, the HTTP submission is thin glue around it.

pub mod client;
pub mod config;
pub mod document;
pub mod error;
pub mod ratelimit;
pub mod report;
