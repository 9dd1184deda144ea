//! Twitter/X v1.1 user timeline access.
//!
//! `client` wraps `statuses/user_timeline`, `types` mirrors its JSON, and
//! `extract` turns raw statuses into [`timeline_common::Post`] records.
pub mod client;
pub mod extract;
pub mod types;

pub use client::TwitterApi;
