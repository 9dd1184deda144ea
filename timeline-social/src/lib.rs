//! Provider access for account timelines.
//!
//! [`source::TimelineSource`] is the seam between the pagination logic in
//! [`fetcher`] and a concrete provider. The Twitter/X v1.1 implementation
//! lives in [`twitter`].
pub mod fetcher;
pub mod source;
pub mod twitter;

pub use fetcher::{DEFAULT_HISTORY_LIMIT, DEFAULT_PAGE_SIZE, TimelineFetcher};
pub use source::{SocialError, TimelineSource};
