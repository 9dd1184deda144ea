//! Walks a [`TimelineSource`] backwards until it runs dry.
use crate::source::{SocialError, TimelineSource};
use std::collections::HashSet;
use timeline_common::Post;

/// Posts requested per call.
pub const DEFAULT_PAGE_SIZE: u32 = 100;
/// Twitter refuses to hand out more than this many historical posts.
pub const DEFAULT_HISTORY_LIMIT: usize = 3200;

pub struct TimelineFetcher<S> {
    source: S,
    page_size: u32,
    history_limit: usize,
}

impl<S: TimelineSource> TimelineFetcher<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            page_size: DEFAULT_PAGE_SIZE,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }

    pub fn with_page_size(mut self, n: u32) -> Self {
        self.page_size = n.max(1);
        self
    }

    pub fn with_history_limit(mut self, n: usize) -> Self {
        self.history_limit = n;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Every retrievable post of `account`, newest first.
    ///
    /// The first request carries no bound; each later one is bounded by the
    /// oldest id collected so far. The loop ends on an empty page, on a page
    /// that adds nothing new, or once `history_limit` posts are collected.
    /// Provider errors are returned as-is; nothing is retried here.
    pub async fn fetch_all(&self, account: &str) -> Result<Vec<Post>, SocialError> {
        let mut posts: Vec<Post> = Vec::new();
        let mut seen: HashSet<u64> = HashSet::new();
        let mut oldest: Option<u64> = None;
        let mut requests = 0usize;

        loop {
            tracing::debug!(account, collected = posts.len(), before_id = ?oldest, "timeline.fetch.page");
            let page = self
                .source
                .fetch_page(account, self.page_size, oldest)
                .await?;
            requests += 1;

            if page.is_empty() {
                break;
            }

            let bound = oldest;
            let before = posts.len();
            for post in page {
                let out_of_bound = bound.is_some_and(|b| post.id >= b);
                if out_of_bound || !seen.insert(post.id) {
                    tracing::warn!(id = post.id, bound = ?bound, "timeline.fetch.duplicate_dropped");
                    continue;
                }
                oldest = Some(oldest.map_or(post.id, |o| o.min(post.id)));
                posts.push(post);
            }

            if posts.len() == before {
                tracing::warn!(account, requests, "timeline.fetch.no_progress");
                break;
            }
            if posts.len() >= self.history_limit {
                posts.truncate(self.history_limit);
                tracing::debug!(account, limit = self.history_limit, "timeline.fetch.history_limit");
                break;
            }
        }

        tracing::info!(account, total = posts.len(), requests, "timeline.fetch.done");
        Ok(posts)
    }
}
