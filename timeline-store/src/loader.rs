use timeline_common::PostTable;
use timeline_social::{TimelineFetcher, TimelineSource};

use crate::Result;
use crate::snapshot::SnapshotStore;

/// Where the table handed back by [`CacheLoader::load`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    Network,
    Snapshot,
}

/// Picks between the provider and the snapshot for one account.
pub struct CacheLoader<S> {
    fetcher: TimelineFetcher<S>,
    store: SnapshotStore,
}

impl<S: TimelineSource> CacheLoader<S> {
    pub fn new(fetcher: TimelineFetcher<S>, store: SnapshotStore) -> Self {
        Self { fetcher, store }
    }

    pub fn fetcher(&self) -> &TimelineFetcher<S> {
        &self.fetcher
    }

    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    /// Table of every post of `account`.
    ///
    /// Fetches and overwrites the snapshot when `force_reload` is set or no
    /// snapshot exists; otherwise deserializes the snapshot without touching
    /// the network.
    pub async fn load(&self, account: &str, force_reload: bool) -> Result<PostTable> {
        self.load_with_source(account, force_reload)
            .await
            .map(|(table, _)| table)
    }

    /// [`load`](Self::load), also reporting which path was taken.
    pub async fn load_with_source(
        &self,
        account: &str,
        force_reload: bool,
    ) -> Result<(PostTable, LoadSource)> {
        let (table, source) = if force_reload || !self.store.exists() {
            tracing::info!(account, force_reload, "loading posts from provider");
            let posts = self.fetcher.fetch_all(account).await?;
            let table = PostTable::from_posts(posts);
            self.store.save(&table)?;
            (table, LoadSource::Network)
        } else {
            tracing::info!(account, path = %self.store.path().display(), "loading cached posts from snapshot");
            (self.store.load()?, LoadSource::Snapshot)
        };
        log_posts(&table);
        Ok((table, source))
    }
}

/// One debug event per post: text, media flag and engagement counters.
fn log_posts(table: &PostTable) {
    if !tracing::enabled!(tracing::Level::DEBUG) {
        return;
    }
    for post in table.rows() {
        tracing::debug!(
            id = post.id,
            has_media = post.has_media,
            retweets = post.retweet_count,
            likes = post.favorite_count,
            text = %post.full_text,
            "post"
        );
    }
}
