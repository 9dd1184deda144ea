use async_trait::async_trait;
use thiserror::Error;
use timeline_common::Post;
use timeline_http::HttpError;

#[derive(Debug, Error)]
pub enum SocialError {
    /// Transport, auth or decode failure talking to the provider.
    #[error(transparent)]
    Http(#[from] HttpError),

    #[error("post {id} has an unparseable created_at: {value:?}")]
    Timestamp { id: u64, value: String },
}

/// One page of an account's timeline at a time.
#[async_trait]
pub trait TimelineSource: Send + Sync {
    /// Up to `page_size` posts of `account`, newest first.
    ///
    /// `before_id` is an exclusive upper bound: only posts with an id strictly
    /// below it are returned. `None` asks for the most recent page. An empty
    /// page means the provider has nothing older to give.
    async fn fetch_page(
        &self,
        account: &str,
        page_size: u32,
        before_id: Option<u64>,
    ) -> Result<Vec<Post>, SocialError>;
}
