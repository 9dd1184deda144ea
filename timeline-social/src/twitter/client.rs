//! Wrapper around `GET 1.1/statuses/user_timeline.json` with app-only auth.
//!
//! A failed page is reported to the caller as-is; nothing is retried here.
use async_trait::async_trait;
use std::borrow::Cow;
use timeline_common::Post;
use timeline_http::{Auth, HttpClient, RequestOpts};

use crate::source::{SocialError, TimelineSource};
use crate::twitter::extract::status_to_post;
use crate::twitter::types::Status;

const USER_TIMELINE_PATH: &str = "1.1/statuses/user_timeline.json";
/// Largest `count` the endpoint accepts.
const MAX_COUNT: u32 = 200;

#[derive(Clone)]
pub struct TwitterApi {
    http: HttpClient,
    bearer: String,
}

impl TwitterApi {
    /// Client for the API rooted at `base`, e.g. `https://api.twitter.com`.
    pub fn with_base(base: &str, bearer_token: String) -> Result<Self, SocialError> {
        let http = HttpClient::new(base)?;
        Ok(Self {
            http,
            bearer: bearer_token,
        })
    }

    /// One raw page of statuses. `max_id` is inclusive, as the endpoint defines it.
    pub async fn user_timeline(
        &self,
        screen_name: &str,
        count: u32,
        max_id: Option<u64>,
    ) -> Result<Vec<Status>, SocialError> {
        let count = count.clamp(1, MAX_COUNT);

        let mut params: Vec<(&str, Cow<'_, str>)> = vec![
            ("screen_name", screen_name.into()),
            ("count", count.to_string().into()),
            ("tweet_mode", "extended".into()),
        ];
        if let Some(max_id) = max_id {
            params.push(("max_id", max_id.to_string().into()));
        }

        let statuses: Vec<Status> = self
            .http
            .get_json(
                USER_TIMELINE_PATH,
                RequestOpts {
                    auth: Some(Auth::Bearer(&self.bearer)),
                    query: Some(params),
                    ..Default::default()
                },
            )
            .await?;

        tracing::debug!(screen_name, count = statuses.len(), ?max_id, "twitter.user_timeline");
        Ok(statuses)
    }
}

#[async_trait]
impl TimelineSource for TwitterApi {
    async fn fetch_page(
        &self,
        account: &str,
        page_size: u32,
        before_id: Option<u64>,
    ) -> Result<Vec<Post>, SocialError> {
        let max_id = match before_id {
            // nothing can be older than id 0
            Some(0) => return Ok(Vec::new()),
            Some(id) => Some(id - 1),
            None => None,
        };

        self.user_timeline(account, page_size, max_id)
            .await?
            .into_iter()
            .map(status_to_post)
            .collect()
    }
}
