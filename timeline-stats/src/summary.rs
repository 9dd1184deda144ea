//! Whole-collection figures: means with and without media, quote and reply
//! shares, covered time span.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use timeline_common::{Post, PostTable};

use crate::{Engagement, mean};

/// The slices of a table the statistics are run over.
#[derive(Debug, Clone)]
pub struct Subsets {
    pub quoted: PostTable,
    pub replies: PostTable,
    pub non_replies: PostTable,
}

impl Subsets {
    /// Every row lands in exactly one of `replies` / `non_replies`.
    pub fn split(table: &PostTable) -> Self {
        Self {
            quoted: table.filter(|p| p.is_quote_status),
            replies: table.filter(Post::is_reply),
            non_replies: table.filter(|p| !p.is_reply()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MeanEngagement {
    pub all: Option<f64>,
    pub with_media: Option<f64>,
    pub without_media: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EngagementSummary {
    pub posts: usize,
    pub first_post: Option<DateTime<Utc>>,
    pub last_post: Option<DateTime<Utc>>,
    /// Whole days between the first and last post.
    pub span_days: i64,
    pub posts_per_day: Option<f64>,
    pub percent_quoted: Option<f64>,
    pub percent_replies: Option<f64>,
    pub retweets: MeanEngagement,
    pub likes: MeanEngagement,
}

/// Summary over every row of `table`. Undefined ratios are `None`.
pub fn summarize(table: &PostTable) -> EngagementSummary {
    let posts = table.len();
    let first_post = table.chronological().next().map(|p| p.created_at);
    let last_post = table.rows().first().map(|p| p.created_at);
    let span_days = match (first_post, last_post) {
        (Some(first), Some(last)) => (last - first).num_days(),
        _ => 0,
    };

    let share = |count: usize| (posts > 0).then(|| 100.0 * count as f64 / posts as f64);
    let quoted = table.rows().iter().filter(|p| p.is_quote_status).count();
    let replies = table.rows().iter().filter(|p| p.is_reply()).count();

    EngagementSummary {
        posts,
        first_post,
        last_post,
        span_days,
        posts_per_day: (span_days > 0).then(|| posts as f64 / span_days as f64),
        percent_quoted: share(quoted),
        percent_replies: share(replies),
        retweets: mean_engagement(table, Engagement::Retweets),
        likes: mean_engagement(table, Engagement::Likes),
    }
}

fn mean_engagement(table: &PostTable, metric: Engagement) -> MeanEngagement {
    let values = |media: Option<bool>| {
        table
            .rows()
            .iter()
            .filter(move |p| media.is_none_or(|m| p.has_media == m))
            .map(move |p| metric.of(p) as f64)
    };
    MeanEngagement {
        all: mean(values(None)),
        with_media: mean(values(Some(true))),
        without_media: mean(values(Some(false))),
    }
}
