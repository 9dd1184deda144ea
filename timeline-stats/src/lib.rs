//! Descriptive statistics over a [`PostTable`](timeline_common::PostTable).
//!
//! Every routine is independent and stateless: group by hour, month or
//! weekday, average engagement, regress engagement on text length. The
//! [`report`] module bundles them into one serializable result.
use serde::{Deserialize, Serialize};
use thiserror::Error;
use timeline_common::Post;

pub mod distribution;
pub mod regression;
pub mod report;
pub mod summary;

pub use distribution::{
    HourBucket, MonthBucket, MonthlyDistribution, WeekdayRate, hourly_distribution,
    monthly_distribution, weekday_frequency,
};
pub use regression::{Regression, length_regression, linregress};
pub use report::Report;
pub use summary::{EngagementSummary, Subsets, summarize};

#[derive(Debug, Error, PartialEq)]
pub enum StatsError {
    #[error("need at least {needed} posts, got {got}")]
    NotEnoughData { needed: usize, got: usize },

    #[error("all x values are identical, regression is undefined")]
    ConstantInput,

    #[error("posts span less than one day")]
    ZeroSpan,
}

/// Engagement counter used to colour or score a statistic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Engagement {
    Retweets,
    Likes,
}

impl Engagement {
    pub const ALL: [Engagement; 2] = [Engagement::Retweets, Engagement::Likes];

    pub fn of(self, post: &Post) -> u64 {
        match self {
            Engagement::Retweets => post.retweet_count,
            Engagement::Likes => post.favorite_count,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Engagement::Retweets => "retweets",
            Engagement::Likes => "likes",
        }
    }
}

/// Arithmetic mean, `None` for an empty input.
pub(crate) fn mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let (sum, n) = values
        .into_iter()
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}
