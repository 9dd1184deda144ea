//! Posting volume grouped by hour of day, calendar month and weekday.
use chrono::{Datelike, Timelike, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use timeline_common::PostTable;

use crate::{Engagement, StatsError, mean};

const MONTH_ABBR: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourBucket {
    /// UTC hour, 0..=23.
    pub hour: u32,
    pub count: usize,
    pub mean_engagement: f64,
}

/// Posts per UTC hour with the mean of `metric` in each hour.
///
/// Only hours that have posts appear, in ascending order.
pub fn hourly_distribution(table: &PostTable, metric: Engagement) -> Vec<HourBucket> {
    let mut groups: BTreeMap<u32, Vec<f64>> = BTreeMap::new();
    for post in table.rows() {
        groups
            .entry(post.created_at.hour())
            .or_default()
            .push(metric.of(post) as f64);
    }

    groups
        .into_iter()
        .map(|(hour, values)| HourBucket {
            hour,
            count: values.len(),
            mean_engagement: mean(values).unwrap_or_default(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthBucket {
    pub year: i32,
    pub month: u32,
    /// e.g. `Mar, 2021`
    pub label: String,
    /// Months since the first month that has posts.
    pub position: u32,
    pub count: usize,
    pub mean_engagement: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MonthlyDistribution {
    /// Months covered from the first to the last bucket, inclusive.
    pub span_months: u32,
    pub buckets: Vec<MonthBucket>,
}

/// Posts per calendar month, positioned on a continuous month axis.
pub fn monthly_distribution(table: &PostTable, metric: Engagement) -> MonthlyDistribution {
    let mut groups: BTreeMap<(i32, u32), Vec<f64>> = BTreeMap::new();
    for post in table.rows() {
        let dt = post.created_at;
        groups
            .entry((dt.year(), dt.month()))
            .or_default()
            .push(metric.of(post) as f64);
    }

    let (Some(&first), Some(&last)) = (groups.keys().next(), groups.keys().next_back()) else {
        return MonthlyDistribution::default();
    };
    let months_since_first =
        |(year, month): (i32, u32)| ((year - first.0) * 12 + month as i32 - first.1 as i32) as u32;

    let buckets = groups
        .into_iter()
        .map(|((year, month), values)| MonthBucket {
            year,
            month,
            label: format!("{}, {year}", MONTH_ABBR[(month - 1) as usize]),
            position: months_since_first((year, month)),
            count: values.len(),
            mean_engagement: mean(values).unwrap_or_default(),
        })
        .collect();

    MonthlyDistribution {
        span_months: months_since_first(last) + 1,
        buckets,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekdayRate {
    /// Full English name, e.g. `Monday`.
    pub weekday: String,
    pub count: usize,
    /// `count` divided by the number of weeks between first and last post.
    pub per_week: f64,
}

/// Average posts per weekday, Monday first.
///
/// The number of weeks is the whole-day span between the oldest and the
/// newest post divided by seven, so a span under one day is an error.
pub fn weekday_frequency(table: &PostTable) -> Result<Vec<WeekdayRate>, StatsError> {
    let (Some(oldest), Some(newest)) = (table.chronological().next(), table.rows().first()) else {
        return Err(StatsError::NotEnoughData { needed: 2, got: 0 });
    };
    let days = (newest.created_at - oldest.created_at).num_days();
    if days <= 0 {
        return Err(StatsError::ZeroSpan);
    }
    let weeks = days as f64 / 7.0;

    let mut counts = [0usize; 7];
    for post in table.rows() {
        counts[post.created_at.weekday().num_days_from_monday() as usize] += 1;
    }

    Ok(WEEK
        .iter()
        .zip(counts)
        .map(|(day, count)| WeekdayRate {
            weekday: weekday_name(*day).to_string(),
            count,
            per_week: count as f64 / weeks,
        })
        .collect())
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use timeline_common::Post;

    fn post(id: u64, y: i32, m: u32, d: u32, h: u32, rts: u64, likes: u64) -> Post {
        let mut p = Post::new(id, Utc.with_ymd_and_hms(y, m, d, h, 15, 0).unwrap(), "x");
        p.retweet_count = rts;
        p.favorite_count = likes;
        p
    }

    #[test]
    fn hours_are_grouped_with_means() {
        let table = PostTable::from_posts(vec![
            post(4, 2021, 3, 2, 21, 10, 1),
            post(3, 2021, 3, 2, 9, 4, 2),
            post(2, 2021, 3, 1, 9, 2, 3),
            post(1, 2021, 3, 1, 0, 0, 4),
        ]);

        let rts = hourly_distribution(&table, Engagement::Retweets);
        assert_eq!(
            rts,
            vec![
                HourBucket { hour: 0, count: 1, mean_engagement: 0.0 },
                HourBucket { hour: 9, count: 2, mean_engagement: 3.0 },
                HourBucket { hour: 21, count: 1, mean_engagement: 10.0 },
            ]
        );
        let likes = hourly_distribution(&table, Engagement::Likes);
        assert_eq!(likes[1].mean_engagement, 2.5);
    }

    #[test]
    fn months_are_positioned_across_year_boundary() {
        let table = PostTable::from_posts(vec![
            post(4, 2021, 2, 10, 12, 0, 8),
            post(3, 2020, 12, 24, 12, 0, 4),
            post(2, 2020, 12, 1, 12, 0, 2),
            post(1, 2020, 11, 5, 12, 0, 1),
        ]);

        let dist = monthly_distribution(&table, Engagement::Likes);

        assert_eq!(dist.span_months, 4);
        let summary: Vec<(&str, u32, usize, f64)> = dist
            .buckets
            .iter()
            .map(|b| (b.label.as_str(), b.position, b.count, b.mean_engagement))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("Nov, 2020", 0, 1, 1.0),
                ("Dec, 2020", 1, 2, 3.0),
                ("Feb, 2021", 3, 1, 8.0),
            ]
        );
    }

    #[test]
    fn empty_table_has_no_months() {
        let dist = monthly_distribution(&PostTable::default(), Engagement::Likes);
        assert_eq!(dist, MonthlyDistribution::default());
        assert!(hourly_distribution(&PostTable::default(), Engagement::Likes).is_empty());
    }

    #[test]
    fn weekday_rates_divide_by_weeks_covered() {
        // 2021-03-01 is a Monday; span is exactly 14 days
        let table = PostTable::from_posts(vec![
            post(5, 2021, 3, 15, 12, 0, 0),
            post(4, 2021, 3, 8, 12, 0, 0),
            post(3, 2021, 3, 3, 12, 0, 0),
            post(2, 2021, 3, 1, 18, 0, 0),
            post(1, 2021, 3, 1, 12, 0, 0),
        ]);

        let rates = weekday_frequency(&table).unwrap();

        assert_eq!(rates.len(), 7);
        assert_eq!(rates[0].weekday, "Monday");
        assert_eq!(rates[0].count, 4);
        assert_eq!(rates[0].per_week, 2.0);
        assert_eq!(rates[2].weekday, "Wednesday");
        assert_eq!(rates[2].per_week, 0.5);
        assert_eq!(rates[6].count, 0);
    }

    #[test]
    fn weekday_rates_need_a_span() {
        let table = PostTable::from_posts(vec![post(1, 2021, 3, 1, 12, 0, 0)]);
        assert_eq!(weekday_frequency(&table), Err(StatsError::ZeroSpan));
        assert!(matches!(
            weekday_frequency(&PostTable::default()),
            Err(StatsError::NotEnoughData { .. })
        ));
    }
}
