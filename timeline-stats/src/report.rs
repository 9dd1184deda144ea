//! One report per run, rendered as a terminal table or JSON.
//!
//! Distributions and regressions run over posts that are not replies;
//! the summary and weekday rates cover every post.
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use timeline_common::PostTable;

use crate::distribution::{
    HourBucket, MonthlyDistribution, WeekdayRate, hourly_distribution, monthly_distribution,
    weekday_frequency,
};
use crate::regression::{Regression, length_regression};
use crate::summary::{EngagementSummary, MeanEngagement, Subsets, summarize};
use crate::{Engagement, StatsError};

const BAR_WIDTH: usize = 40;

/// A statistic that may be undefined for the data at hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome<T> {
    Value(T),
    Unavailable { reason: String },
}

impl<T> From<Result<T, StatsError>> for Outcome<T> {
    fn from(res: Result<T, StatsError>) -> Self {
        match res {
            Ok(v) => Outcome::Value(v),
            Err(e) => Outcome::Unavailable {
                reason: e.to_string(),
            },
        }
    }
}

impl<T> Outcome<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Outcome::Value(v) => Some(v),
            Outcome::Unavailable { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricReport {
    pub metric: Engagement,
    pub hourly: Vec<HourBucket>,
    pub monthly: MonthlyDistribution,
    pub length: Outcome<Regression>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub account: String,
    pub summary: EngagementSummary,
    pub non_reply_posts: usize,
    pub weekdays: Outcome<Vec<WeekdayRate>>,
    pub metrics: Vec<MetricReport>,
}

impl Report {
    pub fn build(account: &str, table: &PostTable) -> Self {
        let subsets = Subsets::split(table);
        let base = &subsets.non_replies;
        tracing::debug!(
            account,
            posts = table.len(),
            non_replies = base.len(),
            quoted = subsets.quoted.len(),
            "stats.report.build"
        );

        let metrics = Engagement::ALL
            .iter()
            .map(|&metric| MetricReport {
                metric,
                hourly: hourly_distribution(base, metric),
                monthly: monthly_distribution(base, metric),
                length: length_regression(base, metric).into(),
            })
            .collect();

        Self {
            account: account.to_string(),
            summary: summarize(table),
            non_reply_posts: base.len(),
            weekdays: weekday_frequency(table).into(),
            metrics,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Plain-text rendering for the terminal.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let s = &self.summary;

        let _ = writeln!(out, "Account: {}", self.account);
        out.push_str(&"=".repeat(48));
        out.push('\n');
        if s.posts == 0 {
            out.push_str("No posts cached.\n");
            return out;
        }

        let _ = writeln!(out, "{:<28} {:>10}", "posts", s.posts);
        let _ = writeln!(out, "{:<28} {:>10}", "posts (no replies)", self.non_reply_posts);
        if let (Some(first), Some(last)) = (s.first_post, s.last_post) {
            let _ = writeln!(out, "{:<28} {}", "first post", first.format("%Y-%m-%d %H:%M"));
            let _ = writeln!(out, "{:<28} {}", "last post", last.format("%Y-%m-%d %H:%M"));
        }
        let _ = writeln!(out, "{:<28} {:>10}", "days covered", s.span_days);
        let _ = writeln!(out, "{:<28} {:>10}", "posts per day", fmt_opt(s.posts_per_day, 3));
        let _ = writeln!(out, "{:<28} {:>10}", "% quoted", fmt_opt(s.percent_quoted, 2));
        let _ = writeln!(out, "{:<28} {:>10}", "% replies", fmt_opt(s.percent_replies, 2));
        push_means(&mut out, "retweets", &s.retweets);
        push_means(&mut out, "likes", &s.likes);

        section(&mut out, "Posts per weekday (per week)");
        match &self.weekdays {
            Outcome::Value(rates) => {
                for r in rates {
                    let _ = writeln!(out, "  {:<12} {:>6} {:>10.3}", r.weekday, r.count, r.per_week);
                }
            }
            Outcome::Unavailable { reason } => {
                let _ = writeln!(out, "  n/a ({reason})");
            }
        }

        for m in &self.metrics {
            push_metric(&mut out, m);
        }
        out
    }
}

fn push_means(out: &mut String, label: &str, m: &MeanEngagement) {
    let _ = writeln!(out, "{:<28} {:>10}", format!("mean {label}"), fmt_opt(m.all, 4));
    let _ = writeln!(out, "{:<28} {:>10}", format!("mean {label} with media"), fmt_opt(m.with_media, 4));
    let _ = writeln!(
        out,
        "{:<28} {:>10}",
        format!("mean {label} without media"),
        fmt_opt(m.without_media, 4)
    );
}

fn push_metric(out: &mut String, m: &MetricReport) {
    let label = m.metric.label();

    section(out, &format!("Time of day (colour: mean {label})"));
    let max = m.hourly.iter().map(|b| b.count).max().unwrap_or(0);
    for b in &m.hourly {
        let _ = writeln!(
            out,
            "  {:02}h {:>6} {:>10.2} {}",
            b.hour,
            b.count,
            b.mean_engagement,
            bar(b.count, max)
        );
    }

    section(out, &format!("Posts per month (colour: mean {label})"));
    let max = m.monthly.buckets.iter().map(|b| b.count).max().unwrap_or(0);
    for b in &m.monthly.buckets {
        let _ = writeln!(
            out,
            "  {:<10} {:>4} {:>6} {:>10.2} {}",
            b.label,
            b.position,
            b.count,
            b.mean_engagement,
            bar(b.count, max)
        );
    }

    section(out, &format!("Number of {label} vs. text length"));
    match &m.length {
        Outcome::Value(fit) => {
            let _ = writeln!(
                out,
                "  Pearson r = {:.4}, p-value = {:.4}, n = {}",
                fit.rvalue, fit.pvalue, fit.n
            );
            let _ = writeln!(
                out,
                "  slope = {:.6}, intercept = {:.6}, stderr = {:.6}",
                fit.slope, fit.intercept, fit.stderr
            );
        }
        Outcome::Unavailable { reason } => {
            let _ = writeln!(out, "  n/a ({reason})");
        }
    }
}

fn section(out: &mut String, title: &str) {
    let _ = writeln!(out, "\n{title}");
    out.push_str(&"-".repeat(48));
    out.push('\n');
}

fn bar(count: usize, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    let len = (count * BAR_WIDTH).div_ceil(max);
    "#".repeat(len)
}

fn fmt_opt(v: Option<f64>, precision: usize) -> String {
    match v {
        Some(v) => format!("{v:.precision$}"),
        None => "n/a".to_string(),
    }
}
