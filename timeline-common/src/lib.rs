//! Common types shared across the timeline crates.
//!
//! This crate defines the post record every other crate passes around, the
//! tabular view built over a fetched collection, and the observability
//! helpers used by the binary and the integration tests.
//!
//! # Overview
//!
//! - [`Post`]: one retrieved item with its known fields plus an `extra` side channel
//! - [`PostTable`]: newest-first rows with a deterministic column schema
//! - [`observability`]: centralised tracing/logging initialisation
//!
//! # Examples
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use timeline_common::{Post, PostTable};
//!
//! let post = Post::new(7, Utc.with_ymd_and_hms(2021, 3, 4, 5, 6, 7).unwrap(), "hello");
//! let table = PostTable::from_posts(vec![post]);
//! assert_eq!(table.len(), 1);
//! assert_eq!(table.columns()[0], "id");
//! ```
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

pub mod observability;

/// Columns every [`PostTable`] starts with, in this order.
pub const KNOWN_COLUMNS: [&str; 8] = [
    "id",
    "created_at",
    "full_text",
    "retweet_count",
    "favorite_count",
    "has_media",
    "is_quote_status",
    "in_reply_to_status_id",
];

/// A single post as retrieved from the provider.
///
/// The fixed fields cover everything the statistics need. Whatever else the
/// provider sent lives in `extra`, keyed by the provider's field name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Provider identifier, also used as the pagination cursor.
    pub id: u64,
    pub created_at: DateTime<Utc>,
    pub full_text: String,
    pub retweet_count: u64,
    pub favorite_count: u64,
    /// True when the post carries attached media.
    #[serde(default)]
    pub has_media: bool,
    #[serde(default)]
    pub is_quote_status: bool,
    #[serde(default)]
    pub in_reply_to_status_id: Option<u64>,
    /// Provider-specific fields not covered above.
    #[serde(default)]
    pub extra: BTreeMap<String, Value>,
}

impl Post {
    /// Build a post with zeroed counters and no flags set.
    pub fn new(id: u64, created_at: DateTime<Utc>, full_text: impl Into<String>) -> Self {
        Self {
            id,
            created_at,
            full_text: full_text.into(),
            retweet_count: 0,
            favorite_count: 0,
            has_media: false,
            is_quote_status: false,
            in_reply_to_status_id: None,
            extra: BTreeMap::new(),
        }
    }

    pub fn is_reply(&self) -> bool {
        self.in_reply_to_status_id.is_some()
    }

    /// Value of a column for this post; unknown extras read as `null`.
    pub fn field(&self, column: &str) -> Value {
        match column {
            "id" => Value::from(self.id),
            "created_at" => Value::from(self.created_at.to_rfc3339()),
            "full_text" => Value::from(self.full_text.clone()),
            "retweet_count" => Value::from(self.retweet_count),
            "favorite_count" => Value::from(self.favorite_count),
            "has_media" => Value::from(self.has_media),
            "is_quote_status" => Value::from(self.is_quote_status),
            "in_reply_to_status_id" => self
                .in_reply_to_status_id
                .map(Value::from)
                .unwrap_or(Value::Null),
            other => self.extra.get(other).cloned().unwrap_or(Value::Null),
        }
    }
}

/// Tabular view over a post collection.
///
/// Rows stay in provider order (newest first). The schema is the known
/// columns followed by the sorted union of every `extra` key in any row, so
/// two tables built from the same posts always agree on their columns.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PostTable {
    columns: Vec<String>,
    rows: Vec<Post>,
}

impl PostTable {
    pub fn from_posts(rows: Vec<Post>) -> Self {
        let extras: BTreeSet<&str> = rows
            .iter()
            .flat_map(|p| p.extra.keys().map(String::as_str))
            .filter(|k| !KNOWN_COLUMNS.contains(k))
            .collect();

        let columns = KNOWN_COLUMNS
            .iter()
            .copied()
            .chain(extras)
            .map(str::to_string)
            .collect();

        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows, newest first.
    pub fn rows(&self) -> &[Post] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows oldest first.
    pub fn chronological(&self) -> impl Iterator<Item = &Post> {
        self.rows.iter().rev()
    }

    /// All values of one column, or `None` when the column is not in the schema.
    pub fn column(&self, name: &str) -> Option<Vec<Value>> {
        if !self.columns.iter().any(|c| c == name) {
            return None;
        }
        Some(self.rows.iter().map(|p| p.field(name)).collect())
    }

    /// Sub-table holding the rows matching `keep`, schema recomputed.
    pub fn filter<F>(&self, mut keep: F) -> PostTable
    where
        F: FnMut(&Post) -> bool,
    {
        PostTable::from_posts(self.rows.iter().filter(|p| keep(p)).cloned().collect())
    }
}
