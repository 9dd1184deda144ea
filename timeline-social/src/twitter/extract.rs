use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::source::SocialError;
use crate::twitter::types::Status;
use timeline_common::Post;

/// v1.1 `created_at` layout.
const CREATED_AT_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

/// Parse a v1.1 timestamp, falling back to RFC 3339 (v2 payloads).
pub fn parse_created_at(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_str(raw, CREATED_AT_FORMAT)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Convert a raw status into a [`Post`].
///
/// `full_text` wins over the truncated `text`. The entities object is kept in
/// `extra` alongside every other untyped field.
pub fn status_to_post(status: Status) -> Result<Post, SocialError> {
    let Status {
        id,
        created_at,
        full_text,
        text,
        retweet_count,
        favorite_count,
        is_quote_status,
        in_reply_to_status_id,
        entities,
        mut extra,
    } = status;

    let created = parse_created_at(&created_at).ok_or_else(|| SocialError::Timestamp {
        id,
        value: created_at.clone(),
    })?;

    // presence of the key is what counts, an empty list included
    let has_media = entities.as_ref().is_some_and(|e| e.media.is_some());

    if let Some(entities) = entities {
        extra.insert("entities".into(), serde_json::to_value(entities).unwrap_or(Value::Null));
    }
    if let (Some(_), Some(short)) = (&full_text, &text) {
        extra.insert("text".into(), Value::from(short.clone()));
    }

    Ok(Post {
        id,
        created_at: created,
        full_text: full_text.or(text).unwrap_or_default(),
        retweet_count,
        favorite_count,
        has_media,
        is_quote_status,
        in_reply_to_status_id,
        extra,
    })
}
