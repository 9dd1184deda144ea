use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// One status object from `statuses/user_timeline.json`.
///
/// Only fields the statistics read are typed; the rest is kept verbatim in
/// `extra` so nothing the provider sent is lost.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Status {
    pub id: u64,
    /// e.g. `Wed Oct 10 20:19:24 +0000 2018`
    pub created_at: String,

    /// Present with `tweet_mode=extended`.
    #[serde(default)]
    pub full_text: Option<String>,
    #[serde(default)]
    pub text: Option<String>,

    #[serde(default)]
    pub retweet_count: u64,
    #[serde(default)]
    pub favorite_count: u64,
    #[serde(default)]
    pub is_quote_status: bool,
    #[serde(default)]
    pub in_reply_to_status_id: Option<u64>,

    #[serde(default)]
    pub entities: Option<Entities>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Entities {
    /// Only present when the status carries native media.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media: Option<Vec<Value>>,

    #[serde(flatten)]
    pub rest: BTreeMap<String, Value>,
}
