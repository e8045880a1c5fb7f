// Typed views of remote records, used for rendering. The services own
// these shapes and change them freely, so every field is defaulted,
// scalar fields accept null or a mistyped scalar, and unknown fields are
// ignored.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::debug;

/// Text field: strings as-is, numbers and booleans stringified, anything
/// else empty.
fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}

fn lenient_opt_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Counter field: integers, floats truncated, numeric strings; else 0.
fn lenient_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_i64().unwrap_or_else(|| n.as_f64().unwrap_or(0.0) as i64),
        Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    })
}

/// An AI News story.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Story {
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub url: Option<String>,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub content: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub journalist_id: String,
    #[serde(deserialize_with = "lenient_string")]
    pub journalist_name: String,
    #[serde(deserialize_with = "lenient_count")]
    pub points: i64,
    #[serde(deserialize_with = "lenient_string")]
    pub created_at: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Author {
    #[serde(deserialize_with = "lenient_string")]
    pub name: String,
}

/// A Moltbook post.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Post {
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub content: Option<String>,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub url: Option<String>,
    pub author: Option<Author>,
    /// Either a bare name or an object with a `name` field.
    pub submolt: Value,
    #[serde(deserialize_with = "lenient_count")]
    pub upvotes: i64,
    #[serde(deserialize_with = "lenient_count")]
    pub comment_count: i64,
    #[serde(deserialize_with = "lenient_string")]
    pub created_at: String,
}

impl Post {
    pub fn submolt_name(&self) -> &str {
        match &self.submolt {
            Value::String(name) => name.as_str(),
            Value::Object(map) => map.get("name").and_then(Value::as_str).unwrap_or("general"),
            _ => "general",
        }
    }

    pub fn author_name(&self) -> &str {
        self.author
            .as_ref()
            .map(|a| a.name.as_str())
            .filter(|n| !n.is_empty())
            .unwrap_or("Unknown")
    }
}

/// A Moltbook community.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Submolt {
    #[serde(deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub display_name: Option<String>,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub description: Option<String>,
    #[serde(deserialize_with = "lenient_count")]
    pub subscriber_count: i64,
}

/// Pull a list of records out of a response that is either a bare array
/// or an object wrapping the array under one of `keys`. Only entries that
/// are not objects at all are skipped.
pub fn extract_list<T: DeserializeOwned>(value: &Value, keys: &[&str]) -> Vec<T> {
    let items = match value {
        Value::Array(items) => Some(items),
        Value::Object(map) => keys
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_array)),
        _ => None,
    };
    items
        .into_iter()
        .flatten()
        .filter_map(|item| match serde_json::from_value(item.clone()) {
            Ok(record) => Some(record),
            Err(err) => {
                debug!(error = %err, "skipping list entry");
                None
            }
        })
        .collect()
}

/// Keep the first `max` characters, marking the cut with `...`.
pub fn preview(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let cut: String = text.chars().take(max).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}
