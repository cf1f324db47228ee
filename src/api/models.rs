use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Every successful response wraps its payload in `{ "data": ... }`.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "_id", alias = "id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
}

/// A single expense row as returned by the list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub title: String,
    #[serde(default, deserialize_with = "nullable_category")]
    pub category: Category,
    pub amount: f64,
    /// `None` when the server sent no date or one that cannot be read.
    #[serde(default, with = "wire_date")]
    pub date: Option<NaiveDate>,
}

impl Expense {
    pub fn category_name(&self) -> &str {
        &self.category.name
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct UserDetails {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(rename = "profilePicture", default)]
    pub profile_picture: Option<String>,
}

/// Multipart payload for the profile-picture endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PictureUpload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Result of a picture upload: the new picture URL when the server reports one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PictureUpdated {
    pub profile_picture: Option<String>,
}

impl PictureUpdated {
    /// Accept `profilePicture` either at the top level or inside `data`.
    pub fn from_json(value: &serde_json::Value) -> Self {
        let top = value.get("profilePicture");
        let nested = value.get("data").and_then(|data| data.get("profilePicture"));
        let profile_picture = top
            .or(nested)
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        Self { profile_picture }
    }
}

fn nullable_category<'de, D>(deserializer: D) -> Result<Category, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Category>::deserialize(deserializer)?.unwrap_or_default())
}

/// Dates travel either as `YYYY-MM-DD` or as full timestamps; only the calendar date is kept.
pub mod wire_date {
    use super::*;
    use serde::{Deserializer, Serializer};

    const DATE_FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(date) => serializer.serialize_str(&date.format(DATE_FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    /// Unreadable dates decode to `None` so one bad row does not sink the whole list.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let Some(raw) = Option::<String>::deserialize(deserializer)? else {
            return Ok(None);
        };
        let parsed = parse(&raw);
        if parsed.is_none() {
            log::warn!("Ignoring unreadable expense date `{}`", raw);
        }
        Ok(parsed)
    }

    pub fn parse(raw: &str) -> Option<NaiveDate> {
        let trimmed = raw.trim();
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, DATE_FORMAT) {
            return Some(date);
        }
        if let Ok(stamp) = DateTime::parse_from_rfc3339(trimmed) {
            return Some(stamp.date_naive());
        }
        NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|stamp| stamp.date())
    }
}
