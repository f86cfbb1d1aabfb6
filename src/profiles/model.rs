//! Data structures backing the persisted questionnaire profile.
//!
//! Every answer is optional so a partially completed questionnaire is still a
//! valid record. "Unset" (`None`), a skipped description and the unspecified
//! city sentinel are distinct values rather than string conventions.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Stable identifier issued by the chat platform.
///
/// Platforms hand out either integers or strings; both are stored as the
/// string key of the profile table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<i64> for UserId {
    fn from(value: i64) -> Self {
        Self(value.to_string())
    }
}

impl From<u64> for UserId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for UserId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Value stored for a city the user chose not to share.
pub const UNSPECIFIED_CITY: &str = "unspecified";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum City {
    Named(String),
    Unspecified,
}

impl City {
    pub fn name(&self) -> Option<&str> {
        match self {
            City::Named(name) => Some(name),
            City::Unspecified => None,
        }
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            City::Named(name) => f.write_str(name),
            City::Unspecified => f.write_str(UNSPECIFIED_CITY),
        }
    }
}

impl Serialize for City {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for City {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if raw.eq_ignore_ascii_case(UNSPECIFIED_CITY) {
            Ok(City::Unspecified)
        } else {
            Ok(City::Named(raw))
        }
    }
}

/// Free-text self description. An explicitly skipped description is stored as
/// an empty string so the key is still present on completed profiles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Description {
    Skipped,
    Text(String),
}

impl Description {
    pub fn text(&self) -> Option<&str> {
        match self {
            Description::Skipped => None,
            Description::Text(text) => Some(text),
        }
    }
}

impl Serialize for Description {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.text().unwrap_or(""))
    }
}

impl<'de> Deserialize<'de> for Description {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if raw.is_empty() {
            Ok(Description::Skipped)
        } else {
            Ok(Description::Text(raw))
        }
    }
}

/// Opaque handle to photo content already transferred to the chat platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhotoRef(String);

impl PhotoRef {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhotoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Questionnaire fields, in the order they are asked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileField {
    Name,
    Age,
    City,
    Description,
    Photo,
}

impl ProfileField {
    pub const ALL: [ProfileField; 5] = [
        ProfileField::Name,
        ProfileField::Age,
        ProfileField::City,
        ProfileField::Description,
        ProfileField::Photo,
    ];

    /// Fields a committed profile cannot be missing.
    pub const REQUIRED: [ProfileField; 4] = [
        ProfileField::Name,
        ProfileField::Age,
        ProfileField::City,
        ProfileField::Photo,
    ];

    /// Key used in the persisted table.
    pub fn key(self) -> &'static str {
        match self {
            ProfileField::Name => "name",
            ProfileField::Age => "age",
            ProfileField::City => "city",
            ProfileField::Description => "description",
            ProfileField::Photo => "photo",
        }
    }
}

impl fmt::Display for ProfileField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One user's questionnaire record as stored in the profile table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<City>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Description>,
    #[serde(rename = "photo", default, skip_serializing_if = "Option::is_none")]
    pub photo_ref: Option<PhotoRef>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    /// Time of the last confirmed commit.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "timestamp")]
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Profile {
    /// True when no questionnaire answer has been recorded.
    pub fn is_empty(&self) -> bool {
        ProfileField::ALL.iter().all(|field| !self.has(*field))
    }

    pub fn has(&self, field: ProfileField) -> bool {
        match field {
            ProfileField::Name => self.name.is_some(),
            ProfileField::Age => self.age.is_some(),
            ProfileField::City => self.city.is_some(),
            ProfileField::Description => self.description.is_some(),
            ProfileField::Photo => self.photo_ref.is_some(),
        }
    }

    /// Copies every answer set on `other` over this record; unset answers
    /// on `other` leave the current values alone.
    pub fn merge_from(&mut self, other: &Profile) {
        if other.name.is_some() {
            self.name = other.name.clone();
        }
        if other.age.is_some() {
            self.age = other.age;
        }
        if other.city.is_some() {
            self.city = other.city.clone();
        }
        if other.description.is_some() {
            self.description = other.description.clone();
        }
        if other.photo_ref.is_some() {
            self.photo_ref = other.photo_ref.clone();
        }
    }

    pub fn missing_required(&self) -> Vec<ProfileField> {
        ProfileField::REQUIRED
            .into_iter()
            .filter(|field| !self.has(*field))
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_required().is_empty() && self.description.is_some()
    }
}

/// RFC 3339 timestamps; naive ISO-8601 values written by older tools are
/// read as UTC.
mod timestamp {
    use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(ts) => serializer.serialize_str(&ts.to_rfc3339()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        let Some(raw) = Option::<String>::deserialize(deserializer)? else {
            return Ok(None);
        };
        if let Ok(ts) = DateTime::parse_from_rfc3339(&raw) {
            return Ok(Some(ts.with_timezone(&Utc)));
        }
        NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|naive| Some(Utc.from_utc_datetime(&naive)))
            .map_err(|err| D::Error::custom(format!("invalid timestamp '{raw}': {err}")))
    }
}
