//! Field accessor table
//!
//! Sortable fields are a closed set of tagged variants resolved once from their
//! dotted key (`"stats.open_rate"`), so a typo fails at parse time instead of
//! silently sorting by an empty value.

use crate::error::EngineError;
use crate::model::{Subscriber, SubscriberId};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Synthetic key resolving to the `"<source>/<channel>"` group string.
pub const UTM_DATA_KEY: &str = "utm_data";

/// Numeric fields under the `stats` namespace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StatField {
    TotalReceived,
    OpenRate,
    ClickRate,
    TotalClicked,
    TotalUniqueClicked,
}

impl StatField {
    pub const ALL: [StatField; 5] = [
        StatField::TotalReceived,
        StatField::OpenRate,
        StatField::ClickRate,
        StatField::TotalClicked,
        StatField::TotalUniqueClicked,
    ];

    pub fn name(self) -> &'static str {
        match self {
            StatField::TotalReceived => "total_received",
            StatField::OpenRate => "open_rate",
            StatField::ClickRate => "click_rate",
            StatField::TotalClicked => "total_clicked",
            StatField::TotalUniqueClicked => "total_unique_clicked",
        }
    }

    /// Value on `record`, 0 when the record has no stats.
    pub fn extract(self, record: &Subscriber) -> f64 {
        let Some(stats) = record.stats.as_ref() else {
            return 0.0;
        };
        match self {
            StatField::TotalReceived => stats.total_received,
            StatField::OpenRate => stats.open_rate,
            StatField::ClickRate => stats.click_rate,
            StatField::TotalClicked => stats.total_clicked,
            StatField::TotalUniqueClicked => stats.total_unique_clicked,
        }
    }
}

/// A resolvable field of a subscriber record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldPath {
    Id,
    Email,
    Status,
    UtmData,
    Stat(StatField),
    DaysToUnsubscribe,
}

impl FieldPath {
    pub fn resolve(self, record: &Subscriber) -> FieldValue {
        match self {
            FieldPath::Id => match &record.id {
                SubscriberId::Text(text) => FieldValue::text(text),
                id => id.as_number().map_or(FieldValue::Missing, FieldValue::Number),
            },
            FieldPath::Email => FieldValue::text(&record.email),
            FieldPath::Status => FieldValue::text(&record.status),
            FieldPath::UtmData => FieldValue::Text(record.group_key()),
            FieldPath::Stat(stat) => FieldValue::Number(stat.extract(record)),
            FieldPath::DaysToUnsubscribe => record
                .days_to_unsubscribe
                .map_or(FieldValue::Missing, FieldValue::Number),
        }
    }
}

impl FromStr for FieldPath {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let field = match s {
            "id" => FieldPath::Id,
            "email" => FieldPath::Email,
            "status" => FieldPath::Status,
            UTM_DATA_KEY => FieldPath::UtmData,
            "days_to_unsubscribe" => FieldPath::DaysToUnsubscribe,
            other => {
                let stat = other
                    .strip_prefix("stats.")
                    .and_then(|name| StatField::ALL.into_iter().find(|f| f.name() == name));
                match stat {
                    Some(stat) => FieldPath::Stat(stat),
                    None => return Err(EngineError::UnknownField(s.to_string())),
                }
            }
        };
        Ok(field)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldPath::Id => f.write_str("id"),
            FieldPath::Email => f.write_str("email"),
            FieldPath::Status => f.write_str("status"),
            FieldPath::UtmData => f.write_str(UTM_DATA_KEY),
            FieldPath::Stat(stat) => write!(f, "stats.{}", stat.name()),
            FieldPath::DaysToUnsubscribe => f.write_str("days_to_unsubscribe"),
        }
    }
}

impl Serialize for FieldPath {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FieldPath {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let key = String::deserialize(deserializer)?;
        key.parse().map_err(serde::de::Error::custom)
    }
}

/// A resolved, comparable field value.
///
/// Ordering: `Missing < Number < Text`; numbers compare with `total_cmp`,
/// text lexicographically.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Missing,
    Number(f64),
    Text(String),
}

impl FieldValue {
    /// Empty strings count as missing.
    fn text(value: &str) -> Self {
        if value.is_empty() {
            FieldValue::Missing
        } else {
            FieldValue::Text(value.to_string())
        }
    }

    fn rank(&self) -> u8 {
        match self {
            FieldValue::Missing => 0,
            FieldValue::Number(_) => 1,
            FieldValue::Text(_) => 2,
        }
    }
}

impl Eq for FieldValue {}

impl Ord for FieldValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (FieldValue::Number(a), FieldValue::Number(b)) => a.total_cmp(b),
            (FieldValue::Text(a), FieldValue::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for FieldValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
