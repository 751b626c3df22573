//! Subscriber records as delivered by the subscribers API.
//!
//! Every field except `id` may be missing on the wire. Missing values are
//! resolved here, once, so the engines downstream never see a partial record.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel used for missing `utm_source` / `utm_channel` values.
pub const MISSING_UTM: &str = "-";

/// Row key. The API may send it as a string or as a number; numeric ids keep
/// their numeric ordering when sorted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SubscriberId {
    Number(serde_json::Number),
    Text(String),
}

impl SubscriberId {
    pub fn new(id: impl Into<String>) -> Self {
        SubscriberId::Text(id.into())
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            SubscriberId::Number(number) => number.as_f64(),
            SubscriberId::Text(_) => None,
        }
    }
}

impl From<u64> for SubscriberId {
    fn from(id: u64) -> Self {
        SubscriberId::Number(id.into())
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubscriberId::Number(number) => write!(f, "{number}"),
            SubscriberId::Text(text) => f.write_str(text),
        }
    }
}

/// Per-subscriber engagement aggregates. Absent fields are 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubscriberStats {
    #[serde(deserialize_with = "null_as_default")]
    pub total_received: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub open_rate: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub click_rate: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub total_clicked: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub total_unique_clicked: f64,
}

/// A single subscriber record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscriber {
    pub id: SubscriberId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utm_source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utm_channel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<SubscriberStats>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_to_unsubscribe: Option<f64>,
}

impl Subscriber {
    /// Minimal record; everything optional left absent.
    pub fn new(id: impl Into<String>, email: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            id: SubscriberId::new(id),
            email: email.into(),
            status: status.into(),
            utm_source: None,
            utm_channel: None,
            stats: None,
            days_to_unsubscribe: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == "active"
    }

    /// `utm_source`, or `-` when absent or empty.
    pub fn source(&self) -> &str {
        non_empty_or_sentinel(self.utm_source.as_deref())
    }

    /// `utm_channel`, or `-` when absent or empty.
    pub fn channel(&self) -> &str {
        non_empty_or_sentinel(self.utm_channel.as_deref())
    }

    /// Grouping key `"<source>/<channel>"`, shared by filtering, sorting and display.
    pub fn group_key(&self) -> String {
        format!("{}/{}", self.source(), self.channel())
    }

    /// Stats with every absent field resolved to 0.
    pub fn stats_or_default(&self) -> SubscriberStats {
        self.stats.clone().unwrap_or_default()
    }
}

/// Treats an explicit `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn non_empty_or_sentinel(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => MISSING_UTM,
    }
}

/// Response body of `GET /api/subscribers/`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubscribersResponse {
    #[serde(deserialize_with = "null_as_default")]
    pub subscribers: Vec<Subscriber>,
    #[serde(deserialize_with = "null_as_default")]
    pub total_subscribers: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub percent_clicked_once: f64,
}

/// Aggregate counters shown above the table, computed once per fetch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_subscribers: u64,
    pub active_subscribers: u64,
    pub inactive_subscribers: u64,
    pub percent_clicked_once: f64,
    pub subscribers_clicked: u64,
}

impl DashboardStats {
    pub fn from_response(response: &SubscribersResponse) -> Self {
        let active = response.subscribers.iter().filter(|s| s.is_active()).count() as u64;
        let records = response.subscribers.len() as u64;
        let total = response.total_subscribers.max(0.0);
        let percent = response.percent_clicked_once;

        Self {
            total_subscribers: total.round() as u64,
            active_subscribers: active,
            inactive_subscribers: records - active,
            percent_clicked_once: percent,
            subscribers_clicked: (percent * total / 100.0).round().max(0.0) as u64,
        }
    }

    /// `"<clicked> (<pct>%)"` as rendered in the stats header
    pub fn clicked_label(&self) -> String {
        format!(
            "{} ({:.1}%)",
            self.subscribers_clicked, self.percent_clicked_once
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_record() {
        let json = r#"{
            "id": "sub_1",
            "email": "a@x.com",
            "status": "active",
            "utm_source": "twitter",
            "utm_channel": "social",
            "stats": {"total_received": 5, "open_rate": 42.5, "click_rate": 1.25,
                      "total_clicked": 3, "total_unique_clicked": 2},
            "days_to_unsubscribe": 12
        }"#;

        let sub: Subscriber = serde_json::from_str(json).unwrap();

        assert_eq!(sub.id, SubscriberId::new("sub_1"));
        assert!(sub.is_active());
        assert_eq!(sub.group_key(), "twitter/social");
        assert_eq!(sub.stats_or_default().open_rate, 42.5);
        assert_eq!(sub.days_to_unsubscribe, Some(12.0));
    }

    #[test]
    fn test_deserialize_numeric_id() {
        let sub: Subscriber = serde_json::from_str(r#"{"id": 7}"#).unwrap();
        assert_eq!(sub.id, SubscriberId::from(7));
        assert_eq!(sub.id.as_number(), Some(7.0));
        assert_eq!(sub.id.to_string(), "7");
        assert_eq!(sub.email, "");
        assert!(!sub.is_active());
    }

    #[test]
    fn test_missing_utm_uses_sentinel() {
        let sub = Subscriber::new("1", "a@x.com", "active");
        assert_eq!(sub.group_key(), "-/-");
    }

    #[test]
    fn test_empty_utm_uses_sentinel() {
        let mut sub = Subscriber::new("1", "a@x.com", "active");
        sub.utm_source = Some(String::new());
        sub.utm_channel = Some("email".to_string());
        assert_eq!(sub.group_key(), "-/email");
    }

    #[test]
    fn test_partial_stats_default_to_zero() {
        let sub: Subscriber =
            serde_json::from_str(r#"{"id": "1", "stats": {"total_received": 5}}"#).unwrap();
        let stats = sub.stats_or_default();
        assert_eq!(stats.total_received, 5.0);
        assert_eq!(stats.click_rate, 0.0);
        assert_eq!(stats.total_unique_clicked, 0.0);
    }

    #[test]
    fn test_null_fields_default() {
        let json = r#"{"id": "1", "email": null, "stats": {"open_rate": null}}"#;
        let sub: Subscriber = serde_json::from_str(json).unwrap();
        assert_eq!(sub.email, "");
        assert_eq!(sub.stats_or_default().open_rate, 0.0);

        let response: SubscribersResponse =
            serde_json::from_str(r#"{"subscribers": null, "total_subscribers": 4}"#).unwrap();
        assert!(response.subscribers.is_empty());
        assert_eq!(response.total_subscribers, 4.0);
    }

    #[test]
    fn test_response_without_subscribers() {
        let response: SubscribersResponse = serde_json::from_str("{}").unwrap();
        assert!(response.subscribers.is_empty());
        assert_eq!(response.total_subscribers, 0.0);
    }

    #[test]
    fn test_dashboard_stats() {
        let response = SubscribersResponse {
            subscribers: vec![
                Subscriber::new("1", "a@x.com", "active"),
                Subscriber::new("2", "b@x.com", "inactive"),
                Subscriber::new("3", "c@x.com", "active"),
            ],
            total_subscribers: 3.0,
            percent_clicked_once: 33.3,
        };

        let stats = DashboardStats::from_response(&response);

        assert_eq!(stats.total_subscribers, 3);
        assert_eq!(stats.active_subscribers, 2);
        assert_eq!(stats.inactive_subscribers, 1);
        assert_eq!(stats.subscribers_clicked, 1);
        assert_eq!(stats.clicked_label(), "1 (33.3%)");
    }

    #[test]
    fn test_dashboard_stats_empty() {
        let stats = DashboardStats::from_response(&SubscribersResponse::default());
        assert_eq!(stats, DashboardStats::default());
    }
}
