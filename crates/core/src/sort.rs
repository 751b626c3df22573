//! Sort engine
//!
//! Stable ordering by a single resolved field. Ties keep their input order in
//! both directions.

use crate::error::EngineError;
use crate::field::FieldPath;
use crate::model::Subscriber;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggle(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    /// Header glyph for the active sort column
    pub fn indicator(self) -> &'static str {
        match self {
            SortDirection::Asc => "↑",
            SortDirection::Desc => "↓",
        }
    }
}

impl FromStr for SortDirection {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(EngineError::InvalidSortDirection(other.to_string())),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        })
    }
}

/// Active sort. `key: None` preserves input order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub key: Option<FieldPath>,
    pub direction: SortDirection,
}

impl SortState {
    pub fn new(key: FieldPath, direction: SortDirection) -> Self {
        Self {
            key: Some(key),
            direction,
        }
    }

    /// Same key flips the direction; a new key starts ascending.
    pub fn sort_by(&mut self, key: FieldPath) {
        if self.key == Some(key) {
            self.direction = self.direction.toggle();
        } else {
            self.key = Some(key);
            self.direction = SortDirection::Asc;
        }
    }

    pub fn indicator_for(&self, key: FieldPath) -> Option<&'static str> {
        (self.key == Some(key)).then(|| self.direction.indicator())
    }

    pub fn apply<'a>(&self, records: &[&'a Subscriber]) -> Vec<&'a Subscriber> {
        match self.key {
            Some(key) => sort_subscribers(records, key, self.direction),
            None => records.to_vec(),
        }
    }
}

/// Returns a new, stably ordered sequence; `records` is left untouched.
pub fn sort_subscribers<'a>(
    records: &[&'a Subscriber],
    key: FieldPath,
    direction: SortDirection,
) -> Vec<&'a Subscriber> {
    let mut keyed: Vec<_> = records.iter().map(|r| (key.resolve(r), *r)).collect();

    match direction {
        SortDirection::Asc => keyed.sort_by(|a, b| a.0.cmp(&b.0)),
        SortDirection::Desc => keyed.sort_by(|a, b| b.0.cmp(&a.0)),
    }

    keyed.into_iter().map(|(_, record)| record).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::StatField;
    use crate::model::{SubscriberId, SubscriberStats};

    fn create_test_subscriber(id: &str, email: &str, total_received: Option<f64>) -> Subscriber {
        let mut sub = Subscriber::new(id, email, "active");
        sub.stats = total_received.map(|total_received| SubscriberStats {
            total_received,
            ..Default::default()
        });
        sub
    }

    fn ids(records: &[&Subscriber]) -> Vec<String> {
        records.iter().map(|r| r.id.to_string()).collect()
    }

    const RECEIVED: FieldPath = FieldPath::Stat(StatField::TotalReceived);

    #[test]
    fn test_sort_by_stat_both_directions() {
        let records = vec![
            create_test_subscriber("1", "a@x.com", Some(5.0)),
            create_test_subscriber("2", "b@x.com", Some(2.0)),
        ];
        let refs: Vec<&Subscriber> = records.iter().collect();

        let asc = sort_subscribers(&refs, RECEIVED, SortDirection::Asc);
        assert_eq!(ids(&asc), vec!["2", "1"]);

        let desc = sort_subscribers(&refs, RECEIVED, SortDirection::Desc);
        assert_eq!(ids(&desc), vec!["1", "2"]);
    }

    #[test]
    fn test_missing_stats_sort_as_zero() {
        let records = vec![
            create_test_subscriber("1", "a@x.com", Some(1.0)),
            create_test_subscriber("2", "b@x.com", None),
        ];
        let refs: Vec<&Subscriber> = records.iter().collect();

        let asc = sort_subscribers(&refs, RECEIVED, SortDirection::Asc);
        assert_eq!(ids(&asc), vec!["2", "1"]);
    }

    #[test]
    fn test_sort_is_stable_in_both_directions() {
        let records = vec![
            create_test_subscriber("1", "a@x.com", Some(3.0)),
            create_test_subscriber("2", "b@x.com", Some(3.0)),
            create_test_subscriber("3", "c@x.com", Some(1.0)),
            create_test_subscriber("4", "d@x.com", Some(3.0)),
        ];
        let refs: Vec<&Subscriber> = records.iter().collect();

        let asc = sort_subscribers(&refs, RECEIVED, SortDirection::Asc);
        assert_eq!(ids(&asc), vec!["3", "1", "2", "4"]);

        let desc = sort_subscribers(&refs, RECEIVED, SortDirection::Desc);
        assert_eq!(ids(&desc), vec!["1", "2", "4", "3"]);
    }

    #[test]
    fn test_sort_is_idempotent() {
        let records = vec![
            create_test_subscriber("1", "c@x.com", None),
            create_test_subscriber("2", "a@x.com", None),
            create_test_subscriber("3", "b@x.com", None),
        ];
        let refs: Vec<&Subscriber> = records.iter().collect();

        let once = sort_subscribers(&refs, FieldPath::Email, SortDirection::Desc);
        let twice = sort_subscribers(&once, FieldPath::Email, SortDirection::Desc);
        assert_eq!(ids(&once), ids(&twice));
        assert_eq!(ids(&once), vec!["1", "3", "2"]);
    }

    #[test]
    fn test_no_key_preserves_input_order() {
        let records = vec![
            create_test_subscriber("2", "b@x.com", None),
            create_test_subscriber("1", "a@x.com", None),
        ];
        let refs: Vec<&Subscriber> = records.iter().collect();

        let sorted = SortState::default().apply(&refs);
        assert_eq!(ids(&sorted), vec!["2", "1"]);
    }

    #[test]
    fn test_numeric_ids_sort_numerically() {
        let records: Vec<Subscriber> = [10u64, 9, 2]
            .into_iter()
            .map(|id| {
                let mut sub = create_test_subscriber("", "a@x.com", None);
                sub.id = SubscriberId::from(id);
                sub
            })
            .collect();
        let refs: Vec<&Subscriber> = records.iter().collect();

        let asc = sort_subscribers(&refs, FieldPath::Id, SortDirection::Asc);
        assert_eq!(ids(&asc), vec!["2", "9", "10"]);
    }

    #[test]
    fn test_sort_by_utm_data() {
        let mut a = create_test_subscriber("1", "a@x.com", None);
        a.utm_source = Some("twitter".to_string());
        let b = create_test_subscriber("2", "b@x.com", None);
        let mut c = create_test_subscriber("3", "c@x.com", None);
        c.utm_source = Some("google".to_string());
        c.utm_channel = Some("cpc".to_string());
        let records = vec![a, b, c];
        let refs: Vec<&Subscriber> = records.iter().collect();

        let sorted = sort_subscribers(&refs, FieldPath::UtmData, SortDirection::Asc);
        assert_eq!(ids(&sorted), vec!["2", "3", "1"]);
    }

    #[test]
    fn test_sort_by_toggles_direction() {
        let mut state = SortState::default();
        state.sort_by(FieldPath::Email);
        assert_eq!(state, SortState::new(FieldPath::Email, SortDirection::Asc));

        state.sort_by(FieldPath::Email);
        assert_eq!(state.direction, SortDirection::Desc);

        state.sort_by(FieldPath::Email);
        assert_eq!(state.direction, SortDirection::Asc);
    }

    #[test]
    fn test_sort_by_new_key_resets_to_asc() {
        let mut state = SortState::new(FieldPath::Email, SortDirection::Desc);
        state.sort_by(FieldPath::Status);
        assert_eq!(state, SortState::new(FieldPath::Status, SortDirection::Asc));
    }

    #[test]
    fn test_double_toggle_restores_order() {
        let records = vec![
            create_test_subscriber("1", "b@x.com", None),
            create_test_subscriber("2", "a@x.com", None),
            create_test_subscriber("3", "b@x.com", None),
        ];
        let refs: Vec<&Subscriber> = records.iter().collect();

        let mut state = SortState::default();
        state.sort_by(FieldPath::Email);
        let first = ids(&state.apply(&refs));

        state.sort_by(FieldPath::Email);
        state.sort_by(FieldPath::Email);
        assert_eq!(ids(&state.apply(&refs)), first);
    }

    #[test]
    fn test_indicator_for_active_key_only() {
        let state = SortState::new(FieldPath::Email, SortDirection::Desc);
        assert_eq!(state.indicator_for(FieldPath::Email), Some("↓"));
        assert_eq!(state.indicator_for(FieldPath::Status), None);
    }
}
