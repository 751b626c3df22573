//! Filter engine
//!
//! Reduces the record set to the rows matching the status predicate AND the
//! source/channel predicate. Order is preserved.

use crate::error::EngineError;
use crate::model::Subscriber;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

/// Sentinel selecting every source/channel group.
pub const ALL_SOURCES: &str = "all";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Inactive,
}

impl StatusFilter {
    pub fn matches(self, record: &Subscriber) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Active => record.is_active(),
            StatusFilter::Inactive => !record.is_active(),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(StatusFilter::All),
            "active" => Ok(StatusFilter::Active),
            "inactive" => Ok(StatusFilter::Inactive),
            other => Err(EngineError::InvalidStatusFilter(other.to_string())),
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StatusFilter::All => "all",
            StatusFilter::Active => "active",
            StatusFilter::Inactive => "inactive",
        })
    }
}

/// Selected source/channel groups.
///
/// `Only` is never empty: removing the last key collapses back to `All`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub enum SourceChannelSelection {
    #[default]
    All,
    Only(BTreeSet<String>),
}

impl SourceChannelSelection {
    /// Multi-select toggle. `"all"` clears any specific selection; a specific
    /// key drops `"all"`.
    pub fn toggle(&mut self, key: &str) {
        if key == ALL_SOURCES {
            *self = SourceChannelSelection::All;
            return;
        }

        match self {
            SourceChannelSelection::All => {
                *self = SourceChannelSelection::Only(BTreeSet::from([key.to_string()]));
            }
            SourceChannelSelection::Only(keys) => {
                if !keys.remove(key) {
                    keys.insert(key.to_string());
                }
                if keys.is_empty() {
                    *self = SourceChannelSelection::All;
                }
            }
        }
    }

    /// Single-select: replace the selection with exactly `key`.
    pub fn select_only(&mut self, key: &str) {
        *self = if key == ALL_SOURCES {
            SourceChannelSelection::All
        } else {
            SourceChannelSelection::Only(BTreeSet::from([key.to_string()]))
        };
    }

    pub fn matches(&self, group_key: &str) -> bool {
        match self {
            SourceChannelSelection::All => true,
            SourceChannelSelection::Only(keys) => keys.contains(group_key),
        }
    }

    /// Whether the option labelled `key` is checked in the selector.
    pub fn is_selected(&self, key: &str) -> bool {
        match self {
            SourceChannelSelection::All => key == ALL_SOURCES,
            SourceChannelSelection::Only(keys) => keys.contains(key),
        }
    }

    /// Selector button label
    pub fn label(&self) -> String {
        match self {
            SourceChannelSelection::All => "All Sources".to_string(),
            SourceChannelSelection::Only(keys) => format!("{} selected", keys.len()),
        }
    }
}

impl From<Vec<String>> for SourceChannelSelection {
    fn from(keys: Vec<String>) -> Self {
        if keys.iter().any(|k| k == ALL_SOURCES) {
            return SourceChannelSelection::All;
        }
        let keys: BTreeSet<String> = keys.into_iter().collect();
        if keys.is_empty() {
            SourceChannelSelection::All
        } else {
            SourceChannelSelection::Only(keys)
        }
    }
}

impl From<SourceChannelSelection> for Vec<String> {
    fn from(selection: SourceChannelSelection) -> Self {
        match selection {
            SourceChannelSelection::All => vec![ALL_SOURCES.to_string()],
            SourceChannelSelection::Only(keys) => keys.into_iter().collect(),
        }
    }
}

/// Combined filter state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    pub status: StatusFilter,
    pub source_channels: SourceChannelSelection,
}

impl FilterState {
    pub fn matches(&self, record: &Subscriber) -> bool {
        self.status.matches(record) && self.source_channels.matches(&record.group_key())
    }
}

/// Records matching `state`, in input order.
pub fn filter_subscribers<'a>(records: &'a [Subscriber], state: &FilterState) -> Vec<&'a Subscriber> {
    records.iter().filter(|r| state.matches(r)).collect()
}

/// Selector options: `"all"` followed by every distinct group key, sorted.
pub fn source_channel_options(records: &[Subscriber]) -> Vec<String> {
    let unique: BTreeSet<String> = records.iter().map(Subscriber::group_key).collect();
    std::iter::once(ALL_SOURCES.to_string())
        .chain(unique)
        .collect()
}

/// Number of records per group key, sorted by key.
pub fn source_channel_counts(records: &[Subscriber]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for record in records {
        *counts.entry(record.group_key()).or_insert(0) += 1;
    }
    counts
}
