//! Column visibility registry
//!
//! [`COLUMNS`] is the authoritative left-to-right order. Visibility only hides
//! or shows entries; it never reorders them. Headers and cells are both built
//! from [`ColumnVisibility::visible_columns`] so they can't drift apart.

use crate::error::EngineError;
use crate::field::{FieldPath, StatField};
use crate::model::Subscriber;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnId {
    Email,
    Status,
    SourceChannel,
    Posts,
    Opens,
    Clicks,
    TotalClicks,
    UniqueClicks,
    DaysToUnsubscribe,
}

impl ColumnId {
    pub fn as_str(self) -> &'static str {
        match self {
            ColumnId::Email => "email",
            ColumnId::Status => "status",
            ColumnId::SourceChannel => "source_channel",
            ColumnId::Posts => "posts",
            ColumnId::Opens => "opens",
            ColumnId::Clicks => "clicks",
            ColumnId::TotalClicks => "total_clicks",
            ColumnId::UniqueClicks => "unique_clicks",
            ColumnId::DaysToUnsubscribe => "days_to_unsubscribe",
        }
    }

    pub fn column(self) -> &'static Column {
        // Variants are declared in registry order.
        &COLUMNS[self as usize]
    }
}

impl FromStr for ColumnId {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        COLUMNS
            .iter()
            .map(|c| c.id)
            .find(|id| id.as_str() == s)
            .ok_or_else(|| {
                let valid: Vec<&str> = COLUMNS.iter().map(|c| c.id.as_str()).collect();
                EngineError::UnknownColumn(s.to_string(), valid.join(", "))
            })
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a column turns a record into display text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellFormat {
    Plain,
    Badge,
    Count,
    Percent,
    Days,
}

/// Registry entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub id: ColumnId,
    pub label: &'static str,
    pub field: FieldPath,
    /// Relative width in percent
    pub width: u8,
    pub format: CellFormat,
    pub visible_by_default: bool,
}

impl Column {
    const fn new(
        id: ColumnId,
        label: &'static str,
        field: FieldPath,
        width: u8,
        format: CellFormat,
    ) -> Self {
        Self {
            id,
            label,
            field,
            width,
            format,
            visible_by_default: true,
        }
    }

    const fn hidden(mut self) -> Self {
        self.visible_by_default = false;
        self
    }

    /// Extract and format this column's cell for `record`.
    pub fn render(&self, record: &Subscriber) -> String {
        match (self.format, self.field) {
            (CellFormat::Badge, _) => StatusBadge::for_status(&record.status).to_string(),
            (CellFormat::Count, FieldPath::Stat(stat)) => format_count(stat.extract(record)),
            (CellFormat::Percent, FieldPath::Stat(stat)) => format_percent(stat.extract(record)),
            (CellFormat::Days, _) => format_days(record.days_to_unsubscribe),
            (_, FieldPath::UtmData) => record.group_key(),
            (_, FieldPath::Email) => record.email.clone(),
            (_, FieldPath::Status) => record.status.clone(),
            (_, FieldPath::Id) => record.id.to_string(),
            (_, FieldPath::Stat(stat)) => format_count(stat.extract(record)),
            (_, FieldPath::DaysToUnsubscribe) => format_days(record.days_to_unsubscribe),
        }
    }
}

/// Fixed column registry, in display order
pub static COLUMNS: [Column; 9] = [
    Column::new(ColumnId::Email, "Email", FieldPath::Email, 20, CellFormat::Plain),
    Column::new(ColumnId::Status, "Status", FieldPath::Status, 10, CellFormat::Badge),
    Column::new(
        ColumnId::SourceChannel,
        "Source / Channel",
        FieldPath::UtmData,
        20,
        CellFormat::Plain,
    ),
    Column::new(
        ColumnId::Posts,
        "Posts",
        FieldPath::Stat(StatField::TotalReceived),
        10,
        CellFormat::Count,
    ),
    Column::new(
        ColumnId::Opens,
        "Open Rate",
        FieldPath::Stat(StatField::OpenRate),
        10,
        CellFormat::Percent,
    ),
    Column::new(
        ColumnId::Clicks,
        "Click Rate",
        FieldPath::Stat(StatField::ClickRate),
        10,
        CellFormat::Percent,
    ),
    Column::new(
        ColumnId::TotalClicks,
        "Total Clicks",
        FieldPath::Stat(StatField::TotalClicked),
        10,
        CellFormat::Count,
    ),
    Column::new(
        ColumnId::UniqueClicks,
        "Unique Clicks",
        FieldPath::Stat(StatField::TotalUniqueClicked),
        10,
        CellFormat::Count,
    ),
    Column::new(
        ColumnId::DaysToUnsubscribe,
        "Days to Unsubscribe",
        FieldPath::DaysToUnsubscribe,
        10,
        CellFormat::Days,
    )
    .hidden(),
];

/// Two-state status badge; anything other than `"active"` is inactive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusBadge {
    Active,
    Inactive,
}

impl StatusBadge {
    pub fn for_status(status: &str) -> Self {
        if status == "active" {
            StatusBadge::Active
        } else {
            StatusBadge::Inactive
        }
    }
}

impl fmt::Display for StatusBadge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StatusBadge::Active => "active",
            StatusBadge::Inactive => "inactive",
        })
    }
}

pub fn format_count(value: f64) -> String {
    format!("{value}")
}

pub fn format_percent(value: f64) -> String {
    format!("{value:.1}%")
}

pub fn format_days(days: Option<f64>) -> String {
    match days {
        Some(days) => format!("{days} days"),
        None => "-".to_string(),
    }
}

/// Column id -> visible. Missing entries fall back to the registry default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnVisibility(BTreeMap<ColumnId, bool>);

impl Default for ColumnVisibility {
    fn default() -> Self {
        Self(
            COLUMNS
                .iter()
                .map(|c| (c.id, c.visible_by_default))
                .collect(),
        )
    }
}

impl ColumnVisibility {
    pub fn is_visible(&self, id: ColumnId) -> bool {
        self.0
            .get(&id)
            .copied()
            .unwrap_or_else(|| id.column().visible_by_default)
    }

    /// Flip one entry; order is untouched.
    pub fn toggle(&mut self, id: ColumnId) {
        let visible = self.is_visible(id);
        self.0.insert(id, !visible);
    }

    pub fn set(&mut self, id: ColumnId, visible: bool) {
        self.0.insert(id, visible);
    }

    /// Visible columns in registry order
    pub fn visible_columns(&self) -> Vec<&'static Column> {
        COLUMNS.iter().filter(|c| self.is_visible(c.id)).collect()
    }

    /// One row of display cells, aligned with [`Self::visible_columns`].
    pub fn project(&self, record: &Subscriber) -> Vec<String> {
        self.visible_columns()
            .into_iter()
            .map(|c| c.render(record))
            .collect()
    }
}
