use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use bella_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::display::{
    CellDisplay, StatusTone, format_date_time, format_duration, format_time, stringify,
};

/// Sort direction of a table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    /// Ascending order.
    Asc,
    /// Descending order.
    Desc,
}

impl SortDirection {
    /// Returns the opposite direction.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// How a column renders its raw value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayKind {
    /// Raw text.
    Text,
    /// Date and time of day.
    Date,
    /// Time of day.
    Time,
    /// Status badge.
    Status,
    /// Service duration.
    Duration,
    /// Rendered by the consumer.
    Custom,
}

/// Declarative description of one table column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    key: NonEmptyString,
    label: String,
    display_kind: DisplayKind,
    sortable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    width: Option<String>,
}

impl ColumnDescriptor {
    /// Creates a sortable text column.
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> AppResult<Self> {
        let key = NonEmptyString::new(key)
            .map_err(|_| AppError::Configuration("column keys must not be empty".to_owned()))?;

        Ok(Self {
            key,
            label: label.into(),
            display_kind: DisplayKind::Text,
            sortable: true,
            width: None,
        })
    }

    /// Sets the display kind.
    #[must_use]
    pub fn with_display(mut self, display_kind: DisplayKind) -> Self {
        self.display_kind = display_kind;
        self
    }

    /// Sets the layout width hint.
    #[must_use]
    pub fn with_width(mut self, width: impl Into<String>) -> Self {
        self.width = Some(width.into());
        self
    }

    /// Excludes the column from header sorting.
    #[must_use]
    pub fn unsortable(mut self) -> Self {
        self.sortable = false;
        self
    }

    /// Returns the row path, dot-separated for nested records.
    #[must_use]
    pub fn key(&self) -> &str {
        self.key.as_str()
    }

    /// Returns the header label.
    #[must_use]
    pub fn label(&self) -> &str {
        self.label.as_str()
    }

    /// Returns the display kind.
    #[must_use]
    pub fn display_kind(&self) -> DisplayKind {
        self.display_kind
    }

    /// Returns whether the header toggles sorting.
    #[must_use]
    pub fn is_sortable(&self) -> bool {
        self.sortable
    }

    /// Returns the layout width hint.
    #[must_use]
    pub fn width(&self) -> Option<&str> {
        self.width.as_deref()
    }

    /// Resolves the column key against a row. Missing paths resolve to `None`.
    #[must_use]
    pub fn resolve<'a>(&self, row: &'a Value) -> Option<&'a Value> {
        if let Some(value) = row.get(self.key.as_str()) {
            return Some(value);
        }

        self.key
            .as_str()
            .split('.')
            .try_fold(row, |current, segment| current.get(segment))
    }

    /// Returns the stringified value used for search.
    #[must_use]
    pub fn search_text(&self, row: &Value) -> String {
        stringify(self.resolve(row))
    }

    /// Renders the cell for a row according to the display kind.
    #[must_use]
    pub fn format_cell(&self, row: &Value) -> CellDisplay {
        let value = self.resolve(row);
        match self.display_kind {
            DisplayKind::Text | DisplayKind::Custom => CellDisplay::plain(stringify(value)),
            DisplayKind::Date => CellDisplay::plain(format_date_time(value)),
            DisplayKind::Time => CellDisplay::plain(format_time(value)),
            DisplayKind::Duration => CellDisplay::plain(format_duration(value)),
            DisplayKind::Status => {
                let text = stringify(value);
                let tone = StatusTone::for_status(text.as_str());
                CellDisplay {
                    text,
                    tone: Some(tone),
                }
            }
        }
    }
}

/// Predicate deciding whether a row action is enabled for a row.
pub type RowPredicate = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// Button attached to every table row.
#[derive(Clone)]
pub struct RowAction {
    label: String,
    icon: Option<String>,
    action_id: NonEmptyString,
    enabled_if: Option<RowPredicate>,
}

impl RowAction {
    /// Creates an always-enabled action.
    pub fn new(action_id: impl Into<String>, label: impl Into<String>) -> AppResult<Self> {
        let action_id = NonEmptyString::new(action_id)
            .map_err(|_| AppError::Configuration("action ids must not be empty".to_owned()))?;

        Ok(Self {
            label: label.into(),
            icon: None,
            action_id,
            enabled_if: None,
        })
    }

    /// Sets the icon name.
    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Restricts the action to rows matching a predicate.
    #[must_use]
    pub fn enabled_if(
        mut self,
        predicate: impl Fn(&Value) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.enabled_if = Some(Arc::new(predicate));
        self
    }

    /// Returns the button label.
    #[must_use]
    pub fn label(&self) -> &str {
        self.label.as_str()
    }

    /// Returns the icon name.
    #[must_use]
    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    /// Returns the opaque action identifier.
    #[must_use]
    pub fn action_id(&self) -> &str {
        self.action_id.as_str()
    }

    /// Returns whether the action applies to a row.
    #[must_use]
    pub fn is_enabled_for(&self, row: &Value) -> bool {
        self.enabled_if
            .as_ref()
            .is_none_or(|predicate| predicate(row))
    }
}

impl Debug for RowAction {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("RowAction")
            .field("label", &self.label)
            .field("icon", &self.icon)
            .field("action_id", &self.action_id)
            .field("conditional", &self.enabled_if.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{ColumnDescriptor, DisplayKind, RowAction, SortDirection};
    use crate::display::StatusTone;

    #[test]
    fn keys_resolve_nested_paths_and_missing_values() {
        let column = ColumnDescriptor::new("customer.name", "Customer")
            .unwrap_or_else(|_| unreachable!());
        let row = json!({"customer": {"name": "Emma Wilson"}});

        assert_eq!(column.search_text(&row), "Emma Wilson");
        assert_eq!(column.search_text(&json!({"customer": null})), "");
        assert_eq!(column.search_text(&json!({})), "");
    }

    #[test]
    fn flat_keys_with_dots_win_over_nested_lookup() {
        let column = ColumnDescriptor::new("a.b", "A").unwrap_or_else(|_| unreachable!());
        let row = json!({"a.b": "flat", "a": {"b": "nested"}});
        assert_eq!(column.search_text(&row), "flat");
    }

    #[test]
    fn status_cells_carry_a_tone() {
        let column = ColumnDescriptor::new("status", "Status")
            .unwrap_or_else(|_| unreachable!())
            .with_display(DisplayKind::Status);
        let cell = column.format_cell(&json!({"status": "cancelled"}));

        assert_eq!(cell.text, "cancelled");
        assert_eq!(cell.tone, Some(StatusTone::Danger));
    }

    #[test]
    fn duration_cells_use_hour_minute_text() {
        let column = ColumnDescriptor::new("duration", "Duration")
            .unwrap_or_else(|_| unreachable!())
            .with_display(DisplayKind::Duration);
        assert_eq!(column.format_cell(&json!({"duration": "1.15"})).text, "1 hr 15 mins");
    }

    #[test]
    fn conditional_actions_check_the_row() {
        let action = RowAction::new("delete", "Delete")
            .unwrap_or_else(|_| unreachable!())
            .with_icon("trash")
            .enabled_if(|row| row.get("status").and_then(|value| value.as_str()) != Some("completed"));

        assert!(action.is_enabled_for(&json!({"status": "pending"})));
        assert!(!action.is_enabled_for(&json!({"status": "completed"})));
        assert_eq!(action.icon(), Some("trash"));
    }

    #[test]
    fn sort_direction_toggles() {
        assert_eq!(SortDirection::Asc.toggled(), SortDirection::Desc);
        assert_eq!(SortDirection::Desc.toggled(), SortDirection::Asc);
    }
}
