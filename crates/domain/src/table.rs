use std::cmp::Ordering;
use std::collections::HashSet;

use bella_core::{AppError, AppResult};
use serde::Serialize;
use serde_json::Value;

use crate::column::{ColumnDescriptor, RowAction, SortDirection};
use crate::display::stringify;

/// Rows per page when a screen does not override it.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Active sort of a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortState {
    key: String,
    direction: SortDirection,
}

impl SortState {
    /// Returns the sorted column key.
    #[must_use]
    pub fn key(&self) -> &str {
        self.key.as_str()
    }

    /// Returns the sort direction.
    #[must_use]
    pub fn direction(&self) -> SortDirection {
        self.direction
    }
}

/// Derived page of a table over a borrowed row set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableSnapshot<'a> {
    /// Rows of the current page, in display order.
    pub page_rows: Vec<&'a Value>,
    /// Number of rows matching the search term.
    pub total_items: usize,
    /// Number of pages, at least one.
    pub total_pages: usize,
    /// Current page, one-based.
    pub page: usize,
}

/// Opaque event raised when a row action is clicked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableActionEvent {
    /// Action identifier, passed through unchanged.
    pub action_id: String,
    /// Row the action was clicked on.
    pub row: Value,
}

/// Search, sort and pagination state of one table.
///
/// The row dataset is owned by the caller and passed to every operation
/// that depends on it; the view never copies rows.
#[derive(Debug, Clone)]
pub struct TableView {
    columns: Vec<ColumnDescriptor>,
    actions: Vec<RowAction>,
    page_size: usize,
    search_term: String,
    sort: Option<SortState>,
    page: usize,
}

impl TableView {
    /// Creates a table view on page one with no search or sort.
    pub fn new(
        columns: Vec<ColumnDescriptor>,
        actions: Vec<RowAction>,
        page_size: usize,
    ) -> AppResult<Self> {
        if page_size == 0 {
            return Err(AppError::Configuration(
                "table page size must be at least one".to_owned(),
            ));
        }

        let mut seen_keys = HashSet::new();
        for column in &columns {
            if !seen_keys.insert(column.key()) {
                return Err(AppError::Configuration(format!(
                    "duplicate column key '{}' in table",
                    column.key()
                )));
            }
        }

        let mut seen_actions = HashSet::new();
        for action in &actions {
            if !seen_actions.insert(action.action_id()) {
                return Err(AppError::Configuration(format!(
                    "duplicate row action '{}' in table",
                    action.action_id()
                )));
            }
        }

        Ok(Self {
            columns,
            actions,
            page_size,
            search_term: String::new(),
            sort: None,
            page: 1,
        })
    }

    /// Returns the columns in display order.
    #[must_use]
    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    /// Returns the row actions.
    #[must_use]
    pub fn actions(&self) -> &[RowAction] {
        &self.actions
    }

    /// Returns the page size.
    #[must_use]
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Returns the current search term.
    #[must_use]
    pub fn search_term(&self) -> &str {
        self.search_term.as_str()
    }

    /// Returns the active sort.
    #[must_use]
    pub fn sort(&self) -> Option<&SortState> {
        self.sort.as_ref()
    }

    /// Returns the current page, one-based.
    #[must_use]
    pub fn page(&self) -> usize {
        self.page
    }

    /// Sets the search term and returns to page one.
    pub fn on_search(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
        self.page = 1;
    }

    /// Toggles sorting on a column and returns to page one.
    ///
    /// Clicking the active column flips the direction, a new column starts
    /// ascending. Unsortable columns are ignored.
    pub fn on_sort(&mut self, key: &str) -> AppResult<()> {
        let Some(column) = self.columns.iter().find(|column| column.key() == key) else {
            return Err(AppError::Configuration(format!(
                "table has no column with key '{key}'"
            )));
        };

        if !column.is_sortable() {
            return Ok(());
        }

        self.sort = Some(match self.sort.take() {
            Some(current) if current.key == key => SortState {
                key: current.key,
                direction: current.direction.toggled(),
            },
            _ => SortState {
                key: key.to_owned(),
                direction: SortDirection::Asc,
            },
        });
        self.page = 1;
        Ok(())
    }

    /// Moves by `delta` pages, staying within the available pages.
    pub fn on_page(&mut self, rows: &[Value], delta: i64) {
        let total_pages = self.total_pages(self.filtered(rows).len());
        let target = i64::try_from(self.page)
            .unwrap_or(i64::MAX)
            .saturating_add(delta);
        let last = i64::try_from(total_pages).unwrap_or(i64::MAX);

        self.page = usize::try_from(target.clamp(1, last)).unwrap_or(1);
    }

    /// Clamps the current page after the row set changed.
    pub fn sync_rows(&mut self, rows: &[Value]) {
        let total_pages = self.total_pages(self.filtered(rows).len());
        self.page = self.page.clamp(1, total_pages);
    }

    /// Filters, sorts and paginates the rows.
    #[must_use]
    pub fn derive<'a>(&self, rows: &'a [Value]) -> TableSnapshot<'a> {
        let mut matching = self.filtered(rows);

        if let Some(sort) = &self.sort
            && let Some(column) = self.columns.iter().find(|column| column.key() == sort.key)
        {
            matching.sort_by(|left, right| {
                let ordering = natural_order(column.resolve(left), column.resolve(right));
                match sort.direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                }
            });
        }

        let total_items = matching.len();
        let total_pages = self.total_pages(total_items);
        let page = self.page.clamp(1, total_pages);
        let page_rows = matching
            .into_iter()
            .skip((page - 1) * self.page_size)
            .take(self.page_size)
            .collect();

        TableSnapshot {
            page_rows,
            total_items,
            total_pages,
            page,
        }
    }

    /// Raises the event for a clicked row action.
    ///
    /// Returns `None` when the action is disabled for that row.
    pub fn dispatch_action(
        &self,
        action_id: &str,
        row: &Value,
    ) -> AppResult<Option<TableActionEvent>> {
        let Some(action) = self
            .actions
            .iter()
            .find(|action| action.action_id() == action_id)
        else {
            return Err(AppError::Configuration(format!(
                "table has no row action '{action_id}'"
            )));
        };

        if !action.is_enabled_for(row) {
            return Ok(None);
        }

        Ok(Some(TableActionEvent {
            action_id: action.action_id().to_owned(),
            row: row.clone(),
        }))
    }

    fn filtered<'a>(&self, rows: &'a [Value]) -> Vec<&'a Value> {
        let needle = self.search_term.trim().to_lowercase();
        if needle.is_empty() {
            return rows.iter().collect();
        }

        rows.iter()
            .filter(|row| {
                self.columns
                    .iter()
                    .any(|column| column.search_text(row).to_lowercase().contains(&needle))
            })
            .collect()
    }

    fn total_pages(&self, total_items: usize) -> usize {
        total_items.div_ceil(self.page_size).max(1)
    }
}

/// Numbers first in numeric order, then everything else as text.
fn natural_order(left: Option<&Value>, right: Option<&Value>) -> Ordering {
    match (numeric(left), numeric(right)) {
        (Some(left), Some(right)) => left.total_cmp(&right),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => stringify(left).cmp(&stringify(right)),
    }
}

fn numeric(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use serde_json::{Value, json};

    use std::cmp::Ordering;

    use super::{DEFAULT_PAGE_SIZE, TableView, natural_order};
    use crate::column::{ColumnDescriptor, RowAction, SortDirection};

    fn customer_table() -> TableView {
        TableView::new(
            vec![
                ColumnDescriptor::new("customerName", "Customer").unwrap_or_else(|_| unreachable!()),
                ColumnDescriptor::new("price", "Price").unwrap_or_else(|_| unreachable!()),
                ColumnDescriptor::new("notes", "Notes")
                    .unwrap_or_else(|_| unreachable!())
                    .unsortable(),
            ],
            vec![
                RowAction::new("view", "View").unwrap_or_else(|_| unreachable!()),
                RowAction::new("delete", "Delete")
                    .unwrap_or_else(|_| unreachable!())
                    .enabled_if(|row| row.get("locked") != Some(&Value::Bool(true))),
            ],
            DEFAULT_PAGE_SIZE,
        )
        .unwrap_or_else(|_| unreachable!())
    }

    fn rows(count: usize) -> Vec<Value> {
        (0..count)
            .map(|index| json!({"customerName": format!("Customer {index}"), "price": index}))
            .collect()
    }

    fn names(rows: &[&Value]) -> Vec<String> {
        rows.iter()
            .map(|row| {
                row.get("customerName")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_owned()
            })
            .collect()
    }

    #[test]
    fn duplicate_column_keys_are_rejected() {
        let result = TableView::new(
            vec![
                ColumnDescriptor::new("name", "Name").unwrap_or_else(|_| unreachable!()),
                ColumnDescriptor::new("name", "Again").unwrap_or_else(|_| unreachable!()),
            ],
            Vec::new(),
            10,
        );
        assert!(matches!(result, Err(bella_core::AppError::Configuration(_))));
    }

    #[test]
    fn zero_page_size_is_rejected() {
        assert!(TableView::new(Vec::new(), Vec::new(), 0).is_err());
    }

    #[test]
    fn paging_stops_at_the_last_page() {
        let rows = rows(25);
        let mut table = customer_table();

        let snapshot = table.derive(&rows);
        assert_eq!(snapshot.total_pages, 3);
        assert_eq!(snapshot.total_items, 25);

        table.on_page(&rows, 1);
        table.on_page(&rows, 1);
        assert_eq!(table.page(), 3);
        table.on_page(&rows, 1);
        assert_eq!(table.page(), 3);

        let snapshot = table.derive(&rows);
        assert_eq!(snapshot.page_rows.len(), 5);
        table.on_page(&rows, -10);
        assert_eq!(table.page(), 1);
    }

    #[test]
    fn empty_tables_have_one_page() {
        let table = customer_table();
        let snapshot = table.derive(&[]);
        assert_eq!(snapshot.total_pages, 1);
        assert_eq!(snapshot.page, 1);
        assert!(snapshot.page_rows.is_empty());
    }

    #[test]
    fn search_is_case_insensitive_substring_over_all_columns() {
        let rows = vec![
            json!({"customerName": "Emma Wilson", "price": 30}),
            json!({"customerName": "Jane Doe", "price": 40, "notes": "Prefers EMMA's chair"}),
            json!({"customerName": "Olivia Brown", "price": 50}),
        ];
        let mut table = customer_table();
        table.on_search("EMMA");

        let snapshot = table.derive(&rows);
        assert_eq!(names(&snapshot.page_rows), vec!["Emma Wilson", "Jane Doe"]);
    }

    #[test]
    fn search_resets_page_and_sort_flips_on_same_key() {
        let rows = rows(25);
        let mut table = customer_table();
        table.on_page(&rows, 2);
        table.on_search("customer");
        assert_eq!(table.page(), 1);

        assert!(table.on_sort("price").is_ok());
        assert_eq!(table.sort().map(|sort| sort.direction()), Some(SortDirection::Asc));
        assert!(table.on_sort("price").is_ok());
        assert_eq!(table.sort().map(|sort| sort.direction()), Some(SortDirection::Desc));
        assert!(table.on_sort("customerName").is_ok());
        assert_eq!(table.sort().map(|sort| sort.direction()), Some(SortDirection::Asc));
        assert_eq!(table.sort().map(|sort| sort.key()), Some("customerName"));
    }

    #[test]
    fn sort_uses_numeric_order_when_both_values_are_numbers() {
        let rows = vec![
            json!({"customerName": "a", "price": "100"}),
            json!({"customerName": "b", "price": 9}),
            json!({"customerName": "c", "price": "25"}),
        ];
        let mut table = customer_table();
        assert!(table.on_sort("price").is_ok());
        assert_eq!(names(&table.derive(&rows).page_rows), vec!["b", "c", "a"]);

        assert!(table.on_sort("price").is_ok());
        assert_eq!(names(&table.derive(&rows).page_rows), vec!["a", "c", "b"]);
    }

    #[test]
    fn mixed_columns_sort_numbers_before_text() {
        let rows = vec![
            json!({"customerName": "a", "price": 10}),
            json!({"customerName": "b", "price": "5a"}),
            json!({"customerName": "c", "price": "9"}),
            json!({"customerName": "d"}),
        ];
        let mut table = customer_table();
        assert!(table.on_sort("price").is_ok());
        assert_eq!(names(&table.derive(&rows).page_rows), vec!["c", "a", "d", "b"]);

        assert!(table.on_sort("price").is_ok());
        assert_eq!(names(&table.derive(&rows).page_rows), vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn unsortable_and_unknown_columns() {
        let mut table = customer_table();
        assert!(table.on_sort("notes").is_ok());
        assert!(table.sort().is_none());
        assert!(table.on_sort("missing").is_err());
    }

    #[test]
    fn dispatch_passes_action_and_row_through() {
        let table = customer_table();
        let row = json!({"customerName": "Emma", "locked": true});

        let event = table
            .dispatch_action("view", &row)
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(event.map(|event| event.action_id), Some("view".to_owned()));
        assert_eq!(table.dispatch_action("delete", &row).ok(), Some(None));
        assert!(table.dispatch_action("archive", &row).is_err());
    }

    #[test]
    fn sync_rows_clamps_after_data_shrinks() {
        let mut table = customer_table();
        let many = rows(25);
        table.on_page(&many, 2);
        assert_eq!(table.page(), 3);

        let few = rows(4);
        table.sync_rows(&few);
        assert_eq!(table.page(), 1);
    }

    #[derive(Debug, Clone)]
    enum Operation {
        Search(String),
        Sort(bool),
        Page(i64),
    }

    fn operation() -> impl Strategy<Value = Operation> {
        prop_oneof![
            "[a-z0-9 ]{0,3}".prop_map(Operation::Search),
            any::<bool>().prop_map(Operation::Sort),
            (-5_i64..5).prop_map(Operation::Page),
        ]
    }

    proptest! {
        #[test]
        fn page_stays_within_bounds(
            total in 0_usize..60,
            page_size in 1_usize..12,
            operations in proptest::collection::vec(operation(), 0..24),
        ) {
            let rows = rows(total);
            let mut table = TableView::new(
                vec![
                    ColumnDescriptor::new("customerName", "Customer").unwrap_or_else(|_| unreachable!()),
                    ColumnDescriptor::new("price", "Price").unwrap_or_else(|_| unreachable!()),
                ],
                Vec::new(),
                page_size,
            )
            .unwrap_or_else(|_| unreachable!());

            for operation in operations {
                match operation {
                    Operation::Search(term) => table.on_search(term),
                    Operation::Sort(by_price) => {
                        let key = if by_price { "price" } else { "customerName" };
                        prop_assert!(table.on_sort(key).is_ok());
                    }
                    Operation::Page(delta) => table.on_page(&rows, delta),
                }

                let snapshot = table.derive(&rows);
                let upper = snapshot.total_items.div_ceil(page_size).max(1);
                prop_assert!(table.page() >= 1);
                prop_assert!(table.page() <= upper);
                prop_assert_eq!(snapshot.page, table.page());
            }
        }

        #[test]
        fn cell_ordering_is_transitive(
            values in proptest::collection::vec(
                prop_oneof![
                    (0_i64..200).prop_map(|number| json!(number)),
                    "[0-9]{1,3}[a-z]?".prop_map(Value::String),
                    Just(Value::Null),
                ],
                3,
            ),
        ) {
            let (first, second, third) = (&values[0], &values[1], &values[2]);
            if natural_order(Some(first), Some(second)) != Ordering::Greater
                && natural_order(Some(second), Some(third)) != Ordering::Greater
            {
                prop_assert_ne!(
                    natural_order(Some(first), Some(third)),
                    Ordering::Greater
                );
            }
        }

        #[test]
        fn sorting_equal_values_keeps_original_order(
            total in 0_usize..40,
            descending in any::<bool>(),
        ) {
            let rows = (0..total)
                .map(|index| json!({"customerName": format!("Customer {index}"), "price": 15}))
                .collect::<Vec<_>>();
            let mut table = TableView::new(
                vec![
                    ColumnDescriptor::new("customerName", "Customer").unwrap_or_else(|_| unreachable!()),
                    ColumnDescriptor::new("price", "Price").unwrap_or_else(|_| unreachable!()),
                ],
                Vec::new(),
                100,
            )
            .unwrap_or_else(|_| unreachable!());

            prop_assert!(table.on_sort("price").is_ok());
            if descending {
                prop_assert!(table.on_sort("price").is_ok());
            }

            let snapshot = table.derive(&rows);
            let expected = rows.iter().collect::<Vec<_>>();
            prop_assert_eq!(snapshot.page_rows, expected);
        }
    }
}
