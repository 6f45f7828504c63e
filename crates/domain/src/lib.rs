//! Declarative form and table engines for the salon admin console.

#![forbid(unsafe_code)]

mod column;
mod display;
mod field;
mod form;
mod resource;
mod table;
mod working_hours;

pub use column::{ColumnDescriptor, DisplayKind, RowAction, RowPredicate, SortDirection};
pub use display::{
    CellDisplay, StatusTone, format_date_time, format_duration, format_time, stringify,
};
pub use field::{
    CompositeKind, FieldDescriptor, FieldKind, FieldOption, NumberRules, TextRules,
};
pub use form::{FieldErrorKind, FieldErrors, FormState, ValidationReport, error_message};
pub use resource::{ResourceKind, ResourceRoutes};
pub use table::{DEFAULT_PAGE_SIZE, SortState, TableActionEvent, TableSnapshot, TableView};
pub use working_hours::{DaySchedule, Weekday, WeeklyHours};
