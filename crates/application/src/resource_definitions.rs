mod appointments;
mod categories;
mod inventory;
mod services;
mod shifts;
mod staff;

use std::sync::Arc;

use serde_json::{Map, Value};

use bella_core::{AppError, AppResult, RecordId};
use bella_domain::{
    ColumnDescriptor, DEFAULT_PAGE_SIZE, FieldDescriptor, FieldOption, ResourceKind, RowAction,
    stringify,
};

pub use appointments::AppointmentsDefinition;
pub use categories::CategoriesDefinition;
pub use inventory::InventoryDefinition;
pub use services::ServicesDefinition;
pub use shifts::ShiftsDefinition;
pub use staff::StaffDefinition;

/// Row action opening the read-only detail modal.
pub const VIEW_ACTION: &str = "view";
/// Row action opening the edit form.
pub const EDIT_ACTION: &str = "edit";
/// Row action opening the delete confirmation.
pub const DELETE_ACTION: &str = "delete";

/// Key under which projected rows carry the record identifier.
pub const ROW_ID_KEY: &str = "id";

/// Declares that a select field is filled from another resource's records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionSource {
    field: &'static str,
    resource: ResourceKind,
    value_key: &'static str,
    label_key: &'static str,
}

impl OptionSource {
    /// Fills `field` from `resource`, using `_id` as value and `name` as label.
    #[must_use]
    pub fn new(field: &'static str, resource: ResourceKind) -> Self {
        Self {
            field,
            resource,
            value_key: "_id",
            label_key: "name",
        }
    }

    /// Returns the select field name.
    #[must_use]
    pub fn field(&self) -> &'static str {
        self.field
    }

    /// Returns the resource listed for options.
    #[must_use]
    pub fn resource(&self) -> ResourceKind {
        self.resource
    }

    /// Maps listed records to options, skipping records without a value.
    #[must_use]
    pub fn options_from(&self, records: &[Value]) -> Vec<FieldOption> {
        records
            .iter()
            .filter_map(|record| {
                let value = record
                    .get(self.value_key)
                    .or_else(|| record.get(ROW_ID_KEY))
                    .filter(|value| !value.is_null())?;
                let label = stringify(record.get(self.label_key));
                Some(FieldOption::new(value.clone(), label))
            })
            .collect()
    }
}

/// Static configuration of one admin screen.
pub trait ResourceDefinition: Send + Sync {
    /// Returns the administered resource.
    fn kind(&self) -> ResourceKind;

    /// Returns the create/edit form fields.
    fn fields(&self) -> AppResult<Vec<FieldDescriptor>>;

    /// Returns the table columns.
    fn columns(&self) -> AppResult<Vec<ColumnDescriptor>>;

    /// Returns the row actions.
    fn actions(&self) -> AppResult<Vec<RowAction>> {
        standard_actions()
    }

    /// Returns rows per table page.
    fn page_size(&self) -> usize {
        DEFAULT_PAGE_SIZE
    }

    /// Flattens an API record into a table row. The row must carry the
    /// record identifier under [`ROW_ID_KEY`].
    fn project_row(&self, record: &Value) -> Value;

    /// Maps an API record to edit form values.
    fn form_values(&self, record: &Value) -> Map<String, Value>;

    /// Returns the select fields filled from other resources.
    fn option_sources(&self) -> Vec<OptionSource> {
        Vec::new()
    }

    /// Returns the identifier of an API record or projected row.
    fn record_id(&self, record: &Value) -> Option<RecordId> {
        ["_id", ROW_ID_KEY]
            .into_iter()
            .filter_map(|key| record.get(key))
            .find_map(|value| match value {
                Value::String(text) => RecordId::new(text.as_str()).ok(),
                Value::Number(number) => RecordId::new(number.to_string()).ok(),
                _ => None,
            })
    }
}

/// Returns the screen configuration of a resource.
pub fn definition_for(kind: ResourceKind) -> AppResult<Arc<dyn ResourceDefinition>> {
    match kind {
        ResourceKind::Appointments => Ok(Arc::new(AppointmentsDefinition)),
        ResourceKind::Shifts => Ok(Arc::new(ShiftsDefinition)),
        ResourceKind::Staff => Ok(Arc::new(StaffDefinition)),
        ResourceKind::Services => Ok(Arc::new(ServicesDefinition)),
        ResourceKind::Inventory => Ok(Arc::new(InventoryDefinition)),
        ResourceKind::Categories => Ok(Arc::new(CategoriesDefinition)),
        ResourceKind::Users => Err(AppError::Configuration(
            "users are listed for options only and have no admin screen".to_owned(),
        )),
    }
}

fn standard_actions() -> AppResult<Vec<RowAction>> {
    Ok(vec![
        RowAction::new(VIEW_ACTION, "View")?.with_icon("eye"),
        RowAction::new(EDIT_ACTION, "Edit")?.with_icon("edit"),
        RowAction::new(DELETE_ACTION, "Delete")?.with_icon("delete"),
    ])
}

fn row_id(record: &Value) -> Value {
    record
        .get("_id")
        .or_else(|| record.get(ROW_ID_KEY))
        .cloned()
        .unwrap_or(Value::Null)
}

/// First non-empty value among `keys`.
fn first_present(record: &Value, keys: &[&str]) -> Option<Value> {
    keys.iter()
        .filter_map(|key| record.get(*key))
        .find(|value| !is_blank(value))
        .cloned()
}

fn present_or(record: &Value, keys: &[&str], fallback: impl Into<Value>) -> Value {
    first_present(record, keys).unwrap_or_else(|| fallback.into())
}

/// Name of a populated reference such as `staffId: {_id, name}`.
fn reference_name(record: &Value, key: &str) -> Option<Value> {
    record
        .get(key)
        .and_then(|reference| reference.get("name"))
        .filter(|value| !is_blank(value))
        .cloned()
}

/// Identifier of a reference that may or may not be populated.
fn reference_id(record: &Value, key: &str) -> Value {
    match record.get(key) {
        Some(Value::Object(reference)) => reference.get("_id").cloned().unwrap_or_default(),
        Some(value) if !value.is_null() => value.clone(),
        _ => Value::String(String::new()),
    }
}

/// Mongo decimals arrive as `{"$numberDecimal": "1.30"}`.
fn decimal(record: &Value, key: &str) -> Value {
    match record.get(key) {
        Some(Value::Object(decimal)) => decimal.get("$numberDecimal").cloned().unwrap_or_default(),
        Some(value) => value.clone(),
        None => Value::Null,
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.trim().is_empty(),
        _ => false,
    }
}
