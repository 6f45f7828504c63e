use serde_json::{Map, Value, json};

use bella_core::AppResult;
use bella_domain::{ColumnDescriptor, FieldDescriptor, ResourceKind};

use super::{ResourceDefinition, present_or, row_id};

/// Inventory categories screen.
#[derive(Debug, Clone, Copy, Default)]
pub struct CategoriesDefinition;

impl ResourceDefinition for CategoriesDefinition {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Categories
    }

    fn fields(&self) -> AppResult<Vec<FieldDescriptor>> {
        Ok(vec![
            FieldDescriptor::text("name", "Name")?.required(),
            FieldDescriptor::textarea("description", "Description", 3)?,
        ])
    }

    fn columns(&self) -> AppResult<Vec<ColumnDescriptor>> {
        Ok(vec![
            ColumnDescriptor::new("name", "Name")?,
            ColumnDescriptor::new("description", "Description")?.unsortable(),
        ])
    }

    fn project_row(&self, record: &Value) -> Value {
        json!({
            "id": row_id(record),
            "name": present_or(record, &["name"], "N/A"),
            "description": present_or(record, &["description"], ""),
        })
    }

    fn form_values(&self, record: &Value) -> Map<String, Value> {
        let mut values = Map::new();
        values.insert("name".to_owned(), present_or(record, &["name"], ""));
        values.insert(
            "description".to_owned(),
            present_or(record, &["description"], ""),
        );
        values
    }
}
