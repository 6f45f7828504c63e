use serde_json::{Map, Value, json};

use bella_core::AppResult;
use bella_domain::{
    ColumnDescriptor, DisplayKind, FieldDescriptor, FieldOption, NumberRules, ResourceKind,
};

use super::{ResourceDefinition, decimal, present_or, row_id};

/// Bookable services screen.
#[derive(Debug, Clone, Copy, Default)]
pub struct ServicesDefinition;

impl ResourceDefinition for ServicesDefinition {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Services
    }

    fn fields(&self) -> AppResult<Vec<FieldDescriptor>> {
        Ok(vec![
            FieldDescriptor::text("name", "Name")?.required(),
            FieldDescriptor::number("price", "Price", NumberRules::default().with_min(0.0))?
                .required(),
            FieldDescriptor::number(
                "duration",
                "Duration",
                NumberRules::default().with_min(0.0).with_step(0.01),
            )?
            .required(),
            FieldDescriptor::select(
                "isActive",
                "Status",
                vec![
                    FieldOption::new("false", "InActive"),
                    FieldOption::new("true", "Active"),
                ],
            )?
            .required()
            .with_default("true"),
            FieldDescriptor::textarea("description", "Description", 3)?
                .with_placeholder("Additional notes or special requests"),
        ])
    }

    fn columns(&self) -> AppResult<Vec<ColumnDescriptor>> {
        Ok(vec![
            ColumnDescriptor::new("name", "Name")?,
            ColumnDescriptor::new("price", "Price")?,
            ColumnDescriptor::new("duration", "Time")?.with_display(DisplayKind::Duration),
            ColumnDescriptor::new("description", "Description")?,
            ColumnDescriptor::new("status", "Status")?.with_display(DisplayKind::Status),
        ])
    }

    fn project_row(&self, record: &Value) -> Value {
        json!({
            "id": row_id(record),
            "name": present_or(record, &["name"], "N/A"),
            "price": present_or(record, &["price"], Value::Null),
            "duration": decimal(record, "duration"),
            "description": present_or(record, &["description"], ""),
            "isActive": present_or(record, &["isActive"], Value::Null),
            "status": service_status(record),
        })
    }

    fn form_values(&self, record: &Value) -> Map<String, Value> {
        let mut values = Map::new();
        values.insert("name".to_owned(), present_or(record, &["name"], ""));
        values.insert("price".to_owned(), present_or(record, &["price"], Value::Null));
        values.insert("duration".to_owned(), decimal(record, "duration"));
        values.insert(
            "description".to_owned(),
            present_or(record, &["description"], ""),
        );
        let is_active = match record.get("isActive") {
            Some(Value::Bool(flag)) => Value::String(flag.to_string()),
            Some(value) if !value.is_null() => value.clone(),
            _ => Value::String("true".to_owned()),
        };
        values.insert("isActive".to_owned(), is_active);
        values
    }
}

fn service_status(record: &Value) -> Value {
    if let Some(status) = record.get("status").filter(|status| status.is_string()) {
        return status.clone();
    }

    match record.get("isActive") {
        Some(Value::Bool(true)) => Value::from("active"),
        Some(Value::Bool(false)) => Value::from("inactive"),
        _ => Value::from("pending"),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::ServicesDefinition;
    use crate::resource_definitions::ResourceDefinition;

    #[test]
    fn decimal_durations_are_unwrapped() {
        let record = json!({
            "_id": "sv1",
            "name": "Haircut",
            "price": 25,
            "duration": {"$numberDecimal": "1.30"},
            "isActive": true
        });

        let row = ServicesDefinition.project_row(&record);
        assert_eq!(row["duration"], json!("1.30"));
        assert_eq!(row["status"], json!("active"));

        let values = ServicesDefinition.form_values(&record);
        assert_eq!(values.get("duration"), Some(&json!("1.30")));
        assert_eq!(values.get("isActive"), Some(&json!("true")));
    }
}
