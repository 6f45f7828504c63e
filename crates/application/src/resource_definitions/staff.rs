use serde_json::{Map, Value, json};

use bella_core::AppResult;
use bella_domain::{
    ColumnDescriptor, CompositeKind, DisplayKind, FieldDescriptor, FieldKind, FieldOption,
    ResourceKind, TextRules,
};

use super::{OptionSource, ResourceDefinition, present_or, reference_id, row_id};

/// Salon staff screen.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaffDefinition;

impl ResourceDefinition for StaffDefinition {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Staff
    }

    fn fields(&self) -> AppResult<Vec<FieldDescriptor>> {
        Ok(vec![
            FieldDescriptor::text("name", "Name")?.required(),
            FieldDescriptor::email("email", "Email")?.required(),
            FieldDescriptor::new("phone", "Phone", FieldKind::Tel(TextRules::default()))?
                .required(),
            FieldDescriptor::select("serviceId", "Service", Vec::new())?
                .required()
                .with_placeholder("Select Service"),
            FieldDescriptor::text("experience", "Experience")?,
            FieldDescriptor::select(
                "status",
                "Status",
                vec![
                    FieldOption::new("Active", "Active"),
                    FieldOption::new("Inactive", "Inactive"),
                ],
            )?
            .required()
            .with_default("Active"),
            FieldDescriptor::new(
                "workingHours",
                "Working Hours",
                FieldKind::Composite {
                    shape: CompositeKind::WeeklyHours,
                },
            )?
            .required(),
        ])
    }

    fn columns(&self) -> AppResult<Vec<ColumnDescriptor>> {
        Ok(vec![
            ColumnDescriptor::new("name", "Name")?,
            ColumnDescriptor::new("email", "Email")?,
            ColumnDescriptor::new("phone", "Phone")?,
            ColumnDescriptor::new("experience", "Experience")?,
            ColumnDescriptor::new("rating", "Rating")?,
            ColumnDescriptor::new("status", "Status")?.with_display(DisplayKind::Status),
        ])
    }

    fn project_row(&self, record: &Value) -> Value {
        json!({
            "id": row_id(record),
            "name": present_or(record, &["name"], "N/A"),
            "experience": present_or(record, &["experience"], 0),
            "rating": present_or(record, &["rating"], 0),
            "status": present_or(record, &["status"], "pending"),
            "phone": present_or(record, &["phone"], ""),
            "email": present_or(record, &["email"], ""),
        })
    }

    fn form_values(&self, record: &Value) -> Map<String, Value> {
        let mut values = Map::new();
        values.insert("name".to_owned(), present_or(record, &["name"], ""));
        values.insert("email".to_owned(), present_or(record, &["email"], ""));
        values.insert("phone".to_owned(), present_or(record, &["phone"], ""));
        values.insert("serviceId".to_owned(), reference_id(record, "serviceId"));
        values.insert("status".to_owned(), present_or(record, &["status"], "Active"));
        values.insert("experience".to_owned(), present_or(record, &["experience"], 0));
        values.insert(
            "workingHours".to_owned(),
            record.get("workingHours").cloned().unwrap_or(Value::Null),
        );
        values
    }

    fn option_sources(&self) -> Vec<OptionSource> {
        vec![OptionSource::new("serviceId", ResourceKind::Services)]
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use bella_domain::FormState;

    use super::StaffDefinition;
    use crate::resource_definitions::ResourceDefinition;

    #[test]
    fn edit_prefill_carries_working_hours() {
        let record = json!({
            "_id": "st1",
            "name": "Sophie Brown",
            "email": "sophie@bella.example",
            "phone": "555 0101",
            "serviceId": {"_id": "sv1", "name": "Manicure"},
            "workingHours": {"monday": {"isWorking": true, "start": "10:00", "end": "18:00"}}
        });

        let mut form = FormState::build(StaffDefinition.fields().unwrap_or_else(|_| unreachable!()))
            .unwrap_or_else(|_| unreachable!());
        form.patch(&StaffDefinition.form_values(&record));

        assert_eq!(form.value("serviceId"), Some(&json!("sv1")));
        assert_eq!(form.value("status"), Some(&json!("Active")));
        assert!(form.errors("workingHours").is_some_and(|errors| errors.is_empty()));
    }
}
