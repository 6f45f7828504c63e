use serde_json::{Map, Value, json};

use bella_core::AppResult;
use bella_domain::{
    ColumnDescriptor, DisplayKind, FieldDescriptor, FieldKind, FieldOption, ResourceKind,
};

use super::{OptionSource, ResourceDefinition, present_or, reference_id, reference_name, row_id};

/// Staff rota screen.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShiftsDefinition;

impl ResourceDefinition for ShiftsDefinition {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Shifts
    }

    fn fields(&self) -> AppResult<Vec<FieldDescriptor>> {
        Ok(vec![
            FieldDescriptor::select("staffId", "Staff Member", Vec::new())?.required(),
            FieldDescriptor::new("date", "Date", FieldKind::Date)?.required(),
            FieldDescriptor::new("startTime", "Start Time", FieldKind::Time)?.required(),
            FieldDescriptor::new("endTime", "End Time", FieldKind::Time)?.required(),
            FieldDescriptor::text("location", "Location")?
                .required()
                .with_placeholder("Enter location"),
            FieldDescriptor::select(
                "status",
                "Status",
                vec![
                    FieldOption::new("pending", "Pending"),
                    FieldOption::new("active", "Active"),
                    FieldOption::new("completed", "Completed"),
                    FieldOption::new("cancelled", "Cancelled"),
                ],
            )?
            .required()
            .with_default("pending"),
            FieldDescriptor::textarea("notes", "Notes", 3)?
                .with_placeholder("Additional notes or special requests"),
        ])
    }

    fn columns(&self) -> AppResult<Vec<ColumnDescriptor>> {
        Ok(vec![
            ColumnDescriptor::new("staffName", "Staff")?,
            ColumnDescriptor::new("date", "Date")?.with_display(DisplayKind::Date),
            ColumnDescriptor::new("startTime", "Start Time")?.with_display(DisplayKind::Time),
            ColumnDescriptor::new("endTime", "End Time")?.with_display(DisplayKind::Time),
            ColumnDescriptor::new("location", "Location")?,
            ColumnDescriptor::new("status", "Status")?.with_display(DisplayKind::Status),
        ])
    }

    fn project_row(&self, record: &Value) -> Value {
        json!({
            "id": row_id(record),
            "staffName": reference_name(record, "staffId")
                .unwrap_or_else(|| present_or(record, &["staffName"], "N/A")),
            "date": present_or(record, &["date", "shiftDate"], Value::Null),
            "startTime": present_or(record, &["startTime"], Value::Null),
            "endTime": present_or(record, &["endTime"], Value::Null),
            "location": present_or(record, &["location"], "Not Assigned"),
            "status": present_or(record, &["status"], "pending"),
        })
    }

    fn form_values(&self, record: &Value) -> Map<String, Value> {
        let mut values = Map::new();
        values.insert("staffId".to_owned(), reference_id(record, "staffId"));
        values.insert(
            "date".to_owned(),
            present_or(record, &["date", "shiftDate"], Value::Null),
        );
        values.insert("startTime".to_owned(), present_or(record, &["startTime"], ""));
        values.insert("endTime".to_owned(), present_or(record, &["endTime"], ""));
        values.insert("location".to_owned(), present_or(record, &["location"], ""));
        values.insert("status".to_owned(), present_or(record, &["status"], "pending"));
        values.insert("notes".to_owned(), present_or(record, &["notes"], ""));
        values
    }

    fn option_sources(&self) -> Vec<OptionSource> {
        vec![OptionSource::new("staffId", ResourceKind::Staff)]
    }
}
