use serde_json::{Map, Value, json};

use bella_core::AppResult;
use bella_domain::{
    ColumnDescriptor, DisplayKind, FieldDescriptor, FieldKind, FieldOption, ResourceKind,
};

use super::{OptionSource, ResourceDefinition, present_or, reference_id, reference_name, row_id};

/// Customer bookings screen.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppointmentsDefinition;

impl ResourceDefinition for AppointmentsDefinition {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Appointments
    }

    fn fields(&self) -> AppResult<Vec<FieldDescriptor>> {
        Ok(vec![
            FieldDescriptor::select("userId", "User", Vec::new())?.required(),
            FieldDescriptor::select("serviceId", "Service", Vec::new())?.required(),
            FieldDescriptor::select("staffId", "Staff Member", Vec::new())?.required(),
            FieldDescriptor::new("date", "Date", FieldKind::Date)?.required(),
            FieldDescriptor::new("time", "Time", FieldKind::Time)?.required(),
            FieldDescriptor::select(
                "status",
                "Status",
                vec![
                    FieldOption::new("pending", "Pending"),
                    FieldOption::new("confirmed", "Confirmed"),
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
            ColumnDescriptor::new("customerName", "Customer")?,
            ColumnDescriptor::new("service", "Service")?,
            ColumnDescriptor::new("appointmentDate", "Date & Time")?
                .with_display(DisplayKind::Date),
            ColumnDescriptor::new("staff", "Staff")?,
            ColumnDescriptor::new("status", "Status")?.with_display(DisplayKind::Status),
        ])
    }

    fn project_row(&self, record: &Value) -> Value {
        json!({
            "id": row_id(record),
            "customerName": reference_name(record, "userId")
                .unwrap_or_else(|| present_or(record, &["name"], "N/A")),
            "service": reference_name(record, "serviceId")
                .unwrap_or_else(|| present_or(record, &["service"], "N/A")),
            "appointmentDate": present_or(record, &["date", "appointmentDate"], Value::Null),
            "appointmentTime": present_or(record, &["time", "appointmentTime"], Value::Null),
            "staff": reference_name(record, "staffId")
                .unwrap_or_else(|| Value::from("Not Assigned")),
            "status": present_or(record, &["status"], "pending"),
            "phone": present_or(record, &["phone"], ""),
            "email": present_or(record, &["email"], ""),
        })
    }

    fn form_values(&self, record: &Value) -> Map<String, Value> {
        let mut values = Map::new();
        values.insert("userId".to_owned(), reference_id(record, "userId"));
        values.insert("serviceId".to_owned(), reference_id(record, "serviceId"));
        values.insert("staffId".to_owned(), reference_id(record, "staffId"));
        values.insert(
            "date".to_owned(),
            present_or(record, &["date", "appointmentDate"], Value::Null),
        );
        values.insert(
            "time".to_owned(),
            present_or(record, &["time", "appointmentTime"], Value::Null),
        );
        values.insert("status".to_owned(), present_or(record, &["status"], "pending"));
        values.insert("notes".to_owned(), present_or(record, &["notes"], ""));
        values
    }

    fn option_sources(&self) -> Vec<OptionSource> {
        vec![
            OptionSource::new("userId", ResourceKind::Users),
            OptionSource::new("serviceId", ResourceKind::Services),
            OptionSource::new("staffId", ResourceKind::Staff),
        ]
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::AppointmentsDefinition;
    use crate::resource_definitions::ResourceDefinition;

    #[test]
    fn populated_references_are_flattened_for_the_table() {
        let record = json!({
            "_id": "a1",
            "userId": {"_id": "u1", "name": "Emma Wilson"},
            "serviceId": {"_id": "sv1", "name": "Haircut"},
            "date": "2025-03-07T14:00:00Z",
            "status": "confirmed"
        });

        let row = AppointmentsDefinition.project_row(&record);
        assert_eq!(row["customerName"], json!("Emma Wilson"));
        assert_eq!(row["service"], json!("Haircut"));
        assert_eq!(row["staff"], json!("Not Assigned"));
        assert_eq!(row["appointmentDate"], json!("2025-03-07T14:00:00Z"));

        let values = AppointmentsDefinition.form_values(&record);
        assert_eq!(values.get("userId"), Some(&json!("u1")));
        assert_eq!(values.get("staffId"), Some(&json!("")));
        assert_eq!(values.get("status"), Some(&json!("confirmed")));
    }
}
