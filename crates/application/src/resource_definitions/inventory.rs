use serde_json::{Map, Value, json};

use bella_core::AppResult;
use bella_domain::{
    ColumnDescriptor, DisplayKind, FieldDescriptor, FieldOption, NumberRules, ResourceKind,
};

use super::{OptionSource, ResourceDefinition, present_or, reference_id, reference_name, row_id};

/// Stock items screen.
#[derive(Debug, Clone, Copy, Default)]
pub struct InventoryDefinition;

impl ResourceDefinition for InventoryDefinition {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Inventory
    }

    fn fields(&self) -> AppResult<Vec<FieldDescriptor>> {
        let non_negative = NumberRules::default().with_min(0.0);
        Ok(vec![
            FieldDescriptor::text("productName", "Product Name")?.required(),
            FieldDescriptor::text("sku", "SKU")?.required(),
            FieldDescriptor::select("categoryId", "Category", Vec::new())?
                .required()
                .with_placeholder("Select Category"),
            FieldDescriptor::number("quantity", "Quantity", non_negative.clone())?.required(),
            FieldDescriptor::number("stock", "Stock", non_negative.clone())?.required(),
            FieldDescriptor::number("unit", "Unit", NumberRules::default())?.required(),
            FieldDescriptor::number("price", "Price", non_negative)?.required(),
            FieldDescriptor::text("supplierName", "Supplier Name")?.required(),
            FieldDescriptor::select(
                "status",
                "Status",
                vec![
                    FieldOption::new("stock", "In Stock"),
                    FieldOption::new("out-stock", "Out of Stock"),
                ],
            )?
            .required()
            .with_default("stock"),
        ])
    }

    fn columns(&self) -> AppResult<Vec<ColumnDescriptor>> {
        Ok(vec![
            ColumnDescriptor::new("productName", "Product Name")?,
            ColumnDescriptor::new("sku", "SKU")?,
            ColumnDescriptor::new("categoryName", "Category Name")?,
            ColumnDescriptor::new("quantity", "Quantity")?,
            ColumnDescriptor::new("stock", "Minimum Stock")?,
            ColumnDescriptor::new("unit", "Unit")?,
            ColumnDescriptor::new("price", "Price Per Unit")?,
            ColumnDescriptor::new("supplierName", "Supplier")?,
            ColumnDescriptor::new("status", "Status")?.with_display(DisplayKind::Status),
        ])
    }

    fn project_row(&self, record: &Value) -> Value {
        json!({
            "id": row_id(record),
            "productName": present_or(record, &["productName"], "N/A"),
            "sku": present_or(record, &["sku"], Value::Null),
            "categoryName": reference_name(record, "categoryId").unwrap_or(Value::Null),
            "quantity": present_or(record, &["quantity"], Value::Null),
            "stock": present_or(record, &["stock"], Value::Null),
            "unit": present_or(record, &["unit"], Value::Null),
            "price": present_or(record, &["price"], Value::Null),
            "supplierName": present_or(record, &["supplierName"], Value::Null),
            "status": present_or(record, &["status"], "stock"),
        })
    }

    fn form_values(&self, record: &Value) -> Map<String, Value> {
        let mut values = Map::new();
        for key in ["productName", "sku", "supplierName"] {
            values.insert(key.to_owned(), present_or(record, &[key], ""));
        }
        for key in ["quantity", "stock", "unit", "price"] {
            values.insert(key.to_owned(), present_or(record, &[key], Value::Null));
        }
        values.insert("categoryId".to_owned(), reference_id(record, "categoryId"));
        values.insert("status".to_owned(), present_or(record, &["status"], "stock"));
        values
    }

    fn option_sources(&self) -> Vec<OptionSource> {
        vec![OptionSource::new("categoryId", ResourceKind::Categories)]
    }
}
