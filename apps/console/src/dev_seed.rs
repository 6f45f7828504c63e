use bella_domain::ResourceKind;
use bella_infrastructure::InMemoryCrudGateway;
use serde_json::{Value, json};
use tracing::info;

const DEV_SEED_USER_ID: &str = "64b7f0a1c2d3e4f5a6b7c801";
const DEV_SEED_SERVICE_CUT_ID: &str = "64b7f0a1c2d3e4f5a6b7c811";
const DEV_SEED_SERVICE_COLOUR_ID: &str = "64b7f0a1c2d3e4f5a6b7c812";
const DEV_SEED_STAFF_ID: &str = "64b7f0a1c2d3e4f5a6b7c821";
const DEV_SEED_CATEGORY_ID: &str = "64b7f0a1c2d3e4f5a6b7c831";

/// Fills the in-memory gateway with a small salon.
pub async fn run(gateway: &InMemoryCrudGateway) {
    let user = json!({
        "_id": DEV_SEED_USER_ID,
        "name": "Amira Hassan",
        "email": "amira@bella.local",
    });
    let cut = json!({
        "_id": DEV_SEED_SERVICE_CUT_ID,
        "name": "Haircut",
        "price": 25,
        "duration": {"$numberDecimal": "0.45"},
        "description": "Wash, cut and blow-dry",
        "isActive": true,
    });
    let colour = json!({
        "_id": DEV_SEED_SERVICE_COLOUR_ID,
        "name": "Hair Colouring",
        "price": 60,
        "duration": {"$numberDecimal": "1.30"},
        "description": "Full colour",
        "isActive": false,
    });
    let staff = json!({
        "_id": DEV_SEED_STAFF_ID,
        "name": "Layla Mansour",
        "email": "layla@bella.local",
        "phone": "01000000001",
        "serviceId": {"_id": DEV_SEED_SERVICE_CUT_ID, "name": "Haircut"},
        "experience": 6,
        "rating": 4.8,
        "status": "Active",
        "workingHours": weekday_hours(),
    });
    let category = json!({
        "_id": DEV_SEED_CATEGORY_ID,
        "name": "Hair Care",
        "description": "Shampoos and treatments",
    });

    let seeds: [(ResourceKind, Vec<Value>); 7] = [
        (ResourceKind::Users, vec![user.clone()]),
        (ResourceKind::Services, vec![cut.clone(), colour]),
        (ResourceKind::Staff, vec![staff.clone()]),
        (ResourceKind::Categories, vec![category.clone()]),
        (
            ResourceKind::Appointments,
            vec![
                json!({
                    "_id": "64b7f0a1c2d3e4f5a6b7c841",
                    "userId": user,
                    "serviceId": cut.clone(),
                    "staffId": staff.clone(),
                    "date": "2025-03-14T10:30:00.000Z",
                    "time": "10:30",
                    "status": "confirmed",
                }),
                json!({
                    "_id": "64b7f0a1c2d3e4f5a6b7c842",
                    "name": "Walk-in",
                    "serviceId": cut,
                    "date": "2025-03-15T13:00:00.000Z",
                    "time": "13:00",
                    "status": "pending",
                }),
            ],
        ),
        (
            ResourceKind::Shifts,
            vec![json!({
                "_id": "64b7f0a1c2d3e4f5a6b7c851",
                "staffId": staff,
                "date": "2025-03-14T00:00:00.000Z",
                "startTime": "09:00",
                "endTime": "17:00",
                "location": "Main floor",
                "status": "active",
            })],
        ),
        (
            ResourceKind::Inventory,
            vec![
                json!({
                    "_id": "64b7f0a1c2d3e4f5a6b7c861",
                    "productName": "Argan Shampoo",
                    "sku": "SH-001",
                    "categoryId": category.clone(),
                    "quantity": 24,
                    "stock": 24,
                    "unit": 1,
                    "price": 12.5,
                    "supplierName": "Nile Beauty",
                    "status": "stock",
                }),
                json!({
                    "_id": "64b7f0a1c2d3e4f5a6b7c862",
                    "productName": "Keratin Mask",
                    "sku": "MK-002",
                    "categoryId": category,
                    "quantity": 0,
                    "stock": 0,
                    "unit": 1,
                    "price": 30,
                    "supplierName": "Nile Beauty",
                    "status": "out-stock",
                }),
            ],
        ),
    ];

    for (resource, records) in seeds {
        info!(resource = resource.as_str(), count = records.len(), "seeded records");
        gateway.seed(resource, records).await;
    }
}

fn weekday_hours() -> Value {
    let day = |working: bool| {
        if working {
            json!({"isWorking": true, "start": "10:00", "end": "18:00"})
        } else {
            json!({"isWorking": false, "start": "00:00", "end": "00:00"})
        }
    };

    json!({
        "monday": day(true),
        "tuesday": day(true),
        "wednesday": day(true),
        "thursday": day(true),
        "friday": day(false),
        "saturday": day(true),
        "sunday": day(true),
    })
}
