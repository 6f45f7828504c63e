use std::str::FromStr;

use bella_core::{AppError, RecordId};
use serde::{Deserialize, Serialize};

const ID_PLACEHOLDER: &str = "{id}";

/// Remote resource administered from the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// Customer bookings.
    Appointments,
    /// Staff rota entries.
    Shifts,
    /// Salon staff members.
    Staff,
    /// Bookable salon services.
    Services,
    /// Stock items.
    Inventory,
    /// Inventory categories.
    Categories,
    /// Registered customers.
    Users,
}

impl ResourceKind {
    /// Every administered resource.
    pub const ALL: [Self; 7] = [
        Self::Appointments,
        Self::Shifts,
        Self::Staff,
        Self::Services,
        Self::Inventory,
        Self::Categories,
        Self::Users,
    ];

    /// Returns stable name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Appointments => "appointments",
            Self::Shifts => "shifts",
            Self::Staff => "staff",
            Self::Services => "services",
            Self::Inventory => "inventory",
            Self::Categories => "categories",
            Self::Users => "users",
        }
    }

    /// Returns the singular display name used in notifications.
    #[must_use]
    pub fn singular(&self) -> &'static str {
        match self {
            Self::Appointments => "Appointment",
            Self::Shifts => "Shift",
            Self::Staff => "Staff",
            Self::Services => "Service",
            Self::Inventory => "Inventory",
            Self::Categories => "Category",
            Self::Users => "User",
        }
    }

    /// Returns the REST paths, relative to the API base URL.
    #[must_use]
    pub fn routes(&self) -> ResourceRoutes {
        match self {
            Self::Appointments => ResourceRoutes::new(
                "/bookings",
                "/bookings/create",
                "/bookings/{id}",
                "/bookings/{id}",
            ),
            Self::Shifts => ResourceRoutes::new(
                "/shifts",
                "/shifts/create",
                "/shifts/{id}",
                "/shifts/admin/{id}",
            ),
            Self::Staff => {
                ResourceRoutes::new("/staff", "/staff/create", "/staff/{id}", "/staff/{id}")
            }
            Self::Services => ResourceRoutes::new(
                "/services",
                "/services/create",
                "/services/update/{id}",
                "/services/delete/{id}",
            ),
            Self::Inventory => ResourceRoutes::new(
                "/inventories",
                "/inventories/create",
                "/inventories/update/{id}",
                "/inventories/delete/{id}",
            ),
            Self::Categories => ResourceRoutes::new(
                "/categories/get",
                "/categories/create",
                "/categories/update/{id}",
                "/categories/delete/{id}",
            ),
            Self::Users => {
                ResourceRoutes::new("/users", "/users/create", "/users/{id}", "/users/{id}")
            }
        }
    }

    /// Returns the toast text after a successful create.
    #[must_use]
    pub fn created_message(&self) -> String {
        format!("{} created successfully", self.singular())
    }

    /// Returns the toast text after a successful update.
    #[must_use]
    pub fn updated_message(&self) -> String {
        format!("{} updated successfully", self.singular())
    }

    /// Returns the toast text after a successful delete.
    #[must_use]
    pub fn deleted_message(&self) -> String {
        format!("{} deleted successfully", self.singular())
    }

    /// Returns the toast text when a row has no backing record.
    #[must_use]
    pub fn not_found_message(&self) -> String {
        format!("{} not found", self.singular())
    }
}

impl FromStr for ResourceKind {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| AppError::Validation(format!("unknown resource '{value}'")))
    }
}

/// REST paths of one resource. Update and delete paths carry an `{id}`
/// placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRoutes {
    list: String,
    create: String,
    update: String,
    delete: String,
}

impl ResourceRoutes {
    /// Creates a route set from path templates.
    #[must_use]
    pub fn new(
        list: impl Into<String>,
        create: impl Into<String>,
        update: impl Into<String>,
        delete: impl Into<String>,
    ) -> Self {
        Self {
            list: list.into(),
            create: create.into(),
            update: update.into(),
            delete: delete.into(),
        }
    }

    /// Returns the list path.
    #[must_use]
    pub fn list_path(&self) -> &str {
        self.list.as_str()
    }

    /// Returns the create path.
    #[must_use]
    pub fn create_path(&self) -> &str {
        self.create.as_str()
    }

    /// Returns the update path for a record.
    #[must_use]
    pub fn update_path(&self, id: &RecordId) -> String {
        self.update.replace(ID_PLACEHOLDER, id.as_str())
    }

    /// Returns the delete path for a record.
    #[must_use]
    pub fn delete_path(&self, id: &RecordId) -> String {
        self.delete.replace(ID_PLACEHOLDER, id.as_str())
    }
}
