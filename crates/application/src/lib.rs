//! Screen workflow services and ports.

#![forbid(unsafe_code)]

mod access_guard;
mod remote;
mod resource_definitions;
mod screen_controller;
mod screen_ports;

pub use access_guard::{AccessDecision, AccessGuard, LOGIN_ROUTE, MissingRolePolicy};
pub use remote::{ApiEnvelope, FALLBACK_ERROR_MESSAGE, RemoteError, RemoteResult};
pub use resource_definitions::{
    AppointmentsDefinition, CategoriesDefinition, DELETE_ACTION, EDIT_ACTION,
    InventoryDefinition, OptionSource, ROW_ID_KEY, ResourceDefinition, ServicesDefinition,
    ShiftsDefinition, StaffDefinition, VIEW_ACTION, definition_for,
};
pub use screen_controller::{
    ActionOutcome, DeleteOutcome, LoadState, ModalState, ReloadOutcome, ScreenController,
    ScreenPage, SubmitOutcome,
};
pub use screen_ports::{CrudGateway, NotificationKind, Notifier, SessionStore};
