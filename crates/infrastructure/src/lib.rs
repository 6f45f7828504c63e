//! Adapters for the salon REST API, notifications and the console session.

#![forbid(unsafe_code)]

mod http_crud_gateway;
mod in_memory_crud_gateway;
mod in_memory_session_store;
mod toast_queue;
mod tracing_notifier;

pub use http_crud_gateway::{HttpCrudGateway, normalize_response};
pub use in_memory_crud_gateway::InMemoryCrudGateway;
pub use in_memory_session_store::InMemorySessionStore;
pub use toast_queue::{DEFAULT_TOAST_DURATION_MS, Toast, ToastQueue};
pub use tracing_notifier::TracingNotifier;
