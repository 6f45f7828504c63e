use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use bella_core::RecordId;
use bella_domain::ResourceKind;

use crate::remote::RemoteResult;

/// CRUD port over the salon REST API.
///
/// Implementations normalize transport failures into [`crate::RemoteError`]
/// so callers never inspect status codes.
#[async_trait]
pub trait CrudGateway: Send + Sync {
    /// Lists every record of a resource as returned by the API.
    async fn list(&self, resource: ResourceKind) -> RemoteResult<Vec<Value>>;

    /// Creates a record and returns the stored record when the API echoes it.
    async fn create(
        &self,
        resource: ResourceKind,
        payload: Map<String, Value>,
    ) -> RemoteResult<Option<Value>>;

    /// Updates a record and returns the stored record when the API echoes it.
    async fn update(
        &self,
        resource: ResourceKind,
        id: &RecordId,
        payload: Map<String, Value>,
    ) -> RemoteResult<Option<Value>>;

    /// Deletes a record.
    async fn delete(&self, resource: ResourceKind, id: &RecordId) -> RemoteResult<()>;
}

/// Severity of a user notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Operation succeeded.
    Success,
    /// Operation failed.
    Error,
    /// Neutral information.
    Info,
    /// Needs attention.
    Warning,
}

impl NotificationKind {
    /// Returns stable name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Info => "info",
            Self::Warning => "warning",
        }
    }
}

/// Fire-and-forget notification port.
pub trait Notifier: Send + Sync {
    /// Shows a message to the user.
    fn notify(&self, message: &str, kind: NotificationKind, title: Option<&str>);
}

/// Read-only view of the current console session.
pub trait SessionStore: Send + Sync {
    /// Returns whether a session token is present.
    fn is_authenticated(&self) -> bool;

    /// Returns the stored role, if any.
    fn current_role(&self) -> Option<String>;

    /// Returns the bearer token, if any.
    fn token(&self) -> Option<String>;
}
