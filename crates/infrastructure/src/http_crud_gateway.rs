use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bella_application::{ApiEnvelope, CrudGateway, RemoteError, RemoteResult, SessionStore};
use bella_core::{AppError, AppResult, RecordId};
use bella_domain::ResourceKind;
use reqwest::{Method, StatusCode};
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// `reqwest` implementation of the salon REST API.
pub struct HttpCrudGateway {
    http_client: reqwest::Client,
    base_url: String,
    session: Arc<dyn SessionStore>,
}

impl HttpCrudGateway {
    /// Creates a gateway over an existing client.
    #[must_use]
    pub fn new(
        http_client: reqwest::Client,
        base_url: impl Into<String>,
        session: Arc<dyn SessionStore>,
    ) -> Self {
        let base_url = base_url.into();
        Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            session,
        }
    }

    /// Creates a gateway with its own client and request timeout.
    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Duration,
        session: Arc<dyn SessionStore>,
    ) -> AppResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| {
                AppError::Configuration(format!("failed to build HTTP client: {error}"))
            })?;

        Ok(Self::new(http_client, base_url, session))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn send(
        &self,
        resource: ResourceKind,
        method: Method,
        path: &str,
        payload: Option<Map<String, Value>>,
    ) -> RemoteResult<Option<Value>> {
        let url = self.url(path);
        let mut builder = self
            .http_client
            .request(method.clone(), url.as_str())
            .header("Accept", "application/json");

        if let Some(token) = self.session.token() {
            builder = builder.bearer_auth(token);
        }
        if let Some(payload) = payload {
            builder = builder.json(&payload);
        }

        let response = builder.send().await.map_err(|error| {
            warn!(
                resource = resource.as_str(),
                method = %method,
                url = %url,
                error = %error,
                "salon API transport error"
            );
            RemoteError::fallback()
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|error| {
            warn!(
                resource = resource.as_str(),
                status = %status,
                error = %error,
                "salon API response body unavailable"
            );
            RemoteError::fallback()
        })?;

        if status.is_success() {
            debug!(
                resource = resource.as_str(),
                method = %method,
                url = %url,
                "salon API request succeeded"
            );
        } else {
            warn!(
                resource = resource.as_str(),
                method = %method,
                url = %url,
                status = %status,
                "salon API rejected request"
            );
        }

        normalize_response(status, parse_body(text.as_str()))
    }
}

/// Reads a response body; empty or non-JSON bodies become `null`.
fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }

    serde_json::from_str(text).unwrap_or(Value::Null)
}

/// Turns an HTTP status and body into the payload or a normalized error.
pub fn normalize_response(status: StatusCode, body: Value) -> RemoteResult<Option<Value>> {
    if !status.is_success() {
        return Err(RemoteError::from_body(&body));
    }

    ApiEnvelope::from_body(body).into_result()
}

#[async_trait]
impl CrudGateway for HttpCrudGateway {
    async fn list(&self, resource: ResourceKind) -> RemoteResult<Vec<Value>> {
        let routes = resource.routes();
        let data = self
            .send(resource, Method::GET, routes.list_path(), None)
            .await?;

        ApiEnvelope::from_body(data.unwrap_or(Value::Null)).into_records()
    }

    async fn create(
        &self,
        resource: ResourceKind,
        payload: Map<String, Value>,
    ) -> RemoteResult<Option<Value>> {
        let routes = resource.routes();
        self.send(resource, Method::POST, routes.create_path(), Some(payload))
            .await
    }

    async fn update(
        &self,
        resource: ResourceKind,
        id: &RecordId,
        payload: Map<String, Value>,
    ) -> RemoteResult<Option<Value>> {
        let path = resource.routes().update_path(id);
        self.send(resource, Method::PUT, path.as_str(), Some(payload))
            .await
    }

    async fn delete(&self, resource: ResourceKind, id: &RecordId) -> RemoteResult<()> {
        let path = resource.routes().delete_path(id);
        self.send(resource, Method::DELETE, path.as_str(), None)
            .await
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use reqwest::StatusCode;
    use serde_json::json;

    use super::{HttpCrudGateway, normalize_response, parse_body};
    use crate::InMemorySessionStore;

    #[test]
    fn successful_envelopes_yield_their_data() {
        let data = normalize_response(
            StatusCode::OK,
            json!({"success": true, "data": [{"_id": "a1"}], "message": "ok"}),
        )
        .unwrap_or_else(|_| unreachable!());

        assert_eq!(data, Some(json!([{"_id": "a1"}])));
    }

    #[test]
    fn bare_successful_bodies_are_treated_as_data() {
        let data = normalize_response(StatusCode::CREATED, json!([{"_id": "a1"}]))
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(data, Some(json!([{"_id": "a1"}])));

        let empty = normalize_response(StatusCode::NO_CONTENT, parse_body(""))
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(empty, None);
    }

    #[test]
    fn failed_statuses_surface_every_validation_message() {
        let error = normalize_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            json!({"errors": {"email": "Email already exists", "phone": ["Phone is required"]}}),
        )
        .err()
        .unwrap_or_else(|| unreachable!());

        assert_eq!(
            error.messages(),
            [
                "Email already exists".to_owned(),
                "Phone is required".to_owned()
            ]
        );
    }

    #[test]
    fn unreadable_error_bodies_fall_back_to_generic_text() {
        let error = normalize_response(StatusCode::BAD_GATEWAY, parse_body("<html>502</html>"))
            .err()
            .unwrap_or_else(|| unreachable!());

        assert_eq!(error.messages(), ["An unexpected error occurred".to_owned()]);
    }

    #[test]
    fn envelopes_reporting_failure_are_errors_despite_ok_status() {
        let error = normalize_response(
            StatusCode::OK,
            json!({"success": false, "message": "Staff not found"}),
        )
        .err()
        .unwrap_or_else(|| unreachable!());

        assert_eq!(error.messages(), ["Staff not found".to_owned()]);
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let gateway = HttpCrudGateway::new(
            reqwest::Client::new(),
            "http://localhost:8080/api/v1/",
            Arc::new(InMemorySessionStore::anonymous()),
        );

        assert_eq!(
            gateway.url("/bookings"),
            "http://localhost:8080/api/v1/bookings"
        );
    }
}
