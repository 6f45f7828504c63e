use std::collections::HashMap;

use async_trait::async_trait;
use bella_application::{CrudGateway, RemoteError, RemoteResult};
use bella_core::RecordId;
use bella_domain::ResourceKind;
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use uuid::Uuid;

const ID_KEY: &str = "_id";

/// In-memory salon API used for offline runs and tests.
#[derive(Debug, Default)]
pub struct InMemoryCrudGateway {
    records: RwLock<HashMap<ResourceKind, Vec<Value>>>,
}

impl InMemoryCrudGateway {
    /// Creates an empty gateway.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }

    /// Replaces the stored records of a resource.
    pub async fn seed(&self, resource: ResourceKind, records: Vec<Value>) {
        self.records.write().await.insert(resource, records);
    }
}

fn has_id(record: &Value, id: &RecordId) -> bool {
    record.get(ID_KEY).and_then(Value::as_str) == Some(id.as_str())
}

#[async_trait]
impl CrudGateway for InMemoryCrudGateway {
    async fn list(&self, resource: ResourceKind) -> RemoteResult<Vec<Value>> {
        Ok(self
            .records
            .read()
            .await
            .get(&resource)
            .cloned()
            .unwrap_or_default())
    }

    async fn create(
        &self,
        resource: ResourceKind,
        mut payload: Map<String, Value>,
    ) -> RemoteResult<Option<Value>> {
        payload.insert(ID_KEY.to_owned(), Value::String(Uuid::new_v4().to_string()));
        let record = Value::Object(payload);

        self.records
            .write()
            .await
            .entry(resource)
            .or_default()
            .push(record.clone());

        Ok(Some(record))
    }

    async fn update(
        &self,
        resource: ResourceKind,
        id: &RecordId,
        payload: Map<String, Value>,
    ) -> RemoteResult<Option<Value>> {
        let mut records = self.records.write().await;
        let record = records
            .get_mut(&resource)
            .and_then(|stored| stored.iter_mut().find(|record| has_id(record, id)))
            .ok_or_else(|| RemoteError::message(resource.not_found_message()))?;

        if let Value::Object(fields) = record {
            for (key, value) in payload {
                if key != ID_KEY {
                    fields.insert(key, value);
                }
            }
        }

        Ok(Some(record.clone()))
    }

    async fn delete(&self, resource: ResourceKind, id: &RecordId) -> RemoteResult<()> {
        let mut records = self.records.write().await;
        let stored = records
            .get_mut(&resource)
            .ok_or_else(|| RemoteError::message(resource.not_found_message()))?;

        let before = stored.len();
        stored.retain(|record| !has_id(record, id));
        if stored.len() == before {
            return Err(RemoteError::message(resource.not_found_message()));
        }

        Ok(())
    }
}
