use bytes::Bytes;
use std::sync::Arc;

use super::json::JsonHandler;
use super::traits::{Direction, FormatError, FormatHandler};
use crate::remote::{Credentials, RemoteDocuments, RemoteSession};
use crate::value::{Value, ValueMap};

#[derive(Clone)]
struct Connection {
    client: Arc<dyn RemoteDocuments>,
    credentials: Credentials,
}

impl Connection {
    fn authenticate(&self) -> Result<Box<dyn RemoteSession>, FormatError> {
        Ok(self.client.authenticate(&self.credentials)?)
    }
}

/// Link-backed document handler (`.gdoc`)
///
/// On disk only a small JSON descriptor is kept (`{link, resource_id}`);
/// the document body lives in a remote service. Without a connected client
/// both directions fail with `NotImplemented`.
#[derive(Clone, Default)]
pub struct RemoteDocumentHandler {
    connection: Option<Connection>,
}

impl RemoteDocumentHandler {
    /// Handler with no document service attached
    pub fn new() -> Self {
        Self { connection: None }
    }

    pub fn connected(client: Arc<dyn RemoteDocuments>, credentials: Credentials) -> Self {
        Self {
            connection: Some(Connection {
                client,
                credentials,
            }),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    fn connection(&self, direction: Direction) -> Result<&Connection, FormatError> {
        self.connection
            .as_ref()
            .ok_or_else(|| FormatError::not_implemented(self.name(), direction))
    }

    /// Descriptor fields, from a map or from its JSON text as kept on disk
    fn descriptor(&self, value: &Value) -> Result<ValueMap, FormatError> {
        let parsed;
        let value = match value {
            Value::String(_) | Value::Bytes(_) => {
                parsed = JsonHandler::new()
                    .inbound(value)
                    .map_err(|e| FormatError::malformed(self.name(), e.to_string()))?;
                &parsed
            }
            other => other,
        };
        value.as_map().cloned().ok_or_else(|| {
            FormatError::malformed(
                self.name(),
                format!("expected a document descriptor, got {}", value.kind()),
            )
        })
    }

    fn link(&self, descriptor: &ValueMap) -> Result<String, FormatError> {
        match descriptor.get("link") {
            Some(Value::String(link)) => Ok(link.clone()),
            Some(_) => Err(FormatError::malformed(self.name(), "'link' must be a string")),
            None => Err(FormatError::malformed(self.name(), "descriptor has no 'link'")),
        }
    }
}

impl std::fmt::Debug for RemoteDocumentHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteDocumentHandler")
            .field("connected", &self.is_connected())
            .finish()
    }
}

impl FormatHandler for RemoteDocumentHandler {
    fn name(&self) -> &'static str {
        "gdoc"
    }

    fn content_type(&self) -> mime::Mime {
        mime::APPLICATION_JSON
    }

    /// Upload `data` to `link` and return the descriptor to keep on disk
    fn outbound(&self, value: &Value) -> Result<Value, FormatError> {
        let connection = self.connection(Direction::Outbound)?;
        let descriptor = self.descriptor(value)?;
        let link = self.link(&descriptor)?;
        let data = match descriptor.get("data") {
            Some(Value::Bytes(b)) => b.clone(),
            Some(Value::String(s)) => Bytes::from(s.clone()),
            Some(other) => {
                return Err(FormatError::malformed(
                    self.name(),
                    format!("'data' must be text or bytes, got {}", other.kind()),
                ));
            }
            None => return Err(FormatError::malformed(self.name(), "descriptor has no 'data'")),
        };

        let session = connection.authenticate()?;
        tracing::debug!(%link, size = data.len(), "Uploading remote document");
        let receipt = session.upload(data, &link)?;

        let mut record = ValueMap::new();
        record.insert("link".to_string(), Value::String(link));
        record.insert("resource_id".to_string(), Value::String(receipt.resource_id));
        Ok(Value::Map(record))
    }

    /// Fetch the document a descriptor points at
    fn inbound(&self, raw: &Value) -> Result<Value, FormatError> {
        let connection = self.connection(Direction::Inbound)?;
        let link = self.link(&self.descriptor(raw)?)?;

        let session = connection.authenticate()?;
        tracing::debug!(%link, "Fetching remote document");
        Ok(Value::Bytes(session.fetch(&link)?))
    }
}
