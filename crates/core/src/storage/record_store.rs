use log::debug;
use serde_json::Value;
use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::investment::Investment;

use super::backend::KeyValueBackend;

/// Loads and saves the investment list as a JSON array under one key.
///
/// No business logic lives here. Callers load, modify and save; there is
/// no cached copy that could drift from what is persisted.
#[derive(Debug)]
pub struct RecordStore<B: KeyValueBackend> {
    backend: B,
    key: String,
}

impl<B: KeyValueBackend> RecordStore<B> {
    pub fn new(backend: B, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    /// Read the current list; an absent key is an empty list.
    ///
    /// Records written without an `id` (or with `"id": null`) get one
    /// derived from their position and content, so repeated loads of the
    /// same array agree. Use [`RecordStore::load_and_assign_ids`] to
    /// persist them.
    pub fn load(&self) -> Result<Vec<Investment>, CoreError> {
        Ok(self.read()?.0)
    }

    /// Like [`RecordStore::load`], but writes generated identifiers back so
    /// they stay stable across loads.
    pub fn load_and_assign_ids(&mut self) -> Result<Vec<Investment>, CoreError> {
        let (investments, assigned) = self.read()?;
        if assigned {
            debug!("assigned identifiers to legacy records under '{}'", self.key);
            self.save(&investments)?;
        }
        Ok(investments)
    }

    fn read(&self) -> Result<(Vec<Investment>, bool), CoreError> {
        let Some(raw) = self.backend.get(&self.key)? else {
            debug!("no records stored under '{}'", self.key);
            return Ok((Vec::new(), false));
        };
        let parse_error = |e: serde_json::Error| {
            CoreError::Deserialization(format!("Failed to parse records under '{}': {e}", self.key))
        };
        let mut values: Vec<Value> = serde_json::from_str(&raw).map_err(parse_error)?;
        let mut assigned = false;
        for (index, value) in values.iter_mut().enumerate() {
            if let Some(id) = legacy_id(index, value) {
                if let Value::Object(fields) = value {
                    fields.insert("id".to_string(), Value::String(id.to_string()));
                }
                assigned = true;
            }
        }
        let investments = values
            .into_iter()
            .map(serde_json::from_value::<Investment>)
            .collect::<Result<Vec<_>, _>>()
            .map_err(parse_error)?;
        debug!("loaded {} records from '{}'", investments.len(), self.key);
        Ok((investments, assigned))
    }

    /// Replace the stored list with `investments`.
    pub fn save(&mut self, investments: &[Investment]) -> Result<(), CoreError> {
        let raw = serde_json::to_string(investments)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize records: {e}")))?;
        self.backend.set(&self.key, raw)?;
        debug!("saved {} records to '{}'", investments.len(), self.key);
        Ok(())
    }

    /// Drop the stored list entirely.
    pub fn clear(&mut self) -> Result<(), CoreError> {
        self.backend.remove(&self.key)
    }
}

/// Identifier for a stored record that has none: a name-based UUID over
/// the record's position and its JSON content. `None` when an id is present.
fn legacy_id(index: usize, value: &Value) -> Option<Uuid> {
    let fields = value.as_object()?;
    if !matches!(fields.get("id"), None | Some(Value::Null)) {
        return None;
    }
    let mut content = fields.clone();
    content.remove("id");
    let name = format!("{index}:{}", Value::Object(content));
    Some(Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes()))
}
