//! Named data sources that widgets bind to.
//!
//! The provider is a collaborator interface: the core only needs name
//! lookup; binding *inference* (picking default fields for a template)
//! belongs to the UI layer. Field inspection helpers over the first record
//! are offered here for that layer to build on.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// A named dataset. `data` is expected to be a JSON array of record objects,
/// but the core never enforces that shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSource {
    pub name: String,
    pub data: Value,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Read access to the set of named sources.
pub trait DataSourceProvider {
    fn list_sources(&self) -> &HashMap<String, DataSource>;

    fn get_source(&self, name: &str) -> Option<&DataSource>;
}

/// Field names of the first record in a source's data, in declaration order.
pub fn record_fields(source: &DataSource) -> Vec<String> {
    first_record(source)
        .map(|record| record.keys().cloned().collect())
        .unwrap_or_default()
}

/// Field names of the first record whose values are numeric.
pub fn numeric_fields(source: &DataSource) -> Vec<String> {
    first_record(source)
        .map(|record| {
            record
                .iter()
                .filter(|(_, value)| value.is_number())
                .map(|(key, _)| key.clone())
                .collect()
        })
        .unwrap_or_default()
}

fn first_record(source: &DataSource) -> Option<&serde_json::Map<String, Value>> {
    source.data.as_array()?.first()?.as_object()
}

// ─── In-memory provider ──────────────────────────────────────────────────

/// A mutable, in-memory source registry keyed by name.
#[derive(Debug, Default)]
pub struct MemorySourceProvider {
    sources: HashMap<String, DataSource>,
}

impl MemorySourceProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_source(&mut self, name: impl Into<String>, data: Value, description: Option<String>) {
        let name = name.into();
        self.sources.insert(
            name.clone(),
            DataSource {
                name,
                data,
                description,
                created_at: Utc::now(),
                updated_at: None,
            },
        );
    }

    /// Replace a source's data and stamp `updated_at`. Unknown names are a
    /// no-op, matching the store's race tolerance.
    pub fn update_source(&mut self, name: &str, data: Value) {
        if let Some(source) = self.sources.get_mut(name) {
            source.data = data;
            source.updated_at = Some(Utc::now());
        }
    }

    pub fn remove_source(&mut self, name: &str) {
        self.sources.remove(name);
    }
}

impl DataSourceProvider for MemorySourceProvider {
    fn list_sources(&self) -> &HashMap<String, DataSource> {
        &self.sources
    }

    fn get_source(&self, name: &str) -> Option<&DataSource> {
        self.sources.get(name)
    }
}
