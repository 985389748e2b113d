use std::{collections::HashMap, path::PathBuf};

use serde::Deserialize;
use serde_json::Value;

pub const KEY_PREFIX: &str = "spray_";

/// Read-only key-value store. Values are kept as raw JSON text and only
/// decoded on lookup.
#[derive(Debug, Default)]
pub struct Store {
    pub data: HashMap<String, String>,
}

/// A stored spray as written by the dashboard.
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SprayRecord {
    pub pixel_string: Option<String>,
    pub pixel_frames: Option<Vec<String>>,
    pub is_gif: Option<bool>,
}

pub fn spray_key(id: &str) -> String {
    format!("{KEY_PREFIX}{id}")
}

impl Store {
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.data.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str)
    }

    /// Look up and decode a record, `Ok(None)` when the key is absent or
    /// holds a falsy scalar such as `null`. Other non-object values decode to
    /// an empty record.
    pub fn get_record(&self, key: &str) -> anyhow::Result<Option<SprayRecord>> {
        let Some(raw) = self.get(key) else {
            return Ok(None);
        };
        match serde_json::from_str::<Value>(raw)? {
            Value::Null | Value::Bool(false) => Ok(None),
            Value::String(s) if s.is_empty() => Ok(None),
            Value::Number(n) if n.as_f64() == Some(0.0) => Ok(None),
            value @ Value::Object(_) => Ok(Some(serde_json::from_value(value)?)),
            _ => Ok(Some(SprayRecord::default())),
        }
    }
}

/// Load a store from a JSON dump of the form `{"spray_<id>": { ... }, ...}`.
pub fn read_store_file<P>(path: P) -> anyhow::Result<Store>
where
    P: Into<PathBuf>,
{
    let data = std::fs::read(path.into())?;
    decode_store(&data)
}

fn decode_store(data: &[u8]) -> anyhow::Result<Store> {
    let entries: HashMap<String, serde_json::Value> = serde_json::from_slice(data)?;
    let mut store = Store::default();
    for (key, value) in entries {
        log::debug!("store entry: {}", key);
        store.data.insert(key, value.to_string());
    }
    Ok(store)
}
