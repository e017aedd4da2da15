// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Key-value persistence for widget positions.
//!
//! Values are JSON `{"x": .., "y": ..}` strings keyed by widget identity.

use super::draggable::WidgetPosition;
use std::collections::BTreeMap;

const KEY_PREFIX: &str = "widget-position:";

/// Durable string key-value storage.
pub trait PositionStore {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: String);
}

/// Store kept in memory. The desktop app mirrors it into eframe storage.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl PositionStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
    }
}

/// Storage key for a widget.
pub fn position_key(widget_id: &str) -> String {
    format!("{KEY_PREFIX}{widget_id}")
}

/// Read a widget's saved position. Corrupt entries are ignored.
pub fn load_position(store: &dyn PositionStore, widget_id: &str) -> Option<WidgetPosition> {
    let raw = store.get(&position_key(widget_id))?;
    match serde_json::from_str::<WidgetPosition>(&raw) {
        Ok(pos) if pos.x.is_finite() && pos.y.is_finite() => Some(pos),
        Ok(_) => None,
        Err(e) => {
            log::warn!("Ignoring saved position for {widget_id}: {e}");
            None
        }
    }
}

pub fn save_position(store: &mut dyn PositionStore, widget_id: &str, position: WidgetPosition) {
    match serde_json::to_string(&position) {
        Ok(json) => store.set(&position_key(widget_id), json),
        Err(e) => log::error!("Failed to serialize position for {widget_id}: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_are_stored_as_json() {
        let mut store = MemoryStore::new();
        save_position(&mut store, "toolbox", WidgetPosition { x: 16.0, y: 96.5 });
        assert_eq!(
            store.get("widget-position:toolbox").as_deref(),
            Some(r#"{"x":16.0,"y":96.5}"#)
        );
        assert_eq!(
            load_position(&store, "toolbox"),
            Some(WidgetPosition { x: 16.0, y: 96.5 })
        );
    }

    #[test]
    fn corrupt_entry_is_ignored() {
        let mut store = MemoryStore::new();
        store.set(&position_key("minimap"), "not json".into());
        assert_eq!(load_position(&store, "minimap"), None);
        assert_eq!(load_position(&store, "navigator"), None);
    }
}
