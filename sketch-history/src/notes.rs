// Free text typed next to the drawing. Versioned independently of the
// drawing history: undo and clear never touch it.

use tracing::{debug, warn};

use crate::store::{load_json, save_json, KeyValueStore};

#[derive(Debug, Clone)]
pub struct Notes {
    text: String,
    key: String,
    durable: bool,
}

impl Notes {
    /// Read the text under `key`. Missing or unreadable values give an empty
    /// string.
    pub fn load(key: impl Into<String>, store: &dyn KeyValueStore) -> Self {
        let key = key.into();
        let text = match load_json::<String>(store, &key) {
            Ok(text) => text.unwrap_or_default(),
            Err(e) => {
                warn!(key = %key, error = %e, "notes unreadable, starting empty");
                String::new()
            }
        };
        debug!(key = %key, chars = text.chars().count(), "notes loaded");
        Self {
            text,
            key,
            durable: true,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the text and write it through to the store.
    pub fn set(&mut self, text: impl Into<String>, store: &mut dyn KeyValueStore) {
        self.text = text.into();
        match save_json(store, &self.key, self.text.as_str()) {
            Ok(()) => self.durable = true,
            Err(e) => {
                warn!(key = %self.key, error = %e, "notes not persisted, continuing in memory");
                self.durable = false;
            }
        }
    }

    pub fn is_durable(&self) -> bool {
        self.durable
    }
}
