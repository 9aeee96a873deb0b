//! Named JSON value with an in-memory mirror
//!
//! Every persisted entry (users, reservations, display settings, counters,
//! session) goes through this handle: it seeds the default on first use and
//! writes the whole value back on every change.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::domain::result::Result;
use crate::ports::KeyValueStore;

pub struct Persisted<T> {
    store: Arc<dyn KeyValueStore>,
    key: &'static str,
    value: T,
}

impl<T> Persisted<T>
where
    T: Serialize + DeserializeOwned + Clone,
{
    /// Hydrate `key`, writing `default()` when nothing is stored yet
    pub fn load(
        store: Arc<dyn KeyValueStore>,
        key: &'static str,
        default: impl FnOnce() -> T,
    ) -> Result<Self> {
        let value = match store.read(key)? {
            Some(raw) => serde_json::from_str(&raw)?,
            None => {
                let value = default();
                store.write(key, &serde_json::to_string(&value)?)?;
                value
            }
        };
        Ok(Self { store, key, value })
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    /// Persist `value` and make it the mirror
    pub fn set(&mut self, value: T) -> Result<()> {
        self.store.write(self.key, &serde_json::to_string(&value)?)?;
        self.value = value;
        Ok(())
    }

    /// Apply `f` to a copy, persist it, then swap it in
    ///
    /// The mirror is left untouched when the write fails.
    pub fn update<R>(&mut self, f: impl FnOnce(&mut T) -> R) -> Result<R> {
        let mut next = self.value.clone();
        let out = f(&mut next);
        self.set(next)?;
        Ok(out)
    }

    /// Re-read the stored value, keeping the mirror if the key has vanished
    pub fn reload(&mut self) -> Result<()> {
        if let Some(raw) = self.store.read(self.key)? {
            self.value = serde_json::from_str(&raw)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryKvStore;

    #[test]
    fn test_load_seeds_default() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryKvStore::new());
        let counter = Persisted::load(Arc::clone(&store), "counter", || 7u32).unwrap();

        assert_eq!(*counter.get(), 7);
        assert_eq!(store.read("counter").unwrap().as_deref(), Some("7"));
    }

    #[test]
    fn test_load_prefers_stored_value() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryKvStore::new());
        store.write("notes", r#""kale file""#).unwrap();

        let notes = Persisted::load(store, "notes", String::new).unwrap();
        assert_eq!(notes.get(), "kale file");
    }

    #[test]
    fn test_update_writes_through() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryKvStore::new());
        let mut list = Persisted::load(Arc::clone(&store), "list", Vec::<u8>::new).unwrap();

        let len = list.update(|v| {
            v.push(1);
            v.len()
        })
        .unwrap();

        assert_eq!(len, 1);
        assert_eq!(store.read("list").unwrap().as_deref(), Some("[1]"));
    }

    #[test]
    fn test_reload_picks_up_external_write() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryKvStore::new());
        let mut flag = Persisted::load(Arc::clone(&store), "flag", || false).unwrap();

        store.write("flag", "true").unwrap();
        assert!(!*flag.get());
        flag.reload().unwrap();
        assert!(*flag.get());
    }

    #[test]
    fn test_corrupt_value_is_a_json_error() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryKvStore::new());
        store.write("broken", "{not json").unwrap();

        let result = Persisted::load(store, "broken", || 0u8);
        assert!(matches!(result, Err(crate::Error::Json(_))));
    }
}
