//! Namespaced key/value persistence contract.
//!
//! Reads never fail: a missing or unreadable value yields the caller's
//! default. Writes report errors, but callers in this crate treat them as
//! best-effort.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

use crate::error::StorageError;

/// Namespace every streak key lives under.
pub const NAMESPACE: &str = "ministreak";

/// Join a namespace and key into the backend key.
pub fn scoped_key(namespace: &str, key: &str) -> String {
    format!("{namespace}.{key}")
}

/// Host persistence: a small set of named integers and strings.
pub trait KeyValueStore {
    fn get_int(&self, key: &str, default: i64) -> i64;
    fn get_string(&self, key: &str, default: &str) -> String;
    fn set_int(&self, key: &str, value: i64) -> Result<(), StorageError>;
    fn set_string(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get_int(&self, key: &str, default: i64) -> i64 {
        (**self).get_int(key, default)
    }
    fn get_string(&self, key: &str, default: &str) -> String {
        (**self).get_string(key, default)
    }
    fn set_int(&self, key: &str, value: i64) -> Result<(), StorageError> {
        (**self).set_int(key, value)
    }
    fn set_string(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set_string(key, value)
    }
}

/// In-process store. Writes can be made to fail for testing save paths.
#[derive(Debug)]
pub struct MemoryStore {
    namespace: String,
    values: RefCell<BTreeMap<String, String>>,
    writes: Cell<usize>,
    fail_writes: Cell<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_namespace(NAMESPACE)
    }

    pub fn with_namespace(namespace: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            values: RefCell::new(BTreeMap::new()),
            writes: Cell::new(0),
            fail_writes: Cell::new(false),
        }
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    /// Successful writes so far.
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }

    /// Raw backend value, bypassing defaults.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.values
            .borrow()
            .get(&scoped_key(&self.namespace, key))
            .cloned()
    }

    /// Overwrite a raw backend value, e.g. to simulate hand-edited data.
    pub fn insert_raw(&self, key: &str, value: &str) {
        self.values
            .borrow_mut()
            .insert(scoped_key(&self.namespace, key), value.to_string());
    }

    fn write(&self, key: &str, value: String) -> Result<(), StorageError> {
        if self.fail_writes.get() {
            return Err(StorageError::WriteRejected {
                key: key.to_string(),
                message: "memory store is read-only".into(),
            });
        }
        self.values
            .borrow_mut()
            .insert(scoped_key(&self.namespace, key), value);
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_int(&self, key: &str, default: i64) -> i64 {
        self.raw(key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }

    fn get_string(&self, key: &str, default: &str) -> String {
        self.raw(key).unwrap_or_else(|| default.to_string())
    }

    fn set_int(&self, key: &str, value: i64) -> Result<(), StorageError> {
        self.write(key, value.to_string())
    }

    fn set_string(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.write(key, value.to_string())
    }
}
