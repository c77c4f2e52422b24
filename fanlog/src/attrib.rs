//! Per-call attribute exchange between call sites and backends.
//!
//! Call sites attach *directives* to a log call; each directive writes one or
//! more opaque key/value entries into that call's [`AttribStore`]. During
//! fan-out every backend's message gets a read-only view of the store and
//! pulls out the entries it understands. The store is created fresh for each
//! call and discarded when the call completes, so backends can never retain
//! it.
//!
//! Values are intentionally type-erased: directives are backend-private
//! vocabulary, and the facade must not know backend types. A backend's
//! compose step is responsible for checking presence and shape, failing with
//! a descriptive error rather than trusting the call site.

use crate::error::BackendError;
use std::any::Any;
use std::collections::HashMap;

/// Store key for the core stack-depth directive. Always seeded by the
/// dispatcher before caller directives run.
pub const DEPTH: &str = "Depth";

/// Store key for the facade-wide verbosity directive.
pub const VERBOSITY: &str = "Verbosity";

/// A directive: a closure that writes entries into a call's attribute store.
///
/// Directives apply in the order given at the call site; a later directive
/// overwrites an earlier one targeting the same key.
pub type Attrib = Box<dyn FnOnce(&mut AttribStore) + Send>;

/// Extra stack frames a call-site-reporting sink should skip above the
/// logging call itself.
pub fn depth(frames: usize) -> Attrib {
    Box::new(move |store| store.store(DEPTH, frames))
}

/// Marks the call as verbose-informational at level `v`.
///
/// Calls carrying a verbosity above the dispatcher's configured threshold
/// (see `Dispatcher::set_verbosity`) are dropped before fan-out. The value
/// also remains visible to backends that grade their own output.
pub fn verbosity(v: i32) -> Attrib {
    Box::new(move |store| store.store(VERBOSITY, v))
}

/// Ordered-irrelevant, type-erased key/value map for one log call.
///
/// Keys are unique; storing to an existing key overwrites it.
#[derive(Default)]
pub struct AttribStore {
    values: HashMap<String, Box<dyn Any + Send>>,
}

impl AttribStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the value under `key`.
    pub fn store<V: Any + Send>(&mut self, key: impl Into<String>, value: V) {
        self.values.insert(key.into(), Box::new(value));
    }

    /// Raw lookup with no type coercion.
    pub fn load(&self, key: &str) -> Option<&(dyn Any + Send)> {
        self.values.get(key).map(|value| value.as_ref())
    }

    /// Typed lookup; `None` when the key is absent or holds another type.
    pub fn load_as<T: Any>(&self, key: &str) -> Option<&T> {
        self.load(key).and_then(|value| value.downcast_ref::<T>())
    }

    /// Typed lookup for a directive the backend requires.
    ///
    /// # Errors
    ///
    /// [`BackendError::MissingAttrib`] when the key is absent,
    /// [`BackendError::AttribType`] when the value has the wrong type.
    pub fn get<T: Any>(&self, key: &str) -> Result<&T, BackendError> {
        match self.get_opt(key)? {
            Some(value) => Ok(value),
            None => Err(BackendError::MissingAttrib {
                key: key.to_string(),
            }),
        }
    }

    /// Typed lookup for an optional directive.
    ///
    /// Absence is fine (`Ok(None)`); a present value of the wrong type is
    /// still a descriptive error.
    pub fn get_opt<T: Any>(&self, key: &str) -> Result<Option<&T>, BackendError> {
        match self.load(key) {
            None => Ok(None),
            Some(value) => match value.downcast_ref::<T>() {
                Some(typed) => Ok(Some(typed)),
                None => Err(BackendError::AttribType {
                    key: key.to_string(),
                    expected: std::any::type_name::<T>(),
                }),
            },
        }
    }

    /// Number of entries in the store.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
