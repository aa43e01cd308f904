//! Typed side-car storage scoped to a store's lifetime.

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

/// Lazily-populated table for helper objects that live and die with the
/// store (controllers, caches, adapter glue).
///
/// The type-keyed path cannot mismatch: the entry is keyed by the value's
/// own `TypeId`. The string-keyed path keeps the fail-fast contract for
/// the cases a type key cannot express: asking for a key under the wrong
/// type is a programmer error and panics.
#[derive(Default)]
pub(crate) struct ObjectStateTable {
    by_type: HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
    by_key: HashMap<String, Arc<dyn Any + Send + Sync>>,
}

impl ObjectStateTable {
    pub(crate) fn typed<T: Any + Send + Sync>(&mut self, init: impl FnOnce() -> T) -> Arc<T> {
        let entry = self
            .by_type
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Arc::new(init()));
        Arc::clone(entry)
            .downcast()
            .expect("object state entry keyed by its own TypeId")
    }

    pub(crate) fn keyed<T: Any + Send + Sync>(
        &mut self,
        key: &str,
        init: impl FnOnce() -> T,
    ) -> Arc<T> {
        let entry = self
            .by_key
            .entry(key.to_owned())
            .or_insert_with(|| Arc::new(init()));
        match Arc::clone(entry).downcast() {
            Ok(value) => value,
            Err(_) => panic!(
                "object state '{key}': stored value is not a {}",
                type_name::<T>()
            ),
        }
    }
}
