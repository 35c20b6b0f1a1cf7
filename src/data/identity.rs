//! Stable row identity.
//!
//! Keys are assigned per distinct row *object*, not per value: two
//! field-equal rows constructed separately get two different keys. The
//! association is weak and non-owning, keyed by allocation address with
//! the live handle double-checked on every lookup, since an address can
//! be reused after the original row is dropped.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use serde::Serialize;

use crate::types::Row;

/// Opaque, stable identity of one row object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct RowKey(u64);

impl RowKey {
    #[cfg(test)]
    pub(crate) fn test_key(n: u64) -> RowKey {
        RowKey(n)
    }
}

impl std::fmt::Display for RowKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Weak identity map. Interior-mutable so that read paths (flatten,
/// selection recompute) can memoize keys without `&mut` plumbing.
#[derive(Default)]
pub struct RowKeys {
    entries: RefCell<HashMap<usize, (Weak<Row>, RowKey)>>,
    next: Cell<u64>,
}

impl RowKeys {
    pub fn new() -> Self {
        RowKeys::default()
    }

    /// The memoized key for this row object, assigning one on first sight.
    pub fn key(&self, row: &Rc<Row>) -> RowKey {
        let addr = Rc::as_ptr(row) as usize;
        let mut entries = self.entries.borrow_mut();
        if let Some((weak, key)) = entries.get(&addr) {
            if weak.upgrade().is_some_and(|live| Rc::ptr_eq(&live, row)) {
                return *key;
            }
            // Address reuse after the original row died: re-key.
        }
        let key = RowKey(self.next.get().wrapping_add(1));
        self.next.set(key.0);
        entries.insert(addr, (Rc::downgrade(row), key));
        key
    }

    /// Drop entries whose rows are gone. Called on data replacement.
    pub fn sweep(&self) {
        self.entries
            .borrow_mut()
            .retain(|_, (weak, _)| weak.strong_count() > 0);
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn same_object_same_key() {
        let keys = RowKeys::new();
        let row = Row::from_value(json!({"name": "a"}));
        assert_eq!(keys.key(&row), keys.key(&row));
    }

    #[test]
    fn equal_values_distinct_keys() {
        let keys = RowKeys::new();
        let a = Row::from_value(json!({"name": "a"}));
        let b = Row::from_value(json!({"name": "a"}));
        assert_ne!(keys.key(&a), keys.key(&b));
    }

    #[test]
    fn sweep_drops_dead_rows() {
        let keys = RowKeys::new();
        let a = Row::from_value(json!({"name": "a"}));
        keys.key(&a);
        {
            let b = Row::from_value(json!({"name": "b"}));
            keys.key(&b);
            assert_eq!(keys.len(), 2);
        }
        keys.sweep();
        assert_eq!(keys.len(), 1);
    }
}
