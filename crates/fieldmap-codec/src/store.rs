use std::collections::hash_map;
use std::collections::HashMap;

use crate::error::Result;
use crate::value::{FieldId, FieldValue};

/// Associative storage for map entries, keyed by field id.
///
/// `put` never checks for an existing key; callers that care about
/// duplicates look first. Iteration order is unspecified.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct EntryStore {
    entries: HashMap<FieldId, FieldValue>,
}

impl EntryStore {
    pub(crate) fn with_capacity(capacity_hint: usize) -> Self {
        Self {
            entries: HashMap::with_capacity(capacity_hint),
        }
    }

    /// Store `value` under `id`, handing back any previous value.
    ///
    /// Fails only when growing the table cannot be allocated.
    pub(crate) fn put(&mut self, id: FieldId, value: FieldValue) -> Result<Option<FieldValue>> {
        if !self.entries.contains_key(&id) {
            self.entries.try_reserve(1)?;
        }
        Ok(self.entries.insert(id, value))
    }

    pub(crate) fn get(&self, id: FieldId) -> Option<&FieldValue> {
        self.entries.get(&id)
    }

    pub(crate) fn contains(&self, id: FieldId) -> bool {
        self.entries.contains_key(&id)
    }

    pub(crate) fn remove(&mut self, id: FieldId) -> Option<FieldValue> {
        self.entries.remove(&id)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn iter(&self) -> hash_map::Iter<'_, FieldId, FieldValue> {
        self.entries.iter()
    }

    /// Visit every entry once, leaving the store empty.
    pub(crate) fn drain(&mut self) -> hash_map::Drain<'_, FieldId, FieldValue> {
        self.entries.drain()
    }
}
