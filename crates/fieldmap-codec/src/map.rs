use crate::error::{MapError, Result};
use crate::store::EntryStore;
use crate::value::{FieldId, FieldType, FieldValue};

/// A collection of typed fields keyed by integer ids.
///
/// The map exclusively owns every value stored in it. Setters consume the
/// value they are given; getters hand out borrows that live no longer than
/// the next mutation.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct FieldMap {
    store: EntryStore,
}

impl FieldMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty map sized for roughly `capacity_hint` entries.
    pub fn with_capacity(capacity_hint: usize) -> Self {
        Self {
            store: EntryStore::with_capacity(capacity_hint),
        }
    }

    /// Store `value` under `id`.
    ///
    /// Without `replace`, an existing entry is left untouched and
    /// `AlreadyExist` is returned. With `replace`, the previous value is
    /// dropped whatever its type was.
    pub fn set(&mut self, id: FieldId, value: FieldValue, replace: bool) -> Result<()> {
        value.validate()?;
        if !replace && self.store.contains(id) {
            return Err(MapError::AlreadyExist(id));
        }
        let previous = self.store.put(id, value)?;
        drop(previous);
        Ok(())
    }

    pub fn set_int64(&mut self, id: FieldId, value: i64, replace: bool) -> Result<()> {
        self.set(id, FieldValue::Int64(value), replace)
    }

    /// Store a byte string. Empty strings are rejected.
    pub fn set_string(
        &mut self,
        id: FieldId,
        value: impl Into<Vec<u8>>,
        replace: bool,
    ) -> Result<()> {
        self.set(id, FieldValue::String(value.into()), replace)
    }

    pub fn set_int64_list(
        &mut self,
        id: FieldId,
        values: impl Into<Vec<i64>>,
        replace: bool,
    ) -> Result<()> {
        self.set(id, FieldValue::Int64List(values.into()), replace)
    }

    /// Store a list of byte strings. Every element must be non-empty.
    pub fn set_string_list<I, S>(&mut self, id: FieldId, values: I, replace: bool) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<Vec<u8>>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.set(id, FieldValue::StringList(values), replace)
    }

    /// Borrow the value stored under `id`, if any.
    pub fn get(&self, id: FieldId) -> Option<&FieldValue> {
        self.store.get(id)
    }

    pub fn get_int64(&self, id: FieldId) -> Result<i64> {
        match self.lookup(id)? {
            FieldValue::Int64(value) => Ok(*value),
            other => Err(mismatch(id, FieldType::Int64, other)),
        }
    }

    pub fn get_string(&self, id: FieldId) -> Result<&[u8]> {
        match self.lookup(id)? {
            FieldValue::String(bytes) => Ok(bytes),
            other => Err(mismatch(id, FieldType::String, other)),
        }
    }

    pub fn get_int64_list(&self, id: FieldId) -> Result<&[i64]> {
        match self.lookup(id)? {
            FieldValue::Int64List(values) => Ok(values),
            other => Err(mismatch(id, FieldType::Int64List, other)),
        }
    }

    pub fn get_string_list(&self, id: FieldId) -> Result<&[Vec<u8>]> {
        match self.lookup(id)? {
            FieldValue::StringList(values) => Ok(values),
            other => Err(mismatch(id, FieldType::StringList, other)),
        }
    }

    /// Type of the entry under `id`, or [`FieldType::Empty`] when absent.
    pub fn get_type(&self, id: FieldId) -> FieldType {
        self.store
            .get(id)
            .map_or(FieldType::Empty, FieldValue::field_type)
    }

    pub fn contains(&self, id: FieldId) -> bool {
        self.store.contains(id)
    }

    /// Remove the entry under `id`, returning ownership of its value.
    pub fn remove(&mut self, id: FieldId) -> Option<FieldValue> {
        self.store.remove(id)
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.len() == 0
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.store.drain().for_each(drop);
    }

    /// Iterate entries in storage order, which is unspecified.
    pub fn iter(&self) -> impl Iterator<Item = (FieldId, &FieldValue)> + '_ {
        self.store.iter().map(|(id, value)| (*id, value))
    }

    /// All field ids, ascending.
    pub fn field_ids(&self) -> Vec<FieldId> {
        let mut ids: Vec<FieldId> = self.store.iter().map(|(id, _)| *id).collect();
        ids.sort_unstable();
        ids
    }

    /// Install a freshly decoded or copied entry. A repeated id is a hard
    /// error, never an overwrite.
    pub(crate) fn insert_unique(&mut self, id: FieldId, value: FieldValue) -> Result<()> {
        if self.store.contains(id) {
            return Err(MapError::DuplicatedFieldIds(id));
        }
        self.store.put(id, value)?;
        Ok(())
    }

    fn lookup(&self, id: FieldId) -> Result<&FieldValue> {
        self.store.get(id).ok_or(MapError::NotFound(id))
    }
}

fn mismatch(id: FieldId, expected: FieldType, actual: &FieldValue) -> MapError {
    MapError::TypeMismatch {
        field: id,
        expected,
        actual: actual.field_type(),
    }
}
