use tracing::debug;

use crate::error::Result;
use crate::map::FieldMap;
use crate::value::FieldValue;

impl FieldMap {
    /// Deep-copy every entry into a new map.
    ///
    /// The copy shares no storage with `self`. If any allocation fails the
    /// partial copy is dropped and the error returned.
    pub fn deep_copy(&self) -> Result<FieldMap> {
        let mut dst = FieldMap::with_capacity(self.len());
        for (id, value) in self.iter() {
            let value = value.try_clone().inspect_err(|err| {
                debug!(field_id = id, error = %err, "failed copying field");
            })?;
            dst.insert_unique(id, value)?;
        }
        Ok(dst)
    }
}

impl FieldValue {
    /// Clone, reporting allocation failure instead of aborting.
    pub fn try_clone(&self) -> Result<FieldValue> {
        match self {
            FieldValue::Int64(value) => Ok(FieldValue::Int64(*value)),
            FieldValue::String(bytes) => copy_slice(bytes).map(FieldValue::String),
            FieldValue::Int64List(values) => copy_slice(values).map(FieldValue::Int64List),
            FieldValue::StringList(items) => {
                let mut copied = Vec::new();
                copied.try_reserve_exact(items.len())?;
                for item in items {
                    copied.push(copy_slice(item)?);
                }
                Ok(FieldValue::StringList(copied))
            }
        }
    }
}

fn copy_slice<T: Copy>(src: &[T]) -> Result<Vec<T>> {
    let mut dst = Vec::new();
    dst.try_reserve_exact(src.len())?;
    dst.extend_from_slice(src);
    Ok(dst)
}
