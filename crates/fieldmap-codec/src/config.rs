use std::collections::HashMap;

use crate::format::TRUNCATION_MARKER;
use crate::value::FieldId;

/// Default capacity of rendered debug text: 16 KiB.
pub const DEFAULT_MAX_TEXT_SIZE: usize = 16 * 1024;

/// Limits applied when rendering a map as debug text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatConfig {
    /// Maximum elements shown per list. `None` shows every element.
    pub max_elems: Option<usize>,
    /// Maximum bytes shown per string. `None` shows the whole string.
    pub max_str_len: Option<usize>,
    /// Capacity of the rendered text in bytes. Default: 16 KiB. Values below
    /// the truncation marker length render as if they were that length.
    pub max_size: usize,
}

impl FormatConfig {
    pub fn with_max_elems(mut self, max_elems: Option<usize>) -> Self {
        self.max_elems = max_elems;
        self
    }

    pub fn with_max_str_len(mut self, max_str_len: Option<usize>) -> Self {
        self.max_str_len = max_str_len;
        self
    }

    /// Set the output capacity. Never smaller than the truncation marker.
    pub fn with_max_size(mut self, max_size: usize) -> Self {
        self.max_size = max_size.max(TRUNCATION_MARKER.len());
        self
    }
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            max_elems: None,
            max_str_len: None,
            max_size: DEFAULT_MAX_TEXT_SIZE,
        }
    }
}

/// Display names for field ids. Ids without a name render with an empty one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldNames {
    names: HashMap<FieldId, String>,
}

impl FieldNames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: FieldId, name: impl Into<String>) {
        self.names.insert(id, name.into());
    }

    /// Name of `id`, or `""` when the table has none.
    pub fn get(&self, id: FieldId) -> &str {
        self.names.get(&id).map_or("", String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(FieldId, S)> for FieldNames {
    fn from_iter<I: IntoIterator<Item = (FieldId, S)>>(iter: I) -> Self {
        Self {
            names: iter
                .into_iter()
                .map(|(id, name)| (id, name.into()))
                .collect(),
        }
    }
}

impl From<HashMap<FieldId, String>> for FieldNames {
    fn from(names: HashMap<FieldId, String>) -> Self {
        Self { names }
    }
}
