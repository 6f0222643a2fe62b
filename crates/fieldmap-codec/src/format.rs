//! Bounded debug rendering of a map.
//!
//! Each entry renders as a header line followed by a bracketed value list:
//!
//! ```text
//! id=2 name=greeting type=STRING
//!   ["hello"]
//! ```
//!
//! Printable strings are quoted; anything else is shown as a hex byte list
//! such as `(0x01,0x00,0xff)`. Lists and strings cut short by the configured
//! limits end with `...`. When the full text does not fit the output capacity,
//! rendering stops and [`TRUNCATION_MARKER`] fills the last bytes of it.

use std::fmt::{self, Write};

use tracing::debug;

use crate::config::{FieldNames, FormatConfig};
use crate::error::{MapError, Result};
use crate::map::FieldMap;
use crate::value::{FieldId, FieldValue};

/// Written at the end of text that ran out of capacity.
pub const TRUNCATION_MARKER: &str = "DATA TRUNCATED!!!";

/// Marks a list or string cut short by a limit.
pub const ELLIPSIS: &str = "...";

/// Debug text of a whole map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedText {
    pub text: String,
    /// True when the capacity ran out and the text ends with the marker.
    pub truncated: bool,
}

impl FieldMap {
    /// Render every entry as debug text bounded by `config.max_size`.
    ///
    /// Running out of capacity is not an error: the text is cut and ends
    /// with [`TRUNCATION_MARKER`].
    pub fn to_text(&self, names: &FieldNames, config: &FormatConfig) -> RenderedText {
        let max_size = config.max_size.max(TRUNCATION_MARKER.len());
        let mut sink = BoundedText::new(max_size);

        let outcome = self.iter().try_for_each(|(id, value)| {
            write_entry(&mut sink, id, names.get(id), value, config)
                .map_err(|_| MapError::BufferTooSmall)
        });

        let truncated = matches!(outcome, Err(MapError::BufferTooSmall));
        if truncated {
            debug!(max_size, "debug text truncated");
            sink.cut_to(max_size - TRUNCATION_MARKER.len());
        }
        let mut text = sink.into_inner();
        if truncated {
            text.push_str(TRUNCATION_MARKER);
        }
        RenderedText { text, truncated }
    }
}

/// Render one value's bracketed list without any capacity bound.
pub fn render_value(value: &FieldValue, config: &FormatConfig) -> String {
    let mut out = String::new();
    // Writing into a String never fails.
    write_value(&mut out, value, config).ok();
    out
}

fn write_entry<W: Write>(
    out: &mut W,
    id: FieldId,
    name: &str,
    value: &FieldValue,
    config: &FormatConfig,
) -> fmt::Result {
    writeln!(out, "id={id} name={name} type={}", value.field_type())?;
    out.write_str("  ")?;
    write_value(out, value, config)?;
    out.write_char('\n')
}

fn write_value<W: Write>(out: &mut W, value: &FieldValue, config: &FormatConfig) -> fmt::Result {
    out.write_char('[')?;
    match value {
        FieldValue::Int64(value) => write!(out, "{value}")?,
        FieldValue::String(bytes) => write_bytes(out, bytes, config.max_str_len)?,
        FieldValue::Int64List(values) => {
            write_list(out, values, config.max_elems, |out, value| {
                write!(out, "{value}")
            })?;
        }
        FieldValue::StringList(items) => {
            write_list(out, items, config.max_elems, |out, item| {
                write_bytes(out, item, config.max_str_len)
            })?;
        }
    }
    out.write_char(']')
}

fn write_list<W: Write, T>(
    out: &mut W,
    items: &[T],
    max_elems: Option<usize>,
    mut write_item: impl FnMut(&mut W, &T) -> fmt::Result,
) -> fmt::Result {
    let shown = max_elems.map_or(items.len(), |max| max.min(items.len()));
    for (index, item) in items[..shown].iter().enumerate() {
        if index > 0 {
            out.write_char(',')?;
        }
        write_item(out, item)?;
    }
    if shown < items.len() {
        if shown > 0 {
            out.write_char(',')?;
        }
        out.write_str(ELLIPSIS)?;
    }
    Ok(())
}

fn write_bytes<W: Write>(out: &mut W, bytes: &[u8], max_len: Option<usize>) -> fmt::Result {
    match printable_len(bytes) {
        Some(len) => {
            let text = &bytes[..len];
            let shown = max_len.map_or(len, |max| max.min(len));
            out.write_char('"')?;
            for &byte in &text[..shown] {
                out.write_char(char::from(byte))?;
            }
            out.write_char('"')?;
            if shown < len {
                out.write_str(ELLIPSIS)?;
            }
        }
        None => {
            let shown = max_len.map_or(bytes.len(), |max| max.min(bytes.len()));
            out.write_char('(')?;
            for (index, byte) in bytes[..shown].iter().enumerate() {
                if index > 0 {
                    out.write_char(',')?;
                }
                write!(out, "0x{byte:02x}")?;
            }
            out.write_char(')')?;
            if shown < bytes.len() {
                out.write_str(ELLIPSIS)?;
            }
        }
    }
    Ok(())
}

/// Number of leading bytes to show as text, or `None` if the string must be
/// shown as hex. A single trailing zero byte is dropped.
fn printable_len(bytes: &[u8]) -> Option<usize> {
    let text = match bytes.split_last() {
        Some((0, head)) => head,
        _ => bytes,
    };
    text.iter()
        .all(|byte| (0x20..=0x7e).contains(byte))
        .then_some(text.len())
}

/// Text sink that refuses to grow past `limit` bytes. A write that does not
/// fit is cut at the limit and reported as `fmt::Error`.
struct BoundedText {
    buf: String,
    limit: usize,
}

impl BoundedText {
    fn new(limit: usize) -> Self {
        Self {
            buf: String::new(),
            limit,
        }
    }

    /// Shrink the text to at most `len` bytes, backing off to a char boundary.
    fn cut_to(&mut self, len: usize) {
        let mut cut = len.min(self.buf.len());
        while !self.buf.is_char_boundary(cut) {
            cut -= 1;
        }
        self.buf.truncate(cut);
    }

    fn into_inner(self) -> String {
        self.buf
    }
}

impl Write for BoundedText {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let room = self.limit - self.buf.len();
        if s.len() <= room {
            self.buf.push_str(s);
            return Ok(());
        }
        let mut cut = room;
        while !s.is_char_boundary(cut) {
            cut -= 1;
        }
        self.buf.push_str(&s[..cut]);
        Err(fmt::Error)
    }
}
