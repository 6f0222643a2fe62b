use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use fieldmap_codec::{FieldId, FieldNames, FormatConfig};

use crate::error;
use crate::map::with_map;
use crate::types::{FmMapHandle, FmStatus};

/// Negative limits mean "unlimited".
fn limit(value: i64) -> Option<usize> {
    usize::try_from(value).ok()
}

unsafe fn read_names(
    ids: *const FieldId,
    names: *const *const c_char,
    count: usize,
) -> Result<FieldNames, FmStatus> {
    if count == 0 {
        return Ok(FieldNames::new());
    }
    if ids.is_null() || names.is_null() {
        return Err(error::set_invalid_argument(
            "ids and names cannot be null when name_count is non-zero",
        ));
    }

    // SAFETY: The caller guarantees both arrays hold `count` entries.
    let (ids, names) = unsafe {
        (
            std::slice::from_raw_parts(ids, count),
            std::slice::from_raw_parts(names, count),
        )
    };

    let mut table = FieldNames::new();
    for (&id, &name) in ids.iter().zip(names) {
        if name.is_null() {
            continue;
        }
        // SAFETY: Non-null names are NUL-terminated per the caller contract.
        let name = unsafe { CStr::from_ptr(name) };
        table.insert(id, name.to_string_lossy());
    }
    Ok(table)
}

/// Render a map as debug text.
///
/// `ids`/`names` form an optional id→name table of `name_count` entries.
/// Negative `max_elems`/`max_str_len` mean unlimited; `max_size` of zero uses
/// the default capacity. Text that runs out of capacity still succeeds and
/// ends with the truncation marker. Release the text with `fm_string_free`.
///
/// # Safety
/// `handle` must be a live map handle; the name arrays must hold
/// `name_count` entries; `out_text` must be a valid pointer.
#[no_mangle]
#[allow(clippy::too_many_arguments)]
pub unsafe extern "C" fn fm_to_string(
    handle: FmMapHandle,
    ids: *const FieldId,
    names: *const *const c_char,
    name_count: usize,
    max_elems: i64,
    max_str_len: i64,
    max_size: usize,
    out_text: *mut *mut c_char,
) -> FmStatus {
    crate::ffi_boundary(FmStatus::Internal, || {
        if out_text.is_null() {
            return error::set_invalid_argument("out_text cannot be null");
        }

        // SAFETY: Pointer validity is guaranteed by the caller.
        let table = match unsafe { read_names(ids, names, name_count) } {
            Ok(table) => table,
            Err(status) => return status,
        };

        let mut config = FormatConfig::default()
            .with_max_elems(limit(max_elems))
            .with_max_str_len(limit(max_str_len));
        if max_size > 0 {
            config = config.with_max_size(max_size);
        }

        with_map(handle, FmStatus::InvalidArgs, |map| {
            let rendered = map.to_text(&table, &config);
            let Ok(text) = CString::new(rendered.text) else {
                error::set_error_message("rendered text contains a NUL byte");
                return FmStatus::Internal;
            };
            // SAFETY: Pointer validity is guaranteed by the caller.
            unsafe {
                *out_text = text.into_raw();
            }
            FmStatus::Success
        })
    })
}

/// Release text returned by `fm_to_string`.
///
/// # Safety
/// `text` must be null or a pointer returned by `fm_to_string`.
#[no_mangle]
pub unsafe extern "C" fn fm_string_free(text: *mut c_char) {
    crate::ffi_boundary((), || {
        if text.is_null() {
            return;
        }
        // SAFETY: `text` came from `CString::into_raw` in `fm_to_string`.
        unsafe {
            drop(CString::from_raw(text));
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::{fm_create, fm_destroy};
    use crate::value::{fm_set_int64, fm_set_string};

    #[test]
    fn renders_with_names_and_limits() {
        let handle = fm_create();
        let ids = [1];
        let name = CString::new("greeting").unwrap();
        let names = [name.as_ptr()];
        let mut out: *mut c_char = std::ptr::null_mut();
        // SAFETY: handle is live; arrays hold one entry each.
        let text = unsafe {
            assert_eq!(
                fm_set_string(handle, 1, b"abcdef".as_ptr(), 6, false),
                FmStatus::Success
            );
            assert_eq!(
                fm_to_string(handle, ids.as_ptr(), names.as_ptr(), 1, -1, 3, 0, &mut out),
                FmStatus::Success
            );
            let text = CStr::from_ptr(out).to_string_lossy().into_owned();
            fm_string_free(out);
            fm_destroy(handle);
            text
        };
        assert_eq!(text, "id=1 name=greeting type=STRING\n  [\"abc\"...]\n");
    }

    #[test]
    fn tiny_capacity_yields_only_marker() {
        let handle = fm_create();
        let mut out: *mut c_char = std::ptr::null_mut();
        // SAFETY: handle is live; no name table is passed.
        let text = unsafe {
            assert_eq!(fm_set_int64(handle, 1, 1, false), FmStatus::Success);
            assert_eq!(
                fm_to_string(
                    handle,
                    std::ptr::null(),
                    std::ptr::null(),
                    0,
                    -1,
                    -1,
                    1,
                    &mut out
                ),
                FmStatus::Success
            );
            let text = CStr::from_ptr(out).to_string_lossy().into_owned();
            fm_string_free(out);
            fm_destroy(handle);
            text
        };
        assert_eq!(text, fieldmap_codec::TRUNCATION_MARKER);
    }

    #[test]
    fn negative_limits_are_unlimited() {
        assert_eq!(limit(-1), None);
        assert_eq!(limit(0), Some(0));
        assert_eq!(limit(7), Some(7));
    }
}
