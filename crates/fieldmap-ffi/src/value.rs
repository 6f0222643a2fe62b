use fieldmap_codec::{FieldId, FieldValue, MapError};

use crate::error;
use crate::map::{with_map, with_map_mut};
use crate::types::{FmMapHandle, FmStatus};

/// Copy `len` elements from a caller pointer. Null is only accepted for an
/// empty slice.
unsafe fn caller_slice<'a, T>(data: *const T, len: usize, what: &str) -> Result<&'a [T], FmStatus> {
    if len == 0 {
        let empty: &'a [T] = &[];
        return Ok(empty);
    }
    if data.is_null() {
        return Err(error::set_invalid_argument(format!(
            "{what} cannot be null when length is non-zero"
        )));
    }
    // SAFETY: The caller guarantees `data` points to `len` readable elements.
    Ok(unsafe { std::slice::from_raw_parts(data, len) })
}

fn set_value(handle: FmMapHandle, field_id: FieldId, value: FieldValue, replace: bool) -> FmStatus {
    with_map_mut(handle, FmStatus::InvalidArgs, |map| {
        error::status_of(map.set(field_id, value, replace))
    })
}

/// Store a 64-bit integer.
///
/// # Safety
/// `handle` must be a live map handle.
#[no_mangle]
pub unsafe extern "C" fn fm_set_int64(
    handle: FmMapHandle,
    field_id: FieldId,
    value: i64,
    replace: bool,
) -> FmStatus {
    crate::ffi_boundary(FmStatus::Internal, || {
        set_value(handle, field_id, FieldValue::Int64(value), replace)
    })
}

/// Store a copy of `len` bytes at `data`. The caller keeps ownership of
/// `data`.
///
/// # Safety
/// `handle` must be a live map handle; `data` must point to `len` bytes.
#[no_mangle]
pub unsafe extern "C" fn fm_set_string(
    handle: FmMapHandle,
    field_id: FieldId,
    data: *const u8,
    len: usize,
    replace: bool,
) -> FmStatus {
    crate::ffi_boundary(FmStatus::Internal, || {
        if data.is_null() {
            return error::set_invalid_argument("data cannot be null");
        }
        // SAFETY: Pointer validity is guaranteed by the caller.
        let bytes = match unsafe { caller_slice(data, len, "data") } {
            Ok(bytes) => bytes,
            Err(status) => return status,
        };
        set_value(handle, field_id, FieldValue::String(bytes.to_vec()), replace)
    })
}

/// Store a copy of `count` integers at `values`. `values` may be null when
/// `count` is zero.
///
/// # Safety
/// `handle` must be a live map handle; `values` must point to `count` integers.
#[no_mangle]
pub unsafe extern "C" fn fm_set_int64_list(
    handle: FmMapHandle,
    field_id: FieldId,
    values: *const i64,
    count: usize,
    replace: bool,
) -> FmStatus {
    crate::ffi_boundary(FmStatus::Internal, || {
        // SAFETY: Pointer validity is guaranteed by the caller.
        let values = match unsafe { caller_slice(values, count, "values") } {
            Ok(values) => values,
            Err(status) => return status,
        };
        set_value(handle, field_id, FieldValue::Int64List(values.to_vec()), replace)
    })
}

/// Store a copy of a string list.
///
/// `items` is a null-terminated array of string pointers; `lens` holds one
/// length per string. The number of strings is found by walking `items` to
/// its null terminator.
///
/// # Safety
/// `handle` must be a live map handle; `items` must be null-terminated and
/// `lens` must hold at least as many entries as `items` has strings.
#[no_mangle]
pub unsafe extern "C" fn fm_set_string_list(
    handle: FmMapHandle,
    field_id: FieldId,
    items: *const *const u8,
    lens: *const usize,
    replace: bool,
) -> FmStatus {
    crate::ffi_boundary(FmStatus::Internal, || {
        if items.is_null() {
            return error::set_invalid_argument("items cannot be null");
        }

        let mut count = 0usize;
        loop {
            // SAFETY: `items` is null-terminated per the caller contract.
            let ptr = unsafe { *items.add(count) };
            if ptr.is_null() {
                break;
            }
            count += 1;
        }

        // SAFETY: Pointer validity is guaranteed by the caller.
        let (pointers, lens) = match unsafe {
            caller_slice(items, count, "items").and_then(|pointers| {
                caller_slice(lens, count, "lens").map(|lens| (pointers, lens))
            })
        } {
            Ok(pair) => pair,
            Err(status) => return status,
        };

        let mut strings = Vec::new();
        if let Err(err) = strings.try_reserve_exact(count) {
            return error::map_error(&MapError::from(err));
        }
        for (&ptr, &len) in pointers.iter().zip(lens) {
            // SAFETY: Each non-null pointer covers its paired length.
            match unsafe { caller_slice(ptr, len, "string") } {
                Ok(bytes) => strings.push(bytes.to_vec()),
                Err(status) => return status,
            }
        }
        set_value(handle, field_id, FieldValue::StringList(strings), replace)
    })
}

/// Read a 64-bit integer.
///
/// # Safety
/// `handle` must be a live map handle; `out_value` must be a valid pointer.
#[no_mangle]
pub unsafe extern "C" fn fm_get_int64(
    handle: FmMapHandle,
    field_id: FieldId,
    out_value: *mut i64,
) -> FmStatus {
    crate::ffi_boundary(FmStatus::Internal, || {
        if out_value.is_null() {
            return error::set_invalid_argument("out_value cannot be null");
        }
        with_map(handle, FmStatus::InvalidArgs, |map| match map.get_int64(field_id) {
            Ok(value) => {
                // SAFETY: Pointer validity is guaranteed by the caller.
                unsafe { *out_value = value };
                FmStatus::Success
            }
            Err(err) => error::map_error(&err),
        })
    })
}

/// Borrow a string. The pointer stays valid until the map is next mutated
/// or destroyed and must not be freed by the caller.
///
/// # Safety
/// `handle` must be a live map handle; out pointers must be valid.
#[no_mangle]
pub unsafe extern "C" fn fm_get_string(
    handle: FmMapHandle,
    field_id: FieldId,
    out_data: *mut *const u8,
    out_len: *mut usize,
) -> FmStatus {
    crate::ffi_boundary(FmStatus::Internal, || {
        if out_data.is_null() || out_len.is_null() {
            return error::set_invalid_argument("out_data and out_len cannot be null");
        }
        with_map(handle, FmStatus::InvalidArgs, |map| match map.get_string(field_id) {
            // SAFETY: Out pointers were checked above.
            Ok(bytes) => unsafe { write_borrowed(out_data, out_len, bytes) },
            Err(err) => error::map_error(&err),
        })
    })
}

/// Borrow an integer list. An empty list yields a null pointer and zero
/// length.
///
/// # Safety
/// `handle` must be a live map handle; out pointers must be valid.
#[no_mangle]
pub unsafe extern "C" fn fm_get_int64_list(
    handle: FmMapHandle,
    field_id: FieldId,
    out_values: *mut *const i64,
    out_count: *mut usize,
) -> FmStatus {
    crate::ffi_boundary(FmStatus::Internal, || {
        if out_values.is_null() || out_count.is_null() {
            return error::set_invalid_argument("out_values and out_count cannot be null");
        }
        with_map(handle, FmStatus::InvalidArgs, |map| {
            match map.get_int64_list(field_id) {
                // SAFETY: Out pointers were checked above.
                Ok(values) => unsafe { write_borrowed(out_values, out_count, values) },
                Err(err) => error::map_error(&err),
            }
        })
    })
}

/// Number of strings in a string list.
///
/// # Safety
/// `handle` must be a live map handle; `out_count` must be a valid pointer.
#[no_mangle]
pub unsafe extern "C" fn fm_get_string_list_len(
    handle: FmMapHandle,
    field_id: FieldId,
    out_count: *mut usize,
) -> FmStatus {
    crate::ffi_boundary(FmStatus::Internal, || {
        if out_count.is_null() {
            return error::set_invalid_argument("out_count cannot be null");
        }
        with_map(handle, FmStatus::InvalidArgs, |map| {
            match map.get_string_list(field_id) {
                Ok(items) => {
                    // SAFETY: Pointer validity is guaranteed by the caller.
                    unsafe { *out_count = items.len() };
                    FmStatus::Success
                }
                Err(err) => error::map_error(&err),
            }
        })
    })
}

/// Borrow one string of a string list.
///
/// # Safety
/// `handle` must be a live map handle; out pointers must be valid.
#[no_mangle]
pub unsafe extern "C" fn fm_get_string_list_item(
    handle: FmMapHandle,
    field_id: FieldId,
    index: usize,
    out_data: *mut *const u8,
    out_len: *mut usize,
) -> FmStatus {
    crate::ffi_boundary(FmStatus::Internal, || {
        if out_data.is_null() || out_len.is_null() {
            return error::set_invalid_argument("out_data and out_len cannot be null");
        }
        with_map(handle, FmStatus::InvalidArgs, |map| {
            let items = match map.get_string_list(field_id) {
                Ok(items) => items,
                Err(err) => return error::map_error(&err),
            };
            match items.get(index) {
                // SAFETY: Out pointers were checked above.
                Some(item) => unsafe { write_borrowed(out_data, out_len, item) },
                None => error::set_invalid_argument(format!(
                    "index {index} out of range for {} strings",
                    items.len()
                )),
            }
        })
    })
}

unsafe fn write_borrowed<T>(out_data: *mut *const T, out_len: *mut usize, items: &[T]) -> FmStatus {
    let ptr = if items.is_empty() {
        std::ptr::null()
    } else {
        items.as_ptr()
    };
    // SAFETY: The caller checked both out pointers.
    unsafe {
        *out_data = ptr;
        *out_len = items.len();
    }
    FmStatus::Success
}
