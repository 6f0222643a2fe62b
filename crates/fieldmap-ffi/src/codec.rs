use std::ptr;

use fieldmap_codec::FieldMap;

use crate::error;
use crate::map::{with_map, write_map_out};
use crate::types::{FmBuffer, FmMapHandle, FmStatus};

fn write_buffer_out(out_buffer: *mut FmBuffer, bytes: Vec<u8>) -> FmStatus {
    let buffer_ref = {
        // SAFETY: Pointer validity is guaranteed by the caller.
        unsafe { &mut *out_buffer }
    };

    let boxed: Box<[u8]> = bytes.into_boxed_slice();
    let len = boxed.len();
    buffer_ref.data = Box::into_raw(boxed) as *mut u8;
    buffer_ref.len = len;
    FmStatus::Success
}

/// Serialize a map into a new buffer. Release it with `fm_buffer_free`.
///
/// # Safety
/// `handle` must be a live map handle; `out_buffer` must be a valid pointer.
#[no_mangle]
pub unsafe extern "C" fn fm_serialize(handle: FmMapHandle, out_buffer: *mut FmBuffer) -> FmStatus {
    crate::ffi_boundary(FmStatus::Internal, || {
        if out_buffer.is_null() {
            return error::set_invalid_argument("out_buffer cannot be null");
        }
        with_map(handle, FmStatus::InvalidArgs, |map| match map.serialize() {
            Ok(bytes) => write_buffer_out(out_buffer, bytes),
            Err(err) => error::map_error(&err),
        })
    })
}

/// Decode a buffer that starts with the 4-byte length header.
///
/// # Safety
/// `data` must point to `len` readable bytes; `out_map` must be a valid pointer.
#[no_mangle]
pub unsafe extern "C" fn fm_deserialize(
    data: *const u8,
    len: usize,
    out_map: *mut FmMapHandle,
) -> FmStatus {
    crate::ffi_boundary(FmStatus::Internal, || {
        // SAFETY: Pointer validity is guaranteed by the caller.
        decode_into(unsafe { input_slice(data, len) }, out_map, FieldMap::deserialize)
    })
}

/// Decode a raw payload without the length header.
///
/// # Safety
/// `data` must point to `len` readable bytes; `out_map` must be a valid pointer.
#[no_mangle]
pub unsafe extern "C" fn fm_deserialize_content(
    data: *const u8,
    len: usize,
    out_map: *mut FmMapHandle,
) -> FmStatus {
    crate::ffi_boundary(FmStatus::Internal, || {
        // SAFETY: Pointer validity is guaranteed by the caller.
        decode_into(
            unsafe { input_slice(data, len) },
            out_map,
            FieldMap::deserialize_content,
        )
    })
}

/// Release a buffer filled by `fm_serialize`.
///
/// # Safety
/// `buffer` must be null or point to an `FmBuffer` whose data, if non-null,
/// came from this library.
#[no_mangle]
pub unsafe extern "C" fn fm_buffer_free(buffer: *mut FmBuffer) {
    crate::ffi_boundary((), || {
        if buffer.is_null() {
            return;
        }

        let buffer_ref = {
            // SAFETY: Pointer validity is guaranteed by the caller.
            unsafe { &mut *buffer }
        };

        if !buffer_ref.data.is_null() {
            let slice_ptr = ptr::slice_from_raw_parts_mut(buffer_ref.data, buffer_ref.len);
            // SAFETY: `data` was allocated as a `Box<[u8]>` in `fm_serialize`.
            unsafe {
                drop(Box::from_raw(slice_ptr));
            }
        }

        *buffer_ref = FmBuffer::default();
    });
}

unsafe fn input_slice<'a>(data: *const u8, len: usize) -> Option<&'a [u8]> {
    if data.is_null() {
        let empty: &'a [u8] = &[];
        return (len == 0).then_some(empty);
    }
    // SAFETY: The caller guarantees `data` points to `len` readable bytes.
    Some(unsafe { std::slice::from_raw_parts(data, len) })
}

fn decode_into(
    input: Option<&[u8]>,
    out_map: *mut FmMapHandle,
    decode: fn(&[u8]) -> fieldmap_codec::Result<FieldMap>,
) -> FmStatus {
    if out_map.is_null() {
        return error::set_invalid_argument("out_map cannot be null");
    }
    let Some(input) = input else {
        return error::set_invalid_argument("data cannot be null when len is non-zero");
    };
    match decode(input) {
        Ok(map) => write_map_out(out_map, map),
        Err(err) => error::map_error(&err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::{fm_create, fm_destroy};
    use crate::value::{fm_get_int64, fm_set_int64, fm_set_string};

    #[test]
    fn serialize_and_deserialize() {
        let handle = fm_create();
        let mut buffer = FmBuffer::default();
        let mut decoded: FmMapHandle = ptr::null_mut();
        let mut value = 0i64;
        // SAFETY: handles are live and out pointers are valid.
        unsafe {
            assert_eq!(fm_set_int64(handle, 1, 123, false), FmStatus::Success);
            assert_eq!(fm_serialize(handle, &mut buffer), FmStatus::Success);
            assert_eq!(buffer.len, 20);

            assert_eq!(
                fm_deserialize(buffer.data, buffer.len, &mut decoded),
                FmStatus::Success
            );
            assert_eq!(fm_get_int64(decoded, 1, &mut value), FmStatus::Success);

            fm_buffer_free(&mut buffer);
            fm_destroy(decoded);
            fm_destroy(handle);
        }
        assert_eq!(value, 123);
        assert!(buffer.data.is_null());
        assert_eq!(buffer.len, 0);
    }

    #[test]
    fn truncated_input_reports_status_and_no_map() {
        let handle = fm_create();
        let mut buffer = FmBuffer::default();
        let mut decoded: FmMapHandle = ptr::null_mut();
        // SAFETY: handles are live and out pointers are valid.
        unsafe {
            assert_eq!(
                fm_set_string(handle, 2, b"hello".as_ptr(), 5, false),
                FmStatus::Success
            );
            assert_eq!(fm_serialize(handle, &mut buffer), FmStatus::Success);
            assert_eq!(
                fm_deserialize(buffer.data, buffer.len - 1, &mut decoded),
                FmStatus::TruncatedData
            );
            assert_eq!(
                fm_deserialize_content(buffer.data.add(4), buffer.len - 5, &mut decoded),
                FmStatus::TruncatedData
            );
            fm_buffer_free(&mut buffer);
            fm_destroy(handle);
        }
        assert!(decoded.is_null());
    }

    #[test]
    fn empty_input_decodes_to_empty_content() {
        let mut decoded: FmMapHandle = ptr::null_mut();
        // SAFETY: a null pointer is accepted for zero-length input.
        unsafe {
            assert_eq!(
                fm_deserialize_content(ptr::null(), 0, &mut decoded),
                FmStatus::Success
            );
            assert!(!decoded.is_null());
            fm_destroy(decoded);

            assert_eq!(
                fm_deserialize(ptr::null(), 0, &mut decoded),
                FmStatus::TruncatedData
            );
            assert_eq!(
                fm_deserialize(ptr::null(), 3, &mut decoded),
                FmStatus::InvalidArgs
            );
        }
    }
}
