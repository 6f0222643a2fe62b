use fieldmap_codec::{FieldId, FieldMap};
use tracing::warn;

use crate::error;
use crate::types::{FmMapHandle, FmStatus, MapHandle, MAP_COOKIE};

/// Resolve a handle to its map, rejecting null handles and handles whose
/// cookie does not match.
pub(crate) fn with_map<T>(handle: FmMapHandle, on_error: T, f: impl FnOnce(&FieldMap) -> T) -> T {
    match checked_handle(handle) {
        Some(map_handle) => f(&map_handle.map),
        None => on_error,
    }
}

pub(crate) fn with_map_mut<T>(
    handle: FmMapHandle,
    on_error: T,
    f: impl FnOnce(&mut FieldMap) -> T,
) -> T {
    match checked_handle(handle) {
        Some(map_handle) => f(&mut map_handle.map),
        None => on_error,
    }
}

fn checked_handle<'a>(handle: FmMapHandle) -> Option<&'a mut MapHandle> {
    if handle.is_null() {
        let _ = error::set_invalid_argument("map handle cannot be null");
        return None;
    }

    let map_handle = {
        // SAFETY: Pointer validity is guaranteed by the caller.
        unsafe { &mut *(handle as *mut MapHandle) }
    };

    if map_handle.cookie != MAP_COOKIE {
        warn!(cookie = map_handle.cookie, "rejecting map handle with bad cookie");
        let _ = error::set_invalid_argument("map handle is not a live fieldmap");
        return None;
    }

    Some(map_handle)
}

/// Write a freshly built map to `out_map`.
pub(crate) fn write_map_out(out_map: *mut FmMapHandle, map: FieldMap) -> FmStatus {
    if out_map.is_null() {
        return error::set_invalid_argument("out_map cannot be null");
    }

    // SAFETY: Pointer validity is guaranteed by the caller.
    unsafe {
        *out_map = MapHandle::new(map).into_raw();
    }
    FmStatus::Success
}

/// Create an empty map. Release with `fm_destroy`.
#[no_mangle]
pub extern "C" fn fm_create() -> FmMapHandle {
    crate::ffi_boundary(std::ptr::null_mut(), || {
        MapHandle::new(FieldMap::new()).into_raw()
    })
}

/// Destroy a map and every value it owns.
///
/// # Safety
/// `handle` must be null or a handle returned by this library that has not
/// been destroyed yet.
#[no_mangle]
pub unsafe extern "C" fn fm_destroy(handle: FmMapHandle) {
    crate::ffi_boundary((), || {
        if checked_handle(handle).is_none() {
            return;
        }

        let mut boxed = {
            // SAFETY: Handle was allocated by `MapHandle::into_raw`.
            unsafe { Box::from_raw(handle as *mut MapHandle) }
        };
        boxed.cookie = 0;
        drop(boxed);
    });
}

/// Deep-copy `src` into a new map written to `out_map`.
///
/// # Safety
/// `src` must be a live map handle; `out_map` must be a valid pointer.
#[no_mangle]
pub unsafe extern "C" fn fm_copy(src: FmMapHandle, out_map: *mut FmMapHandle) -> FmStatus {
    crate::ffi_boundary(FmStatus::Internal, || {
        with_map(src, FmStatus::InvalidArgs, |map| match map.deep_copy() {
            Ok(copy) => write_map_out(out_map, copy),
            Err(err) => error::map_error(&err),
        })
    })
}

/// Number of entries in the map.
///
/// # Safety
/// `handle` must be a live map handle; `out_count` must be a valid pointer.
#[no_mangle]
pub unsafe extern "C" fn fm_count(handle: FmMapHandle, out_count: *mut usize) -> FmStatus {
    crate::ffi_boundary(FmStatus::Internal, || {
        if out_count.is_null() {
            return error::set_invalid_argument("out_count cannot be null");
        }
        with_map(handle, FmStatus::InvalidArgs, |map| {
            // SAFETY: Pointer validity is guaranteed by the caller.
            unsafe {
                *out_count = map.len();
            }
            FmStatus::Success
        })
    })
}

/// Remove and release the entry under `field_id`.
///
/// # Safety
/// `handle` must be a live map handle.
#[no_mangle]
pub unsafe extern "C" fn fm_remove(handle: FmMapHandle, field_id: FieldId) -> FmStatus {
    crate::ffi_boundary(FmStatus::Internal, || {
        with_map_mut(handle, FmStatus::InvalidArgs, |map| {
            match map.remove(field_id) {
                Some(_) => FmStatus::Success,
                None => error::map_error(&fieldmap_codec::MapError::NotFound(field_id)),
            }
        })
    })
}

/// Type tag of the entry under `field_id`; `FM_TYPE_EMPTY` when absent or
/// when the handle is invalid.
///
/// # Safety
/// `handle` must be a live map handle.
#[no_mangle]
pub unsafe extern "C" fn fm_get_type(handle: FmMapHandle, field_id: FieldId) -> u32 {
    crate::ffi_boundary(0, || {
        with_map(handle, 0, |map| map.get_type(field_id).wire_tag())
    })
}
