//! fieldmap-ffi: C-ABI exports for fieldmap.
//!
//! Every call returns an [`FmStatus`]; the text of the most recent error on
//! the calling thread is available from [`fm_last_error`]. Maps are opaque
//! handles released with [`fm_destroy`]. Setters copy caller memory, so the
//! caller always keeps ownership of what it passes in. Buffers and text
//! handed out by the library are released with [`fm_buffer_free`] and
//! [`fm_string_free`].

mod codec;
mod error;
mod map;
mod text;
mod types;
mod value;

use std::panic::AssertUnwindSafe;

pub use codec::{fm_buffer_free, fm_deserialize, fm_deserialize_content, fm_serialize};
pub use map::{fm_copy, fm_count, fm_create, fm_destroy, fm_get_type, fm_remove};
pub use text::{fm_string_free, fm_to_string};
pub use types::{
    FmBuffer, FmMapHandle, FmStatus, FM_TYPE_EMPTY, FM_TYPE_INT64, FM_TYPE_INT64_LIST,
    FM_TYPE_MAX, FM_TYPE_STRING, FM_TYPE_STRING_LIST,
};
pub use value::{
    fm_get_int64, fm_get_int64_list, fm_get_string, fm_get_string_list_item,
    fm_get_string_list_len, fm_set_int64, fm_set_int64_list, fm_set_string, fm_set_string_list,
};

fn ffi_boundary<T>(on_panic: T, f: impl FnOnce() -> T) -> T {
    match std::panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => value,
        Err(_) => {
            error::set_panic_error();
            on_panic
        }
    }
}

/// Clear the calling thread's error text.
#[no_mangle]
pub extern "C" fn fm_clear_error() {
    ffi_boundary((), error::clear_error_state);
}

/// Text of the most recent error on the calling thread. Empty when none.
#[no_mangle]
pub extern "C" fn fm_last_error() -> *const std::os::raw::c_char {
    ffi_boundary(std::ptr::null(), error::last_error_ptr)
}
