use std::cell::RefCell;
use std::ffi::CString;
use std::os::raw::c_char;

use fieldmap_codec::MapError;

use crate::types::FmStatus;

thread_local! {
    static LAST_ERROR: RefCell<CString> = RefCell::new(CString::default());
}

pub(crate) fn clear_error_state() {
    LAST_ERROR.with(|state| {
        *state.borrow_mut() = CString::default();
    });
}

pub(crate) fn set_error_message(message: impl Into<String>) {
    let message = message.into().replace('\0', "?");
    LAST_ERROR.with(|state| {
        *state.borrow_mut() = CString::new(message).unwrap_or_default();
    });
}

pub(crate) fn set_invalid_argument(message: impl Into<String>) -> FmStatus {
    set_error_message(message);
    FmStatus::InvalidArgs
}

pub(crate) fn set_panic_error() {
    set_error_message("panic across FFI boundary");
}

pub(crate) fn map_error(err: &MapError) -> FmStatus {
    set_error_message(err.to_string());
    match err {
        MapError::NotFound(_) => FmStatus::NotFound,
        MapError::AlreadyExist(_) => FmStatus::AlreadyExist,
        MapError::DuplicatedFieldIds(_) => FmStatus::DuplicatedFieldIds,
        MapError::InsufficientMem(_) => FmStatus::InsufficientMem,
        MapError::TypeMismatch { .. } => FmStatus::TypeMismatch,
        MapError::InvalidArgs(_) => FmStatus::InvalidArgs,
        MapError::UnknownType(_) => FmStatus::UnknownType,
        MapError::TruncatedData { .. } => FmStatus::TruncatedData,
        MapError::BufferTooSmall => FmStatus::BufferTooSmall,
        MapError::IntegerOverflow => FmStatus::IntegerOverflow,
        MapError::BadData(_) => FmStatus::BadData,
    }
}

/// Collapse a core result into a status, recording the error text.
pub(crate) fn status_of(result: fieldmap_codec::Result<()>) -> FmStatus {
    match result {
        Ok(()) => FmStatus::Success,
        Err(err) => map_error(&err),
    }
}

pub(crate) fn last_error_ptr() -> *const c_char {
    LAST_ERROR.with(|state| state.borrow().as_ptr())
}
