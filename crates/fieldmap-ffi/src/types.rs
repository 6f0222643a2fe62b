use std::ffi::c_void;

use fieldmap_codec::{FieldMap, FieldType, TYPE_MAX};

#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FmStatus {
    Success = 0,
    NotFound = 1,
    AlreadyExist = 2,
    DuplicatedFieldIds = 3,
    InsufficientMem = 4,
    TypeMismatch = 5,
    InvalidArgs = 6,
    UnknownType = 7,
    TruncatedData = 8,
    BufferTooSmall = 9,
    IntegerOverflow = 10,
    BadData = 11,
    Internal = 99,
}

pub const FM_TYPE_EMPTY: u32 = FieldType::Empty as u32;
pub const FM_TYPE_INT64: u32 = FieldType::Int64 as u32;
pub const FM_TYPE_STRING: u32 = FieldType::String as u32;
pub const FM_TYPE_INT64_LIST: u32 = FieldType::Int64List as u32;
pub const FM_TYPE_STRING_LIST: u32 = FieldType::StringList as u32;
pub const FM_TYPE_MAX: u32 = TYPE_MAX;

/// Serialized bytes handed to the caller. Release with `fm_buffer_free`.
#[repr(C)]
#[derive(Debug)]
pub struct FmBuffer {
    pub data: *mut u8,
    pub len: usize,
}

impl Default for FmBuffer {
    fn default() -> Self {
        Self {
            data: std::ptr::null_mut(),
            len: 0,
        }
    }
}

pub type FmMapHandle = *mut c_void;

/// "FMAP"
pub(crate) const MAP_COOKIE: u32 = 0x464D_4150;

/// Heap object behind an `FmMapHandle`.
pub(crate) struct MapHandle {
    pub(crate) cookie: u32,
    pub(crate) map: FieldMap,
}

impl MapHandle {
    pub(crate) fn new(map: FieldMap) -> Self {
        Self {
            cookie: MAP_COOKIE,
            map,
        }
    }

    pub(crate) fn into_raw(self) -> FmMapHandle {
        Box::into_raw(Box::new(self)) as FmMapHandle
    }
}
