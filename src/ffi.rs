use lazy_static::lazy_static;
use libc::{c_char, c_int, c_void, size_t};
use std::ffi::CString;
use std::ptr;
use std::slice;
use std::sync::Mutex;

use crate::convert::{self, is_signed, ml_data_type_from_dml};
use crate::device::{DmlDevice, supported_device_data_type_mask};
use crate::error::{Error, Result};
use crate::models::{DimensionType, DmlTensorDataType, TensorDataType};
use crate::size::{OperatorTensor, byte_size_from_dimensions, byte_size_from_tensor};
use crate::utils::{bit_mask_from_indices, count_least_significant_zeros, descending_packed_strides};

/// Status returned by fallible API calls on success.
pub const DML_STATUS_OK: c_int = 0;
/// Status returned by fallible API calls on failure. See `dml_last_error_message`.
pub const DML_STATUS_ERROR: c_int = -1;

// --- C-Compatible Structs & Handles ---

/// Queries whether `data_type` is supported, writing a non-zero value to
/// `is_supported` if so. Returns an HRESULT.
pub type CCheckTensorDataTypeSupportFn =
    unsafe extern "C" fn(context: *mut c_void, data_type: u32, is_supported: *mut c_int) -> i32;

/// A device handle implemented on the C side.
#[repr(C)]
pub struct CDmlDevice {
    pub context: *mut c_void,
    pub check_tensor_data_type_support: Option<CCheckTensorDataTypeSupportFn>,
}

pub type CGetDimensionCountFn = unsafe extern "C" fn(context: *mut c_void) -> u32;
/// Fills `dimensions` with `dimension_count` sizes. Returns an HRESULT.
pub type CGetShapeFn =
    unsafe extern "C" fn(context: *mut c_void, dimension_count: u32, dimensions: *mut u32) -> i32;
pub type CGetTensorDataTypeFn = unsafe extern "C" fn(context: *mut c_void) -> u32;

/// A runtime tensor implemented on the C side.
#[repr(C)]
pub struct COperatorTensor {
    pub context: *mut c_void,
    pub get_dimension_count: Option<CGetDimensionCountFn>,
    pub get_shape: Option<CGetShapeFn>,
    pub get_tensor_data_type: Option<CGetTensorDataTypeFn>,
}

struct ForeignDevice {
    context: *mut c_void,
    check: CCheckTensorDataTypeSupportFn,
}

impl ForeignDevice {
    fn new(device: &CDmlDevice) -> Result<Self> {
        let check = device.check_tensor_data_type_support.ok_or_else(|| {
            Error::InvalidArgument("Null check_tensor_data_type_support callback".into())
        })?;
        Ok(Self {
            context: device.context,
            check,
        })
    }
}

impl DmlDevice for ForeignDevice {
    fn check_tensor_data_type_support(&self, data_type: DmlTensorDataType) -> Result<bool> {
        let mut is_supported: c_int = 0;
        let hr = unsafe { (self.check)(self.context, data_type.ordinal(), &mut is_supported) };
        Error::check_hresult(hr)?;
        Ok(is_supported != 0)
    }
}

struct ForeignTensor {
    context: *mut c_void,
    get_dimension_count: CGetDimensionCountFn,
    get_shape: CGetShapeFn,
    data_type: TensorDataType,
}

impl ForeignTensor {
    fn new(tensor: &COperatorTensor) -> Result<Self> {
        let (Some(get_dimension_count), Some(get_shape), Some(get_tensor_data_type)) = (
            tensor.get_dimension_count,
            tensor.get_shape,
            tensor.get_tensor_data_type,
        ) else {
            return Err(Error::InvalidArgument("Null tensor callback".into()));
        };
        let data_type = TensorDataType::try_from(unsafe { get_tensor_data_type(tensor.context) })?;
        Ok(Self {
            context: tensor.context,
            get_dimension_count,
            get_shape,
            data_type,
        })
    }
}

impl OperatorTensor for ForeignTensor {
    fn dimension_count(&self) -> u32 {
        unsafe { (self.get_dimension_count)(self.context) }
    }

    fn shape(&self, dimensions: &mut [DimensionType]) -> Result<()> {
        let hr = unsafe {
            (self.get_shape)(self.context, dimensions.len() as u32, dimensions.as_mut_ptr())
        };
        Error::check_hresult(hr)
    }

    fn data_type(&self) -> TensorDataType {
        self.data_type
    }
}

// --- Error Handling ---

lazy_static! {
    static ref LAST_ERROR: Mutex<Option<CString>> = Mutex::new(None);
}

fn update_last_error(err: Error) {
    let msg = CString::new(err.to_string())
        .unwrap_or_else(|_| CString::from(c"FFI: Unknown error"));
    *LAST_ERROR.lock().unwrap_or_else(|e| e.into_inner()) = Some(msg);
}

/// Retrieves the last error message set by a failed API call.
///
/// The returned string is valid until the next failing API call.
/// Returns `null` if no error has occurred.
#[unsafe(no_mangle)]
pub extern "C" fn dml_last_error_message() -> *const c_char {
    match LAST_ERROR.lock().unwrap_or_else(|e| e.into_inner()).as_ref() {
        Some(s) => s.as_ptr(),
        None => ptr::null(),
    }
}

// --- Internal Helpers ---

/// Dereferences a C pointer argument, failing the call on null.
macro_rules! dml_handle {
    (mut $ptr:expr, $name:literal) => {
        if $ptr.is_null() {
            update_last_error(Error::InvalidArgument(concat!("Null pointer passed as ", $name).into()));
            return DML_STATUS_ERROR;
        } else {
            unsafe { &mut *$ptr }
        }
    };
    ($ptr:expr, $name:literal) => {
        if $ptr.is_null() {
            update_last_error(Error::InvalidArgument(concat!("Null pointer passed as ", $name).into()));
            return DML_STATUS_ERROR;
        } else {
            unsafe { &*$ptr }
        }
    };
}

/// Stores `result` into `out` or records its error.
fn write_result<T>(result: Result<T>, out: &mut T) -> c_int {
    match result {
        Ok(value) => {
            *out = value;
            DML_STATUS_OK
        }
        Err(e) => {
            update_last_error(e);
            DML_STATUS_ERROR
        }
    }
}

/// Builds a slice from a C array. A null pointer is accepted only for `len == 0`.
unsafe fn slice_or_empty<'a, T>(data: *const T, len: size_t) -> Option<&'a [T]> {
    if len == 0 {
        Some(&[])
    } else if data.is_null() {
        None
    } else {
        Some(unsafe { slice::from_raw_parts(data, len) })
    }
}

// --- Type Mapping API ---

/// Maps a runtime data type value to a DML data type value, or 0 (unknown).
#[unsafe(no_mangle)]
pub extern "C" fn dml_data_type_from_ml_no_fail(ml_data_type: u32) -> u32 {
    TensorDataType::try_from(ml_data_type)
        .map_or(DmlTensorDataType::Unknown, convert::dml_data_type_from_ml_no_fail)
        .ordinal()
}

#[unsafe(no_mangle)]
pub extern "C" fn dml_data_type_from_ml(ml_data_type: u32, out_dml_data_type: *mut u32) -> c_int {
    let out = dml_handle!(mut out_dml_data_type, "output data type");
    let result = TensorDataType::try_from(ml_data_type)
        .and_then(convert::dml_data_type_from_ml)
        .map(DmlTensorDataType::ordinal);
    write_result(result, out)
}

#[unsafe(no_mangle)]
pub extern "C" fn dml_ml_data_type_from_dml(dml_data_type: u32, out_ml_data_type: *mut u32) -> c_int {
    let out = dml_handle!(mut out_ml_data_type, "output data type");
    let result = DmlTensorDataType::try_from(dml_data_type)
        .and_then(ml_data_type_from_dml)
        .map(|t| t as u32);
    write_result(result, out)
}

/// Whether a DML data type is signed. The value must name a known DML type;
/// anything else aborts the process in debug builds.
#[unsafe(no_mangle)]
pub extern "C" fn dml_is_signed(dml_data_type: u32) -> bool {
    is_signed(DmlTensorDataType::try_from(dml_data_type).unwrap_or(DmlTensorDataType::Unknown))
}

// --- Size API ---

#[unsafe(no_mangle)]
pub extern "C" fn dml_byte_size_from_dimensions(
    dimensions: *const u32,
    dimension_count: size_t,
    ml_data_type: u32,
    out_byte_size: *mut u64,
) -> c_int {
    let out = dml_handle!(mut out_byte_size, "output byte size");
    let Some(dimensions) = (unsafe { slice_or_empty(dimensions, dimension_count) }) else {
        update_last_error(Error::InvalidArgument("Null dimensions pointer".into()));
        return DML_STATUS_ERROR;
    };
    let result = TensorDataType::try_from(ml_data_type)
        .and_then(|data_type| byte_size_from_dimensions(dimensions, data_type));
    write_result(result, out)
}

#[unsafe(no_mangle)]
pub extern "C" fn dml_byte_size_from_tensor(
    tensor: *const COperatorTensor,
    out_byte_size: *mut u64,
) -> c_int {
    let tensor = dml_handle!(tensor, "tensor");
    let out = dml_handle!(mut out_byte_size, "output byte size");
    let result = ForeignTensor::new(tensor).and_then(|t| byte_size_from_tensor(&t));
    write_result(result, out)
}

// --- Device API ---

#[unsafe(no_mangle)]
pub extern "C" fn dml_supported_device_data_type_mask(
    device: *const CDmlDevice,
    out_mask: *mut u32,
) -> c_int {
    let device = dml_handle!(device, "device");
    let out = dml_handle!(mut out_mask, "output mask");
    let result = ForeignDevice::new(device).and_then(|d| supported_device_data_type_mask(&d));
    write_result(result, out)
}

// --- Bit Utility API ---

/// Builds a bit mask from `count` indices. Every index must be below 32;
/// a larger one aborts the process in debug builds.
#[unsafe(no_mangle)]
pub extern "C" fn dml_bit_mask_from_indices(
    indices: *const u32,
    count: size_t,
    out_mask: *mut u32,
) -> c_int {
    let out = dml_handle!(mut out_mask, "output mask");
    let Some(indices) = (unsafe { slice_or_empty(indices, count) }) else {
        update_last_error(Error::InvalidArgument("Null indices pointer".into()));
        return DML_STATUS_ERROR;
    };
    *out = bit_mask_from_indices(indices);
    DML_STATUS_OK
}

#[unsafe(no_mangle)]
pub extern "C" fn dml_count_least_significant_zeros(value: u32) -> u32 {
    count_least_significant_zeros(value)
}

/// Writes `count` packed strides for `sizes` into `strides`.
#[unsafe(no_mangle)]
pub extern "C" fn dml_descending_packed_strides(
    sizes: *const u32,
    strides: *mut u32,
    count: size_t,
) -> c_int {
    if count == 0 {
        return DML_STATUS_OK;
    }
    if sizes.is_null() || strides.is_null() {
        update_last_error(Error::InvalidArgument("Null sizes or strides pointer".into()));
        return DML_STATUS_ERROR;
    }
    let sizes = unsafe { slice::from_raw_parts(sizes, count) };
    let strides = unsafe { slice::from_raw_parts_mut(strides, count) };
    descending_packed_strides(sizes, strides);
    DML_STATUS_OK
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CStr;

    #[test]
    fn test_null_output_sets_last_error() {
        assert_eq!(dml_data_type_from_ml(1, ptr::null_mut()), DML_STATUS_ERROR);
        let msg = dml_last_error_message();
        assert!(!msg.is_null());
        assert!(!unsafe { CStr::from_ptr(msg) }.to_bytes().is_empty());
    }

    #[test]
    fn test_no_fail_maps_garbage_to_unknown() {
        assert_eq!(dml_data_type_from_ml_no_fail(99), 0);
        assert_eq!(dml_data_type_from_ml_no_fail(9), DmlTensorDataType::UInt8.ordinal());
    }

    #[test]
    fn test_missing_callback_is_rejected() {
        let device = CDmlDevice {
            context: ptr::null_mut(),
            check_tensor_data_type_support: None,
        };
        let mut mask = 0u32;
        assert_eq!(
            dml_supported_device_data_type_mask(&device, &mut mask),
            DML_STATUS_ERROR
        );
    }
}
