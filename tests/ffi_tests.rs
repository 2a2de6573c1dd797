#![cfg(feature = "ffi")]

use std::ffi::CStr;
use std::ptr;

use libc::{c_int, c_void};

use dml_common::ffi::*;
use dml_common::{DmlTensorDataType, TensorDataType};

/// Bitmask of supported ordinals, passed as the callback context.
unsafe extern "C" fn check_support_from_mask(
    context: *mut c_void,
    data_type: u32,
    is_supported: *mut c_int,
) -> i32 {
    let mask = unsafe { *(context as *const u32) };
    unsafe { *is_supported = ((mask >> data_type) & 1) as c_int };
    0
}

unsafe extern "C" fn check_support_fails_on_float16(
    _context: *mut c_void,
    data_type: u32,
    is_supported: *mut c_int,
) -> i32 {
    if data_type == DmlTensorDataType::Float16.ordinal() {
        return 0x8000_4005u32 as i32;
    }
    unsafe { *is_supported = 1 };
    0
}

struct TensorContext {
    shape: Vec<u32>,
    data_type: u32,
    shape_hr: i32,
}

unsafe extern "C" fn tensor_dimension_count(context: *mut c_void) -> u32 {
    let tensor = unsafe { &*(context as *const TensorContext) };
    tensor.shape.len() as u32
}

unsafe extern "C" fn tensor_shape(context: *mut c_void, count: u32, dimensions: *mut u32) -> i32 {
    let tensor = unsafe { &*(context as *const TensorContext) };
    if tensor.shape_hr < 0 {
        return tensor.shape_hr;
    }
    let out = unsafe { std::slice::from_raw_parts_mut(dimensions, count as usize) };
    out.copy_from_slice(&tensor.shape[..count as usize]);
    0
}

unsafe extern "C" fn tensor_data_type(context: *mut c_void) -> u32 {
    let tensor = unsafe { &*(context as *const TensorContext) };
    tensor.data_type
}

fn c_tensor(context: &mut TensorContext) -> COperatorTensor {
    COperatorTensor {
        context: context as *mut TensorContext as *mut c_void,
        get_dimension_count: Some(tensor_dimension_count),
        get_shape: Some(tensor_shape),
        get_tensor_data_type: Some(tensor_data_type),
    }
}

fn last_error() -> String {
    let msg = dml_last_error_message();
    assert!(!msg.is_null());
    unsafe { CStr::from_ptr(msg) }.to_string_lossy().into_owned()
}

#[test]
fn type_mapping_by_value() {
    let mut dml = 0u32;
    assert_eq!(dml_data_type_from_ml(TensorDataType::Float as u32, &mut dml), DML_STATUS_OK);
    assert_eq!(dml, DmlTensorDataType::Float32.ordinal());

    let mut ml = 0u32;
    assert_eq!(dml_ml_data_type_from_dml(DmlTensorDataType::Float64.ordinal(), &mut ml), DML_STATUS_OK);
    assert_eq!(ml, TensorDataType::Double as u32);

    assert_eq!(dml_data_type_from_ml_no_fail(TensorDataType::Bool as u32), DmlTensorDataType::UInt8.ordinal());
    assert_eq!(dml_data_type_from_ml_no_fail(TensorDataType::Complex64 as u32), 0);

    assert!(dml_is_signed(DmlTensorDataType::Int8.ordinal()));
    assert!(!dml_is_signed(DmlTensorDataType::UInt32.ordinal()));
}

#[test]
fn sizes_by_value() {
    let dims = [2u32, 3];
    let mut bytes = 0u64;
    assert_eq!(
        dml_byte_size_from_dimensions(dims.as_ptr(), dims.len(), TensorDataType::Float as u32, &mut bytes),
        DML_STATUS_OK
    );
    assert_eq!(bytes, 24);

    assert_eq!(
        dml_byte_size_from_dimensions(ptr::null(), 0, TensorDataType::Int64 as u32, &mut bytes),
        DML_STATUS_OK
    );
    assert_eq!(bytes, 8);

    let mut context = TensorContext {
        shape: vec![3],
        data_type: TensorDataType::UInt4 as u32,
        shape_hr: 0,
    };
    let tensor = c_tensor(&mut context);
    assert_eq!(dml_byte_size_from_tensor(&tensor, &mut bytes), DML_STATUS_OK);
    assert_eq!(bytes, 2);
}

#[test]
fn device_mask_through_callbacks() {
    let mut supported: u32 = 0b101;
    let device = CDmlDevice {
        context: &mut supported as *mut u32 as *mut c_void,
        check_tensor_data_type_support: Some(check_support_from_mask),
    };
    let mut mask = 0u32;
    assert_eq!(dml_supported_device_data_type_mask(&device, &mut mask), DML_STATUS_OK);
    assert_eq!(mask, 0b101);
}

#[test]
fn bit_utilities() {
    let indices = [0u32, 3, 5];
    let mut mask = 0xFFFF_FFFFu32;
    assert_eq!(
        dml_bit_mask_from_indices(indices.as_ptr(), indices.len(), &mut mask),
        DML_STATUS_OK
    );
    assert_eq!(mask, 0b101001);
    assert_eq!(dml_bit_mask_from_indices(ptr::null(), 0, &mut mask), DML_STATUS_OK);
    assert_eq!(mask, 0);

    assert_eq!(dml_count_least_significant_zeros(0), 32);
    assert_eq!(dml_count_least_significant_zeros(8), 3);

    let sizes = [2u32, 3, 4];
    let mut strides = [0u32; 3];
    assert_eq!(
        dml_descending_packed_strides(sizes.as_ptr(), strides.as_mut_ptr(), sizes.len()),
        DML_STATUS_OK
    );
    assert_eq!(strides, [12, 4, 1]);
}

// Every failing call lives in this one test: the last error slot is process-wide.
#[test]
fn failures_report_last_error() {
    let mut out32 = 0u32;
    let mut out64 = 0u64;

    assert_eq!(dml_data_type_from_ml(TensorDataType::String as u32, &mut out32), DML_STATUS_ERROR);
    assert!(last_error().contains("no equivalent data type in DML"));

    assert_eq!(dml_ml_data_type_from_dml(0, &mut out32), DML_STATUS_ERROR);
    assert!(last_error().contains("Unknown DML tensor data type"));

    assert_eq!(dml_ml_data_type_from_dml(99, &mut out32), DML_STATUS_ERROR);
    assert!(last_error().contains("99"));

    assert_eq!(dml_data_type_from_ml(1, ptr::null_mut()), DML_STATUS_ERROR);
    assert!(last_error().contains("Null pointer"));

    assert_eq!(
        dml_byte_size_from_dimensions(ptr::null(), 2, TensorDataType::Float as u32, &mut out64),
        DML_STATUS_ERROR
    );
    assert!(last_error().contains("Null dimensions"));

    out32 = 0xBEEF;
    assert_eq!(dml_bit_mask_from_indices(ptr::null(), 3, &mut out32), DML_STATUS_ERROR);
    assert!(last_error().contains("Null indices"));
    assert_eq!(out32, 0xBEEF);

    let indices = [1u32];
    assert_eq!(dml_bit_mask_from_indices(indices.as_ptr(), 1, ptr::null_mut()), DML_STATUS_ERROR);
    assert!(last_error().contains("Null pointer passed as output mask"));

    let mut context = TensorContext {
        shape: vec![1; 9],
        data_type: TensorDataType::Float as u32,
        shape_hr: 0,
    };
    let tensor = c_tensor(&mut context);
    assert_eq!(dml_byte_size_from_tensor(&tensor, &mut out64), DML_STATUS_ERROR);
    assert!(last_error().contains("beyond supported count"));

    let mut context = TensorContext {
        shape: vec![4],
        data_type: TensorDataType::Float as u32,
        shape_hr: 0x8007_000Eu32 as i32,
    };
    let tensor = c_tensor(&mut context);
    assert_eq!(dml_byte_size_from_tensor(&tensor, &mut out64), DML_STATUS_ERROR);
    assert!(last_error().contains("0x8007000E"));

    let device = CDmlDevice {
        context: ptr::null_mut(),
        check_tensor_data_type_support: Some(check_support_fails_on_float16),
    };
    out32 = 0xDEAD;
    assert_eq!(dml_supported_device_data_type_mask(&device, &mut out32), DML_STATUS_ERROR);
    assert!(last_error().contains("0x80004005"));
    // No partial mask is written.
    assert_eq!(out32, 0xDEAD);
}
