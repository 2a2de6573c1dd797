//! Helpers shared by the DirectML execution provider: data type mapping,
//! tensor size computation, device capability probing and bit utilities.

pub mod convert;
pub mod device;
pub mod error;
#[cfg(feature = "ffi")]
pub mod ffi;
pub mod models;
pub mod size;
pub mod utils;

pub use convert::{
    dml_data_type_from_ml, dml_data_type_from_ml_no_fail, is_signed, ml_data_type_from_dml,
};
pub use device::{DmlDevice, is_data_type_supported, supported_device_data_type_mask};
pub use error::{Error, Result};
pub use models::{DimensionType, DmlTensorDataType, MAXIMUM_DIMENSION_COUNT, TensorDataType};
pub use size::{
    OperatorTensor, bit_size_from_dimensions, byte_size_from_dimensions, byte_size_from_tensor,
    element_count_from_dimensions,
};
pub use utils::{
    bit_mask_from_indices, count_least_significant_zeros, descending_packed_strides,
    packed_strides,
};
