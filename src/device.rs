//! Tensor data type support queries against a DirectML device.

use crate::error::Result;
use crate::models::DmlTensorDataType;

/// A device that can report which tensor data types it supports.
pub trait DmlDevice {
    /// Queries support for a single data type. Errors are returned as-is to
    /// the caller of [`supported_device_data_type_mask`].
    fn check_tensor_data_type_support(&self, data_type: DmlTensorDataType) -> Result<bool>;
}

impl<D: DmlDevice + ?Sized> DmlDevice for &D {
    fn check_tensor_data_type_support(&self, data_type: DmlTensorDataType) -> Result<bool> {
        (**self).check_tensor_data_type_support(data_type)
    }
}

/// Builds a bitmask of the data types `device` supports, bit `i` standing for
/// the DML type with ordinal `i`.
///
/// Every ordinal is queried. Any failed query fails the whole probe.
pub fn supported_device_data_type_mask<D: DmlDevice + ?Sized>(device: &D) -> Result<u32> {
    let mut mask = 0u32;
    for data_type in DmlTensorDataType::ALL {
        let supported = device.check_tensor_data_type_support(data_type)?;
        log::trace!("DML data type {} supported: {}", data_type, supported);
        mask |= (supported as u32) << data_type.ordinal();
    }
    log::debug!("supported DML data type mask: {:#06x}", mask);
    Ok(mask)
}

/// Whether `mask` (from [`supported_device_data_type_mask`]) has `data_type` set.
#[inline]
pub fn is_data_type_supported(mask: u32, data_type: DmlTensorDataType) -> bool {
    mask & (1 << data_type.ordinal()) != 0
}
