//! Bit and byte sizes of tensors computed from their shapes.

use crate::error::{Error, Result};
use crate::models::{DimensionType, MAXIMUM_DIMENSION_COUNT, TensorDataType};

/// Read access to a runtime tensor's shape and element type.
pub trait OperatorTensor {
    /// Number of dimensions (rank).
    fn dimension_count(&self) -> u32;

    /// Writes the first `dimensions.len()` dimension sizes into `dimensions`.
    fn shape(&self, dimensions: &mut [DimensionType]) -> Result<()>;

    fn data_type(&self) -> TensorDataType;
}

impl<T: OperatorTensor + ?Sized> OperatorTensor for &T {
    fn dimension_count(&self) -> u32 {
        (**self).dimension_count()
    }

    fn shape(&self, dimensions: &mut [DimensionType]) -> Result<()> {
        (**self).shape(dimensions)
    }

    fn data_type(&self) -> TensorDataType {
        (**self).data_type()
    }
}

/// Number of elements described by `dimensions`. A scalar (rank 0) has one.
pub fn element_count_from_dimensions(dimensions: &[DimensionType]) -> Result<u64> {
    if dimensions.contains(&0) {
        return Ok(0);
    }
    dimensions
        .iter()
        .try_fold(1u64, |count, &d| count.checked_mul(d as u64))
        .ok_or_else(|| size_overflow(dimensions))
}

fn size_overflow(dimensions: &[DimensionType]) -> Error {
    Error::InvalidArgument(format!("Tensor size overflows for dimensions {:?}.", dimensions))
}

/// Total size in bits of a packed tensor.
pub fn bit_size_from_dimensions(
    dimensions: &[DimensionType],
    data_type: TensorDataType,
) -> Result<u64> {
    element_count_from_dimensions(dimensions)?
        .checked_mul(data_type.bit_size()?)
        .ok_or_else(|| size_overflow(dimensions))
}

/// Total size in bytes of a packed tensor, rounded up to a whole byte.
pub fn byte_size_from_dimensions(
    dimensions: &[DimensionType],
    data_type: TensorDataType,
) -> Result<u64> {
    Ok(bit_size_from_dimensions(dimensions, data_type)?.div_ceil(8))
}

/// Total size in bytes of a runtime tensor.
pub fn byte_size_from_tensor<T: OperatorTensor + ?Sized>(tensor: &T) -> Result<u64> {
    let dimension_count = tensor.dimension_count() as usize;
    if dimension_count > MAXIMUM_DIMENSION_COUNT {
        return Err(Error::InvalidArgument(format!(
            "Dimensions are beyond supported count: {} > {}.",
            dimension_count, MAXIMUM_DIMENSION_COUNT
        )));
    }

    let mut dimensions = [0 as DimensionType; MAXIMUM_DIMENSION_COUNT];
    tensor.shape(&mut dimensions[..dimension_count])?;

    byte_size_from_dimensions(&dimensions[..dimension_count], tensor.data_type())
}
