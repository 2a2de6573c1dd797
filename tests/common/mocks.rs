use std::cell::Cell;

use dml_common::{DimensionType, DmlDevice, DmlTensorDataType, Error, OperatorTensor, Result, TensorDataType};

/// A tensor with a fixed shape, optionally failing its shape query.
pub struct MockTensor {
    pub shape: Vec<DimensionType>,
    pub data_type: TensorDataType,
    pub shape_error: Option<Error>,
    pub shape_calls: Cell<usize>,
}

impl MockTensor {
    pub fn new(shape: &[DimensionType], data_type: TensorDataType) -> Self {
        Self {
            shape: shape.to_vec(),
            data_type,
            shape_error: None,
            shape_calls: Cell::new(0),
        }
    }

    pub fn failing(shape: &[DimensionType], data_type: TensorDataType, error: Error) -> Self {
        Self {
            shape_error: Some(error),
            ..Self::new(shape, data_type)
        }
    }
}

impl OperatorTensor for MockTensor {
    fn dimension_count(&self) -> u32 {
        self.shape.len() as u32
    }

    fn shape(&self, dimensions: &mut [DimensionType]) -> Result<()> {
        self.shape_calls.set(self.shape_calls.get() + 1);
        if let Some(e) = &self.shape_error {
            return Err(e.clone());
        }
        dimensions.copy_from_slice(&self.shape[..dimensions.len()]);
        Ok(())
    }

    fn data_type(&self) -> TensorDataType {
        self.data_type
    }
}

/// A device supporting a fixed set of ordinals, optionally failing one query.
pub struct MockDevice {
    pub supported: Vec<u32>,
    pub fail_on: Option<(u32, Error)>,
    pub queries: Cell<usize>,
}

impl MockDevice {
    pub fn supporting(ordinals: &[u32]) -> Self {
        Self {
            supported: ordinals.to_vec(),
            fail_on: None,
            queries: Cell::new(0),
        }
    }

    pub fn failing_on(ordinal: u32, error: Error) -> Self {
        Self {
            fail_on: Some((ordinal, error)),
            ..Self::supporting(&[0, 1, 2, 3])
        }
    }
}

impl DmlDevice for MockDevice {
    fn check_tensor_data_type_support(&self, data_type: DmlTensorDataType) -> Result<bool> {
        self.queries.set(self.queries.get() + 1);
        if let Some((ordinal, e)) = &self.fail_on {
            if *ordinal == data_type.ordinal() {
                return Err(e.clone());
            }
        }
        Ok(self.supported.contains(&data_type.ordinal()))
    }
}
