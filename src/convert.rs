//! Conversions between runtime tensor data types and DirectML data types.
//!
//! The mapping lives in one table indexed by DML ordinal. The runtime-to-DML
//! direction is derived from that table, with one extra alias: `Bool` tensors
//! are treated as `UInt8` on the DML side. The reverse of that alias is not
//! recorded, so `UInt8` always maps back to `UInt8`.

use lazy_static::lazy_static;

use crate::error::{Error, Result};
use crate::models::{DmlTensorDataType, TensorDataType};

/// Runtime type for each DML ordinal. `None` only for `Unknown`.
const ML_TYPE_BY_DML_ORDINAL: [Option<TensorDataType>; DmlTensorDataType::ALL.len()] = [
    None,                           // Unknown
    Some(TensorDataType::Float),    // Float32
    Some(TensorDataType::Float16),  // Float16
    Some(TensorDataType::UInt32),   // UInt32
    Some(TensorDataType::UInt16),   // UInt16
    Some(TensorDataType::UInt8),    // UInt8
    Some(TensorDataType::Int32),    // Int32
    Some(TensorDataType::Int16),    // Int16
    Some(TensorDataType::Int8),     // Int8
    Some(TensorDataType::Double),   // Float64
    Some(TensorDataType::UInt64),   // UInt64
    Some(TensorDataType::Int64),    // Int64
    Some(TensorDataType::UInt4),    // UInt4
    Some(TensorDataType::Int4),     // Int4
];

/// Runtime types stored on the DML side as another type's bits.
const ML_TYPE_ALIASES: [(TensorDataType, DmlTensorDataType); 1] =
    [(TensorDataType::Bool, DmlTensorDataType::UInt8)];

/// One past the largest runtime ABI value.
const ML_TYPE_SLOTS: usize = TensorDataType::Int4 as usize + 1;

lazy_static! {
    static ref DML_TYPE_BY_ML_VALUE: [DmlTensorDataType; ML_TYPE_SLOTS] = {
        let mut table = [DmlTensorDataType::Unknown; ML_TYPE_SLOTS];
        for (dml_type, ml_type) in DmlTensorDataType::ALL.iter().zip(ML_TYPE_BY_DML_ORDINAL) {
            if let Some(ml_type) = ml_type {
                table[ml_type as usize] = *dml_type;
            }
        }
        for (ml_type, dml_type) in ML_TYPE_ALIASES {
            table[ml_type as usize] = dml_type;
        }
        table
    };
}

/// Maps a runtime data type to its DML equivalent.
///
/// Returns [`DmlTensorDataType::Unknown`] for types DML cannot represent
/// (`String`, `Complex64`, `Complex128`, `Undefined`).
pub fn dml_data_type_from_ml_no_fail(data_type: TensorDataType) -> DmlTensorDataType {
    DML_TYPE_BY_ML_VALUE[data_type as usize]
}

/// Maps a runtime data type to its DML equivalent, failing when there is none.
pub fn dml_data_type_from_ml(data_type: TensorDataType) -> Result<DmlTensorDataType> {
    match dml_data_type_from_ml_no_fail(data_type) {
        DmlTensorDataType::Unknown => {
            log::debug!("no DML data type for runtime type '{}'", data_type);
            Err(Error::InvalidArgument(format!(
                "Tensor data type '{}' has no equivalent data type in DML.",
                data_type
            )))
        }
        dml_type => Ok(dml_type),
    }
}

/// Maps a DML data type back to the runtime data type.
pub fn ml_data_type_from_dml(data_type: DmlTensorDataType) -> Result<TensorDataType> {
    ML_TYPE_BY_DML_ORDINAL[data_type.ordinal() as usize].ok_or_else(|| {
        log::debug!("no runtime data type for DML type '{}'", data_type);
        Error::InvalidArgument(format!("Unknown DML tensor data type '{}'.", data_type))
    })
}

/// Whether values of a DML data type are signed. Floating point types count
/// as signed.
///
/// Must not be called with `Unknown`.
pub fn is_signed(data_type: DmlTensorDataType) -> bool {
    match data_type {
        DmlTensorDataType::Float64
        | DmlTensorDataType::Float32
        | DmlTensorDataType::Float16
        | DmlTensorDataType::Int64
        | DmlTensorDataType::Int32
        | DmlTensorDataType::Int16
        | DmlTensorDataType::Int8
        | DmlTensorDataType::Int4 => true,
        DmlTensorDataType::UInt64
        | DmlTensorDataType::UInt32
        | DmlTensorDataType::UInt16
        | DmlTensorDataType::UInt8
        | DmlTensorDataType::UInt4 => false,
        DmlTensorDataType::Unknown => {
            debug_assert!(false, "is_signed called with an unknown DML data type");
            false
        }
    }
}
