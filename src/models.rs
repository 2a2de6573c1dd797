use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Element type of a dimension entry in a tensor shape.
pub type DimensionType = u32;

/// Maximum tensor rank accepted by the compute API.
pub const MAXIMUM_DIMENSION_COUNT: usize = 8;

/// Tensor element type as seen by the inference runtime's operator ABI.
///
/// Discriminants match the runtime's ABI values so they can cross the C boundary
/// unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u32)]
pub enum TensorDataType {
    Undefined = 0,
    Float = 1,
    UInt8 = 2,
    Int8 = 3,
    UInt16 = 4,
    Int16 = 5,
    Int32 = 6,
    Int64 = 7,
    String = 8,
    Bool = 9,
    Float16 = 10,
    Double = 11,
    UInt32 = 12,
    UInt64 = 13,
    Complex64 = 14,
    Complex128 = 15,
    UInt4 = 21,
    Int4 = 22,
}

impl TensorDataType {
    /// Every runtime element type, in ABI order.
    pub const ALL: [TensorDataType; 18] = [
        TensorDataType::Undefined,
        TensorDataType::Float,
        TensorDataType::UInt8,
        TensorDataType::Int8,
        TensorDataType::UInt16,
        TensorDataType::Int16,
        TensorDataType::Int32,
        TensorDataType::Int64,
        TensorDataType::String,
        TensorDataType::Bool,
        TensorDataType::Float16,
        TensorDataType::Double,
        TensorDataType::UInt32,
        TensorDataType::UInt64,
        TensorDataType::Complex64,
        TensorDataType::Complex128,
        TensorDataType::UInt4,
        TensorDataType::Int4,
    ];

    /// Width of one element in bits.
    ///
    /// `String` and `Undefined` have no fixed width and are rejected.
    pub fn bit_size(self) -> Result<u64> {
        match self {
            TensorDataType::UInt4 | TensorDataType::Int4 => Ok(4),
            TensorDataType::UInt8 | TensorDataType::Int8 | TensorDataType::Bool => Ok(8),
            TensorDataType::UInt16 | TensorDataType::Int16 | TensorDataType::Float16 => Ok(16),
            TensorDataType::UInt32 | TensorDataType::Int32 | TensorDataType::Float => Ok(32),
            TensorDataType::UInt64
            | TensorDataType::Int64
            | TensorDataType::Double
            | TensorDataType::Complex64 => Ok(64),
            TensorDataType::Complex128 => Ok(128),
            TensorDataType::String | TensorDataType::Undefined => Err(Error::InvalidArgument(
                format!("Tensor data type '{}' has no fixed bit size.", self),
            )),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TensorDataType::Undefined => "undefined",
            TensorDataType::Float => "float",
            TensorDataType::UInt8 => "uint8",
            TensorDataType::Int8 => "int8",
            TensorDataType::UInt16 => "uint16",
            TensorDataType::Int16 => "int16",
            TensorDataType::Int32 => "int32",
            TensorDataType::Int64 => "int64",
            TensorDataType::String => "string",
            TensorDataType::Bool => "bool",
            TensorDataType::Float16 => "float16",
            TensorDataType::Double => "double",
            TensorDataType::UInt32 => "uint32",
            TensorDataType::UInt64 => "uint64",
            TensorDataType::Complex64 => "complex64",
            TensorDataType::Complex128 => "complex128",
            TensorDataType::UInt4 => "uint4",
            TensorDataType::Int4 => "int4",
        }
    }
}

impl fmt::Display for TensorDataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<u32> for TensorDataType {
    type Error = Error;

    fn try_from(value: u32) -> Result<Self> {
        TensorDataType::ALL
            .iter()
            .copied()
            .find(|t| *t as u32 == value)
            .ok_or_else(|| {
                Error::InvalidArgument(format!("Unknown tensor data type value: {}", value))
            })
    }
}

/// Native tensor element type of the DirectML compute API.
///
/// The discriminant is the API ordinal; capability bitmasks use it as the bit
/// index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u32)]
pub enum DmlTensorDataType {
    Unknown = 0,
    Float32 = 1,
    Float16 = 2,
    UInt32 = 3,
    UInt16 = 4,
    UInt8 = 5,
    Int32 = 6,
    Int16 = 7,
    Int8 = 8,
    Float64 = 9,
    UInt64 = 10,
    Int64 = 11,
    UInt4 = 12,
    Int4 = 13,
}

impl DmlTensorDataType {
    /// Highest ordinal defined by the compute API.
    pub const MAX_ORDINAL: u32 = DmlTensorDataType::Int4 as u32;

    /// Every compute type indexed by ordinal, `Unknown` included.
    pub const ALL: [DmlTensorDataType; DmlTensorDataType::MAX_ORDINAL as usize + 1] = [
        DmlTensorDataType::Unknown,
        DmlTensorDataType::Float32,
        DmlTensorDataType::Float16,
        DmlTensorDataType::UInt32,
        DmlTensorDataType::UInt16,
        DmlTensorDataType::UInt8,
        DmlTensorDataType::Int32,
        DmlTensorDataType::Int16,
        DmlTensorDataType::Int8,
        DmlTensorDataType::Float64,
        DmlTensorDataType::UInt64,
        DmlTensorDataType::Int64,
        DmlTensorDataType::UInt4,
        DmlTensorDataType::Int4,
    ];

    #[inline]
    pub const fn ordinal(self) -> u32 {
        self as u32
    }

    /// Width of one element in bits. `Unknown` has none.
    pub fn bit_size(self) -> Result<u64> {
        match self {
            DmlTensorDataType::UInt4 | DmlTensorDataType::Int4 => Ok(4),
            DmlTensorDataType::UInt8 | DmlTensorDataType::Int8 => Ok(8),
            DmlTensorDataType::UInt16 | DmlTensorDataType::Int16 | DmlTensorDataType::Float16 => {
                Ok(16)
            }
            DmlTensorDataType::UInt32 | DmlTensorDataType::Int32 | DmlTensorDataType::Float32 => {
                Ok(32)
            }
            DmlTensorDataType::UInt64 | DmlTensorDataType::Int64 | DmlTensorDataType::Float64 => {
                Ok(64)
            }
            DmlTensorDataType::Unknown => Err(Error::InvalidArgument(
                "DML tensor data type 'unknown' has no bit size.".to_string(),
            )),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DmlTensorDataType::Unknown => "unknown",
            DmlTensorDataType::Float32 => "float32",
            DmlTensorDataType::Float16 => "float16",
            DmlTensorDataType::UInt32 => "uint32",
            DmlTensorDataType::UInt16 => "uint16",
            DmlTensorDataType::UInt8 => "uint8",
            DmlTensorDataType::Int32 => "int32",
            DmlTensorDataType::Int16 => "int16",
            DmlTensorDataType::Int8 => "int8",
            DmlTensorDataType::Float64 => "float64",
            DmlTensorDataType::UInt64 => "uint64",
            DmlTensorDataType::Int64 => "int64",
            DmlTensorDataType::UInt4 => "uint4",
            DmlTensorDataType::Int4 => "int4",
        }
    }
}

impl fmt::Display for DmlTensorDataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<u32> for DmlTensorDataType {
    type Error = Error;

    fn try_from(value: u32) -> Result<Self> {
        DmlTensorDataType::ALL
            .get(value as usize)
            .copied()
            .ok_or_else(|| Error::InvalidArgument(format!("Unknown DML tensor data type: {}", value)))
    }
}
