//! Error types for DirectML helper operations.

use thiserror::Error;

/// All errors that can occur in the data type, size and capability helpers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A conversion has no valid target, or an argument is out of range.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// An external call (device query, tensor accessor) reported failure.
    #[error("External call failed with HRESULT 0x{0:08X}")]
    Hresult(i32),
}

impl Error {
    /// Returns true for HRESULT-style codes that signal failure.
    #[inline]
    pub const fn is_failure_code(hr: i32) -> bool {
        hr < 0
    }

    /// Converts an HRESULT-style status into a `Result`.
    pub fn check_hresult(hr: i32) -> Result<()> {
        if Self::is_failure_code(hr) {
            Err(Error::Hresult(hr))
        } else {
            Ok(())
        }
    }
}

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_hresult() {
        assert_eq!(Error::check_hresult(0), Ok(()));
        assert_eq!(Error::check_hresult(1), Ok(()));
        let e_fail = 0x8000_4005u32 as i32;
        assert_eq!(Error::check_hresult(e_fail), Err(Error::Hresult(e_fail)));
    }

    #[test]
    fn test_hresult_display() {
        let e = Error::Hresult(0x8007_0057u32 as i32);
        assert_eq!(e.to_string(), "External call failed with HRESULT 0x80070057");
    }
}
