//! Diagnostics.

use std::io;

use ecow::EcoString;

#[doc(hidden)]
pub use ecow::eco_format;

/// Early-return with a [`ValidationError`].
///
/// The arguments are formatted with [`eco_format!`].
#[macro_export]
#[doc(hidden)]
macro_rules! __bail {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {
        return Err($crate::diag::ValidationError::new(
            $crate::diag::eco_format!($fmt, $($arg),*),
        ))
    };
}

#[doc(inline)]
pub use crate::__bail as bail;

/// A result type with a validation error.
pub type StrResult<T> = Result<T, ValidationError>;

/// Invalid input for an attribute, a style or a data attribute name.
///
/// Validation errors never leave a store in an inconsistent state, so they
/// are always recoverable.
#[derive(Debug, Clone, Eq, PartialEq, Hash, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    message: EcoString,
}

impl ValidationError {
    /// Create a new error with the given message.
    pub fn new(message: impl Into<EcoString>) -> Self {
        Self { message: message.into() }
    }

    /// The error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// The output sink (or a content stream being copied into it) failed.
///
/// `written` is the exact number of bytes that reached the sink before the
/// failure, counted across the whole operation that failed.
#[derive(Debug, thiserror::Error)]
#[error("writing failed after {written} bytes: {source}")]
pub struct SinkError {
    /// Bytes successfully written before the failure.
    pub written: usize,
    /// The underlying I/O error.
    #[source]
    pub source: io::Error,
}

impl SinkError {
    /// Create a new error at the given byte count.
    pub fn new(written: usize, source: io::Error) -> Self {
        Self { written, source }
    }

    /// Replaces the byte count, keeping the underlying cause.
    pub fn at(self, written: usize) -> Self {
        Self { written, ..self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(value: &str) -> StrResult<usize> {
        if value.contains(' ') {
            bail!("{value:?} contains a space");
        }
        Ok(value.len())
    }

    #[test]
    fn test_bail() {
        assert_eq!(check("ab"), Ok(2));
        let err = check("a b").unwrap_err();
        assert_eq!(err.message(), "\"a b\" contains a space");
        assert_eq!(err.to_string(), "\"a b\" contains a space");
    }

    #[test]
    fn test_sink_error_at() {
        let err = SinkError::new(3, io::Error::other("full")).at(10);
        assert_eq!(err.written, 10);
        assert_eq!(err.to_string(), "writing failed after 10 bytes: full");
    }
}
