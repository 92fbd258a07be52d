//! Error taxonomy shared by the writer and the parser.

/// Every failure mode either component can raise.
///
/// Both writer and parser keep a single sticky instance of this enum:
/// once set it is not cleared except by `reset` (the one exception is
/// [`Error::NoFieldName`], see [`crate::parser::Parser::field_ensure`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Caller misuse: buffer too small, or a request that cannot be satisfied
    /// regardless of document contents.
    InvalidArg,
    /// Writer ran out of output buffer.
    BufFull,
    /// Parser tried to read past the end of the input buffer.
    EndOfBuffer,
    /// Tag byte unexpected in context, non-canonical integer width,
    /// non-increasing field name, or an `ensure_type` mismatch.
    WrongType,
    /// The byte stream does not describe a legal state transition.
    WrongState,
    /// A length prefix was negative or exceeded `i32::MAX`.
    BadLen,
    /// Nesting exceeded the parser's compile-time `MAX_DEPTH`.
    MaxDepthReached,
    /// Navigation was attempted past the end of the root document.
    BlockEnded,
    /// `field_ensure` scanned to the end of the current object without
    /// finding the requested name. Cleared automatically on the next
    /// `field_ensure` call.
    NoFieldName,
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::WrongType => write!(f, "unexpected type or non-canonical encoding"),
            Error::WrongState => write!(f, "illegal state transition"),
            Error::MaxDepthReached => write!(f, "maximum nesting depth reached"),
            Error::NoFieldName => write!(f, "field name not found in object"),
            _ => write!(f, "{:?}", self),
        }
    }
}

impl core::error::Error for Error {}

/// Specialized `Result` for Binson operations.
pub type Result<T> = core::result::Result<T, Error>;
