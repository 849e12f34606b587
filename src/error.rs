//! Error types and error construction macros for cilhandles.
//!
//! Every fallible operation of the crate returns [`crate::Result`]. Narrowing failures are
//! built with `invalid_cast!`, which also emits a `debug` level `tracing` event.

use thiserror::Error;

use crate::metadata::{handles::Handle, tables::CodedIndexType};

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// Builds an [`crate::Error::InvalidCast`] and records the failed narrowing.
///
/// `$target` is the name of the handle type that was requested, `$found` is the raw
/// small-type byte (virtual bit included) of the handle that was offered.
macro_rules! invalid_cast {
    ($target:expr, $found:expr) => {{
        let found: u8 = $found;
        tracing::debug!(requested = $target, found, "invalid handle cast");
        crate::Error::InvalidCast {
            target: $target,
            found,
        }
    }};
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Handles are plain values, so almost every operation in this crate is infallible. The
/// variants below cover the few places where a conversion is checked at runtime: narrowing a
/// generic handle to a specific kind, turning raw tokens or coded indices into handles, and the
/// small byte-buffer helpers used to materialise virtual blobs.
///
/// # Error Categories
///
/// ## Conversion Errors
/// - [`Error::InvalidCast`] - A handle was narrowed to a kind it does not hold
/// - [`Error::InvalidToken`] - A raw token does not reference an entity or user string
/// - [`Error::HandleNotTokenizable`] - A token was requested for a heap handle
/// - [`Error::HeapHandleRequired`] - A heap offset was requested for an entity handle
/// - [`Error::TooManySubnamespaces`] - Synthetic namespace indices are exhausted
///
/// ## Malformed Input
/// - [`Error::InvalidCodedIndex`] - A coded index does not resolve to a known table
/// - [`Error::Malformed`] - Corrupted or invalid input structure
/// - [`Error::OutOfBounds`] - Attempted to read or write beyond a buffer
/// - [`Error::NotSupported`] - Unsupported algorithm or feature
///
/// # Examples
///
/// ```rust
/// use cilhandles::prelude::*;
///
/// let handle: Handle = MethodDefinitionHandle::from_row_id(5).into();
/// match TypeDefinitionHandle::try_from(handle) {
///     Ok(_) => unreachable!(),
///     Err(Error::InvalidCast { target, found }) => {
///         assert_eq!(target, "TypeDefinitionHandle");
///         assert_eq!(found, 0x06);
///     }
///     Err(e) => panic!("unexpected error: {e}"),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// A handle was converted to a specific kind whose type tag it does not carry.
    ///
    /// Narrowing conversions never coerce. A mismatch means the producer of the handle
    /// (usually a table or signature reader) resolved a reference against the wrong table.
    ///
    /// # Fields
    ///
    /// * `target` - Name of the requested handle type
    /// * `found` - Raw small-type byte of the offered handle, virtual bit included
    #[error("Invalid cast - cannot convert handle of type 0x{found:02x} to {target}")]
    InvalidCast {
        /// The name of the handle type that was requested
        target: &'static str,
        /// The small type byte of the handle that was offered
        found: u8,
    },

    /// A coded index does not resolve to any table of its family.
    ///
    /// Raised when the tag bits select an unused or out-of-range slot, or when the row
    /// part does not fit into a 24-bit row id.
    #[error("Invalid coded index 0x{value:08x} for {ci_type:?}")]
    InvalidCodedIndex {
        /// The coded index family that was decoded
        ci_type: CodedIndexType,
        /// The raw coded index value
        value: u32,
    },

    /// The raw token does not reference an entity table or the user string heap.
    #[error("Invalid token - 0x{0:08x}")]
    InvalidToken(u32),

    /// Only entity and user string handles have a metadata token.
    #[error("Handle has no metadata token - {0:?}")]
    HandleNotTokenizable(Handle),

    /// The handle does not reference a heap.
    #[error("Heap handle required - {0:?}")]
    HeapHandleRequired(Handle),

    /// The synthetic namespace index does not fit into a heap-sized payload.
    #[error("Too many synthetic namespaces")]
    TooManySubnamespaces,

    /// The input is damaged and could not be interpreted.
    ///
    /// The error includes the source location where the malformation was detected
    /// for debugging purposes.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// An out of bound access was attempted.
    #[error("Out of Bound read would have occurred!")]
    OutOfBounds,

    /// The requested algorithm or feature is not supported.
    #[error("This feature is not supported")]
    NotSupported,
}
