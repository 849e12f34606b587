//! References into ECMA-335 metadata.
//!
//! # Key Components
//!
//! - [`handles`] - Typed handles for table rows, heap values and projected entities
//! - [`token`] - The raw 32-bit metadata token
//! - [`tokens`] - Checked conversions between raw tokens and handles
//! - [`tables`] - Table and heap identifiers, coded indices
//! - [`identity`] - Public keys and public key tokens of strong-named assemblies
//!
//! # Examples
//!
//! ```rust
//! use cilhandles::metadata::{handles::TypeReferenceHandle, tables::CodedIndexType};
//!
//! // TypeDefOrRef column value: TypeRef (tag 1), row 5
//! let handle = CodedIndexType::TypeDefOrRef.decode(5 << 2 | 1)?;
//! let type_ref: TypeReferenceHandle = handle.try_into()?;
//! assert_eq!(type_ref.row_id(), 5);
//! # Ok::<(), cilhandles::Error>(())
//! ```

/// Typed handles for metadata entities and heap values
pub mod handles;
/// Public-key and token identities of assemblies
pub mod identity;
/// Metadata table and heap identifiers, coded indices
pub mod tables;
/// The raw metadata token
pub mod token;
/// Conversions between raw tokens and handles
pub mod tokens;
