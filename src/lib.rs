// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![allow(dead_code)]

//! # cilhandles
//!
//! Typed, compact references into the metadata of .NET (ECMA-335) images and Portable PDBs.
//!
//! Every table row, heap value and projected WinRT entity of a metadata image is addressed by
//! a *handle*: a `Copy` value of at most 8 bytes that knows which kind of entity it points to.
//! `cilhandles` defines those handles, the bit layout they share, and the checked conversions
//! between them, between handles and metadata tokens, and between handles and coded indices.
//!
//! ## Features
//!
//! - **One type per kind** - `TypeDefinitionHandle`, `MethodDefinitionHandle`, `BlobHandle`,
//!   ... are distinct types; mixing them up is a compile error.
//! - **Checked narrowing** - Generic [`metadata::handles::Handle`] and
//!   [`metadata::handles::EntityHandle`] values narrow back to a specific kind with
//!   `TryFrom`, failing with [`Error::InvalidCast`] instead of reinterpreting the payload.
//! - **Token compatible** - The type code of an entity kind is its table number, so a
//!   non-virtual handle *is* its metadata token.
//! - **Virtual references** - Projected assemblies, names and blobs that a WinRT projection
//!   adds to an image are represented without physical backing.
//!
//! ## Quick Start
//!
//! ```rust
//! use cilhandles::prelude::*;
//!
//! // A reader mints specific handles while parsing table rows
//! let method = MethodDefinitionHandle::from_row_id(5);
//!
//! // ...which widen into generic handles for storage in mixed collections
//! let handle: Handle = method.into();
//! assert_eq!(handle.kind(), Some(HandleKind::MethodDefinition));
//! assert_eq!(handle.token(), Token::new(0x0600_0005));
//!
//! // ...and narrow back out with a check
//! let back: MethodDefinitionHandle = handle.try_into()?;
//! assert_eq!(back, method);
//! assert!(FieldDefinitionHandle::try_from(handle).is_err());
//! # Ok::<(), cilhandles::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`metadata::handles`] - [`metadata::handles::Handle`], [`metadata::handles::EntityHandle`]
//!   and the specific handle family, plus the type tag constants in
//!   [`metadata::handles::handletype`]
//! - [`metadata::tables`] - Table and heap identifiers, coded indices
//! - [`metadata::tokens`] - Checked conversions between raw tokens and handles
//! - [`metadata::identity`] - Public keys and public key tokens
//! - [`prelude`] - Convenient re-exports of commonly used types and traits
//! - [`Error`] and [`Result`] - Error handling
//!
//! ## Error Handling
//!
//! Operations that can fail on untrusted input return [`Result<T, Error>`](Result). Violated
//! preconditions of trusted callers, such as a row id wider than 24 bits or a second flavour
//! applied to a string handle, are checked with debug assertions only.
//!
//! Failed conversions emit a `debug` level [`tracing`](https://docs.rs/tracing) event; the
//! crate never installs a subscriber.
//!
//! ## Standards Compliance
//!
//! - [ECMA-335 Standard](https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf) - Official CLI specification
//! - [Portable PDB v1.0](https://github.com/dotnet/runtime/blob/main/docs/design/specs/PortablePdb-Metadata.md) - Debug metadata tables

#[macro_use]
pub(crate) mod macros;

#[macro_use]
pub(crate) mod error;
pub(crate) mod file;

/// Convenient re-exports of the most commonly used types and traits.
///
/// This module provides a curated selection of the most frequently used types
/// from across the cilhandles library, allowing for convenient glob imports.
///
/// # Example
///
/// ```rust
/// use cilhandles::prelude::*;
///
/// let blob = BlobHandle::from_virtual_index(BlobVirtualIndex::AttributeUsageAllowSingle, 0x4000);
/// let handle: Handle = blob.into();
/// assert!(handle.is_virtual());
/// ```
pub mod prelude;

/// Handles, tokens, tables and identities of ECMA-335 metadata
pub mod metadata;

/// `cilhandles` Result type
///
/// A type alias for `std::result::Result<T, Error>` where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `cilhandles` Error type
///
/// The main error type for all operations in this crate.
pub use error::Error;
