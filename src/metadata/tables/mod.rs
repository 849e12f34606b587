//! Metadata table and heap identifiers, and the coded indices that reference tables.
//!
//! - [`TableId`] names every ECMA-335 and Portable PDB table by its table number, the same
//!   number that forms the high byte of a metadata token.
//! - [`HeapId`] names the four metadata heaps.
//! - [`CodedIndexType`] and [`CodedIndex`] decode the compressed multi-table references found
//!   in table rows into [`crate::metadata::handles::EntityHandle`]s.

mod codedindex;
mod tableid;

pub use codedindex::{CodedIndex, CodedIndexType};
pub use tableid::{HeapId, TableId};
