//! Conversions between raw metadata tokens and handles.
//!
//! Tokens arrive from IL streams and signature blobs as plain `u32`s and cannot be trusted.
//! The functions here check them before building a handle, and report handles that have no
//! token (heap handles other than user strings) or no physical row (virtual handles).
//!
//! # Examples
//!
//! ```rust
//! use cilhandles::prelude::*;
//! use cilhandles::metadata::tokens;
//!
//! let handle = tokens::handle(0x0600_0005)?;
//! assert_eq!(handle.try_as::<MethodDefinitionHandle>()?.row_id(), 5);
//! assert_eq!(tokens::token(handle)?.value(), 0x0600_0005);
//!
//! assert!(tokens::handle(0x7100_0001).is_err());
//! # Ok::<(), cilhandles::Error>(())
//! ```

use crate::{
    metadata::{
        handles::{
            handletype::{
                is_entity_or_user_string_token, is_entity_token, is_valid_row_id, HandleType,
                ROW_ID_BIT_COUNT, ROW_ID_MASK, TOKEN_VIRTUAL_BIT, VIRTUAL_BIT,
            },
            EntityHandle, Handle,
        },
        tables::TableId,
        token::Token,
    },
    Error, Result,
};

/// Number of table slots a metadata stream can describe (bits of the `Valid` mask)
pub const TABLE_COUNT: usize = 64;

/// Number of metadata heaps, see [`crate::metadata::tables::HeapId`]
pub const HEAP_COUNT: usize = 4;

fn invalid_token(token: u32) -> Error {
    tracing::debug!(token = format_args!("0x{token:08x}"), "invalid metadata token");
    Error::InvalidToken(token)
}

/// Converts a raw token into a [`Handle`].
///
/// # Errors
/// Returns [`crate::Error::InvalidToken`] unless the high byte names an entity kind or the user
/// string heap. The virtual bit is never accepted.
pub fn handle(token: u32) -> Result<Handle> {
    if !is_entity_or_user_string_token(token) || has_virtual_bit(token) {
        return Err(invalid_token(token));
    }

    let handle = Handle::from_vtoken(token);
    if handle.kind().is_none() {
        return Err(invalid_token(token));
    }

    Ok(handle)
}

/// Converts a raw token into an [`EntityHandle`].
///
/// # Errors
/// Returns [`crate::Error::InvalidToken`] unless the high byte names an entity kind.
pub fn entity_handle(token: u32) -> Result<EntityHandle> {
    if !is_entity_token(token) || has_virtual_bit(token) {
        return Err(invalid_token(token));
    }

    let handle = EntityHandle::new(token);
    if handle.kind().is_none() {
        return Err(invalid_token(token));
    }

    Ok(handle)
}

/// Builds the [`EntityHandle`] for `row` of `table`.
///
/// # Errors
/// Returns [`crate::Error::InvalidToken`] if the table has no handle kind (the `*Ptr`, map and
/// layout tables) or if `row` does not fit into 24 bits.
pub fn entity_handle_for(table: TableId, row: u32) -> Result<EntityHandle> {
    let token = (table as u32) << ROW_ID_BIT_COUNT | (row & ROW_ID_MASK);
    if !is_valid_row_id(row) {
        tracing::debug!(?table, row, "row id out of range");
        return Err(Error::InvalidToken(token));
    }

    entity_handle(token)
}

/// The metadata token of `handle`.
///
/// Virtual handles have no physical row and yield the null token.
///
/// # Errors
/// Returns [`crate::Error::HandleNotTokenizable`] for heap handles other than user strings.
pub fn token(handle: Handle) -> Result<Token> {
    if !handle.is_entity_or_user_string_handle() {
        tracing::debug!(?handle, "handle has no token");
        return Err(Error::HandleNotTokenizable(handle));
    }

    if handle.is_virtual() {
        return Ok(Token::default());
    }

    Ok(handle.token())
}

/// The metadata token of `handle`, or the null token if it is virtual.
#[must_use]
pub fn entity_token(handle: EntityHandle) -> Token {
    if handle.is_virtual() {
        return Token::default();
    }

    handle.token()
}

/// The row number of `handle`, or `None` if it is virtual.
#[must_use]
pub fn row_number(handle: EntityHandle) -> Option<u32> {
    if handle.is_virtual() {
        return None;
    }

    Some(handle.row_id())
}

/// The heap offset of `handle`, or `None` if it is virtual.
///
/// For GUID handles this is the 1-based index, not a byte offset. WinRT-prefixed string
/// handles report their offset.
///
/// # Errors
/// Returns [`crate::Error::HeapHandleRequired`] if `handle` references a table row.
pub fn heap_offset(handle: Handle) -> Result<Option<u32>> {
    if !handle.is_heap_handle() {
        tracing::debug!(?handle, "heap handle required");
        return Err(Error::HeapHandleRequired(handle));
    }

    // WinRT-prefixed strings carry the virtual bit but are backed by the heap
    if handle.is_virtual() && handle.vtype() != VIRTUAL_BIT | HandleType::STRING1 {
        return Ok(None);
    }

    Ok(Some(handle.offset()))
}

const fn has_virtual_bit(token: u32) -> bool {
    (token & TOKEN_VIRTUAL_BIT) != 0
}
