//! Type tag constants shared by every handle.
//!
//! All handles agree on one layout, defined here:
//!
//! - A *small type* is one byte. Bit 7 is the virtual bit, bits 0-6 are the type code.
//!   For entity kinds the type code equals the ECMA-335 table number, so that
//!   `small_type << 24 | row_id` is the conventional metadata token.
//! - Row ids occupy the low 24 bits of a token, heap offsets the low 29 bits of a heap
//!   handle payload (0.5 GiB heaps).
//! - String handles reserve four consecutive type codes (`0x78..=0x7B`); the two low
//!   bits select the flavour of the string. Namespaces follow at `0x7C`.
//!
//! # Reference
//! * [ECMA-335 II.22](https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf) - Metadata tables
//! * [ECMA-335 III.1.9](https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf) - Metadata tokens

/// Number of bits used by a row id within a token.
pub const ROW_ID_BIT_COUNT: u32 = 24;

/// Mask selecting the row id of a token.
pub const ROW_ID_MASK: u32 = (1 << ROW_ID_BIT_COUNT) - 1;

/// Number of bits available to heap offsets (largest compressed integer).
pub const HEAP_OFFSET_BIT_COUNT: u32 = 29;

/// Mask selecting the heap offset of a heap handle payload.
pub const HEAP_OFFSET_MASK: u32 = (1 << HEAP_OFFSET_BIT_COUNT) - 1;

/// Virtual bit within a small type.
pub const VIRTUAL_BIT: u8 = 0x80;

/// Type code bits within a small type.
pub const TYPE_MASK: u8 = 0x7F;

/// A small type is a heap type iff all of these bits are set.
pub const HEAP_MASK: u8 = 0x70;

/// Low bits of a string small type that select the string flavour.
pub const NON_VIRTUAL_STRING_TYPE_MASK: u8 = 0x03;

/// Virtual bit within a 32-bit (virtual) token.
pub const TOKEN_VIRTUAL_BIT: u32 = 0x8000_0000;

/// Type code bits within a 32-bit token.
pub const TOKEN_TYPE_MASK: u32 = 0x7F00_0000;

/// Small type codes, one per table or heap kind.
///
/// Entity codes are the ECMA-335 table numbers. Heap codes never appear in a token stored on
/// disk (except `USER_STRING`, which IL uses for `ldstr`), but they are surfaced through
/// [`crate::metadata::handles::HandleKind`] and must therefore stay stable.
#[allow(non_snake_case, missing_docs)]
pub mod HandleType {
    pub const MODULE: u8 = 0x00;
    pub const TYPE_REF: u8 = 0x01;
    pub const TYPE_DEF: u8 = 0x02;
    pub const FIELD_DEF: u8 = 0x04;
    pub const METHOD_DEF: u8 = 0x06;
    pub const PARAM_DEF: u8 = 0x08;
    pub const INTERFACE_IMPL: u8 = 0x09;
    pub const MEMBER_REF: u8 = 0x0A;
    pub const CONSTANT: u8 = 0x0B;
    pub const CUSTOM_ATTRIBUTE: u8 = 0x0C;
    pub const DECL_SECURITY: u8 = 0x0E;
    pub const SIGNATURE: u8 = 0x11;
    pub const EVENT: u8 = 0x14;
    pub const PROPERTY: u8 = 0x17;
    pub const METHOD_IMPL: u8 = 0x19;
    pub const MODULE_REF: u8 = 0x1A;
    pub const TYPE_SPEC: u8 = 0x1B;
    pub const ASSEMBLY: u8 = 0x20;
    pub const ASSEMBLY_REF: u8 = 0x23;
    pub const FILE: u8 = 0x26;
    pub const EXPORTED_TYPE: u8 = 0x27;
    pub const MANIFEST_RESOURCE: u8 = 0x28;
    pub const GENERIC_PARAM: u8 = 0x2A;
    pub const METHOD_SPEC: u8 = 0x2B;
    pub const GENERIC_PARAM_CONSTRAINT: u8 = 0x2C;

    // Portable PDB
    pub const DOCUMENT: u8 = 0x30;
    pub const METHOD_DEBUG_INFORMATION: u8 = 0x31;
    pub const LOCAL_SCOPE: u8 = 0x32;
    pub const LOCAL_VARIABLE: u8 = 0x33;
    pub const LOCAL_CONSTANT: u8 = 0x34;
    pub const IMPORT_SCOPE: u8 = 0x35;
    pub const CUSTOM_DEBUG_INFORMATION: u8 = 0x37;

    pub const USER_STRING: u8 = 0x70;
    pub const BLOB: u8 = 0x71;
    pub const GUID: u8 = 0x72;

    // 0x79..=0x7B are taken by the string flavours, see `StringHandleType`
    pub const STRING: u8 = 0x78;
    pub const STRING1: u8 = 0x79;
    pub const STRING2: u8 = 0x7A;
    pub const STRING3: u8 = 0x7B;

    pub const NAMESPACE: u8 = 0x7C;
}

/// Packed layout of a [`crate::metadata::handles::StringHandle`] payload.
///
/// Bits 29-31 hold the string kind (virtual bit included), bits 0-28 the heap offset or the
/// virtual index.
#[allow(non_snake_case)]
pub mod StringHandleType {
    use super::{HandleType, HEAP_OFFSET_BIT_COUNT, HEAP_OFFSET_MASK, NON_VIRTUAL_STRING_TYPE_MASK};

    /// The three high bits selecting the kind of string
    pub const TYPE_MASK: u32 = !HEAP_OFFSET_MASK;

    /// The kind bits without the virtual bit
    pub const NON_VIRTUAL_TYPE_MASK: u32 = TYPE_MASK & !super::TOKEN_VIRTUAL_BIT;

    /// NUL-terminated UTF-8 string on the `#Strings` heap
    pub const STRING: u32 =
        ((HandleType::STRING & NON_VIRTUAL_STRING_TYPE_MASK) as u32) << HEAP_OFFSET_BIT_COUNT;

    /// String on the `#Strings` heap terminated by NUL or `.`, whichever comes first
    pub const DOT_TERMINATED_STRING: u32 =
        ((HandleType::STRING1 & NON_VIRTUAL_STRING_TYPE_MASK) as u32) << HEAP_OFFSET_BIT_COUNT;

    /// Synthesized string identified by a virtual index
    pub const VIRTUAL_STRING: u32 = super::TOKEN_VIRTUAL_BIT | STRING;

    /// String on the `#Strings` heap that is read with a `<WinRT>` prefix
    pub const WINRT_PREFIXED_STRING: u32 = super::TOKEN_VIRTUAL_BIT | DOT_TERMINATED_STRING;
}

/// Token type values (`small_type << 24`) for the entity kinds and user strings.
#[allow(non_snake_case, missing_docs)]
pub mod TokenType {
    use super::{HandleType, ROW_ID_BIT_COUNT};

    pub const MODULE: u32 = (HandleType::MODULE as u32) << ROW_ID_BIT_COUNT;
    pub const TYPE_DEF: u32 = (HandleType::TYPE_DEF as u32) << ROW_ID_BIT_COUNT;
    pub const METHOD_DEF: u32 = (HandleType::METHOD_DEF as u32) << ROW_ID_BIT_COUNT;
    pub const ASSEMBLY: u32 = (HandleType::ASSEMBLY as u32) << ROW_ID_BIT_COUNT;
    pub const ASSEMBLY_REF: u32 = (HandleType::ASSEMBLY_REF as u32) << ROW_ID_BIT_COUNT;
    pub const USER_STRING: u32 = (HandleType::USER_STRING as u32) << ROW_ID_BIT_COUNT;
}

/// Returns `true` if `row_id` fits into the 24 bits of a token.
#[must_use]
pub const fn is_valid_row_id(row_id: u32) -> bool {
    (row_id & !ROW_ID_MASK) == 0
}

/// Returns `true` if `offset` fits into the 29 bits of a heap handle.
#[must_use]
pub const fn is_valid_heap_offset(offset: u32) -> bool {
    (offset & !HEAP_OFFSET_MASK) == 0
}

/// Returns `true` if `small_type` (virtual bit ignored) denotes a heap kind.
#[must_use]
pub const fn is_heap_type(small_type: u8) -> bool {
    (small_type & HEAP_MASK) == HEAP_MASK
}

/// Returns `true` if the (virtual) token references an entity table.
#[must_use]
pub const fn is_entity_token(vtoken: u32) -> bool {
    (vtoken & TOKEN_TYPE_MASK) < TokenType::USER_STRING
}

/// Returns `true` if the (virtual) token references an entity table or the user string heap.
#[must_use]
pub const fn is_entity_or_user_string_token(vtoken: u32) -> bool {
    (vtoken & TOKEN_TYPE_MASK) <= TokenType::USER_STRING
}
