//! The generic [`Handle`], able to reference any table row or heap value.
//!
//! A handle is a 32-bit payload plus a small type byte. Bit 7 of the type byte marks virtual
//! handles, the low seven bits name the kind. Entity kinds store a 24-bit row id, heap kinds a
//! 29-bit offset.

use std::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
};

use crate::{
    metadata::{
        handles::{
            handletype::{
                is_heap_type, is_valid_heap_offset, is_valid_row_id, HandleType, ROW_ID_BIT_COUNT,
                ROW_ID_MASK, TYPE_MASK, VIRTUAL_BIT,
            },
            HandleKind, SpecificHandle,
        },
        token::Token,
    },
    Result,
};

/// A reference to any entity or heap value of a metadata image.
///
/// `Handle` is the widest of the handle types: it holds table row ids as well as heap offsets,
/// and both physical and virtual (synthesized) references. Every specific handle converts into
/// it with [`From`]; getting a specific handle back out is checked with [`TryFrom`] (or
/// [`Handle::try_as`]) and fails with [`crate::Error::InvalidCast`] if the kinds differ.
///
/// ## Layout
///
/// - `value`: row id (entities, at most 24 bits) or heap offset (heaps, at most 29 bits)
/// - `vtype`: bit 7 is the virtual bit, bits 0-6 the small type code
///
/// ## Ordering
///
/// Handles order by `(vtype, value)`. All virtual handles sort after all non-virtual ones;
/// the relative order of non-virtual handles of different kinds carries no meaning beyond
/// being consistent with `==`.
///
/// # Examples
///
/// ```rust
/// use cilhandles::prelude::*;
///
/// let method = MethodDefinitionHandle::from_row_id(5);
/// let handle: Handle = method.into();
///
/// assert_eq!(handle.kind(), Some(HandleKind::MethodDefinition));
/// assert_eq!(handle.token().value(), 0x0600_0005);
/// assert_eq!(handle.try_as::<MethodDefinitionHandle>()?, method);
/// assert!(handle.try_as::<TypeDefinitionHandle>().is_err());
/// # Ok::<(), cilhandles::Error>(())
/// ```
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Handle {
    value: u32,
    vtype: u8,
}

impl Handle {
    /// The definition of the current module (row 1 of `Module`)
    pub const MODULE_DEFINITION: Handle = Handle::new(HandleType::MODULE, 1);

    /// The definition of the current assembly (row 1 of `Assembly`)
    pub const ASSEMBLY_DEFINITION: Handle = Handle::new(HandleType::ASSEMBLY, 1);

    /// Splits a (virtual) token into small type and payload.
    ///
    /// No validation happens; the token is expected to come from a handle that was valid to
    /// begin with. Use [`crate::metadata::tokens::handle`] for untrusted input.
    ///
    /// ## Arguments
    /// * `vtoken` - High byte is the small type, low 24 bits the row id or offset
    #[must_use]
    pub const fn from_vtoken(vtoken: u32) -> Handle {
        Handle {
            vtype: (vtoken >> ROW_ID_BIT_COUNT) as u8,
            value: vtoken & ROW_ID_MASK,
        }
    }

    /// Packs a small type and a payload.
    ///
    /// The payload must fit the width of its kind: 29 bits for heap kinds, 24 bits for
    /// everything else.
    pub(crate) const fn new(vtype: u8, value: u32) -> Handle {
        debug_assert!(
            (is_heap_type(vtype) && is_valid_heap_offset(value))
                || (!is_heap_type(vtype) && is_valid_row_id(value))
        );
        Handle { value, vtype }
    }

    /// The small type including the virtual bit.
    pub(crate) const fn vtype(&self) -> u8 {
        self.vtype
    }

    /// The small type code without the virtual bit.
    pub(crate) const fn handle_type(&self) -> u8 {
        self.vtype & TYPE_MASK
    }

    pub(crate) const fn row_id(&self) -> u32 {
        self.value
    }

    pub(crate) const fn offset(&self) -> u32 {
        self.value
    }

    /// The value an [`crate::metadata::handles::EntityHandle`] stores for this handle.
    pub(crate) const fn entity_handle_value(&self) -> u32 {
        debug_assert!(is_valid_row_id(self.value));
        (self.vtype as u32) << ROW_ID_BIT_COUNT | self.value
    }

    /// The value a specific entity handle with a virtual form stores for this handle.
    pub(crate) const fn specific_entity_handle_value(&self) -> u32 {
        ((self.vtype & VIRTUAL_BIT) as u32) << ROW_ID_BIT_COUNT | self.value
    }

    /// Returns `true` if this handle references a synthesized value.
    #[must_use]
    pub const fn is_virtual(&self) -> bool {
        (self.vtype & VIRTUAL_BIT) != 0
    }

    /// Returns `true` for the nil reference of any kind.
    ///
    /// A virtual handle is never nil.
    #[must_use]
    pub const fn is_nil(&self) -> bool {
        (self.value | (self.vtype & VIRTUAL_BIT) as u32) == 0
    }

    /// Returns `true` if this handle references a heap rather than a table row.
    #[must_use]
    pub const fn is_heap_handle(&self) -> bool {
        is_heap_type(self.vtype)
    }

    /// Returns `true` for entity handles and user string handles, the kinds with a token.
    #[must_use]
    pub const fn is_entity_or_user_string_handle(&self) -> bool {
        self.handle_type() <= HandleType::USER_STRING
    }

    /// The kind of this handle, or `None` if the type code is not assigned to a kind.
    ///
    /// Only handles built with [`Handle::from_vtoken`] from arbitrary input can report `None`.
    #[must_use]
    pub fn kind(&self) -> Option<HandleKind> {
        HandleKind::from_type(self.vtype)
    }

    /// The conventional metadata token of this handle.
    ///
    /// Only defined for non-virtual entity and user string handles, see
    /// [`crate::metadata::tokens::token`] for a checked variant.
    #[must_use]
    pub const fn token(&self) -> Token {
        debug_assert!(self.is_entity_or_user_string_handle());
        debug_assert!(!self.is_virtual());
        debug_assert!(is_valid_row_id(self.value));
        Token::new((self.vtype as u32) << ROW_ID_BIT_COUNT | self.value)
    }

    /// Narrows this handle to the specific kind `H`.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidCast`] if the handle is not of kind `H`.
    pub fn try_as<H: SpecificHandle>(self) -> Result<H> {
        H::try_from(self)
    }

    fn sort_key(&self) -> u64 {
        u64::from(self.vtype) << 32 | u64::from(self.value)
    }
}

impl Hash for Handle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (self.value ^ u32::from(self.vtype) << ROW_ID_BIT_COUNT).hash(state);
    }
}

impl PartialOrd for Handle {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Handle {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let virt = if self.is_virtual() { "virtual " } else { "" };
        match self.kind() {
            Some(kind) if kind.is_heap() => {
                write!(f, "Handle({}{}, offset: 0x{:x})", virt, kind.name(), self.value)
            }
            Some(kind) => write!(f, "Handle({}{}, row: {})", virt, kind.name(), self.value),
            None => write!(
                f,
                "Handle({}type: 0x{:02x}, value: 0x{:x})",
                virt,
                self.handle_type(),
                self.value
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::handles::handletype::HEAP_OFFSET_MASK;

    #[test]
    fn from_vtoken_splits() {
        let handle = Handle::from_vtoken(0x0600_0005);
        assert_eq!(handle.vtype(), 0x06);
        assert_eq!(handle.row_id(), 5);
        assert_eq!(handle.kind(), Some(HandleKind::MethodDefinition));
        assert!(!handle.is_virtual());

        let handle = Handle::from_vtoken(0xA300_0002);
        assert_eq!(handle.vtype(), 0xA3);
        assert!(handle.is_virtual());
        assert_eq!(handle.kind(), Some(HandleKind::AssemblyReference));
    }

    #[test]
    fn from_vtoken_accepts_anything() {
        let handle = Handle::from_vtoken(0x0300_0001);
        assert_eq!(handle.kind(), None);
        assert!(format!("{handle:?}").contains("type: 0x03"));
    }

    #[test]
    fn nil() {
        assert!(Handle::new(HandleType::TYPE_DEF, 0).is_nil());
        assert!(Handle::new(HandleType::BLOB, 0).is_nil());
        assert!(!Handle::new(HandleType::BLOB | VIRTUAL_BIT, 0).is_nil());
        assert!(!Handle::MODULE_DEFINITION.is_nil());
    }

    #[test]
    fn heap_handles() {
        let blob = Handle::new(HandleType::BLOB, HEAP_OFFSET_MASK);
        assert!(blob.is_heap_handle());
        assert!(!blob.is_entity_or_user_string_handle());

        let us = Handle::new(HandleType::USER_STRING, 0x10);
        assert!(us.is_heap_handle());
        assert!(us.is_entity_or_user_string_handle());
        assert_eq!(us.token(), Token::new(0x7000_0010));
    }

    #[test]
    fn entity_values() {
        let handle = Handle::new(HandleType::ASSEMBLY_REF | VIRTUAL_BIT, 3);
        assert_eq!(handle.entity_handle_value(), 0xA300_0003);
        assert_eq!(handle.specific_entity_handle_value(), 0x8000_0003);
    }

    #[test]
    fn singletons() {
        assert_eq!(Handle::MODULE_DEFINITION.token(), Token::new(0x0000_0001));
        assert_eq!(Handle::ASSEMBLY_DEFINITION.token(), Token::new(0x2000_0001));
    }

    #[test]
    fn equality_and_hash_separate_kinds() {
        use std::collections::HashSet;

        let row = Handle::new(HandleType::TYPE_DEF, 7);
        let blob = Handle::new(HandleType::BLOB, 7);
        assert_ne!(row, blob);

        let set: HashSet<Handle> = [row, blob, row].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn virtual_sorts_last() {
        let virt = Handle::new(HandleType::MODULE | VIRTUAL_BIT, 0);
        let physical = [
            Handle::new(HandleType::CUSTOM_DEBUG_INFORMATION, ROW_ID_MASK),
            Handle::new(HandleType::NAMESPACE, HEAP_OFFSET_MASK),
            Handle::new(HandleType::STRING3, HEAP_OFFSET_MASK),
        ];
        for handle in physical {
            assert!(handle < virt);
        }
    }

    #[test]
    fn ordering_matches_equality() {
        let a = Handle::new(HandleType::TYPE_DEF, 7);
        let b = Handle::new(HandleType::TYPE_DEF, 7);
        let c = Handle::new(HandleType::METHOD_DEF, 7);
        assert_eq!(a.cmp(&b), Ordering::Equal);
        assert_ne!(a.cmp(&c), Ordering::Equal);
    }

    #[test]
    fn debug_format() {
        let handle = Handle::new(HandleType::METHOD_DEF, 5);
        assert_eq!(format!("{handle:?}"), "Handle(MethodDefinition, row: 5)");

        let handle = Handle::new(HandleType::STRING | VIRTUAL_BIT, 0x20);
        assert_eq!(format!("{handle:?}"), "Handle(virtual String, offset: 0x20)");
    }
}
