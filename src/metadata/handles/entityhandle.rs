//! [`EntityHandle`], a table row reference packed into a single 32-bit word.

use std::fmt;

use crate::{
    metadata::{
        handles::{
            handletype::{
                is_entity_token, TokenType, ROW_ID_BIT_COUNT, ROW_ID_MASK, TOKEN_TYPE_MASK,
                TOKEN_VIRTUAL_BIT,
            },
            Handle, HandleKind, SpecificEntityHandle,
        },
        token::Token,
    },
    Error, Result,
};

/// A reference to a table row, physical or virtual.
///
/// `EntityHandle` is the narrower sibling of [`Handle`]: it cannot hold heap offsets, which
/// lets it pack kind, virtual bit and row id into one 32-bit word. Use it wherever a reference
/// is statically known to target a table, e.g. the result of decoding a coded index.
///
/// ## Layout
///
/// - bit 31: virtual bit
/// - bits 24-30: small type code (the table number)
/// - bits 0-23: row id
///
/// For non-virtual handles the packed word *is* the metadata token.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct EntityHandle {
    vtoken: u32,
}

impl EntityHandle {
    /// The definition of the current module (row 1 of `Module`)
    pub const MODULE_DEFINITION: EntityHandle = EntityHandle::new(TokenType::MODULE | 1);

    /// The definition of the current assembly (row 1 of `Assembly`)
    pub const ASSEMBLY_DEFINITION: EntityHandle = EntityHandle::new(TokenType::ASSEMBLY | 1);

    pub(crate) const fn new(vtoken: u32) -> EntityHandle {
        debug_assert!(is_entity_token(vtoken));
        EntityHandle { vtoken }
    }

    /// Token type bits, without the virtual bit.
    pub(crate) const fn token_type(&self) -> u32 {
        self.vtoken & TOKEN_TYPE_MASK
    }

    /// Token type bits, including the virtual bit.
    pub(crate) const fn vtype(&self) -> u32 {
        self.vtoken & (TOKEN_VIRTUAL_BIT | TOKEN_TYPE_MASK)
    }

    /// The small type byte, including the virtual bit.
    pub(crate) const fn small_vtype(&self) -> u8 {
        (self.vtoken >> ROW_ID_BIT_COUNT) as u8
    }

    /// The value a specific handle with a virtual form stores for this handle.
    pub(crate) const fn specific_handle_value(&self) -> u32 {
        self.vtoken & (TOKEN_VIRTUAL_BIT | ROW_ID_MASK)
    }

    /// The row id, or the virtual index for virtual handles.
    #[must_use]
    pub const fn row_id(&self) -> u32 {
        self.vtoken & ROW_ID_MASK
    }

    /// Returns `true` if this handle references a synthesized row.
    #[must_use]
    pub const fn is_virtual(&self) -> bool {
        (self.vtoken & TOKEN_VIRTUAL_BIT) != 0
    }

    /// Returns `true` for the nil reference of any table.
    #[must_use]
    pub const fn is_nil(&self) -> bool {
        (self.vtoken & (TOKEN_VIRTUAL_BIT | ROW_ID_MASK)) == 0
    }

    /// The kind of this handle, or `None` if the table is not assigned to a kind.
    #[must_use]
    pub fn kind(&self) -> Option<HandleKind> {
        HandleKind::from_type((self.token_type() >> ROW_ID_BIT_COUNT) as u8)
    }

    /// The metadata token of this handle.
    ///
    /// Only defined for non-virtual handles, see [`crate::metadata::tokens::entity_token`]
    /// for a total variant.
    #[must_use]
    pub const fn token(&self) -> Token {
        debug_assert!(!self.is_virtual());
        Token::new(self.vtoken)
    }

    /// Narrows this handle to the specific entity kind `H`.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidCast`] if the handle is not of kind `H`.
    pub fn try_as<H: SpecificEntityHandle>(self) -> Result<H> {
        H::try_from(self)
    }
}

impl From<EntityHandle> for Handle {
    fn from(handle: EntityHandle) -> Self {
        Handle::from_vtoken(handle.vtoken)
    }
}

impl TryFrom<Handle> for EntityHandle {
    type Error = Error;

    /// Fails if `handle` references a heap.
    fn try_from(handle: Handle) -> Result<Self> {
        if handle.is_heap_handle() {
            return Err(invalid_cast!("EntityHandle", handle.vtype()));
        }

        Ok(EntityHandle::new(handle.entity_handle_value()))
    }
}

impl fmt::Debug for EntityHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let virt = if self.is_virtual() { "virtual " } else { "" };
        match self.kind() {
            Some(kind) => write!(f, "EntityHandle({}{}, row: {})", virt, kind.name(), self.row_id()),
            None => write!(
                f,
                "EntityHandle({}type: 0x{:02x}, row: {})",
                virt,
                self.token_type() >> ROW_ID_BIT_COUNT,
                self.row_id()
            ),
        }
    }
}

impl fmt::Display for EntityHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.vtoken)
    }
}
