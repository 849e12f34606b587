//! References to `AssemblyRef` rows and to the contract assemblies a WinRT projection adds.

use std::fmt;

use strum::{EnumCount, EnumIter, FromRepr};

use crate::{
    metadata::{
        handles::{
            handletype::{is_valid_row_id, TokenType, ROW_ID_MASK, TOKEN_VIRTUAL_BIT},
            EntityHandle, Handle, HandleKind, SpecificEntityHandle, SpecificHandle,
            StringVirtualIndex,
        },
        token::Token,
    },
    Error, Result,
};

/// Contract assemblies that projected WinRT types are redirected to.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, EnumIter, EnumCount, FromRepr)]
#[repr(u32)]
#[allow(missing_docs)]
pub enum AssemblyRefVirtualIndex {
    SystemRuntime,
    SystemRuntimeInteropServicesWindowsRuntime,
    SystemObjectModel,
    SystemRuntimeWindowsRuntime,
    SystemRuntimeWindowsRuntimeUiXaml,
    SystemNumericsVectors,
}

impl AssemblyRefVirtualIndex {
    /// The simple name of the referenced assembly
    #[must_use]
    pub const fn name(self) -> StringVirtualIndex {
        match self {
            AssemblyRefVirtualIndex::SystemRuntime => StringVirtualIndex::SystemRuntime,
            AssemblyRefVirtualIndex::SystemRuntimeInteropServicesWindowsRuntime => {
                StringVirtualIndex::SystemRuntimeInteropServicesWindowsRuntime
            }
            AssemblyRefVirtualIndex::SystemObjectModel => StringVirtualIndex::SystemObjectModel,
            AssemblyRefVirtualIndex::SystemRuntimeWindowsRuntime => {
                StringVirtualIndex::SystemRuntimeWindowsRuntime
            }
            AssemblyRefVirtualIndex::SystemRuntimeWindowsRuntimeUiXaml => {
                StringVirtualIndex::SystemRuntimeWindowsRuntimeUiXaml
            }
            AssemblyRefVirtualIndex::SystemNumericsVectors => {
                StringVirtualIndex::SystemNumericsVectors
            }
        }
    }
}

/// A reference to a row of the `AssemblyRef` table, or to a projected contract assembly.
///
/// The payload is either a 24-bit row id or the virtual bit plus an
/// [`AssemblyRefVirtualIndex`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct AssemblyReferenceHandle {
    value: u32,
}

impl AssemblyReferenceHandle {
    /// Creates a handle for the 1-based `row_id`; row id `0` is the nil handle.
    #[must_use]
    pub const fn from_row_id(row_id: u32) -> Self {
        debug_assert!(is_valid_row_id(row_id));
        AssemblyReferenceHandle { value: row_id }
    }

    /// Creates a handle for a projected contract assembly
    #[must_use]
    pub const fn from_virtual_index(index: AssemblyRefVirtualIndex) -> Self {
        AssemblyReferenceHandle {
            value: TOKEN_VIRTUAL_BIT | index as u32,
        }
    }

    const fn vtoken(&self) -> u32 {
        self.value | TokenType::ASSEMBLY_REF
    }

    /// Returns `true` for projected contract assemblies
    #[must_use]
    pub const fn is_virtual(&self) -> bool {
        (self.value & TOKEN_VIRTUAL_BIT) != 0
    }

    /// Returns `true` for row id `0`. A virtual handle is never nil.
    #[must_use]
    pub const fn is_nil(&self) -> bool {
        self.value == 0
    }

    /// The row id, or the virtual index for virtual handles
    #[must_use]
    pub const fn row_id(&self) -> u32 {
        self.value & ROW_ID_MASK
    }

    /// The projected assembly of a virtual handle.
    ///
    /// Returns `None` for non-virtual handles and for indices that name no contract assembly.
    #[must_use]
    pub fn virtual_index(&self) -> Option<AssemblyRefVirtualIndex> {
        if !self.is_virtual() {
            return None;
        }

        AssemblyRefVirtualIndex::from_repr(self.row_id())
    }

    /// The metadata token. Not defined for virtual handles.
    #[must_use]
    pub const fn token(&self) -> Token {
        debug_assert!(!self.is_virtual());
        Token::new(self.vtoken())
    }
}

impl From<AssemblyReferenceHandle> for Handle {
    fn from(handle: AssemblyReferenceHandle) -> Self {
        Handle::from_vtoken(handle.vtoken())
    }
}

impl From<AssemblyReferenceHandle> for EntityHandle {
    fn from(handle: AssemblyReferenceHandle) -> Self {
        EntityHandle::new(handle.vtoken())
    }
}

impl TryFrom<Handle> for AssemblyReferenceHandle {
    type Error = Error;

    /// Physical and virtual `AssemblyRef` handles are both accepted.
    fn try_from(handle: Handle) -> Result<Self> {
        if handle.handle_type() != HandleKind::AssemblyReference.handle_type() {
            return Err(invalid_cast!("AssemblyReferenceHandle", handle.vtype()));
        }

        Ok(AssemblyReferenceHandle {
            value: handle.specific_entity_handle_value(),
        })
    }
}

impl TryFrom<EntityHandle> for AssemblyReferenceHandle {
    type Error = Error;

    fn try_from(handle: EntityHandle) -> Result<Self> {
        if handle.token_type() != TokenType::ASSEMBLY_REF {
            return Err(invalid_cast!("AssemblyReferenceHandle", handle.small_vtype()));
        }

        Ok(AssemblyReferenceHandle {
            value: handle.specific_handle_value(),
        })
    }
}

impl SpecificHandle for AssemblyReferenceHandle {
    const KIND: HandleKind = HandleKind::AssemblyReference;

    fn is_nil(&self) -> bool {
        AssemblyReferenceHandle::is_nil(self)
    }
}

impl SpecificEntityHandle for AssemblyReferenceHandle {
    fn row_id(&self) -> u32 {
        AssemblyReferenceHandle::row_id(self)
    }
}

impl fmt::Debug for AssemblyReferenceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.virtual_index() {
            Some(index) => write!(f, "AssemblyReferenceHandle(virtual {index:?})"),
            None if self.is_virtual() => write!(
                f,
                "AssemblyReferenceHandle(virtual index: {})",
                self.row_id()
            ),
            None => write!(f, "AssemblyReferenceHandle(row: {})", self.row_id()),
        }
    }
}
