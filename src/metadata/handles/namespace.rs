//! Namespace handles, backed by a full name on the `#Strings` heap or by a synthetic index.

use std::fmt;

use crate::{
    metadata::handles::{
        handletype::{
            is_valid_heap_offset, HandleType, HEAP_OFFSET_MASK, ROW_ID_BIT_COUNT,
            TOKEN_VIRTUAL_BIT, TYPE_MASK, VIRTUAL_BIT,
        },
        Handle, HandleKind, SpecificHandle, StringHandle,
    },
    Error, Result,
};

/// A reference to a namespace of the module.
///
/// A namespace with types of its own is identified by the `#Strings` offset of its full dotted
/// name. A namespace that only exists as the parent of other namespaces has no such string; it
/// is identified by a synthetic index handed out by the namespace cache instead. The high bit of
/// the payload tells the two apart.
///
/// Namespaces are never projected. The synthetic marker is carried in the virtual bit of a
/// widened [`Handle`], so [`Handle::is_virtual`] reports `true` for synthetic namespaces.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct NamespaceDefinitionHandle {
    value: u32,
}

impl NamespaceDefinitionHandle {
    /// Creates a handle for the namespace whose full name is at `offset` of `#Strings`.
    ///
    /// `offset` must fit into 29 bits.
    #[must_use]
    pub const fn from_full_name_offset(offset: u32) -> Self {
        debug_assert!(is_valid_heap_offset(offset));
        NamespaceDefinitionHandle { value: offset }
    }

    /// Creates a handle for a namespace without a name string of its own.
    ///
    /// # Errors
    /// Returns [`crate::Error::TooManySubnamespaces`] if `index` does not fit into 29 bits.
    pub fn from_synthetic_index(index: u32) -> Result<Self> {
        if !is_valid_heap_offset(index) {
            tracing::debug!(index, "synthetic namespace index out of range");
            return Err(Error::TooManySubnamespaces);
        }

        Ok(NamespaceDefinitionHandle {
            value: TOKEN_VIRTUAL_BIT | index,
        })
    }

    /// Returns `true` if the full name of this namespace is stored on the `#Strings` heap
    #[must_use]
    pub const fn has_full_name(&self) -> bool {
        (self.value & TOKEN_VIRTUAL_BIT) == 0
    }

    /// Returns `true` for namespaces identified by a synthetic index
    #[must_use]
    pub const fn is_synthetic(&self) -> bool {
        !self.has_full_name()
    }

    /// Returns `true` for the global namespace, whose name is the empty string at offset `0`
    #[must_use]
    pub const fn is_nil(&self) -> bool {
        self.value == 0
    }

    /// The full dotted name. Only defined if [`Self::has_full_name`] holds.
    #[must_use]
    pub const fn full_name(&self) -> StringHandle {
        debug_assert!(self.has_full_name());
        StringHandle::from_offset(self.value & HEAP_OFFSET_MASK)
    }

    /// The synthetic index, or `None` for namespaces with a full name
    #[must_use]
    pub const fn synthetic_index(&self) -> Option<u32> {
        if self.has_full_name() {
            return None;
        }

        Some(self.value & HEAP_OFFSET_MASK)
    }
}

impl From<NamespaceDefinitionHandle> for Handle {
    fn from(handle: NamespaceDefinitionHandle) -> Self {
        let vtype =
            ((handle.value & TOKEN_VIRTUAL_BIT) >> ROW_ID_BIT_COUNT) as u8 | HandleType::NAMESPACE;
        Handle::new(vtype, handle.value & HEAP_OFFSET_MASK)
    }
}

impl TryFrom<Handle> for NamespaceDefinitionHandle {
    type Error = Error;

    fn try_from(handle: Handle) -> Result<Self> {
        if (handle.vtype() & TYPE_MASK) != HandleType::NAMESPACE {
            return Err(invalid_cast!("NamespaceDefinitionHandle", handle.vtype()));
        }

        Ok(NamespaceDefinitionHandle {
            value: u32::from(handle.vtype() & VIRTUAL_BIT) << ROW_ID_BIT_COUNT | handle.offset(),
        })
    }
}

impl SpecificHandle for NamespaceDefinitionHandle {
    const KIND: HandleKind = HandleKind::NamespaceDefinition;

    fn is_nil(&self) -> bool {
        NamespaceDefinitionHandle::is_nil(self)
    }
}

impl fmt::Debug for NamespaceDefinitionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.synthetic_index() {
            Some(index) => write!(f, "NamespaceDefinitionHandle(synthetic: {index})"),
            None => write!(f, "NamespaceDefinitionHandle(name: 0x{:x})", self.value),
        }
    }
}
