//! Handles into the `#GUID` heap.
//!
//! Unlike the other heaps, GUIDs are addressed by a 1-based index of 16-byte entries. Index `0`
//! is the nil GUID.

use crate::{
    metadata::handles::{
        handletype::{is_valid_heap_offset, HandleType},
        Handle, HandleKind, SpecificHandle,
    },
    Error, Result,
};

/// A reference to an entry of the `#GUID` heap.
///
/// Unlike every other heap handle this does not store a byte offset: the `#GUID` heap is an
/// array of 16-byte entries and the handle holds the 1-based index into it. Index `0` is the
/// nil handle, entry `n` starts at byte `(n - 1) * 16`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub struct GuidHandle {
    index: u32,
}

impl GuidHandle {
    /// Creates a handle for the 1-based `index`
    #[must_use]
    pub const fn from_index(index: u32) -> Self {
        debug_assert!(is_valid_heap_offset(index));
        GuidHandle { index }
    }

    /// The 1-based index
    #[must_use]
    pub const fn index(&self) -> u32 {
        self.index
    }

    /// Returns `true` for index `0`
    #[must_use]
    pub const fn is_nil(&self) -> bool {
        self.index == 0
    }
}

impl From<GuidHandle> for Handle {
    fn from(handle: GuidHandle) -> Self {
        Handle::new(HandleType::GUID, handle.index)
    }
}

impl TryFrom<Handle> for GuidHandle {
    type Error = Error;

    fn try_from(handle: Handle) -> Result<Self> {
        if handle.vtype() != HandleType::GUID {
            return Err(invalid_cast!("GuidHandle", handle.vtype()));
        }

        Ok(GuidHandle::from_index(handle.offset()))
    }
}

impl SpecificHandle for GuidHandle {
    const KIND: HandleKind = HandleKind::Guid;

    fn is_nil(&self) -> bool {
        GuidHandle::is_nil(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_based() {
        assert!(GuidHandle::from_index(0).is_nil());
        assert!(!GuidHandle::from_index(1).is_nil());
        assert_eq!(GuidHandle::from_index(1).index(), 1);
    }

    #[test]
    fn conversions() {
        let guid = GuidHandle::from_index(3);
        let handle: Handle = guid.into();
        assert_eq!(handle.kind(), Some(HandleKind::Guid));
        assert_eq!(handle.offset(), 3);
        assert_eq!(GuidHandle::try_from(handle).unwrap(), guid);

        let virt = Handle::new(HandleType::GUID | 0x80, 3);
        assert!(GuidHandle::try_from(virt).is_err());
        assert!(GuidHandle::try_from(Handle::new(HandleType::BLOB, 3)).is_err());
    }
}
