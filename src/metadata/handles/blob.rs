//! Handles into the `#Blob` heap, and the blobs synthesized for WinRT projection.

use std::fmt;

use strum::{EnumCount, EnumIter, FromRepr};

use crate::{
    file::io::write_le_at,
    metadata::handles::{
        handletype::{
            is_valid_heap_offset, HandleType, HEAP_OFFSET_MASK, ROW_ID_BIT_COUNT,
            TOKEN_VIRTUAL_BIT, TYPE_MASK, VIRTUAL_BIT,
        },
        Handle, HandleKind, SpecificHandle,
    },
    Error, Result,
};

/// Byte offset of the `AttributeTargets` value in the `AttributeUsage` templates
const ATTRIBUTE_USAGE_TARGET_OFFSET: usize = 2;

/// Public key of the assemblies that implement the .NET projections of WinRT types
#[rustfmt::skip]
const CONTRACT_PUBLIC_KEY: [u8; 160] = [
    0x00, 0x24, 0x00, 0x00, 0x04, 0x80, 0x00, 0x00, 0x94, 0x00, 0x00, 0x00,
    0x06, 0x02, 0x00, 0x00, 0x00, 0x24, 0x00, 0x00, 0x52, 0x53, 0x41, 0x31,
    0x00, 0x04, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x07, 0xD1, 0xFA, 0x57,
    0xC4, 0xAE, 0xD9, 0xF0, 0xA3, 0x2E, 0x84, 0xAA, 0x0F, 0xAE, 0xFD, 0x0D,
    0xE9, 0xE8, 0xFD, 0x6A, 0xEC, 0x8F, 0x87, 0xFB, 0x03, 0x76, 0x6C, 0x83,
    0x4C, 0x99, 0x92, 0x1E, 0xB2, 0x3B, 0xE7, 0x9A, 0xD9, 0xD5, 0xDC, 0xC1,
    0xDD, 0x9A, 0xD2, 0x36, 0x13, 0x21, 0x02, 0x90, 0x0B, 0x72, 0x3C, 0xF9,
    0x80, 0x95, 0x7F, 0xC4, 0xE1, 0x77, 0x10, 0x8F, 0xC6, 0x07, 0x77, 0x4F,
    0x29, 0xE8, 0x32, 0x0E, 0x92, 0xEA, 0x05, 0xEC, 0xE4, 0xE8, 0x21, 0xC0,
    0xA5, 0xEF, 0xE8, 0xF1, 0x64, 0x5C, 0x4C, 0x0C, 0x93, 0xC1, 0xAB, 0x99,
    0x28, 0x5D, 0x62, 0x2C, 0xAA, 0x65, 0x2C, 0x1D, 0xFA, 0xD6, 0x3D, 0x74,
    0x5D, 0x6F, 0x2D, 0xE5, 0xF1, 0x7E, 0x5E, 0xAF, 0x0F, 0xC4, 0x96, 0x3D,
    0x26, 0x1C, 0x8A, 0x12, 0x43, 0x65, 0x18, 0x20, 0x6D, 0xC0, 0x93, 0x34,
    0x4D, 0x5A, 0xD2, 0x93,
];

/// Public key token of [`CONTRACT_PUBLIC_KEY`]
const CONTRACT_PUBLIC_KEY_TOKEN: [u8; 8] = [0xB0, 0x3F, 0x5F, 0x7F, 0x11, 0xD5, 0x0A, 0x3A];

/// `[AttributeUsage(<targets>, AllowMultiple = false)]`
#[rustfmt::skip]
const ATTRIBUTE_USAGE_ALLOW_SINGLE: [u8; 25] = [
    // prolog
    0x01, 0x00,
    // AttributeTargets, substituted
    0x00, 0x00, 0x00, 0x00,
    // one named argument: property, boolean
    0x01, 0x00, 0x54, 0x02,
    0x0D, b'A', b'l', b'l', b'o', b'w', b'M', b'u', b'l', b't', b'i', b'p', b'l', b'e',
    0x00,
];

/// `[AttributeUsage(<targets>, AllowMultiple = true)]`
#[rustfmt::skip]
const ATTRIBUTE_USAGE_ALLOW_MULTIPLE: [u8; 25] = [
    0x01, 0x00,
    0x00, 0x00, 0x00, 0x00,
    0x01, 0x00, 0x54, 0x02,
    0x0D, b'A', b'l', b'l', b'o', b'w', b'M', b'u', b'l', b't', b'i', b'p', b'l', b'e',
    0x01,
];

/// Blobs synthesized when projecting WinRT metadata.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, EnumIter, EnumCount, FromRepr)]
#[repr(u8)]
pub enum BlobVirtualIndex {
    /// The empty blob
    Nil,
    /// Public key token of the projection contract assemblies
    ContractPublicKeyToken,
    /// Public key of the projection contract assemblies
    ContractPublicKey,
    /// Custom attribute value of `AttributeUsage` with `AllowMultiple = false`
    AttributeUsageAllowSingle,
    /// Custom attribute value of `AttributeUsage` with `AllowMultiple = true`
    AttributeUsageAllowMultiple,
}

impl BlobVirtualIndex {
    /// The canonical bytes of this blob.
    ///
    /// The `AttributeUsage` templates carry a zeroed `AttributeTargets` field, see
    /// [`BlobHandle::substitute_template_parameters`].
    #[must_use]
    pub const fn template(self) -> &'static [u8] {
        match self {
            BlobVirtualIndex::Nil => &[],
            BlobVirtualIndex::ContractPublicKeyToken => &CONTRACT_PUBLIC_KEY_TOKEN,
            BlobVirtualIndex::ContractPublicKey => &CONTRACT_PUBLIC_KEY,
            BlobVirtualIndex::AttributeUsageAllowSingle => &ATTRIBUTE_USAGE_ALLOW_SINGLE,
            BlobVirtualIndex::AttributeUsageAllowMultiple => &ATTRIBUTE_USAGE_ALLOW_MULTIPLE,
        }
    }

    /// Returns `true` if the template has a field filled from the handle's virtual value
    #[must_use]
    pub const fn is_templated(self) -> bool {
        matches!(
            self,
            BlobVirtualIndex::AttributeUsageAllowSingle
                | BlobVirtualIndex::AttributeUsageAllowMultiple
        )
    }
}

/// A reference to a blob on the `#Blob` heap, or to a synthesized blob.
///
/// ## Layout
///
/// - physical: the 29-bit heap offset
/// - virtual: bit 31 set, bits 8-23 a 16-bit virtual value, bits 0-7 the
///   [`BlobVirtualIndex`]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct BlobHandle {
    value: u32,
}

impl BlobHandle {
    /// Creates a handle for the blob at `offset` of the `#Blob` heap.
    ///
    /// `offset` must fit into 29 bits.
    #[must_use]
    pub const fn from_offset(offset: u32) -> Self {
        debug_assert!(is_valid_heap_offset(offset));
        BlobHandle { value: offset }
    }

    /// Creates a handle for a synthesized blob.
    ///
    /// `virtual_value` is only meaningful for templated blobs, where it supplies the field that
    /// [`BlobHandle::substitute_template_parameters`] writes. Pass `0` otherwise.
    #[must_use]
    pub const fn from_virtual_index(index: BlobVirtualIndex, virtual_value: u16) -> Self {
        BlobHandle {
            value: TOKEN_VIRTUAL_BIT | (virtual_value as u32) << 8 | index as u32,
        }
    }

    /// Returns `true` for synthesized blobs
    #[must_use]
    pub const fn is_virtual(&self) -> bool {
        (self.value & TOKEN_VIRTUAL_BIT) != 0
    }

    /// Returns `true` for offset `0`. A virtual handle is never nil.
    #[must_use]
    pub const fn is_nil(&self) -> bool {
        self.value == 0
    }

    /// The offset into the `#Blob` heap. Not defined for virtual handles.
    #[must_use]
    pub const fn heap_offset(&self) -> u32 {
        debug_assert!(!self.is_virtual());
        self.value
    }

    /// The synthesized blob of a virtual handle.
    ///
    /// Returns `None` for non-virtual handles and for indices that name no synthesized blob.
    #[must_use]
    pub fn virtual_index(&self) -> Option<BlobVirtualIndex> {
        if !self.is_virtual() {
            return None;
        }

        BlobVirtualIndex::from_repr((self.value & 0xFF) as u8)
    }

    /// The 16-bit value stored next to the virtual index
    #[must_use]
    pub const fn virtual_value(&self) -> u16 {
        debug_assert!(self.is_virtual());
        (self.value >> 8) as u16
    }

    /// Writes this handle's virtual value into a copy of its template.
    ///
    /// Only meaningful for the `AttributeUsage` templates, whose single parameter is the
    /// 4-byte little-endian `AttributeTargets` value at offset 2. The 16-bit virtual value is
    /// zero-extended; every other byte of `blob` is left alone.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if `blob` is shorter than 6 bytes.
    pub fn substitute_template_parameters(&self, blob: &mut [u8]) -> Result<()> {
        debug_assert!(self.virtual_index().is_some_and(BlobVirtualIndex::is_templated));

        let mut offset = ATTRIBUTE_USAGE_TARGET_OFFSET;
        write_le_at(blob, &mut offset, u32::from(self.virtual_value()))
    }

    /// The bytes of a synthesized blob, with template parameters applied.
    ///
    /// Returns `None` for non-virtual handles, whose bytes live in the `#Blob` heap.
    #[must_use]
    pub fn virtual_blob_value(&self) -> Option<Vec<u8>> {
        let index = self.virtual_index()?;
        let mut blob = index.template().to_vec();
        if index.is_templated() {
            // Templates are long enough for their parameter
            self.substitute_template_parameters(&mut blob).ok()?;
        }

        Some(blob)
    }
}

impl From<BlobHandle> for Handle {
    fn from(handle: BlobHandle) -> Self {
        let vtype = ((handle.value & TOKEN_VIRTUAL_BIT) >> ROW_ID_BIT_COUNT) as u8 | HandleType::BLOB;
        Handle::new(vtype, handle.value & HEAP_OFFSET_MASK)
    }
}

impl TryFrom<Handle> for BlobHandle {
    type Error = Error;

    fn try_from(handle: Handle) -> Result<Self> {
        if (handle.vtype() & TYPE_MASK) != HandleType::BLOB {
            return Err(invalid_cast!("BlobHandle", handle.vtype()));
        }

        Ok(BlobHandle {
            value: u32::from(handle.vtype() & VIRTUAL_BIT) << ROW_ID_BIT_COUNT | handle.offset(),
        })
    }
}

impl SpecificHandle for BlobHandle {
    const KIND: HandleKind = HandleKind::Blob;

    fn is_nil(&self) -> bool {
        BlobHandle::is_nil(self)
    }
}

impl fmt::Debug for BlobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_virtual() {
            return write!(f, "BlobHandle(offset: 0x{:x})", self.value);
        }

        match self.virtual_index() {
            Some(index) => write!(
                f,
                "BlobHandle(virtual {:?}, value: 0x{:04x})",
                index,
                self.virtual_value()
            ),
            None => write!(f, "BlobHandle(virtual 0x{:08x})", self.value),
        }
    }
}
