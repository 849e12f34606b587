//! Traits shared by the specific handle types, used for generic narrowing.

use crate::{
    metadata::handles::{EntityHandle, Handle, HandleKind},
    Error,
};

/// A strongly typed handle of exactly one [`HandleKind`].
///
/// Every specific handle widens into [`Handle`] without loss and narrows back out of it with a
/// tag check. The trait exists so that generic code can name the target of a narrowing, see
/// [`Handle::try_as`].
pub trait SpecificHandle: Copy + Into<Handle> + TryFrom<Handle, Error = Error> {
    /// The kind every value of this type reports
    const KIND: HandleKind;

    /// Returns `true` for the nil reference of this kind
    fn is_nil(&self) -> bool;
}

/// A specific handle that references a table row and therefore also fits an [`EntityHandle`].
pub trait SpecificEntityHandle:
    SpecificHandle + Into<EntityHandle> + TryFrom<EntityHandle, Error = Error>
{
    /// The row id (or virtual index, for virtual handles)
    fn row_id(&self) -> u32;
}
