//! Typed handles for metadata table rows and heap values.
//!
//! A handle is a small `Copy` value that references one entity (a table row) or one heap value
//! (a string, blob, GUID or user string) of a metadata image. Handles come in three widths:
//!
//! - [`Handle`] can hold any kind, including heap offsets.
//! - [`EntityHandle`] can hold any table row, packed into a single 32-bit word.
//! - One specific type per kind, e.g. [`MethodDefinitionHandle`] or [`BlobHandle`].
//!
//! Widening a specific handle is total and uses [`From`]. Narrowing uses [`TryFrom`] (or
//! `try_as`) and fails with [`crate::Error::InvalidCast`] whenever the kind does not match.
//! Nothing is ever coerced.
//!
//! # Virtual handles
//!
//! When WinRT metadata is projected onto .NET types, a reader has to hand out references to
//! entities that do not exist in the file: the contract assemblies, their names, their public
//! key, `AttributeUsage` values. Such handles have the virtual bit set and carry an index into
//! a fixed table of projected values ([`AssemblyRefVirtualIndex`], [`StringVirtualIndex`],
//! [`BlobVirtualIndex`]) instead of a row id or heap offset. A virtual handle is never nil,
//! and sorts after all physical handles.
//!
//! # Tokens
//!
//! The small type code of every entity kind is its ECMA-335 table number, so a non-virtual
//! entity handle converts into the conventional metadata token without a lookup:
//!
//! ```rust
//! use cilhandles::prelude::*;
//!
//! let method = MethodDefinitionHandle::from_row_id(5);
//! assert_eq!(Handle::from(method).token().value(), 0x0600_0005);
//! assert_eq!(EntityHandle::from(method).token().value(), 0x0600_0005);
//! ```

pub mod handletype;

mod assemblyref;
mod blob;
mod entities;
mod entityhandle;
mod guid;
mod handle;
mod kind;
mod namespace;
mod string;
mod traits;
mod userstring;

pub use assemblyref::{AssemblyRefVirtualIndex, AssemblyReferenceHandle};
pub use blob::{BlobHandle, BlobVirtualIndex};
pub use entities::*;
pub use entityhandle::EntityHandle;
pub use guid::GuidHandle;
pub use handle::Handle;
pub use kind::HandleKind;
pub use namespace::NamespaceDefinitionHandle;
pub use string::{StringHandle, StringKind, StringVirtualIndex};
pub use traits::{SpecificEntityHandle, SpecificHandle};
pub use userstring::UserStringHandle;

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    fn handles_of_every_kind() -> Vec<Handle> {
        vec![
            ModuleDefinitionHandle::from_row_id(1).into(),
            TypeReferenceHandle::from_row_id(1).into(),
            TypeDefinitionHandle::from_row_id(1).into(),
            FieldDefinitionHandle::from_row_id(1).into(),
            MethodDefinitionHandle::from_row_id(1).into(),
            ParameterHandle::from_row_id(1).into(),
            InterfaceImplementationHandle::from_row_id(1).into(),
            MemberReferenceHandle::from_row_id(1).into(),
            ConstantHandle::from_row_id(1).into(),
            CustomAttributeHandle::from_row_id(1).into(),
            DeclarativeSecurityAttributeHandle::from_row_id(1).into(),
            StandaloneSignatureHandle::from_row_id(1).into(),
            EventDefinitionHandle::from_row_id(1).into(),
            PropertyDefinitionHandle::from_row_id(1).into(),
            MethodImplementationHandle::from_row_id(1).into(),
            ModuleReferenceHandle::from_row_id(1).into(),
            TypeSpecificationHandle::from_row_id(1).into(),
            AssemblyDefinitionHandle::from_row_id(1).into(),
            AssemblyReferenceHandle::from_row_id(1).into(),
            AssemblyFileHandle::from_row_id(1).into(),
            ExportedTypeHandle::from_row_id(1).into(),
            ManifestResourceHandle::from_row_id(1).into(),
            GenericParameterHandle::from_row_id(1).into(),
            MethodSpecificationHandle::from_row_id(1).into(),
            GenericParameterConstraintHandle::from_row_id(1).into(),
            DocumentHandle::from_row_id(1).into(),
            MethodDebugInformationHandle::from_row_id(1).into(),
            LocalScopeHandle::from_row_id(1).into(),
            LocalVariableHandle::from_row_id(1).into(),
            LocalConstantHandle::from_row_id(1).into(),
            ImportScopeHandle::from_row_id(1).into(),
            CustomDebugInformationHandle::from_row_id(1).into(),
            UserStringHandle::from_offset(1).into(),
            BlobHandle::from_offset(1).into(),
            GuidHandle::from_index(1).into(),
            StringHandle::from_offset(1).into(),
            NamespaceDefinitionHandle::from_full_name_offset(1).into(),
        ]
    }

    #[test]
    fn every_kind_has_a_handle() {
        let kinds: Vec<HandleKind> = handles_of_every_kind()
            .iter()
            .map(|handle| handle.kind().unwrap())
            .collect();

        for kind in HandleKind::iter() {
            assert!(kinds.contains(&kind), "{kind:?} has no specific handle");
        }
        assert_eq!(kinds.len(), HandleKind::iter().count());
    }

    #[test]
    fn same_payload_different_kind_differ() {
        let handles = handles_of_every_kind();
        for (i, a) in handles.iter().enumerate() {
            for b in &handles[i + 1..] {
                assert_ne!(a, b);
                assert_ne!(a.cmp(b), std::cmp::Ordering::Equal);
            }
        }
    }

    fn assert_narrows<H, O>(specific: H)
    where
        H: SpecificHandle + PartialEq + std::fmt::Debug,
        O: SpecificHandle,
    {
        let handle: Handle = specific.into();
        assert_eq!(handle.kind(), Some(H::KIND));
        assert_eq!(H::try_from(handle).unwrap(), specific);
        assert_eq!(handle.try_as::<H>().unwrap(), specific);
        assert!(O::try_from(handle).is_err(), "{handle:?} narrowed to {:?}", O::KIND);
    }

    fn assert_entity_narrows<H, O>(specific: H)
    where
        H: SpecificEntityHandle + PartialEq + std::fmt::Debug,
        O: SpecificEntityHandle,
    {
        assert_narrows::<H, O>(specific);

        let entity: EntityHandle = specific.into();
        assert_eq!(H::try_from(entity).unwrap(), specific);
        assert!(O::try_from(entity).is_err(), "{entity:?} narrowed to {:?}", O::KIND);
        assert_eq!(Handle::from(entity), Into::<Handle>::into(specific));
    }

    #[test]
    fn every_kind_narrows_back_and_only_back() {
        const ROW: u32 = 0x00FF_FFFF;

        macro_rules! row {
            ($own:ident, $other:ident) => {
                assert_entity_narrows::<$own, $other>($own::from_row_id(ROW))
            };
        }

        row!(ModuleDefinitionHandle, TypeReferenceHandle);
        row!(TypeReferenceHandle, TypeDefinitionHandle);
        row!(TypeDefinitionHandle, TypeReferenceHandle);
        row!(FieldDefinitionHandle, ParameterHandle);
        row!(MethodDefinitionHandle, MethodDebugInformationHandle);
        row!(ParameterHandle, FieldDefinitionHandle);
        row!(InterfaceImplementationHandle, MethodImplementationHandle);
        row!(MemberReferenceHandle, MethodDefinitionHandle);
        row!(ConstantHandle, LocalConstantHandle);
        row!(CustomAttributeHandle, CustomDebugInformationHandle);
        row!(DeclarativeSecurityAttributeHandle, CustomAttributeHandle);
        row!(StandaloneSignatureHandle, MethodSpecificationHandle);
        row!(EventDefinitionHandle, PropertyDefinitionHandle);
        row!(PropertyDefinitionHandle, EventDefinitionHandle);
        row!(MethodImplementationHandle, InterfaceImplementationHandle);
        row!(ModuleReferenceHandle, ModuleDefinitionHandle);
        row!(TypeSpecificationHandle, MethodSpecificationHandle);
        row!(AssemblyDefinitionHandle, AssemblyReferenceHandle);
        row!(AssemblyReferenceHandle, AssemblyDefinitionHandle);
        row!(AssemblyFileHandle, ManifestResourceHandle);
        row!(ExportedTypeHandle, TypeDefinitionHandle);
        row!(ManifestResourceHandle, AssemblyFileHandle);
        row!(GenericParameterHandle, GenericParameterConstraintHandle);
        row!(MethodSpecificationHandle, TypeSpecificationHandle);
        row!(GenericParameterConstraintHandle, GenericParameterHandle);
        row!(DocumentHandle, ImportScopeHandle);
        row!(MethodDebugInformationHandle, MethodDefinitionHandle);
        row!(LocalScopeHandle, LocalVariableHandle);
        row!(LocalVariableHandle, LocalScopeHandle);
        row!(LocalConstantHandle, ConstantHandle);
        row!(ImportScopeHandle, DocumentHandle);
        row!(CustomDebugInformationHandle, CustomAttributeHandle);

        assert_narrows::<UserStringHandle, StringHandle>(UserStringHandle::from_offset(ROW));
        assert_narrows::<BlobHandle, GuidHandle>(BlobHandle::from_offset(0x1FFF_FFFF));
        assert_narrows::<GuidHandle, BlobHandle>(GuidHandle::from_index(0x1FFF_FFFF));
        assert_narrows::<StringHandle, NamespaceDefinitionHandle>(StringHandle::from_offset(
            0x1FFF_FFFF,
        ));
        assert_narrows::<NamespaceDefinitionHandle, StringHandle>(
            NamespaceDefinitionHandle::from_full_name_offset(0x1FFF_FFFF),
        );
    }

    #[test]
    fn virtual_handles_narrow_back_and_only_back() {
        for index in AssemblyRefVirtualIndex::iter() {
            assert_entity_narrows::<AssemblyReferenceHandle, AssemblyDefinitionHandle>(
                AssemblyReferenceHandle::from_virtual_index(index),
            );
        }
        for index in StringVirtualIndex::iter() {
            assert_narrows::<StringHandle, UserStringHandle>(StringHandle::from_virtual_index(
                index,
            ));
        }
        for index in BlobVirtualIndex::iter() {
            assert_narrows::<BlobHandle, StringHandle>(BlobHandle::from_virtual_index(
                index, 0x4000,
            ));
        }

        let plain = StringHandle::from_offset(0x40);
        assert_narrows::<StringHandle, BlobHandle>(plain.with_dot_termination());
        assert_narrows::<StringHandle, NamespaceDefinitionHandle>(plain.with_winrt_prefix());
        assert_narrows::<NamespaceDefinitionHandle, StringHandle>(
            NamespaceDefinitionHandle::from_synthetic_index(0x40).unwrap(),
        );
    }
}
