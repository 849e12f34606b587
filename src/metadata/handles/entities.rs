//! Specific handles for table rows that are never virtual.
//!
//! Each type here is a distinct wrapper around a 24-bit row id, generated by
//! `entity_handle!`. They only differ in the [`crate::metadata::handles::HandleKind`] they
//! carry, which is what makes narrowing from [`crate::metadata::handles::Handle`] checkable.

entity_handle! {
    /// A reference to the single row of the `Module` table
    ModuleDefinitionHandle => ModuleDefinition
}

entity_handle! {
    /// A reference to the single row of the `Assembly` table
    AssemblyDefinitionHandle => AssemblyDefinition
}

entity_handle! {
    /// A reference to a row of the `TypeDef` table
    TypeDefinitionHandle => TypeDefinition
}

entity_handle! {
    /// A reference to a row of the `TypeRef` table
    TypeReferenceHandle => TypeReference
}

entity_handle! {
    /// A reference to a row of the `TypeSpec` table
    TypeSpecificationHandle => TypeSpecification
}

entity_handle! {
    /// A reference to a row of the `MethodDef` table
    MethodDefinitionHandle => MethodDefinition
}

entity_handle! {
    /// A reference to a row of the `Field` table
    FieldDefinitionHandle => FieldDefinition
}

entity_handle! {
    /// A reference to a row of the `Param` table
    ParameterHandle => Parameter
}

entity_handle! {
    /// A reference to a row of the `MemberRef` table
    MemberReferenceHandle => MemberReference
}

entity_handle! {
    /// A reference to a row of the `Event` table
    EventDefinitionHandle => EventDefinition
}

entity_handle! {
    /// A reference to a row of the `Property` table
    PropertyDefinitionHandle => PropertyDefinition
}

entity_handle! {
    /// A reference to a row of the `Constant` table
    ConstantHandle => Constant
}

entity_handle! {
    /// A reference to a row of the `CustomAttribute` table
    CustomAttributeHandle => CustomAttribute
}

entity_handle! {
    /// A reference to a row of the `DeclSecurity` table
    DeclarativeSecurityAttributeHandle => DeclarativeSecurityAttribute
}

entity_handle! {
    /// A reference to a row of the `ManifestResource` table
    ManifestResourceHandle => ManifestResource
}

entity_handle! {
    /// A reference to a row of the `File` table
    AssemblyFileHandle => AssemblyFile
}

entity_handle! {
    /// A reference to a row of the `InterfaceImpl` table
    InterfaceImplementationHandle => InterfaceImplementation
}

entity_handle! {
    /// A reference to a row of the `MethodImpl` table
    MethodImplementationHandle => MethodImplementation
}

entity_handle! {
    /// A reference to a row of the `MethodSpec` table
    MethodSpecificationHandle => MethodSpecification
}

entity_handle! {
    /// A reference to a row of the `GenericParam` table
    GenericParameterHandle => GenericParameter
}

entity_handle! {
    /// A reference to a row of the `GenericParamConstraint` table
    GenericParameterConstraintHandle => GenericParameterConstraint
}

entity_handle! {
    /// A reference to a row of the `ModuleRef` table
    ModuleReferenceHandle => ModuleReference
}

entity_handle! {
    /// A reference to a row of the `ExportedType` table
    ExportedTypeHandle => ExportedType
}

entity_handle! {
    /// A reference to a row of the `StandAloneSig` table
    StandaloneSignatureHandle => StandaloneSignature
}

entity_handle! {
    /// A reference to a row of the Portable PDB `Document` table
    DocumentHandle => Document
}

entity_handle! {
    /// A reference to a row of the Portable PDB `MethodDebugInformation` table
    MethodDebugInformationHandle => MethodDebugInformation
}

entity_handle! {
    /// A reference to a row of the Portable PDB `LocalScope` table
    LocalScopeHandle => LocalScope
}

entity_handle! {
    /// A reference to a row of the Portable PDB `LocalVariable` table
    LocalVariableHandle => LocalVariable
}

entity_handle! {
    /// A reference to a row of the Portable PDB `LocalConstant` table
    LocalConstantHandle => LocalConstant
}

entity_handle! {
    /// A reference to a row of the Portable PDB `ImportScope` table
    ImportScopeHandle => ImportScope
}

entity_handle! {
    /// A reference to a row of the Portable PDB `CustomDebugInformation` table
    CustomDebugInformationHandle => CustomDebugInformation
}

impl ModuleDefinitionHandle {
    /// The definition of the current module
    pub const DEFINITION: ModuleDefinitionHandle = ModuleDefinitionHandle::from_row_id(1);
}

impl AssemblyDefinitionHandle {
    /// The definition of the current assembly
    pub const DEFINITION: AssemblyDefinitionHandle = AssemblyDefinitionHandle::from_row_id(1);
}

impl MethodDefinitionHandle {
    /// The `MethodDebugInformation` row of this method.
    ///
    /// Portable PDBs keep the two tables parallel, so the row id carries over.
    #[must_use]
    pub const fn to_debug_information_handle(&self) -> MethodDebugInformationHandle {
        MethodDebugInformationHandle::from_row_id(self.row_id())
    }
}

impl MethodDebugInformationHandle {
    /// The `MethodDef` row this debug information belongs to
    #[must_use]
    pub const fn to_definition_handle(&self) -> MethodDefinitionHandle {
        MethodDefinitionHandle::from_row_id(self.row_id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        metadata::{
            handles::{EntityHandle, Handle, HandleKind, SpecificHandle},
            token::Token,
        },
        Error,
    };

    #[test]
    fn token_matches_table_number() {
        assert_eq!(MethodDefinitionHandle::from_row_id(5).token(), Token(0x0600_0005));
        assert_eq!(TypeDefinitionHandle::from_row_id(1).token(), Token(0x0200_0001));
        assert_eq!(StandaloneSignatureHandle::from_row_id(3).token(), Token(0x1100_0003));
        assert_eq!(LocalScopeHandle::from_row_id(9).token(), Token(0x3200_0009));
        assert_eq!(ModuleDefinitionHandle::DEFINITION.token(), Token(0x0000_0001));
    }

    #[test]
    fn widening() {
        let field = FieldDefinitionHandle::from_row_id(0x00AB_CDEF);

        let handle: Handle = field.into();
        assert_eq!(handle.kind(), Some(HandleKind::FieldDefinition));
        assert_eq!(handle.token(), field.token());

        let entity: EntityHandle = field.into();
        assert_eq!(entity.kind(), Some(HandleKind::FieldDefinition));
        assert_eq!(entity.row_id(), 0x00AB_CDEF);
        assert_eq!(Handle::from(entity), handle);
    }

    #[test]
    fn narrowing() {
        let handle: Handle = EventDefinitionHandle::from_row_id(4).into();
        assert_eq!(
            EventDefinitionHandle::try_from(handle).unwrap(),
            EventDefinitionHandle::from_row_id(4)
        );

        match PropertyDefinitionHandle::try_from(handle) {
            Err(Error::InvalidCast { target, found }) => {
                assert_eq!(target, "PropertyDefinitionHandle");
                assert_eq!(found, 0x14);
            }
            other => panic!("expected invalid cast, got {other:?}"),
        }

        let entity: EntityHandle = ConstantHandle::from_row_id(2).into();
        assert!(ConstantHandle::try_from(entity).is_ok());
        assert!(CustomAttributeHandle::try_from(entity).is_err());
    }

    #[test]
    fn narrowing_rejects_virtual_rows() {
        let handle = Handle::from_vtoken(0x8200_0001);
        assert!(TypeDefinitionHandle::try_from(handle).is_err());

        let entity = EntityHandle::new(0x8200_0001);
        match TypeDefinitionHandle::try_from(entity) {
            Err(Error::InvalidCast { found, .. }) => assert_eq!(found, 0x82),
            other => panic!("expected invalid cast, got {other:?}"),
        }
    }

    #[test]
    fn nil() {
        assert!(ParameterHandle::default().is_nil());
        assert!(ParameterHandle::from_row_id(0).is_nil());
        assert!(!ParameterHandle::from_row_id(1).is_nil());
        assert!(Handle::from(ParameterHandle::from_row_id(0)).is_nil());
    }

    #[test]
    fn kinds() {
        assert_eq!(DocumentHandle::KIND, HandleKind::Document);
        assert_eq!(ExportedTypeHandle::KIND, HandleKind::ExportedType);
        assert_eq!(
            GenericParameterConstraintHandle::KIND,
            HandleKind::GenericParameterConstraint
        );
    }

    #[test]
    fn debug_information_rows() {
        let method = MethodDefinitionHandle::from_row_id(12);
        let debug = method.to_debug_information_handle();
        assert_eq!(debug.row_id(), 12);
        assert_eq!(debug.token(), Token(0x3100_000C));
        assert_eq!(debug.to_definition_handle(), method);
    }

    #[test]
    fn singletons() {
        assert_eq!(
            Handle::from(AssemblyDefinitionHandle::DEFINITION),
            Handle::ASSEMBLY_DEFINITION
        );
        assert_eq!(
            EntityHandle::from(ModuleDefinitionHandle::DEFINITION),
            EntityHandle::MODULE_DEFINITION
        );
    }

    #[test]
    fn display() {
        assert_eq!(MemberReferenceHandle::from_row_id(0x10).to_string(), "0x0a000010");
    }
}
