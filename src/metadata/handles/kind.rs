//! [`HandleKind`], the public discriminant of every handle type.

use strum::{EnumCount, EnumIter, FromRepr, IntoStaticStr};

use crate::metadata::{
    handles::handletype::{HandleType, NON_VIRTUAL_STRING_TYPE_MASK, TYPE_MASK},
    tables::{HeapId, TableId},
};

/// The kind of entity or heap value a handle references.
///
/// The discriminant of every variant equals the small type code that handles of this kind
/// carry, which for entity kinds is the ECMA-335 table number. These values are part of the
/// public contract and never change.
///
/// The four string flavours (plain, dot-terminated, virtual and `<WinRT>`-prefixed) all
/// surface as [`HandleKind::String`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, EnumIter, EnumCount, FromRepr, IntoStaticStr)]
#[repr(u8)]
pub enum HandleKind {
    /// `Module` table
    ModuleDefinition = HandleType::MODULE,
    /// `TypeRef` table
    TypeReference = HandleType::TYPE_REF,
    /// `TypeDef` table
    TypeDefinition = HandleType::TYPE_DEF,
    /// `Field` table
    FieldDefinition = HandleType::FIELD_DEF,
    /// `MethodDef` table
    MethodDefinition = HandleType::METHOD_DEF,
    /// `Param` table
    Parameter = HandleType::PARAM_DEF,
    /// `InterfaceImpl` table
    InterfaceImplementation = HandleType::INTERFACE_IMPL,
    /// `MemberRef` table
    MemberReference = HandleType::MEMBER_REF,
    /// `Constant` table
    Constant = HandleType::CONSTANT,
    /// `CustomAttribute` table
    CustomAttribute = HandleType::CUSTOM_ATTRIBUTE,
    /// `DeclSecurity` table
    DeclarativeSecurityAttribute = HandleType::DECL_SECURITY,
    /// `StandAloneSig` table
    StandaloneSignature = HandleType::SIGNATURE,
    /// `Event` table
    EventDefinition = HandleType::EVENT,
    /// `Property` table
    PropertyDefinition = HandleType::PROPERTY,
    /// `MethodImpl` table
    MethodImplementation = HandleType::METHOD_IMPL,
    /// `ModuleRef` table
    ModuleReference = HandleType::MODULE_REF,
    /// `TypeSpec` table
    TypeSpecification = HandleType::TYPE_SPEC,
    /// `Assembly` table
    AssemblyDefinition = HandleType::ASSEMBLY,
    /// `AssemblyRef` table
    AssemblyReference = HandleType::ASSEMBLY_REF,
    /// `File` table
    AssemblyFile = HandleType::FILE,
    /// `ExportedType` table
    ExportedType = HandleType::EXPORTED_TYPE,
    /// `ManifestResource` table
    ManifestResource = HandleType::MANIFEST_RESOURCE,
    /// `GenericParam` table
    GenericParameter = HandleType::GENERIC_PARAM,
    /// `MethodSpec` table
    MethodSpecification = HandleType::METHOD_SPEC,
    /// `GenericParamConstraint` table
    GenericParameterConstraint = HandleType::GENERIC_PARAM_CONSTRAINT,
    /// Portable PDB `Document` table
    Document = HandleType::DOCUMENT,
    /// Portable PDB `MethodDebugInformation` table
    MethodDebugInformation = HandleType::METHOD_DEBUG_INFORMATION,
    /// Portable PDB `LocalScope` table
    LocalScope = HandleType::LOCAL_SCOPE,
    /// Portable PDB `LocalVariable` table
    LocalVariable = HandleType::LOCAL_VARIABLE,
    /// Portable PDB `LocalConstant` table
    LocalConstant = HandleType::LOCAL_CONSTANT,
    /// Portable PDB `ImportScope` table
    ImportScope = HandleType::IMPORT_SCOPE,
    /// Portable PDB `CustomDebugInformation` table
    CustomDebugInformation = HandleType::CUSTOM_DEBUG_INFORMATION,
    /// `#US` heap
    UserString = HandleType::USER_STRING,
    /// `#Blob` heap
    Blob = HandleType::BLOB,
    /// `#GUID` heap
    Guid = HandleType::GUID,
    /// `#Strings` heap, any flavour
    String = HandleType::STRING,
    /// Namespace definition, backed by the `#Strings` heap or synthesized
    NamespaceDefinition = HandleType::NAMESPACE,
}

impl HandleKind {
    /// Maps a small type (virtual bit ignored) to its public kind.
    ///
    /// Returns `None` for type codes that no handle kind is assigned to, such as the
    /// `*Ptr` tables.
    ///
    /// ## Arguments
    /// * `small_type` - The small type byte carried by a [`crate::metadata::handles::Handle`]
    #[must_use]
    pub fn from_type(small_type: u8) -> Option<HandleKind> {
        let code = small_type & TYPE_MASK;
        if (code & !NON_VIRTUAL_STRING_TYPE_MASK) == HandleType::STRING {
            return Some(HandleKind::String);
        }

        HandleKind::from_repr(code)
    }

    /// The small type code of this kind (plain flavour for strings).
    #[must_use]
    pub const fn handle_type(self) -> u8 {
        self as u8
    }

    /// Returns `true` for kinds that reference a heap rather than a table row.
    #[must_use]
    pub const fn is_heap(self) -> bool {
        crate::metadata::handles::handletype::is_heap_type(self as u8)
    }

    /// The metadata table rows of this kind live in, if any.
    #[must_use]
    pub fn table(self) -> Option<TableId> {
        if self.is_heap() {
            return None;
        }

        TableId::from_repr(self as u8)
    }

    /// The heap values of this kind live in, if any.
    ///
    /// Namespace definitions are not a heap of their own and report `None`.
    #[must_use]
    pub const fn heap(self) -> Option<HeapId> {
        match self {
            HandleKind::UserString => Some(HeapId::UserString),
            HandleKind::String => Some(HeapId::String),
            HandleKind::Blob => Some(HeapId::Blob),
            HandleKind::Guid => Some(HeapId::Guid),
            _ => None,
        }
    }

    /// The name of this kind, e.g. `"MethodDefinition"`.
    #[must_use]
    pub fn name(self) -> &'static str {
        self.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use strum::IntoEnumIterator;

    #[test]
    fn discriminants_are_unique() {
        let codes: HashSet<u8> = HandleKind::iter().map(HandleKind::handle_type).collect();
        assert_eq!(codes.len(), HandleKind::COUNT);
    }

    #[test]
    fn from_type_round_trips() {
        for kind in HandleKind::iter() {
            assert_eq!(HandleKind::from_type(kind.handle_type()), Some(kind));
            assert_eq!(HandleKind::from_type(kind.handle_type() | 0x80), Some(kind));
        }
    }

    #[test]
    fn string_flavours_collapse() {
        for code in [0x78, 0x79, 0x7A, 0x7B, 0xF8, 0xF9] {
            assert_eq!(HandleKind::from_type(code), Some(HandleKind::String));
        }
        assert_eq!(HandleKind::from_type(0x7C), Some(HandleKind::NamespaceDefinition));
    }

    #[test]
    fn unassigned_codes() {
        // FieldPtr, MethodPtr, EventMap, StateMachineMethod
        for code in [0x03, 0x05, 0x12, 0x36, 0x73, 0x7D, 0x7F] {
            assert_eq!(HandleKind::from_type(code), None, "code 0x{code:02x}");
        }
    }

    #[test]
    fn tables_and_heaps() {
        assert_eq!(HandleKind::MethodDefinition.table(), Some(TableId::MethodDef));
        assert_eq!(HandleKind::AssemblyFile.table(), Some(TableId::File));
        assert_eq!(HandleKind::StandaloneSignature.table(), Some(TableId::StandAloneSig));
        assert_eq!(HandleKind::LocalScope.table(), Some(TableId::LocalScope));
        assert_eq!(HandleKind::Blob.table(), None);
        assert_eq!(HandleKind::Blob.heap(), Some(HeapId::Blob));
        assert_eq!(HandleKind::NamespaceDefinition.heap(), None);
        assert_eq!(HandleKind::NamespaceDefinition.table(), None);

        for kind in HandleKind::iter() {
            assert_ne!(
                kind.table().is_some(),
                kind.is_heap(),
                "{} must be either a table or a heap kind",
                kind.name()
            );
        }
    }

    #[test]
    fn names() {
        assert_eq!(HandleKind::TypeDefinition.name(), "TypeDefinition");
        assert_eq!(HandleKind::UserString.name(), "UserString");
    }
}
