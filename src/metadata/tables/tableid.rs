//! Identifiers of the metadata tables and heaps.

use strum::{EnumCount, EnumIter, FromRepr};

use crate::metadata::{handles::handletype::ROW_ID_BIT_COUNT, token::Token};

/// Identifiers for the different metadata tables defined in the ECMA-335 specification.
///
/// Each variant represents a specific type of metadata table that can be present in a .NET
/// assembly or a Portable PDB. The numeric values correspond to the table IDs as defined in the
/// CLI specification, and double as the high byte of a metadata token.
///
/// ## Table Categories
///
/// ### Core Type System
/// - **`Module`**, **`TypeRef`**, **`TypeDef`**, **`Field`**, **`MethodDef`**, **`Param`**
///
/// ### Indirection (uncompressed `#-` streams only)
/// - **`FieldPtr`**, **`MethodPtr`**, **`ParamPtr`**, **`EventPtr`**, **`PropertyPtr`**
///
/// ### Relationships and Members
/// - **`InterfaceImpl`**, **`MemberRef`**, **`MethodImpl`**, **`MethodSemantics`**,
///   **`NestedClass`**, **`ClassLayout`**, **`FieldLayout`**
///
/// ### Attributes and Constants
/// - **`Constant`**, **`CustomAttribute`**, **`FieldMarshal`**, **`DeclSecurity`**
///
/// ### Signatures and Generics
/// - **`StandAloneSig`**, **`TypeSpec`**, **`MethodSpec`**, **`GenericParam`**,
///   **`GenericParamConstraint`**
///
/// ### Assembly Information
/// - **`Assembly`**, **`AssemblyRef`** and their `Processor` / `OS` companions,
///   **`File`**, **`ExportedType`**, **`ManifestResource`**
///
/// ### Portable PDB
/// - **`Document`**, **`MethodDebugInformation`**, **`LocalScope`**, **`LocalVariable`**,
///   **`LocalConstant`**, **`ImportScope`**, **`StateMachineMethod`**,
///   **`CustomDebugInformation`**
///
/// ## Reference
/// * [ECMA-335 Partition II, Section 22](https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf) - Metadata Tables
/// * [Portable PDB v1.0](https://github.com/dotnet/runtime/blob/main/docs/design/specs/PortablePdb-Metadata.md) - Debug tables
#[derive(Clone, Copy, PartialEq, Debug, EnumIter, EnumCount, FromRepr, Eq, Hash)]
#[repr(u8)]
pub enum TableId {
    /// `Module` table (0x00) - Exactly one row describing the current module.
    Module = 0x00,
    /// `TypeRef` table (0x01) - References to types defined in other scopes.
    TypeRef = 0x01,
    /// `TypeDef` table (0x02) - Types defined within this module.
    TypeDef = 0x02,
    /// `FieldPtr` table (0x03) - Field indirection of unoptimized metadata.
    FieldPtr = 0x03,
    /// `Field` table (0x04) - Field definitions within types.
    Field = 0x04,
    /// `MethodPtr` table (0x05) - Method indirection of unoptimized metadata.
    MethodPtr = 0x05,
    /// `MethodDef` table (0x06) - Method definitions within types.
    MethodDef = 0x06,
    /// `ParamPtr` table (0x07) - Parameter indirection of unoptimized metadata.
    ParamPtr = 0x07,
    /// `Param` table (0x08) - Parameter definitions for methods.
    Param = 0x08,
    /// `InterfaceImpl` table (0x09) - Interface implementations by types.
    InterfaceImpl = 0x09,
    /// `MemberRef` table (0x0A) - References to fields and methods of other scopes.
    MemberRef = 0x0A,
    /// `Constant` table (0x0B) - Compile-time constant values.
    Constant = 0x0B,
    /// `CustomAttribute` table (0x0C) - Custom attribute applications.
    CustomAttribute = 0x0C,
    /// `FieldMarshal` table (0x0D) - Marshalling information for fields and parameters.
    FieldMarshal = 0x0D,
    /// `DeclSecurity` table (0x0E) - Declarative security permissions.
    DeclSecurity = 0x0E,
    /// `ClassLayout` table (0x0F) - Explicit layout information for types.
    ClassLayout = 0x0F,
    /// `FieldLayout` table (0x10) - Explicit field offsets.
    FieldLayout = 0x10,
    /// `StandAloneSig` table (0x11) - Signatures not attached to a member.
    StandAloneSig = 0x11,
    /// `EventMap` table (0x12) - Mapping from types to their events.
    EventMap = 0x12,
    /// `EventPtr` table (0x13) - Event indirection of unoptimized metadata.
    EventPtr = 0x13,
    /// `Event` table (0x14) - Event definitions within types.
    Event = 0x14,
    /// `PropertyMap` table (0x15) - Mapping from types to their properties.
    PropertyMap = 0x15,
    /// `PropertyPtr` table (0x16) - Property indirection of unoptimized metadata.
    PropertyPtr = 0x16,
    /// `Property` table (0x17) - Property definitions within types.
    Property = 0x17,
    /// `MethodSemantics` table (0x18) - Property and event accessor mappings.
    MethodSemantics = 0x18,
    /// `MethodImpl` table (0x19) - Method implementation mappings.
    MethodImpl = 0x19,
    /// `ModuleRef` table (0x1A) - References to other modules.
    ModuleRef = 0x1A,
    /// `TypeSpec` table (0x1B) - Type specifications (signatures).
    TypeSpec = 0x1B,
    /// `ImplMap` table (0x1C) - P/Invoke implementation mappings.
    ImplMap = 0x1C,
    /// `FieldRVA` table (0x1D) - Initial data of fields.
    FieldRVA = 0x1D,
    /// `EncLog` table (0x1E) - Edit-and-continue log.
    EncLog = 0x1E,
    /// `EncMap` table (0x1F) - Edit-and-continue token map.
    EncMap = 0x1F,
    /// `Assembly` table (0x20) - The current assembly, at most one row.
    Assembly = 0x20,
    /// `AssemblyProcessor` table (0x21) - Unused in practice.
    AssemblyProcessor = 0x21,
    /// `AssemblyOS` table (0x22) - Unused in practice.
    AssemblyOS = 0x22,
    /// `AssemblyRef` table (0x23) - References to other assemblies.
    AssemblyRef = 0x23,
    /// `AssemblyRefProcessor` table (0x24) - Unused in practice.
    AssemblyRefProcessor = 0x24,
    /// `AssemblyRefOS` table (0x25) - Unused in practice.
    AssemblyRefOS = 0x25,
    /// `File` table (0x26) - Files that are part of the assembly.
    File = 0x26,
    /// `ExportedType` table (0x27) - Types exported or forwarded by this assembly.
    ExportedType = 0x27,
    /// `ManifestResource` table (0x28) - Embedded or linked resources.
    ManifestResource = 0x28,
    /// `NestedClass` table (0x29) - Nested class relationships.
    NestedClass = 0x29,
    /// `GenericParam` table (0x2A) - Generic parameter definitions.
    GenericParam = 0x2A,
    /// `MethodSpec` table (0x2B) - Generic method instantiations.
    MethodSpec = 0x2B,
    /// `GenericParamConstraint` table (0x2C) - Generic parameter constraints.
    GenericParamConstraint = 0x2C,
    /// `Document` table (0x30) - Source documents of a Portable PDB.
    Document = 0x30,
    /// `MethodDebugInformation` table (0x31) - Sequence points per method.
    MethodDebugInformation = 0x31,
    /// `LocalScope` table (0x32) - Lexical scopes of locals.
    LocalScope = 0x32,
    /// `LocalVariable` table (0x33) - Local variable names.
    LocalVariable = 0x33,
    /// `LocalConstant` table (0x34) - Local constant names and values.
    LocalConstant = 0x34,
    /// `ImportScope` table (0x35) - Namespace import scopes.
    ImportScope = 0x35,
    /// `StateMachineMethod` table (0x36) - Async/iterator kickoff methods.
    StateMachineMethod = 0x36,
    /// `CustomDebugInformation` table (0x37) - Extensible debug records.
    CustomDebugInformation = 0x37,
}

impl TableId {
    /// Builds the metadata token for `row` in this table.
    ///
    /// ## Arguments
    /// * `row` - The 1-based row id, must fit into 24 bits
    #[must_use]
    pub fn token(self, row: u32) -> Token {
        debug_assert!(crate::metadata::handles::handletype::is_valid_row_id(row));
        Token::new((self as u32) << ROW_ID_BIT_COUNT | row)
    }
}

/// Identifiers for the metadata heaps a heap handle can reference.
///
/// The numeric values follow the conventional heap numbering, they are not stored in metadata.
#[derive(Clone, Copy, PartialEq, Debug, EnumIter, EnumCount, FromRepr, Eq, Hash)]
#[repr(u8)]
pub enum HeapId {
    /// `#US` - UTF-16 user strings referenced by `ldstr`
    UserString = 0,
    /// `#Strings` - NUL-terminated UTF-8 identifiers
    String = 1,
    /// `#Blob` - Length-prefixed binary values
    Blob = 2,
    /// `#GUID` - Array of 16-byte GUIDs
    Guid = 3,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_repr() {
        assert_eq!(TableId::from_repr(0x06), Some(TableId::MethodDef));
        assert_eq!(TableId::from_repr(0x37), Some(TableId::CustomDebugInformation));
        assert_eq!(TableId::from_repr(0x2D), None);
        assert_eq!(TableId::from_repr(0x70), None);
        assert_eq!(HeapId::from_repr(3), Some(HeapId::Guid));
    }

    #[test]
    fn token() {
        assert_eq!(TableId::Module.token(1), Token::new(0x0000_0001));
        assert_eq!(TableId::TypeDef.token(5), Token::new(0x0200_0005));
        assert_eq!(TableId::GenericParam.token(0x00FF_FFFF), Token::new(0x2AFF_FFFF));
    }
}
