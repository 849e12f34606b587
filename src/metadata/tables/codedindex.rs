//! Coded indices: references into one of several tables, discriminated by a few tag bits.
//!
//! ECMA-335 II.24.2.6 packs a reference to "one of a family of tables" into a single column:
//! the low bits name the table by its position in the family, the remaining bits hold the row.
//! [`CodedIndexType`] describes each family; decoding yields an
//! [`crate::metadata::handles::EntityHandle`] so that the result can be narrowed to the
//! specific handle the caller expects.
//!
//! Validating the row against the actual table sizes is up to the table reader.

use strum::{EnumCount, EnumIter};

use crate::{
    file::io::read_le_at_dyn,
    metadata::{
        handles::{handletype::is_valid_row_id, EntityHandle},
        tables::TableId,
        token::Token,
    },
    Error, Result,
};

/// The coded index families defined by ECMA-335 and Portable PDB.
#[derive(Debug, Hash, Eq, PartialEq, Clone, Copy, EnumIter, EnumCount)]
#[repr(usize)]
pub enum CodedIndexType {
    /// `TypeDef`, `TypeRef`, `TypeSpec`
    TypeDefOrRef,
    /// `Field`, `Param`, `Property`
    HasConstant,
    /// Every table that can carry a custom attribute
    HasCustomAttribute,
    /// `Field`, `Param`
    HasFieldMarshal,
    /// `TypeDef`, `MethodDef`, `Assembly`
    HasDeclSecurity,
    /// `TypeDef`, `TypeRef`, `ModuleRef`, `MethodDef`, `TypeSpec`
    MemberRefParent,
    /// `Event`, `Property`
    HasSemantics,
    /// `MethodDef`, `MemberRef`
    MethodDefOrRef,
    /// `Field`, `MethodDef`
    MemberForwarded,
    /// `File`, `AssemblyRef`, `ExportedType`
    Implementation,
    /// `MethodDef` (tag 2), `MemberRef` (tag 3); tags 0, 1 and 4 are unused
    CustomAttributeType,
    /// `Module`, `ModuleRef`, `AssemblyRef`, `TypeRef`
    ResolutionScope,
    /// `TypeDef`, `MethodDef`
    TypeOrMethodDef,
    /// Portable PDB: every table that can carry custom debug information
    HasCustomDebugInformation,
}

impl CodedIndexType {
    /// The tables of this family, in tag order.
    ///
    /// For [`CodedIndexType::CustomAttributeType`] only the two used tables are listed, see
    /// [`CodedIndexType::table_for_tag`] for the actual tag assignment.
    #[must_use]
    pub fn tables(&self) -> &'static [TableId] {
        match self {
            CodedIndexType::TypeDefOrRef => {
                &[TableId::TypeDef, TableId::TypeRef, TableId::TypeSpec]
            }
            CodedIndexType::HasConstant => &[TableId::Field, TableId::Param, TableId::Property],
            CodedIndexType::HasCustomAttribute => &[
                TableId::MethodDef,
                TableId::Field,
                TableId::TypeRef,
                TableId::TypeDef,
                TableId::Param,
                TableId::InterfaceImpl,
                TableId::MemberRef,
                TableId::Module,
                TableId::DeclSecurity, // listed as 'Permission' in the standard, no such table exists
                TableId::Property,
                TableId::Event,
                TableId::StandAloneSig,
                TableId::ModuleRef,
                TableId::TypeSpec,
                TableId::Assembly,
                TableId::AssemblyRef,
                TableId::File,
                TableId::ExportedType,
                TableId::ManifestResource,
                TableId::GenericParam,
                TableId::GenericParamConstraint,
                TableId::MethodSpec,
            ],
            CodedIndexType::HasFieldMarshal => &[TableId::Field, TableId::Param],
            CodedIndexType::HasDeclSecurity => {
                &[TableId::TypeDef, TableId::MethodDef, TableId::Assembly]
            }
            CodedIndexType::MemberRefParent => &[
                TableId::TypeDef,
                TableId::TypeRef,
                TableId::ModuleRef,
                TableId::MethodDef,
                TableId::TypeSpec,
            ],
            CodedIndexType::HasSemantics => &[TableId::Event, TableId::Property],
            CodedIndexType::MethodDefOrRef => &[TableId::MethodDef, TableId::MemberRef],
            CodedIndexType::MemberForwarded => &[TableId::Field, TableId::MethodDef],
            CodedIndexType::Implementation => {
                &[TableId::File, TableId::AssemblyRef, TableId::ExportedType]
            }
            CodedIndexType::CustomAttributeType => &[TableId::MethodDef, TableId::MemberRef],
            CodedIndexType::ResolutionScope => &[
                TableId::Module,
                TableId::ModuleRef,
                TableId::AssemblyRef,
                TableId::TypeRef,
            ],
            CodedIndexType::TypeOrMethodDef => &[TableId::TypeDef, TableId::MethodDef],
            CodedIndexType::HasCustomDebugInformation => &[
                TableId::MethodDef,
                TableId::Field,
                TableId::TypeRef,
                TableId::TypeDef,
                TableId::Param,
                TableId::InterfaceImpl,
                TableId::MemberRef,
                TableId::Module,
                TableId::DeclSecurity,
                TableId::Property,
                TableId::Event,
                TableId::StandAloneSig,
                TableId::ModuleRef,
                TableId::TypeSpec,
                TableId::Assembly,
                TableId::AssemblyRef,
                TableId::File,
                TableId::ExportedType,
                TableId::ManifestResource,
                TableId::GenericParam,
                TableId::GenericParamConstraint,
                TableId::MethodSpec,
                TableId::Document,
                TableId::LocalScope,
                TableId::LocalVariable,
                TableId::LocalConstant,
                TableId::ImportScope,
            ],
        }
    }

    /// Number of low bits holding the tag.
    #[must_use]
    pub fn tag_bits(&self) -> u32 {
        if *self == CodedIndexType::CustomAttributeType {
            return 3;
        }

        let tables = self.tables().len() as u32;
        u32::BITS - (tables - 1).leading_zeros()
    }

    /// Returns `true` if the coded index takes 4 bytes, given the row count of the largest
    /// table of the family.
    #[must_use]
    pub fn is_large(&self, max_row_count: u32) -> bool {
        max_row_count >= 1 << (16 - self.tag_bits())
    }

    /// The table a tag selects, or `None` for out-of-range and unused tags.
    #[must_use]
    pub fn table_for_tag(&self, tag: u32) -> Option<TableId> {
        if *self == CodedIndexType::CustomAttributeType {
            return match tag {
                2 => Some(TableId::MethodDef),
                3 => Some(TableId::MemberRef),
                _ => None,
            };
        }

        self.tables().get(tag as usize).copied()
    }

    /// The tag that selects `table`, or `None` if the table is not part of this family.
    #[must_use]
    pub fn tag_for_table(&self, table: TableId) -> Option<u32> {
        if *self == CodedIndexType::CustomAttributeType {
            return match table {
                TableId::MethodDef => Some(2),
                TableId::MemberRef => Some(3),
                _ => None,
            };
        }

        self.tables()
            .iter()
            .position(|candidate| *candidate == table)
            .map(|position| position as u32)
    }

    fn split(&self, value: u32) -> Result<(TableId, u32)> {
        let bits = self.tag_bits();
        let tag = value & ((1 << bits) - 1);
        let row = value >> bits;

        match self.table_for_tag(tag) {
            Some(table) if is_valid_row_id(row) => Ok((table, row)),
            _ => {
                tracing::debug!(ci_type = ?self, value, tag, "invalid coded index");
                Err(Error::InvalidCodedIndex {
                    ci_type: *self,
                    value,
                })
            }
        }
    }

    /// Decodes a raw coded index of this family.
    ///
    /// A row of `0` yields the nil handle of the selected table.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidCodedIndex`] if the tag selects no table of the family,
    /// or if the row does not fit into 24 bits.
    pub fn decode(&self, value: u32) -> Result<EntityHandle> {
        let (table, row) = self.split(value)?;
        Ok(EntityHandle::new(table.token(row).value()))
    }

    /// Encodes `handle` as a coded index of this family.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidCodedIndex`] for virtual handles and for handles of a
    /// table outside the family.
    pub fn encode(&self, handle: EntityHandle) -> Result<u32> {
        let tag = handle
            .kind()
            .and_then(|kind| kind.table())
            .filter(|_| !handle.is_virtual())
            .and_then(|table| self.tag_for_table(table));

        match tag {
            Some(tag) => Ok(handle.row_id() << self.tag_bits() | tag),
            None => {
                tracing::debug!(ci_type = ?self, ?handle, "handle cannot be coded");
                Err(Error::InvalidCodedIndex {
                    ci_type: *self,
                    value: u32::from(handle.small_vtype()) << 24 | handle.row_id(),
                })
            }
        }
    }
}

/// A decoded coded index, as stored in table rows.
#[derive(Clone, Debug, PartialEq)]
pub struct CodedIndex {
    /// The table being referenced
    pub tag: TableId,
    /// The 1-based row, `0` for a nil reference
    pub row: u32,
    /// The metadata token of the referenced row
    pub token: Token,
}

impl CodedIndex {
    /// Reads a 2- or 4-byte coded index of family `ci_type` from `data`.
    ///
    /// ## Arguments
    /// * `data`     - The buffer holding the table row
    /// * `offset`   - Read position, advanced past the index
    /// * `is_large` - Whether the index takes 4 bytes, see [`CodedIndexType::is_large`]
    /// * `ci_type`  - The family of the column
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if `data` is too short, and
    /// [`crate::Error::InvalidCodedIndex`] if the value does not decode.
    pub fn read(
        data: &[u8],
        offset: &mut usize,
        is_large: bool,
        ci_type: CodedIndexType,
    ) -> Result<Self> {
        let coded_index = read_le_at_dyn(data, offset, is_large)?;
        let (tag, row) = ci_type.split(coded_index)?;
        Ok(CodedIndex::new(tag, row))
    }

    /// Creates a coded index for `row` of table `tag`
    #[must_use]
    pub fn new(tag: TableId, row: u32) -> CodedIndex {
        CodedIndex {
            tag,
            row,
            token: tag.token(row),
        }
    }

    /// The referenced row as an entity handle.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidToken`] if the table has no handle kind (e.g. `FieldPtr`).
    pub fn entity_handle(&self) -> Result<EntityHandle> {
        crate::metadata::tokens::entity_handle(self.token.value())
    }
}

impl TryFrom<Token> for CodedIndex {
    type Error = Error;

    fn try_from(token: Token) -> Result<Self> {
        if token.is_null() {
            return Err(malformed_error!("Cannot convert null token to CodedIndex"));
        }

        match token.table_id() {
            Some(table) => Ok(CodedIndex::new(table, token.row())),
            None => Err(malformed_error!(
                "Token 0x{:08x} does not reference a metadata table",
                token.value()
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::handles::{
        CustomAttributeHandle, MemberReferenceHandle, MethodDefinitionHandle, TypeDefinitionHandle,
        TypeReferenceHandle,
    };
    use strum::IntoEnumIterator;

    #[test]
    fn tag_bits() {
        assert_eq!(CodedIndexType::TypeDefOrRef.tag_bits(), 2);
        assert_eq!(CodedIndexType::HasConstant.tag_bits(), 2);
        assert_eq!(CodedIndexType::HasCustomAttribute.tag_bits(), 5);
        assert_eq!(CodedIndexType::HasFieldMarshal.tag_bits(), 1);
        assert_eq!(CodedIndexType::HasDeclSecurity.tag_bits(), 2);
        assert_eq!(CodedIndexType::MemberRefParent.tag_bits(), 3);
        assert_eq!(CodedIndexType::HasSemantics.tag_bits(), 1);
        assert_eq!(CodedIndexType::MethodDefOrRef.tag_bits(), 1);
        assert_eq!(CodedIndexType::MemberForwarded.tag_bits(), 1);
        assert_eq!(CodedIndexType::Implementation.tag_bits(), 2);
        assert_eq!(CodedIndexType::CustomAttributeType.tag_bits(), 3);
        assert_eq!(CodedIndexType::ResolutionScope.tag_bits(), 2);
        assert_eq!(CodedIndexType::TypeOrMethodDef.tag_bits(), 1);
        assert_eq!(CodedIndexType::HasCustomDebugInformation.tag_bits(), 5);
    }

    #[test]
    fn is_large() {
        assert!(!CodedIndexType::TypeDefOrRef.is_large(0x3FFF));
        assert!(CodedIndexType::TypeDefOrRef.is_large(0x4000));
        assert!(!CodedIndexType::HasCustomAttribute.is_large(0x07FF));
        assert!(CodedIndexType::HasCustomAttribute.is_large(0x0800));
    }

    #[test]
    fn decode() {
        // TypeRef row 5
        let handle = CodedIndexType::TypeDefOrRef.decode(5 << 2 | 1).unwrap();
        assert_eq!(handle.try_as::<TypeReferenceHandle>().unwrap(), TypeReferenceHandle::from_row_id(5));

        let handle = CodedIndexType::CustomAttributeType.decode(7 << 3 | 3).unwrap();
        assert_eq!(handle.try_as::<MemberReferenceHandle>().unwrap().row_id(), 7);

        let nil = CodedIndexType::TypeDefOrRef.decode(0).unwrap();
        assert!(nil.is_nil());
        assert!(nil.try_as::<TypeDefinitionHandle>().is_ok());
    }

    #[test]
    fn decode_rejects_unused_tags() {
        for tag in [0, 1, 4, 5, 7] {
            assert!(matches!(
                CodedIndexType::CustomAttributeType.decode(1 << 3 | tag),
                Err(Error::InvalidCodedIndex {
                    ci_type: CodedIndexType::CustomAttributeType,
                    ..
                })
            ));
        }

        // TypeDefOrRef has no tag 3
        assert!(CodedIndexType::TypeDefOrRef.decode(1 << 2 | 3).is_err());
        // HasCustomAttribute has 22 tables, tags 22..31 are unused
        assert!(CodedIndexType::HasCustomAttribute.decode(1 << 5 | 22).is_err());
    }

    #[test]
    fn decode_rejects_oversized_rows() {
        assert!(CodedIndexType::HasFieldMarshal.decode(0x0100_0000 << 1).is_err());
        assert!(CodedIndexType::HasFieldMarshal.decode(0x00FF_FFFF << 1).is_ok());
    }

    #[test]
    fn encode_inverts_decode() {
        for ci_type in CodedIndexType::iter() {
            for &table in ci_type.tables() {
                let tag = ci_type.tag_for_table(table).unwrap();
                let value = 0x1234 << ci_type.tag_bits() | tag;
                let handle = ci_type.decode(value).unwrap();
                assert_eq!(ci_type.encode(handle).unwrap(), value, "{ci_type:?} {table:?}");
            }
        }
    }

    #[test]
    fn encode_rejects_foreign_tables() {
        let handle: EntityHandle = CustomAttributeHandle::from_row_id(1).into();
        assert!(CodedIndexType::HasConstant.encode(handle).is_err());

        let method: EntityHandle = MethodDefinitionHandle::from_row_id(3).into();
        assert_eq!(CodedIndexType::CustomAttributeType.encode(method).unwrap(), 3 << 3 | 2);
        assert!(CodedIndexType::TypeDefOrRef.encode(method).is_err());
    }

    #[test]
    fn encode_rejects_virtual() {
        let handle = EntityHandle::new(0xA300_0001);
        assert!(CodedIndexType::Implementation.encode(handle).is_err());
    }

    #[test]
    fn read() {
        let data = [0x0D, 0x00, 0x1A, 0x00, 0x01, 0x00];
        let mut offset = 0;

        // TypeRef row 3
        let index =
            CodedIndex::read(&data, &mut offset, false, CodedIndexType::TypeDefOrRef).unwrap();
        assert_eq!(index, CodedIndex::new(TableId::TypeRef, 3));
        assert_eq!(index.token, Token::new(0x0100_0003));
        assert_eq!(offset, 2);

        // ResolutionScope 0x0001001A: AssemblyRef row 0x4006
        let index =
            CodedIndex::read(&data, &mut offset, true, CodedIndexType::ResolutionScope).unwrap();
        assert_eq!(index.tag, TableId::AssemblyRef);
        assert_eq!(index.row, 0x0001_001A >> 2);
        assert_eq!(offset, 6);

        assert!(matches!(
            CodedIndex::read(&data, &mut offset, false, CodedIndexType::TypeDefOrRef),
            Err(Error::OutOfBounds)
        ));
    }

    #[test]
    fn entity_handle() {
        let index = CodedIndex::new(TableId::MethodDef, 9);
        let handle = index.entity_handle().unwrap();
        assert_eq!(handle.token(), Token::new(0x0600_0009));

        let pointer = CodedIndex::new(TableId::FieldPtr, 1);
        assert!(pointer.entity_handle().is_err());
    }

    #[test]
    fn from_token() {
        let index = CodedIndex::try_from(Token::new(0x0200_0004)).unwrap();
        assert_eq!(index.tag, TableId::TypeDef);
        assert_eq!(index.row, 4);

        assert!(CodedIndex::try_from(Token::new(0)).is_err());
        assert!(CodedIndex::try_from(Token::new(0x7000_0001)).is_err());
    }
}
