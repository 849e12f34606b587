//! # cilhandles Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! from the cilhandles library. Import this module to get quick access to every handle type,
//! the conversion traits and the error type.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all cilhandles operations
pub use crate::Error;

/// The result type used throughout cilhandles
pub use crate::Result;

/// Metadata token type for referencing table entries
pub use crate::metadata::token::Token;

// ================================================================================================
// Generic Handles
// ================================================================================================

/// Handles that can hold any (entity) kind, and their discriminant
pub use crate::metadata::handles::{EntityHandle, Handle, HandleKind};

/// Traits for generic narrowing with `try_as`
pub use crate::metadata::handles::{SpecificEntityHandle, SpecificHandle};

// ================================================================================================
// Entity Handles
// ================================================================================================

/// Handles for the ECMA-335 tables
pub use crate::metadata::handles::{
    AssemblyDefinitionHandle, AssemblyFileHandle, AssemblyReferenceHandle, ConstantHandle,
    CustomAttributeHandle, DeclarativeSecurityAttributeHandle, EventDefinitionHandle,
    ExportedTypeHandle, FieldDefinitionHandle, GenericParameterConstraintHandle,
    GenericParameterHandle, InterfaceImplementationHandle, ManifestResourceHandle,
    MemberReferenceHandle, MethodDefinitionHandle, MethodImplementationHandle,
    MethodSpecificationHandle, ModuleDefinitionHandle, ModuleReferenceHandle, ParameterHandle,
    PropertyDefinitionHandle, StandaloneSignatureHandle, TypeDefinitionHandle,
    TypeReferenceHandle, TypeSpecificationHandle,
};

/// Handles for the Portable PDB tables
pub use crate::metadata::handles::{
    CustomDebugInformationHandle, DocumentHandle, ImportScopeHandle, LocalConstantHandle,
    LocalScopeHandle, LocalVariableHandle, MethodDebugInformationHandle,
};

// ================================================================================================
// Heap Handles and Virtual References
// ================================================================================================

/// Handles for heap values
pub use crate::metadata::handles::{
    BlobHandle, GuidHandle, NamespaceDefinitionHandle, StringHandle, StringKind,
    UserStringHandle,
};

/// Indices of projected (virtual) values
pub use crate::metadata::handles::{AssemblyRefVirtualIndex, BlobVirtualIndex, StringVirtualIndex};

// ================================================================================================
// Tables
// ================================================================================================

/// Table and heap identifiers, coded indices
pub use crate::metadata::tables::{CodedIndex, CodedIndexType, HeapId, TableId};
