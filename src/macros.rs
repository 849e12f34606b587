#![allow(unused_macros)]

/// Defines a specific handle for a table whose rows are only ever physical.
///
/// The generated type wraps a 24-bit row id and carries the small type of `HandleKind::$kind`.
/// It widens into `Handle` and `EntityHandle`, narrows back out of both with a tag check, and
/// implements `SpecificHandle` / `SpecificEntityHandle`.
///
/// ```rust, ignore
/// entity_handle! {
///     /// A reference to a row of the `TypeDef` table
///     TypeDefinitionHandle => TypeDefinition
/// }
/// ```
macro_rules! entity_handle {
    ($(#[$meta:meta])* $name:ident => $kind:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
        pub struct $name {
            row_id: u32,
        }

        impl $name {
            const HANDLE_TYPE: u8 = $crate::metadata::handles::HandleKind::$kind.handle_type();
            const TOKEN_TYPE: u32 = (Self::HANDLE_TYPE as u32)
                << $crate::metadata::handles::handletype::ROW_ID_BIT_COUNT;

            /// Creates a handle for the 1-based `row_id`; row id `0` is the nil handle.
            ///
            /// `row_id` must fit into 24 bits, the reader minting handles is expected to have
            /// rejected larger tables.
            #[must_use]
            pub const fn from_row_id(row_id: u32) -> Self {
                debug_assert!($crate::metadata::handles::handletype::is_valid_row_id(row_id));
                $name { row_id }
            }

            /// The 1-based row id
            #[must_use]
            pub const fn row_id(&self) -> u32 {
                self.row_id
            }

            /// Returns `true` for the nil handle (row id `0`)
            #[must_use]
            pub const fn is_nil(&self) -> bool {
                self.row_id == 0
            }

            /// The metadata token of this handle
            #[must_use]
            pub const fn token(&self) -> $crate::metadata::token::Token {
                $crate::metadata::token::Token::new(Self::TOKEN_TYPE | self.row_id)
            }
        }

        impl From<$name> for $crate::metadata::handles::Handle {
            fn from(handle: $name) -> Self {
                $crate::metadata::handles::Handle::new($name::HANDLE_TYPE, handle.row_id)
            }
        }

        impl From<$name> for $crate::metadata::handles::EntityHandle {
            fn from(handle: $name) -> Self {
                $crate::metadata::handles::EntityHandle::new($name::TOKEN_TYPE | handle.row_id)
            }
        }

        impl TryFrom<$crate::metadata::handles::Handle> for $name {
            type Error = $crate::Error;

            fn try_from(handle: $crate::metadata::handles::Handle) -> $crate::Result<Self> {
                if handle.vtype() != $name::HANDLE_TYPE {
                    return Err(invalid_cast!(stringify!($name), handle.vtype()));
                }

                Ok($name::from_row_id(handle.row_id()))
            }
        }

        impl TryFrom<$crate::metadata::handles::EntityHandle> for $name {
            type Error = $crate::Error;

            fn try_from(handle: $crate::metadata::handles::EntityHandle) -> $crate::Result<Self> {
                if handle.vtype() != $name::TOKEN_TYPE {
                    return Err(invalid_cast!(stringify!($name), handle.small_vtype()));
                }

                Ok($name::from_row_id(handle.row_id()))
            }
        }

        impl $crate::metadata::handles::SpecificHandle for $name {
            const KIND: $crate::metadata::handles::HandleKind =
                $crate::metadata::handles::HandleKind::$kind;

            fn is_nil(&self) -> bool {
                $name::is_nil(self)
            }
        }

        impl $crate::metadata::handles::SpecificEntityHandle for $name {
            fn row_id(&self) -> u32 {
                $name::row_id(self)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.token())
            }
        }
    };
}
