//! Handles into the `#US` heap, the string literals referenced by `ldstr`.

use std::fmt;

use crate::{
    metadata::{
        handles::{
            handletype::{is_valid_row_id, HandleType, TokenType},
            Handle, HandleKind, SpecificHandle,
        },
        token::Token,
    },
    Error, Result,
};

/// A reference to a string literal on the `#US` heap, as loaded by `ldstr`.
///
/// User strings are the only heap values with a metadata token (`0x70` high byte), so the
/// offset is limited to the 24 bits a token can carry.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub struct UserStringHandle {
    offset: u32,
}

impl UserStringHandle {
    /// Creates a handle for the string at `offset` of the `#US` heap
    #[must_use]
    pub const fn from_offset(offset: u32) -> Self {
        debug_assert!(is_valid_row_id(offset));
        UserStringHandle { offset }
    }

    /// The offset into the `#US` heap
    #[must_use]
    pub const fn heap_offset(&self) -> u32 {
        self.offset
    }

    /// Returns `true` for offset `0`
    #[must_use]
    pub const fn is_nil(&self) -> bool {
        self.offset == 0
    }

    /// The `ldstr` token of this string
    #[must_use]
    pub const fn token(&self) -> Token {
        Token::new(TokenType::USER_STRING | self.offset)
    }
}

impl From<UserStringHandle> for Handle {
    fn from(handle: UserStringHandle) -> Self {
        Handle::new(HandleType::USER_STRING, handle.offset)
    }
}

impl TryFrom<Handle> for UserStringHandle {
    type Error = Error;

    fn try_from(handle: Handle) -> Result<Self> {
        if handle.vtype() != HandleType::USER_STRING {
            return Err(invalid_cast!("UserStringHandle", handle.vtype()));
        }

        Ok(UserStringHandle::from_offset(handle.offset()))
    }
}

impl SpecificHandle for UserStringHandle {
    const KIND: HandleKind = HandleKind::UserString;

    fn is_nil(&self) -> bool {
        UserStringHandle::is_nil(self)
    }
}

impl fmt::Display for UserStringHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token() {
        let us = UserStringHandle::from_offset(0x2A);
        assert_eq!(us.token(), Token(0x7000_002A));
        assert_eq!(Handle::from(us).token(), us.token());
        assert_eq!(us.to_string(), "0x7000002a");
    }

    #[test]
    fn conversions() {
        let us = UserStringHandle::from_offset(1);
        let handle: Handle = us.into();
        assert_eq!(UserStringHandle::try_from(handle).unwrap(), us);
        assert!(UserStringHandle::try_from(Handle::MODULE_DEFINITION).is_err());
        assert!(UserStringHandle::default().is_nil());
    }
}
