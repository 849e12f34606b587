//! The raw 32-bit metadata token: table number in the high byte, row in the low 24 bits.

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::metadata::{
    handles::{
        handletype::{ROW_ID_BIT_COUNT, ROW_ID_MASK},
        HandleKind,
    },
    tables::TableId,
};

/// A metadata token as stored in IL and metadata tables.
///
/// Tokens in .NET metadata consist of a 32-bit value where:
/// - The high byte (bits 24-31) indicates the table type (or `0x70` for user strings)
/// - The low 24 bits (bits 0-23) indicate the row index or user string heap offset
///
/// A token is the on-disk form of an entity reference. Within this crate, references are
/// modelled as [`crate::metadata::handles::Handle`] and friends, which convert to a `Token`
/// when they are not virtual.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Token(pub u32);

impl Token {
    /// Creates a new token from a raw 32-bit value
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Token(value)
    }

    /// Returns the raw token value
    #[must_use]
    pub const fn value(&self) -> u32 {
        self.0
    }

    /// Extracts the table type from the token (high byte)
    #[must_use]
    pub const fn table(&self) -> u8 {
        (self.0 >> ROW_ID_BIT_COUNT) as u8
    }

    /// Extracts the row index from the token (low 24 bits)
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.0 & ROW_ID_MASK
    }

    /// Returns true if this is a null token (value 0)
    #[must_use]
    pub const fn is_null(&self) -> bool {
        self.0 == 0
    }

    /// The metadata table this token references, if its high byte names one
    #[must_use]
    pub fn table_id(&self) -> Option<TableId> {
        TableId::from_repr(self.table())
    }

    /// The handle kind this token converts to, if any
    #[must_use]
    pub fn kind(&self) -> Option<HandleKind> {
        HandleKind::from_type(self.table())
    }
}

impl From<u32> for Token {
    fn from(value: u32) -> Self {
        Token(value)
    }
}

impl From<Token> for u32 {
    fn from(token: Token) -> Self {
        token.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Token(0x{:08x}, table: 0x{:02x}, row: {})",
            self.0,
            self.table(),
            self.row()
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_token_parts() {
        let token = Token::new(0x0600_0001);
        assert_eq!(token.value(), 0x0600_0001);
        assert_eq!(token.table(), 0x06);
        assert_eq!(token.row(), 1);

        let token = Token(0x06FF_FFFF);
        assert_eq!(token.row(), 0x00FF_FFFF);
    }

    #[test]
    fn test_token_is_null() {
        assert!(Token(0).is_null());
        assert!(Token::default().is_null());
        assert!(!Token(0x0600_0001).is_null());
        // Row 0 of a non-module table is a nil reference, not a null token
        assert!(!Token(0x0200_0000).is_null());
    }

    #[test]
    fn test_token_table_id() {
        assert_eq!(Token(0x0200_0005).table_id(), Some(TableId::TypeDef));
        assert_eq!(Token(0x0300_0005).table_id(), Some(TableId::FieldPtr));
        assert_eq!(Token(0x7000_0005).table_id(), None);
    }

    #[test]
    fn test_token_kind() {
        assert_eq!(Token(0x0A00_0001).kind(), Some(HandleKind::MemberReference));
        assert_eq!(Token(0x7000_0010).kind(), Some(HandleKind::UserString));
        assert_eq!(Token(0x0300_0001).kind(), None);
    }

    #[test]
    fn test_token_from_conversion() {
        let token: Token = 0x0600_0001u32.into();
        let back: u32 = token.into();
        assert_eq!(back, 0x0600_0001);
    }

    #[test]
    fn test_token_display_debug() {
        assert_eq!(format!("{}", Token(0x0600_0001)), "0x06000001");
        assert_eq!(format!("{}", Token(0)), "0x00000000");

        let debug_str = format!("{:?}", Token(0x0600_0001));
        assert!(debug_str.contains("Token(0x06000001"));
        assert!(debug_str.contains("table: 0x06"));
        assert!(debug_str.contains("row: 1"));
    }

    #[test]
    fn test_token_ordering() {
        assert!(Token(0x0600_0001) < Token(0x0600_0002));
        assert!(Token(0x0600_0002) < Token(0x0700_0001));
    }

    #[test]
    fn test_token_hash() {
        let mut map = HashMap::new();
        map.insert(Token(0x0600_0001), "Method1");
        map.insert(Token(0x0600_0002), "Method2");

        assert_eq!(map.get(&Token(0x0600_0001)), Some(&"Method1"));
        assert_eq!(map.get(&Token(0x0600_0002)), Some(&"Method2"));
    }
}
