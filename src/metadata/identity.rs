//! Public keys and public key tokens of strong-named assemblies.
//!
//! `AssemblyRef` rows name their target either by its full public key or by the 8-byte token
//! derived from it. This module provides the [`Identity`] enum for both forms and computes the
//! token of a key with MD5 or SHA1, as specified by ECMA-335.
//!
//! The projected contract assemblies referenced by virtual
//! [`crate::metadata::handles::AssemblyReferenceHandle`]s carry the virtual
//! [`crate::metadata::handles::BlobVirtualIndex::ContractPublicKey`] blob; its token is the
//! [`crate::metadata::handles::BlobVirtualIndex::ContractPublicKeyToken`] blob.
//!
//! # Example
//! ```rust
//! use cilhandles::metadata::identity::{AssemblyHashAlgorithm, Identity};
//! use cilhandles::metadata::handles::BlobVirtualIndex;
//!
//! let key = BlobVirtualIndex::ContractPublicKey.template();
//! let token = Identity::from(key, true)?.to_token(AssemblyHashAlgorithm::SHA1)?;
//! assert_eq!(token, 0xB03F_5F7F_11D5_0A3A);
//! # Ok::<(), cilhandles::Error>(())
//! ```

use md5::{Digest, Md5};
use sha1::Sha1;

use crate::{file::io::read_le, Error, Result};

/// Hash algorithm ids as stored in the `Assembly` table
#[allow(non_snake_case)]
pub mod AssemblyHashAlgorithm {
    /// No hashing
    pub const NONE: u32 = 0x0000;
    /// MD5
    pub const MD5: u32 = 0x8003;
    /// SHA1, the default
    pub const SHA1: u32 = 0x8004;
}

/// An identifier for an `Assembly`.
/// Can be either a public-key or a hashed Token, as indicated by the `PublicKey` flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    /// The full RSA public-key
    PubKey(Vec<u8>),
    /// Last 8 bytes of the hash of the public-key, read as little-endian
    Token(u64),
}

impl Identity {
    /// Create an `Identity` from the `PublicKeyOrToken` blob of an `Assembly`/`AssemblyRef` row.
    ///
    /// # Arguments
    /// * `data`    - The blob bytes
    /// * `is_pub`  - Whether the row's `PublicKey` flag is set
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if a token is shorter than 8 bytes.
    pub fn from(data: &[u8], is_pub: bool) -> Result<Self> {
        if is_pub {
            return Ok(Identity::PubKey(data.to_vec()));
        }

        read_le::<u64>(data).map(Identity::Token)
    }

    /// The public key token, hashing the key with `algo` if necessary.
    ///
    /// # Arguments
    /// * `algo` - The [`AssemblyHashAlgorithm`] that the target `Assembly` uses
    ///
    /// # Errors
    /// Returns [`crate::Error::NotSupported`] for algorithms other than MD5 and SHA1.
    pub fn to_token(&self, algo: u32) -> Result<u64> {
        let key = match self {
            Identity::Token(token) => return Ok(*token),
            Identity::PubKey(key) => key,
        };

        match algo {
            AssemblyHashAlgorithm::MD5 => digest_token::<Md5>(key),
            AssemblyHashAlgorithm::SHA1 => digest_token::<Sha1>(key),
            _ => {
                tracing::debug!(algo, "unsupported assembly hash algorithm");
                Err(Error::NotSupported)
            }
        }
    }
}

/// The last 8 bytes of the digest of `key`, read little-endian.
fn digest_token<D: Digest>(key: &[u8]) -> Result<u64> {
    let digest = D::digest(key);
    let tail = digest.len().checked_sub(8).ok_or(Error::OutOfBounds)?;

    read_le::<u64>(&digest[tail..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::handles::{BlobHandle, BlobVirtualIndex};

    #[test]
    fn test_identity_from_pubkey() {
        let data = vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16];
        let identity = Identity::from(&data, true).unwrap();
        assert_eq!(identity, Identity::PubKey(data));
    }

    #[test]
    fn test_identity_from_token() {
        let data = [0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC, 0xDE, 0xF0, 0x99];
        let identity = Identity::from(&data, false).unwrap();

        // Only the first 8 bytes, little-endian
        assert_eq!(identity, Identity::Token(0xF0DE_BC9A_7856_3412));
    }

    #[test]
    fn test_identity_from_token_insufficient_data() {
        assert!(matches!(
            Identity::from(&[1, 2, 3], false),
            Err(Error::OutOfBounds)
        ));
    }

    #[test]
    fn test_to_token_from_pubkey_md5() {
        let pubkey_data = vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16];
        let identity = Identity::PubKey(pubkey_data.clone());

        let token = identity.to_token(AssemblyHashAlgorithm::MD5).unwrap();

        let mut hasher = Md5::new();
        hasher.update(&pubkey_data);
        let result = hasher.finalize();
        let expected_token = read_le::<u64>(&result[result.len() - 8..]).unwrap();

        assert_eq!(token, expected_token);
    }

    #[test]
    fn test_to_token_from_token_identity() {
        let identity = Identity::Token(0x1234_5678_9ABC_DEF0);

        for algo in [
            AssemblyHashAlgorithm::MD5,
            AssemblyHashAlgorithm::SHA1,
            AssemblyHashAlgorithm::NONE,
        ] {
            assert_eq!(identity.to_token(algo).unwrap(), 0x1234_5678_9ABC_DEF0);
        }
    }

    #[test]
    fn test_to_token_unsupported_algorithm() {
        let identity = Identity::PubKey(vec![1, 2, 3, 4, 5, 6, 7, 8]);
        assert!(matches!(identity.to_token(0x9999), Err(Error::NotSupported)));
        assert!(matches!(
            identity.to_token(AssemblyHashAlgorithm::NONE),
            Err(Error::NotSupported)
        ));
    }

    #[test]
    fn test_contract_key_matches_contract_token() {
        let key = BlobHandle::from_virtual_index(BlobVirtualIndex::ContractPublicKey, 0)
            .virtual_blob_value()
            .unwrap();
        let token = BlobHandle::from_virtual_index(BlobVirtualIndex::ContractPublicKeyToken, 0)
            .virtual_blob_value()
            .unwrap();

        let computed = Identity::from(&key, true)
            .unwrap()
            .to_token(AssemblyHashAlgorithm::SHA1)
            .unwrap();

        // Token blobs list the reversed hash tail
        let stored: [u8; 8] = token.as_slice().try_into().unwrap();
        assert_eq!(computed, u64::from_be_bytes(stored));
    }

    #[test]
    fn test_digest_token_takes_tail() {
        // SHA1("abc") = a9993e36 4706816a ba3e2571 7850c26c 9cd0d89d
        assert_eq!(digest_token::<Sha1>(b"abc").unwrap(), 0x9DD8_D09C_6CC2_5078);
    }

    #[test]
    fn test_md5_and_sha1_differ() {
        let large_pubkey: Vec<u8> = (0..=255).collect();
        let identity = Identity::PubKey(large_pubkey);

        let token_md5 = identity.to_token(AssemblyHashAlgorithm::MD5).unwrap();
        let token_sha1 = identity.to_token(AssemblyHashAlgorithm::SHA1).unwrap();

        assert_ne!(token_md5, token_sha1);
    }
}
