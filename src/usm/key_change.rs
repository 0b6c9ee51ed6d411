//! KeyChange textual convention (RFC 3414 Section 5).
//!
//! A manager never sends a key in the clear. It sends `random || delta`,
//! where `delta` is the new key XORed with a digest chain seeded by the old
//! key and `random`. The agent, knowing the old key, recovers the new one.

use std::fmt;

use digest::Digest;
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::AuthProtocol;

/// Localized authentication or privacy key.
///
/// Wiped from memory on drop. Equality is constant-time.
#[derive(Clone, Default, Zeroize, ZeroizeOnDrop)]
pub struct SecretKey(Vec<u8>);

impl SecretKey {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl PartialEq for SecretKey {
    fn eq(&self, other: &Self) -> bool {
        self.0.ct_eq(&other.0).into()
    }
}

impl Eq for SecretKey {}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretKey({} bytes)", self.0.len())
    }
}

/// Why a KeyChange value was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyChangeError {
    /// Value is not exactly twice the key length.
    WrongLength { expected: usize, actual: usize },
    /// The stored key does not have the protocol's key length.
    KeyLength { expected: usize, actual: usize },
}

fn chain_digest<D: Digest>(temp: &[u8], random: &[u8]) -> Vec<u8> {
    let mut hasher = D::new();
    hasher.update(temp);
    hasher.update(random);
    hasher.finalize().to_vec()
}

fn hash(protocol: AuthProtocol, temp: &[u8], random: &[u8]) -> Vec<u8> {
    match protocol {
        AuthProtocol::Md5 => chain_digest::<md5::Md5>(temp, random),
        AuthProtocol::Sha1 => chain_digest::<sha1::Sha1>(temp, random),
        AuthProtocol::Sha224 => chain_digest::<sha2::Sha224>(temp, random),
        AuthProtocol::Sha256 => chain_digest::<sha2::Sha256>(temp, random),
        AuthProtocol::Sha384 => chain_digest::<sha2::Sha384>(temp, random),
        AuthProtocol::Sha512 => chain_digest::<sha2::Sha512>(temp, random),
    }
}

/// XOR `input` with the digest chain of `old_key` and `random`.
///
/// Encoding and decoding are the same operation on the delta.
fn apply_chain(protocol: AuthProtocol, old_key: &[u8], random: &[u8], input: &[u8]) -> Vec<u8> {
    let mut temp = old_key.to_vec();
    let mut out = Vec::with_capacity(input.len());

    for block in input.chunks(protocol.digest_len()) {
        let next = hash(protocol, &temp, random);
        temp.zeroize();
        temp = next;
        out.extend(block.iter().zip(&temp).map(|(b, t)| b ^ t));
    }
    temp.zeroize();
    out
}

/// Recover the new key from a KeyChange value.
///
/// `protocol` is the user's authentication protocol; its hash drives the
/// chain for both the auth and the priv key. `key_len` is the length the
/// key has under its protocol.
pub fn decode_keychange(
    protocol: AuthProtocol,
    old_key: &SecretKey,
    key_len: usize,
    value: &[u8],
) -> Result<SecretKey, KeyChangeError> {
    if value.len() != 2 * key_len {
        return Err(KeyChangeError::WrongLength {
            expected: 2 * key_len,
            actual: value.len(),
        });
    }
    if old_key.len() != key_len {
        return Err(KeyChangeError::KeyLength {
            expected: key_len,
            actual: old_key.len(),
        });
    }

    let (random, delta) = value.split_at(key_len);
    Ok(SecretKey(apply_chain(protocol, old_key.as_bytes(), random, delta)))
}

/// Build the KeyChange value that moves `old_key` to `new_key`.
///
/// `random` must be as long as the keys.
pub fn encode_keychange(
    protocol: AuthProtocol,
    old_key: &SecretKey,
    new_key: &SecretKey,
    random: &[u8],
) -> Vec<u8> {
    let mut value = Vec::with_capacity(2 * new_key.len());
    value.extend_from_slice(random);
    value.extend(apply_chain(protocol, old_key.as_bytes(), random, new_key.as_bytes()));
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(len: usize, seed: u8) -> SecretKey {
        SecretKey::new((0..len).map(|i| seed.wrapping_add((i as u8).wrapping_mul(7))).collect::<Vec<_>>())
    }

    #[test]
    fn test_keychange_recovers_new_key() {
        for protocol in [
            AuthProtocol::Md5,
            AuthProtocol::Sha1,
            AuthProtocol::Sha224,
            AuthProtocol::Sha256,
            AuthProtocol::Sha384,
            AuthProtocol::Sha512,
        ] {
            let len = protocol.digest_len();
            let old = key(len, 1);
            let new = key(len, 99);
            let random = key(len, 42);

            let value = encode_keychange(protocol, &old, &new, random.as_bytes());
            assert_eq!(value.len(), 2 * len);
            assert_eq!(
                decode_keychange(protocol, &old, len, &value).unwrap(),
                new,
                "{protocol}"
            );
        }
    }

    #[test]
    fn test_keychange_key_longer_than_digest() {
        // 3DES key (32 bytes) changed with MD5 (16-byte digest)
        let old = key(32, 5);
        let new = key(32, 200);
        let random = key(32, 17);

        let value = encode_keychange(AuthProtocol::Md5, &old, &new, random.as_bytes());
        assert_eq!(
            decode_keychange(AuthProtocol::Md5, &old, 32, &value).unwrap(),
            new
        );
    }

    #[test]
    fn test_keychange_first_block_matches_manual_digest() {
        let old = key(16, 3);
        let random = [0x55u8; 16];
        let mut value = random.to_vec();
        value.extend([0u8; 16]);

        // With a zero delta the new key is the first chain digest
        let new = decode_keychange(AuthProtocol::Md5, &old, 16, &value).unwrap();
        let mut hasher = md5::Md5::new();
        hasher.update(old.as_bytes());
        hasher.update(random);
        assert_eq!(new.as_bytes(), hasher.finalize().as_slice());
    }

    #[test]
    fn test_keychange_wrong_length() {
        let old = key(20, 0);
        assert_eq!(
            decode_keychange(AuthProtocol::Sha1, &old, 20, &[0; 39]),
            Err(KeyChangeError::WrongLength {
                expected: 40,
                actual: 39
            })
        );
    }

    #[test]
    fn test_keychange_stale_key_length() {
        let old = key(16, 0);
        assert_eq!(
            decode_keychange(AuthProtocol::Sha1, &old, 20, &[0; 40]),
            Err(KeyChangeError::KeyLength {
                expected: 20,
                actual: 16
            })
        );
    }

    #[test]
    fn test_secret_key_debug_hides_bytes() {
        let k = SecretKey::new(vec![0xAB; 4]);
        assert_eq!(format!("{:?}", k), "SecretKey(4 bytes)");
        assert_ne!(k, SecretKey::new(vec![0xAB; 5]));
    }
}
