//! Salted SHA-256 credential hashes
//!
//! Stored form: `sha256$<salt hex>$<digest hex>` where the digest covers the
//! salt bytes followed by the password bytes.

use sha2::{Digest, Sha256};

const SCHEME: &str = "sha256";
const SALT_LEN: usize = 16;

/// Hash a password with a fresh random salt
pub fn hash_password(password: &str) -> String {
    let salt: [u8; SALT_LEN] = rand::random();
    format!("{}${}${}", SCHEME, hex::encode(salt), digest(&salt, password))
}

/// Check a password against a stored hash.
/// Returns `None` if the stored value is not a recognised hash.
pub fn verify_password(password: &str, stored: &str) -> Option<bool> {
    let mut parts = stored.trim().splitn(3, '$');
    let (scheme, salt_hex, expected) = (parts.next()?, parts.next()?, parts.next()?);
    if scheme != SCHEME {
        return None;
    }

    let salt = hex::decode(salt_hex).ok()?;
    let actual = digest(&salt, password);
    Some(constant_time_eq(actual.as_bytes(), expected.as_bytes()))
}

fn digest(salt: &[u8], password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
