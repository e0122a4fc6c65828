//! Salted password hashes for portal accounts.
//!
//! # Invariants
//! - Plain secrets are never stored or logged; only `PasswordHash` is persisted.
//! - Verification compares digests in constant time.
//! - Persisted form is `sha256$<rounds>$<salt hex>$<digest hex>`.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt::{Debug, Formatter};
use subtle::ConstantTimeEq;
use uuid::Uuid;

const SCHEME: &str = "sha256";
const DEFAULT_ROUNDS: u32 = 4096;
/// Upper bound accepted from a persisted hash; larger values are corrupt.
const MAX_ROUNDS: u32 = 1 << 20;
const SALT_LEN: usize = 16;
const DIGEST_LEN: usize = 32;

/// Salted, iterated SHA-256 digest of an account secret.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PasswordHash {
    rounds: u32,
    salt: [u8; SALT_LEN],
    digest: [u8; DIGEST_LEN],
}

impl PasswordHash {
    /// Hashes `secret` with a fresh random salt.
    pub fn new(secret: &str) -> Self {
        Self::with_salt(*Uuid::new_v4().as_bytes(), secret)
    }

    /// Hashes `secret` with a caller-provided salt.
    pub fn with_salt(salt: [u8; SALT_LEN], secret: &str) -> Self {
        Self {
            rounds: DEFAULT_ROUNDS,
            salt,
            digest: derive(&salt, DEFAULT_ROUNDS, secret),
        }
    }

    /// Returns whether `secret` matches this hash.
    pub fn verify(&self, secret: &str) -> bool {
        let candidate = derive(&self.salt, self.rounds, secret);
        bool::from(candidate[..].ct_eq(&self.digest[..]))
    }

    fn encode(&self) -> String {
        format!(
            "{SCHEME}${}${}${}",
            self.rounds,
            to_hex(&self.salt),
            to_hex(&self.digest)
        )
    }

    fn decode(value: &str) -> Result<Self, String> {
        let mut parts = value.split('$');
        let (Some(scheme), Some(rounds), Some(salt), Some(digest), None) = (
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
        ) else {
            return Err("malformed password hash".to_string());
        };
        if scheme != SCHEME {
            return Err(format!("unsupported password hash scheme `{scheme}`"));
        }
        let rounds = rounds
            .parse::<u32>()
            .ok()
            .filter(|rounds| (1..=MAX_ROUNDS).contains(rounds))
            .ok_or_else(|| "invalid password hash rounds".to_string())?;

        Ok(Self {
            rounds,
            salt: from_hex(salt)?,
            digest: from_hex(digest)?,
        })
    }
}

impl Debug for PasswordHash {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

impl TryFrom<String> for PasswordHash {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::decode(&value)
    }
}

impl From<PasswordHash> for String {
    fn from(value: PasswordHash) -> Self {
        value.encode()
    }
}

fn derive(salt: &[u8], rounds: u32, secret: &str) -> [u8; DIGEST_LEN] {
    let mut state = [0u8; DIGEST_LEN];
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(secret.as_bytes());
    state.copy_from_slice(&hasher.finalize());

    for _ in 1..rounds {
        let mut hasher = Sha256::new();
        hasher.update(salt);
        hasher.update(state);
        state.copy_from_slice(&hasher.finalize());
    }
    state
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|byte| format!("{byte:02x}")).collect()
}

fn from_hex<const N: usize>(value: &str) -> Result<[u8; N], String> {
    if value.len() != N * 2 || !value.is_ascii() {
        return Err(format!("expected {} hex characters", N * 2));
    }
    let mut out = [0u8; N];
    for (index, slot) in out.iter_mut().enumerate() {
        let pair = &value[index * 2..index * 2 + 2];
        *slot = u8::from_str_radix(pair, 16).map_err(|_| format!("invalid hex pair `{pair}`"))?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::PasswordHash;

    #[test]
    fn verify_accepts_only_the_hashed_secret() {
        let hash = PasswordHash::new("s3cret");
        assert!(hash.verify("s3cret"));
        assert!(!hash.verify("S3cret"));
        assert!(!hash.verify(""));
    }

    #[test]
    fn fresh_salts_produce_distinct_hashes() {
        let first = PasswordHash::new("123");
        let second = PasswordHash::new("123");
        assert_ne!(String::from(first), String::from(second));
    }

    #[test]
    fn persisted_form_parses_back() {
        let hash = PasswordHash::with_salt([7u8; 16], "123");
        let encoded = String::from(hash.clone());
        assert!(encoded.starts_with("sha256$4096$"));

        let decoded = PasswordHash::try_from(encoded).unwrap();
        assert_eq!(decoded, hash);
        assert!(decoded.verify("123"));
    }

    #[test]
    fn excessive_round_counts_are_rejected() {
        let salt = "0".repeat(32);
        let digest = "0".repeat(64);
        for rounds in [0, u32::MAX, super::MAX_ROUNDS + 1] {
            let encoded = format!("sha256${rounds}${salt}${digest}");
            assert!(PasswordHash::try_from(encoded).is_err(), "rounds {rounds}");
        }
        let at_cap = format!("sha256${}${salt}${digest}", super::MAX_ROUNDS);
        assert!(PasswordHash::try_from(at_cap).is_ok());
    }

    #[test]
    fn malformed_hash_is_rejected() {
        assert!(PasswordHash::try_from("123".to_string()).is_err());
        assert!(PasswordHash::try_from("md5$1$00$00".to_string()).is_err());
    }

    #[test]
    fn debug_output_is_redacted() {
        let hash = PasswordHash::new("123");
        assert_eq!(format!("{hash:?}"), "PasswordHash(<redacted>)");
    }
}
