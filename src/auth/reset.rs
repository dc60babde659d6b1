use rand::RngCore;
use sha2::{Digest, Sha256};

/// Length of the raw reset token in bytes before hex encoding.
const RESET_TOKEN_BYTES: usize = 32;

/// One-hour validity window for reset tokens.
pub const RESET_TOKEN_TTL: time::Duration = time::Duration::hours(1);

/// Generate a high-entropy one-time reset token. The raw value goes into the
/// e-mail link; only its hash is stored.
pub fn generate_reset_token() -> String {
    let mut bytes = [0u8; RESET_TOKEN_BYTES];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// One-way hash of a raw reset token as stored in the credential store.
pub fn hash_reset_token(raw: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_hex_of_expected_length() {
        let token = generate_reset_token();
        assert_eq!(token.len(), RESET_TOKEN_BYTES * 2);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn tokens_do_not_repeat() {
        assert_ne!(generate_reset_token(), generate_reset_token());
    }

    #[test]
    fn hash_is_deterministic_and_differs_from_raw() {
        let raw = generate_reset_token();
        let hash = hash_reset_token(&raw);
        assert_ne!(hash, raw);
        assert_eq!(hash, hash_reset_token(&raw));
        assert_eq!(hash.len(), 64);
    }
}
