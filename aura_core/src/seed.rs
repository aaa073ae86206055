//! Deterministic seed derivation from dream text.

use sha2::{Digest, Sha256};

/// Offset added to the primary seed for the second poster variation.
pub const VARIATION_OFFSET: u64 = 37;

/// Number of leading hex digits of the digest used as the seed.
const SEED_HEX_DIGITS: usize = 8;

/// Full SHA-256 hex digest of the UTF-8 text.
pub fn digest_hex(text: &str) -> String {
    hex::encode(Sha256::digest(text.as_bytes()))
}

/// Derives a 32-bit seed from the first eight hex digits of the SHA-256
/// digest of `text`.
///
/// # Examples
///
/// ```
/// use aura_core::derive_seed;
///
/// assert_eq!(derive_seed("ocean"), derive_seed("ocean"));
/// assert!(derive_seed("ocean") <= u32::MAX as u64);
/// ```
pub fn derive_seed(text: &str) -> u64 {
    let digest = Sha256::digest(text.as_bytes());
    // The first four bytes are exactly the first eight hex digits.
    let mut prefix = [0u8; SEED_HEX_DIGITS / 2];
    prefix.copy_from_slice(&digest[..SEED_HEX_DIGITS / 2]);
    u64::from(u32::from_be_bytes(prefix))
}

/// Seeds for the two poster variations: `seed` and `seed + offset`.
pub fn variation_seeds(seed: u64, offset: u64) -> [u64; 2] {
    [seed, seed.wrapping_add(offset)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_is_deterministic() {
        let text = "I was on a crowded train above the ocean.";
        assert_eq!(derive_seed(text), derive_seed(text));
    }

    #[test]
    fn different_texts_give_different_seeds() {
        assert_ne!(derive_seed("a door of light"), derive_seed("a door of light."));
        assert_ne!(derive_seed(""), derive_seed(" "));
    }

    #[test]
    fn seed_matches_parsed_hex_prefix() {
        for text in ["", "ocean", "I was afraid of falling into the dark ocean"] {
            let hex = digest_hex(text);
            let expected = u64::from_str_radix(&hex[..SEED_HEX_DIGITS], 16).unwrap();
            assert_eq!(derive_seed(text), expected);
        }
    }

    #[test]
    fn known_digest_of_empty_string() {
        assert_eq!(
            digest_hex(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(derive_seed(""), 0xe3b0c442);
    }

    #[test]
    fn variation_seeds_differ_by_offset() {
        let seed = derive_seed("a bridge in the fog");
        let [first, second] = variation_seeds(seed, VARIATION_OFFSET);
        assert_eq!(first, seed);
        assert_eq!(second - first, VARIATION_OFFSET);
    }
}
