//! Session join codes.

use crate::core::{GameError, GameRng, Result};

/// Characters a code is drawn from.
pub const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Attempts before giving up on finding an unused code.
pub const MAX_CODE_ATTEMPTS: usize = 64;

/// Draw random codes until one is not `taken`.
pub fn generate_code(rng: &mut GameRng, len: usize, taken: impl Fn(&str) -> bool) -> Result<String> {
    for _ in 0..MAX_CODE_ATTEMPTS {
        let code = rng.gen_code(CODE_ALPHABET, len);
        if !taken(&code) {
            return Ok(code);
        }
    }
    Err(GameError::CodeSpaceExhausted)
}

/// Canonical form of a user-typed code.
#[must_use]
pub fn normalize_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_shape() {
        let mut rng = GameRng::new(42);
        let code = generate_code(&mut rng, 6, |_| false).unwrap();
        assert_eq!(code.len(), 6);
        assert!(code.bytes().all(|b| CODE_ALPHABET.contains(&b)));
    }

    #[test]
    fn test_collision_retry() {
        let mut rng = GameRng::new(42);
        let first = generate_code(&mut rng.clone(), 6, |_| false).unwrap();
        let second = generate_code(&mut rng, 6, |c| c == first).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_exhausted() {
        let mut rng = GameRng::new(1);
        let err = generate_code(&mut rng, 6, |_| true).unwrap_err();
        assert_eq!(err, GameError::CodeSpaceExhausted);
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize_code("  ab12cd "), "AB12CD");
    }
}
