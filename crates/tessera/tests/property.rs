#![allow(clippy::unwrap_used)] // unwrap() is idiomatic in property tests

use chrono::{DateTime, Duration};
use proptest::prelude::*;
use tessera::{BRANCA, SEALED, Signer, Token, TokenError};

const KEY: &[u8; 32] = b"0123456789abcdef0123456789abcdef";

// ============================================================================
// Property: Round-trip sealing/opening
// ============================================================================

proptest! {
    #[test]
    fn prop_sign_verify_roundtrip(
        message in prop::collection::vec(any::<u8>(), 0..4096),
        key in prop::array::uniform32(any::<u8>()),
    ) {
        for params in [BRANCA, SEALED] {
            let signer = Signer::new(params, &key, Duration::zero()).unwrap();
            let token = signer.sign(&message)?;
            prop_assert_eq!(token.len(), params.header_len() + message.len() + 16);
            prop_assert_eq!(signer.verify(&token)?, message.clone());
        }
    }
}

proptest! {
    #[test]
    fn prop_text_roundtrip(bytes in prop::collection::vec(any::<u8>(), 0..512)) {
        let token = Token::from_bytes(bytes);
        let text = token.to_string();
        prop_assert!(!text.contains('='));
        prop_assert!(!text.contains('+'));
        prop_assert!(!text.contains('/'));
        prop_assert_eq!(text.parse::<Token>()?, token);
    }
}

// ============================================================================
// Property: Any single-byte change is rejected
// ============================================================================

proptest! {
    #[test]
    fn prop_tamper_rejected(
        message in prop::collection::vec(any::<u8>(), 0..256),
        index in any::<prop::sample::Index>(),
        mask in 1u8..=255,
    ) {
        let signer = Signer::new(BRANCA, KEY, Duration::zero()).unwrap();
        let token = signer.sign(&message)?;
        let mut tampered = token.into_bytes();
        let at = index.index(tampered.len());
        tampered[at] ^= mask;
        prop_assert!(matches!(signer.verify(&tampered), Err(TokenError::Authentication)));
    }
}

// ============================================================================
// Property: Expiry boundary
// ============================================================================

proptest! {
    #[test]
    fn prop_expiry_boundary(
        issued in 0i64..=u32::MAX as i64,
        ttl in 1i64..100_000,
        elapsed in -200_000i64..200_000,
    ) {
        let signer = Signer::new(BRANCA, KEY, Duration::seconds(ttl)).unwrap();
        let t0 = DateTime::from_timestamp(issued, 0).unwrap();
        let token = signer.sign_at(t0, &[0u8; 24], b"payload").unwrap();

        let result = signer.verify_at(t0 + Duration::seconds(elapsed), &token);
        if elapsed.abs() > ttl {
            let err = result.unwrap_err();
            prop_assert_eq!(err.into_expired_message(), Some(b"payload".to_vec()));
        } else {
            prop_assert_eq!(result.unwrap(), b"payload".to_vec());
        }
    }
}
