//! Golden vectors.
//!
//! Fixed key, nonce, instant and message must reproduce the exact bytes
//! and text below. Any change here is a wire-format break.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use tessera::{BRANCA, SEALED, Signer, Token, TokenError, XChaCha20Poly1305Cipher};

const TAG_LEN: usize = XChaCha20Poly1305Cipher::TAG_LEN;

/// 0001-01-01T00:00:00Z, whose Unix seconds wrap to 0x886E0900 in 32 bits.
fn year_one() -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(1, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        .and_utc()
}

fn epoch() -> DateTime<Utc> {
    DateTime::from_timestamp(0, 0).unwrap()
}

#[test]
fn test_sealed_zero_vector() {
    let signer = Signer::new(SEALED, &[0u8; 32], Duration::zero()).unwrap();
    let token = signer.sign_at(epoch(), &[0u8; 24], b"").unwrap();

    let want_bin = hex::decode(
        "41000000000000000000000000000000000000000000000000\
         08ac81c695b5cdbeef770ade355055de",
    )
    .unwrap();
    assert_eq!(token.as_bytes(), &want_bin[..]);
    assert_eq!(
        token.to_string(),
        "QQAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAisgcaVtc2-73cK3jVQVd4"
    );

    // The instant is not part of an untimed token.
    let later = signer.sign_at(Utc::now(), &[0u8; 24], b"").unwrap();
    assert_eq!(later, token);

    assert_eq!(signer.verify(&token).unwrap(), b"");
}

#[test]
fn test_branca_zero_vector() {
    const WANT: &str = "uohuCQAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAB4npaJ5SCNf9nh88W1NB9I7xihPkGJmK3a3ZejaTqYf46C7NXBQzv-0a9JdQwPH_KcQXSgWxGao6noMzgS4MD-pJ4e4BNKcKnUnCTgy9j8O6J-l8MyKtSH93j43GoSL6WcvjPneOouULtZCcmXHE_sL5NSP3eJLRfKpYFn3sTWx6qOWWXHu_0PFvjVMBcljBA";

    let signer = Signer::new(BRANCA, &[0u8; 32], Duration::zero()).unwrap();
    let input = [0u8; 128];
    let token = signer.sign_at(year_one(), &[0u8; 24], &input).unwrap();

    assert_eq!(&token.as_bytes()[..5], &[0xBAu8, 0x88, 0x6E, 0x09, 0x00]);
    assert_eq!(token.len(), BRANCA.header_len() + 128 + TAG_LEN);
    assert_eq!(token.to_string(), WANT);
    assert_eq!(WANT.parse::<Token>().unwrap(), token);

    let opened = signer.verify_at(year_one(), &token).unwrap();
    assert_eq!(opened, input);
}

const HELLO_KEY: &[u8] = b"supersecretkeyyoushouldnotcommit";

/// Token published with the branca-js test suite for "Hello world!".
const BRANCA_HELLO_WORLD: &[u8] = b"\xba\x00\x00\x00\x00[*\xddB_\xb6&(\x1cIZo\xa8\x83\x1f\xc9\xf0\xcf@2\x87@u\x1a\x009\x8f\x83\xef\xb3q\xd6Q@\xfa\x04\x90u\x9a\xe4pA\xf4\x11:Sd\xc7i\x1a\xf9\xb2";

#[test]
fn test_branca_hello_world() {
    let signer = Signer::new(BRANCA, HELLO_KEY, Duration::zero()).unwrap();

    let token = Token::from_bytes(BRANCA_HELLO_WORLD.to_vec());
    let header = token.header(&BRANCA).unwrap();
    assert_eq!(header.timestamp(), Some(0));

    assert_eq!(signer.verify(&token).unwrap(), b"Hello world!");
}

#[test]
fn test_branca_hello_world_expired() {
    let signer = Signer::new(BRANCA, HELLO_KEY, Duration::hours(1)).unwrap();

    let err = signer.verify(BRANCA_HELLO_WORLD).unwrap_err();
    match err {
        TokenError::Expired { issued_at, message } => {
            assert_eq!(issued_at, epoch());
            assert_eq!(message, b"Hello world!");
        }
        other => panic!("expected expiry, got {other:?}"),
    }
}
