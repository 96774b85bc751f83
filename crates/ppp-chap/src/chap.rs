//! CHAP with MD5 (RFC 1994 section 2, RFC 2865 section 7.2).

use md5::{Digest as _, Md5};
use rand::{CryptoRng, RngCore};
use subtle::ConstantTimeEq;

use crate::error::{check_len, ChapError, Result};
use crate::CHAP_RESPONSE_LEN;

/// Compute the CHAP response value `MD5(id || password || challenge)`.
///
/// `id` is the one-octet CHAP Identifier of the Challenge packet being answered.
pub fn challenge_response(id: u8, password: &[u8], challenge: &[u8]) -> [u8; CHAP_RESPONSE_LEN] {
    let mut md5 = Md5::new();
    md5.update([id]);
    md5.update(password);
    md5.update(challenge);
    md5.finalize().into()
}

/// Authenticator-side check of a received CHAP response value.
pub fn verify_response(id: u8, password: &[u8], challenge: &[u8], response: &[u8]) -> Result<()> {
    check_len("CHAP response", response, CHAP_RESPONSE_LEN)?;
    let expected = challenge_response(id, password, challenge);
    if bool::from(expected.as_slice().ct_eq(response)) {
        Ok(())
    } else {
        Err(ChapError::ResponseMismatch)
    }
}

/// Draw a fresh challenge of `N` bytes from a cryptographic RNG.
pub fn generate_challenge<const N: usize, R: RngCore + CryptoRng>(rng: &mut R) -> [u8; N] {
    let mut challenge = [0u8; N];
    rng.fill_bytes(&mut challenge);
    challenge
}
