//! MS-CHAPv1 password hashing and challenge responses (RFC 2433, appendix A).
//!
//! Both LM and NT password hashes are 16 bytes; [`challenge_response`] turns either into the
//! 24-byte response by zero-extending it to 21 bytes and DES-encrypting the 8-byte challenge under
//! each 7-byte third.

pub mod mppe;

use md4::{Digest as _, Md4};
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use crate::config::LmOptions;
use crate::des::{des_encrypt, des_encrypt_slice};
use crate::error::{check_len, to_array, ChapError, Result};
use crate::password::{lm_password_buffer, password_to_utf16le_bytes};
use crate::{MSCHAP_CHALLENGE_LEN, NT_RESPONSE_LEN, PASSWORD_HASH_LEN};

/// Plaintext DES-encrypted under each half of the LM password buffer.
pub const LM_MAGIC: [u8; 8] = *b"KGS!@#$%";

const Z_PASSWORD_HASH_LEN: usize = 21;

/// `LmPasswordHash` using the default LM codepage (1252).
pub fn lm_password_hash(password: &str) -> Result<[u8; PASSWORD_HASH_LEN]> {
    lm_password_hash_with(password, &LmOptions::default())
}

/// `LmPasswordHash`: DES-encrypt [`LM_MAGIC`] under each 7-byte half of the upper-cased,
/// 14-byte, zero-padded password.
///
/// Passwords longer than 14 encoded bytes are truncated, as every peer does.
pub fn lm_password_hash_with(
    password: &str,
    options: &LmOptions,
) -> Result<[u8; PASSWORD_HASH_LEN]> {
    let buf = lm_password_buffer(password, options)?;

    let mut hash = [0u8; PASSWORD_HASH_LEN];
    hash[..8].copy_from_slice(&des_encrypt_slice(&LM_MAGIC, &buf[..7])?);
    hash[8..].copy_from_slice(&des_encrypt_slice(&LM_MAGIC, &buf[7..])?);
    Ok(hash)
}

/// `NtPasswordHash`: MD4 over the UTF-16LE password.
pub fn nt_password_hash(password: &str) -> [u8; PASSWORD_HASH_LEN] {
    let unicode = password_to_utf16le_bytes(password);
    nt_password_hash_utf16le(&unicode)
}

/// `NtPasswordHash` over a password that is already UTF-16LE encoded.
pub fn nt_password_hash_utf16le(password: &[u8]) -> [u8; PASSWORD_HASH_LEN] {
    Md4::digest(password).into()
}

/// `ChallengeResponse`: three single-block DES encryptions of `challenge`, keyed by the
/// 7-byte thirds of `password_hash` zero-extended to 21 bytes.
pub fn challenge_response(challenge: &[u8], password_hash: &[u8]) -> Result<[u8; NT_RESPONSE_LEN]> {
    let challenge: [u8; MSCHAP_CHALLENGE_LEN] = to_array("MS-CHAP challenge", challenge)?;
    check_len("password hash", password_hash, PASSWORD_HASH_LEN)?;

    let mut z_password_hash = Zeroizing::new([0u8; Z_PASSWORD_HASH_LEN]);
    z_password_hash[..PASSWORD_HASH_LEN].copy_from_slice(password_hash);

    let mut response = [0u8; NT_RESPONSE_LEN];
    for (out, key) in response
        .chunks_exact_mut(8)
        .zip(z_password_hash.chunks_exact(7))
    {
        out.copy_from_slice(&des_encrypt_slice(&challenge, key)?);
    }
    Ok(response)
}

/// `LmChallengeResponse`: [`challenge_response`] over the LM hash of `password`.
pub fn lm_challenge_response(challenge: &[u8], password: &str) -> Result<[u8; NT_RESPONSE_LEN]> {
    lm_challenge_response_with(challenge, password, &LmOptions::default())
}

/// [`lm_challenge_response`] with an explicit LM codepage.
pub fn lm_challenge_response_with(
    challenge: &[u8],
    password: &str,
    options: &LmOptions,
) -> Result<[u8; NT_RESPONSE_LEN]> {
    let hash = Zeroizing::new(lm_password_hash_with(password, options)?);
    challenge_response(challenge, hash.as_slice())
}

/// `NtChallengeResponse`: [`challenge_response`] over the NT hash of `password`.
pub fn nt_challenge_response(challenge: &[u8], password: &str) -> Result<[u8; NT_RESPONSE_LEN]> {
    let hash = Zeroizing::new(nt_password_hash(password));
    challenge_response(challenge, hash.as_slice())
}

/// Authenticator-side check of a peer's NT response.
pub fn verify_nt_response(challenge: &[u8], password: &str, response: &[u8]) -> Result<()> {
    check_len("NT response", response, NT_RESPONSE_LEN)?;
    let expected = nt_challenge_response(challenge, password)?;
    if bool::from(expected.as_slice().ct_eq(response)) {
        Ok(())
    } else {
        Err(ChapError::ResponseMismatch)
    }
}

/// DES-encrypt a 16-byte block as two 8-byte halves keyed by the first 14 bytes of `key`.
///
/// Shared by LM-style constructions that encrypt one password hash under another.
pub(crate) fn encrypt_hash_with_block(
    hash: &[u8; PASSWORD_HASH_LEN],
    key: &[u8; PASSWORD_HASH_LEN],
) -> Result<[u8; PASSWORD_HASH_LEN]> {
    let mut out = [0u8; PASSWORD_HASH_LEN];
    for (i, half) in out.chunks_exact_mut(8).enumerate() {
        let clear: [u8; 8] = to_array("password hash half", &hash[i * 8..i * 8 + 8])?;
        let key: [u8; 7] = to_array("password hash key", &key[i * 7..i * 7 + 7])?;
        half.copy_from_slice(&des_encrypt(&clear, &key)?);
    }
    Ok(out)
}
