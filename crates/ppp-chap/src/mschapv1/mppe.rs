//! MPPE keys for MS-CHAPv1 links (RFC 3079 section 2).
//!
//! 40- and 56-bit keys come from the LM password hash; 128-bit keys from the NT
//! password-hash-hash and the authenticator's 8-byte challenge.

use sha1::{Digest as _, Sha1};
use zeroize::Zeroizing;

use crate::config::{KeyStrength, LmOptions};
use crate::error::{check_len, to_array, Result};
use crate::mppe::{get_new_key_from_sha, reduce_key};
use crate::mschapv1::{lm_password_hash_with, nt_password_hash};
use crate::mschapv2::hash_nt_password_hash;
use crate::{MSCHAP_CHALLENGE_LEN, PASSWORD_HASH_LEN};

const SHORT_KEY_LEN: usize = 8;
const LONG_KEY_LEN: usize = 16;

/// `GetStartKey`: `SHA1(hash_hash || hash_hash || challenge)[..16]`.
pub fn get_start_key(
    challenge: &[u8],
    nt_password_hash_hash: &[u8],
) -> Result<[u8; LONG_KEY_LEN]> {
    check_len("MS-CHAP challenge", challenge, MSCHAP_CHALLENGE_LEN)?;
    check_len(
        "NT password hash hash",
        nt_password_hash_hash,
        PASSWORD_HASH_LEN,
    )?;

    let mut sha1 = Sha1::new();
    sha1.update(nt_password_hash_hash);
    sha1.update(nt_password_hash_hash);
    sha1.update(challenge);
    let digest = sha1.finalize();

    let mut key = [0u8; LONG_KEY_LEN];
    key.copy_from_slice(&digest[..LONG_KEY_LEN]);
    Ok(key)
}

/// `GetKey`: `SHA1(initial[..len] || SHSpad1 || current[..len] || SHSpad2)[..len]`.
pub fn get_key(initial_key: &[u8], current_key: &[u8], len: usize) -> Result<Zeroizing<Vec<u8>>> {
    get_new_key_from_sha(initial_key, current_key, len)
}

/// 40-bit key: `GetKey` over the first 8 bytes of the LM hash, salted with `D1 26 9E`.
///
/// `current_key` defaults to the initial key (the first key of a session).
pub fn get_key_40bit(password: &str, current_key: Option<&[u8]>) -> Result<[u8; SHORT_KEY_LEN]> {
    get_key_40bit_with(password, current_key, &LmOptions::default())
}

/// [`get_key_40bit`] with an explicit LM codepage.
pub fn get_key_40bit_with(
    password: &str,
    current_key: Option<&[u8]>,
    options: &LmOptions,
) -> Result<[u8; SHORT_KEY_LEN]> {
    get_short_key(password, current_key, KeyStrength::Bits40, options)
}

/// 56-bit key: as [`get_key_40bit`] but only the first byte is forced to `D1`.
pub fn get_key_56bit(password: &str, current_key: Option<&[u8]>) -> Result<[u8; SHORT_KEY_LEN]> {
    get_key_56bit_with(password, current_key, &LmOptions::default())
}

/// [`get_key_56bit`] with an explicit LM codepage.
pub fn get_key_56bit_with(
    password: &str,
    current_key: Option<&[u8]>,
    options: &LmOptions,
) -> Result<[u8; SHORT_KEY_LEN]> {
    get_short_key(password, current_key, KeyStrength::Bits56, options)
}

fn get_short_key(
    password: &str,
    current_key: Option<&[u8]>,
    strength: KeyStrength,
    options: &LmOptions,
) -> Result<[u8; SHORT_KEY_LEN]> {
    let lm_hash = Zeroizing::new(lm_password_hash_with(password, options)?);
    let initial = &lm_hash[..SHORT_KEY_LEN];
    let current = current_key.unwrap_or(initial);
    check_len("MPPE current key", current, SHORT_KEY_LEN)?;
    log::trace!("deriving MS-CHAPv1 MPPE key ({strength:?})");

    let key = get_key(initial, current, SHORT_KEY_LEN)?;
    let salted = reduce_key(&key, strength)?;
    to_array("MPPE key", &salted)
}

/// 128-bit key: `GetKey` over the start key derived from the NT hash-hash and `challenge`.
pub fn get_key_128bit(
    challenge: &[u8],
    password: &str,
    current_key: Option<&[u8]>,
) -> Result<[u8; LONG_KEY_LEN]> {
    let hash = Zeroizing::new(nt_password_hash(password));
    let hash_hash = Zeroizing::new(hash_nt_password_hash(hash.as_slice())?);
    let start = Zeroizing::new(get_start_key(challenge, hash_hash.as_slice())?);

    let current = current_key.unwrap_or(start.as_slice());
    check_len("MPPE current key", current, LONG_KEY_LEN)?;
    log::trace!("deriving MS-CHAPv1 MPPE key (Bits128)");

    let key = get_key(start.as_slice(), current, LONG_KEY_LEN)?;
    to_array("MPPE key", &key)
}
