//! MPPE key material shared by both MS-CHAP generations (RFC 3078, RFC 3079).
//!
//! Start keys come from the authentication exchange ([`crate::mschapv1::mppe`],
//! [`crate::mschapv2::mppe`]). Session keys are then derived from a start key:
//!
//! ```text
//! initial = Reduce(GetNewKeyFromSHA(start, start))
//! next    = Reduce(RC4(interim, interim)),  interim = GetNewKeyFromSHA(start, current)
//! ```
//!
//! `Reduce` applies the 40/56-bit salt; 128-bit keys pass through unchanged.

use core::fmt;

use cipher::consts::{U16, U8};
use cipher::{KeyInit, StreamCipher};
use rc4::Rc4;
use sha1::{Digest as _, Sha1};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::config::KeyStrength;
use crate::error::{check_len, ChapError, Result};

pub(crate) const SHA1_LEN: usize = 20;

/// `SHSpad1`: 40 zero octets.
pub const SHS_PAD1: [u8; 40] = [0x00; 40];
/// `SHSpad2`: 40 octets of `0xF2`.
pub const SHS_PAD2: [u8; 40] = [0xF2; 40];

/// Leading octets forced onto 40-bit keys.
pub const SALT_40_BIT: [u8; 3] = [0xD1, 0x26, 0x9E];
/// Leading octet forced onto 56-bit keys.
pub const SALT_56_BIT: [u8; 1] = [0xD1];

/// A directional key pair for one end of an MPPE link.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SessionKeys {
    pub send: Vec<u8>,
    pub recv: Vec<u8>,
}

impl fmt::Debug for SessionKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionKeys")
            .field("send", &format_args!("<{} bytes>", self.send.len()))
            .field("recv", &format_args!("<{} bytes>", self.recv.len()))
            .finish()
    }
}

/// `GetNewKeyFromSHA`: `SHA1(start[..len] || SHSpad1 || session[..len] || SHSpad2)[..len]`.
///
/// MS-CHAPv1's `GetKey` is this function under its RFC 3079 section 2 name.
pub fn get_new_key_from_sha(
    start_key: &[u8],
    session_key: &[u8],
    len: usize,
) -> Result<Zeroizing<Vec<u8>>> {
    let max = SHA1_LEN.min(start_key.len()).min(session_key.len());
    if len == 0 || len > max {
        log::debug!("rejecting MPPE key length {len} (max {max})");
        return Err(ChapError::InvalidKeyLength { len, max });
    }

    let mut sha1 = Sha1::new();
    sha1.update(&start_key[..len]);
    sha1.update(SHS_PAD1);
    sha1.update(&session_key[..len]);
    sha1.update(SHS_PAD2);
    let mut digest = sha1.finalize();

    let out = Zeroizing::new(digest[..len].to_vec());
    digest.as_mut_slice().zeroize();
    Ok(out)
}

/// Apply the 40/56-bit salt to an 8-byte key; 128-bit keys are returned unchanged.
pub fn reduce_key(key: &[u8], strength: KeyStrength) -> Result<Zeroizing<Vec<u8>>> {
    check_len("MPPE session key", key, strength.key_len())?;
    let mut out = Zeroizing::new(key.to_vec());
    match strength {
        KeyStrength::Bits40 => out[..SALT_40_BIT.len()].copy_from_slice(&SALT_40_BIT),
        KeyStrength::Bits56 => out[..SALT_56_BIT.len()].copy_from_slice(&SALT_56_BIT),
        KeyStrength::Bits128 => {}
    }
    Ok(out)
}

/// First session key for a direction, derived from that direction's start key.
pub fn initial_session_key(start_key: &[u8], strength: KeyStrength) -> Result<Zeroizing<Vec<u8>>> {
    let len = strength.key_len();
    check_len("MPPE start key", start_key, len)?;
    log::trace!("deriving initial MPPE session key ({strength:?})");

    let interim = get_new_key_from_sha(start_key, start_key, len)?;
    reduce_key(&interim, strength)
}

/// Session key following `current_key` (RFC 3079 section 7 key change).
///
/// Stateful links call this every 256 packets; stateless links call it for every packet.
pub fn next_session_key(
    start_key: &[u8],
    current_key: &[u8],
    strength: KeyStrength,
) -> Result<Zeroizing<Vec<u8>>> {
    let len = strength.key_len();
    check_len("MPPE start key", start_key, len)?;
    check_len("MPPE session key", current_key, len)?;
    log::trace!("deriving next MPPE session key ({strength:?})");

    let mut interim = get_new_key_from_sha(start_key, current_key, len)?;
    let key = Zeroizing::new(interim.to_vec());
    rc4_apply_keystream(&key, &mut interim)?;
    reduce_key(&interim, strength)
}

/// RC4 over `data` in place. Only the key sizes MS-CHAP/MPPE use (8 and 16 bytes) are accepted.
pub(crate) fn rc4_apply_keystream(key: &[u8], data: &mut [u8]) -> Result<()> {
    let primitive = || ChapError::Primitive { primitive: "RC4" };
    match key.len() {
        8 => Rc4::<U8>::new_from_slice(key)
            .map_err(|_| primitive())?
            .apply_keystream(data),
        16 => Rc4::<U16>::new_from_slice(key)
            .map_err(|_| primitive())?
            .apply_keystream(data),
        _ => return Err(primitive()),
    }
    Ok(())
}
