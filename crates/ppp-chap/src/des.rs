//! 56-bit key expansion and single-block DES as used by MS-CHAP.
//!
//! MS-CHAP hands DES 7-byte secrets (slices of a zero-padded 16-byte password hash). DES wants an
//! 8-byte key with one parity bit per byte, so the 56 secret bits are spread 7 per output byte.

use cipher::generic_array::GenericArray;
use cipher::{BlockEncrypt, KeyInit};
use ::des::Des;

use crate::error::{ChapError, Result};

/// Expand a 7-byte secret into an 8-byte DES key.
///
/// Output byte `i` is `(key[i] >> i) | carry | 1`, where `carry` holds the low bits of the
/// previous input byte shifted into the top of the next output byte. The final byte is the last
/// carry.
///
/// Note that bit 0 is forced to `1`; this is **not** textbook DES odd parity. DES ignores the
/// parity bits, and peers expand keys this exact way, so the output must stay bit-for-bit.
pub fn parity_key(key: &[u8; 7]) -> [u8; 8] {
    let mut out = [0u8; 8];
    let mut next: u8 = 0;
    for (i, &working) in key.iter().enumerate() {
        out[i] = (working >> i) | next | 1;
        next = working << (7 - i);
    }
    out[7] = next | 1;
    out
}

/// Encrypt one 8-byte block with a parity-expanded 7-byte key (ECB, no padding).
pub fn des_encrypt(clear: &[u8; 8], key: &[u8; 7]) -> Result<[u8; 8]> {
    let des_key = parity_key(key);
    let cipher =
        Des::new_from_slice(&des_key).map_err(|_| ChapError::Primitive { primitive: "DES" })?;
    let mut block = GenericArray::clone_from_slice(clear);
    cipher.encrypt_block(&mut block);
    Ok(block.into())
}

/// Encrypt `clear` under a key taken from `key[..7]`.
///
/// Callers slice 7-byte windows out of longer buffers; this keeps the conversion in one place.
pub(crate) fn des_encrypt_slice(clear: &[u8; 8], key: &[u8]) -> Result<[u8; 8]> {
    let key: &[u8; 7] = key
        .get(..7)
        .and_then(|k| k.try_into().ok())
        .ok_or(ChapError::InvalidLength {
            field: "DES key",
            expected: 7,
            actual: key.len(),
        })?;
    des_encrypt(clear, key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parity_bit_is_forced_on_not_computed() {
        // Textbook odd parity would give `01` for a zero byte too, but `FE` for 0xFF input
        // (seven ones already). The expansion always ORs in 1, so all-ones stays `FF`.
        assert_eq!(parity_key(&[0u8; 7]), [0x01; 8]);
        assert_eq!(parity_key(&[0xFF; 7]), [0xFF; 8]);
    }

    #[test]
    fn parity_key_spreads_seven_bits_per_byte() {
        let key = [0x01, 0x23, 0x45, 0x67, 0x89, 0xAB, 0xCD];
        assert_eq!(
            parity_key(&key),
            [0x01, 0x91, 0xD1, 0xAD, 0x79, 0x4D, 0xAF, 0x9B]
        );
    }

    #[test]
    fn des_hash_of_lm_magic_with_zero_key() {
        // Second half of every short-password LM hash: DES("KGS!@#$%", 0^7).
        let out = des_encrypt(b"KGS!@#$%", &[0u8; 7]).expect("des");
        assert_eq!(out, [0xAA, 0xD3, 0xB4, 0x35, 0xB5, 0x14, 0x04, 0xEE]);
    }

    #[test]
    fn des_encrypt_slice_rejects_short_keys() {
        let err = des_encrypt_slice(&[0u8; 8], &[0u8; 6]).expect_err("short key");
        assert!(matches!(
            err,
            ChapError::InvalidLength {
                expected: 7,
                actual: 6,
                ..
            }
        ));
    }
}
