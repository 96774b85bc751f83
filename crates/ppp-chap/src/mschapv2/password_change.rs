//! MS-CHAPv2 Change-Password packet fields (RFC 2759 sections 8.9 to 8.13).
//!
//! The new password travels in a 516-byte block RC4-encrypted under the old NT password hash:
//!
//! ```text
//! +--------------------------------------+----------------+
//! | 512 bytes: fill .. UTF-16LE password | u32 LE length  |
//! +--------------------------------------+----------------+
//! ```
//!
//! The password is right-aligned against the length field; the leading bytes are random fill.

use rand::{CryptoRng, RngCore};
use zeroize::Zeroizing;

use crate::error::{check_len, ChapError, Result};
use crate::mppe::rc4_apply_keystream;
use crate::mschapv1::{encrypt_hash_with_block, nt_password_hash};
use crate::password::{password_to_utf16le_bytes, utf16_len};
use crate::{ENCRYPTED_PASSWORD_BLOCK_LEN, PASSWORD_HASH_LEN};

/// Bytes of the block available to the password and its fill.
pub const PASSWORD_AREA_LEN: usize = 512;
/// Longest password the block can carry, in UTF-16 code units.
pub const MAX_PASSWORD_UNITS: usize = PASSWORD_AREA_LEN / 2;

/// `NewPasswordEncryptedWithOldNtPasswordHash` with fresh random fill.
pub fn new_password_encrypted_with_old_nt_password_hash<R: RngCore + CryptoRng>(
    new_password: &str,
    old_password: &str,
    rng: &mut R,
) -> Result<[u8; ENCRYPTED_PASSWORD_BLOCK_LEN]> {
    let mut fill = Zeroizing::new([0u8; PASSWORD_AREA_LEN]);
    rng.fill_bytes(fill.as_mut_slice());
    let old_hash = Zeroizing::new(nt_password_hash(old_password));
    encrypt_pw_block_with_password_hash(new_password, old_hash.as_slice(), &fill)
}

/// `EncryptPwBlockWithPasswordHash` with caller-supplied fill bytes.
///
/// Only the fill bytes not overwritten by the password reach the output.
pub fn encrypt_pw_block_with_password_hash(
    password: &str,
    password_hash: &[u8],
    fill: &[u8; PASSWORD_AREA_LEN],
) -> Result<[u8; ENCRYPTED_PASSWORD_BLOCK_LEN]> {
    check_len("password hash", password_hash, PASSWORD_HASH_LEN)?;
    let units = utf16_len(password);
    if units > MAX_PASSWORD_UNITS {
        return Err(ChapError::PasswordTooLong {
            len: units,
            max: MAX_PASSWORD_UNITS,
        });
    }

    let unicode = password_to_utf16le_bytes(password);
    let mut block = Zeroizing::new([0u8; ENCRYPTED_PASSWORD_BLOCK_LEN]);
    block[..PASSWORD_AREA_LEN].copy_from_slice(fill);
    block[PASSWORD_AREA_LEN - unicode.len()..PASSWORD_AREA_LEN].copy_from_slice(&unicode);
    // `unicode.len() <= 512`, checked above.
    block[PASSWORD_AREA_LEN..].copy_from_slice(&(unicode.len() as u32).to_le_bytes());

    rc4_apply_keystream(password_hash, &mut block[..])?;
    Ok(*block)
}

/// `OldNtPasswordHashEncryptedWithNewNtPasswordHash`.
pub fn old_nt_password_hash_encrypted_with_new_nt_password_hash(
    new_password: &str,
    old_password: &str,
) -> Result<[u8; PASSWORD_HASH_LEN]> {
    let old_hash = Zeroizing::new(nt_password_hash(old_password));
    let new_hash = Zeroizing::new(nt_password_hash(new_password));
    encrypt_hash_with_block(&old_hash, &new_hash)
}

/// Authenticator side: recover the new password from an encrypted block.
pub fn decrypt_new_password(
    block: &[u8],
    old_password_hash: &[u8],
) -> Result<Zeroizing<String>> {
    check_len("encrypted password block", block, ENCRYPTED_PASSWORD_BLOCK_LEN)?;
    check_len("password hash", old_password_hash, PASSWORD_HASH_LEN)?;

    let mut clear = Zeroizing::new(block.to_vec());
    rc4_apply_keystream(old_password_hash, &mut clear)?;

    let mut len_bytes = [0u8; 4];
    len_bytes.copy_from_slice(&clear[PASSWORD_AREA_LEN..]);
    let len = u32::from_le_bytes(len_bytes) as usize;
    if len > PASSWORD_AREA_LEN || len % 2 != 0 {
        log::debug!("rejecting password block with length field {len}");
        return Err(ChapError::InvalidPasswordBlock("password length out of range"));
    }

    let units: Zeroizing<Vec<u16>> = Zeroizing::new(
        clear[PASSWORD_AREA_LEN - len..PASSWORD_AREA_LEN]
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect(),
    );
    String::from_utf16(&units)
        .map(Zeroizing::new)
        .map_err(|_| ChapError::InvalidPasswordBlock("password is not valid UTF-16"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use sha1::{Digest as _, Sha1};

    const ZERO_FILL: [u8; PASSWORD_AREA_LEN] = [0u8; PASSWORD_AREA_LEN];

    #[test]
    fn block_with_zero_fill_matches_reference() {
        let old_hash = nt_password_hash("clientPass");
        let block =
            encrypt_pw_block_with_password_hash("newPass", &old_hash, &ZERO_FILL).expect("block");
        assert_eq!(
            hex::encode(Sha1::digest(block)),
            "82a3059d9c7a76a01c36865a179bcd0b350a2d42"
        );
        assert_eq!(hex::encode(&block[..16]), "92e2cbefb3f9f014280cfb88603137e0");
        assert_eq!(hex::encode(&block[500..]), "3fec437f5918ae7ff2458858bc343a7c");
    }

    #[test]
    fn old_hash_encrypted_with_new_hash_matches_reference() {
        let encrypted =
            old_nt_password_hash_encrypted_with_new_nt_password_hash("newPass", "clientPass")
                .expect("encrypted");
        assert_eq!(hex::encode(encrypted), "266dd8707a5a6b370edf8fcb42053d8f");
    }

    #[test]
    fn random_block_decrypts_to_new_password() {
        let mut rng = StdRng::seed_from_u64(2759);
        let block =
            new_password_encrypted_with_old_nt_password_hash("nëwPass", "clientPass", &mut rng)
                .expect("block");
        let old_hash = nt_password_hash("clientPass");
        let recovered = decrypt_new_password(&block, &old_hash).expect("decrypt");
        assert_eq!(recovered.as_str(), "nëwPass");
    }

    #[test]
    fn decrypt_with_wrong_hash_is_rejected_or_differs() {
        let block = encrypt_pw_block_with_password_hash(
            "newPass",
            &nt_password_hash("clientPass"),
            &ZERO_FILL,
        )
        .expect("block");
        match decrypt_new_password(&block, &nt_password_hash("otherPass")) {
            Ok(password) => assert_ne!(password.as_str(), "newPass"),
            Err(err) => assert!(matches!(err, ChapError::InvalidPasswordBlock(_))),
        }
    }

    #[test]
    fn longest_password_fills_the_area() {
        let password = "x".repeat(MAX_PASSWORD_UNITS);
        let hash = nt_password_hash("old");
        let block =
            encrypt_pw_block_with_password_hash(&password, &hash, &ZERO_FILL).expect("block");
        assert_eq!(
            decrypt_new_password(&block, &hash).expect("decrypt").as_str(),
            password
        );

        let too_long = "x".repeat(MAX_PASSWORD_UNITS + 1);
        assert_eq!(
            encrypt_pw_block_with_password_hash(&too_long, &hash, &ZERO_FILL).unwrap_err(),
            ChapError::PasswordTooLong { len: 257, max: 256 }
        );
    }

    #[test]
    fn lengths_are_validated() {
        let hash = [0u8; 16];
        assert!(matches!(
            decrypt_new_password(&[0u8; 515], &hash).unwrap_err(),
            ChapError::InvalidLength { expected: 516, actual: 515, .. }
        ));
        assert!(matches!(
            encrypt_pw_block_with_password_hash("pw", &hash[..8], &ZERO_FILL).unwrap_err(),
            ChapError::InvalidLength { expected: 16, actual: 8, .. }
        ));
    }
}
