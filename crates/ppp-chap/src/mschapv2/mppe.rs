//! MPPE start keys for MS-CHAPv2 links (RFC 3079 section 3).
//!
//! The master key binds the password to one NT-Response; each direction's start key is then a
//! SHA-1 over the master key and a direction-specific magic string. Session keys follow from
//! the start keys through [`crate::mppe::initial_session_key`].

use sha1::{Digest as _, Sha1};
use zeroize::Zeroizing;

use crate::config::{KeyStrength, MppeConfig};
use crate::error::{check_len, ChapError, Result};
use crate::mppe::{SessionKeys, SHA1_LEN, SHS_PAD1, SHS_PAD2};
use crate::mschapv1::nt_password_hash;
use crate::mschapv2::hash_nt_password_hash;
use crate::{NT_RESPONSE_LEN, PASSWORD_HASH_LEN};

/// `Magic1` of `GetMasterKey` (27 octets).
pub const MASTER_KEY_MAGIC: [u8; 27] = *b"This is the MPPE Master Key";

/// `Magic2` of `GetAsymetricStartKey` (84 octets).
pub const SEND_KEY_MAGIC: [u8; 84] =
    *b"On the client side, this is the send key; on the server side, it is the receive key.";

/// `Magic3` of `GetAsymetricStartKey` (84 octets).
pub const RECV_KEY_MAGIC: [u8; 84] =
    *b"On the client side, this is the receive key; on the server side, it is the send key.";

/// `GetMasterKey`: `SHA1(password_hash_hash || nt_response || Magic1)[..16]`.
pub fn get_master_key(
    password_hash_hash: &[u8],
    nt_response: &[u8],
) -> Result<[u8; PASSWORD_HASH_LEN]> {
    check_len("NT password hash hash", password_hash_hash, PASSWORD_HASH_LEN)?;
    check_len("NT response", nt_response, NT_RESPONSE_LEN)?;

    let mut sha1 = Sha1::new();
    sha1.update(password_hash_hash);
    sha1.update(nt_response);
    sha1.update(MASTER_KEY_MAGIC);
    let digest = sha1.finalize();

    let mut master_key = [0u8; PASSWORD_HASH_LEN];
    master_key.copy_from_slice(&digest[..PASSWORD_HASH_LEN]);
    Ok(master_key)
}

/// `GetAsymetricStartKey`: the start key for one direction of one end of the link.
///
/// The receive-key magic is used when `is_send == is_server`, so a server's send key equals the
/// client's receive key.
pub fn get_asymmetric_start_key(
    master_key: &[u8],
    key_len: usize,
    is_send: bool,
    is_server: bool,
) -> Result<Zeroizing<Vec<u8>>> {
    check_len("MPPE master key", master_key, PASSWORD_HASH_LEN)?;
    if key_len == 0 || key_len > SHA1_LEN {
        return Err(ChapError::InvalidKeyLength {
            len: key_len,
            max: SHA1_LEN,
        });
    }
    log::trace!(
        "deriving MS-CHAPv2 MPPE start key (len={key_len}, send={is_send}, server={is_server})"
    );

    let magic: &[u8] = if is_send == is_server {
        &RECV_KEY_MAGIC
    } else {
        &SEND_KEY_MAGIC
    };

    let mut sha1 = Sha1::new();
    sha1.update(master_key);
    sha1.update(SHS_PAD1);
    sha1.update(magic);
    sha1.update(SHS_PAD2);
    let digest = sha1.finalize();

    Ok(Zeroizing::new(digest[..key_len].to_vec()))
}

/// 64-bit (8-byte) send/receive start keys, derived as the server end of the link.
pub fn session_keys_64bit(password: &str, nt_response: &[u8]) -> Result<SessionKeys> {
    server_session_keys(password, nt_response, KeyStrength::Bits40.key_len())
}

/// 128-bit (16-byte) send/receive start keys, derived as the server end of the link.
pub fn session_keys_128bit(password: &str, nt_response: &[u8]) -> Result<SessionKeys> {
    server_session_keys(password, nt_response, KeyStrength::Bits128.key_len())
}

/// Send/receive start keys for the configured role and strength.
///
/// A client's keys are the server's keys swapped. 40- and 56-bit strengths produce 8-byte start
/// keys; the salt is applied when session keys are derived from them.
pub fn start_keys(password: &str, nt_response: &[u8], config: &MppeConfig) -> Result<SessionKeys> {
    derive_keys(
        password,
        nt_response,
        config.strength.key_len(),
        config.role.is_server(),
    )
}

fn server_session_keys(password: &str, nt_response: &[u8], key_len: usize) -> Result<SessionKeys> {
    derive_keys(password, nt_response, key_len, true)
}

fn derive_keys(
    password: &str,
    nt_response: &[u8],
    key_len: usize,
    is_server: bool,
) -> Result<SessionKeys> {
    check_len("NT response", nt_response, NT_RESPONSE_LEN)?;

    let hash = Zeroizing::new(nt_password_hash(password));
    let hash_hash = Zeroizing::new(hash_nt_password_hash(hash.as_slice())?);
    let master_key = Zeroizing::new(get_master_key(hash_hash.as_slice(), nt_response)?);

    let send = get_asymmetric_start_key(master_key.as_slice(), key_len, true, is_server)?;
    let recv = get_asymmetric_start_key(master_key.as_slice(), key_len, false, is_server)?;
    Ok(SessionKeys {
        send: send.to_vec(),
        recv: recv.to_vec(),
    })
}
