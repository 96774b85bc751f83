//! MS-CHAPv2 (RFC 2759).
//!
//! The peer proves knowledge of the password with a 24-byte NT-Response computed over an 8-byte
//! challenge hash of both challenges and the user name. The authenticator proves it back with the
//! `S=` authenticator response. Every fixed-length argument is checked before any hashing
//! happens; a wrong length yields [`ChapError::InvalidLength`] rather than a response.

pub mod mppe;
pub mod password_change;

use md4::Md4;
use sha1::{Digest as _, Sha1};
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use crate::error::{check_len, ChapError, Result};
use crate::mppe::SHA1_LEN;
use crate::mschapv1;
use crate::{
    AUTHENTICATOR_RESPONSE_LEN, MSCHAPV2_CHALLENGE_LEN, MSCHAP_CHALLENGE_LEN, NT_RESPONSE_LEN,
    PASSWORD_HASH_LEN,
};

/// `Magic1` of `GenerateAuthenticatorResponse` (39 octets).
pub const MAGIC_SERVER_TO_CLIENT_SIGNING: [u8; 39] = *b"Magic server to client signing constant";
/// `Magic2` of `GenerateAuthenticatorResponse` (41 octets).
pub const MAGIC_PAD_MORE_THAN_ONE_ITERATION: [u8; 41] =
    *b"Pad to make it do more than one iteration";

const AUTHENTICATOR_RESPONSE_PREFIX: &str = "S=";

/// `ChallengeHash`: `SHA1(peer_challenge || authenticator_challenge || username)[..8]`.
///
/// `username` must be ASCII; anything else is rejected with [`ChapError::NonAsciiUsername`]
/// rather than hashed in an encoding peers would not reproduce.
pub fn challenge_hash(
    peer_challenge: &[u8],
    authenticator_challenge: &[u8],
    username: &str,
) -> Result<[u8; MSCHAP_CHALLENGE_LEN]> {
    check_len("peer challenge", peer_challenge, MSCHAPV2_CHALLENGE_LEN)?;
    check_len(
        "authenticator challenge",
        authenticator_challenge,
        MSCHAPV2_CHALLENGE_LEN,
    )?;
    if !username.is_ascii() {
        log::debug!("rejecting non-ASCII MS-CHAPv2 user name");
        return Err(ChapError::NonAsciiUsername);
    }

    let mut sha1 = Sha1::new();
    sha1.update(peer_challenge);
    sha1.update(authenticator_challenge);
    sha1.update(username.as_bytes());
    let digest = sha1.finalize();

    let mut challenge = [0u8; MSCHAP_CHALLENGE_LEN];
    challenge.copy_from_slice(&digest[..MSCHAP_CHALLENGE_LEN]);
    Ok(challenge)
}

/// `HashNtPasswordHash`: MD4 of a 16-byte NT password hash.
pub fn hash_nt_password_hash(password_hash: &[u8]) -> Result<[u8; PASSWORD_HASH_LEN]> {
    check_len("NT password hash", password_hash, PASSWORD_HASH_LEN)?;
    Ok(Md4::digest(password_hash).into())
}

/// `GenerateNTResponse`: MS-CHAPv1 `ChallengeResponse` over the challenge hash and NT hash.
pub fn generate_nt_response(
    authenticator_challenge: &[u8],
    peer_challenge: &[u8],
    username: &str,
    password: &str,
) -> Result<[u8; NT_RESPONSE_LEN]> {
    let challenge = challenge_hash(peer_challenge, authenticator_challenge, username)?;
    let password_hash = Zeroizing::new(mschapv1::nt_password_hash(password));
    mschapv1::challenge_response(&challenge, password_hash.as_slice())
}

/// Authenticator-side check of the peer's NT-Response.
pub fn verify_nt_response(
    authenticator_challenge: &[u8],
    peer_challenge: &[u8],
    username: &str,
    password: &str,
    nt_response: &[u8],
) -> Result<()> {
    check_len("NT response", nt_response, NT_RESPONSE_LEN)?;
    let expected =
        generate_nt_response(authenticator_challenge, peer_challenge, username, password)?;
    if bool::from(expected.as_slice().ct_eq(nt_response)) {
        Ok(())
    } else {
        Err(ChapError::ResponseMismatch)
    }
}

/// `GenerateAuthenticatorResponse`: `"S="` followed by 40 upper-case hex digits.
///
/// Fails with [`ChapError::InvalidLength`] when `nt_response` is not 24 bytes or either
/// challenge is not 16 bytes.
pub fn generate_authenticator_response(
    password: &str,
    nt_response: &[u8],
    peer_challenge: &[u8],
    authenticator_challenge: &[u8],
    username: &str,
) -> Result<String> {
    let digest = authenticator_response_digest(
        password,
        nt_response,
        peer_challenge,
        authenticator_challenge,
        username,
    )?;

    let mut out = String::with_capacity(AUTHENTICATOR_RESPONSE_LEN);
    out.push_str(AUTHENTICATOR_RESPONSE_PREFIX);
    out.push_str(&hex::encode_upper(digest));
    Ok(out)
}

/// Peer-side check of the authenticator's `S=` response (RFC 2759 section 8.8).
///
/// Hex digits are accepted in either case.
pub fn check_authenticator_response(
    password: &str,
    nt_response: &[u8],
    peer_challenge: &[u8],
    authenticator_challenge: &[u8],
    username: &str,
    received: &str,
) -> Result<()> {
    let received = parse_authenticator_response(received)?;
    let expected = authenticator_response_digest(
        password,
        nt_response,
        peer_challenge,
        authenticator_challenge,
        username,
    )?;
    if bool::from(expected.as_slice().ct_eq(&received)) {
        Ok(())
    } else {
        Err(ChapError::AuthenticatorMismatch)
    }
}

fn parse_authenticator_response(received: &str) -> Result<[u8; SHA1_LEN]> {
    let digits = received
        .strip_prefix(AUTHENTICATOR_RESPONSE_PREFIX)
        .filter(|digits| digits.len() == SHA1_LEN * 2)
        .ok_or(ChapError::MalformedAuthenticatorResponse)?;
    let mut digest = [0u8; SHA1_LEN];
    hex::decode_to_slice(digits, &mut digest)
        .map_err(|_| ChapError::MalformedAuthenticatorResponse)?;
    Ok(digest)
}

fn authenticator_response_digest(
    password: &str,
    nt_response: &[u8],
    peer_challenge: &[u8],
    authenticator_challenge: &[u8],
    username: &str,
) -> Result<[u8; SHA1_LEN]> {
    check_len("NT response", nt_response, NT_RESPONSE_LEN)?;
    let challenge = challenge_hash(peer_challenge, authenticator_challenge, username)?;

    let password_hash = Zeroizing::new(mschapv1::nt_password_hash(password));
    let password_hash_hash = Zeroizing::new(hash_nt_password_hash(password_hash.as_slice())?);

    let mut sha1 = Sha1::new();
    sha1.update(password_hash_hash.as_slice());
    sha1.update(nt_response);
    sha1.update(MAGIC_SERVER_TO_CLIENT_SIGNING);
    let password_digest = sha1.finalize();

    let mut sha1 = Sha1::new();
    sha1.update(password_digest);
    sha1.update(challenge);
    sha1.update(MAGIC_PAD_MORE_THAN_ONE_ITERATION);
    Ok(sha1.finalize().into())
}
