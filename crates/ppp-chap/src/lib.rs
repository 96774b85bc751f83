//! CHAP, MS-CHAP and MPPE key derivation for PPP/VPN stacks.
//!
//! This crate currently supports:
//! - CHAP with MD5 (RFC 1994)
//! - MS-CHAPv1 LM/NT password hashes and challenge responses (RFC 2433)
//! - MS-CHAPv2 NT-Response, authenticator response and password change blocks (RFC 2759)
//! - MPPE start/session keys for both MS-CHAP generations (RFC 3078, RFC 3079)
//!
//! Every operation is a pure function of its arguments. Fixed-length inputs are checked before
//! use and reported as [`ChapError::InvalidLength`]; nothing is silently truncated except where
//! the protocol itself truncates (the 14-byte LM password buffer).

pub mod chap;
pub mod config;
pub mod des;
mod error;
pub mod mppe;
pub mod mschapv1;
pub mod mschapv2;
mod password;

pub use config::{KeyStrength, LmOptions, MppeConfig, Role};
pub use error::{ChapError, Result};
pub use mppe::SessionKeys;
pub use password::LM_PASSWORD_LEN;

/// CHAP-MD5 response value.
pub const CHAP_RESPONSE_LEN: usize = 16;
/// MS-CHAPv1 challenge, and the MS-CHAPv2 challenge hash.
pub const MSCHAP_CHALLENGE_LEN: usize = 8;
/// MS-CHAPv2 peer and authenticator challenges.
pub const MSCHAPV2_CHALLENGE_LEN: usize = 16;
/// LM/NT password hashes and the NT hash-hash.
pub const PASSWORD_HASH_LEN: usize = 16;
/// MS-CHAP challenge responses (LM, NT, MS-CHAPv2 NT-Response).
pub const NT_RESPONSE_LEN: usize = 24;
/// `S=` plus 40 hex digits.
pub const AUTHENTICATOR_RESPONSE_LEN: usize = 42;
/// MS-CHAPv2 encrypted new-password block.
pub const ENCRYPTED_PASSWORD_BLOCK_LEN: usize = 516;
