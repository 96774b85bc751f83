//! Password encodings the hash functions run over.

use encoding_rs::{
    Encoding, UTF_8, WINDOWS_1250, WINDOWS_1251, WINDOWS_1252, WINDOWS_1253, WINDOWS_1254,
    WINDOWS_1255, WINDOWS_1256, WINDOWS_1257, WINDOWS_1258, WINDOWS_874,
};
use zeroize::Zeroizing;

use crate::config::LmOptions;
use crate::error::{ChapError, Result};

/// Width of the LM password buffer; longer passwords are silently truncated.
pub const LM_PASSWORD_LEN: usize = 14;

/// UTF-16LE encoding of `password` (the NT hash input).
pub(crate) fn password_to_utf16le_bytes(password: &str) -> Zeroizing<Vec<u8>> {
    let mut out = Zeroizing::new(Vec::with_capacity(password.len() * 2));
    for unit in password.encode_utf16() {
        out.extend_from_slice(&unit.to_le_bytes());
    }
    out
}

/// Number of UTF-16 code units `password` encodes to.
pub(crate) fn utf16_len(password: &str) -> usize {
    password.encode_utf16().count()
}

// Only 8-bit codepages (plus UTF-8) are meaningful for the fixed 14-byte LM buffer.
fn encoding_for_codepage(codepage: u16) -> Option<&'static Encoding> {
    Some(match codepage as u32 {
        874 => WINDOWS_874,
        1250 => WINDOWS_1250,
        1251 => WINDOWS_1251,
        1252 => WINDOWS_1252,
        1253 => WINDOWS_1253,
        1254 => WINDOWS_1254,
        1255 => WINDOWS_1255,
        1256 => WINDOWS_1256,
        1257 => WINDOWS_1257,
        1258 => WINDOWS_1258,
        65001 => UTF_8,
        _ => return None,
    })
}

/// Build the 14-byte LM password buffer: upper-case, encode, zero-pad or truncate.
///
/// Truncation past 14 bytes is part of the protocol (peers do the same), not an error.
pub(crate) fn lm_password_buffer(
    password: &str,
    options: &LmOptions,
) -> Result<Zeroizing<[u8; LM_PASSWORD_LEN]>> {
    let encoding = encoding_for_codepage(options.codepage)
        .ok_or(ChapError::UnsupportedCodepage(options.codepage))?;

    let upper = Zeroizing::new(password.to_uppercase());
    let (encoded, _, had_errors) = encoding.encode(upper.as_str());
    let encoded = Zeroizing::new(encoded.into_owned());
    if had_errors {
        return Err(ChapError::UnencodablePassword {
            codepage: options.codepage,
        });
    }

    if encoded.len() > LM_PASSWORD_LEN {
        log::debug!(
            "LM password is {} bytes; truncating to {LM_PASSWORD_LEN}",
            encoded.len()
        );
    }

    let mut buf = Zeroizing::new([0u8; LM_PASSWORD_LEN]);
    let n = encoded.len().min(LM_PASSWORD_LEN);
    buf[..n].copy_from_slice(&encoded[..n]);
    Ok(buf)
}
