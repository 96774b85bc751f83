use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChapError {
    #[error("{field} must be {expected} bytes, got {actual}")]
    InvalidLength {
        field: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("invalid MPPE key length {len}; expected 1..={max} bytes")]
    InvalidKeyLength { len: usize, max: usize },
    #[error("unsupported LM codepage {0}")]
    UnsupportedCodepage(u16),
    #[error("password cannot be encoded in codepage {codepage}")]
    UnencodablePassword { codepage: u16 },
    #[error("password is {len} UTF-16 code units; at most {max} are allowed")]
    PasswordTooLong { len: usize, max: usize },
    #[error("MS-CHAPv2 user names must be ASCII")]
    NonAsciiUsername,
    #[error("{primitive} rejected its key")]
    Primitive { primitive: &'static str },
    #[error("challenge response does not match")]
    ResponseMismatch,
    #[error("authenticator response does not match")]
    AuthenticatorMismatch,
    #[error("malformed authenticator response; expected \"S=\" followed by 40 hex digits")]
    MalformedAuthenticatorResponse,
    #[error("invalid encrypted password block: {0}")]
    InvalidPasswordBlock(&'static str),
}

pub type Result<T> = std::result::Result<T, ChapError>;

/// Reject `bytes` unless it is exactly `expected` long.
pub(crate) fn check_len(field: &'static str, bytes: &[u8], expected: usize) -> Result<()> {
    if bytes.len() != expected {
        log::debug!(
            "rejecting {field}: expected {expected} bytes, got {}",
            bytes.len()
        );
        return Err(ChapError::InvalidLength {
            field,
            expected,
            actual: bytes.len(),
        });
    }
    Ok(())
}

/// Length-check `bytes` and copy it into a fixed-size array.
pub(crate) fn to_array<const N: usize>(field: &'static str, bytes: &[u8]) -> Result<[u8; N]> {
    check_len(field, bytes, N)?;
    let mut out = [0u8; N];
    out.copy_from_slice(bytes);
    Ok(out)
}
