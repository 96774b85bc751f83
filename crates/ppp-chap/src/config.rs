//! Option types for the encodings and key sizes the protocols leave to local policy.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Windows ANSI codepage commonly used for the LM password buffer.
pub const DEFAULT_LM_CODEPAGE: u16 = 1252;

/// Options for LM password hashing.
///
/// LM hashing runs over an 8-bit encoding of the upper-cased password. Peers normally use the
/// machine's OEM/ANSI codepage; for ASCII passwords every supported codepage yields the same bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LmOptions {
    /// Windows codepage identifier (e.g. 1252). `65001` selects UTF-8.
    pub codepage: u16,
}

impl Default for LmOptions {
    fn default() -> Self {
        Self {
            codepage: DEFAULT_LM_CODEPAGE,
        }
    }
}

/// MPPE session key strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum KeyStrength {
    /// 40-bit keys: 8 bytes with the first 3 replaced by `D1 26 9E`.
    Bits40,
    /// 56-bit keys: 8 bytes with the first byte replaced by `D1`.
    Bits56,
    #[default]
    Bits128,
}

impl KeyStrength {
    /// Length in bytes of the key material carried for this strength.
    pub fn key_len(self) -> usize {
        match self {
            KeyStrength::Bits40 | KeyStrength::Bits56 => 8,
            KeyStrength::Bits128 => 16,
        }
    }
}

/// Which end of the link the caller is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Role {
    Client,
    #[default]
    Server,
}

impl Role {
    pub fn is_server(self) -> bool {
        self == Role::Server
    }
}

/// MPPE key derivation options for MS-CHAPv2 links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MppeConfig {
    pub strength: KeyStrength,
    pub role: Role,
}
