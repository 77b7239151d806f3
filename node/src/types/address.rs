use super::errors::TypeError;
use serde::{Deserialize, Serialize};
use std::{convert::TryFrom, fmt, str::FromStr};

const ADDRESS_HEX_LEN: usize = 40;

/// Contract address in its normalized form: 40 lowercase hex chars, no `0x` prefix.
///
/// Normalized form is what the artifact store uses as file key and
/// what the registry index uses as the address map key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    /// Strip `0x` prefix and lowercase, without validating the result.
    ///
    /// Used where a token might be either an address or a friendly name.
    pub fn normalize(raw: &str) -> String {
        let lower = raw.to_lowercase();
        match lower.strip_prefix("0x") {
            Some(stripped) => stripped.to_string(),
            None => lower,
        }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Address with `0x` prefix
    #[inline]
    pub fn to_prefixed(&self) -> String {
        format!("0x{}", self.0)
    }
}

impl FromStr for Address {
    type Err = TypeError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = Self::normalize(raw);
        if normalized.len() != ADDRESS_HEX_LEN {
            return Err(TypeError::source_len("Address", ADDRESS_HEX_LEN, raw));
        }
        if !normalized.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(TypeError::parse_field_raw("Address", raw));
        }
        Ok(Self(normalized))
    }
}

impl TryFrom<String> for Address {
    type Error = TypeError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        raw.parse()
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
