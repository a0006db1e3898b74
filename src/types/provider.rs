//! Provider identity and processing mode.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported provider identities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    OpenAi,
    Gemini,
    DeepSeek,
    ThirdParty,
}

impl ProviderId {
    pub const ALL: [Self; 4] = [Self::OpenAi, Self::Gemini, Self::DeepSeek, Self::ThirdParty];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Gemini => "gemini",
            Self::DeepSeek => "deepseek",
            Self::ThirdParty => "thirdparty",
        }
    }

    /// Environment variable holding this provider's credential.
    pub const fn credential_env_var(self) -> &'static str {
        match self {
            Self::OpenAi => "OPENAI_API_KEY",
            Self::Gemini => "GEMINI_API_KEY",
            Self::DeepSeek => "DEEPSEEK_API_KEY",
            Self::ThirdParty => "THIRDPARTY_API_KEY",
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string names no known provider.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported provider: {0}")]
pub struct UnknownProvider(pub String);

impl FromStr for ProviderId {
    type Err = UnknownProvider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| UnknownProvider(s.to_string()))
    }
}

/// Writing-assistance mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Lengthen the passage with detail, dialogue and scenery.
    Expand,
    /// Improve wording while keeping length.
    Polish,
}

impl Mode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Expand => "expand",
            Self::Polish => "polish",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported mode: {0}")]
pub struct UnknownMode(pub String);

impl FromStr for Mode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "expand" => Ok(Self::Expand),
            "polish" => Ok(Self::Polish),
            other => Err(UnknownMode(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_ids_round_trip_through_strings() {
        for id in ProviderId::ALL {
            assert_eq!(id.as_str().parse::<ProviderId>(), Ok(id));
            assert_eq!(
                serde_json::to_string(&id).unwrap(),
                format!("\"{}\"", id.as_str())
            );
        }
        assert!("anthropic".parse::<ProviderId>().is_err());
        assert!("OpenAI".parse::<ProviderId>().is_err());
    }

    #[test]
    fn only_two_modes_exist() {
        assert_eq!("expand".parse::<Mode>(), Ok(Mode::Expand));
        assert_eq!("polish".parse::<Mode>(), Ok(Mode::Polish));
        assert_eq!(
            "summarize".parse::<Mode>(),
            Err(UnknownMode("summarize".into()))
        );
    }
}
