use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Platform a resource or category targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Pc,
    Android,
    Ios,
    Mobile,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid platform: {0}")]
pub struct InvalidPlatform(pub String);

impl Platform {
    pub const ALL: [Platform; 5] = [
        Platform::Pc,
        Platform::Android,
        Platform::Ios,
        Platform::Mobile,
        Platform::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Pc => "pc",
            Platform::Android => "android",
            Platform::Ios => "ios",
            Platform::Mobile => "mobile",
            Platform::Other => "other",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Platform {
    type Err = InvalidPlatform;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pc" => Ok(Platform::Pc),
            "android" => Ok(Platform::Android),
            "ios" => Ok(Platform::Ios),
            "mobile" => Ok(Platform::Mobile),
            "other" => Ok(Platform::Other),
            _ => Err(InvalidPlatform(s.to_string())),
        }
    }
}

impl TryFrom<String> for Platform {
    type Error = InvalidPlatform;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_display_value() {
        for platform in Platform::ALL {
            assert_eq!(platform.to_string().parse::<Platform>(), Ok(platform));
        }
    }

    #[test]
    fn parsing_is_exact() {
        assert!("PC".parse::<Platform>().is_err());
        assert!("windows".parse::<Platform>().is_err());
        assert!("".parse::<Platform>().is_err());
    }
}
