use derive_more::{Deref, From, Into};
use palette::Srgb;
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid hex colour '{0}'")]
pub struct SwatchError(String);

/// A colour written as `#rrggbb` in configuration.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Deref, From, Into, DeserializeFromStr, SerializeDisplay,
)]
pub struct Swatch(Srgb<u8>);

impl Swatch {
    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self(Srgb::new(red, green, blue))
    }

    pub fn components(&self) -> (f64, f64, f64) {
        self.0.into_format::<f64>().into_components()
    }
}

impl FromStr for Swatch {
    type Err = SwatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim();
        // palette accepts both "#rrggbb" and "rrggbb", plus the short form.
        Srgb::<u8>::from_str(hex)
            .map(Self)
            .map_err(|_| SwatchError(hex.to_string()))
    }
}

impl fmt::Display for Swatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0.red, self.0.green, self.0.blue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swatch_parsing() {
        let cases = vec![
            ("\"#ff85a2\"", Swatch::rgb(0xff, 0x85, 0xa2)),
            ("\"ff6b9d\"", Swatch::rgb(0xff, 0x6b, 0x9d)),
            ("\" #FFC4D6 \"", Swatch::rgb(0xff, 0xc4, 0xd6)),
        ];

        for (json, expected) in cases {
            let parsed: Swatch = serde_json::from_str(json).unwrap();
            assert_eq!(parsed, expected);
        }
    }

    #[test]
    fn test_swatch_rejects_garbage() {
        assert!("pink".parse::<Swatch>().is_err());
        assert!(serde_json::from_str::<Swatch>("\"#12\"").is_err());
    }

    #[test]
    fn test_swatch_display_round_trips_through_config_text() {
        let swatch = Swatch::rgb(0xff, 0x4d, 0x7d);
        assert_eq!(swatch.to_string(), "#ff4d7d");
        assert_eq!(serde_json::to_string(&swatch).unwrap(), "\"#ff4d7d\"");
    }
}
