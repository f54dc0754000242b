use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Shutter opening size in centimetres, written as `<width>x<height>`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimension {
    pub width_cm: u32,
    pub height_cm: u32,
}

impl Dimension {
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let invalid = || DomainError::InvalidDimensionFormat(raw.to_owned());

        let (width, height) = raw.split_once('x').ok_or_else(invalid)?;
        let width = parse_component(width).ok_or_else(invalid)?;
        let height = parse_component(height).ok_or_else(invalid)?;

        Ok(Self { width_cm: width, height_cm: height })
    }
}

fn parse_component(raw: &str) -> Option<u32> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    trimmed.parse::<u32>().ok().filter(|value| *value > 0)
}

impl FromStr for Dimension {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width_cm, self.height_cm)
    }
}

#[cfg(test)]
mod tests {
    use super::Dimension;
    use crate::errors::DomainError;

    #[test]
    fn parses_width_and_height() {
        let dimension = Dimension::parse("120x100").expect("valid dimension");
        assert_eq!(dimension, Dimension { width_cm: 120, height_cm: 100 });
        assert_eq!(dimension.to_string(), "120x100");
    }

    #[test]
    fn tolerates_whitespace_around_components() {
        let dimension = Dimension::parse(" 90 x 210 ").expect("padded dimension");
        assert_eq!(dimension, Dimension { width_cm: 90, height_cm: 210 });
    }

    #[test]
    fn rejects_malformed_input() {
        for raw in ["", "abcx100", "120-100", "120x", "x100", "120x100x50", "0x100", "-5x10"] {
            let error = Dimension::parse(raw).expect_err("input should be rejected");
            assert_eq!(error, DomainError::InvalidDimensionFormat(raw.to_owned()), "{raw}");
        }
    }
}
