//! Fact polarity (spec §3): whether a fact asserts or denies its predicate.

use crate::error::FactError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    Assert,
    Deny,
}

impl Polarity {
    pub fn code(self) -> u8 {
        match self {
            Polarity::Assert => 0x01,
            Polarity::Deny => 0x02,
        }
    }

    pub fn from_code(code: u8) -> Result<Self, FactError> {
        match code {
            0x01 => Ok(Polarity::Assert),
            0x02 => Ok(Polarity::Deny),
            other => Err(FactError::UnknownDiscriminant {
                what: "polarity",
                value: other,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_known_codes() {
        assert_eq!(Polarity::from_code(Polarity::Assert.code()).unwrap(), Polarity::Assert);
        assert_eq!(Polarity::from_code(Polarity::Deny.code()).unwrap(), Polarity::Deny);
    }

    #[test]
    fn rejects_unknown_code() {
        assert!(Polarity::from_code(0xff).is_err());
    }
}
