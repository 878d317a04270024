use std::{fmt, str::FromStr};

use rust_decimal::Decimal;
use serde::{de, Deserialize, Deserializer, Serialize};

use super::error::{Error, Result};

/// An exact decimal sum of money.
///
/// Equality is numeric, so `15`, `15.0` and `15.00` are the same amount even
/// though each keeps its own scale when displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Amount(Decimal);

impl Amount {
    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }
}

impl FromStr for Amount {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        Decimal::from_str_exact(trimmed)
            .map(Self)
            .map_err(|source| Error::InvalidAmount {
                value: s.to_owned(),
                source,
            })
    }
}

/// Amounts are only accepted as decimal strings and parsed exactly, the same
/// way as ledger amounts.
impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn equality_ignores_scale() {
        assert_eq!(Amount::new(dec!(15)), Amount::new(dec!(15.00)));
        assert_eq!("18.5".parse::<Amount>().unwrap(), Amount::new(dec!(18.50)));
    }

    #[test]
    fn no_floating_point_drift() {
        let sum = Amount::new(dec!(0.1).checked_add(dec!(0.2)).unwrap());
        assert_eq!(sum, "0.3".parse().unwrap());
    }

    #[test]
    fn display_keeps_parsed_scale() {
        assert_eq!(" 30.00 ".parse::<Amount>().unwrap().to_string(), "30.00");
    }

    #[test]
    fn deserializes_from_strings_only() {
        #[derive(Debug, Deserialize)]
        struct Fee {
            amount: Amount,
        }

        let fee: Fee = toml::from_str(r#"amount = "18.50""#).unwrap();
        assert_eq!(fee.amount, Amount::new(dec!(18.5)));

        assert!(toml::from_str::<Fee>("amount = 18.5").is_err());
        assert!(toml::from_str::<Fee>(r#"amount = "1.00000000000000000000000000001""#).is_err());
    }

    #[test]
    fn rejects_garbage() {
        let err = "twelve".parse::<Amount>().unwrap_err();
        assert!(matches!(err, Error::InvalidAmount { ref value, .. } if value == "twelve"));
        assert!("".parse::<Amount>().is_err());
    }
}
