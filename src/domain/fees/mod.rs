use itertools::Itertools;
use rust_decimal::Decimal;

use super::money::Amount;

/// The fee amounts a deposit can carry to count as a membership payment.
///
/// `correct` holds the current official fees. `interesting` is the union of
/// those with older or otherwise accepted amounts, so every correct amount is
/// always interesting as well.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeeSchedule {
    correct: Vec<Amount>,
    interesting: Vec<Amount>,
}

impl FeeSchedule {
    pub fn new(
        correct: impl IntoIterator<Item = Amount>,
        other: impl IntoIterator<Item = Amount>,
    ) -> Self {
        let correct: Vec<_> = correct.into_iter().unique().collect();
        let interesting = correct
            .iter()
            .copied()
            .chain(other)
            .unique()
            .collect();

        Self {
            correct,
            interesting,
        }
    }

    pub fn correct(&self) -> &[Amount] {
        &self.correct
    }

    pub fn interesting(&self) -> &[Amount] {
        &self.interesting
    }
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self::new(
            [Decimal::new(1850, 2), Decimal::new(30, 0)].map(Amount::new),
            [
                Decimal::new(1650, 2),
                Decimal::new(15, 0),
                Decimal::new(18, 0),
                Decimal::new(25, 0),
            ]
            .map(Amount::new),
        )
    }
}
