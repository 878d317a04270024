use serde::Serialize;

use super::{error::Result, money::Amount};

/// A credit on the bank account.
///
/// The description is trimmed and upper-cased on construction so it can be
/// looked up directly against normalised references.
#[derive(Debug, Serialize, Hash, PartialEq, Eq, Clone)]
pub struct Transaction {
    #[serde(rename = "Description")]
    description: String,
    #[serde(rename = "Amount")]
    amount: Amount,
}

impl Transaction {
    pub fn new(description: &str, amount: Amount) -> Self {
        Self {
            description: normalize(description),
            amount,
        }
    }

    /// Build a transaction from the raw `amount` text of a ledger row.
    pub fn parse(description: &str, amount: &str) -> Result<Self> {
        Ok(Self::new(description, amount.parse()?))
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }
}

/// Trim and upper-case a free text bank reference.
pub fn normalize(reference: &str) -> String {
    reference.trim().to_uppercase()
}

/// Split `transactions` into those whose amount is one of `amounts` and the
/// rest, keeping the input order on both sides.
pub fn filter_interesting(
    transactions: &[Transaction],
    amounts: &[Amount],
) -> (Vec<Transaction>, Vec<Transaction>) {
    transactions
        .iter()
        .cloned()
        .partition(|tx| amounts.contains(&tx.amount))
}
