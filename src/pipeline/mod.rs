//! Reconciling a month of bank credits against the membership records.

use crate::domain::{
    fees::FeeSchedule,
    member::{self, Member, Roster},
    reference::{self, ReferenceMap},
    transaction::{self, Transaction},
};

/// Everything known about the membership before looking at the bank.
#[derive(Debug, Default, Clone)]
pub struct Membership {
    pub references: ReferenceMap,
    pub roster: Roster,
    pub new_members: Vec<Member>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Transactions {
    /// Amounts that are not a membership fee at all.
    pub ignored: Vec<Transaction>,
    /// Accepted fees that are not the current correct amount.
    pub incorrect: Vec<Transaction>,
    pub candidate: Vec<Transaction>,
    /// Candidates whose reference is unknown.
    pub unmatched: Vec<Transaction>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Members {
    pub paying: Vec<Member>,
    pub unmatched_ids: Vec<String>,
    pub duplicate_ids: Vec<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ActiveMembers {
    pub transactions: Transactions,
    pub members: Members,
}

impl Membership {
    pub fn new(references: ReferenceMap, roster: Roster, new_members: Vec<Member>) -> Self {
        Self {
            references,
            roster,
            new_members,
        }
    }

    pub fn reconcile(&self, transactions: &[Transaction], fees: &FeeSchedule) -> ActiveMembers {
        let (candidate, ignored) =
            transaction::filter_interesting(transactions, fees.interesting());
        let (_, incorrect) = transaction::filter_interesting(&candidate, fees.correct());

        let identified = reference::identify_members(&candidate, &self.references);
        let (paying, unmatched_ids) =
            member::match_members(&self.roster, identified.member_ids.iter());

        ActiveMembers {
            transactions: Transactions {
                ignored,
                incorrect,
                candidate,
                unmatched: identified.unmatched,
            },
            members: Members {
                paying,
                unmatched_ids,
                duplicate_ids: identified.duplicates,
            },
        }
    }

    /// The member snapshot for this run: paying members followed by the
    /// members who joined since the roster was exported.
    pub fn all_members(&self, active: &ActiveMembers) -> Vec<Member> {
        active
            .members
            .paying
            .iter()
            .chain(&self.new_members)
            .cloned()
            .collect()
    }
}

impl ActiveMembers {
    pub fn transaction_count(&self) -> usize {
        self.transactions.candidate.len() + self.transactions.ignored.len()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::domain::{member::roster, money::Amount};

    fn tx(description: &str, amount: rust_decimal::Decimal) -> Transaction {
        Transaction::new(description, Amount::new(amount))
    }

    fn member(id: &str, email: &str) -> Member {
        Member {
            member_id: id.to_owned(),
            email_address: email.to_owned(),
            ..Member::default()
        }
    }

    fn membership() -> Membership {
        let (references, _) = ReferenceMap::from_entries([
            ("JOE BLOGGS", vec!["A1", "A2"]),
            ("JANE DOE", vec!["B1"]),
            ("GHOST", vec!["Z9"]),
        ]);
        Membership::new(
            references,
            roster([member("A1", "a1@x"), member("A2", "a2@x"), member("B1", "b1@x")]),
            vec![member("N1", "n1@x")],
        )
    }

    #[test]
    fn runs_every_stage() {
        let fees = FeeSchedule::new(
            [Amount::new(dec!(30))],
            [Amount::new(dec!(25)), Amount::new(dec!(15))],
        );
        let txns = vec![
            tx("joe bloggs", dec!(30.00)),
            tx("TESCO", dec!(12.99)),
            tx("jane doe", dec!(25)),
            tx("stranger", dec!(15)),
            tx("ghost", dec!(30)),
        ];

        let active = membership().reconcile(&txns, &fees);

        assert_eq!(active.transactions.ignored, vec![tx("TESCO", dec!(12.99))]);
        assert_eq!(
            active.transactions.incorrect,
            vec![tx("JANE DOE", dec!(25)), tx("STRANGER", dec!(15))]
        );
        assert_eq!(active.transactions.candidate.len(), 4);
        assert_eq!(active.transactions.unmatched, vec![tx("STRANGER", dec!(15))]);
        assert_eq!(
            active.members.paying,
            vec![member("A1", "a1@x"), member("A2", "a2@x"), member("B1", "b1@x")]
        );
        assert_eq!(active.members.unmatched_ids, ["Z9"]);
        assert!(active.members.duplicate_ids.is_empty());
        assert_eq!(active.transaction_count(), txns.len());
    }

    #[test]
    fn snapshot_appends_new_members() {
        let membership = membership();
        let active = membership.reconcile(&[tx("jane doe", dec!(30))], &FeeSchedule::default());

        let all = membership.all_members(&active);

        assert_eq!(all, vec![member("B1", "b1@x"), member("N1", "n1@x")]);
    }

    #[test]
    fn repeat_payments_count_once() {
        let membership = membership();
        let txns = vec![tx("JANE DOE", dec!(30)), tx("JANE DOE", dec!(18.5))];

        let active = membership.reconcile(&txns, &FeeSchedule::default());

        assert_eq!(active.members.paying, vec![member("B1", "b1@x")]);
        assert_eq!(active.members.duplicate_ids, ["B1"]);
    }
}
