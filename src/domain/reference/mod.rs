use std::collections::{HashMap, HashSet};

use itertools::Itertools;
use tracing::warn;

use super::transaction::{normalize, Transaction};

/// Lookup from a normalised bank reference to the members it pays for.
///
/// One reference may cover several members, e.g. a family paying with a
/// single standing order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReferenceMap {
    references: HashMap<String, Vec<String>>,
}

impl ReferenceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `member_ids` under `reference`.
    ///
    /// Blank and repeated ids are dropped. Returns `false` and leaves the map
    /// untouched when the normalised reference is already present: the first
    /// registration wins.
    pub fn insert<I, S>(&mut self, reference: &str, member_ids: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let reference = normalize(reference);
        if self.references.contains_key(&reference) {
            return false;
        }

        let member_ids = member_ids
            .into_iter()
            .map(|id| id.as_ref().trim().to_owned())
            .filter(|id| !id.is_empty())
            .unique()
            .collect();
        self.references.insert(reference, member_ids);
        true
    }

    /// Build a map from `(reference, member ids)` pairs, returning the
    /// normalised references that were seen more than once.
    pub fn from_entries<I, S>(entries: impl IntoIterator<Item = (S, I)>) -> (Self, Vec<String>)
    where
        S: AsRef<str>,
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut map = Self::new();
        let mut duplicates = Vec::new();
        for (reference, member_ids) in entries {
            if !map.insert(reference.as_ref(), member_ids) {
                duplicates.push(normalize(reference.as_ref()));
            }
        }

        (map, duplicates)
    }

    pub fn get(&self, reference: &str) -> Option<&[String]> {
        self.references.get(reference).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.references.len()
    }

    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }
}

/// A set of member ids that remembers insertion order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MemberIdSet {
    seen: HashSet<String>,
    ordered: Vec<String>,
}

impl MemberIdSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if `id` was already present.
    pub fn insert(&mut self, id: &str) -> bool {
        if !self.seen.insert(id.to_owned()) {
            return false;
        }
        self.ordered.push(id.to_owned());
        true
    }

    pub fn contains(&self, id: &str) -> bool {
        self.seen.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ordered.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.ordered
    }
}

impl<'a> FromIterator<&'a str> for MemberIdSet {
    fn from_iter<T: IntoIterator<Item = &'a str>>(iter: T) -> Self {
        let mut set = Self::new();
        for id in iter {
            set.insert(id);
        }
        set
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Identified {
    pub member_ids: MemberIdSet,
    pub unmatched: Vec<Transaction>,
    /// Ids that were paid for more than once, in the order the repeat was seen.
    pub duplicates: Vec<String>,
}

/// Resolve each transaction's description to the members it pays for.
///
/// Transactions with no known reference are returned in `unmatched` in input
/// order. A member paid for more than once is only counted once and is
/// reported as a duplicate.
pub fn identify_members(transactions: &[Transaction], references: &ReferenceMap) -> Identified {
    let mut identified = Identified::default();

    for tx in transactions {
        let Some(member_ids) = references.get(tx.description()) else {
            identified.unmatched.push(tx.clone());
            continue;
        };

        for id in member_ids {
            if !identified.member_ids.insert(id) {
                warn!(
                    "member {id} already paid for, seen again in `{}` ({})",
                    tx.description(),
                    tx.amount()
                );
                identified.duplicates.push(id.clone());
            }
        }
    }

    identified
}
