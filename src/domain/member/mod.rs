use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A row of the membership roster.
#[derive(Debug, Default, Deserialize, Serialize, Hash, PartialEq, Eq, Clone)]
pub struct Member {
    #[serde(rename = "MemberId", default)]
    pub member_id: String,
    #[serde(rename = "Title", default)]
    pub title: String,
    #[serde(rename = "Forenames", default)]
    pub forenames: String,
    #[serde(rename = "Surname", default)]
    pub surname: String,
    #[serde(rename = "EmailAddress", default)]
    pub email_address: String,
}

/// The keys a member can be recognised by across two snapshots, most
/// significant first. Empty fields carry no identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity<'a> {
    pub primary: Option<&'a str>,
    pub secondary: Option<&'a str>,
}

impl Member {
    pub fn identity(&self) -> Identity<'_> {
        fn non_empty(field: &str) -> Option<&str> {
            (!field.is_empty()).then_some(field)
        }

        Identity {
            primary: non_empty(&self.member_id),
            secondary: non_empty(&self.email_address),
        }
    }

    /// Whether `self` and `other` are the same person.
    ///
    /// Member ids are compared when both sides have one, otherwise email
    /// addresses when both sides have one. Two members with neither are never
    /// the same person, not even when every field is equal.
    pub fn same_member(&self, other: &Member) -> bool {
        let (a, b) = (self.identity(), other.identity());
        match (a.primary, b.primary) {
            (Some(a), Some(b)) => a == b,
            _ => match (a.secondary, b.secondary) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }
}

/// Roster of known members keyed by member id.
pub type Roster = HashMap<String, Member>;

/// Build a [`Roster`]; a later row with the same id replaces an earlier one.
pub fn roster(members: impl IntoIterator<Item = Member>) -> Roster {
    members
        .into_iter()
        .map(|member| (member.member_id.clone(), member))
        .collect()
}

/// Look up each id in `roster`, in order, returning the members found and the
/// ids that are not on it.
pub fn match_members<'a>(
    roster: &Roster,
    member_ids: impl IntoIterator<Item = &'a str>,
) -> (Vec<Member>, Vec<String>) {
    let mut matched = Vec::new();
    let mut unmatched = Vec::new();

    for id in member_ids {
        match roster.get(id) {
            Some(member) => matched.push(member.clone()),
            None => unmatched.push(id.to_owned()),
        }
    }

    (matched, unmatched)
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RosterDiff {
    pub leavers: Vec<Member>,
    pub joiners: Vec<Member>,
}

/// Compare two member snapshots.
///
/// Leavers are the `previous` members with no counterpart in `current`,
/// joiners the `current` members with no counterpart in `previous`, each in
/// the order of its own list. See [`Member::same_member`] for what counts as
/// a counterpart.
// PERF: O(previous*current), rosters are a few thousand rows at most
pub fn diff(previous: &[Member], current: &[Member]) -> RosterDiff {
    let missing_from = |members: &[Member], others: &[Member]| -> Vec<Member> {
        members
            .iter()
            .filter(|member| !others.iter().any(|other| member.same_member(other)))
            .cloned()
            .collect()
    };

    RosterDiff {
        leavers: missing_from(previous, current),
        joiners: missing_from(current, previous),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn member(id: &str, title: &str, forenames: &str, surname: &str, email: &str) -> Member {
        Member {
            member_id: id.to_owned(),
            title: title.to_owned(),
            forenames: forenames.to_owned(),
            surname: surname.to_owned(),
            email_address: email.to_owned(),
        }
    }

    fn joe() -> Member {
        member("A123456", "Mr", "Joe", "Blogg", "joebloggs@example.com")
    }

    #[test]
    fn matches_ids_against_roster() {
        let roster = roster([joe()]);

        let (matched, unmatched) = match_members(&roster, ["A123456", "A789012"]);

        assert_eq!(matched, vec![joe()]);
        assert_eq!(unmatched, ["A789012"]);
    }

    #[test]
    fn later_roster_row_replaces_earlier() {
        let roster = roster([
            member("A1", "Mr", "Joe", "Blogg", "a@x"),
            member("A1", "Mr", "Joe", "Blogg", "b@x"),
        ]);

        let (matched, _) = match_members(&roster, ["A1"]);

        assert_eq!(roster.len(), 1);
        assert_eq!(matched, vec![member("A1", "Mr", "Joe", "Blogg", "b@x")]);
    }

    #[test]
    fn match_accounts_for_every_id() {
        let roster = roster([joe(), member("B1", "", "", "", "")]);
        let ids = ["B1", "X", "A123456", "Y", "Z"];

        let (matched, unmatched) = match_members(&roster, ids);

        assert_eq!(matched.len() + unmatched.len(), ids.len());
        assert_eq!(unmatched, ["X", "Y", "Z"]);
    }

    #[test]
    fn identifies_leavers_and_joiners() {
        let previous = vec![
            joe(),
            member("A789012", "Ms", "Jane", "Doe", "janedoe@example.com"),
            member("", "Mr", "Non", "Member", "nonmember@example.com"),
        ];
        let current = vec![
            joe(),
            member("", "Mr", "New", "Nonmember", "newnonmember@example.com"),
            member("3456789", "Mr", "New", "Member", "newmember@example.com"),
            member("A456789", "Mr", "Non", "Member", "nonmember@example.com"),
        ];

        let diff = diff(&previous, &current);

        assert_eq!(
            diff.leavers,
            vec![member("A789012", "Ms", "Jane", "Doe", "janedoe@example.com")]
        );
        assert_eq!(
            diff.joiners,
            vec![
                member("", "Mr", "New", "Nonmember", "newnonmember@example.com"),
                member("3456789", "Mr", "New", "Member", "newmember@example.com"),
            ]
        );
    }

    #[test]
    fn member_id_takes_precedence_over_email() {
        let before = member("A1", "", "", "", "shared@example.com");
        let after = member("B2", "", "", "", "shared@example.com");

        assert!(!before.same_member(&after));
        assert!(before.same_member(&member("A1", "Dr", "", "", "moved@example.com")));
    }

    #[test]
    fn no_change_means_no_diff() {
        let members = vec![
            joe(),
            member("", "Ms", "Jane", "Doe", "janedoe@example.com"),
            member("C3", "", "", "", ""),
        ];

        assert_eq!(diff(&members, &members), RosterDiff::default());
    }

    #[test]
    fn diff_is_mirrored_when_reversed() {
        let previous = vec![joe(), member("A2", "", "", "", "")];
        let current = vec![member("A3", "", "", "", ""), joe()];

        let forward = diff(&previous, &current);
        let backward = diff(&current, &previous);

        assert_eq!(forward.leavers, backward.joiners);
        assert_eq!(forward.joiners, backward.leavers);
    }

    #[test]
    fn anonymous_members_always_leave_and_join() {
        let anonymous = member("", "Mr", "No", "Details", "");

        let diff = diff(&[anonymous.clone()], &[anonymous.clone()]);

        assert_eq!(diff.leavers, vec![anonymous.clone()]);
        assert_eq!(diff.joiners, vec![anonymous]);
    }
}
