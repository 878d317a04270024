use std::collections::HashSet;

use itertools::Itertools;

use super::member::Member;

/// Addresses to mail: every member's address plus those who opted in without
/// being members, less anybody who asked to be removed.
///
/// Blank addresses are skipped and the result keeps first-seen order.
pub fn create_email_list(
    members: &[Member],
    consenting: &[String],
    withdrawn: &[String],
) -> Vec<String> {
    let withdrawn: HashSet<&str> = withdrawn.iter().map(String::as_str).collect();

    members
        .iter()
        .map(|member| member.email_address.as_str())
        .chain(consenting.iter().map(String::as_str))
        .filter(|email| !email.is_empty() && !withdrawn.contains(email))
        .unique()
        .map(str::to_owned)
        .collect()
}
