//! A full run over one period: load the inputs, reconcile, write the reports.
//!
//! Reports are written one by one as they become available, so a run that
//! fails part way leaves an incomplete output folder behind.

use std::{fs, path::Path};

use tracing::info;

use crate::{
    config::{self, Layout},
    csv,
    domain::{email, fees::FeeSchedule, member, transaction::Transaction},
    error::Result,
    pipeline::Membership,
};

/// Counts of what a run produced.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Summary {
    pub transactions: usize,
    pub ignored: usize,
    pub incorrect: usize,
    pub unmatched_transactions: usize,
    pub unmatched_member_ids: usize,
    pub paying: usize,
    pub all_members: usize,
    pub emails: usize,
    /// `None` when there was no previous snapshot to compare against.
    pub leavers: Option<usize>,
    pub joiners: Option<usize>,
}

pub fn load_membership(layout: &Layout) -> Result<Membership> {
    let references = csv::load_references(&layout.source(config::REFERENCES_FILE))?;
    info!("Loaded {} references.", references.len());

    let roster = csv::load_roster(&layout.source(config::ROSTER_FILE))?;
    info!("Loaded {} members details.", roster.len());

    let new_members = csv::load_members(&layout.source(config::NEW_MEMBERS_FILE))?;
    info!("Loaded {} new members details.", new_members.len());

    Ok(Membership::new(references, roster, new_members))
}

pub fn run(layout: &Layout, fees: &FeeSchedule) -> Result<Summary> {
    let membership = load_membership(layout)?;

    let transactions = csv::load_transactions(&layout.current_source(config::TRANSACTIONS_FILE))?;
    let active = membership.reconcile(&transactions, fees);

    let output_dir = layout.output_dir();
    if output_dir.exists() {
        info!("Deleting directory {}.", output_dir.display());
        fs::remove_dir_all(&output_dir)?;
    }
    info!("Creating directory {}.", output_dir.display());
    fs::create_dir_all(&output_dir)?;

    info!("Loaded {} transactions.", active.transaction_count());
    let txns = &active.transactions;
    write_transactions_if_any(layout, config::IGNORED_TXNS_FILE, "ignored", &txns.ignored)?;
    write_transactions_if_any(
        layout,
        config::INCORRECT_TXNS_FILE,
        "incorrect membership",
        &txns.incorrect,
    )?;
    write_transactions_if_any(
        layout,
        config::UNMATCHED_TXNS_FILE,
        "unmatched",
        &txns.unmatched,
    )?;

    let members = &active.members;
    if !members.unmatched_ids.is_empty() {
        let path = layout.output(config::UNMATCHED_MEMBER_IDS_FILE);
        info!(
            "Writing {} unmatched member IDs to {}.",
            members.unmatched_ids.len(),
            path.display()
        );
        csv::write_member_ids(&path, &members.unmatched_ids)?;
    }

    let path = layout.output(config::PAID_MEMBERS_FILE);
    info!(
        "Writing {} paid members details to {}.",
        members.paying.len(),
        path.display()
    );
    csv::write_members(&path, &members.paying)?;

    let all_members = membership.all_members(&active);
    let path = layout.output(config::ALL_MEMBERS_FILE);
    info!(
        "Writing {} members details to {}.",
        all_members.len(),
        path.display()
    );
    csv::write_members(&path, &all_members)?;

    let consenting = load_optional_emails(&layout.source(config::CONSENTING_EMAILS_FILE))?;
    let withdrawn = load_optional_emails(&layout.source(config::WITHDRAW_EMAILS_FILE))?;
    let emails = email::create_email_list(&all_members, &consenting, &withdrawn);
    let path = layout.output(config::EMAIL_LIST_FILE);
    info!("Writing {} email addresses to {}.", emails.len(), path.display());
    csv::write_emails(&path, &emails)?;

    let mut summary = Summary {
        transactions: active.transaction_count(),
        ignored: txns.ignored.len(),
        incorrect: txns.incorrect.len(),
        unmatched_transactions: txns.unmatched.len(),
        unmatched_member_ids: members.unmatched_ids.len(),
        paying: members.paying.len(),
        all_members: all_members.len(),
        emails: emails.len(),
        ..Summary::default()
    };

    let Some(previous_path) = layout
        .previous_output(config::ALL_MEMBERS_FILE)
        .filter(|path| path.exists())
    else {
        info!("No previous members snapshot, skipping leavers and joiners.");
        return Ok(summary);
    };

    let previous = csv::load_members(&previous_path)?;
    info!(
        "Loaded {} members from {}.",
        previous.len(),
        previous_path.display()
    );
    let diff = member::diff(&previous, &all_members);
    if !diff.leavers.is_empty() {
        let path = layout.output(config::LEAVERS_FILE);
        info!(
            "Writing {} leavers details to {}.",
            diff.leavers.len(),
            path.display()
        );
        csv::write_members(&path, &diff.leavers)?;
    }
    if !diff.joiners.is_empty() {
        let path = layout.output(config::JOINERS_FILE);
        info!(
            "Writing {} joiners details to {}.",
            diff.joiners.len(),
            path.display()
        );
        csv::write_members(&path, &diff.joiners)?;
    }

    summary.leavers = Some(diff.leavers.len());
    summary.joiners = Some(diff.joiners.len());
    Ok(summary)
}

fn write_transactions_if_any(
    layout: &Layout,
    file: &str,
    kind: &str,
    transactions: &[Transaction],
) -> Result<()> {
    if transactions.is_empty() {
        return Ok(());
    }

    let path = layout.output(file);
    info!(
        "Writing {} {kind} transactions to {}.",
        transactions.len(),
        path.display()
    );
    csv::write_transactions(&path, transactions)
}

fn load_optional_emails(path: &Path) -> Result<Vec<String>> {
    if !path.exists() {
        info!("No {} found, treating it as empty.", path.display());
        return Ok(Vec::new());
    }

    let emails = csv::load_emails(path)?;
    info!(
        "Loaded {} email addresses from {}.",
        emails.len(),
        path.display()
    );
    Ok(emails)
}
