//! Loading the membership inputs and writing the reports as CSV files.

use std::{fs::File, path::Path};

use csv::{Reader, ReaderBuilder, WriterBuilder};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    domain::{
        member::{self, Member, Roster},
        reference::ReferenceMap,
        transaction::Transaction,
    },
    error::{Error, Result},
};

pub const TRANSACTION_HEADERS: [&str; 2] = ["Description", "Amount"];
pub const MEMBER_HEADERS: [&str; 5] = ["MemberId", "Title", "Forenames", "Surname", "EmailAddress"];
pub const MEMBER_ID_HEADERS: [&str; 1] = ["MemberId"];

/// A row of the bank account export. Only credits carry a `Paid in` amount.
#[derive(Debug, Deserialize)]
struct BankRecord {
    #[serde(rename = "Type")]
    kind: String,
    #[serde(rename = "Description")]
    description: String,
    #[serde(rename = "Paid in", default)]
    paid_in: String,
}

#[derive(Debug, Deserialize)]
struct ReferenceRecord {
    #[serde(rename = "Reference")]
    reference: String,
    #[serde(rename = "MemberIds", default)]
    member_ids: String,
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|source| Error::Open {
        path: path.to_owned(),
        source,
    })
}

fn csv_error(path: &Path) -> impl FnOnce(csv::Error) -> Error + '_ {
    move |source| Error::Csv {
        path: path.to_owned(),
        source,
    }
}

fn deserialize<T>(path: &Path) -> Result<Vec<T>>
where
    T: for<'de> Deserialize<'de>,
{
    Reader::from_reader(open(path)?)
        .into_deserialize()
        .collect::<csv::Result<_>>()
        .map_err(csv_error(path))
}

/// Load the credits from a bank account export.
///
/// Every other kind of row is skipped without looking at its amount. A credit
/// whose amount does not parse fails the whole load.
pub fn load_transactions(path: &Path) -> Result<Vec<Transaction>> {
    deserialize::<BankRecord>(path)?
        .into_iter()
        .filter(|record| record.kind.trim() == "CR")
        .map(|record| {
            Transaction::parse(&record.description, &record.paid_in).map_err(|source| {
                Error::Record {
                    path: path.to_owned(),
                    source,
                }
            })
        })
        .collect()
}

pub fn load_members(path: &Path) -> Result<Vec<Member>> {
    deserialize(path)
}

pub fn load_roster(path: &Path) -> Result<Roster> {
    load_members(path).map(member::roster)
}

/// Load the reference to member mapping. Member ids are separated by `|`.
///
/// A repeated reference is logged and ignored.
pub fn load_references(path: &Path) -> Result<ReferenceMap> {
    let records = deserialize::<ReferenceRecord>(path)?;
    let (references, duplicates) = ReferenceMap::from_entries(
        records
            .iter()
            .map(|record| (&record.reference, record.member_ids.split('|'))),
    );

    for reference in duplicates {
        warn!("loaded duplicate reference {reference}");
    }

    Ok(references)
}

/// Load a headerless list of email addresses, one per line.
pub fn load_emails(path: &Path) -> Result<Vec<String>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(open(path)?);

    reader
        .records()
        .map(|record| {
            record
                .map(|record| record.get(0).unwrap_or_default().trim().to_owned())
                .map_err(csv_error(path))
        })
        .collect()
}

fn write<T: Serialize>(
    path: &Path,
    headers: Option<&[&str]>,
    rows: impl IntoIterator<Item = T>,
) -> Result<()> {
    let file = File::create(path).map_err(|source| Error::Open {
        path: path.to_owned(),
        source,
    })?;
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);

    if let Some(headers) = headers {
        writer.write_record(headers).map_err(csv_error(path))?;
    }
    for row in rows {
        writer.serialize(row).map_err(csv_error(path))?;
    }

    writer.flush()?;
    Ok(())
}

pub fn write_transactions(path: &Path, transactions: &[Transaction]) -> Result<()> {
    write(path, Some(&TRANSACTION_HEADERS[..]), transactions)
}

pub fn write_members(path: &Path, members: &[Member]) -> Result<()> {
    write(path, Some(&MEMBER_HEADERS[..]), members)
}

pub fn write_member_ids(path: &Path, member_ids: &[String]) -> Result<()> {
    write(path, Some(&MEMBER_ID_HEADERS[..]), member_ids)
}

pub fn write_emails(path: &Path, emails: &[String]) -> Result<()> {
    write(path, None, emails)
}
