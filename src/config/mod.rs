use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};

use chrono::{Datelike, Months, NaiveDate, Utc};
use serde::Deserialize;

use crate::{
    domain::{fees::FeeSchedule, money::Amount},
    error::{Error, Result},
};

pub const REFERENCES_FILE: &str = "reference_member_mappings.csv";
pub const ROSTER_FILE: &str = "membership_details.csv";
pub const NEW_MEMBERS_FILE: &str = "new_members.csv";
pub const CONSENTING_EMAILS_FILE: &str = "consenting_emails.csv";
pub const WITHDRAW_EMAILS_FILE: &str = "withdraw_emails.csv";
pub const TRANSACTIONS_FILE: &str = "bank_acct_txns.csv";

pub const IGNORED_TXNS_FILE: &str = "ignored_txns.csv";
pub const INCORRECT_TXNS_FILE: &str = "incorrect_membership_txns.csv";
pub const UNMATCHED_TXNS_FILE: &str = "unmatched_txns.csv";
pub const PAID_MEMBERS_FILE: &str = "paid_members.csv";
pub const UNMATCHED_MEMBER_IDS_FILE: &str = "unmatched_memberids.csv";
pub const ALL_MEMBERS_FILE: &str = "all_members.csv";
pub const LEAVERS_FILE: &str = "leavers.csv";
pub const JOINERS_FILE: &str = "joiners.csv";
pub const EMAIL_LIST_FILE: &str = "email_list.csv";

/// A calendar month, written `YYYYMM`, used to name input and output folders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Period(NaiveDate);

impl Period {
    pub fn current() -> Self {
        let today = Utc::now().date_naive();
        Self(today.with_day(1).unwrap_or(today))
    }

    pub fn previous(&self) -> Option<Self> {
        self.0.checked_sub_months(Months::new(1)).map(Self)
    }
}

impl FromStr for Period {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.len() != 6 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidPeriod(s.to_owned()));
        }

        NaiveDate::parse_from_str(&format!("{s}01"), "%Y%m%d")
            .map(Self)
            .map_err(|_| Error::InvalidPeriod(s.to_owned()))
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y%m"))
    }
}

/// Where a run reads its inputs and writes its reports.
///
/// ```text
/// <base>/in/<static inputs>
/// <base>/in/<period>/bank_acct_txns.csv
/// <base>/out/<period>/<reports>
/// ```
#[derive(Debug, Clone)]
pub struct Layout {
    base_dir: PathBuf,
    period: Period,
}

impl Layout {
    pub fn new(base_dir: impl Into<PathBuf>, period: Period) -> Self {
        Self {
            base_dir: base_dir.into(),
            period,
        }
    }

    pub fn period(&self) -> Period {
        self.period
    }

    pub fn source(&self, file: &str) -> PathBuf {
        self.base_dir.join("in").join(file)
    }

    pub fn current_source(&self, file: &str) -> PathBuf {
        self.base_dir
            .join("in")
            .join(self.period.to_string())
            .join(file)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.base_dir.join("out").join(self.period.to_string())
    }

    pub fn output(&self, file: &str) -> PathBuf {
        self.output_dir().join(file)
    }

    /// The same report from the month before, if there is such a month.
    pub fn previous_output(&self, file: &str) -> Option<PathBuf> {
        self.period.previous().map(|previous| {
            self.base_dir
                .join("out")
                .join(previous.to_string())
                .join(file)
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub fees: Option<FeeConfig>,
}

/// Fee amounts, written as decimal strings such as `"18.50"`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FeeConfig {
    pub correct: Vec<Amount>,
    #[serde(default)]
    pub other: Vec<Amount>,
}

impl Config {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| Error::Open {
            path: path.to_owned(),
            source,
        })?;

        toml::from_str(&contents).map_err(|source| Error::Config {
            path: path.to_owned(),
            source,
        })
    }

    pub fn fee_schedule(&self) -> FeeSchedule {
        match &self.fees {
            Some(fees) => {
                FeeSchedule::new(fees.correct.iter().copied(), fees.other.iter().copied())
            }
            None => FeeSchedule::default(),
        }
    }
}
