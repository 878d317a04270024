use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("could not open {}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not parse CSV rows in {}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("could not prepare output directory")]
    Io(#[from] std::io::Error),
    #[error("could not parse config file {}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("`{0}` is not a period, expected YYYYMM")]
    InvalidPeriod(String),
    #[error("invalid record in {}", path.display())]
    Record {
        path: PathBuf,
        #[source]
        source: crate::domain::error::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
