use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("could not parse `{value}` as a monetary amount")]
    InvalidAmount {
        value: String,
        #[source]
        source: rust_decimal::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
