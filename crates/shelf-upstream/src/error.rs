//! Error type for `shelf-upstream`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("upstream responded with {0}")]
  Status(reqwest::StatusCode),

  #[error("invalid upstream configuration: {0}")]
  Config(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
