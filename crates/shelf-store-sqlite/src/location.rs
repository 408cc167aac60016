//! Parsing of `DATABASE_URL` connection strings.

use std::path::PathBuf;

use crate::{Error, Result};

/// Where a [`SqliteStore`](crate::SqliteStore) keeps its data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
  Memory,
  File(PathBuf),
}

impl Location {
  /// Accepts `sqlite://<path>`, `sqlite:<path>`, `sqlite::memory:`,
  /// `:memory:` or a bare filesystem path. Any other scheme is rejected.
  pub fn parse(url: &str) -> Result<Self> {
    let url = url.trim();
    let rest = url
      .strip_prefix("sqlite://")
      .or_else(|| url.strip_prefix("sqlite:"))
      .unwrap_or(url);

    if rest == ":memory:" {
      return Ok(Self::Memory);
    }
    if rest.is_empty() || rest.contains("://") {
      return Err(Error::UnsupportedUrl(url.to_owned()));
    }
    Ok(Self::File(PathBuf::from(rest)))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn memory_forms() {
    assert_eq!(Location::parse(":memory:").unwrap(), Location::Memory);
    assert_eq!(Location::parse("sqlite::memory:").unwrap(), Location::Memory);
  }

  #[test]
  fn file_forms() {
    assert_eq!(
      Location::parse("sqlite://data/shelf.db").unwrap(),
      Location::File(PathBuf::from("data/shelf.db"))
    );
    assert_eq!(
      Location::parse("sqlite:shelf.db").unwrap(),
      Location::File(PathBuf::from("shelf.db"))
    );
    assert_eq!(
      Location::parse("/var/lib/shelf.db").unwrap(),
      Location::File(PathBuf::from("/var/lib/shelf.db"))
    );
  }

  #[test]
  fn other_schemes_are_rejected() {
    assert!(matches!(
      Location::parse("postgres://user@host/db"),
      Err(Error::UnsupportedUrl(_))
    ));
    assert!(Location::parse("").is_err());
    assert!(Location::parse("sqlite://").is_err());
  }
}
