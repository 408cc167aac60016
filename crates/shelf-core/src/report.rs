//! The uniform error report returned for internal failures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// `{"status":"error","error":...,"context":...,"timestamp":...}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename = "error")]
pub struct ErrorReport {
  pub error:     String,
  /// Which operation failed, e.g. `"inventory_metrics"`.
  pub context:   Option<String>,
  pub timestamp: DateTime<Utc>,
}

impl ErrorReport {
  pub fn new(error: impl std::fmt::Display, context: Option<&str>) -> Self {
    Self {
      error:     error.to_string(),
      context:   context.map(str::to_owned),
      timestamp: Utc::now(),
    }
  }
}
