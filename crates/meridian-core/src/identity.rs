//! The caller identity attached to a request by the external identity
//! provider.

use serde::{Deserialize, Serialize};

/// A resolved, authenticated caller.
///
/// `id` is stable for the lifetime of the account and is the only field the
/// rest of the system relies on; the others are display hints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallerIdentity {
  pub id:           String,
  pub email:        Option<String>,
  pub display_name: Option<String>,
  pub avatar_url:   Option<String>,
}

impl CallerIdentity {
  pub fn new(id: impl Into<String>) -> Self {
    Self {
      id:           id.into(),
      email:        None,
      display_name: None,
      avatar_url:   None,
    }
  }
}
