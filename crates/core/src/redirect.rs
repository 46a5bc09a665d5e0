//! Redirect ledger rules: status codes and the shape of a valid mapping.
//!
//! The ledger is single-hop. A lookup for `from` returns exactly the `to`
//! stored under it and never follows `to` onward.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::page_path::PagePath;

/// HTTP status used when serving a redirect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "i16", into = "i16")]
pub enum RedirectStatus {
    /// 301, written automatically whenever a page moves.
    #[default]
    Permanent,
    /// 302, only ever created by hand.
    Temporary,
}

impl RedirectStatus {
    pub fn code(&self) -> i16 {
        match self {
            Self::Permanent => 301,
            Self::Temporary => 302,
        }
    }

    pub fn from_code(code: i16) -> Result<Self, CoreError> {
        match code {
            301 => Ok(Self::Permanent),
            302 => Ok(Self::Temporary),
            other => Err(CoreError::Validation(format!(
                "Invalid redirect status code {other}. Must be 301 or 302"
            ))),
        }
    }
}

impl TryFrom<i16> for RedirectStatus {
    type Error = CoreError;

    fn try_from(code: i16) -> Result<Self, Self::Error> {
        Self::from_code(code)
    }
}

impl From<RedirectStatus> for i16 {
    fn from(status: RedirectStatus) -> Self {
        status.code()
    }
}

/// A redirect must actually move somewhere.
pub fn validate_redirect(from: &PagePath, to: &PagePath) -> Result<(), CoreError> {
    if from == to {
        return Err(CoreError::Validation(format!(
            "Redirect source and target are both '{from}'"
        )));
    }
    Ok(())
}
