//! Request context carrying the authorized subject and its permission level.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use docvault_core::error::AppError;

/// Permission level granted to an authorized subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionLevel {
    /// Regular user.
    User,
    /// Administrator.
    Admin,
}

impl PermissionLevel {
    /// Returns the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for PermissionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PermissionLevel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            other => Err(AppError::validation(format!(
                "Invalid permission level: {other}"
            ))),
        }
    }
}

/// Context for the current authorized request.
///
/// Identity and permission checks happen before the engine is reached;
/// services only use the context for audit logging.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// Opaque identifier of the acting subject.
    pub subject: String,
    /// Permission level of the subject.
    pub permission: PermissionLevel,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(subject: impl Into<String>, permission: PermissionLevel) -> Self {
        Self {
            subject: subject.into(),
            permission,
        }
    }

    /// Context used for bootstrap work performed by the server itself.
    pub fn system() -> Self {
        Self::new("system", PermissionLevel::Admin)
    }
}
