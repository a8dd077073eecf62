//! Status enums shared by appointments and pipeline clients.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle status of a viewing request or a sales-pipeline record.
///
/// An appointment starts `pending` and is moved to `confirmed` or `cancelled`
/// by either participant. No transition table is enforced: any of the three
/// values may be written at any time, matching the generic update semantics
/// of the rest of the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    /// Initial state: awaiting a decision from the listing owner.
    #[default]
    Pending,
    /// Accepted. Confirming an appointment also upserts a pipeline client.
    Confirmed,
    /// Declined or withdrawn. Never propagates to pipeline clients.
    Cancelled,
}

impl RequestStatus {
    /// Canonical lowercase name, as stored.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RequestStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(UnknownStatus(other.to_owned())),
        }
    }
}

/// Error returned when parsing an unrecognized status name.
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid status value: {0}")]
pub struct UnknownStatus(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_pending() {
        assert_eq!(RequestStatus::default(), RequestStatus::Pending);
    }

    #[test]
    fn serde_uses_lowercase_names() {
        assert_eq!(
            serde_json::to_string(&RequestStatus::Cancelled).expect("json"),
            "\"cancelled\""
        );
        let parsed: RequestStatus = serde_json::from_str("\"confirmed\"").expect("json");
        assert_eq!(parsed, RequestStatus::Confirmed);
    }

    #[test]
    fn rejects_unknown_names() {
        assert!("done".parse::<RequestStatus>().is_err());
        assert!(serde_json::from_str::<RequestStatus>("\"done\"").is_err());
    }
}
