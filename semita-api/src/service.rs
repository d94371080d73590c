use std::str::FromStr;

use crate::{Error, Time};

/// Well-known slug of a tracked utility ("electricity", "water", ...).
/// Unlike complaints and notifications these are not uuid-keyed: the id is
/// chosen by whoever first reports on the service.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize)]
pub struct ServiceId(pub String);

impl std::fmt::Display for ServiceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Active,
    Issue,
    Outage,
    Maintenance,
}

impl FromStr for ServiceStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<ServiceStatus, Error> {
        match s {
            "active" => Ok(ServiceStatus::Active),
            "issue" => Ok(ServiceStatus::Issue),
            "outage" => Ok(ServiceStatus::Outage),
            "maintenance" => Ok(ServiceStatus::Maintenance),
            _ => Err(Error::InvalidArgument(format!(
                "unknown service status {s:?}"
            ))),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Service {
    pub id: ServiceId,
    pub name: String,
    pub status: ServiceStatus,
    pub description: String,
    pub last_update: Time,
    pub reports_count: i64,
    pub icon: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reported_by: Option<String>,
}

/// Body of `POST /api/services/:id/status`.
#[derive(Clone, Debug, serde::Deserialize, serde::Serialize)]
pub struct StatusReport {
    pub status: ServiceStatus,
    pub description: String,
    pub reported_by: String,
}
