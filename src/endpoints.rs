//! Endpoint resolution for the RD Station lead API.
//!
//! (POST) `{base}1.2/services/{private_token}/generic` changes a lead status.
//! (PUT)  `{base}{version}/leads/{email}` updates a lead.
//! (POST) `{base}1.2/conversions` sends a new lead.

use std::fmt;
use std::str::FromStr;

/// Version used by every call unless stated otherwise.
pub const API_VERSION_DEFAULT: &str = "1.2";

/// Version used by `update_lead`.
pub const API_VERSION_LEADS_UPDATE: &str = "1.3";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointKind {
    Generic,
    Leads,
    Conversions,
}

impl EndpointKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EndpointKind::Generic => "generic",
            EndpointKind::Leads => "leads",
            EndpointKind::Conversions => "conversions",
        }
    }
}

impl fmt::Display for EndpointKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EndpointKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "generic" => Ok(EndpointKind::Generic),
            "leads" => Ok(EndpointKind::Leads),
            "conversions" => Ok(EndpointKind::Conversions),
            _ => Err(()),
        }
    }
}

/// Builds the endpoint URL for `kind`.
///
/// The `leads` URL ends with a slash; callers append the lead email.
pub fn build_url(base_url: &str, private_token: &str, kind: EndpointKind, version: &str) -> String {
    match kind {
        EndpointKind::Generic => {
            format!("{}{}/services/{}/generic", base_url, version, private_token)
        }
        EndpointKind::Leads => format!("{}{}/leads/", base_url, version),
        EndpointKind::Conversions => format!("{}{}/conversions", base_url, version),
    }
}

/// Same as [`build_url`] for a kind given by name. Unknown names yield an empty string.
pub fn resolve_named(base_url: &str, private_token: &str, kind: &str, version: &str) -> String {
    match kind.parse::<EndpointKind>() {
        Ok(kind) => build_url(base_url, private_token, kind, version),
        Err(()) => String::new(),
    }
}

/// Replaces the private token inside a URL for logging.
pub fn redact(url: &str, private_token: &str) -> String {
    if private_token.is_empty() {
        return url.to_string();
    }
    url.replace(private_token, "[REDACTED]")
}
