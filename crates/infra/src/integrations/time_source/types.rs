//! Wire types for the upstream user directory.

use serde::Deserialize;

/// Response body of the user listing endpoint.
///
/// `users` is mandatory; a body without it is treated as malformed.
#[derive(Debug, Clone, Deserialize)]
pub struct UserListResponse {
    pub users: Vec<UpstreamUser>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamUser {
    pub id: i64,
    #[serde(default)]
    pub company: Option<UpstreamCompany>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamCompany {
    #[serde(default)]
    pub name: Option<String>,
}

impl UpstreamUser {
    pub fn company_name(&self) -> Option<String> {
        self.company.as_ref().and_then(|company| company.name.clone())
    }
}
