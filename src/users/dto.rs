use serde::{Deserialize, Serialize};

use crate::auth::password::CredentialVerifier;
use crate::models::{User, UserUpdate};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<User> for ProfileResponse {
    fn from(u: User) -> Self {
        Self {
            email: u.email,
            first_name: u.first_name,
            last_name: u.last_name,
        }
    }
}

/// Partial profile update. Empty strings mean "leave unchanged"; the request
/// is echoed back as submitted.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub first_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub last_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub email: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub password: String,
}

fn non_empty(v: &str) -> Option<String> {
    (!v.is_empty()).then(|| v.to_owned())
}

impl UpdateProfileRequest {
    /// Builds the sparse update, running a new password through `credentials`.
    pub fn to_update(&self, credentials: &dyn CredentialVerifier) -> anyhow::Result<UserUpdate> {
        let password = match non_empty(&self.password) {
            Some(plain) => Some(credentials.prepare(&plain)?),
            None => None,
        };
        Ok(UserUpdate {
            email: non_empty(&self.email),
            first_name: non_empty(&self.first_name),
            last_name: non_empty(&self.last_name),
            password,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemovedResponse {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub removed: bool,
}
