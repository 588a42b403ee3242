use serde::{Deserialize, Serialize};

/// JWT payload. Field names match tokens already issued to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub authorized: bool,
    #[serde(rename = "userEmail")]
    pub user_email: String,
    #[serde(rename = "userID")]
    pub user_id: String,
    pub exp: usize, // expires at (unix timestamp)
}
