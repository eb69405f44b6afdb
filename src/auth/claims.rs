use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT payload. There is no `exp`: tokens stay valid until the secret changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub id: Uuid, // user ID
    #[serde(default)]
    pub iat: i64, // issued at (unix timestamp)
}
