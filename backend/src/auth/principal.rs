//! The authenticated identity carried through a single request

use crate::repositories::UserRecord;
use myflix_shared::types::PrincipalView;
use uuid::Uuid;

/// Identity resolved from credentials or a token.
///
/// Always rebuilt from the current store record; never cached across requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    id: Uuid,
    username: String,
}

impl Principal {
    pub fn new(id: Uuid, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Client-facing representation
    pub fn to_view(&self) -> PrincipalView {
        PrincipalView {
            id: self.id.to_string(),
            username: self.username.clone(),
        }
    }
}

impl From<&UserRecord> for Principal {
    fn from(user: &UserRecord) -> Self {
        Self::new(user.id, user.username.clone())
    }
}
