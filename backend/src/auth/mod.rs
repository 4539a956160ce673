//! Authentication core
//!
//! Two explicit components, composed by the HTTP layer:
//! - [`CredentialVerifier`]: username/password → [`Principal`]
//! - [`TokenAuthority`]: [`Principal`] → signed token, and token → [`Principal`]

mod clock;
mod credentials;
mod error;
mod jwt;
mod middleware;
mod password;
mod principal;

#[cfg(test)]
pub(crate) mod test_support;

pub use clock::{Clock, ManualClock, SystemClock};
pub use credentials::CredentialVerifier;
pub use error::AuthError;
pub use jwt::{Claims, JwtKeys, TokenAuthority, TOKEN_ALGORITHM};
pub use middleware::{authenticate, bearer_token, require_auth, AuthUser};
pub use password::PasswordService;
pub use principal::Principal;
