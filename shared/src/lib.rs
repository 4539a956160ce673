//! myFlix Shared Library
//!
//! Wire types, the authentication failure taxonomy, and validation helpers
//! used by the backend and its clients.

pub mod errors;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use errors::*;
pub use types::*;
