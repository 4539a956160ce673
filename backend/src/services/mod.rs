//! Business logic services
//!
//! Services coordinate the auth core and the user store on behalf of the
//! HTTP handlers.

pub mod user;

pub use user::UserService;
