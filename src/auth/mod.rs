//! Authentication for the service.
//!
//! Two independent gates: a fixed-credential HTTP Basic check, and a JWT
//! flow where users register, log in for a token, and present it as a
//! bearer credential.

pub mod basic;
pub mod extract;
pub mod handlers;
pub mod password;
mod service;

pub use basic::{BasicAuthGate, Credential};
pub use extract::{AuthenticatedUser, BasicAuthorized};
pub use service::{AuthService, Claims};
