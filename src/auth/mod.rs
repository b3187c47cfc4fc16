//! Authentication module
//!
//! Account registration and login, session token issuing and the guard
//! that resolves the caller on protected routes.

pub mod guard;
pub mod handlers;
mod password;
mod service;
mod token;

pub use guard::{AccessGuard, Authenticated};
pub use password::{MAX_PASSWORD_BYTES, MIN_BCRYPT_COST};
pub use service::{normalize_email, AuthService};
pub use token::{generate_secret, Claims, TokenService};
