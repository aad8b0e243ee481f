//! Authentication implementations.

mod jwt;
mod password;

pub use jwt::{JwtConfig, SessionTokenService};
pub use password::Argon2PasswordService;
