//! Bearer-token authentication. Tokens are issued by the external auth
//! provider; this service only verifies them and reads the principal.

mod claims;
mod extractors;
pub mod jwt;

pub use extractors::AuthUser;
