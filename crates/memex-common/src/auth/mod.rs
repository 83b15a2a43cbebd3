//! Identity tokens issued by the external identity provider

mod token;

pub use token::{IdentityClaims, JwtTokenVerifier, TokenVerifier, VerifiedIdentity};
