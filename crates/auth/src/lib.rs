//! `storehub-auth` — authentication boundary (identity resolution only).
//!
//! Login, registration, and credential storage are external collaborators;
//! this crate decodes what they minted and answers "who is the current
//! buyer": an authenticated user or an anonymous session.

pub mod claims;
pub mod jwt;

pub use claims::{JwtClaims, TokenValidationError, validate_claims};
pub use jwt::{Hs256JwtValidator, JwtValidator};
