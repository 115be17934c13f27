//! Driven adapters implementing the domain's ports.

pub mod credential_hash;
pub mod persistence;
pub mod storage;
pub mod token;

pub use credential_hash::Argon2CredentialHasher;
pub use token::JwtTokenIssuer;
