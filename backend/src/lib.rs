//! Business marketplace REST backend.
//!
//! Layered hexagonally: `domain` holds entities, ports, and use-case
//! services; `inbound::http` adapts REST requests onto the services;
//! `outbound` implements the ports against PostgreSQL, object storage,
//! JWT issuance, and Argon2 hashing; `server` is the composition root.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

pub use doc::ApiDoc;
pub use middleware::Trace;
