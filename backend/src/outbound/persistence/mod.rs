//! Diesel/PostgreSQL persistence adapters for the domain's repository
//! ports.

pub mod diesel_business_repository;
pub mod diesel_credential_repository;
mod diesel_error_mapping;
pub mod diesel_location_repository;
pub mod diesel_user_repository;
mod models;
pub mod pool;
pub mod schema;

pub use diesel_business_repository::DieselBusinessRepository;
pub use diesel_credential_repository::DieselCredentialRepository;
pub use diesel_location_repository::DieselLocationRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
