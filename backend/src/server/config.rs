//! Process configuration parsed from CLI flags with environment
//! fallbacks.

use std::net::SocketAddr;

use clap::Parser;
use url::Url;

/// Runtime configuration for the marketplace backend.
#[derive(Debug, Clone, Parser)]
#[command(name = "backend", about = "Business marketplace REST backend")]
pub struct AppConfig {
    /// PostgreSQL connection string.
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,

    /// Address the HTTP server binds to.
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:8080")]
    pub bind_addr: SocketAddr,

    /// Shared secret signing bearer tokens.
    #[arg(long, env = "JWT_SECRET")]
    pub jwt_secret: String,

    /// Bearer-token lifetime in seconds.
    #[arg(long, env = "JWT_TTL_SECS", default_value_t = 3600)]
    pub jwt_ttl_secs: u64,

    /// Base URL of the image object store (HTTP PUT endpoint).
    #[arg(long, env = "STORAGE_BASE_URL")]
    pub storage_base_url: Url,

    /// Apply pending database migrations at startup.
    #[arg(long, env = "RUN_MIGRATIONS", default_value_t = true)]
    pub run_migrations: bool,
}
