//! HTTP server assembly: route registration, migrations, and the run
//! loop.

pub mod config;
pub mod state_builders;

use actix_web::{HttpServer, web};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::{HttpState, auth, businesses, locations, users};
use crate::middleware::Trace;
use crate::outbound::persistence::{DbPool, PoolConfig};

pub use config::AppConfig;

/// Migrations compiled into the binary.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Register every REST endpoint plus the shared state.
///
/// `feed` and `mine` are registered before the `{id}` resource so the
/// literal segments are not captured as listing ids.
pub fn configure_app(
    cfg: &mut web::ServiceConfig,
    state: web::Data<HttpState>,
    health: web::Data<HealthState>,
) {
    cfg.app_data(state)
        .app_data(health)
        .service(auth::login)
        .service(auth::register)
        .service(businesses::feed)
        .service(businesses::mine)
        .service(businesses::add)
        .service(businesses::detail)
        .service(businesses::update)
        .service(businesses::remove)
        .service(businesses::associate)
        .service(businesses::toggle_save)
        .service(businesses::toggle_like)
        .service(users::me)
        .service(users::update_me)
        .service(locations::countries)
        .service(locations::states)
        .service(locations::municipalities)
        .service(locations::categories)
        .service(ready)
        .service(live);
}

/// Apply pending migrations over a blocking connection.
///
/// Runs before the pool exists, so a plain synchronous connection is the
/// simplest correct tool.
fn run_migrations(database_url: &str) -> std::io::Result<()> {
    use diesel::Connection;

    let mut conn = diesel::PgConnection::establish(database_url)
        .map_err(|err| std::io::Error::other(format!("database connection failed: {err}")))?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| std::io::Error::other(format!("migrations failed: {err}")))?;
    if !applied.is_empty() {
        info!(count = applied.len(), "applied pending migrations");
    }
    Ok(())
}

/// Build the dependencies and serve until shutdown.
pub async fn run(config: AppConfig) -> std::io::Result<()> {
    if config.run_migrations {
        run_migrations(&config.database_url)?;
    }

    let pool = DbPool::new(PoolConfig::new(&config.database_url))
        .await
        .map_err(|err| std::io::Error::other(err.to_string()))?;

    let state = web::Data::new(state_builders::build_http_state(&pool, &config));
    let health = web::Data::new(HealthState::new());

    let server_state = state.clone();
    let server_health = health.clone();
    let server = HttpServer::new(move || {
        let app = actix_web::App::new().wrap(Trace).configure(|cfg| {
            configure_app(cfg, server_state.clone(), server_health.clone());
        });

        #[cfg(debug_assertions)]
        let app = app.service(
            utoipa_swagger_ui::SwaggerUi::new("/docs/{_:.*}")
                .url("/api-docs/openapi.json", crate::doc::openapi()),
        );

        app
    })
    .bind(config.bind_addr)?;

    info!(addr = %config.bind_addr, "server listening");
    health.mark_ready();
    server.run().await
}
