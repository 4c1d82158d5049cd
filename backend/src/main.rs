//! Backend entry-point: loads settings, wires the in-memory adapters, and
//! serves the sign-in and household record endpoints.

mod server;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use hearth::inbound::http::health::HealthState;
use hearth::inbound::http::session_config::{BuildMode, session_settings_from_env};
use hearth::settings::AuthSettings;
use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AuthSettings::load()
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;
    let env = DefaultEnv::new();
    let session = session_settings_from_env(&env, BuildMode::from_debug_assertions())
        .map_err(std::io::Error::other)?;
    let bind_addr = settings.bind_addr().map_err(std::io::Error::other)?;
    let lockout = settings.lockout_config().map_err(std::io::Error::other)?;

    let config = ServerConfig::new(session.key, session.cookie_secure, bind_addr)
        .with_lockout(lockout)
        .with_demo_seed(settings.seed_demo);
    info!(addr = %config.bind_addr(), "starting server");

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    server.await
}
