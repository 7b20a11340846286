use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{error, info, warn};

use portal_api::{build_router, AppState};
use portal_core::SessionLifecycle;
use portal_infrastructure::{Auth0Provider, Mailer};
use portal_shared::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env
    dotenvy::dotenv().ok();

    // Load configuration
    let config = match AppConfig::load() {
        Ok(c) => c,
        Err(e) => {
            // Subscriber is not up yet; install a plain one so the failure is visible.
            let _guard = portal_shared::telemetry::init_telemetry(None);
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize telemetry
    let _guard = portal_shared::telemetry::init_telemetry(config.app.log_dir.as_deref());
    info!("{} starting in {} mode...", config.app.name, config.app.env);

    // Identity provider and session lifecycle
    let provider = Auth0Provider::new(&config)?;
    info!("Identity provider: {}", config.auth.issuer_url());
    let lifecycle = SessionLifecycle::new(&config, Arc::new(provider))?;

    // Optional mailer
    match &config.email {
        Some(email) => match Mailer::new(email) {
            Ok(_) => info!("SMTP mailer configured for {}", email.smtp_host),
            Err(e) => warn!("SMTP mailer unavailable: {}", e),
        },
        None => info!("No email configuration, mailer disabled"),
    }

    // Bind address
    let host: std::net::IpAddr = config.app.host.parse()?;
    let addr = SocketAddr::from((host, config.app.port));

    // Build router
    let app = build_router(AppState::new(config, lifecycle));

    info!("Listening on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
