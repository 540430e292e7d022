use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use webex_login_server::build_router;
use webex_login_server::models::{AppConfig, AppState};

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let app_config = AppConfig::from_env()?;
    info!("Loaded configuration: {:?}", app_config);

    if app_config.fixed_state.is_some() {
        warn!("OAUTH_FIXED_STATE is set: every login shares one state value, which is unsafe outside local demos");
    }
    if !app_config.verify_signature {
        warn!("Identity token signatures are not verified; claims are for display only");
    }

    let addr = format!("0.0.0.0:{}", app_config.listen_port);
    let app_state = AppState::new(app_config)?;
    let app = build_router(app_state);

    info!("listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
