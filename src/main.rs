use mentallify::config::Config;
use mentallify::error::AppError;
use mentallify::logging;
use mentallify::routes::configure_routes;
use mentallify::state::AppState;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("fatal: {e}");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    logging::init(&config.log_level)?;

    // Fail fast when the site directory is unreadable
    std::fs::metadata(&config.frontend_root)?;

    let bind_addr = config.bind_addr;
    info!(
        frontend_root = %config.frontend_root.display(),
        artifacts_dir = %config.artifacts_dir.display(),
        "loading application state"
    );
    let state = AppState::load(config).shared();
    let routes = configure_routes(state);

    info!("starting server on http://{bind_addr}");
    warp::serve(routes).run(bind_addr).await;
    Ok(())
}
