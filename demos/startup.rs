use mongo_fnd::{build_dependencies, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), mongo_fnd::Error> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let path = std::env::args().nth(1).unwrap_or_else(|| ".env".to_string());

    // file defaults, then APP_-prefixed overrides from the environment
    let settings = Config::builder()
        .with_file(&path, true)
        .with_env("APP_")
        .build_settings()?;

    let mut ctx = build_dependencies(settings).await?;

    tracing::info!(
        uri = %ctx.config().redacted_uri(),
        state = ?ctx.state(),
        "dependencies ready"
    );

    ctx.release().await?;
    Ok(())
}
