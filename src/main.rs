use myql::{cli, errors};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> errors::AppResult<()> {
    // Logs go to stderr so responses can be piped
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "myql=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let rt =
        tokio::runtime::Runtime::new().map_err(|e| errors::AppError::IoError(e.to_string()))?;
    rt.block_on(cli::cli())
}
