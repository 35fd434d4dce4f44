use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

use catalog_server::config::Config;
use catalog_server::error::Error;

#[actix_web::main]
async fn main() -> Result<(), Error> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,catalog_server=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::NEW)
        .compact()
        .init();

    let config = Config::load()?;

    catalog_server::run(config).await
}
