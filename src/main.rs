use std::path::PathBuf;

use agrivision::{AppError, Configuration, Server};
use tracing::Level;

fn init_logging(level: Level) {
    tracing_subscriber::fmt().with_max_level(level).init();
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Optional path to a config file; `agrivision.toml` in the working directory otherwise.
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let configuration = Configuration::load(config_path.as_deref())?;
    init_logging(configuration.log_level()?);

    Server::new(configuration).start().await
}
