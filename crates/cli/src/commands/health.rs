//! Health check command.

use super::{CliError, build_app};

/// Probe the API's health endpoint.
#[allow(clippy::print_stdout)]
pub async fn run() -> Result<(), CliError> {
    let app = build_app()?;

    app.api().health_check().await?;
    println!("API at {} is healthy", app.config().base_url);

    Ok(())
}
