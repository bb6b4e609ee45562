use anyhow::{Context, Result};
use oc_lettings::config::Settings;

#[rocket::main]
async fn main() -> Result<()> {
    oc_lettings::telemetry::setup_tracing();

    let rocket = oc_lettings::launchpad(Settings::figment())
        .await
        .context("failed to prepare the application")?;

    rocket
        .launch()
        .await
        .context("failed to launch rocket instance")?;

    Ok(())
}
