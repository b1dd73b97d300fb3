use crate::{auth::AuthApi, cli::globals::GlobalArgs};
use anyhow::{bail, Result};
use tracing::instrument;

/// # Errors
/// Returns an error if the API does not answer `/health` with a success status.
#[instrument(skip_all, fields(command = "health"))]
pub async fn check(globals: &GlobalArgs) -> Result<()> {
    let client = globals.client()?;
    if client.is_healthy().await {
        println!("{} is healthy", client.base_url());
        Ok(())
    } else {
        bail!("{} is not healthy", client.base_url())
    }
}
