use crate::{cli::globals::GlobalArgs, gateway, provider::IdentityProvider};
use anyhow::Result;
use std::sync::Arc;

/// Handle the server action
pub async fn handle(port: u16, globals: &GlobalArgs) -> Result<()> {
    let provider = Arc::new(IdentityProvider::new(globals)?);

    gateway::new(port, provider).await
}
