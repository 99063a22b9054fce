use crate::cli::actions::{db, server, Action};
use anyhow::Result;

pub(crate) async fn execute(action: Action) -> Result<()> {
    match action {
        Action::Server { port, globals } => server::handle(port, &globals).await,
        Action::DbPing { dsn } => db::ping(&dsn).await,
        Action::DbSchema { dsn, table } => db::schema(&dsn, table.as_deref()).await,
    }
}
