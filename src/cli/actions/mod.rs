use crate::cli::globals::GlobalArgs;

pub mod db;
pub mod server;

// Internal "interpreter" for `Action`.
// We keep the match in a separate module so `mod.rs` stays small as more actions are added.
mod run;

#[derive(Debug)]
pub enum Action {
    Server { port: u16, globals: GlobalArgs },
    DbPing { dsn: String },
    DbSchema { dsn: String, table: Option<String> },
}

impl Action {
    // Convenience wrapper so call sites can do `action.execute().await`.
    /// Execute the action.
    /// # Errors
    /// Returns an error if the action fails.
    pub async fn execute(self) -> anyhow::Result<()> {
        run::execute(self).await
    }
}
