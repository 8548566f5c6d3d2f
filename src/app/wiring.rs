use crate::{context, storage};
use anyhow::{Context, Result};

/// Create the directory holding the database file.
pub fn init_data_dir(ctx: &context::Context) -> Result<()> {
    if let Some(parent) = ctx.database.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    Ok(())
}

pub fn init_storage(ctx: &context::Context) -> Result<storage::SqliteStorage> {
    if ctx.reset {
        log::warn!("🧹 Resetting database {}", ctx.database.display());
        storage::SqliteStorage::reset_all(&ctx.database).context("resetting storage")?;
    }
    let sqlite = storage::SqliteStorage::open(&ctx.database).context("opening storage")?;
    sqlite.init().context("initializing storage")?;
    Ok(sqlite)
}
