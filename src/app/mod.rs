mod wiring;

use crate::{cli, context, rest, storage};
use anyhow::{anyhow, Context as AnyhowContext, Result};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

pub struct App {
    pub ctx: context::Context,
    pub storage: storage::SqliteStorage,
    shutdown: CancellationToken,
}

impl App {
    pub fn from_cli() -> Result<Self> {
        let cli = cli::parse();
        let ctx = context::Context::from_cli(&cli);

        crate::tracing::init(ctx.log_file.as_deref());
        log::info!("🚀 Starting blog-api");
        log::info!("📂 Database: {}", ctx.database.display());

        Self::from_context(ctx)
    }

    pub fn from_context(ctx: context::Context) -> Result<Self> {
        wiring::init_data_dir(&ctx).context("initializing data dir")?;
        let storage = wiring::init_storage(&ctx)?;

        Ok(Self {
            ctx,
            storage,
            shutdown: CancellationToken::new(),
        })
    }

    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    fn spawn_rest_server(&self) -> JoinHandle<Result<()>> {
        let addr = self.ctx.api_listen;
        let storage = self.storage.clone();
        let token = self.shutdown.clone();

        tokio::spawn(async move {
            rest::serve(addr, storage, token)
                .await
                .with_context(|| format!("serving REST API on {}", addr))
        })
    }

    /// Serve until Ctrl-C, a cancelled shutdown token, or the server
    /// exiting on its own; then close the storage. A server that stops
    /// before shutdown was requested is reported as an error.
    pub async fn run_daemon(self) -> Result<()> {
        log::info!("🌐 REST API: http://{}", self.ctx.api_listen);
        if let Some(path) = self.ctx.log_file.as_deref() {
            log::info!("📝 Log file: {}", path.display());
        }

        let mut rest_handle = self.spawn_rest_server();

        let early_exit = tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                log::info!("🧨 Ctrl-C received, shutting down");
                None
            }
            _ = self.shutdown.cancelled() => {
                log::info!("🧨 Shutdown requested");
                None
            }
            joined = &mut rest_handle => Some(joined),
        };

        self.shutdown.cancel();
        let served = match early_exit {
            Some(Ok(Ok(()))) => Err(anyhow!(
                "REST server stopped before shutdown was requested"
            )),
            Some(Ok(Err(e))) => Err(e),
            Some(Err(e)) => Err(anyhow::Error::new(e).context("REST task aborted")),
            None => rest_handle
                .await
                .unwrap_or_else(|e| Err(anyhow::Error::new(e).context("REST task aborted"))),
        };
        if let Err(e) = &served {
            log::error!("REST server failed: {:#}", e);
        }

        let closed = self.storage.close().context("closing storage");
        served?;
        closed?;
        log::info!("✅ Shutdown complete");
        Ok(())
    }
}

pub async fn run() -> Result<()> {
    let app = App::from_cli()?;
    app.run_daemon().await
}
