//! Startup sequencing: migrate the schema, then serve HTTP
//!
//! The server is only started once every pending migration has been
//! applied. A failed migration is returned to the caller and nothing is
//! bound.

use crate::infra::storage::migrations::Migrator;
use anyhow::Context;
use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tokio_util::sync::CancellationToken;

/// Brings the database schema to the latest version
#[async_trait]
pub trait SchemaMigrator: Send + Sync {
    async fn migrate(&self) -> anyhow::Result<()>;
}

/// Applies the sea-orm migrations of this service
pub struct DatabaseMigrator {
    db: Arc<DatabaseConnection>,
}

impl DatabaseMigrator {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SchemaMigrator for DatabaseMigrator {
    async fn migrate(&self) -> anyhow::Result<()> {
        let pending = Migrator::get_pending_migrations(self.db.as_ref())
            .await
            .context("failed to read migration state")?
            .len();
        Migrator::up(self.db.as_ref(), None).await?;
        tracing::info!(applied = pending, "database migrations completed");
        Ok(())
    }
}

/// Run `migrator`, then `serve` only if it succeeded
pub async fn migrate_then_serve<M, F, Fut>(migrator: &M, serve: F) -> anyhow::Result<()>
where
    M: SchemaMigrator + ?Sized,
    F: FnOnce() -> Fut,
    Fut: Future<Output = anyhow::Result<()>>,
{
    migrator
        .migrate()
        .await
        .context("schema migration failed; server not started")?;
    serve().await
}

pub async fn bind(addr: &str) -> anyhow::Result<TcpListener> {
    TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))
}

/// Serve `router` until `cancel` fires, then drain in-flight requests
pub async fn serve_listener(
    listener: TcpListener,
    router: axum::Router,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let addr = listener.local_addr().context("listener has no local address")?;
    tracing::info!(%addr, "HTTP server listening");

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(cancel.cancelled_owned())
    .await
    .context("HTTP server error")?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

/// Cancel `cancel` on Ctrl+C or SIGTERM
pub async fn shutdown_signal(cancel: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::warn!("received Ctrl+C, shutting down"),
        _ = terminate => tracing::warn!("received terminate signal, shutting down"),
        _ = cancel.cancelled() => return,
    }
    cancel.cancel();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct Outcome(bool);

    #[async_trait]
    impl SchemaMigrator for Outcome {
        async fn migrate(&self) -> anyhow::Result<()> {
            if self.0 {
                Ok(())
            } else {
                anyhow::bail!("relation \"users\" is locked")
            }
        }
    }

    #[tokio::test]
    async fn failed_migration_never_serves() {
        let served = AtomicBool::new(false);
        let result = migrate_then_serve(&Outcome(false), || async {
            served.store(true, Ordering::SeqCst);
            Ok(())
        })
        .await;

        let err = result.unwrap_err();
        assert!(err.to_string().contains("server not started"));
        assert!(format!("{err:#}").contains("locked"));
        assert!(!served.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn successful_migration_serves() {
        let served = AtomicBool::new(false);
        migrate_then_serve(&Outcome(true), || async {
            served.store(true, Ordering::SeqCst);
            Ok(())
        })
        .await
        .unwrap();
        assert!(served.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn serve_errors_are_returned() {
        let result =
            migrate_then_serve(&Outcome(true), || async { anyhow::bail!("port in use") }).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn cancelled_token_stops_server() {
        let listener = bind("127.0.0.1:0").await.unwrap();
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(serve_listener(listener, axum::Router::new(), cancel.clone()));
        cancel.cancel();
        handle.await.unwrap().unwrap();
    }
}
