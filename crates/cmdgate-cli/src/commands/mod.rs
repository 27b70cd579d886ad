//! Subcommand implementations

pub mod clear;
pub mod log;
pub mod run;
pub mod serve;
pub mod status;
pub mod submit;

/// Multi-threaded runtime for the long-running subcommands
pub(crate) fn tokio_runtime() -> std::io::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
}

/// Resolves on Ctrl-C; never resolves if the handler cannot be installed
pub(crate) async fn ctrl_c() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "could not listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
