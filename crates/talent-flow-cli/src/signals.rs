//! SIGINT/SIGTERM wiring for the batch runner.

use talent_flow_core::traits::{Cancellable, CancellationToken};
use tracing::warn;

/// Cancel `token` on the first shutdown signal. The listener runs on its own
/// thread with a single-threaded tokio runtime; people already committing
/// finish their writes.
pub fn cancel_on_shutdown(token: CancellationToken) {
    let spawned = std::thread::Builder::new()
        .name("talent-flow-signals".to_string())
        .spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(e) => {
                    warn!(error = %e, "signal listener unavailable");
                    return;
                }
            };
            runtime.block_on(async move {
                shutdown_signal().await;
                warn!("shutdown requested, stopping after in-flight people");
                token.cancel();
            });
        });
    if let Err(e) = spawned {
        warn!(error = %e, "signal listener thread not started");
    }
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
            (Ok(mut sigterm), Ok(mut sigint)) => {
                tokio::select! {
                    _ = sigterm.recv() => {}
                    _ = sigint.recv() => {}
                }
                return;
            }
            (Err(e), _) | (_, Err(e)) => {
                warn!(error = %e, "unix signal registration failed, falling back to ctrl-c");
            }
        }
    }
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "ctrl-c handler unavailable");
        std::future::pending::<()>().await;
    }
}
