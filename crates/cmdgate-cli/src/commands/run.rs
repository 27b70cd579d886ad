//! Foreground dispatcher
//!
//! Usage: cmdgate run [--once]

use clap::Args;
use cmdgate_engine::{GatewayConfig, RunExit, Runtime};
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Drain the queue once and exit
    #[arg(long)]
    pub once: bool,
}

/// Execute run command
pub fn execute(args: RunArgs, config: GatewayConfig) -> Result<(), Box<dyn std::error::Error>> {
    let runtime = Runtime::open(config)?;
    let options = runtime.run_options(args.once);
    let dispatcher = Arc::clone(&runtime.dispatcher);

    println!("Monitoring: {}", runtime.queue.path().display());
    println!("Logging to: {}", runtime.execution_log.path().display());
    if !args.once {
        println!(
            "Checking for commands every {}s, press Ctrl+C to stop",
            options.poll_interval.as_secs()
        );
    }

    let tokio_rt = super::tokio_runtime()?;
    let exit = tokio_rt.block_on(async move {
        let (tx, rx) = watch::channel(false);
        tokio::spawn(async move {
            super::ctrl_c().await;
            let _ = tx.send(true);
        });
        dispatcher.run(options, rx).await
    })?;
    drop(tokio_rt);

    println!(
        "Gateway stopped. Total executions: {}",
        runtime.dispatcher.execution_count()
    );

    if exit == RunExit::RestartRequested {
        crate::restart::reexec()?;
    }
    Ok(())
}
