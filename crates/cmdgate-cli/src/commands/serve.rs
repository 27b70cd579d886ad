//! HTTP API with the co-scheduled dispatcher
//!
//! Usage: cmdgate serve [--bind ADDR] [--no-dispatcher]
//!
//! Running both in one process puts them behind the same queue lock.

use clap::Args;
use cmdgate_engine::{GatewayConfig, RunExit, Runtime};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Address to listen on (overrides the config file)
    #[arg(long)]
    pub bind: Option<String>,

    /// Serve the API only; another process must drain the queue
    #[arg(long)]
    pub no_dispatcher: bool,
}

/// Execute serve command
pub fn execute(args: ServeArgs, mut config: GatewayConfig) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(bind) = args.bind {
        config.bind = bind;
    }
    let runtime = Runtime::open(config)?;

    let tokio_rt = super::tokio_runtime()?;
    let exit = tokio_rt.block_on(async {
        let listener = TcpListener::bind(&runtime.config.bind).await?;
        println!("API listening on http://{}", listener.local_addr()?);

        let (tx, rx) = watch::channel(false);
        let mut http_stop = rx.clone();
        let server = tokio::spawn(cmdgate_http::serve(
            listener,
            runtime.gateway.clone(),
            async move {
                let _ = http_stop.wait_for(|stop| *stop).await;
            },
        ));

        let exit = if args.no_dispatcher {
            super::ctrl_c().await;
            RunExit::Stopped
        } else {
            let mut dispatcher = tokio::spawn(
                Arc::clone(&runtime.dispatcher).run(runtime.run_options(false), rx),
            );
            tokio::select! {
                finished = &mut dispatcher => finished??,
                _ = super::ctrl_c() => {
                    let _ = tx.send(true);
                    dispatcher.await??
                }
            }
        };

        let _ = tx.send(true);
        server.await??;
        Ok::<_, Box<dyn std::error::Error>>(exit)
    })?;
    drop(tokio_rt);

    if exit == RunExit::RestartRequested {
        crate::restart::reexec()?;
    }
    Ok(())
}
