//! Queue a command
//!
//! Usage: cmdgate submit <COMMAND> [--source SOURCE]

use clap::Args;
use cmdgate_engine::{GatewayConfig, Runtime};

#[derive(Debug, Args)]
pub struct SubmitArgs {
    /// Raw command, e.g. "PRINT: hello"
    pub command: String,

    /// Origin recorded in the ingress log
    #[arg(long, default_value = "cli")]
    pub source: String,
}

/// Execute submit command
pub fn execute(args: SubmitArgs, config: GatewayConfig) -> Result<(), Box<dyn std::error::Error>> {
    let runtime = Runtime::open(config)?;
    let submission = runtime
        .gateway
        .submit(&args.command, Some(&args.source))?;

    println!("Command added to queue: {}", submission.command);
    println!("Request: {}", submission.request_id);
    Ok(())
}
