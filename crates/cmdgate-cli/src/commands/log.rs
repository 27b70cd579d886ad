//! Show recent execution records
//!
//! Usage: cmdgate log [--tail N]

use clap::Args;
use cmdgate_engine::{GatewayConfig, Runtime};

#[derive(Debug, Args)]
pub struct LogArgs {
    /// Number of most recent records to show
    #[arg(long, default_value_t = 20)]
    pub tail: usize,
}

/// Execute log command
pub fn execute(args: LogArgs, config: GatewayConfig) -> Result<(), Box<dyn std::error::Error>> {
    let runtime = Runtime::open(config)?;
    let records = runtime.execution_log.tail(args.tail)?;

    if records.is_empty() {
        println!("No executions recorded");
        return Ok(());
    }

    for record in records {
        println!(
            "[{}] {} {} -> {}",
            record.timestamp.format("%Y-%m-%d %H:%M:%S"),
            record.status,
            record.command,
            record.result
        );
    }
    Ok(())
}
