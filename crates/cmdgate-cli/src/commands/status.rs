//! Print the queue as JSON
//!
//! Usage: cmdgate status

use cmdgate_engine::{GatewayConfig, Runtime};

/// Execute status command
pub fn execute(config: GatewayConfig) -> Result<(), Box<dyn std::error::Error>> {
    let runtime = Runtime::open(config)?;
    let status = runtime.gateway.status();
    println!("{}", serde_json::to_string_pretty(&status)?);
    Ok(())
}
