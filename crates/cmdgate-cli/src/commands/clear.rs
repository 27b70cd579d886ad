//! Usage: cmdgate clear

use cmdgate_engine::{GatewayConfig, Runtime};

/// Execute clear command
pub fn execute(config: GatewayConfig) -> Result<(), Box<dyn std::error::Error>> {
    let runtime = Runtime::open(config)?;
    runtime.gateway.clear()?;
    println!("Command queue cleared");
    Ok(())
}
