//! Process restart after a `RESTART_SYSTEM` command
//!
//! The dispatcher only reports that a restart was requested; replacing the
//! process image happens here, at the outermost layer.

use std::process::Command;

/// Re-execute the current binary with the same arguments
///
/// On Unix this replaces the process and only returns on failure.
pub fn reexec() -> Result<(), Box<dyn std::error::Error>> {
    let exe = std::env::current_exe()?;
    let args: Vec<_> = std::env::args_os().skip(1).collect();
    tracing::info!(exe = %exe.display(), "restarting");

    let mut command = Command::new(&exe);
    command.args(&args);
    replace_process(&mut command)
}

#[cfg(unix)]
fn replace_process(command: &mut Command) -> Result<(), Box<dyn std::error::Error>> {
    use std::os::unix::process::CommandExt;
    Err(command.exec().into())
}

#[cfg(not(unix))]
fn replace_process(command: &mut Command) -> Result<(), Box<dyn std::error::Error>> {
    command.spawn()?;
    std::process::exit(0)
}
