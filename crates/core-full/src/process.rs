//! Child process helpers for the Node tool adapters

use kiln_core::error::{KilnError, Result};
use std::ffi::OsStr;
use std::path::Path;
use std::process::{Output, Stdio};
use tokio::process::Command;
use tracing::debug;

fn log_command_info(command: &Command) {
    let cmd = command.as_std();
    let bin_name = cmd.get_program().to_string_lossy();
    let args_list = cmd
        .get_args()
        .map(|a| a.to_string_lossy())
        .collect::<Vec<_>>();
    let command_line = format!("{} {}", bin_name, args_list.join(" "));

    match cmd.get_current_dir() {
        Some(cwd) => debug!("Running command {} (in {})", command_line, cwd.display()),
        None => debug!("Running command {}", command_line),
    }
}

fn command_name(command: &Command) -> String {
    let cmd = command.as_std();
    if cmd.get_program() == "npx" {
        if let Some(tool) = cmd.get_args().next() {
            return tool.to_string_lossy().into_owned();
        }
    }
    cmd.get_program().to_string_lossy().into_owned()
}

#[cfg(not(windows))]
pub fn create_command<S: AsRef<OsStr>>(bin: S) -> Command {
    Command::new(bin)
}

#[cfg(windows)]
pub fn create_command<S: AsRef<OsStr>>(bin: S) -> Command {
    let bin_name = bin.as_ref().to_string_lossy();

    if bin_name == "npx" || bin_name.ends_with(".cmd") || bin_name.ends_with(".bat") {
        let mut cmd = Command::new("cmd.exe");
        cmd.arg("/d");
        cmd.arg("/s");
        cmd.arg("/c");
        cmd.arg(bin);
        cmd
    } else {
        Command::new(bin)
    }
}

/// `npx <tool>` rooted at the project directory
pub fn npx(tool: &str, root: &Path) -> Command {
    let mut command = create_command("npx");
    command.arg(tool).current_dir(root);
    command
}

/// Run and capture output without judging the exit status
pub async fn exec_command_unchecked(command: &mut Command) -> Result<Output> {
    log_command_info(command);

    command
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|e| KilnError::tool(command_name(command), format!("failed to start: {e}")))
}

/// Run and capture output; a non-zero exit is a tool error
pub async fn exec_command(command: &mut Command) -> Result<Output> {
    let output = exec_command_unchecked(command).await?;
    handle_nonzero_status(command, &output)?;
    Ok(output)
}

pub async fn exec_command_capture_stdout(command: &mut Command) -> Result<String> {
    let output = exec_command(command).await?;
    Ok(output_to_string(&output.stdout))
}

/// Run with inherited stdio, for long running tools such as watchers
pub async fn spawn_command(command: &mut Command) -> Result<()> {
    log_command_info(command);

    let status = command
        .stdin(Stdio::null())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .await
        .map_err(|e| KilnError::tool(command_name(command), format!("failed to start: {e}")))?;

    if status.success() {
        Ok(())
    } else {
        Err(KilnError::tool(
            command_name(command),
            format!("exited with {status}"),
        ))
    }
}

pub fn output_to_string(data: &[u8]) -> String {
    String::from_utf8_lossy(data).into_owned()
}

fn handle_nonzero_status(command: &Command, output: &Output) -> Result<()> {
    if output.status.success() {
        return Ok(());
    }

    let name = command_name(command);
    let message = match output.status.code() {
        Some(code) => {
            let stderr = output_to_string(&output.stderr);
            let detail = if stderr.trim().is_empty() {
                output_to_string(&output.stdout)
            } else {
                stderr
            };
            format!("exited with code {}: {}", code, detail.trim())
        }
        None => String::from("process terminated by signal"),
    };

    Err(KilnError::tool(name, message))
}
