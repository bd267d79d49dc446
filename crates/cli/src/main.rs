mod cli;

use clap::Parser;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, error, warn};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Commands};
use kiln_core::config::constants;
use kiln_core::error::{KilnError, Result};
use kiln_core_full::LintOptions;
use kiln_core_full::commands::{
    analyse_command, build_command, clean_command, dev_command, lint_command,
};

#[tokio::main]
async fn main() {
    constants::init_constants();
    let args = Cli::parse();

    let root = match std::path::absolute(&args.root) {
        Ok(root) => root,
        Err(e) => {
            eprintln!("Invalid project root {:?}: {}", args.root, e);
            std::process::exit(1);
        }
    };
    init_tracing(&root);

    if let Err(e) = run(args.cmd, &root).await {
        error!("{}", e);
        std::process::exit(1);
    }
}

/// Console output filtered by `RUST_LOG`, plus a debug log file when one can be created
fn init_tracing(root: &Path) {
    let console_layer = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_level(true)
        .with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")));

    let (file_layer, log_file) = match open_log_file(root) {
        Ok((path, file)) => (
            Some(
                fmt::layer()
                    .with_writer(file)
                    .with_ansi(false)
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_level(true)
                    .with_filter(EnvFilter::new("debug")),
            ),
            Ok(path),
        ),
        Err(e) => (None, Err(e)),
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();

    match log_file {
        Ok(path) => debug!("Log file: {}", path.display()),
        Err(e) => warn!("Failed to create log file: {}", e),
    }
}

/// `<exe dir>/logs/<project>_<pid>_<timestamp>.log`
fn open_log_file(root: &Path) -> Result<(PathBuf, File)> {
    let logs_dir = constants::EXECUTABLE_PATH
        .get()
        .and_then(|exe| exe.parent())
        .map(|dir| dir.join("logs"))
        .ok_or_else(|| KilnError::other("cannot locate the kiln executable"))?;
    std::fs::create_dir_all(&logs_dir)?;

    let project = root
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "kiln".to_string());
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default();

    let path = logs_dir.join(format!("{}_{}_{}.log", project, std::process::id(), timestamp));
    let file = File::create(&path)?;
    Ok((path, file))
}

async fn run(cmd: Commands, root: &Path) -> Result<()> {
    match cmd {
        Commands::Build { whole_project } => {
            build_command(root, whole_project).await?;
        }
        Commands::Dev {
            watch_only,
            whole_project,
        } => {
            dev_command(root, watch_only, whole_project).await?;
        }
        Commands::Analyse => {
            analyse_command(root).await?;
        }
        Commands::Lint {
            all,
            package,
            no_fix,
            no_break,
            type_check,
        } => {
            let options = LintOptions {
                all,
                package,
                fix: !no_fix,
                break_on_error: !no_break,
                type_check,
            };
            lint_command(root, options).await?;
        }
        Commands::Clean { whole_project } => {
            clean_command(root, whole_project).await?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_file_is_named_after_project() {
        constants::init_constants();
        let (path, _file) = open_log_file(Path::new("/work/my-app")).unwrap();

        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with(&format!("my-app_{}_", std::process::id())));
        assert!(name.ends_with(".log"));
        assert_eq!(path.parent().unwrap().file_name().unwrap(), "logs");
        assert!(path.is_file());

        std::fs::remove_file(path).unwrap();
    }
}
