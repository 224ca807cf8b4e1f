//! `hotview run`: the shell on the main thread.

use std::thread;
use std::time::Duration;

use anyhow::{Result, anyhow};

use crate::cli::RunArgs;
use crate::config::ShellConfig;
use crate::host::{HeadlessView, HostCloser};
use crate::log;
use crate::shell::Shell;

pub fn run_shell(config: ShellConfig, args: &RunArgs) -> Result<()> {
    let mut view = HeadlessView::new(config.shell.title.clone());
    let shell = Shell::new(config);

    setup_shutdown_handler(shell.closer())?;
    if let Some(secs) = args.exit_after {
        spawn_exit_timer(shell.closer(), Duration::from_secs(secs));
    }

    let report = shell.run(&mut view)?;
    match report.reloads {
        Some(n) => log!("shell"; "{} reload(s), {} ui item(s) run", n, report.host.items_run),
        None => log!("shell"; "{} ui item(s) run", report.host.items_run),
    }
    Ok(())
}

/// Ctrl+C closes the host loop so shutdown runs in order.
fn setup_shutdown_handler(closer: HostCloser) -> Result<()> {
    ctrlc::set_handler(move || {
        log!("shell"; "shutting down...");
        closer.close();
    })
    .map_err(|e| anyhow!("failed to set Ctrl+C handler: {}", e))
}

fn spawn_exit_timer(closer: HostCloser, after: Duration) {
    thread::spawn(move || {
        thread::sleep(after);
        log!("shell"; "exit timer elapsed");
        closer.close();
    });
}
