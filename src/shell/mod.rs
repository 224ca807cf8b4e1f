//! Shell lifecycle.
//!
//! The main thread becomes the UI thread: it owns the view and runs the host
//! loop. Hot reload lives on a background thread with its own tokio runtime.
//!
//! Shutdown order: complete the scheduler, cancel the watch session, dispose
//! the watcher, join the reload thread.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use anyhow::{Context, Result, anyhow};
use tokio_util::sync::CancellationToken;

use crate::config::ShellConfig;
use crate::host::{HostCloser, HostLoop, HostStats, View};
use crate::reload::ReloadTrigger;
use crate::scheduler::UiScheduler;
use crate::watch::ChangeWatcher;
use crate::{debug, log};

/// Everything a collaborator needs to reach the shell.
///
/// Created once on the UI thread and handed out explicitly.
pub struct ShellContext<V> {
    pub config: Arc<ShellConfig>,
    pub scheduler: Arc<UiScheduler<V>>,
    /// Cancelled at shutdown to end the watch session.
    pub session: CancellationToken,
}

impl<V> Clone for ShellContext<V> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            scheduler: Arc::clone(&self.scheduler),
            session: self.session.clone(),
        }
    }
}

/// Outcome of one shell run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShellReport {
    pub host: HostStats,
    /// Reloads posted, or `None` when hot reload was off or failed to start.
    pub reloads: Option<usize>,
}

pub struct Shell<V> {
    ctx: ShellContext<V>,
    host: HostLoop,
}

impl<V: View + 'static> Shell<V> {
    /// Must be called on the thread that will run [`Shell::run`].
    pub fn new(config: ShellConfig) -> Self {
        let host = HostLoop::new();
        let scheduler = Arc::new(UiScheduler::new(host.wake_signal()));
        Self {
            ctx: ShellContext {
                config: Arc::new(config),
                scheduler,
                session: CancellationToken::new(),
            },
            host,
        }
    }

    pub fn context(&self) -> &ShellContext<V> {
        &self.ctx
    }

    pub fn closer(&self) -> HostCloser {
        self.host.closer()
    }

    /// Run the host loop until closed, then shut down.
    pub fn run(self, view: &mut V) -> Result<ShellReport> {
        let config = &self.ctx.config;
        log!("shell"; "{} ready", view.title());

        let reload = if config.watch.enabled {
            Some(spawn_reload(self.ctx.clone())?)
        } else {
            debug!("shell"; "hot reload disabled");
            None
        };

        // Shut down even if the loop failed, so the reload thread is joined.
        let host = self.host.run(&self.ctx.scheduler, view);

        self.ctx.scheduler.complete();
        self.ctx.session.cancel();
        let reloads = match reload {
            Some(handle) => handle.join().map_err(|_| anyhow!("reload thread panicked"))?,
            None => None,
        };

        let host = host?;
        log!("shell"; "closed");
        Ok(ShellReport { host, reloads })
    }
}

fn spawn_reload<V: View + 'static>(ctx: ShellContext<V>) -> Result<JoinHandle<Option<usize>>> {
    thread::Builder::new()
        .name("hotview-reload".into())
        .spawn(move || run_reload(ctx))
        .context("failed to spawn reload thread")
}

/// Watcher and trigger on a small runtime. Returns `None` if setup failed.
fn run_reload<V: View + 'static>(ctx: ShellContext<V>) -> Option<usize> {
    let rt = match tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_time()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            log!("error"; "hot reload unavailable: failed to create runtime: {}", e);
            return None;
        }
    };

    rt.block_on(async move {
        let root = ctx.config.watch_root();
        let mut watcher = match ChangeWatcher::from_config(&ctx.config.watch, root.clone()) {
            Ok(watcher) => watcher,
            Err(e) => {
                log!("error"; "hot reload unavailable: {:#}", anyhow::Error::from(e));
                return None;
            }
        };

        let stream = match watcher.watch(ctx.session.clone()) {
            Ok(stream) => stream,
            Err(e) => {
                log!("error"; "hot reload unavailable: {}", e);
                return None;
            }
        };

        log!("watch"; "watching {} for `{}` ({})",
            root.display(), ctx.config.watch.pattern, ctx.config.watch.mode.label());

        let posted = ReloadTrigger::new(Arc::clone(&ctx.scheduler)).run(stream).await;
        watcher.dispose();
        Some(posted)
    })
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::time::Duration;

    use tempfile::TempDir;

    use super::*;
    use crate::host::HeadlessView;

    fn config_in(dir: &TempDir, watch_root: &str, enabled: bool) -> ShellConfig {
        let mut config = ShellConfig::default();
        config.root = dir.path().to_path_buf();
        config.watch.root = watch_root.into();
        config.watch.enabled = enabled;
        config.watch.window_ms = 50;
        config
    }

    #[test]
    fn test_watch_disabled() {
        let dir = TempDir::new().unwrap();
        let shell = Shell::new(config_in(&dir, "static", false));
        shell.closer().close();

        let mut view = HeadlessView::new("test");
        let report = shell.run(&mut view).unwrap();
        assert_eq!(report.reloads, None);
        assert_eq!(view.reloads(), 0);
    }

    #[test]
    fn test_missing_root_degrades_gracefully() {
        let dir = TempDir::new().unwrap();
        let shell = Shell::new(config_in(&dir, "does-not-exist", true));
        let ctx = shell.context().clone();
        let closer = shell.closer();

        // the shell still serves UI work without hot reload
        ctx.scheduler.post(|view: &mut HeadlessView| view.reload()).unwrap();
        closer.close();

        let mut view = HeadlessView::new("test");
        let report = shell.run(&mut view).unwrap();
        assert_eq!(report.reloads, None);
        assert_eq!(view.reloads(), 1);
        assert!(ctx.session.is_cancelled());
        assert!(ctx.scheduler.is_completed());
    }

    #[test]
    fn test_host_error_still_shuts_down() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("static")).unwrap();
        let config = config_in(&dir, "static", true);

        // built on another thread, so the host loop rejects this one
        let shell = thread::spawn(move || Shell::<HeadlessView>::new(config)).join().unwrap();
        let ctx = shell.context().clone();

        let mut view = HeadlessView::new("test");
        assert!(shell.run(&mut view).is_err());
        assert!(ctx.scheduler.is_completed());
        assert!(ctx.session.is_cancelled());
    }

    #[test]
    fn test_file_change_reloads_view() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("static");
        fs::create_dir(&root).unwrap();

        let shell = Shell::new(config_in(&dir, "static", true));
        let closer = shell.closer();

        let writer = thread::spawn(move || {
            thread::sleep(Duration::from_millis(500));
            fs::write(root.join("index.html"), "<h1>hi</h1>").unwrap();
            thread::sleep(Duration::from_millis(1500));
            closer.close();
        });

        let mut view = HeadlessView::new("test");
        let report = shell.run(&mut view).unwrap();
        writer.join().unwrap();

        assert!(view.reloads() >= 1);
        assert_eq!(report.reloads, Some(view.reloads()));
    }
}
