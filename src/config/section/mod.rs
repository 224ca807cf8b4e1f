//! Configuration sections.

mod shell;
mod watch;

pub use shell::ShellSection;
pub use watch::WatchConfig;
