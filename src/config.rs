use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::scheduler::DEFAULT_COUNTDOWN;

/// The switcher's web port on the local host.
pub const DEFAULT_URL: &str = "http://127.0.0.1:1081";

/// Command-line arguments. Every flag can also come from the environment.
#[derive(Parser, Debug)]
#[command(name = "switchpanel")]
#[command(about = "Terminal control panel for a failover-switching proxy")]
#[command(version)]
pub struct Args {
    /// Base URL of the switcher's web interface
    #[arg(long, env = "SWITCHPANEL_URL", default_value = DEFAULT_URL)]
    pub url: String,

    /// Seconds counted down between status refreshes
    #[arg(long, env = "SWITCHPANEL_COUNTDOWN", default_value_t = DEFAULT_COUNTDOWN)]
    pub countdown: u32,

    /// Delay before re-reading status after a server switch (ms)
    #[arg(long, env = "SWITCHPANEL_RESYNC_DELAY_MS", default_value_t = 2000)]
    pub resync_delay_ms: u64,

    /// Abandon a status fetch that has not answered after this long (ms)
    #[arg(long, env = "SWITCHPANEL_STALE_FETCH_MS", default_value_t = 10_000)]
    pub stale_fetch_ms: u64,

    /// Directory for the rolling log file (defaults to the system temp dir)
    #[arg(long, env = "SWITCHPANEL_LOG_DIR")]
    pub log_dir: Option<PathBuf>,
}

#[derive(Clone, Debug)]
pub struct PanelConfig {
    pub base_url: String,
    pub countdown: u32,
    pub resync_delay: Duration,
    pub stale_fetch_after: Duration,
    pub confirm_timeout: Duration,
    pub log_dir: PathBuf,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_URL.to_string(),
            countdown: DEFAULT_COUNTDOWN,
            resync_delay: Duration::from_secs(2),
            stale_fetch_after: Duration::from_secs(10),
            confirm_timeout: Duration::from_secs(10),
            log_dir: std::env::temp_dir(),
        }
    }
}

impl From<Args> for PanelConfig {
    fn from(args: Args) -> Self {
        Self {
            base_url: args.url,
            countdown: args.countdown,
            resync_delay: Duration::from_millis(args.resync_delay_ms),
            stale_fetch_after: Duration::from_millis(args.stale_fetch_ms),
            log_dir: args.log_dir.unwrap_or_else(std::env::temp_dir),
            ..Self::default()
        }
    }
}
