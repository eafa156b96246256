use std::fmt;

/// Named dashboard locations the reconciler can fill.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum RenderTarget {
    Countdown,
    CurrentServer,
    StatusIndicator,
    Uptime,
    AutoSwitchStatus,
    AutoSwitchButton,
    ErrorCount,
    Goroutines,
    MemoryUsage,
    MemoryAlloc,
    StartTime,
    NaiveVersion,
    SwitcherVersion,
    LastUpdate,
    DownStats,
    ServerSelector,
    SwitchButton,
    LogsPanel,
}

impl RenderTarget {
    /// Every target in dashboard order.
    pub const ALL: [RenderTarget; 18] = [
        RenderTarget::Countdown,
        RenderTarget::CurrentServer,
        RenderTarget::StatusIndicator,
        RenderTarget::Uptime,
        RenderTarget::AutoSwitchStatus,
        RenderTarget::AutoSwitchButton,
        RenderTarget::ErrorCount,
        RenderTarget::Goroutines,
        RenderTarget::MemoryUsage,
        RenderTarget::MemoryAlloc,
        RenderTarget::StartTime,
        RenderTarget::NaiveVersion,
        RenderTarget::SwitcherVersion,
        RenderTarget::LastUpdate,
        RenderTarget::DownStats,
        RenderTarget::ServerSelector,
        RenderTarget::SwitchButton,
        RenderTarget::LogsPanel,
    ];

    /// Targets that only fit on a tall terminal.
    fn is_detail(&self) -> bool {
        matches!(
            self,
            RenderTarget::Goroutines
                | RenderTarget::MemoryUsage
                | RenderTarget::MemoryAlloc
                | RenderTarget::StartTime
                | RenderTarget::DownStats
        )
    }
}

impl fmt::Display for RenderTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderTarget::Countdown => write!(f, "Next refresh"),
            RenderTarget::CurrentServer => write!(f, "Current server"),
            RenderTarget::StatusIndicator => write!(f, "Health"),
            RenderTarget::Uptime => write!(f, "Uptime"),
            RenderTarget::AutoSwitchStatus => write!(f, "Auto-switch"),
            RenderTarget::AutoSwitchButton => write!(f, "Toggle"),
            RenderTarget::ErrorCount => write!(f, "Errors"),
            RenderTarget::Goroutines => write!(f, "Goroutines"),
            RenderTarget::MemoryUsage => write!(f, "Memory"),
            RenderTarget::MemoryAlloc => write!(f, "Allocated"),
            RenderTarget::StartTime => write!(f, "Started"),
            RenderTarget::NaiveVersion => write!(f, "naive"),
            RenderTarget::SwitcherVersion => write!(f, "switcher"),
            RenderTarget::LastUpdate => write!(f, "Last update"),
            RenderTarget::DownStats => write!(f, "Failure history"),
            RenderTarget::ServerSelector => write!(f, "Switch to"),
            RenderTarget::SwitchButton => write!(f, "Switch"),
            RenderTarget::LogsPanel => write!(f, "Logs"),
        }
    }
}

/// Rows needed to show every target.
pub const FULL_LAYOUT_ROWS: u16 = 30;

/// Render targets available in this session, registered once at startup.
/// Anything not registered is skipped by the reconciler and the presenter.
#[derive(Clone, Debug)]
pub struct TargetRegistry {
    targets: Vec<RenderTarget>,
}

impl TargetRegistry {
    pub fn full() -> Self {
        Self {
            targets: RenderTarget::ALL.to_vec(),
        }
    }

    /// Drops the detail targets (metrics, start time, failure history).
    pub fn compact() -> Self {
        Self {
            targets: RenderTarget::ALL
                .into_iter()
                .filter(|t| !t.is_detail())
                .collect(),
        }
    }

    /// Pick the registry the terminal can hold.
    pub fn for_viewport(_cols: u16, rows: u16) -> Self {
        if rows >= FULL_LAYOUT_ROWS {
            Self::full()
        } else {
            Self::compact()
        }
    }

    pub fn with_only(targets: &[RenderTarget]) -> Self {
        Self {
            targets: RenderTarget::ALL
                .into_iter()
                .filter(|t| targets.contains(t))
                .collect(),
        }
    }

    pub fn contains(&self, target: RenderTarget) -> bool {
        self.targets.contains(&target)
    }

    pub fn iter(&self) -> impl Iterator<Item = RenderTarget> + '_ {
        self.targets.iter().copied()
    }
}

impl Default for TargetRegistry {
    fn default() -> Self {
        Self::full()
    }
}
