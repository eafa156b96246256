//! Projection of a status snapshot onto the registered render targets.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use chrono::{DateTime, Local, TimeZone};
use regex::Regex;

use crate::layout::{RenderTarget, TargetRegistry};
use crate::model::{AutoSwitchAction, MetricValue, PLACEHOLDER, ServerSelector, StatusSnapshot};

pub const UNKNOWN_SERVER: &str = "unknown";
pub const NO_FAILURES: &str = "No recorded server failures";

// Leading `vX.Y.Z[-N]` ahead of a hyphenated build suffix.
static NAIVE_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(v[\d.]+(?:-\d+)?)-").expect("naive version pattern"));

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HealthTier {
    Online,
    Warning,
    Error,
}

impl HealthTier {
    pub fn from_error_count(errors: u32) -> Self {
        match errors {
            0 => HealthTier::Online,
            1..=5 => HealthTier::Warning,
            _ => HealthTier::Error,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            HealthTier::Online => "online",
            HealthTier::Warning => "warning",
            HealthTier::Error => "error",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ButtonStyle {
    Success,
    Secondary,
}

/// Indicator plus text for the auto-switch state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AutoSwitchBadge {
    pub tier: HealthTier,
    pub text: &'static str,
}

/// The toggle always offers the inverse of the current state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ToggleButton {
    pub label: &'static str,
    pub style: ButtonStyle,
    pub action: AutoSwitchAction,
}

/// Rendered values for one reconciliation pass. `None` means the target is
/// not registered in this session.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DashboardView {
    pub current_server: Option<String>,
    pub status_indicator: Option<HealthTier>,
    pub uptime: Option<String>,
    pub auto_switch_status: Option<AutoSwitchBadge>,
    pub auto_switch_button: Option<ToggleButton>,
    pub error_count: Option<(u32, HealthTier)>,
    pub goroutines: Option<String>,
    pub memory_usage: Option<String>,
    pub memory_alloc: Option<String>,
    pub start_time: Option<String>,
    pub naive_version: Option<String>,
    pub switcher_version: Option<String>,
    pub last_update: Option<String>,
    pub down_stats: Option<Vec<String>>,
    pub switch_enabled: Option<bool>,
}

impl DashboardView {
    /// Recompute the switch button after a selection change.
    pub fn update_switch_button(&mut self, selector: &ServerSelector, current: Option<&str>) {
        if self.switch_enabled.is_some() {
            self.switch_enabled = Some(selector.can_switch(current));
        }
    }
}

/// Project `snapshot` onto every registered target. The selector is rebuilt
/// in place so the user's choice carries over when still valid.
pub fn reconcile(
    snapshot: &StatusSnapshot,
    registry: &TargetRegistry,
    selector: &mut ServerSelector,
    now: DateTime<Local>,
) -> DashboardView {
    let mut view = DashboardView::default();
    let current = snapshot.current_server();
    let tier = HealthTier::from_error_count(snapshot.error_count);
    let paused = snapshot.auto_switch_paused;

    for target in registry.iter() {
        match target {
            RenderTarget::CurrentServer => {
                view.current_server = Some(current.unwrap_or(UNKNOWN_SERVER).to_string());
            }
            RenderTarget::StatusIndicator => view.status_indicator = Some(tier),
            RenderTarget::Uptime => view.uptime = Some(text_or_placeholder(snapshot.uptime.as_deref())),
            RenderTarget::AutoSwitchStatus => view.auto_switch_status = Some(auto_switch_badge(paused)),
            RenderTarget::AutoSwitchButton => view.auto_switch_button = Some(toggle_button(paused)),
            RenderTarget::ErrorCount => view.error_count = Some((snapshot.error_count, tier)),
            RenderTarget::Goroutines => {
                view.goroutines = Some(metric(snapshot.goroutine_count.as_ref(), None));
            }
            RenderTarget::MemoryUsage => {
                view.memory_usage = Some(metric(snapshot.memory_usage_mb.as_ref(), Some("MB")));
            }
            RenderTarget::MemoryAlloc => {
                view.memory_alloc = Some(metric(snapshot.memory_alloc_mb.as_ref(), Some("MB")));
            }
            RenderTarget::StartTime => {
                view.start_time = Some(
                    snapshot
                        .start_time
                        .and_then(format_start_time)
                        .unwrap_or_else(|| PLACEHOLDER.to_string()),
                );
            }
            RenderTarget::NaiveVersion => {
                view.naive_version = Some(display_naive_version(snapshot.naive_version.as_deref()));
            }
            RenderTarget::SwitcherVersion => {
                view.switcher_version =
                    Some(display_switcher_version(snapshot.switcher_version.as_deref()));
            }
            RenderTarget::LastUpdate => view.last_update = Some(now.format("%H:%M:%S").to_string()),
            RenderTarget::DownStats => view.down_stats = Some(display_down_stats(&snapshot.down_stats)),
            RenderTarget::ServerSelector => selector.rebuild(&snapshot.available_servers, current),
            RenderTarget::SwitchButton => view.switch_enabled = Some(selector.can_switch(current)),
            // Driven by the countdown and the log viewer, not by snapshots.
            RenderTarget::Countdown | RenderTarget::LogsPanel => {}
        }
    }

    view
}

fn text_or_placeholder(value: Option<&str>) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or(PLACEHOLDER)
        .to_string()
}

pub fn auto_switch_badge(paused: bool) -> AutoSwitchBadge {
    if paused {
        AutoSwitchBadge { tier: HealthTier::Warning, text: "Paused" }
    } else {
        AutoSwitchBadge { tier: HealthTier::Online, text: "Running" }
    }
}

pub fn toggle_button(paused: bool) -> ToggleButton {
    if paused {
        ToggleButton {
            label: "Resume auto-switch",
            style: ButtonStyle::Success,
            action: AutoSwitchAction::Resume,
        }
    } else {
        ToggleButton {
            label: "Pause auto-switch",
            style: ButtonStyle::Secondary,
            action: AutoSwitchAction::Pause,
        }
    }
}

pub fn metric(value: Option<&MetricValue>, unit: Option<&str>) -> String {
    match (value.filter(|v| !v.is_blank()), unit) {
        (Some(v), Some(unit)) => format!("{} {}", v, unit),
        (Some(v), None) => v.to_string(),
        (None, _) => PLACEHOLDER.to_string(),
    }
}

/// `v1.2.3-45-abcdef` → `v1.2.3-45`; anything else is shown as sent.
pub fn display_naive_version(raw: Option<&str>) -> String {
    let raw = text_or_placeholder(raw);
    if raw == PLACEHOLDER {
        return raw;
    }
    let shortened = NAIVE_VERSION
        .captures(&raw)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string());
    shortened.unwrap_or(raw)
}

pub fn display_switcher_version(raw: Option<&str>) -> String {
    let raw = text_or_placeholder(raw);
    if raw == PLACEHOLDER || raw.starts_with('v') {
        raw
    } else {
        format!("v{}", raw)
    }
}

pub fn display_down_stats(stats: &BTreeMap<String, u64>) -> Vec<String> {
    if stats.is_empty() {
        return vec![NO_FAILURES.to_string()];
    }
    stats
        .iter()
        .map(|(server, count)| format!("{}: {}", server, count))
        .collect()
}

fn format_start_time(unix_secs: i64) -> Option<String> {
    Local
        .timestamp_opt(unix_secs, 0)
        .single()
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
}
