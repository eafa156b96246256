use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Shown wherever the backend left a field out.
pub const PLACEHOLDER: &str = "--";

/// Response envelope shared by every JSON endpoint of the switcher.
#[derive(Clone, Debug, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

/// One complete status payload. Replaced wholesale on every successful fetch.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct StatusSnapshot {
    pub current_server: Option<String>,
    pub error_count: u32,
    pub uptime: Option<String>,
    pub auto_switch_paused: bool,
    pub goroutine_count: Option<MetricValue>,
    pub memory_usage_mb: Option<MetricValue>,
    pub memory_alloc_mb: Option<MetricValue>,
    pub start_time: Option<i64>,
    pub naive_version: Option<String>,
    pub switcher_version: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub down_stats: BTreeMap<String, u64>,
    #[serde(deserialize_with = "null_as_default")]
    pub available_servers: Vec<String>,
}

// The backend marshals an unset server pool as `null`.
fn null_as_default<'de, D, T>(de: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(de)?.unwrap_or_default())
}

impl StatusSnapshot {
    /// The active server, treating an empty string as unknown.
    pub fn current_server(&self) -> Option<&str> {
        self.current_server.as_deref().filter(|s| !s.is_empty())
    }
}

/// A metric the backend reports either as a JSON number or as a
/// preformatted numeric string (memory comes through as `"12.34"`).
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Number(f64),
    Text(String),
}

impl MetricValue {
    /// Zero and empty values carry no information and render as the placeholder.
    pub fn is_blank(&self) -> bool {
        match self {
            MetricValue::Number(n) => *n == 0.0,
            MetricValue::Text(s) => s.is_empty(),
        }
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Number(n) if n.fract() == 0.0 => write!(f, "{}", *n as i64),
            MetricValue::Number(n) => write!(f, "{}", n),
            MetricValue::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Body of `POST /api/switch`.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SwitchRequest {
    Avoid { avoid_server: String },
    Select { target_server: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AutoSwitchAction {
    Pause,
    Resume,
}

impl AutoSwitchAction {
    /// The action that flips the given paused state.
    pub fn toggling(paused: bool) -> Self {
        if paused {
            AutoSwitchAction::Resume
        } else {
            AutoSwitchAction::Pause
        }
    }
}

/// Body of `POST /api/auto-switch`.
#[derive(Clone, Debug, Serialize)]
pub struct AutoSwitchBody {
    pub action: AutoSwitchAction,
}
