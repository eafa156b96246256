// Re-export all model types from submodules.

pub use app::AppView;
pub use panel::{PanelBody, PanelSource, TextPanelState};
pub use selector::{SELECTOR_PLACEHOLDER, SelectorOption, ServerSelector};
pub use snapshot::{
    AutoSwitchAction, AutoSwitchBody, Envelope, MetricValue, PLACEHOLDER, StatusSnapshot,
    SwitchRequest,
};

mod app;
mod panel;
mod selector;
mod snapshot;
