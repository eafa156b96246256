use super::panel::PanelSource;

/// App-level view state
#[derive(Clone, Debug, PartialEq)]
pub enum AppView {
    Dashboard,
    Panel(PanelSource), // text report overlay
}
