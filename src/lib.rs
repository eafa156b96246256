//! Switchpanel: a terminal control panel for a failover-switching proxy.
//!
//! This library exposes the core modules for use by the binary and by tests.

pub mod model;
pub mod view;
pub mod layout;
pub mod controller;
pub mod client;
pub mod config;
pub mod scheduler;
pub mod sync;
pub mod reconcile;
pub mod dispatch;
pub mod log_viewer;
pub mod logging;
pub mod app;
