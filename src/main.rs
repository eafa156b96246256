use std::io;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use clap::Parser;
use signal_hook::consts::{SIGINT, SIGTERM};

use switchpanel::app;
use switchpanel::config::{Args, PanelConfig};
use switchpanel::logging;

fn main() -> io::Result<()> {
    let config = PanelConfig::from(Args::parse());

    if let Err(e) = logging::setup_logging(&config.log_dir) {
        eprintln!("switchpanel: file logging disabled: {}", e);
    }

    let should_quit = Arc::new(AtomicBool::new(false));
    signal_hook::flag::register(SIGINT, Arc::clone(&should_quit))?;
    signal_hook::flag::register(SIGTERM, Arc::clone(&should_quit))?;

    // Leave the terminal usable if anything panics mid-frame.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        app::restore_terminal();
        default_hook(info);
    }));

    app::run(config, should_quit)
}
